use super::ApiClient;
use crate::types::{MindMap, Result};

pub struct MindMapsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn mind_maps(&self) -> MindMapsApi<'_> {
        MindMapsApi { client: self }
    }
}

impl MindMapsApi<'_> {
    pub async fn generate(&self, session_id: &str) -> Result<MindMap> {
        let path = format!("/api/sessions/{}/mind-maps", urlencoding::encode(session_id));
        self.client.post_empty(&path).await
    }

    pub async fn list(&self, session_id: &str) -> Result<Vec<MindMap>> {
        let path = format!("/api/sessions/{}/mind-maps", urlencoding::encode(session_id));
        self.client.get(&path).await
    }
}

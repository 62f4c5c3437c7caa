use super::{ApiClient, FileUpload};
use crate::types::{Material, Result};

/// Study materials attached to a session.
pub struct MaterialsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn materials(&self) -> MaterialsApi<'_> {
        MaterialsApi { client: self }
    }
}

impl MaterialsApi<'_> {
    pub async fn upload(&self, session_id: &str, file: FileUpload) -> Result<Material> {
        let path = format!("/api/sessions/{}/materials", urlencoding::encode(session_id));
        self.client.post_multipart(&path, file.into_form()?).await
    }

    pub async fn list(&self, session_id: &str) -> Result<Vec<Material>> {
        let path = format!("/api/sessions/{}/materials", urlencoding::encode(session_id));
        self.client.get(&path).await
    }
}

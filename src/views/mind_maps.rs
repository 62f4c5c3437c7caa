use super::{failure_message, Notifier, ScreenState};
use crate::api::ApiClient;
use crate::types::MindMap;
use tracing::{error, info};

/// Mind maps of the selected session.
pub struct MindMapsScreen {
    api: ApiClient,
    mind_maps: Vec<MindMap>,
}

impl MindMapsScreen {
    pub const EMPTY_PROMPT: &'static str = "Select or create a session to view mind maps.";

    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            mind_maps: Vec::new(),
        }
    }

    pub fn mind_maps(&self) -> &[MindMap] {
        &self.mind_maps
    }

    pub async fn load(&mut self, session_id: Option<&str>) -> ScreenState {
        let Some(session_id) = session_id else {
            self.mind_maps.clear();
            return ScreenState::NoSession;
        };

        match self.api.mind_maps().list(session_id).await {
            Ok(mind_maps) => {
                self.mind_maps = mind_maps;
                ScreenState::Ready
            }
            Err(e) => {
                error!("Failed to load mind maps: {}", e);
                ScreenState::Stale
            }
        }
    }

    /// Build a mind map from the session's conversation, then re-fetch.
    pub async fn generate(
        &mut self,
        session_id: Option<&str>,
        notifier: &dyn Notifier,
    ) -> Option<MindMap> {
        let session_id = session_id?;

        match self.api.mind_maps().generate(session_id).await {
            Ok(mind_map) => {
                info!("Generated mind map '{}' ({} nodes)", mind_map.title, mind_map.node_count);
                self.load(Some(session_id)).await;
                Some(mind_map)
            }
            Err(e) => {
                error!("Failed to generate mind map: {}", e);
                notifier.alert(&failure_message("generate mind map", &e));
                None
            }
        }
    }
}

use super::{failure_message, Notifier, ScreenState};
use crate::api::{ApiClient, FileUpload};
use crate::types::Material;
use tracing::{error, info};

/// Study materials of the selected session.
pub struct MaterialsScreen {
    api: ApiClient,
    materials: Vec<Material>,
}

impl MaterialsScreen {
    pub const EMPTY_PROMPT: &'static str = "Select or create a session to manage materials.";

    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            materials: Vec::new(),
        }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub async fn load(&mut self, session_id: Option<&str>) -> ScreenState {
        let Some(session_id) = session_id else {
            self.materials.clear();
            return ScreenState::NoSession;
        };

        match self.api.materials().list(session_id).await {
            Ok(materials) => {
                self.materials = materials;
                ScreenState::Ready
            }
            Err(e) => {
                error!("Failed to load materials: {}", e);
                ScreenState::Stale
            }
        }
    }

    /// Upload a file, then re-fetch the list.
    pub async fn upload(
        &mut self,
        session_id: Option<&str>,
        file: FileUpload,
        notifier: &dyn Notifier,
    ) -> Option<Material> {
        let session_id = session_id?;

        match self.api.materials().upload(session_id, file).await {
            Ok(material) => {
                info!("Uploaded material {} ({} bytes)", material.name, material.size);
                self.load(Some(session_id)).await;
                Some(material)
            }
            Err(e) => {
                error!("Failed to upload material: {}", e);
                notifier.alert(&failure_message("upload material", &e));
                None
            }
        }
    }
}

use super::ScreenState;
use crate::api::ApiClient;
use crate::types::{ClientError, Material, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::error;

/// Requested homework difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(ClientError::InvalidInput(format!(
                "unknown difficulty '{}' (expected beginner, intermediate or advanced)",
                other
            ))),
        }
    }
}

/// Input for homework generation: a topic, a difficulty and the materials to
/// draw from.
pub struct GenerationForm {
    api: ApiClient,
    pub topic: String,
    pub difficulty: Difficulty,
    selected: Vec<String>,
    materials: Vec<Material>,
}

impl GenerationForm {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            topic: String::new(),
            difficulty: Difficulty::default(),
            selected: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Load the session's materials so they can be offered for selection.
    pub async fn open(&mut self, session_id: Option<&str>) -> ScreenState {
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

    pub fn available_materials(&self) -> &[Material] {
        &self.materials
    }

    /// Flip selection of a material. Returns whether it is now selected.
    pub fn toggle_material(&mut self, material_id: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|id| id == material_id) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(material_id.to_string());
            true
        }
    }

    /// Selected material ids, in selection order.
    pub fn selected_materials(&self) -> &[String] {
        &self.selected
    }

    pub fn can_submit(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    /// The generation prompt sent to the backend.
    pub fn prompt(&self) -> Result<String> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(ClientError::InvalidInput("a topic is required".to_string()));
        }
        Ok(format!(
            "Create homework on topic: {} with difficulty: {}",
            topic, self.difficulty
        ))
    }

    /// Clear topic and selection. Difficulty is kept.
    pub fn reset(&mut self) {
        self.topic.clear();
        self.selected.clear();
    }
}

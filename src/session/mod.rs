//! Session list and selection
//!
//! [`SessionProvider`] caches the user's sessions and tracks which one is
//! selected. Every screen reads the selection from here; nothing that is
//! scoped to a session is fetched while the selection is empty.

use crate::api::ApiClient;
use crate::auth::AuthProvider;
use crate::types::{ClientError, Result, Session};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// What a refresh does with a selection that is no longer in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Never touch an existing selection on refresh, even a stale one.
    #[default]
    Keep,
    /// Drop a selection missing from the refreshed list, then fall back to
    /// the first session if there is one.
    Revalidate,
}

#[derive(Debug, Default)]
struct SessionState {
    sessions: Vec<Session>,
    current: Option<String>,
}

pub struct SessionProvider {
    api: ApiClient,
    policy: SelectionPolicy,
    state: RwLock<SessionState>,
}

impl SessionProvider {
    /// Create the provider for a signed-in user and load the session list once.
    ///
    /// The initial load follows the read-path rules: a failure is logged and
    /// leaves the list empty.
    pub async fn connect(auth: &AuthProvider, policy: SelectionPolicy) -> Result<Self> {
        if !auth.is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }

        let provider = Self {
            api: auth.api().clone(),
            policy,
            state: RwLock::new(SessionState::default()),
        };
        // Logged inside refresh_sessions
        let _ = provider.refresh_sessions().await;
        Ok(provider)
    }

    /// Replace the cached list with the server's.
    ///
    /// The first session is selected only when nothing is selected yet. On
    /// failure the cache is left as it was and the error is returned.
    pub async fn refresh_sessions(&self) -> Result<()> {
        let sessions = match self.api.chat().list_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                error!("Failed to fetch sessions: {}", e);
                return Err(e);
            }
        };

        let mut state = self.state.write();
        state.sessions = sessions;

        if self.policy == SelectionPolicy::Revalidate {
            let stale = state
                .current
                .as_ref()
                .is_some_and(|id| !state.sessions.iter().any(|s| &s.id == id));
            if stale {
                info!("Selected session no longer exists, clearing selection");
                state.current = None;
            }
        }

        if state.current.is_none() {
            state.current = state.sessions.first().map(|s| s.id.clone());
        }
        Ok(())
    }

    /// Create a session, refresh the list and select the new session.
    pub async fn create_new_session(&self, title: &str) -> Result<Session> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ClientError::InvalidInput(
                "session title cannot be empty".to_string(),
            ));
        }

        let session = self.api.chat().create_session(title).await.map_err(|e| {
            error!("Failed to create session: {}", e);
            e
        })?;
        info!("Created session {} ({})", session.title, session.id);

        // Logged inside refresh_sessions; the new id is selected regardless
        let _ = self.refresh_sessions().await;
        self.set_current_session_id(session.id.clone());
        Ok(session)
    }

    /// Change the selection. The id is not checked against the cached list.
    pub fn set_current_session_id(&self, id: impl Into<String>) {
        self.state.write().current = Some(id.into());
    }

    pub fn current_session_id(&self) -> Option<String> {
        self.state.read().current.clone()
    }

    /// The selected session, if it is in the cached list.
    pub fn current_session(&self) -> Option<Session> {
        let state = self.state.read();
        let id = state.current.as_ref()?;
        state.sessions.iter().find(|s| &s.id == id).cloned()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.state.read().sessions.clone()
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }
}

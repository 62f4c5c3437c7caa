//! Client-side authentication state
//!
//! [`AuthProvider`] owns the bearer token and the signed-in user's profile.
//!
//! # Lifecycle
//!
//! - **Restore**: on construction, the token and profile are read back from
//!   durable storage. Both must be present and the profile must parse;
//!   anything else is discarded wholesale.
//! - **Login / register**: a successful login writes token and profile to
//!   storage, then memory, then sets the API client's auth header.
//! - **Logout**: memory, storage and the auth header are all cleared. There is
//!   no server call.
//!
//! # Usage
//!
//! ```ignore
//! use study_assistant::{ApiClient, AuthProvider, FileStore};
//! use std::sync::Arc;
//!
//! let api = ApiClient::new("http://localhost:8000")?;
//! let auth = AuthProvider::restore(api, Arc::new(FileStore::new(".study-assistant/storage.json")));
//! if !auth.is_authenticated() {
//!     auth.login("a@b.com", "pw").await?;
//! }
//! ```

use crate::api::ApiClient;
use crate::storage::{KeyValueStore, AUTH_TOKEN_KEY, AUTH_USER_KEY};
use crate::types::{ClientError, RegisterRequest, Result, UserProfile};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stored profile value written by clients that lost the profile.
const UNDEFINED_PROFILE: &str = "undefined";

#[derive(Debug, Clone, Default)]
struct AuthState {
    token: Option<String>,
    user: Option<UserProfile>,
}

/// What durable storage held at startup.
enum StoredAuth {
    Empty,
    Valid { token: String, user: UserProfile },
    Invalid(String),
}

/// Owner of the token + profile pair.
pub struct AuthProvider {
    api: ApiClient,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<AuthState>,
}

impl AuthProvider {
    /// Build the provider, restoring any previously stored credentials.
    pub fn restore(api: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        let provider = Self {
            api,
            store,
            state: RwLock::new(AuthState::default()),
        };

        match read_stored(provider.store.as_ref()) {
            StoredAuth::Empty => {
                debug!("No stored credentials");
                provider.api.clear_auth_header();
            }
            StoredAuth::Valid { token, user } => match provider.api.set_bearer_token(&token) {
                Ok(()) => {
                    info!("Restored session for {}", user.email);
                    *provider.state.write() = AuthState {
                        token: Some(token),
                        user: Some(user),
                    };
                }
                Err(e) => {
                    warn!("Discarding stored credentials: {}", e);
                    provider.api.clear_auth_header();
                    provider.discard_stored();
                }
            },
            StoredAuth::Invalid(reason) => {
                warn!("Discarding stored credentials: {}", reason);
                provider.api.clear_auth_header();
                provider.discard_stored();
            }
        }

        provider
    }

    /// Log in and persist the resulting token and profile.
    ///
    /// Failures from the backend propagate unchanged and leave the current
    /// state untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let response = self.api.auth().login(email, password).await?;

        let token = response.access_token;
        if token.trim().is_empty() {
            return Err(ClientError::MalformedResponse(
                "login response carried an empty access token".to_string(),
            ));
        }
        let user = response.user.ok_or_else(|| {
            ClientError::MalformedResponse(
                "login response did not include the user profile".to_string(),
            )
        })?;

        self.persist(&token, &user)?;
        if let Err(e) = self.api.set_bearer_token(&token) {
            self.discard_stored();
            return Err(e);
        }

        *self.state.write() = AuthState {
            token: Some(token),
            user: Some(user.clone()),
        };

        info!("Logged in as {}", user.email);
        Ok(user)
    }

    /// Create an account, then log in with the same credentials.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserProfile> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        self.api.auth().register(&request).await?;
        info!("Registered {}, logging in", email);

        self.login(email, password).await
    }

    /// Forget the token and profile everywhere. Storage errors are reported
    /// after memory and the auth header have already been cleared.
    pub fn logout(&self) -> Result<()> {
        *self.state.write() = AuthState::default();
        self.api.clear_auth_header();

        let token = self.store.remove(AUTH_TOKEN_KEY);
        let user = self.store.remove(AUTH_USER_KEY);
        info!("Logged out");
        token.and(user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.read().user.clone()
    }

    /// The API client whose auth header this provider manages.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn persist(&self, token: &str, user: &UserProfile) -> Result<()> {
        let profile =
            serde_json::to_string(user).map_err(|e| ClientError::Storage(e.to_string()))?;

        let written = self
            .store
            .set(AUTH_TOKEN_KEY, token)
            .and_then(|()| self.store.set(AUTH_USER_KEY, &profile));
        if written.is_err() {
            self.discard_stored();
        }
        written
    }

    fn discard_stored(&self) {
        for key in [AUTH_TOKEN_KEY, AUTH_USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to remove {} from storage: {}", key, e);
            }
        }
    }
}

fn read_stored(store: &dyn KeyValueStore) -> StoredAuth {
    let token = store.get(AUTH_TOKEN_KEY);
    let user = store.get(AUTH_USER_KEY);

    let (token, user) = match (token, user) {
        (Ok(token), Ok(user)) => (token, user),
        (Err(e), _) | (_, Err(e)) => return StoredAuth::Invalid(e.to_string()),
    };

    match (token, user) {
        (None, None) => StoredAuth::Empty,
        (Some(token), Some(user)) => {
            if token.trim().is_empty() {
                return StoredAuth::Invalid("stored token is empty".to_string());
            }
            if user.trim() == UNDEFINED_PROFILE {
                return StoredAuth::Invalid("stored profile is undefined".to_string());
            }
            match serde_json::from_str::<UserProfile>(&user) {
                Ok(user) => StoredAuth::Valid { token, user },
                Err(e) => StoredAuth::Invalid(format!("stored profile is malformed: {}", e)),
            }
        }
        (Some(_), None) => StoredAuth::Invalid("token stored without a profile".to_string()),
        (None, Some(_)) => StoredAuth::Invalid("profile stored without a token".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use rstest::rstest;

    fn profile_json() -> String {
        r#"{"id":"u1","email":"a@b.com","first_name":"Ada","last_name":"Byron"}"#.to_string()
    }

    fn api() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9").unwrap()
    }

    #[test]
    fn test_restore_valid_pair() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, "T").unwrap();
        store.set(AUTH_USER_KEY, &profile_json()).unwrap();

        let auth = AuthProvider::restore(api(), store.clone());

        assert!(auth.is_authenticated());
        assert_eq!(auth.user().unwrap().first_name, "Ada");
        assert_eq!(auth.api().auth_header().as_deref(), Some("Bearer T"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_restore_empty_store() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthProvider::restore(api(), store);
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert!(!auth.api().has_auth_header());
    }

    #[rstest]
    #[case::malformed_profile(Some("T"), Some("{not json"))]
    #[case::undefined_profile(Some("T"), Some("undefined"))]
    #[case::missing_profile(Some("T"), None)]
    #[case::missing_token(None, Some(r#"{"id":"u1","email":"a@b.com","first_name":"A","last_name":"B"}"#))]
    #[case::empty_token(Some(""), Some(r#"{"id":"u1","email":"a@b.com","first_name":"A","last_name":"B"}"#))]
    fn test_restore_discards_invalid_pairs(
        #[case] token: Option<&str>,
        #[case] user: Option<&str>,
    ) {
        let store = Arc::new(MemoryStore::new());
        if let Some(token) = token {
            store.set(AUTH_TOKEN_KEY, token).unwrap();
        }
        if let Some(user) = user {
            store.set(AUTH_USER_KEY, user).unwrap();
        }

        let auth = AuthProvider::restore(api(), store.clone());

        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert!(!auth.api().has_auth_header());
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_clears_stale_header() {
        let client = api();
        client.set_bearer_token("stale").unwrap();

        let auth = AuthProvider::restore(client, Arc::new(MemoryStore::new()));
        assert!(!auth.api().has_auth_header());
    }

    #[test]
    fn test_restore_discards_unreadable_storage() {
        use crate::storage::FileStore;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{\"auth_token\": \"T\", truncated").unwrap();
        let store = Arc::new(FileStore::new(&path));

        let auth = AuthProvider::restore(api(), store.clone());

        assert!(!auth.is_authenticated());
        assert!(!auth.api().has_auth_header());
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(AUTH_USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_logout_clears_everything() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, "T").unwrap();
        store.set(AUTH_USER_KEY, &profile_json()).unwrap();
        let auth = AuthProvider::restore(api(), store.clone());

        auth.logout().unwrap();

        assert!(!auth.is_authenticated());
        assert!(auth.token().is_none());
        assert!(!auth.api().has_auth_header());
        assert!(store.is_empty());
    }
}

//! # Study Assistant client
//!
//! Client core for the Study Assistant learning backend: chat sessions,
//! study materials, homework generation and submission, and mind maps.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a terminal client** - Run the `study-assistant` binary
//! 2. **As a library** - Drive the providers and screens from another front end
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use study_assistant::{ApiClient, AuthProvider, FileStore, SelectionPolicy, SessionProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> study_assistant::Result<()> {
//!     let api = ApiClient::new("http://localhost:8000")?;
//!     let store = Arc::new(FileStore::new(".study-assistant/storage.json"));
//!     let auth = AuthProvider::restore(api, store);
//!     if !auth.is_authenticated() {
//!         auth.login("a@b.com", "pw").await?;
//!     }
//!
//!     let sessions = SessionProvider::connect(&auth, SelectionPolicy::Keep).await?;
//!     if sessions.current_session_id().is_none() {
//!         sessions.create_new_session("Biology").await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST client, one method per backend endpoint
//! - [`auth`] - Token and profile ownership, login/register/logout
//! - [`session`] - Session list and selection
//! - [`storage`] - Durable key-value storage for credentials
//! - [`views`] - Headless screens used by the shell
//! - [`cli`] - Argument parsing, colored output and the interactive shell
//! - [`types`] - Wire models and error handling

/// REST client for the learning backend.
pub mod api;
/// Client-side authentication state.
pub mod auth;
/// Command-line interface and interactive shell.
pub mod cli;
/// Session list and selection.
pub mod session;
/// Durable key-value storage.
pub mod storage;
/// Wire models and errors.
pub mod types;
/// Configuration.
pub mod utils;
/// Headless screens.
pub mod views;

// Re-export commonly used types
pub use api::{ApiClient, FileUpload};
pub use auth::AuthProvider;
pub use session::{SelectionPolicy, SessionProvider};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{ClientError, Result};
pub use utils::config::ClientConfig;
pub use views::Notifier;

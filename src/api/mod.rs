//! REST client for the learning backend
//!
//! A single [`ApiClient`] performs every outbound call. Calls are grouped per
//! resource, each group mapping one backend endpoint to one typed method.
//!
//! # Endpoints
//!
//! ## Authentication ([`AuthApi`])
//! - `POST /auth/login` - multipart form, returns the access token and profile
//! - `POST /auth/register` - JSON body, returns nothing usable as a session
//!
//! ## Chat ([`ChatApi`])
//! - `POST /api/sessions` / `GET /api/sessions`
//! - `POST /api/sessions/{id}/messages` / `GET /api/sessions/{id}/messages`
//!
//! ## Materials ([`MaterialsApi`])
//! - `POST /api/sessions/{id}/materials` - multipart `file`
//! - `GET /api/sessions/{id}/materials`
//!
//! ## Homework ([`HomeworkApi`])
//! - `POST /api/sessions/{id}/homework` / `GET /api/sessions/{id}/homework`
//! - `GET /api/homework/{id}`
//! - `POST /api/homework/{id}/tasks/{task_id}/upload` - multipart `file`
//! - `POST /api/homework/{id}/submit`
//!
//! ## Mind maps ([`MindMapsApi`])
//! - `POST /api/sessions/{id}/mind-maps` / `GET /api/sessions/{id}/mind-maps`
//!
//! # Authentication
//!
//! Once a token is set with [`ApiClient::set_bearer_token`], every call made
//! through any clone of the client carries:
//! ```text
//! Authorization: Bearer <token>
//! ```

pub mod auth;
pub mod chat;
pub mod client;
pub mod homework;
pub mod materials;
pub mod mind_maps;
pub mod upload;

pub use auth::AuthApi;
pub use chat::ChatApi;
pub use client::ApiClient;
pub use homework::HomeworkApi;
pub use materials::MaterialsApi;
pub use mind_maps::MindMapsApi;
pub use upload::FileUpload;

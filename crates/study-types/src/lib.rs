//! # study-types
//!
//! Wire models exchanged between Study Assistant clients and the learning
//! backend. The crate has no runtime or network dependencies so that any
//! frontend can decode the same payloads.
//!
//! The backend is lenient in a few places and these types follow it:
//!
//! - identifiers are opaque strings
//! - timestamps may be RFC 3339 or naive (interpreted as UTC), see [`time`]
//! - task scores may arrive as numbers or decimal strings
//! - missing child collections decode as empty

pub mod auth;
pub mod chat;
pub mod content;
pub mod error;
pub mod time;

pub use auth::{LoginResponse, RegisterRequest, UserProfile};
pub use chat::{CreateSessionRequest, Message, MessageRole, SendMessageRequest, Session};
pub use content::{
    CreateHomeworkRequest, FileType, Grade, Homework, HomeworkReview, HomeworkStatus,
    HomeworkTask, HomeworkTaskReview, Material, MindMap,
};
pub use error::ErrorBody;

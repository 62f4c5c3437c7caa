//! Headless screens
//!
//! Each screen holds the data one view renders and performs the calls that
//! view makes. Screens never reach for ambient state: the caller passes the
//! selected session id and a [`Notifier`] into every operation.
//!
//! Rules shared by all screens:
//!
//! - Without a selected session a screen reports [`ScreenState::NoSession`]
//!   and issues no request.
//! - Read failures are logged and leave the previous data in place
//!   ([`ScreenState::Stale`]).
//! - Mutating failures go to [`Notifier::alert`] and leave the data in place.
//! - Every successful mutation is followed by re-fetching the screen's list.

pub mod chat;
pub mod generation;
pub mod homework;
pub mod materials;
pub mod mind_maps;

pub use chat::ChatScreen;
pub use generation::{Difficulty, GenerationForm};
pub use homework::{HomeworkDetailScreen, HomeworkListScreen};
pub use materials::MaterialsScreen;
pub use mind_maps::MindMapsScreen;

use crate::types::ClientError;

/// Blocking, user-facing message channel.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Result of loading a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// No session is selected; the screen shows its prompt.
    NoSession,
    /// Data was fetched.
    Ready,
    /// The fetch failed; previous data is still shown.
    Stale,
}

/// "Failed to <action>: <detail>" with the server's detail when it sent one.
pub(crate) fn failure_message(action: &str, err: &ClientError) -> String {
    match (err.detail(), err) {
        (Some(detail), _) => format!("Failed to {}: {}", action, detail),
        (None, ClientError::Http { .. }) => format!("Failed to {}.", action),
        (None, other) => format!("Failed to {}: {}", action, other),
    }
}

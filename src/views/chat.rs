use super::{failure_message, Notifier, ScreenState};
use crate::api::ApiClient;
use crate::types::Message;
use tracing::error;
use uuid::Uuid;

/// Message history of the selected session.
pub struct ChatScreen {
    api: ApiClient,
    session_id: Option<String>,
    messages: Vec<Message>,
}

impl ChatScreen {
    pub const EMPTY_PROMPT: &'static str = "Select or create a session to start chatting.";

    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            session_id: None,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Session the current history belongs to.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Fetch the history of `session_id`. Switching sessions drops the old
    /// history even when the fetch fails.
    pub async fn load(&mut self, session_id: Option<&str>) -> ScreenState {
        let Some(session_id) = session_id else {
            self.session_id = None;
            self.messages.clear();
            return ScreenState::NoSession;
        };
        if self.session_id.as_deref() != Some(session_id) {
            self.session_id = Some(session_id.to_string());
            self.messages.clear();
        }

        match self.api.chat().list_messages(session_id).await {
            Ok(messages) => {
                self.messages = messages;
                ScreenState::Ready
            }
            Err(e) => {
                error!("Failed to load messages: {}", e);
                ScreenState::Stale
            }
        }
    }

    /// Send `input` and append the assistant's reply.
    ///
    /// The user's message is shown immediately under a local id. If the call
    /// fails, exactly that message is removed again and the user is alerted.
    /// Blank input, or no selected session, is ignored.
    pub async fn send(
        &mut self,
        session_id: Option<&str>,
        input: &str,
        notifier: &dyn Notifier,
    ) -> Option<Message> {
        let content = input.trim();
        let session_id = session_id?;
        if content.is_empty() {
            return None;
        }

        if self.session_id.as_deref() != Some(session_id) {
            self.load(Some(session_id)).await;
        }

        let local_id = format!("local-{}", Uuid::new_v4());
        self.messages
            .push(Message::local_user(local_id.clone(), content));

        match self.api.chat().send_message(session_id, content).await {
            Ok(reply) => {
                self.messages.push(reply.clone());
                Some(reply)
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                self.messages.retain(|m| m.id != local_id);
                notifier.alert(&failure_message("send message", &e));
                None
            }
        }
    }
}

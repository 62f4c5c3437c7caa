use super::ApiClient;
use crate::types::{CreateSessionRequest, Message, Result, SendMessageRequest, Session};

/// Sessions and their messages.
pub struct ChatApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi { client: self }
    }
}

impl ChatApi<'_> {
    pub async fn create_session(&self, title: &str) -> Result<Session> {
        let body = CreateSessionRequest {
            title: title.to_string(),
        };
        self.client.post_json("/api/sessions", &body).await
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.client.get("/api/sessions").await
    }

    /// Send a user message; the server answers with the assistant reply.
    pub async fn send_message(&self, session_id: &str, content: &str) -> Result<Message> {
        let path = format!("/api/sessions/{}/messages", urlencoding::encode(session_id));
        let body = SendMessageRequest {
            content: content.to_string(),
        };
        self.client.post_json(&path, &body).await
    }

    pub async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>> {
        let path = format!("/api/sessions/{}/messages", urlencoding::encode(session_id));
        self.client.get(&path).await
    }
}

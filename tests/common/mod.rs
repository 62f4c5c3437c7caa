//! Shared fixtures for integration tests.
//!
//! JSON builders mirror what the backend sends, including its quirks:
//! naive timestamps and scores serialized as strings.

#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use study_assistant::storage::{AUTH_TOKEN_KEY, AUTH_USER_KEY};
use study_assistant::{ApiClient, AuthProvider, KeyValueStore, MemoryStore, Notifier};
use wiremock::MockServer;

pub const TOKEN: &str = "T";

pub fn profile_json() -> Value {
    json!({
        "id": "u1",
        "email": "a@b.com",
        "first_name": "Ada",
        "last_name": "Byron"
    })
}

pub fn login_json(token: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "user": profile_json()
    })
}

pub fn session_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "created_at": "2024-03-01T10:00:00",
        "updated_at": "2024-03-01T10:00:00",
        "user_id": "u1"
    })
}

pub fn message_json(id: &str, role: &str, content: &str) -> Value {
    json!({
        "id": id,
        "role": role,
        "content": content,
        "timestamp": "2024-03-01T10:05:00.123456"
    })
}

pub fn material_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "file_url": format!("/uploads/{}", name),
        "file_type": "pdf",
        "size": 2048,
        "session_id": "s1",
        "uploaded_at": "2024-03-01T11:00:00Z"
    })
}

pub fn task_json(id: &str, number: u32, uploaded: Option<&str>) -> Value {
    json!({
        "id": id,
        "task_number": number,
        "description": format!("Solve problem {}", number),
        "uploaded_file_url": uploaded,
        "homework_id": "h1",
        "reviews": []
    })
}

pub fn homework_json(id: &str, status: &str, tasks: Vec<Value>) -> Value {
    let submitted_at = if status == "pending" {
        Value::Null
    } else {
        json!("2024-03-03T09:00:00")
    };
    json!({
        "id": id,
        "title": "Fractions practice",
        "status": status,
        "session_id": "s1",
        "generated_at": "2024-03-02T09:00:00",
        "submitted_at": submitted_at,
        "tasks": tasks,
        "reviews": []
    })
}

pub fn mind_map_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "node_count": 7,
        "data": {"root": title, "children": []},
        "session_id": "s1",
        "created_at": "2024-03-04T08:00:00"
    })
}

pub fn error_json(detail: &str) -> Value {
    json!({ "detail": detail })
}

/// An auth provider restored from storage that already holds a session
/// token for `server`.
pub fn signed_in(server: &MockServer) -> AuthProvider {
    let store = Arc::new(MemoryStore::new());
    store.set(AUTH_TOKEN_KEY, TOKEN).unwrap();
    store
        .set(AUTH_USER_KEY, &profile_json().to_string())
        .unwrap();
    AuthProvider::restore(api(server), store)
}

pub fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri()).unwrap()
}

/// Notifier that records every alert.
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}

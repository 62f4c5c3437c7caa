//! Authentication payloads.

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user, persisted next to the access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserProfile {
    /// "First Last", falling back to the email when both names are blank.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Backends built on a bare OAuth2 password form omit the profile.
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_with_user() {
        let body = json!({
            "access_token": "T",
            "token_type": "bearer",
            "user": {"id": "u1", "email": "a@b.com", "first_name": "Ada", "last_name": "Byron"}
        });
        let resp: LoginResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.access_token, "T");
        assert_eq!(resp.user.unwrap().display_name(), "Ada Byron");
    }

    #[test]
    fn test_login_response_without_user() {
        let resp: LoginResponse =
            serde_json::from_value(json!({"access_token": "T", "token_type": "bearer"})).unwrap();
        assert!(resp.user.is_none());
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = UserProfile {
            id: "u1".into(),
            email: "a@b.com".into(),
            first_name: " ".into(),
            last_name: String::new(),
        };
        assert_eq!(user.display_name(), "a@b.com");
    }
}

use super::ApiClient;
use crate::types::{LoginResponse, RegisterRequest, Result};
use reqwest::multipart::Form;

/// `/auth/*` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    /// Submit credentials as a multipart form.
    ///
    /// The email is sent both as `email` and as `username`, the field name
    /// OAuth2 password-form backends read.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let form = Form::new()
            .text("username", email.to_string())
            .text("email", email.to_string())
            .text("password", password.to_string());
        self.client.post_multipart("/auth/login", form).await
    }

    /// Create an account. The response carries no token.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.client.post_json_unit("/auth/register", request).await
    }
}

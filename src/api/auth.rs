//! `/api/auth` endpoints.

use reqwest::Method;

use super::ApiClient;
use crate::error::Result;
use crate::models::auth::{AuthResponse, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest};

const BASE: &str = "/api/auth";

/// Authentication endpoints.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying client, used by the session store to install the token.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        self.client
            .send_json(Method::POST, &format!("{BASE}/login"), credentials)
            .await
    }

    /// Ask the backend to email a reset code.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let body = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        self.client
            .send_json_unit(Method::POST, &format!("{BASE}/forgot-password"), &body)
            .await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let body = ResetPasswordRequest {
            token: token.trim().to_string(),
            new_password: new_password.to_string(),
        };
        self.client
            .send_json_unit(Method::POST, &format!("{BASE}/reset-password"), &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"email": "admin@talleres.pe", "password": "secreto1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt", "email": "admin@talleres.pe", "role": "ROLE_ADMIN"
            })))
            .mount(&server)
            .await;

        let api = AuthApi::new(client_for(&server.uri()));
        let resp = api
            .login(&LoginRequest {
                email: "admin@talleres.pe".to_string(),
                password: "secreto1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(resp.token, "jwt");
        assert_eq!(resp.role, "ROLE_ADMIN");
    }

    #[tokio::test]
    async fn test_login_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = AuthApi::new(client_for(&server.uri()));
        let err = api.login(&LoginRequest::default()).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_reset_password_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/reset-password"))
            .and(body_json(json!({"token": "123456", "newPassword": "nueva123"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let api = AuthApi::new(client_for(&server.uri()));
        api.reset_password(" 123456 ", "nueva123").await.unwrap();
    }
}

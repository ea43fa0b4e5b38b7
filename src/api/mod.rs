//! REST backend client and per-resource wrappers.
//!
//! `ApiClient` owns the HTTP connection pool, the backend origin and the
//! bearer token. Every request built through it carries the token when one
//! is set, so the wrappers stay thin pass-throughs.

pub mod admin;
pub mod auth;
pub mod estudiante;
pub mod inscripcion;
pub mod public;
pub mod upload;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use estudiante::EstudianteApi;
pub use inscripcion::InscripcionApi;
pub use public::PublicApi;
pub use upload::UploadApi;

/// Shared HTTP client for the talleres backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a client for the configured backend.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.origin().to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Backend origin without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token attached to outgoing requests.
    pub fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    /// Current bearer token.
    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base_url)
    }

    /// Start a request, attaching the bearer token if present.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn non-success statuses into `AppError::Status`.
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AppError::Network(e.to_string())
            } else {
                AppError::Http(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Backend returned {} with body: {}", status, body);
        Err(AppError::Status {
            status: status.as_u16(),
            message: extract_message(&body),
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(method, path).json(body)).await?;
        Ok(response.json().await?)
    }

    /// Send a JSON body and ignore whatever the backend answers.
    pub(crate) async fn send_json_unit<B>(&self, method: Method, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(method, path).json(body)).await?;
        Ok(())
    }

    /// Send form-encoded query parameters with an empty body.
    pub(crate) async fn send_query_unit(&self, method: Method, path: &str, query: &[(&str, String)]) -> Result<()> {
        self.execute(self.request(method, path).query(query)).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Structured bodies carry it in `message` (or `error` for the password
/// reset endpoints). Short plain-text bodies are taken verbatim.
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return ["message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string);
    }

    if body.len() <= 200 && !body.starts_with('<') {
        return Some(body.to_string());
    }
    None
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Client pointed at a mock server.
    pub fn client_for(uri: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: uri.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::client_for;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_message_variants() {
        assert_eq!(extract_message(r#"{"message":"Correo duplicado"}"#).as_deref(), Some("Correo duplicado"));
        assert_eq!(extract_message(r#"{"error":"Token inválido"}"#).as_deref(), Some("Token inválido"));
        assert_eq!(extract_message(r#"{"status":500}"#), None);
        assert_eq!(extract_message("Horario lleno").as_deref(), Some("Horario lleno"));
        assert_eq!(extract_message("<html>boom</html>"), None);
        assert_eq!(extract_message("  "), None);
    }

    #[test]
    fn test_token_roundtrip() {
        let client = client_for("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert!(client.token().is_none());
        client.set_token(Some("abc".to_string()));
        assert_eq!(client.clone().token().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_bearer_token_is_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blog"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        client.set_token(Some("tok-123".to_string()));
        let items: Vec<serde_json::Value> = client.get_json("/api/blog").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_carries_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/admin/talleres/4"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "Taller con inscritos"})))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let err = client.delete("/api/admin/talleres/4").await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.backend_message(), Some("Taller con inscritos"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_status_zero() {
        let client = client_for("http://127.0.0.1:1");
        let err = client.get_json::<serde_json::Value>("/api/blog").await.unwrap_err();
        assert!(err.is_network(), "unexpected error: {err:?}");
    }
}

//! Image uploads for teacher photos and workshop pictures.

use std::path::Path;

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use super::ApiClient;
use crate::error::{AppError, Result};
use crate::models::contenido::UploadResponse;

/// Multipart upload endpoints.
#[derive(Clone)]
pub struct UploadApi {
    client: ApiClient,
}

impl UploadApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn upload_foto_profesor(&self, file: &Path) -> Result<UploadResponse> {
        self.upload("/api/upload/profesor", file).await
    }

    pub async fn upload_imagen_taller(&self, file: &Path) -> Result<UploadResponse> {
        self.upload("/api/upload/taller", file).await
    }

    async fn upload(&self, path: &str, file: &Path) -> Result<UploadResponse> {
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::validation("Nombre de archivo inválido"))?
            .to_string();
        let bytes = tokio::fs::read(file).await?;
        tracing::info!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), path);

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(file))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .execute(self.client.request(Method::POST, path).multipart(form))
            .await?;
        Ok(response.json().await?)
    }
}

fn image_mime(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client_for;
    use serde_json::json;
    use wiremock::matchers::{header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime(Path::new("foto.PNG")), "image/png");
        assert_eq!(image_mime(Path::new("a/b/foto.jpeg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("sin_extension")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_upload_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload/profesor"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "filename": "juan.png", "url": "/images/juan.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("juan.png");
        std::fs::write(&file, [0x89, b'P', b'N', b'G']).unwrap();

        let api = UploadApi::new(client_for(&server.uri()));
        let resp = api.upload_foto_profesor(&file).await.unwrap();
        assert_eq!(resp.url, "/images/juan.png");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let api = UploadApi::new(client_for("http://127.0.0.1:1"));
        let err = api
            .upload_imagen_taller(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}

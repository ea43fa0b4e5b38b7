//! Public content DTOs: blog, contact form and uploads.

use serde::{Deserialize, Serialize};

/// Blog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Noticia {
    pub id: i64,
    pub titulo: String,
    #[serde(default)]
    pub contenido: String,
    #[serde(default)]
    pub imagen_url: String,
}

/// Contact form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactoForm {
    pub nombre: String,
    pub correo: String,
    pub asunto: String,
    pub mensaje: String,
}

/// Stored file reference returned by the upload endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
}

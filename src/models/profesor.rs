//! Teacher DTOs.

use serde::{Deserialize, Serialize};

/// Teacher as returned by the admin endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfesorDto {
    pub id: i64,
    pub nombre_completo: String,
    #[serde(default)]
    pub correo: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub foto_url: Option<String>,
    #[serde(default)]
    pub informacion: Option<String>,
}

/// Body for creating or updating a teacher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfesorInput {
    pub nombre_completo: String,
    pub correo: String,
    pub telefono: String,
    pub foto_url: String,
    pub informacion: String,
}

impl From<&ProfesorDto> for ProfesorInput {
    fn from(p: &ProfesorDto) -> Self {
        Self {
            nombre_completo: p.nombre_completo.clone(),
            correo: p.correo.clone().unwrap_or_default(),
            telefono: p.telefono.clone().unwrap_or_default(),
            foto_url: p.foto_url.clone().unwrap_or_default(),
            informacion: p.informacion.clone().unwrap_or_default(),
        }
    }
}

/// Teacher as shown on the public listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfesorPublico {
    pub id: i64,
    pub nombre_completo: String,
    #[serde(default)]
    pub telefono: String,
    /// Stored path or file name; see `api::public::profesor_image_url`.
    #[serde(default)]
    pub foto_url: String,
    #[serde(default)]
    pub informacion: String,
}

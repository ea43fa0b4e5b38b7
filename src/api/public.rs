//! Public read-only endpoints: workshops, teachers, blog and contact.

use reqwest::Method;

use super::ApiClient;
use crate::error::Result;
use crate::models::contenido::{ContactoForm, Noticia};
use crate::models::profesor::ProfesorPublico;
use crate::models::taller::{TallerDetallado, TallerSimple};

/// Public catalog and content.
#[derive(Clone)]
pub struct PublicApi {
    client: ApiClient,
}

impl PublicApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn talleres_activos(&self) -> Result<Vec<TallerSimple>> {
        self.client.get_json("/api/talleres/activos").await
    }

    pub async fn talleres_detallados(&self) -> Result<Vec<TallerDetallado>> {
        self.client.get_json("/api/talleres/detallados/activos").await
    }

    pub async fn profesores(&self) -> Result<Vec<ProfesorPublico>> {
        self.client.get_json("/api/profesores").await
    }

    pub async fn noticias(&self) -> Result<Vec<Noticia>> {
        self.client.get_json("/api/blog").await
    }

    pub async fn noticia(&self, id: i64) -> Result<Noticia> {
        self.client.get_json(&format!("/api/blog/{id}")).await
    }

    pub async fn enviar_contacto(&self, form: &ContactoForm) -> Result<()> {
        tracing::info!("Sending contact message from {}", form.correo);
        self.client.send_json_unit(Method::POST, "/contacto/enviar", form).await
    }

    /// Absolute URL for a workshop image stored as a root-relative path.
    pub fn taller_image_url(&self, relative: &str) -> String {
        format!("{}{}", self.client.base_url(), relative)
    }

    /// Absolute URL for a teacher photo.
    pub fn profesor_image_url(&self, path_or_file: &str) -> String {
        profesor_image_url(self.client.base_url(), path_or_file)
    }
}

/// Teacher photos are stored either as `images/<file>` or as a bare file
/// name; both live under `<origin>/images/`. Absolute URLs pass through.
pub fn profesor_image_url(origin: &str, path_or_file: &str) -> String {
    let path_or_file = path_or_file.trim();
    if path_or_file.is_empty() {
        return String::new();
    }
    if path_or_file.starts_with("http://") || path_or_file.starts_with("https://") {
        return path_or_file.to_string();
    }

    let clean = path_or_file.strip_prefix('/').unwrap_or(path_or_file);
    if clean.starts_with("images/") {
        format!("{origin}/{clean}")
    } else {
        format!("{origin}/images/{clean}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client_for;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_profesor_image_url_rules() {
        let origin = "http://localhost:8080";
        assert_eq!(profesor_image_url(origin, ""), "");
        assert_eq!(
            profesor_image_url(origin, "profesor1.jpg"),
            "http://localhost:8080/images/profesor1.jpg"
        );
        assert_eq!(
            profesor_image_url(origin, "/images/profesor1.jpg"),
            "http://localhost:8080/images/profesor1.jpg"
        );
        assert_eq!(
            profesor_image_url(origin, "images/x/y.png"),
            "http://localhost:8080/images/x/y.png"
        );
        assert_eq!(
            profesor_image_url(origin, "https://cdn.pe/p.jpg"),
            "https://cdn.pe/p.jpg"
        );
    }

    #[test]
    fn test_taller_image_url() {
        let api = PublicApi::new(client_for("http://localhost:8080"));
        assert_eq!(
            api.taller_image_url("/images/guitarra.jpg"),
            "http://localhost:8080/images/guitarra.jpg"
        );
    }

    #[tokio::test]
    async fn test_talleres_detallados() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/talleres/detallados/activos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1, "nombre": "Guitarra", "precio": 150.5,
                "tieneHorariosDefinidos": true,
                "horariosAbiertos": [{
                    "id": 11, "diasDeClase": "Lunes", "horaInicio": "18:00:00",
                    "horaFin": "19:30:00", "fechaInicio": "2025-12-01",
                    "vacantesDisponibles": 4, "profesor": {"nombreCompleto": "Juan"}
                }]
            }])))
            .mount(&server)
            .await;

        let api = PublicApi::new(client_for(&server.uri()));
        let talleres = api.talleres_detallados().await.unwrap();
        assert!(talleres[0].tiene_horarios_definidos);
        assert_eq!(
            talleres[0].horarios_abiertos[0].fecha_inicio,
            chrono::NaiveDate::from_ymd_opt(2025, 12, 1)
        );
    }
}

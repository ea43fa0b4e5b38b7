//! `/api/admin` endpoints: teachers, workshops, students, schedules and
//! enrollments.

use reqwest::Method;

use super::ApiClient;
use crate::error::Result;
use crate::models::cliente::{ClienteAdmin, ClienteCreado, ClienteInput, NuevoClienteAdmin};
use crate::models::profesor::{ProfesorDto, ProfesorInput};
use crate::models::taller::{HorarioInput, Taller, TallerDto, TallerInput};

const BASE: &str = "/api/admin";

/// Admin surface of the backend.
#[derive(Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // === Profesores ===

    pub async fn list_profesores(&self) -> Result<Vec<ProfesorDto>> {
        self.client.get_json(&format!("{BASE}/profesores")).await
    }

    pub async fn create_profesor(&self, data: &ProfesorInput) -> Result<()> {
        self.client
            .send_json_unit(Method::POST, &format!("{BASE}/profesores"), data)
            .await
    }

    pub async fn update_profesor(&self, id: i64, data: &ProfesorInput) -> Result<()> {
        self.client
            .send_json_unit(Method::PUT, &format!("{BASE}/profesores/{id}"), data)
            .await
    }

    pub async fn delete_profesor(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("{BASE}/profesores/{id}")).await
    }

    // === Talleres ===

    pub async fn list_talleres(&self) -> Result<Vec<TallerDto>> {
        self.client.get_json(&format!("{BASE}/talleres")).await
    }

    /// Workshops with schedules that still have capacity.
    pub async fn talleres_disponibles(&self) -> Result<Vec<Taller>> {
        self.client.get_json(&format!("{BASE}/talleres-disponibles")).await
    }

    pub async fn create_taller(&self, data: &TallerInput) -> Result<()> {
        self.client
            .send_json_unit(Method::POST, &format!("{BASE}/talleres"), data)
            .await
    }

    pub async fn update_taller(&self, id: i64, data: &TallerInput) -> Result<()> {
        self.client
            .send_json_unit(Method::PUT, &format!("{BASE}/talleres/{id}"), data)
            .await
    }

    pub async fn delete_taller(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("{BASE}/talleres/{id}")).await
    }

    // === Clientes (estudiantes) ===

    pub async fn list_clientes(&self) -> Result<Vec<ClienteAdmin>> {
        self.client.get_json(&format!("{BASE}/clientes-inscripciones")).await
    }

    /// Register a student; the backend answers with temporary credentials.
    pub async fn create_cliente(&self, data: &NuevoClienteAdmin) -> Result<ClienteCreado> {
        self.client
            .send_json(Method::POST, &format!("{BASE}/clientes"), data)
            .await
    }

    pub async fn update_cliente(&self, id: i64, data: &ClienteInput) -> Result<()> {
        self.client
            .send_json_unit(Method::PUT, &format!("{BASE}/clientes/{id}"), data)
            .await
    }

    pub async fn delete_cliente(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("{BASE}/clientes/{id}")).await
    }

    pub async fn add_inscripcion(&self, cliente_id: i64, horario_id: i64) -> Result<()> {
        let path = format!("{BASE}/clientes/{cliente_id}/inscripciones/{horario_id}");
        self.client.send_query_unit(Method::POST, &path, &[]).await
    }

    pub async fn remove_inscripcion(&self, cliente_id: i64, horario_id: i64) -> Result<()> {
        self.client
            .delete(&format!("{BASE}/clientes/{cliente_id}/inscripciones/{horario_id}"))
            .await
    }

    // === Horarios ===
    // The backend binds these as request parameters, not a JSON body.

    pub async fn create_horario(&self, data: &HorarioInput) -> Result<()> {
        self.client
            .send_query_unit(Method::POST, &format!("{BASE}/horarios"), &data.to_query())
            .await
    }

    pub async fn update_horario(&self, id: i64, data: &HorarioInput) -> Result<()> {
        self.client
            .send_query_unit(Method::PUT, &format!("{BASE}/horarios/{id}"), &data.to_query())
            .await
    }

    pub async fn delete_horario(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("{BASE}/horarios/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client_for;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_horario_uses_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/horarios"))
            .and(query_param("tallerId", "1"))
            .and(query_param("profesorId", "2"))
            .and(query_param("diasDeClase", "Lunes, Miércoles"))
            .and(query_param("horaInicio", "18:00"))
            .and(query_param("fechaInicio", "2025-11-15"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let api = AdminApi::new(client_for(&server.uri()));
        let input = HorarioInput {
            taller_id: 1,
            profesor_id: 2,
            dias_de_clase: vec!["Lunes".to_string(), "Miércoles".to_string()],
            hora_inicio: "18:00".to_string(),
            hora_fin: "19:30".to_string(),
            fecha_inicio: NaiveDate::from_ymd_opt(2025, 11, 15).unwrap(),
            vacantes_disponibles: 5,
        };
        api.create_horario(&input).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_profesor_sends_json() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/admin/profesores/3"))
            .and(body_json(json!({
                "nombreCompleto": "María López",
                "correo": "maria@talleres.pe",
                "telefono": "",
                "fotoUrl": "",
                "informacion": ""
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
            .expect(1)
            .mount(&server)
            .await;

        let api = AdminApi::new(client_for(&server.uri()));
        let input = ProfesorInput {
            nombre_completo: "María López".to_string(),
            correo: "maria@talleres.pe".to_string(),
            ..Default::default()
        };
        api.update_profesor(3, &input).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_cliente_returns_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/clientes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"email": "ana@mail.pe", "temporalPassword": "Tmp-8841"})),
            )
            .mount(&server)
            .await;

        let api = AdminApi::new(client_for(&server.uri()));
        let creado = api.create_cliente(&NuevoClienteAdmin::default()).await.unwrap();
        assert_eq!(creado.temporal_password, "Tmp-8841");
    }

    #[tokio::test]
    async fn test_list_talleres() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/talleres"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "nombre": "Guitarra", "precio": 150, "activo": true},
                {"id": 2, "nombre": "Canto", "precio": 120, "activo": false}
            ])))
            .mount(&server)
            .await;

        let api = AdminApi::new(client_for(&server.uri()));
        let talleres = api.list_talleres().await.unwrap();
        assert_eq!(talleres.len(), 2);
        assert!(!talleres[1].activo);
        assert_eq!(talleres[0].precio, 150.0);
    }
}

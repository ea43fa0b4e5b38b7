//! `/api/inscripcion` endpoints used by the sign-up wizard and the student
//! area.

use reqwest::Method;

use super::ApiClient;
use crate::error::Result;
use crate::models::cliente::{Cliente, InscripcionAdmin};
use crate::models::inscripcion::{
    DatosPersonales, InscripcionPayload, InscripcionResponse, NuevaInscripcion, SolicitudBaja,
};
use crate::models::taller::Taller;

const BASE: &str = "/api/inscripcion";

/// Enrollment endpoints.
#[derive(Clone)]
pub struct InscripcionApi {
    client: ApiClient,
}

impl InscripcionApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Step 1: create the prospective customer.
    pub async fn guardar_datos_personales(&self, datos: &DatosPersonales) -> Result<Cliente> {
        tracing::info!("Registering cliente {}", datos.email);
        self.client
            .send_json(Method::POST, &format!("{BASE}/cliente"), datos)
            .await
    }

    /// Step 2: catalog of workshops with schedules.
    pub async fn obtener_talleres(&self) -> Result<Vec<Taller>> {
        self.client.get_json(&format!("{BASE}/talleresDisponibles")).await
    }

    /// Step 3: pay and enroll.
    pub async fn confirmar(&self, payload: &InscripcionPayload) -> Result<InscripcionResponse> {
        tracing::info!(
            "Confirming {} inscripciones for cliente {}",
            payload.inscripciones.len(),
            payload.cliente_id
        );
        self.client
            .send_json(Method::POST, &format!("{BASE}/confirmar"), payload)
            .await
    }

    pub async fn solicitar_baja(&self, solicitud: &SolicitudBaja) -> Result<()> {
        self.client
            .send_json_unit(Method::POST, &format!("{BASE}/solicitar-baja"), solicitud)
            .await
    }

    pub async fn inscripciones_por_cliente(&self, cliente_id: i64) -> Result<Vec<InscripcionAdmin>> {
        self.client
            .get_json(&format!("{BASE}/cliente/{cliente_id}/inscripciones"))
            .await
    }

    /// Enroll a logged-in student into one more schedule.
    pub async fn inscribir(&self, inscripcion: &NuevaInscripcion) -> Result<()> {
        self.client
            .send_json_unit(Method::POST, &format!("{BASE}/inscribir"), inscripcion)
            .await
    }
}

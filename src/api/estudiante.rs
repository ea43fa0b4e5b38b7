//! Endpoints of the logged-in student area.

use super::ApiClient;
use crate::error::Result;
use crate::models::inscripcion::HorarioEstudiante;

/// Student area endpoints.
#[derive(Clone)]
pub struct EstudianteApi {
    client: ApiClient,
}

impl EstudianteApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Schedules of the student owning the current token.
    pub async fn mis_horarios(&self) -> Result<Vec<HorarioEstudiante>> {
        self.client.get_json("/api/cliente/horarios").await
    }
}

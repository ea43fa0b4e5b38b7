//! Enrollment DTOs: wizard forms, confirmation payload and student schedule.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cliente::TallerRef;
use super::taller::ProfesorRef;

/// Step 1 form of the wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatosPersonales {
    pub nombre: String,
    pub email: String,
    pub telefono: String,
}

/// Card data captured at step 3. Kept in memory only.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatosPago {
    pub numero_tarjeta: String,
    /// `MM/YY`.
    pub fecha_vencimiento: String,
    pub cvv: String,
}

impl DatosPago {
    /// Last four digits, for display.
    pub fn ultimos_digitos(&self) -> String {
        let digits: Vec<char> = self.numero_tarjeta.chars().filter(|c| c.is_ascii_digit()).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

impl fmt::Debug for DatosPago {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatosPago")
            .field("numero_tarjeta", &format_args!("****{}", self.ultimos_digitos()))
            .field("fecha_vencimiento", &self.fecha_vencimiento)
            .field("cvv", &"***")
            .finish()
    }
}

/// One (workshop, schedule) pair of the confirmation payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InscripcionDetalle {
    pub taller_id: i64,
    pub horario_id: i64,
}

/// Final payload of the wizard.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InscripcionPayload {
    pub cliente_id: i64,
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    pub numero_tarjeta: String,
    pub fecha_vencimiento: String,
    pub cvv: String,
    pub inscripciones: Vec<InscripcionDetalle>,
}

impl fmt::Debug for InscripcionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InscripcionPayload")
            .field("cliente_id", &self.cliente_id)
            .field("email", &self.email)
            .field("numero_tarjeta", &"****")
            .field("inscripciones", &self.inscripciones)
            .finish_non_exhaustive()
    }
}

/// Backend answer to a confirmed enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InscripcionResponse {
    pub correo: String,
    pub contrasena_temporal: String,
    #[serde(default)]
    pub confirmacion_id: String,
}

/// Credentials handed from payment to the confirmation panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credenciales {
    pub correo: String,
    pub contrasena_temporal: String,
}

impl From<&InscripcionResponse> for Credenciales {
    fn from(resp: &InscripcionResponse) -> Self {
        Self {
            correo: resp.correo.clone(),
            contrasena_temporal: resp.contrasena_temporal.clone(),
        }
    }
}

/// Schedule of a logged-in student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorarioEstudiante {
    pub id: i64,
    #[serde(default)]
    pub dias_de_clase: String,
    #[serde(default)]
    pub hora_inicio: String,
    #[serde(default)]
    pub hora_fin: String,
    #[serde(default)]
    pub taller: TallerRef,
    #[serde(default)]
    pub profesor: ProfesorRef,
}

/// Drop request sent by a student.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolicitudBaja {
    pub cliente_id: i64,
    pub horario_id: i64,
    pub motivo: String,
}

/// Enrollment of a logged-in student into one schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevaInscripcion {
    pub cliente_id: i64,
    pub horario_id: i64,
}

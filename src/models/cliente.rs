//! Student (cliente) DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Customer created by step 1 of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: i64,
    pub nombre_completo: String,
    pub correo: String,
    #[serde(default)]
    pub telefono: String,
}

/// Workshop name reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TallerRef {
    #[serde(default)]
    pub nombre: String,
}

/// Schedule referenced by an enrollment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorarioInscrito {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub taller: Option<TallerRef>,
    #[serde(default)]
    pub dias_de_clase: String,
    #[serde(default)]
    pub hora_inicio: String,
    #[serde(default)]
    pub hora_fin: String,
}

/// Enrollment as listed under a student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InscripcionAdmin {
    #[serde(default)]
    pub horario: Option<HorarioInscrito>,
}

impl InscripcionAdmin {
    pub fn horario_id(&self) -> Option<i64> {
        self.horario.as_ref().and_then(|h| h.id)
    }

    pub fn taller_nombre(&self) -> &str {
        self.horario
            .as_ref()
            .and_then(|h| h.taller.as_ref())
            .map(|t| t.nombre.as_str())
            .unwrap_or("Taller")
    }
}

/// Login account attached to a student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub email: String,
}

/// Student with enrollments, for the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteAdmin {
    pub id: i64,
    pub nombre_completo: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub inscripciones: Vec<InscripcionAdmin>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl ClienteAdmin {
    /// Email of the login account when present, contact email otherwise.
    pub fn login_email(&self) -> &str {
        self.user.as_ref().map(|u| u.email.as_str()).unwrap_or(&self.correo)
    }

    /// Schedule ids the student is already enrolled in.
    pub fn horarios_inscritos(&self) -> Vec<i64> {
        self.inscripciones.iter().filter_map(InscripcionAdmin::horario_id).collect()
    }
}

/// Body for updating a student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteInput {
    pub nombre_completo: String,
    pub correo: String,
    pub telefono: String,
}

/// Body for registering a student from the admin panel with initial
/// workshop selections (taller id -> horario id).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoClienteAdmin {
    pub nombre_completo: String,
    pub correo: String,
    pub telefono: String,
    pub talleres_seleccionados: BTreeMap<i64, i64>,
}

/// Credentials issued when an admin registers a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClienteCreado {
    pub email: String,
    pub temporal_password: String,
}

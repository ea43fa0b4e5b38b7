//! Workshop and schedule DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Teacher as embedded in a schedule (name only is guaranteed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfesorRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub nombre_completo: String,
}

/// Schedule slot of a workshop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horario {
    pub id: i64,
    #[serde(default)]
    pub dias_de_clase: String,
    /// `HH:MM:SS` as served by the backend.
    #[serde(default)]
    pub hora_inicio: String,
    #[serde(default)]
    pub hora_fin: String,
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub vacantes_disponibles: i32,
    #[serde(default)]
    pub profesor: Option<ProfesorRef>,
}

impl Horario {
    pub fn profesor_nombre(&self) -> &str {
        self.profesor
            .as_ref()
            .map(|p| p.nombre_completo.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("-")
    }
}

/// Workshop offered in the enrollment wizard catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taller {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub horarios: Vec<Horario>,
}

impl Taller {
    pub fn horario(&self, horario_id: i64) -> Option<&Horario> {
        self.horarios.iter().find(|h| h.id == horario_id)
    }
}

/// Workshop as managed from the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallerDto {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub duracion_semanas: i32,
    #[serde(default)]
    pub clases_por_semana: i32,
    #[serde(default)]
    pub imagen_taller: String,
    #[serde(default)]
    pub imagen_inicio: String,
    #[serde(default)]
    pub temas: String,
    #[serde(default = "default_activo")]
    pub activo: bool,
    #[serde(default)]
    pub horarios: Vec<Horario>,
}

fn default_activo() -> bool {
    true
}

/// Body for creating or updating a workshop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallerInput {
    pub nombre: String,
    pub descripcion: String,
    pub duracion_semanas: i32,
    pub clases_por_semana: i32,
    pub precio: f64,
    pub imagen_taller: String,
    pub imagen_inicio: String,
    pub temas: String,
    pub activo: bool,
}

impl From<&TallerDto> for TallerInput {
    fn from(t: &TallerDto) -> Self {
        Self {
            nombre: t.nombre.clone(),
            descripcion: t.descripcion.clone(),
            duracion_semanas: t.duracion_semanas,
            clases_por_semana: t.clases_por_semana,
            precio: t.precio,
            imagen_taller: t.imagen_taller.clone(),
            imagen_inicio: t.imagen_inicio.clone(),
            temas: t.temas.clone(),
            activo: t.activo,
        }
    }
}

/// Schedule create/update data. The admin endpoints take these as query
/// parameters, not as a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct HorarioInput {
    pub taller_id: i64,
    pub profesor_id: i64,
    pub dias_de_clase: Vec<String>,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub fecha_inicio: NaiveDate,
    pub vacantes_disponibles: i32,
}

impl HorarioInput {
    /// Query parameters in the order the backend documents them.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("tallerId", self.taller_id.to_string()),
            ("profesorId", self.profesor_id.to_string()),
            ("diasDeClase", self.dias_de_clase.join(", ")),
            ("horaInicio", self.hora_inicio.clone()),
            ("horaFin", self.hora_fin.clone()),
            ("fechaInicio", self.fecha_inicio.format("%Y-%m-%d").to_string()),
            ("vacantesDisponibles", self.vacantes_disponibles.to_string()),
        ]
    }
}

/// Active workshop with its open schedules, for the public listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallerDetallado {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub imagen_taller: String,
    #[serde(default)]
    pub duracion_semanas: i32,
    #[serde(default)]
    pub clases_por_semana: i32,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub temas: String,
    #[serde(default)]
    pub horarios_abiertos: Vec<Horario>,
    #[serde(default)]
    pub tiene_horarios_definidos: bool,
}

/// Active workshop summary for the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallerSimple {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub duracion_semanas: i32,
    #[serde(default)]
    pub clases_por_semana: i32,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub imagen_inicio: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry_parses_backend_json() {
        let json = r#"{
            "id": 1, "nombre": "Guitarra", "precio": 150.0,
            "horarios": [{
                "id": 11, "diasDeClase": "Lunes, Miércoles",
                "horaInicio": "18:00:00", "horaFin": "19:30:00",
                "vacantesDisponibles": 5,
                "profesor": {"id": 2, "nombreCompleto": "Juan García"}
            }]
        }"#;
        let taller: Taller = serde_json::from_str(json).unwrap();
        assert_eq!(taller.horarios.len(), 1);
        assert_eq!(taller.horario(11).unwrap().profesor_nombre(), "Juan García");
        assert!(taller.horario(12).is_none());
    }

    #[test]
    fn test_horario_query_params() {
        let input = HorarioInput {
            taller_id: 3,
            profesor_id: 7,
            dias_de_clase: vec!["Lunes".to_string(), "Jueves".to_string()],
            hora_inicio: "18:00".to_string(),
            hora_fin: "19:30".to_string(),
            fecha_inicio: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            vacantes_disponibles: 12,
        };
        let query = input.to_query();
        assert!(query.contains(&("diasDeClase", "Lunes, Jueves".to_string())));
        assert!(query.contains(&("fechaInicio", "2025-12-01".to_string())));
        assert!(query.contains(&("vacantesDisponibles", "12".to_string())));
    }

    #[test]
    fn test_admin_taller_defaults_active() {
        let taller: TallerDto = serde_json::from_str(r#"{"id": 2, "nombre": "Canto"}"#).unwrap();
        assert!(taller.activo);
        assert!(taller.horarios.is_empty());
        assert_eq!(taller.precio, 0.0);
    }
}

//! Form field validation shared by the wizard, login and admin panels.
//!
//! Each validator returns the message to show under the field, or `Ok(())`.
//! `FieldErrors` collects them per field for a whole form.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

use crate::models::auth::LoginRequest;
use crate::models::contenido::ContactoForm;
use crate::models::inscripcion::{DatosPago, DatosPersonales};
use crate::models::taller::TallerInput;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

static NOMBRE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s]+$").unwrap());

static TELEFONO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?\d+$").unwrap());

static TARJETA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{15,19}$").unwrap());

static VENCIMIENTO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").unwrap());

static CVV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{3,4}$").unwrap());

/// Result of a single field check.
pub type FieldResult = std::result::Result<(), String>;

/// Messages keyed by field name. A field is invalid iff it has a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of `result` for `field`, replacing any previous one.
    pub fn check(&mut self, field: &'static str, result: FieldResult) -> bool {
        match result {
            Ok(()) => {
                self.errors.remove(field);
                true
            }
            Err(msg) => {
                self.errors.insert(field, msg);
                false
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_invalid(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

// === Personal data ===

pub fn validar_nombre(nombre: &str) -> FieldResult {
    let nombre = nombre.trim();
    let len = nombre.chars().count();
    if nombre.is_empty() {
        return Err("El nombre es obligatorio".into());
    }
    if len < 3 {
        return Err("El nombre debe tener al menos 3 caracteres".into());
    }
    if len > 100 {
        return Err("El nombre no puede exceder 100 caracteres".into());
    }
    if !NOMBRE_RE.is_match(nombre) {
        return Err("El nombre solo puede contener letras y espacios".into());
    }
    Ok(())
}

pub fn validar_email(email: &str) -> FieldResult {
    let email = email.trim();
    if email.is_empty() {
        return Err("El correo electrónico es obligatorio".into());
    }
    if !EMAIL_RE.is_match(email) {
        return Err("El formato del correo electrónico no es válido".into());
    }
    if email.chars().count() > 100 {
        return Err("El correo no puede exceder 100 caracteres".into());
    }
    Ok(())
}

pub fn validar_telefono(telefono: &str) -> FieldResult {
    let telefono = telefono.trim();
    if telefono.is_empty() {
        return Err("El teléfono es obligatorio".into());
    }

    let limpio: String = telefono
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    if !TELEFONO_RE.is_match(&limpio) {
        return Err("El teléfono solo puede contener números, espacios, guiones y paréntesis".into());
    }

    let digitos = limpio.trim_start_matches('+').len();
    if digitos < 7 {
        return Err("El teléfono debe tener al menos 7 dígitos".into());
    }
    if digitos > 15 {
        return Err("El teléfono no puede tener más de 15 dígitos".into());
    }
    Ok(())
}

/// Step 1 of the wizard.
pub fn validar_datos_personales(datos: &DatosPersonales) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check("nombre", validar_nombre(&datos.nombre));
    errors.check("email", validar_email(&datos.email));
    errors.check("telefono", validar_telefono(&datos.telefono));
    errors
}

// === Login ===

pub fn validar_password(password: &str) -> FieldResult {
    if password.is_empty() {
        return Err("La contraseña es obligatoria".into());
    }
    if password.chars().count() < 6 {
        return Err("La contraseña debe tener al menos 6 caracteres".into());
    }
    Ok(())
}

pub fn validar_login(credentials: &LoginRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check("email", validar_email(&credentials.email));
    errors.check("password", validar_password(&credentials.password));
    errors
}

// === Payment ===

pub fn validar_tarjeta(numero: &str) -> FieldResult {
    let limpio: String = numero.chars().filter(|c| !c.is_whitespace()).collect();
    if TARJETA_RE.is_match(&limpio) {
        Ok(())
    } else {
        Err("El número de tarjeta debe tener entre 15 y 19 dígitos".into())
    }
}

pub fn validar_vencimiento(fecha: &str) -> FieldResult {
    if VENCIMIENTO_RE.is_match(fecha.trim()) {
        Ok(())
    } else {
        Err("La fecha de vencimiento debe tener el formato MM/AA".into())
    }
}

pub fn validar_cvv(cvv: &str) -> FieldResult {
    if CVV_RE.is_match(cvv.trim()) {
        Ok(())
    } else {
        Err("El CVV debe tener 3 o 4 dígitos".into())
    }
}

pub fn validar_pago(pago: &DatosPago) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check("numero_tarjeta", validar_tarjeta(&pago.numero_tarjeta));
    errors.check("fecha_vencimiento", validar_vencimiento(&pago.fecha_vencimiento));
    errors.check("cvv", validar_cvv(&pago.cvv));
    errors
}

// === Admin forms ===

pub fn validar_taller(taller: &TallerInput) -> FieldResult {
    if taller.nombre.trim().is_empty() || taller.descripcion.trim().is_empty() || taller.precio <= 0.0 {
        return Err("Por favor completa todos los campos requeridos".into());
    }
    Ok(())
}

/// Schedule form fields before they become a `HorarioInput`.
pub fn validar_horario(
    taller_id: Option<i64>,
    profesor_id: Option<i64>,
    dias: &[String],
    hora_inicio: &str,
    hora_fin: &str,
    vacantes: i32,
) -> FieldResult {
    if taller_id.is_none() || profesor_id.is_none() || dias.is_empty() || vacantes <= 0 {
        return Err("Por favor completa todos los campos del horario".into());
    }

    let inicio = NaiveTime::parse_from_str(hora_inicio.trim(), "%H:%M");
    let fin = NaiveTime::parse_from_str(hora_fin.trim(), "%H:%M");
    match (inicio, fin) {
        (Ok(inicio), Ok(fin)) if fin > inicio => Ok(()),
        (Ok(_), Ok(_)) => Err("La hora de fin debe ser posterior a la hora de inicio".into()),
        _ => Err("Las horas deben tener el formato HH:MM".into()),
    }
}

pub fn validar_contacto(form: &ContactoForm) -> FieldResult {
    if [&form.nombre, &form.correo, &form.asunto, &form.mensaje]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err("Todos los campos son obligatorios.".into());
    }
    validar_email(&form.correo)
}

pub fn validar_motivo_baja(motivo: &str) -> FieldResult {
    if motivo.trim().chars().count() < 5 {
        return Err("Indica el motivo de la baja (mínimo 5 caracteres)".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nombre_rules() {
        assert!(validar_nombre("José Pérez Ñañez").is_ok());
        assert_eq!(validar_nombre("  ").unwrap_err(), "El nombre es obligatorio");
        assert_eq!(validar_nombre("Al").unwrap_err(), "El nombre debe tener al menos 3 caracteres");
        assert!(validar_nombre(&"a".repeat(101)).is_err());
        assert_eq!(
            validar_nombre("Ana 3").unwrap_err(),
            "El nombre solo puede contener letras y espacios"
        );
    }

    #[test]
    fn test_email_rules() {
        assert!(validar_email("ana.torres@mail.pe").is_ok());
        assert!(validar_email("ana@mail").is_err());
        assert!(validar_email("").is_err());
        let largo = format!("{}@mail.pe", "a".repeat(100));
        assert_eq!(validar_email(&largo).unwrap_err(), "El correo no puede exceder 100 caracteres");
    }

    #[test]
    fn test_telefono_rules() {
        assert!(validar_telefono("+51 (999) 888-777").is_ok());
        assert!(validar_telefono("1234567").is_ok());
        assert_eq!(validar_telefono("123456").unwrap_err(), "El teléfono debe tener al menos 7 dígitos");
        assert!(validar_telefono("1234567890123456").is_err());
        assert!(validar_telefono("99x888777").is_err());
        assert!(validar_telefono("99+8887776").is_err());
    }

    #[test]
    fn test_pago_rules() {
        let mut pago = DatosPago {
            numero_tarjeta: "4111 1111 1111 1111".to_string(),
            fecha_vencimiento: "12/27".to_string(),
            cvv: "123".to_string(),
        };
        assert!(validar_pago(&pago).is_empty());

        pago.fecha_vencimiento = "13/27".to_string();
        pago.cvv = "12".to_string();
        let errors = validar_pago(&pago);
        assert!(errors.is_invalid("fecha_vencimiento"));
        assert!(errors.is_invalid("cvv"));
        assert!(!errors.is_invalid("numero_tarjeta"));
    }

    #[test]
    fn test_field_errors_check_replaces() {
        let mut errors = FieldErrors::new();
        assert!(!errors.check("nombre", validar_nombre("")));
        assert_eq!(errors.get("nombre"), Some("El nombre es obligatorio"));
        assert!(errors.check("nombre", validar_nombre("Ana Torres")));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_login_password_length() {
        let errors = validar_login(&LoginRequest {
            email: "admin@talleres.pe".to_string(),
            password: "12345".to_string(),
        });
        assert_eq!(errors.get("password"), Some("La contraseña debe tener al menos 6 caracteres"));
        assert!(!errors.is_invalid("email"));
    }

    #[test]
    fn test_horario_form() {
        let dias = vec!["Lunes".to_string()];
        assert!(validar_horario(Some(1), Some(2), &dias, "18:00", "19:30", 10).is_ok());
        assert!(validar_horario(Some(1), None, &dias, "18:00", "19:30", 10).is_err());
        assert!(validar_horario(Some(1), Some(2), &[], "18:00", "19:30", 10).is_err());
        assert_eq!(
            validar_horario(Some(1), Some(2), &dias, "19:30", "18:00", 10).unwrap_err(),
            "La hora de fin debe ser posterior a la hora de inicio"
        );
    }

    #[test]
    fn test_taller_requires_positive_price() {
        let mut taller = TallerInput {
            nombre: "Guitarra".to_string(),
            descripcion: "Básico".to_string(),
            precio: 0.0,
            ..Default::default()
        };
        assert!(validar_taller(&taller).is_err());
        taller.precio = 150.0;
        assert!(validar_taller(&taller).is_ok());
    }

    #[test]
    fn test_motivo_baja() {
        assert!(validar_motivo_baja("viaje").is_ok());
        assert!(validar_motivo_baja(" no  ").is_err());
    }
}

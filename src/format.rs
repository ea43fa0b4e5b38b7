//! Display formatting for prices, times and dates.

use chrono::{NaiveDate, NaiveTime};

/// `S/ 150.00`
pub fn format_precio(precio: f64) -> String {
    format!("S/ {precio:.2}")
}

/// Backend times come as `HH:MM:SS`; panels show `HH:MM`.
pub fn format_hora(hora: &str) -> String {
    let hora = hora.trim();
    if let Ok(t) = NaiveTime::parse_from_str(hora, "%H:%M:%S") {
        return t.format("%H:%M").to_string();
    }
    if let Ok(t) = NaiveTime::parse_from_str(hora, "%H:%M") {
        return t.format("%H:%M").to_string();
    }
    hora.to_string()
}

/// `dd-MM-yyyy`
pub fn format_fecha(fecha: NaiveDate) -> String {
    fecha.format("%d-%m-%Y").to_string()
}

/// Days left until `fecha`, never negative.
pub fn dias_restantes(fecha: NaiveDate, hoy: NaiveDate) -> i64 {
    (fecha - hoy).num_days().max(0)
}

/// `18:00 - 19:30`
pub fn format_rango(inicio: &str, fin: &str) -> String {
    format!("{} - {}", format_hora(inicio), format_hora(fin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_precio() {
        assert_eq!(format_precio(150.0), "S/ 150.00");
        assert_eq!(format_precio(99.5), "S/ 99.50");
        assert_eq!(format_precio(0.0), "S/ 0.00");
    }

    #[test]
    fn test_format_hora() {
        assert_eq!(format_hora("18:00:00"), "18:00");
        assert_eq!(format_hora("07:05"), "07:05");
        assert_eq!(format_hora("tarde"), "tarde");
        assert_eq!(format_rango("18:00:00", "19:30:00"), "18:00 - 19:30");
    }

    #[test]
    fn test_fecha_and_days_left() {
        let hoy = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        let inicio = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(format_fecha(inicio), "01-12-2025");
        assert_eq!(dias_restantes(inicio, hoy), 11);
        assert_eq!(dias_restantes(hoy, inicio), 0);
    }
}

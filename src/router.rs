//! Route table and navigation.
//!
//! Panels are addressed by `Route`; stores that must move the user somewhere
//! get a `Navigator` instead of a reference to the UI.

use std::fmt;
use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::models::auth::Role;

/// Every panel the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Inicio,
    Acerca,
    Contacto,
    Blog,
    Talleres,
    Profesores,
    DatosPersonales,
    SeleccionTalleres { cliente_id: i64 },
    Pago { cliente_id: i64 },
    Confirmacion,
    Login,
    ForgotPassword,
    AdminEstudiantes,
    AdminProfesores,
    AdminTalleres,
    EstudianteHorario,
    EstudianteNuevaInscripcion,
    ProfesorHorario,
    NotFound,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Inicio => "/".to_string(),
            Route::Acerca => "/acerca".to_string(),
            Route::Contacto => "/contacto".to_string(),
            Route::Blog => "/blog".to_string(),
            Route::Talleres => "/talleres".to_string(),
            Route::Profesores => "/profesores".to_string(),
            Route::DatosPersonales => "/inscripcion/datos".to_string(),
            Route::SeleccionTalleres { cliente_id } => format!("/inscripcion/talleres/{cliente_id}"),
            Route::Pago { cliente_id } => format!("/inscripcion/pago/{cliente_id}"),
            Route::Confirmacion => "/confirmacion".to_string(),
            Route::Login => "/auth/login".to_string(),
            Route::ForgotPassword => "/auth/forgot-password".to_string(),
            Route::AdminEstudiantes => "/admin/estudiantes".to_string(),
            Route::AdminProfesores => "/admin/profesores".to_string(),
            Route::AdminTalleres => "/admin/talleres".to_string(),
            Route::EstudianteHorario => "/estudiante/horario".to_string(),
            Route::EstudianteNuevaInscripcion => "/estudiante/nueva-inscripcion".to_string(),
            Route::ProfesorHorario => "/profesor/horario".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Resolve a path; anything unrecognized is `NotFound`.
    pub fn parse(path: &str) -> Route {
        let path = path.trim();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Inicio,
            ["acerca"] => Route::Acerca,
            ["contacto"] => Route::Contacto,
            ["blog"] => Route::Blog,
            ["talleres"] => Route::Talleres,
            ["profesores"] => Route::Profesores,
            ["inscripcion", "datos"] => Route::DatosPersonales,
            ["inscripcion", "talleres", id] => id
                .parse()
                .map(|cliente_id| Route::SeleccionTalleres { cliente_id })
                .unwrap_or(Route::NotFound),
            ["inscripcion", "pago", id] => id
                .parse()
                .map(|cliente_id| Route::Pago { cliente_id })
                .unwrap_or(Route::NotFound),
            ["confirmacion"] => Route::Confirmacion,
            ["auth", "login"] => Route::Login,
            ["auth", "forgot-password"] => Route::ForgotPassword,
            ["admin"] | ["admin", "estudiantes"] => Route::AdminEstudiantes,
            ["admin", "profesores"] => Route::AdminProfesores,
            ["admin", "talleres"] => Route::AdminTalleres,
            ["estudiante"] | ["estudiante", "horario"] => Route::EstudianteHorario,
            ["estudiante", "nueva-inscripcion"] => Route::EstudianteNuevaInscripcion,
            ["profesor"] | ["profesor", "horario"] => Route::ProfesorHorario,
            _ => Route::NotFound,
        }
    }

    /// Landing route after login for a role.
    pub fn home_for(role: &Role) -> Route {
        match role {
            Role::Admin => Route::AdminEstudiantes,
            Role::Cliente => Route::EstudianteHorario,
            Role::Profesor => Route::ProfesorHorario,
            Role::Unknown(_) => Route::Inicio,
        }
    }

    /// Routes that need a logged-in user with a matching role.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::AdminEstudiantes | Route::AdminProfesores | Route::AdminTalleres => Some(Role::Admin),
            Route::EstudianteHorario | Route::EstudianteNuevaInscripcion => Some(Role::Cliente),
            Route::ProfesorHorario => Some(Role::Profesor),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Inicio => "Inicio",
            Route::Acerca => "Acerca de",
            Route::Contacto => "Contacto",
            Route::Blog => "Blog",
            Route::Talleres => "Talleres",
            Route::Profesores => "Profesores",
            Route::DatosPersonales => "Datos personales",
            Route::SeleccionTalleres { .. } => "Selección de talleres",
            Route::Pago { .. } => "Método de pago",
            Route::Confirmacion => "Confirmación",
            Route::Login => "Iniciar sesión",
            Route::ForgotPassword => "Recuperar contraseña",
            Route::AdminEstudiantes => "Estudiantes",
            Route::AdminProfesores => "Profesores",
            Route::AdminTalleres => "Talleres",
            Route::EstudianteHorario => "Mi horario",
            Route::EstudianteNuevaInscripcion => "Nueva inscripción",
            Route::ProfesorHorario => "Horario del profesor",
            Route::NotFound => "Página no encontrada",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Something that can move the user to another panel.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Forwards navigation requests to the UI thread.
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!("Navigate to {}", route);
        if self.tx.send(route).is_err() {
            tracing::warn!("Navigation to {} dropped: UI is gone", route);
        }
    }
}

/// Keeps every requested route, for tests.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_parse_roundtrip() {
        let routes = [
            Route::Inicio,
            Route::Blog,
            Route::DatosPersonales,
            Route::SeleccionTalleres { cliente_id: 5 },
            Route::Pago { cliente_id: 5 },
            Route::Login,
            Route::AdminTalleres,
            Route::EstudianteNuevaInscripcion,
            Route::ProfesorHorario,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_parse_edge_cases() {
        assert_eq!(Route::parse("/admin/"), Route::AdminEstudiantes);
        assert_eq!(Route::parse("/inscripcion/talleres/abc"), Route::NotFound);
        assert_eq!(Route::parse("/nada"), Route::NotFound);
        assert_eq!(Route::parse(""), Route::Inicio);
    }

    #[test]
    fn test_role_homes() {
        assert_eq!(Route::home_for(&Role::Admin).path(), "/admin/estudiantes");
        assert_eq!(Route::home_for(&Role::Cliente).path(), "/estudiante/horario");
        assert_eq!(Route::home_for(&Role::Profesor).path(), "/profesor/horario");
        assert_eq!(Route::home_for(&Role::Unknown("X".into())).path(), "/");
    }

    #[tokio::test]
    async fn test_channel_navigator_delivers() {
        let (nav, mut rx) = ChannelNavigator::new();
        nav.navigate(Route::Confirmacion);
        assert_eq!(rx.recv().await, Some(Route::Confirmacion));
    }
}

//! GUI panels and application state.

pub mod app;
pub mod auth_panel;
pub mod components;
pub mod contacto_panel;
pub mod estudiante_panel;
pub mod estudiantes_panel;
pub mod inscripcion_panel;
pub mod landing_panel;
pub mod profesores_panel;
pub mod settings_panel;
pub mod talleres_panel;

pub use app::App;

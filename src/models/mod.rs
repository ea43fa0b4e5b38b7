//! Data models exchanged with the backend.

pub mod auth;
pub mod cliente;
pub mod contenido;
pub mod inscripcion;
pub mod profesor;
pub mod taller;

pub use auth::{AuthResponse, LoginRequest, Role, UserInfo};
pub use cliente::{Cliente, ClienteAdmin, ClienteCreado, ClienteInput, NuevoClienteAdmin};
pub use contenido::{ContactoForm, Noticia, UploadResponse};
pub use inscripcion::{
    Credenciales, DatosPago, DatosPersonales, HorarioEstudiante, InscripcionDetalle, InscripcionPayload,
    InscripcionResponse,
};
pub use profesor::{ProfesorDto, ProfesorInput, ProfesorPublico};
pub use taller::{Horario, HorarioInput, ProfesorRef, Taller, TallerDetallado, TallerDto, TallerInput, TallerSimple};

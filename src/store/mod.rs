//! Long-lived client state shared across panels.

pub mod handoff;
pub mod session;
pub mod wizard;

pub use handoff::CredentialHandoff;
pub use session::{FileSessionStorage, MemorySessionStorage, SessionStorage, SessionStore};
pub use wizard::{EnrollmentWizard, Paso, TallerSeleccionable, WizardError, WizardState};

//! One-shot handoff of issued credentials from payment to confirmation.

use std::sync::Mutex;

use crate::models::inscripcion::Credenciales;

/// Holds at most one value; reading it clears it.
#[derive(Debug, Default)]
pub struct CredentialHandoff {
    slot: Mutex<Option<Credenciales>>,
}

impl CredentialHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, credenciales: Credenciales) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = Some(credenciales),
            Err(poisoned) => *poisoned.into_inner() = Some(credenciales),
        }
    }

    pub fn take(&self) -> Option<Credenciales> {
        match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_once() {
        let handoff = CredentialHandoff::new();
        assert!(handoff.take().is_none());

        handoff.set(Credenciales {
            correo: "ana@mail.pe".to_string(),
            contrasena_temporal: "Tmp-1".to_string(),
        });
        handoff.set(Credenciales {
            correo: "ana@mail.pe".to_string(),
            contrasena_temporal: "Tmp-2".to_string(),
        });

        assert_eq!(handoff.take().map(|c| c.contrasena_temporal).as_deref(), Some("Tmp-2"));
        assert!(handoff.take().is_none());
    }
}

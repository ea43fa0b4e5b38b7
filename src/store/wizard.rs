//! Enrollment wizard state.
//!
//! One `EnrollmentWizard` lives for the whole app session and is shared by
//! the three wizard panels. State is an immutable snapshot behind a watch
//! channel: setters clone-on-write and every subscriber sees the change.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use crate::models::cliente::Cliente;
use crate::models::inscripcion::{DatosPago, InscripcionDetalle};
use crate::models::taller::{Horario, Taller};
use crate::router::{Navigator, Route};

/// Wizard step pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Paso {
    #[default]
    DatosPersonales = 1,
    SeleccionTalleres = 2,
    Pago = 3,
}

impl Paso {
    pub const TOTAL: u8 = 3;

    pub fn numero(self) -> u8 {
        self as u8
    }

    pub fn from_numero(n: u8) -> Option<Paso> {
        match n {
            1 => Some(Paso::DatosPersonales),
            2 => Some(Paso::SeleccionTalleres),
            3 => Some(Paso::Pago),
            _ => None,
        }
    }

    /// Progress bar fill in `0.0..=1.0`.
    pub fn progreso(self) -> f32 {
        f32::from(self.numero() - 1) / f32::from(Self::TOTAL - 1)
    }

    pub fn titulo(self) -> &'static str {
        match self {
            Paso::DatosPersonales => "Datos personales",
            Paso::SeleccionTalleres => "Selección de talleres",
            Paso::Pago => "Pago",
        }
    }
}

/// Catalog entry with the user's selection layered on top.
#[derive(Debug, Clone, PartialEq)]
pub struct TallerSeleccionable {
    pub taller: Taller,
    pub seleccionado: bool,
    /// Only meaningful while `seleccionado` is true.
    pub horario_seleccionado_id: Option<i64>,
}

impl TallerSeleccionable {
    fn new(taller: Taller) -> Self {
        Self {
            taller,
            seleccionado: false,
            horario_seleccionado_id: None,
        }
    }

    /// Chosen schedule, if the id resolves inside this workshop.
    pub fn horario_elegido(&self) -> Option<&Horario> {
        self.horario_seleccionado_id.and_then(|id| self.taller.horario(id))
    }

    /// Selected with a schedule that resolves.
    pub fn valido_para_pago(&self) -> bool {
        self.seleccionado && self.horario_elegido().is_some()
    }
}

/// Marked workshop resolved to its chosen schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct TallerConHorario {
    pub taller: Taller,
    pub horario: Option<Horario>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Taller {0} no está en el catálogo")]
    TallerNoEncontrado(i64),

    #[error("El horario {horario_id} no pertenece al taller {taller_id}")]
    HorarioAjeno { taller_id: i64, horario_id: i64 },

    #[error("El taller {0} no está marcado")]
    TallerNoSeleccionado(i64),
}

/// Snapshot of the wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    cliente: Option<Cliente>,
    talleres: Vec<TallerSeleccionable>,
    datos_pago: Option<DatosPago>,
    paso: Paso,
}

impl WizardState {
    pub fn cliente(&self) -> Option<&Cliente> {
        self.cliente.as_ref()
    }

    pub fn talleres(&self) -> &[TallerSeleccionable] {
        &self.talleres
    }

    pub fn datos_pago(&self) -> Option<&DatosPago> {
        self.datos_pago.as_ref()
    }

    pub fn paso(&self) -> Paso {
        self.paso
    }

    pub fn talleres_marcados(&self) -> Vec<&TallerSeleccionable> {
        self.talleres.iter().filter(|t| t.seleccionado).collect()
    }

    pub fn talleres_seleccionados_validos(&self) -> Vec<TallerConHorario> {
        self.talleres
            .iter()
            .filter(|t| t.seleccionado)
            .map(|t| TallerConHorario {
                taller: t.taller.clone(),
                horario: t.horario_elegido().cloned(),
            })
            .collect()
    }

    pub fn total_pagar(&self) -> f64 {
        self.talleres
            .iter()
            .filter(|t| t.valido_para_pago())
            .map(|t| t.taller.precio)
            .sum()
    }

    /// At least one workshop marked, and every marked one has a schedule.
    pub fn seleccion_valida(&self) -> bool {
        let marcados = self.talleres_marcados();
        !marcados.is_empty() && marcados.iter().all(|t| t.valido_para_pago())
    }

    /// (taller, horario) pairs for the confirmation payload.
    pub fn inscripciones(&self) -> Vec<InscripcionDetalle> {
        self.talleres
            .iter()
            .filter(|t| t.valido_para_pago())
            .filter_map(|t| {
                t.horario_seleccionado_id.map(|horario_id| InscripcionDetalle {
                    taller_id: t.taller.id,
                    horario_id,
                })
            })
            .collect()
    }

    fn taller_mut(&mut self, taller_id: i64) -> Option<&mut TallerSeleccionable> {
        self.talleres.iter_mut().find(|t| t.taller.id == taller_id)
    }
}

/// Shared wizard store.
pub struct EnrollmentWizard {
    state: watch::Sender<Arc<WizardState>>,
    navigator: Arc<dyn Navigator>,
}

impl EnrollmentWizard {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(Arc::new(WizardState::default()));
        Self { state, navigator }
    }

    /// Current state.
    pub fn snapshot(&self) -> Arc<WizardState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<WizardState>> {
        self.state.subscribe()
    }

    pub fn cliente(&self) -> Option<Cliente> {
        self.state.borrow().cliente.clone()
    }

    pub fn paso(&self) -> Paso {
        self.state.borrow().paso
    }

    pub fn total_pagar(&self) -> f64 {
        self.state.borrow().total_pagar()
    }

    pub fn catalogo_vacio(&self) -> bool {
        self.state.borrow().talleres.is_empty()
    }

    /// Store the customer created at step 1 and move to step 2.
    pub fn set_cliente(&self, cliente: Cliente) {
        let cliente_id = cliente.id;
        tracing::info!("Wizard cliente set to {}", cliente_id);
        self.update(|s| {
            s.cliente = Some(cliente);
            s.paso = Paso::SeleccionTalleres;
        });
        self.navigator.navigate(Route::SeleccionTalleres { cliente_id });
    }

    /// Load the catalog with nothing selected. Callers only do this while
    /// the catalog is empty.
    pub fn set_talleres_iniciales(&self, catalogo: Vec<Taller>) {
        tracing::debug!("Wizard catalog hydrated with {} talleres", catalogo.len());
        self.update(|s| {
            s.talleres = catalogo.into_iter().map(TallerSeleccionable::new).collect();
        });
    }

    /// Mark or unmark a workshop. Unmarking also drops its schedule.
    pub fn toggle_taller(&self, taller_id: i64, checked: bool) {
        let found = self.state.send_if_modified(|state| {
            if !state.talleres.iter().any(|t| t.taller.id == taller_id) {
                return false;
            }
            let entry = Arc::make_mut(state).taller_mut(taller_id);
            if let Some(entry) = entry {
                entry.seleccionado = checked;
                if !checked {
                    entry.horario_seleccionado_id = None;
                }
            }
            true
        });
        if !found {
            tracing::debug!("toggle_taller ignored unknown taller {}", taller_id);
        }
    }

    /// Choose (or clear with `None`) the schedule of a workshop. The
    /// workshop must be marked and the schedule must belong to it.
    pub fn set_horario(&self, taller_id: i64, horario_id: Option<i64>) -> Result<(), WizardError> {
        let mut outcome = Ok(());
        self.state.send_if_modified(|state| {
            let Some(entry) = state.talleres.iter().find(|t| t.taller.id == taller_id) else {
                outcome = Err(WizardError::TallerNoEncontrado(taller_id));
                return false;
            };
            if horario_id.is_some() && !entry.seleccionado {
                outcome = Err(WizardError::TallerNoSeleccionado(taller_id));
                return false;
            }
            if let Some(id) = horario_id
                && entry.taller.horario(id).is_none()
            {
                outcome = Err(WizardError::HorarioAjeno {
                    taller_id,
                    horario_id: id,
                });
                return false;
            }
            if let Some(entry) = Arc::make_mut(state).taller_mut(taller_id) {
                entry.horario_seleccionado_id = horario_id;
            }
            true
        });

        if let Err(e) = &outcome {
            tracing::warn!("set_horario rejected: {}", e);
        }
        outcome
    }

    /// Store card data and move to step 3.
    pub fn set_datos_pago(&self, datos: DatosPago) {
        self.update(|s| {
            s.datos_pago = Some(datos);
            s.paso = Paso::Pago;
        });
    }

    pub fn set_paso(&self, paso: Paso) {
        self.update(|s| s.paso = paso);
    }

    /// Back to the empty baseline at step 1.
    pub fn clear_state(&self) {
        tracing::debug!("Wizard state cleared");
        self.update(|s| *s = WizardState::default());
    }

    fn update(&self, f: impl FnOnce(&mut WizardState)) {
        self.state.send_modify(|state| f(Arc::make_mut(state)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::taller::ProfesorRef;
    use crate::router::RecordingNavigator;

    fn horario(id: i64) -> Horario {
        Horario {
            id,
            dias_de_clase: "Lunes".to_string(),
            hora_inicio: "18:00:00".to_string(),
            hora_fin: "19:00:00".to_string(),
            fecha_inicio: None,
            vacantes_disponibles: 5,
            profesor: Some(ProfesorRef {
                id: None,
                nombre_completo: "Juan".to_string(),
            }),
        }
    }

    fn catalogo() -> Vec<Taller> {
        vec![
            Taller {
                id: 1,
                nombre: "Guitarra".to_string(),
                precio: 100.0,
                horarios: vec![horario(11), horario(12)],
            },
            Taller {
                id: 2,
                nombre: "Canto".to_string(),
                precio: 50.0,
                horarios: vec![horario(21)],
            },
        ]
    }

    fn wizard() -> (EnrollmentWizard, Arc<RecordingNavigator>) {
        let nav = Arc::new(RecordingNavigator::default());
        let wizard = EnrollmentWizard::new(nav.clone());
        wizard.set_talleres_iniciales(catalogo());
        (wizard, nav)
    }

    fn marked_ids(state: &WizardState) -> Vec<i64> {
        state.talleres_marcados().iter().map(|t| t.taller.id).collect()
    }

    #[test]
    fn test_partial_selection_total() {
        let (wizard, _) = wizard();
        wizard.toggle_taller(1, true);
        wizard.set_horario(1, Some(11)).unwrap();
        wizard.toggle_taller(2, true);

        let state = wizard.snapshot();
        assert_eq!(marked_ids(&state), vec![1, 2]);
        assert_eq!(state.total_pagar(), 100.0);
        assert!(!state.seleccion_valida());

        let validos = state.talleres_seleccionados_validos();
        assert_eq!(validos[0].horario.as_ref().map(|h| h.id), Some(11));
        assert!(validos[1].horario.is_none());
    }

    #[test]
    fn test_unchecking_clears_horario() {
        let (wizard, _) = wizard();
        wizard.toggle_taller(1, true);
        wizard.set_horario(1, Some(11)).unwrap();
        wizard.toggle_taller(2, true);
        wizard.toggle_taller(1, false);

        let state = wizard.snapshot();
        assert_eq!(state.talleres()[0].horario_seleccionado_id, None);
        assert_eq!(state.total_pagar(), 0.0);
        assert!(
            state
                .talleres()
                .iter()
                .all(|t| t.seleccionado || t.horario_seleccionado_id.is_none())
        );
    }

    #[test]
    fn test_set_cliente_advances_and_navigates() {
        let (wizard, nav) = wizard();
        wizard.set_cliente(Cliente {
            id: 5,
            nombre_completo: "Ana Torres".to_string(),
            correo: "ana@mail.pe".to_string(),
            telefono: "999888777".to_string(),
        });
        assert_eq!(wizard.paso(), Paso::SeleccionTalleres);
        assert_eq!(nav.last(), Some(Route::SeleccionTalleres { cliente_id: 5 }));
    }

    #[test]
    fn test_clear_state_baseline() {
        let (wizard, _) = wizard();
        wizard.toggle_taller(2, true);
        wizard.set_horario(2, Some(21)).unwrap();
        wizard.set_datos_pago(DatosPago::default());
        wizard.clear_state();

        let state = wizard.snapshot();
        assert!(state.talleres_marcados().is_empty());
        assert_eq!(state.total_pagar(), 0.0);
        assert_eq!(state.paso(), Paso::DatosPersonales);
        assert!(state.cliente().is_none());
        assert!(state.datos_pago().is_none());
        assert!(wizard.catalogo_vacio());
    }

    #[test]
    fn test_foreign_horario_is_rejected() {
        let (wizard, _) = wizard();
        wizard.toggle_taller(1, true);
        let err = wizard.set_horario(1, Some(21)).unwrap_err();
        assert_eq!(
            err,
            WizardError::HorarioAjeno {
                taller_id: 1,
                horario_id: 21
            }
        );
        assert_eq!(wizard.snapshot().talleres()[0].horario_seleccionado_id, None);
        assert_eq!(
            wizard.set_horario(9, Some(11)).unwrap_err(),
            WizardError::TallerNoEncontrado(9)
        );
    }

    fn assert_unmarked_have_no_horario(wizard: &EnrollmentWizard) {
        let state = wizard.snapshot();
        for t in state.talleres() {
            assert!(
                t.seleccionado || t.horario_seleccionado_id.is_none(),
                "taller {} unmarked with horario {:?}",
                t.taller.id,
                t.horario_seleccionado_id
            );
        }
    }

    #[test]
    fn test_unmarked_taller_never_holds_horario() {
        let (wizard, _) = wizard();

        assert_eq!(
            wizard.set_horario(2, Some(21)).unwrap_err(),
            WizardError::TallerNoSeleccionado(2)
        );
        assert_eq!(wizard.snapshot().talleres()[1].horario_seleccionado_id, None);
        assert_unmarked_have_no_horario(&wizard);

        wizard.toggle_taller(1, true);
        assert_unmarked_have_no_horario(&wizard);
        wizard.set_horario(1, Some(12)).unwrap();
        assert_unmarked_have_no_horario(&wizard);
        wizard.toggle_taller(1, false);
        assert_unmarked_have_no_horario(&wizard);
        assert!(wizard.set_horario(1, Some(11)).is_err());
        assert_unmarked_have_no_horario(&wizard);
        wizard.set_horario(1, None).unwrap();
        assert_unmarked_have_no_horario(&wizard);
        wizard.toggle_taller(2, true);
        wizard.set_horario(2, Some(21)).unwrap();
        assert_unmarked_have_no_horario(&wizard);
        wizard.toggle_taller(2, false);
        assert_unmarked_have_no_horario(&wizard);
        assert!(wizard.snapshot().inscripciones().is_empty());
    }

    #[test]
    fn test_dangling_horario_contributes_nothing() {
        let mut state = WizardState::default();
        state.talleres = catalogo().into_iter().map(TallerSeleccionable::new).collect();
        state.talleres[0].seleccionado = true;
        state.talleres[0].horario_seleccionado_id = Some(99);

        assert_eq!(state.total_pagar(), 0.0);
        assert!(state.inscripciones().is_empty());
        assert!(state.talleres_seleccionados_validos()[0].horario.is_none());
    }

    #[test]
    fn test_unknown_taller_toggle_is_noop() {
        let (wizard, _) = wizard();
        let before = wizard.snapshot();
        wizard.toggle_taller(42, true);
        assert_eq!(*wizard.snapshot(), *before);
    }

    #[test]
    fn test_subscribers_see_updates() {
        let (wizard, _) = wizard();
        let mut rx = wizard.subscribe();
        assert!(!rx.has_changed().unwrap());

        wizard.toggle_taller(2, true);
        assert!(rx.has_changed().unwrap());
        assert_eq!(marked_ids(&rx.borrow_and_update()), vec![2]);
    }

    #[test]
    fn test_inscripciones_and_full_selection() {
        let (wizard, _) = wizard();
        wizard.toggle_taller(1, true);
        wizard.set_horario(1, Some(12)).unwrap();
        wizard.toggle_taller(2, true);
        wizard.set_horario(2, Some(21)).unwrap();

        let state = wizard.snapshot();
        assert!(state.seleccion_valida());
        assert_eq!(state.total_pagar(), 150.0);
        assert_eq!(
            state.inscripciones(),
            vec![
                InscripcionDetalle {
                    taller_id: 1,
                    horario_id: 12
                },
                InscripcionDetalle {
                    taller_id: 2,
                    horario_id: 21
                },
            ]
        );
    }

    #[test]
    fn test_paso_progress() {
        assert_eq!(Paso::DatosPersonales.progreso(), 0.0);
        assert_eq!(Paso::SeleccionTalleres.progreso(), 0.5);
        assert_eq!(Paso::Pago.progreso(), 1.0);
        assert_eq!(Paso::from_numero(4), None);
    }
}

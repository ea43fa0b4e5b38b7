//! Three-step sign-up wizard: personal data, workshop selection, payment,
//! then the confirmation page with the issued credentials.

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::{ARROW_LEFT, ARROW_RIGHT, CHECK_CIRCLE, CREDIT_CARD, FLOPPY_DISK, SIGN_IN, TRASH};

use super::app::{App, DeleteTarget, UiMessage};
use super::components::{
    back_button, card_frame, colors, danger_action_button, field_error, form_error, panel_header,
    primary_button_enabled, wizard_progress,
};
use crate::error::AppError;
use crate::format::{format_precio, format_rango};
use crate::models::inscripcion::{Credenciales, DatosPago, DatosPersonales, InscripcionPayload, InscripcionResponse};
use crate::router::Route;
use crate::store::{Paso, WizardState};
use crate::validation::{FieldErrors, validar_datos_personales, validar_pago};

const MSG_CUENTA_EXISTENTE: &str =
    "Ya tienes una cuenta activa con este correo. Por favor, inicia sesión para continuar.";
const MSG_REGISTRO_FALLBACK: &str = "Error desconocido al guardar los datos. Revisa el estado de la conexión.";
const MSG_FORMULARIO_INVALIDO: &str = "Por favor, corrige los errores en el formulario";
const MSG_PASOS_PREVIOS: &str = "Debes completar los pasos anteriores.";
const MSG_PAGO_FALLIDO: &str = "Error en el pago. Por favor, verifica tus datos de tarjeta e inténtalo de nuevo.";

/// Step 1 form.
#[derive(Debug, Default)]
pub struct DatosForm {
    pub datos: DatosPersonales,
    pub errors: FieldErrors,
    pub loading: bool,
    pub error: Option<String>,
}

/// Step 2 catalog loading state.
#[derive(Debug, Default)]
pub struct SeleccionState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Step 3 card form.
#[derive(Debug, Default)]
pub struct PagoForm {
    pub datos: DatosPago,
    pub errors: FieldErrors,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct ConfirmacionState {
    pub credenciales: Option<Credenciales>,
}

/// Message for a failed step-1 save.
pub fn mensaje_registro(err: &AppError) -> String {
    match err.status() {
        Some(409) | Some(400) => MSG_CUENTA_EXISTENTE.to_string(),
        _ => err.user_message(MSG_REGISTRO_FALLBACK),
    }
}

/// Confirmation request from the wizard state and the card data.
///
/// `None` without a cliente or without any workshop ready for payment.
pub fn build_payload(state: &WizardState, pago: &DatosPago) -> Option<InscripcionPayload> {
    let cliente = state.cliente()?;
    let inscripciones = state.inscripciones();
    if inscripciones.is_empty() {
        return None;
    }

    Some(InscripcionPayload {
        cliente_id: cliente.id,
        nombre: cliente.nombre_completo.clone(),
        email: cliente.correo.clone(),
        telefono: cliente.telefono.clone(),
        numero_tarjeta: pago.numero_tarjeta.trim().to_string(),
        fecha_vencimiento: pago.fecha_vencimiento.trim().to_string(),
        cvv: pago.cvv.trim().to_string(),
        inscripciones,
    })
}

// === Step 1 ===

pub fn initialize_datos(app: &mut App) {
    app.wizard.set_paso(Paso::DatosPersonales);
    app.datos_form.errors.clear();
    app.datos_form.error = None;
    app.datos_form.loading = false;

    if let Some(cliente) = app.wizard.cliente() {
        app.datos_form.datos = DatosPersonales {
            nombre: cliente.nombre_completo,
            email: cliente.correo,
            telefono: cliente.telefono,
        };
    }
}

pub fn show_datos(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Inscripción");
    wizard_progress(ui, app.wizard.paso());

    ui.heading("Datos personales");
    ui.add_space(10.0);
    form_error(ui, &app.datos_form.error);

    let form = &mut app.datos_form;
    egui::Grid::new("datos_personales_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            ui.label("Nombre completo:");
            ui.vertical(|ui| {
                ui.add(egui::TextEdit::singleline(&mut form.datos.nombre).desired_width(280.0));
                field_error(ui, &form.errors, "nombre");
            });
            ui.end_row();

            ui.label("Correo electrónico:");
            ui.vertical(|ui| {
                ui.add(egui::TextEdit::singleline(&mut form.datos.email).desired_width(280.0));
                field_error(ui, &form.errors, "email");
            });
            ui.end_row();

            ui.label("Teléfono:");
            ui.vertical(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut form.datos.telefono)
                        .desired_width(180.0)
                        .hint_text("+51 999 888 777"),
                );
                field_error(ui, &form.errors, "telefono");
            });
            ui.end_row();
        });

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let loading = app.datos_form.loading;
        if primary_button_enabled(ui, !loading, FLOPPY_DISK, "Guardar y continuar") {
            guardar_datos(app);
        }
        if loading {
            ui.spinner();
        }

        if let Some(cliente) = app.wizard.cliente() {
            ui.add_space(10.0);
            if ui.button(format!("Continuar {ARROW_RIGHT}")).clicked() {
                app.navigate(Route::SeleccionTalleres {
                    cliente_id: cliente.id,
                });
            }
        }
    });
}

fn guardar_datos(app: &mut App) {
    app.datos_form.error = None;
    app.datos_form.errors = validar_datos_personales(&app.datos_form.datos);
    if !app.datos_form.errors.is_empty() {
        app.datos_form.error = Some(MSG_FORMULARIO_INVALIDO.to_string());
        return;
    }

    let datos = DatosPersonales {
        nombre: app.datos_form.datos.nombre.trim().to_string(),
        email: app.datos_form.datos.email.trim().to_string(),
        telefono: app.datos_form.datos.telefono.trim().to_string(),
    };
    app.datos_form.loading = true;

    let api = app.inscripcion_api.clone();
    app.spawn_task(
        async move { api.guardar_datos_personales(&datos).await },
        UiMessage::ClienteRegistrado,
        |e| UiMessage::RegistroFailed(mensaje_registro(&e)),
    );
}

// === Step 2 ===

pub fn initialize_seleccion(app: &mut App) {
    app.wizard.set_paso(Paso::SeleccionTalleres);
    app.seleccion.error = None;

    let route_id = match app.current_route {
        Route::SeleccionTalleres { cliente_id } => Some(cliente_id),
        _ => None,
    };
    let cliente_ok = app.wizard.cliente().is_some_and(|c| Some(c.id) == route_id);
    if !cliente_ok {
        tracing::warn!("Workshop selection without a registered cliente");
        app.navigate(Route::DatosPersonales);
        return;
    }

    if app.wizard.catalogo_vacio() {
        app.seleccion.loading = true;
        let api = app.inscripcion_api.clone();
        app.spawn_task(
            async move { api.obtener_talleres().await },
            UiMessage::CatalogoLoaded,
            |e| UiMessage::CatalogoFailed(e.user_message("No se pudieron cargar los talleres disponibles.")),
        );
    } else {
        app.seleccion.loading = false;
    }
}

pub fn show_seleccion(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Inscripción");
    let state = app.wizard.snapshot();
    wizard_progress(ui, state.paso());

    ui.heading("Selecciona tus talleres");
    ui.add_space(10.0);
    form_error(ui, &app.seleccion.error);

    if app.seleccion.loading {
        ui.spinner();
        return;
    }
    if state.talleres().is_empty() {
        ui.weak("No hay talleres disponibles en este momento.");
    }

    for item in state.talleres() {
        let taller = &item.taller;
        card_frame(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                let mut checked = item.seleccionado;
                let label = RichText::new(&taller.nombre).strong().size(16.0);
                if ui
                    .add_enabled(!taller.horarios.is_empty(), egui::Checkbox::new(&mut checked, label))
                    .changed()
                {
                    app.wizard.toggle_taller(taller.id, checked);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(format_precio(taller.precio)).color(colors::PRIMARY));
                });
            });

            if taller.horarios.is_empty() {
                ui.weak("Sin horarios disponibles");
                return;
            }
            if !item.seleccionado {
                return;
            }

            let selected = item.horario_elegido().map(|h| {
                format!(
                    "{} {} ({})",
                    h.dias_de_clase,
                    format_rango(&h.hora_inicio, &h.hora_fin),
                    h.profesor_nombre()
                )
            });
            egui::ComboBox::from_id_salt(("wizard_horario", taller.id))
                .width(360.0)
                .selected_text(selected.unwrap_or_else(|| "Selecciona un horario".to_string()))
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(item.horario_seleccionado_id.is_none(), "Selecciona un horario")
                        .clicked()
                        && let Err(e) = app.wizard.set_horario(taller.id, None)
                    {
                        app.seleccion.error = Some(e.to_string());
                    }
                    for horario in &taller.horarios {
                        let text = format!(
                            "{} {} ({}, {} vacantes)",
                            horario.dias_de_clase,
                            format_rango(&horario.hora_inicio, &horario.hora_fin),
                            horario.profesor_nombre(),
                            horario.vacantes_disponibles
                        );
                        if ui
                            .selectable_label(item.horario_seleccionado_id == Some(horario.id), text)
                            .clicked()
                            && let Err(e) = app.wizard.set_horario(taller.id, Some(horario.id))
                        {
                            app.seleccion.error = Some(e.to_string());
                        }
                    }
                });
        });
        ui.add_space(8.0);
    }

    ui.add_space(10.0);
    ui.label(RichText::new(format!("Total: {}", format_precio(state.total_pagar()))).strong().size(18.0));
    ui.add_space(10.0);

    let cliente_id = state.cliente().map(|c| c.id);
    ui.horizontal(|ui| {
        if back_button(ui, "Volver") {
            app.navigate(Route::DatosPersonales);
        }
        ui.add_space(10.0);

        let valida = state.seleccion_valida();
        if primary_button_enabled(ui, valida, ARROW_RIGHT, "Continuar al pago")
            && let Some(cliente_id) = cliente_id
        {
            app.wizard.set_paso(Paso::Pago);
            app.navigate(Route::Pago { cliente_id });
        }
        if !valida {
            ui.weak("Selecciona al menos un taller y su horario correspondiente.");
        }
    });
}

// === Step 3 ===

pub fn initialize_pago(app: &mut App) {
    app.wizard.set_paso(Paso::Pago);
    app.pago_form.errors.clear();
    app.pago_form.error = None;
    app.pago_form.loading = false;

    let state = app.wizard.snapshot();
    if state.cliente().is_none() || !state.seleccion_valida() {
        tracing::warn!("Payment step opened with incomplete wizard");
        app.navigate(Route::DatosPersonales);
        app.datos_form.error = Some(MSG_PASOS_PREVIOS.to_string());
        return;
    }

    if let Some(pago) = state.datos_pago() {
        app.pago_form.datos = pago.clone();
    }
}

pub fn show_pago(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Inscripción");
    let state = app.wizard.snapshot();
    wizard_progress(ui, state.paso());

    ui.heading("Resumen");
    ui.add_space(8.0);

    egui::Grid::new("pago_resumen_grid")
        .num_columns(4)
        .striped(true)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            ui.strong("Taller");
            ui.strong("Horario");
            ui.strong("Precio");
            ui.strong("");
            ui.end_row();

            for item in state.talleres_seleccionados_validos() {
                ui.label(&item.taller.nombre);
                match &item.horario {
                    Some(h) => ui.label(format!(
                        "{} {}",
                        h.dias_de_clase,
                        format_rango(&h.hora_inicio, &h.hora_fin)
                    )),
                    None => ui.colored_label(colors::WARNING, "Sin horario"),
                };
                ui.label(format_precio(item.taller.precio));
                if danger_action_button(ui, TRASH, "Quitar").clicked() {
                    app.delete_target = Some(DeleteTarget::TallerSeleccionado(item.taller.id, item.taller.nombre.clone()));
                    app.show_delete_confirm = true;
                }
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    ui.label(RichText::new(format!("Total a pagar: {}", format_precio(state.total_pagar()))).strong().size(18.0));
    ui.add_space(15.0);
    ui.separator();

    ui.heading("Datos de la tarjeta");
    ui.add_space(8.0);
    form_error(ui, &app.pago_form.error);

    let form = &mut app.pago_form;
    egui::Grid::new("pago_tarjeta_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            ui.label("Número de tarjeta:");
            ui.vertical(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut form.datos.numero_tarjeta)
                        .desired_width(220.0)
                        .hint_text("4111 1111 1111 1111"),
                );
                field_error(ui, &form.errors, "numero_tarjeta");
            });
            ui.end_row();

            ui.label("Vencimiento:");
            ui.vertical(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut form.datos.fecha_vencimiento)
                        .desired_width(80.0)
                        .hint_text("MM/AA"),
                );
                field_error(ui, &form.errors, "fecha_vencimiento");
            });
            ui.end_row();

            ui.label("CVV:");
            ui.vertical(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut form.datos.cvv)
                        .desired_width(60.0)
                        .password(true),
                );
                field_error(ui, &form.errors, "cvv");
            });
            ui.end_row();
        });

    ui.add_space(20.0);

    let cliente_id = state.cliente().map(|c| c.id);
    ui.horizontal(|ui| {
        if back_button(ui, "Volver")
            && let Some(cliente_id) = cliente_id
        {
            app.navigate(Route::SeleccionTalleres { cliente_id });
        }
        ui.add_space(10.0);

        let enabled = !app.pago_form.loading && state.seleccion_valida() && state.total_pagar() > 0.0;
        if primary_button_enabled(ui, enabled, CREDIT_CARD, "Pagar e inscribirme") {
            pagar(app);
        }
        if app.pago_form.loading {
            ui.spinner();
        }
    });
}

fn pagar(app: &mut App) {
    app.pago_form.error = None;
    app.pago_form.errors = validar_pago(&app.pago_form.datos);
    if !app.pago_form.errors.is_empty() {
        return;
    }

    let state = app.wizard.snapshot();
    if !state.seleccion_valida() || state.total_pagar() <= 0.0 {
        return;
    }
    let Some(payload) = build_payload(&state, &app.pago_form.datos) else {
        app.pago_form.error = Some(MSG_PASOS_PREVIOS.to_string());
        return;
    };

    app.wizard.set_datos_pago(app.pago_form.datos.clone());
    app.pago_form.loading = true;
    tracing::info!(
        "Confirming enrollment of cliente {} in {} talleres",
        payload.cliente_id,
        payload.inscripciones.len()
    );

    let api = app.inscripcion_api.clone();
    app.spawn_task(
        async move { api.confirmar(&payload).await },
        UiMessage::InscripcionConfirmada,
        |_| UiMessage::PagoFailed(MSG_PAGO_FALLIDO.to_string()),
    );
}

/// Payment succeeded: hand off credentials and reset the wizard.
pub fn on_confirmada(app: &mut App, resp: InscripcionResponse) {
    tracing::info!("Enrollment confirmed ({})", resp.confirmacion_id);
    app.handoff.set(Credenciales::from(&resp));
    app.wizard.clear_state();
    app.datos_form = DatosForm::default();
    app.pago_form = PagoForm::default();
    app.seleccion = SeleccionState::default();
    app.navigate(Route::Confirmacion);
}

/// Drop a workshop from the payment summary.
pub fn quitar_taller(app: &mut App, taller_id: i64) {
    app.wizard.toggle_taller(taller_id, false);

    let state = app.wizard.snapshot();
    if state.talleres_seleccionados_validos().is_empty()
        && let Some(cliente) = state.cliente()
    {
        app.navigate(Route::SeleccionTalleres {
            cliente_id: cliente.id,
        });
        app.seleccion.error = Some("Has eliminado todos los talleres. Selecciona al menos uno para continuar.".to_string());
    }
}

// === Confirmation ===

pub fn initialize_confirmacion(app: &mut App) {
    app.confirmacion.credenciales = app.handoff.take();
}

pub fn show_confirmacion(app: &mut App, ui: &mut Ui) {
    ui.add_space(30.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(CHECK_CIRCLE).size(48.0).color(colors::SUCCESS));
        ui.heading("¡Inscripción completada!");
        ui.add_space(15.0);

        match &app.confirmacion.credenciales {
            Some(credenciales) => {
                ui.label("Usa estas credenciales para ingresar a tu cuenta:");
                ui.add_space(10.0);
                card_frame(ui, |ui| {
                    egui::Grid::new("credenciales_grid")
                        .num_columns(2)
                        .spacing([20.0, 8.0])
                        .show(ui, |ui| {
                            ui.label("Correo:");
                            ui.strong(&credenciales.correo);
                            ui.end_row();

                            ui.label("Contraseña temporal:");
                            ui.horizontal(|ui| {
                                ui.strong(&credenciales.contrasena_temporal);
                                if ui.small_button("Copiar").clicked() {
                                    ui.ctx().copy_text(credenciales.contrasena_temporal.clone());
                                }
                            });
                            ui.end_row();
                        });
                });
                ui.add_space(8.0);
                ui.colored_label(colors::WARNING, "Guárdalas ahora: no se volverán a mostrar.");
            }
            None => {
                ui.label("Tu inscripción fue registrada. Revisa tu correo para los datos de acceso.");
            }
        }

        ui.add_space(20.0);
        ui.horizontal(|ui| {
            if ui.button(format!("{SIGN_IN} Iniciar sesión")).clicked() {
                app.navigate(Route::Login);
            }
            if ui.button(format!("{ARROW_LEFT} Volver al inicio")).clicked() {
                app.navigate(Route::Inicio);
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::cliente::Cliente;
    use crate::models::taller::{Horario, Taller};
    use crate::router::RecordingNavigator;
    use crate::store::EnrollmentWizard;

    fn taller(id: i64, precio: f64, horarios: &[i64]) -> Taller {
        Taller {
            id,
            nombre: format!("Taller {id}"),
            precio,
            horarios: horarios
                .iter()
                .map(|&h| Horario {
                    id: h,
                    dias_de_clase: "Lunes".to_string(),
                    hora_inicio: "18:00:00".to_string(),
                    hora_fin: "19:00:00".to_string(),
                    fecha_inicio: None,
                    vacantes_disponibles: 3,
                    profesor: None,
                })
                .collect(),
        }
    }

    fn tarjeta() -> DatosPago {
        DatosPago {
            numero_tarjeta: " 4111111111111111 ".to_string(),
            fecha_vencimiento: "12/29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_build_payload_uses_ready_workshops() {
        let wizard = EnrollmentWizard::new(Arc::new(RecordingNavigator::default()));
        wizard.set_cliente(Cliente {
            id: 5,
            nombre_completo: "Ana Torres".to_string(),
            correo: "ana@mail.pe".to_string(),
            telefono: "999888777".to_string(),
        });
        wizard.set_talleres_iniciales(vec![taller(1, 150.0, &[11]), taller(2, 90.0, &[21])]);
        wizard.toggle_taller(1, true);
        wizard.set_horario(1, Some(11)).unwrap();
        wizard.toggle_taller(2, true);

        let payload = build_payload(&wizard.snapshot(), &tarjeta()).unwrap();
        assert_eq!(payload.cliente_id, 5);
        assert_eq!(payload.email, "ana@mail.pe");
        assert_eq!(payload.numero_tarjeta, "4111111111111111");
        assert_eq!(payload.inscripciones.len(), 1);
        assert_eq!(payload.inscripciones[0].horario_id, 11);
    }

    #[test]
    fn test_build_payload_needs_cliente_and_selection() {
        let wizard = EnrollmentWizard::new(Arc::new(RecordingNavigator::default()));
        wizard.set_talleres_iniciales(vec![taller(1, 150.0, &[11])]);
        wizard.toggle_taller(1, true);
        wizard.set_horario(1, Some(11)).unwrap();
        assert!(build_payload(&wizard.snapshot(), &tarjeta()).is_none());

        wizard.clear_state();
        wizard.set_cliente(Cliente {
            id: 5,
            nombre_completo: "Ana".to_string(),
            correo: "ana@mail.pe".to_string(),
            telefono: String::new(),
        });
        assert!(build_payload(&wizard.snapshot(), &tarjeta()).is_none());
    }

    #[test]
    fn test_mensaje_registro() {
        let conflict = AppError::Status {
            status: 409,
            message: Some("Duplicate".to_string()),
        };
        assert_eq!(mensaje_registro(&conflict), MSG_CUENTA_EXISTENTE);

        let server = AppError::Status {
            status: 500,
            message: Some("Base de datos caída".to_string()),
        };
        assert_eq!(mensaje_registro(&server), "Base de datos caída");

        let network = AppError::Network("connection refused".to_string());
        assert_eq!(mensaje_registro(&network), MSG_REGISTRO_FALLBACK);
    }
}

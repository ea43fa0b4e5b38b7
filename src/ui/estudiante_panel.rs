//! Logged-in student area: own schedule, drop requests and new enrollments.

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CREDIT_CARD, PLUS, SIGN_OUT};

use super::app::{App, UiMessage};
use super::components::{
    card_frame, colors, danger_action_button, field_error, form_error, panel_header, primary_button_enabled,
    primary_button_with_icon, styled_button, styled_button_with_icon,
};
use crate::format::{format_precio, format_rango};
use crate::models::inscripcion::{DatosPago, HorarioEstudiante, NuevaInscripcion, SolicitudBaja};
use crate::models::taller::Taller;
use crate::router::Route;
use crate::validation::{FieldErrors, validar_motivo_baja, validar_pago};

const MSG_SIN_USUARIO: &str = "No se pudo identificar al usuario.";

/// Drop request being written.
#[derive(Debug, Default)]
pub struct BajaDialog {
    pub horario_id: i64,
    pub taller_nombre: String,
    pub motivo: String,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct MiHorarioState {
    pub loading: bool,
    pub sending: bool,
    pub horarios: Vec<HorarioEstudiante>,
    pub baja: Option<BajaDialog>,
}

#[derive(Debug, Default)]
pub struct NuevaInscripcionState {
    pub loading: bool,
    pub catalogo: Vec<Taller>,
    pub inscritos: Vec<i64>,
    pub taller_id: Option<i64>,
    pub horario_id: Option<i64>,
    pub mostrar_pago: bool,
    pub pago: DatosPago,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

impl NuevaInscripcionState {
    /// Schedules of the chosen workshop the student is not already in.
    pub fn horarios_disponibles(&self) -> Vec<&crate::models::taller::Horario> {
        self.taller_id
            .and_then(|id| self.catalogo.iter().find(|t| t.id == id))
            .map(|t| t.horarios.iter().filter(|h| !self.inscritos.contains(&h.id)).collect())
            .unwrap_or_default()
    }

    pub fn taller_elegido(&self) -> Option<&Taller> {
        self.taller_id.and_then(|id| self.catalogo.iter().find(|t| t.id == id))
    }
}

fn cliente_id(app: &App) -> Option<i64> {
    app.session.user_info().and_then(|u| u.id)
}

// === My schedule ===

pub fn initialize_horario(app: &mut App) {
    app.mi_horario.baja = None;
    load_horarios(app);
}

fn load_horarios(app: &mut App) {
    app.mi_horario.loading = true;
    let api = app.estudiante_api.clone();
    app.spawn_load(
        async move { api.mis_horarios().await },
        UiMessage::MisHorariosLoaded,
        "No se pudieron cargar los horarios. Por favor, intenta más tarde.",
    );
}

pub fn show_horario(app: &mut App, ui: &mut Ui) {
    let nombre = app
        .session
        .user_info()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    panel_header(ui, "Mi horario");
    ui.label(format!("Hola, {nombre}"));
    ui.add_space(10.0);

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Nueva inscripción").clicked() {
            app.navigate(Route::EstudianteNuevaInscripcion);
        }
        ui.add_space(10.0);
        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Actualizar").clicked() {
            load_horarios(app);
        }
    });
    ui.add_space(15.0);

    if app.mi_horario.loading {
        ui.spinner();
        return;
    }
    if app.mi_horario.horarios.is_empty() {
        ui.weak("Aún no estás inscrito en ningún taller.");
    }

    egui::Grid::new("mi_horario_grid")
        .num_columns(5)
        .striped(true)
        .spacing([16.0, 8.0])
        .show(ui, |ui| {
            ui.strong("Taller");
            ui.strong("Días");
            ui.strong("Hora");
            ui.strong("Profesor");
            ui.strong("");
            ui.end_row();

            for horario in &app.mi_horario.horarios {
                ui.label(&horario.taller.nombre);
                ui.label(&horario.dias_de_clase);
                ui.label(format_rango(&horario.hora_inicio, &horario.hora_fin));
                ui.label(&horario.profesor.nombre_completo);
                if danger_action_button(ui, SIGN_OUT, "Solicitar baja").clicked() {
                    app.mi_horario.baja = Some(BajaDialog {
                        horario_id: horario.id,
                        taller_nombre: horario.taller.nombre.clone(),
                        ..Default::default()
                    });
                }
                ui.end_row();
            }
        });

    if app.mi_horario.baja.is_some() {
        show_baja_dialog(app, ui.ctx());
    }
}

fn show_baja_dialog(app: &mut App, ctx: &egui::Context) {
    let mut enviar = false;
    let mut cancelar = false;

    egui::Window::new("Solicitar baja")
        .collapsible(false)
        .resizable(false)
        .default_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let sending = app.mi_horario.sending;
            let Some(baja) = app.mi_horario.baja.as_mut() else {
                return;
            };
            ui.label(format!("Indica el motivo de la baja para el taller {}:", baja.taller_nombre));
            ui.add_space(6.0);
            ui.add(
                egui::TextEdit::multiline(&mut baja.motivo)
                    .desired_width(360.0)
                    .desired_rows(3),
            );
            form_error(ui, &baja.error);

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if styled_button(ui, "Cancelar").clicked() {
                    cancelar = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_enabled(ui, !sending, "", "Enviar solicitud") {
                        enviar = true;
                    }
                    if sending {
                        ui.spinner();
                    }
                });
            });
        });

    if cancelar {
        app.mi_horario.baja = None;
    } else if enviar {
        solicitar_baja(app);
    }
}

fn solicitar_baja(app: &mut App) {
    let Some(cliente_id) = cliente_id(app) else {
        app.show_error(MSG_SIN_USUARIO);
        app.mi_horario.baja = None;
        return;
    };
    let Some(baja) = app.mi_horario.baja.as_mut() else {
        return;
    };
    if let Err(e) = validar_motivo_baja(&baja.motivo) {
        baja.error = Some(e);
        return;
    }

    let solicitud = SolicitudBaja {
        cliente_id,
        horario_id: baja.horario_id,
        motivo: baja.motivo.trim().to_string(),
    };
    app.mi_horario.sending = true;
    tracing::info!("Drop request for horario {}", solicitud.horario_id);

    let api = app.inscripcion_api.clone();
    app.spawn_op(
        async move { api.solicitar_baja(&solicitud).await },
        |_| UiMessage::BajaSolicitada,
        "Hubo un error al procesar tu solicitud. Por favor, intenta nuevamente.",
    );
}

// === New enrollment ===

pub fn initialize_nueva(app: &mut App) {
    app.nueva_inscripcion = NuevaInscripcionState {
        loading: true,
        ..Default::default()
    };

    if let Some(cliente_id) = cliente_id(app) {
        let api = app.inscripcion_api.clone();
        app.spawn_task(
            async move { api.inscripciones_por_cliente(cliente_id).await },
            UiMessage::InscripcionesClienteLoaded,
            // Without the list nothing is filtered out; the backend still rejects duplicates.
            |_| UiMessage::InscripcionesClienteLoaded(Vec::new()),
        );
    }

    let api = app.inscripcion_api.clone();
    app.spawn_task(
        async move { api.obtener_talleres().await },
        UiMessage::CatalogoEstudianteLoaded,
        |_| UiMessage::NuevaInscripcionFailed("No se pudieron cargar los talleres disponibles.".to_string()),
    );
}

pub fn show_nueva(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Nueva inscripción");
    form_error(ui, &app.nueva_inscripcion.error);

    if app.nueva_inscripcion.loading && app.nueva_inscripcion.catalogo.is_empty() {
        ui.spinner();
        return;
    }

    let state = &mut app.nueva_inscripcion;
    egui::Grid::new("nueva_inscripcion_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            ui.label("Taller:");
            egui::ComboBox::from_id_salt("nueva_inscripcion_taller")
                .width(280.0)
                .selected_text(
                    state
                        .taller_elegido()
                        .map(|t| format!("{} ({})", t.nombre, format_precio(t.precio)))
                        .unwrap_or_else(|| "Selecciona un taller".to_string()),
                )
                .show_ui(ui, |ui| {
                    for taller in &state.catalogo {
                        if ui
                            .selectable_label(state.taller_id == Some(taller.id), &taller.nombre)
                            .clicked()
                        {
                            state.taller_id = Some(taller.id);
                            state.horario_id = None;
                        }
                    }
                });
            ui.end_row();

            ui.label("Horario:");
            let opciones: Vec<(i64, String)> = state
                .horarios_disponibles()
                .into_iter()
                .map(|h| {
                    (
                        h.id,
                        format!(
                            "{} {} ({})",
                            h.dias_de_clase,
                            format_rango(&h.hora_inicio, &h.hora_fin),
                            h.profesor_nombre()
                        ),
                    )
                })
                .collect();
            if state.taller_id.is_some() && opciones.is_empty() {
                ui.weak("No hay horarios disponibles para este taller.");
            } else {
                egui::ComboBox::from_id_salt("nueva_inscripcion_horario")
                    .width(280.0)
                    .selected_text(
                        opciones
                            .iter()
                            .find(|(id, _)| state.horario_id == Some(*id))
                            .map(|(_, text)| text.clone())
                            .unwrap_or_else(|| "Selecciona un horario".to_string()),
                    )
                    .show_ui(ui, |ui| {
                        for (id, text) in &opciones {
                            if ui.selectable_label(state.horario_id == Some(*id), text).clicked() {
                                state.horario_id = Some(*id);
                            }
                        }
                    });
            }
            ui.end_row();
        });

    ui.add_space(15.0);

    if !state.mostrar_pago {
        if primary_button_enabled(ui, state.horario_id.is_some(), CREDIT_CARD, "Continuar al pago") {
            state.mostrar_pago = true;
        }
        return;
    }

    card_frame(ui, |ui| {
        ui.label(RichText::new("Datos de pago").strong());
        if let Some(taller) = state.taller_elegido() {
            ui.label(RichText::new(format!("Total: {}", format_precio(taller.precio))).color(colors::PRIMARY));
        }
        ui.add_space(6.0);
        egui::Grid::new("nueva_inscripcion_pago")
            .num_columns(2)
            .spacing([20.0, 8.0])
            .show(ui, |ui| {
                ui.label("Número de tarjeta:");
                ui.vertical(|ui| {
                    ui.add(egui::TextEdit::singleline(&mut state.pago.numero_tarjeta).desired_width(220.0));
                    field_error(ui, &state.errors, "numero_tarjeta");
                });
                ui.end_row();

                ui.label("Vencimiento:");
                ui.vertical(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut state.pago.fecha_vencimiento)
                            .desired_width(80.0)
                            .hint_text("MM/AA"),
                    );
                    field_error(ui, &state.errors, "fecha_vencimiento");
                });
                ui.end_row();

                ui.label("CVV:");
                ui.vertical(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut state.pago.cvv)
                            .desired_width(60.0)
                            .password(true),
                    );
                    field_error(ui, &state.errors, "cvv");
                });
                ui.end_row();
            });
    });

    ui.add_space(10.0);
    let mut inscribir = false;
    ui.horizontal(|ui| {
        if styled_button(ui, "Cancelar").clicked() {
            state.mostrar_pago = false;
            state.pago = DatosPago::default();
            state.errors.clear();
        }
        ui.add_space(10.0);
        if primary_button_enabled(ui, !state.loading, CREDIT_CARD, "Inscribirme") {
            inscribir = true;
        }
        if state.loading {
            ui.spinner();
        }
    });

    if inscribir {
        inscribirse(app);
    }
}

fn inscribirse(app: &mut App) {
    let state = &mut app.nueva_inscripcion;
    state.error = None;
    state.errors = validar_pago(&state.pago);
    if !state.errors.is_empty() {
        return;
    }
    let Some(horario_id) = state.horario_id else {
        return;
    };
    let Some(cliente_id) = cliente_id(app) else {
        app.nueva_inscripcion.error = Some(MSG_SIN_USUARIO.to_string());
        return;
    };

    app.nueva_inscripcion.loading = true;
    tracing::info!("Student {} enrolling in horario {}", cliente_id, horario_id);

    let api = app.inscripcion_api.clone();
    let inscripcion = NuevaInscripcion { cliente_id, horario_id };
    app.spawn_task(
        async move { api.inscribir(&inscripcion).await },
        |_| UiMessage::NuevaInscripcionHecha,
        |_| {
            UiMessage::NuevaInscripcionFailed("Hubo un error al procesar la inscripción. Inténtalo de nuevo.".to_string())
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::taller::Horario;

    fn horario(id: i64) -> Horario {
        Horario {
            id,
            dias_de_clase: "Martes".to_string(),
            hora_inicio: "16:00:00".to_string(),
            hora_fin: "17:00:00".to_string(),
            fecha_inicio: None,
            vacantes_disponibles: 4,
            profesor: None,
        }
    }

    #[test]
    fn test_horarios_disponibles_skips_enrolled() {
        let state = NuevaInscripcionState {
            catalogo: vec![Taller {
                id: 1,
                nombre: "Dibujo".to_string(),
                precio: 80.0,
                horarios: vec![horario(11), horario(12), horario(13)],
            }],
            inscritos: vec![12],
            taller_id: Some(1),
            ..Default::default()
        };
        let ids: Vec<i64> = state.horarios_disponibles().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![11, 13]);
    }

    #[test]
    fn test_horarios_disponibles_without_taller() {
        let state = NuevaInscripcionState::default();
        assert!(state.horarios_disponibles().is_empty());
        assert!(state.taller_elegido().is_none());
    }
}

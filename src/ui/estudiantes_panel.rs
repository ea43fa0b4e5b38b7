//! Student (cliente) management: registration with workshops, edit and
//! per-schedule enrollment.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, MINUS_CIRCLE, PENCIL, PLUS, TRASH, USER_PLUS};

use super::app::{AdminForm, App, DeleteTarget, UiMessage};
use super::components::{
    action_button, danger_action_button, field_error, form_error, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};
use crate::format::{format_precio, format_rango};
use crate::models::cliente::{ClienteAdmin, ClienteInput, NuevoClienteAdmin};
use crate::models::taller::{Horario, Taller};
use crate::validation::{FieldErrors, validar_email, validar_nombre, validar_telefono};

/// Registration form: contact data plus one schedule per chosen workshop.
#[derive(Debug, Default)]
pub struct NuevoClienteForm {
    pub is_open: bool,
    pub data: NuevoClienteAdmin,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

impl NuevoClienteForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_selected(&self, taller_id: i64) -> bool {
        self.data.talleres_seleccionados.contains_key(&taller_id)
    }

    /// Check or uncheck a workshop; checking picks its first schedule.
    pub fn toggle_taller(&mut self, taller: &Taller, checked: bool) {
        if !checked {
            self.data.talleres_seleccionados.remove(&taller.id);
            return;
        }
        if let Some(first) = taller.horarios.first() {
            self.data.talleres_seleccionados.insert(taller.id, first.id);
        }
    }

    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        self.errors.check("nombre", validar_nombre(&self.data.nombre_completo));
        self.errors.check("email", validar_email(&self.data.correo));
        self.errors.check("telefono", validar_telefono(&self.data.telefono));
        self.errors.is_empty()
    }
}

/// Edit form for an existing cliente.
#[derive(Debug, Default)]
pub struct ClienteForm {
    pub is_open: bool,
    pub id: Option<i64>,
    pub data: ClienteInput,
    pub inscritos: Vec<i64>,
    pub nuevo_taller_id: Option<i64>,
    pub nuevo_horario_id: Option<i64>,
    pub saving: bool,
    /// Enrollment request in flight.
    pub adding: bool,
    pub errors: FieldErrors,
}

impl ClienteForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn edit(cliente: &ClienteAdmin) -> Self {
        Self {
            is_open: true,
            id: Some(cliente.id),
            data: ClienteInput {
                nombre_completo: cliente.nombre_completo.clone(),
                correo: cliente.correo.clone(),
                telefono: cliente.telefono.clone(),
            },
            inscritos: cliente.horarios_inscritos(),
            ..Default::default()
        }
    }

    /// Record a confirmed enrollment. The dialog stays open so several
    /// schedules can be added in a row.
    pub fn inscripcion_agregada(&mut self, cliente_id: i64, horario_id: i64) {
        self.adding = false;
        if self.id != Some(cliente_id) {
            return;
        }
        if !self.inscritos.contains(&horario_id) {
            self.inscritos.push(horario_id);
        }
        if self.nuevo_horario_id == Some(horario_id) {
            self.nuevo_taller_id = None;
            self.nuevo_horario_id = None;
        }
    }

    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        self.errors.check("nombre", validar_nombre(&self.data.nombre_completo));
        self.errors.check("email", validar_email(&self.data.correo));
        self.errors.check("telefono", validar_telefono(&self.data.telefono));
        self.errors.is_empty()
    }
}

/// Workshops that still have a schedule the cliente is not enrolled in,
/// each trimmed to those schedules.
pub fn talleres_para_cliente(talleres: &[Taller], inscritos: &[i64]) -> Vec<Taller> {
    talleres
        .iter()
        .map(|t| Taller {
            horarios: t
                .horarios
                .iter()
                .filter(|h| !inscritos.contains(&h.id))
                .cloned()
                .collect(),
            ..t.clone()
        })
        .filter(|t| !t.horarios.is_empty())
        .collect()
}

fn horario_label(horario: &Horario) -> String {
    format!(
        "{} {} ({})",
        horario.dias_de_clase,
        format_rango(&horario.hora_inicio, &horario.hora_fin),
        horario.profesor_nombre()
    )
}

pub fn initialize(app: &mut App) {
    app.nuevo_cliente_form.reset();
    app.cliente_form.reset();
    app.load_clientes();
    app.load_talleres_disponibles();
}

/// Show the students panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Gestión de estudiantes");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, USER_PLUS, "Registrar cliente").clicked() {
            app.nuevo_cliente_form = NuevoClienteForm {
                is_open: true,
                ..Default::default()
            };
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Actualizar").clicked() {
            app.load_clientes();
            app.load_talleres_disponibles();
        }

        ui.add_space(20.0);

        ui.label("Buscar:");
        ui.add(
            egui::TextEdit::singleline(&mut app.cliente_search)
                .desired_width(200.0)
                .hint_text("Nombre o correo..."),
        );
        if !app.cliente_search.is_empty() && styled_button(ui, "Limpiar").clicked() {
            app.cliente_search.clear();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.nuevo_cliente_form.is_open {
        show_nuevo_dialog(app, ui.ctx());
    }
    if app.cliente_form.is_open {
        show_edit_dialog(app, ui.ctx());
    }
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let search = app.cliente_search.to_lowercase();
    let filtered: Vec<_> = app
        .clientes
        .iter()
        .filter(|c| {
            search.is_empty()
                || c.nombre_completo.to_lowercase().contains(&search)
                || c.correo.to_lowercase().contains(&search)
        })
        .collect();

    ui.label(format!("Mostrando {} de {} clientes", filtered.len(), app.clientes.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("clientes_scroll").show(ui, |ui| {
        egui::Grid::new("clientes_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Nombre");
                ui.strong("Correo");
                ui.strong("Usuario");
                ui.strong("Teléfono");
                ui.strong("Talleres");
                ui.strong("Acciones");
                ui.end_row();

                for cliente in filtered {
                    ui.label(&cliente.nombre_completo);
                    ui.label(&cliente.correo);
                    ui.label(cliente.login_email());
                    ui.label(&cliente.telefono);

                    ui.vertical(|ui| {
                        if cliente.inscripciones.is_empty() {
                            ui.weak("-");
                        }
                        for inscripcion in &cliente.inscripciones {
                            ui.horizontal(|ui| {
                                ui.label(inscripcion.taller_nombre());
                                if let Some(horario_id) = inscripcion.horario_id()
                                    && danger_action_button(ui, MINUS_CIRCLE, "Dar de baja").clicked()
                                {
                                    app.delete_target = Some(DeleteTarget::Inscripcion {
                                        cliente_id: cliente.id,
                                        horario_id,
                                        nombre: inscripcion.taller_nombre().to_string(),
                                    });
                                    app.show_delete_confirm = true;
                                }
                            });
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Editar").clicked() {
                            app.cliente_form = ClienteForm::edit(cliente);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Eliminar").clicked() {
                            app.delete_target = Some(DeleteTarget::Cliente(cliente.id, cliente.nombre_completo.clone()));
                            app.show_delete_confirm = true;
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn contact_fields(ui: &mut Ui, id: &str, nombre: &mut String, correo: &mut String, telefono: &mut String, errors: &FieldErrors) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([20.0, 8.0])
        .show(ui, |ui| {
            ui.label("Nombre completo:");
            ui.vertical(|ui| {
                ui.add(egui::TextEdit::singleline(nombre).desired_width(250.0));
                field_error(ui, errors, "nombre");
            });
            ui.end_row();

            ui.label("Correo:");
            ui.vertical(|ui| {
                ui.add(egui::TextEdit::singleline(correo).desired_width(250.0));
                field_error(ui, errors, "email");
            });
            ui.end_row();

            ui.label("Teléfono:");
            ui.vertical(|ui| {
                ui.add(egui::TextEdit::singleline(telefono).desired_width(150.0));
                field_error(ui, errors, "telefono");
            });
            ui.end_row();
        });
}

fn show_nuevo_dialog(app: &mut App, ctx: &egui::Context) {
    egui::Window::new("Registrar cliente")
        .collapsible(false)
        .resizable(false)
        .default_width(520.0)
        .max_height(600.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);
            form_error(ui, &app.nuevo_cliente_form.error);

            let form = &mut app.nuevo_cliente_form;
            contact_fields(
                ui,
                "nuevo_cliente_grid",
                &mut form.data.nombre_completo,
                &mut form.data.correo,
                &mut form.data.telefono,
                &form.errors,
            );

            ui.add_space(10.0);
            ui.strong("Talleres");
            ui.add_space(5.0);

            if app.talleres_disponibles.is_empty() {
                ui.weak("No hay talleres con horarios disponibles.");
            }

            ScrollArea::vertical().max_height(280.0).show(ui, |ui| {
                for taller in &app.talleres_disponibles {
                    let mut checked = form.is_selected(taller.id);
                    ui.horizontal(|ui| {
                        let label = format!("{} ({})", taller.nombre, format_precio(taller.precio));
                        if ui
                            .add_enabled(!taller.horarios.is_empty(), egui::Checkbox::new(&mut checked, label))
                            .changed()
                        {
                            form.toggle_taller(taller, checked);
                        }
                    });

                    if let Some(selected) = form.data.talleres_seleccionados.get(&taller.id).copied() {
                        ui.indent(("nuevo_cliente_horarios", taller.id), |ui| {
                            for horario in &taller.horarios {
                                if ui.radio(selected == horario.id, horario_label(horario)).clicked() {
                                    form.data.talleres_seleccionados.insert(taller.id, horario.id);
                                }
                            }
                        });
                    }
                }
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancelar").clicked() {
                    app.nuevo_cliente_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, PLUS, "Registrar").clicked() {
                        save_nuevo_cliente(app);
                    }
                });
            });
        });
}

fn save_nuevo_cliente(app: &mut App) {
    if !app.nuevo_cliente_form.validate() {
        return;
    }

    let data = app.nuevo_cliente_form.data.clone();
    let api = app.admin_api.clone();
    tracing::info!(
        "Registering cliente {} with {} talleres",
        data.correo,
        data.talleres_seleccionados.len()
    );
    // The form stays open until the backend answers; ClienteCreado resets it.
    app.nuevo_cliente_form.error = None;
    app.spawn_op(
        async move { api.create_cliente(&data).await },
        UiMessage::ClienteCreado,
        "Error al registrar el cliente",
    );
}

fn show_edit_dialog(app: &mut App, ctx: &egui::Context) {
    let mut add_inscripcion = false;

    egui::Window::new("Editar cliente")
        .collapsible(false)
        .resizable(false)
        .default_width(520.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let form = &mut app.cliente_form;
            contact_fields(
                ui,
                "editar_cliente_grid",
                &mut form.data.nombre_completo,
                &mut form.data.correo,
                &mut form.data.telefono,
                &form.errors,
            );

            ui.add_space(10.0);
            ui.separator();
            ui.strong("Agregar inscripción");
            ui.add_space(5.0);

            let disponibles = talleres_para_cliente(&app.talleres_disponibles, &form.inscritos);
            if disponibles.is_empty() {
                ui.weak("No quedan horarios disponibles para este cliente.");
            } else {
                let taller_sel = form.nuevo_taller_id.and_then(|id| disponibles.iter().find(|t| t.id == id));

                ui.horizontal(|ui| {
                    egui::ComboBox::from_id_salt("cliente_nuevo_taller")
                        .width(200.0)
                        .selected_text(taller_sel.map(|t| t.nombre.as_str()).unwrap_or("Taller..."))
                        .show_ui(ui, |ui| {
                            for taller in &disponibles {
                                if ui
                                    .selectable_label(form.nuevo_taller_id == Some(taller.id), &taller.nombre)
                                    .clicked()
                                {
                                    form.nuevo_taller_id = Some(taller.id);
                                    form.nuevo_horario_id = None;
                                }
                            }
                        });

                    if let Some(taller) = taller_sel {
                        egui::ComboBox::from_id_salt("cliente_nuevo_horario")
                            .width(240.0)
                            .selected_text(
                                form.nuevo_horario_id
                                    .and_then(|id| taller.horario(id))
                                    .map(horario_label)
                                    .unwrap_or_else(|| "Horario...".to_string()),
                            )
                            .show_ui(ui, |ui| {
                                for horario in &taller.horarios {
                                    if ui
                                        .selectable_label(form.nuevo_horario_id == Some(horario.id), horario_label(horario))
                                        .clicked()
                                    {
                                        form.nuevo_horario_id = Some(horario.id);
                                    }
                                }
                            });
                    }

                    if form.adding {
                        ui.spinner();
                    } else if form.nuevo_horario_id.is_some() && action_button(ui, PLUS, "Inscribir").clicked() {
                        add_inscripcion = true;
                    }
                });
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancelar").clicked() {
                    app.cliente_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if app.cliente_form.saving {
                        ui.spinner();
                    } else if primary_button_with_icon(ui, "", "Guardar").clicked() {
                        save_cliente(app);
                    }
                });
            });
        });

    if add_inscripcion {
        agregar_inscripcion(app);
    }
}

pub(crate) fn save_cliente(app: &mut App) {
    if !app.cliente_form.validate() {
        return;
    }
    let Some(id) = app.cliente_form.id else {
        return;
    };

    let data = app.cliente_form.data.clone();
    let api = app.admin_api.clone();
    app.cliente_form.saving = true;

    tracing::info!("Updating cliente {}", id);
    app.spawn_op(
        async move { api.update_cliente(id, &data).await },
        |_| UiMessage::FormSaved(AdminForm::Cliente, "Cliente actualizado exitosamente".to_string()),
        "Error al actualizar el cliente",
    );
}

pub(crate) fn agregar_inscripcion(app: &mut App) {
    let (Some(cliente_id), Some(horario_id)) = (app.cliente_form.id, app.cliente_form.nuevo_horario_id) else {
        return;
    };

    app.cliente_form.adding = true;

    let api = app.admin_api.clone();
    tracing::info!("Enrolling cliente {} in horario {}", cliente_id, horario_id);
    app.spawn_op(
        async move { api.add_inscripcion(cliente_id, horario_id).await },
        move |_| UiMessage::InscripcionAgregada { cliente_id, horario_id },
        "Error al agregar inscripción",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horario(id: i64) -> Horario {
        Horario {
            id,
            dias_de_clase: "Lunes".to_string(),
            hora_inicio: "10:00:00".to_string(),
            hora_fin: "11:00:00".to_string(),
            fecha_inicio: None,
            vacantes_disponibles: 5,
            profesor: None,
        }
    }

    fn catalogo() -> Vec<Taller> {
        vec![
            Taller {
                id: 1,
                nombre: "Guitarra".to_string(),
                precio: 150.0,
                horarios: vec![horario(11), horario(12)],
            },
            Taller {
                id: 2,
                nombre: "Canto".to_string(),
                precio: 100.0,
                horarios: vec![horario(21)],
            },
        ]
    }

    #[test]
    fn test_talleres_para_cliente_excludes_enrolled() {
        let disponibles = talleres_para_cliente(&catalogo(), &[11, 21]);
        assert_eq!(disponibles.len(), 1);
        assert_eq!(disponibles[0].id, 1);
        assert_eq!(disponibles[0].horarios.len(), 1);
        assert_eq!(disponibles[0].horarios[0].id, 12);
    }

    #[test]
    fn test_toggle_taller_picks_first_schedule() {
        let talleres = catalogo();
        let mut form = NuevoClienteForm::default();
        form.toggle_taller(&talleres[0], true);
        assert_eq!(form.data.talleres_seleccionados.get(&1), Some(&11));

        form.toggle_taller(&talleres[0], false);
        assert!(!form.is_selected(1));
    }

    #[test]
    fn test_nuevo_cliente_validation() {
        let mut form = NuevoClienteForm::default();
        assert!(!form.validate());
        assert!(form.errors.is_invalid("email"));

        form.data.nombre_completo = "Luis Ramos".to_string();
        form.data.correo = "luis@mail.pe".to_string();
        form.data.telefono = "987654321".to_string();
        assert!(form.validate());
    }

    #[test]
    fn test_edit_collects_enrolled_schedules() {
        let cliente: ClienteAdmin = serde_json::from_value(serde_json::json!({
            "id": 5, "nombreCompleto": "Ana", "correo": "ana@mail.pe", "telefono": "999888777",
            "inscripciones": [{"horario": {"id": 11}}]
        }))
        .unwrap();
        let form = ClienteForm::edit(&cliente);
        assert_eq!(form.id, Some(5));
        assert_eq!(form.inscritos, vec![11]);
    }

    #[test]
    fn test_confirmed_enrollment_hides_schedule() {
        let mut form = ClienteForm {
            is_open: true,
            id: Some(4),
            nuevo_taller_id: Some(1),
            nuevo_horario_id: Some(11),
            adding: true,
            ..Default::default()
        };

        form.inscripcion_agregada(9, 11);
        assert!(form.inscritos.is_empty());
        assert!(!form.adding);

        form.inscripcion_agregada(4, 11);
        assert_eq!(form.inscritos, vec![11]);
        assert_eq!(form.nuevo_horario_id, None);
        let ids: Vec<i64> = talleres_para_cliente(&catalogo(), &form.inscritos)[0]
            .horarios
            .iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(ids, vec![12]);
    }
}

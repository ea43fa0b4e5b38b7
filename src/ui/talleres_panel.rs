//! Workshop management panel: workshops and their schedules.

use chrono::{Local, NaiveDate};
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CALENDAR_PLUS, IMAGE, PENCIL, PLUS, TRASH};

use super::app::{AdminForm, App, DeleteTarget, UiMessage, UploadTarget};
use super::components::{
    action_button, card_frame, colors, danger_action_button, form_error, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};
use crate::format::{format_fecha, format_hora, format_precio, format_rango};
use crate::models::taller::{Horario, HorarioInput, TallerDto, TallerInput};
use crate::validation::{validar_horario, validar_taller};

/// Days a schedule can meet on.
pub const DIAS_SEMANA: [&str; 5] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes"];

/// Workshop form state.
#[derive(Debug, Default)]
pub struct TallerForm {
    pub is_open: bool,
    pub is_editing: bool,
    pub id: Option<i64>,
    pub data: TallerInput,
    pub uploading: bool,
    pub saving: bool,
    pub error: Option<String>,
}

impl TallerForm {
    pub fn new_taller() -> Self {
        Self {
            is_open: true,
            data: TallerInput {
                activo: true,
                duracion_semanas: 8,
                clases_por_semana: 2,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn edit(taller: &TallerDto) -> Self {
        Self {
            is_open: true,
            is_editing: true,
            id: Some(taller.id),
            data: TallerInput::from(taller),
            ..Default::default()
        }
    }
}

/// Schedule form state.
#[derive(Debug)]
pub struct HorarioForm {
    pub is_open: bool,
    pub id: Option<i64>,
    pub taller_id: Option<i64>,
    pub taller_nombre: String,
    pub profesor_id: Option<i64>,
    pub dias: Vec<String>,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub fecha_inicio: NaiveDate,
    pub vacantes: i32,
    pub saving: bool,
    pub error: Option<String>,
}

impl Default for HorarioForm {
    fn default() -> Self {
        Self {
            is_open: false,
            id: None,
            taller_id: None,
            taller_nombre: String::new(),
            profesor_id: None,
            dias: Vec::new(),
            hora_inicio: String::new(),
            hora_fin: String::new(),
            fecha_inicio: Local::now().date_naive(),
            vacantes: 15,
            saving: false,
            error: None,
        }
    }
}

impl HorarioForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn for_taller(taller: &TallerDto) -> Self {
        Self {
            is_open: true,
            taller_id: Some(taller.id),
            taller_nombre: taller.nombre.clone(),
            ..Default::default()
        }
    }

    pub fn edit(taller: &TallerDto, horario: &Horario) -> Self {
        let mut form = Self::for_taller(taller);
        form.id = Some(horario.id);
        form.profesor_id = horario.profesor.as_ref().and_then(|p| p.id);
        form.dias = horario
            .dias_de_clase
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from)
            .collect();
        form.hora_inicio = format_hora(&horario.hora_inicio);
        form.hora_fin = format_hora(&horario.hora_fin);
        if let Some(fecha) = horario.fecha_inicio {
            form.fecha_inicio = fecha;
        }
        form.vacantes = horario.vacantes_disponibles;
        form
    }

    /// Add or remove a day, keeping week order.
    pub fn toggle_dia(&mut self, dia: &str) {
        if self.dias.iter().any(|d| d == dia) {
            self.dias.retain(|d| d != dia);
        } else {
            self.dias.push(dia.to_string());
            self.dias
                .sort_by_key(|d| DIAS_SEMANA.iter().position(|w| w == d).unwrap_or(DIAS_SEMANA.len()));
        }
    }

    /// Validated request body.
    pub fn to_input(&self) -> Result<HorarioInput, String> {
        validar_horario(
            self.taller_id,
            self.profesor_id,
            &self.dias,
            &self.hora_inicio,
            &self.hora_fin,
            self.vacantes,
        )?;
        match (self.taller_id, self.profesor_id) {
            (Some(taller_id), Some(profesor_id)) => Ok(HorarioInput {
                taller_id,
                profesor_id,
                dias_de_clase: self.dias.clone(),
                hora_inicio: self.hora_inicio.trim().to_string(),
                hora_fin: self.hora_fin.trim().to_string(),
                fecha_inicio: self.fecha_inicio,
                vacantes_disponibles: self.vacantes,
            }),
            _ => Err("Por favor completa todos los campos del horario".to_string()),
        }
    }
}

pub fn initialize(app: &mut App) {
    app.taller_form.reset();
    app.horario_form.reset();
    app.load_talleres();
    app.load_profesores();
}

/// Show the workshops panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Gestión de talleres");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Nuevo taller").clicked() {
            app.taller_form = TallerForm::new_taller();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Actualizar").clicked() {
            app.load_talleres();
        }
    });

    ui.add_space(15.0);

    if app.talleres.is_empty() {
        if app.is_loading {
            ui.spinner();
        } else {
            ui.weak("No hay talleres registrados.");
        }
    }

    ScrollArea::vertical().id_salt("talleres_admin_scroll").show(ui, |ui| {
        for taller in &app.talleres {
            card_frame(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&taller.nombre).strong().size(16.0));
                    ui.label(format_precio(taller.precio));
                    if !taller.activo {
                        ui.colored_label(colors::NEUTRAL, "(inactivo)");
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if danger_action_button(ui, TRASH, "Eliminar taller").clicked() {
                            app.delete_target = Some(DeleteTarget::Taller(taller.id, taller.nombre.clone()));
                            app.show_delete_confirm = true;
                        }
                        if action_button(ui, PENCIL, "Editar taller").clicked() {
                            app.taller_form = TallerForm::edit(taller);
                        }
                        if action_button(ui, CALENDAR_PLUS, "Añadir horario").clicked() {
                            app.horario_form = HorarioForm::for_taller(taller);
                        }
                    });
                });

                ui.weak(format!(
                    "{} semanas, {} clases por semana",
                    taller.duracion_semanas, taller.clases_por_semana
                ));

                if taller.horarios.is_empty() {
                    ui.weak("Sin horarios definidos");
                    return;
                }

                ui.add_space(6.0);
                egui::Grid::new(("horarios_grid", taller.id))
                    .num_columns(6)
                    .striped(true)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.strong("Días");
                        ui.strong("Hora");
                        ui.strong("Inicio");
                        ui.strong("Profesor");
                        ui.strong("Vacantes");
                        ui.strong("");
                        ui.end_row();

                        for horario in &taller.horarios {
                            ui.label(&horario.dias_de_clase);
                            ui.label(format_rango(&horario.hora_inicio, &horario.hora_fin));
                            ui.label(horario.fecha_inicio.map(format_fecha).unwrap_or_else(|| "-".to_string()));
                            ui.label(horario.profesor_nombre());
                            ui.label(horario.vacantes_disponibles.to_string());
                            ui.horizontal(|ui| {
                                if action_button(ui, PENCIL, "Editar horario").clicked() {
                                    app.horario_form = HorarioForm::edit(taller, horario);
                                }
                                if danger_action_button(ui, TRASH, "Eliminar horario").clicked() {
                                    app.delete_target = Some(DeleteTarget::Horario(
                                        horario.id,
                                        format!("{} ({})", horario.dias_de_clase, taller.nombre),
                                    ));
                                    app.show_delete_confirm = true;
                                }
                            });
                            ui.end_row();
                        }
                    });
            });
            ui.add_space(10.0);
        }
    });

    if app.taller_form.is_open {
        show_taller_dialog(app, ui.ctx());
    }
    if app.horario_form.is_open {
        show_horario_dialog(app, ui.ctx());
    }
}

fn show_taller_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.taller_form.is_editing {
        "Editar taller"
    } else {
        "Nuevo taller"
    };
    let mut upload = None;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(480.0)
        .max_height(560.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);
            form_error(ui, &app.taller_form.error);

            let form = &mut app.taller_form;
            ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                egui::Grid::new("taller_form_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Nombre:");
                        ui.add(egui::TextEdit::singleline(&mut form.data.nombre).desired_width(260.0));
                        ui.end_row();

                        ui.label("Descripción:");
                        ui.add(
                            egui::TextEdit::multiline(&mut form.data.descripcion)
                                .desired_width(260.0)
                                .desired_rows(3),
                        );
                        ui.end_row();

                        ui.label("Duración (semanas):");
                        ui.add(egui::DragValue::new(&mut form.data.duracion_semanas).range(1..=52));
                        ui.end_row();

                        ui.label("Clases por semana:");
                        ui.add(egui::DragValue::new(&mut form.data.clases_por_semana).range(1..=7));
                        ui.end_row();

                        ui.label("Precio (S/):");
                        ui.add(
                            egui::DragValue::new(&mut form.data.precio)
                                .range(0.0..=10_000.0)
                                .speed(1.0)
                                .fixed_decimals(2),
                        );
                        ui.end_row();

                        ui.label("Imagen del taller:");
                        ui.horizontal(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut form.data.imagen_taller).desired_width(200.0));
                            if !form.uploading && action_button(ui, IMAGE, "Subir imagen").clicked() {
                                upload = Some(UploadTarget::ImagenTaller);
                            }
                        });
                        ui.end_row();

                        ui.label("Imagen de portada:");
                        ui.horizontal(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut form.data.imagen_inicio).desired_width(200.0));
                            if !form.uploading && action_button(ui, IMAGE, "Subir imagen").clicked() {
                                upload = Some(UploadTarget::ImagenInicioTaller);
                            }
                        });
                        ui.end_row();

                        ui.label("Temas:");
                        ui.add(
                            egui::TextEdit::multiline(&mut form.data.temas)
                                .desired_width(260.0)
                                .desired_rows(3)
                                .hint_text("Un tema por línea"),
                        );
                        ui.end_row();

                        ui.label("Activo:");
                        ui.checkbox(&mut form.data.activo, "");
                        ui.end_row();
                    });
            });

            if form.uploading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.colored_label(colors::WARNING, "Subiendo imagen...");
                });
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancelar").clicked() {
                    app.taller_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if app.taller_form.saving {
                        ui.spinner();
                    } else if !app.taller_form.uploading && primary_button_with_icon(ui, "", "Guardar").clicked() {
                        save_taller(app);
                    }
                });
            });
        });

    if let Some(target) = upload {
        app.upload_image(target);
    }
}

fn save_taller(app: &mut App) {
    if let Err(e) = validar_taller(&app.taller_form.data) {
        app.taller_form.error = Some(e);
        return;
    }

    let data = app.taller_form.data.clone();
    let id = app.taller_form.id;
    let api = app.admin_api.clone();
    app.taller_form.saving = true;
    app.taller_form.error = None;

    match id {
        Some(id) => {
            tracing::info!("Updating taller {}", id);
            let nombre = data.nombre.clone();
            app.spawn_op(
                async move { api.update_taller(id, &data).await },
                move |_| UiMessage::FormSaved(AdminForm::Taller, format!("Taller \"{nombre}\" actualizado")),
                "No se pudo actualizar el taller",
            );
        }
        None => {
            tracing::info!("Creating taller {}", data.nombre);
            let nombre = data.nombre.clone();
            app.spawn_op(
                async move { api.create_taller(&data).await },
                move |_| UiMessage::FormSaved(AdminForm::Taller, format!("Taller \"{nombre}\" registrado exitosamente")),
                "No se pudo registrar el taller",
            );
        }
    }
}

fn show_horario_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.horario_form.id.is_some() {
        "Editar horario"
    } else {
        "Nuevo horario"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);
            form_error(ui, &app.horario_form.error);

            let form = &mut app.horario_form;
            egui::Grid::new("horario_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Taller:");
                    ui.strong(&form.taller_nombre);
                    ui.end_row();

                    ui.label("Profesor:");
                    egui::ComboBox::from_id_salt("horario_form_profesor")
                        .width(250.0)
                        .selected_text(
                            form.profesor_id
                                .and_then(|id| app.profesores.iter().find(|p| p.id == id))
                                .map(|p| p.nombre_completo.as_str())
                                .unwrap_or("Seleccionar..."),
                        )
                        .show_ui(ui, |ui| {
                            for profesor in &app.profesores {
                                if ui
                                    .selectable_label(form.profesor_id == Some(profesor.id), &profesor.nombre_completo)
                                    .clicked()
                                {
                                    form.profesor_id = Some(profesor.id);
                                }
                            }
                        });
                    ui.end_row();

                    ui.label("Días:");
                    ui.horizontal_wrapped(|ui| {
                        for dia in DIAS_SEMANA {
                            let mut checked = form.dias.iter().any(|d| d == dia);
                            if ui.checkbox(&mut checked, dia).changed() {
                                form.toggle_dia(dia);
                            }
                        }
                    });
                    ui.end_row();

                    ui.label("Hora inicio:");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.hora_inicio)
                            .desired_width(80.0)
                            .hint_text("HH:MM"),
                    );
                    ui.end_row();

                    ui.label("Hora fin:");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.hora_fin)
                            .desired_width(80.0)
                            .hint_text("HH:MM"),
                    );
                    ui.end_row();

                    ui.label("Fecha de inicio:");
                    ui.add(egui_extras::DatePickerButton::new(&mut form.fecha_inicio).id_salt("horario_fecha_inicio"));
                    ui.end_row();

                    ui.label("Vacantes:");
                    ui.add(egui::DragValue::new(&mut form.vacantes).range(0..=200));
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancelar").clicked() {
                    app.horario_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if app.horario_form.saving {
                        ui.spinner();
                    } else if primary_button_with_icon(ui, "", "Guardar").clicked() {
                        save_horario(app);
                    }
                });
            });
        });
}

fn save_horario(app: &mut App) {
    let input = match app.horario_form.to_input() {
        Ok(input) => input,
        Err(e) => {
            app.horario_form.error = Some(e);
            return;
        }
    };

    let id = app.horario_form.id;
    let taller_nombre = app.horario_form.taller_nombre.clone();
    let api = app.admin_api.clone();
    app.horario_form.saving = true;
    app.horario_form.error = None;

    match id {
        Some(id) => {
            tracing::info!("Updating horario {}", id);
            app.spawn_op(
                async move { api.update_horario(id, &input).await },
                |_| UiMessage::FormSaved(AdminForm::Horario, "Horario actualizado".to_string()),
                "No se pudo actualizar el horario",
            );
        }
        None => {
            tracing::info!("Adding horario to taller {}", input.taller_id);
            app.spawn_op(
                async move { api.create_horario(&input).await },
                move |_| UiMessage::FormSaved(AdminForm::Horario, format!("Horario añadido al taller \"{taller_nombre}\"")),
                "No se pudo crear el horario",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::taller::ProfesorRef;

    fn taller() -> TallerDto {
        serde_json::from_value(serde_json::json!({
            "id": 3, "nombre": "Cerámica", "precio": 120.0, "descripcion": "Torno"
        }))
        .unwrap()
    }

    fn horario() -> Horario {
        Horario {
            id: 30,
            dias_de_clase: "Miércoles, Lunes".to_string(),
            hora_inicio: "18:00:00".to_string(),
            hora_fin: "19:30:00".to_string(),
            fecha_inicio: NaiveDate::from_ymd_opt(2025, 3, 3),
            vacantes_disponibles: 10,
            profesor: Some(ProfesorRef {
                id: Some(7),
                nombre_completo: "Rosa".to_string(),
            }),
        }
    }

    #[test]
    fn test_edit_horario_prefills_fields() {
        let form = HorarioForm::edit(&taller(), &horario());
        assert_eq!(form.id, Some(30));
        assert_eq!(form.taller_id, Some(3));
        assert_eq!(form.profesor_id, Some(7));
        assert_eq!(form.dias, vec!["Miércoles", "Lunes"]);
        assert_eq!(form.hora_inicio, "18:00");
        assert_eq!(form.fecha_inicio, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
    }

    #[test]
    fn test_toggle_dia_keeps_week_order() {
        let mut form = HorarioForm::for_taller(&taller());
        form.toggle_dia("Viernes");
        form.toggle_dia("Lunes");
        form.toggle_dia("Miércoles");
        assert_eq!(form.dias, vec!["Lunes", "Miércoles", "Viernes"]);

        form.toggle_dia("Lunes");
        assert_eq!(form.dias, vec!["Miércoles", "Viernes"]);
    }

    #[test]
    fn test_to_input_requires_profesor() {
        let mut form = HorarioForm::for_taller(&taller());
        form.toggle_dia("Martes");
        form.hora_inicio = "10:00".to_string();
        form.hora_fin = "11:00".to_string();
        assert_eq!(
            form.to_input().unwrap_err(),
            "Por favor completa todos los campos del horario"
        );

        form.profesor_id = Some(7);
        let input = form.to_input().unwrap();
        assert_eq!(input.dias_de_clase, vec!["Martes"]);
        assert_eq!(input.vacantes_disponibles, 15);
    }

    #[test]
    fn test_new_taller_defaults() {
        let form = TallerForm::new_taller();
        assert!(form.is_open && !form.is_editing);
        assert!(form.data.activo);
        assert!(validar_taller(&form.data).is_err());
    }
}

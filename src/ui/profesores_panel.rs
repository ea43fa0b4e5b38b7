//! Teacher management panel with CRUD and photo upload.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, IMAGE, PENCIL, PLUS, TRASH};

use super::app::{AdminForm, App, DeleteTarget, UiMessage, UploadTarget};
use super::components::{
    action_button, colors, danger_action_button, form_error, panel_header, primary_button_with_icon, styled_button,
    styled_button_with_icon,
};
use crate::models::profesor::{ProfesorDto, ProfesorInput};
use crate::validation::{validar_email, validar_nombre};

/// Teacher form state.
#[derive(Debug, Default)]
pub struct ProfesorForm {
    pub is_open: bool,
    pub is_editing: bool,
    pub id: Option<i64>,
    pub data: ProfesorInput,
    pub uploading: bool,
    /// Request in flight; the dialog stays open until it succeeds.
    pub saving: bool,
    pub error: Option<String>,
}

impl ProfesorForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn edit(profesor: &ProfesorDto) -> Self {
        Self {
            is_open: true,
            is_editing: true,
            id: Some(profesor.id),
            data: ProfesorInput::from(profesor),
            ..Default::default()
        }
    }

    /// Field checks before the form is sent.
    pub fn validate(&self) -> Result<(), String> {
        validar_nombre(&self.data.nombre_completo)?;
        if !self.data.correo.trim().is_empty() {
            validar_email(&self.data.correo)?;
        }
        Ok(())
    }
}

pub fn initialize(app: &mut App) {
    app.profesor_form.reset();
    app.load_profesores();
}

/// Show the teachers panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Gestión de profesores");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Nuevo profesor").clicked() {
            app.profesor_form = ProfesorForm {
                is_open: true,
                ..Default::default()
            };
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Actualizar").clicked() {
            app.load_profesores();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.profesor_form.is_open {
        show_form_dialog(app, ui.ctx());
    }
}

fn show_table(app: &mut App, ui: &mut Ui) {
    if app.profesores.is_empty() {
        if app.is_loading {
            ui.spinner();
        } else {
            ui.weak("No hay profesores registrados.");
        }
        return;
    }

    ui.label(format!("{} profesores", app.profesores.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("profesores_scroll").show(ui, |ui| {
        egui::Grid::new("profesores_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Nombre");
                ui.strong("Correo");
                ui.strong("Teléfono");
                ui.strong("Foto");
                ui.strong("Acciones");
                ui.end_row();

                for profesor in &app.profesores {
                    ui.label(&profesor.nombre_completo);
                    ui.label(profesor.correo.as_deref().unwrap_or("-"));
                    ui.label(profesor.telefono.as_deref().unwrap_or("-"));

                    match profesor.foto_url.as_deref().filter(|f| !f.is_empty()) {
                        Some(foto) => {
                            ui.add(
                                egui::Image::new(app.public_api.profesor_image_url(foto))
                                    .fit_to_exact_size(egui::vec2(40.0, 40.0))
                                    .corner_radius(20),
                            );
                        }
                        None => {
                            ui.weak("-");
                        }
                    }

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Editar").clicked() {
                            app.profesor_form = ProfesorForm::edit(profesor);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Eliminar").clicked() {
                            app.delete_target = Some(DeleteTarget::Profesor(profesor.id, profesor.nombre_completo.clone()));
                            app.show_delete_confirm = true;
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.profesor_form.is_editing {
        "Editar profesor"
    } else {
        "Nuevo profesor"
    };
    let mut upload = false;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(450.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);
            form_error(ui, &app.profesor_form.error);

            let form = &mut app.profesor_form;
            egui::Grid::new("profesor_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Nombre completo:");
                    ui.add(egui::TextEdit::singleline(&mut form.data.nombre_completo).desired_width(250.0));
                    ui.end_row();

                    ui.label("Correo:");
                    ui.add(egui::TextEdit::singleline(&mut form.data.correo).desired_width(250.0));
                    ui.end_row();

                    ui.label("Teléfono:");
                    ui.add(egui::TextEdit::singleline(&mut form.data.telefono).desired_width(150.0));
                    ui.end_row();

                    ui.label("Foto:");
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut form.data.foto_url)
                                .desired_width(180.0)
                                .hint_text("images/foto.jpg"),
                        );
                        if form.uploading {
                            ui.spinner();
                        } else if action_button(ui, IMAGE, "Subir foto").clicked() {
                            upload = true;
                        }
                    });
                    ui.end_row();

                    ui.label("Información:");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.data.informacion)
                            .desired_width(250.0)
                            .desired_rows(4),
                    );
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancelar").clicked() {
                    app.profesor_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if app.profesor_form.uploading {
                        ui.colored_label(colors::WARNING, "Subiendo imagen...");
                    } else if app.profesor_form.saving {
                        ui.spinner();
                    } else if primary_button_with_icon(ui, "", "Guardar").clicked() {
                        save_profesor(app);
                    }
                });
            });
        });

    if upload {
        app.upload_image(UploadTarget::FotoProfesor);
    }
}

pub(crate) fn save_profesor(app: &mut App) {
    if let Err(e) = app.profesor_form.validate() {
        app.profesor_form.error = Some(e);
        return;
    }

    let data = app.profesor_form.data.clone();
    let id = app.profesor_form.id;
    let api = app.admin_api.clone();
    app.profesor_form.saving = true;
    app.profesor_form.error = None;

    match id {
        Some(id) => {
            tracing::info!("Updating profesor {}", id);
            app.spawn_op(
                async move { api.update_profesor(id, &data).await },
                |_| UiMessage::FormSaved(AdminForm::Profesor, "Profesor actualizado correctamente".to_string()),
                "No se pudo actualizar el profesor",
            );
        }
        None => {
            tracing::info!("Creating profesor {}", data.nombre_completo);
            app.spawn_op(
                async move { api.create_profesor(&data).await },
                |_| UiMessage::FormSaved(AdminForm::Profesor, "Profesor registrado correctamente".to_string()),
                "No se pudo registrar el profesor",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> ProfesorDto {
        ProfesorDto {
            id: 4,
            nombre_completo: "Rosa Quispe".to_string(),
            correo: Some("rosa@talleres.pe".to_string()),
            telefono: None,
            foto_url: Some("images/rosa.jpg".to_string()),
            informacion: None,
        }
    }

    #[test]
    fn test_edit_fills_form() {
        let form = ProfesorForm::edit(&dto());
        assert!(form.is_open && form.is_editing);
        assert_eq!(form.id, Some(4));
        assert_eq!(form.data.foto_url, "images/rosa.jpg");
        assert_eq!(form.data.telefono, "");
    }

    #[test]
    fn test_validate_requires_name_and_valid_email() {
        let mut form = ProfesorForm::edit(&dto());
        assert!(form.validate().is_ok());

        form.data.correo = "rosa".to_string();
        assert!(form.validate().is_err());

        form.data.correo.clear();
        assert!(form.validate().is_ok());

        form.data.nombre_completo.clear();
        assert!(form.validate().is_err());
    }
}

//! Contact form.

use eframe::egui::{self, Ui};
use egui_phosphor::regular::PAPER_PLANE_TILT;

use super::app::{App, UiMessage};
use super::components::{colors, form_error, panel_header, primary_button_enabled};
use crate::models::contenido::ContactoForm;
use crate::validation::validar_contacto;

#[derive(Debug, Default)]
pub struct ContactoState {
    pub form: ContactoForm,
    pub sending: bool,
    pub enviado: bool,
    pub error: Option<String>,
}

pub fn initialize(app: &mut App) {
    app.contacto.enviado = false;
    app.contacto.error = None;
}

pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Contacto");

    if app.contacto.enviado {
        ui.colored_label(colors::SUCCESS, "¡Gracias! Tu mensaje ha sido enviado exitosamente.");
        ui.add_space(10.0);
    }
    form_error(ui, &app.contacto.error);

    let form = &mut app.contacto.form;
    egui::Grid::new("contacto_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            ui.label("Nombre:");
            ui.add(egui::TextEdit::singleline(&mut form.nombre).desired_width(300.0));
            ui.end_row();

            ui.label("Correo:");
            ui.add(egui::TextEdit::singleline(&mut form.correo).desired_width(300.0));
            ui.end_row();

            ui.label("Asunto:");
            ui.add(egui::TextEdit::singleline(&mut form.asunto).desired_width(300.0));
            ui.end_row();

            ui.label("Mensaje:");
            ui.add(
                egui::TextEdit::multiline(&mut form.mensaje)
                    .desired_width(300.0)
                    .desired_rows(6),
            );
            ui.end_row();
        });

    ui.add_space(15.0);
    ui.horizontal(|ui| {
        let sending = app.contacto.sending;
        if primary_button_enabled(ui, !sending, PAPER_PLANE_TILT, "Enviar") {
            enviar(app);
        }
        if sending {
            ui.spinner();
        }
    });
}

fn enviar(app: &mut App) {
    app.contacto.enviado = false;
    app.contacto.error = None;
    if let Err(e) = validar_contacto(&app.contacto.form) {
        app.contacto.error = Some(e);
        return;
    }

    app.contacto.sending = true;
    let form = app.contacto.form.clone();
    let api = app.public_api.clone();
    app.spawn_task(
        async move { api.enviar_contacto(&form).await },
        |_| UiMessage::ContactoEnviado,
        |_| UiMessage::ContactoFailed("Hubo un error al enviar tu mensaje. Por favor, inténtalo de nuevo.".to_string()),
    );
}

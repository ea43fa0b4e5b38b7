//! Settings window for the backend connection and banner timings.

use eframe::egui::{self, RichText};
use egui_phosphor::regular::{FLOPPY_DISK, PLUGS_CONNECTED};

use super::app::{App, UiMessage};
use super::components::{colors, form_error, styled_button, styled_button_with_icon};
use crate::api::ApiClient;
use crate::api::public::PublicApi;
use crate::config::AppConfig;

/// Draft being edited; only written back on save.
#[derive(Debug, Default)]
pub struct SettingsState {
    pub is_open: bool,
    pub draft: AppConfig,
    pub modified: bool,
    pub connection_status: Option<bool>,
    pub testing: bool,
    pub error: Option<String>,
    /// Saved but not yet in effect until restart.
    pub restart_pending: bool,
}

impl SettingsState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            draft: config.clone(),
            ..Default::default()
        }
    }

    pub fn open(&mut self, config: &AppConfig) {
        self.draft = config.clone();
        self.is_open = true;
        self.modified = false;
        self.connection_status = None;
        self.error = None;
    }
}

pub fn show(app: &mut App, ctx: &egui::Context) {
    if !app.settings.is_open {
        return;
    }

    let mut is_open = true;
    let mut save = false;
    let mut test = false;

    egui::Window::new("Configuración")
        .open(&mut is_open)
        .collapsible(false)
        .resizable(false)
        .default_width(460.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let state = &mut app.settings;

            ui.group(|ui| {
                ui.heading("Servidor");
                ui.add_space(5.0);

                egui::Grid::new("api_settings_grid")
                    .num_columns(2)
                    .spacing([10.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("URL del backend:");
                        if ui
                            .add(egui::TextEdit::singleline(&mut state.draft.api.base_url).desired_width(260.0))
                            .changed()
                        {
                            state.modified = true;
                            state.connection_status = None;
                        }
                        ui.end_row();

                        ui.label("Tiempo de espera (s):");
                        if ui
                            .add(egui::DragValue::new(&mut state.draft.api.timeout_secs).range(1..=300))
                            .changed()
                        {
                            state.modified = true;
                        }
                        ui.end_row();
                    });

                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!state.testing, |ui| {
                        if styled_button_with_icon(ui, PLUGS_CONNECTED, "Probar conexión").clicked() {
                            test = true;
                        }
                    });
                    if state.testing {
                        ui.spinner();
                    }
                    match state.connection_status {
                        Some(true) => {
                            ui.label(RichText::new("Conectado").color(colors::SUCCESS));
                        }
                        Some(false) => {
                            ui.label(RichText::new("Sin conexión").color(colors::ERROR));
                        }
                        None => {}
                    }
                });
            });

            ui.add_space(10.0);

            ui.group(|ui| {
                ui.heading("Avisos (segundos en pantalla)");
                ui.add_space(5.0);

                let ui_config = &mut state.draft.ui;
                egui::Grid::new("ui_settings_grid")
                    .num_columns(2)
                    .spacing([10.0, 8.0])
                    .show(ui, |ui| {
                        for (label, secs) in [
                            ("Profesores:", &mut ui_config.profesores_banner_secs),
                            ("Talleres:", &mut ui_config.talleres_banner_secs),
                            ("Estudiantes:", &mut ui_config.estudiantes_banner_secs),
                            ("Credenciales nuevas:", &mut ui_config.credenciales_banner_secs),
                        ] {
                            ui.label(label);
                            if ui.add(egui::DragValue::new(secs).range(1..=60)).changed() {
                                state.modified = true;
                            }
                            ui.end_row();
                        }
                    });
            });

            ui.add_space(10.0);
            form_error(ui, &state.error);
            if state.restart_pending {
                ui.label(
                    RichText::new("Los cambios del servidor se aplican al reiniciar la aplicación.")
                        .color(colors::WARNING)
                        .italics(),
                );
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.add_enabled_ui(state.modified, |ui| {
                    if styled_button_with_icon(ui, FLOPPY_DISK, "Guardar").clicked() {
                        save = true;
                    }
                });
                if state.modified {
                    ui.label(RichText::new("(cambios sin guardar)").color(colors::WARNING).italics());
                }
                if styled_button(ui, "Valores por defecto").clicked() {
                    state.draft = AppConfig {
                        storage: state.draft.storage.clone(),
                        ..AppConfig::default()
                    };
                    state.modified = true;
                    state.connection_status = None;
                }
            });
        });

    if test {
        test_connection(app);
    }
    if save {
        save_config(app);
    }
    if !is_open {
        app.settings.is_open = false;
    }
}

fn test_connection(app: &mut App) {
    let client = match ApiClient::new(&app.settings.draft.api) {
        Ok(client) => client,
        Err(e) => {
            app.settings.connection_status = Some(false);
            app.settings.error = Some(e.to_string());
            return;
        }
    };
    app.settings.testing = true;
    app.settings.connection_status = None;
    app.settings.error = None;

    let api = PublicApi::new(client);
    app.spawn_task(
        async move { api.talleres_activos().await },
        |_| UiMessage::ConexionProbada(true),
        |_| UiMessage::ConexionProbada(false),
    );
}

fn save_config(app: &mut App) {
    let draft = app.settings.draft.clone();
    if let Err(e) = draft.validate() {
        app.settings.error = Some(e.to_string());
        return;
    }
    if let Err(e) = draft.save(&app.config_path) {
        tracing::error!("Failed to save config: {}", e);
        app.settings.error = Some(format!("No se pudo guardar la configuración: {e}"));
        return;
    }

    tracing::info!("Configuration saved to {}", app.config_path.display());
    if draft.api.base_url != app.config.api.base_url || draft.api.timeout_secs != app.config.api.timeout_secs {
        app.settings.restart_pending = true;
    }
    app.config = draft;
    app.settings.modified = false;
    app.settings.error = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_discards_previous_draft() {
        let config = AppConfig::default();
        let mut state = SettingsState::from_config(&config);
        state.draft.api.base_url = "http://otro:9000".to_string();
        state.modified = true;
        state.connection_status = Some(false);

        state.open(&config);
        assert!(state.is_open);
        assert!(!state.modified);
        assert_eq!(state.draft.api.base_url, config.api.base_url);
        assert!(state.connection_status.is_none());
    }
}

//! Login and password recovery panels.

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::{ENVELOPE, KEY, SIGN_IN};

use super::app::{App, UiMessage};
use super::components::{card_frame, colors, field_error, form_error, panel_header, primary_button_enabled};
use crate::error::AppError;
use crate::models::auth::LoginRequest;
use crate::router::Route;
use crate::validation::{FieldErrors, validar_login, validar_password};

const MSG_CREDENCIALES: &str = "Email o contraseña incorrectos. Por favor, verifica tus credenciales.";
const MSG_SIN_CONEXION: &str = "No se pudo conectar con el servidor. Verifica tu conexión a internet.";
const MSG_INESPERADO: &str = "Ocurrió un error inesperado. Por favor, intenta nuevamente.";

#[derive(Debug, Default)]
pub struct LoginForm {
    pub credentials: LoginRequest,
    pub errors: FieldErrors,
    pub loading: bool,
    pub error: Option<String>,
    /// Notice carried over from the password reset.
    pub info: Option<String>,
}

#[derive(Debug, Default)]
pub struct ForgotForm {
    pub email: String,
    pub token: String,
    pub new_password: String,
    pub code_sent: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub info: Option<String>,
}

impl ForgotForm {
    /// Checks for the second step.
    pub fn validate_reset(&self) -> Result<(), String> {
        if self.token.trim().is_empty() || self.new_password.is_empty() {
            return Err("Todos los campos son obligatorios.".to_string());
        }
        validar_password(&self.new_password)
    }
}

/// Message for a failed login.
pub fn mensaje_login(err: &AppError) -> String {
    match err.status() {
        Some(401) => MSG_CREDENCIALES,
        Some(0) => MSG_SIN_CONEXION,
        _ => MSG_INESPERADO,
    }
    .to_string()
}

pub fn initialize_login(app: &mut App) {
    if app.session.is_authenticated() {
        app.session.redirect_by_role();
        return;
    }
    app.login_form.credentials.password.clear();
    app.login_form.errors.clear();
    app.login_form.error = None;
    app.login_form.loading = false;
}

pub fn initialize_forgot(app: &mut App) {
    app.forgot_form = ForgotForm {
        email: app.login_form.credentials.email.clone(),
        ..Default::default()
    };
}

pub fn show_login(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Iniciar sesión");

    ui.vertical_centered(|ui| {
        ui.set_max_width(420.0);
        card_frame(ui, |ui| {
            if let Some(info) = &app.login_form.info {
                ui.colored_label(colors::SUCCESS, info);
                ui.add_space(6.0);
            }
            form_error(ui, &app.login_form.error);

            let form = &mut app.login_form;
            let mut submit = false;
            egui::Grid::new("login_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Correo:");
                    ui.vertical(|ui| {
                        ui.add(egui::TextEdit::singleline(&mut form.credentials.email).desired_width(240.0));
                        field_error(ui, &form.errors, "email");
                    });
                    ui.end_row();

                    ui.label("Contraseña:");
                    ui.vertical(|ui| {
                        let resp = ui.add(
                            egui::TextEdit::singleline(&mut form.credentials.password)
                                .desired_width(240.0)
                                .password(true),
                        );
                        if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            submit = true;
                        }
                        field_error(ui, &form.errors, "password");
                    });
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.horizontal(|ui| {
                let loading = app.login_form.loading;
                if primary_button_enabled(ui, !loading, SIGN_IN, "Ingresar") {
                    submit = true;
                }
                if loading {
                    ui.spinner();
                }
                ui.add_space(10.0);
                if ui.link("¿Olvidaste tu contraseña?").clicked() {
                    app.navigate(Route::ForgotPassword);
                }
            });

            if submit && !app.login_form.loading {
                iniciar_sesion(app);
            }
        });
    });
}

fn iniciar_sesion(app: &mut App) {
    app.login_form.error = None;
    app.login_form.info = None;
    app.login_form.errors = validar_login(&app.login_form.credentials);
    if !app.login_form.errors.is_empty() {
        return;
    }

    let credentials = LoginRequest {
        email: app.login_form.credentials.email.trim().to_string(),
        password: app.login_form.credentials.password.clone(),
    };
    app.login_form.loading = true;
    tracing::info!("Logging in as {}", credentials.email);

    let session = app.session.clone();
    app.spawn_task(
        async move { session.login(&credentials).await },
        UiMessage::LoginSucceeded,
        |e| UiMessage::LoginFailed(mensaje_login(&e)),
    );
}

pub fn show_forgot(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Recuperar contraseña");

    ui.vertical_centered(|ui| {
        ui.set_max_width(440.0);
        card_frame(ui, |ui| {
            if let Some(info) = &app.forgot_form.info {
                ui.colored_label(colors::SUCCESS, info);
                ui.add_space(6.0);
            }
            form_error(ui, &app.forgot_form.error);

            let form = &mut app.forgot_form;
            egui::Grid::new("forgot_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Correo:");
                    ui.add_enabled(
                        !form.code_sent,
                        egui::TextEdit::singleline(&mut form.email).desired_width(240.0),
                    );
                    ui.end_row();

                    if form.code_sent {
                        ui.label("Código:");
                        ui.add(egui::TextEdit::singleline(&mut form.token).desired_width(240.0));
                        ui.end_row();

                        ui.label("Nueva contraseña:");
                        ui.add(
                            egui::TextEdit::singleline(&mut form.new_password)
                                .desired_width(240.0)
                                .password(true),
                        );
                        ui.end_row();
                    }
                });

            ui.add_space(15.0);
            ui.horizontal(|ui| {
                let loading = app.forgot_form.loading;
                if app.forgot_form.code_sent {
                    if primary_button_enabled(ui, !loading, KEY, "Restablecer contraseña") {
                        restablecer(app);
                    }
                } else if primary_button_enabled(ui, !loading, ENVELOPE, "Enviar código") {
                    solicitar_codigo(app);
                }
                if loading {
                    ui.spinner();
                }
            });

            ui.add_space(10.0);
            if ui.link(RichText::new("Volver al inicio de sesión").size(13.0)).clicked() {
                app.navigate(Route::Login);
            }
        });
    });
}

fn solicitar_codigo(app: &mut App) {
    app.forgot_form.error = None;
    app.forgot_form.info = None;
    let email = app.forgot_form.email.trim().to_string();
    if email.is_empty() {
        app.forgot_form.error = Some("Por favor, ingresa tu correo electrónico.".to_string());
        return;
    }

    app.forgot_form.loading = true;
    let session = app.session.clone();
    app.spawn_task(
        async move { session.forgot_password(&email).await },
        |_| UiMessage::ResetCodeSent,
        |e| UiMessage::PasswordFailed(e.user_message("Error al solicitar la recuperación.")),
    );
}

fn restablecer(app: &mut App) {
    app.forgot_form.error = None;
    app.forgot_form.info = None;
    if let Err(e) = app.forgot_form.validate_reset() {
        app.forgot_form.error = Some(e);
        return;
    }

    app.forgot_form.loading = true;
    let token = app.forgot_form.token.trim().to_string();
    let password = app.forgot_form.new_password.clone();
    let session = app.session.clone();
    app.spawn_task(
        async move { session.reset_password(&token, &password).await },
        |_| UiMessage::PasswordReset,
        |e| UiMessage::PasswordFailed(e.user_message("Error al restablecer la contraseña.")),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mensaje_login_by_status() {
        let unauthorized = AppError::Status {
            status: 401,
            message: Some("Bad credentials".to_string()),
        };
        assert_eq!(mensaje_login(&unauthorized), MSG_CREDENCIALES);
        assert_eq!(mensaje_login(&AppError::Network("refused".to_string())), MSG_SIN_CONEXION);

        let server = AppError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(mensaje_login(&server), MSG_INESPERADO);
    }

    #[test]
    fn test_reset_requires_code_and_long_password() {
        let mut form = ForgotForm {
            code_sent: true,
            ..Default::default()
        };
        assert_eq!(form.validate_reset().unwrap_err(), "Todos los campos son obligatorios.");

        form.token = "123456".to_string();
        form.new_password = "abc".to_string();
        assert!(form.validate_reset().is_err());

        form.new_password = "abcdef".to_string();
        assert!(form.validate_reset().is_ok());
    }
}

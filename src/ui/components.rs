//! Shared UI components.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, CornerRadius, Margin, Response, RichText, Sense, StrokeKind, Ui};

use crate::store::Paso;
use crate::validation::FieldErrors;

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(70, 130, 220);
}

/// Render a clickable navigation card with dynamic size.
///
/// Returns the response which can be checked for `.clicked()`.
pub fn nav_card(ui: &mut Ui, title: &str, description: &str, icon: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);
        let scale = size.x / 200.0;

        ui.painter().rect_filled(rect, 8.0, visuals.bg_fill);
        ui.painter()
            .rect_stroke(rect, 8.0, visuals.bg_stroke, StrokeKind::Outside);

        let icon_pos = egui::pos2(rect.center().x, rect.top() + size.y * 0.25);
        ui.painter().text(
            icon_pos,
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(34.0 * scale),
            visuals.text_color(),
        );

        let title_pos = egui::pos2(rect.center().x, rect.center().y + size.y * 0.07);
        ui.painter().text(
            title_pos,
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(17.0 * scale),
            visuals.text_color(),
        );

        let desc_pos = egui::pos2(rect.center().x, rect.bottom() - size.y * 0.17);
        ui.painter().text(
            desc_pos,
            egui::Align2::CENTER_CENTER,
            description,
            egui::FontId::proportional(12.0 * scale),
            ui.visuals().weak_text_color(),
        );
    }

    response
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui, label: &str) -> bool {
    ui.button(RichText::new(format!("< {label}")).size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

pub fn styled_button(ui: &mut Ui, label: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(label).size(14.0)).min_size(egui::vec2(80.0, 28.0)))
}

pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, label: &str) -> Response {
    styled_button(ui, &format!("{icon} {label}"))
}

/// Filled button for the main action of a form.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, label: &str) -> Response {
    let text = if icon.is_empty() {
        label.to_string()
    } else {
        format!("{icon} {label}")
    };
    ui.add(
        egui::Button::new(RichText::new(text).size(14.0).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(100.0, 28.0)),
    )
}

/// Same as `primary_button_with_icon` but greyed out while `enabled` is false.
pub fn primary_button_enabled(ui: &mut Ui, enabled: bool, icon: &str, label: &str) -> bool {
    ui.add_enabled_ui(enabled, |ui| primary_button_with_icon(ui, icon, label))
        .inner
        .clicked()
}

/// Small icon button used in table rows.
pub fn action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(14.0)).frame(false))
        .on_hover_text(tooltip)
}

pub fn danger_action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(14.0).color(colors::ERROR)).frame(false))
        .on_hover_text(tooltip)
}

/// Message under a form field, if that field is invalid.
pub fn field_error(ui: &mut Ui, errors: &FieldErrors, field: &str) {
    if let Some(msg) = errors.get(field) {
        ui.colored_label(colors::ERROR, RichText::new(msg).size(12.0));
    }
}

/// Inline error text for forms without per-field messages.
pub fn form_error(ui: &mut Ui, error: &Option<String>) {
    if let Some(msg) = error {
        ui.colored_label(colors::ERROR, msg);
        ui.add_space(6.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Panel-level notice. Success banners expire, errors stay until dismissed.
#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    expires_at: Option<Instant>,
}

impl Banner {
    pub fn success(text: impl Into<String>, secs: u64) -> Self {
        Self {
            kind: BannerKind::Success,
            text: text.into(),
            expires_at: Some(Instant::now() + Duration::from_secs(secs)),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            text: text.into(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Time left before a success banner disappears.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at.map(|at| at.saturating_duration_since(now))
    }
}

/// Render a banner. Returns true when the user dismissed it.
pub fn banner(ui: &mut Ui, banner: &Banner) -> bool {
    let color = match banner.kind {
        BannerKind::Success => colors::SUCCESS,
        BannerKind::Error => colors::ERROR,
    };
    let mut dismissed = false;

    egui::Frame::new()
        .stroke(egui::Stroke::new(1.0, color))
        .inner_margin(Margin::same(10))
        .corner_radius(CornerRadius::same(6))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(color, &banner.text);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button(egui_phosphor::regular::X).clicked() {
                        dismissed = true;
                    }
                });
            });
        });
    ui.add_space(10.0);

    dismissed
}

/// Three-step progress bar of the sign-up wizard.
pub fn wizard_progress(ui: &mut Ui, paso: Paso) {
    ui.horizontal(|ui| {
        for n in 1..=Paso::TOTAL {
            let Some(step) = Paso::from_numero(n) else { continue };
            let reached = step <= paso;
            let color = if reached { colors::PRIMARY } else { colors::NEUTRAL };
            ui.label(
                RichText::new(format!("{n}. {}", step.titulo()))
                    .color(color)
                    .strong(),
            );
            if n < Paso::TOTAL {
                ui.add_space(12.0);
            }
        }
    });
    ui.add(
        egui::ProgressBar::new(paso.progreso())
            .desired_width(ui.available_width().min(600.0))
            .fill(colors::PRIMARY),
    );
    ui.add_space(15.0);
}

/// Open a file dialog restricted to uploadable images.
pub fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Imágenes", &["png", "jpg", "jpeg", "webp", "gif"])
        .pick_file()
}

/// Framed block used for catalog entries.
pub fn card_frame<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .corner_radius(CornerRadius::same(8))
        .show(ui, add_contents)
        .inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_banner_never_expires() {
        let banner = Banner::error("fallo");
        let later = Instant::now() + Duration::from_secs(3600);
        assert!(!banner.is_expired(later));
        assert!(banner.remaining(later).is_none());
    }

    #[test]
    fn test_success_banner_expires() {
        let banner = Banner::success("guardado", 3);
        let now = Instant::now();
        assert!(!banner.is_expired(now));
        assert!(banner.is_expired(now + Duration::from_secs(4)));
        assert!(banner.remaining(now).is_some_and(|d| d <= Duration::from_secs(3)));
    }
}

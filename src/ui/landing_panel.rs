//! Public pages: home, workshops, teachers, blog, about, and fallbacks.

use chrono::Local;
use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::{
    ARTICLE, CALENDAR, CHALKBOARD_TEACHER, CLOCK, ENVELOPE, HOURGLASS, PAINT_BRUSH, USER, USERS, WARNING,
};

use super::app::{App, UiMessage};
use super::components::{card_frame, colors, nav_card, panel_header, primary_button_with_icon};
use crate::format::{dias_restantes, format_fecha, format_precio, format_rango};
use crate::models::contenido::Noticia;
use crate::models::profesor::ProfesorPublico;
use crate::models::taller::{TallerDetallado, TallerSimple};
use crate::router::Route;

/// Cached public content.
#[derive(Debug, Default)]
pub struct LandingState {
    pub loading: bool,
    pub talleres_activos: Vec<TallerSimple>,
    pub talleres_detallados: Vec<TallerDetallado>,
    pub profesores: Vec<ProfesorPublico>,
    pub noticias: Vec<Noticia>,
    pub noticia_abierta: Option<Noticia>,
}

pub fn initialize_inicio(app: &mut App) {
    app.landing.loading = true;
    let api = app.public_api.clone();
    app.spawn_load(
        async move { api.talleres_activos().await },
        UiMessage::TalleresActivosLoaded,
        "No se pudieron cargar los talleres.",
    );
}

pub fn initialize_talleres(app: &mut App) {
    app.landing.loading = true;
    let api = app.public_api.clone();
    app.spawn_load(
        async move { api.talleres_detallados().await },
        UiMessage::TalleresDetalladosLoaded,
        "No se pudieron cargar los talleres.",
    );
}

pub fn initialize_profesores(app: &mut App) {
    app.landing.loading = true;
    let api = app.public_api.clone();
    app.spawn_load(
        async move { api.profesores().await },
        UiMessage::ProfesoresPublicosLoaded,
        "No se pudieron cargar los profesores.",
    );
}

pub fn initialize_blog(app: &mut App) {
    app.landing.loading = true;
    app.landing.noticia_abierta = None;
    let api = app.public_api.clone();
    app.spawn_load(
        async move { api.noticias().await },
        UiMessage::NoticiasLoaded,
        "No se pudieron cargar las noticias.",
    );
}

fn abrir_noticia(app: &mut App, id: i64) {
    let api = app.public_api.clone();
    app.spawn_load(
        async move { api.noticia(id).await },
        UiMessage::NoticiaLoaded,
        "No se pudo cargar la noticia.",
    );
}

/// Home page.
pub fn show_inicio(app: &mut App, ui: &mut Ui) {
    ui.add_space(10.0);
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new("Talleres de arte y música").size(30.0));
        ui.label("Aprende con profesores dedicados, en grupos pequeños y a tu ritmo.");
    });
    ui.add_space(25.0);

    let mut next = None;
    let card_size = egui::vec2(200.0, 140.0);
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(20.0, 20.0);
        if nav_card(ui, "Talleres", "Horarios y precios", PAINT_BRUSH, card_size).clicked() {
            next = Some(Route::Talleres);
        }
        if nav_card(ui, "Profesores", "Conoce al equipo", CHALKBOARD_TEACHER, card_size).clicked() {
            next = Some(Route::Profesores);
        }
        if nav_card(ui, "Inscríbete", "En tres pasos", USERS, card_size).clicked() {
            next = Some(Route::DatosPersonales);
        }
        if nav_card(ui, "Contacto", "Escríbenos", ENVELOPE, card_size).clicked() {
            next = Some(Route::Contacto);
        }
    });

    ui.add_space(25.0);
    ui.heading("Talleres activos");
    ui.add_space(10.0);

    if app.landing.loading && app.landing.talleres_activos.is_empty() {
        ui.spinner();
    } else if app.landing.talleres_activos.is_empty() {
        ui.weak("Pronto anunciaremos nuevos talleres.");
    }

    ui.horizontal_wrapped(|ui| {
        for taller in &app.landing.talleres_activos {
            card_frame(ui, |ui| {
                ui.set_width(220.0);
                if !taller.imagen_inicio.is_empty() {
                    ui.add(
                        egui::Image::new(app.public_api.taller_image_url(&taller.imagen_inicio))
                            .fit_to_exact_size(egui::vec2(220.0, 120.0))
                            .corner_radius(6),
                    );
                }
                ui.label(RichText::new(&taller.nombre).strong().size(16.0));
                ui.weak(format!(
                    "{} semanas · {} clases por semana",
                    taller.duracion_semanas, taller.clases_por_semana
                ));
                ui.label(RichText::new(format_precio(taller.precio)).color(colors::PRIMARY));
            });
        }
    });

    if let Some(route) = next {
        app.navigate(route);
    }
}

/// Workshops with their open schedules.
pub fn show_talleres(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Nuestros talleres");

    if app.landing.loading && app.landing.talleres_detallados.is_empty() {
        ui.spinner();
        return;
    }

    let hoy = Local::now().date_naive();
    let mut inscribirse = false;

    for taller in &app.landing.talleres_detallados {
        card_frame(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                if !taller.imagen_taller.is_empty() {
                    ui.add(
                        egui::Image::new(app.public_api.taller_image_url(&taller.imagen_taller))
                            .fit_to_exact_size(egui::vec2(180.0, 120.0))
                            .corner_radius(6),
                    );
                    ui.add_space(10.0);
                }
                ui.vertical(|ui| {
                    ui.label(RichText::new(&taller.nombre).strong().size(18.0));
                    ui.label(&taller.descripcion);
                    ui.label(format!(
                        "{} semanas · {} clases por semana · {}",
                        taller.duracion_semanas,
                        taller.clases_por_semana,
                        format_precio(taller.precio)
                    ));
                    let temas: Vec<&str> = taller.temas.lines().map(str::trim).filter(|t| !t.is_empty()).collect();
                    if !temas.is_empty() {
                        ui.weak(format!("Temas: {}", temas.join(", ")));
                    }
                });
            });

            ui.add_space(8.0);
            if taller.horarios_abiertos.is_empty() {
                let texto = if taller.tiene_horarios_definidos {
                    "Sin vacantes por ahora"
                } else {
                    "Horarios por definir"
                };
                ui.colored_label(colors::NEUTRAL, texto);
                return;
            }

            egui::Grid::new(("horarios_publicos", taller.id))
                .num_columns(5)
                .striped(true)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for horario in &taller.horarios_abiertos {
                        ui.label(format!("{CALENDAR} {}", horario.dias_de_clase));
                        ui.label(format!("{CLOCK} {}", format_rango(&horario.hora_inicio, &horario.hora_fin)));
                        ui.label(format!("{USER} {}", horario.profesor_nombre()));
                        match horario.fecha_inicio {
                            Some(fecha) => ui.label(format!(
                                "{HOURGLASS} Inicia {} (faltan {} días)",
                                format_fecha(fecha),
                                dias_restantes(fecha, hoy)
                            )),
                            None => ui.weak("Fecha por confirmar"),
                        };
                        ui.label(format!("{} vacantes", horario.vacantes_disponibles));
                        ui.end_row();
                    }
                });

            ui.add_space(6.0);
            if primary_button_with_icon(ui, USERS, "Inscribirme").clicked() {
                inscribirse = true;
            }
        });
        ui.add_space(10.0);
    }

    if inscribirse {
        app.navigate(Route::DatosPersonales);
    }
}

/// Public teacher list.
pub fn show_profesores(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Nuestros profesores");

    if app.landing.loading && app.landing.profesores.is_empty() {
        ui.spinner();
        return;
    }

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(15.0, 15.0);
        for profesor in &app.landing.profesores {
            card_frame(ui, |ui| {
                ui.set_width(240.0);
                ui.vertical_centered(|ui| {
                    let foto = app.public_api.profesor_image_url(&profesor.foto_url);
                    if foto.is_empty() {
                        ui.label(RichText::new(USER).size(64.0).color(colors::NEUTRAL));
                    } else {
                        ui.add(
                            egui::Image::new(foto)
                                .fit_to_exact_size(egui::vec2(120.0, 120.0))
                                .corner_radius(60),
                        );
                    }
                    ui.label(RichText::new(&profesor.nombre_completo).strong().size(16.0));
                    if !profesor.telefono.is_empty() {
                        ui.weak(&profesor.telefono);
                    }
                    ui.label(&profesor.informacion);
                });
            });
        }
    });
}

/// News list and the selected article.
pub fn show_blog(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Blog");

    if let Some(noticia) = &app.landing.noticia_abierta {
        let mut cerrar = false;
        if ui.button("< Todas las noticias").clicked() {
            cerrar = true;
        }
        ui.add_space(10.0);
        ui.heading(&noticia.titulo);
        if !noticia.imagen_url.is_empty() {
            ui.add(egui::Image::new(app.public_api.taller_image_url(&noticia.imagen_url)).max_width(600.0));
        }
        ui.add_space(10.0);
        ui.label(&noticia.contenido);
        if cerrar {
            app.landing.noticia_abierta = None;
        }
        return;
    }

    if app.landing.loading && app.landing.noticias.is_empty() {
        ui.spinner();
        return;
    }
    if app.landing.noticias.is_empty() {
        ui.weak("No hay noticias publicadas.");
    }

    let mut abrir = None;
    for noticia in &app.landing.noticias {
        card_frame(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(format!("{ARTICLE} {}", noticia.titulo)).strong().size(16.0));
            let resumen: String = noticia.contenido.chars().take(200).collect();
            ui.label(resumen);
            if ui.link("Leer más").clicked() {
                abrir = Some(noticia.id);
            }
        });
        ui.add_space(8.0);
    }

    if let Some(id) = abrir {
        abrir_noticia(app, id);
    }
}

pub fn show_acerca(ui: &mut Ui) {
    panel_header(ui, "Acerca de nosotros");
    ui.label(
        "Somos un centro de talleres de arte y música con grupos reducidos y profesores con \
         experiencia. Nuestros cursos combinan teoría y práctica para que avances desde la primera clase.",
    );
    ui.add_space(10.0);
    ui.label("Ofrecemos horarios por la tarde de lunes a viernes y nuevas fechas de inicio cada mes.");
}

/// Logged-in teachers have no area of their own yet.
pub fn show_profesor_area(ui: &mut Ui) {
    panel_header(ui, "Mi horario");
    ui.weak("El área de profesores estará disponible próximamente.");
}

pub fn show_not_found(app: &mut App, ui: &mut Ui) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(WARNING).size(48.0).color(colors::WARNING));
        ui.heading("Página no encontrada");
        ui.add_space(10.0);
        if ui.button("Volver al inicio").clicked() {
            app.navigate(Route::Inicio);
        }
    });
}

//! Main application UI.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use eframe::egui::{self, Align, Layout, RichText};
use egui_phosphor::regular::{GEAR, SIGN_IN, SIGN_OUT};
use tokio::sync::mpsc;

use crate::api::{AdminApi, ApiClient, AuthApi, EstudianteApi, InscripcionApi, PublicApi, UploadApi};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::models::auth::{Role, UserInfo};
use crate::models::cliente::{Cliente, ClienteAdmin, ClienteCreado, InscripcionAdmin};
use crate::models::contenido::{Noticia, UploadResponse};
use crate::models::inscripcion::{HorarioEstudiante, InscripcionResponse};
use crate::models::profesor::{ProfesorDto, ProfesorPublico};
use crate::models::taller::{Taller, TallerDetallado, TallerDto, TallerSimple};
use crate::router::{ChannelNavigator, Navigator, Route};
use crate::store::{
    CredentialHandoff, EnrollmentWizard, FileSessionStorage, MemorySessionStorage, SessionStorage, SessionStore,
};

use super::auth_panel::{ForgotForm, LoginForm};
use super::components::{self, Banner, colors};
use super::contacto_panel::ContactoState;
use super::estudiante_panel::{MiHorarioState, NuevaInscripcionState};
use super::estudiantes_panel::{ClienteForm, NuevoClienteForm};
use super::inscripcion_panel::{ConfirmacionState, DatosForm, PagoForm, SeleccionState};
use super::landing_panel::LandingState;
use super::profesores_panel::ProfesorForm;
use super::settings_panel::SettingsState;
use super::talleres_panel::{HorarioForm, TallerForm};
use super::{
    auth_panel, contacto_panel, estudiante_panel, estudiantes_panel, inscripcion_panel, landing_panel,
    profesores_panel, settings_panel, talleres_panel,
};

/// Admin area a successful write belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seccion {
    Profesores,
    Talleres,
    Estudiantes,
}

/// Admin dialog a save was sent from. It stays open until the backend
/// confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminForm {
    Profesor,
    Taller,
    Horario,
    Cliente,
}

impl AdminForm {
    pub fn seccion(self) -> Seccion {
        match self {
            Self::Profesor => Seccion::Profesores,
            Self::Taller | Self::Horario => Seccion::Talleres,
            Self::Cliente => Seccion::Estudiantes,
        }
    }
}

/// Form field an uploaded image goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    FotoProfesor,
    ImagenTaller,
    ImagenInicioTaller,
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Public content
    TalleresActivosLoaded(Vec<TallerSimple>),
    TalleresDetalladosLoaded(Vec<TallerDetallado>),
    ProfesoresPublicosLoaded(Vec<ProfesorPublico>),
    NoticiasLoaded(Vec<Noticia>),
    NoticiaLoaded(Noticia),
    ContactoEnviado,
    ContactoFailed(String),

    // Authentication
    LoginSucceeded(UserInfo),
    LoginFailed(String),
    ResetCodeSent,
    PasswordReset,
    PasswordFailed(String),

    // Sign-up wizard
    ClienteRegistrado(Cliente),
    RegistroFailed(String),
    CatalogoLoaded(Vec<Taller>),
    CatalogoFailed(String),
    InscripcionConfirmada(InscripcionResponse),
    PagoFailed(String),

    // Admin
    ProfesoresLoaded(Vec<ProfesorDto>),
    TalleresLoaded(Vec<TallerDto>),
    ClientesLoaded(Vec<ClienteAdmin>),
    TalleresDisponiblesLoaded(Vec<Taller>),
    AdminSaved(Seccion, String),
    FormSaved(AdminForm, String),
    InscripcionAgregada { cliente_id: i64, horario_id: i64 },
    ClienteCreado(ClienteCreado),
    ImagenSubida(UploadTarget, UploadResponse),

    // Student area
    MisHorariosLoaded(Vec<HorarioEstudiante>),
    BajaSolicitada,
    InscripcionesClienteLoaded(Vec<InscripcionAdmin>),
    CatalogoEstudianteLoaded(Vec<Taller>),
    NuevaInscripcionHecha,
    NuevaInscripcionFailed(String),

    ConexionProbada(bool),
    LoadError(String),
    OperationFailed(String),
}

/// Target for delete confirmation dialog.
#[derive(Clone)]
pub enum DeleteTarget {
    Profesor(i64, String),
    Taller(i64, String),
    Horario(i64, String),
    Cliente(i64, String),
    Inscripcion { cliente_id: i64, horario_id: i64, nombre: String },
    /// Drop a workshop from the wizard selection (no backend call).
    TallerSeleccionado(i64, String),
}

/// Main application state.
pub struct App {
    pub rt: tokio::runtime::Runtime,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,
    nav_rx: mpsc::UnboundedReceiver<Route>,

    // Navigation
    pub current_route: Route,

    // Configuration
    pub config: AppConfig,
    pub config_path: PathBuf,

    // Backend
    pub admin_api: AdminApi,
    pub inscripcion_api: InscripcionApi,
    pub public_api: PublicApi,
    pub estudiante_api: EstudianteApi,
    pub upload_api: UploadApi,

    // Stores
    pub session: Arc<SessionStore>,
    pub wizard: Arc<EnrollmentWizard>,
    pub handoff: Arc<CredentialHandoff>,

    // Cached admin data
    pub profesores: Vec<ProfesorDto>,
    pub talleres: Vec<TallerDto>,
    pub clientes: Vec<ClienteAdmin>,
    pub talleres_disponibles: Vec<Taller>,
    pub is_loading: bool,

    // Panel state
    pub landing: LandingState,
    pub contacto: ContactoState,
    pub login_form: LoginForm,
    pub forgot_form: ForgotForm,
    pub datos_form: DatosForm,
    pub seleccion: SeleccionState,
    pub pago_form: PagoForm,
    pub confirmacion: ConfirmacionState,
    pub profesor_form: ProfesorForm,
    pub taller_form: TallerForm,
    pub horario_form: HorarioForm,
    pub cliente_form: ClienteForm,
    pub nuevo_cliente_form: NuevoClienteForm,
    pub mi_horario: MiHorarioState,
    pub nueva_inscripcion: NuevaInscripcionState,
    pub settings: SettingsState,

    // Search/filter state
    pub cliente_search: String,

    // Dialogs
    pub banner: Option<Banner>,
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
}

impl App {
    pub fn new(config: AppConfig, config_path: PathBuf, rt: tokio::runtime::Runtime) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (navigator, nav_rx) = ChannelNavigator::new();
        let navigator: Arc<dyn Navigator> = Arc::new(navigator);

        let client = ApiClient::new(&config.api)?;
        let session = Arc::new(SessionStore::open(
            session_storage(&config),
            AuthApi::new(client.clone()),
            navigator.clone(),
        ));
        if let Err(e) = session.restore() {
            tracing::warn!("Could not restore session: {}", e);
        }

        let settings = SettingsState::from_config(&config);
        let mut app = Self {
            rt,
            tx,
            rx,
            nav_rx,
            current_route: Route::default(),
            config,
            config_path,
            admin_api: AdminApi::new(client.clone()),
            inscripcion_api: InscripcionApi::new(client.clone()),
            public_api: PublicApi::new(client.clone()),
            estudiante_api: EstudianteApi::new(client.clone()),
            upload_api: UploadApi::new(client),
            session,
            wizard: Arc::new(EnrollmentWizard::new(navigator)),
            handoff: Arc::new(CredentialHandoff::new()),
            profesores: Vec::new(),
            talleres: Vec::new(),
            clientes: Vec::new(),
            talleres_disponibles: Vec::new(),
            is_loading: false,
            landing: LandingState::default(),
            contacto: ContactoState::default(),
            login_form: LoginForm::default(),
            forgot_form: ForgotForm::default(),
            datos_form: DatosForm::default(),
            seleccion: SeleccionState::default(),
            pago_form: PagoForm::default(),
            confirmacion: ConfirmacionState::default(),
            profesor_form: ProfesorForm::default(),
            taller_form: TallerForm::default(),
            horario_form: HorarioForm::default(),
            cliente_form: ClienteForm::default(),
            nuevo_cliente_form: NuevoClienteForm::default(),
            mi_horario: MiHorarioState::default(),
            nueva_inscripcion: NuevaInscripcionState::default(),
            settings,
            cliente_search: String::new(),
            banner: None,
            show_delete_confirm: false,
            delete_target: None,
        };

        let start = if app.session.is_authenticated() {
            app.session.role().map(|r| Route::home_for(&r)).unwrap_or_default()
        } else {
            Route::Inicio
        };
        app.navigate(start);

        Ok(app)
    }

    /// Run `fut` on the runtime and report its outcome to the UI thread.
    pub fn spawn_task<T, F>(
        &self,
        fut: F,
        on_ok: impl FnOnce(T) -> UiMessage + Send + 'static,
        on_err: impl FnOnce(AppError) -> UiMessage + Send + 'static,
    ) where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let msg = match fut.await {
                Ok(value) => on_ok(value),
                Err(e) => {
                    tracing::error!("Request failed: {}", e);
                    on_err(e)
                }
            };
            let _ = tx.send(msg);
        });
    }

    /// Fetch with the generic load-error fallback.
    pub fn spawn_load<T, F>(&self, fut: F, on_ok: impl FnOnce(T) -> UiMessage + Send + 'static, fallback: &'static str)
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.spawn_task(fut, on_ok, move |e| UiMessage::LoadError(e.user_message(fallback)));
    }

    /// Write with the generic operation-failed fallback.
    pub fn spawn_op<T, F>(&self, fut: F, on_ok: impl FnOnce(T) -> UiMessage + Send + 'static, fallback: &'static str)
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.spawn_task(fut, on_ok, move |e| UiMessage::OperationFailed(e.user_message(fallback)));
    }

    // === Navigation ===

    /// Switch panel and run its initialization.
    pub fn navigate(&mut self, route: Route) {
        let route = self.guard(route);
        tracing::debug!("Showing {}", route);

        self.current_route = route;
        self.banner = None;
        self.show_delete_confirm = false;
        self.delete_target = None;
        self.initialize(route);
    }

    /// Role check for protected panels.
    fn guard(&self, route: Route) -> Route {
        let Some(required) = route.required_role() else {
            return route;
        };
        match self.session.role() {
            Some(role) if role == required => route,
            Some(role) => {
                tracing::warn!("Role {} may not open {}", role.code(), route);
                Route::home_for(&role)
            }
            None => Route::Login,
        }
    }

    fn initialize(&mut self, route: Route) {
        match route {
            Route::Inicio => landing_panel::initialize_inicio(self),
            Route::Talleres => landing_panel::initialize_talleres(self),
            Route::Profesores => landing_panel::initialize_profesores(self),
            Route::Blog => landing_panel::initialize_blog(self),
            Route::Contacto => contacto_panel::initialize(self),
            Route::DatosPersonales => inscripcion_panel::initialize_datos(self),
            Route::SeleccionTalleres { .. } => inscripcion_panel::initialize_seleccion(self),
            Route::Pago { .. } => inscripcion_panel::initialize_pago(self),
            Route::Confirmacion => inscripcion_panel::initialize_confirmacion(self),
            Route::Login => auth_panel::initialize_login(self),
            Route::ForgotPassword => auth_panel::initialize_forgot(self),
            Route::AdminProfesores => profesores_panel::initialize(self),
            Route::AdminTalleres => talleres_panel::initialize(self),
            Route::AdminEstudiantes => estudiantes_panel::initialize(self),
            Route::EstudianteHorario => estudiante_panel::initialize_horario(self),
            Route::EstudianteNuevaInscripcion => estudiante_panel::initialize_nueva(self),
            Route::Acerca | Route::ProfesorHorario | Route::NotFound => {}
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.logout() {
            tracing::warn!("Session storage not fully cleared: {}", e);
        }
        self.profesores.clear();
        self.talleres.clear();
        self.clientes.clear();
        self.talleres_disponibles.clear();
        self.mi_horario = MiHorarioState::default();
        self.nueva_inscripcion = NuevaInscripcionState::default();
    }

    // === Banners ===

    pub fn show_success(&mut self, text: impl Into<String>, secs: u64) {
        self.banner = Some(Banner::success(text, secs));
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner::error(text));
    }

    fn banner_secs(&self, seccion: Seccion) -> u64 {
        match seccion {
            Seccion::Profesores => self.config.ui.profesores_banner_secs,
            Seccion::Talleres => self.config.ui.talleres_banner_secs,
            Seccion::Estudiantes => self.config.ui.estudiantes_banner_secs,
        }
    }

    // === Admin loading ===

    pub fn load_profesores(&mut self) {
        self.is_loading = true;
        let api = self.admin_api.clone();
        self.spawn_load(
            async move { api.list_profesores().await },
            UiMessage::ProfesoresLoaded,
            "No se pudieron cargar los profesores",
        );
    }

    pub fn load_talleres(&mut self) {
        self.is_loading = true;
        let api = self.admin_api.clone();
        self.spawn_load(
            async move { api.list_talleres().await },
            UiMessage::TalleresLoaded,
            "No se pudieron cargar los talleres",
        );
    }

    pub fn load_clientes(&mut self) {
        self.is_loading = true;
        let api = self.admin_api.clone();
        self.spawn_load(
            async move { api.list_clientes().await },
            UiMessage::ClientesLoaded,
            "Error al cargar la lista de clientes",
        );
    }

    pub fn load_talleres_disponibles(&mut self) {
        let api = self.admin_api.clone();
        self.spawn_load(
            async move { api.talleres_disponibles().await },
            UiMessage::TalleresDisponiblesLoaded,
            "Error al cargar talleres disponibles",
        );
    }

    /// Ask for an image file and upload it for the given form field.
    pub fn upload_image(&mut self, target: UploadTarget) {
        let Some(path) = components::pick_image_file() else {
            return;
        };
        tracing::info!("Uploading {:?} for {:?}", path, target);

        match target {
            UploadTarget::FotoProfesor => self.profesor_form.uploading = true,
            UploadTarget::ImagenTaller | UploadTarget::ImagenInicioTaller => self.taller_form.uploading = true,
        }

        let api = self.upload_api.clone();
        self.spawn_op(
            async move {
                match target {
                    UploadTarget::FotoProfesor => api.upload_foto_profesor(&path).await,
                    UploadTarget::ImagenTaller | UploadTarget::ImagenInicioTaller => {
                        api.upload_imagen_taller(&path).await
                    }
                }
            },
            move |resp| UiMessage::ImagenSubida(target, resp),
            "No se pudo subir la imagen",
        );
    }

    fn reload(&mut self, seccion: Seccion) {
        match seccion {
            Seccion::Profesores => self.load_profesores(),
            Seccion::Talleres => {
                self.load_talleres();
                // Schedules carry teacher names.
                self.load_profesores();
            }
            Seccion::Estudiantes => {
                self.load_clientes();
                self.load_talleres_disponibles();
            }
        }
    }

    /// Poll for async results.
    fn poll_async_results(&mut self) {
        while let Ok(route) = self.nav_rx.try_recv() {
            self.navigate(route);
        }

        while let Ok(msg) = self.rx.try_recv() {
            self.handle_message(msg);
        }
    }

    fn handle_message(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::TalleresActivosLoaded(talleres) => {
                self.landing.loading = false;
                self.landing.talleres_activos = talleres;
            }
            UiMessage::TalleresDetalladosLoaded(talleres) => {
                self.landing.loading = false;
                self.landing.talleres_detallados = talleres;
            }
            UiMessage::ProfesoresPublicosLoaded(profesores) => {
                self.landing.loading = false;
                self.landing.profesores = profesores;
            }
            UiMessage::NoticiasLoaded(noticias) => {
                self.landing.loading = false;
                self.landing.noticias = noticias;
            }
            UiMessage::NoticiaLoaded(noticia) => {
                self.landing.noticia_abierta = Some(noticia);
            }
            UiMessage::ContactoEnviado => {
                self.contacto.sending = false;
                self.contacto.enviado = true;
                self.contacto.form = Default::default();
            }
            UiMessage::ContactoFailed(e) => {
                self.contacto.sending = false;
                self.contacto.error = Some(e);
            }
            UiMessage::LoginSucceeded(user) => {
                self.login_form = LoginForm::default();
                tracing::info!("Welcome {}", user.display_name());
                self.session.redirect_by_role();
            }
            UiMessage::LoginFailed(e) => {
                self.login_form.loading = false;
                self.login_form.error = Some(e);
            }
            UiMessage::ResetCodeSent => {
                self.forgot_form.loading = false;
                self.forgot_form.code_sent = true;
                self.forgot_form.info = Some("Si el correo existe, se ha enviado un código de verificación.".to_string());
            }
            UiMessage::PasswordReset => {
                self.forgot_form = ForgotForm::default();
                self.login_form.info = Some("Contraseña actualizada exitosamente. Ya puedes iniciar sesión.".to_string());
                self.navigate(Route::Login);
            }
            UiMessage::PasswordFailed(e) => {
                self.forgot_form.loading = false;
                self.forgot_form.error = Some(e);
            }
            UiMessage::ClienteRegistrado(cliente) => {
                self.datos_form.loading = false;
                self.datos_form.datos.nombre = cliente.nombre_completo.clone();
                self.wizard.set_cliente(cliente);
            }
            UiMessage::RegistroFailed(e) => {
                self.datos_form.loading = false;
                self.datos_form.error = Some(e);
            }
            UiMessage::CatalogoLoaded(catalogo) => {
                self.seleccion.loading = false;
                if self.wizard.catalogo_vacio() {
                    self.wizard.set_talleres_iniciales(catalogo);
                }
            }
            UiMessage::CatalogoFailed(e) => {
                self.seleccion.loading = false;
                self.seleccion.error = Some(e);
            }
            UiMessage::InscripcionConfirmada(resp) => {
                inscripcion_panel::on_confirmada(self, resp);
            }
            UiMessage::PagoFailed(e) => {
                self.pago_form.loading = false;
                self.pago_form.error = Some(e);
            }
            UiMessage::ProfesoresLoaded(profesores) => {
                self.is_loading = false;
                self.profesores = profesores;
            }
            UiMessage::TalleresLoaded(talleres) => {
                self.is_loading = false;
                self.talleres = talleres;
            }
            UiMessage::ClientesLoaded(clientes) => {
                self.is_loading = false;
                self.clientes = clientes;
            }
            UiMessage::TalleresDisponiblesLoaded(talleres) => {
                self.talleres_disponibles = talleres;
            }
            UiMessage::AdminSaved(seccion, text) => {
                tracing::info!("{}", text);
                let secs = self.banner_secs(seccion);
                self.show_success(text, secs);
                self.reload(seccion);
            }
            UiMessage::FormSaved(form, text) => {
                match form {
                    AdminForm::Profesor => self.profesor_form.reset(),
                    AdminForm::Taller => self.taller_form.reset(),
                    AdminForm::Horario => self.horario_form.reset(),
                    AdminForm::Cliente => self.cliente_form.reset(),
                }
                tracing::info!("{}", text);
                let seccion = form.seccion();
                let secs = self.banner_secs(seccion);
                self.show_success(text, secs);
                self.reload(seccion);
            }
            UiMessage::InscripcionAgregada { cliente_id, horario_id } => {
                self.cliente_form.inscripcion_agregada(cliente_id, horario_id);
                let secs = self.banner_secs(Seccion::Estudiantes);
                self.show_success("Inscripción agregada exitosamente", secs);
                self.reload(Seccion::Estudiantes);
            }
            UiMessage::ClienteCreado(creado) => {
                let secs = self.config.ui.credenciales_banner_secs;
                self.nuevo_cliente_form.reset();
                self.show_success(
                    format!(
                        "Cliente registrado exitosamente. Correo: {}, Contraseña temporal: {}",
                        creado.email, creado.temporal_password
                    ),
                    secs,
                );
                self.reload(Seccion::Estudiantes);
            }
            UiMessage::ImagenSubida(target, resp) => {
                tracing::info!("Uploaded {} as {}", resp.filename, resp.url);
                match target {
                    UploadTarget::FotoProfesor => {
                        self.profesor_form.uploading = false;
                        self.profesor_form.data.foto_url = resp.url;
                    }
                    UploadTarget::ImagenTaller => {
                        self.taller_form.uploading = false;
                        self.taller_form.data.imagen_taller = resp.url;
                    }
                    UploadTarget::ImagenInicioTaller => {
                        self.taller_form.uploading = false;
                        self.taller_form.data.imagen_inicio = resp.url;
                    }
                }
            }
            UiMessage::MisHorariosLoaded(horarios) => {
                self.mi_horario.loading = false;
                self.mi_horario.horarios = horarios;
            }
            UiMessage::BajaSolicitada => {
                self.mi_horario.baja = None;
                self.mi_horario.sending = false;
                self.show_success(
                    "Tu solicitud de baja ha sido enviada al administrador. Te contactaremos pronto.",
                    5,
                );
            }
            UiMessage::InscripcionesClienteLoaded(inscripciones) => {
                self.nueva_inscripcion.inscritos = inscripciones.iter().filter_map(|i| i.horario_id()).collect();
            }
            UiMessage::CatalogoEstudianteLoaded(catalogo) => {
                self.nueva_inscripcion.loading = false;
                self.nueva_inscripcion.catalogo = catalogo;
            }
            UiMessage::NuevaInscripcionHecha => {
                self.nueva_inscripcion = NuevaInscripcionState::default();
                self.navigate(Route::EstudianteHorario);
                self.show_success("¡Inscripción realizada con éxito!", 5);
            }
            UiMessage::NuevaInscripcionFailed(e) => {
                self.nueva_inscripcion.loading = false;
                self.nueva_inscripcion.error = Some(e);
            }
            UiMessage::ConexionProbada(ok) => {
                self.settings.testing = false;
                self.settings.connection_status = Some(ok);
            }
            UiMessage::LoadError(e) => {
                self.is_loading = false;
                self.landing.loading = false;
                self.mi_horario.loading = false;
                self.show_error(e);
            }
            UiMessage::OperationFailed(e) => {
                self.profesor_form.uploading = false;
                self.profesor_form.saving = false;
                self.taller_form.uploading = false;
                self.taller_form.saving = false;
                self.horario_form.saving = false;
                self.cliente_form.saving = false;
                self.cliente_form.adding = false;
                self.mi_horario.sending = false;
                self.show_error(e);
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        let user = self.session.user_info();
        let mut next = None;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                for route in [
                    Route::Inicio,
                    Route::Talleres,
                    Route::Profesores,
                    Route::Blog,
                    Route::Contacto,
                    Route::Acerca,
                ] {
                    if ui
                        .selectable_label(self.current_route == route, route.title())
                        .clicked()
                    {
                        next = Some(route);
                    }
                }
                if ui.button(RichText::new("Inscríbete").color(colors::PRIMARY)).clicked() {
                    next = Some(Route::DatosPersonales);
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button(GEAR).on_hover_text("Configuración").clicked() {
                        self.settings.open(&self.config);
                    }

                    match &user {
                        Some(user) => {
                            if ui.button(format!("{SIGN_OUT} Cerrar sesión")).clicked() {
                                self.logout();
                            }
                            ui.menu_button(user.display_name(), |ui| {
                                for route in area_routes(&user.role()) {
                                    if ui.button(route.title()).clicked() {
                                        next = Some(route);
                                        ui.close();
                                    }
                                }
                            });
                        }
                        None => {
                            if ui.button(format!("{SIGN_IN} Iniciar sesión")).clicked() {
                                next = Some(Route::Login);
                            }
                        }
                    }
                });
            });
        });

        if let Some(route) = next {
            self.navigate(route);
        }
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    match self.session.user_info() {
                        Some(user) => ui.colored_label(colors::SUCCESS, format!("Sesión: {}", user.email)),
                        None => ui.colored_label(colors::NEUTRAL, "Sin sesión"),
                    };
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.is_loading {
                            ui.spinner();
                        }
                        ui.label(&self.config.api.base_url);
                    });
                });
            });
    }

    /// Render the delete confirmation dialog.
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if self.show_delete_confirm
            && let Some(ref target) = self.delete_target.clone()
        {
            let (title, message, action) = match target {
                DeleteTarget::Profesor(_, name) => ("Eliminar profesor", format!("¿Eliminar al profesor '{name}'?"), "Eliminar"),
                DeleteTarget::Taller(_, name) => ("Eliminar taller", format!("¿Eliminar el taller '{name}'?"), "Eliminar"),
                DeleteTarget::Horario(_, desc) => ("Eliminar horario", format!("¿Eliminar el horario {desc}?"), "Eliminar"),
                DeleteTarget::Cliente(_, name) => (
                    "Eliminar cliente",
                    format!("¿Eliminar completamente al cliente '{name}'? Esta acción es irreversible."),
                    "Eliminar",
                ),
                DeleteTarget::Inscripcion { nombre, .. } => (
                    "Dar de baja",
                    format!("¿Dar de baja al cliente del taller '{nombre}'?"),
                    "Dar de baja",
                ),
                DeleteTarget::TallerSeleccionado(_, name) => (
                    "Quitar taller",
                    format!("¿Quitar '{name}' de tu inscripción?"),
                    "Quitar",
                ),
            };

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancelar").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button(RichText::new(action).color(colors::ERROR)).clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                        }
                    });
                });
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        let Some(target) = self.delete_target.take() else {
            return;
        };
        let api = self.admin_api.clone();

        match target {
            DeleteTarget::Profesor(id, name) => {
                tracing::info!("Deleting profesor {} ({})", id, name);
                self.spawn_op(
                    async move { api.delete_profesor(id).await },
                    move |_| UiMessage::AdminSaved(Seccion::Profesores, format!("Profesor '{name}' eliminado")),
                    "No se pudo eliminar el profesor",
                );
            }
            DeleteTarget::Taller(id, name) => {
                tracing::info!("Deleting taller {} ({})", id, name);
                self.spawn_op(
                    async move { api.delete_taller(id).await },
                    move |_| UiMessage::AdminSaved(Seccion::Talleres, format!("Taller '{name}' eliminado")),
                    "No se pudo eliminar el taller",
                );
            }
            DeleteTarget::Horario(id, _) => {
                tracing::info!("Deleting horario {}", id);
                self.spawn_op(
                    async move { api.delete_horario(id).await },
                    |_| UiMessage::AdminSaved(Seccion::Talleres, "Horario eliminado".to_string()),
                    "No se pudo eliminar el horario",
                );
            }
            DeleteTarget::Cliente(id, name) => {
                tracing::info!("Deleting cliente {} ({})", id, name);
                self.spawn_op(
                    async move { api.delete_cliente(id).await },
                    |_| UiMessage::AdminSaved(Seccion::Estudiantes, "Cliente eliminado exitosamente".to_string()),
                    "Error al eliminar el cliente",
                );
            }
            DeleteTarget::Inscripcion {
                cliente_id,
                horario_id,
                nombre,
            } => {
                tracing::info!("Removing cliente {} from horario {} ({})", cliente_id, horario_id, nombre);
                self.spawn_op(
                    async move { api.remove_inscripcion(cliente_id, horario_id).await },
                    |_| UiMessage::AdminSaved(Seccion::Estudiantes, "Inscripción eliminada exitosamente".to_string()),
                    "Error al eliminar inscripción",
                );
            }
            DeleteTarget::TallerSeleccionado(taller_id, _) => {
                inscripcion_panel::quitar_taller(self, taller_id);
            }
        }
    }
}

/// Panels of the logged-in area for a role.
fn area_routes(role: &Role) -> Vec<Route> {
    match role {
        Role::Admin => vec![Route::AdminEstudiantes, Route::AdminProfesores, Route::AdminTalleres],
        Role::Cliente => vec![Route::EstudianteHorario, Route::EstudianteNuevaInscripcion],
        Role::Profesor => vec![Route::ProfesorHorario],
        Role::Unknown(_) => Vec::new(),
    }
}

fn session_storage(config: &AppConfig) -> Arc<dyn SessionStorage> {
    match config.storage.session_dir.clone().or_else(FileSessionStorage::default_dir) {
        Some(dir) => {
            tracing::info!("Session directory: {:?}", dir);
            Arc::new(FileSessionStorage::new(dir))
        }
        None => {
            tracing::warn!("No data directory available, session will not persist");
            Arc::new(MemorySessionStorage::default())
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Expire success banners
        let now = Instant::now();
        if let Some(banner) = &self.banner {
            if banner.is_expired(now) {
                self.banner = None;
            } else if let Some(left) = banner.remaining(now) {
                ctx.request_repaint_after(left);
            }
        }

        // Keep polling while requests are in flight
        ctx.request_repaint_after(std::time::Duration::from_millis(200));

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);
        self.show_dialogs(ctx);
        settings_panel::show(self, ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(banner) = &self.banner
                && components::banner(ui, banner)
            {
                self.banner = None;
            }

            egui::ScrollArea::vertical().id_salt("main_scroll").show(ui, |ui| {
                match self.current_route {
                    Route::Inicio => landing_panel::show_inicio(self, ui),
                    Route::Acerca => landing_panel::show_acerca(ui),
                    Route::Talleres => landing_panel::show_talleres(self, ui),
                    Route::Profesores => landing_panel::show_profesores(self, ui),
                    Route::Blog => landing_panel::show_blog(self, ui),
                    Route::Contacto => contacto_panel::show(self, ui),
                    Route::DatosPersonales => inscripcion_panel::show_datos(self, ui),
                    Route::SeleccionTalleres { .. } => inscripcion_panel::show_seleccion(self, ui),
                    Route::Pago { .. } => inscripcion_panel::show_pago(self, ui),
                    Route::Confirmacion => inscripcion_panel::show_confirmacion(self, ui),
                    Route::Login => auth_panel::show_login(self, ui),
                    Route::ForgotPassword => auth_panel::show_forgot(self, ui),
                    Route::AdminProfesores => profesores_panel::show(self, ui),
                    Route::AdminTalleres => talleres_panel::show(self, ui),
                    Route::AdminEstudiantes => estudiantes_panel::show(self, ui),
                    Route::EstudianteHorario => estudiante_panel::show_horario(self, ui),
                    Route::EstudianteNuevaInscripcion => estudiante_panel::show_nueva(self, ui),
                    Route::ProfesorHorario => landing_panel::show_profesor_area(ui),
                    Route::NotFound => landing_panel::show_not_found(self, ui),
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use super::*;
    use crate::models::cliente::ClienteInput;
    use crate::models::profesor::ProfesorInput;

    /// App pointed at a port nothing listens on, so every write fails.
    fn offline_app(dir: &Path) -> App {
        let mut config = AppConfig::default();
        config.api.base_url = "http://127.0.0.1:9".to_string();
        config.api.timeout_secs = 2;
        config.storage.session_dir = Some(dir.join("session"));
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        App::new(config, dir.join("config.toml"), rt).unwrap()
    }

    /// Handle messages until a write fails; returns the banner text.
    fn until_operation_failed(app: &mut App) -> String {
        loop {
            let rx = &mut app.rx;
            let msg = app
                .rt
                .block_on(async move { tokio::time::timeout(Duration::from_secs(10), rx.recv()).await })
                .expect("no answer from the background task")
                .expect("channel closed");
            if let UiMessage::OperationFailed(text) = msg {
                app.handle_message(UiMessage::OperationFailed(text.clone()));
                return text;
            }
            app.handle_message(msg);
        }
    }

    #[test]
    fn test_failed_profesor_save_keeps_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = offline_app(dir.path());
        app.profesor_form = ProfesorForm {
            is_open: true,
            data: ProfesorInput {
                nombre_completo: "Rosa Díaz".to_string(),
                informacion: "Piano".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        profesores_panel::save_profesor(&mut app);
        assert!(app.profesor_form.is_open);
        assert!(app.profesor_form.saving);

        let text = until_operation_failed(&mut app);
        assert_eq!(text, "No se pudo registrar el profesor");
        assert!(app.profesor_form.is_open);
        assert!(!app.profesor_form.saving);
        assert_eq!(app.profesor_form.data.nombre_completo, "Rosa Díaz");
        assert_eq!(app.profesor_form.data.informacion, "Piano");
    }

    #[test]
    fn test_failed_cliente_save_keeps_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = offline_app(dir.path());
        app.cliente_form = ClienteForm {
            is_open: true,
            id: Some(7),
            data: ClienteInput {
                nombre_completo: "Luis Paredes".to_string(),
                correo: "luis@mail.pe".to_string(),
                telefono: "987654321".to_string(),
            },
            ..Default::default()
        };

        estudiantes_panel::save_cliente(&mut app);
        until_operation_failed(&mut app);
        assert!(app.cliente_form.is_open);
        assert!(!app.cliente_form.saving);
        assert_eq!(app.cliente_form.data.correo, "luis@mail.pe");
    }

    #[test]
    fn test_form_saved_closes_only_its_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = offline_app(dir.path());
        app.taller_form.is_open = true;
        app.horario_form.is_open = true;
        app.horario_form.saving = true;

        app.handle_message(UiMessage::FormSaved(AdminForm::Horario, "Horario actualizado".to_string()));
        assert!(!app.horario_form.is_open);
        assert!(!app.horario_form.saving);
        assert!(app.taller_form.is_open);
        assert!(app.banner.is_some());
    }

    #[test]
    fn test_failed_enrollment_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = offline_app(dir.path());
        app.cliente_form = ClienteForm {
            is_open: true,
            id: Some(3),
            inscritos: vec![12],
            nuevo_taller_id: Some(1),
            nuevo_horario_id: Some(11),
            ..Default::default()
        };

        estudiantes_panel::agregar_inscripcion(&mut app);
        assert!(app.cliente_form.adding);
        assert_eq!(app.cliente_form.inscritos, vec![12]);

        until_operation_failed(&mut app);
        assert!(!app.cliente_form.adding);
        assert_eq!(app.cliente_form.inscritos, vec![12]);
        assert_eq!(app.cliente_form.nuevo_horario_id, Some(11));

        app.handle_message(UiMessage::InscripcionAgregada {
            cliente_id: 3,
            horario_id: 11,
        });
        assert_eq!(app.cliente_form.inscritos, vec![12, 11]);
        assert_eq!(app.cliente_form.nuevo_horario_id, None);
        assert!(app.cliente_form.is_open);
    }
}

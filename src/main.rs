//! Talleres Desk - desktop client for workshop enrollment and administration.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use talleres_desk as app;

use app::config::{AppConfig, ConfigLoadResult};
use app::ui::App;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Desktop client for workshop enrollment.
#[derive(Parser)]
#[command(name = "talleres-desk")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the backend URL for this run only
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging();

    tracing::info!("Talleres Desk starting...");

    let config_path = if let Some(path) = cli.config.clone() {
        path
    } else if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let mut config = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            config
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, writing defaults");
            let config = AppConfig::default();
            if let Err(e) = config.save(&config_path) {
                tracing::warn!("Could not write default config: {}", e);
            }
            config
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid, using defaults: {}", e);
            AppConfig::default()
        }
    };

    if let Some(url) = cli.api_url {
        tracing::info!("Backend URL overridden: {}", url);
        config.api.base_url = url;
    }
    config.validate().context("Invalid configuration")?;

    run_app(config, config_path)
}

/// Console output plus a daily log file in the per-user data directory.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let console = tracing_subscriber::fmt::layer();

    let log_dir = directories::ProjectDirs::from("pe", "talleres", "talleres-desk").map(|d| d.data_dir().join("logs"));
    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "talleres-desk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(console).init();
            None
        }
    }
}

/// Run the main application.
fn run_app(config: AppConfig, config_path: PathBuf) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Talleres")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let app = App::new(config, config_path, rt).context("Failed to start application")?;

    eframe::run_native(
        "Talleres",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod router;
pub mod store;
pub mod ui;
pub mod validation;

pub use error::{AppError, Result};

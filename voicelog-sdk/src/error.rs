use std::path::PathBuf;

use thiserror::Error;

use crate::logging::LoggingError;

/// Errors loading persisted settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No configuration directory on this platform")]
    NoConfigDir,
}

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] voicelog_host::PluginError),
}

pub type Result<T> = std::result::Result<T, SdkError>;

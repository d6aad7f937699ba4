use std::path::PathBuf;
use thiserror::Error;

/// Main error type for confpatch
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {source}\n\nTroubleshooting:\n- Check the TOML syntax near the reported line\n- Strings need quotes, arrays need brackets")]
    Parse {
        origin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to decode `{path}`: {message}")]
    Decode { path: String, message: String },

    #[error("Patch error: {0}")]
    Patch(String),

    #[error("Invalid path `{path}`: {reason}")]
    Path { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

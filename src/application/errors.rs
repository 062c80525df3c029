//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Response too long: {0}")]
    TransportLimit(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConfigError> for BotError {
    fn from(e: ConfigError) -> Self {
        BotError::Config(e.to_string())
    }
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database lock poisoned")]
    Poisoned,
}

/// Renderer errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to encode data: {0}")]
    Encode(String),

    #[error("Failed to write image: {0}")]
    Image(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Walks the `source()` chain so nested causes end up in diagnostics.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\n  caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_converts_into_bot_error() {
        let err: BotError = StorageError::Poisoned.into();
        assert!(matches!(err, BotError::Storage(StorageError::Poisoned)));
        assert_eq!(err.to_string(), "Storage error: Database lock poisoned");
    }

    #[test]
    fn error_chain_includes_sources() {
        let err = BotError::Storage(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )));
        let chain = error_chain(&err);
        assert!(chain.starts_with("Storage error: IO error: disk full"));
        assert!(chain.contains("caused by: IO error: disk full"));
    }
}

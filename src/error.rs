use thiserror::Error;

/// Main error type for Relimport
#[derive(Error, Debug)]
pub enum RelimportError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Fixture or config file parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Controlled vocabulary missing or empty
    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using RelimportError
pub type Result<T> = std::result::Result<T, RelimportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelimportError::Vocabulary("taxonomy 55 has no terms".to_string());
        assert!(err.to_string().contains("Vocabulary error"));
        assert!(err.to_string().contains("taxonomy 55"));
    }

    #[test]
    fn test_error_from_rusqlite() {
        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let err: RelimportError = rusqlite_err.into();
        assert!(matches!(err, RelimportError::Database(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RelimportError = io_err.into();
        assert!(matches!(err, RelimportError::Io(_)));
    }
}

//! Error types for Slugroute
//!
//! A request that simply does not fit a rule is not an error: resolvers and
//! builders report it as `Ok(None)`. The variants below cover configuration
//! problems found while compiling rules and failures coming back from the
//! data store.

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for Slugroute
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rule configuration error (fatal at compile time)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pattern could not be tokenized
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Raw pattern text
        pattern: String,
        /// What went wrong
        message: String,
    },

    /// Failure reported by the data store, passed through unchanged
    #[error("Data store error: {0}")]
    Store(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a data store error
    pub fn store(message: impl Into<String>) -> Self {
        Error::Store(message.into())
    }

    /// Is this a compile-time configuration failure?
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_) | Error::InvalidPattern { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_classification() {
        assert!(Error::Config("category without element".to_string()).is_config());
        assert!(Error::invalid_pattern("[el:]", "empty field name").is_config());
        assert!(!Error::store("connection reset").is_config());
    }

    #[test]
    fn test_invalid_pattern_message() {
        let err = Error::invalid_pattern("news/[el:", "unterminated placeholder");
        assert!(err.to_string().contains("news/[el:"));
        assert!(err.to_string().contains("unterminated"));
    }
}

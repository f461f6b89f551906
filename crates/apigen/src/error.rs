use thiserror::Error;

/// Result type for document generation
pub type ApiGenResult<T> = Result<T, ApiGenError>;

/// Errors that abort a document generation
#[derive(Debug, Error)]
pub enum ApiGenError {
    /// Malformed or missing declarations (discriminators, verbs, base paths)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A type or parameter shape the compiler cannot express
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),

    /// Type notation that does not parse
    #[error("Invalid type notation '{notation}': {reason}")]
    InvalidType { notation: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML configuration error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiGenError {
    /// Create a new configuration error
    pub fn configuration_error<T: ToString>(msg: T) -> Self {
        Self::Configuration(msg.to_string())
    }

    /// Create a new unsupported shape error
    pub fn unsupported_shape<T: ToString>(msg: T) -> Self {
        Self::UnsupportedShape(msg.to_string())
    }

    /// Create a new type notation error
    pub fn invalid_type<N: ToString, R: ToString>(notation: N, reason: R) -> Self {
        Self::InvalidType {
            notation: notation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error stems from the input declarations rather than I/O
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::UnsupportedShape(_) | Self::InvalidType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiGenError::configuration_error("no subtypes declared on Product");
        assert_eq!(
            err.to_string(),
            "Configuration error: no subtypes declared on Product"
        );

        let err = ApiGenError::invalid_type("list<", "unterminated generic argument");
        assert_eq!(
            err.to_string(),
            "Invalid type notation 'list<': unterminated generic argument"
        );
    }

    #[test]
    fn test_declaration_errors() {
        assert!(ApiGenError::unsupported_shape("nested containers unsupported").is_declaration_error());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!ApiGenError::from(io).is_declaration_error());
    }
}

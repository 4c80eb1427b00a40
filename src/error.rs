//! Error types for gesture-particles.
//!
//! Only shape generation, color parsing, payload decoding and configuration
//! can fail. Control deltas never produce errors: every numeric path is
//! clamped and every unknown string is ignored.

use std::fmt;

/// Errors returned by the shape field generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The shape identifier is not one of the known shapes.
    InvalidShape(String),
    /// A field must contain at least one particle.
    InvalidCount(usize),
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::InvalidShape(name) => write!(
                f,
                "Unknown particle shape '{}'. Expected one of GALAXY, HEART, FLOWER, SATURN, FIREWORKS.",
                name
            ),
            ShapeError::InvalidCount(count) => {
                write!(f, "Invalid particle count {}: a field needs at least one particle", count)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Errors that can occur when parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The string is not a `#rgb` or `#rrggbb` hex color.
    Format(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::Format(s) => write!(f, "Invalid color '{}': expected #rrggbb", s),
        }
    }
}

impl std::error::Error for ColorError {}

/// Errors that can occur when decoding a payload from the vision service.
#[derive(Debug)]
pub enum PayloadError {
    /// The payload is not valid JSON or not a JSON object.
    Json(serde_json::Error),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Json(e) => write!(f, "Malformed control payload: {}", e),
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PayloadError::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(e: serde_json::Error) -> Self {
        PayloadError::Json(e)
    }
}

/// Errors that can occur when loading, saving or validating a session config.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    Io(std::io::Error),
    /// The file is not valid config JSON.
    Json(serde_json::Error),
    /// The config parsed but holds values the session cannot run with.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<ShapeError> for ConfigError {
    fn from(e: ShapeError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_shape_error_display_names_shape() {
        let err = ShapeError::InvalidShape("BANANA".into());
        assert!(err.to_string().contains("BANANA"));
    }

    #[test]
    fn test_config_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ConfigError::from(io);
        assert!(err.source().is_some());
        assert!(ConfigError::Invalid("x".into()).source().is_none());
    }
}

//! Errors surfaced at the configuration boundary
//!
//! Everything past start-up treats broken invariants as bugs and panics;
//! only loading settings from disk can fail in a way the caller handles.

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
    /// `max_objects` cannot hold the persistent objects plus the biggest wave.
    Capacity { max_objects: usize, required: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
            ConfigError::Capacity { max_objects, required } => write!(
                f,
                "Invalid config: max_objects is {} but a wave needs {}",
                max_objects, required
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) | ConfigError::Capacity { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_and_source() {
        let err = ConfigError::Invalid("max_objects must be > 0".to_string());
        assert_eq!(err.to_string(), "Invalid config: max_objects must be > 0");
        assert!(err.source().is_none());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ConfigError::from(io);
        assert!(err.to_string().starts_with("IO error"));
        assert!(err.source().is_some());

        let err = ConfigError::Capacity {
            max_objects: 10,
            required: 23,
        };
        assert_eq!(err.to_string(), "Invalid config: max_objects is 10 but a wave needs 23");
        assert!(err.source().is_none());
    }
}

//! Error types
//!
//! Only unusable input is an error. Structural oddities inside a well-formed
//! finding aid (missing titles, dangling container references) degrade to
//! empty fields or [`crate::ead::ResolutionWarning`]s instead.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EadError {
    /// The input is not well-formed XML
    #[error("XML parse error at byte {position}: {message}")]
    Parse { message: String, position: usize },

    /// The input is neither UTF-8 nor BOM-marked UTF-16
    #[error("unsupported document encoding: {0}")]
    Encoding(String),

    /// Host-supplied projection options could not be decoded
    #[error("invalid options: {0}")]
    Options(String),
}

impl EadError {
    pub fn parse(message: impl Into<String>, position: usize) -> Self {
        EadError::Parse {
            message: message.into(),
            position,
        }
    }

    /// Short tag used as the error atom on the host side
    pub fn kind(&self) -> &'static str {
        match self {
            EadError::Parse { .. } => "parse_error",
            EadError::Encoding(_) => "encoding_error",
            EadError::Options(_) => "options_error",
        }
    }

    /// Byte offset of the failure, 0 when it has none
    pub fn position(&self) -> usize {
        match self {
            EadError::Parse { position, .. } => *position,
            _ => 0,
        }
    }

    /// Message without the position prefix
    pub fn message(&self) -> &str {
        match self {
            EadError::Parse { message, .. } => message,
            EadError::Encoding(message) | EadError::Options(message) => message,
        }
    }
}

impl From<serde_json::Error> for EadError {
    fn from(err: serde_json::Error) -> Self {
        EadError::Options(err.to_string())
    }
}

pub type Result<T, E = EadError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = EadError::parse("unclosed tag <dsc>", 120);
        assert_eq!(err.to_string(), "XML parse error at byte 120: unclosed tag <dsc>");
        assert_eq!(err.kind(), "parse_error");
        assert_eq!(err.position(), 120);
        assert_eq!(err.message(), "unclosed tag <dsc>");
    }

    #[test]
    fn test_options_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = EadError::from(json_err);
        assert_eq!(err.kind(), "options_error");
        assert_eq!(err.position(), 0);
    }
}

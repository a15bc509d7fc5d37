/// Error types for the filter editor
///
/// Missing-image conditions are not errors: every operation that needs a
/// loaded image silently does nothing without one. These variants cover the
/// failures that must be reported to the user instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using EditorError
pub type EditorResult<T> = Result<T, EditorError>;

/// Main editor error type
///
/// `Clone` is required because errors travel inside iced messages.
#[derive(Debug, Clone, Error)]
pub enum EditorError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The selected file could not be decoded as an image
    #[error("could not decode {filename}: {message}")]
    Decode { filename: String, message: String },

    /// Encoding the export failed
    #[error("could not encode export: {0}")]
    Encode(String),

    /// A composed filter string did not parse
    #[error("invalid filter \"{input}\": {reason}")]
    FilterSyntax { input: String, reason: String },

    /// A background task panicked or was cancelled
    #[error("background task failed: {0}")]
    TaskJoin(String),

    /// The config file exists but is unreadable or malformed
    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn syntax(input: &str, reason: impl Into<String>) -> Self {
        EditorError::FilterSyntax {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<tokio::task::JoinError> for EditorError {
    fn from(err: tokio::task::JoinError) -> Self {
        EditorError::TaskJoin(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = EditorError::Decode {
            filename: "photo.jpg".into(),
            message: "unexpected EOF".into(),
        };
        assert_eq!(err.to_string(), "could not decode photo.jpg: unexpected EOF");

        let err = EditorError::syntax("brightness(x)", "bad number");
        assert!(err.to_string().contains("brightness(x)"));
    }
}

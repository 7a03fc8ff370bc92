//! Error types for the Probe Dock client.

use std::path::PathBuf;

/// Probe Dock client errors.
///
/// Validation problems (incomplete configuration, incomplete test run) are not
/// errors: they are collected as messages by `Config::validate` and
/// `TestRun::validate`. This type covers operations that either succeed or fail
/// as a whole.
#[derive(Debug, thiserror::Error)]
pub enum ProbeDockError {
    /// Missing or unusable options for an API request.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Connection-level failure (DNS, refused connection, TLS, broken body).
    #[error("network error: {message}")]
    Network { message: String },

    /// The server answered with a status other than the expected one.
    #[error("server responded with unexpected status code {status} (response: {body})")]
    UnexpectedStatus { status: u16, body: String },

    /// Local file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A payload or snapshot could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ProbeDockError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,

            // Transport
            Self::Network { .. } => 3,
            Self::UnexpectedStatus { .. } => 4,

            // Local
            Self::Io { .. } => 5,
            Self::Serialization { .. } => 5,
        }
    }

    /// Whether the failure happened while talking to the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::UnexpectedStatus { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for ProbeDockError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ProbeDockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type for Probe Dock operations.
pub type ProbeDockResult<T> = Result<T, ProbeDockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message_includes_status_and_body() {
        let err = ProbeDockError::UnexpectedStatus {
            status: 201,
            body: "created".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("201"));
        assert!(message.contains("created"));
        assert!(err.is_transport());
    }

    #[test]
    fn test_exit_codes_distinguish_transport_failures() {
        let network = ProbeDockError::Network {
            message: "connection refused".to_string(),
        };
        let status = ProbeDockError::UnexpectedStatus {
            status: 500,
            body: String::new(),
        };
        assert_ne!(network.exit_code(), status.exit_code());
        assert!(!ProbeDockError::Config {
            message: "x".to_string()
        }
        .is_transport());
    }
}

use thiserror::Error;

/// Top-level error type for the `icinga2-api` crate.
///
/// Validation failures (`Config`, `InvalidObjectType`, `MissingArgument`,
/// `InvalidArgument`) are raised before any request leaves the process.
/// Everything else comes back from the wire. Nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Missing endpoint or no usable credentials.
    #[error("invalid client configuration: {message}")]
    Config { message: String },

    // ── Validation ──────────────────────────────────────────────────
    /// Object type name outside the fixed Icinga 2 schema.
    #[error("Icinga 2 object type \"{name}\" does not exist")]
    InvalidObjectType { name: String },

    /// A required argument was absent or empty.
    #[error("{action}: missing required argument `{argument}`")]
    MissingArgument {
        action: &'static str,
        argument: &'static str,
    },

    /// An argument was present but not acceptable for the action.
    #[error("{action}: {message}")]
    InvalidArgument {
        action: &'static str,
        message: String,
    },

    // ── Remote API ──────────────────────────────────────────────────
    /// Non-2xx response from the API.
    #[error("request \"{url}\" failed with status {status}: {body}")]
    Api {
        url: String,
        status: u16,
        body: String,
    },

    /// A lookup by name succeeded but returned no results.
    #[error("{object_type} \"{name}\" not found")]
    ObjectNotFound { object_type: String, name: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or joining error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client certificate or CA certificate could not be loaded.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON decoding failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl Error {
    /// HTTP status of a remote failure, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. }) || self.status() == Some(404)
    }

    /// Returns `true` if the failure happened before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::InvalidObjectType { .. }
                | Self::MissingArgument { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Returns `true` if this is a transient error a caller might retry.
    ///
    /// The client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 503,
            _ => false,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status_and_body() {
        let err = Error::Api {
            url: "https://icinga:5665/v1/objects/hosts/nope".into(),
            status: 404,
            body: r#"{"error": "not found"}"#.into(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_transient());
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains(r#"{"error": "not found"}"#));
    }

    #[test]
    fn validation_errors_are_flagged() {
        assert!(Error::InvalidObjectType { name: "Hots".into() }.is_validation());
        assert!(
            Error::MissingArgument {
                action: "add-comment",
                argument: "filter"
            }
            .is_validation()
        );
        assert!(
            !Error::Api {
                url: String::new(),
                status: 500,
                body: String::new()
            }
            .is_validation()
        );
    }

    #[test]
    fn unavailable_is_transient() {
        let err = Error::Api {
            url: String::new(),
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
    }
}

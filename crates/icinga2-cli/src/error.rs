//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with actionable
//! help text and a stable exit code per category.

use miette::Diagnostic;
use thiserror::Error;

use icinga2_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(icinga2::connection_failed),
        help(
            "Check that Icinga 2 is running with the api feature enabled\n\
             (icinga2 feature enable api) and that port 5665 is reachable."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(icinga2::timeout),
        help("Increase the timeout with --timeout or check the server's load.")
    )]
    Timeout {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed")]
    #[diagnostic(code(icinga2::http))]
    Http {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Remote API ───────────────────────────────────────────────────
    #[error("API request failed with status {status}")]
    #[diagnostic(code(icinga2::api_error), help("{url}\n{body}"))]
    Api {
        url: String,
        status: u16,
        body: String,
    },

    #[error("{object_type} '{name}' not found")]
    #[diagnostic(
        code(icinga2::not_found),
        help("Run: icinga2 objects list {object_type} to see available objects")
    )]
    NotFound { object_type: String, name: String },

    #[error("Could not decode the server response: {message}")]
    #[diagnostic(code(icinga2::decode))]
    Decode { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(icinga2::validation))]
    Validation { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid connection settings: {message}")]
    #[diagnostic(
        code(icinga2::invalid_config),
        help(
            "Set url and credentials in the [api] table of {path},\n\
             export ICINGA2_API_URL / ICINGA2_API_USERNAME / ICINGA2_API_PASSWORD,\n\
             or pass --url with --username/--password or --certificate."
        )
    )]
    InvalidConfig { message: String, path: String },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(icinga2::tls),
        help("Check the --certificate, --key and --ca-certificate paths.")
    )]
    Tls { message: String },

    #[error(transparent)]
    #[diagnostic(code(icinga2::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(icinga2::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(icinga2::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::Api { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::InvalidConfig { .. }
            | Self::Tls { .. }
            | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library errors → CliError ────────────────────────────────────────

impl From<icinga2_api::Error> for CliError {
    fn from(err: icinga2_api::Error) -> Self {
        use icinga2_api::Error as ApiError;

        match err {
            ApiError::Config { message } => Self::InvalidConfig {
                message,
                path: icinga2_config::config_path().display().to_string(),
            },
            ApiError::InvalidUrl(e) => Self::InvalidConfig {
                message: format!("invalid URL: {e}"),
                path: icinga2_config::config_path().display().to_string(),
            },
            ApiError::Tls(message) => Self::Tls { message },

            e @ (ApiError::InvalidObjectType { .. }
            | ApiError::MissingArgument { .. }
            | ApiError::InvalidArgument { .. }) => Self::Validation {
                message: e.to_string(),
            },

            ApiError::Api { url, status, body } => Self::Api { url, status, body },
            ApiError::ObjectNotFound { object_type, name } => Self::NotFound { object_type, name },

            ApiError::Transport(e) if e.is_timeout() => Self::Timeout { source: e.into() },
            ApiError::Transport(e) if e.is_connect() => Self::ConnectionFailed {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                source: e.into(),
            },
            ApiError::Transport(e) => Self::Http { source: e.into() },

            ApiError::Deserialization { message, .. } => Self::Decode { message },
            ApiError::Serialization(e) => Self::Json(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Client(e) => e.into(),
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}

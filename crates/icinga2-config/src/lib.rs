//! Configuration file loading for Icinga 2 API tools.
//!
//! A single TOML file with one `[api]` table, overlaid by
//! `ICINGA2_API_*` environment variables, translated into an
//! `icinga2_api::ClientConfig`. The CLI layers its flags on top.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use icinga2_api::ClientConfig;

/// Name of the recognized table.
pub const SECTION: &str = "api";

/// Prefix of the environment overrides (`ICINGA2_API_URL`, ...).
pub const ENV_PREFIX: &str = "ICINGA2_API_";

/// Keys whose environment values are taken verbatim, never parsed as
/// numbers, booleans or arrays.
const STRING_KEYS: &[&str] = &[
    "url",
    "username",
    "password",
    "certificate",
    "key",
    "ca_certificate",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file \"{}\" doesn't exist", path.display())]
    NotFound { path: PathBuf },

    #[error("config file \"{}\" is missing the [{section}] section", path.display())]
    MissingSection { path: PathBuf, section: &'static str },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error(transparent)]
    Client(#[from] icinga2_api::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── The [api] table ─────────────────────────────────────────────────

/// Connection settings, each individually optional.
///
/// Which ones are required is decided by [`ApiSection::to_client_config`]:
/// a URL plus one credential mechanism.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ApiSection {
    /// API endpoint, e.g. `https://icinga.example:5665`.
    pub url: Option<String>,

    pub username: Option<String>,

    /// Plaintext password. Prefer `ICINGA2_API_PASSWORD`.
    pub password: Option<String>,

    /// Client certificate (PEM); may also contain the key.
    pub certificate: Option<PathBuf>,

    /// Client key (PEM), when kept apart from the certificate.
    pub key: Option<PathBuf>,

    /// CA used to verify the server. Verification is off without it.
    pub ca_certificate: Option<PathBuf>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

impl fmt::Debug for ApiSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSection")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("certificate", &self.certificate)
            .field("key", &self.key)
            .field("ca_certificate", &self.ca_certificate)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiSection {
    /// Overlay every field that is set in `other`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.url = other.url.or(self.url);
        self.username = other.username.or(self.username);
        self.password = other.password.or(self.password);
        self.certificate = other.certificate.or(self.certificate);
        self.key = other.key.or(self.key);
        self.ca_certificate = other.ca_certificate.or(self.ca_certificate);
        self.timeout = other.timeout.or(self.timeout);
        self
    }

    /// Validate and build the client configuration.
    ///
    /// Blank strings count as unset. Credential priority is certificate +
    /// key, then certificate alone, then username + password.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut builder = ClientConfig::builder();

        if let Some(url) = non_blank(self.url.as_deref()) {
            builder = builder.url(url);
        }
        if let Some(username) = non_blank(self.username.as_deref()) {
            builder = builder.username(username);
        }
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            builder = builder.password(password.to_owned());
        }
        if let Some(certificate) = non_blank_path(self.certificate.as_deref()) {
            builder = builder.certificate(certificate);
        }
        if let Some(key) = non_blank_path(self.key.as_deref()) {
            builder = builder.key(key);
        }
        if let Some(ca) = non_blank_path(self.ca_certificate.as_deref()) {
            builder = builder.ca_certificate(ca);
        }
        if let Some(secs) = self.timeout.filter(|s| *s > 0) {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder.build()?)
    }

    /// Render as a TOML document with the password masked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        #[derive(Serialize)]
        struct Document<'a> {
            api: &'a ApiSection,
        }

        let mut shown = self.clone();
        if shown.password.is_some() {
            shown.password = Some("********".into());
        }
        Ok(toml::to_string_pretty(&Document { api: &shown })?)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn non_blank_path(value: Option<&Path>) -> Option<&Path> {
    value.filter(|p| !p.as_os_str().is_empty())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the default config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "icinga", "icinga2-api").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("icinga2-api");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the `[api]` table from a file, then apply environment overrides.
///
/// An explicit `path` must exist. Without one, the default path is used
/// if present and silently skipped otherwise.
pub fn load(path: Option<&Path>) -> Result<ApiSection, ConfigError> {
    let path = match path {
        Some(path) if !path.exists() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Some(path) => Some(path.to_path_buf()),
        None => Some(config_path()).filter(|p| p.exists()),
    };

    let mut figment = Figment::new();
    if let Some(path) = &path {
        figment = figment.merge(Toml::file(path));
        require_section(&figment, path)?;
    }

    figment = figment.merge(env_provider());
    let verbatim: BTreeMap<String, String> = Env::prefixed(ENV_PREFIX)
        .only(STRING_KEYS)
        .iter()
        .map(|(key, value)| (key.as_str().to_owned(), value))
        .collect();
    if !verbatim.is_empty() {
        figment = figment.merge(string_overrides(verbatim));
    }

    if !figment.contains(SECTION) {
        return Ok(ApiSection::default());
    }
    Ok(figment.extract_inner(SECTION)?)
}

/// Parse a TOML document without touching the filesystem or environment.
pub fn from_toml_str(source: &str) -> Result<ApiSection, ConfigError> {
    let figment = Figment::from(Toml::string(source));
    require_section(&figment, Path::new("<string>"))?;
    Ok(figment.extract_inner(SECTION)?)
}

/// Parse errors surface as [`ConfigError::Figment`]; only a well-formed
/// document without the table is [`ConfigError::MissingSection`].
fn require_section(figment: &Figment, path: &Path) -> Result<(), ConfigError> {
    match figment.find_value(SECTION) {
        Ok(_) => Ok(()),
        Err(e) if matches!(e.kind, figment::error::Kind::MissingField(_)) => {
            Err(ConfigError::MissingSection {
                path: path.to_path_buf(),
                section: SECTION,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Parsed environment overrides for the non-string keys.
///
/// `ICINGA2_API_TIMEOUT` → `api.timeout`
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .ignore(STRING_KEYS)
        .map(|key| format!("{SECTION}.{key}").into())
}

/// String keys under `[api]`, kept as raw text so a password like `123456`
/// or `true` stays a string.
fn string_overrides(values: BTreeMap<String, String>) -> Serialized<BTreeMap<String, String>> {
    Serialized::default(SECTION, values)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn later_values_win_on_merge() {
        let base = ApiSection {
            url: Some("https://a:5665".into()),
            username: Some("root".into()),
            ..ApiSection::default()
        };
        let overlay = ApiSection {
            url: Some("https://b:5665".into()),
            ..ApiSection::default()
        };
        let merged = base.merge(overlay);
        assert_eq!(merged.url.as_deref(), Some("https://b:5665"));
        assert_eq!(merged.username.as_deref(), Some("root"));
    }

    #[test]
    fn string_overrides_are_not_parsed() {
        let figment = Figment::from(Toml::string(
            "[api]\nurl = \"https://icinga:5665\"\nusername = \"root\"\ntimeout = 5\n",
        ))
        .merge(string_overrides(BTreeMap::from([
            ("password".to_owned(), "123456".to_owned()),
            ("username".to_owned(), "true".to_owned()),
        ])));

        let section: ApiSection = figment.extract_inner(SECTION).unwrap();
        assert_eq!(section.password.as_deref(), Some("123456"));
        assert_eq!(section.username.as_deref(), Some("true"));
        assert_eq!(section.url.as_deref(), Some("https://icinga:5665"));
        assert_eq!(section.timeout, Some(5));
    }

    #[test]
    fn debug_never_prints_password() {
        let section = ApiSection {
            password: Some("hunter2".into()),
            ..ApiSection::default()
        };
        let rendered = format!("{section:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn redacted_toml_masks_password() {
        let section = ApiSection {
            url: Some("https://icinga:5665".into()),
            password: Some("hunter2".into()),
            ..ApiSection::default()
        };
        let rendered = section.to_redacted_toml().unwrap();
        assert!(rendered.contains("[api]"));
        assert!(rendered.contains("https://icinga:5665"));
        assert!(!rendered.contains("hunter2"));
    }
}

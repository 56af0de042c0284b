// Connection configuration for the Icinga 2 API client.
//
// Built once, validated once, then shared read-only by every resource
// group through the transport.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::auth::Auth;
use crate::error::Error;

/// TLS server verification mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Verify the server certificate, trusting the CA in the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed Icinga deployments).
    DangerAcceptInvalid,
}

/// Immutable connection settings for a [`Client`](crate::Client).
#[derive(Debug)]
pub struct ClientConfig {
    pub url: Url,
    pub auth: Auth,
    pub tls: TlsMode,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Start building a config. All fields are optional until
    /// [`build`](ClientConfigBuilder::build) validates them together.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Collects the loosely-typed connection settings (as they appear in a
/// config file or on a command line) and turns them into a [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    certificate: Option<PathBuf>,
    key: Option<PathBuf>,
    ca_certificate: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<SecretString>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate = Some(path.into());
        self
    }

    pub fn key(mut self, path: impl Into<PathBuf>) -> Self {
        self.key = Some(path.into());
        self
    }

    pub fn ca_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_certificate = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Fails if the URL is missing or unparsable, or if neither a client
    /// certificate nor a username/password pair is present. A key without a
    /// certificate is ignored.
    pub fn build(self) -> Result<ClientConfig, Error> {
        let raw_url = self
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| Error::config("no API url configured"))?;
        let mut url = Url::parse(raw_url.trim())?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let auth = match (self.certificate, self.key, self.username, self.password) {
            (Some(certificate), Some(key), _, _) => Auth::CertificateKey { certificate, key },
            (Some(certificate), None, _, _) => Auth::Certificate(certificate),
            (None, _, Some(username), Some(password)) => Auth::Basic { username, password },
            _ => {
                return Err(Error::config(
                    "no credentials configured: need a client certificate or username and password",
                ));
            }
        };

        let tls = self
            .ca_certificate
            .map_or(TlsMode::DangerAcceptInvalid, TlsMode::CustomCa);

        Ok(ClientConfig {
            url,
            auth,
            tls,
            timeout: self.timeout,
        })
    }
}

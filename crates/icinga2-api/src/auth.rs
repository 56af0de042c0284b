use std::path::PathBuf;

use secrecy::SecretString;

/// Credentials for authenticating with the Icinga 2 API.
///
/// Exactly one mechanism is active per client. When several are configured,
/// [`ClientConfigBuilder::build`](crate::ClientConfigBuilder::build) picks one
/// in this order: certificate + key, combined certificate, username + password.
#[derive(Debug)]
pub enum Auth {
    /// Client certificate and private key in separate PEM files.
    CertificateKey {
        certificate: PathBuf,
        key: PathBuf,
    },

    /// A single PEM file holding both the client certificate and its key.
    Certificate(PathBuf),

    /// HTTP basic auth against an `ApiUser`.
    Basic {
        username: String,
        password: SecretString,
    },
}

impl Auth {
    /// Short label for logging; never includes secret material.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CertificateKey { .. } => "certificate+key",
            Self::Certificate(_) => "certificate",
            Self::Basic { .. } => "basic",
        }
    }

    /// Whether this mechanism presents a TLS client identity.
    pub fn uses_client_certificate(&self) -> bool {
        !matches!(self, Self::Basic { .. })
    }
}

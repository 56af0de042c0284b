// Shared HTTP transport for every resource group.
//
// Builds one `reqwest::Client` from the `ClientConfig` (TLS mode, client
// identity, timeouts, fixed headers) and turns each call into exactly one
// outbound request. Every request goes out as a POST; the logical method
// travels in `X-HTTP-Method-Override`.

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::{Instrument, Span, debug};
use url::Url;

use crate::auth::Auth;
use crate::config::{ClientConfig, TlsMode};
use crate::error::Error;

const USER_AGENT: &str = concat!("icinga2-api-rs/", env!("CARGO_PKG_VERSION"));

/// Header carrying the logical HTTP method.
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// Raw body chunks of a streaming response, in arrival order.
pub type ByteStream = BoxStream<'static, Result<Bytes, Error>>;

/// One HTTP client plus the immutable connection settings it was built from.
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
    auth: Auth,
    timeout: Option<Duration>,
    span: Span,
}

impl Transport {
    /// Build the HTTP client: TLS verification, client identity, fixed headers.
    ///
    /// Certificate files are read here, so a bad path fails at construction
    /// rather than on the first request.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);

        if let Some(timeout) = config.timeout {
            builder = builder.connect_timeout(timeout);
        }

        match &config.tls {
            TlsMode::CustomCa(path) => {
                let pem = read_pem(path, "CA certificate")?;
                let cert = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| Error::Tls(format!("invalid CA certificate: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        if let Some(identity) = load_identity(&config.auth)? {
            builder = builder.identity(identity);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))?;

        let span = tracing::debug_span!(
            "icinga2",
            endpoint = %config.url,
            auth = config.auth.kind(),
        );

        Ok(Self {
            http,
            base_url: config.url,
            auth: config.auth,
            timeout: config.timeout,
            span,
        })
    }

    /// The API endpoint every path is joined against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join a request path onto the endpoint.
    ///
    /// Standard URL-join rules: a relative path (`v1/status`) is resolved
    /// against the endpoint's directory, an absolute one (`/v1/status`)
    /// replaces the endpoint's path.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Join `path` onto the endpoint, then append `segment` as one
    /// percent-encoded path segment.
    ///
    /// `#`, `?`, `/` and `%` in the segment are escaped, so an object name
    /// can never address a different resource. `!` is kept as is.
    pub fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, Error> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send one request and decode the JSON response body.
    ///
    /// Non-2xx responses become [`Error::Api`]. An empty 2xx body decodes
    /// to `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Value, Error> {
        self.request_url(method, self.url(path)?, payload).await
    }

    /// Like [`request`](Self::request), for a URL already resolved against
    /// the endpoint.
    pub async fn request_url(
        &self,
        method: Method,
        url: Url,
        payload: Option<&Value>,
    ) -> Result<Value, Error> {
        async {
            debug!(%method, %url, "request");

            let mut builder = self.build(&method, url, payload);
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }

            let resp = check_status(builder.send().await?).await?;
            let body = resp.text().await?;
            decode_body(body)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Send one request and hand back the response body as a chunk stream.
    ///
    /// The connection stays open until the returned stream is dropped or
    /// exhausted. No total-request timeout is applied.
    pub async fn request_stream(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<ByteStream, Error> {
        let url = self.url(path)?;

        let resp = async {
            debug!(%method, %url, "streaming request");
            check_status(self.build(&method, url, payload).send().await?).await
        }
        .instrument(self.span.clone())
        .await?;

        Ok(resp.bytes_stream().map_err(Error::Transport).boxed())
    }

    fn build(&self, method: &Method, url: Url, payload: Option<&Value>) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .post(url)
            .header(METHOD_OVERRIDE_HEADER, method.as_str());

        if let Auth::Basic { username, password } = &self.auth {
            builder = builder.basic_auth(username, Some(password.expose_secret()));
        }

        match payload {
            Some(body) if !is_empty_payload(body) => builder.json(body),
            _ => builder,
        }
    }
}

/// Encode a typed request body into the JSON mapping sent on the wire.
pub(crate) fn to_payload<T: Serialize>(body: &T) -> Result<Value, Error> {
    serde_json::to_value(body).map_err(Error::Serialization)
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let body = error_body(resp.text().await, &url);
    Err(Error::Api {
        url,
        status: status.as_u16(),
        body,
    })
}

/// Body of a failed response; a read failure is logged and described in
/// place of the text.
fn error_body(body: Result<String, reqwest::Error>, url: &str) -> String {
    body.unwrap_or_else(|e| {
        debug!(error = %e, url, "failed to read error response body");
        format!("<unreadable response body: {e}>")
    })
}

fn decode_body(body: String) -> Result<Value, Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>, Error> {
    std::fs::read(path)
        .map_err(|e| Error::Tls(format!("failed to read {what} {}: {e}", path.display())))
}

/// Load the TLS client identity for certificate-based auth.
fn load_identity(auth: &Auth) -> Result<Option<reqwest::Identity>, Error> {
    let pem = match auth {
        Auth::CertificateKey { certificate, key } => {
            let mut pem = read_pem(certificate, "client certificate")?;
            pem.push(b'\n');
            pem.extend(read_pem(key, "client key")?);
            pem
        }
        Auth::Certificate(path) => read_pem(path, "client certificate")?,
        Auth::Basic { .. } => return Ok(None),
    };

    reqwest::Identity::from_pem(&pem)
        .map(Some)
        .map_err(|e| Error::Tls(format!("invalid client certificate: {e}")))
}

// Status and statistics under `/v1/status`.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::transport::Transport;

/// Status queries, borrowed from a [`Client`](crate::Client).
#[derive(Clone, Copy)]
pub struct Status<'a> {
    transport: &'a Transport,
}

impl<'a> Status<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Fetch status for every component, or for one (`IcingaApplication`,
    /// `CIB`, `ApiListener`, ...).
    ///
    /// `GET /v1/status[/<component>]`
    ///
    /// Returns the raw response, envelope included.
    pub async fn list(&self, component: Option<&str>) -> Result<Value, Error> {
        let url = match component.filter(|c| !c.is_empty()) {
            Some(component) => self.transport.url_with_segment("v1/status", component)?,
            None => self.transport.url("v1/status")?,
        };
        debug!(?component, "fetching status");
        self.transport.request_url(Method::GET, url, None).await
    }
}

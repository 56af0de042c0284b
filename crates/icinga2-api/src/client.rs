// Entry point tying the resource groups to one shared transport.

use std::sync::Arc;

use crate::actions::Actions;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::events::Events;
use crate::objects::Objects;
use crate::status::Status;
use crate::transport::Transport;

/// Async client for the Icinga 2 management API.
///
/// Cheap to clone; clones share one connection pool and configuration.
///
/// ```no_run
/// # async fn demo() -> Result<(), icinga2_api::Error> {
/// use icinga2_api::{Client, ClientConfig, ListQuery, ObjectType};
///
/// let config = ClientConfig::builder()
///     .url("https://icinga.example:5665")
///     .username("root")
///     .password("icinga".to_string())
///     .build()?;
/// let client = Client::new(config)?;
///
/// let hosts = client
///     .objects()
///     .list(ObjectType::Host, &ListQuery::new().attrs(["address"]))
///     .await?;
/// # let _ = hosts;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<Transport>,
}

impl Client {
    /// Build the HTTP client. Certificate files are read here.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            transport: Arc::new(Transport::new(config)?),
        })
    }

    pub fn objects(&self) -> Objects<'_> {
        Objects::new(&self.transport)
    }

    pub fn actions(&self) -> Actions<'_> {
        Actions::new(&self.transport)
    }

    pub fn events(&self) -> Events<'_> {
        Events::new(&self.transport)
    }

    pub fn status(&self) -> Status<'_> {
        Status::new(&self.transport)
    }

    /// The underlying transport, for endpoints without a typed wrapper.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

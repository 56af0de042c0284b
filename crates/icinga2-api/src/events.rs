// Event stream subscription under `/v1/events`.

use futures_util::stream::{BoxStream, StreamExt};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::filter::Filter;
use crate::stream::decode_events;
use crate::transport::{Transport, to_payload};

/// Decoded events in arrival order. Dropping the stream closes the
/// connection.
pub type EventStream = BoxStream<'static, Result<Value, Error>>;

/// Event subscription, borrowed from a [`Client`](crate::Client).
#[derive(Clone, Copy)]
pub struct Events<'a> {
    transport: &'a Transport,
}

#[derive(Debug, Serialize)]
struct SubscribeBody<'a> {
    types: &'a [String],
    queue: &'a str,
    #[serde(flatten)]
    filter: Option<&'a Filter>,
}

impl<'a> Events<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Open a long-lived subscription.
    ///
    /// `POST /v1/events` with `{"types": [...], "queue": "...", "filter": ...}`
    ///
    /// `types` are event type names such as `CheckResult` or
    /// `StateChange`. Each server-side `queue` name gets its own copy of
    /// every event. The stream yields one JSON value per line of the
    /// response body and ends when the server closes the connection.
    pub async fn subscribe<I, S>(
        &self,
        types: I,
        queue: &str,
        filter: Option<&Filter>,
    ) -> Result<EventStream, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        const ACTION: &str = "subscribe";
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        if types.is_empty() {
            return Err(Error::MissingArgument {
                action: ACTION,
                argument: "types",
            });
        }
        if queue.is_empty() {
            return Err(Error::MissingArgument {
                action: ACTION,
                argument: "queue",
            });
        }
        if filter.is_some_and(Filter::is_blank) {
            return Err(Error::MissingArgument {
                action: ACTION,
                argument: "filter",
            });
        }

        debug!(?types, queue, "subscribing to events");
        let payload = to_payload(&SubscribeBody {
            types: &types,
            queue,
            filter,
        })?;
        let chunks = self
            .transport
            .request_stream(Method::POST, "v1/events", Some(&payload))
            .await?;
        Ok(decode_events(chunks).boxed())
    }
}

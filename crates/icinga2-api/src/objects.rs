// Object queries and CRUD under `/v1/objects`.

use reqwest::Method;
use serde_json::{Map, Value, json};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::object_type::ObjectType;
use crate::requests::{DeleteQuery, ListQuery, NewObject};
use crate::transport::{Transport, to_payload};

/// Object CRUD, borrowed from a [`Client`](crate::Client).
#[derive(Clone, Copy)]
pub struct Objects<'a> {
    transport: &'a Transport,
}

impl<'a> Objects<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// List objects of one type.
    ///
    /// `GET /v1/objects/<type>[/<name>]`
    ///
    /// Returns the `results` array of the response envelope.
    pub async fn list(
        &self,
        object_type: ObjectType,
        query: &ListQuery,
    ) -> Result<Vec<Value>, Error> {
        if query.filter.as_ref().is_some_and(|f| f.is_blank()) {
            return Err(Error::MissingArgument {
                action: "list",
                argument: "filter",
            });
        }

        let url = self.object_url(object_type, query.name.as_deref())?;
        debug!(%object_type, name = ?query.name, "listing objects");
        let payload = to_payload(&query.body())?;
        let response = self
            .transport
            .request_url(Method::GET, url, Some(&payload))
            .await?;
        results(response)
    }

    /// Fetch a single object by name.
    ///
    /// `GET /v1/objects/<type>/<name>`
    ///
    /// Uses the attrs, joins and filter of `query`; its `name` is ignored.
    /// An empty result set is [`Error::ObjectNotFound`].
    pub async fn get(
        &self,
        object_type: ObjectType,
        name: &str,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        let query = query.clone().name(name);
        self.list(object_type, &query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::ObjectNotFound {
                object_type: object_type.to_string(),
                name: name.to_owned(),
            })
    }

    /// Create an object at runtime.
    ///
    /// `PUT /v1/objects/<type>/<name>`
    pub async fn create(
        &self,
        object_type: ObjectType,
        name: &str,
        object: &NewObject,
    ) -> Result<Value, Error> {
        let url = self.object_url(object_type, Some(name))?;
        debug!(%object_type, name, templates = ?object.templates, "creating object");
        let payload = to_payload(object)?;
        self.transport
            .request_url(Method::PUT, url, Some(&payload))
            .await
    }

    /// Modify attributes of an existing object.
    ///
    /// `POST /v1/objects/<type>/<name>` with `{"attrs": {...}}`
    pub async fn update(
        &self,
        object_type: ObjectType,
        name: &str,
        attrs: Map<String, Value>,
    ) -> Result<Value, Error> {
        let url = self.object_url(object_type, Some(name))?;
        debug!(%object_type, name, count = attrs.len(), "updating object");
        let payload = json!({ "attrs": attrs });
        self.transport
            .request_url(Method::POST, url, Some(&payload))
            .await
    }

    /// Delete one object by name, or every object matching a filter.
    ///
    /// `DELETE /v1/objects/<type>[/<name>]`
    pub async fn delete(&self, object_type: ObjectType, query: &DeleteQuery) -> Result<Value, Error> {
        match (&query.name, &query.filter) {
            (None, None) => {
                return Err(Error::MissingArgument {
                    action: "delete",
                    argument: "name or filter",
                });
            }
            (_, Some(filter)) if filter.is_blank() => {
                return Err(Error::MissingArgument {
                    action: "delete",
                    argument: "filter",
                });
            }
            _ => {}
        }

        let url = self.object_url(object_type, query.name.as_deref())?;
        debug!(%object_type, name = ?query.name, cascade = query.cascade, "deleting objects");
        let payload = to_payload(&query.body())?;
        self.transport
            .request_url(Method::DELETE, url, Some(&payload))
            .await
    }

    /// `v1/objects/<plural>[/<name>]`, with the name as one encoded segment.
    fn object_url(&self, object_type: ObjectType, name: Option<&str>) -> Result<Url, Error> {
        let path = format!("v1/objects/{}", object_type.url_segment());
        match name {
            Some(name) => self.transport.url_with_segment(&path, name),
            None => self.transport.url(&path),
        }
    }
}

/// Unwrap the `{"results": [...]}` envelope.
fn results(response: Value) -> Result<Vec<Value>, Error> {
    match response {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(results)) => Ok(results),
            _ => Err(Error::Deserialization {
                message: "response has no \"results\" array".into(),
                body: Value::Object(map).to_string(),
            }),
        },
        Value::Null => Ok(Vec::new()),
        other => Err(Error::Deserialization {
            message: "expected a JSON object envelope".into(),
            body: other.to_string(),
        }),
    }
}

// Runtime actions under `/v1/actions`.
//
// Every action is a POST to `v1/actions/<verb>`. Targeted actions carry the
// object `type` plus either a filter or a single object name; parameters
// are merged into the same top-level mapping.

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::filter::Filter;
use crate::object_type::ObjectType;
use crate::requests::{
    Acknowledgement, CheckResult, CustomNotification, DowntimeSchedule, NewComment,
    RescheduleCheck,
};
use crate::transport::{Transport, to_payload};

/// Action invocation, borrowed from a [`Client`](crate::Client).
#[derive(Clone, Copy)]
pub struct Actions<'a> {
    transport: &'a Transport,
}

/// Which objects a targeted action applies to.
enum Target<'f> {
    Name(&'f str),
    Filter(&'f Filter),
    Both(&'f str, &'f Filter),
}

impl<'a> Actions<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Submit a passive check result for one host or service.
    ///
    /// The name is sent under the lower-cased type key
    /// (`{"service": "web01!http", "exit_status": 2, ...}`); no `type`
    /// field is sent.
    pub async fn process_check_result(
        &self,
        object_type: ObjectType,
        name: &str,
        result: &CheckResult,
    ) -> Result<Value, Error> {
        const ACTION: &str = "process-check-result";
        if !matches!(object_type, ObjectType::Host | ObjectType::Service) {
            return Err(Error::InvalidArgument {
                action: ACTION,
                message: format!("object type must be Host or Service, got {object_type}"),
            });
        }
        if name.is_empty() {
            return Err(Error::MissingArgument {
                action: ACTION,
                argument: "name",
            });
        }
        let payload = check_result_payload(object_type, name, result)?;
        debug!(action = ACTION, %object_type, name, "invoking action");
        self.post(ACTION, Some(&payload)).await
    }

    /// Reschedule the next check of every matching host or service.
    pub async fn reschedule_check(
        &self,
        object_type: ObjectType,
        filter: &Filter,
        options: &RescheduleCheck,
    ) -> Result<Value, Error> {
        self.invoke_filtered("reschedule-check", object_type, filter, options)
            .await
    }

    pub async fn send_custom_notification(
        &self,
        object_type: ObjectType,
        filter: &Filter,
        notification: &CustomNotification,
    ) -> Result<Value, Error> {
        self.invoke_filtered("send-custom-notification", object_type, filter, notification)
            .await
    }

    /// Delay notifications until the given Unix timestamp.
    pub async fn delay_notification(
        &self,
        object_type: ObjectType,
        filter: &Filter,
        timestamp: i64,
    ) -> Result<Value, Error> {
        #[derive(Serialize)]
        struct Delay {
            timestamp: i64,
        }
        self.invoke_filtered("delay-notification", object_type, filter, &Delay { timestamp })
            .await
    }

    pub async fn acknowledge_problem(
        &self,
        object_type: ObjectType,
        filter: &Filter,
        acknowledgement: &Acknowledgement,
    ) -> Result<Value, Error> {
        self.invoke_filtered("acknowledge-problem", object_type, filter, acknowledgement)
            .await
    }

    pub async fn remove_acknowledgement(
        &self,
        object_type: ObjectType,
        filter: &Filter,
    ) -> Result<Value, Error> {
        self.invoke_filtered("remove-acknowledgement", object_type, filter, &Value::Null)
            .await
    }

    pub async fn add_comment(
        &self,
        object_type: ObjectType,
        filter: &Filter,
        comment: &NewComment,
    ) -> Result<Value, Error> {
        self.invoke_filtered("add-comment", object_type, filter, comment)
            .await
    }

    /// Remove comments by name, by filter, or both.
    pub async fn remove_comment(
        &self,
        object_type: ObjectType,
        name: Option<&str>,
        filter: Option<&Filter>,
    ) -> Result<Value, Error> {
        const ACTION: &str = "remove-comment";
        let target = target(ACTION, name, filter)?;
        self.invoke(ACTION, object_type, &target, &Value::Null)
            .await
    }

    pub async fn schedule_downtime(
        &self,
        object_type: ObjectType,
        filter: &Filter,
        downtime: &DowntimeSchedule,
    ) -> Result<Value, Error> {
        self.invoke_filtered("schedule-downtime", object_type, filter, downtime)
            .await
    }

    /// Remove downtimes by name, by filter, or both.
    pub async fn remove_downtime(
        &self,
        object_type: ObjectType,
        name: Option<&str>,
        filter: Option<&Filter>,
    ) -> Result<Value, Error> {
        const ACTION: &str = "remove-downtime";
        let target = target(ACTION, name, filter)?;
        self.invoke(ACTION, object_type, &target, &Value::Null)
            .await
    }

    /// Shut down the Icinga 2 process.
    pub async fn shutdown_process(&self) -> Result<Value, Error> {
        self.post("shutdown-process", None).await
    }

    /// Restart the Icinga 2 process.
    pub async fn restart_process(&self) -> Result<Value, Error> {
        self.post("restart-process", None).await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn invoke_filtered<P: Serialize>(
        &self,
        action: &'static str,
        object_type: ObjectType,
        filter: &Filter,
        params: &P,
    ) -> Result<Value, Error> {
        if filter.is_blank() {
            return Err(Error::MissingArgument {
                action,
                argument: "filter",
            });
        }
        self.invoke(action, object_type, &Target::Filter(filter), params)
            .await
    }

    async fn invoke<P: Serialize>(
        &self,
        action: &'static str,
        object_type: ObjectType,
        target: &Target<'_>,
        params: &P,
    ) -> Result<Value, Error> {
        let payload = action_payload(object_type, target, params)?;
        debug!(action, %object_type, "invoking action");
        self.post(action, Some(&payload)).await
    }

    async fn post(&self, action: &str, payload: Option<&Value>) -> Result<Value, Error> {
        let path = format!("v1/actions/{action}");
        self.transport
            .request(Method::POST, &path, payload)
            .await
    }
}

fn target<'f>(
    action: &'static str,
    name: Option<&'f str>,
    filter: Option<&'f Filter>,
) -> Result<Target<'f>, Error> {
    let name = name.filter(|n| !n.is_empty());
    let filter = filter.filter(|f| !f.is_blank());
    match (name, filter) {
        (Some(name), Some(filter)) => Ok(Target::Both(name, filter)),
        (Some(name), None) => Ok(Target::Name(name)),
        (None, Some(filter)) => Ok(Target::Filter(filter)),
        (None, None) => Err(Error::MissingArgument {
            action,
            argument: "name or filter",
        }),
    }
}

fn check_result_payload(
    object_type: ObjectType,
    name: &str,
    result: &CheckResult,
) -> Result<Value, Error> {
    let mut payload = to_payload(result)?;
    if let Value::Object(map) = &mut payload {
        map.insert(object_type.name_key(), Value::String(name.into()));
    }
    Ok(payload)
}

/// Build the top-level action mapping: params, then `type`, then the target.
fn action_payload<P: Serialize>(
    object_type: ObjectType,
    target: &Target<'_>,
    params: &P,
) -> Result<Value, Error> {
    let mut payload = match to_payload(params)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    payload.insert("type".into(), Value::String(object_type.as_str().into()));

    let (name, filter) = match *target {
        Target::Name(name) => (Some(name), None),
        Target::Filter(filter) => (None, Some(filter)),
        Target::Both(name, filter) => (Some(name), Some(filter)),
    };
    if let Some(name) = name {
        payload.insert(object_type.name_key(), Value::String(name.into()));
    }
    if let Some(filter) = filter {
        if let Value::Object(fields) = to_payload(filter)? {
            payload.extend(fields);
        }
    }

    Ok(Value::Object(payload))
}

// ── Typed parameters for object queries and actions ──
//
// Each struct serializes to (part of) the JSON payload the API expects.
// Optional fields left unset never appear on the wire.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::filter::Filter;

// ── Objects ────────────────────────────────────────────────────────

/// Which joined objects to include in an object listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Joins {
    /// Every join the type supports (`all_joins`).
    All,
    /// Only these joins, e.g. `["host.name", "host.address"]`.
    Fields(Vec<String>),
}

/// Query for `GET /v1/objects/<type>[/<name>]`.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub name: Option<String>,
    pub attrs: Vec<String>,
    pub filter: Option<Filter>,
    pub joins: Option<Joins>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn joins(mut self, joins: Joins) -> Self {
        self.joins = Some(joins);
        self
    }

    pub(crate) fn body(&self) -> ListBody<'_> {
        let (joins, all_joins) = match &self.joins {
            Some(Joins::All) => (None, Some("1")),
            Some(Joins::Fields(fields)) if !fields.is_empty() => (Some(fields), None),
            _ => (None, None),
        };
        ListBody {
            attrs: &self.attrs,
            filter: self.filter.as_ref(),
            joins,
            all_joins,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListBody<'a> {
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    attrs: &'a [String],
    #[serde(flatten)]
    filter: Option<&'a Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    joins: Option<&'a Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    all_joins: Option<&'static str>,
}

/// Body for `PUT /v1/objects/<type>/<name>`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewObject {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,
}

impl NewObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.templates.push(template.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }
}

/// Selection for `DELETE /v1/objects/<type>[/<name>]`.
///
/// Cascading deletion is on by default, so dependent objects (services of
/// a host, downtimes of a service, ...) go too.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    pub name: Option<String>,
    pub filter: Option<Filter>,
    pub cascade: bool,
}

impl Default for DeleteQuery {
    fn default() -> Self {
        Self {
            name: None,
            filter: None,
            cascade: true,
        }
    }
}

impl DeleteQuery {
    /// Delete one object by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Delete every object matching a filter.
    pub fn matching(filter: impl Into<Filter>) -> Self {
        Self {
            filter: Some(filter.into()),
            ..Self::default()
        }
    }

    pub fn cascade(mut self, cascade: bool) -> Self {
        self.cascade = cascade;
        self
    }

    pub(crate) fn body(&self) -> DeleteBody<'_> {
        DeleteBody {
            filter: self.filter.as_ref(),
            cascade: self.cascade.then_some(1),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteBody<'a> {
    #[serde(flatten)]
    filter: Option<&'a Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cascade: Option<u8>,
}

// ── Actions ────────────────────────────────────────────────────────

/// A passive check result for `process-check-result`.
///
/// Exit status for services: 0=OK, 1=WARNING, 2=CRITICAL, 3=UNKNOWN;
/// for hosts: 0=UP, 1=DOWN.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub exit_status: i32,
    pub plugin_output: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub performance_data: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub check_command: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_source: Option<String>,
}

impl CheckResult {
    pub fn new(exit_status: i32, plugin_output: impl Into<String>) -> Self {
        Self {
            exit_status,
            plugin_output: plugin_output.into(),
            performance_data: Vec::new(),
            check_command: Vec::new(),
            check_source: None,
        }
    }

    pub fn performance_data<I, S>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.performance_data = data.into_iter().map(Into::into).collect();
        self
    }

    pub fn check_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check_command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn check_source(mut self, source: impl Into<String>) -> Self {
        self.check_source = Some(source.into());
        self
    }
}

/// Options for `reschedule-check`.
#[derive(Debug, Clone, Serialize)]
pub struct RescheduleCheck {
    /// Unix timestamp of the next check; now when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_check: Option<i64>,
    /// Ignore check period restrictions and disabled checks.
    pub force_check: bool,
}

impl Default for RescheduleCheck {
    fn default() -> Self {
        Self {
            next_check: None,
            force_check: true,
        }
    }
}

/// Parameters for `send-custom-notification`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomNotification {
    pub author: String,
    pub comment: String,
    /// Send even during downtimes or with notifications disabled.
    pub force: bool,
}

impl CustomNotification {
    pub fn new(author: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            comment: comment.into(),
            force: false,
        }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Parameters for `acknowledge-problem`.
#[derive(Debug, Clone, Serialize)]
pub struct Acknowledgement {
    pub author: String,
    pub comment: String,
    /// Unix timestamp after which the acknowledgement is removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    /// Keep the acknowledgement until the object fully recovers.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sticky: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub notify: bool,
}

impl Acknowledgement {
    pub fn new(author: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            comment: comment.into(),
            expiry: None,
            sticky: false,
            notify: false,
        }
    }

    pub fn expiry(mut self, timestamp: i64) -> Self {
        self.expiry = Some(timestamp);
        self
    }

    pub fn sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }

    pub fn notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }
}

/// Parameters for `add-comment`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub author: String,
    pub comment: String,
}

impl NewComment {
    pub fn new(author: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            comment: comment.into(),
        }
    }
}

/// Parameters for `schedule-downtime`.
#[derive(Debug, Clone, Serialize)]
pub struct DowntimeSchedule {
    pub author: String,
    pub comment: String,
    pub start_time: i64,
    pub end_time: i64,
    /// Length in seconds; only meaningful for flexible downtimes.
    pub duration: u64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fixed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_name: Option<String>,
}

impl DowntimeSchedule {
    pub fn new(
        author: impl Into<String>,
        comment: impl Into<String>,
        start_time: i64,
        end_time: i64,
        duration: u64,
    ) -> Self {
        Self {
            author: author.into(),
            comment: comment.into(),
            start_time,
            end_time,
            duration,
            fixed: false,
            trigger_name: None,
        }
    }

    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn trigger_name(mut self, trigger: impl Into<String>) -> Self {
        self.trigger_name = Some(trigger.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_list_query_has_empty_body() {
        let query = ListQuery::new();
        assert_eq!(serde_json::to_value(query.body()).unwrap(), json!({}));
    }

    #[test]
    fn list_query_with_everything() {
        let query = ListQuery::new()
            .attrs(["address", "state"])
            .filter(Filter::new("host.vars.os == os").var("os", "Linux"))
            .joins(Joins::Fields(vec!["host.name".into()]));
        assert_eq!(
            serde_json::to_value(query.body()).unwrap(),
            json!({
                "attrs": ["address", "state"],
                "filter": "host.vars.os == os",
                "filter_vars": {"os": "Linux"},
                "joins": ["host.name"],
            })
        );
    }

    #[test]
    fn all_joins_is_sent_as_string_flag() {
        let query = ListQuery::new().joins(Joins::All);
        assert_eq!(
            serde_json::to_value(query.body()).unwrap(),
            json!({"all_joins": "1"})
        );
    }

    #[test]
    fn delete_cascades_by_default() {
        let query = DeleteQuery::named("web01");
        assert_eq!(
            serde_json::to_value(query.body()).unwrap(),
            json!({"cascade": 1})
        );

        let query = DeleteQuery::matching(r#"match("vhost*", service.name)"#).cascade(false);
        assert_eq!(
            serde_json::to_value(query.body()).unwrap(),
            json!({"filter": r#"match("vhost*", service.name)"#})
        );
    }

    #[test]
    fn new_object_omits_empty_parts() {
        let object = NewObject::new().template("generic-host");
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({"templates": ["generic-host"]})
        );
    }

    #[test]
    fn acknowledgement_omits_unset_flags() {
        let ack = Acknowledgement::new("icingaadmin", "working on it");
        assert_eq!(
            serde_json::to_value(&ack).unwrap(),
            json!({"author": "icingaadmin", "comment": "working on it"})
        );

        let ack = ack.sticky(true).expiry(1_700_000_000);
        assert_eq!(
            serde_json::to_value(&ack).unwrap(),
            json!({
                "author": "icingaadmin",
                "comment": "working on it",
                "expiry": 1_700_000_000,
                "sticky": true,
            })
        );
    }

    #[test]
    fn reschedule_forces_by_default() {
        assert_eq!(
            serde_json::to_value(RescheduleCheck::default()).unwrap(),
            json!({"force_check": true})
        );
    }
}

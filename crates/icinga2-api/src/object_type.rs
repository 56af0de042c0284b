// Icinga 2 configuration object types and their URL path segments.
//
// The set mirrors the server schema; it is closed on purpose and unknown
// names are rejected before a request is built.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::Error;

/// A known Icinga 2 object type.
///
/// Serializes as the type name (`"Host"`, `"Service"`, ...), which is what
/// the `type` field of action payloads expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, IntoStaticStr)]
pub enum ObjectType {
    ApiListener,
    ApiUser,
    CheckCommand,
    Arguments,
    CheckerComponent,
    CheckResultReader,
    Comment,
    CompatLogger,
    Dependency,
    Downtime,
    Endpoint,
    EventCommand,
    ExternalCommandListener,
    FileLogger,
    GelfWriter,
    GraphiteWriter,
    Host,
    HostGroup,
    IcingaApplication,
    IdoMySqlConnection,
    IdoPgSqlConnection,
    LiveStatusListener,
    Notification,
    NotificationCommand,
    NotificationComponent,
    OpenTsdbWriter,
    PerfdataWriter,
    ScheduledDowntime,
    Service,
    ServiceGroup,
    StatusDataWriter,
    SyslogLogger,
    TimePeriod,
    User,
    UserGroup,
    Zone,
}

impl ObjectType {
    /// The type name as the server spells it.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Pluralized path segment under `/v1/objects/`.
    pub fn url_segment(self) -> &'static str {
        match self {
            Self::ApiListener => "apilisteners",
            Self::ApiUser => "apiusers",
            Self::CheckCommand => "checkcommands",
            Self::Arguments => "argumentss",
            Self::CheckerComponent => "checkercomponents",
            Self::CheckResultReader => "checkresultreaders",
            Self::Comment => "comments",
            Self::CompatLogger => "compatloggers",
            Self::Dependency => "dependencys",
            Self::Downtime => "downtimes",
            Self::Endpoint => "endpoints",
            Self::EventCommand => "eventcommands",
            Self::ExternalCommandListener => "externalcommandlisteners",
            Self::FileLogger => "fileloggers",
            Self::GelfWriter => "gelfwriters",
            Self::GraphiteWriter => "graphitewriters",
            Self::Host => "hosts",
            Self::HostGroup => "hostgroups",
            Self::IcingaApplication => "icingaapplications",
            Self::IdoMySqlConnection => "idomysqlconnections",
            Self::IdoPgSqlConnection => "idopgsqlconnections",
            Self::LiveStatusListener => "livestatuslisteners",
            Self::Notification => "notifications",
            Self::NotificationCommand => "notificationcommands",
            Self::NotificationComponent => "notificationcomponents",
            Self::OpenTsdbWriter => "opentsdbwriters",
            Self::PerfdataWriter => "perfdatawriters",
            Self::ScheduledDowntime => "scheduleddowntimes",
            Self::Service => "services",
            Self::ServiceGroup => "servicegroups",
            Self::StatusDataWriter => "statusdatawriters",
            Self::SyslogLogger => "syslogloggers",
            Self::TimePeriod => "timeperiods",
            Self::User => "users",
            Self::UserGroup => "usergroups",
            Self::Zone => "zones",
        }
    }

    /// Payload key used when an action addresses a single object by name
    /// (`{"service": "host1!ping4"}`).
    pub fn name_key(self) -> String {
        self.as_str().to_lowercase()
    }

    /// All known types, in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    /// Exact, case-sensitive lookup by type name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidObjectType { name: s.to_owned() })
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

//! Clap derive structures for the `icinga2` CLI.
//!
//! Defines the complete command tree, global flags, and shared argument
//! groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

use icinga2_api::ObjectType;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// icinga2 -- query and control an Icinga 2 instance over its REST API
#[derive(Debug, Parser)]
#[command(
    name = "icinga2",
    version,
    about = "Query and control Icinga 2 from the command line",
    long_about = "Command-line client for the Icinga 2 REST API (port 5665).\n\n\
        Connection settings come from the [api] table of the config file,\n\
        ICINGA2_API_* environment variables and the flags below, in\n\
        increasing order of precedence.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (default: platform config dir, e.g. ~/.config/icinga2-api/config.toml)
    #[arg(long, short = 'C', env = "ICINGA2_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API endpoint, e.g. https://icinga.example:5665
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API user for basic auth
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// API password for basic auth (prefer ICINGA2_API_PASSWORD)
    #[arg(long, global = true, hide = true)]
    pub password: Option<String>,

    /// Client certificate (PEM); may also contain the key
    #[arg(long, global = true)]
    pub certificate: Option<PathBuf>,

    /// Client key (PEM) when kept apart from the certificate
    #[arg(long, global = true)]
    pub key: Option<PathBuf>,

    /// CA certificate used to verify the server; verification is off without it
    #[arg(long, global = true)]
    pub ca_certificate: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', env = "ICINGA2_OUTPUT", default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query, create, modify and delete configuration objects
    #[command(alias = "obj", alias = "o")]
    Objects(ObjectsArgs),

    /// Run actions (check results, acknowledgements, downtimes, ...)
    #[command(alias = "act", alias = "a")]
    Actions(ActionsArgs),

    /// Subscribe to the event stream
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Show status and statistics
    Status(StatusArgs),

    /// Inspect the effective configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Server-side filter expression plus its variables.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Filter expression, e.g. 'match("web*", host.name)'
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Filter variable as KEY=VALUE; VALUE is parsed as JSON when possible
    #[arg(long = "filter-var", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filter_vars: Vec<(String, Value)>,
}

/// Same as [`FilterArgs`] but the filter is mandatory.
#[derive(Debug, Args)]
pub struct RequiredFilterArgs {
    /// Filter expression, e.g. 'host.name == "web01"'
    #[arg(long, short = 'f')]
    pub filter: String,

    /// Filter variable as KEY=VALUE; VALUE is parsed as JSON when possible
    #[arg(long = "filter-var", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filter_vars: Vec<(String, Value)>,
}

#[derive(Debug, Args)]
pub struct AttrArgs {
    /// Attribute to return (repeatable)
    #[arg(long = "attr", short = 'a', value_name = "NAME")]
    pub attrs: Vec<String>,

    /// Joined object field to include, e.g. host.address (repeatable)
    #[arg(long = "join", short = 'j', value_name = "FIELD", conflicts_with = "all_joins")]
    pub joins: Vec<String>,

    /// Include every join the type supports
    #[arg(long)]
    pub all_joins: bool,
}

/// Author and text shared by comments, acknowledgements and notifications.
#[derive(Debug, Args)]
pub struct AuthorArgs {
    /// Author name
    #[arg(long)]
    pub author: String,

    /// Comment text
    #[arg(long)]
    pub comment: String,
}

// ── Objects ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ObjectsArgs {
    #[command(subcommand)]
    pub command: ObjectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ObjectsCommand {
    /// List objects of a type
    #[command(alias = "ls")]
    List {
        /// Object type, e.g. Host, Service, Downtime
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        /// Restrict to one object name
        #[arg(long, short = 'n')]
        name: Option<String>,

        #[command(flatten)]
        attrs: AttrArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show a single object
    Get {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        /// Object name, e.g. web01 or web01!http
        name: String,

        #[command(flatten)]
        attrs: AttrArgs,
    },

    /// Create an object at runtime
    Create {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        name: String,

        /// Template to import (repeatable)
        #[arg(long = "template", short = 't')]
        templates: Vec<String>,

        /// Attribute as KEY=VALUE; VALUE is parsed as JSON when possible
        #[arg(long = "attr", short = 'a', value_name = "KEY=VALUE", value_parser = parse_key_value)]
        attrs: Vec<(String, Value)>,

        /// Read attributes from a JSON object file (merged before --attr)
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Modify attributes of an object
    Update {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        name: String,

        /// Attribute as KEY=VALUE; VALUE is parsed as JSON when possible
        #[arg(long = "attr", short = 'a', value_name = "KEY=VALUE", value_parser = parse_key_value)]
        attrs: Vec<(String, Value)>,

        /// Read attributes from a JSON object file (merged before --attr)
        #[arg(long, short = 'F', required_unless_present = "attrs")]
        from_file: Option<PathBuf>,
    },

    /// Delete an object by name, or every object matching a filter
    #[command(alias = "rm")]
    Delete {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        /// Object name
        #[arg(required_unless_present = "filter")]
        name: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Keep dependent objects
        #[arg(long)]
        no_cascade: bool,
    },
}

// ── Actions ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ActionsArgs {
    #[command(subcommand)]
    pub command: ActionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ActionsCommand {
    /// Submit a passive check result for a host or service
    ProcessCheckResult {
        /// Host or Service
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        /// Object name, e.g. web01!ping4
        name: String,

        /// Services: 0=OK 1=WARNING 2=CRITICAL 3=UNKNOWN; hosts: 0=UP 1=DOWN
        #[arg(long, short = 's')]
        exit_status: i32,

        /// Main plugin output line
        #[arg(long, short = 'O')]
        plugin_output: String,

        /// Performance data item (repeatable)
        #[arg(long = "performance-data", short = 'p')]
        performance_data: Vec<String>,

        /// Check command path followed by arguments (repeatable)
        #[arg(long = "check-command")]
        check_command: Vec<String>,

        /// Name of the reporting endpoint
        #[arg(long)]
        check_source: Option<String>,
    },

    /// Reschedule checks of matching hosts or services
    RescheduleCheck {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        #[command(flatten)]
        filter: RequiredFilterArgs,

        /// Unix timestamp of the next check (default: now)
        #[arg(long)]
        next_check: Option<i64>,

        /// Respect check periods and disabled checks
        #[arg(long)]
        no_force: bool,
    },

    /// Send a custom notification
    SendCustomNotification {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        #[command(flatten)]
        filter: RequiredFilterArgs,

        #[command(flatten)]
        author: AuthorArgs,

        /// Send even during downtimes or with notifications disabled
        #[arg(long)]
        force: bool,
    },

    /// Delay notifications until a point in time
    DelayNotification {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        #[command(flatten)]
        filter: RequiredFilterArgs,

        /// Unix timestamp to delay until
        #[arg(long)]
        timestamp: i64,
    },

    /// Acknowledge host or service problems
    #[command(alias = "ack")]
    AcknowledgeProblem {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        #[command(flatten)]
        filter: RequiredFilterArgs,

        #[command(flatten)]
        author: AuthorArgs,

        /// Unix timestamp after which the acknowledgement expires
        #[arg(long)]
        expiry: Option<i64>,

        /// Keep the acknowledgement until full recovery
        #[arg(long)]
        sticky: bool,

        /// Notify contacts
        #[arg(long)]
        notify: bool,
    },

    /// Remove acknowledgements
    RemoveAcknowledgement {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        #[command(flatten)]
        filter: RequiredFilterArgs,
    },

    /// Add a comment
    AddComment {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        #[command(flatten)]
        filter: RequiredFilterArgs,

        #[command(flatten)]
        author: AuthorArgs,
    },

    /// Remove comments by name or filter
    RemoveComment {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        /// Comment name
        #[arg(long, short = 'n', required_unless_present = "filter")]
        name: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Schedule a downtime
    ScheduleDowntime {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        #[command(flatten)]
        filter: RequiredFilterArgs,

        #[command(flatten)]
        author: AuthorArgs,

        /// Unix timestamp marking the start
        #[arg(long)]
        start_time: i64,

        /// Unix timestamp marking the end
        #[arg(long)]
        end_time: i64,

        /// Length in seconds (flexible downtimes)
        #[arg(long)]
        duration: u64,

        /// Fixed rather than flexible downtime
        #[arg(long)]
        fixed: bool,

        /// Downtime that triggers this one
        #[arg(long)]
        trigger_name: Option<String>,
    },

    /// Remove downtimes by name or filter
    RemoveDowntime {
        #[arg(value_parser = parse_object_type)]
        object_type: ObjectType,

        /// Downtime name
        #[arg(long, short = 'n', required_unless_present = "filter")]
        name: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Shut down the Icinga 2 process
    ShutdownProcess,

    /// Restart the Icinga 2 process
    RestartProcess,
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Stream events until interrupted
    #[command(alias = "watch")]
    Subscribe {
        /// Event type, e.g. CheckResult, StateChange (repeatable)
        #[arg(long = "type", short = 't', required = true)]
        types: Vec<String>,

        /// Queue name; each queue receives its own copy of every event
        #[arg(long, short = 'q')]
        queue: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Stop after this many events
        #[arg(long, short = 'c')]
        count: Option<usize>,
    },
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Component, e.g. IcingaApplication, CIB, ApiListener (default: all)
    pub component: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved connection settings (password masked)
    Show,

    /// Print the default config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

fn parse_object_type(s: &str) -> Result<ObjectType, String> {
    s.parse::<ObjectType>().map_err(|e| e.to_string())
}

/// `KEY=VALUE` where VALUE is JSON if it parses, else a plain string.
fn parse_key_value(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got \"{s}\""))?;
    if key.is_empty() {
        return Err(format!("empty key in \"{s}\""));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

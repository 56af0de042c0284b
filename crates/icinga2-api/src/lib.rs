// icinga2-api: Async Rust client for the Icinga 2 management API

pub mod actions;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod object_type;
pub mod objects;
pub mod requests;
pub mod status;
pub mod stream;
pub mod transport;

pub use auth::Auth;
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, TlsMode};
pub use error::Error;
pub use events::EventStream;
pub use filter::Filter;
pub use object_type::ObjectType;
pub use requests::{
    Acknowledgement, CheckResult, CustomNotification, DeleteQuery, DowntimeSchedule, Joins,
    ListQuery, NewComment, NewObject, RescheduleCheck,
};
pub use stream::{LineBuffer, decode_events, lines};
pub use transport::{METHOD_OVERRIDE_HEADER, Transport};

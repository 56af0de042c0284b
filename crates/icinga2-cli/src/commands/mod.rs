//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod actions;
pub mod config_cmd;
pub mod events;
pub mod objects;
pub mod status;
pub mod util;

use icinga2_api::Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a connection-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Objects(args) => objects::handle(client, args, global).await,
        Command::Actions(args) => actions::handle(client, args, global).await,
        Command::Events(args) => events::handle(client, args, global).await,
        Command::Status(args) => status::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

//! Status command handler.

use icinga2_api::Client;

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &Client, args: StatusArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let status = client.status().list(args.component.as_deref()).await?;
    output::emit(global.output, &status)
}

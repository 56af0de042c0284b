//! Event command handlers.

use futures_util::StreamExt;
use tracing::{debug, warn};

use icinga2_api::Client;

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(client: &Client, args: EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EventsCommand::Subscribe {
            types,
            queue,
            filter,
            count,
        } => {
            let filter = util::optional_filter(filter);
            let mut stream = client
                .events()
                .subscribe(types, &queue, filter.as_ref())
                .await?;

            let mut seen = 0usize;
            loop {
                if count.is_some_and(|limit| seen >= limit) {
                    break;
                }

                let next = tokio::select! {
                    next = stream.next() => next,
                    _ = tokio::signal::ctrl_c() => {
                        debug!("interrupted, closing subscription");
                        break;
                    }
                };

                match next {
                    Some(Ok(event)) => {
                        output::emit(global.output, &event)?;
                        seen += 1;
                    }
                    // A garbled line doesn't end the subscription.
                    Some(Err(icinga2_api::Error::Deserialization { message, body })) => {
                        warn!(%message, %body, "skipping undecodable event");
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        debug!(seen, "server closed the event stream");
                        break;
                    }
                }
            }
            Ok(())
        }
    }
}

//! Action command handlers.

use icinga2_api::{
    Acknowledgement, CheckResult, Client, CustomNotification, DowntimeSchedule, NewComment,
    RescheduleCheck,
};

use crate::cli::{ActionsArgs, ActionsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[allow(clippy::too_many_lines)]
pub async fn handle(
    client: &Client,
    args: ActionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let actions = client.actions();

    let response = match args.command {
        ActionsCommand::ProcessCheckResult {
            object_type,
            name,
            exit_status,
            plugin_output,
            performance_data,
            check_command,
            check_source,
        } => {
            let mut result = CheckResult::new(exit_status, plugin_output)
                .performance_data(performance_data)
                .check_command(check_command);
            if let Some(source) = check_source {
                result = result.check_source(source);
            }
            actions
                .process_check_result(object_type, &name, &result)
                .await?
        }

        ActionsCommand::RescheduleCheck {
            object_type,
            filter,
            next_check,
            no_force,
        } => {
            let options = RescheduleCheck {
                next_check,
                force_check: !no_force,
            };
            actions
                .reschedule_check(object_type, &util::required_filter(filter), &options)
                .await?
        }

        ActionsCommand::SendCustomNotification {
            object_type,
            filter,
            author,
            force,
        } => {
            let notification = CustomNotification::new(author.author, author.comment).force(force);
            actions
                .send_custom_notification(object_type, &util::required_filter(filter), &notification)
                .await?
        }

        ActionsCommand::DelayNotification {
            object_type,
            filter,
            timestamp,
        } => {
            actions
                .delay_notification(object_type, &util::required_filter(filter), timestamp)
                .await?
        }

        ActionsCommand::AcknowledgeProblem {
            object_type,
            filter,
            author,
            expiry,
            sticky,
            notify,
        } => {
            let mut ack = Acknowledgement::new(author.author, author.comment)
                .sticky(sticky)
                .notify(notify);
            if let Some(expiry) = expiry {
                ack = ack.expiry(expiry);
            }
            actions
                .acknowledge_problem(object_type, &util::required_filter(filter), &ack)
                .await?
        }

        ActionsCommand::RemoveAcknowledgement {
            object_type,
            filter,
        } => {
            actions
                .remove_acknowledgement(object_type, &util::required_filter(filter))
                .await?
        }

        ActionsCommand::AddComment {
            object_type,
            filter,
            author,
        } => {
            let comment = NewComment::new(author.author, author.comment);
            actions
                .add_comment(object_type, &util::required_filter(filter), &comment)
                .await?
        }

        ActionsCommand::RemoveComment {
            object_type,
            name,
            filter,
        } => {
            let filter = util::optional_filter(filter);
            actions
                .remove_comment(object_type, name.as_deref(), filter.as_ref())
                .await?
        }

        ActionsCommand::ScheduleDowntime {
            object_type,
            filter,
            author,
            start_time,
            end_time,
            duration,
            fixed,
            trigger_name,
        } => {
            let mut downtime = DowntimeSchedule::new(
                author.author,
                author.comment,
                start_time,
                end_time,
                duration,
            )
            .fixed(fixed);
            if let Some(trigger) = trigger_name {
                downtime = downtime.trigger_name(trigger);
            }
            actions
                .schedule_downtime(object_type, &util::required_filter(filter), &downtime)
                .await?
        }

        ActionsCommand::RemoveDowntime {
            object_type,
            name,
            filter,
        } => {
            let filter = util::optional_filter(filter);
            actions
                .remove_downtime(object_type, name.as_deref(), filter.as_ref())
                .await?
        }

        ActionsCommand::ShutdownProcess => actions.shutdown_process().await?,
        ActionsCommand::RestartProcess => actions.restart_process().await?,
    };

    output::emit(global.output, &response)
}

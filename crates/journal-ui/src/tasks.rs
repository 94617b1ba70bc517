//! Server maintenance tasks.

use journal_client::types::{RunTaskParams, TaskOutcome};
use journal_core::error::ActionError;
use journal_core::event::ActionEventKind;

use crate::flow::FlowContext;

const RUN_FAILED: &str = "Failed to run task";

/// Confirm, run a task on the server, and report the result.
pub async fn run_task(
    ctx: &FlowContext<'_>,
    task_id: &str,
    param: Option<String>,
) -> Result<TaskOutcome, ActionError> {
    let result = if ctx.host.confirm(&format!("run task: {task_id}?")) {
        tracing::info!(task_id, "running task");
        ctx.service
            .run_task(RunTaskParams {
                task_id: task_id.to_string(),
                param,
            })
            .await
            .map_err(ActionError::from)
    } else {
        Err(ActionError::Cancelled)
    };

    match &result {
        Ok(outcome) => {
            let message = match &outcome.detail {
                Some(detail) => format!("task {task_id} executed.\n{detail}"),
                None => format!("task {task_id} executed."),
            };
            ctx.host.alert(&message);
            ctx.record_success(
                ActionEventKind::RunTask,
                task_id,
                outcome.detail.clone().unwrap_or_default(),
            );
        }
        Err(err) => {
            ctx.alert_failure(
                err,
                RUN_FAILED,
                &format!("Error when running task {task_id} on server."),
            );
            ctx.record_failure(ActionEventKind::RunTask, task_id, err);
        }
    }
    result
}

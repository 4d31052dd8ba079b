//! Then steps for task lifecycle scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::ensure;
use rstest_bdd_macros::then;
use taskhub::task::services::TaskServiceError;

#[then("the task has {count:usize} assignments")]
fn task_has_assignments(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let assignments = &world.current()?.assignments;
    ensure!(
        assignments.len() == count,
        "expected {count} assignments, found {}",
        assignments.len()
    );
    Ok(())
}

#[then("the task history has {count:usize} entries")]
fn task_history_has_entries(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let history = &world.current()?.history;
    ensure!(
        history.len() == count,
        "expected {count} history entries, found {}",
        history.len()
    );
    Ok(())
}

#[then(r#"the newest history entry is "{action}""#)]
fn newest_history_entry(world: &LifecycleWorld, action: String) -> Result<(), eyre::Report> {
    let newest = world
        .current()?
        .history
        .first()
        .ok_or_else(|| eyre::eyre!("task has no history"))?;
    ensure!(
        newest.action().as_str() == action,
        "expected newest entry {action}, found {}",
        newest.action().as_str()
    );
    Ok(())
}

#[then("the notifier received {count:usize} messages")]
fn notifier_received(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let attempts = world.notifier.attempt_count();
    ensure!(attempts == count, "expected {count} messages, found {attempts}");
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &LifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let task_id = world.current()?.task.id();
    let stored = run_async(world.service.get_task(task_id))?;
    ensure!(
        stored.task.status().as_str() == status,
        "expected status {status}, found {}",
        stored.task.status().as_str()
    );
    Ok(())
}

#[then("the task has a completion time")]
fn task_has_completion_time(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    ensure!(
        world.current()?.task.completed_at().is_some(),
        "completed task is missing completed_at"
    );
    Ok(())
}

#[then("the task has no completion time")]
fn task_has_no_completion_time(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    ensure!(
        world.current()?.task.completed_at().is_none(),
        "reopened task still carries completed_at"
    );
    Ok(())
}

#[then("the request is denied")]
fn request_is_denied(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    ensure!(
        matches!(
            world.last_error,
            Some(TaskServiceError::PermissionDenied { .. })
        ),
        "expected permission denied, found {:?}",
        world.last_error
    );
    Ok(())
}

#[then("the request fails with an invalid status error")]
fn request_fails_invalid_status(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    ensure!(
        matches!(world.last_error, Some(TaskServiceError::InvalidStatus(_))),
        "expected invalid status, found {:?}",
        world.last_error
    );
    Ok(())
}

#[then(r#"the request fails validation on "{field}""#)]
fn request_fails_validation(world: &LifecycleWorld, field: String) -> Result<(), eyre::Report> {
    match &world.last_error {
        Some(TaskServiceError::Validation(errors)) => {
            ensure!(
                errors.has_field(&field),
                "validation did not flag {field}: {errors}"
            );
            Ok(())
        }
        other => Err(eyre::eyre!("expected validation failure, found {other:?}")),
    }
}

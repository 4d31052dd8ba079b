//! When steps for task lifecycle scenarios.

use super::world::{LifecycleWorld, email_list, run_async};
use chrono::{TimeDelta, Utc};
use rstest_bdd_macros::when;
use taskhub::task::{
    domain::CreatedBy,
    services::{CreateTaskRequest, TaskPatch},
};

pub(super) fn create_task(
    world: &mut LifecycleWorld,
    creator_email: &str,
    title: &str,
    days: i64,
    assignees: &str,
) -> Result<(), eyre::Report> {
    let creator = world.user(creator_email)?;
    let due = Utc::now() + TimeDelta::days(days);
    let request = CreateTaskRequest::new(
        title,
        due.to_rfc3339(),
        CreatedBy::Identity(creator.id()),
    )
    .with_assignees(email_list(assignees));
    let result = run_async(world.service.create_task(request));
    world.record(result);
    Ok(())
}

#[when(r#""{creator}" creates a task "{title}" due in {days:i64} days for "{assignees}""#)]
fn creates_a_task(
    world: &mut LifecycleWorld,
    creator: String,
    title: String,
    days: i64,
    assignees: String,
) -> Result<(), eyre::Report> {
    create_task(world, &creator, &title, days, &assignees)
}

#[when(r#""{actor_email}" sets the status to "{status}""#)]
fn sets_the_status(
    world: &mut LifecycleWorld,
    actor_email: String,
    status: String,
) -> Result<(), eyre::Report> {
    let actor = world.user(&actor_email)?;
    let task_id = world.current()?.task.id();
    let result = run_async(world.service.set_status(task_id, &status, &actor));
    world.record(result);
    Ok(())
}

#[when(r#""{actor_email}" renames the task to "{title}""#)]
fn renames_the_task(
    world: &mut LifecycleWorld,
    actor_email: String,
    title: String,
) -> Result<(), eyre::Report> {
    let actor = world.user(&actor_email)?;
    let task_id = world.current()?.task.id();
    let patch = TaskPatch::new().with_title(title);
    let result = run_async(world.service.update_task(task_id, patch, &actor));
    world.record(result);
    Ok(())
}

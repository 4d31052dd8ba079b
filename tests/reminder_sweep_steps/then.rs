//! Then steps for reminder sweep scenarios.

use super::world::{SweepWorld, email_list, run_async};
use eyre::ensure;
use rstest_bdd_macros::then;
use taskhub::task::ports::TaskRepository;

#[then(r#"the sweep reports {count:usize} "{kind}" notifications"#)]
fn sweep_reports(world: &SweepWorld, count: usize, kind: String) -> Result<(), eyre::Report> {
    let report = world.report()?;
    let actual = match kind.as_str() {
        "upcoming" => report.upcoming,
        "overdue" => report.overdue,
        "reminder1" => report.reminder1,
        "reminder2" => report.reminder2,
        other => return Err(eyre::eyre!("unknown notification kind {other}")),
    };
    ensure!(
        actual == count,
        "expected {count} {kind} notifications, report was {report:?}"
    );
    Ok(())
}

#[then("the notifier received {count:usize} messages")]
fn notifier_received(world: &SweepWorld, count: usize) -> Result<(), eyre::Report> {
    let attempts = world.notifier.attempt_count();
    ensure!(attempts == count, "expected {count} messages, found {attempts}");
    Ok(())
}

#[then(r#"the first message went to "{recipients}""#)]
fn first_message_recipients(world: &SweepWorld, recipients: String) -> Result<(), eyre::Report> {
    let attempts = world.notifier.attempts();
    let first = attempts
        .first()
        .ok_or_else(|| eyre::eyre!("no message was sent"))?;
    let expected = email_list(&recipients);
    ensure!(
        first.recipients() == expected.as_slice(),
        "expected recipients {expected:?}, found {:?}",
        first.recipients()
    );
    Ok(())
}

#[then(r#"the task is still "{status}""#)]
fn task_is_still(world: &SweepWorld, status: String) -> Result<(), eyre::Report> {
    let task_id = world
        .task_id
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let task = run_async(world.store.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} disappeared"))?;
    ensure!(
        task.status().as_str() == status,
        "expected status {status}, found {}",
        task.status().as_str()
    );
    Ok(())
}

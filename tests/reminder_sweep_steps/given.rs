//! Given steps for reminder sweep scenarios.

use super::world::{SweepWorld, email_list, run_async};
use chrono::{DateTime, TimeDelta, Utc};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use taskhub::{
    identity::{
        domain::{Department, EmailAddress, Role, User},
        ports::UserDirectory,
    },
    task::{
        domain::{Assignment, CreatedBy, NewTask, Task, TaskPriority, TaskStatus},
        ports::{AssignmentRepository, TaskRepository},
    },
};

fn seed(
    world: &SweepWorld,
    email: &str,
    role: Role,
    department: Option<&str>,
) -> Result<(), eyre::Report> {
    let address = EmailAddress::new(email)?;
    let display_name = address.as_str().split('@').next().unwrap_or(email).to_owned();
    let mut user = User::new(address, display_name, role);
    if let Some(code) = department {
        user = user.with_department(Department::new(code)?);
    }
    world.directory.insert(user)?;
    Ok(())
}

fn store_task(
    world: &mut SweepWorld,
    status_name: &str,
    due_date: DateTime<Utc>,
    reminder1: Option<DateTime<Utc>>,
    assignees: &str,
) -> Result<(), eyre::Report> {
    let clock = DefaultClock;
    let status = TaskStatus::try_from(status_name)?;
    let task = Task::new(
        NewTask {
            title: "Grade midterm papers".to_owned(),
            description: String::new(),
            priority: TaskPriority::High,
            status,
            due_date,
            created_by: CreatedBy::Label("Exam office".to_owned()),
            reminder1,
            reminder2: None,
            parent_task: None,
        },
        &clock,
    )?;
    run_async(world.store.store(&task)).wrap_err("store task")?;

    let mut assignments = Vec::new();
    for email in email_list(assignees) {
        let address = EmailAddress::new(email.as_str())?;
        let user = run_async(world.directory.find_by_email(&address))?
            .ok_or_else(|| eyre::eyre!("no user seeded for {email}"))?;
        assignments.push(Assignment::new(task.id(), &user, &clock));
    }
    run_async(world.store.replace_for_task(task.id(), &assignments)).wrap_err("assign task")?;
    world.task_id = Some(task.id());
    Ok(())
}

#[given("a directory with an administrator, a CS head, and CS and EE faculty")]
fn seeded_directory(world: &mut SweepWorld) -> Result<(), eyre::Report> {
    seed(world, "admin@uni.edu", Role::Admin, None)?;
    seed(world, "hod.cs@uni.edu", Role::Hod, Some("CS"))?;
    seed(world, "alice@uni.edu", Role::Faculty, Some("CS"))?;
    seed(world, "bob@uni.edu", Role::Faculty, Some("EE"))
}

#[given(r#"a "{status}" task due in {hours:i64} hours assigned to "{assignees}""#)]
fn task_due_in(
    world: &mut SweepWorld,
    status: String,
    hours: i64,
    assignees: String,
) -> Result<(), eyre::Report> {
    let due_date = world.now + TimeDelta::hours(hours);
    store_task(world, &status, due_date, None, &assignees)
}

#[given(r#"a "{status}" task that was due {hours:i64} hours ago assigned to "{assignees}""#)]
fn task_due_ago(
    world: &mut SweepWorld,
    status: String,
    hours: i64,
    assignees: String,
) -> Result<(), eyre::Report> {
    let due_date = world.now - TimeDelta::hours(hours);
    store_task(world, &status, due_date, None, &assignees)
}

#[given(
    r#"a "{status}" task due in {hours:i64} hours with a first reminder in {minutes:i64} minutes assigned to "{assignees}""#
)]
fn task_with_first_reminder(
    world: &mut SweepWorld,
    status: String,
    hours: i64,
    minutes: i64,
    assignees: String,
) -> Result<(), eyre::Report> {
    let due_date = world.now + TimeDelta::hours(hours);
    let reminder = world.now + TimeDelta::minutes(minutes);
    store_task(world, &status, due_date, Some(reminder), &assignees)
}

//! Given steps for task lifecycle scenarios.

use super::when::create_task;
use super::world::LifecycleWorld;
use rstest_bdd_macros::given;
use taskhub::identity::domain::{Department, EmailAddress, Role, User};

fn seed(
    world: &LifecycleWorld,
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

#[given("a directory with an administrator, staff, and CS and EE faculty")]
fn seeded_directory(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    seed(world, "admin@uni.edu", Role::Admin, None)?;
    seed(world, "office@uni.edu", Role::Staff, None)?;
    seed(world, "hod.cs@uni.edu", Role::Hod, Some("CS"))?;
    seed(world, "alice@uni.edu", Role::Faculty, Some("CS"))?;
    seed(world, "bob@uni.edu", Role::Faculty, Some("EE"))
}

#[given(r#""{creator}" has created a task "{title}" due in {days:i64} days for "{assignees}""#)]
fn task_already_created(
    world: &mut LifecycleWorld,
    creator: String,
    title: String,
    days: i64,
    assignees: String,
) -> Result<(), eyre::Report> {
    create_task(world, &creator, &title, days, &assignees)?;
    if let Some(err) = world.last_error.take() {
        return Err(eyre::eyre!("task setup failed: {err}"));
    }
    Ok(())
}

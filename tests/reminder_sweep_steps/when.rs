//! When steps for reminder sweep scenarios.

use super::world::{SweepWorld, run_async};
use rstest_bdd_macros::when;

#[when("the reminder sweep runs")]
fn the_reminder_sweep_runs(world: &mut SweepWorld) {
    let report = run_async(world.sweep.run_sweep(world.now));
    world.report = Some(report);
}

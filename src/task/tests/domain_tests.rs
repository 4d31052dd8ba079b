//! Tests for the task aggregate, audit payloads, and timestamp parsing.

use crate::task::domain::{
    Assignment, CreatedBy, FieldChanges, HistoryAction, HistoryDetails, PersistedTaskData, Task,
    TaskDomainError, TaskEdit, TaskId, TaskPriority, TaskStatus,
    timestamp::{parse_optional_timestamp, parse_timestamp},
};
use crate::identity::domain::{Department, Role};
use crate::test_support::{FixedClock, bare_task, epoch, user};
use chrono::{TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn clock() -> FixedClock {
    FixedClock::at(epoch())
}

#[rstest]
fn new_pending_task_has_no_completion_time(clock: FixedClock) {
    let task = bare_task(&clock, epoch() + TimeDelta::days(3), TaskStatus::Pending);

    assert_eq!(task.status(), TaskStatus::Pending);
    assert_eq!(task.completed_at(), None);
    assert_eq!(task.created_at(), epoch());
    assert_eq!(task.updated_at(), epoch());
}

#[rstest]
fn task_created_completed_is_stamped_immediately(clock: FixedClock) {
    let task = bare_task(&clock, epoch() + TimeDelta::days(3), TaskStatus::Completed);
    assert_eq!(task.completed_at(), Some(epoch()));
}

#[rstest]
fn blank_title_is_rejected(clock: FixedClock) {
    let mut edit = TaskEdit::default();
    let mut task = bare_task(&clock, epoch(), TaskStatus::Pending);
    edit.title = Some("   ".to_owned());

    assert_eq!(
        task.apply_edit(&edit, &clock),
        Err(TaskDomainError::EmptyTitle)
    );
    assert_eq!(task.title(), "Prepare lab report");
}

#[rstest]
fn completing_stamps_and_reopening_clears(clock: FixedClock) {
    let mut task = bare_task(&clock, epoch() + TimeDelta::days(1), TaskStatus::Pending);
    clock.advance(TimeDelta::hours(2));

    let completed = task.set_status(TaskStatus::Completed, &clock);
    assert_eq!(task.completed_at(), Some(epoch() + TimeDelta::hours(2)));
    assert_eq!(completed.field_names(), vec!["status", "completed_at"]);

    clock.advance(TimeDelta::hours(1));
    let reopened = task.set_status(TaskStatus::Pending, &clock);
    assert_eq!(task.completed_at(), None);
    assert!(reopened.contains("completed_at"));
    assert_eq!(task.updated_at(), epoch() + TimeDelta::hours(3));
}

#[rstest]
fn setting_current_status_changes_nothing(clock: FixedClock) {
    let mut task = bare_task(&clock, epoch(), TaskStatus::Ongoing);
    clock.advance(TimeDelta::minutes(10));

    let changes = task.set_status(TaskStatus::Ongoing, &clock);

    assert!(changes.is_empty());
    assert_eq!(task.updated_at(), epoch());
}

#[rstest]
fn moving_between_open_statuses_keeps_completion_empty(clock: FixedClock) {
    let mut task = bare_task(&clock, epoch(), TaskStatus::Pending);

    let changes = task.set_status(TaskStatus::Ongoing, &clock);

    assert_eq!(changes.field_names(), vec!["status"]);
    assert_eq!(task.completed_at(), None);
}

#[rstest]
fn edit_with_same_values_yields_empty_diff(clock: FixedClock) {
    let mut task = bare_task(&clock, epoch(), TaskStatus::Pending);
    clock.advance(TimeDelta::minutes(5));
    let edit = TaskEdit {
        title: Some("  Prepare lab report ".to_owned()),
        priority: Some(TaskPriority::Medium),
        status: Some(TaskStatus::Pending),
        ..TaskEdit::default()
    };

    let changes = task.apply_edit(&edit, &clock).expect("edit applies");

    assert!(changes.is_empty());
    assert_eq!(task.updated_at(), epoch());
}

#[rstest]
fn edit_records_old_and_new_values_in_edit_order(clock: FixedClock) {
    let mut task = bare_task(&clock, epoch(), TaskStatus::Pending);
    let reminder = epoch() + TimeDelta::hours(6);
    let edit = TaskEdit {
        title: Some("Grade lab report".to_owned()),
        priority: Some(TaskPriority::Urgent),
        reminder1: Some(Some(reminder)),
        ..TaskEdit::default()
    };

    let changes = task.apply_edit(&edit, &clock).expect("edit applies");

    assert_eq!(changes.field_names(), vec!["title", "priority", "reminder1"]);
    let title = changes.get("title").expect("title change");
    assert_eq!(title.old, json!("Prepare lab report"));
    assert_eq!(title.new, json!("Grade lab report"));
    let reminder_change = changes.get("reminder1").expect("reminder change");
    assert_eq!(reminder_change.old, serde_json::Value::Null);
    assert_eq!(reminder_change.new, json!(reminder.to_rfc3339()));
    assert_eq!(task.reminder1(), Some(reminder));
}

#[rstest]
fn edit_can_clear_a_reminder(clock: FixedClock) {
    let mut task = bare_task(&clock, epoch(), TaskStatus::Pending);
    let set = TaskEdit {
        reminder2: Some(Some(epoch() + TimeDelta::hours(1))),
        ..TaskEdit::default()
    };
    task.apply_edit(&set, &clock).expect("set reminder");

    let clear = TaskEdit {
        reminder2: Some(None),
        ..TaskEdit::default()
    };
    let changes = task.apply_edit(&clear, &clock).expect("clear reminder");

    assert_eq!(task.reminder2(), None);
    assert_eq!(changes.field_names(), vec!["reminder2"]);
}

#[rstest]
fn evaluate_due_marks_open_task_overdue_once(clock: FixedClock) {
    let mut task = bare_task(&clock, epoch() - TimeDelta::hours(1), TaskStatus::Ongoing);

    assert_eq!(task.evaluate_due(epoch()), Some(TaskStatus::Ongoing));
    assert_eq!(task.status(), TaskStatus::Overdue);
    assert_eq!(task.evaluate_due(epoch()), None);
    assert_eq!(task.status(), TaskStatus::Overdue);
    assert_eq!(task.updated_at(), epoch());
}

#[rstest]
#[case::completed(TaskStatus::Completed, epoch() - TimeDelta::hours(1))]
#[case::future_deadline(TaskStatus::Pending, epoch() + TimeDelta::seconds(1))]
fn evaluate_due_leaves_task_alone(
    clock: FixedClock,
    #[case] status: TaskStatus,
    #[case] due_date: chrono::DateTime<Utc>,
) {
    let mut task = bare_task(&clock, due_date, status);
    assert_eq!(task.evaluate_due(epoch()), None);
    assert_eq!(task.status(), status);
}

#[rstest]
fn deadline_equal_to_now_counts_as_passed(clock: FixedClock) {
    let mut task = bare_task(&clock, epoch(), TaskStatus::Pending);
    assert_eq!(task.evaluate_due(epoch()), Some(TaskStatus::Pending));
}

#[rstest]
fn replace_status_restores_without_touching_update_time(clock: FixedClock) {
    let mut task = bare_task(&clock, epoch() - TimeDelta::hours(1), TaskStatus::Pending);
    let previous = task.evaluate_due(epoch()).expect("status changed");

    task.replace_status(previous);

    assert_eq!(task.status(), TaskStatus::Pending);
    assert_eq!(task.updated_at(), epoch());
}

fn persisted(status: TaskStatus, completed_at: Option<chrono::DateTime<Utc>>) -> PersistedTaskData {
    PersistedTaskData {
        id: TaskId::new(),
        title: "Audit".to_owned(),
        description: String::new(),
        priority: TaskPriority::Low,
        status,
        due_date: epoch(),
        completed_at,
        created_by: CreatedBy::Label("Dean".to_owned()),
        reminder1: None,
        reminder2: None,
        parent_task: None,
        created_at: epoch(),
        updated_at: epoch() + TimeDelta::hours(4),
    }
}

#[rstest]
fn loading_repairs_completion_invariant() {
    let missing = Task::from_persisted(persisted(TaskStatus::Completed, None));
    let stale = Task::from_persisted(persisted(TaskStatus::Ongoing, Some(epoch())));

    assert_eq!(missing.completed_at(), Some(epoch() + TimeDelta::hours(4)));
    assert_eq!(stale.completed_at(), None);
}

#[rstest]
fn field_changes_drop_a_field_that_reverts() {
    let mut changes = FieldChanges::new();
    changes.record("title", json!("a"), json!("b"));
    changes.record("title", json!("b"), json!("a"));
    changes.record("priority", json!("low"), json!("low"));

    assert!(changes.is_empty());
}

#[rstest]
fn history_details_serialize_without_tags() {
    let created = HistoryDetails::Created {
        departments: vec!["CS".to_owned()],
        assignees: vec!["alice@uni.edu".to_owned()],
    };
    let mut changes = FieldChanges::new();
    changes.record("status", json!("pending"), json!("ongoing"));

    assert_eq!(
        serde_json::to_value(&created).expect("serialize"),
        json!({"departments": ["CS"], "assignees": ["alice@uni.edu"]})
    );
    assert_eq!(
        serde_json::to_value(HistoryDetails::from(&changes)).expect("serialize"),
        json!({
            "changes": {"status": {"old": "pending", "new": "ongoing"}},
            "updated_fields": ["status"],
        })
    );
}

#[rstest]
#[case(HistoryAction::Created)]
#[case(HistoryAction::Assigned)]
#[case(HistoryAction::Updated)]
#[case(HistoryAction::StatusChanged)]
#[case(HistoryAction::Completed)]
#[case(HistoryAction::Delegated)]
fn history_actions_parse_their_storage_names(#[case] action: HistoryAction) {
    assert_eq!(HistoryAction::try_from(action.as_str()), Ok(action));
}

#[rstest]
#[case(" Completed ", TaskStatus::Completed)]
#[case("OVERDUE", TaskStatus::Overdue)]
fn status_names_are_case_insensitive(#[case] raw: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(raw), Ok(expected));
}

#[rstest]
fn unknown_priority_is_rejected() {
    assert!(TaskPriority::try_from("critical").is_err());
}

#[rstest]
fn assignment_snapshots_department(clock: FixedClock) {
    let task_id = TaskId::new();
    let placed = user("alice@uni.edu", "Alice", Role::Faculty, Some("CS"));
    let unplaced = user("guest@uni.edu", "Guest", Role::Faculty, None);

    let first = Assignment::new(task_id, &placed, &clock);
    let second = Assignment::new(task_id, &unplaced, &clock);

    assert_eq!(first.department(), &Department::new("CS").expect("valid department"));
    assert_eq!(second.department().as_str(), Department::GENERAL);
    assert_eq!(first.assigned_at(), clock.utc());
}

#[rstest]
#[case("2026-03-01T17:00:00+02:00", (2026, 3, 1, 15, 0))]
#[case("2026-03-01T17:00:00Z", (2026, 3, 1, 17, 0))]
#[case("2026-03-01 17:00", (2026, 3, 1, 17, 0))]
#[case("2026-03-01T17:30", (2026, 3, 1, 17, 30))]
#[case("2026-03-01", (2026, 3, 1, 0, 0))]
fn timestamps_normalize_to_utc(#[case] raw: &str, #[case] expected: (i32, u32, u32, u32, u32)) {
    let (year, month, day, hour, minute) = expected;
    let instant = Utc
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid instant");
    assert_eq!(parse_timestamp(raw), Ok(instant));
}

#[rstest]
fn malformed_timestamp_is_rejected() {
    assert_eq!(
        parse_timestamp("next tuesday"),
        Err(TaskDomainError::InvalidTimestamp("next tuesday".to_owned()))
    );
}

#[rstest]
fn blank_optional_timestamp_means_unset() {
    assert_eq!(parse_optional_timestamp("  "), Ok(None));
}

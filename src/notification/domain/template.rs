//! `minijinja` templates for notification subjects and bodies.
//!
//! Templates render against a JSON context with `task`, `assignee`,
//! `requester`, `task_url`, and variant fields (`hours_left`, `reminder`,
//! `old_status`, `new_status`).

use super::{NotificationKind, NotificationTemplateError};
use minijinja::Environment;
use serde_json::Value;

const ASSIGNMENT_SUBJECT: &str = "New Task Assignment: {{ task.title }}";
const ASSIGNMENT_BODY: &str = "\
<p>Hello {{ assignee.name|e }},</p>
<p>You have been assigned a new task by {{ requester|e }}.</p>
<p><strong>{{ task.title|e }}</strong> ({{ task.priority }} priority)</p>
{% if task.description %}<p>{{ task.description|e }}</p>{% endif %}
<p>Due: {{ task.due_date }}</p>
<p><a href=\"{{ task_url }}\">Open the task</a></p>";

const UPCOMING_SUBJECT: &str = "Deadline Reminder: {{ task.title }}";
const UPCOMING_BODY: &str = "\
<p>Hello {{ assignee.name|e }},</p>
<p><strong>{{ task.title|e }}</strong> is due in {{ hours_left }} \
hour{% if hours_left != 1 %}s{% endif %} ({{ task.due_date }}).</p>
<p><a href=\"{{ task_url }}\">Open the task</a></p>";

const OVERDUE_SUBJECT: &str = "Task Overdue: {{ task.title }}";
const OVERDUE_BODY: &str = "\
<p>Hello {{ assignee.name|e }},</p>
<p><strong>{{ task.title|e }}</strong> was due on {{ task.due_date }} and is \
not yet complete.</p>
<p><a href=\"{{ task_url }}\">Open the task</a></p>";

const REMINDER_SUBJECT: &str = "Reminder: {{ task.title }}";
const REMINDER_BODY: &str = "\
<p>Hello {{ assignee.name|e }},</p>
<p>This is your scheduled reminder ({{ reminder }}) for \
<strong>{{ task.title|e }}</strong>, due {{ task.due_date }}.</p>
<p><a href=\"{{ task_url }}\">Open the task</a></p>";

const STATUS_SUBJECT: &str = "Task Status Changed: {{ task.title }}";
const STATUS_BODY: &str = "\
<p>Hello {{ assignee.name|e }},</p>
<p><strong>{{ task.title|e }}</strong> moved from {{ old_status }} to \
{{ new_status }}.</p>
<p><a href=\"{{ task_url }}\">Open the task</a></p>";

/// Subject and body produced by a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Renders the subject and body for `kind`.
///
/// # Errors
///
/// Returns [`NotificationTemplateError`] when either template fails to
/// render against `context`.
pub fn render(
    kind: NotificationKind,
    context: &Value,
) -> Result<RenderedNotification, NotificationTemplateError> {
    let (subject_template, body_template) = templates_for(kind);
    let environment = Environment::new();
    let render_one = |source: &str| {
        environment
            .render_str(source, context)
            .map_err(|error| NotificationTemplateError {
                template: kind.template_name(),
                reason: error.to_string(),
            })
    };
    Ok(RenderedNotification {
        subject: render_one(subject_template)?,
        html_body: render_one(body_template)?,
    })
}

const fn templates_for(kind: NotificationKind) -> (&'static str, &'static str) {
    match kind {
        NotificationKind::Assignment => (ASSIGNMENT_SUBJECT, ASSIGNMENT_BODY),
        NotificationKind::UpcomingDeadline { .. } => (UPCOMING_SUBJECT, UPCOMING_BODY),
        NotificationKind::Overdue => (OVERDUE_SUBJECT, OVERDUE_BODY),
        NotificationKind::CustomReminder { .. } => (REMINDER_SUBJECT, REMINDER_BODY),
        NotificationKind::StatusChanged { .. } => (STATUS_SUBJECT, STATUS_BODY),
    }
}

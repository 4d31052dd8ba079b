//! Best-effort notification fan-out.

use crate::identity::{
    domain::User,
    ports::{UserDirectory, UserDirectoryError},
};
use crate::notification::{
    domain::{NotificationKind, OutboundMessage, render},
    ports::Notifier,
};
use crate::task::domain::{CreatedBy, Task};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Transport timeout used when none is configured.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    frontend_url: String,
    send_timeout: Duration,
}

impl NotificationSettings {
    /// Creates settings linking tasks under `frontend_url`.
    #[must_use]
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into().trim_end_matches('/').to_owned(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Sets the transport timeout.
    #[must_use]
    pub const fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    /// Returns the frontend base URL without a trailing slash.
    #[must_use]
    pub fn frontend_url(&self) -> &str {
        &self.frontend_url
    }

    /// Returns the transport timeout.
    #[must_use]
    pub const fn send_timeout(&self) -> Duration {
        self.send_timeout
    }

    fn task_url(&self, task: &Task) -> String {
        format!("{}/task/{}", self.frontend_url, task.id())
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

/// Why a dispatch attempt did not deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    /// Recipient lookup failed.
    Directory(String),
    /// Template rendering failed.
    Template(String),
    /// The transport returned an error.
    Transport(String),
    /// The transport did not answer in time.
    TimedOut,
}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transport accepted the message.
    Sent {
        /// Number of distinct recipients.
        recipients: usize,
    },
    /// The attempt failed and was logged.
    Failed(DispatchFailure),
}

impl DispatchOutcome {
    /// Returns whether the transport accepted the message.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Builds notifications and hands them to the transport.
///
/// Recipients are the assignee, the head of the assignee's department, and
/// for some kinds every administrator. Nothing here returns an error; every
/// failure is logged and reported as [`DispatchOutcome::Failed`].
#[derive(Clone)]
pub struct NotificationDispatcher<D, N>
where
    D: UserDirectory,
    N: Notifier,
{
    directory: Arc<D>,
    notifier: Arc<N>,
    settings: NotificationSettings,
}

impl<D, N> NotificationDispatcher<D, N>
where
    D: UserDirectory,
    N: Notifier,
{
    /// Creates a dispatcher.
    #[must_use]
    pub const fn new(directory: Arc<D>, notifier: Arc<N>, settings: NotificationSettings) -> Self {
        Self {
            directory,
            notifier,
            settings,
        }
    }

    /// Returns the dispatcher settings.
    #[must_use]
    pub const fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    /// Sends one notification about `task` addressed to `assignee`.
    pub async fn dispatch(
        &self,
        kind: NotificationKind,
        task: &Task,
        assignee: &User,
    ) -> DispatchOutcome {
        let outcome = self.try_dispatch(kind, task, assignee).await;
        match &outcome {
            DispatchOutcome::Sent { recipients } => debug!(
                task_id = %task.id(),
                kind = kind.template_name(),
                recipients,
                "notification dispatched"
            ),
            DispatchOutcome::Failed(failure) => warn!(
                task_id = %task.id(),
                kind = kind.template_name(),
                assignee = %assignee.email(),
                ?failure,
                "notification dispatch failed"
            ),
        }
        outcome
    }

    async fn try_dispatch(
        &self,
        kind: NotificationKind,
        task: &Task,
        assignee: &User,
    ) -> DispatchOutcome {
        let recipients = match self.resolve_recipients(kind, assignee).await {
            Ok(recipients) => recipients,
            Err(err) => return DispatchOutcome::Failed(DispatchFailure::Directory(err.to_string())),
        };
        let context = self.template_context(kind, task, assignee).await;
        let rendered = match render(kind, &context) {
            Ok(rendered) => rendered,
            Err(err) => return DispatchOutcome::Failed(DispatchFailure::Template(err.to_string())),
        };
        let message = OutboundMessage::new(rendered.subject, rendered.html_body, recipients);
        let recipient_count = message.recipients().len();

        match tokio::time::timeout(self.settings.send_timeout, self.notifier.send(&message)).await
        {
            Ok(Ok(())) => DispatchOutcome::Sent {
                recipients: recipient_count,
            },
            Ok(Err(err)) => DispatchOutcome::Failed(DispatchFailure::Transport(err.to_string())),
            Err(_) => DispatchOutcome::Failed(DispatchFailure::TimedOut),
        }
    }

    async fn resolve_recipients(
        &self,
        kind: NotificationKind,
        assignee: &User,
    ) -> Result<Vec<String>, UserDirectoryError> {
        let mut candidates = vec![assignee.email().as_str().to_owned()];
        if let Some(department) = assignee.department() {
            if let Some(head) = self.directory.find_department_head(department).await? {
                candidates.push(head.email().as_str().to_owned());
            }
        }
        if kind.copies_admins() {
            let admins = self.directory.list_admins().await?;
            candidates.extend(admins.iter().map(|admin| admin.email().as_str().to_owned()));
        }
        Ok(candidates)
    }

    async fn template_context(&self, kind: NotificationKind, task: &Task, assignee: &User) -> Value {
        let mut context = json!({
            "task": {
                "id": task.id().to_string(),
                "title": task.title(),
                "description": task.description(),
                "priority": task.priority().as_str(),
                "status": task.status().as_str(),
                "due_date": task.due_date().format("%Y-%m-%d %H:%M UTC").to_string(),
            },
            "assignee": {
                "name": assignee.display_name(),
                "email": assignee.email().as_str(),
            },
            "requester": self.requester_label(task.created_by()).await,
            "task_url": self.settings.task_url(task),
        });
        if let Value::Object(fields) = &mut context {
            match kind {
                NotificationKind::UpcomingDeadline { hours_left } => {
                    fields.insert("hours_left".to_owned(), json!(hours_left));
                }
                NotificationKind::CustomReminder { slot } => {
                    fields.insert("reminder".to_owned(), json!(slot.field_name()));
                }
                NotificationKind::StatusChanged { old, new } => {
                    fields.insert("old_status".to_owned(), json!(old.as_str()));
                    fields.insert("new_status".to_owned(), json!(new.as_str()));
                }
                NotificationKind::Assignment | NotificationKind::Overdue => {}
            }
        }
        context
    }

    /// Names the requester, falling back to the raw identifier when the
    /// account cannot be found.
    async fn requester_label(&self, created_by: &CreatedBy) -> String {
        match created_by {
            CreatedBy::Label(label) => label.clone(),
            CreatedBy::Identity(id) => match self.directory.find_by_id(*id).await {
                Ok(Some(user)) => user.display_name().to_owned(),
                Ok(None) | Err(_) => id.to_string(),
            },
        }
    }
}

//! Files attached to tasks.

use super::{AttachmentId, TaskDomainError, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Attachment declared alongside a task creation request.
///
/// File bytes live in external storage; the task core only records the
/// stored-file reference and declared metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    /// Reference into the file store.
    pub file_ref: String,
    /// Declared file name.
    pub file_name: String,
    /// Declared size in bytes.
    pub file_size: u64,
    /// Uploading user.
    pub uploaded_by: UserId,
}

/// Attachment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    id: AttachmentId,
    task_id: TaskId,
    file_ref: String,
    file_name: String,
    file_size: u64,
    uploaded_by: UserId,
    uploaded_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttachmentData {
    /// Persisted identifier.
    pub id: AttachmentId,
    /// Owning task.
    pub task_id: TaskId,
    /// Reference into the file store.
    pub file_ref: String,
    /// Declared file name.
    pub file_name: String,
    /// Declared size in bytes.
    pub file_size: u64,
    /// Uploading user.
    pub uploaded_by: UserId,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

impl Attachment {
    /// Creates an attachment record for a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyAttachmentName`] when the declared file
    /// name is blank.
    pub fn new(
        task_id: TaskId,
        upload: NewAttachment,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let file_name = upload.file_name.trim();
        if file_name.is_empty() {
            return Err(TaskDomainError::EmptyAttachmentName);
        }
        Ok(Self {
            id: AttachmentId::new(),
            task_id,
            file_name: file_name.to_owned(),
            file_ref: upload.file_ref,
            file_size: upload.file_size,
            uploaded_by: upload.uploaded_by,
            uploaded_at: clock.utc(),
        })
    }

    /// Reconstructs an attachment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttachmentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            file_ref: data.file_ref,
            file_name: data.file_name,
            file_size: data.file_size,
            uploaded_by: data.uploaded_by,
            uploaded_at: data.uploaded_at,
        }
    }

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the stored-file reference.
    #[must_use]
    pub fn file_ref(&self) -> &str {
        &self.file_ref
    }

    /// Returns the declared file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the declared size in bytes.
    #[must_use]
    pub const fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Returns the uploading user.
    #[must_use]
    pub const fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }

    /// Returns the upload timestamp.
    #[must_use]
    pub const fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}

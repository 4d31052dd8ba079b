//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Priority name.
        #[max_length = 10]
        priority -> Varchar,
        /// Lifecycle status name.
        #[max_length = 20]
        status -> Varchar,
        /// Deadline.
        due_date -> Timestamptz,
        /// Completion timestamp, set only while completed.
        completed_at -> Nullable<Timestamptz>,
        /// Requester payload, either a user identifier or a free-text label.
        created_by -> Jsonb,
        /// First custom reminder.
        reminder1 -> Nullable<Timestamptz>,
        /// Second custom reminder.
        reminder2 -> Nullable<Timestamptz>,
        /// Parent task for delegated work.
        parent_task -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Assignee links, one row per task and user.
    task_assignments (task_id, assignee) {
        /// Owning task.
        task_id -> Uuid,
        /// Assigned user.
        assignee -> Uuid,
        /// Department snapshot taken when assigned.
        #[max_length = 50]
        department -> Varchar,
        /// Assignment timestamp.
        assigned_at -> Timestamptz,
        /// Per-assignee completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Position within the assignment set.
        position -> Int4,
    }
}

diesel::table! {
    /// Append-only task audit trail.
    task_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Action name.
        #[max_length = 20]
        action -> Varchar,
        /// Acting user, if known.
        performed_by -> Nullable<Uuid>,
        /// When the action happened.
        timestamp -> Timestamptz,
        /// Structured action payload.
        details -> Jsonb,
        /// Monotonic insertion sequence used to order same-instant entries.
        seq -> Int8,
    }
}

diesel::table! {
    /// Attachment metadata.
    task_attachments (id) {
        /// Attachment identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Opaque storage reference.
        file_ref -> Text,
        /// Original file name.
        #[max_length = 255]
        file_name -> Varchar,
        /// File size in bytes.
        file_size -> Int8,
        /// Uploading user.
        uploaded_by -> Uuid,
        /// Upload timestamp.
        uploaded_at -> Timestamptz,
    }
}

diesel::joinable!(task_assignments -> tasks (task_id));
diesel::joinable!(task_history -> tasks (task_id));
diesel::joinable!(task_attachments -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, task_assignments, task_history, task_attachments);

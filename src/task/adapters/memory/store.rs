//! In-memory task store for tests and local tooling.
//!
//! One store backs all four task ports so cascading deletes and atomic
//! task-plus-history writes happen under a single lock.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Assignment, Attachment, HistoryEntry, Task, TaskId, TaskStatus},
    ports::{
        AssignmentRepository, AttachmentRepository, HistoryRepository, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};

/// Thread-safe in-memory store implementing every task port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    insertion_order: Vec<TaskId>,
    assignments: HashMap<TaskId, Vec<Assignment>>,
    history: Vec<HistoryEntry>,
    attachments: HashMap<TaskId, Vec<Attachment>>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryTaskState {
    fn ensure_exists(&self, id: TaskId) -> TaskRepositoryResult<()> {
        if self.tasks.contains_key(&id) {
            Ok(())
        } else {
            Err(TaskRepositoryError::NotFound(id))
        }
    }

    /// Returns tasks newest first.
    fn newest_first<'a>(&'a self, filter: impl Fn(&Task) -> bool + 'a) -> Vec<Task> {
        self.insertion_order
            .iter()
            .rev()
            .filter_map(|id| self.tasks.get(id))
            .filter(|task| filter(task))
            .cloned()
            .collect()
    }

    /// Collects a task and all of its descendants.
    fn subtree(&self, root: TaskId) -> HashSet<TaskId> {
        let mut collected = HashSet::from([root]);
        let mut frontier = vec![root];
        while let Some(parent) = frontier.pop() {
            for task in self.tasks.values() {
                if task.parent_task() == Some(parent) && collected.insert(task.id()) {
                    frontier.push(task.id());
                }
            }
        }
        collected
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if let Some(parent) = task.parent_task() {
            state.ensure_exists(parent)?;
        }
        state.insertion_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn save_with_history(
        &self,
        task: &Task,
        entry: &HistoryEntry,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.ensure_exists(task.id())?;
        state.tasks.insert(task.id(), task.clone());
        state.history.push(entry.clone());
        Ok(())
    }

    async fn update_status_if(
        &self,
        id: TaskId,
        expected: TaskStatus,
        status: TaskStatus,
    ) -> TaskRepositoryResult<bool> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        if stored.status() != expected {
            return Ok(false);
        }
        stored.replace_status(status);
        Ok(true)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state.newest_first(|_| true))
    }

    async fn scan_all(&self) -> TaskRepositoryResult<Vec<TaskRepositoryResult<Task>>> {
        let state = self.read()?;
        Ok(state.newest_first(|_| true).into_iter().map(Ok).collect())
    }

    async fn find_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state.newest_first(move |task| task.parent_task() == Some(parent)))
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.ensure_exists(id)?;
        let doomed = state.subtree(id);
        state.tasks.retain(|task_id, _| !doomed.contains(task_id));
        state.insertion_order.retain(|task_id| !doomed.contains(task_id));
        state.assignments.retain(|task_id, _| !doomed.contains(task_id));
        state.attachments.retain(|task_id, _| !doomed.contains(task_id));
        state.history.retain(|entry| !doomed.contains(&entry.task_id()));
        Ok(())
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryTaskStore {
    async fn replace_for_task(
        &self,
        task_id: TaskId,
        assignments: &[Assignment],
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.ensure_exists(task_id)?;
        let mut seen = HashSet::new();
        for assignment in assignments {
            if !seen.insert(assignment.assignee()) {
                return Err(TaskRepositoryError::DuplicateAssignment {
                    task_id,
                    assignee: assignment.assignee(),
                });
            }
        }
        state.assignments.insert(task_id, assignments.to_vec());
        Ok(())
    }

    async fn assignments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Assignment>> {
        let state = self.read()?;
        Ok(state.assignments.get(&task_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryTaskStore {
    async fn append(&self, entry: &HistoryEntry) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.ensure_exists(entry.task_id())?;
        state.history.push(entry.clone());
        Ok(())
    }

    async fn history_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        let state = self.read()?;
        Ok(state
            .history
            .iter()
            .rev()
            .filter(|entry| entry.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn list_recent(&self, limit: usize) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        let state = self.read()?;
        Ok(state.history.iter().rev().take(limit).cloned().collect())
    }
}

#[async_trait]
impl AttachmentRepository for InMemoryTaskStore {
    async fn store_attachment(&self, attachment: &Attachment) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.ensure_exists(attachment.task_id())?;
        state
            .attachments
            .entry(attachment.task_id())
            .or_default()
            .push(attachment.clone());
        Ok(())
    }

    async fn attachments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Attachment>> {
        let state = self.read()?;
        Ok(state.attachments.get(&task_id).cloned().unwrap_or_default())
    }
}

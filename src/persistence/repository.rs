use super::record::{decode_collection, encode_collection};
use super::store::{KeyValueStore, TASKS_KEY};
use crate::domain::{Priority, Task, TaskPatch};
use crate::error::{Result, TaskflowError};
use chrono::Utc;

/// Canonical in-memory task collection, written through to a key-value
/// store on every mutation
pub struct TaskRepository {
    store: Box<dyn KeyValueStore>,
    tasks: Vec<Task>,
}

impl TaskRepository {
    /// Create a repository over `store` and load its tasks
    pub fn open(store: Box<dyn KeyValueStore>) -> Result<Self> {
        let mut repo = Self {
            store,
            tasks: Vec::new(),
        };
        repo.load_all()?;
        Ok(repo)
    }

    /// Empty repository backed by an in-memory store
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(super::store::MemoryStore::new()),
            tasks: Vec::new(),
        }
    }

    /// Reload the collection from the store.
    ///
    /// A missing value is an empty list. A value that cannot be read as a
    /// list, or that holds entries which had to be skipped, is copied aside
    /// under a backup key first, so the next write does not destroy it.
    pub fn load_all(&mut self) -> Result<&[Task]> {
        let raw = self.store.get(TASKS_KEY)?;
        self.tasks = match raw {
            None => Vec::new(),
            Some(raw) => match decode_collection(&raw, Utc::now()) {
                Ok((tasks, 0)) => tasks,
                Ok((tasks, skipped)) => {
                    let backup_key = self.backup(&raw)?;
                    tracing::warn!(skipped, backup = %backup_key, "unreadable task records dropped");
                    tasks
                }
                Err(TaskflowError::MalformedPersistedRecord(reason)) => {
                    let backup_key = self.backup(&raw)?;
                    tracing::warn!(%reason, backup = %backup_key, "unreadable task store, starting empty");
                    Vec::new()
                }
                Err(e) => return Err(e),
            },
        };
        Ok(&self.tasks)
    }

    /// Copy a raw stored value to a timestamped key
    fn backup(&mut self, raw: &str) -> Result<String> {
        let backup_key = format!("{}.corrupt-{}", TASKS_KEY, Utc::now().format("%Y%m%d_%H%M%S"));
        self.store.set(&backup_key, raw)?;
        Ok(backup_key)
    }

    /// Replace the whole collection and persist it
    pub fn save_all(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.tasks = tasks;
        self.persist()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Create a task at the end of the list
    pub fn add(&mut self, text: &str, priority: Priority) -> Result<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskflowError::EmptyInput);
        }

        let mut task = Task::new(text, priority);
        while self.get_by_id(&task.id).is_some() {
            task.id = crate::domain::generate_id();
        }

        self.tasks.push(task.clone());
        self.persist()?;
        tracing::debug!(id = %task.id, priority = %priority, "task added");
        Ok(task)
    }

    /// Merge `patch` into the task, stamp `updated_at` and persist
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskflowError::NotFound(id.to_string()))?;

        task.apply(patch);
        let updated = task.clone();
        self.persist()?;
        tracing::debug!(id = %id, "task updated");
        Ok(updated)
    }

    /// Flip the completion checkbox
    pub fn toggle_completed(&mut self, id: &str) -> Result<Task> {
        let completed = self
            .get_by_id(id)
            .map(|t| t.completed)
            .ok_or_else(|| TaskflowError::NotFound(id.to_string()))?;
        self.update(id, TaskPatch::completed(!completed))
    }

    /// Delete the task. Returns false (and writes nothing) if it was absent.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        let mut tasks = std::mem::take(&mut self.tasks);
        tasks.remove(index);
        self.save_all(tasks)?;
        tracing::debug!(id = %id, "task removed");
        Ok(true)
    }

    /// Raw persisted value, as last written
    #[cfg(test)]
    pub fn persisted(&self) -> Result<Option<String>> {
        self.store.get(TASKS_KEY)
    }

    fn persist(&mut self) -> Result<()> {
        let raw = encode_collection(&self.tasks)?;
        self.store.set(TASKS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Subtask;
    use crate::persistence::store::{FileStore, MemoryStore};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_then_find() {
        let mut repo = TaskRepository::in_memory();
        let task = repo.add("Buy milk", Priority::High).unwrap();

        let found = repo.get_by_id(&task.id).unwrap();
        assert_eq!(found.text, "Buy milk");
        assert_eq!(found.priority, Priority::High);
        assert!(!found.completed);
        assert!(found.subtasks.is_empty());
        assert!(found.notes.is_empty());
        assert!(found.due_date.is_none());
    }

    #[test]
    fn test_add_trims_and_rejects_blank() {
        let mut repo = TaskRepository::in_memory();
        let task = repo.add("  spaced  ", Priority::Medium).unwrap();
        assert_eq!(task.text, "spaced");

        let err = repo.add("   ", Priority::Medium).unwrap_err();
        assert!(matches!(err, TaskflowError::EmptyInput));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut repo = TaskRepository::in_memory();
        let task = repo.add("One", Priority::Low).unwrap();
        let raw = repo.persisted().unwrap().unwrap();
        assert!(raw.contains("\"One\""));

        repo.toggle_completed(&task.id).unwrap();
        let raw = repo.persisted().unwrap().unwrap();
        assert!(raw.contains("\"completed\": true"));
    }

    #[test]
    fn test_update_merges_and_stamps() {
        let mut repo = TaskRepository::in_memory();
        let task = repo.add("Report", Priority::Medium).unwrap();

        let updated = repo
            .update(
                &task.id,
                TaskPatch {
                    notes: Some("see email".to_string()),
                    ..TaskPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.notes, "see email");
        assert_eq!(updated.text, "Report");
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at > task.updated_at);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut repo = TaskRepository::in_memory();
        let err = repo.update("nope", TaskPatch::completed(true)).unwrap_err();
        assert!(matches!(err, TaskflowError::NotFound(_)));
    }

    #[test]
    fn test_remove() {
        let mut repo = TaskRepository::in_memory();
        let keep = repo.add("Keep", Priority::Medium).unwrap();
        let gone = repo.add("Gone", Priority::Medium).unwrap();

        assert!(repo.remove(&gone.id).unwrap());
        assert!(repo.get_by_id(&gone.id).is_none());
        assert!(repo.get_by_id(&keep.id).is_some());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut repo = TaskRepository::in_memory();
        repo.add("Keep", Priority::Medium).unwrap();
        let before = repo.persisted().unwrap();

        assert!(!repo.remove("missing").unwrap());
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.persisted().unwrap(), before);
    }

    #[test]
    fn test_save_load_is_fixed_point() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut repo = TaskRepository::open(Box::new(FileStore::new(temp_dir.path()))).unwrap();
        let first = repo.add("First", Priority::High).unwrap();
        repo.add("Second", Priority::Low).unwrap();
        let mut subtasks = vec![Subtask::new("a"), Subtask::new("b"), Subtask::new("c")];
        subtasks[1].completed = true;
        repo.update(
            &first.id,
            TaskPatch {
                subtasks: Some(subtasks),
                ..TaskPatch::default()
            },
        )
        .unwrap();

        let original = repo.tasks().to_vec();
        let raw_before = repo.persisted().unwrap();

        let mut reopened = TaskRepository::open(Box::new(FileStore::new(temp_dir.path()))).unwrap();
        let loaded = reopened.load_all().unwrap().to_vec();
        assert_eq!(loaded, original);

        reopened.save_all(loaded).unwrap();
        assert_eq!(reopened.persisted().unwrap(), raw_before);
    }

    #[test]
    fn test_numeric_id_is_stable_across_loads() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp_dir.path());
        store
            .set(TASKS_KEY, r#"[{"id":42,"text":"x","completed":false}]"#)
            .unwrap();

        let report = crate::persistence::migrate(&mut store).unwrap();
        assert!(report.written);

        let first = TaskRepository::open(Box::new(FileStore::new(temp_dir.path()))).unwrap();
        let second = TaskRepository::open(Box::new(FileStore::new(temp_dir.path()))).unwrap();
        assert_eq!(first.tasks()[0].id, "42");
        assert_eq!(second.tasks()[0].id, first.tasks()[0].id);
    }

    #[test]
    fn test_skipped_records_are_backed_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let raw = r#"[{"id":"a","text":"keep","completed":false}, "stray", 7]"#;
        let mut store = FileStore::new(temp_dir.path());
        store.set(TASKS_KEY, raw).unwrap();

        let repo = TaskRepository::open(Box::new(store)).unwrap();
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.tasks()[0].id, "a");

        let backups: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("corrupt"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(backups[0].path()).unwrap(), raw);
    }

    #[test]
    fn test_load_defaults_missing_priority() {
        let store = MemoryStore::with_value(TASKS_KEY, r#"[{"id":"a","text":"old","completed":false}]"#);
        let repo = TaskRepository::open(Box::new(store)).unwrap();
        assert_eq!(repo.get_by_id("a").unwrap().priority, Priority::Medium);
    }

    #[test]
    fn test_unreadable_store_is_backed_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp_dir.path());
        store.set(TASKS_KEY, "{ not a list").unwrap();

        let repo = TaskRepository::open(Box::new(store)).unwrap();
        assert!(repo.is_empty());

        let backups = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("corrupt"))
            .count();
        assert_eq!(backups, 1);
    }
}

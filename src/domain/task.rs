use super::enums::Priority;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Length of the random part of a generated ID
const ID_SUFFIX_LEN: usize = 9;

static LAST_ID_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Generate an opaque, collision-resistant ID: a base-36 millisecond
/// timestamp that never goes backwards within the process, followed by
/// a random base-36 suffix.
pub fn generate_id() -> String {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let millis = LAST_ID_MILLIS.fetch_max(now, Ordering::Relaxed).max(now);

    let mut id = to_base36(millis as u128);
    let suffix = to_base36(Uuid::new_v4().as_u128());
    id.extend(suffix.chars().rev().take(ID_SUFFIX_LEN));
    id
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// A nested, independently completable item of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtask {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Subtask {
    #[cfg(test)]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            completed: false,
        }
    }
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub notes: String,
    pub due_date: Option<NaiveDate>,
    pub subtasks: Vec<Subtask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            text: text.into(),
            completed: false,
            priority,
            notes: String::new(),
            due_date: None,
            subtasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamp `updated_at`. Strictly increasing even if the clock reads the
    /// same instant twice or steps backwards.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
    }

    /// Merge the supplied fields into this task and stamp `updated_at`
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(subtasks) = patch.subtasks {
            self.subtasks = subtasks;
        }
        self.touch();
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    /// (completed, total) subtask counts
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }

    /// Due date has passed and the task is still open
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Partial update for a task; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub subtasks: Option<Vec<Subtask>>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

use crate::domain::{EditorField, Subtask, Task, TaskPatch};
use crate::error::{Result, TaskflowError};
use crate::persistence::record::{parse_due_date, DUE_DATE_FORMAT};
use crate::persistence::TaskRepository;
use chrono::NaiveDate;

/// Uncommitted draft of one task's editable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    pub task_id: String,
    /// Task text, shown in the editor header (read-only)
    pub title: String,
    pub notes: String,
    /// Due date as typed, `YYYY-MM-DD` or empty
    pub due_input: String,
    pub subtasks: Vec<Subtask>,
    /// Text of the subtask being typed
    pub subtask_input: String,
    pub focus: EditorField,
    pub selected_subtask: usize,
}

impl WorkingCopy {
    fn from_task(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            title: task.text.clone(),
            notes: task.notes.clone(),
            due_input: task
                .due_date
                .map(|d| d.format(DUE_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            subtasks: task.subtasks.clone(),
            subtask_input: String::new(),
            focus: EditorField::default(),
            selected_subtask: 0,
        }
    }

    /// Type a character into the focused text field
    pub fn input_char(&mut self, c: char) {
        match self.focus {
            EditorField::Notes => self.notes.push(c),
            EditorField::DueDate => self.due_input.push(c),
            EditorField::NewSubtask => self.subtask_input.push(c),
            EditorField::Subtasks => {}
        }
    }

    /// Delete the last character of the focused text field
    pub fn input_backspace(&mut self) {
        match self.focus {
            EditorField::Notes => {
                self.notes.pop();
            }
            EditorField::DueDate => {
                self.due_input.pop();
            }
            EditorField::NewSubtask => {
                self.subtask_input.pop();
            }
            EditorField::Subtasks => {}
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn select_prev(&mut self) {
        self.selected_subtask = self.selected_subtask.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected_subtask + 1 < self.subtasks.len() {
            self.selected_subtask += 1;
        }
    }

    pub fn selected_subtask_id(&self) -> Option<String> {
        self.subtasks.get(self.selected_subtask).map(|s| s.id.clone())
    }

    /// Parsed due date; `Err` if the input is neither blank nor a date
    pub fn due_date(&self) -> Result<Option<NaiveDate>> {
        if self.due_input.trim().is_empty() {
            return Ok(None);
        }
        parse_due_date(&self.due_input)
            .map(Some)
            .ok_or_else(|| TaskflowError::InvalidDueDate(self.due_input.trim().to_string()))
    }

    fn fresh_subtask_id(&self) -> String {
        loop {
            let id = crate::domain::generate_id();
            if !self.subtasks.iter().any(|s| s.id == id) {
                return id;
            }
        }
    }
}

/// Editor state machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Closed,
    Open(WorkingCopy),
}

/// Modal editor for a task's notes, due date and subtasks.
///
/// Subtask edits only touch the working copy; the repository changes on
/// `save` and never on `cancel`.
#[derive(Debug, Default)]
pub struct ModalEditor {
    state: EditorState,
}

impl ModalEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditorState::Open(_))
    }

    pub fn working_copy(&self) -> Option<&WorkingCopy> {
        match &self.state {
            EditorState::Open(copy) => Some(copy),
            EditorState::Closed => None,
        }
    }

    pub fn working_copy_mut(&mut self) -> Option<&mut WorkingCopy> {
        match &mut self.state {
            EditorState::Open(copy) => Some(copy),
            EditorState::Closed => None,
        }
    }

    /// ID of the task being edited
    pub fn editing_id(&self) -> Option<&str> {
        self.working_copy().map(|c| c.task_id.as_str())
    }

    /// Start editing a task. Returns false, leaving the state untouched,
    /// if the task doesn't exist.
    pub fn open(&mut self, repo: &TaskRepository, task_id: &str) -> bool {
        let Some(task) = repo.get_by_id(task_id) else {
            tracing::debug!(id = %task_id, "editor open ignored, task not found");
            return false;
        };
        self.state = EditorState::Open(WorkingCopy::from_task(task));
        true
    }

    /// Append a subtask to the working copy; blank text is ignored
    pub fn add_subtask(&mut self, text: &str) -> Option<&Subtask> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let copy = self.working_copy_mut()?;
        let subtask = Subtask {
            id: copy.fresh_subtask_id(),
            text: text.to_string(),
            completed: false,
        };
        copy.subtasks.push(subtask);
        copy.subtasks.last()
    }

    pub fn toggle_subtask(&mut self, subtask_id: &str) -> bool {
        let Some(copy) = self.working_copy_mut() else {
            return false;
        };
        match copy.subtasks.iter_mut().find(|s| s.id == subtask_id) {
            Some(subtask) => {
                subtask.completed = !subtask.completed;
                true
            }
            None => false,
        }
    }

    pub fn remove_subtask(&mut self, subtask_id: &str) -> bool {
        let Some(copy) = self.working_copy_mut() else {
            return false;
        };
        let before = copy.subtasks.len();
        copy.subtasks.retain(|s| s.id != subtask_id);
        if copy.selected_subtask >= copy.subtasks.len() {
            copy.selected_subtask = copy.subtasks.len().saturating_sub(1);
        }
        copy.subtasks.len() != before
    }

    pub fn set_notes(&mut self, notes: &str) -> bool {
        match self.working_copy_mut() {
            Some(copy) => {
                copy.notes = notes.to_string();
                true
            }
            None => false,
        }
    }

    /// Replace the due-date text; it is parsed on `save`
    pub fn set_due_input(&mut self, input: &str) -> bool {
        match self.working_copy_mut() {
            Some(copy) => {
                copy.due_input = input.to_string();
                true
            }
            None => false,
        }
    }

    /// Commit the working copy to the repository and close.
    ///
    /// An unparseable due date keeps the editor open so it can be fixed.
    /// Otherwise the editor closes whether or not the commit succeeds;
    /// a task deleted in the meantime is reported as `NotFound`.
    pub fn save(&mut self, repo: &mut TaskRepository) -> Result<Task> {
        let due_date = match &self.state {
            EditorState::Closed => return Err(TaskflowError::EditorClosed),
            EditorState::Open(copy) => copy.due_date()?,
        };

        let EditorState::Open(copy) = std::mem::take(&mut self.state) else {
            return Err(TaskflowError::EditorClosed);
        };

        let patch = TaskPatch {
            notes: Some(copy.notes.trim().to_string()),
            due_date: Some(due_date),
            subtasks: Some(copy.subtasks),
            ..TaskPatch::default()
        };
        repo.update(&copy.task_id, patch)
    }

    /// Discard the working copy
    pub fn cancel(&mut self) {
        self.state = EditorState::Closed;
    }
}

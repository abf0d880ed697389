use crate::domain::{Filter, ListView, Priority, Task, UiMode};
use crate::editor::ModalEditor;
use crate::error::TaskflowError;
use crate::persistence::{save_metadata, AppMetadata, TaskRepository};
use anyhow::Result;
use std::path::PathBuf;

/// Input form state for adding tasks
#[derive(Debug, Clone, Default)]
pub struct InputFormState {
    pub text: String,
}

/// User intent, produced by the presentation layer and applied by
/// [`AppState::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTask { text: String, priority: Priority },
    ToggleComplete(String),
    DeleteTask(String),
    OpenEditor(String),
    SetFilter(Filter),
    SetPriority(Priority),
    EditorAddSubtask(String),
    EditorToggleSubtask(String),
    EditorRemoveSubtask(String),
    EditorSetNotes(String),
    EditorSetDueInput(String),
    SaveEditor,
    CancelEditor,
}

/// Main application state
pub struct AppState {
    pub repo: TaskRepository,
    pub editor: ModalEditor,
    pub filter: Filter,
    /// Priority preselected for the next new task
    pub priority: Priority,
    /// Index into the visible rows
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    /// One-line message for the status bar
    pub status: Option<String>,
    /// Where preferences are saved; `None` keeps them in memory only
    pub meta_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(repo: TaskRepository, metadata: AppMetadata) -> Self {
        Self {
            repo,
            editor: ModalEditor::new(),
            filter: metadata.filter,
            priority: metadata.priority,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            status: None,
            meta_path: None,
        }
    }

    pub fn with_meta_path(mut self, path: PathBuf) -> Self {
        self.meta_path = Some(path);
        self
    }

    /// Current projection of the task list
    pub fn view(&self) -> ListView {
        ListView::compute(self.repo.tasks(), self.filter)
    }

    /// Task under the cursor, if any is visible
    pub fn selected_task(&self) -> Option<&Task> {
        let visible = self.view().visible_indices();
        visible
            .get(self.selected_index)
            .and_then(|&idx| self.repo.tasks().get(idx))
    }

    pub fn selected_task_id(&self) -> Option<String> {
        self.selected_task().map(|t| t.id.clone())
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.view().visible_count() {
            self.selected_index += 1;
        }
    }

    /// Keep the cursor inside the visible rows
    fn clamp_selection(&mut self) {
        let visible = self.view().visible_count();
        if self.selected_index >= visible {
            self.selected_index = visible.saturating_sub(1);
        }
    }

    /// Apply a command.
    ///
    /// Missing tasks, blank input and editor misuse turn into a no-op with
    /// a status message; only store failures are returned.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        self.status = None;
        match self.execute(command) {
            Err(e) if e.is_recoverable() => {
                tracing::debug!(error = %e, "command ignored");
                self.status = Some(e.to_string());
                Ok(())
            }
            Err(e) => Err(e.into()),
            Ok(()) => Ok(()),
        }
    }

    fn execute(&mut self, command: Command) -> Result<(), TaskflowError> {
        match command {
            Command::AddTask { text, priority } => {
                let task = self.repo.add(&text, priority)?;
                let visible = self.view().visible_indices();
                let position = visible
                    .iter()
                    .position(|&idx| self.repo.tasks()[idx].id == task.id);
                if let Some(pos) = position {
                    self.selected_index = pos;
                }
            }
            Command::ToggleComplete(id) => {
                self.repo.toggle_completed(&id)?;
                self.clamp_selection();
            }
            Command::DeleteTask(id) => {
                if !self.repo.remove(&id)? {
                    return Err(TaskflowError::NotFound(id));
                }
                self.clamp_selection();
            }
            Command::OpenEditor(id) => {
                if !self.editor.open(&self.repo, &id) {
                    return Err(TaskflowError::NotFound(id));
                }
                self.ui_mode = UiMode::Editing;
            }
            Command::SetFilter(filter) => {
                self.filter = filter;
                self.clamp_selection();
                self.save_metadata();
            }
            Command::SetPriority(priority) => {
                self.priority = priority;
                self.save_metadata();
            }
            Command::EditorAddSubtask(text) => {
                if !self.editor.is_open() {
                    return Err(TaskflowError::EditorClosed);
                }
                if self.editor.add_subtask(&text).is_none() {
                    return Err(TaskflowError::EmptyInput);
                }
            }
            Command::EditorToggleSubtask(id) => {
                if !self.editor.toggle_subtask(&id) {
                    return Err(TaskflowError::NotFound(id));
                }
            }
            Command::EditorRemoveSubtask(id) => {
                if !self.editor.remove_subtask(&id) {
                    return Err(TaskflowError::NotFound(id));
                }
            }
            Command::EditorSetNotes(notes) => {
                if !self.editor.set_notes(&notes) {
                    return Err(TaskflowError::EditorClosed);
                }
            }
            Command::EditorSetDueInput(input) => {
                if !self.editor.set_due_input(&input) {
                    return Err(TaskflowError::EditorClosed);
                }
            }
            Command::SaveEditor => {
                let result = self.editor.save(&mut self.repo);
                if !self.editor.is_open() {
                    self.ui_mode = UiMode::Normal;
                }
                result?;
            }
            Command::CancelEditor => {
                self.editor.cancel();
                self.ui_mode = UiMode::Normal;
            }
        }
        Ok(())
    }

    /// Open the add-task form
    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::default());
        self.ui_mode = UiMode::AddingTask;
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.text.push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.text.pop();
        }
    }

    /// Submit the form. Blank text leaves the form open for re-entry.
    pub fn submit_input_form(&mut self) -> Result<()> {
        let Some(form) = &self.input_form else {
            return Ok(());
        };
        if form.text.trim().is_empty() {
            return Ok(());
        }

        let text = form.text.clone();
        self.dispatch(Command::AddTask {
            text,
            priority: self.priority,
        })?;
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
        Ok(())
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    pub fn cycle_priority(&mut self) -> Result<()> {
        self.dispatch(Command::SetPriority(self.priority.cycle()))
    }

    pub fn cycle_filter(&mut self) -> Result<()> {
        self.dispatch(Command::SetFilter(self.filter.cycle()))
    }

    /// Persist UI preferences; failures are logged, never fatal
    fn save_metadata(&self) {
        let Some(path) = &self.meta_path else {
            return;
        };
        let metadata = AppMetadata {
            filter: self.filter,
            priority: self.priority,
        };
        if let Err(e) = save_metadata(path, &metadata) {
            tracing::warn!(error = %e, path = %path.display(), "failed to save preferences");
        }
    }
}

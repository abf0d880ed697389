use crate::app::{AppState, Command};
use crate::domain::{EditorField, Filter, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask => handle_input_form_mode(app, key),
        UiMode::Editing => handle_editor_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Add task
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_task();
            Ok(false)
        }

        // Toggle completion checkbox
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Char('X') => {
            if let Some(id) = app.selected_task_id() {
                app.dispatch(Command::ToggleComplete(id))?;
            }
            Ok(false)
        }

        // Delete task
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            if let Some(id) = app.selected_task_id() {
                app.dispatch(Command::DeleteTask(id))?;
            }
            Ok(false)
        }

        // Open the editor for notes, due date and subtasks
        KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
            if let Some(id) = app.selected_task_id() {
                app.dispatch(Command::OpenEditor(id))?;
            }
            Ok(false)
        }

        // Filters
        KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Tab => {
            app.cycle_filter()?;
            Ok(false)
        }
        KeyCode::Char('1') => {
            app.dispatch(Command::SetFilter(Filter::All))?;
            Ok(false)
        }
        KeyCode::Char('2') => {
            app.dispatch(Command::SetFilter(Filter::Active))?;
            Ok(false)
        }
        KeyCode::Char('3') => {
            app.dispatch(Command::SetFilter(Filter::Completed))?;
            Ok(false)
        }

        // Priority for new tasks
        KeyCode::Char('p') | KeyCode::Char('P') => {
            app.cycle_priority()?;
            Ok(false)
        }

        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),

        KeyCode::Esc => {
            app.status = None;
            Ok(false)
        }

        _ => Ok(false),
    }
}

/// Handle keys in the add-task form
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.submit_input_form()?;
            Ok(false)
        }
        KeyCode::Esc => {
            app.cancel_input_form();
            Ok(false)
        }
        // Cycle priority low -> medium -> high
        KeyCode::Tab => {
            app.cycle_priority()?;
            Ok(false)
        }
        KeyCode::Backspace => {
            app.input_form_backspace();
            Ok(false)
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_form_add_char(c);
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys in the task editor popup
fn handle_editor_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Commit / discard work from any field
    match key.code {
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.dispatch(Command::SaveEditor)?;
            return Ok(false);
        }
        KeyCode::Esc => {
            app.dispatch(Command::CancelEditor)?;
            return Ok(false);
        }
        KeyCode::Tab => {
            if let Some(copy) = app.editor.working_copy_mut() {
                copy.focus_next();
            }
            return Ok(false);
        }
        _ => {}
    }

    let Some(focus) = app.editor.working_copy().map(|c| c.focus) else {
        return Ok(false);
    };

    match (focus, key.code) {
        (EditorField::Subtasks, KeyCode::Up | KeyCode::Char('k')) => {
            if let Some(copy) = app.editor.working_copy_mut() {
                copy.select_prev();
            }
        }
        (EditorField::Subtasks, KeyCode::Down | KeyCode::Char('j')) => {
            if let Some(copy) = app.editor.working_copy_mut() {
                copy.select_next();
            }
        }
        (EditorField::Subtasks, KeyCode::Char(' ') | KeyCode::Char('x')) => {
            if let Some(id) = app.editor.working_copy().and_then(|c| c.selected_subtask_id()) {
                app.dispatch(Command::EditorToggleSubtask(id))?;
            }
        }
        (EditorField::Subtasks, KeyCode::Char('d') | KeyCode::Delete) => {
            if let Some(id) = app.editor.working_copy().and_then(|c| c.selected_subtask_id()) {
                app.dispatch(Command::EditorRemoveSubtask(id))?;
            }
        }
        (EditorField::Subtasks, _) => {}

        (EditorField::NewSubtask, KeyCode::Enter) => {
            let text = app
                .editor
                .working_copy_mut()
                .map(|c| std::mem::take(&mut c.subtask_input))
                .unwrap_or_default();
            if !text.trim().is_empty() {
                app.dispatch(Command::EditorAddSubtask(text))?;
            }
        }
        (EditorField::Notes, KeyCode::Enter) => edit_field(app, focus, |text| text.push('\n'))?,
        (EditorField::Notes | EditorField::DueDate, KeyCode::Backspace) => {
            edit_field(app, focus, |text| {
                text.pop();
            })?
        }
        (EditorField::Notes | EditorField::DueDate, KeyCode::Char(c))
            if !key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            edit_field(app, focus, |text| text.push(c))?
        }
        (_, KeyCode::Enter) => {
            if let Some(copy) = app.editor.working_copy_mut() {
                copy.focus_next();
            }
        }
        (_, KeyCode::Backspace) => {
            if let Some(copy) = app.editor.working_copy_mut() {
                copy.input_backspace();
            }
        }
        (_, KeyCode::Char(c)) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(copy) = app.editor.working_copy_mut() {
                copy.input_char(c);
            }
        }
        _ => {}
    }

    Ok(false)
}

/// Apply `edit` to the notes or due-date text and send the result as a command
fn edit_field(app: &mut AppState, field: EditorField, edit: impl FnOnce(&mut String)) -> Result<()> {
    let Some(copy) = app.editor.working_copy() else {
        return Ok(());
    };
    let command = match field {
        EditorField::Notes => {
            let mut notes = copy.notes.clone();
            edit(&mut notes);
            Command::EditorSetNotes(notes)
        }
        EditorField::DueDate => {
            let mut input = copy.due_input.clone();
            edit(&mut input);
            Command::EditorSetDueInput(input)
        }
        EditorField::NewSubtask | EditorField::Subtasks => return Ok(()),
    };
    app.dispatch(command)
}

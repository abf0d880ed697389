use crate::app::AppState;
use crate::domain::{checkbox, format_due_date};
use crate::ui::styles::{
    border_style, default_style, done_style, overdue_style, priority_style, title_style,
};
use chrono::{Local, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let editing = app.selected_task_id().is_some()
        && app.editor.editing_id() == app.selected_task_id().as_deref();
    let title = if editing { " Details (editing) " } else { " Details " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    let task = match app.selected_task() {
        Some(task) => task,
        None => {
            f.render_widget(Paragraph::new("No task selected").block(block), area);
            return;
        }
    };

    let today = Local::now().date_naive();
    let mut lines = Vec::new();

    // Title
    lines.push(Line::from(vec![
        Span::styled("Task: ", title_style()),
        Span::raw(task.text.as_str()),
    ]));
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::styled("Priority: ", title_style()),
        Span::styled(task.priority.to_tag(), priority_style(task.priority)),
    ]));

    let status = if task.completed { "completed" } else { "active" };
    lines.push(Line::from(vec![
        Span::styled("Status:   ", title_style()),
        Span::raw(status),
    ]));

    let due = match task.due_date {
        Some(date) if task.is_overdue(today) => {
            Span::styled(format!("{} (overdue)", format_due_date(date)), overdue_style())
        }
        Some(date) => Span::raw(format_due_date(date)),
        None => Span::styled("none", default_style()),
    };
    lines.push(Line::from(vec![Span::styled("Due:      ", title_style()), due]));

    lines.push(Line::from(vec![
        Span::styled("Created:  ", title_style()),
        Span::raw(local_timestamp(task.created_at)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Updated:  ", title_style()),
        Span::raw(local_timestamp(task.updated_at)),
    ]));
    lines.push(Line::raw(""));

    // Notes
    if task.has_notes() {
        lines.push(Line::from(Span::styled("Notes:", title_style())));
        for note_line in task.notes.lines() {
            lines.push(Line::raw(format!("  {}", note_line)));
        }
    } else {
        lines.push(Line::from(Span::styled("Notes: (empty)", default_style())));
    }
    lines.push(Line::raw(""));

    // Subtasks
    if task.subtasks.is_empty() {
        lines.push(Line::from(Span::styled("Subtasks: (none)", default_style())));
    } else {
        let (done, total) = task.subtask_progress();
        lines.push(Line::from(Span::styled(
            format!("Subtasks: {}/{}", done, total),
            title_style(),
        )));
        for subtask in &task.subtasks {
            let style = if subtask.completed {
                done_style()
            } else {
                default_style()
            };
            lines.push(Line::from(vec![
                Span::raw(format!("  {} ", checkbox(subtask.completed))),
                Span::styled(subtask.text.as_str(), style),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

fn local_timestamp(at: chrono::DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

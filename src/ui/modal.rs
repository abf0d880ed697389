use crate::app::AppState;
use crate::domain::{checkbox, EditorField};
use crate::editor::WorkingCopy;
use crate::ui::{
    layout::create_modal_area,
    styles::{done_style, modal_bg_style, modal_title_style, selected_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the task editor modal
pub fn render_editor_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(copy) = app.editor.working_copy() {
        let height = 14 + copy.notes.lines().count() as u16 + copy.subtasks.len() as u16;
        let modal_area = create_modal_area(area, height);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let paragraph = Paragraph::new(editor_lines(copy))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        format!(" Edit: {} ", copy.title),
                        modal_title_style(),
                    ))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

fn field_label(copy: &WorkingCopy, field: EditorField, label: &str) -> Line<'static> {
    if copy.focus == field {
        Line::raw(format!("{} (editing)", label))
    } else {
        Line::raw(label.to_string())
    }
}

fn cursor(copy: &WorkingCopy, field: EditorField) -> Span<'static> {
    if copy.focus == field {
        Span::styled("█", modal_title_style())
    } else {
        Span::raw("")
    }
}

fn editor_lines(copy: &WorkingCopy) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    lines.push(Line::raw(""));

    // Notes (multi-line)
    lines.push(field_label(copy, EditorField::Notes, "Notes:"));
    let notes: Vec<&str> = copy.notes.split('\n').collect();
    let last = notes.len() - 1;
    for (idx, note_line) in notes.iter().enumerate() {
        let mut spans = vec![
            Span::raw("> "),
            Span::styled(note_line.to_string(), modal_title_style()),
        ];
        if idx == last {
            spans.push(cursor(copy, EditorField::Notes));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::raw(""));

    // Due date
    lines.push(field_label(copy, EditorField::DueDate, "Due date (YYYY-MM-DD):"));
    lines.push(Line::from(vec![
        Span::raw("> "),
        Span::styled(copy.due_input.clone(), modal_title_style()),
        cursor(copy, EditorField::DueDate),
    ]));
    lines.push(Line::raw(""));

    // New subtask
    lines.push(field_label(copy, EditorField::NewSubtask, "New subtask:"));
    lines.push(Line::from(vec![
        Span::raw("> "),
        Span::styled(copy.subtask_input.clone(), modal_title_style()),
        cursor(copy, EditorField::NewSubtask),
    ]));
    lines.push(Line::raw(""));

    // Subtask list
    lines.push(field_label(copy, EditorField::Subtasks, "Subtasks:"));
    if copy.subtasks.is_empty() {
        lines.push(Line::raw("  (none)"));
    }
    for (idx, subtask) in copy.subtasks.iter().enumerate() {
        let focused = copy.focus == EditorField::Subtasks && idx == copy.selected_subtask;
        let marker = if focused { "▶ " } else { "  " };
        let style = if focused {
            selected_style()
        } else if subtask.completed {
            done_style()
        } else {
            modal_bg_style()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(
                format!("{} {}", checkbox(subtask.completed), subtask.text),
                style,
            ),
        ]));
    }
    lines.push(Line::raw(""));

    // Instructions
    lines.push(Line::raw("Tab next field  ·  Ctrl+S save  ·  Esc cancel"));

    lines
}

use crate::app::AppState;
use crate::domain::{priority_marker, Priority};
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style, priority_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the input form for adding tasks
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area, 11);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let mut lines = Vec::new();

        lines.push(Line::raw(""));
        lines.push(Line::raw("What needs to be done? (editing)"));
        lines.push(Line::from(vec![
            Span::raw("> "),
            Span::styled(form.text.as_str(), modal_title_style()),
            Span::styled("█", modal_title_style()), // Cursor
        ]));
        lines.push(Line::raw(""));

        // Priority selector
        let mut priority_spans = vec![Span::raw("Priority: ")];
        for priority in Priority::all() {
            let label = format!(" {} {} ", priority_marker(*priority), priority.to_tag());
            if *priority == app.priority {
                priority_spans.push(Span::styled(
                    format!("[{}]", label.trim()),
                    priority_style(*priority),
                ));
            } else {
                priority_spans.push(Span::raw(label));
            }
            priority_spans.push(Span::raw(" "));
        }
        lines.push(Line::from(priority_spans));
        lines.push(Line::raw(""));

        // Instructions
        lines.push(Line::raw("Enter to add  ·  Tab to change priority  ·  Esc to cancel"));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Add Task ", modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

use crate::app::AppState;
use crate::domain::Filter;
use crate::ui::styles::{active_tab_style, border_style, default_style, priority_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the header: filter tabs, selected priority and counts
pub fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let view = app.view();
    let mut spans = Vec::new();

    for (idx, filter) in Filter::all().iter().enumerate() {
        let label = format!(" {} {} ", idx + 1, filter.name());
        let style = if *filter == app.filter {
            active_tab_style()
        } else {
            default_style()
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::raw("   New: "));
    spans.push(Span::styled(
        app.priority.to_tag().to_string(),
        priority_style(app.priority),
    ));
    spans.push(Span::raw(format!(
        "   Total: {}   Done: {}",
        view.total, view.completed
    )));

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" TaskFlow ", title_style())),
    );
    f.render_widget(paragraph, area);
}

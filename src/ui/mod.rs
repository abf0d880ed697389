pub mod details_pane;
pub mod header;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use details_pane::render_details_pane;
use header::render_header;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_editor_modal;
use ratatui::{layout::Rect, text::Span, widgets::Paragraph, Frame};
use styles::overdue_style;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    // Render keybindings bar
    render_keybindings(f, app.ui_mode, layout.keybindings_area);

    // Render panes
    render_header(f, app, layout.header_area);
    render_list_pane(f, app, layout.list_area);
    render_details_pane(f, app, layout.details_area);
    render_status(f, app, layout.status_area);

    // Render input form if active
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }

    // Render editor modal if open
    if app.editor.is_open() {
        render_editor_modal(f, app, size);
    }
}

fn render_status(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(status) = &app.status {
        let paragraph = Paragraph::new(Span::styled(format!(" {}", status), overdue_style()));
        f.render_widget(paragraph, area);
    }
}

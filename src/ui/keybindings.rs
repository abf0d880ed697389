use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hints for the current mode
pub fn hints(mode: UiMode) -> &'static [&'static str] {
    match mode {
        UiMode::Normal => &[
            "↑/↓ select",
            "a add",
            "space done",
            "enter edit",
            "d delete",
            "f/1-3 filter",
            "p priority",
            "q quit",
        ],
        UiMode::AddingTask => &["enter add", "tab priority", "esc cancel"],
        UiMode::Editing => &[
            "tab next field",
            "enter add subtask",
            "space toggle",
            "d remove",
            "ctrl+s save",
            "esc cancel",
        ],
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, area: Rect) {
    let spans: Vec<Span> = hints(mode)
        .iter()
        .map(|hint| Span::raw(format!(" {}  ", hint)))
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).style(hint_style());
    f.render_widget(paragraph, area);
}

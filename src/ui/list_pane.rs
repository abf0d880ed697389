use crate::app::AppState;
use crate::domain::{checkbox, format_due_date, priority_marker, Task, TaskIndicators};
use crate::ui::styles::{
    border_style, default_style, done_style, empty_style, indicator_style, overdue_style,
    priority_style, selected_style, title_style,
};
use chrono::{Local, NaiveDate};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let view = app.view();
    let title = format!(" Tasks ({}) ", app.filter.name());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    if view.is_empty_state() {
        let empty = Paragraph::new(Line::styled(view.empty_message(), empty_style()))
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    let today = Local::now().date_naive();
    let tasks = app.repo.tasks();

    let items: Vec<ListItem> = view
        .visible_indices()
        .into_iter()
        .enumerate()
        .map(|(row, task_index)| {
            let line = create_task_line(&tasks[task_index], today);
            let style = if row == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

/// Create a single line for a task
/// Format: [ ] █ Write proposal   ✎  ⏲ Mar 5, 2025  ☑ 1/3
fn create_task_line(task: &Task, today: NaiveDate) -> Line<'static> {
    let indicators = TaskIndicators::for_task(task, today);
    let mut spans = vec![
        Span::raw(format!("{} ", checkbox(task.completed))),
        Span::styled(
            format!("{} ", priority_marker(task.priority)),
            priority_style(task.priority),
        ),
    ];

    let text_style = if task.completed {
        done_style()
    } else {
        default_style()
    };
    spans.push(Span::styled(task.text.clone(), text_style));
    spans.push(Span::raw("  ".to_string()));

    if indicators.has_notes {
        spans.push(Span::styled(" ✎ ".to_string(), indicator_style()));
    }

    if let Some(due) = indicators.due_date {
        let style = if indicators.overdue {
            overdue_style()
        } else {
            indicator_style()
        };
        let label = if indicators.overdue {
            format!(" ⏲ {} (overdue) ", format_due_date(due))
        } else {
            format!(" ⏲ {} ", format_due_date(due))
        };
        spans.push(Span::styled(label, style));
    }

    if let Some((done, total)) = indicators.subtasks {
        spans.push(Span::styled(format!(" ☑ {}/{} ", done, total), indicator_style()));
    }

    Line::from(spans)
}

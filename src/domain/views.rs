use super::enums::{Filter, Priority};
use super::task::Task;
use chrono::NaiveDate;

/// Per-task visibility under the current filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRow {
    /// Index into the repository's task list
    pub task_index: usize,
    pub visible: bool,
}

/// Projection of the task list under a filter.
///
/// Counts are always over all tasks; the filter only decides visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub filter: Filter,
    pub rows: Vec<ListRow>,
    pub total: usize,
    pub completed: usize,
}

impl ListView {
    pub fn compute(tasks: &[Task], filter: Filter) -> Self {
        let rows = tasks
            .iter()
            .enumerate()
            .map(|(task_index, task)| ListRow {
                task_index,
                visible: filter.matches(task.completed),
            })
            .collect();

        Self {
            filter,
            rows,
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.completed).count(),
        }
    }

    /// Indices (into the task list) of visible tasks, in list order
    pub fn visible_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .filter(|row| row.visible)
            .map(|row| row.task_index)
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|row| row.visible).count()
    }

    /// Shown when there are no tasks at all or none pass the filter
    pub fn is_empty_state(&self) -> bool {
        self.total == 0 || self.visible_count() == 0
    }

    /// Message for the empty state, specific to the filter
    pub fn empty_message(&self) -> &'static str {
        if self.total == 0 {
            return "No tasks yet. Press 'a' to add one.";
        }
        match self.filter {
            Filter::All => "No tasks yet. Press 'a' to add one.",
            Filter::Active => "Nothing left to do.",
            Filter::Completed => "No completed tasks yet.",
        }
    }
}

/// Badges shown next to a task in the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskIndicators {
    pub has_notes: bool,
    pub due_date: Option<NaiveDate>,
    pub overdue: bool,
    /// (completed, total) when the task has subtasks
    pub subtasks: Option<(usize, usize)>,
}

impl TaskIndicators {
    pub fn for_task(task: &Task, today: NaiveDate) -> Self {
        let (done, total) = task.subtask_progress();
        Self {
            has_notes: task.has_notes(),
            due_date: task.due_date,
            overdue: task.is_overdue(today),
            subtasks: (total > 0).then_some((done, total)),
        }
    }
}

/// Format a due date like "Mar 5, 2025"
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Checkbox glyph for the list
pub fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Single-character priority marker
pub fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "▂",
        Priority::Medium => "▅",
        Priority::High => "█",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Subtask;
    use pretty_assertions::assert_eq;

    fn tasks_with_states(states: &[bool]) -> Vec<Task> {
        states
            .iter()
            .enumerate()
            .map(|(i, done)| {
                let mut task = Task::new(format!("Task {}", i), Priority::Medium);
                task.completed = *done;
                task
            })
            .collect()
    }

    #[test]
    fn test_visible_set_matches_predicate() {
        let tasks = tasks_with_states(&[false, true, false, true, true]);

        for filter in Filter::all() {
            let view = ListView::compute(&tasks, *filter);
            let expected: Vec<usize> = tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| filter.matches(t.completed))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(view.visible_indices(), expected);
        }
    }

    #[test]
    fn test_counts_independent_of_filter() {
        let tasks = tasks_with_states(&[false, true, true]);
        for filter in Filter::all() {
            let view = ListView::compute(&tasks, *filter);
            assert_eq!(view.total, 3);
            assert_eq!(view.completed, 2);
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let tasks = tasks_with_states(&[false, true]);
        let first = ListView::compute(&tasks, Filter::Active);
        let second = ListView::compute(&tasks, Filter::Active);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_state_without_tasks() {
        let view = ListView::compute(&[], Filter::All);
        assert!(view.is_empty_state());
        assert_eq!(view.total, 0);
    }

    #[test]
    fn test_empty_state_when_filter_hides_everything() {
        let tasks = tasks_with_states(&[false, false]);
        assert!(ListView::compute(&tasks, Filter::Completed).is_empty_state());
        assert!(!ListView::compute(&tasks, Filter::Active).is_empty_state());
        assert!(!ListView::compute(&tasks, Filter::All).is_empty_state());
    }

    #[test]
    fn test_indicators() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let mut task = Task::new("Test", Priority::High);
        assert_eq!(
            TaskIndicators::for_task(&task, today),
            TaskIndicators {
                has_notes: false,
                due_date: None,
                overdue: false,
                subtasks: None,
            }
        );

        task.notes = "details".to_string();
        task.due_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        task.subtasks.push(Subtask::new("a"));
        task.subtasks.push(Subtask::new("b"));
        task.subtasks[0].completed = true;

        let indicators = TaskIndicators::for_task(&task, today);
        assert!(indicators.has_notes);
        assert!(indicators.overdue);
        assert_eq!(indicators.subtasks, Some((1, 2)));
    }

    #[test]
    fn test_format_due_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(format_due_date(date), "Mar 5, 2025");
    }

    #[test]
    fn test_checkbox() {
        assert_eq!(checkbox(true), "[x]");
        assert_eq!(checkbox(false), "[ ]");
    }
}

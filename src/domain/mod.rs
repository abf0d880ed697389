pub mod enums;
pub mod task;
pub mod views;

pub use enums::{EditorField, Filter, Priority, UiMode};
pub use task::{generate_id, Subtask, Task, TaskPatch};
pub use views::{checkbox, format_due_date, priority_marker, ListView, TaskIndicators};

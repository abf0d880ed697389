//! Lenient decoding of persisted task records.
//!
//! Records written by older versions may miss fields or carry values of the
//! wrong shape. Decoding fills every gap with the field default instead of
//! rejecting the record; only entries that are not JSON objects are refused.

use crate::domain::{generate_id, Priority, Subtask, Task};
use crate::error::{Result, TaskflowError};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

/// Date format used by `dueDate`
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Decode a whole persisted collection.
///
/// Returns the tasks plus the number of entries that had to be skipped.
pub fn decode_collection(raw: &str, now: DateTime<Utc>) -> Result<(Vec<Task>, usize)> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| TaskflowError::MalformedPersistedRecord(format!("invalid JSON: {}", e)))?;
    let Value::Array(entries) = value else {
        return Err(TaskflowError::MalformedPersistedRecord(
            "expected a JSON array of tasks".to_string(),
        ));
    };

    let mut tasks = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    for (index, entry) in entries.iter().enumerate() {
        match decode_task(entry, now) {
            Ok(task) => tasks.push(task),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping persisted record");
                skipped += 1;
            }
        }
    }
    Ok((tasks, skipped))
}

/// Serialize the collection in its persisted form
pub fn encode_collection(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Decode one record, defaulting anything missing or malformed
pub fn decode_task(value: &Value, now: DateTime<Utc>) -> Result<Task> {
    let Value::Object(record) = value else {
        return Err(TaskflowError::MalformedPersistedRecord(format!(
            "expected an object, found {}",
            kind_of(value)
        )));
    };

    let created_at = timestamp_field(record, "createdAt").unwrap_or(now);
    let updated_at = timestamp_field(record, "updatedAt").unwrap_or(created_at);

    Ok(Task {
        id: id_field(record).unwrap_or_else(generate_id),
        text: str_field(record, "text").unwrap_or_default(),
        completed: record.get("completed").and_then(Value::as_bool).unwrap_or(false),
        priority: record
            .get("priority")
            .and_then(Value::as_str)
            .and_then(Priority::from_tag)
            .unwrap_or_default(),
        notes: str_field(record, "notes").unwrap_or_default(),
        due_date: record
            .get("dueDate")
            .and_then(Value::as_str)
            .and_then(parse_due_date),
        subtasks: record
            .get("subtasks")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(decode_subtask).collect())
            .unwrap_or_default(),
        created_at,
        updated_at,
    })
}

fn decode_subtask(value: &Value) -> Option<Subtask> {
    let record = value.as_object()?;
    Some(Subtask {
        id: non_empty_str(record, "id").unwrap_or_else(generate_id),
        text: str_field(record, "text").unwrap_or_default(),
        completed: record.get("completed").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Parse a `YYYY-MM-DD` due date; blank input is no date
pub fn parse_due_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(input, DUE_DATE_FORMAT).ok()
}

fn str_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

fn non_empty_str(record: &Map<String, Value>, key: &str) -> Option<String> {
    str_field(record, key).filter(|s| !s.is_empty())
}

/// Task ID as a string; numeric IDs are read in their decimal form
fn id_field(record: &Map<String, Value>) -> Option<String> {
    match record.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        _ => non_empty_str(record, "id"),
    }
}

fn timestamp_field(record: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    record
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_full_record() {
        let now = Utc::now();
        let value = json!({
            "id": "abc123",
            "text": "Write report",
            "completed": true,
            "priority": "high",
            "notes": "draft first",
            "dueDate": "2025-04-01",
            "subtasks": [{"id": "s1", "text": "outline", "completed": true}],
            "createdAt": "2025-01-01T10:00:00.000Z",
            "updatedAt": "2025-01-02T10:00:00.000Z"
        });

        let task = decode_task(&value, now).unwrap();
        assert_eq!(task.id, "abc123");
        assert_eq!(task.text, "Write report");
        assert!(task.completed);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.notes, "draft first");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(
            task.subtasks,
            vec![Subtask {
                id: "s1".to_string(),
                text: "outline".to_string(),
                completed: true,
            }]
        );
        assert_eq!(task.created_at.to_rfc3339(), "2025-01-01T10:00:00+00:00");
        assert_eq!(task.updated_at.to_rfc3339(), "2025-01-02T10:00:00+00:00");
    }

    #[test]
    fn test_decode_defaults_missing_fields() {
        let now = Utc::now();
        let task = decode_task(&json!({"id": "x", "text": "old"}), now).unwrap();

        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);
        assert_eq!(task.notes, "");
        assert!(task.due_date.is_none());
        assert!(task.subtasks.is_empty());
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn test_decode_tolerates_bad_values() {
        let now = Utc::now();
        let value = json!({
            "id": "x",
            "text": "t",
            "priority": "urgent",
            "dueDate": "next week",
            "subtasks": null,
            "createdAt": 42
        });

        let task = decode_task(&value, now).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.due_date.is_none());
        assert!(task.subtasks.is_empty());
        assert_eq!(task.created_at, now);
    }

    #[test]
    fn test_decode_numeric_id_is_stable() {
        let value = json!({"id": 42, "text": "x"});
        let first = decode_task(&value, Utc::now()).unwrap();
        let second = decode_task(&value, Utc::now()).unwrap();
        assert_eq!(first.id, "42");
        assert_eq!(second.id, first.id);
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode_task(&json!("just text"), Utc::now()).unwrap_err();
        assert!(matches!(err, TaskflowError::MalformedPersistedRecord(_)));
    }

    #[test]
    fn test_decode_collection_skips_malformed_entries() {
        let raw = r#"[{"id":"a","text":"one"}, 7, {"id":"b","text":"two"}]"#;
        let (tasks, skipped) = decode_collection(raw, Utc::now()).unwrap();

        assert_eq!(skipped, 1);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_decode_collection_rejects_non_array() {
        assert!(decode_collection("{}", Utc::now()).is_err());
        assert!(decode_collection("not json", Utc::now()).is_err());
    }

    #[test]
    fn test_encode_decode_preserves_tasks() {
        let mut task = Task::new("Round", Priority::Low);
        task.due_date = NaiveDate::from_ymd_opt(2025, 12, 31);
        task.subtasks.push(Subtask::new("first"));
        task.subtasks.push(Subtask::new("second"));
        let tasks = vec![task, Task::new("Trip", Priority::High)];

        let raw = encode_collection(&tasks).unwrap();
        let (decoded, skipped) = decode_collection(&raw, Utc::now()).unwrap();

        assert_eq!(skipped, 0);
        assert_eq!(decoded, tasks);
    }

    #[test]
    fn test_parse_due_date() {
        assert_eq!(parse_due_date("2025-02-03"), NaiveDate::from_ymd_opt(2025, 2, 3));
        assert_eq!(parse_due_date("  "), None);
        assert_eq!(parse_due_date("2025-13-01"), None);
    }
}

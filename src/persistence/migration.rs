use super::store::{KeyValueStore, TASKS_KEY};
use crate::domain::generate_id;
use crate::error::{Result, TaskflowError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Outcome of a migration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MigrationReport {
    /// Records that received an ID and the newer fields
    pub migrated: usize,
    /// Whether the collection was rewritten
    pub written: bool,
}

/// Upgrade persisted records from the earliest data format on startup
///
/// Records without an `id` get a fresh one plus `notes`, `dueDate`,
/// `subtasks`, `createdAt` and `updatedAt`. Everything else about the
/// collection (record order, other records, other fields) is left alone,
/// and nothing is written when no record needed upgrading.
pub fn migrate<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<MigrationReport> {
    let Some(raw) = store.get(TASKS_KEY)? else {
        return Ok(MigrationReport::default());
    };

    let mut value: Value = serde_json::from_str(&raw)
        .map_err(|e| TaskflowError::MalformedPersistedRecord(format!("invalid JSON: {}", e)))?;
    let Value::Array(records) = &mut value else {
        return Err(TaskflowError::MalformedPersistedRecord(
            "expected a JSON array of tasks".to_string(),
        ));
    };

    let migrated = migrate_records(records, Utc::now());
    if migrated == 0 {
        return Ok(MigrationReport::default());
    }

    store.set(TASKS_KEY, &serde_json::to_string_pretty(&value)?)?;
    tracing::info!(migrated, "migrated legacy task records");

    Ok(MigrationReport {
        migrated,
        written: true,
    })
}

/// Upgrade records in place, returning how many were changed
pub fn migrate_records(records: &mut [Value], now: DateTime<Utc>) -> usize {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut migrated = 0;

    for record in records.iter_mut() {
        let Value::Object(fields) = record else {
            continue;
        };
        match fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => continue,
            // Keep a numeric ID, but store it as the string every load reads
            Some(Value::Number(n)) if n.as_f64().is_some_and(|v| v != 0.0) => {
                let id = n.to_string();
                fields.insert("id".to_string(), Value::String(id));
                migrated += 1;
                continue;
            }
            _ => {}
        }

        fields.insert("id".to_string(), Value::String(generate_id()));
        fields.insert("notes".to_string(), Value::String(String::new()));
        fields.insert("dueDate".to_string(), Value::Null);
        fields.insert("subtasks".to_string(), Value::Array(Vec::new()));
        fields.insert("createdAt".to_string(), Value::String(timestamp.clone()));
        fields.insert("updatedAt".to_string(), Value::String(timestamp.clone()));
        migrated += 1;
    }

    migrated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_legacy_record_migration() {
        let mut store = MemoryStore::with_value(TASKS_KEY, r#"[{"text":"old","completed":true}]"#);

        let report = migrate(&mut store).unwrap();
        assert_eq!(report, MigrationReport { migrated: 1, written: true });

        let raw = store.get(TASKS_KEY).unwrap().unwrap();
        let records: Value = serde_json::from_str(&raw).unwrap();
        let record = &records[0];

        assert!(record["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(record["text"], "old");
        assert_eq!(record["completed"], true);
        assert_eq!(record["notes"], "");
        assert!(record["dueDate"].is_null());
        assert_eq!(record["subtasks"], json!([]));
        assert!(record["createdAt"].is_string());
        assert_eq!(record["createdAt"], record["updatedAt"]);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let mut store = MemoryStore::with_value(
            TASKS_KEY,
            r#"[{"text":"old","completed":false},{"text":"older","completed":true}]"#,
        );

        migrate(&mut store).unwrap();
        let after_first = store.get(TASKS_KEY).unwrap();
        assert_eq!(store.writes(), 1);

        let report = migrate(&mut store).unwrap();
        assert_eq!(report, MigrationReport::default());
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get(TASKS_KEY).unwrap(), after_first);
    }

    #[test]
    fn test_conformant_data_is_not_written() {
        let raw = r#"[{"id":"a1","text":"new","completed":false,"priority":"low"}]"#;
        let mut store = MemoryStore::with_value(TASKS_KEY, raw);

        let report = migrate(&mut store).unwrap();
        assert!(!report.written);
        assert_eq!(store.writes(), 0);
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some(raw));
    }

    #[test]
    fn test_migration_preserves_order_and_conformant_records() {
        let now = Utc::now();
        let conformant = json!({
            "id": "keep",
            "text": "modern",
            "completed": false,
            "priority": "high",
            "notes": "n",
            "dueDate": "2025-01-01",
            "subtasks": [],
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z",
            "extra": 1
        });
        let mut records = vec![
            json!({"text": "first"}),
            conformant.clone(),
            json!({"id": "", "text": "third"}),
        ];

        let migrated = migrate_records(&mut records, now);

        assert_eq!(migrated, 2);
        assert_eq!(records[0]["text"], "first");
        assert_eq!(records[1], conformant);
        assert_eq!(records[2]["text"], "third");
        assert!(!records[2]["id"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_numeric_and_boolean_ids() {
        let mut records = vec![
            json!({"id": 42, "text": "numbered", "notes": "kept"}),
            json!({"id": true, "text": "flagged"}),
        ];

        assert_eq!(migrate_records(&mut records, Utc::now()), 2);
        assert_eq!(records[0]["id"], "42");
        assert_eq!(records[0]["notes"], "kept");
        let flagged = records[1]["id"].as_str().unwrap();
        assert!(!flagged.is_empty() && flagged != "true");
        assert_eq!(records[1]["subtasks"], json!([]));

        // Second run finds nothing left to fix
        assert_eq!(migrate_records(&mut records, Utc::now()), 0);
    }

    #[test]
    fn test_missing_store_is_noop() {
        let mut store = MemoryStore::new();
        assert_eq!(migrate(&mut store).unwrap(), MigrationReport::default());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_non_array_is_malformed_and_untouched() {
        let mut store = MemoryStore::with_value(TASKS_KEY, r#"{"text":"x"}"#);
        let err = migrate(&mut store).unwrap_err();
        assert!(matches!(err, TaskflowError::MalformedPersistedRecord(_)));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_non_object_entries_are_left_alone() {
        let mut records = vec![json!(5), json!({"text": "a"})];
        assert_eq!(migrate_records(&mut records, Utc::now()), 1);
        assert_eq!(records[0], json!(5));
    }
}

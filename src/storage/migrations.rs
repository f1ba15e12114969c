use std::path::PathBuf;

use serde_json::Value;

use crate::storage::StorageError;

type MigrationFn = fn(Value) -> Result<Value, StorageError>;

fn get_migrations() -> Vec<MigrationFn> {
    vec![migrate_v1_to_v2]
}

/// Returns 1 if version field is missing (the first, unversioned layout)
pub fn detect_version(content: &str) -> Result<u32, StorageError> {
    let value: Value = serde_json::from_str(content).map_err(|e| StorageError::ParseFailed {
        path: PathBuf::from("<unknown>"),
        source: e,
    })?;

    match value.get("version") {
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| StorageError::InvalidVersion(v.clone())),
        None => Ok(1),
    }
}

/// Migrations are applied sequentially: v1→v2→v3→...→target
pub fn apply_migrations(
    mut data: Value,
    from_version: u32,
    to_version: u32,
) -> Result<Value, StorageError> {
    if from_version == to_version {
        return Ok(data);
    }

    if from_version > to_version {
        return Err(StorageError::FutureVersion(from_version));
    }

    let migrations = get_migrations();

    for version in from_version..to_version {
        let migration_idx = (version - 1) as usize; // v1→v2 is at index 0

        if migration_idx >= migrations.len() {
            return Err(StorageError::UnsupportedVersion(version));
        }

        log::info!("migrating store from v{} to v{}", version, version + 1);
        data = migrations[migration_idx](data)?;
    }

    Ok(data)
}

/// v1 derived new ids from the largest stored id; v2 persists the counters
/// so ids of deleted rows are never handed out again.
fn migrate_v1_to_v2(mut value: Value) -> Result<Value, StorageError> {
    let obj = value
        .as_object_mut()
        .ok_or_else(|| StorageError::Malformed(String::from("store is not an object")))?;

    let next_id = |key: &str| -> u64 {
        obj.get(key)
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| row.get("id").and_then(Value::as_u64))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
            + 1
    };

    let next_location_id = next_id("locations");
    let next_location_log_id = next_id("location_logs");

    obj.insert("version".to_string(), Value::from(2));
    obj.insert("next_location_id".to_string(), Value::from(next_location_id));
    obj.insert(
        "next_location_log_id".to_string(),
        Value::from(next_location_log_id),
    );
    obj.entry("locations").or_insert_with(|| Value::Array(vec![]));
    obj.entry("location_logs")
        .or_insert_with(|| Value::Array(vec![]));

    Ok(value)
}

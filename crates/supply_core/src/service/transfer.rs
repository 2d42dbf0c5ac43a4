//! Import and export of whole-dataset JSON documents.
//!
//! # Invariants
//! - An import payload must be an object with `buildings`, `orders` and
//!   `inventory` arrays; anything else is rejected in full.
//! - Accepted payloads get audit timestamps filled like any migrated blob,
//!   but a payload needing a record dropped is rejected instead.
//! - Export is the pretty-printed dataset and re-imports unchanged.

use crate::migrate::{migrate, Repair};
use crate::model::dataset::{Dataset, COLLECTION_KEYS};
use crate::service::error::{ImportError, ImportResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

const EXPORT_FILE_PREFIX: &str = "bfb_supply_export_";

/// Validates and decodes an import payload.
pub fn parse_import(text: &str, now: DateTime<Utc>) -> ImportResult<Dataset> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
    validate_structure(&value)?;

    let outcome = migrate(value, now);
    let dropped = outcome.repairs.iter().find_map(|repair| match repair {
        Repair::RecordDropped { collection, index } => Some(ImportError::InvalidRecord {
            collection: *collection,
            index: *index,
        }),
        _ => None,
    });
    match dropped {
        Some(err) => Err(err),
        None => Ok(outcome.dataset),
    }
}

/// Checks the three required array-shaped top-level keys.
pub fn validate_structure(value: &Value) -> ImportResult<()> {
    let root = value.as_object().ok_or(ImportError::NotAnObject)?;
    for key in COLLECTION_KEYS {
        if !root.get(key).is_some_and(Value::is_array) {
            return Err(ImportError::MissingCollection(key));
        }
    }
    Ok(())
}

/// Pretty-printed export document.
pub fn export_json(dataset: &Dataset) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dataset)
}

/// Download name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

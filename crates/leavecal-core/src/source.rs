use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::calendar::CalendarQuery;
use crate::leave::LeaveRecord;

/// Read-only supplier of leave records, backed by an export of the
/// attendance backend.
#[derive(Debug)]
pub struct LeaveSource {
    pub path: PathBuf,
}

impl LeaveSource {
    pub fn open(path: &Path) -> Self {
        let path = path.to_path_buf();
        info!(path = %path.display(), "opened leave source");
        Self { path }
    }

    /// Every record in the source. A missing file means no leave.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load_all(&self) -> anyhow::Result<Vec<LeaveRecord>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("leave file does not exist; treating as no leave");
                return Ok(vec![]);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed reading {}", self.path.display()));
            }
        };

        let records = parse_records(&raw, &self.path)?;
        debug!(count = records.len(), "loaded leave records");
        Ok(records)
    }

    /// Records belonging to the queried month, in source order.
    #[tracing::instrument(skip(self))]
    pub fn records_for(&self, query: &CalendarQuery) -> anyhow::Result<Vec<LeaveRecord>> {
        let all = self.load_all()?;
        let total = all.len();
        let scoped: Vec<LeaveRecord> = all.into_iter().filter(|leave| query.contains(leave)).collect();
        debug!(total, scoped = scoped.len(), "scoped leave records to month");
        Ok(scoped)
    }
}

fn parse_records(raw: &str, path: &Path) -> anyhow::Result<Vec<LeaveRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(vec![]);
    }

    // One JSON document: its own errors are the ones worth reporting.
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => records_from_value(value).with_context(|| format!("failed parsing {}", path.display())),
        Err(whole_err) => {
            debug!(error = %whole_err, "not a single JSON document; trying JSON lines");
            load_jsonl(trimmed, path)
        }
    }
}

/// Accepts the payload shapes the backend has been seen to return: an array
/// of records, a single record, or either of those under a `data` key.
fn records_from_value(value: Value) -> serde_json::Result<Vec<LeaveRecord>> {
    match value {
        array @ Value::Array(_) => serde_json::from_value(array),
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => records_from_value(data),
            None => Ok(vec![serde_json::from_value(Value::Object(map))?]),
        },
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

fn load_jsonl(raw: &str, path: &Path) -> anyhow::Result<Vec<LeaveRecord>> {
    let mut out = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: LeaveRecord = serde_json::from_str(trimmed)
            .with_context(|| format!("failed parsing {} line {}", path.display(), idx + 1))?;
        out.push(record);
    }
    Ok(out)
}

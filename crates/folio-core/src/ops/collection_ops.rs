use std::collections::HashSet;

use chrono::Utc;
use serde_json::Value;

use crate::model::{IdPolicy, Record, RecordId};

/// Whether an upsert replaced an existing record or appended a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// Highest id in the collection that parses as an unsigned integer
pub fn max_numeric_id(records: &[Record]) -> Option<u64> {
    records
        .iter()
        .filter_map(|r| r.id().and_then(|id| id.as_u64()))
        .max()
}

/// Compute an id not present in `records` using the current time
pub fn next_id(records: &[Record], policy: IdPolicy) -> Value {
    next_id_at(records, policy, Utc::now().timestamp_millis())
}

/// Compute an id not present in `records`, with an explicit clock reading
///
/// `MaxPlusOne` yields a JSON integer, `Timestamp` a digit string. Normally
/// the id is above every numeric id already present. When that would pass
/// `u64::MAX`, the lowest unused positive id is taken instead.
pub fn next_id_at(records: &[Record], policy: IdPolicy, now_millis: i64) -> Value {
    let now = u64::try_from(now_millis).unwrap_or(0);
    let above_max = match (max_numeric_id(records), policy) {
        (None, IdPolicy::MaxPlusOne) => Some(1),
        (None, IdPolicy::Timestamp) => Some(now),
        (Some(max), IdPolicy::MaxPlusOne) => max.checked_add(1),
        (Some(max), IdPolicy::Timestamp) => max.checked_add(1).map(|floor| floor.max(now)),
    };
    let id = above_max.unwrap_or_else(|| lowest_unused_id(records));

    match policy {
        IdPolicy::MaxPlusOne => Value::from(id),
        IdPolicy::Timestamp => Value::String(id.to_string()),
    }
}

fn lowest_unused_id(records: &[Record]) -> u64 {
    let taken: HashSet<u64> = records
        .iter()
        .filter_map(|r| r.id().and_then(|id| id.as_u64()))
        .collect();
    // len + 1 candidates cannot all be taken
    (1..=taken.len() as u64 + 1)
        .find(|n| !taken.contains(n))
        .unwrap_or(1)
}

pub fn position(records: &[Record], id: &RecordId) -> Option<usize> {
    records.iter().position(|r| r.has_id(id))
}

pub fn find<'a>(records: &'a [Record], id: &RecordId) -> Option<&'a Record> {
    records.iter().find(|r| r.has_id(id))
}

/// Replace the record with the same id, or append it
///
/// A record without an id gets one from `policy` before being appended.
/// Returns the record's id and what happened.
pub fn upsert_into(
    records: &mut Vec<Record>,
    mut record: Record,
    policy: IdPolicy,
) -> (RecordId, UpsertOutcome) {
    let id = match record.id() {
        Some(id) => id,
        None => {
            let value = next_id(records, policy);
            let id = match &value {
                Value::String(s) => RecordId::new(s.clone()),
                other => RecordId::new(other.to_string()),
            };
            record.set_id(value);
            id
        }
    };

    match position(records, &id) {
        Some(idx) => {
            records[idx] = record;
            (id, UpsertOutcome::Replaced)
        }
        None => {
            records.push(record);
            (id, UpsertOutcome::Inserted)
        }
    }
}

/// Filter out every record with `id`, returning the first one removed
///
/// `None` means nothing matched and `records` is unchanged.
pub fn remove_from(records: &mut Vec<Record>, id: &RecordId) -> Option<Record> {
    let idx = position(records, id)?;
    let removed = records.remove(idx);
    records.retain(|r| !r.has_id(id));
    Some(removed)
}

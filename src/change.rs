use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::detection::Detection;

/// Count difference for one object class between two captures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub current: usize,
    pub historical: usize,
    pub change: i64,
    pub change_percent: f64,
}

impl ChangeRecord {
    pub fn new(current: usize, historical: usize) -> Self {
        Self {
            current,
            historical,
            change: current as i64 - historical as i64,
            change_percent: change_percent(current, historical),
        }
    }
}

/// Percentage change from `historical` to `current`.
///
/// A class absent from the baseline counts as fully new (100.0). Absent from
/// both is no change (0.0).
pub fn change_percent(current: usize, historical: usize) -> f64 {
    match (current, historical) {
        (0, 0) => 0.0,
        (_, 0) => 100.0,
        _ => 100.0 * (current as f64 - historical as f64) / historical as f64,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeAnalysis {
    pub change_detected: bool,
    /// Only classes whose counts differ between the captures.
    pub changes: BTreeMap<String, ChangeRecord>,
    pub total_current_objects: usize,
    pub total_historical_objects: usize,
}

impl ChangeAnalysis {
    pub fn compare(current: &[Detection], historical: &[Detection]) -> Self {
        let current_counts = count_by_class(current);
        let historical_counts = count_by_class(historical);

        let mut changes: BTreeMap<String, ChangeRecord> = BTreeMap::new();
        for class in current_counts.keys().chain(historical_counts.keys()) {
            if changes.contains_key(*class) {
                continue;
            }
            let now = current_counts.get(class).copied().unwrap_or(0);
            let before = historical_counts.get(class).copied().unwrap_or(0);
            if now != before {
                changes.insert(class.to_string(), ChangeRecord::new(now, before));
            }
        }

        Self {
            change_detected: !changes.is_empty(),
            changes,
            total_current_objects: current.len(),
            total_historical_objects: historical.len(),
        }
    }
}

pub fn count_by_class(detections: &[Detection]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for detection in detections {
        *counts.entry(detection.class.as_str()).or_insert(0) += 1;
    }
    counts
}

use std::fmt::Write;

use serde_json::Value;

use crate::detection::Detection;

const UNSPECIFIED_AREA: &str = "unspecified area";

// above this many people and vehicles combined, activity is reported as high
const HIGH_ACTIVITY_THRESHOLD: usize = 5;

/// Coarse grouping of detection classes used by the environmental summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Building,
    Vehicle,
    Person,
    Other,
}

impl Category {
    pub fn of(class: &str) -> Self {
        match class.to_ascii_lowercase().as_str() {
            "building" | "house" | "structure" => Category::Building,
            "car" | "truck" | "bus" | "motorcycle" | "bicycle" | "vehicle" => Category::Vehicle,
            "person" | "pedestrian" => Category::Person,
            _ => Category::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub buildings: usize,
    pub vehicles: usize,
    pub people: usize,
    pub other: usize,
}

impl CategoryCounts {
    pub fn tally(detections: &[Detection]) -> Self {
        let mut counts = Self::default();
        for detection in detections {
            match Category::of(&detection.class) {
                Category::Building => counts.buildings += 1,
                Category::Vehicle => counts.vehicles += 1,
                Category::Person => counts.people += 1,
                Category::Other => counts.other += 1,
            }
        }
        counts
    }

    fn assessment(&self) -> String {
        let activity = match self.people + self.vehicles {
            0 => "minimal human activity",
            n if n <= HIGH_ACTIVITY_THRESHOLD => "moderate human activity",
            _ => "high human activity",
        };
        if self.buildings > 0 {
            format!("{activity} with infrastructure development")
        } else {
            activity.to_string()
        }
    }
}

/// Renders an opaque JSON label for display: strings without quotes, anything
/// else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds the free-text environmental summary for a set of current detections.
pub fn environmental_summary(
    area: Option<&Value>,
    coordinates: &Value,
    detections: &[Detection],
) -> String {
    let label = match area {
        None | Some(Value::Null) => UNSPECIFIED_AREA.to_string(),
        Some(value) => display_value(value),
    };
    let counts = CategoryCounts::tally(detections);
    let footprint: f64 = detections.iter().map(|d| d.area).sum();

    let mut summary = String::new();
    // writing into a String cannot fail
    let _ = writeln!(
        summary,
        "Analysis of {label} at coordinates {}:",
        display_value(coordinates)
    );
    let _ = writeln!(summary, "Total objects detected: {}", detections.len());
    let _ = writeln!(summary, "Detected footprint: {footprint:.0} square pixels");
    let _ = writeln!(summary);
    let _ = writeln!(summary, "Environmental indicators:");
    let _ = writeln!(summary, "- Built environment: {} structures", counts.buildings);
    let _ = writeln!(summary, "- Vehicle activity: {} vehicles", counts.vehicles);
    let _ = writeln!(summary, "- Human activity detected: {} people", counts.people);
    if counts.other > 0 {
        let _ = writeln!(summary, "- Other objects: {}", counts.other);
    }
    let _ = writeln!(summary);
    let _ = write!(summary, "This area shows {}.", counts.assessment());
    summary
}

//! Detectors that return canned results instead of running a model.

use std::path::Path;

use serde::Deserialize;

use crate::{
    detection::{BoundingBox, Detection},
    error::AdapterError,
    model::{Detector, Epoch, ImageRef},
};

pub const MOCK_NOTE: &str = "Mock analysis - detector integration pending";

/// Built-in placeholder detector.
///
/// Ignores the image reference and returns the same scene for every request:
/// a building, a car and a person now, and only the building and the car in
/// the historical capture.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockDetector;

fn detection(
    class: &str,
    confidence: f64,
    [x_min, y_min, x_max, y_max]: [f64; 4],
    area: f64,
) -> Result<Detection, AdapterError> {
    let bbox = BoundingBox::new(x_min, y_min, x_max, y_max)?;
    Detection::new(class, confidence, bbox, Some(area))
}

impl Detector for MockDetector {
    type Error = AdapterError;

    fn detect(&self, image: &ImageRef) -> Result<Vec<Detection>, Self::Error> {
        match image.epoch {
            Epoch::Current => Ok(vec![
                detection("building", 0.85, [100.0, 100.0, 200.0, 200.0], 10000.0)?,
                detection("car", 0.92, [300.0, 150.0, 350.0, 180.0], 1500.0)?,
                detection("person", 0.78, [400.0, 300.0, 420.0, 350.0], 400.0)?,
            ]),
            Epoch::Historical => Ok(vec![
                detection("building", 0.83, [100.0, 100.0, 200.0, 200.0], 10000.0)?,
                detection("car", 0.89, [300.0, 150.0, 350.0, 180.0], 1500.0)?,
            ]),
        }
    }

    fn note(&self) -> Option<String> {
        Some(MOCK_NOTE.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    current: Vec<Detection>,
    #[serde(default)]
    historical: Vec<Detection>,
    #[serde(default)]
    note: Option<String>,
}

/// Detector serving detections read from a JSON fixture file.
///
/// The URLs themselves are not resolved, but a historical capture with no
/// image reference yields no detections. The file is read and validated once
/// at startup:
///
/// ```json
/// {"current": [{"class": "car", "confidence": 0.9, "bbox": [0, 0, 10, 10]}],
///  "historical": [],
///  "note": "recorded survey"}
/// ```
#[derive(Debug, Clone)]
pub struct FixtureDetector {
    fixture: Fixture,
}

impl FixtureDetector {
    pub fn load(path: &Path) -> Result<Self, AdapterError> {
        let config_error = |reason: String| AdapterError::Config {
            path: path.display().to_string(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let fixture: Fixture =
            serde_json::from_str(&contents).map_err(|e| config_error(e.to_string()))?;

        log::debug!(
            "Loaded fixture {}: {} current, {} historical detections",
            path.display(),
            fixture.current.len(),
            fixture.historical.len()
        );
        Ok(Self { fixture })
    }
}

impl Detector for FixtureDetector {
    type Error = AdapterError;

    fn detect(&self, image: &ImageRef) -> Result<Vec<Detection>, Self::Error> {
        Ok(match image.epoch {
            Epoch::Current => self.fixture.current.clone(),
            Epoch::Historical if image.url.is_none() => Vec::new(),
            Epoch::Historical => self.fixture.historical.clone(),
        })
    }

    fn note(&self) -> Option<String> {
        self.fixture.note.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mock_scene_is_fixed_regardless_of_urls() {
        let with_url = ImageRef::new(Epoch::Current, Some("a.png".to_string()));
        let without_url = ImageRef::new(Epoch::Current, None);
        let a = MockDetector.detect(&with_url).unwrap();
        let b = MockDetector.detect(&without_url).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);

        let historical = MockDetector
            .detect(&ImageRef::new(Epoch::Historical, None))
            .unwrap();
        let classes: Vec<_> = historical.iter().map(|d| d.class.as_str()).collect();
        assert_eq!(classes, ["building", "car"]);
    }

    #[test]
    fn fixture_is_loaded_and_served_per_epoch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"current": [{{"class": "truck", "confidence": 0.7, "bbox": [0, 0, 20, 10]}}],
                "historical": [{{"class": "truck", "confidence": 0.6, "bbox": [0, 0, 20, 10]}}],
                "note": "survey"}}"#
        )
        .unwrap();

        let detector = FixtureDetector::load(file.path()).unwrap();
        let current = detector
            .detect(&ImageRef::new(Epoch::Current, None))
            .unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].area, 200.0);
        assert!(detector
            .detect(&ImageRef::new(Epoch::Historical, None))
            .unwrap()
            .is_empty());
        let historical = detector
            .detect(&ImageRef::new(Epoch::Historical, Some("then.png".to_string())))
            .unwrap();
        assert_eq!(historical.len(), 1);
        assert_eq!(detector.note().as_deref(), Some("survey"));
    }

    #[test]
    fn invalid_fixture_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"current": [{{"class": "car", "confidence": 3.0, "bbox": [0, 0, 1, 1]}}]}}"#
        )
        .unwrap();

        let err = FixtureDetector::load(file.path()).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("outside [0, 1]"), "{err}");
    }

    #[test]
    fn missing_fixture_is_a_config_error() {
        let err = FixtureDetector::load(Path::new("/nonexistent/fixture.json")).unwrap_err();
        assert_eq!(err.kind(), "config");
    }
}

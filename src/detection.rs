use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// Axis-aligned rectangle in image pixel coordinates.
///
/// Serialized as `[x_min, y_min, x_max, y_max]`. Construction rejects
/// non-finite values and degenerate boxes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl BoundingBox {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self, AdapterError> {
        if ![x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite()) {
            return Err(AdapterError::Validation(
                "bounding box coordinates must be finite".to_string(),
            ));
        }
        if x_min >= x_max || y_min >= y_max {
            return Err(AdapterError::Validation(format!(
                "degenerate bounding box [{x_min}, {y_min}, {x_max}, {y_max}]"
            )));
        }
        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = AdapterError;

    fn try_from([x_min, y_min, x_max, y_max]: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(x_min, y_min, x_max, y_max)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
    }
}

// Shape accepted from fixtures and detectors before invariants are checked.
#[derive(Deserialize)]
struct RawDetection {
    class: String,
    confidence: f64,
    bbox: BoundingBox,
    area: Option<f64>,
}

/// A single recognized object instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDetection")]
pub struct Detection {
    pub class: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
    /// Pixel area of the object. Detectors may report a mask area smaller
    /// than the box; when absent the box area is used.
    pub area: f64,
}

impl Detection {
    pub fn new(
        class: impl Into<String>,
        confidence: f64,
        bbox: BoundingBox,
        area: Option<f64>,
    ) -> Result<Self, AdapterError> {
        let class = class.into();
        if class.trim().is_empty() {
            return Err(AdapterError::Validation(
                "detection class must not be empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(AdapterError::Validation(format!(
                "confidence {confidence} for '{class}' is outside [0, 1]"
            )));
        }
        let area = area.unwrap_or_else(|| bbox.area());
        if !area.is_finite() || area < 0.0 {
            return Err(AdapterError::Validation(format!(
                "area {area} for '{class}' must be a non-negative number"
            )));
        }
        Ok(Self {
            class,
            confidence,
            bbox,
            area,
        })
    }
}

impl TryFrom<RawDetection> for Detection {
    type Error = AdapterError;

    fn try_from(raw: RawDetection) -> Result<Self, Self::Error> {
        Self::new(raw.class, raw.confidence, raw.bbox, raw.area)
    }
}

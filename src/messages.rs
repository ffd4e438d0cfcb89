use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    change::ChangeAnalysis,
    detection::Detection,
    error::AdapterError,
    model::{Epoch, ImageRef},
};

/// One analysis request as read from the input stream.
///
/// `coordinates` and `area` are opaque: they are echoed and rendered, never
/// interpreted. Image URLs are passed through as given; only string values
/// are used as image references.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InferenceRequest {
    #[serde(default)]
    pub coordinates: Option<Value>,
    #[serde(default)]
    pub area: Option<Value>,
    #[serde(default)]
    pub image_url: Option<Value>,
    #[serde(default)]
    pub historical_image_url: Option<Value>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput {
    pub coordinates: Value,
    pub area: Option<Value>,
    pub current_image: ImageRef,
    pub historical_image: ImageRef,
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

fn url_of(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(url)) => Some(url),
        _ => None,
    }
}

impl InferenceRequest {
    /// Parses a request, requiring the document to be a single JSON object.
    pub fn from_json(input: &str) -> Result<Self, AdapterError> {
        let value: Value = serde_json::from_str(input)?;
        if !value.is_object() {
            return Err(AdapterError::Validation(
                "request must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn validate(self) -> Result<AnalysisInput, AdapterError> {
        let coordinates = match self.coordinates {
            Some(value) if !is_empty_value(&value) => value,
            _ => return Err(AdapterError::missing_field("coordinates")),
        };
        Ok(AnalysisInput {
            coordinates,
            area: self.area,
            current_image: ImageRef::new(Epoch::Current, url_of(self.image_url)),
            historical_image: ImageRef::new(Epoch::Historical, url_of(self.historical_image_url)),
        })
    }
}

/// Successful analysis, written to the output stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    pub timestamp: DateTime<Utc>,
    pub coordinates: Value,
    pub area: Option<Value>,
    pub current_detections: Vec<Detection>,
    pub historical_detections: Vec<Detection>,
    pub change_analysis: ChangeAnalysis,
    pub environmental_summary: String,
    pub total_objects: usize,
    pub object_types: BTreeSet<String>,
    pub note: Option<String>,
}

/// Failure report, written to the error stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&AdapterError> for ErrorResult {
    fn from(err: &AdapterError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
            timestamp: Utc::now(),
        }
    }
}

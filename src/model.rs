use crate::{detection::Detection, error::AdapterError};

/// Which capture an image reference belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Epoch {
    /// The most recent capture of the area.
    Current,
    /// An earlier capture used as the baseline for change analysis.
    Historical,
}

impl Epoch {
    /// Returns the epoch as a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Epoch::Current => "current",
            Epoch::Historical => "historical",
        }
    }
}

/// Reference to the image a detector should run on.
///
/// The adapter never fetches or decodes the image itself; resolving `url`
/// is the detector's job.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRef {
    pub epoch: Epoch,
    pub url: Option<String>,
}

impl ImageRef {
    pub fn new(epoch: Epoch, url: Option<String>) -> Self {
        Self { epoch, url }
    }
}

/// Trait for implementing object detectors that can be used with the `AnalysisEngine`.
///
/// A detector is initialised once at startup and then only read, so `detect`
/// takes `&self`. Implementations that have no image for an epoch should
/// return an empty list rather than an error.
pub trait Detector {
    /// The error type that can be returned during detection.
    type Error: std::error::Error + Into<AdapterError>;

    /// Runs detection on the referenced image.
    fn detect(&self, image: &ImageRef) -> Result<Vec<Detection>, Self::Error>;

    /// Free-text note attached to every result produced with this detector.
    fn note(&self) -> Option<String> {
        None
    }
}

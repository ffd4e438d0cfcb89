use std::{
    collections::BTreeSet,
    time::{Duration, Instant},
};

use chrono::Utc;

use crate::{
    change::ChangeAnalysis,
    detection::Detection,
    error::AdapterError,
    messages::{AnalysisInput, InferenceRequest, InferenceResult},
    model::{Detector, ImageRef},
    summary::environmental_summary,
};

/// Result of one analysis together with timing telemetry.
pub struct AnalysisResponse {
    /// Timestamp when the analysis started.
    pub start_time: Instant,
    /// Total time taken, detection included.
    pub duration: Duration,
    /// The analysis result to report.
    pub result: InferenceResult,
}

/// Runs the analysis pipeline on top of a detector.
///
/// The engine owns the detector for the life of the process and only ever
/// borrows it immutably, so one engine can serve any number of requests.
pub struct AnalysisEngine<D: Detector> {
    detector: D,
}

impl<D: Detector> AnalysisEngine<D> {
    /// Creates a new engine around an initialised detector.
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Validates a raw request and analyzes it.
    pub fn process(&self, request: InferenceRequest) -> Result<AnalysisResponse, AdapterError> {
        let input = request.validate()?;
        self.analyze(input)
    }

    /// Detects objects in both captures, diffs them per class and builds the
    /// summary.
    pub fn analyze(&self, input: AnalysisInput) -> Result<AnalysisResponse, AdapterError> {
        let start_time = Instant::now();

        let current_detections = self.detect(&input.current_image)?;
        let historical_detections = self.detect(&input.historical_image)?;

        let change_analysis = ChangeAnalysis::compare(&current_detections, &historical_detections);
        let environmental_summary =
            environmental_summary(input.area.as_ref(), &input.coordinates, &current_detections);
        let object_types: BTreeSet<String> = current_detections
            .iter()
            .map(|d| d.class.clone())
            .collect();

        let result = InferenceResult {
            timestamp: Utc::now(),
            total_objects: current_detections.len(),
            coordinates: input.coordinates,
            area: input.area,
            current_detections,
            historical_detections,
            change_analysis,
            environmental_summary,
            object_types,
            note: self.detector.note(),
        };

        let duration = start_time.elapsed();
        log::info!(
            "Analysis completed: {} objects, change detected: {} ({:?})",
            result.total_objects,
            result.change_analysis.change_detected,
            duration
        );

        Ok(AnalysisResponse {
            start_time,
            duration,
            result,
        })
    }

    fn detect(&self, image: &ImageRef) -> Result<Vec<Detection>, AdapterError> {
        log::debug!(
            "Running detection on {} image ({})",
            image.epoch.as_str(),
            image.url.as_deref().unwrap_or("no url")
        );
        let start_time = Instant::now();
        let detections = self
            .detector
            .detect(image)
            .map_err(Into::<AdapterError>::into)?;
        log::debug!(
            "Detection completed: {} objects in {:?}",
            detections.len(),
            start_time.elapsed()
        );
        Ok(detections)
    }
}

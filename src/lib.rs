//! Single-shot object-detection request adapter.
//!
//! Reads one JSON request naming an area and its coordinates, runs a
//! [`Detector`] on the current and historical captures, diffs the detections
//! per object class and reports the result, together with a templated
//! environmental summary, as one JSON object.
//!
//! The detector is a pluggable capability: the adapter only depends on the
//! [`Detector`] trait, so the built-in [`MockDetector`], a [`FixtureDetector`]
//! or a real model can be swapped in without touching the pipeline.

pub mod adapter;
pub mod change;
pub mod detection;
pub mod engine;
pub mod error;
pub mod messages;
pub mod mock;
pub mod model;
pub mod summary;

pub use adapter::{EXIT_FAILURE, EXIT_SUCCESS, OutputOptions, report_error, run_once};
pub use change::{ChangeAnalysis, ChangeRecord};
pub use detection::{BoundingBox, Detection};
pub use engine::{AnalysisEngine, AnalysisResponse};
pub use error::AdapterError;
pub use messages::{ErrorResult, InferenceRequest, InferenceResult};
pub use mock::{FixtureDetector, MockDetector};
pub use model::{Detector, Epoch, ImageRef};

//! Rule evaluation core.
//!
//! This module contains:
//! - The finding record shared by every rule engine
//! - Face, gaze/pose and audio rule engines
//! - Aggregation of findings into an analyze response

pub mod analyze;
pub mod audio;
pub mod face;
pub mod finding;
pub mod gaze;

// Re-export commonly used types
pub use analyze::{analyze_audio, evaluate_frame, AnalyzeResponse, FrameAnalyzer, SuppliedGeometry};
pub use audio::evaluate_audio;
pub use face::{evaluate_faces, primary_face};
pub use finding::{EventType, Finding, FindingMeta};
pub use gaze::evaluate_gaze;

//! Finding aggregation and response packaging.
//!
//! Frame requests run the face rules then the gaze rules; audio requests run
//! the audio rules alone. Findings are concatenated in that order with no
//! deduplication, and the elapsed evaluation time is attached.

use crate::core::audio::evaluate_audio;
use crate::core::face::evaluate_faces;
use crate::core::finding::Finding;
use crate::core::gaze::evaluate_gaze;
use crate::detector::{DetectionAdapter, Detections, FaceBox, FaceLandmarks};
use crate::signal::{AudioSignal, Frame};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Findings for one request plus how long evaluation took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub findings: Vec<Finding>,
    /// Wall-clock evaluation time in milliseconds (diagnostic only)
    pub processing_ms: f64,
}

impl AnalyzeResponse {
    pub fn new(findings: Vec<Finding>, elapsed: Duration) -> Self {
        Self {
            findings,
            processing_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Face geometry a client already extracted for this frame.
///
/// Each field that is set replaces the corresponding detector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuppliedGeometry {
    pub faces: Option<Vec<FaceBox>>,
    pub landmarks: Option<FaceLandmarks>,
}

/// Concatenate face then gaze findings for one frame's detections.
///
/// Gaze rules describe the detected face, so a frame without faces yields
/// only the face findings.
pub fn evaluate_frame(
    detections: &Detections,
    frame_width: u32,
    frame_height: u32,
) -> Vec<Finding> {
    let mut findings = evaluate_faces(&detections.faces, frame_width, frame_height);
    if detections.faces.is_empty() {
        return findings;
    }

    let anchors = detections
        .landmarks
        .as_ref()
        .and_then(FaceLandmarks::anchors);
    findings.extend(evaluate_gaze(anchors.as_ref()));
    findings
}

/// Runs detection and the frame rule engines for decoded frames.
#[derive(Debug, Clone)]
pub struct FrameAnalyzer {
    adapter: DetectionAdapter,
}

impl FrameAnalyzer {
    pub fn new(adapter: DetectionAdapter) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &DetectionAdapter {
        &self.adapter
    }

    /// Detect and evaluate a frame.
    pub fn analyze(&self, frame: &Frame) -> AnalyzeResponse {
        self.analyze_with(frame, SuppliedGeometry::default())
    }

    /// Detect and evaluate a frame, preferring client-supplied geometry.
    pub fn analyze_with(&self, frame: &Frame, supplied: SuppliedGeometry) -> AnalyzeResponse {
        let start = Instant::now();

        let detections = match supplied {
            SuppliedGeometry {
                faces: None,
                landmarks: None,
            } => self.adapter.detect(frame),
            SuppliedGeometry { faces, landmarks } => {
                let faces = faces.unwrap_or_else(|| self.adapter.detect_faces(frame));
                let landmarks = if faces.is_empty() {
                    None
                } else {
                    landmarks.or_else(|| self.adapter.detect_landmarks(frame))
                };
                Detections { faces, landmarks }
            }
        };
        tracing::trace!(
            faces = detections.faces.len(),
            landmarks = detections.landmarks.is_some(),
            "Frame detections"
        );

        let findings = evaluate_frame(&detections, frame.width(), frame.height());
        AnalyzeResponse::new(findings, start.elapsed())
    }
}

/// Evaluate an audio summary.
pub fn analyze_audio(signal: &AudioSignal) -> AnalyzeResponse {
    let start = Instant::now();
    let findings = evaluate_audio(signal);
    AnalyzeResponse::new(findings, start.elapsed())
}

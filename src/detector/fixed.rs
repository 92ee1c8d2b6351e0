//! Detector that reports geometry supplied up front.
//!
//! Used when a client already ran detection on its side and sends the face
//! geometry along with the frame, and as a fake detector in tests.

use crate::detector::types::{FaceBox, FaceLandmarks};
use crate::detector::{FaceDetector, LandmarkDetector};
use crate::signal::Frame;

/// Returns the same boxes and landmarks for every frame.
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    faces: Vec<FaceBox>,
    landmarks: Option<FaceLandmarks>,
}

impl StaticDetector {
    pub fn new(faces: Vec<FaceBox>) -> Self {
        Self {
            faces,
            landmarks: None,
        }
    }

    pub fn with_landmarks(mut self, landmarks: FaceLandmarks) -> Self {
        self.landmarks = Some(landmarks);
        self
    }
}

impl FaceDetector for StaticDetector {
    fn name(&self) -> &'static str {
        "static"
    }

    fn detect_faces(&self, _frame: &Frame) -> Vec<FaceBox> {
        self.faces.clone()
    }
}

impl LandmarkDetector for StaticDetector {
    fn name(&self) -> &'static str {
        "static"
    }

    fn detect_landmarks(&self, _frame: &Frame) -> Option<FaceLandmarks> {
        self.landmarks.clone()
    }
}

//! Detection adapter boundary.
//!
//! The rule engines never run detection themselves. A [`FaceDetector`] turns a
//! frame into face boxes and an optional [`LandmarkDetector`] turns it into a
//! face mesh. Both are constructed once and injected into the analyzer.

pub mod fixed;
pub mod skin;
pub mod types;

use crate::signal::Frame;
use std::sync::Arc;

pub use fixed::StaticDetector;
pub use skin::SkinRegionDetector;
pub use types::{
    Detections, FaceBox, FaceError, FaceLandmarks, GazeAnchors, LandmarkError, Point2,
    LEFT_EYE_OUTER, NOSE_TIP, RIGHT_EYE_OUTER,
};

/// Finds face bounding boxes in a frame.
///
/// Implementations must be deterministic for a given frame and safe to share
/// across concurrent requests.
pub trait FaceDetector: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Face boxes in detector order.
    fn detect_faces(&self, frame: &Frame) -> Vec<FaceBox>;
}

/// Extracts a face mesh for the first face in a frame.
pub trait LandmarkDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Landmarks of one face, or `None` when no face was found.
    fn detect_landmarks(&self, frame: &Frame) -> Option<FaceLandmarks>;
}

/// Whether a landmark detector could be constructed for this process.
#[derive(Clone)]
pub enum LandmarkCapability {
    Available(Arc<dyn LandmarkDetector>),
    Unavailable,
}

impl LandmarkCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, LandmarkCapability::Available(_))
    }

    /// Run the detector if there is one.
    pub fn detect(&self, frame: &Frame) -> Option<FaceLandmarks> {
        match self {
            LandmarkCapability::Available(detector) => detector.detect_landmarks(frame),
            LandmarkCapability::Unavailable => None,
        }
    }
}

impl std::fmt::Debug for LandmarkCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandmarkCapability::Available(detector) => {
                write!(f, "Available({})", detector.name())
            }
            LandmarkCapability::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// Face detector plus optional landmark detector, run together per frame.
#[derive(Clone)]
pub struct DetectionAdapter {
    faces: Arc<dyn FaceDetector>,
    landmarks: LandmarkCapability,
}

impl DetectionAdapter {
    pub fn new(faces: Arc<dyn FaceDetector>, landmarks: LandmarkCapability) -> Self {
        Self { faces, landmarks }
    }

    pub fn face_detector_name(&self) -> &'static str {
        self.faces.name()
    }

    pub fn landmarks(&self) -> &LandmarkCapability {
        &self.landmarks
    }

    pub fn detect_faces(&self, frame: &Frame) -> Vec<FaceBox> {
        self.faces.detect_faces(frame)
    }

    pub fn detect_landmarks(&self, frame: &Frame) -> Option<FaceLandmarks> {
        self.landmarks.detect(frame)
    }

    /// Run both detectors over `frame`. Landmarks are skipped when no face is found.
    pub fn detect(&self, frame: &Frame) -> Detections {
        let faces = self.detect_faces(frame);
        let landmarks = if faces.is_empty() {
            None
        } else {
            self.detect_landmarks(frame)
        };
        Detections { faces, landmarks }
    }
}

impl std::fmt::Debug for DetectionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionAdapter")
            .field("faces", &self.faces.name())
            .field("landmarks", &self.landmarks)
            .finish()
    }
}

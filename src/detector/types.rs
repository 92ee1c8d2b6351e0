//! Geometric primitives produced by detectors.
//!
//! Rule engines depend on these shapes only, never on a concrete detector.

use serde::{Deserialize, Serialize};

/// Axis-aligned face bounding box in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Horizontal center in pixels.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Check that every coordinate is finite and the size is not negative.
    pub fn validate(&self) -> Result<(), FaceError> {
        let coords = [self.x, self.y, self.width, self.height];
        if coords.iter().any(|v| !v.is_finite()) {
            return Err(FaceError::NonFinite);
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(FaceError::NegativeSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Errors for face boxes supplied from outside the process.
#[derive(Debug, PartialEq)]
pub enum FaceError {
    NonFinite,
    NegativeSize { width: f64, height: f64 },
}

impl std::fmt::Display for FaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaceError::NonFinite => write!(f, "face box coordinates must be finite"),
            FaceError::NegativeSize { width, height } => {
                write!(f, "face box size must not be negative, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for FaceError {}

/// A 2D landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Mesh index of the left eye outer corner.
pub const LEFT_EYE_OUTER: usize = 33;
/// Mesh index of the right eye outer corner.
pub const RIGHT_EYE_OUTER: usize = 263;
/// Mesh index of the nose tip.
pub const NOSE_TIP: usize = 1;

/// Landmarks for a single face, indexed like a 468-point face mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    pub points: Vec<Point2>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// The three points the gaze rules read, if the mesh covers them.
    pub fn anchors(&self) -> Option<GazeAnchors> {
        Some(GazeAnchors {
            left_eye: *self.points.get(LEFT_EYE_OUTER)?,
            right_eye: *self.points.get(RIGHT_EYE_OUTER)?,
            nose_tip: *self.points.get(NOSE_TIP)?,
        })
    }

    /// Check that the mesh covers every anchor index.
    pub fn validate(&self) -> Result<(), LandmarkError> {
        match self.anchors() {
            Some(_) => Ok(()),
            None => Err(LandmarkError::MissingAnchors {
                points: self.points.len(),
            }),
        }
    }
}

/// Errors for landmark sets supplied from outside the process.
#[derive(Debug)]
pub enum LandmarkError {
    /// The mesh is too short to contain the eye and nose anchors
    MissingAnchors { points: usize },
}

impl std::fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandmarkError::MissingAnchors { points } => write!(
                f,
                "expected at least {} landmark points, got {points}",
                RIGHT_EYE_OUTER + 1
            ),
        }
    }
}

impl std::error::Error for LandmarkError {}

/// Eye corners and nose tip of one face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GazeAnchors {
    pub left_eye: Point2,
    pub right_eye: Point2,
    pub nose_tip: Point2,
}

/// Everything the detection stage found in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    /// Face boxes in detector order
    pub faces: Vec<FaceBox>,
    /// Landmarks of the first detected face, when a landmark detector ran
    pub landmarks: Option<FaceLandmarks>,
}

//! Face presence, position and distance rules.

use crate::core::finding::{EventType, Finding};
use crate::detector::FaceBox;

/// Left edge of the centered band, as a fraction of frame width.
const CENTER_BAND_MIN: f64 = 0.25;

/// Right edge of the centered band, as a fraction of frame width.
const CENTER_BAND_MAX: f64 = 0.75;

/// Minimum share of the frame the primary face must cover.
const MIN_FACE_AREA_RATIO: f64 = 0.06;

/// Evaluate face rules for the boxes found in a `frame_width` x `frame_height` frame.
///
/// Frame dimensions must be non-zero, which a decoded frame guarantees.
pub fn evaluate_faces(faces: &[FaceBox], frame_width: u32, frame_height: u32) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Some(primary) = primary_face(faces) else {
        findings.push(Finding::new(EventType::NoFace, 0.9).with_meta("faceCount", 0));
        return findings;
    };

    if faces.len() > 1 {
        findings.push(
            Finding::new(EventType::MultipleFaces, 0.95).with_meta("faceCount", faces.len()),
        );
    }

    let width = f64::from(frame_width);
    let height = f64::from(frame_height);

    let center_x = primary.center_x();
    if center_x < width * CENTER_BAND_MIN || center_x > width * CENTER_BAND_MAX {
        findings.push(
            Finding::new(EventType::HeadPoseOffCenter, 0.72)
                .with_meta("faceCenterX", center_x)
                .with_meta("frameWidth", frame_width),
        );
    }

    let face_area_ratio = primary.area() / (width * height);
    if face_area_ratio < MIN_FACE_AREA_RATIO {
        findings.push(
            Finding::new(EventType::FaceTooFar, 0.68).with_meta("faceAreaRatio", face_area_ratio),
        );
    }

    findings
}

/// Largest-area box; the first one wins on equal area.
pub fn primary_face(faces: &[FaceBox]) -> Option<&FaceBox> {
    faces.iter().fold(None, |best: Option<&FaceBox>, face| match best {
        Some(current) if face.area() <= current.area() => Some(current),
        _ => Some(face),
    })
}

//! Gaze and head pitch rules over facial landmarks.
//!
//! The nose ratio measures where the nose tip sits between the two outer eye
//! corners: near 0.5 the head faces forward, far from it the head is turned.
//! Pitch compares the nose tip against the eye line; looking down moves the
//! nose much further from the eyes than looking up, hence the asymmetric
//! thresholds.

use crate::core::finding::{EventType, Finding};
use crate::detector::GazeAnchors;

/// Floor for the eye span so coincident eyes don't divide by zero.
const MIN_EYE_SPAN: f64 = 1e-6;

/// Accepted nose ratio range (inclusive).
const NOSE_RATIO_MIN: f64 = 0.35;
const NOSE_RATIO_MAX: f64 = 0.65;

/// Nose above the eye line by more than this is pitch up.
const PITCH_UP_DELTA: f64 = -0.02;

/// Nose below the eye line by more than this is pitch down.
const PITCH_DOWN_DELTA: f64 = 0.15;

/// Evaluate gaze and pitch rules. Missing landmarks yield no findings.
pub fn evaluate_gaze(anchors: Option<&GazeAnchors>) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Some(anchors) = anchors else {
        return findings;
    };

    let nose_ratio = nose_ratio(anchors);
    if !(NOSE_RATIO_MIN..=NOSE_RATIO_MAX).contains(&nose_ratio) {
        findings.push(
            Finding::new(EventType::LookingAway, 0.74).with_meta("noseRatio", nose_ratio),
        );
    }

    let pitch_delta = pitch_delta(anchors);
    if pitch_delta < PITCH_UP_DELTA {
        findings.push(
            Finding::new(EventType::HeadPitchUp, 0.61).with_meta("pitchDelta", pitch_delta),
        );
    } else if pitch_delta > PITCH_DOWN_DELTA {
        findings.push(
            Finding::new(EventType::HeadPitchDown, 0.61).with_meta("pitchDelta", pitch_delta),
        );
    }

    findings
}

/// Horizontal position of the nose between the eyes.
pub fn nose_ratio(anchors: &GazeAnchors) -> f64 {
    let span = (anchors.right_eye.x - anchors.left_eye.x).max(MIN_EYE_SPAN);
    (anchors.nose_tip.x - anchors.left_eye.x) / span
}

/// Vertical offset of the nose tip from the eye line.
pub fn pitch_delta(anchors: &GazeAnchors) -> f64 {
    let eye_line_y = (anchors.left_eye.y + anchors.right_eye.y) / 2.0;
    anchors.nose_tip.y - eye_line_y
}

//! Rule engine behavior through the public API

use proctoring_engine::detector::{LEFT_EYE_OUTER, NOSE_TIP, RIGHT_EYE_OUTER};
use proctoring_engine::{
    analyze_audio, evaluate_audio, evaluate_faces, evaluate_frame, evaluate_gaze, AudioSignal,
    Detections, EventType, FaceBox, FaceLandmarks, Finding, GazeAnchors, Point2,
};

const WIDTH: u32 = 400;
const HEIGHT: u32 = 250;

fn event_types(findings: &[Finding]) -> Vec<EventType> {
    findings.iter().map(|f| f.event_type).collect()
}

/// A box centered horizontally whose area is `ratio` of the frame.
fn centered_face(ratio: f64) -> FaceBox {
    let side = (ratio * f64::from(WIDTH * HEIGHT)).sqrt();
    FaceBox::new((f64::from(WIDTH) - side) / 2.0, 10.0, side, side)
}

fn anchors_with_nose_ratio(ratio: f64) -> GazeAnchors {
    GazeAnchors {
        left_eye: Point2::new(0.0, 0.4),
        right_eye: Point2::new(1.0, 0.4),
        nose_tip: Point2::new(ratio, 0.45),
    }
}

#[test]
fn test_zero_faces_is_exactly_no_face() {
    let detections = Detections::default();
    let findings = evaluate_frame(&detections, WIDTH, HEIGHT);
    assert_eq!(event_types(&findings), vec![EventType::NoFace]);
}

#[test]
fn test_zero_faces_ignores_landmarks() {
    let mut points = vec![Point2::new(0.5, 0.5); 468];
    points[LEFT_EYE_OUTER] = Point2::new(0.4, 0.4);
    points[RIGHT_EYE_OUTER] = Point2::new(0.6, 0.4);
    points[NOSE_TIP] = Point2::new(0.58, 0.6);
    let detections = Detections {
        faces: vec![],
        landmarks: Some(FaceLandmarks::new(points)),
    };

    let findings = evaluate_frame(&detections, WIDTH, HEIGHT);
    assert_eq!(event_types(&findings), vec![EventType::NoFace]);
}

#[test]
fn test_two_centered_faces_scenario() {
    let faces = [centered_face(0.10), centered_face(0.02)];
    let findings = evaluate_faces(&faces, WIDTH, HEIGHT);
    assert_eq!(event_types(&findings), vec![EventType::MultipleFaces]);
    assert_eq!(findings[0].severity, 9);
    assert_eq!(findings[0].confidence, 0.95);
}

#[test]
fn test_multiple_faces_rules_use_largest_box() {
    // The small first box is off-center and tiny; the larger second one is fine
    let faces = [FaceBox::new(0.0, 0.0, 5.0, 5.0), centered_face(0.2)];
    let findings = evaluate_faces(&faces, WIDTH, HEIGHT);
    assert_eq!(event_types(&findings), vec![EventType::MultipleFaces]);
}

#[test]
fn test_face_area_ratio_is_monotonic() {
    for ratio in [0.2, 0.1, 0.07, 0.0601] {
        let findings = evaluate_faces(&[centered_face(ratio)], WIDTH, HEIGHT);
        assert!(findings.is_empty(), "ratio {ratio} should not fire");
    }
    for ratio in [0.0599, 0.05, 0.01, 0.0] {
        let findings = evaluate_faces(&[centered_face(ratio)], WIDTH, HEIGHT);
        assert_eq!(
            event_types(&findings),
            vec![EventType::FaceTooFar],
            "ratio {ratio} should fire"
        );
    }
}

#[test]
fn test_nose_ratio_symmetry() {
    for ratio in [0.34, 0.66] {
        let findings = evaluate_gaze(Some(&anchors_with_nose_ratio(ratio)));
        assert_eq!(event_types(&findings), vec![EventType::LookingAway]);
    }
    for ratio in [0.35, 0.5, 0.65] {
        assert!(evaluate_gaze(Some(&anchors_with_nose_ratio(ratio))).is_empty());
    }
}

#[test]
fn test_background_speech_confidence() {
    assert!(evaluate_audio(&AudioSignal {
        audio_level: 0.72,
        ..AudioSignal::default()
    })
    .is_empty());

    for level in [0.7200001, 0.8, 0.95, 0.96, 2.0] {
        let findings = evaluate_audio(&AudioSignal {
            audio_level: level,
            ..AudioSignal::default()
        });
        assert_eq!(event_types(&findings), vec![EventType::BackgroundSpeech]);
        assert_eq!(findings[0].confidence, level.min(0.95));
    }
}

#[test]
fn test_audio_scenario_order() {
    let response = analyze_audio(&AudioSignal {
        audio_level: 0.9,
        voice_count: Some(2),
        mobile_sound_detected: true,
    });
    assert_eq!(
        event_types(&response.findings),
        vec![
            EventType::MultipleVoices,
            EventType::MobileSound,
            EventType::BackgroundSpeech
        ]
    );
    assert_eq!(response.findings[2].confidence, 0.9);
}

#[test]
fn test_evaluation_is_idempotent() {
    let faces = [FaceBox::new(0.0, 0.0, 30.0, 30.0), FaceBox::new(300.0, 0.0, 30.0, 30.0)];
    let first = serde_json::to_string(&evaluate_faces(&faces, WIDTH, HEIGHT)).unwrap();
    let second = serde_json::to_string(&evaluate_faces(&faces, WIDTH, HEIGHT)).unwrap();
    assert_eq!(first, second);

    let anchors = anchors_with_nose_ratio(0.8);
    let first = serde_json::to_string(&evaluate_gaze(Some(&anchors))).unwrap();
    let second = serde_json::to_string(&evaluate_gaze(Some(&anchors))).unwrap();
    assert_eq!(first, second);

    let signal = AudioSignal {
        audio_level: 0.81,
        voice_count: Some(3),
        mobile_sound_detected: false,
    };
    let first = serde_json::to_string(&evaluate_audio(&signal)).unwrap();
    let second = serde_json::to_string(&evaluate_audio(&signal)).unwrap();
    assert_eq!(first, second);
}

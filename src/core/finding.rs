//! The finding record shared by every rule engine.
//!
//! A finding describes one triggered risk condition. Severity is a fixed
//! property of the event type; confidence is chosen by the rule that fires.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Supporting measurements attached to a finding.
pub type FindingMeta = Map<String, Value>;

/// Risk conditions the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// No face in the frame
    NoFace,
    /// More than one face in the frame
    MultipleFaces,
    /// Primary face outside the middle half of the frame
    HeadPoseOffCenter,
    /// Primary face occupies too little of the frame
    FaceTooFar,
    /// Nose is not centered between the eyes
    LookingAway,
    /// Nose above the eye line
    HeadPitchUp,
    /// Nose far below the eye line
    HeadPitchDown,
    /// More than one voice in the audio sample
    MultipleVoices,
    /// Upstream flagged a mobile device sound
    MobileSound,
    /// Audio level high enough to suggest speech in the room
    BackgroundSpeech,
}

impl EventType {
    /// Fixed severity weight for this event type.
    pub fn severity(self) -> u8 {
        match self {
            EventType::NoFace => 7,
            EventType::MultipleFaces => 9,
            EventType::HeadPoseOffCenter => 4,
            EventType::FaceTooFar => 3,
            EventType::LookingAway => 5,
            EventType::HeadPitchUp => 3,
            EventType::HeadPitchDown => 3,
            EventType::MultipleVoices => 8,
            EventType::MobileSound => 6,
            EventType::BackgroundSpeech => 5,
        }
    }

    /// Wire identifier, e.g. `NO_FACE`.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::NoFace => "NO_FACE",
            EventType::MultipleFaces => "MULTIPLE_FACES",
            EventType::HeadPoseOffCenter => "HEAD_POSE_OFF_CENTER",
            EventType::FaceTooFar => "FACE_TOO_FAR",
            EventType::LookingAway => "LOOKING_AWAY",
            EventType::HeadPitchUp => "HEAD_PITCH_UP",
            EventType::HeadPitchDown => "HEAD_PITCH_DOWN",
            EventType::MultipleVoices => "MULTIPLE_VOICES",
            EventType::MobileSound => "MOBILE_SOUND",
            EventType::BackgroundSpeech => "BACKGROUND_SPEECH",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected risk condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub event_type: EventType,
    pub severity: u8,
    /// Rule certainty in [0, 1]
    pub confidence: f64,
    #[serde(default)]
    pub meta: FindingMeta,
}

impl Finding {
    /// Create a finding with the event type's fixed severity and no meta.
    pub fn new(event_type: EventType, confidence: f64) -> Self {
        Self {
            event_type,
            severity: event_type.severity(),
            confidence,
            meta: FindingMeta::new(),
        }
    }

    /// Attach a measurement under `key`.
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }
}

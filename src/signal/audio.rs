//! Structured audio summary produced upstream.

use serde::{Deserialize, Serialize};

/// Audio measurements for one sample window.
///
/// The level is expected in [0, 1] but is not clamped; the rules read it as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSignal {
    #[serde(default)]
    pub audio_level: f64,
    #[serde(default)]
    pub voice_count: Option<u32>,
    #[serde(default)]
    pub mobile_sound_detected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let signal: AudioSignal = serde_json::from_str("{}").unwrap();
        assert_eq!(signal, AudioSignal::default());
        assert_eq!(signal.audio_level, 0.0);
        assert!(signal.voice_count.is_none());
        assert!(!signal.mobile_sound_detected);
    }

    #[test]
    fn test_camel_case_fields() {
        let signal: AudioSignal = serde_json::from_str(
            r#"{"audioLevel": 0.5, "voiceCount": 3, "mobileSoundDetected": true}"#,
        )
        .unwrap();
        assert_eq!(signal.audio_level, 0.5);
        assert_eq!(signal.voice_count, Some(3));
        assert!(signal.mobile_sound_detected);
    }

    #[test]
    fn test_negative_voice_count_rejected() {
        let result = serde_json::from_str::<AudioSignal>(r#"{"voiceCount": -1}"#);
        assert!(result.is_err());
    }
}

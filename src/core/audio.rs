//! Audio rules over an upstream-extracted audio summary.

use crate::core::finding::{EventType, Finding};
use crate::signal::AudioSignal;

/// Audio level above which background speech is reported.
const BACKGROUND_SPEECH_LEVEL: f64 = 0.72;

/// Cap on the signal-scaled background speech confidence.
const MAX_SPEECH_CONFIDENCE: f64 = 0.95;

/// Evaluate every audio rule; none of them short-circuits.
pub fn evaluate_audio(signal: &AudioSignal) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Some(voice_count) = signal.voice_count.filter(|&count| count > 1) {
        findings.push(
            Finding::new(EventType::MultipleVoices, 0.88).with_meta("voiceCount", voice_count),
        );
    }

    if signal.mobile_sound_detected {
        findings.push(Finding::new(EventType::MobileSound, 0.78));
    }

    if signal.audio_level > BACKGROUND_SPEECH_LEVEL {
        // Confidence tracks signal strength instead of a fixed constant
        let confidence = signal.audio_level.min(MAX_SPEECH_CONFIDENCE);
        findings.push(
            Finding::new(EventType::BackgroundSpeech, confidence)
                .with_meta("audioLevel", signal.audio_level),
        );
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(level: f64, voices: Option<u32>, mobile: bool) -> AudioSignal {
        AudioSignal {
            audio_level: level,
            voice_count: voices,
            mobile_sound_detected: mobile,
        }
    }

    #[test]
    fn test_quiet_room() {
        assert!(evaluate_audio(&AudioSignal::default()).is_empty());
        assert!(evaluate_audio(&signal(0.2, Some(1), false)).is_empty());
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let findings = evaluate_audio(&signal(0.9, Some(2), true));
        let types: Vec<_> = findings.iter().map(|f| f.event_type).collect();
        assert_eq!(
            types,
            vec![
                EventType::MultipleVoices,
                EventType::MobileSound,
                EventType::BackgroundSpeech
            ]
        );
        assert_eq!(findings[0].meta["voiceCount"], 2);
        assert!(findings[1].meta.is_empty());
        assert_eq!(findings[2].confidence, 0.9);
        assert_eq!(findings[2].meta["audioLevel"], 0.9);
    }

    #[test]
    fn test_background_speech_threshold_is_strict() {
        assert!(evaluate_audio(&signal(0.72, None, false)).is_empty());
        assert_eq!(evaluate_audio(&signal(0.73, None, false)).len(), 1);
    }

    #[test]
    fn test_background_speech_confidence_is_capped() {
        for level in [0.8, 0.95, 0.99, 1.4] {
            let findings = evaluate_audio(&signal(level, None, false));
            assert_eq!(findings[0].confidence, level.min(0.95));
        }
    }

    #[test]
    fn test_single_or_zero_voices() {
        assert!(evaluate_audio(&signal(0.0, Some(0), false)).is_empty());
        assert!(evaluate_audio(&signal(0.0, Some(1), false)).is_empty());
    }
}

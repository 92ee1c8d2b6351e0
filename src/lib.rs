//! Proctoring Engine - rule evaluation for monitored session signals.
//!
//! This library turns per-modality signals captured during a proctored
//! session into structured risk findings: severity- and confidence-scored
//! events such as an empty seat, a second person in frame, a turned head, or
//! voices in the background.
//!
//! # Guarantees
//!
//! - **Stateless**: every evaluation is single-frame or single-sample, nothing
//!   is carried between requests
//! - **Deterministic**: the same signal always yields the same findings
//! - **Detector-agnostic**: rules read face boxes and landmark points only,
//!   never a specific detector
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Proctoring Engine                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌──────────────────┐    │
//! │  │   Signal    │──▶│  Detection  │──▶│ Face + Gaze rules│──┐ │
//! │  │ (decode)    │   │  Adapter    │   └──────────────────┘  │ │
//! │  └─────────────┘   └─────────────┘   ┌──────────────────┐  │ │
//! │  audio summary ─────────────────────▶│   Audio rules    │──┤ │
//! │                                      └──────────────────┘  ▼ │
//! │                                          ┌──────────────────┐│
//! │                                          │ AnalyzeResponse  ││
//! │                                          └──────────────────┘│
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use proctoring_engine::{analyze_audio, AudioSignal, EventType};
//!
//! let signal = AudioSignal {
//!     audio_level: 0.9,
//!     voice_count: Some(2),
//!     mobile_sound_detected: false,
//! };
//!
//! let response = analyze_audio(&signal);
//! assert_eq!(response.findings[0].event_type, EventType::MultipleVoices);
//! ```

pub mod config;
pub mod core;
pub mod detector;
pub mod signal;

#[cfg(feature = "server")]
pub mod server;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, DetectorConfig};
pub use core::{
    analyze_audio, evaluate_audio, evaluate_faces, evaluate_frame, evaluate_gaze, AnalyzeResponse,
    EventType, Finding, FindingMeta, FrameAnalyzer, SuppliedGeometry,
};
pub use detector::{
    DetectionAdapter, Detections, FaceBox, FaceDetector, FaceError, FaceLandmarks, GazeAnchors,
    LandmarkCapability, LandmarkDetector, Point2, SkinRegionDetector, StaticDetector,
};
pub use signal::{decode_frame, AudioSignal, Frame, FrameError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

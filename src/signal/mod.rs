//! Signal normalization.
//!
//! Turns transport payloads into the primitive forms the rule engines read:
//! decoded frames for the video modality and structured audio summaries.

pub mod audio;
pub mod frame;

pub use audio::AudioSignal;
pub use frame::{decode_frame, decode_image_bytes, strip_data_url, Frame, FrameError};

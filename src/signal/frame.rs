//! Frame decoding from base64 transport payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::RgbImage;

/// A decoded RGB video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Errors that can occur while decoding a frame payload.
#[derive(Debug)]
pub enum FrameError {
    /// Nothing left to decode after stripping the data-URL prefix
    EmptyPayload,
    /// Payload is not valid base64
    Encoding(String),
    /// Decoded bytes are not a readable image
    Image(String),
    /// Image decoded but has no pixels
    EmptyImage,
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::EmptyPayload => write!(f, "frame payload is empty"),
            FrameError::Encoding(e) => write!(f, "invalid base64: {e}"),
            FrameError::Image(e) => write!(f, "invalid image: {e}"),
            FrameError::EmptyImage => write!(f, "image has zero width or height"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Drop a `data:<mime>;base64,` style prefix, splitting at the first comma.
pub fn strip_data_url(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    }
}

/// Decode a base64 (optionally data-URL prefixed) image into a frame.
pub fn decode_frame(payload: &str) -> Result<Frame, FrameError> {
    let data = strip_data_url(payload).trim();
    if data.is_empty() {
        return Err(FrameError::EmptyPayload);
    }

    let bytes = STANDARD
        .decode(data)
        .map_err(|e| FrameError::Encoding(e.to_string()))?;
    decode_image_bytes(&bytes)
}

/// Decode raw encoded image bytes (PNG, JPEG, ...) into a frame.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<Frame, FrameError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| FrameError::Image(e.to_string()))?
        .to_rgb8();

    if image.width() == 0 || image.height() == 0 {
        return Err(FrameError::EmptyImage);
    }

    Ok(Frame::new(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn png_base64(width: u32, height: u32) -> String {
        let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url("AAAA"), "AAAA");
        assert_eq!(strip_data_url("a,b,c"), "b,c");
    }

    #[test]
    fn test_decode_plain_and_data_url() {
        let encoded = png_base64(8, 6);

        let frame = decode_frame(&encoded).unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 6));

        let frame = decode_frame(&format!("data:image/png;base64,{encoded}")).unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 6));
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            decode_frame("not base64 !!"),
            Err(FrameError::Encoding(_))
        ));
    }

    #[test]
    fn test_valid_base64_but_not_an_image() {
        let encoded = STANDARD.encode(b"hello world");
        assert!(matches!(decode_frame(&encoded), Err(FrameError::Image(_))));
    }

    #[test]
    fn test_empty_payload() {
        assert!(matches!(decode_frame(""), Err(FrameError::EmptyPayload)));
        assert!(matches!(
            decode_frame("data:image/png;base64,"),
            Err(FrameError::EmptyPayload)
        ));
    }
}

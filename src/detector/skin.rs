//! Skin-region face detector.
//!
//! A classical fallback for when no face model is deployed. Pixels are
//! classified as skin in YCbCr space, pooled into square cells, and connected
//! groups of skin cells that are roughly face-shaped become face boxes.
//! Output order is the row-major position of each region's first cell, so the
//! same frame always yields the same boxes in the same order.

use crate::config::DetectorConfig;
use crate::detector::types::FaceBox;
use crate::detector::FaceDetector;
use crate::signal::Frame;
use image::Rgb;

/// Chroma bounds for skin tones.
const CB_RANGE: (f64, f64) = (77.0, 127.0);
const CR_RANGE: (f64, f64) = (133.0, 173.0);

/// Accepted width/height ratio of a face region.
const MIN_ASPECT: f64 = 0.5;
const MAX_ASPECT: f64 = 1.5;

/// Heuristic face detector over skin-toned regions.
#[derive(Debug, Clone)]
pub struct SkinRegionDetector {
    config: DetectorConfig,
}

/// A connected group of skin cells, in cell coordinates.
#[derive(Debug, Clone, Copy)]
struct Region {
    min_col: u32,
    min_row: u32,
    max_col: u32,
    max_row: u32,
    cells: u32,
}

impl SkinRegionDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let cell_size = config.cell_size.max(1);
        Self {
            config: DetectorConfig {
                cell_size,
                ..config
            },
        }
    }

    /// Mark each cell whose skin pixel share reaches the configured ratio.
    fn skin_cells(&self, frame: &Frame, cols: u32, rows: u32) -> Vec<bool> {
        let cell = self.config.cell_size;
        let image = frame.image();
        let mut grid = vec![false; (cols * rows) as usize];

        for row in 0..rows {
            for col in 0..cols {
                let x0 = col * cell;
                let y0 = row * cell;
                let x1 = (x0 + cell).min(frame.width());
                let y1 = (y0 + cell).min(frame.height());

                let mut skin = 0u32;
                for y in y0..y1 {
                    for x in x0..x1 {
                        if is_skin(image.get_pixel(x, y)) {
                            skin += 1;
                        }
                    }
                }

                let total = (x1 - x0) * (y1 - y0);
                grid[(row * cols + col) as usize] =
                    f64::from(skin) >= f64::from(total) * self.config.cell_skin_ratio;
            }
        }

        grid
    }

    fn to_face_box(&self, region: &Region, frame: &Frame) -> FaceBox {
        let cell = self.config.cell_size;
        let x = region.min_col * cell;
        let y = region.min_row * cell;
        let right = ((region.max_col + 1) * cell).min(frame.width());
        let bottom = ((region.max_row + 1) * cell).min(frame.height());
        FaceBox::new(
            f64::from(x),
            f64::from(y),
            f64::from(right - x),
            f64::from(bottom - y),
        )
    }

    fn is_face_shaped(&self, region: &Region, face: &FaceBox) -> bool {
        let min_side = f64::from(self.config.min_face_size);
        if face.width < min_side || face.height < min_side {
            return false;
        }

        let aspect = face.width / face.height;
        if !(MIN_ASPECT..=MAX_ASPECT).contains(&aspect) {
            return false;
        }

        let box_cells =
            (region.max_col - region.min_col + 1) * (region.max_row - region.min_row + 1);
        f64::from(region.cells) >= f64::from(box_cells) * self.config.min_fill_ratio
    }
}

impl FaceDetector for SkinRegionDetector {
    fn name(&self) -> &'static str {
        "skin-region"
    }

    fn detect_faces(&self, frame: &Frame) -> Vec<FaceBox> {
        let cell = self.config.cell_size;
        let cols = frame.width().div_ceil(cell);
        let rows = frame.height().div_ceil(cell);

        let grid = self.skin_cells(frame, cols, rows);
        connected_regions(&grid, cols, rows)
            .iter()
            .filter_map(|region| {
                let face = self.to_face_box(region, frame);
                self.is_face_shaped(region, &face).then_some(face)
            })
            .collect()
    }
}

/// Skin test on the YCbCr chroma channels.
fn is_skin(pixel: &Rgb<u8>) -> bool {
    let [r, g, b] = pixel.0.map(f64::from);
    let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    (CB_RANGE.0..=CB_RANGE.1).contains(&cb) && (CR_RANGE.0..=CR_RANGE.1).contains(&cr)
}

/// 4-connected labelling of set cells, seeded in row-major order.
fn connected_regions(grid: &[bool], cols: u32, rows: u32) -> Vec<Region> {
    let mut visited = vec![false; grid.len()];
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for start in 0..grid.len() {
        if !grid[start] || visited[start] {
            continue;
        }

        let (col, row) = (start as u32 % cols, start as u32 / cols);
        let mut region = Region {
            min_col: col,
            min_row: row,
            max_col: col,
            max_row: row,
            cells: 0,
        };

        visited[start] = true;
        stack.push((col, row));

        while let Some((col, row)) = stack.pop() {
            region.cells += 1;
            region.min_col = region.min_col.min(col);
            region.min_row = region.min_row.min(row);
            region.max_col = region.max_col.max(col);
            region.max_row = region.max_row.max(row);

            let neighbours = [
                (col.checked_sub(1), Some(row)),
                (Some(col + 1).filter(|&c| c < cols), Some(row)),
                (Some(col), row.checked_sub(1)),
                (Some(col), Some(row + 1).filter(|&r| r < rows)),
            ];
            for (c, r) in neighbours {
                let (Some(c), Some(r)) = (c, r) else {
                    continue;
                };
                let index = (r * cols + c) as usize;
                if grid[index] && !visited[index] {
                    visited[index] = true;
                    stack.push((c, r));
                }
            }
        }

        regions.push(region);
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    const SKIN: Rgb<u8> = Rgb([224, 172, 138]);
    const WALL: Rgb<u8> = Rgb([40, 60, 120]);

    fn frame_with_patches(width: u32, height: u32, patches: &[(u32, u32, u32, u32)]) -> Frame {
        let mut image = RgbImage::from_pixel(width, height, WALL);
        for &(x, y, w, h) in patches {
            for py in y..y + h {
                for px in x..x + w {
                    image.put_pixel(px, py, SKIN);
                }
            }
        }
        Frame::new(image)
    }

    #[test]
    fn test_skin_classifier() {
        assert!(is_skin(&SKIN));
        assert!(!is_skin(&WALL));
        assert!(!is_skin(&Rgb([255, 255, 255])));
    }

    #[test]
    fn test_empty_scene() {
        let detector = SkinRegionDetector::new(DetectorConfig::default());
        let frame = frame_with_patches(320, 240, &[]);
        assert!(detector.detect_faces(&frame).is_empty());
    }

    #[test]
    fn test_single_face_region() {
        let detector = SkinRegionDetector::new(DetectorConfig::default());
        let frame = frame_with_patches(320, 240, &[(96, 48, 96, 112)]);
        let faces = detector.detect_faces(&frame);
        assert_eq!(faces, vec![FaceBox::new(96.0, 48.0, 96.0, 112.0)]);
    }

    #[test]
    fn test_small_regions_ignored() {
        let detector = SkinRegionDetector::new(DetectorConfig::default());
        let frame = frame_with_patches(320, 240, &[(16, 16, 40, 40)]);
        assert!(detector.detect_faces(&frame).is_empty());
    }

    #[test]
    fn test_elongated_regions_ignored() {
        let detector = SkinRegionDetector::new(DetectorConfig::default());
        // 240x80 strip, aspect 3.0
        let frame = frame_with_patches(320, 240, &[(40, 80, 240, 80)]);
        assert!(detector.detect_faces(&frame).is_empty());
    }

    #[test]
    fn test_two_faces_in_row_major_order() {
        let detector = SkinRegionDetector::new(DetectorConfig::default());
        let frame = frame_with_patches(480, 240, &[(304, 16, 96, 96), (32, 96, 88, 96)]);
        let faces = detector.detect_faces(&frame);
        assert_eq!(
            faces,
            vec![
                FaceBox::new(304.0, 16.0, 96.0, 96.0),
                FaceBox::new(32.0, 96.0, 88.0, 96.0)
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        let detector = SkinRegionDetector::new(DetectorConfig::default());
        let frame = frame_with_patches(320, 240, &[(96, 48, 96, 112)]);
        assert_eq!(detector.detect_faces(&frame), detector.detect_faces(&frame));
    }
}

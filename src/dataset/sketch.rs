use crate::error::{Result, SketchretError};
use image::GrayImage;

/// Single-channel sketch in model range, row-major.
///
/// Binary sketches hold `1.0` for ink and `0.0` for paper; continuous sketches
/// hold values in `[-1, 1]` with ink at `+1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sketch {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Sketch {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(SketchretError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Normalise an 8-bit grayscale image (dark ink on light paper).
    pub fn from_gray(image: &GrayImage, binary: bool) -> Self {
        let data = image.pixels().map(|p| normalize_pixel(p.0[0], binary)).collect();
        Self {
            width: image.width(),
            height: image.height(),
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

/// Map an 8-bit pixel to model range.
///
/// Binary: `1` where `pixel < 128`, else `0`. Continuous: `1 - 2 * pixel / 255`.
pub fn normalize_pixel(pixel: u8, binary: bool) -> f32 {
    if binary {
        if pixel < 128 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - 2.0 * f32::from(pixel) / 255.0
    }
}

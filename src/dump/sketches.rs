//! Sketch images for visual debugging: original/decoded stacks and train/test pairs.

use crate::dataset::Sketch;
use crate::error::{Result, SketchretError};
use crate::eval::extract_sketch_id;
use image::{GrayImage, Luma};
use std::collections::HashMap;
use std::path::Path;

/// How model-range values map back to 8-bit intensities (ink dark on white).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescalePolicy {
    /// `(1 - x) * 255`
    Binary,
    /// `255 - clip((1 + x) * 255 / 2, 0, 255)`
    Continuous,
}

impl RescalePolicy {
    pub fn for_sketches(use_binary_sketches: bool) -> Self {
        if use_binary_sketches {
            RescalePolicy::Binary
        } else {
            RescalePolicy::Continuous
        }
    }

    pub fn to_u8(self, x: f32) -> u8 {
        let v = match self {
            RescalePolicy::Binary => (1.0 - x) * 255.0,
            RescalePolicy::Continuous => 255.0 - ((1.0 + x) * 255.0 / 2.0).clamp(0.0, 255.0),
        };
        // Truncate toward zero like an integer cast of the float
        v.clamp(0.0, 255.0) as u8
    }
}

/// Render a sketch as an 8-bit grayscale image.
pub fn sketch_to_gray(sketch: &Sketch, policy: RescalePolicy) -> GrayImage {
    let width = sketch.width();
    let data = sketch.data();
    GrayImage::from_fn(width, sketch.height(), |x, y| {
        Luma([policy.to_u8(data[(y * width + x) as usize])])
    })
}

/// Place `top` above `bottom`; both must share a width.
pub fn stack_vertical(top: &GrayImage, bottom: &GrayImage) -> Result<GrayImage> {
    if top.width() != bottom.width() {
        return Err(SketchretError::DimensionMismatch {
            expected: top.width() as usize,
            actual: bottom.width() as usize,
        });
    }
    let split = top.height();
    Ok(GrayImage::from_fn(top.width(), split + bottom.height(), |x, y| {
        if y < split {
            *top.get_pixel(x, y)
        } else {
            *bottom.get_pixel(x, y - split)
        }
    }))
}

/// Write `decoded_<name>` images (original above reconstruction) into `out_dir`.
///
/// The three slices are zipped in order; returns the number of images written.
pub fn write_decoded_sketches(
    names: &[String],
    originals: &[Sketch],
    decoded: &[Sketch],
    policy: RescalePolicy,
    out_dir: &Path,
) -> Result<usize> {
    if originals.len() != names.len() {
        return Err(SketchretError::SizeMismatch {
            what: "original sketches",
            expected: names.len(),
            actual: originals.len(),
        });
    }
    if decoded.len() != names.len() {
        return Err(SketchretError::SizeMismatch {
            what: "decoded sketches",
            expected: names.len(),
            actual: decoded.len(),
        });
    }

    std::fs::create_dir_all(out_dir)?;

    for ((name, original), reconstruction) in names.iter().zip(originals).zip(decoded) {
        let stacked = stack_vertical(
            &sketch_to_gray(original, policy),
            &sketch_to_gray(reconstruction, policy),
        )?;
        stacked.save(out_dir.join(format!("decoded_{}", name)))?;
    }

    log::info!("Wrote {} decoded sketches to {}", names.len(), out_dir.display());
    Ok(names.len())
}

/// Result of a pair dump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairDumpSummary {
    pub written: usize,
    /// Train sketch IDs with no test sketch of the same ID, one entry per train sketch.
    pub skipped: Vec<String>,
}

/// Write `<stem>_pair.jpg` images, each train sketch above the test sketch of the same ID.
///
/// One pair is written per train sketch whose ID appears among the test IDs, named
/// after the train file. Train sketches without a match are logged and skipped.
/// Both halves use the continuous policy.
pub fn write_sketch_pairs(
    test_names: &[String],
    test_sketches: &[Sketch],
    train_names: &[String],
    train_sketches: &[Sketch],
    out_dir: &Path,
) -> Result<PairDumpSummary> {
    if test_sketches.len() != test_names.len() {
        return Err(SketchretError::SizeMismatch {
            what: "test sketches",
            expected: test_names.len(),
            actual: test_sketches.len(),
        });
    }
    if train_sketches.len() != train_names.len() {
        return Err(SketchretError::SizeMismatch {
            what: "train sketches",
            expected: train_names.len(),
            actual: train_sketches.len(),
        });
    }

    std::fs::create_dir_all(out_dir)?;

    let mut test_by_id: HashMap<&str, usize> = HashMap::new();
    for (i, name) in test_names.iter().enumerate() {
        test_by_id.entry(extract_sketch_id(name)).or_insert(i);
    }

    let policy = RescalePolicy::Continuous;
    let mut summary = PairDumpSummary::default();

    for (name, train_sketch) in train_names.iter().zip(train_sketches) {
        let id = extract_sketch_id(name);
        let Some(&test_idx) = test_by_id.get(id) else {
            log::warn!("Sketch ID {} not found in test set; skipping pair dump", id);
            summary.skipped.push(id.to_string());
            continue;
        };

        let stacked = stack_vertical(
            &sketch_to_gray(train_sketch, policy),
            &sketch_to_gray(&test_sketches[test_idx], policy),
        )?;
        let stem = name.split('.').next().unwrap_or(name);
        stacked.save(out_dir.join(format!("{}_pair.jpg", stem)))?;
        summary.written += 1;
    }

    log::info!(
        "Wrote {} sketch pairs to {} ({} skipped)",
        summary.written,
        out_dir.display(),
        summary.skipped.len()
    );
    Ok(summary)
}

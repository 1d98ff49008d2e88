use crate::dataset::Sketch;
use crate::error::{Result, SketchretError};
use image::imageops::FilterType;
use std::path::Path;
use walkdir::WalkDir;

/// List sketch image file names directly inside `dir`, sorted by name.
///
/// Only the top level is scanned. **Supported extensions** (case-insensitive):
/// `.png`, `.jpg`, `.jpeg`, `.bmp`.
pub fn list_sketch_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            SketchretError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walkdir loop detected")
            }))
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        if !matches!(extension.as_str(), "png" | "jpg" | "jpeg" | "bmp") {
            continue;
        }

        files.push(entry.file_name().to_string_lossy().to_string());
    }

    log::info!("Discovered {} sketches in {}", files.len(), dir.display());
    Ok(files)
}

/// Decode a sketch image as 8-bit grayscale, resize to `width x height` if needed,
/// and normalise to model range.
pub fn load_sketch(path: &Path, width: u32, height: u32, binary: bool) -> Result<Sketch> {
    let mut gray = image::open(path)?.to_luma8();

    if gray.width() != width || gray.height() != height {
        log::debug!(
            "Resizing {} from {}x{} to {}x{}",
            path.display(),
            gray.width(),
            gray.height(),
            width,
            height
        );
        gray = image::imageops::resize(&gray, width, height, FilterType::Triangle);
    }

    Ok(Sketch::from_gray(&gray, binary))
}

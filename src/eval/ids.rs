//! Sketch ID extraction from file names.

/// Strip extension and suffix from a sketch file name.
///
/// Takes the substring before the first `.`, then the substring of that before
/// the first `_`. Sketches of the same object share an ID across sets, e.g.
/// `"123_a.png"` and `"123.jpg"` both map to `"123"`.
pub fn extract_sketch_id(file_name: &str) -> &str {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    stem.split('_').next().unwrap_or(stem)
}

/// Map an ordered list of file names to their sketch IDs, preserving order.
pub fn extract_sketch_ids<S: AsRef<str>>(file_names: &[S]) -> Vec<String> {
    file_names
        .iter()
        .map(|name| extract_sketch_id(name.as_ref()).to_string())
        .collect()
}

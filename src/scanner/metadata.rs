use std::path::Path;

/// Pixel dimensions read from the image header.
///
/// Returns `None` when the file cannot be opened or its header is not
/// understood. Missing dimensions are a normal outcome, not an error.
pub fn probe_dimensions(path: &Path) -> Option<(u32, u32)> {
    let reader = match image::ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::debug!("Cannot open {:?} for dimensions: {}", path, e);
            return None;
        }
    };

    match reader.into_dimensions() {
        Ok((width, height)) if width > 0 && height > 0 => Some((width, height)),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("No dimensions for {:?}: {}", path, e);
            None
        }
    }
}

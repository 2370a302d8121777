//! PNG output for a rendered [`Pixmap`].
//!
//! Feature-gated behind `png` (default on) so WASM builds can depend on this
//! crate without pulling in the `image` crate.

use backdrop_core::{BackdropError, Pixmap, Surface};
use std::path::Path;

/// Writes a pixmap as an opaque RGBA PNG.
///
/// Returns `BackdropError::Io` on write failure.
pub fn write_png(pixmap: &Pixmap, path: &Path) -> Result<(), BackdropError> {
    let size = pixmap.size();
    let img = image::RgbaImage::from_raw(size.width, size.height, pixmap.to_rgba8())
        .ok_or_else(|| BackdropError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| BackdropError::Io(e.to_string()))
}

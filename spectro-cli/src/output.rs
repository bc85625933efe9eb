use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use spectro_core::ColorGrid;

/// Write a rendered spectrogram to `path`.
///
/// `.ppm` / `.pnm` produce a plain-text `P3` pixmap; any other extension is
/// handed to `image`'s format detection (e.g. `.png`).
pub fn write_image(path: &Path, grid: &ColorGrid) -> Result<()> {
    let width = u32::try_from(grid.width()).context("Image too wide")?;
    let height = u32::try_from(grid.height()).context("Image too tall")?;
    let bytes = grid.to_rgb_bytes();

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("ppm") | Some("pnm") => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create image file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            PnmEncoder::new(&mut writer)
                .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Ascii))
                .write_image(&bytes, width, height, ExtendedColorType::Rgb8)
                .with_context(|| format!("Failed to write PPM: {}", path.display()))?;
            writer
                .flush()
                .with_context(|| format!("Failed to flush PPM: {}", path.display()))?;
        }
        _ => {
            let image = RgbImage::from_raw(width, height, bytes)
                .context("Pixel buffer does not match image dimensions")?;
            image
                .save(path)
                .with_context(|| format!("Failed to write image: {}", path.display()))?;
        }
    }

    Ok(())
}

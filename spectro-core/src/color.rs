//! Magnitude-to-color mapping and the rendered color grid.

use crate::grid::MagnitudeGrid;

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rough perceived brightness (Rec. 601 luma weights).
    pub fn luma(&self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }
}

/// Maps a binned magnitude to a pixel color.
pub trait ColorMap {
    fn color(&self, magnitude: i64) -> Rgb;
}

/// Heat-style palette: black, then dark red through orange and yellow to white.
///
/// Each entry applies when the magnitude is strictly greater than its
/// threshold; later entries override earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatPalette;

impl HeatPalette {
    pub const THRESHOLDS: [(i64, Rgb); 8] = [
        (0, Rgb::new(180, 62, 58)),
        (1, Rgb::new(233, 62, 58)),
        (2, Rgb::new(237, 104, 60)),
        (5, Rgb::new(243, 144, 63)),
        (10, Rgb::new(253, 199, 12)),
        (20, Rgb::new(255, 243, 59)),
        (50, Rgb::new(255, 251, 195)),
        (100, Rgb::new(255, 255, 255)),
    ];
}

impl ColorMap for HeatPalette {
    fn color(&self, magnitude: i64) -> Rgb {
        Self::THRESHOLDS
            .iter()
            .take_while(|(threshold, _)| magnitude > *threshold)
            .last()
            .map(|&(_, rgb)| rgb)
            .unwrap_or(Rgb::BLACK)
    }
}

/// Rendered spectrogram: `height = num_levels` rows by `width = num_chunks`
/// columns. Row 0 holds the highest band, so low frequencies sit at the
/// bottom and time runs left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGrid {
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl ColorGrid {
    pub fn render(grid: &MagnitudeGrid, map: &impl ColorMap) -> Self {
        let width = grid.num_chunks();
        let height = grid.num_levels();

        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            let level = height - 1 - y;
            for x in 0..width {
                let magnitude = i64::try_from(grid.get(x, level)).unwrap_or(i64::MAX);
                pixels.push(map.color(magnitude));
            }
        }

        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// Pixels in row-major order, top row first.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Packed `[r, g, b, r, g, b, ...]` bytes, top row first.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }
}

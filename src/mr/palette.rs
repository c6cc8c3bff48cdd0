//! Palette construction: exact-match color deduplication in first-seen order,
//! capped at 128 entries.

use alloc::vec::Vec;
use core::fmt;

use enough::Stop;

use crate::error::MrError;
use crate::pixel::PixelLayout;

/// Maximum number of palette entries an MR file can reference.
pub const MAX_COLORS: usize = 128;

/// An opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGB8> for Color {
    fn from(c: rgb::RGB8) -> Self {
        Self::new(c.r, c.g, c.b)
    }
}

#[cfg(feature = "rgb")]
impl From<Color> for rgb::RGB8 {
    fn from(c: Color) -> Self {
        rgb::RGB8::new(c.r, c.g, c.b)
    }
}

/// Ordered color table with a fixed capacity of [`MAX_COLORS`].
///
/// A palette built by [`build_palette`] never holds duplicates. A palette read
/// from a file is taken verbatim and may.
#[derive(Clone)]
pub struct Palette {
    colors: [Color; MAX_COLORS],
    len: usize,
}

impl Palette {
    pub const fn new() -> Self {
        Self {
            colors: [Color::BLACK; MAX_COLORS],
            len: 0,
        }
    }

    /// Build a palette from an explicit color list.
    ///
    /// Rejects more than 128 entries and repeated colors.
    pub fn from_colors(colors: &[Color]) -> Result<Self, MrError> {
        if colors.len() > MAX_COLORS {
            return Err(MrError::InvalidPalette("more than 128 colors"));
        }
        let mut palette = Self::new();
        for &color in colors {
            if palette.index_of(color).is_some() {
                return Err(MrError::InvalidPalette("duplicate color"));
            }
            palette.push(color);
        }
        Ok(palette)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_COLORS
    }

    pub fn get(&self, index: u8) -> Option<Color> {
        self.as_slice().get(usize::from(index)).copied()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.as_slice().iter().copied()
    }

    /// Linear search for an exact match.
    pub fn index_of(&self, color: Color) -> Option<u8> {
        self.as_slice()
            .iter()
            .position(|&c| c == color)
            .map(|i| i as u8)
    }

    /// Typed view of the palette entries.
    #[cfg(feature = "rgb")]
    pub fn to_rgb8(&self) -> Vec<rgb::RGB8> {
        self.iter().map(rgb::RGB8::from).collect()
    }

    /// Append without a duplicate check. Returns the new entry's index, or
    /// `None` when the palette is full.
    pub(crate) fn push(&mut self, color: Color) -> Option<u8> {
        if self.is_full() {
            return None;
        }
        let index = self.len;
        self.colors[index] = color;
        self.len += 1;
        Some(index as u8)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Palette {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Palette {}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Quantize `pixels` to palette indices in row-major order.
///
/// Each color is assigned the index of its first occurrence. The 129th distinct
/// color fails with [`MrError::PaletteOverflow`] carrying its position.
pub fn build_palette(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
    stop: &dyn Stop,
) -> Result<(Palette, Vec<u8>), MrError> {
    let w = width as usize;
    let h = height as usize;
    let bpp = layout.bytes_per_pixel();
    let pixel_count = w
        .checked_mul(h)
        .ok_or(MrError::DimensionsTooLarge { width, height })?;
    let expected = pixel_count
        .checked_mul(bpp)
        .ok_or(MrError::DimensionsTooLarge { width, height })?;
    if pixels.len() < expected {
        return Err(MrError::BufferTooSmall {
            needed: expected,
            actual: pixels.len(),
        });
    }

    let mut palette = Palette::new();
    let mut indices = Vec::with_capacity(pixel_count);
    if pixel_count == 0 {
        return Ok((palette, indices));
    }

    for (y, row) in pixels[..expected].chunks_exact(w * bpp).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for (x, px) in row.chunks_exact(bpp).enumerate() {
            let (r, g, b) = layout.rgb_of(px);
            let color = Color::new(r, g, b);
            let index = match palette.index_of(color) {
                Some(i) => i,
                None => palette.push(color).ok_or(MrError::PaletteOverflow {
                    x: x as u32,
                    y: y as u32,
                })?,
            };
            indices.push(index);
        }
    }

    Ok((palette, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    fn rgb_buf(colors: &[(u8, u8, u8)]) -> Vec<u8> {
        colors.iter().flat_map(|&(r, g, b)| [r, g, b]).collect()
    }

    #[test]
    fn indices_follow_first_occurrence() {
        let pixels = rgb_buf(&[(9, 9, 9), (1, 2, 3), (9, 9, 9), (4, 5, 6), (1, 2, 3)]);
        let (palette, indices) =
            build_palette(&pixels, 5, 1, PixelLayout::Rgb8, &Unstoppable).unwrap();
        assert_eq!(
            palette.as_slice(),
            &[
                Color::new(9, 9, 9),
                Color::new(1, 2, 3),
                Color::new(4, 5, 6)
            ]
        );
        assert_eq!(indices, [0, 1, 0, 2, 1]);
    }

    #[test]
    fn bgr_input_matches_rgb_input() {
        let rgb = rgb_buf(&[(10, 20, 30), (40, 50, 60)]);
        let bgr = rgb_buf(&[(30, 20, 10), (60, 50, 40)]);
        let a = build_palette(&rgb, 2, 1, PixelLayout::Rgb8, &Unstoppable).unwrap();
        let b = build_palette(&bgr, 2, 1, PixelLayout::Bgr8, &Unstoppable).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn alpha_is_ignored() {
        let rgba = [7, 7, 7, 0, 7, 7, 7, 255];
        let (palette, indices) =
            build_palette(&rgba, 2, 1, PixelLayout::Rgba8, &Unstoppable).unwrap();
        assert_eq!(palette.len(), 1);
        assert_eq!(indices, [0, 0]);
    }

    #[test]
    fn exactly_128_colors_fit() {
        let pixels: Vec<u8> = (0..128u8).flat_map(|i| [i, 0, 0]).collect();
        let (palette, indices) =
            build_palette(&pixels, 128, 1, PixelLayout::Rgb8, &Unstoppable).unwrap();
        assert!(palette.is_full());
        assert_eq!(indices[127], 127);
    }

    #[test]
    fn color_129_overflows_with_position() {
        // 16 wide: the 129th color lands at x=0, y=8.
        let pixels: Vec<u8> = (0..129u8).flat_map(|i| [i, 1, 2]).collect();
        let mut padded = pixels.clone();
        padded.resize(16 * 9 * 3, 0);
        let err = build_palette(&padded, 16, 9, PixelLayout::Rgb8, &Unstoppable).unwrap_err();
        match err {
            MrError::PaletteOverflow { x, y } => assert_eq!((x, y), (0, 8)),
            other => panic!("expected PaletteOverflow, got {other:?}"),
        }
    }

    #[test]
    fn short_buffer_rejected() {
        let err = build_palette(&[0u8; 5], 2, 1, PixelLayout::Rgb8, &Unstoppable).unwrap_err();
        assert!(matches!(
            err,
            MrError::BufferTooSmall {
                needed: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn from_colors_rejects_duplicates() {
        let c = Color::new(1, 1, 1);
        assert!(matches!(
            Palette::from_colors(&[c, c]),
            Err(MrError::InvalidPalette(_))
        ));
        assert_eq!(Palette::from_colors(&[c]).unwrap().len(), 1);
    }
}

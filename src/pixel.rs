/// Interleaved 8-bit layouts accepted by the encoder. Decoding always
/// produces [`PixelLayout::Rgb8`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// Single channel, 8-bit grayscale.
    Gray8,
    /// 3 channels, 8-bit RGB.
    Rgb8,
    /// 4 channels, 8-bit RGBA.
    Rgba8,
    /// 3 channels, 8-bit BGR.
    Bgr8,
    /// 4 channels, 8-bit BGRA.
    Bgra8,
    /// 4 channels, 8-bit BGRX (opaque; 4th byte is padding, not alpha).
    Bgrx8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 | Self::Bgrx8 => 4,
        }
    }

    /// Read one pixel as (r, g, b). Alpha and padding bytes are dropped.
    ///
    /// `px` must hold at least `bytes_per_pixel()` bytes.
    #[inline]
    pub(crate) fn rgb_of(&self, px: &[u8]) -> (u8, u8, u8) {
        match self {
            Self::Gray8 => (px[0], px[0], px[0]),
            Self::Rgb8 | Self::Rgba8 => (px[0], px[1], px[2]),
            Self::Bgr8 | Self::Bgra8 | Self::Bgrx8 => (px[2], px[1], px[0]),
        }
    }
}

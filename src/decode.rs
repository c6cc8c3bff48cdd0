use alloc::vec::Vec;

use enough::Stop;

use crate::error::MrError;
use crate::limits::Limits;
use crate::mr::palette::Palette;
use crate::mr::{self, IndexedImage, Permissiveness};
use crate::pixel::PixelLayout;

/// Decoded image output: RGB8 pixels plus the palette they came from.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub palette: Palette,
}

impl DecodeOutput {
    pub(crate) fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        layout: PixelLayout,
        palette: Palette,
    ) -> Self {
        Self {
            pixels,
            width,
            height,
            layout,
            palette,
        }
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Copy the pixel data out as typed RGB8 pixels.
    #[cfg(feature = "rgb")]
    pub fn to_rgb8(&self) -> Vec<rgb::RGB8> {
        self.pixels
            .chunks_exact(3)
            .map(|p| rgb::RGB8::new(p[0], p[1], p[2]))
            .collect()
    }

    /// Convert to an [`imgref::ImgVec`] of RGB8 pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGB8> {
        imgref::ImgVec::new(self.to_rgb8(), self.width as usize, self.height as usize)
    }
}

/// Builder for decoding an MR file.
///
/// ```no_run
/// use zenmr::{DecodeRequest, Permissiveness, Unstoppable};
///
/// let data: &[u8] = &[]; // your .mr bytes
/// let decoded = DecodeRequest::new(data)
///     .with_permissiveness(Permissiveness::Strict)
///     .decode(Unstoppable)?;
/// println!("{}x{}, {} colors", decoded.width, decoded.height, decoded.palette.len());
/// # Ok::<(), zenmr::MrError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    permissiveness: Permissiveness,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            permissiveness: Permissiveness::default(),
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_permissiveness(mut self, permissiveness: Permissiveness) -> Self {
        self.permissiveness = permissiveness;
        self
    }

    /// Decode to RGB8 pixels.
    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, MrError> {
        mr::decode(self.data, self.limits, self.permissiveness, &stop)
    }

    /// Decode to palette and index buffer, skipping color lookup.
    pub fn decode_indexed(self, stop: impl Stop) -> Result<IndexedImage, MrError> {
        mr::decode_indexed(self.data, self.limits, self.permissiveness, &stop)
    }
}

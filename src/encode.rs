use alloc::vec::Vec;

use enough::Stop;

use crate::error::{MrError, MrWarning};
use crate::limits::Limits;
use crate::mr::{self, IndexedImage};
use crate::pixel::PixelLayout;

/// A complete MR file plus any non-fatal findings.
#[derive(Clone, Debug)]
pub struct EncodeOutput {
    data: Vec<u8>,
    /// Size of the run-length payload alone.
    pub compressed_len: usize,
    /// Set when the payload exceeds the 8192 byte IP.BIN budget.
    pub warning: Option<MrWarning>,
}

impl EncodeOutput {
    pub(crate) fn new(data: Vec<u8>, compressed_len: usize, warning: Option<MrWarning>) -> Self {
        Self {
            data,
            compressed_len,
            warning,
        }
    }

    /// The encoded file bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Builder for encoding an MR file.
///
/// ```no_run
/// use zenmr::{EncodeRequest, PixelLayout, Unstoppable};
///
/// let pixels = vec![255u8; 320 * 90 * 3];
/// let encoded = EncodeRequest::new()
///     .reject_oversize(true)
///     .encode(&pixels, 320, 90, PixelLayout::Rgb8, Unstoppable)?;
/// std::fs::write("logo.mr", encoded.data()).unwrap();
/// # Ok::<(), zenmr::MrError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct EncodeRequest<'a> {
    limits: Option<&'a Limits>,
    reject_oversize: bool,
}

impl<'a> EncodeRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Fail with [`MrError::PayloadTooLarge`] instead of returning a warning
    /// when the payload exceeds the IP.BIN budget.
    pub fn reject_oversize(mut self, reject: bool) -> Self {
        self.reject_oversize = reject;
        self
    }

    /// Quantize and encode interleaved pixels.
    pub fn encode(
        self,
        pixels: &[u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
        stop: impl Stop,
    ) -> Result<EncodeOutput, MrError> {
        mr::encode(
            pixels,
            width,
            height,
            layout,
            self.limits,
            self.reject_oversize,
            &stop,
        )
    }

    /// Encode typed RGB8 pixels.
    #[cfg(feature = "rgb")]
    pub fn encode_rgb8(
        self,
        pixels: &[rgb::RGB8],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<EncodeOutput, MrError> {
        let bytes: Vec<u8> = pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect();
        self.encode(&bytes, width, height, PixelLayout::Rgb8, stop)
    }

    /// Encode an image that is already palette-indexed.
    pub fn encode_indexed(
        self,
        image: &IndexedImage,
        stop: impl Stop,
    ) -> Result<EncodeOutput, MrError> {
        mr::encode_indexed(image, self.limits, self.reject_oversize, &stop)
    }
}

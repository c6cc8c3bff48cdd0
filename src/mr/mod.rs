//! Sega Dreamcast MR image format.
//!
//! An MR file is a palette of at most 128 colors followed by a run-length
//! coded stream of palette indices. The format exists to carry the boot logo
//! embedded in a disc's IP.BIN, which is why encoding is limited to 320x90.
//!
//! Use the top-level [`crate::EncodeRequest`] / [`crate::DecodeRequest`] for
//! pixel-level work; the submodules expose each stage on its own.

pub mod header;
pub mod palette;
pub mod rle;

use alloc::format;
use alloc::vec::Vec;
use enough::Stop;

use self::palette::Palette;
use crate::decode::DecodeOutput;
use crate::encode::EncodeOutput;
use crate::error::{MrError, MrWarning};
use crate::info::ImageInfo;
use crate::limits::Limits;
use crate::logging::{debug, warn};
use crate::pixel::PixelLayout;

/// Widest image accepted by the encoder.
pub const MAX_WIDTH: u32 = 320;
/// Tallest image accepted by the encoder.
pub const MAX_HEIGHT: u32 = 90;
/// Space reserved for the logo in a standard IP.BIN.
pub const PAYLOAD_BUDGET: usize = 8192;

// ── Permissiveness ──────────────────────────────────────────────────

/// Controls how strictly the MR decoder validates input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permissiveness {
    /// Reject anything this crate would not have written: nonzero reserved
    /// fields, a gap before the payload, trailing bytes, and a stream whose
    /// runs do not add up to exactly width * height.
    Strict,

    /// Default behavior. Accept files as produced by existing tools: a final
    /// run that overshoots the image is truncated, a short stream leaves the
    /// remaining pixels at index 0, bytes after the declared size are ignored.
    #[default]
    Standard,

    /// Accept as much as possible. Clamp a file shorter than its declared
    /// size, stop at a truncated trailing token, and render out-of-range
    /// indices as black.
    Permissive,
}

/// Palette plus one index per pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    pub indices: Vec<u8>,
}

impl IndexedImage {
    /// Expand indices to RGB8 pixels.
    pub fn to_rgb(&self, stop: &dyn Stop) -> Result<Vec<u8>, MrError> {
        expand_indices(&self.palette, &self.indices, self.width, false, stop)
    }
}

/// Probe header for ImageInfo without decoding.
pub(crate) fn probe_header(data: &[u8]) -> Result<ImageInfo, MrError> {
    let header = header::MrHeader::parse(data)?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        palette_len: header.palette_len,
        file_size: header.file_size,
        data_offset: header.data_offset,
    })
}

/// Decode to palette + indices (called from DecodeRequest).
pub(crate) fn decode_indexed(
    data: &[u8],
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<IndexedImage, MrError> {
    let file = header::parse_file(data, permissiveness)?;
    unpack(file, limits, permissiveness, 1, stop)
}

/// Decode to RGB8 pixels (called from DecodeRequest).
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<DecodeOutput, MrError> {
    let file = header::parse_file(data, permissiveness)?;
    let image = unpack(file, limits, permissiveness, 3, stop)?;
    let lenient = permissiveness == Permissiveness::Permissive;
    let pixels = expand_indices(&image.palette, &image.indices, image.width, lenient, stop)?;
    Ok(DecodeOutput::new(
        pixels,
        image.width,
        image.height,
        PixelLayout::Rgb8,
        image.palette,
    ))
}

/// Decompress the payload of a parsed file. `out_bpp` is the bytes per pixel
/// the caller will allocate, for the memory limit.
fn unpack(
    file: header::MrFile<'_>,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    out_bpp: usize,
    stop: &dyn Stop,
) -> Result<IndexedImage, MrError> {
    let (width, height) = (file.header.width, file.header.height);
    let pixel_count = pixel_count(width, height)?;
    if let Some(limits) = limits {
        limits.check(width, height)?;
        let out_bytes = pixel_count
            .checked_mul(out_bpp)
            .ok_or(MrError::DimensionsTooLarge { width, height })?;
        limits.check_memory(out_bytes)?;
    }
    stop.check()?;

    let indices = rle::decompress(file.payload, pixel_count, permissiveness, stop)?;
    if permissiveness != Permissiveness::Permissive {
        check_indices(&file.palette, &indices)?;
    }
    Ok(IndexedImage {
        width,
        height,
        palette: file.palette,
        indices,
    })
}

/// Encode pixels as MR (called from EncodeRequest).
pub(crate) fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
    limits: Option<&Limits>,
    reject_oversize: bool,
    stop: &dyn Stop,
) -> Result<EncodeOutput, MrError> {
    check_dimensions(width, height, limits)?;
    stop.check()?;
    let (palette, indices) = palette::build_palette(pixels, width, height, layout, stop)?;
    finish(width, height, &palette, &indices, reject_oversize, stop)
}

/// Encode an already-quantized image (called from EncodeRequest).
pub(crate) fn encode_indexed(
    image: &IndexedImage,
    limits: Option<&Limits>,
    reject_oversize: bool,
    stop: &dyn Stop,
) -> Result<EncodeOutput, MrError> {
    let (width, height) = (image.width, image.height);
    check_dimensions(width, height, limits)?;
    let expected = pixel_count(width, height)?;
    if image.indices.len() != expected {
        return Err(MrError::BufferTooSmall {
            needed: expected,
            actual: image.indices.len(),
        });
    }
    check_indices(&image.palette, &image.indices)?;
    stop.check()?;
    finish(
        width,
        height,
        &image.palette,
        &image.indices,
        reject_oversize,
        stop,
    )
}

fn finish(
    width: u32,
    height: u32,
    palette: &Palette,
    indices: &[u8],
    reject_oversize: bool,
    stop: &dyn Stop,
) -> Result<EncodeOutput, MrError> {
    let payload = rle::compress(indices);
    stop.check()?;
    debug!(
        "mr: {} indices compressed to {} bytes",
        indices.len(),
        payload.len()
    );

    let warning = oversize_warning(payload.len());
    if let Some(MrWarning::PayloadTooLarge { size, limit }) = warning {
        if reject_oversize {
            return Err(MrError::PayloadTooLarge { size, limit });
        }
    }

    let data = header::write_file(width, height, palette, &payload)?;
    Ok(EncodeOutput::new(data, payload.len(), warning))
}

/// `Some` when `size` exceeds [`PAYLOAD_BUDGET`]. Logs the condition.
pub(crate) fn oversize_warning(size: usize) -> Option<MrWarning> {
    if size <= PAYLOAD_BUDGET {
        return None;
    }
    let warning = MrWarning::PayloadTooLarge {
        size,
        limit: PAYLOAD_BUDGET,
    };
    warn!("mr: {warning}");
    Some(warning)
}

fn check_dimensions(width: u32, height: u32, limits: Option<&Limits>) -> Result<(), MrError> {
    if width > MAX_WIDTH || height > MAX_HEIGHT {
        return Err(MrError::DimensionsTooLarge { width, height });
    }
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }
    Ok(())
}

fn pixel_count(width: u32, height: u32) -> Result<usize, MrError> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(MrError::DimensionsTooLarge { width, height })
}

fn check_indices(palette: &Palette, indices: &[u8]) -> Result<(), MrError> {
    match indices.iter().find(|&&i| usize::from(i) >= palette.len()) {
        Some(&index) => Err(MrError::IndexOutOfRange {
            index,
            palette_len: palette.len(),
        }),
        None => Ok(()),
    }
}

/// Empty buffer with room for `len` bytes. Header-derived sizes go through
/// here so an impossible request is an error instead of an abort.
pub(crate) fn try_with_capacity(len: usize) -> Result<Vec<u8>, MrError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| MrError::LimitExceeded(format!("cannot allocate {len} bytes")))?;
    Ok(buf)
}

/// `len` zero bytes, allocated through [`try_with_capacity`].
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<u8>, MrError> {
    let mut buf = try_with_capacity(len)?;
    buf.resize(len, 0);
    Ok(buf)
}

fn expand_indices(
    palette: &Palette,
    indices: &[u8],
    width: u32,
    lenient: bool,
    stop: &dyn Stop,
) -> Result<Vec<u8>, MrError> {
    let out_len = indices.len().checked_mul(3).ok_or_else(|| {
        MrError::LimitExceeded(format!("{} pixels overflow an RGB buffer", indices.len()))
    })?;
    let mut out = try_with_capacity(out_len)?;
    let row_len = (width as usize).max(1);
    for (row_idx, row) in indices.chunks(row_len).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        for &index in row {
            let color = match palette.get(index) {
                Some(c) => c,
                None if lenient => palette::Color::BLACK,
                None => {
                    return Err(MrError::IndexOutOfRange {
                        index,
                        palette_len: palette.len(),
                    });
                }
            };
            out.extend_from_slice(&[color.r, color.g, color.b]);
        }
    }
    Ok(out)
}

//! # zenmr
//!
//! Decoder and encoder for the Sega Dreamcast MR image format, the indexed,
//! run-length compressed bitmap used for boot logos in IP.BIN.
//!
//! ## Format
//!
//! - 30-byte little-endian header (`"MR"` magic, sizes, dimensions)
//! - Up to 128 palette entries stored as B, G, R, 0
//! - One palette index per pixel, run-length coded with three escape tiers
//!   (see [`mr::rle`])
//!
//! Encoding accepts images up to 320x90 with at most 128 distinct colors.
//! Palette indices are assigned in first-seen row-major order, so the same
//! pixels always produce the same file.
//!
//! ## Non-Goals
//!
//! - Color quantization (reduce to 128 colors before encoding)
//! - Alpha (4-channel input is accepted, alpha is dropped)
//! - Other Dreamcast texture formats
//!
//! ## Usage
//!
//! ```no_run
//! use zenmr::{DecodeRequest, EncodeRequest, ImageInfo, PixelLayout};
//! use enough::Unstoppable;
//!
//! let data: &[u8] = &[]; // your .mr bytes
//!
//! // Probe without decoding
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{}, {} colors", info.width, info.height, info.palette_len);
//!
//! // Decode to RGB8
//! let decoded = DecodeRequest::new(data).decode(Unstoppable)?;
//!
//! // Encode back
//! let encoded = EncodeRequest::new().encode(
//!     decoded.pixels(), decoded.width, decoded.height,
//!     decoded.layout, Unstoppable,
//! )?;
//! if let Some(warning) = &encoded.warning {
//!     eprintln!("{warning}");
//! }
//! # Ok::<(), zenmr::MrError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod decode;
mod encode;
mod error;
mod info;
mod limits;
mod logging;
mod pixel;

pub mod ipbin;
pub mod mr;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::{EncodeOutput, EncodeRequest};
pub use enough::{Stop, Unstoppable};
pub use error::{MrError, MrWarning};
pub use info::ImageInfo;
pub use limits::Limits;
pub use mr::header::MrHeader;
pub use mr::palette::{Color, Palette};
pub use mr::{IndexedImage, Permissiveness};
pub use pixel::PixelLayout;

/// Decode an MR file to RGB8 pixels with default settings.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, MrError> {
    DecodeRequest::new(data).decode(stop)
}

/// Encode pixels to an MR file with default settings.
///
/// An oversized payload is reported through [`EncodeOutput::warning`].
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
    stop: impl Stop,
) -> Result<EncodeOutput, MrError> {
    EncodeRequest::new().encode(pixels, width, height, layout, stop)
}

/// Read width, height and palette size without decoding.
pub fn probe(data: &[u8]) -> Result<ImageInfo, MrError> {
    ImageInfo::from_bytes(data)
}

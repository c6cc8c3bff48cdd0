//! MR file layout: 30-byte preamble, BGR0 palette table, compressed payload.
//!
//! ```text
//! 0   "MR"
//! 2   u32 file size
//! 6   u32 reserved (0)
//! 10  u32 data offset
//! 14  u32 width
//! 18  u32 height
//! 22  u32 reserved (0)
//! 26  u32 palette color count N
//! 30  N x [b, g, r, 0]
//! 30 + 4N  run-length payload up to file size
//! ```
//!
//! All integers are little-endian.

use alloc::format;
use alloc::vec::Vec;

use super::Permissiveness;
use super::palette::{Color, MAX_COLORS, Palette};
use crate::error::MrError;
use crate::logging::debug;

pub const MAGIC: [u8; 2] = *b"MR";

/// Magic plus seven u32 fields.
pub const PREAMBLE_LEN: usize = 30;

pub const PALETTE_ENTRY_LEN: usize = 4;

/// Parsed MR preamble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MrHeader {
    pub file_size: u32,
    pub data_offset: u32,
    pub width: u32,
    pub height: u32,
    pub palette_len: u32,
    /// The two reserved words, in file order. Zero when written by this crate.
    pub reserved: [u32; 2],
}

impl MrHeader {
    /// Derive a header for an image with `palette_len` colors and a payload of
    /// `payload_len` bytes.
    pub fn new(
        width: u32,
        height: u32,
        palette_len: usize,
        payload_len: usize,
    ) -> Result<Self, MrError> {
        let data_offset = palette_len
            .checked_mul(PALETTE_ENTRY_LEN)
            .and_then(|p| p.checked_add(PREAMBLE_LEN))
            .ok_or(MrError::InvalidPalette("palette too large"))?;
        let file_size = data_offset
            .checked_add(payload_len)
            .and_then(|s| u32::try_from(s).ok())
            .ok_or_else(|| {
                MrError::LimitExceeded(format!("payload of {payload_len} bytes overflows file size"))
            })?;
        Ok(Self {
            file_size,
            data_offset: data_offset as u32,
            width,
            height,
            palette_len: palette_len as u32,
            reserved: [0; 2],
        })
    }

    /// Parse the 30-byte preamble. Does not look at the palette or payload.
    pub fn parse(data: &[u8]) -> Result<Self, MrError> {
        if data.get(..2) != Some(&MAGIC[..]) {
            return Err(MrError::BadMagic);
        }
        let preamble = data.get(..PREAMBLE_LEN).ok_or(MrError::TruncatedFile {
            needed: PREAMBLE_LEN,
            actual: data.len(),
        })?;
        let word = |i: usize| {
            let off = 2 + i * 4;
            u32::from_le_bytes([
                preamble[off],
                preamble[off + 1],
                preamble[off + 2],
                preamble[off + 3],
            ])
        };
        Ok(Self {
            file_size: word(0),
            reserved: [word(1), word(5)],
            data_offset: word(2),
            width: word(3),
            height: word(4),
            palette_len: word(6),
        })
    }

    /// Payload byte count, `file_size - data_offset`.
    pub fn payload_len(&self) -> Option<usize> {
        self.file_size
            .checked_sub(self.data_offset)
            .map(|n| n as usize)
    }

    /// Offset just past the palette table.
    pub fn palette_end(&self) -> usize {
        (self.palette_len as usize)
            .saturating_mul(PALETTE_ENTRY_LEN)
            .saturating_add(PREAMBLE_LEN)
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.reserved[0].to_le_bytes());
        out.extend_from_slice(&self.data_offset.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.reserved[1].to_le_bytes());
        out.extend_from_slice(&self.palette_len.to_le_bytes());
    }
}

/// A parsed file: header, palette, and the still-compressed payload.
#[derive(Clone, Debug)]
pub struct MrFile<'a> {
    pub header: MrHeader,
    pub palette: Palette,
    pub payload: &'a [u8],
}

/// Assemble a complete MR file.
pub fn write_file(
    width: u32,
    height: u32,
    palette: &Palette,
    payload: &[u8],
) -> Result<Vec<u8>, MrError> {
    let header = MrHeader::new(width, height, palette.len(), payload.len())?;
    let mut out = Vec::with_capacity(header.file_size as usize);
    header.write(&mut out);
    for c in palette.iter() {
        out.extend_from_slice(&[c.b, c.g, c.r, 0]);
    }
    out.extend_from_slice(payload);
    debug!(
        "mr: wrote {}x{} image, {} colors, {} byte payload",
        width,
        height,
        palette.len(),
        payload.len()
    );
    Ok(out)
}

/// Split a file into header, palette and payload, validating the layout.
///
/// [`MrError::TruncatedFile`] means a region runs past the end of `data`.
/// Fields that contradict each other (a data offset inside the palette table,
/// a file size below the data offset) are [`MrError::InvalidHeader`] however
/// long the buffer is.
pub fn parse_file(data: &[u8], permissiveness: Permissiveness) -> Result<MrFile<'_>, MrError> {
    let header = MrHeader::parse(data)?;
    debug!("mr: parsed header {:?}", header);

    let strict = permissiveness == Permissiveness::Strict;
    if strict && header.reserved != [0, 0] {
        return Err(MrError::InvalidHeader(format!(
            "reserved fields are {:?}, expected zero",
            header.reserved
        )));
    }

    if header.palette_len as usize > MAX_COLORS {
        return Err(MrError::InvalidHeader(format!(
            "palette has {} colors, maximum is {MAX_COLORS}",
            header.palette_len
        )));
    }
    let palette_end = header.palette_end();
    let table = data
        .get(PREAMBLE_LEN..palette_end)
        .ok_or(MrError::TruncatedFile {
            needed: palette_end,
            actual: data.len(),
        })?;

    let data_offset = header.data_offset as usize;
    if data_offset < palette_end || (strict && data_offset != palette_end) {
        return Err(MrError::InvalidHeader(format!(
            "data offset {data_offset} does not follow a {}-color palette",
            header.palette_len
        )));
    }
    if header.payload_len().is_none() {
        return Err(MrError::InvalidHeader(format!(
            "file size {} is smaller than data offset {data_offset}",
            header.file_size
        )));
    }

    let mut file_size = header.file_size as usize;
    if file_size > data.len() {
        if permissiveness != Permissiveness::Permissive || data_offset > data.len() {
            return Err(MrError::TruncatedFile {
                needed: file_size,
                actual: data.len(),
            });
        }
        file_size = data.len();
    } else if strict && file_size < data.len() {
        return Err(MrError::InvalidHeader(format!(
            "{} trailing bytes after declared file size",
            data.len() - file_size
        )));
    }

    let mut palette = Palette::new();
    for entry in table.chunks_exact(PALETTE_ENTRY_LEN) {
        palette.push(Color::new(entry[2], entry[1], entry[0]));
    }

    Ok(MrFile {
        header,
        palette,
        payload: &data[data_offset..file_size],
    })
}

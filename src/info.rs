use crate::error::MrError;

/// Header fields of an MR file, read without touching the palette or payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Declared palette color count.
    pub palette_len: u32,
    /// Declared total file size.
    pub file_size: u32,
    /// Offset of the compressed payload.
    pub data_offset: u32,
}

impl ImageInfo {
    /// Probe the 30-byte preamble.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MrError> {
        crate::mr::probe_header(data)
    }
}

use alloc::string::String;
use enough::StopReason;

/// Errors from MR decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MrError {
    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("more than 128 distinct colors (first overflow at x={x}, y={y})")]
    PaletteOverflow { x: u32, y: u32 },

    #[error("compressed payload is {size} bytes, limit is {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("missing \"MR\" magic bytes")]
    BadMagic,

    #[error("truncated file: need {needed} bytes, got {actual}")]
    TruncatedFile { needed: usize, actual: usize },

    #[error("malformed run-length stream at offset {offset}: {reason}")]
    MalformedStream { offset: usize, reason: &'static str },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("palette index {index} out of range for {palette_len} colors")]
    IndexOutOfRange { index: u8, palette_len: usize },

    #[error("invalid palette: {0}")]
    InvalidPalette(&'static str),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for MrError {
    fn from(r: StopReason) -> Self {
        MrError::Cancelled(r)
    }
}

/// Non-fatal conditions reported alongside a successful result.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MrWarning {
    /// The image will not fit the boot-logo area of a standard IP.BIN.
    #[error("image is {size} bytes, {} bytes over the {limit} byte IP.BIN budget", .size.saturating_sub(*.limit))]
    PayloadTooLarge { size: usize, limit: usize },
}

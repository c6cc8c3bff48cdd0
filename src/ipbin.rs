//! Embedding an MR image in a Dreamcast boot sector (IP.BIN).
//!
//! The boot ROM draws the logo found at a fixed offset in IP.BIN. Only 8192
//! bytes are set aside for it; a larger image overwrites the code that follows
//! but is still inserted, with a warning.

use crate::error::{MrError, MrWarning};
use crate::mr::header::MAGIC;
use crate::mr::oversize_warning;

/// Byte offset of the logo within IP.BIN.
pub const IP_BIN_LOGO_OFFSET: usize = 0x3820;

/// Copy a complete MR file into `ip` at [`IP_BIN_LOGO_OFFSET`].
///
/// Returns [`MrWarning::PayloadTooLarge`] when `mr` is over the 8192 byte budget.
pub fn insert_into_ip_bin(ip: &mut [u8], mr: &[u8]) -> Result<Option<MrWarning>, MrError> {
    if mr.get(..2) != Some(&MAGIC[..]) {
        return Err(MrError::BadMagic);
    }
    let end = IP_BIN_LOGO_OFFSET + mr.len();
    let actual = ip.len();
    let slot = ip
        .get_mut(IP_BIN_LOGO_OFFSET..end)
        .ok_or(MrError::BufferTooSmall {
            needed: end,
            actual,
        })?;
    let warning = oversize_warning(mr.len());
    slot.copy_from_slice(mr);
    Ok(warning)
}

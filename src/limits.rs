use crate::error::MrError;

/// Caps applied before any header-sized buffer is allocated.
///
/// An MR header is 30 bytes of untrusted integers, and a tiny file can claim
/// a huge image. Decoding checks width, height and pixel count as soon as the
/// header is parsed, then checks `max_memory_bytes` against the output buffer:
/// one byte per pixel for [`DecodeRequest::decode_indexed`], three for
/// [`DecodeRequest::decode`].
///
/// Every field defaults to `None`. Encoding applies these on top of the fixed
/// 320x90 ceiling, so they only matter there when set lower.
///
/// [`DecodeRequest::decode`]: crate::DecodeRequest::decode
/// [`DecodeRequest::decode_indexed`]: crate::DecodeRequest::decode_indexed
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Cap on `width * height`, the length of the index buffer.
    pub max_pixels: Option<u64>,
    /// Cap on the decoded output buffer in bytes.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), MrError> {
        let exceeded = |what: &str, value: u64, max: u64| {
            MrError::LimitExceeded(alloc::format!("{what} {value} exceeds limit {max}"))
        };
        if let Some(max) = self.max_width.filter(|&m| u64::from(width) > m) {
            return Err(exceeded("width", width.into(), max));
        }
        if let Some(max) = self.max_height.filter(|&m| u64::from(height) > m) {
            return Err(exceeded("height", height.into(), max));
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max) = self.max_pixels.filter(|&m| pixels > m) {
            return Err(exceeded("pixel count", pixels, max));
        }
        Ok(())
    }

    /// `bytes` is the size of the buffer about to be allocated.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), MrError> {
        match self.max_memory_bytes {
            Some(max) if bytes as u64 > max => Err(MrError::LimitExceeded(alloc::format!(
                "decoded image needs {bytes} bytes, memory limit is {max}"
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited() {
        let limits = Limits::default();
        assert!(limits.check(u32::MAX, u32::MAX).is_ok());
        assert!(limits.check_memory(usize::MAX).is_ok());
    }

    #[test]
    fn boot_logo_fits_logo_sized_limits() {
        let limits = Limits {
            max_width: Some(320),
            max_height: Some(90),
            max_pixels: Some(320 * 90),
            max_memory_bytes: Some(320 * 90 * 3),
        };
        assert!(limits.check(320, 90).is_ok());
        assert!(limits.check_memory(320 * 90 * 3).is_ok());
        assert!(matches!(limits.check(321, 1), Err(MrError::LimitExceeded(_))));
        assert!(matches!(limits.check(1, 91), Err(MrError::LimitExceeded(_))));
        assert!(matches!(
            limits.check_memory(320 * 90 * 3 + 1),
            Err(MrError::LimitExceeded(_))
        ));
    }

    #[test]
    fn pixel_count_limit() {
        let limits = Limits {
            max_pixels: Some(100),
            ..Default::default()
        };
        assert!(limits.check(10, 10).is_ok());
        assert!(matches!(
            limits.check(10, 11),
            Err(MrError::LimitExceeded(_))
        ));
    }
}

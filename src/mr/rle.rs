//! MR run-length bitstream.
//!
//! Each token is one of:
//!
//! | bytes                      | meaning                                  |
//! |----------------------------|------------------------------------------|
//! | `v` (`v < 0x80`)           | single index `v`                         |
//! | `0x80 \| n`, `v`           | `n` copies of `v` (short run)            |
//! | `0x81`, `n`, `v`           | `n` copies of `v`, `n <= 255`            |
//! | `0x82`, `0x80 \| m`, `v`   | `256 + m` copies of `v`, `m <= 127`      |
//!
//! The short-run tag `0x82` overlaps the long-run tag; the second byte decides:
//! a value below `0x80` makes it a run of two, anything else a long run.

use alloc::vec::Vec;

use enough::Stop;

use super::Permissiveness;
use crate::error::MrError;
use crate::logging::trace;

/// Longest run a single token can express.
pub const MAX_RUN: usize = 0x17f;

const TAG_BASE: u8 = 0x80;
const TAG_EXTENDED: u8 = 0x81;
const TAG_LONG: u8 = 0x82;

/// One decoded unit of the bitstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A bare index byte below `0x80`.
    Literal(u8),
    /// `0x80 | len`, value. Length `0..=127`.
    ShortRun { len: u8, value: u8 },
    /// `0x81`, len, value. Length `0..=255`.
    ExtendedRun { len: u8, value: u8 },
    /// `0x82`, `0x80 | (len - 256)`, value. Length `256..=383`.
    LongRun { len: u16, value: u8 },
}

impl Token {
    /// Pick the token for a run of `run` copies of `value`.
    ///
    /// `run` must be in `1..=MAX_RUN`. Values of `0x80` and above cannot be
    /// literals, and a two-long run of them would read back as a long-run tag,
    /// so runs of one or two such values use the extended form.
    pub fn for_run(run: usize, value: u8) -> Token {
        debug_assert!((1..=MAX_RUN).contains(&run));
        let high = value >= TAG_BASE;
        match run {
            1 if !high => Token::Literal(value),
            1 | 2 if high => Token::ExtendedRun {
                len: run as u8,
                value,
            },
            2..=0x7f => Token::ShortRun {
                len: run as u8,
                value,
            },
            0x80..=0xff => Token::ExtendedRun {
                len: run as u8,
                value,
            },
            _ => Token::LongRun {
                len: run.min(MAX_RUN) as u16,
                value,
            },
        }
    }

    /// Number of output indices this token produces.
    pub fn run_len(&self) -> usize {
        match *self {
            Token::Literal(_) => 1,
            Token::ShortRun { len, .. } | Token::ExtendedRun { len, .. } => usize::from(len),
            Token::LongRun { len, .. } => usize::from(len),
        }
    }

    pub fn value(&self) -> u8 {
        match *self {
            Token::Literal(value)
            | Token::ShortRun { value, .. }
            | Token::ExtendedRun { value, .. }
            | Token::LongRun { value, .. } => value,
        }
    }

    /// Number of bitstream bytes this token occupies.
    pub fn encoded_len(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::ShortRun { .. } => 2,
            Token::ExtendedRun { .. } | Token::LongRun { .. } => 3,
        }
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        match *self {
            Token::Literal(value) => out.push(value),
            Token::ShortRun { len, value } => {
                out.extend_from_slice(&[TAG_BASE | len, value]);
            }
            Token::ExtendedRun { len, value } => {
                out.extend_from_slice(&[TAG_EXTENDED, len, value]);
            }
            Token::LongRun { len, value } => {
                let extra = len.saturating_sub(0x100) as u8 & 0x7f;
                out.extend_from_slice(&[TAG_LONG, TAG_BASE | extra, value]);
            }
        }
    }

    /// Read the token starting at `data[pos]`. Returns the token and the number
    /// of bytes it consumed.
    pub fn read(data: &[u8], pos: usize) -> Result<(Token, usize), MrError> {
        let b0 = *data.get(pos).ok_or(MrError::MalformedStream {
            offset: pos,
            reason: "read past end of stream",
        })?;
        if b0 < TAG_BASE {
            return Ok((Token::Literal(b0), 1));
        }
        let b1 = *data.get(pos + 1).ok_or(MrError::MalformedStream {
            offset: pos,
            reason: "run tag without a second byte",
        })?;
        let long = b0 == TAG_EXTENDED || (b0 == TAG_LONG && b1 >= TAG_BASE);
        if !long {
            return Ok((
                Token::ShortRun {
                    len: b0 - TAG_BASE,
                    value: b1,
                },
                2,
            ));
        }
        let value = *data.get(pos + 2).ok_or(MrError::MalformedStream {
            offset: pos,
            reason: "run tag without a value byte",
        })?;
        let token = if b0 == TAG_EXTENDED {
            Token::ExtendedRun { len: b1, value }
        } else {
            Token::LongRun {
                len: u16::from(b1 - TAG_BASE) + 0x100,
                value,
            }
        };
        Ok((token, 3))
    }
}

/// Compress an index buffer. Greedy, left to right, runs capped at [`MAX_RUN`].
pub fn compress(indices: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(indices.len() / 2 + 8);
    let mut pos = 0;
    while pos < indices.len() {
        let value = indices[pos];
        let run = indices[pos..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == value)
            .count();
        Token::for_run(run, value).write(&mut out);
        pos += run;
    }
    out
}

/// Decompress `data` into exactly `expected_len` indices.
///
/// `expected_len` usually comes from an untrusted header; an allocation the
/// allocator refuses is reported as [`MrError::LimitExceeded`]. Writes past `expected_len` are dropped. Real files routinely end with a run
/// one index too long, so under [`Permissiveness::Standard`] that is accepted
/// silently, and so is a stream that stops short (the tail stays index 0).
/// [`Permissiveness::Strict`] rejects both. [`Permissiveness::Permissive`] also
/// stops quietly at a truncated trailing token.
pub fn decompress(
    data: &[u8],
    expected_len: usize,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<Vec<u8>, MrError> {
    let mut out = super::try_zeroed(expected_len)?;
    decompress_into(data, &mut out, permissiveness, stop)?;
    Ok(out)
}

/// Like [`decompress`], but into a caller-supplied buffer whose length is the
/// expected index count. Returns the total run length the stream described,
/// which may exceed `out.len()`.
pub fn decompress_into(
    data: &[u8],
    out: &mut [u8],
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<usize, MrError> {
    let mut pos = 0usize;
    let mut written = 0usize;
    let mut check_counter = 0u32;

    while pos < data.len() {
        check_counter += 1;
        if check_counter % 1024 == 0 {
            stop.check()?;
        }

        let (token, consumed) = match Token::read(data, pos) {
            Ok(t) => t,
            Err(e) if permissiveness == Permissiveness::Permissive => {
                trace!("mr: ignoring truncated token at stream offset {pos}: {e}");
                break;
            }
            Err(e) => return Err(e),
        };
        pos += consumed;

        let start = written.min(out.len());
        let end = written.saturating_add(token.run_len()).min(out.len());
        out[start..end].fill(token.value());
        written = written.saturating_add(token.run_len());
    }

    if written != out.len() {
        if permissiveness == Permissiveness::Strict {
            return Err(MrError::MalformedStream {
                offset: pos,
                reason: if written > out.len() {
                    "runs extend past the image"
                } else {
                    "stream ends before the image is complete"
                },
            });
        }
        if written > out.len() {
            trace!("mr: dropped {} index bytes past end of image", written - out.len());
        } else {
            trace!("mr: stream short by {} indices, zero-filled", out.len() - written);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use enough::Unstoppable;

    fn run(len: usize, value: u8) -> Vec<u8> {
        vec![value; len]
    }

    #[test]
    fn run_boundaries_produce_exact_tokens() {
        assert_eq!(compress(&run(1, 5)), [5]);
        assert_eq!(compress(&run(2, 5)), [0x82, 5]);
        assert_eq!(compress(&run(127, 5)), [0xff, 5]);
        assert_eq!(compress(&run(128, 5)), [0x81, 128, 5]);
        assert_eq!(compress(&run(255, 5)), [0x81, 255, 5]);
        assert_eq!(compress(&run(256, 5)), [0x82, 0x80, 5]);
        assert_eq!(compress(&run(383, 5)), [0x82, 0xff, 5]);
    }

    #[test]
    fn run_of_384_splits_into_long_run_and_literal() {
        assert_eq!(compress(&run(384, 7)), [0x82, 0xff, 7, 7]);
    }

    #[test]
    fn mixed_sequence() {
        let input = [1, 2, 2, 2, 3, 0, 0];
        let packed = compress(&input);
        assert_eq!(packed, [1, 0x83, 2, 3, 0x82, 0]);
        let unpacked = decompress(&packed, input.len(), Permissiveness::Strict, &Unstoppable);
        assert_eq!(unpacked.unwrap(), input);
    }

    #[test]
    fn unallocatable_length_is_an_error() {
        let result = decompress(&[0x82, 0], usize::MAX, Permissiveness::Standard, &Unstoppable);
        assert!(matches!(result, Err(MrError::LimitExceeded(_))));
    }

    #[test]
    fn empty_input() {
        assert!(compress(&[]).is_empty());
        let out = decompress(&[], 0, Permissiveness::Strict, &Unstoppable).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn tag_0x82_disambiguated_by_second_byte() {
        assert_eq!(
            Token::read(&[0x82, 0x10], 0).unwrap(),
            (Token::ShortRun { len: 2, value: 0x10 }, 2)
        );
        assert_eq!(
            Token::read(&[0x82, 0x85, 9], 0).unwrap(),
            (Token::LongRun { len: 261, value: 9 }, 3)
        );
    }

    #[test]
    fn tag_0x80_is_an_empty_run() {
        let out = decompress(&[0x80, 4, 3], 1, Permissiveness::Strict, &Unstoppable).unwrap();
        assert_eq!(out, [3]);
    }

    #[test]
    fn high_values_survive_round_trip() {
        let input = [0x90, 0x90, 0xaa, 0x05, 0xff, 0xff, 0xff];
        let packed = compress(&input);
        assert_eq!(packed[..3], [0x81, 2, 0x90]);
        let out = decompress(&packed, input.len(), Permissiveness::Strict, &Unstoppable);
        assert_eq!(out.unwrap(), input);
    }

    #[test]
    fn overrun_by_one_is_truncated() {
        // Image of 4 indices, stream describes 5.
        let stream = [0x85, 3];
        let out = decompress(&stream, 4, Permissiveness::Standard, &Unstoppable).unwrap();
        assert_eq!(out, [3, 3, 3, 3]);

        let mut buf = [0u8; 4];
        let total =
            decompress_into(&stream, &mut buf, Permissiveness::Standard, &Unstoppable).unwrap();
        assert_eq!(total, 5);
    }

    #[test]
    fn overrun_rejected_when_strict() {
        let err = decompress(&[0x85, 3], 4, Permissiveness::Strict, &Unstoppable).unwrap_err();
        assert!(matches!(err, MrError::MalformedStream { .. }));
    }

    #[test]
    fn underrun_zero_fills() {
        let out = decompress(&[0x83, 1], 5, Permissiveness::Standard, &Unstoppable).unwrap();
        assert_eq!(out, [1, 1, 1, 0, 0]);
    }

    #[test]
    fn truncated_tags_are_malformed() {
        for stream in [&[0x85][..], &[0x81, 3], &[0x82, 0x90], &[0x82]] {
            let err = decompress(stream, 8, Permissiveness::Standard, &Unstoppable).unwrap_err();
            assert!(
                matches!(err, MrError::MalformedStream { offset: 0, .. }),
                "stream {stream:x?} gave {err:?}"
            );
        }
    }

    #[test]
    fn truncated_tail_tolerated_when_permissive() {
        let out = decompress(&[2, 0x81], 3, Permissiveness::Permissive, &Unstoppable).unwrap();
        assert_eq!(out, [2, 0, 0]);
    }

    #[test]
    fn every_token_reads_back() {
        for len in 1..=MAX_RUN {
            for value in [0u8, 0x7f, 0x80, 0xff] {
                let token = Token::for_run(len, value);
                let mut bytes = Vec::new();
                token.write(&mut bytes);
                assert_eq!(bytes.len(), token.encoded_len());
                let (back, consumed) = Token::read(&bytes, 0).unwrap();
                assert_eq!(consumed, bytes.len());
                assert_eq!((back.run_len(), back.value()), (len, value));
            }
        }
    }
}

//! UTF-8 to UCS-4 decoding
//!
//! Decodes the legacy variable-length form (1-6 byte sequences,
//! values up to 31 bits). This is a character decoder, not a validator:
//! overlong forms and malformed continuation bytes are passed through.
//! Decoding stops at a NUL byte, at the end of input, at an invalid
//! lead byte, or at a sequence cut short by either of the first two.

/// Decode the code point at the start of `bytes`
///
/// Returns `(codepoint, bytes consumed)`, or `None` when the caller
/// must stop consuming. A sequence that decodes to 0 also stops.
pub fn decode_one(bytes: &[u8]) -> Option<(u32, usize)> {
    let lead = *bytes.first()?;
    let (len, bits) = match lead {
        0x00 | 0x80..=0xBF | 0xFE..=0xFF => return None,
        0x01..=0x7F => return Some((lead as u32, 1)),
        0xC0..=0xDF => (2, lead & 0x1F),
        0xE0..=0xEF => (3, lead & 0x0F),
        0xF0..=0xF7 => (4, lead & 0x07),
        0xF8..=0xFB => (5, lead & 0x03),
        0xFC..=0xFD => (6, lead & 0x01),
    };

    let mut cp = bits as u32;
    for i in 1..len {
        let b = *bytes.get(i)?;
        if b == 0 {
            return None;
        }
        cp = (cp << 6) | (b & 0x3F) as u32;
    }

    if cp == 0 {
        return None;
    }
    Some((cp, len))
}

/// Lazy code point iterator over a byte run
///
/// Finite and non-restartable: once a stop condition is hit the
/// iterator stays exhausted. `position()` reports the byte cursor.
#[derive(Debug, Clone)]
pub struct Utf8Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Utf8Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            done: false,
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed (including whatever stopped decoding)
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

impl Iterator for Utf8Decoder<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.done {
            return None;
        }
        match decode_one(&self.bytes[self.pos..]) {
            Some((cp, len)) => {
                self.pos += len;
                Some(cp)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for Utf8Decoder<'_> {}

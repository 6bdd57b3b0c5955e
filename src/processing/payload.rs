//! # Payload Framing
//!
//! A hidden message is framed as `message bytes ++ DELIMITER` and expanded
//! to bits, most-significant bit first. There is no length prefix: the
//! extractor reads bytes until the delimiter shows up.

/// Terminator appended to every embedded message.
pub const DELIMITER: &[u8] = b"<<<END_OF_MESSAGE>>>";

/// Append the delimiter to `message`.
pub fn frame_message(message: &str) -> Vec<u8> {
    let mut framed = Vec::with_capacity(message.len() + DELIMITER.len());
    framed.extend_from_slice(message.as_bytes());
    framed.extend_from_slice(DELIMITER);
    framed
}

/// Length in bytes of the framed form of `message`.
pub fn framed_len(message: &str) -> usize {
    message.len() + DELIMITER.len()
}

/// Iterate over the bits of `bytes`, MSB first.
pub fn bits_msb_first(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
}

/// Incremental decoder fed one bit at a time by the extractor.
///
/// Bits are grouped into bytes; after every completed byte the tail of the
/// buffer is compared against [`DELIMITER`].
#[derive(Debug, Default)]
pub struct DelimiterScanner {
    buffer: Vec<u8>,
    current: u8,
    bit_count: u8,
}

impl DelimiterScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one bit (only the lowest bit of `bit` is used).
    ///
    /// Returns `true` once the buffer ends with the delimiter. A trailing
    /// partial byte is never completed and never matches.
    pub fn push_bit(&mut self, bit: u8) -> bool {
        self.current = (self.current << 1) | (bit & 1);
        self.bit_count += 1;

        if self.bit_count < 8 {
            return false;
        }

        self.buffer.push(self.current);
        self.current = 0;
        self.bit_count = 0;
        self.buffer.ends_with(DELIMITER)
    }

    /// Number of complete bytes decoded so far.
    pub fn decoded_len(&self) -> usize {
        self.buffer.len()
    }

    /// Consume the scanner and return the bytes before the delimiter, or
    /// `None` if the delimiter was never completed.
    pub fn into_message(mut self) -> Option<Vec<u8>> {
        if !self.buffer.ends_with(DELIMITER) {
            return None;
        }
        self.buffer.truncate(self.buffer.len() - DELIMITER.len());
        Some(self.buffer)
    }
}

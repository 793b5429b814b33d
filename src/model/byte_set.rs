//! Compact set of byte values.
//!
//! A [`ByteSet`] records which of the 256 possible byte values occur in a
//! buffer. Order and multiplicity are irrelevant, which is exactly what the
//! encoding heuristics need: they only ask whether a buffer contains *any*
//! byte from a reference set.

use std::fmt;

use crate::error::DetectError;

/// A set of byte values backed by a 256-bit bitmap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteSet {
    bits: [u64; 4],
}

impl ByteSet {
    /// The empty set.
    pub const EMPTY: ByteSet = ByteSet { bits: [0; 4] };

    /// Build a set from a slice of byte values. Usable in `const` context.
    pub const fn from_slice(bytes: &[u8]) -> Self {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            bits[(b >> 6) as usize] |= 1u64 << (b & 63);
            i += 1;
        }
        ByteSet { bits }
    }

    /// Collect the distinct byte values present in `content`.
    pub fn from_bytes(content: &[u8]) -> Self {
        let mut set = ByteSet::EMPTY;
        for &b in content {
            set.insert(b);
        }
        set
    }

    /// Parse a list of two-hex-digit tokens (`"b1"`, `"9C"`).
    ///
    /// Every token must be non-empty and consist of exactly two ASCII hex
    /// digits. Duplicate tokens collapse into a single member.
    pub fn from_hex_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, DetectError> {
        let mut set = ByteSet::EMPTY;
        for (index, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            if token.is_empty() {
                return Err(DetectError::EmptyToken { index });
            }
            // from_str_radix alone would accept a leading '+'
            if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(DetectError::InvalidHexToken {
                    index,
                    token: token.to_string(),
                });
            }
            let byte = u8::from_str_radix(token, 16).map_err(|_| DetectError::InvalidHexToken {
                index,
                token: token.to_string(),
            })?;
            set.insert(byte);
        }
        Ok(set)
    }

    /// Add a byte value to the set.
    pub fn insert(&mut self, byte: u8) {
        self.bits[(byte >> 6) as usize] |= 1u64 << (byte & 63);
    }

    /// Check whether `byte` is a member.
    pub const fn contains(&self, byte: u8) -> bool {
        self.bits[(byte >> 6) as usize] & (1u64 << (byte & 63)) != 0
    }

    /// True if the two sets share at least one member.
    pub fn intersects(&self, other: &ByteSet) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .any(|(a, b)| a & b != 0)
    }

    /// Number of distinct byte values in the set.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    /// Iterate over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |b| self.contains(*b))
    }
}

impl FromIterator<u8> for ByteSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = ByteSet::EMPTY;
        for b in iter {
            set.insert(b);
        }
        set
    }
}

impl fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(|b| format!("{:#04x}", b)))
            .finish()
    }
}

//! Encoding detection heuristics
//!
//! This module contains the reference byte sets used to tell ISO-8859-2 and
//! Windows-1250 apart for Polish text. Both code pages place the Polish
//! letters in the upper half of the byte range, but six of the eighteen
//! letters sit at different positions. Those six are the specific
//! indicators for each code page; the remaining twelve are shared.

use super::byte_set::ByteSet;

/// ISO-8859-2 specific bytes (undefined or different in Windows-1250)
///
/// - `0xB1` = ą, `0xB6` = ś, `0xBC` = ź
/// - `0xA1` = Ą, `0xA6` = Ś, `0xAC` = Ź
pub const SPECIFIC_ISO_8859_2: ByteSet =
    ByteSet::from_slice(&[0xB1, 0xB6, 0xBC, 0xA1, 0xA6, 0xAC]);

/// Windows-1250 specific bytes (different in ISO-8859-2)
///
/// - `0xB9` = ą, `0x9C` = ś, `0x9F` = ź
/// - `0xA5` = Ą, `0x8C` = Ś, `0x8F` = Ź
///
/// The `0x80-0x9F` members are C1 control codes in ISO-8859-2, so they never
/// appear in real ISO-8859-2 text.
pub const SPECIFIC_WINDOWS_1250: ByteSet =
    ByteSet::from_slice(&[0xB9, 0x9C, 0x9F, 0xA5, 0x8C, 0x8F]);

/// Bytes with the same Polish letter in both code pages
///
/// - `0xE6` = ć, `0xEA` = ę, `0xB3` = ł, `0xF1` = ń, `0xF3` = ó, `0xBF` = ż
/// - `0xC6` = Ć, `0xCA` = Ę, `0xA3` = Ł, `0xD1` = Ń, `0xD3` = Ó, `0xAF` = Ż
///
/// Their presence points at a legacy code page but not at which one.
pub const SHARED_LEGACY: ByteSet = ByteSet::from_slice(&[
    0xE6, 0xEA, 0xB3, 0xF1, 0xF3, 0xBF, 0xC6, 0xCA, 0xA3, 0xD1, 0xD3, 0xAF,
]);

/// True iff `observed` and `reference` share at least one byte.
pub fn has_any(observed: &ByteSet, reference: &ByteSet) -> bool {
    observed.intersects(reference)
}

/// Check if the observed bytes contain an ISO-8859-2 specific Polish letter.
pub fn has_iso_8859_2_pattern(observed: &ByteSet) -> bool {
    has_any(observed, &SPECIFIC_ISO_8859_2)
}

/// Check if the observed bytes contain a Windows-1250 specific Polish letter.
pub fn has_windows1250_pattern(observed: &ByteSet) -> bool {
    has_any(observed, &SPECIFIC_WINDOWS_1250)
}

/// Check if the observed bytes contain a Polish letter common to both code pages.
pub fn has_shared_legacy_pattern(observed: &ByteSet) -> bool {
    has_any(observed, &SHARED_LEGACY)
}

/// Single-byte form of [`has_iso_8859_2_pattern`], used when re-classifying
/// a mixed buffer one byte at a time.
pub fn is_iso_8859_2_specific(byte: u8) -> bool {
    SPECIFIC_ISO_8859_2.contains(byte)
}

//! Property-based tests for encoding detection and conversion.
//!
//! Buffers are assembled from four byte pools:
//! - neutral ASCII (in none of the reference sets, valid UTF-8)
//! - ISO-8859-2 specific Polish letters
//! - Windows-1250 specific Polish letters
//! - letters shared by both code pages
//!
//! The expected state follows directly from which pools were used, and the
//! expected conversion is computed with `encoding_rs` as an oracle.

use ogonki::model::encoding_heuristics::{
    SHARED_LEGACY, SPECIFIC_ISO_8859_2, SPECIFIC_WINDOWS_1250,
};
use ogonki::{detect_state, ByteSet, DetectError, DetectedState, Detection, ObservedBytes};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

fn pool(set: &ByteSet) -> Vec<u8> {
    set.iter().collect()
}

fn ascii_bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0x00u8..0x80, 0..max)
}

fn bytes_from(set: ByteSet, min: usize, max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(pool(&set)), min..max)
}

/// Concatenate the parts and shuffle them so position never matters.
fn shuffled(parts: Vec<Vec<u8>>) -> impl Strategy<Value = Vec<u8>> {
    Just(parts.concat()).prop_shuffle()
}

fn decode(encoding: &'static encoding_rs::Encoding, bytes: &[u8]) -> Vec<u8> {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned().into_bytes()
}

/// Byte-by-byte oracle for mixed buffers.
fn decode_mixed(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&b| {
            if SPECIFIC_ISO_8859_2.contains(b) {
                decode(encoding_rs::ISO_8859_2, &[b])
            } else {
                decode(encoding_rs::WINDOWS_1250, &[b])
            }
        })
        .collect()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// ISO-8859-2 specific bytes without Windows-1250 ones always win,
    /// whatever shared letters surround them.
    #[test]
    fn prop_iso_specific_only_is_iso(
        content in (ascii_bytes(50), bytes_from(SPECIFIC_ISO_8859_2, 1, 10), bytes_from(SHARED_LEGACY, 0, 10))
            .prop_flat_map(|(a, b, c)| shuffled(vec![a, b, c]))
    ) {
        let mut detection = Detection::detect(content.clone()).unwrap();
        prop_assert_eq!(detection.state(), DetectedState::Iso8859_2);
        prop_assert_eq!(detection.is_encode("ISO-8859-2"), Ok(true));
        let expected = decode(encoding_rs::ISO_8859_2, &content);
        prop_assert_eq!(detection.converted(), Some(expected.as_slice()));
    }

    #[test]
    fn prop_windows1250_specific_only_is_windows1250(
        content in (ascii_bytes(50), bytes_from(SPECIFIC_WINDOWS_1250, 1, 10), bytes_from(SHARED_LEGACY, 0, 10))
            .prop_flat_map(|(a, b, c)| shuffled(vec![a, b, c]))
    ) {
        let mut detection = Detection::detect(content.clone()).unwrap();
        prop_assert_eq!(detection.state(), DetectedState::Windows1250);
        let expected = decode(encoding_rs::WINDOWS_1250, &content);
        prop_assert_eq!(detection.converted(), Some(expected.as_slice()));
    }

    /// Specific bytes of both code pages mean a mixed buffer, regardless of
    /// how many there are or where they sit.
    #[test]
    fn prop_both_specific_sets_is_mixed(
        content in (
            ascii_bytes(30),
            bytes_from(SPECIFIC_ISO_8859_2, 1, 8),
            bytes_from(SPECIFIC_WINDOWS_1250, 1, 8),
            bytes_from(SHARED_LEGACY, 0, 8),
        )
            .prop_flat_map(|(a, b, c, d)| shuffled(vec![a, b, c, d]))
    ) {
        let mut detection = Detection::detect(content.clone()).unwrap();
        prop_assert_eq!(detection.state(), DetectedState::Mixed);
        prop_assert_eq!(detection.label(), None);
        let expected = decode_mixed(&content);
        prop_assert_eq!(detection.converted(), Some(expected.as_slice()));
    }

    /// Shared letters alone are ambiguous and convert as ISO-8859-2.
    #[test]
    fn prop_shared_only_is_ambiguous(
        content in (ascii_bytes(50), bytes_from(SHARED_LEGACY, 1, 20))
            .prop_flat_map(|(a, b)| shuffled(vec![a, b]))
    ) {
        let mut detection = Detection::detect(content.clone()).unwrap();
        prop_assert_eq!(detection.state(), DetectedState::Ambiguous);
        let expected = decode(encoding_rs::ISO_8859_2, &content);
        prop_assert_eq!(detection.converted(), Some(expected.as_slice()));
    }

    /// UTF-8 text that avoids the reference sets is returned byte-identical.
    #[test]
    fn prop_utf8_identity(text in "[a-zA-Z0-9 \n\u{e9}\u{f8}]{1,200}") {
        let mut detection = Detection::detect(text.clone().into_bytes()).unwrap();
        prop_assert_eq!(detection.state(), DetectedState::Utf8);
        prop_assert!(detection.is_utf8());
        prop_assert_eq!(detection.converted_str(), Some(text.as_str()));
    }

    /// For arbitrary bytes: the session agrees with `detect_state`, the
    /// conversion is memoized, and every produced output is valid UTF-8.
    #[test]
    fn prop_arbitrary_bytes_are_consistent(content in prop::collection::vec(any::<u8>(), 1..200)) {
        let observed = ByteSet::from_bytes(&content);
        let mut detection = Detection::detect(content.clone()).unwrap();
        prop_assert_eq!(detection.state(), detect_state(&observed, &content));
        prop_assert_eq!(detection.observed(), &observed);

        let first = detection.converted().map(|bytes| bytes.as_ptr());
        let second = detection.converted().map(|bytes| bytes.as_ptr());
        prop_assert_eq!(first, second);

        if detection.state() == DetectedState::Unrecognized {
            prop_assert_eq!(detection.converted(), None);
        } else {
            prop_assert!(detection.converted_str().is_some());
        }
    }

    /// Hex tokens in either case parse back to the same set.
    #[test]
    fn prop_hex_tokens_parse(bytes in prop::collection::vec(any::<u8>(), 1..40), upper in any::<bool>()) {
        let tokens: Vec<String> = bytes
            .iter()
            .map(|b| if upper { format!("{:02X}", b) } else { format!("{:02x}", b) })
            .collect();
        let parsed = ByteSet::from_hex_tokens(&tokens).unwrap();
        prop_assert_eq!(parsed, bytes.iter().copied().collect::<ByteSet>());
    }
}

// ============================================================================
// EXAMPLES
// ============================================================================

#[test]
fn example_mixed_pair() {
    let mut detection = Detection::detect(vec![0xB1, 0xB9]).unwrap();
    assert_eq!(detection.state(), DetectedState::Mixed);
    let converted = detection.converted_str().unwrap();
    assert_eq!(converted.chars().count(), 2);
    assert_eq!(converted, "ąą");
}

#[test]
fn example_ambiguous_pair() {
    let mut detection = Detection::detect(vec![0xE6, 0xF3]).unwrap();
    assert_eq!(detection.state(), DetectedState::Ambiguous);
    assert_eq!(detection.converted_str(), Some("ćó"));
}

#[test]
fn example_empty_buffer() {
    let err = Detection::detect(Vec::new()).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn example_non_hex_override() {
    let err = Detection::new(
        b"text".to_vec(),
        None,
        ObservedBytes::Tokens(vec!["zz".to_string()]),
    )
    .unwrap_err();
    assert!(err.is_invalid_input());
    assert!(matches!(err, DetectError::InvalidHexToken { .. }));
}

#[test]
fn example_pangram_in_each_code_page() {
    // "Zażółć gęślą jaźń" in ISO-8859-2 and Windows-1250
    let iso: &[u8] = &[
        0x5A, 0x61, 0xBF, 0xF3, 0xB3, 0xE6, 0x20, // "Zażółć "
        0x67, 0xEA, 0xB6, 0x6C, 0xB1, 0x20, // "gęślą "
        0x6A, 0x61, 0xBC, 0xF1, // "jaźń"
    ];
    let win: &[u8] = &[
        0x5A, 0x61, 0xBF, 0xF3, 0xB3, 0xE6, 0x20, // "Zażółć "
        0x67, 0xEA, 0x9C, 0x6C, 0xB9, 0x20, // "gęślą "
        0x6A, 0x61, 0x9F, 0xF1, // "jaźń"
    ];

    let mut iso_detection = Detection::detect(iso.to_vec()).unwrap();
    let mut win_detection = Detection::detect(win.to_vec()).unwrap();
    assert_eq!(iso_detection.state(), DetectedState::Iso8859_2);
    assert_eq!(win_detection.state(), DetectedState::Windows1250);
    assert_eq!(iso_detection.converted_str(), Some("Zażółć gęślą jaźń"));
    assert_eq!(win_detection.converted_str(), Some("Zażółć gęślą jaźń"));
}

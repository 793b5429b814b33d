//! Encoding detection and conversion to UTF-8.
//!
//! A [`Detection`] owns one buffer of unknown encoding. Construction decides
//! which of the six [`DetectedState`]s applies; [`Detection::converted`]
//! lazily produces the UTF-8 form and caches it.
//!
//! # Example
//!
//! ```
//! use ogonki::{DetectedState, Detection};
//!
//! // "ąą": first byte is ISO-8859-2, second is Windows-1250
//! let mut detection = Detection::detect(vec![0xB1, 0xB9]).unwrap();
//! assert_eq!(detection.state(), DetectedState::Mixed);
//! assert_eq!(detection.converted(), Some("ąą".as_bytes()));
//! ```

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::byte_set::ByteSet;
use super::encoding::{is_valid_utf8, Encoding};
use super::encoding_heuristics::{
    has_iso_8859_2_pattern, has_shared_legacy_pattern, has_windows1250_pattern,
    is_iso_8859_2_specific,
};
use crate::error::DetectError;

/// Outcome of classifying a buffer.
///
/// The numeric codes (`state as u8`) are stable and accepted by
/// [`DetectedState::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[repr(u8)]
pub enum DetectedState {
    /// Valid UTF-8 without any Polish legacy byte
    #[serde(rename = "utf-8")]
    Utf8 = 0,
    /// Contains ISO-8859-2 specific bytes only
    #[serde(rename = "iso-8859-2")]
    Iso8859_2 = 1,
    /// Contains Windows-1250 specific bytes only
    #[serde(rename = "windows-1250")]
    Windows1250 = 2,
    /// Contains specific bytes of both code pages (a corrupted buffer)
    #[serde(rename = "mixed")]
    Mixed = 3,
    /// Contains only bytes shared by both code pages
    #[serde(rename = "ambiguous")]
    Ambiguous = 4,
    /// No signal matched and the buffer is not valid UTF-8
    #[serde(rename = "unrecognized")]
    Unrecognized = 5,
}

impl DetectedState {
    pub const ALL: [DetectedState; 6] = [
        DetectedState::Utf8,
        DetectedState::Iso8859_2,
        DetectedState::Windows1250,
        DetectedState::Mixed,
        DetectedState::Ambiguous,
        DetectedState::Unrecognized,
    ];

    /// Short name, also accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            DetectedState::Utf8 => "utf-8",
            DetectedState::Iso8859_2 => "iso-8859-2",
            DetectedState::Windows1250 => "windows-1250",
            DetectedState::Mixed => "mixed",
            DetectedState::Ambiguous => "ambiguous",
            DetectedState::Unrecognized => "unrecognized",
        }
    }

    /// The single encoding this state resolves to, if any.
    pub fn encoding(&self) -> Option<Encoding> {
        match self {
            DetectedState::Utf8 => Some(Encoding::Utf8),
            DetectedState::Iso8859_2 => Some(Encoding::Iso8859_2),
            DetectedState::Windows1250 => Some(Encoding::Windows1250),
            DetectedState::Mixed | DetectedState::Ambiguous | DetectedState::Unrecognized => None,
        }
    }

    /// Whether a caller may assert this state instead of running detection.
    pub fn is_assertable(&self) -> bool {
        !matches!(self, DetectedState::Unrecognized)
    }
}

impl fmt::Display for DetectedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for DetectedState {
    type Error = DetectError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        DetectedState::ALL
            .into_iter()
            .find(|state| *state as u8 == code)
            .ok_or(DetectError::UnknownStateCode(code))
    }
}

impl FromStr for DetectedState {
    type Err = DetectError;

    /// Parses a state name (case-insensitive) or its numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return DetectedState::try_from(code);
        }
        DetectedState::ALL
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DetectError::UnknownState(s.to_string()))
    }
}

/// Where the observed byte set comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ObservedBytes {
    /// Collect the distinct bytes of the content.
    #[default]
    FromContent,
    /// Use an explicit list of two-hex-digit tokens instead. An empty list
    /// behaves like [`ObservedBytes::FromContent`].
    Tokens(Vec<String>),
}

impl ObservedBytes {
    fn resolve(&self, content: &[u8]) -> Result<ByteSet, DetectError> {
        match self {
            ObservedBytes::Tokens(tokens) if !tokens.is_empty() => {
                ByteSet::from_hex_tokens(tokens)
            }
            _ => Ok(ByteSet::from_bytes(content)),
        }
    }
}

/// Whether the state was derived from the content or supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateOrigin {
    Detected,
    Asserted,
}

/// Classify a buffer from its observed bytes.
///
/// Code-page specific bytes dominate, and both kinds together mean the
/// buffer is corrupted. Shared bytes are consulted next, and only then is
/// the content itself validated as UTF-8.
pub fn detect_state(observed: &ByteSet, content: &[u8]) -> DetectedState {
    let iso = has_iso_8859_2_pattern(observed);
    let win = has_windows1250_pattern(observed);

    if iso && win {
        DetectedState::Mixed
    } else if iso {
        DetectedState::Iso8859_2
    } else if win {
        DetectedState::Windows1250
    } else if has_shared_legacy_pattern(observed) {
        DetectedState::Ambiguous
    } else if is_valid_utf8(content) {
        DetectedState::Utf8
    } else {
        DetectedState::Unrecognized
    }
}

/// Decode a corrupted buffer one byte at a time: ISO-8859-2 specific bytes
/// as ISO-8859-2, everything else as Windows-1250.
fn mixed_to_utf8(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() * 2);
    for &byte in content {
        let encoding = if is_iso_8859_2_specific(byte) {
            Encoding::Iso8859_2
        } else {
            Encoding::Windows1250
        };
        if !byte.is_ascii() {
            tracing::trace!("Mixed content byte {:#04x} decoded as {}", byte, encoding);
        }
        out.extend_from_slice(&encoding.decode_to_utf8(&[byte]));
    }
    out
}

#[derive(Debug, Clone)]
enum Converted {
    /// Content is already UTF-8
    Passthrough,
    Transcoded(Vec<u8>),
    Unavailable,
}

/// Detection session for a single buffer.
#[derive(Debug, Clone)]
pub struct Detection {
    content: Vec<u8>,
    observed: ByteSet,
    state: DetectedState,
    origin: StateOrigin,
    label: Option<Encoding>,
    /// Filled on first call to `converted`
    converted: Option<Converted>,
}

impl Detection {
    /// Create a session.
    ///
    /// `state` skips detection and adopts the given state; it may be any
    /// state except [`DetectedState::Unrecognized`]. `observed` chooses
    /// where the observed byte set comes from.
    pub fn new(
        content: impl Into<Vec<u8>>,
        state: Option<DetectedState>,
        observed: ObservedBytes,
    ) -> Result<Self, DetectError> {
        let content = content.into();
        if content.is_empty() {
            return Err(DetectError::EmptyContent);
        }

        let observed = observed.resolve(&content)?;

        let (state, origin) = match state {
            Some(state) if !state.is_assertable() => {
                return Err(DetectError::UnsupportedState(state));
            }
            Some(state) => {
                tracing::debug!("Encoding state {} asserted by caller", state);
                (state, StateOrigin::Asserted)
            }
            None => {
                let state = detect_state(&observed, &content);
                tracing::debug!(
                    "Detected {} from {} distinct bytes in {} byte buffer",
                    state,
                    observed.len(),
                    content.len()
                );
                (state, StateOrigin::Detected)
            }
        };

        Ok(Self {
            content,
            observed,
            state,
            origin,
            label: state.encoding(),
            converted: None,
        })
    }

    /// Create a session running detection on the content's own bytes.
    pub fn detect(content: impl Into<Vec<u8>>) -> Result<Self, DetectError> {
        Self::new(content, None, ObservedBytes::FromContent)
    }

    /// Create a session for content whose state is already known.
    pub fn with_state(
        content: impl Into<Vec<u8>>,
        state: DetectedState,
    ) -> Result<Self, DetectError> {
        Self::new(content, Some(state), ObservedBytes::FromContent)
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn observed(&self) -> &ByteSet {
        &self.observed
    }

    pub fn state(&self) -> DetectedState {
        self.state
    }

    pub fn origin(&self) -> StateOrigin {
        self.origin
    }

    /// Canonical encoding, `None` for mixed, ambiguous and unrecognized content.
    pub fn label(&self) -> Option<Encoding> {
        self.label
    }

    /// Compare the canonical encoding with `label`.
    ///
    /// Fails for anything but the exact labels `UTF-8`, `ISO-8859-2` and
    /// `WINDOWS-1250`.
    pub fn is_encode(&self, label: &str) -> Result<bool, DetectError> {
        let encoding = Encoding::from_canonical_label(label)?;
        Ok(self.label == Some(encoding))
    }

    pub fn is_utf8(&self) -> bool {
        self.state == DetectedState::Utf8
    }

    pub fn is_iso_8859_2(&self) -> bool {
        self.state == DetectedState::Iso8859_2
    }

    pub fn is_windows1250(&self) -> bool {
        self.state == DetectedState::Windows1250
    }

    /// UTF-8 form of the content, or `None` when the encoding is
    /// unrecognized. Computed once; later calls return the cached bytes.
    pub fn converted(&mut self) -> Option<&[u8]> {
        if self.converted.is_none() {
            self.converted = Some(self.convert());
        }
        match self.converted.as_ref() {
            Some(Converted::Passthrough) => Some(self.content.as_slice()),
            Some(Converted::Transcoded(bytes)) => Some(bytes.as_slice()),
            Some(Converted::Unavailable) | None => None,
        }
    }

    /// Like [`Detection::converted`], but reports the missing result as
    /// [`DetectError::ConversionUnavailable`].
    pub fn try_converted(&mut self) -> Result<&[u8], DetectError> {
        self.converted().ok_or(DetectError::ConversionUnavailable)
    }

    /// The converted output as `str`.
    ///
    /// Also `None` when UTF-8 was asserted for content that is not valid UTF-8.
    pub fn converted_str(&mut self) -> Option<&str> {
        self.converted().and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    fn convert(&self) -> Converted {
        match self.state {
            DetectedState::Utf8 => Converted::Passthrough,
            // Fixed tie-break between the two code pages
            DetectedState::Ambiguous => {
                Converted::Transcoded(Encoding::Iso8859_2.decode_to_utf8(&self.content))
            }
            DetectedState::Mixed => {
                tracing::warn!(
                    "Buffer mixes ISO-8859-2 and Windows-1250 bytes, converting byte by byte"
                );
                Converted::Transcoded(mixed_to_utf8(&self.content))
            }
            DetectedState::Unrecognized => Converted::Unavailable,
            DetectedState::Iso8859_2 => {
                Converted::Transcoded(Encoding::Iso8859_2.decode_to_utf8(&self.content))
            }
            DetectedState::Windows1250 => {
                Converted::Transcoded(Encoding::Windows1250.decode_to_utf8(&self.content))
            }
        }
    }
}

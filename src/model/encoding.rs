//! Encodings understood by the detector, and the transcoding primitives
//! backed by `encoding_rs`.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DetectError;

/// A resolved text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Encoding {
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "ISO-8859-2")]
    Iso8859_2,
    #[serde(rename = "WINDOWS-1250")]
    Windows1250,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [Encoding::Utf8, Encoding::Iso8859_2, Encoding::Windows1250];

    /// Canonical label, e.g. `"ISO-8859-2"`.
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Iso8859_2 => "ISO-8859-2",
            Encoding::Windows1250 => "WINDOWS-1250",
        }
    }

    /// Look up an encoding by its canonical label only. No trimming, case
    /// folding or aliases.
    pub fn from_canonical_label(label: &str) -> Result<Self, DetectError> {
        Encoding::ALL
            .into_iter()
            .find(|e| e.label() == label)
            .ok_or_else(|| DetectError::UnknownEncoding(label.to_string()))
    }

    fn as_encoding_rs(&self) -> &'static encoding_rs::Encoding {
        match self {
            Encoding::Utf8 => encoding_rs::UTF_8,
            Encoding::Iso8859_2 => encoding_rs::ISO_8859_2,
            Encoding::Windows1250 => encoding_rs::WINDOWS_1250,
        }
    }

    /// Decode `bytes` from this encoding and return the UTF-8 bytes.
    ///
    /// A BOM is treated as ordinary content. Malformed input (only possible
    /// for UTF-8) is replaced with U+FFFD and logged.
    pub fn decode_to_utf8(&self, bytes: &[u8]) -> Vec<u8> {
        let (text, had_errors) = self.as_encoding_rs().decode_without_bom_handling(bytes);
        if had_errors {
            tracing::warn!(
                "Malformed {} input replaced while converting {} bytes",
                self.label(),
                bytes.len()
            );
        }
        text.into_owned().into_bytes()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = DetectError;

    /// Accepts the canonical labels case-insensitively, plus any WHATWG
    /// alias that resolves to one of the three supported encodings
    /// (`"latin2"`, `"cp1250"`, `"utf8"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(found) = Encoding::ALL
            .iter()
            .find(|e| e.label().eq_ignore_ascii_case(trimmed))
        {
            return Ok(*found);
        }
        match encoding_rs::Encoding::for_label_no_replacement(trimmed.as_bytes()) {
            Some(enc) if enc == encoding_rs::UTF_8 => Ok(Encoding::Utf8),
            Some(enc) if enc == encoding_rs::ISO_8859_2 => Ok(Encoding::Iso8859_2),
            Some(enc) if enc == encoding_rs::WINDOWS_1250 => Ok(Encoding::Windows1250),
            _ => Err(DetectError::UnknownEncoding(s.to_string())),
        }
    }
}

/// True if the whole buffer is well-formed UTF-8.
pub fn is_valid_utf8(bytes: &[u8]) -> bool {
    encoding_rs::Encoding::utf8_valid_up_to(bytes) == bytes.len()
}

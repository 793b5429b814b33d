//! Errors raised while building or querying a [`Detection`](crate::Detection).

use crate::model::detection::DetectedState;

/// Errors that can occur during encoding detection and conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectError {
    #[error("Content can not be empty")]
    EmptyContent,

    #[error("Observed byte token #{index} is empty")]
    EmptyToken { index: usize },

    #[error("Observed byte token #{index} is not a two-digit hexadecimal byte: {token:?}")]
    InvalidHexToken { index: usize, token: String },

    #[error("State {0} can not be asserted, it is only reachable through detection")]
    UnsupportedState(DetectedState),

    #[error("Undefined detection state code: {0}")]
    UnknownStateCode(u8),

    #[error("Undefined detection state: {0:?}")]
    UnknownState(String),

    #[error("Undefined encode: {0:?}")]
    UnknownEncoding(String),

    #[error("Content is in an unrecognized encoding and can not be converted")]
    ConversionUnavailable,
}

impl DetectError {
    /// Whether this error reports bad caller input, as opposed to the
    /// "no conversion result" sentinel.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, DetectError::ConversionUnavailable)
    }
}

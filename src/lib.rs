//! Detects whether Polish text is ISO-8859-2, Windows-1250 or UTF-8 and
//! converts it to UTF-8.
//!
//! The detector does not use byte-order marks or statistics. It looks at
//! which distinct byte values occur in the buffer and compares them against
//! three small reference sets (see [`model::encoding_heuristics`]).

pub mod config;
pub mod error;
pub mod model;

pub use error::DetectError;
pub use model::byte_set::ByteSet;
pub use model::detection::{detect_state, DetectedState, Detection, ObservedBytes, StateOrigin};
pub use model::encoding::Encoding;

//! Detection model: byte sets, reference heuristics, encodings and the
//! detection session built on top of them.

pub mod byte_set;
pub mod detection;
pub mod encoding;
pub mod encoding_heuristics;

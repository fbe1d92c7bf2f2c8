// Timeline - Timestamp Normalization and Event Merge

pub mod assembler;
pub mod timestamp;

pub use assembler::build_timeline;
pub use timestamp::{parse_timestamp, parse_timestamp_or_now};

//! Raw file serving with HTTP partial-content support.

pub mod direct;
pub mod range;

pub use direct::serve_file;
pub use range::{parse_range, plan, ByteRange, RangeError, ResponsePlan};

//! Inbound request validation.
//!
//! # Data Flow
//! ```text
//! ?start_date=…&end_date=…
//!     → range.rs (format, ordering and "not in the future" checks)
//!     → DateRange (bounds kept as given, unset stays unset)
//!     → apod client
//! ```
//!
//! # Design Decisions
//! - Pure function over the two raw strings and the current date
//! - First failing rule wins; each rule has its own error variant

pub mod range;

pub use range::{DateRange, RangeError, ResponseShape};

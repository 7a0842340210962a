//! Upstream APOD integration subsystem.
//!
//! # Data Flow
//! ```text
//! DateRange (validated)
//!     → client.rs (build query: api_key + explicit bounds only)
//!     → gate.rs (wait for a slot, at most C calls in flight)
//!     → reqwest GET {endpoint}/planetary/apod (per-call timeout)
//!     → client.rs (classify: transport / 429 / ≥400)
//!     → types.rs (decode single object or array, chosen by the range)
//!     → Vec<String> of image URLs
//! ```
//!
//! # Constraints
//! - Every failure leaves as exactly one `ApodError`
//! - The gate slot is returned on every exit path
//! - No retries; a failure is reported once to the caller

use async_trait::async_trait;

use crate::validation::DateRange;

pub mod client;
pub mod gate;
pub mod types;

pub use client::ApodClient;
pub use gate::{ConcurrencyGate, GatePermit};
pub use types::{ApodError, ApodResult, ErrorKind, ImageRecord};

/// Anything that can turn a date range into image URLs.
///
/// The HTTP layer depends on this rather than on `ApodClient` directly.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_images(&self, range: &DateRange) -> ApodResult<Vec<String>>;
}

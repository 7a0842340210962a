//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, query extraction)
//!     → handlers.rs (validate range, call image source)
//!     → response.rs (JSON envelope, status from error kind)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{PicturesQuery, UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, PicturesResponse};
pub use server::{AppState, HttpServer};

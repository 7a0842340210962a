//! Astronomy picture-of-the-day URL service.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /pictures?start_date&end_date
//!        │
//!        ▼
//!   ┌──────────┐    ┌────────────┐    ┌─────────────────────────────┐
//!   │   http   │───▶│ validation │───▶│            apod             │
//!   │ handlers │    │ DateRange  │    │ gate → reqwest → classify → │──▶ upstream API
//!   └──────────┘    └────────────┘    │        parse (shape)        │
//!        ▲                            └─────────────────────────────┘
//!        │  {"urls": [...]} | {"error": "..."}
//!
//!   Cross-cutting: config, observability (logging + metrics), lifecycle
//! ```

// Core subsystems
pub mod apod;
pub mod http;
pub mod validation;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use apod::{ApodClient, ApodError, ConcurrencyGate, ImageSource};
pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use validation::DateRange;

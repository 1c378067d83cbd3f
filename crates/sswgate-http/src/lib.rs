//! # sswgate-http
//!
//! Transport and end-to-end engine for the SSW quotation bridge.
//!
//! This crate provides:
//! - The `SoapTransport` seam and the reqwest-backed `SswClient`
//! - `QuoteEngine`, the stateless per-call pipeline
//! - `EngineOutcome` with the stable caller-facing JSON shapes and an
//!   axum `IntoResponse` mapping for hosting layers
//!
//! ## Example
//!
//! ```ignore
//! use sswgate_http::{QuoteEngine, SswClient};
//!
//! let engine = QuoteEngine::new(SswClient::default());
//! let outcome = engine.quote(&payload).await;
//! if outcome.is_success() {
//!     // render outcome.to_json()
//! }
//! ```

mod engine;
mod outcome;
mod transport;

pub use engine::QuoteEngine;
pub use outcome::EngineOutcome;
pub use transport::{SoapTransport, SswClient, TransportError, CALL_TIMEOUT, DEFAULT_ENDPOINT};

//! # sswgate-core
//!
//! Canonical request model, normalization and validation for the SSW
//! freight quotation/collection bridge.
//!
//! This crate provides:
//! - The validated request models (`CanonicalRequest`, `CollectRequest`)
//!   and the decoded reply model (`RemoteReply`)
//! - Total locale/format converters for the wire's decimal, postal-code
//!   and tax-document formats
//! - An alias-tolerant input normalizer over arbitrary JSON payloads
//! - A collect-all-violations request validator
//!
//! ## Example
//!
//! ```rust,ignore
//! use sswgate_core::{normalize_quote, validate_quote, NormalizeOptions};
//!
//! let request = normalize_quote(&payload, &NormalizeOptions::default());
//! let violations = validate_quote(&request);
//! if violations.is_empty() {
//!     // ready for the wire
//! }
//! ```

pub mod convert;
pub mod normalize;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use convert::{digits_only, format_fixed, pad_document, to_decimal};
pub use normalize::{normalize_collect, normalize_quote, NormalizeOptions};
pub use types::{
    CanonicalRequest, CollectRequest, Credentials, PaymentResponsibility, RemoteReply, MASK,
};
pub use validation::{validate_collect, validate_quote, Violation};

//! # sswgate-wire
//!
//! Wire format for the SSW quotation/collection service.
//!
//! This crate provides:
//! - Envelope construction for the two supported operations, with the
//!   protocol's fixed field order and markup escaping
//! - A multi-strategy, panic-free extractor for the reply payload
//! - Classification of extracted replies into typed outcomes
//! - Credential masking for diagnostic echoes of sent envelopes

pub mod classify;
pub mod envelope;
pub mod extract;

pub use classify::{
    classify, BusinessFailure, CallResult, Quotation, DEFAULT_OK_MESSAGE, INVALID_LOGIN_CODE,
};
pub use envelope::{
    collect_envelope, mask_envelope, quote_envelope, COLLECT_ACTION, QUOTE_ACTION, SERVICE_URN,
};
pub use extract::{extract_fragment, extract_reply, read_fields, ExtractError, RAW_PREFIX_LIMIT};

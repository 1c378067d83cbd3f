//! Result classification
//!
//! Turns a decoded `RemoteReply` into a typed call result: a priced
//! quotation (or accepted collection) on success, a business failure
//! otherwise, with invalid-credential signals distinguished so callers can
//! react without string-matching the message themselves.

use sswgate_core::RemoteReply;

/// Remote outcome code that denotes rejected credentials.
pub const INVALID_LOGIN_CODE: i64 = 1;

/// Message used when the remote succeeds without one.
pub const DEFAULT_OK_MESSAGE: &str = "OK";

/// A successful quotation or collection acceptance.
#[derive(Debug, Clone, PartialEq)]
pub struct Quotation {
    pub freight_value: f64,
    pub deadline_days: Option<i64>,
    pub quotation_number: String,
    pub token: String,
    pub message: String,
    /// Collection protocol number, empty on the quotation operation.
    pub protocol: String,
}

/// A domain-level rejection reported by the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessFailure {
    pub code: i64,
    pub message: String,
    /// True when the failure is an invalid-credential signal.
    pub authorization: bool,
}

/// Outcome of a completed, decodable remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    Success(Quotation),
    Business(BusinessFailure),
}

/// Classify a decoded reply.
pub fn classify(reply: RemoteReply) -> CallResult {
    if reply.is_success() {
        return CallResult::Success(Quotation {
            freight_value: reply.freight_value.unwrap_or(0.0),
            deadline_days: reply.deadline_days,
            quotation_number: reply.quotation_number,
            token: reply.token,
            message: if reply.message.is_empty() {
                DEFAULT_OK_MESSAGE.to_string()
            } else {
                reply.message
            },
            protocol: reply.protocol,
        });
    }

    let code = reply.outcome_code.unwrap_or(-1);
    let authorization =
        code == INVALID_LOGIN_CODE || reply.message.to_lowercase().contains("login");
    CallResult::Business(BusinessFailure {
        code,
        message: reply.message,
        authorization,
    })
}

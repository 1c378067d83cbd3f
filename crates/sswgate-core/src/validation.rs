//! Request validation
//!
//! Enforces the preconditions the remote service requires before a call is
//! worth making. Every rule is checked and every violation collected, so
//! the caller can report all problems at once; a non-empty list is terminal
//! and the remote service is never contacted.

use crate::types::{CanonicalRequest, CollectRequest};
use thiserror::Error;

/// A violated precondition, rendered human-readable through `Display`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("dominio is required")]
    MissingDomain,

    #[error("login is required")]
    MissingLogin,

    #[error("senha is required")]
    MissingPassword,

    #[error("senhaPagador is required")]
    MissingPayerPassword,

    #[error("cnpjPagador is required")]
    MissingPayerDocument,

    #[error("cepOrigem is required")]
    MissingOriginPostalCode,

    #[error("cepDestino is required")]
    MissingDestinationPostalCode,

    #[error("valorMercadoria must be greater than zero")]
    NonPositiveMerchandiseValue,

    #[error("either peso or volume must be greater than zero")]
    NoWeightOrVolume,

    #[error("cotacao is required")]
    MissingQuotationNumber,

    #[error("token is required")]
    MissingToken,

    #[error("solicitante is required")]
    MissingRequester,

    #[error("limiteColeta (or data + hora) is required")]
    MissingDeadline,
}

/// Validate a quotation request, returning every violated rule in
/// declaration order. An empty list means the request may go to the wire.
pub fn validate_quote(request: &CanonicalRequest) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_credentials(request, &mut violations);

    if request.payer_document.is_empty() {
        violations.push(Violation::MissingPayerDocument);
    }
    if request.origin_postal_code.is_empty() {
        violations.push(Violation::MissingOriginPostalCode);
    }
    if request.destination_postal_code.is_empty() {
        violations.push(Violation::MissingDestinationPostalCode);
    }
    if request.merchandise_value.unwrap_or(0.0) <= 0.0 {
        violations.push(Violation::NonPositiveMerchandiseValue);
    }
    if request.weight.unwrap_or(0.0) <= 0.0 && request.volume.unwrap_or(0.0) <= 0.0 {
        violations.push(Violation::NoWeightOrVolume);
    }

    violations
}

/// Validate a collection request the same way.
pub fn validate_collect(request: &CollectRequest) -> Vec<Violation> {
    let mut violations = Vec::new();

    if request.credentials.domain.is_empty() {
        violations.push(Violation::MissingDomain);
    }
    if request.credentials.login.is_empty() {
        violations.push(Violation::MissingLogin);
    }
    if request.credentials.password.is_empty() {
        violations.push(Violation::MissingPassword);
    }
    if request.quotation_number.is_empty() {
        violations.push(Violation::MissingQuotationNumber);
    }
    if request.token.is_empty() {
        violations.push(Violation::MissingToken);
    }
    if request.requester.is_empty() {
        violations.push(Violation::MissingRequester);
    }
    if request.deadline.is_empty() {
        violations.push(Violation::MissingDeadline);
    }

    violations
}

fn check_credentials(request: &CanonicalRequest, violations: &mut Vec<Violation>) {
    if request.credentials.domain.is_empty() {
        violations.push(Violation::MissingDomain);
    }
    if request.credentials.login.is_empty() {
        violations.push(Violation::MissingLogin);
    }
    if request.credentials.password.is_empty() {
        violations.push(Violation::MissingPassword);
    }
    if request.credentials.payer_password.is_empty() {
        violations.push(Violation::MissingPayerPassword);
    }
}

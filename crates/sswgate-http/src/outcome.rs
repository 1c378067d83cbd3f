//! Engine outcomes
//!
//! One terminal outcome per inbound call, carrying everything the hosting
//! layer needs to render a response: the stable JSON shape and an HTTP
//! status. Diagnostic echoes of the sent envelope are always the masked
//! form; real credentials never leave the engine through this type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use sswgate_core::Violation;
use sswgate_wire::{BusinessFailure, Quotation};

/// Terminal state of one engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// Local validation failed; the remote service was never contacted.
    Rejected { violations: Vec<Violation> },
    /// The remote priced the quotation or accepted the collection.
    Success(Quotation),
    /// The remote understood the request and reported a domain problem.
    BusinessFailed(BusinessFailure),
    /// The remote could not be reached, or the call timed out.
    TransportFailed { reason: String, sent: String },
    /// A reply arrived but no result payload could be extracted from it.
    ProtocolFailed { reason: String, sent: String },
}

impl EngineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EngineOutcome::Success(_))
    }

    /// Render the stable caller-facing JSON shape.
    pub fn to_json(&self) -> Value {
        match self {
            EngineOutcome::Success(q) => {
                let mut body = json!({
                    "ok": true,
                    "freightValue": q.freight_value,
                    "deadlineDays": q.deadline_days,
                    "quotationNumber": q.quotation_number,
                    "token": q.token,
                    "message": q.message,
                });
                if !q.protocol.is_empty() {
                    body["protocol"] = json!(q.protocol);
                }
                body
            }
            EngineOutcome::BusinessFailed(f) => json!({
                "ok": false,
                "outcomeCode": f.code,
                "message": f.message,
            }),
            EngineOutcome::Rejected { violations } => json!({
                "ok": false,
                "violations": violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            EngineOutcome::TransportFailed { reason, sent }
            | EngineOutcome::ProtocolFailed { reason, sent } => json!({
                "ok": false,
                "reason": reason,
                "lastRequest": sent,
            }),
        }
    }

    /// HTTP status for the hosting layer.
    ///
    /// # Status Code Mapping
    ///
    /// - success -> 200 OK
    /// - validation rejection -> 400 Bad Request
    /// - authorization failure -> 401 Unauthorized
    /// - other business failure -> 422 Unprocessable Entity
    /// - undecodable reply -> 502 Bad Gateway
    /// - unreachable remote / timeout -> 504 Gateway Timeout
    pub fn status_code(&self) -> StatusCode {
        match self {
            EngineOutcome::Success(_) => StatusCode::OK,
            EngineOutcome::Rejected { .. } => StatusCode::BAD_REQUEST,
            EngineOutcome::BusinessFailed(f) if f.authorization => StatusCode::UNAUTHORIZED,
            EngineOutcome::BusinessFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineOutcome::ProtocolFailed { .. } => StatusCode::BAD_GATEWAY,
            EngineOutcome::TransportFailed { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for EngineOutcome {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quotation() -> Quotation {
        Quotation {
            freight_value: 159.77,
            deadline_days: Some(5),
            quotation_number: "123".to_string(),
            token: "tok".to_string(),
            message: "OK".to_string(),
            protocol: String::new(),
        }
    }

    #[test]
    fn test_success_shape() {
        let body = EngineOutcome::Success(quotation()).to_json();
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["freightValue"], json!(159.77));
        assert_eq!(body["deadlineDays"], json!(5));
        assert_eq!(body["quotationNumber"], json!("123"));
        assert_eq!(body["token"], json!("tok"));
        assert_eq!(body["message"], json!("OK"));
        assert!(body.get("protocol").is_none());
    }

    #[test]
    fn test_collect_success_includes_protocol() {
        let mut q = quotation();
        q.protocol = "555".to_string();
        let body = EngineOutcome::Success(q).to_json();
        assert_eq!(body["protocol"], json!("555"));
    }

    #[test]
    fn test_business_shape() {
        let outcome = EngineOutcome::BusinessFailed(BusinessFailure {
            code: 3,
            message: "fora de cobertura".to_string(),
            authorization: false,
        });
        let body = outcome.to_json();
        assert_eq!(body, json!({"ok": false, "outcomeCode": 3, "message": "fora de cobertura"}));
        assert_eq!(outcome.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_authorization_maps_to_401() {
        let outcome = EngineOutcome::BusinessFailed(BusinessFailure {
            code: 1,
            message: "login invalido".to_string(),
            authorization: true,
        });
        assert_eq!(outcome.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_rejection_shape() {
        let outcome = EngineOutcome::Rejected {
            violations: vec![
                Violation::MissingOriginPostalCode,
                Violation::NoWeightOrVolume,
            ],
        };
        let body = outcome.to_json();
        assert_eq!(body["ok"], json!(false));
        assert_eq!(
            body["violations"],
            json!([
                "cepOrigem is required",
                "either peso or volume must be greater than zero"
            ])
        );
        assert_eq!(outcome.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_failure_shapes_and_statuses() {
        let transport = EngineOutcome::TransportFailed {
            reason: "timed out".to_string(),
            sent: "<senha>***</senha>".to_string(),
        };
        assert_eq!(transport.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(transport.to_json()["reason"], json!("timed out"));

        let protocol = EngineOutcome::ProtocolFailed {
            reason: "no result payload".to_string(),
            sent: "<senha>***</senha>".to_string(),
        };
        assert_eq!(protocol.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(protocol.to_json()["lastRequest"], json!("<senha>***</senha>"));
    }
}

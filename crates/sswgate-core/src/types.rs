//! Core types for the SSW quotation bridge
//!
//! `CanonicalRequest` and `CollectRequest` are the validated, unit-normalized
//! request models the envelope builder serializes. They are built once per
//! inbound call by the normalizer and never mutated afterwards.

use serde::Serialize;
use std::fmt;

/// Service credentials, scoped to envelope construction.
///
/// `Debug` masks the secret fields so the struct can appear in tracing
/// output and diagnostic echoes without leaking them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub domain: String,
    pub login: String,
    pub password: String,
    pub payer_password: String,
}

/// Placeholder used wherever a secret is echoed back.
pub const MASK: &str = "***";

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("login", &self.login)
            .field("password", &MASK)
            .field("payer_password", &MASK)
            .finish()
    }
}

/// Who pays the freight. CIF-style input collapses to `Payer`, FOB-style to
/// `Recipient`; anything unrecognized defaults to `Recipient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentResponsibility {
    Payer,
    #[default]
    Recipient,
}

impl PaymentResponsibility {
    /// Parse any observed variant ("CIF"/"FOB"/"C"/"F"), case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "c" | "cif" => Some(Self::Payer),
            "f" | "fob" => Some(Self::Recipient),
            _ => None,
        }
    }

    /// Single-letter code used on the wire.
    pub fn wire_code(self) -> &'static str {
        match self {
            Self::Payer => "C",
            Self::Recipient => "F",
        }
    }
}

/// A validated, unit-normalized quotation request.
///
/// Numeric fields are held as plain values; the envelope builder applies the
/// wire's fixed fractional-digit formats (2 for currency, 3 for weight and
/// dimensions, 4 for volume).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRequest {
    pub credentials: Credentials,
    /// Payer tax document, digits only, CPF left-padded to CNPJ width.
    pub payer_document: String,
    pub origin_postal_code: String,
    pub destination_postal_code: String,
    /// Declared merchandise value; must be > 0 to pass validation.
    pub merchandise_value: Option<f64>,
    pub quantity: u32,
    pub weight: Option<f64>,
    /// Cubic volume; derived from dimensions when absent.
    pub volume: Option<f64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    /// Merchandise type code; 1 is the general-cargo default.
    pub merchandise_type: u32,
    pub payment_responsibility: PaymentResponsibility,
    pub sender_document: String,
    pub recipient_document: String,
    /// Free-text note, truncated to 195 characters.
    pub note: String,
    pub collection_requested: bool,
    // Opaque pass-through fields the remote service accepts on quotation.
    pub trt: String,
    pub difficult_delivery: String,
    pub recipient_taxpayer: String,
    pub pair_count: String,
    pub multiplier_factor: String,
}

/// A validated collection (pickup) request for a previously quoted shipment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectRequest {
    pub credentials: Credentials,
    /// Number of the quotation being collected, digits only.
    pub quotation_number: String,
    /// Pickup deadline, ISO-8601 local timestamp.
    pub deadline: String,
    /// Authorization token returned with the quotation.
    pub token: String,
    /// Person or system requesting the pickup.
    pub requester: String,
    pub note: String,
    /// Electronic invoice access key, when already issued.
    pub invoice_key: String,
    pub order_number: String,
}

/// Decoded outcome of one remote call, read tolerantly from the reply
/// fragment. Every field is independent: a tag missing from the fragment
/// leaves its field empty rather than failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemoteReply {
    /// Remote outcome code. `Some(0)` and `None` are both success; the
    /// collect operation has been observed answering the literal "OK",
    /// which decodes to `Some(0)`. Non-numeric failure codes decode to -1.
    pub outcome_code: Option<i64>,
    pub message: String,
    pub freight_value: Option<f64>,
    pub deadline_days: Option<i64>,
    pub quotation_number: String,
    pub token: String,
    /// Collection protocol number (collect operation only).
    pub protocol: String,
}

impl RemoteReply {
    /// Whether the remote reported success.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome_code, None | Some(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_masks_secrets() {
        let creds = Credentials {
            domain: "ABC".to_string(),
            login: "user".to_string(),
            password: "hunter2".to_string(),
            payer_password: "4321".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("ABC"));
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("4321"));
    }

    #[test]
    fn test_payment_responsibility_parse_variants() {
        for s in ["C", "c", "CIF", "cif", " Cif "] {
            assert_eq!(
                PaymentResponsibility::parse(s),
                Some(PaymentResponsibility::Payer),
                "{s}"
            );
        }
        for s in ["F", "f", "FOB", "fob"] {
            assert_eq!(
                PaymentResponsibility::parse(s),
                Some(PaymentResponsibility::Recipient),
                "{s}"
            );
        }
        assert_eq!(PaymentResponsibility::parse("freight collect"), None);
        assert_eq!(PaymentResponsibility::parse(""), None);
    }

    #[test]
    fn test_payment_responsibility_wire_codes() {
        assert_eq!(PaymentResponsibility::Payer.wire_code(), "C");
        assert_eq!(PaymentResponsibility::Recipient.wire_code(), "F");
    }

    #[test]
    fn test_reply_success_codes() {
        assert!(RemoteReply::default().is_success());
        let ok = RemoteReply {
            outcome_code: Some(0),
            ..Default::default()
        };
        assert!(ok.is_success());
        let failed = RemoteReply {
            outcome_code: Some(7),
            ..Default::default()
        };
        assert!(!failed.is_success());
    }
}

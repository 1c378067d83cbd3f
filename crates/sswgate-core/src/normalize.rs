//! Input normalization
//!
//! Maps an arbitrary JSON payload onto the canonical request models. Field
//! keys follow the historical API vocabulary, with aliases resolved through
//! one explicit table; values may arrive as strings or numbers in either
//! decimal notation. Normalization never rejects input: defaulting rules
//! absorb anything malformed, and the validator decides what is fatal.

use crate::convert::{digits_only, pad_document, round_to, to_decimal};
use crate::types::{CanonicalRequest, CollectRequest, Credentials, PaymentResponsibility};
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

/// Field alias table. Keys are tried in order and the first present,
/// non-null one wins; generic API names precede the remote service's own
/// field names.
pub mod alias {
    pub const DOMAIN: &[&str] = &["dominio"];
    pub const LOGIN: &[&str] = &["login"];
    pub const PASSWORD: &[&str] = &["senha"];
    pub const PAYER_DOCUMENT: &[&str] = &["cnpjPagador"];
    pub const PAYER_PASSWORD: &[&str] = &["senhaPagador"];
    pub const ORIGIN_POSTAL: &[&str] = &["cepOrigem"];
    pub const DESTINATION_POSTAL: &[&str] = &["cepDestino"];
    /// Generic name first, remote wire name second.
    pub const MERCHANDISE_VALUE: &[&str] = &["valorMercadoria", "valorNF"];
    pub const QUANTITY: &[&str] = &["quantidade"];
    pub const WEIGHT: &[&str] = &["peso"];
    pub const VOLUME: &[&str] = &["volume"];
    pub const MERCHANDISE_TYPE: &[&str] = &["mercadoria"];
    pub const PAYMENT: &[&str] = &["ciffob"];
    pub const SENDER_DOCUMENT: &[&str] = &["cnpjRemetente"];
    pub const RECIPIENT_DOCUMENT: &[&str] = &["cnpjDestinatario"];
    pub const NOTE: &[&str] = &["observacao"];
    pub const COLLECT: &[&str] = &["coletar"];
    pub const HEIGHT: &[&str] = &["altura"];
    pub const WIDTH: &[&str] = &["largura"];
    pub const LENGTH: &[&str] = &["comprimento"];
    pub const TRT: &[&str] = &["trt"];
    pub const DIFFICULT_DELIVERY: &[&str] = &["entDificil"];
    pub const RECIPIENT_TAXPAYER: &[&str] = &["destContribuinte"];
    pub const PAIR_COUNT: &[&str] = &["qtdePares"];
    pub const MULTIPLIER_FACTOR: &[&str] = &["fatorMultiplicador"];
    /// Clients may echo back the quotation response field or use the
    /// remote's own name.
    pub const QUOTATION_NUMBER: &[&str] = &["numeroCotacao", "cotacao"];
    pub const DEADLINE: &[&str] = &["limiteColeta"];
    pub const DEADLINE_DATE: &[&str] = &["data"];
    pub const DEADLINE_TIME: &[&str] = &["hora"];
    pub const TOKEN: &[&str] = &["token"];
    pub const REQUESTER: &[&str] = &["solicitante"];
    pub const INVOICE_KEY: &[&str] = &["chaveNFe"];
    pub const ORDER_NUMBER: &[&str] = &["nroPedido"];
}

/// Caller-facing normalization knobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// What an absent or unrecognized collection flag means. Historical
    /// call sites disagreed; the conservative default is to not schedule
    /// a pickup unless the payload asks for one.
    pub default_collect: bool,
}

/// Pickup time of day used when the payload omits one or asks for the
/// "default" literal.
pub const DEFAULT_PICKUP_TIME: &str = "17:00";

/// Maximum note length the remote service accepts.
pub const NOTE_MAX_CHARS: usize = 195;

fn first<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let obj = payload.as_object()?;
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// String view of a field: strings pass through, numbers and booleans are
/// rendered, everything else is empty.
fn text(payload: &Value, keys: &[&str]) -> String {
    match first(payload, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Decimal view of a field, accepting JSON numbers and both decimal
/// notations in strings. Negative values are treated as unparsable.
fn decimal(payload: &Value, keys: &[&str]) -> Option<f64> {
    let value = match first(payload, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => to_decimal(s),
        _ => None,
    };
    value.filter(|v| *v >= 0.0)
}

/// Integer view of a field.
fn integer(payload: &Value, keys: &[&str]) -> Option<i64> {
    match first(payload, keys)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let t = s.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| to_decimal(t).map(|f| f as i64))
        }
        _ => None,
    }
}

/// Tri-state collection flag: S/N in the historical payloads, booleans in
/// newer ones. Unrecognized input yields `None` so the caller's default
/// applies.
fn collect_flag(payload: &Value, keys: &[&str]) -> Option<bool> {
    match first(payload, keys)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "s" | "sim" | "true" | "1" => Some(true),
            "n" | "nao" | "não" | "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn credentials(payload: &Value) -> Credentials {
    Credentials {
        domain: text(payload, alias::DOMAIN).trim().to_uppercase(),
        login: text(payload, alias::LOGIN),
        password: text(payload, alias::PASSWORD),
        payer_password: text(payload, alias::PAYER_PASSWORD),
    }
}

/// Normalize an arbitrary JSON payload into a quotation request.
pub fn normalize_quote(payload: &Value, options: &NormalizeOptions) -> CanonicalRequest {
    let payer_document = pad_document(&text(payload, alias::PAYER_DOCUMENT));

    let quantity = integer(payload, alias::QUANTITY)
        .filter(|q| *q > 0)
        .unwrap_or(1) as u32;

    let height = decimal(payload, alias::HEIGHT);
    let width = decimal(payload, alias::WIDTH);
    let length = decimal(payload, alias::LENGTH);

    let mut volume = decimal(payload, alias::VOLUME).filter(|v| *v > 0.0);
    if volume.is_none() {
        volume = derive_volume(height, width, length, quantity);
    }

    let payment_responsibility = PaymentResponsibility::parse(&text(payload, alias::PAYMENT))
        .unwrap_or_default();

    let mut sender_document = pad_document(&text(payload, alias::SENDER_DOCUMENT));
    let mut recipient_document = pad_document(&text(payload, alias::RECIPIENT_DOCUMENT));

    // When the paying party's own document is absent, the payer document
    // stands in for it.
    match payment_responsibility {
        PaymentResponsibility::Payer if sender_document.is_empty() => {
            sender_document = payer_document.clone();
        }
        PaymentResponsibility::Recipient if recipient_document.is_empty() => {
            recipient_document = payer_document.clone();
        }
        _ => {}
    }

    CanonicalRequest {
        credentials: credentials(payload),
        payer_document,
        origin_postal_code: digits_only(&text(payload, alias::ORIGIN_POSTAL)),
        destination_postal_code: digits_only(&text(payload, alias::DESTINATION_POSTAL)),
        merchandise_value: decimal(payload, alias::MERCHANDISE_VALUE),
        quantity,
        weight: decimal(payload, alias::WEIGHT),
        volume,
        height,
        width,
        length,
        merchandise_type: integer(payload, alias::MERCHANDISE_TYPE)
            .filter(|m| *m > 0)
            .unwrap_or(1) as u32,
        payment_responsibility,
        sender_document,
        recipient_document,
        note: truncate_chars(&text(payload, alias::NOTE), NOTE_MAX_CHARS),
        collection_requested: collect_flag(payload, alias::COLLECT)
            .unwrap_or(options.default_collect),
        trt: text(payload, alias::TRT),
        difficult_delivery: text(payload, alias::DIFFICULT_DELIVERY),
        recipient_taxpayer: text(payload, alias::RECIPIENT_TAXPAYER),
        pair_count: text(payload, alias::PAIR_COUNT),
        multiplier_factor: text(payload, alias::MULTIPLIER_FACTOR),
    }
}

/// Normalize an arbitrary JSON payload into a collection request.
pub fn normalize_collect(payload: &Value) -> CollectRequest {
    let mut deadline = text(payload, alias::DEADLINE).trim().to_string();
    if deadline.is_empty() {
        deadline = build_deadline(
            text(payload, alias::DEADLINE_DATE).trim(),
            text(payload, alias::DEADLINE_TIME).trim(),
        );
    }

    CollectRequest {
        credentials: credentials(payload),
        quotation_number: digits_only(&text(payload, alias::QUOTATION_NUMBER)),
        deadline,
        token: text(payload, alias::TOKEN),
        requester: text(payload, alias::REQUESTER),
        note: truncate_chars(&text(payload, alias::NOTE), NOTE_MAX_CHARS),
        invoice_key: text(payload, alias::INVOICE_KEY),
        order_number: text(payload, alias::ORDER_NUMBER),
    }
}

/// Volume from box dimensions: height x width x length x quantity, rounded
/// to the wire's 4 fractional digits. Only derived when every factor is
/// positive.
fn derive_volume(
    height: Option<f64>,
    width: Option<f64>,
    length: Option<f64>,
    quantity: u32,
) -> Option<f64> {
    match (height, width, length) {
        (Some(h), Some(w), Some(l)) if h > 0.0 && w > 0.0 && l > 0.0 && quantity > 0 => {
            Some(round_to(h * w * l * quantity as f64, 4))
        }
        _ => None,
    }
}

/// Assemble the pickup deadline from a date and a time of day.
///
/// The time defaults to 17:00 when empty or given as the "default" literal.
/// Parseable inputs are reformatted through chrono; anything else is
/// assembled textually so a typo still reaches the validator instead of
/// vanishing.
fn build_deadline(date: &str, time: &str) -> String {
    if date.is_empty() {
        return String::new();
    }

    let time = match time.to_lowercase().as_str() {
        "" | "padrao" | "padrão" => DEFAULT_PICKUP_TIME.to_string(),
        t => t.to_string(),
    };

    let parsed_time = NaiveTime::parse_from_str(&time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&time, "%H:%M:%S"));
    if let (Ok(d), Ok(t)) = (NaiveDate::parse_from_str(date, "%Y-%m-%d"), parsed_time) {
        return d.and_time(t).format("%Y-%m-%dT%H:%M:%S").to_string();
    }

    let mut parts = time.split(':');
    let hour: u8 = parts.next().and_then(|h| h.trim().parse().ok()).unwrap_or(17);
    let minute: u8 = parts.next().and_then(|m| m.trim().parse().ok()).unwrap_or(0);
    format!("{date}T{hour:02}:{minute:02}:00")
}

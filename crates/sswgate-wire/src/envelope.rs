//! SOAP envelope construction
//!
//! The remote protocol is RPC/encoded and positionally sensitive: fields
//! must appear in a fixed order inside the operation element even though
//! they are also named. The writer here is deliberately hand-rolled so the
//! order is explicit in one place, with every value escaped for the five
//! reserved markup characters.

use quick_xml::escape::escape;
use sswgate_core::{format_fixed, CanonicalRequest, CollectRequest, MASK};

/// Service namespace of the quotation/collection endpoint.
pub const SERVICE_URN: &str = "urn:sswinfbr.sswCotacaoColeta";

/// SOAPAction header value for the quotation operation.
pub const QUOTE_ACTION: &str = "urn:sswinfbr.sswCotacaoColeta#cotarSite";

/// SOAPAction header value for the collection operation.
pub const COLLECT_ACTION: &str = "urn:sswinfbr.sswCotacaoColeta#coletar";

/// Element names whose text is blanked in diagnostic echoes.
const SECRET_TAGS: [&str; 3] = ["senha", "senhaPagador", "token"];

struct EnvelopeWriter {
    buf: String,
    operation: &'static str,
}

impl EnvelopeWriter {
    fn open(operation: &'static str) -> Self {
        let mut buf = String::with_capacity(1024);
        buf.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        buf.push_str(&format!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:tns="{SERVICE_URN}"><soap:Body><tns:{operation}>"#
        ));
        Self { buf, operation }
    }

    fn field(&mut self, tag: &str, value: &str) {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self.buf.push_str(&escape(value));
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
    }

    fn close(mut self) -> String {
        self.buf
            .push_str(&format!("</tns:{}></soap:Body></soap:Envelope>", self.operation));
        self.buf
    }
}

/// Serialize a quotation request into its wire envelope.
///
/// Field order is part of the protocol; do not reorder.
pub fn quote_envelope(request: &CanonicalRequest) -> String {
    let mut w = EnvelopeWriter::open("cotarSite");
    w.field("dominio", &request.credentials.domain);
    w.field("login", &request.credentials.login);
    w.field("senha", &request.credentials.password);
    w.field("cnpjPagador", &request.payer_document);
    w.field("senhaPagador", &request.credentials.payer_password);
    w.field("cepOrigem", &request.origin_postal_code);
    w.field("cepDestino", &request.destination_postal_code);
    w.field(
        "valorNF",
        &format_fixed(Some(request.merchandise_value.unwrap_or(0.0)), 2),
    );
    w.field("quantidade", &request.quantity.to_string());
    w.field("peso", &format_fixed(Some(request.weight.unwrap_or(0.0)), 3));
    w.field("volume", &format_fixed(Some(request.volume.unwrap_or(0.0)), 4));
    w.field("mercadoria", &request.merchandise_type.to_string());
    w.field("ciffob", request.payment_responsibility.wire_code());
    w.field("cnpjRemetente", &request.sender_document);
    w.field("cnpjDestinatario", &request.recipient_document);
    w.field("observacao", &request.note);
    w.field("trt", &request.trt);
    w.field("coletar", if request.collection_requested { "S" } else { "N" });
    w.field("entDificil", &request.difficult_delivery);
    w.field("destContribuinte", &request.recipient_taxpayer);
    w.field("qtdePares", &request.pair_count);
    // Optional dimensions go out empty when absent.
    w.field("altura", &format_fixed(request.height, 3));
    w.field("largura", &format_fixed(request.width, 3));
    w.field("comprimento", &format_fixed(request.length, 3));
    w.field("fatorMultiplicador", &request.multiplier_factor);
    w.close()
}

/// Serialize a collection request into its wire envelope.
pub fn collect_envelope(request: &CollectRequest) -> String {
    let mut w = EnvelopeWriter::open("coletar");
    w.field("dominio", &request.credentials.domain);
    w.field("login", &request.credentials.login);
    w.field("senha", &request.credentials.password);
    w.field("cotacao", &request.quotation_number);
    w.field("limiteColeta", &request.deadline);
    w.field("token", &request.token);
    w.field("solicitante", &request.requester);
    w.field("observacao", &request.note);
    w.field("chaveNFe", &request.invoice_key);
    w.field("nroPedido", &request.order_number);
    w.close()
}

/// Blank credential and token text in an envelope echoed for diagnostics.
///
/// The wire body keeps the real values; masking happens only at this
/// boundary, never at construction.
pub fn mask_envelope(body: &str) -> String {
    let mut masked = body.to_string();
    for tag in SECRET_TAGS {
        masked = mask_tag(&masked, tag);
    }
    masked
}

fn mask_tag(body: &str, tag: &str) -> String {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    match (body.find(&open), body.find(&close)) {
        (Some(start), Some(end)) if end >= start + open.len() => {
            format!("{}{}{}", &body[..start + open.len()], MASK, &body[end..])
        }
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sswgate_core::{Credentials, PaymentResponsibility};

    fn request() -> CanonicalRequest {
        CanonicalRequest {
            credentials: Credentials {
                domain: "ABC".to_string(),
                login: "user".to_string(),
                password: "secret".to_string(),
                payer_password: "1234".to_string(),
            },
            payer_document: "00012345678901".to_string(),
            origin_postal_code: "01310100".to_string(),
            destination_postal_code: "80010000".to_string(),
            merchandise_value: Some(1500.0),
            quantity: 2,
            weight: Some(23.0),
            volume: Some(0.4),
            merchandise_type: 1,
            payment_responsibility: PaymentResponsibility::Payer,
            sender_document: "00012345678901".to_string(),
            note: "fragile & small".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_quote_field_order_is_fixed() {
        let body = quote_envelope(&request());
        let order = [
            "<dominio>",
            "<login>",
            "<senha>",
            "<cnpjPagador>",
            "<senhaPagador>",
            "<cepOrigem>",
            "<cepDestino>",
            "<valorNF>",
            "<quantidade>",
            "<peso>",
            "<volume>",
            "<mercadoria>",
            "<ciffob>",
            "<cnpjRemetente>",
            "<cnpjDestinatario>",
            "<observacao>",
            "<trt>",
            "<coletar>",
            "<entDificil>",
            "<destContribuinte>",
            "<qtdePares>",
            "<altura>",
            "<largura>",
            "<comprimento>",
            "<fatorMultiplicador>",
        ];
        let mut last = 0;
        for tag in order {
            let pos = body.find(tag).unwrap_or_else(|| panic!("missing {tag}"));
            assert!(pos > last, "{tag} out of order");
            last = pos;
        }
    }

    #[test]
    fn test_quote_wire_formats() {
        let body = quote_envelope(&request());
        assert!(body.contains("<valorNF>1500.00</valorNF>"));
        assert!(body.contains("<peso>23.000</peso>"));
        assert!(body.contains("<volume>0.4000</volume>"));
        assert!(body.contains("<quantidade>2</quantidade>"));
        assert!(body.contains("<ciffob>C</ciffob>"));
        assert!(body.contains("<coletar>N</coletar>"));
        // Absent dimensions serialize empty.
        assert!(body.contains("<altura></altura>"));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut req = request();
        req.note = r#"<b>5% "off" & more's</b>"#.to_string();
        let body = quote_envelope(&req);
        assert!(!body.contains("<observacao><b>"));
        assert!(body.contains("&lt;b&gt;"));
        assert!(body.contains("&amp;"));
        assert!(body.contains("&quot;"));
        assert!(body.contains("&apos;"));
    }

    #[test]
    fn test_envelope_wrapper() {
        let body = quote_envelope(&request());
        assert!(body.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(body.contains(SERVICE_URN));
        assert!(body.contains("<tns:cotarSite>"));
        assert!(body.ends_with("</soap:Body></soap:Envelope>"));
    }

    #[test]
    fn test_collect_field_order_is_fixed() {
        let req = CollectRequest {
            credentials: Credentials {
                domain: "ABC".to_string(),
                login: "user".to_string(),
                password: "secret".to_string(),
                payer_password: String::new(),
            },
            quotation_number: "123".to_string(),
            deadline: "2026-08-10T17:00:00".to_string(),
            token: "tok".to_string(),
            requester: "warehouse".to_string(),
            ..Default::default()
        };
        let body = collect_envelope(&req);
        let order = [
            "<dominio>",
            "<login>",
            "<senha>",
            "<cotacao>",
            "<limiteColeta>",
            "<token>",
            "<solicitante>",
            "<observacao>",
            "<chaveNFe>",
            "<nroPedido>",
        ];
        let mut last = 0;
        for tag in order {
            let pos = body.find(tag).unwrap_or_else(|| panic!("missing {tag}"));
            assert!(pos > last, "{tag} out of order");
            last = pos;
        }
        assert!(body.contains("<tns:coletar>"));
    }

    #[test]
    fn test_mask_envelope_blanks_secrets_only() {
        let body = quote_envelope(&request());
        let masked = mask_envelope(&body);
        assert!(masked.contains("<senha>***</senha>"));
        assert!(masked.contains("<senhaPagador>***</senhaPagador>"));
        assert!(!masked.contains("secret"));
        assert!(!masked.contains("<senhaPagador>1234<"));
        // Everything else survives.
        assert!(masked.contains("<login>user</login>"));
        assert!(masked.contains("<valorNF>1500.00</valorNF>"));
        // The wire body itself is untouched.
        assert!(body.contains("<senha>secret</senha>"));
    }

    #[test]
    fn test_mask_envelope_blanks_token() {
        let req = CollectRequest {
            token: "supersecret".to_string(),
            ..Default::default()
        };
        let masked = mask_envelope(&collect_envelope(&req));
        assert!(masked.contains("<token>***</token>"));
        assert!(!masked.contains("supersecret"));
    }

    #[test]
    fn test_action_constants() {
        assert_eq!(QUOTE_ACTION, "urn:sswinfbr.sswCotacaoColeta#cotarSite");
        assert_eq!(COLLECT_ACTION, "urn:sswinfbr.sswCotacaoColeta#coletar");
    }
}

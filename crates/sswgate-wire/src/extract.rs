//! Tolerant reply extraction
//!
//! The remote service nests its actual answer inside the SOAP reply as an
//! entity-escaped XML string, and the nesting has never been stable across
//! deployments: the wrapper element may carry any namespace prefix, sit
//! inside an operation-specific response element, be escaped twice, or be
//! missing entirely with the result fragment inlined in the body. The
//! strategies below are attempted in a fixed order and degrade gracefully;
//! nothing in this module panics on malformed input.

use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use sswgate_core::{to_decimal, RemoteReply};
use thiserror::Error;

/// How much of an undecodable reply body is kept for diagnostics.
pub const RAW_PREFIX_LIMIT: usize = 512;

/// Root element names a result fragment may use.
const FRAGMENT_ROOTS: [&str; 2] = ["cotacao", "coleta"];

/// Extraction failure. Carries a bounded prefix of the raw body so the
/// operator can see what the remote actually sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no result payload in reply (first bytes: {prefix})")]
    NoPayload { prefix: String },
}

impl ExtractError {
    /// The preserved raw-body prefix.
    pub fn raw_prefix(&self) -> &str {
        match self {
            ExtractError::NoPayload { prefix } => prefix,
        }
    }
}

/// Extract and decode the result payload of a raw reply body.
pub fn extract_reply(raw: &str) -> Result<RemoteReply, ExtractError> {
    extract_fragment(raw).map(|fragment| read_fields(&fragment))
}

/// Locate the result fragment inside a raw reply body.
///
/// Strategy order:
/// 1. find a `return` wrapper element regardless of namespace prefix and
///    entity-decode its text; use it if it contains the fragment
/// 2. decode once more for double-escaped payloads and search again
/// 3. no wrapper at all: search the raw body for the fragment directly
pub fn extract_fragment(raw: &str) -> Result<String, ExtractError> {
    if let Some(text) = wrapper_text(raw) {
        if let Some(fragment) = find_fragment(&text) {
            return Ok(fragment);
        }
        if text.contains("&lt;") {
            if let Ok(decoded) = unescape(&text) {
                if let Some(fragment) = find_fragment(&decoded) {
                    return Ok(fragment);
                }
            }
        }
    }

    if let Some(fragment) = find_fragment(raw) {
        return Ok(fragment);
    }

    Err(ExtractError::NoPayload {
        prefix: raw.chars().take(RAW_PREFIX_LIMIT).collect(),
    })
}

/// Read the reply fields out of an isolated result fragment.
///
/// Each field is read independently by local tag name; a missing tag
/// yields an empty value and never aborts the sibling reads.
pub fn read_fields(fragment: &str) -> RemoteReply {
    let texts = collect_tag_texts(fragment);
    let tag = |names: &[&str]| -> String {
        names
            .iter()
            .filter_map(|n| texts.get(*n))
            .find(|v| !v.is_empty())
            .cloned()
            .unwrap_or_default()
    };

    RemoteReply {
        outcome_code: parse_outcome(&tag(&["erro", "codigo"])),
        message: tag(&["mensagem", "msg"]),
        freight_value: to_decimal(&tag(&["frete"])),
        deadline_days: tag(&["prazo"]).trim().parse().ok(),
        quotation_number: tag(&["cotacao"]),
        token: tag(&["token"]),
        protocol: tag(&["protocoloColeta", "protocolo"]),
    }
}

/// Concatenated, entity-decoded text of the first `return` element, found
/// regardless of namespace prefix. `None` when no wrapper exists or the
/// body is not XML at all.
fn wrapper_text(raw: &str) -> Option<String> {
    let mut reader = Reader::from_str(raw);
    let mut inside = false;
    let mut found = false;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"return" {
                    inside = true;
                    found = true;
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"return" {
                    found = true;
                }
            }
            Ok(Event::End(e)) => {
                if inside && e.local_name().as_ref() == b"return" {
                    break;
                }
            }
            Ok(Event::Text(t)) if inside => match t.unescape() {
                Ok(decoded) => text.push_str(&decoded),
                Err(_) => text.push_str(&String::from_utf8_lossy(t.as_ref())),
            },
            Ok(Event::CData(t)) if inside => {
                text.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            // Malformed markup past this point; keep whatever we have.
            Err(_) => break,
        }
    }

    found.then_some(text)
}

/// Find a `<cotacao>`/`<coleta>`-shaped fragment in a text. A fragment with
/// a missing close tag is returned truncated rather than rejected; the
/// field reads cope with partial markup.
fn find_fragment(text: &str) -> Option<String> {
    let start = FRAGMENT_ROOTS
        .iter()
        .filter_map(|root| find_tag_start(text, root).map(|pos| (pos, *root)))
        .min_by_key(|(pos, _)| *pos)?;

    let (pos, root) = start;
    // The fragment root and the quotation-number child share the
    // `cotacao` name, so the close tag is searched from the end.
    let close = format!("</{root}>");
    let end = text
        .rfind(&close)
        .filter(|close_pos| *close_pos >= pos)
        .map(|close_pos| close_pos + close.len())
        .unwrap_or(text.len());
    Some(text[pos..end].to_string())
}

/// Position of `<root>` or `<root ...>`, rejecting longer names that merely
/// share the prefix (`<coletar>` is not a `<coleta>` fragment).
fn find_tag_start(text: &str, root: &str) -> Option<usize> {
    let needle = format!("<{root}");
    let mut offset = 0;
    while let Some(rel) = text[offset..].find(&needle) {
        let pos = offset + rel;
        let after = text[pos + needle.len()..].chars().next();
        match after {
            Some('>') | Some(' ') | Some('\t') | Some('\r') | Some('\n') | Some('/') => {
                return Some(pos)
            }
            _ => offset = pos + needle.len(),
        }
    }
    None
}

/// First non-blank text per local element name, in document order.
fn collect_tag_texts(fragment: &str) -> HashMap<String, String> {
    let mut reader = Reader::from_str(fragment);
    let mut stack: Vec<String> = Vec::new();
    let mut texts: HashMap<String, String> = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(t)) => {
                let decoded = match t.unescape() {
                    Ok(d) => d.into_owned(),
                    Err(_) => String::from_utf8_lossy(t.as_ref()).into_owned(),
                };
                record(&mut texts, &stack, decoded.trim());
            }
            Ok(Event::CData(t)) => {
                let raw = String::from_utf8_lossy(&t.into_inner()).into_owned();
                record(&mut texts, &stack, raw.trim());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }

    texts
}

fn record(texts: &mut HashMap<String, String>, stack: &[String], value: &str) {
    if value.is_empty() {
        return;
    }
    if let Some(name) = stack.last() {
        texts
            .entry(name.clone())
            .or_insert_with(|| value.to_string());
    }
}

/// Decode the remote outcome code. Blank means success-by-absence, the
/// literal "OK" folds to the success sentinel, and non-numeric failure
/// codes map to -1 so callers always get a stable machine code.
fn parse_outcome(raw: &str) -> Option<i64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    if t.eq_ignore_ascii_case("ok") {
        return Some(0);
    }
    Some(t.parse::<i64>().unwrap_or(-1))
}

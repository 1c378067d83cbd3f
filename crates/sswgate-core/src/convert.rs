//! Locale and format converters
//!
//! The SSW wire format wants dot-decimal numbers with a fixed number of
//! fractional digits, digits-only postal codes, and 14-digit tax documents.
//! Client payloads arrive in Brazilian notation (comma decimals, dotted
//! thousands) or already canonical. Every function here is total: malformed
//! input maps to a defined fallback, never a panic.

/// Strip every non-digit character.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse a decimal in either dot-decimal or comma-decimal notation.
///
/// When a comma is present, every dot is a thousands separator and is
/// removed, then the comma becomes the decimal point ("1.159,77" -> 1159.77).
/// Returns `None` for unparsable input.
pub fn to_decimal(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    let canonical = if t.contains(',') {
        t.replace('.', "").replace(',', ".")
    } else {
        t.to_string()
    };
    canonical.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a value with exactly `places` fractional digits, dot separator.
///
/// Absent input renders as the empty string, which the envelope builder
/// sends as an empty element.
pub fn format_fixed(n: Option<f64>, places: usize) -> String {
    match n {
        Some(v) => format!("{:.*}", places, v),
        None => String::new(),
    }
}

/// Round to `places` fractional digits. Used for derived quantities
/// (volume from dimensions) before formatting.
pub fn round_to(n: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (n * factor).round() / factor
}

/// Normalize a CPF/CNPJ document number.
///
/// Strips non-digits; an 11-digit result (CPF) is left-padded with zeros to
/// the 14-digit CNPJ width the remote service expects. Any other length,
/// including empty, passes through unchanged.
pub fn pad_document(doc: &str) -> String {
    let d = digits_only(doc);
    if d.len() == 11 {
        format!("{:0>14}", d)
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("12.345-678"), "12345678");
        assert_eq!(digits_only("abc"), "");
        assert_eq!(digits_only(""), "");
    }

    #[test]
    fn test_to_decimal_dot_notation() {
        assert_eq!(to_decimal("159.77"), Some(159.77));
        assert_eq!(to_decimal("1500"), Some(1500.0));
        assert_eq!(to_decimal(" 23 "), Some(23.0));
    }

    #[test]
    fn test_to_decimal_comma_notation() {
        assert_eq!(to_decimal("159,77"), Some(159.77));
        assert_eq!(to_decimal("1.159,77"), Some(1159.77));
        assert_eq!(to_decimal("1.234.567,89"), Some(1234567.89));
    }

    #[test]
    fn test_to_decimal_unparsable() {
        assert_eq!(to_decimal(""), None);
        assert_eq!(to_decimal("   "), None);
        assert_eq!(to_decimal("abc"), None);
        assert_eq!(to_decimal("12,34,56"), None);
    }

    #[test]
    fn test_to_decimal_idempotent_through_format() {
        // to_decimal(format_fixed(to_decimal(s))) recovers the value
        for s in ["159,77", "1.500,00", "0.4", "23"] {
            let n = to_decimal(s).unwrap();
            let formatted = format_fixed(Some(n), 2);
            let reparsed = to_decimal(&formatted).unwrap();
            assert!((n - reparsed).abs() < 0.005, "{s}: {n} vs {reparsed}");
        }
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(Some(159.77), 2), "159.77");
        assert_eq!(format_fixed(Some(23.0), 3), "23.000");
        assert_eq!(format_fixed(Some(0.4), 4), "0.4000");
        assert_eq!(format_fixed(None, 2), "");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.5 * 0.4 * 1.0 * 2.0, 4), 0.4);
        assert_eq!(round_to(0.123456, 4), 0.1235);
    }

    #[test]
    fn test_pad_document_cpf() {
        let padded = pad_document("123.456.789-01");
        assert_eq!(padded.len(), 14);
        assert_eq!(padded, "00012345678901");
        assert!(padded.ends_with("12345678901"));
    }

    #[test]
    fn test_pad_document_cnpj_unchanged() {
        assert_eq!(pad_document("12.345.678/0001-90"), "12345678000190");
    }

    #[test]
    fn test_pad_document_other_lengths_pass_through() {
        assert_eq!(pad_document("12345"), "12345");
        assert_eq!(pad_document(""), "");
        assert_eq!(pad_document("abc"), "");
    }
}

// ---------------------------------------------------------------------------
// Locale-tolerant number parsing
// ---------------------------------------------------------------------------

/// Parse a cell the way instrument exports write numbers: either `0.0125`
/// or `0,0125`, optionally in exponent form (`1,5E-10`).
///
/// Every comma is read as a decimal separator, so thousands separators are
/// not supported. `NaN` and infinities are not numbers here.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Significant-digit formatting
// ---------------------------------------------------------------------------

/// Format `value` with at most `digits` significant digits, dropping trailing
/// zeros. Switches to exponent form (`1.5E-10`) when the decimal exponent is
/// -5 or below, or not smaller than `digits`, the way general number formatting
/// does on the instrument side.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);

    // Rounding to `digits` first gives the exponent of the displayed value,
    // so 999999.7 at 6 digits correctly becomes 1E+06.
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exponent <= -5 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}E{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

/// Six significant digits, used for every derived quantity.
pub fn format_g6(value: f64) -> String {
    format_significant(value, 6)
}

/// Four significant digits, used for temperatures and frequency titles.
pub fn format_g4(value: f64) -> String {
    format_significant(value, 4)
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

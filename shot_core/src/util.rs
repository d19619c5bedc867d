//! Numeric helpers shared by the timer, evaluator and input handling.

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Round to one decimal place, the precision used for every recorded time.
#[inline]
pub fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Parse the leading decimal number of `text`, ignoring leading whitespace and
/// any trailing garbage (`"12.5g"` → 12.5). Returns `None` when there is no
/// numeric prefix or the value is not finite.
pub fn parse_lenient(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            end = j;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Input-field coercion: anything unparsable becomes 0.
#[inline]
pub fn number_or_zero(text: &str) -> f64 {
    parse_lenient(text).unwrap_or(0.0)
}

/// Clamp a tick period to [1, 1000] ms.
#[inline]
pub fn clamp_tick_ms(ms: u64) -> u64 {
    ms.clamp(1, MILLIS_PER_SEC)
}

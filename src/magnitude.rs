//! Free-text market magnitudes → billions of currency units.
//!
//! ```text
//! "$1.5 Trillion"  → 1500.0
//! "450 Million"    → 0.45
//! "12B"            → None   (no unit word: ambiguous, not assumed billions)
//! ```

/// Symbols stripped before reading the number.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹'];

/// Unit words in precedence order.
const UNITS: &[(&str, Scale)] = &[
    ("trillion", Scale::Times(1000.0)),
    ("billion", Scale::Times(1.0)),
    ("million", Scale::Over(1000.0)),
];

#[derive(Debug, Clone, Copy)]
enum Scale {
    Times(f64),
    Over(f64),
}

impl Scale {
    fn apply(self, n: f64) -> f64 {
        match self {
            Scale::Times(k) => n * k,
            Scale::Over(k) => n / k,
        }
    }
}

/// Parse a market-size string into billions.
///
/// Returns `None` for absent/empty input, input without a leading numeric
/// literal, or input without a recognized unit word. Never panics.
pub fn parse(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    let cleaned = cleaned.trim().to_lowercase();
    if cleaned.is_empty() {
        return None;
    }

    let number = leading_number(&cleaned)?;
    let (_, scale) = UNITS.iter().find(|(unit, _)| cleaned.contains(unit))?;
    Some(scale.apply(number))
}

/// Read the longest numeric literal at the start of `s`:
/// `[+-]? digits? (. digits?)? ([eE] [+-]? digits)?`, at least one digit
/// in the mantissa.
fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts if digits follow it ("1e" reads as 1).
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

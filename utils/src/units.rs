//! Conversion between raw token units and decimal display strings.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("empty amount")]
    Empty,

    #[error("invalid digit in amount: {0}")]
    InvalidDigit(String),

    #[error("amount has more than {0} fractional digits")]
    TooPrecise(u8),

    #[error("amount does not fit in 128 bits")]
    Overflow,

    #[error("decimals {0} out of range")]
    InvalidDecimals(u8),
}

fn unit(decimals: u8) -> Result<u128, UnitsError> {
    10u128
        .checked_pow(decimals as u32)
        .ok_or(UnitsError::InvalidDecimals(decimals))
}

/// Render `raw` as a decimal string with `decimals` fractional digits.
///
/// Trailing fractional zeros are trimmed but at least one fractional digit
/// is kept: `1000 * 10^18` renders as `"1000.0"`.
pub fn format_units(raw: u128, decimals: u8) -> String {
    let Ok(base) = unit(decimals) else {
        return raw.to_string();
    };
    if decimals == 0 {
        return format!("{raw}.0");
    }
    let whole = raw / base;
    let frac = raw % base;
    let frac_str = format!("{:0width$}", frac, width = decimals as usize);
    let trimmed = frac_str.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

/// Parse a decimal string such as `"1000"` or `"0.5"` into raw units.
pub fn parse_units(s: &str, decimals: u8) -> Result<u128, UnitsError> {
    let s = s.trim().replace('_', "");
    if s.is_empty() {
        return Err(UnitsError::Empty);
    }
    let base = unit(decimals)?;
    let (whole_str, frac_str) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s.as_str(), ""),
    };
    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(UnitsError::Empty);
    }
    let frac_str = frac_str.trim_end_matches('0');
    if frac_str.len() > decimals as usize {
        return Err(UnitsError::TooPrecise(decimals));
    }
    let digits_ok = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if !digits_ok(whole_str) || !digits_ok(frac_str) {
        return Err(UnitsError::InvalidDigit(s.clone()));
    }

    let whole: u128 = if whole_str.is_empty() {
        0
    } else {
        whole_str.parse().map_err(|_| UnitsError::Overflow)?
    };
    let frac: u128 = if frac_str.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac_str, width = decimals as usize);
        padded.parse().map_err(|_| UnitsError::Overflow)?
    };

    whole
        .checked_mul(base)
        .and_then(|w| w.checked_add(frac))
        .ok_or(UnitsError::Overflow)
}

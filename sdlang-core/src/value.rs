//! Typed literal decoding.
//!
//! SDLang uses syntactic typing - the literal's form and suffix determine
//! the type, not value sniffing. The scanner has already classified each
//! literal when these run; decoding maps trimmed token text to a native
//! value.
//!
//! All functions are total over arbitrary input: `None` means the text is
//! not a literal of that form. Out-of-range magnitudes saturate at the
//! type's bounds rather than failing, so sink callbacks stay infallible.

/// Decode an `Int32` literal: `[+-]?[0-9]+`.
///
/// Saturates at the `i32` bounds.
pub fn parse_i32(text: &[u8]) -> Option<i32> {
    let wide = accumulate_decimal(text)?;
    Some(wide.clamp(i32::MIN as i128, i32::MAX as i128) as i32)
}

/// Decode an `Int64` literal, with or without its `l`/`L` suffix.
///
/// Saturates at the `i64` bounds.
pub fn parse_i64(text: &[u8]) -> Option<i64> {
    let digits = strip_suffix(text, &[b'l', b'L']);
    let wide = accumulate_decimal(digits)?;
    Some(wide.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
}

/// Decode an `Int128` literal (the `BD`/`bd` suffix is already trimmed
/// from token text).
///
/// Saturates at the `i128` bounds.
pub fn parse_i128(text: &[u8]) -> Option<i128> {
    accumulate_decimal(text)
}

/// Decode a `Uint32` hex literal: `0x` followed by hex digits.
///
/// Saturates at `u32::MAX`.
pub fn parse_u32(text: &[u8]) -> Option<u32> {
    let wide = accumulate_hex(strip_hex_prefix(text)?)?;
    Some(wide.min(u32::MAX as u128) as u32)
}

/// Decode a `Uint64` hex literal: `0x` followed by hex digits.
///
/// Saturates at `u64::MAX`.
pub fn parse_u64(text: &[u8]) -> Option<u64> {
    let wide = accumulate_hex(strip_hex_prefix(text)?)?;
    Some(wide.min(u64::MAX as u128) as u64)
}

/// Decode a `Float32` literal, with or without its `f`/`F` suffix.
pub fn parse_f32(text: &[u8]) -> Option<f32> {
    parse_float(strip_suffix(text, &[b'f', b'F']))
}

/// Decode a `Float64` literal, with or without its `d`/`D` suffix.
pub fn parse_f64(text: &[u8]) -> Option<f64> {
    parse_float(strip_suffix(text, &[b'd', b'D']))
}

/// Decimal accumulation into i128 with per-digit saturation.
///
/// Negative values accumulate downward so `i128::MIN` is reachable exactly.
fn accumulate_decimal(text: &[u8]) -> Option<i128> {
    let (negative, digits) = match text.first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if digits.is_empty() {
        return None;
    }

    let mut value: i128 = 0;
    for &b in digits {
        let d = match b {
            b'0'..=b'9' => (b - b'0') as i128,
            _ => return None,
        };
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }

    Some(value)
}

fn accumulate_hex(digits: &[u8]) -> Option<u128> {
    if digits.is_empty() {
        return None;
    }

    let mut value: u128 = 0;
    for &b in digits {
        let d = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return None,
        };
        value = value.saturating_mul(16).saturating_add(d as u128);
    }

    Some(value)
}

/// Hex literals are unsigned; anything without the `0x` prefix is not one.
fn strip_hex_prefix(text: &[u8]) -> Option<&[u8]> {
    match text {
        [b'0', b'x' | b'X', rest @ ..] => Some(rest),
        _ => None,
    }
}

fn strip_suffix<'a>(text: &'a [u8], suffixes: &[u8]) -> &'a [u8] {
    match text.split_last() {
        Some((last, rest)) if suffixes.contains(last) => rest,
        _ => text,
    }
}

/// `str::parse` is locale-independent; overflow saturates to the IEEE
/// infinities on its own.
fn parse_float<T: std::str::FromStr>(text: &[u8]) -> Option<T> {
    std::str::from_utf8(text).ok()?.parse().ok()
}

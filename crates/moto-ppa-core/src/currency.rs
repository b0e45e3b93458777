//! Brazilian real (BRL) formatting and parsing.
//!
//! Amounts travel through the engine as [`Money`]; these helpers only deal
//! with the `R$ 1.234,56` text representation used by the storefront.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::types::Money;

const CURRENCY_PREFIX: &str = "R$";

/// Format an amount as `R$ 1.234,56`, rounding half away from zero to cents.
pub fn format_brl(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let plain = format!("{:.2}", rounded.abs());
    let (int_part, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!("{sign}{CURRENCY_PREFIX} {},{cents}", group_thousands(int_part))
}

/// Parse masked input where the last two digits are always cents.
///
/// Every non-digit is ignored, so `"R$ 1.234,56"`, `"1234,56"` and
/// `"123456"` all yield 1234.56, and `"5"` yields 0.05. Returns `None` when
/// the text holds no digits or too many to represent.
pub fn parse_brl(text: &str) -> Option<Money> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let mut value = Decimal::from_str(&digits).ok()?;
    value.set_scale(2).ok()?;
    Some(value.normalize())
}

/// Parse free-typed text with `.` thousands separators and a `,` decimal
/// mark, e.g. `"10.000,50"` or `"R$ 7.500"`.
pub fn parse_decimal_br(text: &str) -> Option<Money> {
    let trimmed = text.trim();
    let unprefixed = trimmed
        .strip_prefix(CURRENCY_PREFIX)
        .unwrap_or(trimmed)
        .trim();

    let (negative, body) = match unprefixed.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, unprefixed),
    };

    let normalized: String = body
        .chars()
        .filter(|c| *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if normalized.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_brl_groups_thousands() {
        assert_eq!(format_brl(dec!(1234.56)), "R$ 1.234,56");
        assert_eq!(format_brl(dec!(12000)), "R$ 12.000,00");
        assert_eq!(format_brl(dec!(1234567.8)), "R$ 1.234.567,80");
    }

    #[test]
    fn test_format_brl_small_and_zero() {
        assert_eq!(format_brl(dec!(0)), "R$ 0,00");
        assert_eq!(format_brl(dec!(0.05)), "R$ 0,05");
        assert_eq!(format_brl(dec!(999)), "R$ 999,00");
    }

    #[test]
    fn test_format_brl_rounds_half_away_from_zero() {
        assert_eq!(format_brl(dec!(391.0777)), "R$ 391,08");
        assert_eq!(format_brl(dec!(0.005)), "R$ 0,01");
        assert_eq!(format_brl(dec!(-0.004)), "R$ 0,00");
    }

    #[test]
    fn test_format_brl_negative() {
        assert_eq!(format_brl(dec!(-1500)), "-R$ 1.500,00");
    }

    #[test]
    fn test_parse_brl_treats_last_two_digits_as_cents() {
        assert_eq!(parse_brl("R$ 1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_brl("123456"), Some(dec!(1234.56)));
        assert_eq!(parse_brl("5"), Some(dec!(0.05)));
        assert_eq!(parse_brl("R$ 10.000,00"), Some(dec!(10000)));
    }

    #[test]
    fn test_parse_brl_without_digits() {
        assert_eq!(parse_brl(""), None);
        assert_eq!(parse_brl("R$ ,"), None);
    }

    #[test]
    fn test_parse_decimal_br() {
        assert_eq!(parse_decimal_br("10.000,50"), Some(dec!(10000.50)));
        assert_eq!(parse_decimal_br("R$ 7.500"), Some(dec!(7500)));
        assert_eq!(parse_decimal_br("  4000 "), Some(dec!(4000)));
        assert_eq!(parse_decimal_br("-1,5"), Some(dec!(-1.5)));
        assert_eq!(parse_decimal_br("abc"), None);
        assert_eq!(parse_decimal_br("R$"), None);
    }
}

use moto_ppa_core::currency::parse_decimal_br;
use rust_decimal::Decimal;
use std::str::FromStr;

/// clap value parser for BRL amounts. Accepts plain decimals (`12000.50`)
/// and storefront notation (`R$ 12.000,50`, `12.000`, `4000,00`).
pub fn parse_amount(text: &str) -> Result<Decimal, String> {
    let trimmed = text.trim();
    let parsed = if is_brl_notation(trimmed) {
        parse_decimal_br(trimmed)
    } else {
        Decimal::from_str(trimmed).ok()
    };
    parsed.ok_or_else(|| format!("'{text}' is not an amount (e.g. 12000.50 or R$ 12.000,50)"))
}

/// A comma, the currency prefix, or dots grouping thousands (`1.500`,
/// `12.000.000`) mean pt-BR notation.
fn is_brl_notation(text: &str) -> bool {
    if text.contains(',') || text.contains("R$") {
        return true;
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut groups = digits.split('.');
    let head_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
    let tail: Vec<&str> = groups.collect();
    head_ok
        && !tail.is_empty()
        && tail
            .iter()
            .all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

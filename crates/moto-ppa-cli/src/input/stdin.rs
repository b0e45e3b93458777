use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Piped stdin parsed as `T`. `None` on an interactive terminal or when
/// nothing but whitespace was piped.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(text: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value =
        serde_json::from_str(trimmed).map_err(|e| format!("Failed to parse stdin: {e}"))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use moto_ppa_core::ppa::LoanRequest;
    use rust_decimal::Decimal;

    #[test]
    fn test_blank_input_is_none() {
        let parsed: Option<LoanRequest> = parse_piped("  \n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_request_parsed_from_pipe() {
        let parsed: Option<LoanRequest> = parse_piped(
            r#"{"motorcycle_price": "10000", "down_payment": "5000", "monthly_income": "9000"}"#,
        )
        .unwrap();
        let req = parsed.unwrap();
        assert_eq!(req.down_payment, Decimal::from(5000));
    }

    #[test]
    fn test_wrong_shape_names_stdin() {
        let err = parse_piped::<LoanRequest>(r#"{"price": 1}"#).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse stdin"));
    }
}

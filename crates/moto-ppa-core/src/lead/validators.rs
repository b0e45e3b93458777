//! Single-field validators for the lead form. Messages are user-facing
//! (pt-BR); every validator returns the cleaned value on success.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ppa::policy::MAX_AMOUNT;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        FieldError {
            message: message.into(),
        }
    }
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Who is filling in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "comprador")]
    Buyer,
    #[serde(rename = "vendedor")]
    Seller,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Buyer => "comprador",
            UserType::Seller => "vendedor",
        }
    }
}

pub fn validate_user_type(raw: &str) -> FieldResult<UserType> {
    match raw.trim().to_lowercase().as_str() {
        "comprador" => Ok(UserType::Buyer),
        "vendedor" => Ok(UserType::Seller),
        _ => Err(FieldError::new("Selecione se você é comprador ou vendedor.")),
    }
}

/// "sim" / "nao" into whether the customer holds a driver's licence.
pub fn validate_cnh(raw: &str) -> FieldResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "sim" => Ok(true),
        "nao" | "não" => Ok(false),
        _ => Err(FieldError::new("Informe se possui CNH.")),
    }
}

/// Returns the CPF reduced to its 11 digits.
pub fn validate_cpf(raw: &str) -> FieldResult<String> {
    let digits = only_digits(raw);
    if digits.is_empty() {
        return Err(FieldError::new("CPF obrigatório."));
    }
    if digits.len() != 11 {
        return Err(FieldError::new("CPF deve ter 11 dígitos."));
    }
    if !is_valid_cpf(&digits) {
        return Err(FieldError::new("CPF inválido."));
    }
    Ok(digits)
}

/// Check-digit test on an 11-digit string. Repeated-digit CPFs
/// (000.000.000-00, 111...) pass the arithmetic but are not issued.
pub fn is_valid_cpf(digits: &str) -> bool {
    let nums: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if nums.len() != 11 || digits.len() != 11 {
        return false;
    }
    if nums.iter().all(|d| *d == nums[0]) {
        return false;
    }

    check_digit(&nums[..9]) == nums[9] && check_digit(&nums[..10]) == nums[10]
}

fn check_digit(prefix: &[u32]) -> u32 {
    let weight_start = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest == 10 {
        0
    } else {
        rest
    }
}

pub fn validate_required_name(raw: &str, label: &str) -> FieldResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError::new(format!("{label} obrigatório.")));
    }
    Ok(value.to_string())
}

/// `local@domain.tld`, no whitespace, a single `@`. Returned lowercased.
pub fn validate_email(raw: &str) -> FieldResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError::new("E-mail obrigatório."));
    }
    if !looks_like_email(value) {
        return Err(FieldError::new("E-mail inválido."));
    }
    Ok(value.to_lowercase())
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // some dot with at least one character on each side
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Brazilian phone: 10 digits (landline) or 11 (mobile with the extra 9),
/// area code included.
pub fn validate_phone(raw: &str) -> FieldResult<String> {
    let digits = only_digits(raw);
    if digits.is_empty() {
        return Err(FieldError::new("Telefone obrigatório."));
    }
    if !(10..=11).contains(&digits.len()) {
        return Err(FieldError::new("Telefone inválido."));
    }
    Ok(digits)
}

pub fn validate_positive_amount(value: Option<Money>, label: &str) -> FieldResult<Money> {
    match value {
        None => Err(FieldError::new(format!("{label} obrigatório."))),
        Some(v) if v <= Decimal::ZERO => {
            Err(FieldError::new(format!("{label} deve ser maior que zero.")))
        }
        Some(v) if v > MAX_AMOUNT => Err(FieldError::new(format!("{label} acima do permitido."))),
        Some(v) => Ok(v),
    }
}

pub fn validate_down_payment_vs_price(price: Money, down_payment: Money) -> FieldResult<()> {
    if down_payment > price {
        return Err(FieldError::new(
            "A entrada não pode ser maior que o valor total da moto.",
        ));
    }
    Ok(())
}

fn only_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_cpf_with_and_without_mask() {
        assert_eq!(validate_cpf("529.982.247-25").unwrap(), "52998224725");
        assert_eq!(validate_cpf("11144477735").unwrap(), "11144477735");
    }

    #[test]
    fn test_cpf_check_digits() {
        assert!(!is_valid_cpf("52998224724"));
        assert!(!is_valid_cpf("11144477705"));
    }

    #[test]
    fn test_cpf_repeated_digits_rejected() {
        assert_eq!(validate_cpf("111.111.111-11").unwrap_err().message, "CPF inválido.");
        assert!(!is_valid_cpf("00000000000"));
    }

    #[test]
    fn test_cpf_length_and_presence() {
        assert_eq!(validate_cpf("").unwrap_err().message, "CPF obrigatório.");
        assert_eq!(validate_cpf("123.456").unwrap_err().message, "CPF deve ter 11 dígitos.");
    }

    #[test]
    fn test_email() {
        assert_eq!(validate_email("  Ana@Loja.com.br ").unwrap(), "ana@loja.com.br");
        assert!(validate_email("ana@loja").is_err());
        assert!(validate_email("ana@.com").is_err());
        assert!(validate_email("ana@loja.").is_err());
        assert!(validate_email("ana maria@loja.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert_eq!(validate_email("").unwrap_err().message, "E-mail obrigatório.");
    }

    #[test]
    fn test_phone() {
        assert_eq!(validate_phone("(11) 98765-4321").unwrap(), "11987654321");
        assert_eq!(validate_phone("(11) 3456-7890").unwrap(), "1134567890");
        assert_eq!(validate_phone("98765-4321").unwrap_err().message, "Telefone inválido.");
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_user_type_and_cnh() {
        assert_eq!(validate_user_type(" Vendedor ").unwrap(), UserType::Seller);
        assert_eq!(validate_user_type("comprador").unwrap(), UserType::Buyer);
        assert!(validate_user_type("gerente").is_err());
        assert!(validate_cnh("SIM").unwrap());
        assert!(!validate_cnh("nao").unwrap());
        assert!(validate_cnh("talvez").is_err());
    }

    #[test]
    fn test_amounts() {
        assert_eq!(validate_positive_amount(Some(dec!(10)), "Valor").unwrap(), dec!(10));
        assert_eq!(
            validate_positive_amount(Some(dec!(0)), "Renda mensal").unwrap_err().message,
            "Renda mensal deve ser maior que zero."
        );
        assert_eq!(
            validate_positive_amount(None, "Valor da moto").unwrap_err().message,
            "Valor da moto obrigatório."
        );
        assert_eq!(
            validate_positive_amount(Some(Decimal::MAX), "Renda mensal").unwrap_err().message,
            "Renda mensal acima do permitido."
        );
        assert!(validate_down_payment_vs_price(dec!(10_000), dec!(10_000)).is_ok());
        assert!(validate_down_payment_vs_price(dec!(10_000), dec!(10_000.01)).is_err());
    }
}

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::PpaError;
use crate::types::{Money, Rate};
use crate::PpaOutcome;

/// Level payment (PMT) for a loan of `present_value` over `nper` periods.
///
/// Sign convention follows the spreadsheet function: money received is
/// positive, so a loan principal passed as a negative present value yields a
/// positive payment. With a zero rate the principal is split evenly.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> PpaOutcome<Money> {
    if nper == 0 {
        return Err(PpaError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let factor = (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| overflow("rate"))?;
    let annuity_factor = (factor - Decimal::ONE)
        .checked_div(rate)
        .ok_or_else(|| overflow("rate"))?;

    if annuity_factor.is_zero() {
        return Err(PpaError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let future_worth = present_value
        .checked_mul(factor)
        .and_then(|v| v.checked_add(future_value))
        .ok_or_else(|| overflow("present_value"))?;
    Ok(-future_worth / annuity_factor)
}

fn overflow(field: &str) -> PpaError {
    PpaError::InvalidInput {
        field: field.into(),
        reason: "Value too large for PMT".into(),
    }
}

/// Installment for borrowing `principal` at `monthly_rate` over `months`.
pub fn loan_installment(principal: Money, monthly_rate: Rate, months: u32) -> PpaOutcome<Money> {
    pmt(monthly_rate, months, -principal, Decimal::ZERO)
}

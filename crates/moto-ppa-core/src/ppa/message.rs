//! pt-BR user-facing text for a PPA decision.

use rust_decimal::Decimal;

use super::evaluator::{LoanRequest, PpaResult, RejectionReason, Suggestion};
use super::policy::PpaPolicy;
use crate::currency::format_brl;

const REJECTED_HEADLINE: &str =
    "Pré-Análise não concedida. Por favor, ajuste os valores e tente novamente.";

/// Render the decision under the standard policy.
pub fn format_decision(request: &LoanRequest, result: &PpaResult) -> String {
    format_decision_with_policy(request, result, &PpaPolicy::default())
}

/// Render the decision, quoting thresholds from `policy`.
pub fn format_decision_with_policy(
    request: &LoanRequest,
    result: &PpaResult,
    policy: &PpaPolicy,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    let Some(suggestion) = result.suggestion() else {
        lines.push("Pré-Análise concedida.".to_string());
        lines.push(format!(
            "Valor financiado: {}; parcela de referência em {}x: {}.",
            format_brl(result.financed_amount),
            policy.reference_term_months,
            format_brl(result.reference_installment),
        ));
        return lines.join("\n");
    };

    lines.push(REJECTED_HEADLINE.to_string());

    match suggestion {
        Suggestion::CreditLimit {
            max_financeable_amount,
            min_down_payment,
            max_motorcycle_price,
        } => {
            let cause = if result.rejected_by_credit_ceiling {
                "ultrapassa o máximo de crédito que oferecemos"
            } else {
                "sua renda não é suficiente para o crédito solicitado"
            };
            lines.push(format!("O pedido foi reprovado porque {cause}."));
            lines.push(format!(
                "O valor máximo que podemos financiar é {}.",
                format_brl(max_financeable_amount)
            ));
            if min_down_payment > request.down_payment {
                lines.push(format!(
                    "- SUGESTÃO: Aumente sua entrada para pelo menos {}; OU",
                    format_brl(min_down_payment)
                ));
            }
            if max_motorcycle_price < request.motorcycle_price {
                lines.push(format!(
                    "- SUGESTÃO: Escolha uma moto de até {} (mantendo a entrada atual).",
                    format_brl(max_motorcycle_price)
                ));
            }
        }
        Suggestion::DownPayment {
            min_down_payment,
            max_motorcycle_price,
        } => {
            lines.push("Seu pedido foi reprovado pelos seguintes motivos:".to_string());
            for reason in &result.reasons {
                lines.push(format!("- {}", describe_reason(*reason, policy)));
            }
            lines.push("Para ser aprovado, sugerimos que você:".to_string());
            lines.push(format!(
                "- SUGESTÃO: Aumente sua entrada para pelo menos {}; OU",
                format_brl(min_down_payment)
            ));
            lines.push(format!(
                "- SUGESTÃO: Escolha uma moto de até {} (mantendo a entrada atual).",
                format_brl(max_motorcycle_price)
            ));
        }
    }

    lines.join("\n")
}

/// Portuguese text for a rejection reason, with the policy's thresholds.
pub fn describe_reason(reason: RejectionReason, policy: &PpaPolicy) -> String {
    match reason {
        RejectionReason::DownPaymentBelowMinimum => format!(
            "Entrada mínima de {} não atingida",
            format_brl(policy.min_down_payment)
        ),
        RejectionReason::DownPaymentBelowRatio => format!(
            "Entrada menor que {}% do valor da moto",
            percent(policy.min_down_payment_ratio)
        ),
        RejectionReason::CreditCeilingExceeded => format!(
            "Crédito solicitado acima do limite ({})",
            format_brl(policy.credit_ceiling)
        ),
        RejectionReason::IncomeRatioExceeded => format!(
            "Parcela excede 1/{} da renda",
            policy.income_commitment_divisor.normalize()
        ),
    }
}

fn percent(rate: Decimal) -> String {
    (rate * Decimal::ONE_HUNDRED)
        .normalize()
        .to_string()
        .replace('.', ",")
}

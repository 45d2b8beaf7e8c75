use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rounds a monetary amount to 2 decimal places for display.
///
/// `None` when the amount is not finite or lies outside `Decimal`'s range.
pub fn round_money(amount: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(amount)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmiBreakdown {
    /// Unrounded monthly installment
    pub monthly: f64,
    pub tenure_months: f64,
    pub total_payable: f64,
    pub total_interest: f64,
}

impl EmiBreakdown {
    pub fn monthly_rounded(&self) -> Option<Decimal> {
        round_money(self.monthly)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmiOutcome {
    Calculated(EmiBreakdown),
    NotCalculated { reason: String },
}

impl EmiOutcome {
    pub fn breakdown(&self) -> Option<&EmiBreakdown> {
        match self {
            EmiOutcome::Calculated(b) => Some(b),
            EmiOutcome::NotCalculated { .. } => None,
        }
    }

    pub fn monthly_rounded(&self) -> Option<Decimal> {
        self.breakdown().and_then(EmiBreakdown::monthly_rounded)
    }
}

impl fmt::Display for EmiOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.monthly_rounded() {
            Some(emi) => write!(f, "{:.2}", emi),
            None => write!(f, "not calculated"),
        }
    }
}

/// Standard amortization: EMI = P·r·(1+r)^N / ((1+r)^N − 1), r = R / 1200.
pub struct EmiCalculator;

impl EmiCalculator {
    /// * `principal` - loan amount
    /// * `annual_rate_pct` - yearly interest in percent (7.5 means 7.5%)
    /// * `tenure_months` - number of monthly installments
    pub fn calculate(principal: f64, annual_rate_pct: f64, tenure_months: f64) -> EmiOutcome {
        if !principal.is_finite() || principal <= 0.0 {
            return EmiOutcome::NotCalculated {
                reason: format!("principal must be positive, got {}", principal),
            };
        }
        if !tenure_months.is_finite() || tenure_months <= 0.0 {
            return EmiOutcome::NotCalculated {
                reason: format!("tenure must be positive, got {}", tenure_months),
            };
        }
        if !annual_rate_pct.is_finite() || annual_rate_pct < 0.0 {
            return EmiOutcome::NotCalculated {
                reason: format!("interest rate must not be negative, got {}", annual_rate_pct),
            };
        }

        let r = annual_rate_pct / 1200.0;
        let monthly = if r == 0.0 {
            principal / tenure_months
        } else {
            let growth = (1.0 + r).powf(tenure_months);
            principal * r * growth / (growth - 1.0)
        };

        if !monthly.is_finite() {
            return EmiOutcome::NotCalculated {
                reason: "installment is not representable".to_string(),
            };
        }

        let total_payable = monthly * tenure_months;
        EmiOutcome::Calculated(EmiBreakdown {
            monthly,
            tenure_months,
            total_payable,
            total_interest: total_payable - principal,
        })
    }
}

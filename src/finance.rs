//! General functions related to finance.
use crate::units::{Dimensionless, Money, MoneyPerYear, Year};

/// Calculates the capital recovery factor (CRF) for a given loan term and interest rate.
///
/// The CRF is used to annualize capital costs over the term of a loan.
pub fn capital_recovery_factor(years: u32, interest_rate: Dimensionless) -> Dimensionless {
    if years == 0 {
        return Dimensionless(0.0);
    }
    if interest_rate == Dimensionless(0.0) {
        return Dimensionless(1.0) / Dimensionless(f64::from(years));
    }
    let factor = Dimensionless((1.0 + interest_rate.value()).powf(f64::from(years)));
    (interest_rate * factor) / (factor - Dimensionless(1.0))
}

/// Calculates the annual repayment on a capital cost
pub fn annual_capital_cost(
    capital_cost: Money,
    years: u32,
    interest_rate: Dimensionless,
) -> MoneyPerYear {
    let crf = capital_recovery_factor(years, interest_rate);
    capital_cost * crf / Year(1.0)
}

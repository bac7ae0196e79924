//! Error types for cost calculations.
//!
//! Every calculation is deterministic, so none of these errors are transient: the same inputs will
//! always fail in the same way. Callers evaluating many scenarios should catch errors per scenario
//! rather than retrying.
use thiserror::Error;

/// An error raised while calculating CAPEX, OPEX or residual value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TcoError {
    /// Vehicle or country data is malformed or out of domain (e.g. a negative age)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// There is no model for the given powertrain type
    #[error("Unsupported powertrain: {0}")]
    UnsupportedPowertrain(String),

    /// A required coefficient was not found in the parameter data
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
}

/// Result type for cost calculations
pub type Result<T> = std::result::Result<T, TcoError>;

/// Return early with [`TcoError::InvalidInput`] if the condition is not satisfied.
///
/// Works like `anyhow::ensure!`, but produces a typed error.
macro_rules! ensure_input {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::TcoError::InvalidInput(format!($($arg)+)));
        }
    };
}
pub(crate) use ensure_input;

/// Check that a quantity is finite and non-negative
macro_rules! ensure_non_negative {
    ($value:expr, $name:expr) => {
        $crate::error::ensure_input!(
            $value.is_finite() && $value.value() >= 0.0,
            "{} must be a finite, non-negative number (got {})",
            $name,
            $value
        )
    };
}
pub(crate) use ensure_non_negative;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Money;

    fn check_cost(cost: Money) -> Result<()> {
        ensure_non_negative!(cost, "purchase_cost");
        Ok(())
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(check_cost(Money(0.0)).is_ok());
        assert!(check_cost(Money(10.0)).is_ok());
        assert_eq!(
            check_cost(Money(-1.0)).unwrap_err(),
            TcoError::InvalidInput(
                "purchase_cost must be a finite, non-negative number (got -1)".into()
            )
        );
        assert!(check_cost(Money(f64::NAN)).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = TcoError::MissingParameter("energy price for FRA in 2030".into());
        assert_eq!(err.to_string(), "Missing parameter: energy price for FRA in 2030");
    }
}

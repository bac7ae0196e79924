//! Total cost of ownership: capital and operating costs over the period of ownership, less the
//! residual value of the vehicle at the end of it.
use crate::error::{Result, ensure_input, ensure_non_negative};
use crate::units::{Money, MoneyPerYear, Year};
use log::debug;

/// The total cost of ownership, broken down into its components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TcoBreakdown {
    /// Sum of CAPEX payments
    pub capex: Money,
    /// Sum of OPEX
    pub opex: Money,
    /// Residual value at the end of the period
    pub residual_value: Money,
}

impl TcoBreakdown {
    /// Combine constant annual CAPEX and OPEX over a number of years.
    ///
    /// # Arguments
    ///
    /// * `capex_per_year` - Annualised CAPEX
    /// * `opex_per_year` - Annual OPEX
    /// * `years` - Length of the period of ownership
    /// * `residual_value` - Residual value at the end of the period
    pub fn from_annual(
        capex_per_year: MoneyPerYear,
        opex_per_year: MoneyPerYear,
        years: Year,
        residual_value: Money,
    ) -> Result<Self> {
        ensure_non_negative!(years, "years");

        Self::new(
            capex_per_year * years,
            opex_per_year * years,
            residual_value,
        )
    }

    /// Combine CAPEX and OPEX given year by year.
    ///
    /// The two series must cover the same number of years.
    pub fn from_series(capex: &[Money], opex: &[Money], residual_value: Money) -> Result<Self> {
        ensure_input!(
            capex.len() == opex.len(),
            "CAPEX covers {} years but OPEX covers {}",
            capex.len(),
            opex.len()
        );

        Self::new(
            capex.iter().copied().sum(),
            opex.iter().copied().sum(),
            residual_value,
        )
    }

    fn new(capex: Money, opex: Money, residual_value: Money) -> Result<Self> {
        ensure_non_negative!(residual_value, "residual_value");
        let tco = Self {
            capex,
            opex,
            residual_value,
        };
        debug!(
            "TCO {} (CAPEX {capex}, OPEX {opex}, residual value {residual_value})",
            tco.total()
        );

        Ok(tco)
    }

    /// The total cost of ownership
    pub fn total(&self) -> Money {
        self.capex + self.opex - self.residual_value
    }
}

//! Adjustment of a vehicle's value for the economic conditions of the year it is resold.
use crate::country::CountryProperties;
use crate::error::{Result, ensure_input, ensure_non_negative};
use crate::parameters::ExternalCoefficients;
use crate::settings::ModelSettings;
use crate::units::{Dimensionless, Money};
use crate::vehicle::Powertrain;
use log::trace;

/// The effect of external factors on a vehicle's value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalAdjustment {
    /// Effect of the energy price trend since the reference year
    pub energy: Dimensionless,
    /// Effect of the CO2 tax
    pub co2: Dimensionless,
    /// Resale subsidy reflected in the value
    pub subsidy_bonus: Money,
    /// The value after all external factors have been applied
    pub adjusted_value: Money,
}

impl ExternalAdjustment {
    /// The combined multiplicative effect of energy prices and CO2 tax.
    ///
    /// The subsidy bonus is additive so is not included.
    pub fn factor(&self) -> Dimensionless {
        self.energy * self.co2
    }
}

/// Rising energy prices make a vehicle less attractive to buy second-hand
fn energy_factor(
    powertrain: Powertrain,
    country: &CountryProperties,
    projection_year: u32,
    coefficients: &ExternalCoefficients,
    settings: &ModelSettings,
) -> Result<Dimensionless> {
    let reference_price = country.energy_price(powertrain, country.reference_year)?;
    let projected_price = country.energy_price(powertrain, projection_year)?;
    ensure_input!(
        reference_price.value() > 0.0,
        "Energy price for {powertrain} in {} for {} must be greater than zero",
        country.id,
        country.reference_year
    );

    let trend = projected_price / reference_price;
    let sensitivity = coefficients.energy_price_sensitivity;
    let factor = Dimensionless(1.0) - sensitivity * (trend - Dimensionless(1.0));
    trace!("Energy price trend for {powertrain}: {trend}");

    Ok(factor.max(settings.energy_factor_floor).min(Dimensionless(1.0)))
}

fn co2_factor(
    powertrain: Powertrain,
    country: &CountryProperties,
    projection_year: u32,
    coefficients: &ExternalCoefficients,
) -> Result<Dimensionless> {
    // No tailpipe emissions to tax
    if powertrain.is_zero_emission() {
        return Ok(Dimensionless(1.0));
    }

    let tax = country.co2_tax(projection_year)?;
    ensure_non_negative!(tax, "CO2 tax rate");

    Ok((-(coefficients.co2_sensitivity * tax)).exp())
}

/// Apply energy price, CO2 tax and subsidy effects to a vehicle's value.
///
/// The energy and CO2 effects can only reduce the value; the subsidy is added on top, after which
/// the value is clamped to be non-negative.
///
/// # Arguments
///
/// * `value` - The value after depreciation and health penalty
/// * `powertrain` - The vehicle's powertrain
/// * `country` - The country in which the vehicle is resold
/// * `projection_year` - The year of resale, which must not be before the country's reference year
/// * `coefficients` - The vehicle's sensitivity to each effect
/// * `settings` - Provides the lower bound of the energy factor
pub fn apply_external_factors(
    value: Money,
    powertrain: Powertrain,
    country: &CountryProperties,
    projection_year: u32,
    coefficients: &ExternalCoefficients,
    settings: &ModelSettings,
) -> Result<ExternalAdjustment> {
    ensure_non_negative!(value, "value");
    ensure_input!(
        projection_year >= country.reference_year,
        "Projection year {projection_year} is before the reference year {} for {}",
        country.reference_year,
        country.id
    );

    let energy = energy_factor(powertrain, country, projection_year, coefficients, settings)?;
    let co2 = co2_factor(powertrain, country, projection_year, coefficients)?;
    let subsidy_bonus =
        country.resale_subsidy(powertrain, projection_year)? * coefficients.subsidy_pass_through;
    let adjusted_value = (value * energy * co2 + subsidy_bonus).max(Money(0.0));

    Ok(ExternalAdjustment {
        energy,
        co2,
        subsidy_bonus,
        adjusted_value,
    })
}

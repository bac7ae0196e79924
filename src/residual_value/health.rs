//! The health penalty reflects the condition of a vehicle beyond its age and usage.
//!
//! Four sub-factors are calculated, each in `(0, 1]`:
//!
//! * efficiency relative to the country benchmark for the powertrain
//! * technological obsolescence
//! * battery degradation caused by charging (externally charged powertrains only)
//! * remaining warranty coverage
//!
//! These are then combined according to [`HealthCombination`].
use crate::country::CountryProperties;
use crate::error::{Result, TcoError, ensure_input};
use crate::parameters::{BatteryDegradation, VehicleCoefficients};
use crate::settings::{HealthCombination, HealthWeights, ModelSettings};
use crate::units::{Dimensionless, Year};
use crate::vehicle::{ChargingProfile, VehicleProperties};
use log::trace;

/// The health penalty for a vehicle, with its breakdown into sub-factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthPenalty {
    /// Efficiency relative to the benchmark
    pub efficiency: Dimensionless,
    /// Technological obsolescence
    pub obsolescence: Dimensionless,
    /// Battery degradation from charging (exactly 1 for powertrains which aren't externally charged)
    pub charging: Dimensionless,
    /// Remaining warranty coverage
    pub warranty: Dimensionless,
    /// The combined penalty factor, applied to the depreciated value
    pub combined: Dimensionless,
}

/// Restrict a sub-factor to `[floor, 1]`. The upper bound takes precedence.
fn bound(factor: Dimensionless, floor: Dimensionless) -> Dimensionless {
    factor.max(floor).min(Dimensionless(1.0))
}

fn efficiency_factor(
    vehicle: &VehicleProperties,
    country: &CountryProperties,
) -> Result<Dimensionless> {
    ensure_input!(
        vehicle.powertrain_efficiency.is_finite() && vehicle.powertrain_efficiency.value() > 0.0,
        "powertrain_efficiency must be greater than zero (got {})",
        vehicle.powertrain_efficiency
    );

    let benchmark = country.benchmark_efficiency(vehicle.powertrain)?;
    ensure_input!(
        benchmark.value() > 0.0,
        "Benchmark efficiency for {} in {} must be greater than zero",
        vehicle.powertrain,
        country.id
    );

    Ok((vehicle.powertrain_efficiency / benchmark).min(Dimensionless(1.0)))
}

/// Decay of value as newer powertrain technology reaches the market.
///
/// The clock starts when the powertrain model was introduced, not when the vehicle was bought, so
/// two vehicles of the same age can be penalised differently.
fn obsolescence_factor(
    vehicle: &VehicleProperties,
    coefficients: &VehicleCoefficients,
    projection_year: u32,
) -> Result<Dimensionless> {
    ensure_input!(
        vehicle.powertrain_model_year <= projection_year,
        "Powertrain model year {} is after the projection year {projection_year}",
        vehicle.powertrain_model_year
    );

    let model_age = Year(f64::from(projection_year - vehicle.powertrain_model_year));
    Ok((-(model_age * coefficients.obsolescence_rate)).exp())
}

/// Capacity lost per equivalent full cycle, weighted by how the battery is charged
fn degradation_per_cycle(profile: &ChargingProfile, battery: &BatteryDegradation) -> Dimensionless {
    profile.share_slow * battery.per_cycle_slow
        + profile.share_fast * battery.per_cycle_fast
        + profile.share_ultra * battery.per_cycle_ultra
}

fn charging_factor(
    vehicle: &VehicleProperties,
    coefficients: &VehicleCoefficients,
) -> Result<Dimensionless> {
    if !vehicle.powertrain.is_externally_charged() {
        return Ok(Dimensionless(1.0));
    }

    let profile = vehicle.charging_profile.as_ref().ok_or_else(|| {
        TcoError::InvalidInput(format!(
            "A charging profile is required for {} vehicles",
            vehicle.powertrain
        ))
    })?;
    profile.validate()?;

    let battery = coefficients.battery.as_ref().ok_or_else(|| {
        TcoError::MissingParameter(format!(
            "No battery degradation coefficients for {}",
            vehicle.powertrain
        ))
    })?;

    // Cycles are counted per year of service
    let years = Dimensionless(vehicle.age.value());
    let cumulative = profile.cycles_per_year() * degradation_per_cycle(profile, battery) * years;
    trace!("Cumulative battery degradation: {cumulative}");

    Ok((-(battery.decay_constant * cumulative)).exp())
}

/// Combine the sub-factors into a single factor
fn combine(
    factors: [Dimensionless; 4],
    combination: HealthCombination,
    weights: &HealthWeights,
) -> Dimensionless {
    match combination {
        HealthCombination::Multiplicative => factors
            .into_iter()
            .fold(Dimensionless(1.0), |acc, factor| acc * factor),
        HealthCombination::WeightedMean => {
            let weights = [
                weights.efficiency,
                weights.obsolescence,
                weights.charging,
                weights.warranty,
            ];
            let total_weight: Dimensionless = weights.iter().copied().sum();
            let weighted: Dimensionless = factors
                .into_iter()
                .zip(weights)
                .map(|(factor, weight)| factor * weight)
                .sum();

            weighted / total_weight
        }
    }
}

/// Calculate the health penalty for a vehicle.
///
/// # Arguments
///
/// * `vehicle` - The vehicle being valued
/// * `country` - The country supplying benchmark efficiencies
/// * `coefficients` - Coefficients for the vehicle's class, powertrain and country
/// * `projection_year` - The year in which the vehicle is valued
/// * `settings` - Floors for each sub-factor and the combination strategy
pub fn compute_health_penalty(
    vehicle: &VehicleProperties,
    country: &CountryProperties,
    coefficients: &VehicleCoefficients,
    projection_year: u32,
    settings: &ModelSettings,
) -> Result<HealthPenalty> {
    let efficiency = bound(
        efficiency_factor(vehicle, country)?,
        settings.efficiency_floor,
    );
    let obsolescence = bound(
        obsolescence_factor(vehicle, coefficients, projection_year)?,
        settings.obsolescence_floor,
    );
    let charging = bound(
        charging_factor(vehicle, coefficients)?,
        settings.charging_floor,
    );
    let remaining = vehicle.warranty.remaining_fraction(vehicle.age, vehicle.usage);
    let warranty = bound(
        settings.warranty_floor + (Dimensionless(1.0) - settings.warranty_floor) * remaining,
        settings.warranty_floor,
    );
    trace!(
        "Health sub-factors: efficiency {efficiency}, obsolescence {obsolescence}, \
         charging {charging}, warranty {warranty}"
    );

    let combined = combine(
        [efficiency, obsolescence, charging, warranty],
        settings.health_combination,
        &settings.health_weights,
    );

    Ok(HealthPenalty {
        efficiency,
        obsolescence,
        charging,
        warranty,
        combined,
    })
}

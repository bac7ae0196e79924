//! Helpers for deriving a powertrain efficiency ratio from measured quantities.
//!
//! The residual value model takes efficiency as a ratio. These functions produce that ratio from
//! the quantities usually available for each family of powertrain.
use crate::error::{Result, ensure_input};
use crate::units::Dimensionless;

/// Efficiency assumed for electric drivetrains with no recorded real-world consumption
pub const DEFAULT_ELECTRIC_EFFICIENCY: Dimensionless = Dimensionless(0.85);

/// Efficiency of a combustion engine, `3600 / (SFC * Q_HV)`.
///
/// # Arguments
///
/// * `specific_fuel_consumption` - Minimum specific fuel consumption in g/kWh
/// * `heating_value` - Lower heating value of the fuel in MJ/kg
pub fn combustion_efficiency(
    specific_fuel_consumption: f64,
    heating_value: f64,
) -> Result<Dimensionless> {
    ensure_input!(
        specific_fuel_consumption > 0.0 && heating_value > 0.0,
        "Specific fuel consumption and heating value must be positive"
    );

    Ok(Dimensionless(
        3600.0 / (specific_fuel_consumption * heating_value),
    ))
}

/// Efficiency of an electric or fuel cell drivetrain relative to its rated consumption.
///
/// Both consumptions must be in the same unit (e.g. kWh/km). When no real consumption has been
/// recorded, [`DEFAULT_ELECTRIC_EFFICIENCY`] is used.
pub fn electric_efficiency(benchmark_consumption: f64, real_consumption: f64) -> Dimensionless {
    if real_consumption > 0.0 {
        Dimensionless(benchmark_consumption / real_consumption)
    } else {
        DEFAULT_ELECTRIC_EFFICIENCY
    }
}

/// Efficiency of a hybrid, `1 / (α/η_ev + (1 - α)/η_ice)`, where α is the utility factor.
///
/// A utility factor outside the open interval (0, 1) means the vehicle effectively runs on its
/// combustion engine alone.
pub fn hybrid_efficiency(
    utility_factor: Dimensionless,
    electric: Dimensionless,
    combustion: Dimensionless,
) -> Dimensionless {
    let alpha = utility_factor.value();
    if alpha > 0.0 && alpha < 1.0 {
        Dimensionless(1.0 / (alpha / electric.value() + (1.0 - alpha) / combustion.value()))
    } else {
        combustion
    }
}

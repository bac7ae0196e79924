//! Coefficients for the residual value model, keyed by country, vehicle class, powertrain and year.
//!
//! The parameter data is owned by the caller and only ever read here. Calculators receive it as an
//! implementation of [`ParameterTable`], so they can be tested without touching the filesystem.
use crate::country::CountryID;
use crate::error::{Result, TcoError, ensure_input, ensure_non_negative};
use crate::units::{Dimensionless, MassPerMoney, MoneyPerYear, PerYear, Usage, Year};
use crate::vehicle::{Powertrain, VehicleClassID};
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::collections::HashMap;
use std::fmt;

/// The key used to look up [`VehicleCoefficients`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterKey {
    /// The country of registration
    pub country: CountryID,
    /// The vehicle class
    pub vehicle_class: VehicleClassID,
    /// The powertrain type
    pub powertrain: Powertrain,
    /// The year for which the coefficients apply
    pub year: u32,
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.country, self.vehicle_class, self.powertrain, self.year
        )
    }
}

/// The shape of the age-based depreciation curve
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum DepreciationCurve {
    /// Value falls by a fixed fraction of the purchase cost each year
    #[string = "linear"]
    Linear,
    /// Value falls by a fixed fraction of the remaining value each year
    #[string = "exponential"]
    Exponential,
}

/// Coefficients for the depreciation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationCoefficients {
    /// Shape of the age-based curve
    pub curve: DepreciationCurve,
    /// Annual depreciation rate
    pub rate: PerYear,
    /// Age at which the vehicle is only worth its salvage value
    pub expected_life: Year,
    /// Usage at which the vehicle is only worth its salvage value
    pub expected_usage: Usage,
    /// Proportion of value lost through usage over the expected usage
    pub usage_weight: Dimensionless,
    /// Expected annual maintenance spend
    pub maintenance_benchmark: MoneyPerYear,
    /// Value retained per unit of maintenance spend above (or lost below) the benchmark
    pub maintenance_coefficient: Dimensionless,
    /// Minimum value as a proportion of purchase cost
    pub salvage_floor: Dimensionless,
}

/// Coefficients describing battery degradation per equivalent full charge cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryDegradation {
    /// Capacity lost per cycle with slow charging
    pub per_cycle_slow: Dimensionless,
    /// Capacity lost per cycle with fast charging
    pub per_cycle_fast: Dimensionless,
    /// Capacity lost per cycle with ultra-fast charging
    pub per_cycle_ultra: Dimensionless,
    /// Decay constant converting cumulative degradation into value retention (k_d)
    pub decay_constant: Dimensionless,
}

/// Sensitivity of residual value to external economic factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalCoefficients {
    /// Proportion of value lost per unit relative increase in energy price
    pub energy_price_sensitivity: Dimensionless,
    /// Value decay per unit CO2 tax (inverse of €/t)
    pub co2_sensitivity: MassPerMoney,
    /// Proportion of a resale subsidy reflected in residual value
    pub subsidy_pass_through: Dimensionless,
}

/// All the coefficients required to calculate the residual value of a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCoefficients {
    /// Depreciation coefficients
    pub depreciation: DepreciationCoefficients,
    /// Annual rate of technological obsolescence
    pub obsolescence_rate: PerYear,
    /// Battery degradation (required for externally charged powertrains only)
    #[serde(default)]
    pub battery: Option<BatteryDegradation>,
    /// Sensitivity to external factors
    pub external: ExternalCoefficients,
}

fn check_proportion(value: Dimensionless, name: &str) -> Result<()> {
    ensure_input!(
        (0.0..=1.0).contains(&value.value()),
        "{name} must be between 0 and 1 (got {value})"
    );

    Ok(())
}

impl VehicleCoefficients {
    /// Check that the coefficients are in domain
    pub fn validate(&self) -> Result<()> {
        let dep = &self.depreciation;
        ensure_non_negative!(dep.rate, "depreciation rate");
        ensure_input!(
            dep.expected_life.is_finite() && dep.expected_life.value() > 0.0,
            "expected_life must be greater than zero"
        );
        ensure_input!(
            dep.expected_usage.is_finite() && dep.expected_usage.value() > 0.0,
            "expected_usage must be greater than zero"
        );
        check_proportion(dep.usage_weight, "usage_weight")?;
        check_proportion(dep.salvage_floor, "salvage_floor")?;
        ensure_non_negative!(dep.maintenance_benchmark, "maintenance_benchmark");
        ensure_non_negative!(dep.maintenance_coefficient, "maintenance_coefficient");
        ensure_non_negative!(self.obsolescence_rate, "obsolescence_rate");

        if let Some(battery) = &self.battery {
            ensure_non_negative!(battery.per_cycle_slow, "per_cycle_slow");
            ensure_non_negative!(battery.per_cycle_fast, "per_cycle_fast");
            ensure_non_negative!(battery.per_cycle_ultra, "per_cycle_ultra");
            ensure_non_negative!(battery.decay_constant, "decay_constant");
        }

        ensure_non_negative!(
            self.external.energy_price_sensitivity,
            "energy_price_sensitivity"
        );
        ensure_non_negative!(self.external.co2_sensitivity, "co2_sensitivity");
        ensure_non_negative!(self.external.subsidy_pass_through, "subsidy_pass_through");

        Ok(())
    }
}

/// A read-only source of [`VehicleCoefficients`].
///
/// Implementations must not change while a batch of calculations is in progress.
pub trait ParameterTable {
    /// Look up the coefficients for a key.
    ///
    /// A miss is an error: implementations must never substitute a default.
    fn lookup(&self, key: &ParameterKey) -> Result<&VehicleCoefficients>;
}

/// An in-memory [`ParameterTable`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientMap(HashMap<ParameterKey, VehicleCoefficients>);

impl FromIterator<(ParameterKey, VehicleCoefficients)> for CoefficientMap {
    fn from_iter<T: IntoIterator<Item = (ParameterKey, VehicleCoefficients)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ParameterTable for CoefficientMap {
    fn lookup(&self, key: &ParameterKey) -> Result<&VehicleCoefficients> {
        self.0
            .get(key)
            .ok_or_else(|| TcoError::MissingParameter(format!("No coefficients for {key}")))
    }
}

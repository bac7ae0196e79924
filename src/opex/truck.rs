//! Operating expenditure for trucks.
//!
//! Truck OPEX is made up of taxes, road tolls, insurance, driver wages, energy and maintenance. All
//! of the country data comes from the country of registration.
use super::get_coefficients;
use crate::country::CountryID;
use crate::error::{Result, TcoError, ensure_input, ensure_non_negative};
use crate::units::{
    Dimensionless, Energy, Money, MoneyPerEnergy, MoneyPerUsage, MoneyPerYear, Usage, Year,
};
use crate::vehicle::{Powertrain, VehicleClassID};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

fn default_multiplier() -> Dimensionless {
    Dimensionless(1.0)
}

/// The properties of a truck relevant to its operating costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckProperties {
    /// Country in which the truck is registered
    pub registration_country: CountryID,
    /// The vehicle class (e.g. "N3")
    pub vehicle_class: VehicleClassID,
    /// The powertrain type
    pub powertrain: Powertrain,
    /// The original purchase cost
    pub purchase_cost: Money,
    /// The residual value, which is not insured
    pub residual_value: Money,
    /// Distance driven per year (km)
    pub annual_distance: Usage,
    /// Energy consumed per year
    pub annual_energy_consumption: Energy,
    /// Scales taxable consumption for driving conditions
    #[serde(default = "default_multiplier")]
    pub fuel_multiplier: Dimensionless,
    /// CO2 emitted, relative to energy consumed
    #[serde(default)]
    pub co2_emission_factor: Dimensionless,
    /// Number of drivers
    pub drivers: u32,
    /// Maintenance cost per year
    #[serde(default)]
    pub maintenance_cost: Money,
    /// Number of years over which driver wages are counted
    pub planning_horizon: Year,
}

/// Operating cost data for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckOpexCoefficients {
    /// Taxable energy price, by powertrain
    #[serde(default)]
    pub taxable_energy_price: IndexMap<Powertrain, MoneyPerEnergy>,
    /// Tax multiplier on energy, by powertrain (1 if not given)
    #[serde(default)]
    pub energy_tax_factor: IndexMap<Powertrain, Dimensionless>,
    /// Registration tax, by vehicle class
    #[serde(default)]
    pub registration_tax: IndexMap<VehicleClassID, Money>,
    /// Annual circulation tax, by vehicle class
    #[serde(default)]
    pub annual_tax: IndexMap<VehicleClassID, Money>,
    /// Environmental tax, by powertrain
    #[serde(default)]
    pub environmental_tax: IndexMap<Powertrain, Money>,
    /// Multiplier for regional variation in energy taxes
    #[serde(default = "default_multiplier")]
    pub regional_coefficient: Dimensionless,
    /// Multiplier for the CO2 tax
    #[serde(default)]
    pub co2_tax: Dimensionless,
    /// Toll price per km, by vehicle class and powertrain
    #[serde(default)]
    pub tolls: IndexMap<VehicleClassID, IndexMap<Powertrain, MoneyPerUsage>>,
    /// Annual insurance as a proportion of the insured value, by powertrain
    #[serde(default)]
    pub insurance_rate: IndexMap<Powertrain, Dimensionless>,
    /// Annual wage of one driver
    pub driver_wage: MoneyPerYear,
    /// Energy price by powertrain
    #[serde(default)]
    pub energy_price: IndexMap<Powertrain, MoneyPerEnergy>,
}

/// Truck operating cost data for each country
pub type TruckOpexDatabase = IndexMap<CountryID, TruckOpexCoefficients>;

/// The components of a truck's OPEX
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruckOpexBreakdown {
    /// Energy, CO2, registration, circulation and environmental taxes
    pub taxes: Money,
    /// Road tolls
    pub tolls: Money,
    /// Insurance
    pub insurance: Money,
    /// Driver wages over the planning horizon
    pub crew: Money,
    /// Energy
    pub energy: Money,
    /// Maintenance
    pub maintenance: Money,
}

impl TruckOpexBreakdown {
    /// The sum of all components
    pub fn total(&self) -> Money {
        self.taxes + self.tolls + self.insurance + self.crew + self.energy + self.maintenance
    }
}

fn taxes(truck: &TruckProperties, coefficients: &TruckOpexCoefficients) -> Money {
    let taxable_price = coefficients
        .taxable_energy_price
        .get(&truck.powertrain)
        .copied()
        .unwrap_or_default();
    let energy_tax = coefficients
        .energy_tax_factor
        .get(&truck.powertrain)
        .copied()
        .unwrap_or_else(default_multiplier);
    let variable = truck.annual_energy_consumption
        * taxable_price
        * energy_tax
        * truck.fuel_multiplier
        * truck.co2_emission_factor
        * coefficients.co2_tax
        * coefficients.regional_coefficient;

    let fixed = [
        coefficients.registration_tax.get(&truck.vehicle_class),
        coefficients.annual_tax.get(&truck.vehicle_class),
        coefficients.environmental_tax.get(&truck.powertrain),
    ]
    .into_iter()
    .flatten()
    .copied()
    .sum::<Money>();

    variable + fixed
}

fn tolls(truck: &TruckProperties, coefficients: &TruckOpexCoefficients) -> Money {
    coefficients
        .tolls
        .get(&truck.vehicle_class)
        .and_then(|by_powertrain| by_powertrain.get(&truck.powertrain))
        .map_or(Money(0.0), |&price| price * truck.annual_distance)
}

fn insurance(truck: &TruckProperties, coefficients: &TruckOpexCoefficients) -> Result<Money> {
    let rate = coefficients
        .insurance_rate
        .get(&truck.powertrain)
        .ok_or_else(|| {
            TcoError::MissingParameter(format!("No insurance rate for {}", truck.powertrain))
        })?;

    Ok((truck.purchase_cost - truck.residual_value) * *rate)
}

fn energy(truck: &TruckProperties, coefficients: &TruckOpexCoefficients) -> Result<Money> {
    let price = coefficients
        .energy_price
        .get(&truck.powertrain)
        .ok_or_else(|| {
            TcoError::MissingParameter(format!("No energy price for {}", truck.powertrain))
        })?;

    Ok(truck.annual_energy_consumption * *price)
}

fn validate(truck: &TruckProperties) -> Result<()> {
    ensure_non_negative!(truck.purchase_cost, "purchase_cost");
    ensure_non_negative!(truck.residual_value, "residual_value");
    ensure_input!(
        truck.residual_value <= truck.purchase_cost,
        "residual_value ({}) must not exceed purchase_cost ({})",
        truck.residual_value,
        truck.purchase_cost
    );
    ensure_non_negative!(truck.annual_distance, "annual_distance");
    ensure_non_negative!(truck.annual_energy_consumption, "annual_energy_consumption");
    ensure_non_negative!(truck.fuel_multiplier, "fuel_multiplier");
    ensure_non_negative!(truck.co2_emission_factor, "co2_emission_factor");
    ensure_non_negative!(truck.maintenance_cost, "maintenance_cost");
    ensure_non_negative!(truck.planning_horizon, "planning_horizon");

    Ok(())
}

/// Calculate the operating costs of a truck.
///
/// Taxes and tolls not listed for the truck's class or powertrain aren't charged. Insurance and
/// energy price data are required.
pub fn calculate_truck_opex(
    truck: &TruckProperties,
    database: &TruckOpexDatabase,
) -> Result<TruckOpexBreakdown> {
    validate(truck)?;
    let coefficients = get_coefficients(database, &truck.registration_country, "truck")?;

    let breakdown = TruckOpexBreakdown {
        taxes: taxes(truck, coefficients),
        tolls: tolls(truck, coefficients),
        insurance: insurance(truck, coefficients)?,
        crew: coefficients.driver_wage
            * truck.planning_horizon
            * Dimensionless(f64::from(truck.drivers)),
        energy: energy(truck, coefficients)?,
        maintenance: truck.maintenance_cost,
    };
    debug!(
        "Truck OPEX for {} {}: {}",
        truck.vehicle_class,
        truck.powertrain,
        breakdown.total()
    );

    Ok(breakdown)
}

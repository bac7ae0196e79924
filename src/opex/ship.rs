//! Operating expenditure for ships.
//!
//! Ship OPEX is made up of taxes on fuel burnt, port dues, insurance, crew wages and energy, plus
//! maintenance charged as a proportion of the other five. Taxes, insurance and crew are charged in
//! the country of registration; port dues, energy and maintenance in the country of operation.
use super::get_coefficients;
use crate::country::CountryID;
use crate::error::{Result, TcoError, ensure_input, ensure_non_negative};
use crate::units::{
    Dimensionless, Energy, Mass, Money, MoneyPerEnergy, MoneyPerMass, MoneyPerYear, Year,
};
use crate::vehicle::{Powertrain, VehicleClassID};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Months in a year, for converting monthly crew costs
const MONTHS_PER_YEAR: f64 = 12.0;

/// A group of crew members of the same rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    /// The rank (e.g. "captain")
    pub rank: String,
    /// How many crew members hold this rank
    pub team_size: u32,
}

/// The properties of a ship relevant to its operating costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipProperties {
    /// Country in which the ship is registered
    pub country_reg: CountryID,
    /// Country in which the ship operates
    pub country_oper: CountryID,
    /// The ship class (e.g. "fishing_small")
    pub ship_class: VehicleClassID,
    /// The powertrain type
    pub powertrain: Powertrain,
    /// Gross tonnage
    pub gross_tonnage: Dimensionless,
    /// The original purchase cost
    pub purchase_cost: Money,
    /// Mass of fuel burnt per year
    #[serde(default)]
    pub fuel_consumption: Mass,
    /// Energy drawn by the powertrain per year
    pub annual_energy_consumption: Energy,
    /// The crew, by rank
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    /// Total monthly cost of the crew, if known; overrides the wage-based calculation
    #[serde(default)]
    pub crew_monthly_total: Option<Money>,
    /// Number of years over which crew costs are counted
    pub planning_horizon: Year,
}

/// Port dues for a ship class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortCharges {
    /// Charge per gross tonne for each type of due
    pub parameters: Vec<Money>,
    /// Discount multiplier for each type of due
    pub discounts: Vec<Dimensionless>,
}

impl PortCharges {
    /// The total charge per gross tonne
    fn per_gross_tonne(&self) -> Result<Money> {
        ensure_input!(
            self.parameters.len() == self.discounts.len(),
            "Port charges have {} parameters but {} discounts",
            self.parameters.len(),
            self.discounts.len()
        );

        Ok(self
            .parameters
            .iter()
            .zip(&self.discounts)
            .map(|(&parameter, &discount)| parameter * discount)
            .sum())
    }
}

/// Operating cost data for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipOpexCoefficients {
    /// Price per tonne of CO2
    pub co2_price: MoneyPerMass,
    /// Tonnes of taxable emissions per tonne of fuel, by ship class and powertrain
    #[serde(default)]
    pub tax_factors: IndexMap<VehicleClassID, IndexMap<Powertrain, [Dimensionless; 3]>>,
    /// Port dues by ship class
    #[serde(default)]
    pub ports: IndexMap<VehicleClassID, PortCharges>,
    /// Annual insurance as a proportion of purchase cost, by ship class
    #[serde(default)]
    pub insurance_per_class: IndexMap<VehicleClassID, Dimensionless>,
    /// Annual insurance as a proportion of purchase cost, by powertrain
    #[serde(default)]
    pub insurance_per_powertrain: IndexMap<Powertrain, Dimensionless>,
    /// Annual wage of one seafarer
    pub seafarer_wage: MoneyPerYear,
    /// Maintenance as a proportion of other operating costs, by ship class
    #[serde(default)]
    pub maintenance_rate: IndexMap<VehicleClassID, Dimensionless>,
    /// Energy price by powertrain
    #[serde(default)]
    pub energy_price: IndexMap<Powertrain, MoneyPerEnergy>,
}

/// Ship operating cost data for each country
pub type ShipOpexDatabase = IndexMap<CountryID, ShipOpexCoefficients>;

/// The components of a ship's OPEX
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipOpexBreakdown {
    /// Taxes on emissions from fuel burnt
    pub taxes: Money,
    /// Port dues
    pub ports: Money,
    /// Insurance
    pub insurance: Money,
    /// Crew wages over the planning horizon
    pub crew: Money,
    /// Energy
    pub energy: Money,
    /// Maintenance
    pub maintenance: Money,
}

impl ShipOpexBreakdown {
    /// The sum of all components
    pub fn total(&self) -> Money {
        self.taxes + self.ports + self.insurance + self.crew + self.energy + self.maintenance
    }
}

fn taxes(ship: &ShipProperties, coefficients: &ShipOpexCoefficients) -> Money {
    let Some(factors) = coefficients
        .tax_factors
        .get(&ship.ship_class)
        .and_then(|by_powertrain| by_powertrain.get(&ship.powertrain))
    else {
        // Untaxed
        return Money(0.0);
    };

    let factor: Dimensionless = factors.iter().copied().sum();
    coefficients.co2_price * (ship.fuel_consumption * factor)
}

fn ports(ship: &ShipProperties, coefficients: &ShipOpexCoefficients) -> Result<Money> {
    match coefficients.ports.get(&ship.ship_class) {
        Some(charges) => Ok(charges.per_gross_tonne()? * ship.gross_tonnage),
        None => Ok(Money(0.0)),
    }
}

fn insurance(ship: &ShipProperties, coefficients: &ShipOpexCoefficients) -> Result<Money> {
    let rate = coefficients
        .insurance_per_class
        .get(&ship.ship_class)
        .or_else(|| coefficients.insurance_per_powertrain.get(&ship.powertrain))
        .ok_or_else(|| {
            TcoError::MissingParameter(format!(
                "No insurance rate for {} or {}",
                ship.ship_class, ship.powertrain
            ))
        })?;

    Ok(ship.purchase_cost * *rate)
}

fn crew(ship: &ShipProperties, coefficients: &ShipOpexCoefficients) -> MoneyPerYear {
    match ship.crew_monthly_total {
        Some(monthly) if monthly > Money(0.0) => {
            monthly * Dimensionless(MONTHS_PER_YEAR) / Year(1.0)
        }
        _ => {
            let crew_size: u32 = ship.crew.iter().map(|member| member.team_size).sum();
            coefficients.seafarer_wage * Dimensionless(f64::from(crew_size))
        }
    }
}

fn energy(ship: &ShipProperties, coefficients: &ShipOpexCoefficients) -> Result<Money> {
    let price = coefficients
        .energy_price
        .get(&ship.powertrain)
        .ok_or_else(|| {
            TcoError::MissingParameter(format!("No energy price for {}", ship.powertrain))
        })?;

    Ok(ship.annual_energy_consumption * *price)
}

fn maintenance_rate(
    ship: &ShipProperties,
    coefficients: &ShipOpexCoefficients,
) -> Result<Dimensionless> {
    coefficients
        .maintenance_rate
        .get(&ship.ship_class)
        .copied()
        .ok_or_else(|| {
            TcoError::MissingParameter(format!("No maintenance rate for {}", ship.ship_class))
        })
}

fn validate(ship: &ShipProperties) -> Result<()> {
    ensure_non_negative!(ship.gross_tonnage, "gross_tonnage");
    ensure_non_negative!(ship.purchase_cost, "purchase_cost");
    ensure_non_negative!(ship.fuel_consumption, "fuel_consumption");
    ensure_non_negative!(ship.annual_energy_consumption, "annual_energy_consumption");
    ensure_non_negative!(ship.planning_horizon, "planning_horizon");
    if let Some(monthly) = ship.crew_monthly_total {
        ensure_non_negative!(monthly, "crew_monthly_total");
    }

    Ok(())
}

/// Calculate the operating costs of a ship.
///
/// Missing tax or port data for the ship class means no tax or port dues are charged. Insurance,
/// maintenance and energy price data are required.
pub fn calculate_ship_opex(
    ship: &ShipProperties,
    database: &ShipOpexDatabase,
) -> Result<ShipOpexBreakdown> {
    validate(ship)?;
    let registration = get_coefficients(database, &ship.country_reg, "ship")?;
    let operation = get_coefficients(database, &ship.country_oper, "ship")?;

    let taxes = taxes(ship, registration);
    let ports = ports(ship, operation)?;
    let insurance = insurance(ship, registration)?;
    let crew = crew(ship, registration) * ship.planning_horizon;
    let energy = energy(ship, operation)?;
    let maintenance =
        (taxes + ports + insurance + crew + energy) * maintenance_rate(ship, operation)?;

    let breakdown = ShipOpexBreakdown {
        taxes,
        ports,
        insurance,
        crew,
        energy,
        maintenance,
    };
    debug!(
        "Ship OPEX for {} {}: {}",
        ship.ship_class,
        ship.powertrain,
        breakdown.total()
    );

    Ok(breakdown)
}

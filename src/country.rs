//! Countries provide the economic context (energy prices, CO2 taxes, subsidies) for a calculation.
use crate::error::{Result, TcoError};
use crate::id::{define_id_getter, define_id_type};
use crate::units::{Dimensionless, Money, MoneyPerEnergy, MoneyPerMass};
use crate::vehicle::Powertrain;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

define_id_type! {CountryID}

/// A map of [`CountryProperties`], keyed by country ID
pub type CountryMap = IndexMap<CountryID, CountryProperties>;

/// Economic properties of a country, with projections for future years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryProperties {
    /// A unique identifier for the country (e.g. "FRA")
    pub id: CountryID,
    /// The year against which projected trends are measured
    pub reference_year: u32,
    /// Projected energy prices, by year and powertrain
    pub energy_price_projection: HashMap<u32, IndexMap<Powertrain, MoneyPerEnergy>>,
    /// Projected CO2 tax, per tonne of CO2, by year
    pub co2_tax_rate: HashMap<u32, MoneyPerMass>,
    /// Subsidies paid on resale of a vehicle, by year and powertrain
    pub subsidy_schedule: HashMap<u32, IndexMap<Powertrain, Money>>,
    /// The benchmark powertrain efficiency for each powertrain type
    pub benchmark_efficiency: IndexMap<Powertrain, Dimensionless>,
}
define_id_getter! {CountryProperties, CountryID}

impl CountryProperties {
    /// The projected energy price for a powertrain in the given year
    pub fn energy_price(&self, powertrain: Powertrain, year: u32) -> Result<MoneyPerEnergy> {
        self.energy_price_projection
            .get(&year)
            .and_then(|prices| prices.get(&powertrain))
            .copied()
            .ok_or_else(|| {
                TcoError::MissingParameter(format!(
                    "No energy price for {powertrain} in {} for {year}",
                    self.id
                ))
            })
    }

    /// The projected CO2 tax rate in the given year
    pub fn co2_tax(&self, year: u32) -> Result<MoneyPerMass> {
        self.co2_tax_rate.get(&year).copied().ok_or_else(|| {
            TcoError::MissingParameter(format!("No CO2 tax rate in {} for {year}", self.id))
        })
    }

    /// The resale subsidy for a powertrain in the given year.
    ///
    /// The year must be present in the schedule, but powertrains without an entry for that year
    /// receive no subsidy.
    pub fn resale_subsidy(&self, powertrain: Powertrain, year: u32) -> Result<Money> {
        let subsidies = self.subsidy_schedule.get(&year).ok_or_else(|| {
            TcoError::MissingParameter(format!("No subsidy schedule in {} for {year}", self.id))
        })?;

        Ok(subsidies.get(&powertrain).copied().unwrap_or_default())
    }

    /// The benchmark efficiency for a powertrain
    pub fn benchmark_efficiency(&self, powertrain: Powertrain) -> Result<Dimensionless> {
        self.benchmark_efficiency
            .get(&powertrain)
            .copied()
            .ok_or_else(|| {
                TcoError::MissingParameter(format!(
                    "No benchmark efficiency for {powertrain} in {}",
                    self.id
                ))
            })
    }
}

/// Look up a country by ID
pub fn get_country<'a>(countries: &'a CountryMap, id: &str) -> Result<&'a CountryProperties> {
    countries
        .get(id)
        .ok_or_else(|| TcoError::MissingParameter(format!("Unknown country {id}")))
}

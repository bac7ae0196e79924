//! Operating expenditure (OPEX): the running costs of a vehicle.
//!
//! Trucks ([`truck`]) and ships ([`ship`]) are costed differently, each from its own per-country
//! database. In both cases a country missing from the database is an error.
use crate::country::CountryID;
use crate::error::{Result, TcoError};
use indexmap::IndexMap;

pub mod ship;
pub use ship::{
    CrewMember, PortCharges, ShipOpexBreakdown, ShipOpexCoefficients, ShipOpexDatabase,
    ShipProperties, calculate_ship_opex,
};
pub mod truck;
pub use truck::{
    TruckOpexBreakdown, TruckOpexCoefficients, TruckOpexDatabase, TruckProperties,
    calculate_truck_opex,
};

/// Look up the operating cost data for a country
fn get_coefficients<'a, T>(
    database: &'a IndexMap<CountryID, T>,
    country: &CountryID,
    asset: &str,
) -> Result<&'a T> {
    database.get(country).ok_or_else(|| {
        TcoError::MissingParameter(format!("No {asset} operating cost data for {country}"))
    })
}

//! Total cost of ownership (TCO) estimation for trucks and ships.
//!
//! TCO is made up of [capital](capex) and [operating](opex) expenditure, less the
//! [residual value](residual_value) of the vehicle at the end of the period of ownership.
#![warn(missing_docs)]
pub mod capex;
pub mod country;
pub mod error;
pub mod finance;
pub mod id;
pub mod input;
pub mod logging;
pub mod opex;
pub mod parameters;
pub mod residual_value;
pub mod settings;
pub mod tco;
pub mod units;
pub mod vehicle;

#[cfg(test)]
mod fixture;

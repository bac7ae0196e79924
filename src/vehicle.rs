//! Vehicles (trucks and ships) whose cost of ownership is being estimated.
use crate::error::{Result, TcoError, ensure_input, ensure_non_negative};
use crate::id::define_id_type;
use crate::units::{Dimensionless, Energy, Money, Usage, Year};
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

pub mod efficiency;

define_id_type! {VehicleClassID}

/// The kind of transport asset
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum AssetType {
    /// A road vehicle
    #[string = "truck"]
    Truck,
    /// A vessel
    #[string = "ship"]
    Ship,
}

/// The powertrain (and energy carrier) of a vehicle
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(try_from = "String", into = "String")]
pub enum Powertrain {
    /// Internal combustion engine running on fossil diesel
    #[strum(to_string = "DIESEL")]
    Diesel,
    /// Internal combustion engine running on biodiesel
    #[strum(to_string = "BIO_DIESEL")]
    BioDiesel,
    /// Internal combustion engine running on hydrotreated vegetable oil
    #[strum(to_string = "HVO")]
    Hvo,
    /// Internal combustion engine running on synthetic diesel
    #[strum(to_string = "E_DIESEL")]
    EDiesel,
    /// Compressed natural gas
    #[strum(to_string = "CNG")]
    Cng,
    /// Liquefied natural gas
    #[strum(to_string = "LNG")]
    Lng,
    /// Hydrogen internal combustion engine
    #[strum(to_string = "H2_ICE", serialize = "hydrogen_h2")]
    H2Ice,
    /// Battery electric
    #[strum(to_string = "BEV", serialize = "electric")]
    Bev,
    /// Plug-in hybrid electric
    #[strum(to_string = "PHEV")]
    Phev,
    /// Hybrid electric (not externally charged)
    #[strum(to_string = "HEV")]
    Hev,
    /// Hydrogen fuel cell electric
    #[strum(to_string = "FCEV", serialize = "hydrogen_fuel_cell")]
    Fcev,
}

impl Powertrain {
    /// Parse a powertrain from its label (e.g. `"DIESEL"`, `"bev"`, `"electric"`).
    pub fn from_label(label: &str) -> Result<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Err(TcoError::UnsupportedPowertrain(
                "no powertrain type given".into(),
            ));
        }

        Powertrain::from_str(label).map_err(|_| TcoError::UnsupportedPowertrain(label.into()))
    }

    /// Whether the traction battery is charged from the grid
    pub fn is_externally_charged(self) -> bool {
        matches!(self, Powertrain::Bev | Powertrain::Phev)
    }

    /// Whether the powertrain has no tailpipe CO2 emissions
    pub fn is_zero_emission(self) -> bool {
        matches!(self, Powertrain::Bev | Powertrain::Fcev | Powertrain::H2Ice)
    }
}

impl TryFrom<String> for Powertrain {
    type Error = TcoError;

    fn try_from(value: String) -> Result<Self> {
        Powertrain::from_label(&value)
    }
}

impl From<Powertrain> for String {
    fn from(value: Powertrain) -> Self {
        value.to_string()
    }
}

/// The warranty originally provided with a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "term", rename_all = "snake_case")]
pub enum Warranty {
    /// Coverage for a number of years from purchase
    Years(Year),
    /// Coverage for an amount of usage (km or operating hours)
    Usage(Usage),
}

impl Warranty {
    /// The fraction of the original warranty term which remains, in `[0, 1]`.
    ///
    /// A zero-length warranty has no remaining coverage.
    pub fn remaining_fraction(&self, age: Year, usage: Usage) -> Dimensionless {
        let remaining = match *self {
            Warranty::Years(term) if term.value() > 0.0 => Dimensionless(1.0) - age / term,
            Warranty::Usage(term) if term.value() > 0.0 => Dimensionless(1.0) - usage / term,
            _ => Dimensionless(0.0),
        };

        remaining.clamp(Dimensionless(0.0), Dimensionless(1.0))
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Warranty::Years(term) => {
                ensure_non_negative!(term, "warranty term");
            }
            Warranty::Usage(term) => {
                ensure_non_negative!(term, "warranty term");
            }
        }

        Ok(())
    }
}

/// How an externally charged vehicle's battery is used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingProfile {
    /// Energy drawn from the battery per year
    pub annual_energy: Energy,
    /// Usable battery capacity
    pub battery_capacity: Energy,
    /// Typical depth of discharge per cycle
    pub depth_of_discharge: Dimensionless,
    /// Proportion of energy charged with slow chargers
    pub share_slow: Dimensionless,
    /// Proportion of energy charged with fast chargers
    pub share_fast: Dimensionless,
    /// Proportion of energy charged with ultra-fast chargers
    pub share_ultra: Dimensionless,
}

impl ChargingProfile {
    /// Equivalent full charge cycles per year.
    ///
    /// Zero if the battery has no capacity or is never discharged.
    pub fn cycles_per_year(&self) -> Dimensionless {
        let per_cycle = self.battery_capacity * self.depth_of_discharge;
        if per_cycle.value() > 0.0 {
            self.annual_energy / per_cycle
        } else {
            Dimensionless(0.0)
        }
    }

    /// Check that the profile describes a physically meaningful charging pattern
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative!(self.annual_energy, "annual_energy");
        ensure_non_negative!(self.battery_capacity, "battery_capacity");
        ensure_input!(
            self.depth_of_discharge.is_finite()
                && self.depth_of_discharge.value() > 0.0
                && self.depth_of_discharge.value() <= 1.0,
            "depth_of_discharge must be in (0, 1] (got {})",
            self.depth_of_discharge
        );

        for (name, share) in [
            ("share_slow", self.share_slow),
            ("share_fast", self.share_fast),
            ("share_ultra", self.share_ultra),
        ] {
            ensure_input!(
                (0.0..=1.0).contains(&share.value()),
                "{name} must be between 0 and 1 (got {share})"
            );
        }

        let total = self.share_slow + self.share_fast + self.share_ultra;
        ensure_input!(
            total.value() <= 1.0 + 1e-9,
            "Charging shares must not sum to more than 1 (got {total})"
        );

        Ok(())
    }
}

/// The properties of a single vehicle, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProperties {
    /// Whether this is a truck or a ship
    pub asset_type: AssetType,
    /// The vehicle class (e.g. "N3" or "fishing_small")
    pub vehicle_class: VehicleClassID,
    /// The powertrain type
    pub powertrain: Powertrain,
    /// The original purchase cost
    pub purchase_cost: Money,
    /// Years since purchase
    pub age: Year,
    /// The year in which the powertrain model was introduced
    pub powertrain_model_year: u32,
    /// Cumulative usage since purchase (km or operating hours)
    pub usage: Usage,
    /// Cumulative spend on maintenance since purchase
    #[serde(default)]
    pub maintenance_spend: Money,
    /// Powertrain efficiency as a ratio (see [`efficiency`])
    pub powertrain_efficiency: Dimensionless,
    /// The warranty provided at purchase
    pub warranty: Warranty,
    /// Battery usage, for externally charged vehicles
    #[serde(default)]
    pub charging_profile: Option<ChargingProfile>,
}

impl VehicleProperties {
    /// Check the vehicle's properties are in domain.
    ///
    /// The charging profile is only checked for externally charged vehicles; it is ignored for
    /// everything else.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative!(self.purchase_cost, "purchase_cost");
        ensure_non_negative!(self.age, "age");
        ensure_non_negative!(self.usage, "usage");
        ensure_non_negative!(self.maintenance_spend, "maintenance_spend");
        ensure_input!(
            self.powertrain_efficiency.is_finite() && self.powertrain_efficiency.value() > 0.0,
            "powertrain_efficiency must be greater than zero (got {})",
            self.powertrain_efficiency
        );
        self.warranty.validate()?;

        if self.powertrain.is_externally_charged() {
            let profile = self.charging_profile.as_ref().ok_or_else(|| {
                TcoError::InvalidInput(format!(
                    "A charging profile is required for {} vehicles",
                    self.powertrain
                ))
            })?;
            profile.validate()?;
        }

        Ok(())
    }
}

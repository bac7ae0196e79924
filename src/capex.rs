//! Capital expenditure: the upfront cost of putting a vehicle into service.
//!
//! CAPEX covers the vehicle itself, its share of refuelling or charging infrastructure, taxes paid
//! on registration and the cost of arranging finance, less any subsidies. The total is annualised
//! over the term of the loan with the
//! [capital recovery factor](crate::finance::capital_recovery_factor).
use crate::error::{Result, ensure_input, ensure_non_negative};
use crate::finance::annual_capital_cost;
use crate::units::{Dimensionless, Money, MoneyPerYear};
use log::debug;
use serde::{Deserialize, Serialize};

/// How the vehicle is acquired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VehicleAcquisition {
    /// Buying a new vehicle
    New {
        /// Purchase price of the vehicle
        purchase_price: Money,
    },
    /// Converting a vehicle which is already owned to a new powertrain
    Retrofit {
        /// Cost of converting the powertrain
        conversion_cost: Money,
        /// Cost of certifying the converted vehicle
        certification_cost: Money,
    },
    /// Buying a second-hand vehicle and converting it
    UsedWithRetrofit {
        /// Purchase price of the vehicle
        purchase_price: Money,
        /// Cost of converting the powertrain
        conversion_cost: Money,
        /// Cost of certifying the converted vehicle
        certification_cost: Money,
    },
}

impl VehicleAcquisition {
    /// The total cost of acquiring the vehicle
    pub fn cost(&self) -> Result<Money> {
        let costs = match *self {
            VehicleAcquisition::New { purchase_price } => vec![purchase_price],
            VehicleAcquisition::Retrofit {
                conversion_cost,
                certification_cost,
            } => vec![conversion_cost, certification_cost],
            VehicleAcquisition::UsedWithRetrofit {
                purchase_price,
                conversion_cost,
                certification_cost,
            } => vec![purchase_price, conversion_cost, certification_cost],
        };

        for cost in &costs {
            ensure_non_negative!(*cost, "vehicle acquisition cost");
        }

        Ok(costs.into_iter().sum())
    }
}

/// One band of a price-dependent vehicle subsidy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsidyThreshold {
    /// The highest vehicle price eligible for this band
    pub max_purchase_price: Money,
    /// The subsidy paid
    pub subsidy: Money,
}

/// A subsidy paid on the purchase of a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleSubsidy {
    /// The same amount regardless of price
    Flat(Money),
    /// Bands checked in order; the first band the price falls within applies
    Thresholds(Vec<SubsidyThreshold>),
}

impl VehicleSubsidy {
    /// The subsidy paid for a vehicle of the given cost
    pub fn amount(&self, vehicle_cost: Money) -> Money {
        match self {
            VehicleSubsidy::Flat(subsidy) => *subsidy,
            VehicleSubsidy::Thresholds(thresholds) => thresholds
                .iter()
                .find(|threshold| vehicle_cost <= threshold.max_purchase_price)
                .map(|threshold| threshold.subsidy)
                .unwrap_or_default(),
        }
    }
}

/// Country- and powertrain-specific data for calculating CAPEX
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapexCoefficients {
    /// One-off tax paid on registration
    pub registration_tax: Money,
    /// Any other one-off tax specific to the powertrain or vehicle class
    #[serde(default)]
    pub specific_tax: Money,
    /// Subsidy paid on the vehicle
    #[serde(default)]
    pub vehicle_subsidy: Option<VehicleSubsidy>,
    /// Proportion of infrastructure cost covered by subsidy
    #[serde(default)]
    pub infrastructure_subsidy_rate: Dimensionless,
    /// Interest rate on the loan
    pub base_interest_rate: Dimensionless,
    /// Adjustment to the interest rate for environmental, social and governance criteria
    #[serde(default)]
    pub esg_adjustment: Dimensionless,
    /// Fee for arranging the loan, as a proportion of the vehicle cost
    #[serde(default)]
    pub origination_fee_rate: Dimensionless,
}

/// The investment being costed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapexInput {
    /// How the vehicle is acquired
    pub acquisition: VehicleAcquisition,
    /// The vehicle's share of the cost of refuelling or charging infrastructure
    #[serde(default)]
    pub infrastructure_cost: Money,
    /// The term of the loan, in years
    pub loan_years: u32,
}

/// The components of CAPEX
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapexBreakdown {
    /// Cost of acquiring the vehicle
    pub vehicle: Money,
    /// Share of infrastructure cost
    pub infrastructure: Money,
    /// Registration and specific taxes
    pub taxes: Money,
    /// Cost of arranging finance
    pub financing: Money,
    /// Vehicle and infrastructure subsidies
    pub subsidies: Money,
    /// Interest rate after ESG adjustment
    pub interest_rate: Dimensionless,
    /// The term of the loan, in years
    pub loan_years: u32,
}

impl CapexBreakdown {
    /// Total CAPEX, net of subsidies
    pub fn total(&self) -> Money {
        self.vehicle + self.infrastructure + self.taxes + self.financing - self.subsidies
    }

    /// Total CAPEX spread over the term of the loan
    pub fn annual(&self) -> MoneyPerYear {
        annual_capital_cost(self.total(), self.loan_years, self.interest_rate)
    }
}

/// Calculate the CAPEX for a vehicle.
///
/// # Arguments
///
/// * `input` - The vehicle and infrastructure being paid for
/// * `coefficients` - Taxes, subsidies and financing terms
pub fn calculate_capex(
    input: &CapexInput,
    coefficients: &CapexCoefficients,
) -> Result<CapexBreakdown> {
    ensure_input!(input.loan_years > 0, "loan_years must be greater than zero");
    ensure_non_negative!(input.infrastructure_cost, "infrastructure_cost");
    ensure_non_negative!(coefficients.registration_tax, "registration_tax");
    ensure_non_negative!(coefficients.specific_tax, "specific_tax");
    ensure_non_negative!(
        coefficients.infrastructure_subsidy_rate,
        "infrastructure_subsidy_rate"
    );
    ensure_non_negative!(coefficients.origination_fee_rate, "origination_fee_rate");

    let vehicle = input.acquisition.cost()?;
    let interest_rate = coefficients.base_interest_rate + coefficients.esg_adjustment;
    ensure_non_negative!(interest_rate, "interest rate");

    let vehicle_subsidy = coefficients
        .vehicle_subsidy
        .as_ref()
        .map(|subsidy| subsidy.amount(vehicle))
        .unwrap_or_default();
    let infrastructure_subsidy =
        input.infrastructure_cost * coefficients.infrastructure_subsidy_rate;

    let breakdown = CapexBreakdown {
        vehicle,
        infrastructure: input.infrastructure_cost,
        taxes: coefficients.registration_tax + coefficients.specific_tax,
        financing: vehicle * coefficients.origination_fee_rate,
        subsidies: vehicle_subsidy + infrastructure_subsidy,
        interest_rate,
        loan_years: input.loan_years,
    };
    debug!(
        "CAPEX {} at {interest_rate} interest over {} years",
        breakdown.total(),
        input.loan_years
    );

    Ok(breakdown)
}

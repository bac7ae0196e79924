//! Fixtures for tests

use crate::country::CountryProperties;
use crate::opex::{
    CrewMember, PortCharges, ShipOpexCoefficients, ShipOpexDatabase, ShipProperties,
    TruckOpexCoefficients, TruckOpexDatabase, TruckProperties,
};
use crate::parameters::{
    BatteryDegradation, CoefficientMap, DepreciationCoefficients, DepreciationCurve,
    ExternalCoefficients, ParameterKey, VehicleCoefficients,
};
use crate::units::{
    Dimensionless, Energy, Mass, MassPerMoney, Money, MoneyPerEnergy, MoneyPerMass, MoneyPerUsage,
    MoneyPerYear, PerYear, Usage, Year,
};
use crate::vehicle::{AssetType, ChargingProfile, Powertrain, VehicleProperties, Warranty};
use indexmap::{IndexMap, indexmap};
use itertools::Itertools;
use rstest::fixture;
use std::collections::HashMap;

#[fixture]
pub fn diesel_truck() -> VehicleProperties {
    VehicleProperties {
        asset_type: AssetType::Truck,
        vehicle_class: "N3".into(),
        powertrain: Powertrain::Diesel,
        purchase_cost: Money(100_000.0),
        age: Year(4.0),
        powertrain_model_year: 2026,
        usage: Usage(400_000.0),
        maintenance_spend: Money(20_000.0),
        powertrain_efficiency: Dimensionless(0.4),
        warranty: Warranty::Years(Year(5.0)),
        charging_profile: None,
    }
}

#[fixture]
pub fn bev_truck() -> VehicleProperties {
    VehicleProperties {
        asset_type: AssetType::Truck,
        vehicle_class: "N3".into(),
        powertrain: Powertrain::Bev,
        purchase_cost: Money(250_000.0),
        age: Year(4.0),
        powertrain_model_year: 2026,
        usage: Usage(300_000.0),
        maintenance_spend: Money(10_000.0),
        powertrain_efficiency: Dimensionless(0.85),
        warranty: Warranty::Years(Year(8.0)),
        charging_profile: Some(ChargingProfile {
            annual_energy: Energy(64_000.0),
            battery_capacity: Energy(400.0),
            depth_of_discharge: Dimensionless(0.8),
            share_slow: Dimensionless(0.5),
            share_fast: Dimensionless(0.5),
            share_ultra: Dimensionless(0.0),
        }),
    }
}

/// Reference year 2025, with projections for 2030
#[fixture]
pub fn france() -> CountryProperties {
    CountryProperties {
        id: "FRA".into(),
        reference_year: 2025,
        energy_price_projection: HashMap::from([
            (
                2025,
                indexmap! {
                    Powertrain::Diesel => MoneyPerEnergy(0.18),
                    Powertrain::Bev => MoneyPerEnergy(0.25),
                },
            ),
            (
                2030,
                indexmap! {
                    Powertrain::Diesel => MoneyPerEnergy(0.2),
                    Powertrain::Bev => MoneyPerEnergy(0.22),
                },
            ),
        ]),
        co2_tax_rate: HashMap::from([(2025, MoneyPerMass(100.0)), (2030, MoneyPerMass(150.0))]),
        subsidy_schedule: HashMap::from([
            (2025, IndexMap::new()),
            (2030, indexmap! { Powertrain::Bev => Money(5_000.0) }),
        ]),
        benchmark_efficiency: indexmap! {
            Powertrain::Diesel => Dimensionless(0.45),
            Powertrain::Bev => Dimensionless(0.9),
        },
    }
}

#[fixture]
pub fn diesel_coefficients() -> VehicleCoefficients {
    VehicleCoefficients {
        depreciation: DepreciationCoefficients {
            curve: DepreciationCurve::Linear,
            rate: PerYear(0.08),
            expected_life: Year(15.0),
            expected_usage: Usage(1_500_000.0),
            usage_weight: Dimensionless(0.3),
            maintenance_benchmark: MoneyPerYear(5_000.0),
            maintenance_coefficient: Dimensionless(0.2),
            salvage_floor: Dimensionless(0.1),
        },
        obsolescence_rate: PerYear(0.02),
        battery: None,
        external: ExternalCoefficients {
            energy_price_sensitivity: Dimensionless(0.5),
            co2_sensitivity: MassPerMoney(0.001),
            subsidy_pass_through: Dimensionless(0.5),
        },
    }
}

#[fixture]
pub fn bev_coefficients(diesel_coefficients: VehicleCoefficients) -> VehicleCoefficients {
    let mut coefficients = diesel_coefficients;
    coefficients.depreciation.curve = DepreciationCurve::Exponential;
    coefficients.depreciation.rate = PerYear(0.1);
    coefficients.battery = Some(BatteryDegradation {
        per_cycle_slow: Dimensionless(2e-5),
        per_cycle_fast: Dimensionless(5e-5),
        per_cycle_ultra: Dimensionless(1e-4),
        decay_constant: Dimensionless(10.0),
    });

    coefficients
}

#[fixture]
pub fn parameter_key() -> ParameterKey {
    ParameterKey {
        country: "FRA".into(),
        vehicle_class: "N3".into(),
        powertrain: Powertrain::Diesel,
        year: 2030,
    }
}

/// Coefficients for diesel and battery electric N3 trucks in France in 2030
#[fixture]
pub fn coefficient_map(
    diesel_coefficients: VehicleCoefficients,
    bev_coefficients: VehicleCoefficients,
) -> CoefficientMap {
    [
        (Powertrain::Diesel, diesel_coefficients),
        (Powertrain::Bev, bev_coefficients),
    ]
    .into_iter()
    .cartesian_product([2030])
    .map(|((powertrain, coefficients), year)| {
        let key = ParameterKey {
            country: "FRA".into(),
            vehicle_class: "N3".into(),
            powertrain,
            year,
        };
        (key, coefficients)
    })
    .collect()
}

/// A small diesel fishing vessel registered and operating in France
#[fixture]
pub fn fishing_vessel() -> ShipProperties {
    ShipProperties {
        country_reg: "FRA".into(),
        country_oper: "FRA".into(),
        ship_class: "fishing_small".into(),
        powertrain: Powertrain::Diesel,
        gross_tonnage: Dimensionless(20.0),
        purchase_cost: Money(800_000.0),
        fuel_consumption: Mass(1.961_95),
        // 48% efficient
        annual_energy_consumption: Energy(54_900.0) / Dimensionless(0.48),
        crew: vec![CrewMember {
            rank: "seafarer".into(),
            team_size: 2,
        }],
        crew_monthly_total: None,
        planning_horizon: Year(1.0),
    }
}

#[fixture]
pub fn ship_opex_database() -> ShipOpexDatabase {
    let coefficients = ShipOpexCoefficients {
        co2_price: MoneyPerMass(100.0),
        tax_factors: indexmap! {
            "fishing_small".into() => indexmap! {
                Powertrain::Diesel => [
                    Dimensionless(3.206),
                    Dimensionless(0.052),
                    Dimensionless(0.01),
                ],
            },
        },
        ports: indexmap! {
            "fishing_small".into() => PortCharges {
                parameters: vec![Money(1.2), Money(0.8)],
                discounts: vec![Dimensionless(1.0), Dimensionless(0.5)],
            },
        },
        insurance_per_class: indexmap! { "fishing_small".into() => Dimensionless(0.015) },
        insurance_per_powertrain: indexmap! { Powertrain::Diesel => Dimensionless(0.02) },
        seafarer_wage: MoneyPerYear(18_500.0),
        maintenance_rate: indexmap! { "fishing_small".into() => Dimensionless(0.03) },
        energy_price: indexmap! { Powertrain::Diesel => MoneyPerEnergy(1_500.0) },
    };

    indexmap! { "FRA".into() => coefficients }
}

/// A diesel N3 truck driving between Paris and Lyon
#[fixture]
pub fn delivery_truck() -> TruckProperties {
    TruckProperties {
        registration_country: "FRA".into(),
        vehicle_class: "N3".into(),
        powertrain: Powertrain::Diesel,
        purchase_cost: Money(150_000.0),
        residual_value: Money(50_000.0),
        annual_distance: Usage(80_000.0),
        annual_energy_consumption: Energy(28_000.0),
        fuel_multiplier: Dimensionless(1.0),
        co2_emission_factor: Dimensionless(0.85),
        drivers: 1,
        maintenance_cost: Money(5_000.0),
        planning_horizon: Year(1.0),
    }
}

#[fixture]
pub fn truck_opex_database() -> TruckOpexDatabase {
    let coefficients = TruckOpexCoefficients {
        taxable_energy_price: indexmap! {
            Powertrain::Diesel => MoneyPerEnergy(0.15),
            Powertrain::Bev => MoneyPerEnergy(0.08),
        },
        energy_tax_factor: indexmap! {
            Powertrain::Diesel => Dimensionless(1.2),
            Powertrain::Bev => Dimensionless(1.0),
        },
        registration_tax: indexmap! { "N3".into() => Money(300.0) },
        annual_tax: indexmap! { "N3".into() => Money(350.0) },
        environmental_tax: indexmap! {
            Powertrain::Diesel => Money(100.0),
            Powertrain::Bev => Money(50.0),
        },
        regional_coefficient: Dimensionless(1.0),
        co2_tax: Dimensionless(50.0),
        tolls: indexmap! {
            "N3".into() => indexmap! {
                Powertrain::Diesel => MoneyPerUsage(0.2),
                Powertrain::Bev => MoneyPerUsage(0.15),
            },
        },
        insurance_rate: indexmap! {
            Powertrain::Diesel => Dimensionless(0.03),
            Powertrain::Bev => Dimensionless(0.025),
        },
        driver_wage: MoneyPerYear(35_000.0),
        energy_price: indexmap! {
            Powertrain::Diesel => MoneyPerEnergy(1.5),
            Powertrain::Bev => MoneyPerEnergy(0.3),
        },
    };

    indexmap! { "FRA".into() => coefficients }
}

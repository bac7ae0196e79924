//! Calculation of the residual value of a vehicle at the end of the period being costed.
//!
//! The residual value is calculated in three stages, which always run in the same order:
//!
//! 1. [Depreciation](depreciation) of the purchase cost from age, usage and maintenance
//! 2. A [health penalty](health) for efficiency, obsolescence, battery wear and warranty
//! 3. [External factors](external): energy prices, CO2 tax and resale subsidies
//!
//! Each stage consumes the output of the previous one, so it isn't possible to skip a stage or run
//! them out of order.
use crate::country::CountryProperties;
use crate::error::Result;
use crate::parameters::{ParameterKey, ParameterTable, VehicleCoefficients};
use crate::settings::ModelSettings;
use crate::units::{Dimensionless, Money};
use crate::vehicle::VehicleProperties;
use log::{debug, warn};

pub mod depreciation;
pub use depreciation::compute_depreciation;
pub mod external;
pub use external::{ExternalAdjustment, apply_external_factors};
pub mod health;
pub use health::{HealthPenalty, compute_health_penalty};

/// The residual value of a vehicle, together with every intermediate figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualValueResult {
    /// Value after depreciation only
    pub depreciated_value: Money,
    /// The health penalty applied to the depreciated value
    pub health: HealthPenalty,
    /// The effect of external factors
    pub external: ExternalAdjustment,
    /// The final residual value
    pub residual_value: Money,
}

impl ResidualValueResult {
    /// The combined health penalty factor
    pub fn health_penalty_factor(&self) -> Dimensionless {
        self.health.combined
    }

    /// The combined multiplicative effect of energy prices and CO2 tax
    pub fn external_adjustment_factor(&self) -> Dimensionless {
        self.external.factor()
    }

    /// The resale subsidy included in the residual value
    pub fn subsidy_bonus(&self) -> Money {
        self.external.subsidy_bonus
    }
}

/// Output of the depreciation stage
struct Depreciated<'a> {
    vehicle: &'a VehicleProperties,
    coefficients: &'a VehicleCoefficients,
    value: Money,
}

impl<'a> Depreciated<'a> {
    fn new(vehicle: &'a VehicleProperties, coefficients: &'a VehicleCoefficients) -> Result<Self> {
        let value = compute_depreciation(
            vehicle.purchase_cost,
            vehicle.age,
            vehicle.usage,
            vehicle.maintenance_spend,
            &coefficients.depreciation,
        )?;
        debug!("Depreciated value: {value}");

        Ok(Self {
            vehicle,
            coefficients,
            value,
        })
    }

    fn penalise_health(
        self,
        country: &CountryProperties,
        projection_year: u32,
        settings: &ModelSettings,
    ) -> Result<Penalised<'a>> {
        let health = compute_health_penalty(
            self.vehicle,
            country,
            self.coefficients,
            projection_year,
            settings,
        )?;
        let value = self.value * health.combined;
        debug!("Health penalty factor {}: value {value}", health.combined);

        Ok(Penalised {
            depreciated: self,
            health,
            value,
        })
    }
}

/// Output of the health penalty stage
struct Penalised<'a> {
    depreciated: Depreciated<'a>,
    health: HealthPenalty,
    value: Money,
}

impl Penalised<'_> {
    fn adjust_external(
        self,
        country: &CountryProperties,
        projection_year: u32,
        settings: &ModelSettings,
    ) -> Result<ResidualValueResult> {
        let Self {
            depreciated,
            health,
            value,
        } = self;
        let external = apply_external_factors(
            value,
            depreciated.vehicle.powertrain,
            country,
            projection_year,
            &depreciated.coefficients.external,
            settings,
        )?;
        debug!(
            "External adjustment factor {} with subsidy {}",
            external.factor(),
            external.subsidy_bonus
        );

        Ok(ResidualValueResult {
            depreciated_value: depreciated.value,
            health,
            external,
            residual_value: external.adjusted_value,
        })
    }
}

/// Calculates residual values using coefficients from a [`ParameterTable`]
pub struct ResidualValueCalculator<'a, T: ParameterTable + ?Sized> {
    table: &'a T,
    settings: &'a ModelSettings,
}

impl<'a, T: ParameterTable + ?Sized> ResidualValueCalculator<'a, T> {
    /// Create a new calculator.
    ///
    /// Fails if the settings are invalid (e.g. a factor floor above 1).
    pub fn new(table: &'a T, settings: &'a ModelSettings) -> Result<Self> {
        settings.validate()?;

        Ok(Self { table, settings })
    }

    /// Calculate the residual value of a vehicle.
    ///
    /// # Arguments
    ///
    /// * `vehicle` - The vehicle to value
    /// * `country` - The country in which the vehicle is registered and resold
    /// * `projection_year` - The year of resale, used to look up coefficients and projections
    pub fn calculate(
        &self,
        vehicle: &VehicleProperties,
        country: &CountryProperties,
        projection_year: u32,
    ) -> Result<ResidualValueResult> {
        vehicle.validate()?;

        let key = ParameterKey {
            country: country.id.clone(),
            vehicle_class: vehicle.vehicle_class.clone(),
            powertrain: vehicle.powertrain,
            year: projection_year,
        };
        let coefficients = self.table.lookup(&key)?;
        coefficients.validate()?;

        let result = Depreciated::new(vehicle, coefficients)?
            .penalise_health(country, projection_year, self.settings)?
            .adjust_external(country, projection_year, self.settings)?;
        debug!("Residual value for {key}: {}", result.residual_value);

        Ok(result)
    }

    /// Calculate residual values for many vehicles in the same country.
    ///
    /// Vehicles are valued independently: a failure for one vehicle is logged and returned in its
    /// place, without affecting the others.
    pub fn calculate_fleet(
        &self,
        vehicles: &[VehicleProperties],
        country: &CountryProperties,
        projection_year: u32,
    ) -> Vec<Result<ResidualValueResult>> {
        vehicles
            .iter()
            .enumerate()
            .map(|(idx, vehicle)| {
                let result = self.calculate(vehicle, country, projection_year);
                if let Err(err) = &result {
                    warn!(
                        "Could not calculate residual value for vehicle {idx} ({} {}): {err}",
                        vehicle.vehicle_class, vehicle.powertrain
                    );
                }
                result
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TcoError;
    use crate::fixture::{bev_truck, coefficient_map, diesel_truck, france};
    use crate::parameters::CoefficientMap;
    use crate::units::Year;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_calculate_diesel(
        diesel_truck: VehicleProperties,
        france: CountryProperties,
        coefficient_map: CoefficientMap,
    ) {
        let settings = ModelSettings::default();
        let calculator = ResidualValueCalculator::new(&coefficient_map, &settings).unwrap();
        let result = calculator.calculate(&diesel_truck, &france, 2030).unwrap();

        assert_approx_eq!(Money, result.depreciated_value, Money(62_560.0), epsilon = 1e-6);
        assert_approx_eq!(
            Dimensionless,
            result.health_penalty_factor(),
            Dimensionless(0.689_260_205_302_021_5),
            epsilon = 1e-12
        );
        assert_eq!(result.subsidy_bonus(), Money(0.0));
        assert_approx_eq!(
            Money,
            result.residual_value,
            Money(35_051.950_450_609_9),
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn test_calculate_bev(
        bev_truck: VehicleProperties,
        france: CountryProperties,
        coefficient_map: CoefficientMap,
    ) {
        let settings = ModelSettings::default();
        let calculator = ResidualValueCalculator::new(&coefficient_map, &settings).unwrap();
        let result = calculator.calculate(&bev_truck, &france, 2030).unwrap();

        assert_approx_eq!(
            Money,
            result.depreciated_value,
            Money(155_525.210_818_375_23),
            epsilon = 1e-6
        );
        assert_eq!(result.external_adjustment_factor(), Dimensionless(1.0));
        assert_eq!(result.subsidy_bonus(), Money(2_500.0));
        assert_approx_eq!(
            Money,
            result.residual_value,
            Money(94_730.319_040_908_6),
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn test_calculate_missing_coefficients(
        diesel_truck: VehicleProperties,
        france: CountryProperties,
        coefficient_map: CoefficientMap,
    ) {
        let settings = ModelSettings::default();
        let calculator = ResidualValueCalculator::new(&coefficient_map, &settings).unwrap();
        assert_eq!(
            calculator
                .calculate(&diesel_truck, &france, 2025)
                .unwrap_err(),
            TcoError::MissingParameter("No coefficients for FRA/N3/DIESEL/2025".into())
        );
    }

    #[rstest]
    fn test_calculate_fleet_isolates_failures(
        diesel_truck: VehicleProperties,
        bev_truck: VehicleProperties,
        france: CountryProperties,
        coefficient_map: CoefficientMap,
    ) {
        let mut bad_truck = diesel_truck.clone();
        bad_truck.age = Year(-2.0);
        let fleet = [diesel_truck, bad_truck, bev_truck];

        let settings = ModelSettings::default();
        let calculator = ResidualValueCalculator::new(&coefficient_map, &settings).unwrap();
        let results = calculator.calculate_fleet(&fleet, &france, 2030);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(TcoError::InvalidInput(_))));
        assert!(results[2].is_ok());
    }

    #[rstest]
    #[case::energy_floor(ModelSettings {
        energy_factor_floor: Dimensionless(1.5),
        ..ModelSettings::default()
    })]
    #[case::warranty_floor(ModelSettings {
        warranty_floor: Dimensionless(1.3),
        ..ModelSettings::default()
    })]
    fn test_floor_above_one_rejected(
        coefficient_map: CoefficientMap,
        #[case] settings: ModelSettings,
    ) {
        assert!(matches!(
            ResidualValueCalculator::new(&coefficient_map, &settings),
            Err(TcoError::InvalidInput(_))
        ));
    }

    #[rstest]
    fn test_table_as_trait_object(
        diesel_truck: VehicleProperties,
        france: CountryProperties,
        coefficient_map: CoefficientMap,
    ) {
        let table: &dyn ParameterTable = &coefficient_map;
        let settings = ModelSettings::default();
        let calculator = ResidualValueCalculator::new(table, &settings).unwrap();
        assert!(calculator.calculate(&diesel_truck, &france, 2030).is_ok());
    }
}

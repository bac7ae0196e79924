//! Base depreciation of a vehicle from its age, usage and maintenance history.
use crate::error::{Result, ensure_non_negative};
use crate::parameters::{DepreciationCoefficients, DepreciationCurve};
use crate::units::{Dimensionless, Money, Usage, Year};
use log::{debug, warn};

/// Proportion of value retained after `age` years, before usage and maintenance are considered
fn age_retention(coefficients: &DepreciationCoefficients, age: Year) -> Dimensionless {
    let decay = age * coefficients.rate;
    match coefficients.curve {
        DepreciationCurve::Linear => Dimensionless(1.0) - decay,
        DepreciationCurve::Exponential => (-decay).exp(),
    }
}

/// Proportion of value retained after `usage`, relative to the expected lifetime usage
fn usage_retention(coefficients: &DepreciationCoefficients, usage: Usage) -> Dimensionless {
    Dimensionless(1.0) - coefficients.usage_weight * (usage / coefficients.expected_usage)
}

/// Value gained by spending more than the benchmark on maintenance (or lost by spending less)
fn maintenance_adjustment(
    coefficients: &DepreciationCoefficients,
    age: Year,
    maintenance_spend: Money,
) -> Money {
    let benchmark_spend = coefficients.maintenance_benchmark * age;
    (maintenance_spend - benchmark_spend) * coefficients.maintenance_coefficient
}

/// Calculate the depreciated value of a vehicle.
///
/// The value is the purchase cost scaled by the age and usage retention, plus an adjustment for
/// maintenance spend relative to the benchmark. The result always lies between the salvage floor
/// and the purchase cost. Once the vehicle reaches its expected life (in either years or usage) it
/// is only worth its salvage value.
///
/// # Arguments
///
/// * `purchase_cost` - The original purchase cost
/// * `age` - Years since purchase
/// * `usage` - Cumulative usage (km or operating hours)
/// * `maintenance_spend` - Cumulative maintenance spend since purchase
/// * `coefficients` - Depreciation coefficients for this vehicle
///
/// # Returns
///
/// The depreciated value, or [`TcoError::InvalidInput`](crate::error::TcoError::InvalidInput) if
/// any of the quantities is negative or not finite.
pub fn compute_depreciation(
    purchase_cost: Money,
    age: Year,
    usage: Usage,
    maintenance_spend: Money,
    coefficients: &DepreciationCoefficients,
) -> Result<Money> {
    ensure_non_negative!(purchase_cost, "purchase_cost");
    ensure_non_negative!(age, "age");
    ensure_non_negative!(usage, "usage");
    ensure_non_negative!(maintenance_spend, "maintenance_spend");

    let floor = purchase_cost * coefficients.salvage_floor;
    if age >= coefficients.expected_life || usage >= coefficients.expected_usage {
        debug!("Vehicle has reached its expected life (age {age}, usage {usage})");
        return Ok(floor);
    }

    let value = purchase_cost
        * age_retention(coefficients, age)
        * usage_retention(coefficients, usage)
        + maintenance_adjustment(coefficients, age, maintenance_spend);

    if value < floor {
        warn!("Depreciated value {value} is below the salvage floor; using {floor} instead");
    }

    Ok(value.max(floor).min(purchase_cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TcoError;
    use crate::fixture::diesel_coefficients;
    use crate::parameters::VehicleCoefficients;
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use rstest::rstest;

    fn depreciate(
        coefficients: &VehicleCoefficients,
        age: f64,
        usage: f64,
        maintenance_spend: f64,
    ) -> Result<Money> {
        compute_depreciation(
            Money(100_000.0),
            Year(age),
            Usage(usage),
            Money(maintenance_spend),
            &coefficients.depreciation,
        )
    }

    #[rstest]
    fn test_new_vehicle_keeps_purchase_cost(diesel_coefficients: VehicleCoefficients) {
        assert_eq!(
            depreciate(&diesel_coefficients, 0.0, 0.0, 0.0).unwrap(),
            Money(100_000.0)
        );
    }

    #[rstest]
    fn test_linear_depreciation(diesel_coefficients: VehicleCoefficients) {
        // Maintenance exactly on benchmark, so no adjustment
        assert_approx_eq!(
            Money,
            depreciate(&diesel_coefficients, 4.0, 400_000.0, 20_000.0).unwrap(),
            Money(62_560.0),
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn test_exponential_depreciation(mut diesel_coefficients: VehicleCoefficients) {
        diesel_coefficients.depreciation.curve = DepreciationCurve::Exponential;
        diesel_coefficients.depreciation.usage_weight = Dimensionless(0.0);
        let expected = 100_000.0 * (-0.08_f64 * 5.0).exp();
        assert_approx_eq!(
            Money,
            depreciate(&diesel_coefficients, 5.0, 0.0, 25_000.0).unwrap(),
            Money(expected),
            epsilon = 1e-6
        );
    }

    #[rstest]
    #[case(30_000.0, 64_560.0)] // spent more than benchmark
    #[case(10_000.0, 60_560.0)] // deferred maintenance
    fn test_maintenance_adjustment(
        diesel_coefficients: VehicleCoefficients,
        #[case] maintenance_spend: f64,
        #[case] expected: f64,
    ) {
        assert_approx_eq!(
            Money,
            depreciate(&diesel_coefficients, 4.0, 400_000.0, maintenance_spend).unwrap(),
            Money(expected),
            epsilon = 1e-6
        );
    }

    #[rstest]
    #[case(15.0, 0.0)] // age equals expected life
    #[case(2.0, 1_500_000.0)] // usage equals expected usage
    #[case(11.0, 1_000_000.0)] // formula falls below floor
    fn test_salvage_floor(
        diesel_coefficients: VehicleCoefficients,
        #[case] age: f64,
        #[case] usage: f64,
    ) {
        assert_eq!(
            depreciate(&diesel_coefficients, age, usage, 0.0).unwrap(),
            Money(10_000.0)
        );
    }

    #[rstest]
    fn test_never_exceeds_purchase_cost(diesel_coefficients: VehicleCoefficients) {
        // Lavish maintenance on a nearly new vehicle
        assert_eq!(
            depreciate(&diesel_coefficients, 0.5, 1_000.0, 1_000_000.0).unwrap(),
            Money(100_000.0)
        );
    }

    #[rstest]
    fn test_monotonic_in_age_and_usage(diesel_coefficients: VehicleCoefficients) {
        let ages = [0.0, 1.0, 2.5, 5.0, 8.0, 12.0, 15.0, 20.0];
        let usages = [0.0, 50_000.0, 250_000.0, 900_000.0, 1_600_000.0];

        for usage in usages {
            let values = ages
                .iter()
                .map(|&age| depreciate(&diesel_coefficients, age, usage, 0.0).unwrap())
                .collect_vec();
            assert!(values.iter().tuple_windows().all(|(a, b)| a >= b));
        }

        for age in ages {
            let values = usages
                .iter()
                .map(|&usage| depreciate(&diesel_coefficients, age, usage, 0.0).unwrap())
                .collect_vec();
            assert!(values.iter().tuple_windows().all(|(a, b)| a >= b));
        }
    }

    #[rstest]
    #[case(-1.0, 0.0, 0.0)]
    #[case(1.0, -10.0, 0.0)]
    #[case(1.0, 0.0, -5.0)]
    #[case(f64::NAN, 0.0, 0.0)]
    fn test_invalid_input(
        diesel_coefficients: VehicleCoefficients,
        #[case] age: f64,
        #[case] usage: f64,
        #[case] maintenance_spend: f64,
    ) {
        assert!(matches!(
            depreciate(&diesel_coefficients, age, usage, maintenance_spend),
            Err(TcoError::InvalidInput(_))
        ));
    }
}

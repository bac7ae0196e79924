//! This module defines various unit types and their conversions.
//!
//! All quantities are thin wrappers around `f64`. Only the arithmetic which makes physical sense is
//! implemented, so that (for example) a [`Money`] value cannot accidentally be added to an
//! [`Energy`] value.
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            derive_more::Add,
            derive_more::Sub,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub const fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is finite (i.e. not infinite or NaN)
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Returns the larger of two values
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            /// Returns the smaller of two values
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// Restrict the value to the interval `[min, max]`
            pub fn clamp(self, min: Self, max: Self) -> Self {
                Self(self.0.clamp(min.0, max.0))
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl std::ops::Div<$name> for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }

        impl std::ops::AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                $name(iter.map(|x| x.0).sum())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ApproxEq for $name {
            type Margin = F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

/// Represents a dimensionless quantity (ratios, proportions, factors).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    derive_more::Add,
    derive_more::Sub,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

impl std::ops::Neg for Dimensionless {
    type Output = Dimensionless;

    fn neg(self) -> Self::Output {
        Dimensionless(-self.0)
    }
}

impl std::iter::Sum for Dimensionless {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Dimensionless(iter.map(|x| x.0).sum())
    }
}

impl Dimensionless {
    /// Creates a new dimensionless value
    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    /// Returns the value as a f64
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether the value is finite
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// `e` raised to the power of this value
    pub fn exp(self) -> Self {
        Dimensionless(self.0.exp())
    }

    /// Returns the larger of two values
    pub fn max(self, other: Self) -> Self {
        Dimensionless(self.0.max(other.0))
    }

    /// Returns the smaller of two values
    pub fn min(self, other: Self) -> Self {
        Dimensionless(self.0.min(other.0))
    }

    /// Restrict the value to the interval `[min, max]`
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Dimensionless(self.0.clamp(min.0, max.0))
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

impl std::fmt::Display for Dimensionless {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ApproxEq for Dimensionless {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        self.0.approx_eq(other.0, margin)
    }
}

// Base quantities
unit_struct!(Money);
unit_struct!(Year);
unit_struct!(Energy);
unit_struct!(Mass);
// Distance travelled (km) or operating hours, depending on asset type
unit_struct!(Usage);

// Derived quantities
unit_struct!(PerYear);
unit_struct!(MoneyPerYear);
unit_struct!(MoneyPerEnergy);
unit_struct!(MoneyPerMass);
unit_struct!(MoneyPerUsage);
unit_struct!(MassPerMoney);

// Division rules
impl_div!(Money, Year, MoneyPerYear);
impl_div!(Money, Energy, MoneyPerEnergy);
impl_div!(Dimensionless, Year, PerYear);

// Multiplication rules
impl_mul!(Year, PerYear, Dimensionless);
impl_mul!(MoneyPerYear, Year, Money);
impl_mul!(MoneyPerEnergy, Energy, Money);
impl_mul!(MoneyPerMass, Mass, Money);
impl_mul!(MoneyPerUsage, Usage, Money);
impl_mul!(MassPerMoney, MoneyPerMass, Dimensionless);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_derived_units() {
        let cost = MoneyPerYear(1200.0) * Year(2.5);
        assert_eq!(cost, Money(3000.0));

        let decay = Year(4.0) * PerYear(0.05);
        assert_approx_eq!(Dimensionless, decay, Dimensionless(0.2));

        let tolls = MoneyPerUsage(0.2) * Usage(80_000.0);
        assert_approx_eq!(Money, tolls, Money(16_000.0));

        let ratio = Money(250.0) / Money(1000.0);
        assert_eq!(ratio, Dimensionless(0.25));
    }

    #[test]
    fn test_sum_and_clamp() {
        let total: Money = [Money(1.0), Money(2.0), Money(3.5)].into_iter().sum();
        assert_eq!(total, Money(6.5));
        assert_eq!(
            Dimensionless(1.4).clamp(Dimensionless(0.5), Dimensionless(1.0)),
            Dimensionless(1.0)
        );
        assert_eq!(Money(-3.0).max(Money(0.0)), Money(0.0));
    }
}

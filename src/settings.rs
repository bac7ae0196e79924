//! Code for loading model settings.
//!
//! Settings control how the residual value model combines its factors, rather than supplying
//! per-vehicle data. They are read from an optional TOML file; any value not given falls back to
//! its default.
use crate::error::ensure_input;
use crate::input::{deserialise_proportion_nonzero, input_err_msg, read_toml};
use crate::logging::DEFAULT_LOG_LEVEL;
use crate::units::Dimensionless;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::path::Path;

/// The default name for the settings file
pub const SETTINGS_FILE_NAME: &str = "tco.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

define_unit_param_default!(default_efficiency_floor, Dimensionless, 0.5);
define_unit_param_default!(default_obsolescence_floor, Dimensionless, 0.5);
define_unit_param_default!(default_charging_floor, Dimensionless, 0.5);
define_unit_param_default!(default_warranty_floor, Dimensionless, 0.8);
define_unit_param_default!(default_energy_factor_floor, Dimensionless, 0.5);
define_unit_param_default!(default_weight, Dimensionless, 1.0);

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// How the health sub-factors are combined into a single penalty factor
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Default)]
pub enum HealthCombination {
    /// Multiply the sub-factors together, so that degradation compounds
    #[default]
    #[string = "multiplicative"]
    Multiplicative,
    /// Take a weighted arithmetic mean of the sub-factors
    #[string = "weighted_mean"]
    WeightedMean,
}

/// Relative weights of the health sub-factors, used with [`HealthCombination::WeightedMean`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthWeights {
    /// Weight for the efficiency factor
    #[serde(default = "default_weight")]
    pub efficiency: Dimensionless,
    /// Weight for the obsolescence factor
    #[serde(default = "default_weight")]
    pub obsolescence: Dimensionless,
    /// Weight for the charging degradation factor
    #[serde(default = "default_weight")]
    pub charging: Dimensionless,
    /// Weight for the warranty factor
    #[serde(default = "default_weight")]
    pub warranty: Dimensionless,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            efficiency: default_weight(),
            obsolescence: default_weight(),
            charging: default_weight(),
            warranty: default_weight(),
        }
    }
}

impl HealthWeights {
    fn iter(&self) -> impl Iterator<Item = Dimensionless> {
        [self.efficiency, self.obsolescence, self.charging, self.warranty].into_iter()
    }
}

/// Represents the contents of the settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelSettings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Lowest value the efficiency factor can take
    #[serde(default = "default_efficiency_floor")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub efficiency_floor: Dimensionless,
    /// Lowest value the obsolescence factor can take
    #[serde(default = "default_obsolescence_floor")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub obsolescence_floor: Dimensionless,
    /// Lowest value the charging degradation factor can take
    #[serde(default = "default_charging_floor")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub charging_floor: Dimensionless,
    /// Value of the warranty factor once the warranty has expired
    #[serde(default = "default_warranty_floor")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub warranty_floor: Dimensionless,
    /// How health sub-factors are combined
    #[serde(default)]
    pub health_combination: HealthCombination,
    /// Weights for the weighted mean combination
    #[serde(default)]
    pub health_weights: HealthWeights,
    /// Lowest value the energy price factor can take
    #[serde(default = "default_energy_factor_floor")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub energy_factor_floor: Dimensionless,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            efficiency_floor: default_efficiency_floor(),
            obsolescence_floor: default_obsolescence_floor(),
            charging_floor: default_charging_floor(),
            warranty_floor: default_warranty_floor(),
            health_combination: HealthCombination::default(),
            health_weights: HealthWeights::default(),
            energy_factor_floor: default_energy_factor_floor(),
        }
    }
}

/// Check that the weights can be used to form a weighted mean
fn check_health_weights(weights: &HealthWeights) -> crate::error::Result<()> {
    ensure_input!(
        weights.iter().all(|w| w.is_finite() && w.value() >= 0.0),
        "health_weights must be finite and non-negative"
    );
    ensure_input!(
        weights.iter().any(|w| w.value() > 0.0),
        "At least one of health_weights must be greater than zero"
    );

    Ok(())
}

/// Check that a floor is in `(0, 1]`
fn check_floor(name: &str, floor: Dimensionless) -> crate::error::Result<()> {
    ensure_input!(
        floor.value() > 0.0 && floor.value() <= 1.0,
        "{name} must be > 0 and <= 1 (got {floor})"
    );

    Ok(())
}

impl ModelSettings {
    /// Read settings from a TOML file.
    ///
    /// If the file is not present, default values for settings will be used.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the settings file
    ///
    /// # Returns
    ///
    /// The settings as a [`ModelSettings`] struct or an error if the file is invalid
    pub fn from_path(file_path: &Path) -> Result<ModelSettings> {
        if !file_path.is_file() {
            return Ok(ModelSettings::default());
        }

        let settings: ModelSettings = read_toml(file_path)?;
        settings
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(settings)
    }

    /// Check that the settings are usable.
    ///
    /// Settings read with [`ModelSettings::from_path`] are always checked, but settings built in
    /// code must be checked separately.
    pub fn validate(&self) -> crate::error::Result<()> {
        for (name, floor) in [
            ("efficiency_floor", self.efficiency_floor),
            ("obsolescence_floor", self.obsolescence_floor),
            ("charging_floor", self.charging_floor),
            ("warranty_floor", self.warranty_floor),
            ("energy_factor_floor", self.energy_factor_floor),
        ] {
            check_floor(name, floor)?;
        }
        check_health_weights(&self.health_weights)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TcoError;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_settings(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        {
            let mut file = File::create(&file_path).unwrap();
            write!(file, "{contents}").unwrap();
        }

        (dir, file_path)
    }

    #[test]
    fn test_from_path_no_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME); // NB: doesn't exist
        assert_eq!(
            ModelSettings::from_path(&file_path).unwrap(),
            ModelSettings::default()
        );
    }

    #[test]
    fn test_from_path_empty_file_uses_defaults() {
        let (_dir, file_path) = write_settings("");
        assert_eq!(
            ModelSettings::from_path(&file_path).unwrap(),
            ModelSettings::default()
        );
    }

    #[test]
    fn test_from_path() {
        let (_dir, file_path) = write_settings(
            "log_level = \"debug\"\n\
             warranty_floor = 0.9\n\
             health_combination = \"weighted_mean\"\n\
             [health_weights]\n\
             efficiency = 2.0\n",
        );

        let settings = ModelSettings::from_path(&file_path).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.warranty_floor, Dimensionless(0.9));
        assert_eq!(settings.health_combination, HealthCombination::WeightedMean);
        assert_eq!(settings.health_weights.efficiency, Dimensionless(2.0));
        assert_eq!(settings.health_weights.charging, Dimensionless(1.0));
        assert_eq!(settings.efficiency_floor, Dimensionless(0.5));
    }

    #[test]
    fn test_from_path_bad_floor() {
        let (_dir, file_path) = write_settings("charging_floor = 0.0\n");
        assert!(ModelSettings::from_path(&file_path).is_err());
    }

    #[rstest]
    #[case::energy_above_one(ModelSettings {
        energy_factor_floor: Dimensionless(1.5),
        ..ModelSettings::default()
    })]
    #[case::warranty_above_one(ModelSettings {
        warranty_floor: Dimensionless(1.3),
        ..ModelSettings::default()
    })]
    #[case::zero_efficiency(ModelSettings {
        efficiency_floor: Dimensionless(0.0),
        ..ModelSettings::default()
    })]
    #[case::nan_charging(ModelSettings {
        charging_floor: Dimensionless(f64::NAN),
        ..ModelSettings::default()
    })]
    fn test_validate_bad_floor(#[case] settings: ModelSettings) {
        assert!(matches!(settings.validate(), Err(TcoError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_default() {
        assert!(ModelSettings::default().validate().is_ok());
    }

    #[test]
    fn test_check_health_weights() {
        assert!(check_health_weights(&HealthWeights::default()).is_ok());

        let zero = HealthWeights {
            efficiency: Dimensionless(0.0),
            obsolescence: Dimensionless(0.0),
            charging: Dimensionless(0.0),
            warranty: Dimensionless(0.0),
        };
        assert!(check_health_weights(&zero).is_err());

        let negative = HealthWeights {
            warranty: Dimensionless(-1.0),
            ..HealthWeights::default()
        };
        assert!(check_health_weights(&negative).is_err());
    }
}

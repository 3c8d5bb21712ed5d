//! Runner configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `caravan.ron` file (if exists)
//! 3. Environment variables prefixed with `CARAVAN_`
//!
//! Example environment variable: `CARAVAN_CARRIER__LOAD_DIVISOR=25.0`

use std::path::Path;

use anyhow::{bail, Context, Result};
use caravan_core::CarrierConfig;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

/// Default config file name, without extension
pub const CONFIG_FILE: &str = "caravan";

/// Main runner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub carrier: CarrierConfig,

    #[serde(default)]
    pub sim: SimConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// In-memory host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Movement speed given to carriers spawned by scenarios
    pub carrier_speed: f64,
    /// Seed used when neither the scenario nor the command line sets one
    pub default_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            carrier_speed: 0.09,
            default_seed: 12345,
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory for JSON reports when no explicit path is given
    pub output_dir: String,
    /// Write a report for every run
    pub always_save: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: "reports".to_string(),
            always_save: false,
        }
    }
}

impl AppConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `caravan.ron` in the working directory (if exists)
    /// 3. Environment variables prefixed with `CARAVAN_` (highest priority)
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(
                File::with_name(CONFIG_FILE)
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            .add_source(Environment::with_prefix("CARAVAN").separator("__"));

        Self::build(builder)
    }

    /// Load from an explicit file, which must exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let builder = Self::defaults()?
            .add_source(File::from(path).format(config::FileFormat::Ron))
            .add_source(Environment::with_prefix("CARAVAN").separator("__"));

        Self::build(builder)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let carrier = CarrierConfig::default();
        let sim = SimConfig::default();
        let report = ReportConfig::default();

        let builder = Config::builder()
            .set_default("carrier.storage_slots", carrier.storage_slots as i64)?
            .set_default("carrier.load_divisor", carrier.load_divisor)?
            .set_default("carrier.fallback_base_speed", carrier.fallback_base_speed)?
            .set_default("carrier.default_size", carrier.default_size)?
            .set_default("carrier.saddle_message", carrier.saddle_message)?
            .set_default("carrier.storage_title_suffix", carrier.storage_title_suffix)?
            .set_default("sim.carrier_speed", sim.carrier_speed)?
            .set_default("sim.default_seed", sim.default_seed)?
            .set_default("report.output_dir", report.output_dir)?
            .set_default("report.always_save", report.always_save)?;

        Ok(builder)
    }

    fn build(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let config = builder.build().context("Failed to build configuration")?;

        let app: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        app.validate().context("Invalid configuration")?;
        Ok(app)
    }

    /// Reject values that would make derived speeds meaningless
    pub fn validate(&self) -> Result<()> {
        let carrier = &self.carrier;
        if !(carrier.load_divisor.is_finite() && carrier.load_divisor > 0.0) {
            bail!(
                "carrier.load_divisor must be a positive number, got {}",
                carrier.load_divisor
            );
        }
        if carrier.storage_slots == 0 {
            bail!("carrier.storage_slots must be at least 1");
        }
        if !(carrier.fallback_base_speed.is_finite() && carrier.fallback_base_speed > 0.0) {
            bail!(
                "carrier.fallback_base_speed must be a positive number, got {}",
                carrier.fallback_base_speed
            );
        }
        if !(carrier.default_size.is_finite() && carrier.default_size > 0.0) {
            bail!(
                "carrier.default_size must be a positive number, got {}",
                carrier.default_size
            );
        }
        if !(self.sim.carrier_speed.is_finite() && self.sim.carrier_speed >= 0.0) {
            bail!(
                "sim.carrier_speed must be a nonnegative number, got {}",
                self.sim.carrier_speed
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.carrier.storage_slots, 54);
        assert_eq!(config.carrier.load_divisor, 50.0);
        assert_eq!(config.sim.carrier_speed, 0.09);
        assert_eq!(config.report.output_dir, "reports");
        assert!(!config.report.always_save);
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = AppConfig::load().expect("Failed to load config");
        assert_eq!(config.carrier.fallback_base_speed, 0.1);
        assert_eq!(config.carrier.storage_title_suffix, "'s Storage");
    }

    #[test]
    fn test_load_config_file_overrides() {
        let mut file = tempfile::Builder::new()
            .suffix(".ron")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(
            file,
            "(carrier: (load_divisor: 25.0, storage_slots: 27), sim: (default_seed: 7))"
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).expect("Failed to load config");
        assert_eq!(config.carrier.load_divisor, 25.0);
        assert_eq!(config.carrier.storage_slots, 27);
        assert_eq!(config.sim.default_seed, 7);
        // Untouched keys keep their defaults
        assert_eq!(config.sim.carrier_speed, 0.09);
        assert_eq!(
            config.carrier.saddle_message,
            "You need to saddle the camel first!"
        );
    }

    fn load_ron(contents: &str) -> Result<AppConfig> {
        let mut file = tempfile::Builder::new()
            .suffix(".ron")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(file, "{}", contents).unwrap();
        AppConfig::load_from(file.path())
    }

    #[test]
    fn test_rejects_speed_breaking_values() {
        for bad in [
            "(carrier: (load_divisor: 0.0))",
            "(carrier: (load_divisor: -50.0))",
            "(carrier: (storage_slots: 0))",
            "(carrier: (fallback_base_speed: 0.0))",
            "(carrier: (default_size: -1.0))",
            "(sim: (carrier_speed: -0.1))",
        ] {
            let err = load_ron(bad).expect_err(bad);
            assert!(format!("{:#}", err).contains("Invalid configuration"), "{bad}");
        }
    }

    #[test]
    fn test_validate_defaults_and_non_finite() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.carrier.load_divisor = f64::NAN;
        assert!(config.validate().is_err());

        config.carrier.load_divisor = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(dir.path().join("absent.ron")).is_err());
    }
}

use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Benchmarking, Config, Enrichment, Logging, RiskModels};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. The file is
/// optional: when it is absent, every section falls back to its documented
/// default so the analyzer can run out of the box.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml").required(false))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::settings::Config;

    #[test]
    fn defaults_apply_when_sections_missing() {
        let config: Config = config::Config::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();
        assert_eq!(config.benchmarking.upper_tolerance, 1.1);
        assert_eq!(config.benchmarking.lower_tolerance, 0.9);
        assert_eq!(config.risk_models.var_iterations, 10_000);
        assert_eq!(config.risk_models.var_confidence, 0.95);
        assert_eq!(config.logging.filter, "info");
        config.validate().unwrap();
    }

    #[test]
    fn validation_rejects_inverted_tolerance_band() {
        let mut config: Config = config::Config::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();
        config.benchmarking.upper_tolerance = 0.8;
        assert!(config.validate().is_err());
    }
}

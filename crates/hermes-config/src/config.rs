//! Main configuration types.
//!
//! This module provides the top-level [`HermesConfig`] struct and its builder.

use hermes_params::ParamsConfig;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig};

/// Complete Hermes configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use hermes_config::HermesConfig;
///
/// let config = HermesConfig::default();
/// assert_eq!(config.params.size_threshold, 10 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HermesConfig {
    /// Request parameter parsing.
    #[serde(default)]
    pub params: ParamsConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HermesConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HermesConfigBuilder {
        HermesConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - A multipart limit is zero
    /// - The in-memory size threshold exceeds the field size limit
    /// - The date format is empty
    /// - The log level is not a valid filter
    pub fn validate(&self) -> Result<(), ConfigError> {
        let params = &self.params;

        for (field, value) in [
            ("params.max_body_size", params.max_body_size),
            ("params.max_field_size", params.max_field_size),
            ("params.max_fields", params.max_fields),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid_value(field, "must be greater than zero"));
            }
        }

        if params.size_threshold > params.max_field_size {
            return Err(ConfigError::invalid_value(
                "params.size_threshold",
                format!(
                    "{} exceeds params.max_field_size ({})",
                    params.size_threshold, params.max_field_size
                ),
            ));
        }

        if params.date_format.pattern().trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "params.date_format",
                "must not be empty",
            ));
        }

        if let Err(e) = hermes_telemetry::create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", e.to_string()));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty debug logs with source locations.
    ///
    /// ```
    /// use hermes_config::HermesConfig;
    ///
    /// let config = HermesConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Create a production configuration preset.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

/// Builder for [`HermesConfig`].
#[derive(Debug, Default)]
pub struct HermesConfigBuilder {
    params: Option<ParamsConfig>,
    logging: Option<LoggingConfig>,
}

impl HermesConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameter parsing configuration.
    #[must_use]
    pub fn params(mut self, params: ParamsConfig) -> Self {
        self.params = Some(params);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> HermesConfig {
        HermesConfig {
            params: self.params.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<HermesConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

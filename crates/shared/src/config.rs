//! Application configuration management.

use serde::Deserialize;

use crate::types::{MonetaryAmount, SplitMode};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Splitting parameters.
    #[serde(default)]
    pub split: SplitSettings,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogSettings,
}

/// Splitting parameters as entered by the operator.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitSettings {
    /// Amounts at or above this value are split candidates.
    #[serde(default = "default_threshold")]
    pub threshold: MonetaryAmount,
    /// Every part must stay strictly below this value. Defaults to the threshold.
    #[serde(default)]
    pub max_split_value: Option<MonetaryAmount>,
    /// Smallest amount a part may hold.
    #[serde(default = "default_min_unit")]
    pub min_unit: MonetaryAmount,
    /// Splitting discipline.
    #[serde(default)]
    pub mode: SplitMode,
    /// Attempt budget for the randomized splitter.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_threshold() -> MonetaryAmount {
    MonetaryAmount::from_units(500)
}

fn default_min_unit() -> MonetaryAmount {
    MonetaryAmount::CENT
}

fn default_max_attempts() -> u32 {
    100
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_split_value: None,
            min_unit: default_min_unit(),
            mode: SplitMode::default(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl SplitSettings {
    /// Upper bound per part after applying operator fallbacks.
    ///
    /// A missing value falls back to the threshold; a value below the
    /// minimum unit is raised to the minimum unit.
    #[must_use]
    pub fn effective_max_split(&self) -> MonetaryAmount {
        let max_split = self.max_split_value.unwrap_or(self.threshold);
        if max_split < self.min_unit {
            tracing::warn!(
                max_split_value = %max_split,
                min_unit = %self.min_unit,
                "max_split_value below minimum unit, using minimum unit"
            );
            return self.min_unit;
        }
        max_split
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "invsplit=info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    /// Loads configuration with an explicit file layered over the defaults.
    ///
    /// Environment variables still take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or configuration cannot be loaded.
    pub fn load_from_file(path: &str) -> Result<Self, config::ConfigError> {
        Self::builder_with(Some(path))?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        Self::builder_with(None)
    }

    fn builder_with(
        path: Option<&str>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        Ok(builder.add_source(config::Environment::with_prefix("INVSPLIT").separator("__")))
    }
}

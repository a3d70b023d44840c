//! Configuration loading and management.

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::metrics::MetricKind;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum acceptable overall score (0-100) for `evaluate`.
    pub fail_under: Option<f64>,
    /// Per-metric weights and switches.
    pub metrics: MetricsConfig,
    /// Directory input configuration.
    pub input: InputConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. Use this for explicit `--config` flags.
    /// Env vars with `FIXEVAL_` prefix override file values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file_exact(path))
            .merge(Env::prefixed("FIXEVAL_").split("__"))
            .extract()
            .map_err(|e| Error::config(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from directory, looking for fixeval.toml or
    /// .fixeval/fixeval.toml.
    ///
    /// Missing files are silently skipped (defaults are used).
    /// Env vars with `FIXEVAL_` prefix override file/default values.
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(dir.join("fixeval.toml")))
            .merge(Toml::file(dir.join(".fixeval/fixeval.toml")))
            .merge(Env::prefixed("FIXEVAL_").split("__"))
            .extract()
            .map_err(|e| Error::config(e.to_string()))?;
        Ok(config)
    }

    /// Create default config file content.
    pub fn default_toml() -> &'static str {
        include_str!("default_config.toml")
    }

    /// Render this configuration as TOML, without comments.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Weight and switch for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfig {
    /// Relative weight in [0, 1]. Weights are renormalized, so they need not
    /// sum to 1.
    pub weight: f64,
    /// Disabled metrics are neither computed nor counted in the total weight.
    pub enabled: bool,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            weight: 0.0,
            enabled: true,
        }
    }
}

impl MetricConfig {
    pub fn weighted(weight: f64) -> Self {
        Self {
            weight,
            enabled: true,
        }
    }
}

/// Weights for the six evaluation metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub correctness: MetricConfig,
    pub completeness: MetricConfig,
    pub pattern_match: MetricConfig,
    pub cleanliness: MetricConfig,
    pub efficiency: MetricConfig,
    pub complexity: MetricConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            correctness: MetricConfig::weighted(0.35),
            completeness: MetricConfig::weighted(0.15),
            pattern_match: MetricConfig::weighted(0.10),
            cleanliness: MetricConfig::weighted(0.15),
            efficiency: MetricConfig::weighted(0.10),
            complexity: MetricConfig::weighted(0.15),
        }
    }
}

impl MetricsConfig {
    pub fn get(&self, kind: MetricKind) -> &MetricConfig {
        match kind {
            MetricKind::Correctness => &self.correctness,
            MetricKind::Completeness => &self.completeness,
            MetricKind::PatternMatch => &self.pattern_match,
            MetricKind::Cleanliness => &self.cleanliness,
            MetricKind::Efficiency => &self.efficiency,
            MetricKind::Complexity => &self.complexity,
        }
    }

    pub fn get_mut(&mut self, kind: MetricKind) -> &mut MetricConfig {
        match kind {
            MetricKind::Correctness => &mut self.correctness,
            MetricKind::Completeness => &mut self.completeness,
            MetricKind::PatternMatch => &mut self.pattern_match,
            MetricKind::Cleanliness => &mut self.cleanliness,
            MetricKind::Efficiency => &mut self.efficiency,
            MetricKind::Complexity => &mut self.complexity,
        }
    }

    /// Metrics that are switched on, in reporting order.
    pub fn enabled(&self) -> impl Iterator<Item = (MetricKind, &MetricConfig)> {
        MetricKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, m)| m.enabled)
    }

    /// Reject weights outside [0, 1], including non-finite ones.
    pub fn validate(&self) -> Result<()> {
        for kind in MetricKind::ALL {
            let weight = self.get(kind).weight;
            if !(0.0..=1.0).contains(&weight) {
                return Err(Error::invalid_input(format!(
                    "weight for {kind} must be between 0 and 1, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

/// Directory input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Exclude patterns (glob), matched against paths relative to the
    /// submission root.
    pub exclude: Vec<String>,
    /// Honor .gitignore files while walking directories.
    pub respect_gitignore: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            respect_gitignore: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,
    /// Color output.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON format.
    Json,
    /// Markdown format.
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(format!("Unknown format: {s}. Use 'text', 'json', or 'md'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.metrics.correctness.weight, 0.35);
        assert_eq!(config.metrics.efficiency.weight, 0.10);
        assert!(config.metrics.complexity.enabled);
        assert!(config.fail_under.is_none());
        assert!(config.input.respect_gitignore);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let metrics = MetricsConfig::default();
        let total: f64 = metrics.enabled().map(|(_, m)| m.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "md".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("unknown".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_config_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "fixeval.toml",
                "[metrics.correctness]\nweight = 0.5\n\n[metrics.cleanliness]\nenabled = false",
            )?;
            let config = Config::from_file("fixeval.toml").unwrap();
            assert_eq!(config.metrics.correctness.weight, 0.5);
            assert!(config.metrics.correctness.enabled);
            assert!(!config.metrics.cleanliness.enabled);
            assert_eq!(config.metrics.cleanliness.weight, 0.15);
            Ok(())
        });
    }

    #[test]
    fn test_config_load_default_fixeval_toml() {
        Jail::expect_with(|jail| {
            jail.create_file("fixeval.toml", "fail_under = 75.0")?;
            let config = Config::load_default(".").unwrap();
            assert_eq!(config.fail_under, Some(75.0));
            Ok(())
        });
    }

    #[test]
    fn test_config_load_default_dot_fixeval() {
        Jail::expect_with(|jail| {
            jail.create_dir(".fixeval")?;
            jail.create_file(".fixeval/fixeval.toml", "[output]\nformat = \"json\"")?;
            let config = Config::load_default(".").unwrap();
            assert_eq!(config.output.format, OutputFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn test_config_load_default_no_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load_default(".").unwrap();
            assert_eq!(config.metrics, MetricsConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_from_file_errors_on_missing_file() {
        let result = Config::from_file("/nonexistent/path/fixeval.toml");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("not found"), "expected 'not found' in: {err}");
    }

    #[test]
    fn test_env_var_overrides_file_value() {
        Jail::expect_with(|jail| {
            jail.create_file("fixeval.toml", "[metrics.efficiency]\nweight = 0.2")?;
            jail.set_env("FIXEVAL_METRICS__EFFICIENCY__WEIGHT", "0.4");
            let config = Config::from_file("fixeval.toml").unwrap();
            assert_eq!(config.metrics.efficiency.weight, 0.4);
            Ok(())
        });
    }

    #[test]
    fn test_env_var_overrides_default_no_file() {
        Jail::expect_with(|jail| {
            jail.set_env("FIXEVAL_FAIL_UNDER", "60");
            let config = Config::load_default(".").unwrap();
            assert_eq!(config.fail_under, Some(60.0));
            Ok(())
        });
    }

    #[test]
    fn test_config_with_exclude_patterns() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "fixeval.toml",
                "[input]\nexclude = [\"vendor/**\", \"*.lock\"]",
            )?;
            let config = Config::from_file("fixeval.toml").unwrap();
            assert_eq!(config.input.exclude.len(), 2);
            assert!(config.input.exclude.contains(&"vendor/**".to_string()));
            Ok(())
        });
    }

    #[test]
    fn test_default_toml_parses_to_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("fixeval.toml", Config::default_toml())?;
            let config = Config::from_file("fixeval.toml").unwrap();
            assert_eq!(config.metrics, MetricsConfig::default());
            assert_eq!(config.output.format, OutputFormat::Text);
            Ok(())
        });
    }

    #[test]
    fn test_to_toml_reloads_identically() {
        Jail::expect_with(|jail| {
            jail.set_env("FIXEVAL_METRICS__CORRECTNESS__WEIGHT", "0.5");
            jail.set_env("FIXEVAL_FAIL_UNDER", "60");
            let config = Config::load_default(".").unwrap();
            jail.clear_env();

            jail.create_file("resolved.toml", &config.to_toml().unwrap())?;
            let reloaded = Config::from_file("resolved.toml").unwrap();
            assert_eq!(reloaded.metrics, config.metrics);
            assert_eq!(reloaded.metrics.correctness.weight, 0.5);
            assert_eq!(reloaded.fail_under, Some(60.0));
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut metrics = MetricsConfig::default();
        assert!(metrics.validate().is_ok());
        metrics.get_mut(MetricKind::Efficiency).weight = -0.1;
        assert!(matches!(metrics.validate(), Err(Error::InvalidInput(_))));
        metrics.get_mut(MetricKind::Efficiency).weight = f64::NAN;
        assert!(metrics.validate().is_err());
        metrics.get_mut(MetricKind::Efficiency).weight = 1.5;
        assert!(matches!(metrics.validate(), Err(Error::InvalidInput(_))));
        metrics.get_mut(MetricKind::Efficiency).weight = 1.0;
        assert!(metrics.validate().is_ok());
    }

    #[test]
    fn test_enabled_skips_disabled_metrics() {
        let mut metrics = MetricsConfig::default();
        metrics.cleanliness.enabled = false;
        let kinds: Vec<_> = metrics.enabled().map(|(k, _)| k).collect();
        assert_eq!(kinds.len(), 5);
        assert!(!kinds.contains(&MetricKind::Cleanliness));
    }
}

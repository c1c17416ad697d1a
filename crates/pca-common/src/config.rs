//! ---
//! pca_section: "01-core-functionality"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Study configuration shared by the calculation engine and tooling."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_fault_level_step() -> u32 {
    10
}

fn default_breaker_operate_time() -> f64 {
    0.05
}

fn default_nps_guard() -> f64 {
    0.1
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

/// Primary configuration object for the assessment tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub reports: ReportConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "PCA_CONFIG";

    /// Load configuration from disk, respecting the `PCA_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    ///
    /// Unlike a daemon configuration the study settings are all optional, so
    /// when no candidate exists the defaults are returned with no source.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        debug!("no configuration file found, using study defaults");
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.study.validate()
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Network region; decides which terminal earth fault minimum is assessed.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Bolted phase-ground minimum everywhere.
    #[default]
    Seq,
    /// Resistive minimum: 50 ohm on overhead construction, 10 ohm otherwise.
    Regional,
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seq" => Ok(Region::Seq),
            "regional" | "regional models" => Ok(Region::Regional),
            other => Err(format!("unknown region: {}", other)),
        }
    }
}

/// Formula used to derive the allowable fault level of a conductor from its
/// one second thermal rating, the clearing time `t` and the trip count `n`.
///
/// Both the report and diagram colouring call sites have historically used
/// different expressions; the choice is left to the study owner.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AllowableFormula {
    /// `rating / sqrt(t * n)`
    #[default]
    PerTrip,
    /// `rating / (sqrt(t) * (n + 1))`
    ScaledTripCount,
    /// `rating / sqrt(t)`
    SingleShot,
}

impl AllowableFormula {
    pub fn allowable_fault_level(&self, rating_a: f64, clear_time_s: f64, trips: u32) -> f64 {
        let trips = f64::from(trips);
        match self {
            AllowableFormula::PerTrip => rating_a / (clear_time_s * trips).sqrt(),
            AllowableFormula::ScaledTripCount => rating_a / (clear_time_s.sqrt() * (trips + 1.0)),
            AllowableFormula::SingleShot => rating_a / clear_time_s.sqrt(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StudyConfig {
    #[serde(default)]
    pub region: Region,
    /// Quantisation step of the fault level sweep in amperes.
    #[serde(default = "default_fault_level_step")]
    pub fault_level_step_a: u32,
    /// Circuit breaker operate time added to every relay element.
    #[serde(default = "default_breaker_operate_time")]
    pub breaker_operate_time_s: f64,
    /// NPS elements set above this per-unit value are treated as unconfigured.
    #[serde(default = "default_nps_guard")]
    pub nps_sensitivity_guard_pu: f64,
    #[serde(default)]
    pub allowable_formula: AllowableFormula,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            fault_level_step_a: default_fault_level_step(),
            breaker_operate_time_s: default_breaker_operate_time(),
            nps_sensitivity_guard_pu: default_nps_guard(),
            allowable_formula: AllowableFormula::default(),
        }
    }
}

impl StudyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fault_level_step_a == 0 {
            return Err(anyhow!("study.fault_level_step_a must be greater than zero"));
        }
        if !self.breaker_operate_time_s.is_finite() || self.breaker_operate_time_s < 0.0 {
            return Err(anyhow!(
                "study.breaker_operate_time_s must be a non-negative number, got {}",
                self.breaker_operate_time_s
            ));
        }
        if !self.nps_sensitivity_guard_pu.is_finite() || self.nps_sensitivity_guard_pu <= 0.0 {
            return Err(anyhow!(
                "study.nps_sensitivity_guard_pu must be positive, got {}",
                self.nps_sensitivity_guard_pu
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
        }
    }
}

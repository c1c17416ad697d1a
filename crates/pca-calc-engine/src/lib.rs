//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Protection coordination calculation engine."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
pub mod api;
pub mod conductor_damage;
pub mod current_conversion;
pub mod curves;
pub mod elements;
pub mod errors;
pub mod io;
pub mod model;
pub mod reach_factors;
pub mod reclose;
pub mod reports;

use chrono::{DateTime, Utc};
use model::{Device, NetworkModel};
use pca_common::StudyConfig;
use pca_logging::{log_study_event, LogContext, StudyOutcome};
use tracing::info;

use crate::{
    conductor_damage::device_conductor_damage,
    reach_factors::device_reach_factors,
    reports::{DamageReport, DeviceFailure, ReachReport, ReportExporter},
};

pub use errors::{CalcEngineError, Result};

#[derive(Debug, Clone, serde::Serialize)]
pub struct CalcSummary {
    pub timestamp: DateTime<Utc>,
    pub model_version: Option<String>,
    pub reach_factors: ReachReport,
    pub conductor_damage: DamageReport,
}

impl CalcSummary {
    pub fn exporter(&self) -> ReportExporter<'_> {
        ReportExporter::new(self)
    }
}

fn record_failure(device: &Device, event: &str, err: CalcEngineError) -> DeviceFailure {
    let context = LogContext::new().with_device(&device.id);
    log_study_event(Some(&context), event, &err.to_string(), StudyOutcome::Aborted);
    DeviceFailure {
        device: device.id.clone(),
        error: err.to_string(),
    }
}

/// Reach factors for every device; a failing device never aborts the batch.
pub fn reach_factor_study(model: &NetworkModel, study: &StudyConfig) -> ReachReport {
    let mut report = ReachReport::default();
    for device in &model.devices {
        match device_reach_factors(model, device, study) {
            Ok(result) => report.devices.push(result),
            Err(err) => report
                .failures
                .push(record_failure(device, "study.reach", err)),
        }
    }
    report
}

/// Conductor damage verdicts for every device with protected lines.
pub fn conductor_damage_study(model: &NetworkModel, study: &StudyConfig) -> DamageReport {
    let mut report = DamageReport::default();
    for device in &model.devices {
        match device_conductor_damage(model, device, study) {
            Ok(result) => report.devices.push(result),
            Err(err) => report
                .failures
                .push(record_failure(device, "study.damage", err)),
        }
    }
    report
}

/// Validates the model and runs both studies without exporting.
pub fn analyze_network(model: &NetworkModel, study: &StudyConfig) -> Result<CalcSummary> {
    model.validate()?;

    info!("Running reach factor study...");
    let reach_factors = reach_factor_study(model, study);

    info!("Running conductor damage study...");
    let conductor_damage = conductor_damage_study(model, study);

    Ok(CalcSummary {
        timestamp: Utc::now(),
        model_version: model.version.clone(),
        reach_factors,
        conductor_damage,
    })
}

/// Runs both studies and writes reports under `output_dir`.
/// When `output_dir` is `None`, the `reports/` directory is used.
pub fn analyze_network_with_options(
    model: &NetworkModel,
    study: &StudyConfig,
    output_dir: Option<&std::path::Path>,
) -> Result<CalcSummary> {
    let summary = analyze_network(model, study)?;

    let default_dir = std::path::Path::new("reports");
    let output_dir = output_dir.unwrap_or(default_dir);
    summary.exporter().export_all(output_dir)?;

    Ok(summary)
}

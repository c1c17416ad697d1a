//! ---
//! pca_section: "05-command-line-interfaces"
//! pca_subsection: "binary"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Study subcommands of the protection coordination CLI."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use pca_calc_engine::{
    analyze_network_with_options, conductor_damage_study, io::load_network_model_from_file,
    model::NetworkModel, reach_factor_study,
    reports::{DamageReport, DeviceFailure, ReachReport},
};
use pca_common::AppConfig;
use serde::Serialize;
use tracing::info;

/// Options shared by the study commands.
#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Network model in JSON or YAML.
    #[arg(long, value_name = "FILE")]
    pub model: PathBuf,
    /// Directory receiving the JSON report.
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Network model in JSON or YAML.
    #[arg(long, value_name = "FILE")]
    pub model: PathBuf,
}

/// An explicit `--config` must exist; otherwise the usual locations are tried.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return AppConfig::from_path(path);
    }
    let candidates = [PathBuf::from("configs/pca.toml"), PathBuf::from("pca.toml")];
    AppConfig::load(&candidates)
}

fn load_model(path: &Path) -> Result<NetworkModel> {
    load_network_model_from_file(path)
        .with_context(|| format!("failed to load network model {}", path.display()))
}

fn write_report<T: Serialize>(dir: &Path, name: &str, report: &T) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}

pub fn reach(config: &AppConfig, args: &ModelArgs) -> Result<()> {
    let model = load_model(&args.model)?;
    let report = reach_factor_study(&model, &config.study);
    render_reach(&report);
    if let Some(dir) = &args.output {
        write_report(dir, "reach_factors.json", &report)?;
    }
    Ok(())
}

pub fn damage(config: &AppConfig, args: &ModelArgs) -> Result<()> {
    let model = load_model(&args.model)?;
    let report = conductor_damage_study(&model, &config.study);
    render_damage(&report);
    if let Some(dir) = &args.output {
        write_report(dir, "conductor_damage.json", &report)?;
    }
    Ok(())
}

pub fn analyze(config: &AppConfig, args: &ModelArgs) -> Result<()> {
    let model = load_model(&args.model)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.reports.output_dir.clone());
    let summary = analyze_network_with_options(&model, &config.study, Some(&output))?;
    render_reach(&summary.reach_factors);
    render_damage(&summary.conductor_damage);
    println!("\nReports exported to {}", output.display());
    Ok(())
}

pub fn check(args: &CheckArgs) -> Result<()> {
    let model = load_model(&args.model)?;
    println!(
        "Model OK: {} devices, {} terminations, {} lines (version {})",
        model.devices.len(),
        model.terminations.len(),
        model.lines.len(),
        model.version.as_deref().unwrap_or("unversioned")
    );
    Ok(())
}

fn render_failures(failures: &[DeviceFailure]) {
    for failure in failures {
        println!("ABORTED {:<12} {}", failure.device, failure.error);
    }
}

fn render_reach(report: &ReachReport) {
    println!(
        "{:<12} {:<14} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Device", "Location", "PH RF", "EF RF", "NPS EF", "NPS PH", "BU PH", "BU EF"
    );
    for device in &report.devices {
        for location in &device.locations {
            println!(
                "{:<12} {:<14} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
                device.device,
                location.location,
                location.primary.phase_rf.to_string(),
                location.primary.earth_rf.to_string(),
                location.primary.nps_earth_rf.to_string(),
                location.primary.nps_phase_rf.to_string(),
                location.backup.phase_rf.to_string(),
                location.backup.earth_rf.to_string(),
            );
        }
    }
    render_failures(&report.failures);
}

fn render_damage(report: &DamageReport) {
    println!(
        "{:<12} {:<14} {:>6} {:>8} {:>8}",
        "Device", "Line", "Trips", "Phase", "Earth"
    );
    for device in &report.devices {
        for line in &device.lines {
            println!(
                "{:<12} {:<14} {:>6} {:>8} {:>8}",
                device.device,
                line.line,
                device.total_trips,
                line.phase.verdict.to_string(),
                line.earth.verdict.to_string()
            );
        }
    }
    render_failures(&report.failures);
}

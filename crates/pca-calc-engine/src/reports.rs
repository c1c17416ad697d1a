//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Study result containers and JSON report export."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use std::{fs, path::Path};

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    conductor_damage::DeviceDamage, errors::Result, reach_factors::DeviceReachFactors, CalcSummary,
};

/// A device whose processing was aborted; the rest of the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceFailure {
    pub device: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReachReport {
    pub devices: Vec<DeviceReachFactors>,
    pub failures: Vec<DeviceFailure>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DamageReport {
    pub devices: Vec<DeviceDamage>,
    pub failures: Vec<DeviceFailure>,
}

#[derive(Debug)]
pub struct ReportExporter<'a> {
    summary: &'a CalcSummary,
}

impl<'a> ReportExporter<'a> {
    pub fn new(summary: &'a CalcSummary) -> Self {
        Self { summary }
    }

    pub fn export_all(&self, output_dir: &Path) -> Result<()> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        let timestamp = self.summary.timestamp.to_rfc3339();
        let version = self.summary.model_version.clone();

        let reach_report = ReportEnvelope::new(
            &timestamp,
            version.clone(),
            reach_factor_schema(),
            &self.summary.reach_factors,
        );
        let damage_report = ReportEnvelope::new(
            &timestamp,
            version,
            conductor_damage_schema(),
            &self.summary.conductor_damage,
        );

        write_json(output_dir.join("reach_factors.json"), &reach_report)?;
        write_json(output_dir.join("conductor_damage.json"), &damage_report)?;

        info!("Reports exported to {}", output_dir.display());
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a, T: Serialize> {
    timestamp: &'a str,
    model_version: Option<String>,
    schema: serde_json::Value,
    data: &'a T,
}

impl<'a, T: Serialize> ReportEnvelope<'a, T> {
    fn new(
        timestamp: &'a str,
        model_version: Option<String>,
        schema: serde_json::Value,
        data: &'a T,
    ) -> Self {
        Self {
            timestamp,
            model_version,
            schema,
            data,
        }
    }
}

fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value)?;
    fs::write(path, serialized)?;
    Ok(())
}

fn failures_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "device": {"type": "string"},
                "error": {"type": "string"}
            },
            "required": ["device", "error"]
        }
    })
}

fn reach_factor_schema() -> serde_json::Value {
    let metric = json!({"oneOf": [{"type": "number"}, {"const": "NA"}]});
    let reach = json!({
        "type": "object",
        "properties": {
            "phase_pickup": metric,
            "earth_pickup": metric,
            "nps_pickup": metric,
            "phase_rf": metric,
            "earth_rf": metric,
            "nps_earth_rf": metric,
            "nps_phase_rf": metric
        },
        "required": [
            "phase_pickup",
            "earth_pickup",
            "nps_pickup",
            "phase_rf",
            "earth_rf",
            "nps_earth_rf",
            "nps_phase_rf"
        ]
    });
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "ReachFactorReport",
        "type": "object",
        "properties": {
            "devices": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "device": {"type": "string"},
                        "effective_earth_pickup": {"type": "number"},
                        "locations": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "location": {"type": "string"},
                                    "location_kind": {"enum": ["termination", "line"]},
                                    "primary": reach,
                                    "backup": reach
                                },
                                "required": ["location", "location_kind", "primary", "backup"]
                            }
                        }
                    },
                    "required": ["device", "locations"]
                }
            },
            "failures": failures_schema()
        },
        "required": ["devices", "failures"]
    })
}

fn conductor_damage_schema() -> serde_json::Value {
    let damage = json!({
        "type": "object",
        "properties": {
            "energy_a2s": {"type": "number"},
            "fault_level_a": {"type": ["number", "null"]},
            "clear_time_s": {"type": ["number", "null"]},
            "allowable_energy_a2s": {"type": ["number", "null"]},
            "allowable_fault_level_a": {"type": ["number", "null"]},
            "verdict": {"enum": ["PASS", "FAIL", "NO DATA", "SWER"]}
        },
        "required": ["energy_a2s", "verdict"]
    });
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "ConductorDamageReport",
        "type": "object",
        "properties": {
            "devices": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "device": {"type": "string"},
                        "total_trips": {"type": "integer", "minimum": 1},
                        "trips": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "trip": {"type": "integer"},
                                    "in_service_elements": {
                                        "type": "array",
                                        "items": {"type": "string"}
                                    }
                                },
                                "required": ["trip", "in_service_elements"]
                            }
                        },
                        "lines": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "line": {"type": "string"},
                                    "thermal_rating_a": {"type": ["number", "null"]},
                                    "phase": damage,
                                    "earth": damage
                                },
                                "required": ["line", "phase", "earth"]
                            }
                        }
                    },
                    "required": ["device", "total_trips", "lines"]
                }
            },
            "failures": failures_schema()
        },
        "required": ["devices", "failures"]
    })
}

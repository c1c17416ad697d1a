//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Network arena of protection devices, terminations and lines."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use crate::curves::Characteristic;
use crate::errors::{CalcEngineError, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkModel {
    #[serde(default)]
    pub version: Option<String>,
    pub devices: Vec<Device>,
    #[serde(default)]
    pub terminations: Vec<Termination>,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl NetworkModel {
    pub fn device(&self, id: &str) -> Result<&Device> {
        self.devices
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| CalcEngineError::UnknownDevice(id.to_string()))
    }

    pub fn line(&self, id: &str) -> Result<&Line> {
        self.lines
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| CalcEngineError::UnknownLine(id.to_string()))
    }

    pub fn termination(&self, id: &str) -> Result<&Termination> {
        self.terminations
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CalcEngineError::UnknownTermination(id.to_string()))
    }

    /// Upstream backup devices of `device`, in the order they are listed.
    pub fn upstream_devices(&self, device: &Device) -> Result<Vec<&Device>> {
        device.upstream.iter().map(|id| self.device(id)).collect()
    }

    /// Checks identifier uniqueness, dangling references and that the
    /// upstream backup links form a directed acyclic graph.
    pub fn validate(&self) -> Result<()> {
        ensure_unique("device", self.devices.iter().map(|d| d.id.as_str()))?;
        ensure_unique(
            "termination",
            self.terminations.iter().map(|t| t.id.as_str()),
        )?;
        ensure_unique("line", self.lines.iter().map(|l| l.id.as_str()))?;

        for device in &self.devices {
            for id in &device.protected_terminations {
                self.termination(id)?;
            }
            for id in &device.protected_lines {
                self.line(id)?;
            }
            for id in device.upstream.iter().chain(device.downstream.iter()) {
                self.device(id)?;
            }
        }

        let mut graph = DiGraph::<&str, ()>::new();
        let nodes: HashMap<&str, _> = self
            .devices
            .iter()
            .map(|d| (d.id.as_str(), graph.add_node(d.id.as_str())))
            .collect();
        for device in &self.devices {
            let from = nodes[device.id.as_str()];
            for upstream in &device.upstream {
                graph.add_edge(from, nodes[upstream.as_str()], ());
            }
        }
        if is_cyclic_directed(&graph) {
            return Err(CalcEngineError::InvalidModel(
                "upstream backup links contain a cycle".into(),
            ));
        }
        Ok(())
    }
}

fn ensure_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CalcEngineError::InvalidModel(format!(
                "duplicate {kind} id {id}"
            )));
        }
    }
    Ok(())
}

/// Electrical data shared by every location a device protects.
pub trait NetworkSegment {
    fn id(&self) -> &str;
    fn voltage_kv(&self) -> f64;
    fn phases(&self) -> u8;
    fn construction(&self) -> Construction;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FaultType {
    #[serde(rename = "3-Phase")]
    ThreePhase,
    #[serde(rename = "2-Phase")]
    TwoPhase,
    #[serde(rename = "Phase-Ground")]
    PhaseGround,
}

impl FaultType {
    pub fn label(&self) -> &'static str {
        match self {
            FaultType::ThreePhase => "3-Phase",
            FaultType::TwoPhase => "2-Phase",
            FaultType::PhaseGround => "Phase-Ground",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Construction {
    #[default]
    #[serde(alias = "OH")]
    Overhead,
    #[serde(alias = "UG")]
    Underground,
    #[serde(alias = "SWER")]
    Swer,
}

/// Fault current magnitudes in amperes for the three fault categories.
///
/// Values are fixed once the short-circuit results for a location are known.
/// A `None` entry means the external study produced no result.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FaultCurrents {
    #[serde(default)]
    three_phase: Option<f64>,
    #[serde(default)]
    two_phase: Option<f64>,
    #[serde(default)]
    phase_ground: Option<f64>,
}

impl FaultCurrents {
    pub fn new(three_phase: Option<f64>, two_phase: Option<f64>, phase_ground: Option<f64>) -> Self {
        Self {
            three_phase,
            two_phase,
            phase_ground,
        }
    }

    pub fn three_phase(&self) -> Option<f64> {
        self.three_phase
    }

    pub fn two_phase(&self) -> Option<f64> {
        self.two_phase
    }

    pub fn phase_ground(&self) -> Option<f64> {
        self.phase_ground
    }

    pub fn get(&self, fault: FaultType) -> Option<f64> {
        match fault {
            FaultType::ThreePhase => self.three_phase,
            FaultType::TwoPhase => self.two_phase,
            FaultType::PhaseGround => self.phase_ground,
        }
    }

    /// Largest of the two-phase and three-phase values.
    pub fn max_phase(&self) -> Option<f64> {
        match (self.two_phase, self.three_phase) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Termination {
    pub id: String,
    #[serde(default)]
    pub construction: Construction,
    pub voltage_kv: f64,
    #[serde(default = "default_phases")]
    pub phases: u8,
    #[serde(default)]
    pub min_fault: FaultCurrents,
    #[serde(default)]
    pub max_fault: FaultCurrents,
    /// Minimum phase-ground fault through a 10 ohm fault resistance.
    #[serde(default)]
    pub min_pg10_a: Option<f64>,
    /// Minimum phase-ground fault through a 50 ohm fault resistance.
    #[serde(default)]
    pub min_pg50_a: Option<f64>,
}

impl NetworkSegment for Termination {
    fn id(&self) -> &str {
        &self.id
    }
    fn voltage_kv(&self) -> f64 {
        self.voltage_kv
    }
    fn phases(&self) -> u8 {
        self.phases
    }
    fn construction(&self) -> Construction {
        self.construction
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    #[serde(default)]
    pub construction: Construction,
    pub voltage_kv: f64,
    #[serde(default = "default_phases")]
    pub phases: u8,
    /// One second thermal rating; absent for cable systems without data.
    #[serde(default)]
    pub thermal_rating_a: Option<f64>,
    #[serde(default)]
    pub min_fault: FaultCurrents,
    #[serde(default)]
    pub max_fault: FaultCurrents,
}

impl NetworkSegment for Line {
    fn id(&self) -> &str {
        &self.id
    }
    fn voltage_kv(&self) -> f64 {
        self.voltage_kv
    }
    fn phases(&self) -> u8 {
        self.phases
    }
    fn construction(&self) -> Construction {
        self.construction
    }
}

fn default_phases() -> u8 {
    3
}

fn default_true() -> bool {
    true
}

fn default_time_dial() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default = "default_phases")]
    pub phases: u8,
    pub voltage_kv: f64,
    pub elements: Vec<ProtectionElement>,
    #[serde(default)]
    pub reclose: Vec<ReclosePlan>,
    #[serde(default)]
    pub protected_terminations: Vec<String>,
    #[serde(default)]
    pub protected_lines: Vec<String>,
    #[serde(default)]
    pub upstream: Vec<String>,
    #[serde(default)]
    pub downstream: Vec<String>,
}

impl Device {
    pub fn fuse_element(&self) -> Option<&ProtectionElement> {
        self.elements.iter().find(|e| e.kind == ElementKind::Fuse)
    }

    pub fn is_fuse(&self) -> bool {
        self.fuse_element().is_some()
    }

    pub fn in_service_element_names(&self) -> Vec<String> {
        self.elements
            .iter()
            .filter(|e| e.in_service)
            .map(|e| e.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Idmt,
    Instantaneous,
    Fuse,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ElementFunction {
    Phase,
    Earth,
    NegativeSequence,
}

/// Quantity an element measures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MeasurementType {
    #[default]
    #[serde(rename = "3ph")]
    ThreePhase,
    #[serde(rename = "d3m")]
    DeltaThreePhase,
    #[serde(rename = "I0")]
    ZeroSequence,
    #[serde(rename = "1ph")]
    SinglePhase,
    #[serde(rename = "d1m")]
    DeltaSinglePhase,
    #[serde(rename = "3I0")]
    ResidualEarth,
    #[serde(rename = "S3I0")]
    SensitiveEarth,
    #[serde(rename = "I2")]
    NegativeSequence,
    #[serde(rename = "3I2")]
    NegativeSequenceTriple,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionElement {
    pub name: String,
    pub kind: ElementKind,
    pub function: ElementFunction,
    #[serde(default)]
    pub measurement: MeasurementType,
    /// Primary pickup in amperes; rated current for fuses.
    pub pickup_a: f64,
    #[serde(default = "default_time_dial")]
    pub time_dial: f64,
    /// Fixed operate time of instantaneous elements.
    #[serde(default)]
    pub operate_time_s: Option<f64>,
    /// Pickup setting in per-unit of the CT rating.
    #[serde(default)]
    pub setting_pu: Option<f64>,
    #[serde(default)]
    pub characteristic: Option<Characteristic>,
    #[serde(default = "default_true")]
    pub in_service: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclosePlan {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub in_service: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Number of trips before lockout.
    pub lockout_trips: u32,
    #[serde(default)]
    pub blocks: Vec<BlockRow>,
}

/// Block table row: elements whose name contains `block` follow `stages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRow {
    pub block: String,
    pub stages: Vec<f64>,
}

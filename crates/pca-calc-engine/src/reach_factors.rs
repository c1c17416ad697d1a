//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Pickup aggregation and primary/backup reach factors."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
//! Reach factor calculation.
//!
//! A reach factor is the minimum fault current at a protected location divided
//! by the pickup of the function that has to detect it. Values below 1.0 mean
//! the function cannot see the fault.
use crate::current_conversion::swer_transform;
use crate::elements::ElementGroups;
use crate::errors::Result;
use crate::model::{
    Construction, Device, FaultType, Line, NetworkModel, NetworkSegment, ProtectionElement,
    Termination,
};
use pca_common::{Region, StudyConfig};
use pca_logging::{pca_debug, pca_warn, LogContext};
use serde::{Serialize, Serializer};
use std::fmt;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// A numeric result or the `NA` marker for an unconfigured function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    NotApplicable,
}

impl Metric {
    /// Pickups of zero mean the function is not configured.
    pub fn pickup(pickup_a: f64) -> Self {
        if pickup_a > 0.0 {
            Metric::Value(pickup_a)
        } else {
            Metric::NotApplicable
        }
    }

    /// `numerator / pickup` rounded to two decimals.
    pub fn ratio(numerator: Option<f64>, pickup_a: f64) -> Self {
        match numerator {
            Some(current) if pickup_a > 0.0 => Metric::Value(round_to(current / pickup_a, 2)),
            _ => Metric::NotApplicable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NotApplicable => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Metric::NotApplicable)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v}"),
            Metric::NotApplicable => f.write_str("NA"),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::NotApplicable => serializer.serialize_str("NA"),
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Pickups per protection function in whole amperes; zero when unconfigured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Pickups {
    pub phase: f64,
    pub earth: f64,
    pub nps: f64,
}

impl Pickups {
    /// Phase elements also respond to earth faults, so the more sensitive of
    /// the two configured pickups applies.
    pub fn effective_earth(&self) -> f64 {
        match (self.phase > 0.0, self.earth > 0.0) {
            (true, true) => self.phase.min(self.earth),
            (true, false) => self.phase,
            (false, true) => self.earth,
            (false, false) => 0.0,
        }
    }

    /// Most sensitive non-zero pickup per function across backup devices.
    pub fn most_sensitive(all: &[Pickups]) -> Pickups {
        let min_nonzero = |pick: fn(&Pickups) -> f64| {
            all.iter()
                .map(pick)
                .filter(|p| *p > 0.0)
                .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.min(p))))
                .unwrap_or(0.0)
        };
        Pickups {
            phase: min_nonzero(|p| p.phase),
            earth: min_nonzero(|p| p.earth),
            nps: min_nonzero(|p| p.nps),
        }
    }
}

fn highest<'a>(elements: impl IntoIterator<Item = &'a ProtectionElement>) -> Option<&'a ProtectionElement> {
    elements
        .into_iter()
        .fold(None, |best: Option<&ProtectionElement>, e| match best {
            Some(b) if b.pickup_a >= e.pickup_a => Some(b),
            _ => Some(e),
        })
}

fn preferred<'a>(
    primary: &[&'a ProtectionElement],
    fallback: &[&'a ProtectionElement],
) -> Option<&'a ProtectionElement> {
    if primary.is_empty() {
        highest(fallback.iter().copied())
    } else {
        highest(primary.iter().copied())
    }
}

/// Pickups of the least sensitive in-service element of each function.
pub fn determine_pickups(device: &Device, nps_guard_pu: f64) -> Pickups {
    if let Some(fuse) = device.fuse_element() {
        let doubled = 2.0 * fuse.pickup_a.trunc();
        return Pickups {
            phase: doubled,
            earth: doubled,
            nps: 0.0,
        };
    }

    let groups = ElementGroups::of(device);
    let pickup = |e: Option<&ProtectionElement>| e.map_or(0.0, |e| e.pickup_a.round_ties_even());
    let phase = pickup(preferred(&groups.phase_idmt, &groups.phase_instantaneous));
    let earth = pickup(preferred(&groups.earth_idmt, &groups.earth_instantaneous));

    let nps_element = highest(
        groups
            .nps_idmt
            .iter()
            .chain(&groups.nps_instantaneous)
            .copied(),
    );
    let nps = match nps_element {
        Some(e) if e.setting_pu.is_some_and(|pu| pu > nps_guard_pu) => {
            pca_warn!(
                context = LogContext::new().with_device(&device.id),
                "negative sequence element {} set above {} pu, treated as unconfigured",
                e.name,
                nps_guard_pu
            );
            0.0
        }
        other => pickup(other),
    };

    Pickups { phase, earth, nps }
}

/// A protected location: a terminal bus or a line section.
#[derive(Debug, Clone, Copy)]
pub enum Location<'a> {
    Termination(&'a Termination),
    Line(&'a Line),
}

impl<'a> Location<'a> {
    pub fn segment(&self) -> &'a dyn NetworkSegment {
        match *self {
            Location::Termination(t) => t,
            Location::Line(l) => l,
        }
    }

    pub fn kind(&self) -> LocationKind {
        match self {
            Location::Termination(_) => LocationKind::Termination,
            Location::Line(_) => LocationKind::Line,
        }
    }

    pub fn min_two_phase(&self) -> Option<f64> {
        match self {
            Location::Termination(t) => t.min_fault.two_phase(),
            Location::Line(l) => l.min_fault.two_phase(),
        }
    }

    /// Minimum earth fault used for reach, per region convention.
    pub fn min_earth_fault(&self, region: Region) -> Option<f64> {
        match (self, region) {
            (Location::Line(l), _) => l.min_fault.phase_ground(),
            (Location::Termination(t), Region::Seq) => t.min_fault.phase_ground(),
            (Location::Termination(t), Region::Regional) => match t.construction {
                Construction::Overhead => t.min_pg50_a,
                _ => t.min_pg10_a,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Termination,
    Line,
}

/// Reach of one set of pickups at one location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FunctionReach {
    pub phase_pickup: Metric,
    pub earth_pickup: Metric,
    pub nps_pickup: Metric,
    pub phase_rf: Metric,
    pub earth_rf: Metric,
    pub nps_earth_rf: Metric,
    pub nps_phase_rf: Metric,
}

impl FunctionReach {
    pub fn not_applicable() -> Self {
        Self {
            phase_pickup: Metric::NotApplicable,
            earth_pickup: Metric::NotApplicable,
            nps_pickup: Metric::NotApplicable,
            phase_rf: Metric::NotApplicable,
            earth_rf: Metric::NotApplicable,
            nps_earth_rf: Metric::NotApplicable,
            nps_phase_rf: Metric::NotApplicable,
        }
    }

    /// `transform_device` supplies the voltage and phase count seen across
    /// a SWER isolating transformer.
    pub fn evaluate(
        pickups: Pickups,
        transform_device: &Device,
        location: Location<'_>,
        region: Region,
    ) -> Self {
        let effective_earth = pickups.effective_earth();
        let min_2ph = location.min_two_phase();

        let earth_basis = location.min_earth_fault(region).map(|fl| {
            swer_transform(transform_device, location.segment(), fl, FaultType::PhaseGround)
        });

        let earth_rf = match earth_basis {
            _ if effective_earth <= 0.0 => Metric::NotApplicable,
            Some(t) if t.transposed => Metric::ratio(Some(t.current_a), pickups.phase),
            Some(t) => Metric::ratio(Some(t.current_a), effective_earth),
            None => Metric::NotApplicable,
        };

        let nps_earth_rf = match earth_basis {
            Some(t) if t.transposed => Metric::ratio(Some(t.current_a / SQRT_3), pickups.nps),
            Some(t) => Metric::ratio(Some(t.current_a / 3.0), pickups.nps),
            None => Metric::NotApplicable,
        };

        Self {
            phase_pickup: Metric::pickup(pickups.phase),
            earth_pickup: Metric::pickup(pickups.earth),
            nps_pickup: Metric::pickup(pickups.nps),
            phase_rf: Metric::ratio(min_2ph, pickups.phase),
            earth_rf,
            nps_earth_rf,
            nps_phase_rf: Metric::ratio(min_2ph.map(|fl| fl / SQRT_3), pickups.nps),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachFactorResult {
    pub location: String,
    pub location_kind: LocationKind,
    pub primary: FunctionReach,
    pub backup: FunctionReach,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceReachFactors {
    pub device: String,
    pub pickups: Pickups,
    pub effective_earth_pickup: f64,
    pub locations: Vec<ReachFactorResult>,
}

/// Primary and backup reach factors at every location `device` protects.
pub fn device_reach_factors(
    model: &NetworkModel,
    device: &Device,
    study: &StudyConfig,
) -> Result<DeviceReachFactors> {
    let pickups = determine_pickups(device, study.nps_sensitivity_guard_pu);
    let upstream = model.upstream_devices(device)?;
    let backup_pickups = (!upstream.is_empty()).then(|| {
        let all: Vec<Pickups> = upstream
            .iter()
            .map(|d| determine_pickups(d, study.nps_sensitivity_guard_pu))
            .collect();
        Pickups::most_sensitive(&all)
    });

    let mut locations = Vec::new();
    for id in &device.protected_terminations {
        locations.push(Location::Termination(model.termination(id)?));
    }
    for id in &device.protected_lines {
        locations.push(Location::Line(model.line(id)?));
    }

    let results = locations
        .into_iter()
        .map(|location| {
            let primary = FunctionReach::evaluate(pickups, device, location, study.region);
            let backup = match (backup_pickups, upstream.first()) {
                (Some(bu), Some(first)) => FunctionReach::evaluate(bu, first, location, study.region),
                _ => FunctionReach::not_applicable(),
            };
            ReachFactorResult {
                location: location.segment().id().to_string(),
                location_kind: location.kind(),
                primary,
                backup,
            }
        })
        .collect::<Vec<_>>();

    pca_debug!(
        context = LogContext::new().with_device(&device.id),
        "reach factors evaluated at {} locations",
        results.len()
    );

    Ok(DeviceReachFactors {
        device: device.id.clone(),
        pickups,
        effective_earth_pickup: pickups.effective_earth(),
        locations: results,
    })
}

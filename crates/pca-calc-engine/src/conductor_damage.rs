//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Worst-case let-through energy and conductor damage verdicts."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
//! Conductor damage assessment.
//!
//! For every protected line the fault level is swept between its minimum and
//! maximum in fixed steps. At each step the fastest active element sets the
//! clearing time; the step with the largest `I²t` is the worst case of a trip
//! stage, and the stages of the reclose sequence add up to the total energy.
use crate::curves::{fuse_operate_time, instantaneous_operate_time, relay_operate_time, OperateTime};
use crate::current_conversion::{measured_current, swer_applies, swer_reverse, swer_transform};
use crate::elements::active_elements;
use crate::errors::Result;
use crate::model::{Construction, Device, ElementKind, FaultType, Line, NetworkModel, ProtectionElement};
use crate::reach_factors::round_to;
use crate::reclose::{TripScope, TripSequence};
use pca_common::StudyConfig;
use pca_logging::{pca_debug, pca_info, pca_warn, LogContext};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DamageVerdict {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "NO DATA")]
    NoData,
    /// Phase faults on single wire earth return lines are not assessed.
    #[serde(rename = "SWER")]
    Swer,
}

impl DamageVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageVerdict::Pass => "PASS",
            DamageVerdict::Fail => "FAIL",
            DamageVerdict::NoData => "NO DATA",
            DamageVerdict::Swer => "SWER",
        }
    }
}

impl fmt::Display for DamageVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCategory {
    Phase,
    Earth,
}

/// Fault level range swept for one line and fault category, in device amperes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepDomain {
    pub min_a: f64,
    pub max_a: f64,
    pub fault: FaultType,
    pub transposed: bool,
}

impl SweepDomain {
    pub fn for_line(device: &Device, line: &Line, category: DamageCategory) -> Option<Self> {
        match category {
            DamageCategory::Phase => Some(Self {
                min_a: line.min_fault.two_phase()?.round_ties_even(),
                max_a: line.max_fault.max_phase()?.round_ties_even(),
                fault: FaultType::TwoPhase,
                transposed: false,
            }),
            DamageCategory::Earth => {
                let min = line.min_fault.phase_ground()?;
                let max = line.max_fault.phase_ground()?;
                if swer_applies(device, line) {
                    let min = swer_transform(device, line, min, FaultType::PhaseGround);
                    let max = swer_transform(device, line, max, FaultType::PhaseGround);
                    Some(Self {
                        min_a: min.current_a.round_ties_even(),
                        max_a: max.current_a.round_ties_even(),
                        fault: min.fault,
                        transposed: true,
                    })
                } else {
                    Some(Self {
                        min_a: min.round_ties_even(),
                        max_a: max.round_ties_even(),
                        fault: FaultType::PhaseGround,
                        transposed: false,
                    })
                }
            }
        }
    }

    /// `min, min + step, ...` up to and including `max`.
    pub fn levels(&self, step_a: u32) -> Vec<f64> {
        let step = u64::from(step_a.max(1));
        let (min, max) = (self.min_a as i64, self.max_a as i64);
        if min > max {
            return Vec::new();
        }
        (min..=max).step_by(step as usize).map(|fl| fl as f64).collect()
    }
}

/// Clearing time of one element at one swept fault level.
pub fn element_clearing_time(
    element: &ProtectionElement,
    fault_level_a: f64,
    fault: FaultType,
    breaker_operate_time_s: f64,
) -> OperateTime {
    let (operate, switch_time) = match element.kind {
        ElementKind::Fuse => (
            element
                .characteristic
                .as_ref()
                .map_or(OperateTime::NoOperate, |c| fuse_operate_time(c, fault_level_a)),
            0.0,
        ),
        ElementKind::Idmt => {
            let current = measured_current(element.measurement, fault_level_a, fault);
            (
                element.characteristic.as_ref().map_or(OperateTime::NoOperate, |c| {
                    relay_operate_time(c, current, element.pickup_a, element.time_dial)
                }),
                breaker_operate_time_s,
            )
        }
        ElementKind::Instantaneous => {
            let current = measured_current(element.measurement, fault_level_a, fault);
            (
                element.operate_time_s.map_or(OperateTime::NoOperate, |t| {
                    instantaneous_operate_time(current, element.pickup_a, t)
                }),
                breaker_operate_time_s,
            )
        }
    };
    match operate.clearing_seconds() {
        Some(t) => OperateTime::Trip(t + switch_time),
        None if matches!(operate, OperateTime::Unsupported(_)) => operate,
        None => OperateTime::NoOperate,
    }
}

/// Minimum clearing time across the active elements at every swept level.
pub fn fault_clear_times(
    device: &Device,
    domain: &SweepDomain,
    study: &StudyConfig,
) -> Vec<(f64, Option<f64>)> {
    let elements = active_elements(device, domain.fault);
    let mut unsupported: HashSet<String> = HashSet::new();
    domain
        .levels(study.fault_level_step_a)
        .into_iter()
        .map(|fl| {
            let mut fastest: Option<f64> = None;
            for element in &elements {
                match element_clearing_time(element, fl, domain.fault, study.breaker_operate_time_s) {
                    OperateTime::Trip(t) => {
                        if fastest.map_or(true, |best| t < best) {
                            fastest = Some(round_to(t, 3));
                        }
                    }
                    OperateTime::Unsupported(family) => {
                        if unsupported.insert(element.name.clone()) {
                            pca_warn!(
                                context = LogContext::new().with_device(&device.id),
                                "element {} uses unsupported curve family {}",
                                element.name,
                                family
                            );
                        }
                    }
                    OperateTime::NoOperate => {}
                }
            }
            (fl, fastest)
        })
        .collect()
}

/// Worst case of one trip stage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorstCase {
    pub energy_a2s: f64,
    pub fault_level_a: Option<f64>,
    pub clear_time_s: Option<f64>,
}

/// Largest `fl² × t`; the first of equal maxima is kept.
pub fn worst_case_energy(clear_times: &[(f64, Option<f64>)]) -> WorstCase {
    let mut worst = WorstCase::default();
    for &(fl, clear_time) in clear_times {
        let Some(t) = clear_time else { continue };
        let energy = fl * fl * t;
        if energy > worst.energy_a2s {
            worst = WorstCase {
                energy_a2s: energy,
                fault_level_a: Some(fl),
                clear_time_s: Some(t),
            };
        }
    }
    worst
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultDamage {
    pub energy_a2s: f64,
    pub fault_level_a: Option<f64>,
    pub clear_time_s: Option<f64>,
    pub allowable_energy_a2s: Option<f64>,
    pub allowable_fault_level_a: Option<f64>,
    pub verdict: DamageVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineDamage {
    pub line: String,
    pub thermal_rating_a: Option<f64>,
    pub phase: FaultDamage,
    pub earth: FaultDamage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripDiagnostics {
    pub trip: u32,
    pub in_service_elements: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceDamage {
    pub device: String,
    pub total_trips: u32,
    pub trips: Vec<TripDiagnostics>,
    pub lines: Vec<LineDamage>,
}

struct SequenceEnergy {
    energy_a2s: f64,
    fault_level_a: Option<f64>,
    clear_time_s: Option<f64>,
}

fn sequence_energy(
    device: &mut Device,
    line: &Line,
    category: DamageCategory,
    study: &StudyConfig,
) -> Result<SequenceEnergy> {
    let mut result = SequenceEnergy {
        energy_a2s: 0.0,
        fault_level_a: None,
        clear_time_s: None,
    };
    let Some(domain) = SweepDomain::for_line(device, line, category) else {
        pca_warn!(
            context = LogContext::new().with_device(&device.id).with_location(&line.id),
            "{:?} fault levels unavailable, conductor damage not assessed",
            category
        );
        return Ok(result);
    };

    let mut sequence = TripSequence::for_device(device)?;
    sequence.reset();
    let mut trip = sequence.current_trip();
    while trip <= sequence.total_trips() {
        let worst = {
            let scope = TripScope::enter(device, trip)?;
            worst_case_energy(&fault_clear_times(&scope, &domain, study))
        };
        let context = LogContext::new()
            .with_device(sequence.device_id())
            .with_location(&line.id)
            .with_trip(trip)
            .with_fault_type(domain.fault.label());
        result.energy_a2s += worst.energy_a2s;
        match (worst.fault_level_a, worst.clear_time_s) {
            (Some(fl), Some(t)) => {
                let fl = if domain.transposed {
                    swer_reverse(device, line, fl)
                } else {
                    fl
                };
                pca_debug!(
                    context = context,
                    "worst case {fl} A cleared in {t} s, energy {} A2s",
                    worst.energy_a2s
                );
                result.fault_level_a = Some(fl);
                result.clear_time_s = Some(t);
            }
            _ => pca_warn!(context = context, "no fault clearing time for this trip"),
        }
        trip = sequence.advance();
    }
    Ok(result)
}

/// Thermal limits of a conductor over one reclose sequence.
struct Limits {
    allowable_energy_a2s: Option<f64>,
    allowable_fault_level_a: Option<f64>,
    verdict: DamageVerdict,
}

impl Limits {
    fn unassessed(verdict: DamageVerdict) -> Self {
        Self {
            allowable_energy_a2s: None,
            allowable_fault_level_a: None,
            verdict,
        }
    }
}

/// The summed sequence energy is held against the one second withstand
/// `rating² × 1 s`. The allowable fault level is reported alongside it.
fn verdict(
    line: &Line,
    category: DamageCategory,
    energy: &SequenceEnergy,
    trips: u32,
    study: &StudyConfig,
) -> Limits {
    if category == DamageCategory::Phase && line.construction == Construction::Swer {
        return Limits::unassessed(DamageVerdict::Swer);
    }
    let (Some(rating), Some(t), Some(_)) = (line.thermal_rating_a, energy.clear_time_s, energy.fault_level_a)
    else {
        return Limits::unassessed(DamageVerdict::NoData);
    };
    if !rating.is_finite() || rating <= 0.0 {
        return Limits::unassessed(DamageVerdict::NoData);
    }
    let allowable_energy = rating * rating;
    let allowable_fault_level = study
        .allowable_formula
        .allowable_fault_level(rating, t, trips)
        .round_ties_even();
    let verdict = if energy.energy_a2s > allowable_energy {
        DamageVerdict::Fail
    } else {
        DamageVerdict::Pass
    };
    Limits {
        allowable_energy_a2s: Some(allowable_energy),
        allowable_fault_level_a: (allowable_fault_level.is_finite() && allowable_fault_level > 0.0)
            .then_some(allowable_fault_level),
        verdict,
    }
}

fn assess(
    device: &mut Device,
    line: &Line,
    category: DamageCategory,
    trips: u32,
    study: &StudyConfig,
) -> Result<FaultDamage> {
    let energy = sequence_energy(device, line, category, study)?;
    let limits = verdict(line, category, &energy, trips, study);
    Ok(FaultDamage {
        energy_a2s: energy.energy_a2s,
        fault_level_a: energy.fault_level_a,
        clear_time_s: energy.clear_time_s,
        allowable_energy_a2s: limits.allowable_energy_a2s,
        allowable_fault_level_a: limits.allowable_fault_level_a,
        verdict: limits.verdict,
    })
}

/// Conductor damage verdicts for every line `device` protects.
///
/// Block tables are applied to a working copy of the device, so the model
/// itself is left untouched.
pub fn device_conductor_damage(
    model: &NetworkModel,
    device: &Device,
    study: &StudyConfig,
) -> Result<DeviceDamage> {
    let mut working = device.clone();
    let total_trips = TripSequence::for_device(&working)?.total_trips();

    let mut trips = Vec::new();
    for trip in 1..=total_trips {
        let scope = TripScope::enter(&mut working, trip)?;
        trips.push(TripDiagnostics {
            trip,
            in_service_elements: scope.in_service_element_names(),
        });
    }

    let lines = device
        .protected_lines
        .iter()
        .map(|id| model.line(id))
        .collect::<Result<Vec<_>>>()?;

    pca_info!(
        context = LogContext::new().with_device(&device.id),
        "performing conductor damage assessment on {} lines over {} trips",
        lines.len(),
        total_trips
    );

    let mut results = Vec::with_capacity(lines.len());
    for line in lines {
        let phase = assess(&mut working, line, DamageCategory::Phase, total_trips, study)?;
        let earth = assess(&mut working, line, DamageCategory::Earth, total_trips, study)?;
        results.push(LineDamage {
            line: line.id.clone(),
            thermal_rating_a: line.thermal_rating_a,
            phase,
            earth,
        });
    }

    Ok(DeviceDamage {
        device: device.id.clone(),
        total_trips,
        trips,
        lines: results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::Characteristic;
    use crate::model::fixtures::{idmt, instantaneous, line, relay};
    use crate::model::{BlockRow, ElementFunction, FaultCurrents, ReclosePlan};

    fn definite(name: &str, function: ElementFunction, pickup_a: f64, delay_s: f64) -> ProtectionElement {
        // Definite-time stages are excluded from the IDMT groups, so model
        // them as instantaneous elements with a fixed operate time.
        instantaneous(name, function, pickup_a, delay_s)
    }

    fn model_with(device: Device, line: Line) -> NetworkModel {
        NetworkModel {
            version: None,
            devices: vec![device],
            terminations: Vec::new(),
            lines: vec![line],
        }
    }

    fn protected_line() -> Line {
        line(
            "LN-1",
            FaultCurrents::new(Some(900.0), Some(800.0), Some(400.0)),
            FaultCurrents::new(Some(1000.0), Some(950.0), Some(600.0)),
        )
    }

    #[test]
    fn worst_case_prefers_larger_energy_and_keeps_first_tie() {
        let worst = worst_case_energy(&[(200.0, Some(0.5)), (350.0, Some(0.2))]);
        assert_eq!(worst.fault_level_a, Some(350.0));
        assert_eq!(worst.clear_time_s, Some(0.2));
        assert!((worst.energy_a2s - 24_500.0).abs() < 1e-6);

        let tie = worst_case_energy(&[(100.0, Some(1.0)), (50.0, Some(4.0)), (10.0, None)]);
        assert_eq!(tie.fault_level_a, Some(100.0));

        assert_eq!(worst_case_energy(&[(10.0, None)]), WorstCase::default());
    }

    #[test]
    fn sweep_levels_include_both_bounds_on_step() {
        let domain = SweepDomain {
            min_a: 100.0,
            max_a: 130.0,
            fault: FaultType::TwoPhase,
            transposed: false,
        };
        assert_eq!(domain.levels(10), vec![100.0, 110.0, 120.0, 130.0]);
        assert_eq!(domain.levels(25), vec![100.0, 125.0]);
    }

    #[test]
    fn phase_domain_spans_two_and_three_phase_maxima() {
        let device = relay("CB-1", Vec::new());
        let domain = SweepDomain::for_line(&device, &protected_line(), DamageCategory::Phase)
            .expect("domain");
        assert_eq!((domain.min_a, domain.max_a), (800.0, 1000.0));
        assert_eq!(domain.fault, FaultType::TwoPhase);
    }

    #[test]
    fn earth_domain_is_transposed_on_swer_segment() {
        let device = relay("CB-1", Vec::new());
        let mut swer = protected_line();
        swer.voltage_kv = 12.7;
        swer.phases = 1;
        let domain = SweepDomain::for_line(&device, &swer, DamageCategory::Earth).expect("domain");
        assert!(domain.transposed);
        assert_eq!(domain.fault, FaultType::TwoPhase);
        assert_eq!(domain.min_a, 133.0);
        assert_eq!(domain.max_a, 200.0);
    }

    #[test]
    fn fastest_element_governs_clearing_time() {
        let device = relay(
            "CB-1",
            vec![
                definite("I>", ElementFunction::Phase, 100.0, 1.0),
                definite("I>>", ElementFunction::Phase, 500.0, 0.1),
            ],
        );
        let domain = SweepDomain {
            min_a: 400.0,
            max_a: 600.0,
            fault: FaultType::TwoPhase,
            transposed: false,
        };
        let study = StudyConfig {
            fault_level_step_a: 100,
            ..StudyConfig::default()
        };
        let times = fault_clear_times(&device, &domain, &study);
        assert_eq!(
            times,
            vec![(400.0, Some(1.05)), (500.0, Some(0.15)), (600.0, Some(0.15))]
        );
    }

    #[test]
    fn unsupported_curve_never_clears() {
        let mut element = idmt("I>", ElementFunction::Phase, 100.0);
        element.characteristic = Some(Characteristic::I2tBased);
        assert_eq!(
            element_clearing_time(&element, 500.0, FaultType::TwoPhase, 0.05),
            OperateTime::Unsupported("i2t_based")
        );
    }

    #[test]
    fn fuse_adds_no_breaker_time() {
        let mut fuse = idmt("F", ElementFunction::Phase, 40.0);
        fuse.kind = ElementKind::Fuse;
        fuse.characteristic = Some(Characteristic::Interpolated {
            points: vec![(100.0, 2.0), (1000.0, 0.02)],
            clearing: None,
        });
        assert_eq!(
            element_clearing_time(&fuse, 1000.0, FaultType::PhaseGround, 0.05),
            OperateTime::Trip(0.02)
        );
    }

    #[test]
    fn single_trip_device_passes_and_reports_allowable() {
        let mut device = relay(
            "CB-1",
            vec![definite("I>", ElementFunction::Phase, 100.0, 0.15)],
        );
        device.protected_lines = vec!["LN-1".into()];
        let model = model_with(device.clone(), protected_line());
        let damage = device_conductor_damage(&model, &device, &StudyConfig::default()).expect("damage");

        assert_eq!(damage.total_trips, 1);
        let phase = &damage.lines[0].phase;
        // Largest swept level governs with a constant 0.2 s clearing time.
        assert_eq!(phase.fault_level_a, Some(1000.0));
        assert_eq!(phase.clear_time_s, Some(0.2));
        assert!((phase.energy_a2s - 200_000.0).abs() < 1e-6);
        // 6000 / sqrt(0.2) = 13416
        assert_eq!(phase.allowable_fault_level_a, Some(13_416.0));
        assert_eq!(phase.allowable_energy_a2s, Some(36_000_000.0));
        assert_eq!(phase.verdict, DamageVerdict::Pass);
        assert_eq!(damage.lines[0].earth.fault_level_a, Some(600.0));
    }

    #[test]
    fn reclose_sequence_accumulates_energy_and_restores_elements() {
        let mut device = relay(
            "RC-1",
            vec![
                definite("I>", ElementFunction::Phase, 100.0, 0.95),
                definite("I>>", ElementFunction::Phase, 100.0, 0.05),
            ],
        );
        device.protected_lines = vec!["LN-1".into()];
        device.reclose = vec![ReclosePlan {
            name: None,
            in_service: true,
            active: true,
            lockout_trips: 2,
            blocks: vec![BlockRow {
                block: "I>>".into(),
                stages: vec![1.0, 0.0],
            }],
        }];
        let mut rated = protected_line();
        rated.thermal_rating_a = Some(1000.0);
        let model = model_with(device.clone(), rated);
        let damage = device_conductor_damage(&model, &device, &StudyConfig::default()).expect("damage");

        assert_eq!(damage.total_trips, 2);
        assert_eq!(damage.trips[0].in_service_elements, vec!["I>", "I>>"]);
        assert_eq!(damage.trips[1].in_service_elements, vec!["I>"]);

        let phase = &damage.lines[0].phase;
        // Trip 1 clears in 0.1 s, trip 2 in 1.0 s, both at 1000 A.
        assert!((phase.energy_a2s - 1_100_000.0).abs() < 1e-3);
        assert_eq!(phase.clear_time_s, Some(1.0));
        // 1000 / sqrt(1.0 * 2) = 707
        assert_eq!(phase.allowable_fault_level_a, Some(707.0));
        assert_eq!(phase.verdict, DamageVerdict::Fail);
        assert!(device.elements.iter().all(|e| e.in_service));
    }

    fn slow_then_fast_recloser() -> Device {
        let mut device = relay(
            "RC-1",
            vec![
                definite("I>", ElementFunction::Phase, 100.0, 0.95),
                definite("I>>", ElementFunction::Phase, 100.0, 0.05),
            ],
        );
        device.protected_lines = vec!["LN-1".into()];
        device.reclose = vec![ReclosePlan {
            name: None,
            in_service: true,
            active: true,
            lockout_trips: 2,
            blocks: vec![BlockRow {
                block: "I>>".into(),
                stages: vec![0.0, 1.0],
            }],
        }];
        device
    }

    #[test]
    fn summed_sequence_energy_decides_verdict() {
        let device = slow_then_fast_recloser();
        let mut rated = protected_line();
        rated.thermal_rating_a = Some(1000.0);
        let model = model_with(device.clone(), rated);
        let damage = device_conductor_damage(&model, &device, &StudyConfig::default()).expect("damage");

        let phase = &damage.lines[0].phase;
        // Trip 1 clears in 1.0 s, trip 2 in 0.1 s, both at 1000 A.
        assert!((phase.energy_a2s - 1_100_000.0).abs() < 1e-3);
        assert_eq!(phase.fault_level_a, Some(1000.0));
        assert_eq!(phase.clear_time_s, Some(0.1));
        // The final stage alone sits well inside 1000 / sqrt(0.1 * 2) = 2236.
        assert_eq!(phase.allowable_fault_level_a, Some(2236.0));
        assert_eq!(phase.allowable_energy_a2s, Some(1_000_000.0));
        assert_eq!(phase.verdict, DamageVerdict::Fail);

        let mut stronger = protected_line();
        stronger.thermal_rating_a = Some(1100.0);
        let model = model_with(device.clone(), stronger);
        let damage = device_conductor_damage(&model, &device, &StudyConfig::default()).expect("damage");
        assert_eq!(damage.lines[0].phase.verdict, DamageVerdict::Pass);
    }

    #[test]
    fn swer_line_earth_faults_are_assessed_on_device_side() {
        let mut device = relay(
            "CB-1",
            vec![
                definite("I>", ElementFunction::Phase, 100.0, 0.15),
                definite("IE>", ElementFunction::Earth, 10.0, 0.01),
            ],
        );
        device.protected_lines = vec!["SWER-1".into()];
        let mut swer = line(
            "SWER-1",
            FaultCurrents::new(None, None, Some(300.0)),
            FaultCurrents::new(None, None, Some(600.0)),
        );
        swer.voltage_kv = 12.7;
        swer.phases = 1;
        swer.construction = Construction::Swer;
        swer.thermal_rating_a = Some(900.0);
        let model = model_with(device.clone(), swer);
        let damage = device_conductor_damage(&model, &device, &StudyConfig::default()).expect("damage");

        let earth = &damage.lines[0].earth;
        // 600 A on the spur is 200 A two-phase at 22 kV and is reported back
        // in spur amperes.
        assert_eq!(earth.fault_level_a, Some(600.0));
        // The relabelled fault leaves only the phase stage active.
        assert_eq!(earth.clear_time_s, Some(0.2));
        assert!((earth.energy_a2s - 200.0 * 200.0 * 0.2).abs() < 1e-6);
        assert_eq!(earth.verdict, DamageVerdict::Pass);
        assert_eq!(damage.lines[0].phase.verdict, DamageVerdict::Swer);
    }

    #[test]
    fn missing_rating_is_no_data_and_swer_phase_is_flagged() {
        let mut device = relay("CB-1", vec![definite("I>", ElementFunction::Phase, 100.0, 0.1)]);
        device.protected_lines = vec!["LN-1".into()];
        let mut unrated = protected_line();
        unrated.thermal_rating_a = None;
        unrated.construction = Construction::Swer;
        let model = model_with(device.clone(), unrated);
        let damage = device_conductor_damage(&model, &device, &StudyConfig::default()).expect("damage");
        assert_eq!(damage.lines[0].phase.verdict, DamageVerdict::Swer);
        assert_eq!(damage.lines[0].earth.verdict, DamageVerdict::NoData);
        assert!(damage.lines[0].earth.energy_a2s > 0.0);
    }

    #[test]
    fn missing_fault_levels_yield_no_data() {
        let mut device = relay("CB-1", vec![definite("I>", ElementFunction::Phase, 100.0, 0.1)]);
        device.protected_lines = vec!["LN-1".into()];
        let blank = line("LN-1", FaultCurrents::default(), FaultCurrents::default());
        let model = model_with(device.clone(), blank);
        let damage = device_conductor_damage(&model, &device, &StudyConfig::default()).expect("damage");
        assert_eq!(damage.lines[0].phase.verdict, DamageVerdict::NoData);
        assert_eq!(damage.lines[0].phase.energy_a2s, 0.0);
    }
}

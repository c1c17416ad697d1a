//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Auto-reclose trip sequencing and scoped element blocking."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
//! Auto-reclose trip sequencing.
//!
//! A [`TripSequence`] tracks the trip stage of one device. A [`TripScope`]
//! applies the block table for a stage to the device's elements and puts the
//! prior in-service flags back when it is dropped, so every exit path leaves
//! the device as it found it.
use crate::errors::{CalcEngineError, Result};
use crate::model::{Device, ProtectionElement, ReclosePlan};
use pca_logging::{pca_warn, LogContext};
use std::ops::Deref;

/// The single reclose plan of a device, if any.
pub fn reclose_plan(device: &Device) -> Result<Option<&ReclosePlan>> {
    match device.reclose.len() {
        0 => Ok(None),
        1 => Ok(device.reclose.first()),
        count => Err(CalcEngineError::MultipleReclosePlans {
            device: device.id.clone(),
            count,
        }),
    }
}

/// Number of trips before lockout.
pub fn total_trips(device: &Device) -> Result<u32> {
    Ok(match reclose_plan(device)? {
        Some(plan) if plan.in_service && plan.active => plan.lockout_trips.max(1),
        _ => 1,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripState {
    Idle,
    Trip(u32),
    Finished,
}

#[derive(Debug, Clone)]
pub struct TripSequence {
    device_id: String,
    total_trips: u32,
    trip: Option<u32>,
}

impl TripSequence {
    pub fn for_device(device: &Device) -> Result<Self> {
        Ok(Self {
            device_id: device.id.clone(),
            total_trips: total_trips(device)?,
            trip: None,
        })
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn total_trips(&self) -> u32 {
        self.total_trips
    }

    pub fn current_trip(&self) -> u32 {
        self.trip.unwrap_or(1)
    }

    pub fn state(&self) -> TripState {
        match self.trip {
            None => TripState::Idle,
            Some(n) if n <= self.total_trips => TripState::Trip(n),
            Some(_) => TripState::Finished,
        }
    }

    pub fn reset(&mut self) {
        self.trip = Some(1);
    }

    /// Moves to the next trip stage and returns its index.
    pub fn advance(&mut self) -> u32 {
        let next = self.current_trip() + 1;
        self.trip = Some(next);
        next
    }

    pub fn is_finished(&self) -> bool {
        self.state() == TripState::Finished
    }
}

/// Saved in-service flags of the elements a block table touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    saved: Vec<(usize, bool)>,
}

impl ElementSnapshot {
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Writes the saved flags back. Applying it again changes nothing.
    pub fn restore(&self, elements: &mut [ProtectionElement]) {
        for &(index, in_service) in &self.saved {
            if let Some(element) = elements.get_mut(index) {
                element.in_service = in_service;
            }
        }
    }
}

/// Block table value for `element_name` at `trip`; the last matching row wins.
pub fn block_state(plan: &ReclosePlan, element_name: &str, trip: u32) -> Option<Option<f64>> {
    let column = trip.saturating_sub(1) as usize;
    plan.blocks
        .iter()
        .rev()
        .find(|row| element_name.contains(row.block.as_str()))
        .map(|row| row.stages.get(column).copied())
}

fn enables(value: f64) -> bool {
    value == 1.0 || value == 2.0
}

/// Device elements configured for one trip stage.
pub struct TripScope<'a> {
    device: &'a mut Device,
    trip: u32,
    snapshot: ElementSnapshot,
}

impl<'a> TripScope<'a> {
    pub fn enter(device: &'a mut Device, trip: u32) -> Result<Self> {
        let mut snapshot = ElementSnapshot::default();
        if let Some(plan) = reclose_plan(device)?.cloned() {
            let context = LogContext::new().with_device(&device.id).with_trip(trip);
            for (index, element) in device.elements.iter_mut().enumerate() {
                let Some(state) = block_state(&plan, &element.name, trip) else {
                    continue;
                };
                snapshot.saved.push((index, element.in_service));
                element.in_service = match state {
                    Some(value) => enables(value),
                    None => {
                        pca_warn!(
                            context = context.clone(),
                            "block table has no column for element {}, element disabled",
                            element.name
                        );
                        false
                    }
                };
            }
        }
        Ok(Self {
            device,
            trip,
            snapshot,
        })
    }

    pub fn trip(&self) -> u32 {
        self.trip
    }

    pub fn snapshot(&self) -> &ElementSnapshot {
        &self.snapshot
    }
}

impl Deref for TripScope<'_> {
    type Target = Device;

    fn deref(&self) -> &Device {
        self.device
    }
}

impl Drop for TripScope<'_> {
    fn drop(&mut self) {
        self.snapshot.restore(&mut self.device.elements);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{idmt, instantaneous, relay};
    use crate::model::{BlockRow, ElementFunction};

    fn plan(lockout_trips: u32) -> ReclosePlan {
        ReclosePlan {
            name: Some("AR".into()),
            in_service: true,
            active: true,
            lockout_trips,
            blocks: vec![
                BlockRow {
                    block: "I>>".into(),
                    stages: vec![1.0, 0.0, 0.0],
                },
                BlockRow {
                    block: "IE>".into(),
                    stages: vec![2.0, 1.0],
                },
            ],
        }
    }

    fn recloser() -> Device {
        let mut device = relay(
            "RC-1",
            vec![
                idmt("I>", ElementFunction::Phase, 200.0),
                instantaneous("I>>", ElementFunction::Phase, 900.0, 0.02),
                idmt("IE>", ElementFunction::Earth, 40.0),
            ],
        );
        device.reclose = vec![plan(3)];
        device
    }

    #[test]
    fn reset_then_advance_yields_consecutive_trips() {
        let device = recloser();
        let mut sequence = TripSequence::for_device(&device).expect("sequence");
        assert_eq!(sequence.total_trips(), 3);
        assert_eq!(sequence.state(), TripState::Idle);
        sequence.reset();
        assert_eq!(sequence.state(), TripState::Trip(1));
        let trips: Vec<u32> = (0..3).map(|_| sequence.advance()).collect();
        assert_eq!(trips, vec![2, 3, 4]);
        assert!(sequence.is_finished());
    }

    #[test]
    fn first_advance_from_idle_is_two() {
        let mut sequence = TripSequence::for_device(&recloser()).expect("sequence");
        assert_eq!(sequence.advance(), 2);
    }

    #[test]
    fn multiple_plans_are_an_invariant_violation() {
        let mut device = recloser();
        device.reclose.push(plan(2));
        let err = TripSequence::for_device(&device).expect_err("two plans");
        assert!(err.is_invariant_violation());
        let err = TripScope::enter(&mut device, 1).err().expect("two plans");
        assert!(matches!(
            err,
            CalcEngineError::MultipleReclosePlans { count: 2, .. }
        ));
    }

    #[test]
    fn disabled_or_missing_plan_means_single_trip() {
        let mut device = recloser();
        device.reclose[0].active = false;
        assert_eq!(total_trips(&device).expect("trips"), 1);
        device.reclose.clear();
        assert_eq!(total_trips(&device).expect("trips"), 1);
        device.reclose.push(plan(0));
        assert_eq!(total_trips(&device).expect("trips"), 1);
    }

    #[test]
    fn scope_applies_block_table_and_restores_on_drop() {
        let mut device = recloser();
        {
            let scope = TripScope::enter(&mut device, 2).expect("scope");
            let names = scope.in_service_element_names();
            // "I>" matches no row, "I>>" is blocked, "IE>" reads 1.0 in column 1.
            assert_eq!(names, vec!["I>".to_string(), "IE>".to_string()]);
            assert_eq!(scope.trip(), 2);
        }
        assert!(device.elements.iter().all(|e| e.in_service));
    }

    #[test]
    fn scope_restores_elements_when_evaluation_unwinds() {
        let mut device = recloser();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let scope = TripScope::enter(&mut device, 3).expect("scope");
            assert_eq!(scope.in_service_element_names(), vec!["I>".to_string()]);
            panic!("curve evaluation failed");
        }));
        assert!(outcome.is_err());
        assert!(device.elements.iter().all(|e| e.in_service));
    }

    #[test]
    fn missing_column_disables_element() {
        let mut device = recloser();
        let scope = TripScope::enter(&mut device, 3).expect("scope");
        assert_eq!(scope.in_service_element_names(), vec!["I>".to_string()]);
    }

    #[test]
    fn snapshot_restore_is_idempotent() {
        let mut device = recloser();
        device.elements[1].in_service = false;
        let snapshot = {
            let scope = TripScope::enter(&mut device, 1).expect("scope");
            scope.snapshot().clone()
        };
        assert!(!snapshot.is_empty());
        let before: Vec<bool> = device.elements.iter().map(|e| e.in_service).collect();
        snapshot.restore(&mut device.elements);
        snapshot.restore(&mut device.elements);
        let after: Vec<bool> = device.elements.iter().map(|e| e.in_service).collect();
        assert_eq!(before, after);
        assert!(!device.elements[1].in_service);
    }
}

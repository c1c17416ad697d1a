//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Symmetrical component current translation and SWER transposition."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use crate::model::{Device, FaultType, MeasurementType, NetworkSegment};
use nalgebra::Complex;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Current seen by an element measuring `measurement` for a fault of
/// magnitude `fault_current_a`.
pub fn measured_current(measurement: MeasurementType, fault_current_a: f64, fault: FaultType) -> f64 {
    match measurement {
        MeasurementType::ThreePhase
        | MeasurementType::DeltaThreePhase
        | MeasurementType::ZeroSequence
        | MeasurementType::SinglePhase
        | MeasurementType::DeltaSinglePhase
        | MeasurementType::Other => fault_current_a,
        // 3I0 is the neutral current, which equals the fault current on an earth fault.
        MeasurementType::ResidualEarth | MeasurementType::SensitiveEarth => fault_current_a,
        MeasurementType::NegativeSequence => negative_sequence_current(fault_current_a, fault),
        MeasurementType::NegativeSequenceTriple => {
            3.0 * negative_sequence_current(fault_current_a, fault)
        }
    }
}

/// Magnitude of I2 for an assumed phasor set per fault category.
pub fn negative_sequence_current(fault_current_a: f64, fault: FaultType) -> f64 {
    let j = Complex::new(0.0, fault_current_a);
    let zero = Complex::new(0.0, 0.0);
    let (ia, ib, ic) = match fault {
        FaultType::ThreePhase => return 0.0,
        FaultType::TwoPhase => (zero, j, -j),
        FaultType::PhaseGround => (j, zero, zero),
    };
    let a = Complex::new(-0.5, 0.866);
    let a2 = Complex::new(-0.5, -0.866);
    ((ia + a2 * ib + a * ic) / 3.0).norm_sqr().sqrt()
}

/// Result of carrying a fault current across a SWER isolating transformer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwerTransposition {
    pub current_a: f64,
    pub fault: FaultType,
    pub transposed: bool,
}

/// True when a multi-phase device sees a single-phase segment at another voltage.
pub fn swer_applies(device: &Device, segment: &dyn NetworkSegment) -> bool {
    segment.voltage_kv() != device.voltage_kv && segment.phases() == 1 && device.phases > 1
}

pub fn swer_transform(
    device: &Device,
    segment: &dyn NetworkSegment,
    current_a: f64,
    fault: FaultType,
) -> SwerTransposition {
    if !swer_applies(device, segment) {
        return SwerTransposition {
            current_a,
            fault,
            transposed: false,
        };
    }
    SwerTransposition {
        current_a: segment.voltage_kv() * current_a / device.voltage_kv / SQRT_3,
        fault: FaultType::TwoPhase,
        transposed: true,
    }
}

/// Converts a device-side current back into the segment's native domain.
pub fn swer_reverse(device: &Device, segment: &dyn NetworkSegment, device_current_a: f64) -> f64 {
    (SQRT_3 * device_current_a * device.voltage_kv / segment.voltage_kv()).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{line, relay};
    use crate::model::FaultCurrents;

    #[test]
    fn three_phase_negative_sequence_is_zero() {
        for current in [0.0, 1.0, 250.0, 12_000.0] {
            assert_eq!(negative_sequence_current(current, FaultType::ThreePhase), 0.0);
            assert_eq!(
                measured_current(MeasurementType::NegativeSequenceTriple, current, FaultType::ThreePhase),
                0.0
            );
        }
    }

    #[test]
    fn negative_sequence_magnitudes() {
        let two_phase = negative_sequence_current(300.0, FaultType::TwoPhase);
        assert!((two_phase - 300.0 * 1.732 / 3.0).abs() < 1e-9);
        let phase_ground = negative_sequence_current(300.0, FaultType::PhaseGround);
        assert!((phase_ground - 100.0).abs() < 0.01);
        let triple = measured_current(MeasurementType::NegativeSequenceTriple, 300.0, FaultType::PhaseGround);
        assert!((triple - 300.0).abs() < 0.05);
    }

    #[test]
    fn passthrough_types_return_input() {
        for measurement in [
            MeasurementType::ThreePhase,
            MeasurementType::DeltaThreePhase,
            MeasurementType::ZeroSequence,
            MeasurementType::SinglePhase,
            MeasurementType::DeltaSinglePhase,
            MeasurementType::ResidualEarth,
            MeasurementType::SensitiveEarth,
            MeasurementType::Other,
        ] {
            assert_eq!(measured_current(measurement, 420.0, FaultType::PhaseGround), 420.0);
        }
    }

    #[test]
    fn swer_round_trip_recovers_segment_current() {
        let device = relay("RC-1", Vec::new());
        let mut segment = line("SWER-1", FaultCurrents::default(), FaultCurrents::default());
        segment.voltage_kv = 12.7;
        segment.phases = 1;

        let forward = swer_transform(&device, &segment, 500.0, FaultType::PhaseGround);
        assert!(forward.transposed);
        assert_eq!(forward.fault, FaultType::TwoPhase);
        assert!((forward.current_a - 166.7).abs() < 0.1);

        let back = swer_reverse(&device, &segment, forward.current_a);
        assert!((back - 500.0).abs() <= 1.0);
    }

    #[test]
    fn swer_passthrough_for_three_phase_segment() {
        let device = relay("RC-1", Vec::new());
        let mut segment = line("LN-1", FaultCurrents::default(), FaultCurrents::default());
        segment.voltage_kv = 11.0;
        let result = swer_transform(&device, &segment, 500.0, FaultType::PhaseGround);
        assert!(!result.transposed);
        assert_eq!(result.current_a, 500.0);
        assert_eq!(result.fault, FaultType::PhaseGround);
    }
}

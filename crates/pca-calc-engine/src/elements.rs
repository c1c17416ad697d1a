//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Grouping of protection elements by function and fault category."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use crate::model::{Device, ElementFunction, ElementKind, FaultType, ProtectionElement};

/// In-service relay elements of a device sorted by protection function.
///
/// Definite-time phase and earth stages are not inverse-time elements and are
/// left out of the IDMT groups.
#[derive(Debug, Default)]
pub struct ElementGroups<'a> {
    pub phase_idmt: Vec<&'a ProtectionElement>,
    pub phase_instantaneous: Vec<&'a ProtectionElement>,
    pub earth_idmt: Vec<&'a ProtectionElement>,
    pub earth_instantaneous: Vec<&'a ProtectionElement>,
    pub nps_idmt: Vec<&'a ProtectionElement>,
    pub nps_instantaneous: Vec<&'a ProtectionElement>,
}

impl<'a> ElementGroups<'a> {
    pub fn of(device: &'a Device) -> Self {
        let mut groups = Self::default();
        for element in device.elements.iter().filter(|e| e.in_service) {
            let definite = element
                .characteristic
                .as_ref()
                .is_some_and(|c| c.is_definite_time());
            match (element.kind, element.function) {
                (ElementKind::Idmt, ElementFunction::Phase) if !definite => {
                    groups.phase_idmt.push(element)
                }
                (ElementKind::Instantaneous, ElementFunction::Phase) => {
                    groups.phase_instantaneous.push(element)
                }
                (ElementKind::Idmt, ElementFunction::Earth) if !definite => {
                    groups.earth_idmt.push(element)
                }
                (ElementKind::Instantaneous, ElementFunction::Earth) => {
                    groups.earth_instantaneous.push(element)
                }
                (ElementKind::Idmt, ElementFunction::NegativeSequence) => {
                    groups.nps_idmt.push(element)
                }
                (ElementKind::Instantaneous, ElementFunction::NegativeSequence) => {
                    groups.nps_instantaneous.push(element)
                }
                _ => {}
            }
        }
        groups
    }

    /// Elements able to detect a fault of the given category.
    pub fn active(&self, fault: FaultType) -> Vec<&'a ProtectionElement> {
        let phase = self.phase_idmt.iter().chain(&self.phase_instantaneous);
        let nps = self.nps_idmt.iter().chain(&self.nps_instantaneous);
        let earth = self.earth_idmt.iter().chain(&self.earth_instantaneous);
        match fault {
            FaultType::ThreePhase => phase.copied().collect(),
            FaultType::TwoPhase => phase.chain(nps).copied().collect(),
            FaultType::PhaseGround => phase.chain(earth).chain(nps).copied().collect(),
        }
    }
}

/// Elements that take part in clearing a fault of the given category.
pub fn active_elements(device: &Device, fault: FaultType) -> Vec<&ProtectionElement> {
    match device.fuse_element() {
        Some(fuse) => vec![fuse],
        None => ElementGroups::of(device).active(fault),
    }
}

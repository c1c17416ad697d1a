//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Error taxonomy of the protection calculation engine."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalcEngineError>;

#[derive(Debug, Error)]
pub enum CalcEngineError {
    #[error("device {device} has {count} reclose plans, at most one is allowed")]
    MultipleReclosePlans { device: String, count: usize },
    #[error("device {0} not found in network model")]
    UnknownDevice(String),
    #[error("line {0} not found in network model")]
    UnknownLine(String),
    #[error("termination {0} not found in network model")]
    UnknownTermination(String),
    #[error("invalid network model: {0}")]
    InvalidModel(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
    #[error("yaml serialization error: {0}")]
    YamlSerializationFailed(#[from] serde_yaml::Error),
}

impl CalcEngineError {
    /// Invariant violations abort processing of the offending device only.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, CalcEngineError::MultipleReclosePlans { .. })
    }
}

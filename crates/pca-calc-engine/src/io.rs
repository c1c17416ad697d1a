//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Loading of network models from JSON or YAML files."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use std::{fs, path::Path};

use crate::{
    errors::{CalcEngineError, Result},
    model::NetworkModel,
};

pub fn parse_network_model(data: &str) -> Result<NetworkModel> {
    let model = if data.trim_start().starts_with('{') {
        serde_json::from_str(data)?
    } else {
        serde_yaml::from_str(data).map_err(CalcEngineError::YamlSerializationFailed)?
    };
    Ok(model)
}

/// Reads and validates a network model.
pub fn load_network_model_from_file(path: impl AsRef<Path>) -> Result<NetworkModel> {
    let data = fs::read_to_string(path)?;
    let model = parse_network_model(&data)?;
    model.validate()?;
    Ok(model)
}

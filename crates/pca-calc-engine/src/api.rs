//! ---
//! pca_section: "08-protection-calculations"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Optional REST surface for protection studies."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use crate::model::NetworkModel;
use pca_common::StudyConfig;

#[cfg(feature = "rest-api")]
pub use rest::router;

#[cfg(feature = "rest-api")]
mod rest {
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use std::sync::Arc;

    use crate::{
        conductor_damage_study, errors::CalcEngineError, reach_factor_study,
        reports::{DamageReport, ReachReport},
    };

    use super::StudyRequest;

    #[derive(Clone, Default)]
    pub struct CalcEngineState;

    pub fn router() -> Router {
        Router::new()
            .route("/api/protection/reach", post(reach))
            .route("/api/protection/damage", post(damage))
            .with_state(Arc::new(CalcEngineState))
    }

    async fn reach(
        State(_): State<Arc<CalcEngineState>>,
        Json(payload): Json<StudyRequest>,
    ) -> Result<Json<ReachReport>, StatusCode> {
        payload.model.validate().map_err(map_err)?;
        Ok(Json(reach_factor_study(&payload.model, &payload.study)))
    }

    async fn damage(
        State(_): State<Arc<CalcEngineState>>,
        Json(payload): Json<StudyRequest>,
    ) -> Result<Json<DamageReport>, StatusCode> {
        payload.model.validate().map_err(map_err)?;
        Ok(Json(conductor_damage_study(&payload.model, &payload.study)))
    }

    fn map_err(err: CalcEngineError) -> StatusCode {
        match err {
            CalcEngineError::InvalidModel(_)
            | CalcEngineError::UnknownDevice(_)
            | CalcEngineError::UnknownLine(_)
            | CalcEngineError::UnknownTermination(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StudyRequest {
    pub model: NetworkModel,
    #[serde(default)]
    pub study: StudyConfig,
}

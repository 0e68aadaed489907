// [apps/orchestrator/src/errors.rs]
/*!
 * APARATO: FRONTERA HTTP DE ERRORES
 * RESPONSABILIDAD: Union de errores orientada al cliente, que proyecta
 * `DbError` y `ProviderError` a los cuerpos JSON estructurados
 * `{ok:false, error_code, error}` de SPEC_FULL.md §6 — extension del
 * patron de taxonomia `thiserror` del estrato de infraestructura hacia
 * la frontera HTTP.
 */

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use snapcast_domain_providers::ProviderError;
use snapcast_infra_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("bad snapshot id: {0}")]
    BadSnapshotId(String),
    #[error("snapshot not found")]
    NotFound,
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("enqueue failed: {0}")]
    EnqueueFailed(String),
}

impl OrchestratorError {
    fn error_code(&self) -> &'static str {
        match self {
            OrchestratorError::BadSnapshotId(_) => "BAD_SNAPSHOT_ID",
            OrchestratorError::NotFound => "NOT_FOUND",
            OrchestratorError::Db(DbError::NotFound) => "NOT_FOUND",
            OrchestratorError::Db(_) => "DB_FAULT",
            OrchestratorError::Provider(_) => "PROVIDER_FAULT",
            OrchestratorError::EnqueueFailed(_) => "ENQUEUE_FAULT",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            OrchestratorError::BadSnapshotId(_) => StatusCode::BAD_REQUEST,
            OrchestratorError::NotFound => StatusCode::NOT_FOUND,
            OrchestratorError::Db(DbError::NotFound) => StatusCode::NOT_FOUND,
            OrchestratorError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrchestratorError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrchestratorError::EnqueueFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OrchestratorError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = Json(json!({
            "ok": false,
            "error_code": self.error_code(),
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

//! `GET /retrieve?accessCode=<code>`: exchange an access code for the ciphertext.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use blinkdrop_core::constants::{headers, CIPHERTEXT_CONTENT_TYPE};
use blinkdrop_core::{AccessCode, AppError};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RetrieveQuery {
    #[serde(rename = "accessCode")]
    pub access_code: Option<String>,
}

/// Every retrieve failure past input validation, missing keys included,
/// surfaces as the same opaque server error.
#[tracing::instrument(skip(state, query))]
pub async fn retrieve_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RetrieveQuery>,
) -> Result<Response, HttpAppError> {
    if state.admission.is_paused() {
        return Err(AppError::paused().into());
    }

    let code = AccessCode::parse(query.access_code.as_deref().unwrap_or_default())?;

    let object = state.storage.get(code.as_str()).await?;
    let metadata = object.metadata;

    let exposed = [headers::IV, headers::SALT, headers::EXTENSION].join(", ");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, CIPHERTEXT_CONTENT_TYPE)
        .header(headers::IV, metadata.iv)
        .header(headers::SALT, metadata.salt)
        .header(headers::EXTENSION, metadata.extension)
        .header(header::ACCESS_CONTROL_EXPOSE_HEADERS, exposed)
        .body(Body::from(object.data))
        .map_err(|e| HttpAppError(AppError::Storage(format!("invalid stored metadata: {}", e))))
}

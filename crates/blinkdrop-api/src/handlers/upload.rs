//! `POST /upload`: accept a client-encrypted file and hand back its access code.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{derive_extension, extract_upload_form};
use axum::extract::{Multipart, State};
use axum::Json;
use blinkdrop_core::constants::{CIPHERTEXT_CONTENT_TYPE, DEFAULT_FILE_TYPE};
use blinkdrop_core::{AccessCode, AppError, ObjectMetadata};
use blinkdrop_storage::PutObject;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub key: AccessCode,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    if state.admission.is_paused() {
        return Err(AppError::paused().into());
    }

    let upload = extract_upload_form(multipart).await?.validate()?;

    // Counted before the write: a failed put still consumed capacity.
    state.admission.record_upload(upload.data.len() as u64);
    state.admission.evaluate();

    let code = AccessCode::generate();
    let extension = derive_extension(&upload.file_name);
    let size_bytes = upload.data.len();

    state
        .storage
        .put(PutObject {
            key: code.to_string(),
            data: upload.data,
            metadata: ObjectMetadata {
                file_type: upload
                    .file_type
                    .unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string()),
                iv: upload.iv,
                salt: upload.salt,
                extension: extension.clone(),
            },
            content_type: CIPHERTEXT_CONTENT_TYPE.to_string(),
            server_side_encryption: true,
        })
        .await?;

    tracing::info!(size_bytes, extension = %extension, "File uploaded");

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        key: code,
    }))
}

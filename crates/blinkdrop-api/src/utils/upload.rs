//! Multipart parsing and filename helpers for the upload handler

use axum::extract::Multipart;
use blinkdrop_core::constants::DEFAULT_EXTENSION;
use blinkdrop_core::AppError;
use bytes::Bytes;

const MISSING_FIELDS: &str = "Missing file, secret word, iv or salt";

/// The uploaded file part.
#[derive(Debug)]
pub struct FilePart {
    pub data: Bytes,
    pub file_name: String,
}

/// Fields of an upload form. Absent text fields stay `None`.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<FilePart>,
    pub secret_word: Option<String>,
    pub file_type: Option<String>,
    pub iv: Option<String>,
    pub salt: Option<String>,
}

/// A form that passed validation.
#[derive(Debug)]
pub struct ValidUpload {
    pub data: Bytes,
    pub file_name: String,
    pub file_type: Option<String>,
    pub iv: String,
    pub salt: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl UploadForm {
    /// Check required fields.
    ///
    /// A form without any `file` part and a form whose file part has no
    /// filename are reported differently, matching what browsers send for an
    /// empty file input.
    pub fn validate(self) -> Result<ValidUpload, AppError> {
        let file = self
            .file
            .ok_or_else(|| AppError::BadRequest("No file uploaded.".to_string()))?;

        let secret_word = non_empty(self.secret_word);
        let iv = non_empty(self.iv);
        let salt = non_empty(self.salt);

        match (file.file_name.is_empty(), secret_word, iv, salt) {
            // The secret word is required but never stored or checked.
            (false, Some(_), Some(iv), Some(salt)) => Ok(ValidUpload {
                data: file.data,
                file_name: file.file_name,
                file_type: non_empty(self.file_type),
                iv,
                salt,
            }),
            _ => Err(AppError::BadRequest(MISSING_FIELDS.to_string())),
        }
    }
}

/// Read every known field of the upload form. Unknown fields are skipped.
pub async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if form.file.is_some() {
                    return Err(AppError::BadRequest(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let file_name = field.file_name().map(|s| s.to_string()).unwrap_or_default();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                form.file = Some(FilePart { data, file_name });
            }
            "secretWord" | "type" | "iv" | "salt" => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field {}: {}", field_name, e))
                })?;
                let slot = match field_name.as_str() {
                    "secretWord" => &mut form.secret_word,
                    "type" => &mut form.file_type,
                    "iv" => &mut form.iv,
                    _ => &mut form.salt,
                };
                // First occurrence wins.
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Sanitize a client-supplied filename: keep the last path component and
/// replace anything outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 255;

    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension stored next to the ciphertext: the text after the last `.` of
/// the sanitized filename, or `bin` when there is none.
pub fn derive_extension(filename: &str) -> String {
    let sanitized = sanitize_filename(filename);
    match sanitized.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => extension.to_string(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

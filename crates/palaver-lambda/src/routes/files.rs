use axum::Json;
use axum::body::Bytes;
use palaver_core::models::message::UploadedFile;
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::validate_json_body;

#[derive(Serialize)]
#[serde(untagged)]
pub enum ExtractResponse {
    #[serde(rename_all = "camelCase")]
    Extracted {
        success: bool,
        file_name: String,
        file_size: usize,
        extracted_text: String,
        text_length: usize,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        success: bool,
        error: String,
        file_name: String,
        file_size: usize,
    },
}

/// Extract the text of one uploaded file without starting a chat turn.
pub async fn extract_file(user: AuthUser, body: Bytes) -> Result<Json<ExtractResponse>, ApiError> {
    let upload: UploadedFile = validate_json_body(&body, &["fileName", "fileType", "fileContent"])?;

    let bytes = palaver_extract::decode_base64(&upload.file_content)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let file_size = bytes.len();

    let UploadedFile {
        file_name,
        file_type,
        ..
    } = upload;
    let (file_name, result) = tokio::task::spawn_blocking(move || {
        let result = palaver_extract::extract_text(&bytes, &file_type, &file_name);
        (file_name, result)
    })
    .await?;

    let response = match result {
        Ok(text) => ExtractResponse::Extracted {
            success: true,
            text_length: text.chars().count(),
            file_name,
            file_size,
            extracted_text: text,
        },
        Err(e) => {
            warn!(user_id = %user.sub, %file_name, error = %e, "file extraction failed");
            ExtractResponse::Failed {
                success: false,
                error: e.to_string(),
                file_name,
                file_size,
            }
        }
    };

    Ok(Json(response))
}

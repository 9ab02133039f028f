//! CSV dataset endpoints
//!
//! POST /api/csv/upload, GET /api/csv/data, GET /api/csv/download,
//! GET /api/csv/files

use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use leadbook_common::{DatasetInfo, IngestError, Record};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{ApiError, ApiResult, AppState};

/// `?fileName=` on the read endpoints
#[derive(Debug, Deserialize)]
pub struct DatasetQuery {
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}

/// POST /api/csv/upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub new_records: usize,
    /// Uploaded rows not added: repeats within the file plus identifiers
    /// already stored
    pub skipped_records: usize,
    pub total_records: usize,
}

/// GET /api/csv/data response
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub status: &'static str,
    pub data: Vec<Record>,
    pub total: usize,
}

/// GET /api/csv/files response
#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub status: &'static str,
    pub files: Vec<DatasetInfo>,
}

/// POST /api/csv/upload
///
/// Multipart fields: `file` (required) and `fileName` (target dataset,
/// defaults to the configured dataset). Merges the file's records into the
/// dataset without touching existing ones.
///
/// The file part is read chunk by chunk and rejected as soon as it passes
/// the upload ceiling.
pub async fn upload_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let limit = state.max_upload_bytes;
    let request_len = content_length(&headers);

    let mut file: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error(e, limit, request_len))?
    {
        let part = field.name().map(str::to_string);
        match part.as_deref() {
            Some("file") => {
                let mut buf = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| read_error(e, limit, request_len))?
                {
                    let read = buf.len() + chunk.len();
                    if read > limit {
                        return Err(IngestError::TooLarge {
                            limit,
                            actual: request_len.map_or(read, |len| len.max(read)),
                        }
                        .into());
                    }
                    buf.extend_from_slice(&chunk);
                }
                file = Some(buf);
            }
            Some("fileName") => {
                file_name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| read_error(e, limit, request_len))?,
                )
            }
            _ => {}
        }
    }

    let bytes = file.ok_or(ApiError::NoFile)?;
    let name = state.dataset_name(file_name.as_deref())?;

    debug!(dataset = %name, bytes = bytes.len(), "Upload received");
    let outcome = state.service.upload(&bytes, &name, Some(limit)).await?;

    Ok(Json(UploadResponse {
        status: "success",
        message: "CSV file uploaded and merged successfully",
        new_records: outcome.admitted,
        skipped_records: outcome.skipped,
        total_records: outcome.total,
    }))
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// A body cut off by the request size limit is an oversized upload, not a
/// malformed one. The request length stands in for the file size.
fn read_error(e: MultipartError, limit: usize, request_len: Option<usize>) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        IngestError::TooLarge {
            limit,
            actual: request_len.unwrap_or(limit.saturating_add(1)),
        }
        .into()
    } else {
        e.into()
    }
}

/// GET /api/csv/data?fileName=
///
/// Records of the dataset in stored order; an absent dataset is empty.
pub async fn get_csv_data(
    State(state): State<AppState>,
    Query(query): Query<DatasetQuery>,
) -> ApiResult<Json<DataResponse>> {
    let name = state.dataset_name(query.file_name.as_deref())?;
    let data = state.service.fetch(&name).await?;

    Ok(Json(DataResponse {
        status: "success",
        total: data.len(),
        data,
    }))
}

/// GET /api/csv/download?fileName=
///
/// The dataset as a CSV attachment; header line only when absent.
pub async fn download_csv(
    State(state): State<AppState>,
    Query(query): Query<DatasetQuery>,
) -> ApiResult<Response> {
    let name = state.dataset_name(query.file_name.as_deref())?;
    let export = state.service.export(&name).await?;

    info!(dataset = %name, bytes = export.bytes.len(), "Dataset downloaded");

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export.file_name.replace('"', "")
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response())
}

/// GET /api/csv/files
pub async fn list_csv_files(State(state): State<AppState>) -> ApiResult<Json<FilesResponse>> {
    let files = state.service.list().await?;
    Ok(Json(FilesResponse {
        status: "success",
        files,
    }))
}

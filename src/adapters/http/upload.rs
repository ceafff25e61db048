use super::AppState;
use crate::domain::jobs::PhotoJob;
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{error, info};

/// Upload content types we know how to decode.
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Response sent as soon as the photo is decoded and queued.
#[derive(Debug, Serialize)]
pub struct UploadAccepted {
    pub filename: String,
    /// Keys that will be written once processing finishes.
    pub keys: Vec<String>,
}

struct UploadedFile {
    data: Bytes,
    content_type: Option<String>,
    file_name: Option<String>,
}

// Handler that accepts a multipart form with a `photo` file and an optional `filename`.
pub async fn upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadAccepted>, (StatusCode, String)> {
    let mut photo = None;
    let mut requested_name = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("photo") => {
                let content_type = field.content_type().map(str::to_owned);
                let file_name = field.file_name().map(str::to_owned);
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;
                photo = Some(UploadedFile {
                    data,
                    content_type,
                    file_name,
                });
            }
            Some("filename") => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;
                requested_name = Some(text);
            }
            _ => continue,
        }
    }

    let photo = photo.ok_or((StatusCode::BAD_REQUEST, "Missing photo field".to_owned()))?;
    if !is_accepted_content_type(photo.content_type.as_deref()) {
        return Err((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Invalid content type".to_owned(),
        ));
    }
    let filename = resolve_filename(requested_name.as_deref(), photo.file_name.as_deref())
        .ok_or((StatusCode::BAD_REQUEST, "Missing filename".to_owned()))?;
    info!(filename = %filename, "receiving photo");

    let data = photo.data;
    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&data))
        .await
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?
        .map_err(|err| (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))?;

    let keys = state.key_scheme.keys(&filename, &state.sizes);
    let job = PhotoJob::new(image, filename.clone());
    let ingest = state.ingest.clone();

    // The lane may be busy; only this detached task waits for it.
    tokio::spawn(async move {
        let filename = job.filename.clone();
        if let Err(e) = ingest.submit(job).await {
            error!(filename = %filename, "couldn't queue photo: {}", e);
        }
    });

    info!(filename = %filename, "returning HTTP response to client");
    Ok(Json(UploadAccepted { filename, keys }))
}

pub fn is_accepted_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ACCEPTED_CONTENT_TYPES.contains(&ct))
}

/// Pick the storage name for an upload.
///
/// A non-blank `requested` name wins; otherwise the uploaded file name is used
/// with its extension removed.
pub fn resolve_filename(requested: Option<&str>, uploaded: Option<&str>) -> Option<String> {
    if let Some(name) = requested.map(str::trim).filter(|n| !n.is_empty()) {
        return Some(name.to_owned());
    }

    let uploaded = uploaded?;
    let base_start = uploaded.rfind('/').map_or(0, |i| i + 1);
    let stem = match uploaded[base_start..].rfind('.') {
        Some(dot) => &uploaded[..base_start + dot],
        None => uploaded,
    };
    Some(stem.to_owned()).filter(|s| !s.is_empty())
}

use axum::body::Body;
use axum::extract::{Path as AxumPath, Request, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::error::ApiError;
use super::state::AppState;
use crate::error::TagError;
use crate::scanner::{self, Directory, ImageRecord};
use crate::tags::{self, merge, BatchOutcome, TagAction, TagAnalysis, Tagged};

// ─── Request models ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDirectoryRequest {
    pub directory_path: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanDirectoryRequest {
    pub directory_path: Option<String>,
    #[serde(default)]
    pub include_subfolders: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagsRequest {
    pub text_file_path: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An image as the client currently holds it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedImage {
    pub id: String,
    #[serde(default)]
    pub text_file_path: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Tagged for SelectedImage {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[derive(Deserialize)]
pub struct TagAnalysisRequest {
    #[serde(default)]
    pub images: Vec<SelectedImage>,
}

#[derive(Deserialize)]
pub struct MultiUpdateRequest {
    #[serde(default)]
    pub images: Vec<SelectedImage>,
    #[serde(default)]
    pub tag: String,
    pub action: TagAction,
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::validation(message))
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Server is running!" }))
}

/// POST /api/list-directory: Subfolders of a directory, for navigation.
pub async fn list_directory(
    State(state): State<AppState>,
    Json(data): Json<ListDirectoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_path = required(data.directory_path, "Directory path is required")?;
    let service_path = state.translator.to_service_path(Path::new(&user_path));

    let user_root = PathBuf::from(&user_path);
    let directories: Vec<Directory> = tokio::task::spawn_blocking(move || {
        scanner::list_directories(&service_path, &user_root)
    })
    .await??;

    Ok(Json(json!({
        "directories": directories,
        "currentPath": user_path,
    })))
}

/// POST /api/scan-directory: Images under a directory with their tags.
pub async fn scan_directory(
    State(state): State<AppState>,
    Json(data): Json<ScanDirectoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_path = required(data.directory_path, "Directory path is required")?;
    let recursive = data.include_subfolders;
    let service_path = state.translator.to_service_path(Path::new(&user_path));

    tracing::info!(
        "Scan request for {} (service path {:?}, include subfolders: {})",
        user_path,
        service_path,
        recursive
    );

    let scanner = state.scanner.clone();
    let images: Vec<ImageRecord> = tokio::task::spawn_blocking(move || {
        scanner.scan_directory(&service_path, Path::new(&user_path), recursive)
    })
    .await??;

    Ok(Json(json!({ "images": images })))
}

/// GET /api/image/{*encoded_path}: Raw image bytes.
pub async fn serve_image(
    State(state): State<AppState>,
    AxumPath(image_path): AxumPath<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let service_path = state.translator.to_service_path(Path::new(&image_path));

    if !state.scanner.is_image(&service_path) || !service_path.is_file() {
        return Err(ApiError::ImageNotFound);
    }

    let response = ServeFile::new(&service_path)
        .oneshot(request)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to serve image: {}", e)))?;

    Ok(response.map(Body::new).into_response())
}

/// POST /api/update-tags: Overwrite one sidecar file.
pub async fn update_tags(
    State(state): State<AppState>,
    Json(data): Json<UpdateTagsRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_path = required(data.text_file_path, "Text file path is required")?;
    let service_path = sidecar_service_path(&state, &user_path)?;
    let new_tags = data.tags;

    tokio::task::spawn_blocking(move || tags::write_tags(&service_path, &new_tags)).await??;

    Ok(Json(json!({ "success": true, "message": "Tags updated successfully" })))
}

/// POST /api/tag-analysis: Common and partial tags of a selection.
pub async fn tag_analysis(Json(data): Json<TagAnalysisRequest>) -> Json<TagAnalysis> {
    Json(merge::analyze(&data.images))
}

/// POST /api/multi-update-tags: Toggle or add one tag across a selection.
///
/// Each image is written on its own; the response lists which images were
/// updated and which failed.
pub async fn multi_update_tags(
    State(state): State<AppState>,
    Json(data): Json<MultiUpdateRequest>,
) -> Result<Json<BatchOutcome>, ApiError> {
    if data.tag.trim().is_empty() {
        return Err(ApiError::validation("Tag is required"));
    }

    let updates = merge::plan(&data.images, &data.tag, data.action);
    let sidecars: HashMap<String, Option<String>> = data
        .images
        .into_iter()
        .map(|image| (image.id, image.text_file_path))
        .collect();

    let outcome = tokio::task::spawn_blocking(move || {
        merge::commit(updates, |update| {
            let user_path = sidecars
                .get(&update.id)
                .cloned()
                .flatten()
                .ok_or_else(|| TagError::Validation("Text file path is required".into()))?;
            let service_path = sidecar_service_path(&state, &user_path)?;
            tags::write_tags(&service_path, &update.tags)
        })
    })
    .await?;

    if !outcome.is_complete() {
        tracing::warn!(
            "{} of {} tag updates failed",
            outcome.failed.len(),
            outcome.failed.len() + outcome.updated.len()
        );
    }

    Ok(Json(outcome))
}

/// Service path of a sidecar file. Only `.txt` files are ever written.
fn sidecar_service_path(state: &AppState, user_path: &str) -> Result<PathBuf, TagError> {
    let user_path = Path::new(user_path);
    let is_sidecar = user_path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(tags::SIDECAR_EXTENSION))
        .unwrap_or(false);

    if !is_sidecar {
        return Err(TagError::Validation("Tag files must be .txt files".into()));
    }

    Ok(state.translator.to_service_path(user_path))
}

// src/web/mod.rs
pub mod page;

use crate::aggregate::aggregate;
use crate::extractors::TableExtractor;
use crate::fetch::PageFetcher;
use crate::storage::{TableStore, COMBINED_FILE_NAME};
use crate::utils::error::StorageError;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use page::PageView;
use serde::Deserialize;
use std::sync::Arc;

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
    pub store: Arc<dyn TableStore>,
    pub extractor: Arc<TableExtractor>,
}

#[derive(Debug, Deserialize)]
pub struct UrlForm {
    #[serde(default)]
    pub urls: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/download_csv/:filename", get(download_csv))
        .route("/download_all", get(download_all))
        .with_state(state)
}

async fn index() -> Html<String> {
    Html(page::render(PageView::Empty))
}

async fn submit(State(state): State<AppState>, Form(form): Form<UrlForm>) -> Html<String> {
    let result = aggregate(
        state.fetcher.as_ref(),
        state.store.as_ref(),
        &state.extractor,
        &form.urls,
    )
    .await;

    match result {
        Ok(outcome) => Html(page::render(PageView::Tables(&outcome))),
        Err(e) => Html(page::render(PageView::Error(&e.to_string()))),
    }
}

async fn download_csv(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, StorageError> {
    let bytes = state.store.load(&filename)?;
    Ok(attachment(&filename, bytes))
}

async fn download_all(State(state): State<AppState>) -> Result<Response, StorageError> {
    let bytes = state.store.load(COMBINED_FILE_NAME)?;
    Ok(attachment(COMBINED_FILE_NAME, bytes))
}

fn attachment(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(filename)),
        ],
        bytes,
    )
        .into_response()
}

/// `attachment` disposition that is a valid header value for any stored name.
///
/// The quoted `filename` is a printable ASCII stand-in; `filename*` carries
/// the exact name percent-encoded as UTF-8.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        let status = match &self {
            StorageError::NotFound(_) | StorageError::InvalidName(_) => StatusCode::NOT_FOUND,
            _ => {
                tracing::error!("Download failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

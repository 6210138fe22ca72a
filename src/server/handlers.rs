//! Request handlers for the web backend.

use crate::server::AppState;
use crate::shopping::{search_offers, SearchRequest, SortBy};
use crate::vision::{self, IdentificationRequest, MediaType};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::{debug, info, warn};

const INDEX_TEMPLATE: &str = include_str!("index.html");

/// `GET /`: landing page stamped with the visit number.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let count = state.visits.fetch_add(1, Ordering::Relaxed) + 1;
    debug!("Landing page visit #{}", count);
    Html(INDEX_TEMPLATE.replace("{{visit_count}}", &count.to_string()))
}

/// `POST /api/identify`: multipart `image` field -> `{"query": ...}`.
///
/// The upload is kept in memory for the duration of the call only.
pub async fn identify(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let upload = match multipart {
        Ok(mut multipart) => read_image_field(&mut multipart).await,
        Err(rejection) => {
            debug!("Rejected identify body: {}", rejection);
            Upload::Missing
        }
    };

    let (file_name, bytes) = match upload {
        Upload::Image { file_name, bytes } => (file_name, bytes),
        Upload::Missing => return bad_request("No image uploaded"),
        Upload::Unnamed => return bad_request("No selected file"),
        Upload::TooLarge => return error_response(StatusCode::PAYLOAD_TOO_LARGE, "Image too large"),
    };

    info!("Identifying upload '{}' ({} bytes)", file_name, bytes.len());
    let request = IdentificationRequest::new(bytes, MediaType::from_path(&file_name));
    let query = vision::identify(state.identifier.as_ref(), &request).await;

    Json(json!({ "query": query })).into_response()
}

/// Query string for `GET /api/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    country: Option<String>,
    sort_by: Option<String>,
}

/// `GET /api/search?q=&country=`: ranked offers as `{"results": [...]}`.
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let Some(query) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return bad_request("No query provided");
    };

    let country = params.country.as_deref().filter(|c| !c.trim().is_empty()).unwrap_or("us");

    let sort_by = match params.sort_by.as_deref() {
        Some(raw) => raw.parse::<SortBy>().unwrap_or_else(|e| {
            warn!("{}; falling back to {}", e, SortBy::default());
            SortBy::default()
        }),
        None => SortBy::default(),
    };

    let request = SearchRequest::new(query, country, sort_by);
    let results = search_offers(state.search.as_ref(), &request).await;

    Json(json!({ "results": results })).into_response()
}

enum Upload {
    Image { file_name: String, bytes: Vec<u8> },
    Missing,
    Unnamed,
    TooLarge,
}

/// Finds the `image` file part, skipping any others.
async fn read_image_field(multipart: &mut Multipart) -> Upload {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Upload::Missing,
            Err(e) => return upload_error(e),
        };

        if field.name() != Some("image") {
            continue;
        }

        // A plain form value under `image` is not a file upload
        let file_name = match field.file_name() {
            None => return Upload::Missing,
            Some("") => return Upload::Unnamed,
            Some(name) => name.to_string(),
        };

        return match field.bytes().await {
            Ok(bytes) => Upload::Image { file_name, bytes: bytes.to_vec() },
            Err(e) => upload_error(e),
        };
    }
}

fn upload_error(err: MultipartError) -> Upload {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Rejected upload: {}", err.body_text());
        return Upload::TooLarge;
    }
    debug!("Malformed multipart body: {}", err.body_text());
    Upload::Missing
}

fn bad_request(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, message)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

use crate::app::CleanseService;
use crate::constants::FILE_FIELD;
use crate::error::CleanseError;
use crate::storage::{Collection, TextRecord};
use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Multipart, Path, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use hyper::Server;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CleanseService>,
}

impl AppState {
    pub fn new(service: CleanseService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Form body for submitting or editing a text
#[derive(Debug, Deserialize)]
pub struct TextForm {
    pub text: String,
}

/// Response for a cleaned or edited text
#[derive(Debug, Serialize, Deserialize)]
pub struct CleanResponse {
    pub description: String,
    pub text_id: i64,
    #[serde(rename = "clean text")]
    pub clean_text: String,
    #[serde(rename = "dirty text")]
    pub dirty_text: String,
}

impl CleanResponse {
    fn new(description: &str, record: TextRecord) -> Self {
        Self {
            description: description.to_string(),
            text_id: record.id,
            clean_text: record.clean_text,
            dirty_text: record.dirty_text,
        }
    }
}

impl IntoResponse for CleanseError {
    fn into_response(self) -> Response {
        let (status, label) = match &self {
            CleanseError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found"),
            CleanseError::MalformedInput(_) => (StatusCode::BAD_REQUEST, "Misunderstood"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (
            status,
            Json(serde_json::json!({ "error": label, "detail": self.to_string() })),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<T, CleanseError>;

type IdParam = std::result::Result<Path<i64>, PathRejection>;
type TextParam = std::result::Result<Form<TextForm>, FormRejection>;

// Extractor rejections answer with the same JSON error body as handler errors
fn record_id(id: IdParam) -> ApiResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|e| CleanseError::MalformedInput(e.body_text()))
}

fn form_text(form: TextParam) -> ApiResult<String> {
    form.map(|Form(form)| form.text)
        .map_err(|e| CleanseError::MalformedInput(e.body_text()))
}

async fn home() -> &'static str {
    "Welcome to DYass!"
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dyass",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Unknown routes
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

async fn clean_text(
    State(state): State<AppState>,
    form: TextParam,
) -> ApiResult<Json<CleanResponse>> {
    let text = form_text(form)?;
    let record = state.service.clean_text(&text).await?;
    Ok(Json(CleanResponse::new("Yassification Success!", record)))
}

async fn clean_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<Vec<TextRecord>>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CleanseError::MalformedInput(e.to_string()))?
    {
        if field.name() == Some(FILE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| CleanseError::MalformedInput(e.to_string()))?;
            upload = Some(bytes);
            break;
        }
    }
    let bytes = upload.ok_or_else(|| {
        CleanseError::MalformedInput(format!("missing multipart field '{}'", FILE_FIELD))
    })?;

    let records = state.service.clean_file(&bytes).await?;
    Ok(Json(records))
}

async fn list_records(state: &AppState, collection: Collection) -> ApiResult<Json<Vec<TextRecord>>> {
    Ok(Json(state.service.list(collection).await?))
}

async fn get_record(state: &AppState, collection: Collection, id: i64) -> ApiResult<Json<TextRecord>> {
    Ok(Json(state.service.get(collection, id).await?))
}

async fn update_record(
    state: &AppState,
    collection: Collection,
    id: i64,
    text: &str,
) -> ApiResult<Json<CleanResponse>> {
    let record = state.service.update(collection, id, text).await?;
    Ok(Json(CleanResponse::new("Success Update Data", record)))
}

async fn delete_record(
    state: &AppState,
    collection: Collection,
    id: i64,
) -> ApiResult<Json<serde_json::Value>> {
    state.service.delete(collection, id).await?;
    Ok(Json(serde_json::json!({
        "description": "Success Delete Data",
        "text_id": id
    })))
}

// Single-text collection
async fn list_texts(State(state): State<AppState>) -> ApiResult<Json<Vec<TextRecord>>> {
    list_records(&state, Collection::Text).await
}

async fn get_text(State(state): State<AppState>, id: IdParam) -> ApiResult<Json<TextRecord>> {
    get_record(&state, Collection::Text, record_id(id)?).await
}

async fn update_text(
    State(state): State<AppState>,
    id: IdParam,
    form: TextParam,
) -> ApiResult<Json<CleanResponse>> {
    let id = record_id(id)?;
    update_record(&state, Collection::Text, id, &form_text(form)?).await
}

async fn delete_text(
    State(state): State<AppState>,
    id: IdParam,
) -> ApiResult<Json<serde_json::Value>> {
    delete_record(&state, Collection::Text, record_id(id)?).await
}

// File-row collection
async fn list_files(State(state): State<AppState>) -> ApiResult<Json<Vec<TextRecord>>> {
    list_records(&state, Collection::File).await
}

async fn get_file(State(state): State<AppState>, id: IdParam) -> ApiResult<Json<TextRecord>> {
    get_record(&state, Collection::File, record_id(id)?).await
}

async fn update_file(
    State(state): State<AppState>,
    id: IdParam,
    form: TextParam,
) -> ApiResult<Json<CleanResponse>> {
    let id = record_id(id)?;
    update_record(&state, Collection::File, id, &form_text(form)?).await
}

async fn delete_file(
    State(state): State<AppState>,
    id: IdParam,
) -> ApiResult<Json<serde_json::Value>> {
    delete_record(&state, Collection::File, record_id(id)?).await
}

/// Create the HTTP router with all routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        // Single texts
        .route("/text_yassification", post(clean_text))
        .route("/show_text", get(list_texts))
        .route(
            "/text_yassification/:id",
            get(get_text).put(update_text).delete(delete_text),
        )
        // Uploaded tables
        .route("/file_yassification", post(clean_file))
        .route("/show_file", get(list_files))
        .route(
            "/file_yassification/:id",
            get(get_file).put(update_file).delete(delete_file),
        )
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C
pub async fn start_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_server(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("HTTP server running on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

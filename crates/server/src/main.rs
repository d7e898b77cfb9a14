use std::{net::SocketAddr, sync::Arc};

use analysis::{analyze, file_references, matching_inner_procedures, AnalysisError, AnalysisSection};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use futures::future::try_join_all;
use shared::{
    domain::ProcedurePath,
    error::{ApiError, ErrorCode},
    protocol::{
        unescape_path_segment, AnalysisSectionsResponse, InnerProcedureSearchResponse,
        ProcedureResponse, ProcedureSearchResponse,
    },
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod file_server;

use app_state::AppState;
use config::{file_server_url, load_settings};
use file_server::{FileServer, FileServerError, HttpFileServer};

type ApiFailure = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let base = file_server_url(&settings.file_server_address)?;
    info!(file_server = %base, "using file server");
    let files = HttpFileServer::new(base, settings.request_timeout())?;

    let app = build_router(Arc::new(AppState {
        files: Arc::new(files),
    }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/procedure/:procedure", get(get_procedure))
        .route("/api/search/procedure/", get(find_all_procedures))
        .route("/api/search/procedure/:procedure", get(find_procedure))
        .route(
            "/api/search/procedure/:procedure/:inner_procedure",
            get(find_inner_procedure),
        )
        .route("/api/analysis_sections/:procedure", get(get_analysis_sections))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_procedure(
    State(state): State<Arc<AppState>>,
    Path(procedure): Path<String>,
) -> Result<Json<ProcedureResponse<AnalysisSection>>, ApiFailure> {
    let path = ProcedurePath::from(unescape_path_segment(&procedure));
    let source = load_source(state.files.as_ref(), &path).await?;
    let sections = analyze(&source).map_err(|e| analysis_failure(&path, e))?;
    let file_references = file_references(&source);
    debug!(%path, sections = sections.len(), references = file_references.len(), "analyzed program");

    Ok(Json(ProcedureResponse {
        sections,
        file_references,
    }))
}

async fn get_analysis_sections(
    State(state): State<Arc<AppState>>,
    Path(procedure): Path<String>,
) -> Result<Json<AnalysisSectionsResponse<AnalysisSection>>, ApiFailure> {
    let path = ProcedurePath::from(unescape_path_segment(&procedure));
    let source = load_source(state.files.as_ref(), &path).await?;
    let sections = analyze(&source).map_err(|e| analysis_failure(&path, e))?;
    Ok(Json(AnalysisSectionsResponse { sections }))
}

/// An empty search text lands here since the path segment is empty.
async fn find_all_procedures(
    state: State<Arc<AppState>>,
) -> Result<Json<ProcedureSearchResponse>, ApiFailure> {
    find_procedure(state, Path(String::new())).await
}

async fn find_procedure(
    State(state): State<Arc<AppState>>,
    Path(procedure): Path<String>,
) -> Result<Json<ProcedureSearchResponse>, ApiFailure> {
    let procedure = unescape_path_segment(&procedure);
    let found = state
        .files
        .find(procedure)
        .await
        .map_err(file_server_failure)?;
    debug!(query = %procedure, hits = found.len(), "procedure search");
    Ok(Json(ProcedureSearchResponse {
        results: found.into_iter().map(|path| path.0).collect(),
    }))
}

async fn find_inner_procedure(
    State(state): State<Arc<AppState>>,
    Path((procedure, inner_procedure)): Path<(String, String)>,
) -> Result<Json<InnerProcedureSearchResponse>, ApiFailure> {
    let inner_procedure = unescape_path_segment(&inner_procedure);
    let candidates = state
        .files
        .find(unescape_path_segment(&procedure))
        .await
        .map_err(file_server_failure)?;

    let files = state.files.as_ref();
    let sources = try_join_all(candidates.iter().map(|path| load_source(files, path))).await?;

    let mut results = Vec::new();
    for (path, source) in candidates.iter().zip(&sources) {
        let sections = match analyze(source) {
            Ok(sections) => sections,
            Err(error) => {
                warn!(%path, %error, "skipping unanalyzable program in inner procedure search");
                continue;
            }
        };
        for name in matching_inner_procedures(&sections, inner_procedure) {
            results.push((path.to_string(), name.to_string()));
        }
    }

    Ok(Json(InnerProcedureSearchResponse { results }))
}

async fn load_source(files: &dyn FileServer, path: &ProcedurePath) -> Result<String, ApiFailure> {
    let bytes = files.fetch_file(path).await.map_err(file_server_failure)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn file_server_failure(err: FileServerError) -> ApiFailure {
    match err {
        FileServerError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(ErrorCode::NotFound, err.to_string())),
        ),
        other => {
            error!(error = %other, "file server request failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiError::new(ErrorCode::Upstream, other.to_string())),
            )
        }
    }
}

fn analysis_failure(path: &ProcedurePath, err: AnalysisError) -> ApiFailure {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiError::new(
            ErrorCode::Validation,
            format!("could not analyze '{path}': {err}"),
        )),
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

use std::{any::Any, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use report::{build_dashboard, display::format_timestamp};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::DashboardPayload,
};
use snapshot::{last_modified, SnapshotLoader};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};

mod app_state;
mod config;
mod render;

use app_state::AppState;
use config::load_settings;
use render::{Freshness, PageBody};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    if !settings.data_path.is_file() {
        warn!(
            data_path = %settings.data_path.display(),
            "snapshot file not found; the dashboard will report it until the export appears"
        );
    }

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, data_path = %settings.data_path.display(), "dashboard listening");

    let state = AppState {
        settings,
        loader: SnapshotLoader::new(),
    };
    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let page_state = Arc::clone(&state);
    let page = Router::new()
        .route("/", get(dashboard_page))
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| page_panic_response(&page_state, panic),
        ));
    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/dashboard", get(dashboard_json))
        .route("/api/cache/invalidate", post(invalidate_cache))
        .layer(CatchPanicLayer::custom(panic_response));

    page.merge(api).with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn dashboard_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let task_state = Arc::clone(&state);
    let rendered = blocking(move || {
        let freshness = Freshness::probe(&task_state.settings.data_path);
        let body = page_body(&task_state);
        render::render_page(&task_state.settings, &freshness, &body)
    })
    .await;

    match rendered {
        Ok(html) => Html(html),
        Err(detail) => Html(crash_page(&state, detail)),
    }
}

/// Snapshot IO and the transform run on the blocking pool. A panic inside the
/// task is resumed on the handler so the catch-panic layer still answers it.
async fn blocking<T, F>(task: F) -> Result<T, String>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|join| match join.try_into_panic() {
            Ok(panic) => std::panic::resume_unwind(panic),
            Err(join) => join.to_string(),
        })
}

// Runs the whole load -> transform pass; any failure ends the pass.
fn page_body(state: &AppState) -> PageBody {
    let (table, load_error) = state.loader.load_or_empty(&state.settings.data_path);
    if table.is_empty() {
        return match load_error {
            Some(error) => PageBody::LoadFailed(error),
            None => PageBody::NoData,
        };
    }

    match build_dashboard(&table) {
        Ok(dashboard) => PageBody::Dashboard(dashboard),
        Err(error) => {
            error!(%error, "dashboard transform failed");
            PageBody::Failed(error)
        }
    }
}

async fn dashboard_json(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardPayload>, (StatusCode, Json<ApiError>)> {
    blocking(move || dashboard_payload(&state))
        .await
        .map_err(|detail| api_error(ApiError::new(ErrorCode::Internal, detail)))?
        .map(Json)
}

fn dashboard_payload(state: &AppState) -> Result<DashboardPayload, (StatusCode, Json<ApiError>)> {
    let path = &state.settings.data_path;
    let table = state.loader.load(path).map_err(|error| {
        warn!(path = %path.display(), %error, "snapshot unavailable");
        api_error(error.into())
    })?;
    let dashboard = build_dashboard(&table).map_err(|error| {
        error!(%error, "dashboard transform failed");
        api_error(error.into())
    })?;

    let last_modified = last_modified(path)
        .ok()
        .map(|timestamp| format_timestamp(&timestamp));
    Ok(dashboard.to_payload(last_modified))
}

async fn invalidate_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    let dropped = state.loader.invalidate(&state.settings.data_path);
    info!(dropped, "snapshot cache invalidated");
    StatusCode::NO_CONTENT
}

fn api_error(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Parse | ErrorCode::Schema => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error))
}

fn panic_detail(panic: Box<dyn Any + Send + 'static>) -> String {
    panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unexpected failure".to_string())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic_detail(panic);
    error!(%detail, "request handler panicked");
    api_error(ApiError::new(ErrorCode::Internal, detail)).into_response()
}

// The page keeps answering 200 with the generic error box.
fn page_panic_response(state: &AppState, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic_detail(panic);
    error!(%detail, "dashboard page panicked");
    (StatusCode::OK, Html(crash_page(state, detail))).into_response()
}

fn crash_page(state: &AppState, detail: String) -> String {
    let freshness = Freshness::probe(&state.settings.data_path);
    render::render_page(&state.settings, &freshness, &PageBody::Crashed(detail))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

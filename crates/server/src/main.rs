use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use dispatcher::{DispatchError, DispatchOutcome, ShellContext};
use maud::Markup;
use registry::{Catalog, RegistryError};
use serde::Deserialize;
use shared::{
    domain::AppId,
    error::{ApiError, ErrorCode},
    protocol::{
        CatalogEntrySummary, CategorySummary, DispatchResponse, NavEvent, ViewStateSnapshot,
    },
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod sessions;
mod views;

use app_state::AppState;
use config::load_settings;
use sessions::SessionStore;

type ApiFailure = (StatusCode, Json<ApiError>);

#[derive(Debug, Deserialize)]
struct SelectAppForm {
    app_id: AppId,
}

#[derive(Debug, Deserialize)]
struct SelectCategoryForm {
    category: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let catalog = Catalog::load(&settings.catalog_path).with_context(|| {
        format!(
            "failed to load app catalog from {}",
            settings.catalog_path.display()
        )
    })?;
    info!(
        apps = catalog.registry.len(),
        categories = catalog.registry.categories().len(),
        "catalog loaded"
    );

    let ctx = ShellContext {
        registry: Arc::new(catalog.registry),
        ui: Arc::new(catalog.ui),
        modules: Arc::new(reports::builtin_catalog()),
    };
    let state = AppState {
        sessions: SessionStore::new(ctx, settings.session_idle_timeout()),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "shell listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/apps/select", post(select_app))
        .route("/categories/select", post(select_category))
        .route("/categories/clear", post(clear_category))
        .route("/about", post(open_about))
        .route("/home", post(return_home))
        .route("/api/events", post(api_dispatch))
        .route("/api/state", get(api_state))
        .route("/api/catalog", get(api_catalog))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Markup) {
    let (jar, session) = state.sessions.session(jar).await;
    let rendered = session.lock().await.render();
    (jar, views::page(&rendered))
}

async fn select_app(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SelectAppForm>,
) -> Result<(CookieJar, Redirect), ApiFailure> {
    navigate(&state, jar, NavEvent::SelectApp { app_id: form.app_id }).await
}

async fn select_category(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SelectCategoryForm>,
) -> Result<(CookieJar, Redirect), ApiFailure> {
    navigate(
        &state,
        jar,
        NavEvent::SelectCategory {
            category: form.category,
        },
    )
    .await
}

async fn clear_category(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiFailure> {
    navigate(&state, jar, NavEvent::ClearCategoryFilter).await
}

async fn open_about(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiFailure> {
    navigate(&state, jar, NavEvent::OpenAbout).await
}

async fn return_home(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiFailure> {
    navigate(&state, jar, NavEvent::ReturnHome).await
}

/// Applies a browser event and redirects: to the external url on handoff,
/// otherwise back to `/` for a fresh render.
async fn navigate(
    state: &AppState,
    jar: CookieJar,
    event: NavEvent,
) -> Result<(CookieJar, Redirect), ApiFailure> {
    let (jar, session) = state.sessions.session(jar).await;
    let outcome = session
        .lock()
        .await
        .dispatch(event)
        .map_err(dispatch_error)?;
    let redirect = match outcome {
        DispatchOutcome::Handoff { url, .. } => Redirect::to(url.as_str()),
        DispatchOutcome::Redraw | DispatchOutcome::Rejected(_) => Redirect::to("/"),
    };
    Ok((jar, redirect))
}

async fn api_dispatch(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(event): Json<NavEvent>,
) -> Result<(CookieJar, Json<DispatchResponse>), ApiFailure> {
    let (jar, session) = state.sessions.session(jar).await;
    let mut dispatcher = session.lock().await;
    let outcome = dispatcher.dispatch(event).map_err(dispatch_error)?;
    let response = DispatchResponse {
        outcome: outcome.into(),
        state: dispatcher.snapshot(),
    };
    Ok((jar, Json(response)))
}

async fn api_state(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<ViewStateSnapshot>) {
    let (jar, session) = state.sessions.session(jar).await;
    let snapshot = session.lock().await.snapshot();
    (jar, Json(snapshot))
}

async fn api_catalog(State(state): State<Arc<AppState>>) -> Json<Vec<CategorySummary>> {
    let groups = state
        .sessions
        .context()
        .registry
        .grouped_by_category()
        .into_iter()
        .map(|group| CategorySummary {
            category: group.category.to_string(),
            apps: group
                .apps
                .into_iter()
                .map(CatalogEntrySummary::from)
                .collect(),
        })
        .collect();
    Json(groups)
}

fn dispatch_error(err: DispatchError) -> ApiFailure {
    warn!(%err, "navigation event rejected");
    match err {
        DispatchError::Registry(RegistryError::NotFound(_)) | DispatchError::UnknownCategory(_) => {
            (StatusCode::NOT_FOUND, Json(ApiError::not_found(err.to_string())))
        }
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(ErrorCode::Internal, other.to_string())),
        ),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

use crate::application::config_service::AgentConfigService;
use crate::domain::agent::AgentConfig;
use crate::domain::failure::Failure;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

pub struct AppState {
    pub config_service: Arc<AgentConfigService>,
}

pub fn app(config_service: Arc<AgentConfigService>) -> Router {
    let state = Arc::new(AppState { config_service });

    Router::new()
        .route(
            "/agents/config",
            get(get_agent_config)
                .post(create_agent_config)
                .delete(remove_agent_config),
        )
        .route("/agents/status", get(get_agent_status))
        .route("/agents/reconcile", post(reconcile_agent))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Maps the domain taxonomy onto HTTP status codes.
struct ApiError(Failure);

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        Self(failure)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Failure::Invalid(_) => StatusCode::BAD_REQUEST,
            Failure::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Failure::NotFound(_) => StatusCode::NOT_FOUND,
            Failure::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Failure::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let body = Json(json!({ "errorMessage": self.0.to_string() }));
        (status, body).into_response()
    }
}

async fn get_agent_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AgentConfig>, ApiError> {
    let config = state.config_service.get_config().await?;
    Ok(Json(config))
}

async fn create_agent_config(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let config: AgentConfig = serde_json::from_slice(&body)
        .map_err(|err| Failure::invalid(format!("failed to decode agent config: {err}")))?;

    state.config_service.save_config(&config).await?;
    Ok((StatusCode::CREATED, Json(config)))
}

async fn remove_agent_config(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    state.config_service.delete_config().await?;
    Ok(StatusCode::OK)
}

async fn get_agent_status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.config_service.agent_status().await?;
    Ok(Json(status))
}

async fn reconcile_agent(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.config_service.reconcile().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn healthz() -> &'static str {
    "ok"
}

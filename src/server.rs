//! HTTP façade over the workflow service.
//!
//! A thin axum layer: handlers translate requests into
//! [`WorkflowService`] calls and map every [`ServiceError`] kind to a
//! status class plus a `{"error": message}` body. No workflow logic lives
//! here.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::engine::TransitionError;
use crate::model::{WorkflowDefinition, WorkflowInstance};
use crate::service::{ServiceError, WorkflowService};
use crate::store::StoreError;

/// A service error paired with the HTTP status it renders as.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(err: ServiceError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::DefinitionNotFound(_) | ServiceError::InstanceNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::NoEnabledInitialState(_) => StatusCode::BAD_REQUEST,
            ServiceError::Transition(TransitionError::ActionNotFound(_)) => StatusCode::NOT_FOUND,
            ServiceError::Transition(_) => StatusCode::BAD_REQUEST,
            ServiceError::Store(StoreError::DuplicateId(_))
            | ServiceError::Store(StoreError::Invalid(_)) => StatusCode::BAD_REQUEST,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the router over a shared service handle.
pub fn router(service: Arc<WorkflowService>) -> Router {
    Router::new()
        .route("/workflows", post(create_workflow).get(list_workflows))
        .route("/workflows/:id", get(get_workflow))
        .route("/workflows/:id/instances", post(create_instance))
        .route("/instances", get(list_instances))
        .route("/instances/:id", get(get_instance))
        .route("/instances/:id/actions/:action_id", post(fire_action))
        .with_state(service)
}

/// The workflow HTTP server.
pub struct Server {
    port: u16,
    service: Arc<WorkflowService>,
}

impl Server {
    pub fn new(service: Arc<WorkflowService>, port: u16) -> Self {
        Self { port, service }
    }

    pub async fn serve(self) -> Result<(), std::io::Error> {
        let app = router(self.service);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!("flowstate listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await
    }
}

async fn create_workflow(
    State(service): State<Arc<WorkflowService>>,
    Json(def): Json<WorkflowDefinition>,
) -> Result<impl IntoResponse, ApiError> {
    let def = service.create_definition(def)?;
    let location = format!("/workflows/{}", def.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(def),
    ))
}

async fn list_workflows(
    State(service): State<Arc<WorkflowService>>,
) -> Json<Vec<WorkflowDefinition>> {
    Json(service.definitions())
}

async fn get_workflow(
    State(service): State<Arc<WorkflowService>>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDefinition>, ApiError> {
    Ok(Json(service.definition(&id)?))
}

async fn create_instance(
    State(service): State<Arc<WorkflowService>>,
    Path(definition_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let inst = service.create_instance(&definition_id)?;
    let location = format!("/instances/{}", inst.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(inst),
    ))
}

async fn list_instances(
    State(service): State<Arc<WorkflowService>>,
) -> Json<Vec<WorkflowInstance>> {
    Json(service.instances())
}

async fn get_instance(
    State(service): State<Arc<WorkflowService>>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowInstance>, ApiError> {
    Ok(Json(service.instance(&id)?))
}

async fn fire_action(
    State(service): State<Arc<WorkflowService>>,
    Path((instance_id, action_id)): Path<(String, String)>,
) -> Result<Json<WorkflowInstance>, ApiError> {
    match service.fire_action(&instance_id, &action_id) {
        Ok(inst) => Ok(Json(inst)),
        // A stored instance pointing at a vanished definition is a data
        // problem with the request target, not a missing resource.
        Err(err @ ServiceError::DefinitionNotFound(_)) => Err(ApiError::bad_request(err)),
        Err(err) => Err(err.into()),
    }
}

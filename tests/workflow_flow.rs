//! End-to-end workflow scenarios through the service, both stores, and the
//! HTTP router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use flowstate::engine::TransitionError;
use flowstate::model::WorkflowDefinition;
use flowstate::server::router;
use flowstate::service::{ServiceError, WorkflowService};
use flowstate::store::{JsonFileStore, MemoryStore, StoreError};
use flowstate::validate::ValidationError;

/// The document-approval definition: Draft (initial) -> Review ->
/// Approved (final), with Submit and Approve actions.
fn approval_definition() -> WorkflowDefinition {
    serde_json::from_value(json!({
        "id": "doc-approval",
        "states": [
            {"id": "draft", "name": "Draft", "isInitial": true},
            {"id": "review", "name": "Review"},
            {"id": "approved", "name": "Approved", "isFinal": true}
        ],
        "actions": [
            {"id": "submit", "name": "Submit", "fromStates": ["draft"], "toState": "review"},
            {"id": "approve", "name": "Approve", "fromStates": ["review"], "toState": "approved"}
        ]
    }))
    .unwrap()
}

fn memory_service() -> WorkflowService {
    WorkflowService::new(Arc::new(MemoryStore::new()))
}

#[test]
fn document_approval_runs_to_completion() {
    let svc = memory_service();
    svc.create_definition(approval_definition()).unwrap();

    let inst = svc.create_instance("doc-approval").unwrap();
    assert_eq!(inst.current_state, "draft");

    let inst = svc.fire_action(&inst.id, "submit").unwrap();
    assert_eq!(inst.current_state, "review");
    assert_eq!(inst.history.len(), 1);

    let inst = svc.fire_action(&inst.id, "approve").unwrap();
    assert_eq!(inst.current_state, "approved");
    assert_eq!(inst.history.len(), 2);

    // Submit lists only draft, so from approved the membership check fires
    // first; the instance stays put either way.
    let err = svc.fire_action(&inst.id, "submit").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Transition(TransitionError::IllegalFromState { .. })
    ));
    assert_eq!(svc.instance(&inst.id).unwrap(), inst);
}

#[test]
fn two_initial_states_rejected_with_no_partial_storage() {
    let svc = memory_service();
    let mut def = approval_definition();
    def.states[1].is_initial = true;

    let err = svc.create_definition(def).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::Invalid(
            ValidationError::InvalidInitialStateCount(2)
        ))
    ));
    assert!(svc.definitions().is_empty());
}

#[test]
fn duplicate_definition_rejection_is_idempotent() {
    let svc = memory_service();
    svc.create_definition(approval_definition()).unwrap();

    let mut changed = approval_definition();
    changed.states[1].name = "Second Review".to_string();
    let err = svc.create_definition(changed).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::DuplicateId(_))
    ));

    // The stored definition is the original, unchanged.
    let stored = svc.definition("doc-approval").unwrap();
    assert_eq!(stored, approval_definition());
}

#[test]
fn file_backed_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let instance_id;

    {
        let store = Arc::new(JsonFileStore::open(dir.path()).unwrap());
        let svc = WorkflowService::new(store);
        svc.create_definition(approval_definition()).unwrap();
        let inst = svc.create_instance("doc-approval").unwrap();
        instance_id = inst.id.clone();
        svc.fire_action(&inst.id, "submit").unwrap();
    }

    // A fresh store over the same directory sees the same graphs.
    let store = Arc::new(JsonFileStore::open(dir.path()).unwrap());
    let svc = WorkflowService::new(store);
    assert_eq!(svc.definition("doc-approval").unwrap(), approval_definition());

    let inst = svc.instance(&instance_id).unwrap();
    assert_eq!(inst.current_state, "review");
    assert_eq!(inst.history.len(), 1);
    assert_eq!(inst.history[0].action_id, "submit");

    // And the workflow continues where it left off.
    let inst = svc.fire_action(&instance_id, "approve").unwrap();
    assert_eq!(inst.current_state, "approved");
}

// ---- HTTP router ----

fn test_router() -> Router {
    router(Arc::new(memory_service()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn create_workflow_returns_created_with_location() {
    let app = test_router();

    let def = serde_json::to_value(approval_definition()).unwrap();
    let response = app.clone().oneshot(post_json("/workflows", def)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/workflows/doc-approval"
    );

    let (status, body) = send(&app, get("/workflows/doc-approval")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "doc-approval");
    assert_eq!(body["states"][0]["isInitial"], true);
}

#[tokio::test]
async fn invalid_workflow_returns_bad_request() {
    let app = test_router();

    let mut def = approval_definition();
    def.states[1].is_initial = true;
    let (status, body) = send(
        &app,
        post_json("/workflows", serde_json::to_value(def).unwrap()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("initial state"));

    // Nothing was stored.
    let (_, list) = send(&app, get("/workflows")).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn duplicate_workflow_returns_bad_request() {
    let app = test_router();
    let def = serde_json::to_value(approval_definition()).unwrap();

    let (status, _) = send(&app, post_json("/workflows", def.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post_json("/workflows", def)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn missing_resources_return_not_found() {
    let app = test_router();

    let (status, _) = send(&app, get("/workflows/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/instances/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, post_empty("/workflows/ghost/instances")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn instance_lifecycle_over_http() {
    let app = test_router();
    let def = serde_json::to_value(approval_definition()).unwrap();
    send(&app, post_json("/workflows", def)).await;

    let (status, inst) = send(&app, post_empty("/workflows/doc-approval/instances")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(inst["currentState"], "draft");
    let id = inst["id"].as_str().unwrap().to_string();

    let (status, list) = send(&app, get("/instances")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, fired) = send(
        &app,
        post_empty(&format!("/instances/{id}/actions/submit")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fired["currentState"], "review");
    assert_eq!(fired["history"].as_array().unwrap().len(), 1);
    assert_eq!(fired["history"][0]["actionId"], "submit");

    // Unknown action id is a missing resource.
    let (status, _) = send(
        &app,
        post_empty(&format!("/instances/{id}/actions/shred")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Re-firing submit from review is a rule violation.
    let (status, body) = send(
        &app,
        post_empty(&format!("/instances/{id}/actions/submit")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("submit"));
}

#[tokio::test]
async fn firing_from_final_state_returns_bad_request() {
    let app = test_router();

    // Reopen nominally fires from the final state, so the final-state rule
    // is what rejects it.
    let def = json!({
        "id": "short",
        "states": [
            {"id": "open", "name": "Open", "isInitial": true},
            {"id": "closed", "name": "Closed", "isFinal": true}
        ],
        "actions": [
            {"id": "close", "name": "Close", "fromStates": ["open"], "toState": "closed"},
            {"id": "reopen", "name": "Reopen", "fromStates": ["closed"], "toState": "open"}
        ]
    });
    send(&app, post_json("/workflows", def)).await;

    let (_, inst) = send(&app, post_empty("/workflows/short/instances")).await;
    let id = inst["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, post_empty(&format!("/instances/{id}/actions/close"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        post_empty(&format!("/instances/{id}/actions/reopen")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("final state"));
}

#[tokio::test]
async fn disabled_action_returns_bad_request() {
    let app = test_router();

    let def = json!({
        "id": "gated",
        "states": [
            {"id": "a", "name": "A", "isInitial": true},
            {"id": "b", "name": "B"}
        ],
        "actions": [
            {"id": "go", "name": "Go", "enabled": false, "fromStates": ["a"], "toState": "b"}
        ]
    });
    send(&app, post_json("/workflows", def)).await;

    let (_, inst) = send(&app, post_empty("/workflows/gated/instances")).await;
    let id = inst["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, post_empty(&format!("/instances/{id}/actions/go"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("disabled"));
}

#[tokio::test]
async fn disabled_initial_state_blocks_instance_creation_over_http() {
    let app = test_router();

    // Validates (cardinality ignores `enabled`) but cannot spawn instances.
    let def = json!({
        "id": "stuck",
        "states": [
            {"id": "a", "name": "A", "isInitial": true, "enabled": false},
            {"id": "b", "name": "B"}
        ],
        "actions": []
    });
    let (status, _) = send(&app, post_json("/workflows", def)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post_empty("/workflows/stuck/instances")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("no enabled initial state"));
}

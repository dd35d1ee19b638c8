use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::cache::{TtlCache, reply_cache_key};
use crate::orchestrator::Orchestrator;
use crate::persona::Persona;
use crate::store::EmployeeStore;
use crate::types::{ChatTurn, Identity, QueryOutcome};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub store: Arc<dyn EmployeeStore>,
    pub reply_cache: Arc<TtlCache<QueryOutcome>>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(serde_json::json!({ "message": "Training assistant API", "status": "running" }))
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// The chat endpoint. Routing happens here, once per request, before the
/// orchestrator runs: a supplied identity that resolves to a record picks the
/// CISO or employee persona; anything else falls back to authentication.
async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatResponse> {
    let request_id = uuid::Uuid::new_v4();
    let supplied = match (req.employee_id, req.employee_name) {
        (Some(employee_id), Some(employee_name)) => Some(Identity {
            employee_id,
            employee_name,
        }),
        _ => None,
    };

    let persona = route_persona(state.store.as_ref(), supplied.as_ref());
    // An identity that failed to resolve is not carried into the
    // authentication persona.
    let identity = match persona {
        Persona::Authentication => None,
        _ => supplied,
    };
    tracing::info!(%request_id, persona = persona.name(), "chat request");

    let cache_key = reply_cache_key(
        persona.name(),
        &req.message,
        identity.as_ref(),
        &req.history,
    );
    if let Some(hit) = state.reply_cache.get(&cache_key) {
        tracing::debug!(%request_id, "reply cache hit");
        return Json(to_response(hit));
    }

    let outcome = match persona {
        Persona::Authentication => {
            state
                .orchestrator
                .authenticate(&req.message, &req.history)
                .await
        }
        persona => {
            state
                .orchestrator
                .run_query(persona, &req.message, &req.history, identity)
                .await
        }
    };

    state.reply_cache.insert(cache_key, outcome.clone());
    Json(to_response(outcome))
}

fn route_persona(store: &dyn EmployeeStore, identity: Option<&Identity>) -> Persona {
    let Some(identity) = identity else {
        return Persona::Authentication;
    };
    match store.exists(&identity.employee_id, &identity.employee_name) {
        Ok(true) => match store.is_ciso(&identity.employee_id, &identity.employee_name) {
            Ok(true) => Persona::Ciso,
            Ok(false) => Persona::Employee,
            Err(err) => {
                tracing::warn!(error = %err, "division lookup failed, treating as regular employee");
                Persona::Employee
            }
        },
        Ok(false) => Persona::Authentication,
        Err(err) => {
            tracing::warn!(error = %err, "identity lookup failed, falling back to authentication");
            Persona::Authentication
        }
    }
}

fn to_response(outcome: QueryOutcome) -> ChatResponse {
    ChatResponse {
        message: outcome.message,
        employee_id: outcome.identity.as_ref().map(|i| i.employee_id.clone()),
        employee_name: outcome.identity.map(|i| i.employee_name),
    }
}

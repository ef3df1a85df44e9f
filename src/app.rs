use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth_routes())
        .merge(note_routes())
        .merge(project_routes())
        .merge(ai_routes())
        // route_layer: unmatched paths still 404 instead of 401
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes)),
        );

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security));
    }

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn auth_routes() -> Router<AppState> {
    use handlers::protected::auth;

    Router::new().route("/auth/me", get(auth::me_get))
}

fn note_routes() -> Router<AppState> {
    use handlers::protected::notes;

    Router::new()
        .route("/notes", get(notes::list_get).post(notes::create_post))
        .route(
            "/notes/:id",
            get(notes::record_get)
                .put(notes::record_put)
                .delete(notes::record_delete),
        )
}

fn project_routes() -> Router<AppState> {
    use handlers::protected::projects;

    Router::new()
        .route("/projects", get(projects::list_get).post(projects::create_post))
        .route(
            "/projects/:id",
            get(projects::record_get)
                .put(projects::record_put)
                .delete(projects::record_delete),
        )
}

fn ai_routes() -> Router<AppState> {
    use handlers::protected::ai;

    Router::new()
        .route("/ai/chat", post(ai::chat_post))
        .route("/ai/insights", post(ai::insights_post))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = security
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "name": "DevAI API",
        "version": version,
        "description": "Notes and projects API with JWT authentication and AI assistance",
        "endpoints": {
            "public": "/, /health, /auth/register, /auth/login",
            "auth": "/auth/me (protected)",
            "notes": "/notes[/:id] (protected)",
            "projects": "/projects[/:id] (protected)",
            "ai": "/ai/chat, /ai/insights (protected)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.users.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "status": "degraded",
                    "timestamp": now
                })),
            )
        }
    }
}

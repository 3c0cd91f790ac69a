use axum::{routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use mentors_api::database::manager::DatabaseManager;
use mentors_api::{config, doc, handlers, middleware};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Mentors API in {:?} mode", config.environment);

    // Apply migrations; keep serving (degraded) if the database is not up yet
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::warn!("Database migration skipped: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("MENTORS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Mentors API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes())
        .merge(docs_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    use handlers::public;

    Router::new()
        .route("/registration/", post(public::register))
        .route("/login/", post(public::login))
}

fn protected_routes() -> Router {
    use handlers::protected::{logout, users};

    Router::new()
        .route("/logout/", post(logout::logout))
        .route("/users/", get(users::list).post(users::assign_mentor))
        .route("/users/:id/", get(users::detail).patch(users::update))
        .layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn docs_routes() -> Router {
    Router::new()
        .route("/schema/", get(doc::openapi_json))
        .route("/api/docs/", get(doc::swagger_ui))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Mentors API",
            "version": version,
            "description": "User management API with JWT authentication and mentor assignment",
            "endpoints": {
                "registration": "POST /registration/ (public)",
                "login": "POST /login/ (public)",
                "logout": "POST /logout/ (authenticated)",
                "users": "GET /users/, POST /users/ (authenticated)",
                "user_detail": "GET /users/:id/, PATCH /users/:id/ (authenticated)",
                "schema": "GET /schema/ (public)",
                "docs": "GET /api/docs/ (public)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

//! fisc Web Server
//!
//! Axum-based REST API for the fisc personal finance tracker.
//!
//! - Bearer token authentication (tokens issued at register/login)
//! - Restrictive CORS policy
//! - Typed request bodies that reject unknown fields
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use fisc_core::db::Database;

mod handlers;
mod token;

pub use token::{AuthUser, Claims};

/// Default lifetime of issued tokens
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens in hours
    pub token_ttl_hours: i64,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Authentication middleware - validates the bearer token and attaches the
/// authenticated user to the request
///
/// The token's subject must still exist in the database; a token for a
/// deleted user is rejected.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "));

    let claims = match bearer.map(|t| token::decode_token(t, &state.config.jwt_secret)) {
        Some(Ok(claims)) => claims,
        Some(Err(e)) => {
            warn!(error = %e, path = %request.uri().path(), "Invalid bearer token");
            return AppError::unauthorized("Not authorized, invalid token").into_response();
        }
        None => {
            warn!(path = %request.uri().path(), "Unauthorized request - no bearer token");
            return AppError::unauthorized("Not authorized, no token").into_response();
        }
    };

    let user = match state.db.get_user(claims.sub) {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(user_id = claims.sub, "Token subject no longer exists");
            return AppError::unauthorized("Not authorized, user not found").into_response();
        }
        Err(e) => return AppError::from(e).into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
    });
    next.run(request).await
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let protected_routes = Router::new()
        // Auth
        .route("/me", get(handlers::get_me))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::add_transaction),
        )
        .route(
            "/transactions/:id",
            put(handlers::update_transaction).delete(handlers::delete_transaction),
        )
        // Budgets
        .route("/budgets", post(handlers::set_budget))
        .route("/budgets/:month", get(handlers::get_budget))
        // Reports
        .route("/reports/summary", get(handlers::report_summary))
        .route("/reports/categories", get(handlers::report_categories))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .merge(protected_routes);

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<fisc_core::Error> for AppError {
    fn from(err: fisc_core::Error) -> Self {
        match err {
            fisc_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            fisc_core::Error::NotFound(msg) => Self::not_found(&msg),
            err => Self::internal(err.into()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State as AxumState,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use guide_book::{BookingStore, GuideQuery};
use guide_book_api::{
    ApiError, AuthResponse, AuthenticationService, BookingResponse, CreateBookingRequest,
    ListGuidesRequest, ListGuidesResponse, LoginRequest, RegisterRequest, cancel_booking,
    create_booking, list_guides, list_user_bookings, login, logout, register_user,
    translate_persistence_error,
};
use guide_book_persistence::{ConnectionSettings, GuideSeed, Persistence};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::SessionUser;

/// How often expired sessions are removed.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

/// Guide Book Server - HTTP server for the guide booking marketplace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "GUIDE_BOOK_DATABASE")]
    database: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(long, env = "GUIDE_BOOK_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "GUIDE_BOOK_PORT", default_value_t = 3000)]
    port: u16,

    /// How long a statement waits on a locked database, in milliseconds
    #[arg(long, env = "GUIDE_BOOK_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    busy_timeout_ms: u64,

    /// Upper bound on the storage work of a single request, in milliseconds
    #[arg(long, env = "GUIDE_BOOK_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    request_timeout_ms: u64,

    /// JSON file of guides imported at startup when no guides exist
    #[arg(long, env = "GUIDE_BOOK_SEED_GUIDES")]
    seed_guides: Option<PathBuf>,
}

impl Args {
    /// Returns the busy timeout and the request timeout.
    ///
    /// A request must outlive the lock wait, so contention ends as a
    /// conflict before the request timeout turns it into an unavailable.
    fn storage_timeouts(&self) -> Result<(Duration, Duration), String> {
        if self.request_timeout_ms <= self.busy_timeout_ms {
            return Err(format!(
                "request timeout ({} ms) must be greater than busy timeout ({} ms)",
                self.request_timeout_ms, self.busy_timeout_ms
            ));
        }
        Ok((
            Duration::from_millis(self.busy_timeout_ms),
            Duration::from_millis(self.request_timeout_ms),
        ))
    }
}

/// Application state shared across handlers.
///
/// Requests open their own connection from `settings`. The anchor
/// connection lives as long as the server; it keeps shared in-memory
/// databases alive and runs maintenance work.
#[derive(Clone)]
struct AppState {
    anchor: Arc<Mutex<Persistence>>,
    settings: ConnectionSettings,
    request_timeout: Duration,
}

impl AppState {
    fn new(anchor: Persistence, request_timeout: Duration) -> Self {
        let settings: ConnectionSettings = anchor.settings().clone();
        Self {
            anchor: Arc::new(Mutex::new(anchor)),
            settings,
            request_timeout,
        }
    }

    /// Runs blocking storage work on a fresh connection, bounded by the
    /// request timeout.
    ///
    /// A timed-out caller gets `503`, but the blocking task is not cancelled:
    /// work already past its last lock wait can still commit.
    async fn run_blocking<T, F>(&self, operation: F) -> Result<T, HttpError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Persistence) -> Result<T, ApiError> + Send + 'static,
    {
        let settings: ConnectionSettings = self.settings.clone();
        let task = tokio::task::spawn_blocking(move || {
            let mut persistence: Persistence =
                Persistence::connect(&settings).map_err(translate_persistence_error)?;
            operation(&mut persistence)
        });

        match tokio::time::timeout(self.request_timeout, task).await {
            Ok(Ok(result)) => result.map_err(HttpError::from),
            Ok(Err(join_error)) => {
                error!(error = %join_error, "Storage task failed");
                Err(HttpError::internal())
            }
            Err(_) => {
                warn!(
                    timeout = ?self.request_timeout,
                    "Storage work exceeded the request timeout"
                );
                Err(HttpError::unavailable())
            }
        }
    }
}

/// Success envelope: `{"status":"success","data":...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SuccessEnvelope<T> {
    status: String,
    data: T,
}

impl<T: Serialize> SuccessEnvelope<T> {
    fn new(data: T) -> Json<Self> {
        Json(Self {
            status: String::from("success"),
            data,
        })
    }
}

/// Error envelope: `{"status":"error","message":...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorEnvelope {
    status: String,
    message: String,
}

/// A plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageResponse {
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl HttpError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Authentication Required."),
        }
    }

    fn unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: String::from("Service temporarily unavailable"),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("Internal server error"),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorEnvelope> = Json(ErrorEnvelope {
            status: String::from("error"),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. }
            | ApiError::PasswordPolicyViolation { .. }
            | ApiError::SlotNotOffered { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::SlotAlreadyBooked { .. }
            | ApiError::DuplicateEmail { .. }
            | ApiError::Conflict { .. }
            | ApiError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { message } => {
                error!(error = %message, "Internal error");
                return Self::internal();
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<SuccessEnvelope<MessageResponse>> {
    SuccessEnvelope::new(MessageResponse {
        message: String::from("ok"),
    })
}

/// Handler for POST `/auth/register` endpoint.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessEnvelope<AuthResponse>>), HttpError> {
    let Json(request) = payload?;

    let response: AuthResponse = app_state
        .run_blocking(move |persistence| register_user(persistence, &request))
        .await?;

    Ok((StatusCode::CREATED, SuccessEnvelope::new(response)))
}

/// Handler for POST `/auth/login` endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SuccessEnvelope<AuthResponse>>, HttpError> {
    let Json(request) = payload?;

    let response: AuthResponse = app_state
        .run_blocking(move |persistence| login(persistence, &request))
        .await?;

    Ok(SuccessEnvelope::new(response))
}

/// Handler for POST `/auth/logout` endpoint.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    session: SessionUser,
) -> Result<Json<SuccessEnvelope<MessageResponse>>, HttpError> {
    let SessionUser { user, token } = session;

    app_state
        .run_blocking(move |persistence| logout(persistence, &token))
        .await?;

    info!(user_id = %user.user_id, "User logged out");

    Ok(SuccessEnvelope::new(MessageResponse {
        message: String::from("Logged out"),
    }))
}

/// Handler for GET `/guides` endpoint.
async fn handle_list_guides(
    AxumState(app_state): AxumState<AppState>,
    Query(request): Query<ListGuidesRequest>,
) -> Result<Json<SuccessEnvelope<ListGuidesResponse>>, HttpError> {
    let response: ListGuidesResponse = app_state
        .run_blocking(move |persistence| list_guides(persistence, &request))
        .await?;

    Ok(SuccessEnvelope::new(response))
}

/// Handler for GET `/bookings` endpoint.
async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
) -> Result<Json<SuccessEnvelope<Vec<BookingResponse>>>, HttpError> {
    let response: Vec<BookingResponse> = app_state
        .run_blocking(move |persistence| list_user_bookings(persistence, &user))
        .await?;

    Ok(SuccessEnvelope::new(response))
}

/// Handler for POST `/bookings` endpoint.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessEnvelope<BookingResponse>>), HttpError> {
    let Json(request) = payload?;

    let response: BookingResponse = app_state
        .run_blocking(move |persistence| create_booking(persistence, &user, &request))
        .await?;

    Ok((StatusCode::CREATED, SuccessEnvelope::new(response)))
}

/// Handler for POST `/bookings/{booking_id}/cancel` endpoint.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser { user, .. }: SessionUser,
    booking_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessEnvelope<BookingResponse>>, HttpError> {
    let Path(booking_id) = booking_id?;

    let response: BookingResponse = app_state
        .run_blocking(move |persistence| cancel_booking(persistence, &user, booking_id))
        .await?;

    Ok(SuccessEnvelope::new(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/guides", get(handle_list_guides))
        .route(
            "/bookings",
            get(handle_list_bookings).post(handle_create_booking),
        )
        .route("/bookings/{booking_id}/cancel", post(handle_cancel_booking))
        .with_state(app_state)
}

/// Imports a JSON fixture of guides unless guides already exist.
fn seed_guides(
    persistence: &mut Persistence,
    path: &FsPath,
) -> Result<(), Box<dyn std::error::Error>> {
    let existing: u64 = persistence.list_guides(&GuideQuery::default())?.total;
    if existing > 0 {
        info!(existing, "Guides already present, skipping seed import");
        return Ok(());
    }

    let fixture: String = std::fs::read_to_string(path)?;
    let seeds: Vec<GuideSeed> = serde_json::from_str(&fixture)?;
    let imported: usize = persistence.import_guides(&seeds)?.len();

    info!(imported, path = %path.display(), "Imported guide fixture");
    Ok(())
}

/// Periodically deletes expired sessions on the anchor connection.
async fn purge_sessions_periodically(anchor: Arc<Mutex<Persistence>>) {
    let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
    loop {
        interval.tick().await;
        let anchor: Arc<Mutex<Persistence>> = Arc::clone(&anchor);
        let outcome = tokio::task::spawn_blocking(move || {
            let mut persistence = anchor.blocking_lock();
            AuthenticationService::purge_expired_sessions(&mut persistence)
        })
        .await;

        match outcome {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, "Session purge failed"),
            Err(e) => error!(error = %e, "Session purge task failed"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Guide Book Server");

    let (busy_timeout, request_timeout): (Duration, Duration) = args.storage_timeouts()?;
    let settings: ConnectionSettings = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path.display());
        ConnectionSettings::file(db_path)?
    } else {
        info!("Using in-memory database");
        ConnectionSettings::unique_in_memory()
    };

    let mut anchor: Persistence = Persistence::open(settings.with_busy_timeout(busy_timeout))?;

    if let Some(path) = &args.seed_guides {
        seed_guides(&mut anchor, path)?;
    }

    let app_state: AppState = AppState::new(anchor, request_timeout);

    tokio::spawn(purge_sessions_periodically(Arc::clone(&app_state.anchor)));

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

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

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{error, info};

use kazi_api::{
    ActivationConfirmRequest, ActivationConfirmResponse, ActivationInitiateResponse,
    ActivationService, ApiError, AssignTaskRequest, AssignTaskResponse, AuthError,
    AuthenticationService, BidInfo, BidOutcome, BrowseTasksResponse, CreateTaskRequest,
    CreateTaskResponse, InMemoryBlobStore, LoginRequest, LoginResponse, MyBidsResponse,
    PlaceBidRequest, ProfileInfo, RegisterRequest, RegisterResponse, ReviewResponse,
    SimulatedMpesaGateway, SubmitWorkRequest, SubmitWorkResponse, TaskInfo, TransactionInfo,
    WhoAmIResponse, applied_task_ids,
};
use kazi_domain::{Role, Task, TaskId};
use kazi_persistence::{SqlitePersistence, TieredBidStore};

mod refresh;
mod session;

use refresh::{BidCountCache, MAX_CACHE_AGE};
use session::SessionProfile;

/// KaziSoko Server - HTTP server for the KaziSoko marketplace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an
    /// in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Email to grant the Admin role at startup (repeatable). This is
    /// the out-of-band role policy; there is no admin allow-list in
    /// code.
    #[arg(long = "grant-admin")]
    grant_admin: Vec<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The tiered bid store wrapping the persistence layer.
    store: Arc<Mutex<TieredBidStore<SqlitePersistence>>>,
    /// The submission artifact store.
    blob_store: Arc<Mutex<InMemoryBlobStore>>,
    /// The activation payment flow.
    activation: Arc<Mutex<ActivationService<SimulatedMpesaGateway>>>,
    /// The cached bid-count aggregate kept warm by the refresher.
    bid_counts: Arc<RwLock<BidCountCache>>,
}

/// Error body returned by all failing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } | ApiError::PermissionDenied { .. } => {
                StatusCode::FORBIDDEN
            }
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        Self::from(ApiError::from(err))
    }
}

/// Registers a new account.
async fn handle_register(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, HttpError> {
    let mut store = state.store.lock().await;

    let profile = AuthenticationService::register(
        store.primary_mut(),
        &request.email,
        &request.password,
        &request.confirmation,
        request.phone_number.as_deref(),
    )?;

    Ok(Json(RegisterResponse {
        profile: ProfileInfo::from_profile(&profile),
        message: String::from("Account created. Activate to start claiming tasks."),
    }))
}

/// Logs in and issues a session token.
async fn handle_login(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut store = state.store.lock().await;

    let (session_token, _actor, profile) =
        AuthenticationService::login(store.primary_mut(), &request.email, &request.password)?;

    Ok(Json(LoginResponse {
        session_token,
        profile: ProfileInfo::from_profile(&profile),
    }))
}

/// Logs out the current session.
async fn handle_logout(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let token: &str = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing Authorization header"),
        })?;

    let mut store = state.store.lock().await;
    AuthenticationService::logout(store.primary_mut(), token)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the authenticated profile and its gate status.
async fn handle_whoami(SessionProfile(_actor, profile): SessionProfile) -> Json<WhoAmIResponse> {
    Json(ProfileInfo::whoami(&profile))
}

/// Lists open tasks with applicant counts for the browse view.
async fn handle_browse_tasks(
    AxumState(state): AxumState<AppState>,
    SessionProfile(_actor, _profile): SessionProfile,
) -> Result<Json<BrowseTasksResponse>, HttpError> {
    let cached: Option<HashMap<String, u64>> =
        state.bid_counts.read().await.fresh_counts(MAX_CACHE_AGE);

    let mut store = state.store.lock().await;
    let tasks: Vec<TaskInfo> = kazi_api::list_open_tasks(store.primary_mut())?;

    let bid_counts: HashMap<String, u64> = match cached {
        Some(counts) => counts,
        None => {
            // Cache stale or cold: compute inline and warm it.
            let counts: HashMap<String, u64> = kazi_api::aggregate_bid_counts(&mut store)?;
            state.bid_counts.write().await.update(counts.clone());
            counts
        }
    };

    Ok(Json(BrowseTasksResponse { tasks, bid_counts }))
}

/// Posts a new task (admin).
async fn handle_create_task(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
    Json(request): Json<CreateTaskRequest>,
) -> Result<Json<CreateTaskResponse>, HttpError> {
    let mut store = state.store.lock().await;
    let response = kazi_api::create_task(store.primary_mut(), &actor, request)?;
    Ok(Json(response))
}

/// Lists the bids on a task (admin).
async fn handle_list_bids(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
    Path(task_id): Path<String>,
) -> Result<Json<Vec<BidInfo>>, HttpError> {
    let mut store = state.store.lock().await;
    let bids = kazi_api::list_bids_for_task(&mut store, &actor, &TaskId::new(&task_id))?;
    Ok(Json(bids))
}

/// Places a bid on a task (writer).
///
/// Expected business-rule violations come back as a 200 with
/// `accepted: false`; only transport and storage failures are errors.
async fn handle_place_bid(
    AxumState(state): AxumState<AppState>,
    SessionProfile(_actor, profile): SessionProfile,
    Path(task_id): Path<String>,
    Json(request): Json<PlaceBidRequest>,
) -> Result<Json<BidOutcome>, HttpError> {
    let mut store = state.store.lock().await;

    let task: Task = store
        .primary_mut()
        .get_task(&TaskId::new(&task_id))
        .map_err(|e| HttpError::from(kazi_api::translate_persistence_error(e, "Task")))?
        .ok_or_else(|| HttpError {
            status: StatusCode::NOT_FOUND,
            message: format!("Task {task_id} does not exist"),
        })?;

    let outcome: BidOutcome = kazi_api::place_bid(&mut store, &profile, &task, &request.proposal)?;

    Ok(Json(outcome))
}

/// Assigns a task to a writer (admin).
async fn handle_assign_task(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
    Path(task_id): Path<String>,
    Json(request): Json<AssignTaskRequest>,
) -> Result<Json<AssignTaskResponse>, HttpError> {
    let mut store = state.store.lock().await;
    let response =
        kazi_api::assign_task(store.primary_mut(), &actor, &TaskId::new(&task_id), &request)?;
    Ok(Json(response))
}

/// Submits completed work for review (assigned writer).
async fn handle_submit_work(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
    Path(task_id): Path<String>,
    Json(request): Json<SubmitWorkRequest>,
) -> Result<Json<SubmitWorkResponse>, HttpError> {
    let mut store = state.store.lock().await;
    let mut blob_store = state.blob_store.lock().await;

    let response = kazi_api::submit_work(
        store.primary_mut(),
        &mut *blob_store,
        &actor,
        &TaskId::new(&task_id),
        &request,
    )?;

    Ok(Json(response))
}

/// Approves the submission under review (admin).
async fn handle_approve(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
    Path(task_id): Path<String>,
) -> Result<Json<ReviewResponse>, HttpError> {
    let mut store = state.store.lock().await;
    let response = kazi_api::approve_submission(store.primary_mut(), &actor, &TaskId::new(&task_id))?;
    Ok(Json(response))
}

/// Rejects the submission under review (admin).
async fn handle_reject(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
    Path(task_id): Path<String>,
) -> Result<Json<ReviewResponse>, HttpError> {
    let mut store = state.store.lock().await;
    let response = kazi_api::reject_submission(store.primary_mut(), &actor, &TaskId::new(&task_id))?;
    Ok(Json(response))
}

/// Lists the tasks awaiting review (admin).
async fn handle_list_reviews(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
) -> Result<Json<Vec<TaskInfo>>, HttpError> {
    let mut store = state.store.lock().await;
    let reviews = kazi_api::list_reviews(store.primary_mut(), &actor)?;
    Ok(Json(reviews))
}

/// Lists the caller's assigned tasks.
async fn handle_my_jobs(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
) -> Result<Json<Vec<TaskInfo>>, HttpError> {
    let mut store = state.store.lock().await;
    let jobs = kazi_api::list_my_jobs(store.primary_mut(), &actor)?;
    Ok(Json(jobs))
}

/// Lists the caller's own bids and applied-task set.
async fn handle_my_bids(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
) -> Result<Json<MyBidsResponse>, HttpError> {
    let mut store = state.store.lock().await;

    let bids = store
        .bids_for_writer(&actor.id)
        .map_err(|e| HttpError::from(kazi_api::translate_persistence_error(e, "Bid")))?;

    let infos: Vec<BidInfo> = bids
        .iter()
        .map(BidInfo::from_bid)
        .collect::<Result<_, _>>()?;

    Ok(Json(MyBidsResponse {
        applied_task_ids: applied_task_ids(&bids),
        bids: infos,
    }))
}

/// Initiates the activation payment for the caller.
async fn handle_activation_initiate(
    AxumState(state): AxumState<AppState>,
    SessionProfile(_actor, profile): SessionProfile,
) -> Result<Json<ActivationInitiateResponse>, HttpError> {
    let mut activation = state.activation.lock().await;
    let mut store = state.store.lock().await;

    let initiated = activation.initiate_activation(store.primary_mut(), &profile.id)?;

    Ok(Json(ActivationInitiateResponse {
        reference: initiated.reference,
        message: initiated.message,
    }))
}

/// Confirms an activation payment.
///
/// This is the gateway's callback: it authenticates by checkout
/// reference, not by session.
async fn handle_activation_confirm(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<ActivationConfirmRequest>,
) -> Result<Json<ActivationConfirmResponse>, HttpError> {
    let mut activation = state.activation.lock().await;
    let mut store = state.store.lock().await;

    let confirmed = activation.confirm_activation(store.primary_mut(), &request.reference)?;

    Ok(Json(ActivationConfirmResponse {
        profile: ProfileInfo::from_profile(&confirmed.profile),
        already_active: confirmed.already_active,
        message: String::from("Payment confirmed. Your account is active."),
    }))
}

/// Lists the caller's ledger entries.
async fn handle_wallet_transactions(
    AxumState(state): AxumState<AppState>,
    SessionProfile(actor, _profile): SessionProfile,
) -> Result<Json<Vec<TransactionInfo>>, HttpError> {
    let mut store = state.store.lock().await;
    let transactions = kazi_api::list_transactions(store.primary_mut(), &actor)?;
    Ok(Json(transactions))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/whoami", get(handle_whoami))
        .route("/tasks", get(handle_browse_tasks))
        .route("/tasks", post(handle_create_task))
        .route("/tasks/{task_id}/bids", get(handle_list_bids))
        .route("/tasks/{task_id}/bids", post(handle_place_bid))
        .route("/tasks/{task_id}/assign", post(handle_assign_task))
        .route("/tasks/{task_id}/submit", post(handle_submit_work))
        .route("/tasks/{task_id}/approve", post(handle_approve))
        .route("/tasks/{task_id}/reject", post(handle_reject))
        .route("/reviews", get(handle_list_reviews))
        .route("/my/jobs", get(handle_my_jobs))
        .route("/my/bids", get(handle_my_bids))
        .route("/activation/initiate", post(handle_activation_initiate))
        .route("/activation/confirm", post(handle_activation_confirm))
        .route("/wallet/transactions", get(handle_wallet_transactions))
        .with_state(app_state)
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

    info!("Initializing KaziSoko server");

    // Initialize persistence (in-memory or file-based based on CLI)
    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    // Seed the out-of-band role policy
    for email in &args.grant_admin {
        persistence.upsert_role_grant(email, Role::Admin, OffsetDateTime::now_utc())?;
        info!("Granted Admin role to {}", email);
    }

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(TieredBidStore::new(persistence))),
        blob_store: Arc::new(Mutex::new(InMemoryBlobStore::default())),
        activation: Arc::new(Mutex::new(ActivationService::new(SimulatedMpesaGateway))),
        bid_counts: Arc::new(RwLock::new(BidCountCache::new())),
    };

    // Start the jittered bid-count refresher
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresher = refresh::spawn_refresher(
        Arc::clone(&app_state.store),
        Arc::clone(&app_state.bid_counts),
        shutdown_rx,
    );

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    // Stop the refresher on the way out
    let _ = shutdown_tx.send(true);
    refresher.await?;

    Ok(())
}

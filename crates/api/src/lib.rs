// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the KaziSoko marketplace.
//!
//! This crate composes the domain rules, the lifecycle engine, and the
//! persistence layer into the operations the server exposes:
//! registration and sessions, task posting and lifecycle transitions,
//! the bidding subsystem, the activation payment flow, artifact
//! storage, and the wallet view. Errors are translated explicitly at
//! this boundary; domain and persistence errors never leak through
//! unmapped.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod bidding;
mod error;
mod gate;
mod handlers;
mod ids;
mod password_policy;
mod payment;
mod request_response;
mod storage;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use bidding::{WriterBidSet, aggregate_bid_counts, list_bids_for_task, place_bid};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use gate::ensure_may_claim;
pub use handlers::{
    approve_submission, assign_task, create_task, list_my_jobs, list_open_tasks, list_reviews,
    list_transactions, reject_submission, submit_work,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use payment::{
    ACTIVATION_FEE, ActivationConfirmed, ActivationInitiated, ActivationService, GatewayError,
    PaymentGateway, SimulatedMpesaGateway, StkPush,
};
pub use request_response::{
    ActivationConfirmRequest, ActivationConfirmResponse, ActivationInitiateResponse,
    AssignTaskRequest, AssignTaskResponse, BidInfo, BidOutcome, BrowseTasksResponse,
    CreateTaskRequest, CreateTaskResponse, LoginRequest, LoginResponse, MyBidsResponse,
    PlaceBidRequest, ProfileInfo, RegisterRequest, RegisterResponse, ReviewResponse,
    SubmitWorkRequest, SubmitWorkResponse, TaskInfo, TransactionInfo, WhoAmIResponse,
    applied_task_ids,
};
pub use storage::{BlobStore, InMemoryBlobStore, StorageError, StoredArtifact};

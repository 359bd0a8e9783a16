// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::{AuthenticatedActor, AuthenticationService};
use crate::handlers;
use crate::request_response::{CreateTaskRequest, SubmitWorkRequest, TaskInfo};
use crate::storage::InMemoryBlobStore;
use kazi_domain::{Profile, Role, TaskId};
use kazi_persistence::SqlitePersistence;
use time::OffsetDateTime;

/// A password satisfying the default policy.
pub const TEST_PASSWORD: &str = "sturdy-password-9";

/// Creates an in-memory persistence instance.
pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("In-memory database")
}

/// Registers an admin by seeding a role grant first.
pub fn register_admin(persistence: &mut SqlitePersistence, email: &str) -> Profile {
    persistence
        .upsert_role_grant(email, Role::Admin, OffsetDateTime::now_utc())
        .expect("Role grant");
    AuthenticationService::register(persistence, email, TEST_PASSWORD, TEST_PASSWORD, None)
        .expect("Admin registration")
}

/// Registers a writer with a phone number on file.
pub fn register_writer(persistence: &mut SqlitePersistence, email: &str) -> Profile {
    AuthenticationService::register(
        persistence,
        email,
        TEST_PASSWORD,
        TEST_PASSWORD,
        Some("0712345678"),
    )
    .expect("Writer registration")
}

/// Registers a writer and activates it directly in the store.
pub fn register_active_writer(persistence: &mut SqlitePersistence, email: &str) -> Profile {
    let profile: Profile = register_writer(persistence, email);
    persistence
        .activate_profile(&profile.id)
        .expect("Activation");
    persistence
        .get_profile(&profile.id)
        .expect("Profile lookup")
        .expect("Profile exists")
}

/// Builds an actor for a profile.
pub fn actor_for(profile: &Profile) -> AuthenticatedActor {
    AuthenticatedActor::from_profile(profile)
}

/// A representative task posting request.
pub fn sample_task_request() -> CreateTaskRequest {
    CreateTaskRequest {
        title: String::from("5 Blog Posts on Fintech Trends"),
        category: String::from("Content Writing"),
        description: String::from("Write 5 engaging blog posts about mobile money."),
        price_shillings: 2500,
        duration_hours: 48,
    }
}

/// Posts a sample task as the given admin and returns it.
pub fn post_sample_task(
    persistence: &mut SqlitePersistence,
    admin: &AuthenticatedActor,
) -> TaskInfo {
    handlers::create_task(persistence, admin, sample_task_request())
        .expect("Task creation")
        .task
}

/// A representative submission request.
pub fn sample_submission() -> SubmitWorkRequest {
    SubmitWorkRequest {
        notes: String::from("All five drafts attached."),
        file_name: String::from("drafts.zip"),
        content: b"zip bytes".to_vec(),
    }
}

/// Submits sample work for a task as the given writer.
pub fn submit_sample_work(
    persistence: &mut SqlitePersistence,
    writer: &AuthenticatedActor,
    task_id: &TaskId,
) {
    let mut blob_store: InMemoryBlobStore = InMemoryBlobStore::default();
    handlers::submit_work(persistence, &mut blob_store, writer, task_id, &sample_submission())
        .expect("Submission");
}

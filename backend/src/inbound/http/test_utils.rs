//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use crate::domain::ports::FixtureIdentityProvider;
use crate::domain::{AccountService, CastingJobService, UserProfileService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{
    DocumentCastingRepository, DocumentUserRepository, MemoryDocumentStore,
};
use crate::test_support::clock::MutableClock;

/// Build handler state over empty in-memory stores and the fixture identity
/// provider, with time frozen at the fixture timestamp.
pub fn memory_state() -> web::Data<HttpState> {
    memory_state_with_clock(Arc::new(MutableClock::default()))
}

/// As [`memory_state`], driven by the supplied clock.
pub fn memory_state_with_clock(clock: Arc<dyn Clock>) -> web::Data<HttpState> {
    let users = Arc::new(DocumentUserRepository::new(Arc::new(
        MemoryDocumentStore::users(),
    )));
    let jobs = Arc::new(DocumentCastingRepository::new(Arc::new(
        MemoryDocumentStore::casting(),
    )));
    let profile_service = Arc::new(UserProfileService::new(users.clone(), clock.clone()));
    let casting_service = Arc::new(CastingJobService::new(jobs, users, clock));
    let accounts = Arc::new(AccountService::new(Arc::new(FixtureIdentityProvider::new())));

    web::Data::new(HttpState::new(HttpStatePorts {
        users: profile_service.clone(),
        users_query: profile_service,
        casting: casting_service.clone(),
        casting_query: casting_service,
        accounts,
    }))
}

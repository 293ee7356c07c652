//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CastingJobCommand, CastingJobQuery, UserProfileCommand, UserProfileQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserProfileCommand>,
    pub users_query: Arc<dyn UserProfileQuery>,
    pub casting: Arc<dyn CastingJobCommand>,
    pub casting_query: Arc<dyn CastingJobQuery>,
    pub accounts: Arc<dyn AccountCommand>,
}

/// Parameter object bundling the port implementations for [`HttpState`].
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserProfileCommand>,
    pub users_query: Arc<dyn UserProfileQuery>,
    pub casting: Arc<dyn CastingJobCommand>,
    pub casting_query: Arc<dyn CastingJobQuery>,
    pub accounts: Arc<dyn AccountCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            users_query,
            casting,
            casting_query,
            accounts,
        } = ports;
        Self {
            users,
            users_query,
            casting,
            casting_query,
            accounts,
        }
    }
}

impl HttpState {
    /// Construct state from the bundled ports.
    pub fn new(ports: HttpStatePorts) -> Self {
        ports.into()
    }
}

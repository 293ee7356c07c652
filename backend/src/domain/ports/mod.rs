//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod casting_job_command;
mod casting_job_query;
mod casting_repository;
mod identity_provider;
mod user_profile_command;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use casting_job_command::MockCastingJobCommand;
pub use casting_job_command::CastingJobCommand;
#[cfg(test)]
pub use casting_job_query::MockCastingJobQuery;
pub use casting_job_query::CastingJobQuery;
#[cfg(test)]
pub use casting_repository::MockCastingRepository;
pub use casting_repository::{CastingRepository, CastingRepositoryError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FIXTURE_CODE, FixtureIdentityProvider, IdentityProvider, IdentityProviderError,
};
#[cfg(test)]
pub use user_profile_command::MockUserProfileCommand;
pub use user_profile_command::{AppendedEntry, UserProfileCommand};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};

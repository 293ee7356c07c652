//! Builders wiring document stores, identity providers and services into
//! [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use aws_config::SdkConfig;
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::info;

use casting_backend::domain::ports::{AccountCommand, FixtureIdentityProvider};
use casting_backend::domain::{AccountService, CastingJobService, UserProfileService};
use casting_backend::inbound::http::state::{HttpState, HttpStatePorts};
use casting_backend::outbound::identity::CognitoIdentityProvider;
use casting_backend::outbound::persistence::{
    CASTING_KEY, DocumentCastingRepository, DocumentStore, DocumentUserRepository, DynamoStore,
    DynamoTable, MemoryDocumentStore, RECRUITER_ATTRIBUTE, USERNAME_ATTRIBUTE, USERS_KEY,
};
use casting_backend::settings::{IdentityBackend, Settings, SettingsError, StoreBackend};

/// Failure to assemble the handler state at startup.
#[derive(Debug, Error)]
pub enum StateBuildError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// The user and casting document stores.
pub struct Stores {
    pub users: Arc<dyn DocumentStore>,
    pub casting: Arc<dyn DocumentStore>,
}

impl Stores {
    /// Fresh in-process tables.
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryDocumentStore::users()),
            casting: Arc::new(MemoryDocumentStore::casting()),
        }
    }

    /// DynamoDB tables named by `settings`.
    pub fn dynamodb(sdk: &SdkConfig, settings: &Settings) -> Self {
        let client = aws_sdk_dynamodb::Client::new(sdk);
        let users = DynamoTable::new(settings.users_table(), USERS_KEY)
            .with_index(USERNAME_ATTRIBUTE, settings.username_index());
        let casting = DynamoTable::new(settings.casting_table(), CASTING_KEY)
            .with_index(RECRUITER_ATTRIBUTE, settings.recruiter_index());
        Self {
            users: Arc::new(DynamoStore::new(client.clone(), users)),
            casting: Arc::new(DynamoStore::new(client, casting)),
        }
    }
}

/// Wire repositories and services over `stores`, with `accounts` serving the
/// `/auth` endpoints.
pub fn build_http_state_with(
    stores: Stores,
    accounts: Arc<dyn AccountCommand>,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let users = Arc::new(DocumentUserRepository::new(stores.users));
    let jobs = Arc::new(DocumentCastingRepository::new(stores.casting));
    let profiles = Arc::new(UserProfileService::new(users.clone(), clock.clone()));
    let casting = Arc::new(CastingJobService::new(jobs, users, clock));

    web::Data::new(HttpState::new(HttpStatePorts {
        users: profiles.clone(),
        users_query: profiles,
        casting: casting.clone(),
        casting_query: casting,
        accounts,
    }))
}

/// Build the handler state selected by `settings`.
///
/// The AWS SDK configuration is only resolved when a DynamoDB store or the
/// Cognito provider is selected.
pub async fn build_http_state(settings: &Settings) -> Result<web::Data<HttpState>, StateBuildError> {
    let store_backend = settings.store_backend()?;
    let identity_backend = settings.identity_backend()?;
    let sdk = if store_backend == StoreBackend::DynamoDb
        || identity_backend == IdentityBackend::Cognito
    {
        Some(settings.aws_client_config()?.load().await)
    } else {
        None
    };

    let stores = match (store_backend, &sdk) {
        (StoreBackend::DynamoDb, Some(sdk)) => Stores::dynamodb(sdk, settings),
        _ => Stores::memory(),
    };
    let accounts: Arc<dyn AccountCommand> = match (identity_backend, &sdk) {
        (IdentityBackend::Cognito, Some(sdk)) => {
            let client = aws_sdk_cognitoidentityprovider::Client::new(sdk);
            Arc::new(AccountService::new(Arc::new(CognitoIdentityProvider::new(
                client,
                settings.cognito_client_id()?,
            ))))
        }
        _ => Arc::new(AccountService::new(Arc::new(FixtureIdentityProvider::new()))),
    };
    info!(
        store = ?store_backend,
        identity = ?identity_backend,
        "handler state assembled"
    );

    Ok(build_http_state_with(
        stores,
        accounts,
        Arc::new(DefaultClock),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn default_settings_select_in_memory_adapters() {
        let state = build_http_state(&Settings::default()).await;
        assert!(state.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_backends_fail_before_any_client_is_built() {
        let settings = Settings {
            store_backend: Some("sqlite".to_owned()),
            ..Settings::default()
        };
        let result = build_http_state(&settings).await;
        assert!(matches!(
            result,
            Err(StateBuildError::Settings(SettingsError::StoreBackend(_)))
        ));
    }
}

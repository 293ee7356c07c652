//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `CASTING_*` environment variables, an optional config
//! file and command-line flags, layered in that order by OrthoConfig.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::aws::AwsClientConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_USERS_TABLE: &str = "Users";
const DEFAULT_CASTING_TABLE: &str = "CastingJobs";
const DEFAULT_USERNAME_INDEX: &str = "username-index";
const DEFAULT_RECRUITER_INDEX: &str = "recruiterId-index";
const DEFAULT_DATASTORE_TIMEOUT_SECS: u64 = 5;

/// Configuration problems detected after loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address `{0}`")]
    BindAddr(String),
    #[error("unknown store backend `{0}` (expected memory or dynamodb)")]
    StoreBackend(String),
    #[error("unknown identity backend `{0}` (expected fixture or cognito)")]
    IdentityBackend(String),
    #[error("cognito identity backend requires CASTING_COGNITO_CLIENT_ID")]
    MissingCognitoClientId,
    #[error("datastore timeout must be at least one second")]
    ZeroTimeout,
}

/// Where user profiles and casting jobs are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    DynamoDb,
}

impl FromStr for StoreBackend {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "dynamodb" => Ok(Self::DynamoDb),
            _ => Err(SettingsError::StoreBackend(value.to_owned())),
        }
    }
}

/// Which identity provider backs the `/auth` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityBackend {
    Fixture,
    Cognito,
}

impl FromStr for IdentityBackend {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixture" => Ok(Self::Fixture),
            "cognito" => Ok(Self::Cognito),
            _ => Err(SettingsError::IdentityBackend(value.to_owned())),
        }
    }
}

/// Runtime settings for the casting backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CASTING")]
pub struct Settings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// `memory` or `dynamodb`.
    pub store_backend: Option<String>,
    /// DynamoDB table holding user profiles.
    pub users_table: Option<String>,
    /// DynamoDB table holding casting jobs.
    pub casting_table: Option<String>,
    /// Secondary index on `username` in the users table.
    pub username_index: Option<String>,
    /// Secondary index on `recruiterId` in the casting table.
    pub recruiter_index: Option<String>,
    /// `fixture` or `cognito`.
    pub identity_backend: Option<String>,
    /// Cognito app client id; required for the cognito backend.
    pub cognito_client_id: Option<String>,
    /// Overrides the region from the AWS provider chain.
    pub aws_region: Option<String>,
    /// Custom endpoint for every AWS client, e.g. DynamoDB Local.
    pub aws_endpoint_url: Option<String>,
    /// Per-operation timeout for datastore and identity calls.
    #[ortho_config(default = 5)]
    pub datastore_timeout_secs: u64,
}

impl Settings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|_| SettingsError::BindAddr(raw.to_owned()))
    }

    /// Configured store backend; defaults to in-memory.
    pub fn store_backend(&self) -> Result<StoreBackend, SettingsError> {
        self.store_backend
            .as_deref()
            .map_or(Ok(StoreBackend::Memory), str::parse)
    }

    /// Configured identity backend; defaults to the fixture.
    pub fn identity_backend(&self) -> Result<IdentityBackend, SettingsError> {
        self.identity_backend
            .as_deref()
            .map_or(Ok(IdentityBackend::Fixture), str::parse)
    }

    pub fn users_table(&self) -> &str {
        self.users_table.as_deref().unwrap_or(DEFAULT_USERS_TABLE)
    }

    pub fn casting_table(&self) -> &str {
        self.casting_table.as_deref().unwrap_or(DEFAULT_CASTING_TABLE)
    }

    pub fn username_index(&self) -> &str {
        self.username_index
            .as_deref()
            .unwrap_or(DEFAULT_USERNAME_INDEX)
    }

    pub fn recruiter_index(&self) -> &str {
        self.recruiter_index
            .as_deref()
            .unwrap_or(DEFAULT_RECRUITER_INDEX)
    }

    /// Cognito app client id, required once the cognito backend is chosen.
    pub fn cognito_client_id(&self) -> Result<&str, SettingsError> {
        self.cognito_client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(SettingsError::MissingCognitoClientId)
    }

    pub fn datastore_timeout(&self) -> Result<Duration, SettingsError> {
        if self.datastore_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(Duration::from_secs(self.datastore_timeout_secs))
    }

    /// AWS client overrides derived from these settings.
    pub fn aws_client_config(&self) -> Result<AwsClientConfig, SettingsError> {
        Ok(AwsClientConfig::default()
            .with_region(self.aws_region.clone())
            .with_endpoint_url(self.aws_endpoint_url.clone())
            .with_operation_timeout(self.datastore_timeout()?))
    }

    /// Check every derived value so startup fails before binding.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.bind_addr()?;
        self.store_backend()?;
        self.datastore_timeout()?;
        if self.identity_backend()? == IdentityBackend::Cognito {
            self.cognito_client_id()?;
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            store_backend: None,
            users_table: None,
            casting_table: None,
            username_index: None,
            recruiter_index: None,
            identity_backend: None,
            cognito_client_id: None,
            aws_region: None,
            aws_endpoint_url: None,
            datastore_timeout_secs: DEFAULT_DATASTORE_TIMEOUT_SECS,
        }
    }
}

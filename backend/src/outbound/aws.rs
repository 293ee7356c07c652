//! Shared AWS SDK configuration for the DynamoDB and Cognito adapters.

use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::config::Region;

/// Default per-operation timeout applied to every SDK call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Overrides layered on top of the SDK's default provider chain.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use casting_backend::outbound::aws::AwsClientConfig;
///
/// let config = AwsClientConfig::default()
///     .with_region(Some("eu-west-2".to_owned()))
///     .with_operation_timeout(Duration::from_secs(2));
/// assert_eq!(config.region(), Some("eu-west-2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsClientConfig {
    region: Option<String>,
    endpoint_url: Option<String>,
    operation_timeout: Duration,
}

impl Default for AwsClientConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_url: None,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

impl AwsClientConfig {
    /// Override the region resolved from the environment.
    #[must_use]
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    /// Point every client at a custom endpoint, e.g. DynamoDB Local.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: Option<String>) -> Self {
        self.endpoint_url = endpoint_url;
        self
    }

    /// Set the per-operation timeout.
    #[must_use]
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Region override, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Endpoint override, if any.
    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Per-operation timeout.
    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    /// Resolve credentials and region and build the shared SDK config.
    pub async fn load(&self) -> SdkConfig {
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(self.operation_timeout)
            .build();
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(timeouts);
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        loader.load().await
    }
}

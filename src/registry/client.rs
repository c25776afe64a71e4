// ECR control-plane client. Credentials come from the ambient AWS chain
// (environment, profile files, instance metadata) for the operator's region.

use crate::error::{MirrorError, REPOSITORY_ALREADY_EXISTS, Result};
use crate::logging::Logger;
use crate::registry::{AuthGrant, ContainerRegistry, RepositoryStatus};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_ecr::Client;
use aws_sdk_ecr::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecr::operation::create_repository::CreateRepositoryError;
use aws_sdk_ecr::operation::get_authorization_token::GetAuthorizationTokenOutput;
use aws_types::region::Region;

pub struct EcrRegistry {
    client: Client,
}

impl EcrRegistry {
    /// Build a client for `region`. Credentials are resolved immediately and a
    /// broken chain is reported here.
    pub async fn connect(region: &str, output: &Logger) -> Result<Self> {
        output.step(&format!("Loading AWS configuration for region {}", region));

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        let provider = sdk_config.credentials_provider().ok_or_else(|| {
            MirrorError::Credentials("no AWS credentials provider configured".to_string())
        })?;
        let credentials = provider.provide_credentials().await.map_err(|e| {
            MirrorError::Credentials(format!(
                "unable to load AWS credentials: {}",
                DisplayErrorContext(&e)
            ))
        })?;
        output.detail(&format!(
            "Resolved credentials for access key {}",
            mask(credentials.access_key_id())
        ));

        Ok(Self {
            client: Client::new(&sdk_config),
        })
    }
}

#[async_trait]
impl ContainerRegistry for EcrRegistry {
    async fn authorization_grant(&self) -> Result<AuthGrant> {
        let response = self
            .client
            .get_authorization_token()
            .send()
            .await
            .map_err(|e| {
                MirrorError::control_plane("GetAuthorizationToken", DisplayErrorContext(&e).to_string())
            })?;

        grant_from_output(&response)
    }

    async fn create_repository(&self, name: &str) -> Result<RepositoryStatus> {
        let result = self
            .client
            .create_repository()
            .repository_name(name)
            .send()
            .await;

        repository_status(result)
    }
}

/// Take the first authorization entry; the token and endpoint are both required.
fn grant_from_output(output: &GetAuthorizationTokenOutput) -> Result<AuthGrant> {
    let data = output.authorization_data().first().ok_or_else(|| {
        MirrorError::Credentials("authorization response contained no data".to_string())
    })?;

    let token = data.authorization_token().ok_or_else(|| {
        MirrorError::Credentials("authorization data has no token".to_string())
    })?;
    let endpoint = data.proxy_endpoint().ok_or_else(|| {
        MirrorError::Credentials("authorization data has no proxy endpoint".to_string())
    })?;

    Ok(AuthGrant::new(token, endpoint).with_expires_at(data.expires_at().map(|t| t.secs())))
}

/// Map a `CreateRepository` outcome, treating an existing repository as success.
fn repository_status<O, R>(
    result: std::result::Result<O, SdkError<CreateRepositoryError, R>>,
) -> Result<RepositoryStatus>
where
    R: std::fmt::Debug,
{
    let err = match result {
        Ok(_) => return Ok(RepositoryStatus::Created),
        Err(err) => err,
    };

    let already_exists = match err.as_service_error() {
        Some(service) => {
            service.is_repository_already_exists_exception()
                || service.code() == Some(REPOSITORY_ALREADY_EXISTS)
        }
        None => false,
    };

    if already_exists {
        Ok(RepositoryStatus::AlreadyExists)
    } else {
        Err(MirrorError::control_plane(
            "CreateRepository",
            DisplayErrorContext(&err).to_string(),
        ))
    }
}

fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{}****", visible)
}

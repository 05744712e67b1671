//! Configuration version operations.
//!
//! Versions are immutable snapshots of a configuration. New versions are
//! created by cloning an existing one.

use crate::client::AppsecClient;
use crate::Result;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Network deployment state of a configuration version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionDeployment {
    /// Deployment status, for example `Active` or `Inactive`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// When the version reached this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

/// A configuration version as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigurationVersion {
    /// Configuration ID
    pub config_id: u64,
    /// Configuration name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub config_name: String,
    /// Version number
    pub version: u64,
    /// Notes attached to the version
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version_notes: String,
    /// When the version was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_date: Option<DateTime<Utc>>,
    /// Who created the version
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    /// Version this one was cloned from, zero for the first version
    pub based_on: u64,
    /// Production deployment state
    pub production: VersionDeployment,
    /// Staging deployment state
    pub staging: VersionDeployment,
}

/// Request parameters for [`AppsecClient::get_configuration_versions`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetConfigurationVersionsRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
}

/// Response for [`AppsecClient::get_configuration_versions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetConfigurationVersionsResponse {
    /// Configuration ID
    pub config_id: u64,
    /// Configuration name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub config_name: String,
    /// Most recently created version
    pub last_created_version: u64,
    /// Versions of the configuration
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub version_list: Vec<ConfigurationVersion>,
}

/// Request parameters for [`AppsecClient::get_configuration_version`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetConfigurationVersionRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Version number
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
}

/// Request parameters for [`AppsecClient::create_configuration_version_clone`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationVersionCloneRequest {
    /// Configuration ID
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Version to clone from
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub create_from_version: u64,
    /// Whether to pull in the latest Kona rule set updates
    pub rule_update: bool,
}

impl AppsecClient {
    /// List the versions of a configuration.
    pub async fn get_configuration_versions(
        &self,
        params: &GetConfigurationVersionsRequest,
    ) -> Result<GetConfigurationVersionsResponse> {
        debug!("get_configuration_versions");
        params.validate()?;

        let uri = format!("/appsec/v1/configs/{}/versions", params.config_id);

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Return the specified configuration version.
    pub async fn get_configuration_version(
        &self,
        params: &GetConfigurationVersionRequest,
    ) -> Result<ConfigurationVersion> {
        debug!("get_configuration_version");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}",
            params.config_id, params.version,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Create a new version of a configuration by cloning an existing one.
    pub async fn create_configuration_version_clone(
        &self,
        params: &CreateConfigurationVersionCloneRequest,
    ) -> Result<ConfigurationVersion> {
        debug!("create_configuration_version_clone");
        params.validate()?;

        let uri = format!("/appsec/v1/configs/{}/versions", params.config_id);

        self.session
            .execute(
                Method::POST,
                &uri,
                &[],
                Some(params),
                &[StatusCode::OK, StatusCode::CREATED],
            )
            .await
    }
}

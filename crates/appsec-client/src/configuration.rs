//! Security configuration operations.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// A security configuration as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    /// Configuration ID
    pub id: u64,
    /// Configuration name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Configuration description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// File type of the configuration
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_type: String,
    /// Most recently created version
    pub latest_version: u64,
    /// Version currently active on staging, zero when none
    pub staging_version: u64,
    /// Version currently active on production, zero when none
    pub production_version: u64,
    /// Product the configuration targets
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_product: String,
    /// Hostnames protected on production
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub production_hostnames: Vec<String>,
}

/// Response for [`AppsecClient::get_configurations`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetConfigurationsResponse {
    /// Configurations visible to the caller
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<Configuration>,
}

/// Request parameters for [`AppsecClient::get_configuration`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetConfigurationRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
}

/// Response for [`AppsecClient::get_configuration`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetConfigurationResponse {
    /// The requested configuration, wrapped in a single-element list
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<Configuration>,
}

/// Request parameters for [`AppsecClient::create_configuration`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationRequest {
    /// Configuration name
    pub name: String,
    /// Configuration description
    pub description: String,
    /// Contract the configuration is billed under
    pub contract_id: String,
    /// Group the configuration belongs to
    pub group_id: u64,
    /// Hostnames to protect
    pub hostnames: Vec<String>,
}

/// Response for [`AppsecClient::create_configuration`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateConfigurationResponse {
    /// Configuration ID assigned by the API
    pub config_id: u64,
    /// Initial version number
    pub version: u64,
    /// Configuration name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Configuration description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Request parameters for [`AppsecClient::update_configuration`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigurationRequest {
    /// Configuration ID
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// New configuration name
    pub name: String,
    /// New configuration description
    pub description: String,
}

/// Response for [`AppsecClient::update_configuration`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateConfigurationResponse {
    /// Configuration name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Configuration description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Request parameters for [`AppsecClient::remove_configuration`].
#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveConfigurationRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
}

/// Response for [`AppsecClient::remove_configuration`]. The API returns no
/// body on success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveConfigurationResponse {}

impl AppsecClient {
    /// List all security configurations visible to the caller.
    pub async fn get_configurations(&self) -> Result<GetConfigurationsResponse> {
        debug!("get_configurations");

        self.session
            .execute::<(), _>(Method::GET, "/appsec/v1/configs", &[], None, &[StatusCode::OK])
            .await
    }

    /// Return the specified security configuration.
    pub async fn get_configuration(
        &self,
        params: &GetConfigurationRequest,
    ) -> Result<GetConfigurationResponse> {
        debug!("get_configuration");
        params.validate()?;

        let uri = format!("/appsec/v1/configs/{}", params.config_id);

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Create a new security configuration.
    pub async fn create_configuration(
        &self,
        params: &CreateConfigurationRequest,
    ) -> Result<CreateConfigurationResponse> {
        debug!("create_configuration");
        params.validate()?;

        self.session
            .execute(
                Method::POST,
                "/appsec/v1/configs",
                &[],
                Some(params),
                &[StatusCode::OK, StatusCode::CREATED],
            )
            .await
    }

    /// Rename a configuration or change its description.
    pub async fn update_configuration(
        &self,
        params: &UpdateConfigurationRequest,
    ) -> Result<UpdateConfigurationResponse> {
        debug!("update_configuration");
        params.validate()?;

        let uri = format!("/appsec/v1/configs/{}", params.config_id);

        self.session
            .execute(
                Method::PUT,
                &uri,
                &[],
                Some(params),
                &[StatusCode::OK, StatusCode::CREATED],
            )
            .await
    }

    /// Delete the specified security configuration.
    pub async fn remove_configuration(
        &self,
        params: &RemoveConfigurationRequest,
    ) -> Result<RemoveConfigurationResponse> {
        debug!("remove_configuration");
        params.validate()?;

        let uri = format!("/appsec/v1/configs/{}", params.config_id);

        self.session
            .execute::<(), _>(
                Method::DELETE,
                &uri,
                &[],
                None,
                &[StatusCode::OK, StatusCode::NO_CONTENT],
            )
            .await
    }
}

//! WAF mode operations.
//!
//! The mode controls how a policy's rule sets are kept up to date, for
//! example `KRS` for manual upgrades or `AAG` for automatic ones.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Request parameters for [`AppsecClient::get_waf_mode`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetWafModeRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Policy ID
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub policy_id: String,
}

/// Response for [`AppsecClient::get_waf_mode`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetWafModeResponse {
    /// Rule set version currently in use
    #[serde(skip_serializing_if = "String::is_empty")]
    pub current: String,
    /// Upgrade mode
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mode: String,
    /// Whether an evaluation rule set is enabled
    #[serde(skip_serializing_if = "String::is_empty")]
    pub eval: String,
    /// Rule set version under evaluation
    #[serde(skip_serializing_if = "String::is_empty")]
    pub evaluating: String,
    /// When the evaluation period ends
    #[serde(skip_serializing_if = "String::is_empty")]
    pub expires: String,
}

/// Request parameters for [`AppsecClient::update_waf_mode`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWafModeRequest {
    /// Configuration ID
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Policy ID
    #[serde(skip)]
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub policy_id: String,
    /// New upgrade mode
    pub mode: String,
}

/// Response for [`AppsecClient::update_waf_mode`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateWafModeResponse {
    /// Rule set version currently in use
    #[serde(skip_serializing_if = "String::is_empty")]
    pub current: String,
    /// Upgrade mode
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mode: String,
}

impl AppsecClient {
    /// Return the rule set upgrade mode for a security policy.
    pub async fn get_waf_mode(&self, params: &GetWafModeRequest) -> Result<GetWafModeResponse> {
        debug!("get_waf_mode");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/mode",
            params.config_id, params.version, params.policy_id,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Change the rule set upgrade mode for a security policy.
    pub async fn update_waf_mode(
        &self,
        params: &UpdateWafModeRequest,
    ) -> Result<UpdateWafModeResponse> {
        debug!("update_waf_mode");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/mode",
            params.config_id, params.version, params.policy_id,
        );

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
}

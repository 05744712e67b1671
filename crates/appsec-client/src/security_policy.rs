//! Security policy operations.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Which protection classes a security policy applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicySecurityControls {
    /// Application layer (WAF) controls
    pub apply_application_layer_controls: bool,
    /// Network layer (IP/Geo) controls
    pub apply_network_layer_controls: bool,
    /// Rate controls
    pub apply_rate_controls: bool,
    /// Reputation controls
    pub apply_reputation_controls: bool,
    /// Bot management controls
    pub apply_botman_controls: bool,
    /// API constraint controls
    #[serde(rename = "applyApiConstraints")]
    pub apply_api_constraints: bool,
    /// Slow POST controls
    pub apply_slow_post_controls: bool,
}

/// A security policy as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityPolicy {
    /// Policy ID
    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy_id: String,
    /// Policy name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy_name: String,
    /// Whether the policy carries a rate policy keyed on an API key
    #[serde(rename = "hasRatePolicyWithApiKey")]
    pub has_rate_policy_with_api_key: bool,
    /// Protection classes the policy applies
    pub policy_security_controls: PolicySecurityControls,
}

/// Request parameters for [`AppsecClient::get_security_policies`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetSecurityPoliciesRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// When non-empty, filters the listing to this policy name
    pub policy_name: String,
}

/// Response for [`AppsecClient::get_security_policies`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetSecurityPoliciesResponse {
    /// Configuration ID
    pub config_id: u64,
    /// Configuration version
    pub version: u64,
    /// Security policies defined for the configuration version
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<SecurityPolicy>,
}

/// Request parameters for [`AppsecClient::get_security_policy`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetSecurityPolicyRequest {
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

/// Response for [`AppsecClient::get_security_policy`] and the policy
/// mutation calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityPolicyResponse {
    /// Configuration ID
    pub config_id: u64,
    /// Configuration version
    pub version: u64,
    /// Policy ID
    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy_id: String,
    /// Policy name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy_name: String,
    /// Whether the policy was created with default settings
    pub default_settings: bool,
    /// Protection classes the policy applies
    pub policy_security_controls: PolicySecurityControls,
}

/// Request parameters for [`AppsecClient::create_security_policy`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecurityPolicyRequest {
    /// Configuration ID
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Policy name
    pub policy_name: String,
    /// Four-character prefix the policy ID is derived from
    pub policy_prefix: String,
    /// Whether to start from the default protection settings
    pub default_settings: bool,
}

/// Request parameters for [`AppsecClient::update_security_policy`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecurityPolicyRequest {
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
    /// New policy name
    pub policy_name: String,
}

/// Request parameters for [`AppsecClient::remove_security_policy`].
#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveSecurityPolicyRequest {
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

impl AppsecClient {
    /// List the security policies for a configuration version.
    ///
    /// When `policy_name` is non-empty the listing is filtered client-side
    /// to policies with that exact name.
    pub async fn get_security_policies(
        &self,
        params: &GetSecurityPoliciesRequest,
    ) -> Result<GetSecurityPoliciesResponse> {
        debug!("get_security_policies");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies",
            params.config_id, params.version,
        );

        let mut result: GetSecurityPoliciesResponse = self
            .session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await?;

        if !params.policy_name.is_empty() {
            result
                .policies
                .retain(|policy| policy.policy_name == params.policy_name);
        }

        Ok(result)
    }

    /// Return the specified security policy.
    pub async fn get_security_policy(
        &self,
        params: &GetSecurityPolicyRequest,
    ) -> Result<SecurityPolicyResponse> {
        debug!("get_security_policy");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}",
            params.config_id, params.version, params.policy_id,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Create a new security policy.
    pub async fn create_security_policy(
        &self,
        params: &CreateSecurityPolicyRequest,
    ) -> Result<SecurityPolicyResponse> {
        debug!("create_security_policy");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies",
            params.config_id, params.version,
        );

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

    /// Rename a security policy.
    pub async fn update_security_policy(
        &self,
        params: &UpdateSecurityPolicyRequest,
    ) -> Result<SecurityPolicyResponse> {
        debug!("update_security_policy");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}",
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

    /// Delete the specified security policy.
    pub async fn remove_security_policy(
        &self,
        params: &RemoveSecurityPolicyRequest,
    ) -> Result<SecurityPolicyResponse> {
        debug!("remove_security_policy");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}",
            params.config_id, params.version, params.policy_id,
        );

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

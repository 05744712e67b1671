//! Rate policy operations.
//!
//! Rate policies limit request rates by client identifier for a specific
//! configuration version. Create and update calls pass the policy definition
//! through as a raw JSON document, matching the API's schema-heavy payloads.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

/// Path and file-extension match criteria used in a rate policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RatePolicyMatchValues {
    /// Whether the listed values are a positive match
    pub positive_match: bool,
    /// Values to match against
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Additional match option used in a rate policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RatePolicyMatchOption {
    /// Whether the listed values are a positive match
    pub positive_match: bool,
    /// Option type
    #[serde(skip_serializing_if = "String::is_empty")]
    pub r#type: String,
    /// Values to match against
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Query parameter match criteria used in a rate policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RatePolicyQueryParameter {
    /// Parameter name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Values to match against
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Whether the listed values are a positive match
    pub positive_match: bool,
    /// Whether values are interpreted as a numeric range
    pub value_in_range: bool,
}

/// A rate policy as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RatePolicy {
    /// Rate policy ID
    pub id: u64,
    /// Configuration ID
    pub config_id: u64,
    /// Configuration version
    pub config_version: u64,
    /// How request criteria are matched
    #[serde(skip_serializing_if = "String::is_empty")]
    pub match_type: String,
    /// Policy type
    #[serde(skip_serializing_if = "String::is_empty")]
    pub r#type: String,
    /// Policy name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Policy description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Sustained requests-per-second threshold
    pub average_threshold: u32,
    /// Burst requests threshold
    pub burst_threshold: u32,
    /// Burst measurement window in seconds
    #[serde(skip_serializing_if = "is_zero")]
    pub burst_window: u32,
    /// Client identifiers the counter is keyed on
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub client_identifiers: Vec<String>,
    /// Whether X-Forwarded-For headers are honored
    pub use_x_forward_for_headers: bool,
    /// Which request phase the policy counts
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_type: String,
    /// Whether the same action applies to IPv6 clients
    pub same_action_on_ipv6: bool,
    /// Path match criteria
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<RatePolicyMatchValues>,
    /// Path match type
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path_match_type: String,
    /// Whether the path URI is a positive match
    pub path_uri_positive_match: bool,
    /// File extension match criteria
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_extensions: Option<RatePolicyMatchValues>,
    /// Hostnames the policy applies to
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<String>,
    /// Additional match options
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_match_options: Vec<RatePolicyMatchOption>,
    /// Query parameter match criteria
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query_parameters: Vec<RatePolicyQueryParameter>,
    /// How the counter aggregates requests
    #[serde(skip_serializing_if = "String::is_empty")]
    pub counter_type: String,
    /// How long offending clients stay in the penalty box
    #[serde(skip_serializing_if = "String::is_empty")]
    pub penalty_box_duration: String,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Request parameters for [`AppsecClient::get_rate_policies`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetRatePoliciesRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_version: u64,
    /// When non-zero, filters the listing to this rate policy
    pub rate_policy_id: u64,
}

/// Response for [`AppsecClient::get_rate_policies`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetRatePoliciesResponse {
    /// Rate policies defined for the configuration version
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rate_policies: Vec<RatePolicy>,
}

/// Request parameters for [`AppsecClient::get_rate_policy`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetRatePolicyRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_version: u64,
    /// Rate policy ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub rate_policy_id: u64,
}

/// Request parameters for [`AppsecClient::create_rate_policy`].
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateRatePolicyRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_version: u64,
    /// Rate policy definition, passed through verbatim
    pub payload: Value,
}

/// Request parameters for [`AppsecClient::update_rate_policy`].
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateRatePolicyRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_version: u64,
    /// Rate policy ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub rate_policy_id: u64,
    /// Rate policy definition, passed through verbatim
    pub payload: Value,
}

/// Request parameters for [`AppsecClient::remove_rate_policy`].
#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveRatePolicyRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_version: u64,
    /// Rate policy ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub rate_policy_id: u64,
}

impl AppsecClient {
    /// List the rate policies for a configuration version.
    ///
    /// When `rate_policy_id` is non-zero the listing is filtered client-side
    /// to that policy.
    pub async fn get_rate_policies(
        &self,
        params: &GetRatePoliciesRequest,
    ) -> Result<GetRatePoliciesResponse> {
        debug!("get_rate_policies");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/rate-policies",
            params.config_id, params.config_version,
        );

        let result: GetRatePoliciesResponse = self
            .session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await?;

        if params.rate_policy_id != 0 {
            return Ok(GetRatePoliciesResponse {
                rate_policies: result
                    .rate_policies
                    .into_iter()
                    .filter(|policy| policy.id == params.rate_policy_id)
                    .collect(),
            });
        }

        Ok(result)
    }

    /// Return the specified rate policy.
    pub async fn get_rate_policy(&self, params: &GetRatePolicyRequest) -> Result<RatePolicy> {
        debug!("get_rate_policy");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/rate-policies/{}",
            params.config_id, params.config_version, params.rate_policy_id,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Create a new rate policy for a configuration version.
    pub async fn create_rate_policy(&self, params: &CreateRatePolicyRequest) -> Result<RatePolicy> {
        debug!("create_rate_policy");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/rate-policies",
            params.config_id, params.config_version,
        );

        self.session
            .execute(
                Method::POST,
                &uri,
                &[],
                Some(&params.payload),
                &[StatusCode::OK, StatusCode::CREATED],
            )
            .await
    }

    /// Update the details of a specific rate policy.
    pub async fn update_rate_policy(&self, params: &UpdateRatePolicyRequest) -> Result<RatePolicy> {
        debug!("update_rate_policy");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/rate-policies/{}",
            params.config_id, params.config_version, params.rate_policy_id,
        );

        self.session
            .execute(
                Method::PUT,
                &uri,
                &[],
                Some(&params.payload),
                &[StatusCode::OK, StatusCode::CREATED],
            )
            .await
    }

    /// Delete the specified rate policy.
    pub async fn remove_rate_policy(&self, params: &RemoveRatePolicyRequest) -> Result<RatePolicy> {
        debug!("remove_rate_policy");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/rate-policies/{}",
            params.config_id, params.config_version, params.rate_policy_id,
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

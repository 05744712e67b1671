//! Bypass network list operations.
//!
//! Bypass network lists name the networks whose traffic skips WAF
//! inspection for a security policy. Updates replace the whole list.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// A network list referenced by ID and name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkList {
    /// Network list ID
    pub id: String,
    /// Network list name
    pub name: String,
}

/// Request parameters for [`AppsecClient::get_bypass_network_lists`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetBypassNetworkListsRequest {
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

/// Response for [`AppsecClient::get_bypass_network_lists`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetBypassNetworkListsResponse {
    /// Network lists whose traffic bypasses inspection
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network_lists: Vec<NetworkList>,
}

/// Request parameters for [`AppsecClient::update_bypass_network_lists`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBypassNetworkListsRequest {
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
    /// Replacement network list IDs
    pub network_lists: Vec<String>,
}

/// Network list IDs grouped under a control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IpNetworkLists {
    /// Network list IDs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network_list: Vec<String>,
}

/// Geographic controls affected by the bypass lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoControls {
    /// Blocked geographic network lists
    #[serde(rename = "networkList")]
    pub blocked_ip_network_lists: IpNetworkLists,
}

/// IP controls affected by the bypass lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IpControls {
    /// Allowed IP network lists
    #[serde(rename = "allowedIPNetworkLists")]
    pub allowed_ip_network_lists: IpNetworkLists,
    /// Blocked IP network lists
    #[serde(rename = "blockedIPNetworkLists")]
    pub blocked_ip_network_lists: IpNetworkLists,
}

/// Response for [`AppsecClient::update_bypass_network_lists`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateBypassNetworkListsResponse {
    /// Block setting in effect
    #[serde(skip_serializing_if = "String::is_empty")]
    pub block: String,
    /// Geographic controls in effect
    pub geo_controls: GeoControls,
    /// IP controls in effect
    pub ip_controls: IpControls,
}

impl AppsecClient {
    /// Return the bypass network lists for a security policy.
    pub async fn get_bypass_network_lists(
        &self,
        params: &GetBypassNetworkListsRequest,
    ) -> Result<GetBypassNetworkListsResponse> {
        debug!("get_bypass_network_lists");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/bypass-network-lists",
            params.config_id, params.version, params.policy_id,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Replace the bypass network lists for a security policy.
    pub async fn update_bypass_network_lists(
        &self,
        params: &UpdateBypassNetworkListsRequest,
    ) -> Result<UpdateBypassNetworkListsResponse> {
        debug!("update_bypass_network_lists");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/bypass-network-lists",
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

//! Policy protection operations.
//!
//! Protections are the per-policy switches that turn each protection class
//! on or off.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Request parameters for [`AppsecClient::get_policy_protections`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetPolicyProtectionsRequest {
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

/// Request parameters for [`AppsecClient::update_policy_protections`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyProtectionsRequest {
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
    /// API constraint controls
    #[serde(rename = "applyApiConstraints")]
    pub apply_api_constraints: bool,
    /// Application layer (WAF) controls
    pub apply_application_layer_controls: bool,
    /// Bot management controls
    pub apply_botman_controls: bool,
    /// Malware controls
    pub apply_malware_controls: bool,
    /// Network layer (IP/Geo) controls
    pub apply_network_layer_controls: bool,
    /// Rate controls
    pub apply_rate_controls: bool,
    /// Reputation controls
    pub apply_reputation_controls: bool,
    /// Slow POST controls
    pub apply_slow_post_controls: bool,
}

/// Protection settings for a security policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyProtections {
    /// API constraint controls
    #[serde(rename = "applyApiConstraints")]
    pub apply_api_constraints: bool,
    /// Application layer (WAF) controls
    pub apply_application_layer_controls: bool,
    /// Bot management controls
    pub apply_botman_controls: bool,
    /// Malware controls
    pub apply_malware_controls: bool,
    /// Network layer (IP/Geo) controls
    pub apply_network_layer_controls: bool,
    /// Rate controls
    pub apply_rate_controls: bool,
    /// Reputation controls
    pub apply_reputation_controls: bool,
    /// Slow POST controls
    pub apply_slow_post_controls: bool,
}

impl AppsecClient {
    /// Return the protection settings for a security policy.
    pub async fn get_policy_protections(
        &self,
        params: &GetPolicyProtectionsRequest,
    ) -> Result<PolicyProtections> {
        debug!("get_policy_protections");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/protections",
            params.config_id, params.version, params.policy_id,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Replace the protection settings for a security policy.
    pub async fn update_policy_protections(
        &self,
        params: &UpdatePolicyProtectionsRequest,
    ) -> Result<PolicyProtections> {
        debug!("update_policy_protections");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/protections",
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

#[cfg(test)]
mod tests {
    use super::*;
    use appsec_core::Error;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> AppsecClient {
        AppsecClient::new(server.uri()).unwrap()
    }

    #[tokio::test]
    async fn get_policy_protections_decodes_switches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/appsec/v1/configs/43253/versions/15/security-policies/AAAA_81230/protections",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "applyApiConstraints": true,
                "applyApplicationLayerControls": true,
                "applyRateControls": true
            })))
            .mount(&server)
            .await;

        let protections = test_client(&server)
            .get_policy_protections(&GetPolicyProtectionsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
            })
            .await
            .unwrap();
        assert!(protections.apply_api_constraints);
        assert!(protections.apply_rate_controls);
        assert!(!protections.apply_malware_controls);
    }

    #[tokio::test]
    async fn update_policy_protections_sends_full_switch_set() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(
                "/appsec/v1/configs/43253/versions/15/security-policies/AAAA_81230/protections",
            ))
            .and(body_json(json!({
                "applyApiConstraints": false,
                "applyApplicationLayerControls": true,
                "applyBotmanControls": false,
                "applyMalwareControls": true,
                "applyNetworkLayerControls": false,
                "applyRateControls": true,
                "applyReputationControls": false,
                "applySlowPostControls": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "applyApplicationLayerControls": true,
                "applyMalwareControls": true,
                "applyRateControls": true
            })))
            .mount(&server)
            .await;

        let protections = test_client(&server)
            .update_policy_protections(&UpdatePolicyProtectionsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
                apply_application_layer_controls: true,
                apply_malware_controls: true,
                apply_rate_controls: true,
                ..UpdatePolicyProtectionsRequest::default()
            })
            .await
            .unwrap();
        assert!(protections.apply_malware_controls);
    }

    #[tokio::test]
    async fn update_policy_protections_requires_policy_id() {
        let server = MockServer::start().await;
        let err = test_client(&server)
            .update_policy_protections(&UpdatePolicyProtectionsRequest {
                config_id: 43253,
                version: 15,
                ..UpdatePolicyProtectionsRequest::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("policy_id"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

//! Configuration activation operations.
//!
//! Activations deploy one or more configuration versions to the staging or
//! production network. The API processes them asynchronously; callers poll
//! the activation status until it settles.

use crate::client::AppsecClient;
use crate::Result;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Activation action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationAction {
    /// Deploy the configuration version
    #[default]
    Activate,
    /// Withdraw the configuration version
    Deactivate,
}

/// Network an activation targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationNetwork {
    /// Staging network
    #[default]
    Staging,
    /// Production network
    Production,
}

/// Activation status reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStatus {
    /// The request has been received but not started
    #[default]
    Received,
    /// The request is new
    New,
    /// The configuration is live on the target network
    Activated,
    /// The configuration is not active
    Inactive,
    /// The request was aborted
    Aborted,
    /// The request failed
    Failed,
    /// The configuration has been deactivated
    Deactivated,
    /// A deactivation is in progress
    PendingDeactivation,
}

/// A configuration version included in an activation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivationConfig {
    /// Configuration ID
    pub config_id: u64,
    /// Version to deploy
    pub config_version: u64,
}

/// A configuration version as reported in activation status responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivatedConfig {
    /// Configuration ID
    pub config_id: u64,
    /// Configuration name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub config_name: String,
    /// Deployed version
    pub config_version: u64,
    /// Version that was live before this activation
    pub previous_config_version: u64,
}

/// Status of an activation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivationResponse {
    /// Activation ID
    pub activation_id: u64,
    /// Requested action
    pub action: ActivationAction,
    /// Current status
    pub status: ActivationStatus,
    /// Target network
    pub network: ActivationNetwork,
    /// Estimated time to completion
    #[serde(skip_serializing_if = "String::is_empty")]
    pub estimate: String,
    /// Internal dispatch counter
    pub dispatch_count: u64,
    /// Who requested the activation
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    /// When the activation was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_date: Option<DateTime<Utc>>,
    /// Configuration versions covered by the activation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activation_configs: Vec<ActivatedConfig>,
}

/// Request parameters for [`AppsecClient::get_activations`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetActivationsRequest {
    /// Activation ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub activation_id: u64,
}

/// Request parameters for [`AppsecClient::create_activations`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivationsRequest {
    /// Whether to activate or deactivate
    pub action: ActivationAction,
    /// Target network
    pub network: ActivationNetwork,
    /// Note recorded with the activation
    pub note: String,
    /// Addresses notified when the activation completes
    pub notification_emails: Vec<String>,
    /// Configuration versions to deploy
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub activation_configs: Vec<ActivationConfig>,
}

/// Request parameters for [`AppsecClient::get_activation_history`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetActivationHistoryRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
}

/// A past activation of a configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivationHistoryEntry {
    /// Activation ID
    pub activation_id: u64,
    /// Activated version
    pub version: u64,
    /// Final status of the activation
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// Network the activation targeted
    #[serde(rename = "Network", skip_serializing_if = "String::is_empty")]
    pub network: String,
    /// Who requested the activation
    #[serde(skip_serializing_if = "String::is_empty")]
    pub activated_by: String,
    /// When the activation happened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_date: Option<DateTime<Utc>>,
    /// Note recorded with the activation
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    /// Addresses notified on completion
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notification_emails: Vec<String>,
}

/// Response for [`AppsecClient::get_activation_history`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetActivationHistoryResponse {
    /// Configuration ID
    pub config_id: u64,
    /// Past activations, most recent first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activation_history: Vec<ActivationHistoryEntry>,
}

impl AppsecClient {
    /// Return the status of an activation request.
    ///
    /// The `updateLatestNetworkStatus` query flag asks the API to refresh
    /// the cached network state before answering.
    pub async fn get_activations(
        &self,
        params: &GetActivationsRequest,
    ) -> Result<ActivationResponse> {
        debug!("get_activations");
        params.validate()?;

        let uri = format!("/appsec/v1/activations/{}", params.activation_id);

        self.session
            .execute::<(), _>(
                Method::GET,
                &uri,
                &[("updateLatestNetworkStatus", "true".to_string())],
                None,
                &[StatusCode::OK],
            )
            .await
    }

    /// Activate or deactivate one or more configuration versions.
    pub async fn create_activations(
        &self,
        params: &CreateActivationsRequest,
    ) -> Result<ActivationResponse> {
        debug!("create_activations");
        params.validate()?;

        self.session
            .execute(
                Method::POST,
                "/appsec/v1/activations",
                &[],
                Some(params),
                &[StatusCode::OK, StatusCode::CREATED, StatusCode::ACCEPTED],
            )
            .await
    }

    /// List the activation history for a configuration.
    pub async fn get_activation_history(
        &self,
        params: &GetActivationHistoryRequest,
    ) -> Result<GetActivationHistoryResponse> {
        debug!("get_activation_history");
        params.validate()?;

        let uri = format!("/appsec/v1/configs/{}/activations", params.config_id);

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appsec_core::Error;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> AppsecClient {
        AppsecClient::new(server.uri()).unwrap()
    }

    #[tokio::test]
    async fn get_activations_refreshes_network_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appsec/v1/activations/1234"))
            .and(query_param("updateLatestNetworkStatus", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "activationId": 1234,
                "action": "ACTIVATE",
                "status": "ACTIVATED",
                "network": "PRODUCTION",
                "createdBy": "jsmith",
                "createDate": "2021-03-05T09:00:00Z",
                "activationConfigs": [
                    {
                        "configId": 43253,
                        "configName": "Corporate Sites WAF",
                        "configVersion": 15,
                        "previousConfigVersion": 14
                    }
                ]
            })))
            .mount(&server)
            .await;

        let activation = test_client(&server)
            .get_activations(&GetActivationsRequest {
                activation_id: 1234,
            })
            .await
            .unwrap();

        assert_eq!(activation.activation_id, 1234);
        assert_eq!(activation.status, ActivationStatus::Activated);
        assert_eq!(activation.network, ActivationNetwork::Production);
        assert_eq!(activation.activation_configs[0].previous_config_version, 14);
    }

    #[tokio::test]
    async fn create_activations_posts_request_and_accepts_202() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/appsec/v1/activations"))
            .and(body_json(json!({
                "action": "ACTIVATE",
                "network": "STAGING",
                "note": "roll out v15",
                "notificationEmails": ["secops@example.com"],
                "activationConfigs": [
                    {"configId": 43253, "configVersion": 15}
                ]
            })))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "activationId": 1235,
                "action": "ACTIVATE",
                "status": "RECEIVED",
                "network": "STAGING"
            })))
            .mount(&server)
            .await;

        let activation = test_client(&server)
            .create_activations(&CreateActivationsRequest {
                action: ActivationAction::Activate,
                network: ActivationNetwork::Staging,
                note: "roll out v15".to_string(),
                notification_emails: vec!["secops@example.com".to_string()],
                activation_configs: vec![ActivationConfig {
                    config_id: 43253,
                    config_version: 15,
                }],
            })
            .await
            .unwrap();
        assert_eq!(activation.activation_id, 1235);
        assert_eq!(activation.status, ActivationStatus::Received);
    }

    #[tokio::test]
    async fn create_activations_requires_a_target_config() {
        let server = MockServer::start().await;
        let err = test_client(&server)
            .create_activations(&CreateActivationsRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("activation_configs"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_activation_history_decodes_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appsec/v1/configs/43253/activations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "configId": 43253,
                "activationHistory": [
                    {
                        "activationId": 1234,
                        "version": 15,
                        "status": "ACTIVATED",
                        "Network": "PRODUCTION",
                        "activatedBy": "jsmith",
                        "activationDate": "2021-03-05T09:00:00Z",
                        "notes": "roll out v15"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let history = test_client(&server)
            .get_activation_history(&GetActivationHistoryRequest { config_id: 43253 })
            .await
            .unwrap();
        assert_eq!(history.activation_history.len(), 1);
        assert_eq!(history.activation_history[0].network, "PRODUCTION");
    }
}

//! Penalty box operations.
//!
//! The penalty box holds clients that triggered a rate policy; while boxed,
//! every request from the client receives the configured action. Conditions
//! narrow which requests can land a client in the box.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use validator::{Validate, ValidationError};

fn validate_action(action: &str) -> std::result::Result<(), ValidationError> {
    match action {
        "alert" | "deny" | "none" => Ok(()),
        _ => Err(ValidationError::new("action")
            .with_message("must be one of 'alert', 'deny' or 'none'".into())),
    }
}

/// Request parameters for [`AppsecClient::get_penalty_box`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetPenaltyBoxRequest {
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

/// Penalty box settings for a security policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PenaltyBox {
    /// Action applied to boxed clients
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action: String,
    /// Whether penalty box protection is enabled
    pub penalty_box_protection: bool,
}

/// Request parameters for [`AppsecClient::update_penalty_box`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePenaltyBoxRequest {
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
    /// Action applied to boxed clients
    #[validate(custom(function = validate_action))]
    pub action: String,
    /// Whether penalty box protection is enabled
    pub penalty_box_protection: bool,
}

/// Penalty box conditions with their joining operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct PenaltyBoxConditionsPayload {
    /// Operator joining the conditions, `AND` or `OR`
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub condition_operator: String,
    /// Condition documents, passed through verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
}

/// Request parameters for [`AppsecClient::get_penalty_box_conditions`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetPenaltyBoxConditionsRequest {
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

/// Request parameters for [`AppsecClient::update_penalty_box_conditions`].
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdatePenaltyBoxConditionsRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Policy ID
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub policy_id: String,
    /// New conditions payload
    #[validate(nested)]
    pub conditions_payload: PenaltyBoxConditionsPayload,
}

impl AppsecClient {
    /// Return the penalty box settings for a security policy.
    pub async fn get_penalty_box(&self, params: &GetPenaltyBoxRequest) -> Result<PenaltyBox> {
        debug!("get_penalty_box");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/penalty-box",
            params.config_id, params.version, params.policy_id,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Modify the penalty box settings for a security policy.
    pub async fn update_penalty_box(
        &self,
        params: &UpdatePenaltyBoxRequest,
    ) -> Result<PenaltyBox> {
        debug!("update_penalty_box");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/penalty-box",
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

    /// Return the penalty box conditions for a security policy.
    pub async fn get_penalty_box_conditions(
        &self,
        params: &GetPenaltyBoxConditionsRequest,
    ) -> Result<PenaltyBoxConditionsPayload> {
        debug!("get_penalty_box_conditions");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/penalty-box/conditions",
            params.config_id, params.version, params.policy_id,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Replace the penalty box conditions for a security policy.
    pub async fn update_penalty_box_conditions(
        &self,
        params: &UpdatePenaltyBoxConditionsRequest,
    ) -> Result<PenaltyBoxConditionsPayload> {
        debug!("update_penalty_box_conditions");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/penalty-box/conditions",
            params.config_id, params.version, params.policy_id,
        );

        self.session
            .execute(
                Method::PUT,
                &uri,
                &[],
                Some(&params.conditions_payload),
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
    async fn get_penalty_box_decodes_settings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/appsec/v1/configs/43253/versions/15/security-policies/AAAA_81230/penalty-box",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "action": "alert",
                "penaltyBoxProtection": true
            })))
            .mount(&server)
            .await;

        let penalty_box = test_client(&server)
            .get_penalty_box(&GetPenaltyBoxRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(penalty_box.action, "alert");
        assert!(penalty_box.penalty_box_protection);
    }

    #[tokio::test]
    async fn update_penalty_box_rejects_unknown_action() {
        let server = MockServer::start().await;
        let err = test_client(&server)
            .update_penalty_box(&UpdatePenaltyBoxRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
                action: "tarpit".to_string(),
                penalty_box_protection: true,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("must be one of"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_penalty_box_puts_settings_only() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(
                "/appsec/v1/configs/43253/versions/15/security-policies/AAAA_81230/penalty-box",
            ))
            .and(body_json(json!({
                "action": "deny",
                "penaltyBoxProtection": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "action": "deny",
                "penaltyBoxProtection": true
            })))
            .mount(&server)
            .await;

        let penalty_box = test_client(&server)
            .update_penalty_box(&UpdatePenaltyBoxRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
                action: "deny".to_string(),
                penalty_box_protection: true,
            })
            .await
            .unwrap();
        assert_eq!(penalty_box.action, "deny");
    }

    #[tokio::test]
    async fn update_conditions_sends_payload_body() {
        let server = MockServer::start().await;
        let conditions = json!([
            {"type": "requestHeaderConditionType", "header": "X-Test", "positiveMatch": true}
        ]);

        Mock::given(method("PUT"))
            .and(path(
                "/appsec/v1/configs/43253/versions/15/security-policies/AAAA_81230/penalty-box/conditions",
            ))
            .and(body_json(json!({
                "conditionOperator": "AND",
                "conditions": conditions.clone()
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "conditionOperator": "AND",
                "conditions": conditions.clone()
            })))
            .mount(&server)
            .await;

        let payload = test_client(&server)
            .update_penalty_box_conditions(&UpdatePenaltyBoxConditionsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
                conditions_payload: PenaltyBoxConditionsPayload {
                    condition_operator: "AND".to_string(),
                    conditions: Some(conditions),
                },
            })
            .await
            .unwrap();
        assert_eq!(payload.condition_operator, "AND");
    }

    #[tokio::test]
    async fn update_conditions_requires_operator() {
        let server = MockServer::start().await;
        let err = test_client(&server)
            .update_penalty_box_conditions(&UpdatePenaltyBoxConditionsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
                conditions_payload: PenaltyBoxConditionsPayload::default(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

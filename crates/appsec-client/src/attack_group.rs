//! Attack group operations.
//!
//! Attack groups bundle related WAF rules under a single action. Condition
//! exceptions are schema-heavy documents the API owns; they travel as raw
//! JSON in both directions.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

/// An attack group with its configured action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttackGroupAction {
    /// Attack group identifier, for example `SQL` or `XSS`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,
    /// Action taken when a rule in the group triggers
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action: String,
    /// Conditions and exceptions scoping the group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_exception: Option<Value>,
}

/// Request parameters for [`AppsecClient::get_attack_groups`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetAttackGroupsRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Policy ID
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub policy_id: String,
    /// When non-empty, filters the listing to this attack group
    pub group: String,
}

/// Response for [`AppsecClient::get_attack_groups`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetAttackGroupsResponse {
    /// Attack groups with their actions
    #[serde(rename = "attackGroupActions", skip_serializing_if = "Vec::is_empty")]
    pub attack_groups: Vec<AttackGroupAction>,
}

/// Request parameters for [`AppsecClient::get_attack_group`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetAttackGroupRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Policy ID
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub policy_id: String,
    /// Attack group identifier
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub group: String,
}

/// Response for [`AppsecClient::get_attack_group`] and
/// [`AppsecClient::update_attack_group`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttackGroupResponse {
    /// Action taken when a rule in the group triggers
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action: String,
    /// Conditions and exceptions scoping the group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_exception: Option<Value>,
}

impl AttackGroupResponse {
    /// Whether the group has no condition exception configured.
    #[must_use]
    pub fn is_empty_condition_exception(&self) -> bool {
        self.condition_exception.is_none()
    }
}

/// Request parameters for [`AppsecClient::update_attack_group`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttackGroupRequest {
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
    /// Attack group identifier
    #[serde(skip)]
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub group: String,
    /// New action for the group
    pub action: String,
    /// Condition exception document, passed through verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_exception: Option<Value>,
}

impl AppsecClient {
    /// List the attack groups for a security policy with their actions and
    /// condition exceptions.
    ///
    /// When `group` is non-empty the listing is filtered client-side to that
    /// attack group.
    pub async fn get_attack_groups(
        &self,
        params: &GetAttackGroupsRequest,
    ) -> Result<GetAttackGroupsResponse> {
        debug!("get_attack_groups");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/attack-groups",
            params.config_id, params.version, params.policy_id,
        );

        let result: GetAttackGroupsResponse = self
            .session
            .execute::<(), _>(
                Method::GET,
                &uri,
                &[("includeConditionException", "true".to_string())],
                None,
                &[StatusCode::OK],
            )
            .await?;

        if !params.group.is_empty() {
            return Ok(GetAttackGroupsResponse {
                attack_groups: result
                    .attack_groups
                    .into_iter()
                    .filter(|entry| entry.group == params.group)
                    .collect(),
            });
        }

        Ok(result)
    }

    /// Return the action and condition exception for an attack group.
    pub async fn get_attack_group(
        &self,
        params: &GetAttackGroupRequest,
    ) -> Result<AttackGroupResponse> {
        debug!("get_attack_group");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/attack-groups/{}",
            params.config_id, params.version, params.policy_id, params.group,
        );

        self.session
            .execute::<(), _>(
                Method::GET,
                &uri,
                &[("includeConditionException", "true".to_string())],
                None,
                &[StatusCode::OK],
            )
            .await
    }

    /// Change the action taken when a rule in an attack group triggers,
    /// optionally replacing the condition exception.
    pub async fn update_attack_group(
        &self,
        params: &UpdateAttackGroupRequest,
    ) -> Result<AttackGroupResponse> {
        debug!("update_attack_group");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/security-policies/{}/attack-groups/{}/action-condition-exception",
            params.config_id, params.version, params.policy_id, params.group,
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
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> AppsecClient {
        AppsecClient::new(server.uri()).unwrap()
    }

    #[tokio::test]
    async fn get_attack_groups_requests_condition_exceptions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/appsec/v1/configs/43253/versions/15/security-policies/AAAA_81230/attack-groups",
            ))
            .and(query_param("includeConditionException", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "attackGroupActions": [
                    {"group": "SQL", "action": "deny"},
                    {
                        "group": "XSS",
                        "action": "alert",
                        "conditionException": {
                            "exception": {
                                "specificHeaderCookieParamXmlOrJsonNames": [
                                    {"names": ["ASE-Manager-Name"], "selector": "REQUEST_HEADERS"}
                                ]
                            }
                        }
                    }
                ]
            })))
            .mount(&server)
            .await;

        let response = test_client(&server)
            .get_attack_groups(&GetAttackGroupsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
                group: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(response.attack_groups.len(), 2);
        assert!(response.attack_groups[1].condition_exception.is_some());
    }

    #[tokio::test]
    async fn get_attack_groups_filters_by_group() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/appsec/v1/configs/43253/versions/15/security-policies/AAAA_81230/attack-groups",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "attackGroupActions": [
                    {"group": "SQL", "action": "deny"},
                    {"group": "XSS", "action": "alert"}
                ]
            })))
            .mount(&server)
            .await;

        let response = test_client(&server)
            .get_attack_groups(&GetAttackGroupsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
                group: "XSS".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.attack_groups.len(), 1);
        assert_eq!(response.attack_groups[0].group, "XSS");
    }

    #[tokio::test]
    async fn get_attack_group_requires_group() {
        let server = MockServer::start().await;
        let err = test_client(&server)
            .get_attack_group(&GetAttackGroupRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
                group: String::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_attack_group_puts_action_and_exception() {
        let server = MockServer::start().await;
        let exception = json!({
            "exception": {
                "specificHeaderCookieParamXmlOrJsonNames": [
                    {"names": ["ASE-Manager-Name"], "selector": "REQUEST_HEADERS", "wildcard": true}
                ]
            }
        });

        Mock::given(method("PUT"))
            .and(path(
                "/appsec/v1/configs/43253/versions/15/security-policies/AAAA_81230/attack-groups/SQL/action-condition-exception",
            ))
            .and(body_json(json!({
                "action": "deny",
                "conditionException": exception.clone()
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "action": "deny",
                "conditionException": exception.clone()
            })))
            .mount(&server)
            .await;

        let response = test_client(&server)
            .update_attack_group(&UpdateAttackGroupRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".to_string(),
                group: "SQL".to_string(),
                action: "deny".to_string(),
                condition_exception: Some(exception),
            })
            .await
            .unwrap();
        assert_eq!(response.action, "deny");
        assert!(!response.is_empty_condition_exception());
    }
}

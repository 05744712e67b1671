//! SIEM integration operations.
//!
//! SIEM settings control which security events a configuration version
//! streams to the caller's SIEM endpoint. Definitions are the account-level
//! SIEM connector versions available to point at.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::{Validate, ValidationError};

const VALID_PROTECTIONS: &[&str] = &[
    "botmanagement",
    "ipgeo",
    "rate",
    "urlProtection",
    "slowpost",
    "customrules",
    "waf",
    "apirequestconstraints",
    "clientrep",
    "malwareprotection",
    "aprProtection",
];

fn validate_protection(protection: &str) -> std::result::Result<(), ValidationError> {
    if VALID_PROTECTIONS.contains(&protection) {
        Ok(())
    } else {
        Err(ValidationError::new("protection")
            .with_message("must name a known protection class".into()))
    }
}

/// A per-protection exception excluding events from the SIEM stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SiemException {
    /// Protection class the exception applies to
    #[validate(custom(function = validate_protection))]
    pub protection: String,
    /// Action types excluded from the stream
    pub action_types: Vec<String>,
}

/// SIEM settings for a configuration version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiemSettings {
    /// Whether SIEM event streaming is enabled
    pub enable_siem: bool,
    /// Whether events stream for every policy in the configuration
    pub enable_for_all_policies: bool,
    /// Whether bot management events are included
    pub enabled_botman_siem_events: bool,
    /// SIEM connector version in use
    pub siem_definition_id: u64,
    /// Policies streaming events when not enabled for all
    #[serde(rename = "firewallPolicyIds", skip_serializing_if = "Vec::is_empty")]
    pub firewall_policy_ids: Vec<String>,
    /// Per-protection exceptions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<SiemException>,
}

/// Request parameters for [`AppsecClient::get_siem_settings`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetSiemSettingsRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
}

/// Request parameters for [`AppsecClient::update_siem_settings`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSiemSettingsRequest {
    /// Configuration ID
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Whether SIEM event streaming is enabled
    pub enable_siem: bool,
    /// Whether events stream for every policy in the configuration
    pub enable_for_all_policies: bool,
    /// Whether bot management events are included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_botman_siem_events: Option<bool>,
    /// SIEM connector version to use
    pub siem_definition_id: u64,
    /// Policies streaming events when not enabled for all
    #[serde(rename = "firewallPolicyIds")]
    pub firewall_policy_ids: Vec<String>,
    /// Per-protection exceptions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub exceptions: Vec<SiemException>,
}

/// Request parameters for [`AppsecClient::get_siem_definitions`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetSiemDefinitionsRequest {
    /// When non-empty, filters the listing to this definition name
    pub siem_definition_name: String,
}

/// An available SIEM connector version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiemDefinition {
    /// Definition ID
    pub id: u64,
    /// Definition name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Response for [`AppsecClient::get_siem_definitions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetSiemDefinitionsResponse {
    /// Available SIEM connector versions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub siem_definitions: Vec<SiemDefinition>,
}

impl AppsecClient {
    /// Return the SIEM settings for a configuration version.
    pub async fn get_siem_settings(
        &self,
        params: &GetSiemSettingsRequest,
    ) -> Result<SiemSettings> {
        debug!("get_siem_settings");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/siem",
            params.config_id, params.version,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Replace the SIEM settings for a configuration version.
    pub async fn update_siem_settings(
        &self,
        params: &UpdateSiemSettingsRequest,
    ) -> Result<SiemSettings> {
        debug!("update_siem_settings");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/siem",
            params.config_id, params.version,
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

    /// List the SIEM connector versions available to the account.
    ///
    /// When `siem_definition_name` is non-empty the listing is filtered
    /// client-side to definitions with that exact name.
    pub async fn get_siem_definitions(
        &self,
        params: &GetSiemDefinitionsRequest,
    ) -> Result<GetSiemDefinitionsResponse> {
        debug!("get_siem_definitions");

        let result: GetSiemDefinitionsResponse = self
            .session
            .execute::<(), _>(
                Method::GET,
                "/appsec/v1/siem-definitions",
                &[],
                None,
                &[StatusCode::OK],
            )
            .await?;

        if !params.siem_definition_name.is_empty() {
            return Ok(GetSiemDefinitionsResponse {
                siem_definitions: result
                    .siem_definitions
                    .into_iter()
                    .filter(|definition| definition.name == params.siem_definition_name)
                    .collect(),
            });
        }

        Ok(result)
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
    async fn get_siem_settings_decodes_exceptions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appsec/v1/configs/43253/versions/15/siem"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "enableSiem": true,
                "enableForAllPolicies": false,
                "enabledBotmanSiemEvents": true,
                "siemDefinitionId": 1,
                "firewallPolicyIds": ["AAAA_81230"],
                "exceptions": [
                    {"protection": "rate", "actionTypes": ["alert"]}
                ]
            })))
            .mount(&server)
            .await;

        let settings = test_client(&server)
            .get_siem_settings(&GetSiemSettingsRequest {
                config_id: 43253,
                version: 15,
            })
            .await
            .unwrap();
        assert!(settings.enable_siem);
        assert_eq!(settings.firewall_policy_ids, vec!["AAAA_81230"]);
        assert_eq!(settings.exceptions[0].protection, "rate");
    }

    #[tokio::test]
    async fn update_siem_settings_rejects_unknown_protection() {
        let server = MockServer::start().await;
        let err = test_client(&server)
            .update_siem_settings(&UpdateSiemSettingsRequest {
                config_id: 43253,
                version: 15,
                enable_siem: true,
                siem_definition_id: 1,
                exceptions: vec![SiemException {
                    protection: "teapot".to_string(),
                    action_types: vec!["alert".to_string()],
                }],
                ..UpdateSiemSettingsRequest::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_siem_settings_puts_body_without_path_params() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/appsec/v1/configs/43253/versions/15/siem"))
            .and(body_json(json!({
                "enableSiem": true,
                "enableForAllPolicies": true,
                "siemDefinitionId": 1,
                "firewallPolicyIds": []
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "enableSiem": true,
                "enableForAllPolicies": true,
                "siemDefinitionId": 1
            })))
            .mount(&server)
            .await;

        let settings = test_client(&server)
            .update_siem_settings(&UpdateSiemSettingsRequest {
                config_id: 43253,
                version: 15,
                enable_siem: true,
                enable_for_all_policies: true,
                siem_definition_id: 1,
                ..UpdateSiemSettingsRequest::default()
            })
            .await
            .unwrap();
        assert!(settings.enable_for_all_policies);
    }

    #[tokio::test]
    async fn get_siem_definitions_filters_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appsec/v1/siem-definitions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "siemDefinitions": [
                    {"id": 1, "name": "SIEM Version 01"},
                    {"id": 2, "name": "SIEM Version 02"}
                ]
            })))
            .mount(&server)
            .await;

        let response = test_client(&server)
            .get_siem_definitions(&GetSiemDefinitionsRequest {
                siem_definition_name: "SIEM Version 02".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.siem_definitions.len(), 1);
        assert_eq!(response.siem_definitions[0].id, 2);
    }
}

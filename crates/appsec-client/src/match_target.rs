//! Match target operations.
//!
//! Match targets decide which security policy inspects a request, keyed on
//! hostname, path and file extension for website targets or on registered
//! API definitions for API targets. The sequence operations reorder the
//! targets of one type; lower sequence numbers are evaluated first.
//!
//! Create and update accept the match criteria as a raw JSON document so the
//! full website and API target grammars pass through unmodified.

use crate::bypass_network_lists::NetworkList;
use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

/// An API definition referenced by an API match target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTargetApi {
    /// API definition ID
    pub id: u64,
    /// API definition name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// The security policy a match target routes matching requests to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchTargetPolicy {
    /// Policy ID
    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy_id: String,
}

/// A match target as returned by the API.
///
/// Website and API targets share this shape; fields the other kind does not
/// carry stay at their defaults and are skipped on re-serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchTarget {
    /// Target type, `website` or `api`
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub target_type: String,
    /// Configuration ID
    pub config_id: u64,
    /// Configuration version
    pub config_version: u64,
    /// Target ID
    pub target_id: u64,
    /// Evaluation order among targets of the same type
    pub sequence: u64,
    /// Default-file matching mode
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_file: String,
    /// Hostnames the target matches
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<String>,
    /// Request paths the target matches
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_paths: Vec<String>,
    /// File extensions the target matches
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_extensions: Vec<String>,
    /// Whether the path match is negated
    pub is_negative_path_match: bool,
    /// Whether the file extension match is negated
    pub is_negative_file_extension_match: bool,
    /// API definitions an API target matches
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apis: Vec<MatchTargetApi>,
    /// Policy inspecting matching requests
    pub security_policy: MatchTargetPolicy,
    /// Network lists whose traffic bypasses the target
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bypass_network_lists: Vec<NetworkList>,
}

/// Request parameters for [`AppsecClient::get_match_targets`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetMatchTargetsRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// When non-zero, filters the listing to this target ID
    pub target_id: u64,
}

/// The website and API target listings for a configuration version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchTargets {
    /// API match targets
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub api_targets: Vec<MatchTarget>,
    /// Website match targets
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub website_targets: Vec<MatchTarget>,
}

/// Response for [`AppsecClient::get_match_targets`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetMatchTargetsResponse {
    /// Match targets grouped by type
    pub match_targets: MatchTargets,
}

/// Request parameters for [`AppsecClient::get_match_target`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetMatchTargetRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Target ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub target_id: u64,
}

/// Request parameters for [`AppsecClient::create_match_target`].
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateMatchTargetRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Match target document, passed through verbatim
    pub json_payload: Value,
}

/// Request parameters for [`AppsecClient::update_match_target`].
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateMatchTargetRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Target ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub target_id: u64,
    /// Replacement match target document, passed through verbatim
    pub json_payload: Value,
}

/// Request parameters for [`AppsecClient::remove_match_target`].
#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveMatchTargetRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Target ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub target_id: u64,
}

/// One entry of a match target ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchTargetItem {
    /// Evaluation order of the target
    pub sequence: u64,
    /// Target ID
    pub target_id: u64,
}

/// The evaluation order of the match targets of one type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchTargetSequence {
    /// Target type, `website` or `api`
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub target_type: String,
    /// Targets in evaluation order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_sequence: Vec<MatchTargetItem>,
}

/// Request parameters for [`AppsecClient::get_match_target_sequence`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetMatchTargetSequenceRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Target type to order, `website` or `api`
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub target_type: String,
}

/// Request parameters for [`AppsecClient::update_match_target_sequence`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchTargetSequenceRequest {
    /// Configuration ID
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Target type to reorder, `website` or `api`
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub target_type: String,
    /// Replacement evaluation order
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub target_sequence: Vec<MatchTargetItem>,
}

impl AppsecClient {
    /// List the match targets for a configuration version.
    ///
    /// When `target_id` is non-zero both listings are filtered client-side
    /// to that target.
    pub async fn get_match_targets(
        &self,
        params: &GetMatchTargetsRequest,
    ) -> Result<GetMatchTargetsResponse> {
        debug!("get_match_targets");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/match-targets",
            params.config_id, params.version,
        );

        let mut result: GetMatchTargetsResponse = self
            .session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await?;

        if params.target_id != 0 {
            result
                .match_targets
                .api_targets
                .retain(|target| target.target_id == params.target_id);
            result
                .match_targets
                .website_targets
                .retain(|target| target.target_id == params.target_id);
        }

        Ok(result)
    }

    /// Return the specified match target with child object names resolved.
    pub async fn get_match_target(&self, params: &GetMatchTargetRequest) -> Result<MatchTarget> {
        debug!("get_match_target");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/match-targets/{}",
            params.config_id, params.version, params.target_id,
        );

        self.session
            .execute::<(), _>(
                Method::GET,
                &uri,
                &[("includeChildObjectName", "true".to_string())],
                None,
                &[StatusCode::OK],
            )
            .await
    }

    /// Create a new match target from a raw match target document.
    pub async fn create_match_target(
        &self,
        params: &CreateMatchTargetRequest,
    ) -> Result<MatchTarget> {
        debug!("create_match_target");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/match-targets",
            params.config_id, params.version,
        );

        self.session
            .execute(
                Method::POST,
                &uri,
                &[],
                Some(&params.json_payload),
                &[StatusCode::OK, StatusCode::CREATED],
            )
            .await
    }

    /// Replace the specified match target with a raw match target document.
    pub async fn update_match_target(
        &self,
        params: &UpdateMatchTargetRequest,
    ) -> Result<MatchTarget> {
        debug!("update_match_target");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/match-targets/{}",
            params.config_id, params.version, params.target_id,
        );

        self.session
            .execute(
                Method::PUT,
                &uri,
                &[],
                Some(&params.json_payload),
                &[StatusCode::OK, StatusCode::CREATED],
            )
            .await
    }

    /// Delete the specified match target.
    pub async fn remove_match_target(
        &self,
        params: &RemoveMatchTargetRequest,
    ) -> Result<MatchTarget> {
        debug!("remove_match_target");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/match-targets/{}",
            params.config_id, params.version, params.target_id,
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

    /// Return the evaluation order of the match targets of one type.
    pub async fn get_match_target_sequence(
        &self,
        params: &GetMatchTargetSequenceRequest,
    ) -> Result<MatchTargetSequence> {
        debug!("get_match_target_sequence");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/match-targets/sequence",
            params.config_id, params.version,
        );

        self.session
            .execute::<(), _>(
                Method::GET,
                &uri,
                &[("type", params.target_type.clone())],
                None,
                &[StatusCode::OK],
            )
            .await
    }

    /// Replace the evaluation order of the match targets of one type.
    pub async fn update_match_target_sequence(
        &self,
        params: &UpdateMatchTargetSequenceRequest,
    ) -> Result<MatchTargetSequence> {
        debug!("update_match_target_sequence");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/match-targets/sequence",
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
}

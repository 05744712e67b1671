//! Protected hostname operations.
//!
//! The selected hostnames are the set a configuration version protects.
//! Updates replace the whole list.

use crate::client::AppsecClient;
use crate::Result;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// A single protected hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hostname {
    /// The hostname
    pub hostname: String,
}

/// Request parameters for [`AppsecClient::get_selected_hostnames`].
#[derive(Debug, Clone, Default, Validate)]
pub struct GetSelectedHostnamesRequest {
    /// Configuration ID
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
}

/// The hostname list protected by a configuration version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectedHostnames {
    /// Protected hostnames
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hostname_list: Vec<Hostname>,
}

/// Request parameters for [`AppsecClient::update_selected_hostnames`].
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSelectedHostnamesRequest {
    /// Configuration ID
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub config_id: u64,
    /// Configuration version
    #[serde(skip)]
    #[validate(range(min = 1, message = "cannot be blank"))]
    pub version: u64,
    /// Replacement hostname list
    pub hostname_list: Vec<Hostname>,
}

impl AppsecClient {
    /// Return the hostnames protected by a configuration version.
    pub async fn get_selected_hostnames(
        &self,
        params: &GetSelectedHostnamesRequest,
    ) -> Result<SelectedHostnames> {
        debug!("get_selected_hostnames");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/selected-hostnames",
            params.config_id, params.version,
        );

        self.session
            .execute::<(), _>(Method::GET, &uri, &[], None, &[StatusCode::OK])
            .await
    }

    /// Replace the hostnames protected by a configuration version.
    pub async fn update_selected_hostnames(
        &self,
        params: &UpdateSelectedHostnamesRequest,
    ) -> Result<SelectedHostnames> {
        debug!("update_selected_hostnames");
        params.validate()?;

        let uri = format!(
            "/appsec/v1/configs/{}/versions/{}/selected-hostnames",
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

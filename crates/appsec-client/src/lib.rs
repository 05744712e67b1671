//! Client and data models for the Akamai Application Security (AppSec) API.
//!
//! Provides typed request/response structures and an asynchronous client for
//! managing WAF configurations, security policies, match targets, rate
//! policies, attack groups, penalty boxes and related security-config
//! resources.
//!
//! Every operation follows the same shape: validate the request's path
//! parameters, build the URI, issue the call through the shared session and
//! deserialize the JSON response. Failed calls surface the API's
//! problem-detail error with the HTTP status code attached.

#![deny(missing_docs)]

pub mod activations;
pub mod attack_group;
pub mod bypass_network_lists;
pub mod client;
pub mod configuration;
pub mod configuration_version;
pub mod match_target;
pub mod penalty_box;
pub mod policy_protections;
pub mod rate_policy;
pub mod security_policy;
pub mod selected_hostnames;
pub mod siem;
pub mod waf_mode;

pub use client::{AppsecClient, AppsecClientBuilder};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = appsec_core::Result<T>;

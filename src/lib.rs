//! Async Rust client library for the YNO network device management API.
//!
//! Provides an API-key authenticated HTTP client with composable per-call
//! overrides, client-side request validation, and typed request/response
//! models for router search, remote command tasks and device statistics.
//!
//! # Modules
//!
//! - [`auth`] — API key / API version credential headers.
//! - [`client`] — HTTP transport (`YnoClient`) with JSON request helpers.
//! - [`common`] — Response envelope and shared enumerations.
//! - [`device_stat`] — Device statistics queries.
//! - [`error`] — Typed error hierarchy (`YnoError`).
//! - [`option`] — Client configuration and per-call overrides.
//! - [`router`] — Router search (filter DSL) and label/user assignment.
//! - [`task`] — Remote command task creation and result retrieval.
//! - [`validate`] — Client-side validation contract.
//!
//! # Quick Start
//!
//! ```ignore
//! use yno_client::auth::ApiKey;
//! use yno_client::client::{YNO_BASE_URL, YnoClient};
//! use yno_client::router::{SearchRouterRequest, search_routers};
//!
//! let key = ApiKey::new("api-key").with_version("1.0");
//! let client = YnoClient::with_api_key(YNO_BASE_URL, &key, &[])?;
//! let request = SearchRouterRequest { page_size: Some(20), ..Default::default() };
//! let page = search_routers(&client, &request, &[]).await?;
//! ```

#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod common;
pub mod device_stat;
pub mod error;
pub mod option;
pub mod router;
pub mod task;
pub mod validate;

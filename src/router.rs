//! Router (device) search and update for the YNO API.
//!
//! - [`search_routers`] — POST `routers/_search`, paginated and filterable.
//! - [`update_router`] — PUT `routers/{serialNumber}`, replaces assigned
//!   labels and users.
//!
//! ## Filter DSL
//!
//! Searches take a [`RouterFilter`] tree. Each node is a single-key JSON
//! object whose key names the clause:
//!
//! | Key | Variant | Operand |
//! |-----|---------|---------|
//! | `$eq` | [`RouterFilter::Equal`] | [`EqualFilter`] |
//! | `$pm` | [`RouterFilter::PartialMatch`] | [`PartialMatchFilter`] |
//! | `$in` | [`RouterFilter::In`] | [`InFilter`] |
//! | `$inArray` | [`RouterFilter::InArray`] | [`RouterAssignedObject`] |
//! | `$pmInArray` | [`RouterFilter::PartialMatchInArray`] | [`RouterAssignedObject`] |
//! | `$and` | [`RouterFilter::And`] | list of filters |
//! | `$or` | [`RouterFilter::Or`] | list of filters |
//!
//! Unset operand fields are omitted on the wire, so decoding a filter
//! document and encoding it again reproduces the same bytes.

use serde::{Deserialize, Serialize};

use crate::client::{YnoClient, segment_path};
use crate::common::{DeviceStatus, MetaData, Warning};
use crate::option::ClientOption;
use crate::validate::{Validate, ValidationError, check_not_empty, check_range, require_path_segment};

/// Smallest accepted page size.
pub const MIN_PAGE_SIZE: u32 = 5;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

// ── Request types ──────────────────────────────────────────────────────

/// Request body for `POST routers/_search`.
///
/// All fields are optional. Pass the `NextPageToken` of a previous
/// response as `page_token` to fetch the next page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRouterRequest {
    /// Results per page, `5 <= x <= 100`.
    #[serde(rename = "PageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Search conditions.
    #[serde(rename = "Query", skip_serializing_if = "Option::is_none")]
    pub query: Option<SearchRouterQuery>,

    /// Continuation token from a previous response.
    #[serde(rename = "PageToken", skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl Validate for SearchRouterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(page_size) = self.page_size {
            check_range(page_size, MIN_PAGE_SIZE, MAX_PAGE_SIZE, "PageSize")?;
        }
        self.query.validate()
    }
}

/// Wrapper around the filter tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRouterQuery {
    /// Root filter clause.
    #[serde(rename = "Where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<RouterFilter>,
}

impl Validate for SearchRouterQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        self.filter.validate()
    }
}

/// One node of the search filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RouterFilter {
    /// Exact match on every set field.
    #[serde(rename = "$eq")]
    Equal(EqualFilter),
    /// Substring match on every set field.
    #[serde(rename = "$pm")]
    PartialMatch(PartialMatchFilter),
    /// Field value is one of the listed values.
    #[serde(rename = "$in")]
    In(InFilter),
    /// Assigned labels/users contain one of the listed values.
    #[serde(rename = "$inArray")]
    InArray(RouterAssignedObject),
    /// Assigned labels/users partially match one of the listed values.
    #[serde(rename = "$pmInArray")]
    PartialMatchInArray(RouterAssignedObject),
    /// Every nested clause matches.
    #[serde(rename = "$and")]
    And(Vec<RouterFilter>),
    /// At least one nested clause matches.
    #[serde(rename = "$or")]
    Or(Vec<RouterFilter>),
}

impl RouterFilter {
    /// Shorthand for an `$and` node.
    pub fn and(clauses: impl IntoIterator<Item = RouterFilter>) -> Self {
        RouterFilter::And(clauses.into_iter().collect())
    }

    /// Shorthand for an `$or` node.
    pub fn or(clauses: impl IntoIterator<Item = RouterFilter>) -> Self {
        RouterFilter::Or(clauses.into_iter().collect())
    }
}

impl Validate for RouterFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            RouterFilter::InArray(assigned) | RouterFilter::PartialMatchInArray(assigned) => {
                assigned.validate()
            }
            RouterFilter::And(clauses) | RouterFilter::Or(clauses) => clauses.validate(),
            RouterFilter::Equal(filter) => check_known_status(filter.device_status.iter()),
            RouterFilter::In(filter) => check_known_status(filter.device_status.iter().flatten()),
            RouterFilter::PartialMatch(_) => Ok(()),
        }
    }
}

/// `DeviceStatus::Unknown` only stands in for unrecognized response values
/// and must not be sent as a filter value.
fn check_known_status<'a>(
    mut statuses: impl Iterator<Item = &'a DeviceStatus>,
) -> Result<(), ValidationError> {
    if statuses.any(|status| *status == DeviceStatus::Unknown) {
        return Err(ValidationError::NotMatch {
            field: "DeviceStatus",
            constraint: "a known device status".to_string(),
        });
    }
    Ok(())
}

/// Operand of `$eq`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EqualFilter {
    /// Router serial number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Model name, e.g. `RTX830`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Firmware revision string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_revision: Option<String>,
    /// Address the router connects from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_ip_address: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_description: Option<String>,
    /// Connection state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_status: Option<DeviceStatus>,
}

/// Operand of `$pm`. Device status has no partial form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartialMatchFilter {
    /// Router serial number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Model name, e.g. `RTX830`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Firmware revision string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_revision: Option<String>,
    /// Address the router connects from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_ip_address: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_description: Option<String>,
}

/// Operand of `$in`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InFilter {
    /// Candidate serial numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<Vec<String>>,
    /// Candidate model names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<Vec<String>>,
    /// Candidate firmware revisions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_revision: Option<Vec<String>>,
    /// Candidate addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_ip_address: Option<Vec<String>>,
    /// Candidate descriptions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_description: Option<Vec<String>>,
    /// Candidate connection states.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_status: Option<Vec<DeviceStatus>>,
}

/// Labels and users assigned to a router.
///
/// Serves as the `$inArray`/`$pmInArray` operand and as the request body of
/// [`update_router`]. A `None` list is left out; a `Some` list must not be
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouterAssignedObject {
    /// Labels assigned to the router.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_labels: Option<Vec<String>>,
    /// Users assigned to the router.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_users: Option<Vec<String>>,
}

impl Validate for RouterAssignedObject {
    fn validate(&self) -> Result<(), ValidationError> {
        check_not_empty(&self.assigned_labels, "AssignedLabels")?;
        check_not_empty(&self.assigned_users, "AssignedUsers")
    }
}

// ── Response types ─────────────────────────────────────────────────────

/// Response of `POST routers/_search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRouterResponse {
    /// Response metadata.
    #[serde(rename = "Meta", default)]
    pub meta: MetaData,
    /// Matching routers.
    #[serde(rename = "Data")]
    pub data: SearchRouterResponseData,
    /// Non-fatal warnings.
    #[serde(rename = "Warnings", default)]
    pub warnings: Vec<Warning>,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchRouterResponseData {
    /// Token for the next page; empty or absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
    /// Routers on this page.
    #[serde(default)]
    pub routers: Vec<Router>,
}

/// A router as returned by search and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Router {
    /// Serial number, the router identifier.
    pub serial_number: String,
    /// Connection state.
    #[serde(default)]
    pub device_status: Option<DeviceStatus>,
    /// Model name, e.g. `RTX830`.
    #[serde(default)]
    pub model_name: Option<String>,
    /// Firmware revision string.
    #[serde(default)]
    pub firmware_revision: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub device_description: Option<String>,
    /// Address the router connects from.
    #[serde(default)]
    pub endpoint_ip_address: Option<String>,
    /// Assigned labels and users.
    #[serde(flatten)]
    pub assigned: RouterAssignedObject,
}

/// Response of `PUT routers/{serialNumber}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRouterResponse {
    /// Response metadata.
    #[serde(rename = "Meta", default)]
    pub meta: MetaData,
    /// The router after the update.
    #[serde(rename = "Data")]
    pub data: Router,
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Searches managed routers.
///
/// # Errors
///
/// - `YnoError::Validation` — page size out of range or an empty
///   assigned-labels/users list in the filter. No request is sent.
/// - `YnoError::Api` — non-success HTTP status.
/// - `YnoError::Network` / `YnoError::Decode` — transport or body failure.
pub async fn search_routers(
    client: &YnoClient,
    request: &SearchRouterRequest,
    options: &[ClientOption],
) -> crate::error::Result<SearchRouterResponse> {
    request.validate()?;
    client.post("routers/_search", request, options).await
}

/// Replaces the assigned labels and/or users of one router.
///
/// A `None` list leaves that assignment unchanged on the server.
///
/// # Errors
///
/// - `YnoError::Validation` — empty or dot-segment serial number, or an empty list.
/// - `YnoError::Api` — non-success HTTP status (404 for an unknown serial).
/// - `YnoError::Network` / `YnoError::Decode` — transport or body failure.
pub async fn update_router(
    client: &YnoClient,
    serial_number: &str,
    request: &RouterAssignedObject,
    options: &[ClientOption],
) -> crate::error::Result<UpdateRouterResponse> {
    require_path_segment(serial_number, "SerialNumber")?;
    request.validate()?;
    let path = segment_path("routers", serial_number);
    client.put(&path, request, options).await
}

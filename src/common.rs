//! Response envelope and enumerations shared by several endpoint families.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `Meta` object present on every response.
///
/// Its contents are not part of the typed contract, so it is kept as the
/// raw JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaData(pub Map<String, Value>);

/// A non-fatal warning attached to a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Machine-readable warning code.
    #[serde(rename = "Code", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human-readable description.
    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Any other fields the API includes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Connection state of a managed device.
///
/// Used both in search filters and in search results. Unrecognized values
/// from the API map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    /// Connected to YNO.
    Online,
    /// Not connected.
    Offline,
    /// Exchanging data with YNO.
    Communicating,
    /// Executing an operation.
    Processing,
    /// In an error state.
    Error,
    /// Catch-all for values this crate does not know yet.
    #[serde(other)]
    Unknown,
}

/// Outcome of a task on one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecuteCommandStatus {
    /// All commands ran.
    Success,
    /// At least one command failed.
    Failed,
    /// The device did not finish within the task timeout.
    Timeout,
    /// Catch-all for values this crate does not know yet.
    #[serde(other)]
    Unknown,
}

/// Outcome of a single command within a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExitCode {
    /// The command succeeded.
    Success,
    /// The command returned an error.
    Error,
    /// The command was not run because an earlier one failed.
    Skipped,
    /// Catch-all for values this crate does not know yet.
    #[serde(other)]
    Unknown,
}

//! Remote command tasks for the YNO API.
//!
//! A task runs a list of CLI commands on a set of routers. It is created
//! with [`create_task`], which returns a task id, and its results are read
//! with [`get_task_result`]. Results are paginated; pass the returned
//! `NextPageToken` back in [`GetExecuteTaskQuery::page_token`] to continue.
//!
//! This module does not poll. Callers decide when to re-read a task.

use serde::{Deserialize, Serialize};

use crate::client::{YnoClient, segment_path};
use crate::common::{ExecuteCommandStatus, ExitCode, MetaData, Warning};
use crate::option::ClientOption;
use crate::router::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::validate::{Validate, ValidationError, check_range, require, require_path_segment};

/// Task type for running CLI commands on routers.
pub const EXECUTE_COMMAND_TASK: &str = "ExecuteCommand";

/// Accepted task timeout range, in seconds.
pub const MIN_TASK_TIMEOUT: u32 = 60;
/// See [`MIN_TASK_TIMEOUT`].
pub const MAX_TASK_TIMEOUT: u32 = 1800;

/// Maximum number of target routers per task.
pub const MAX_SERIAL_NUMBERS: usize = 1000;
/// Maximum number of commands per task.
pub const MAX_COMMANDS: usize = 100;

// ── Request types ──────────────────────────────────────────────────────

/// Request body for `POST tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTaskRequest {
    /// Task type, e.g. [`EXECUTE_COMMAND_TASK`]. Required.
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,

    /// Seconds the server waits for each router, `60 <= x <= 1800`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    /// Targets and commands. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<TaskParameter>,
}

impl CreateTaskRequest {
    /// An `ExecuteCommand` task with the server's default timeout.
    pub fn execute_command(serial_numbers: Vec<String>, commands: Vec<String>) -> Self {
        CreateTaskRequest {
            task_type: Some(EXECUTE_COMMAND_TASK.to_string()),
            timeout: None,
            parameters: Some(TaskParameter {
                serial_numbers: Some(serial_numbers),
                commands: Some(commands),
            }),
        }
    }
}

impl Validate for CreateTaskRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.task_type, "Type")?;
        if let Some(timeout) = self.timeout {
            check_range(timeout, MIN_TASK_TIMEOUT, MAX_TASK_TIMEOUT, "Timeout")?;
        }
        require(&self.parameters, "Parameters")?.validate()
    }
}

/// Targets and commands of a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskParameter {
    /// Serial numbers of the target routers, 1 to 1000 entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_numbers: Option<Vec<String>>,

    /// Commands to run in order, 1 to 100 entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,
}

impl Validate for TaskParameter {
    fn validate(&self) -> Result<(), ValidationError> {
        let serial_numbers = require(&self.serial_numbers, "SerialNumbers")?;
        check_range(serial_numbers.len(), 1, MAX_SERIAL_NUMBERS, "SerialNumbers")?;

        let commands = require(&self.commands, "Commands")?;
        check_range(commands.len(), 1, MAX_COMMANDS, "Commands")
    }
}

/// Query parameters for `GET tasks/{taskId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetExecuteTaskQuery {
    /// Results per page, `5 <= x <= 100`.
    pub page_size: Option<u32>,
    /// Continuation token from a previous response.
    pub page_token: Option<String>,
}

impl GetExecuteTaskQuery {
    /// Query string pairs for the set fields.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page_size) = self.page_size {
            pairs.push(("PageSize", page_size.to_string()));
        }
        if let Some(page_token) = &self.page_token {
            pairs.push(("PageToken", page_token.clone()));
        }
        pairs
    }
}

impl Validate for GetExecuteTaskQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.page_size {
            Some(page_size) => check_range(page_size, MIN_PAGE_SIZE, MAX_PAGE_SIZE, "PageSize"),
            None => Ok(()),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────────

/// Response of `POST tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    /// Response metadata.
    #[serde(rename = "Meta", default)]
    pub meta: MetaData,
    /// Created task.
    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CreateTaskResponseData>,
}

/// Identifier of a newly created task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskResponseData {
    /// Id to pass to [`get_task_result`].
    #[serde(rename = "TaskId")]
    pub task_id: String,
}

/// Response of `GET tasks/{taskId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteTaskResponse {
    /// Response metadata.
    #[serde(rename = "Meta", default)]
    pub meta: MetaData,
    /// Task type and results.
    #[serde(rename = "Data")]
    pub data: ExecuteTaskData,
    /// Non-fatal warnings.
    #[serde(rename = "Warnings", default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

/// Task type and one page of per-router results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecuteTaskData {
    /// Task type, e.g. `ExecuteCommand`.
    #[serde(rename = "Type")]
    pub task_type: String,
    /// Per-router results.
    pub results: ExecuteTaskResults,
}

/// One page of per-router results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecuteTaskResults {
    /// Token for the next page; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Routers on this page.
    #[serde(default)]
    pub devices: Vec<DeviceTaskResult>,
}

/// Result of a task on one router.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceTaskResult {
    /// Overall outcome on this router.
    pub status: ExecuteCommandStatus,
    /// Router serial number.
    pub serial_number: String,
    /// One entry per command, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command_results: Vec<CommandResultDetail>,
}

/// Output of one command on one router.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandResultDetail {
    /// Output lines.
    #[serde(default)]
    pub output: Vec<String>,
    /// The command as sent.
    pub command: String,
    /// Command outcome.
    pub exit_code: ExitCode,
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Creates a task and returns its id in the response data.
///
/// # Errors
///
/// - `YnoError::Validation` — missing type or parameters, timeout out of
///   range, or too few/many serial numbers or commands.
/// - `YnoError::Api` — non-success HTTP status.
/// - `YnoError::Network` / `YnoError::Decode` — transport or body failure.
pub async fn create_task(
    client: &YnoClient,
    request: &CreateTaskRequest,
    options: &[ClientOption],
) -> crate::error::Result<CreateTaskResponse> {
    request.validate()?;
    client.post("tasks", request, options).await
}

/// Reads one page of results for `task_id`.
///
/// # Errors
///
/// - `YnoError::Validation` — empty or dot-segment task id, or page size out of range.
/// - `YnoError::Api` — non-success HTTP status (404 for an unknown task).
/// - `YnoError::Network` / `YnoError::Decode` — transport or body failure.
pub async fn get_task_result(
    client: &YnoClient,
    task_id: &str,
    query: &GetExecuteTaskQuery,
    options: &[ClientOption],
) -> crate::error::Result<ExecuteTaskResponse> {
    require_path_segment(task_id, "TaskId")?;
    query.validate()?;
    let path = segment_path("tasks", task_id);
    client.get(&path, &query.to_pairs(), options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateTaskRequest {
        CreateTaskRequest::execute_command(
            vec!["M5B123456".to_string()],
            vec!["show status boot".to_string()],
        )
    }

    // ── CreateTaskRequest validation ─────────────────────────────────

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn missing_type_is_required() {
        let request = CreateTaskRequest {
            task_type: None,
            ..valid_request()
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::Required { field: "Type" })
        );
    }

    #[test]
    fn missing_parameters_is_required() {
        let request = CreateTaskRequest {
            parameters: None,
            ..valid_request()
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::Required { field: "Parameters" })
        );
    }

    #[test]
    fn timeout_boundaries() {
        for ok in [60, 1800] {
            let request = CreateTaskRequest {
                timeout: Some(ok),
                ..valid_request()
            };
            assert!(request.validate().is_ok(), "timeout {ok} should pass");
        }
        for bad in [59, 1801] {
            let request = CreateTaskRequest {
                timeout: Some(bad),
                ..valid_request()
            };
            assert_eq!(request.validate().unwrap_err().field(), "Timeout");
        }
    }

    #[test]
    fn nested_parameters_are_validated_once() {
        let request = CreateTaskRequest {
            parameters: Some(TaskParameter {
                serial_numbers: Some(vec!["M5B123456".to_string()]),
                commands: None,
            }),
            ..valid_request()
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::Required { field: "Commands" })
        );
    }

    // ── TaskParameter validation ─────────────────────────────────────

    #[test]
    fn serial_number_count_limits() {
        let empty = TaskParameter {
            serial_numbers: Some(Vec::new()),
            commands: Some(vec!["show config".to_string()]),
        };
        assert_eq!(empty.validate().unwrap_err().field(), "SerialNumbers");

        let full = TaskParameter {
            serial_numbers: Some(vec!["M5B123456".to_string(); MAX_SERIAL_NUMBERS]),
            commands: Some(vec!["show config".to_string()]),
        };
        assert!(full.validate().is_ok());

        let over = TaskParameter {
            serial_numbers: Some(vec!["M5B123456".to_string(); MAX_SERIAL_NUMBERS + 1]),
            commands: Some(vec!["show config".to_string()]),
        };
        assert_eq!(over.validate().unwrap_err().field(), "SerialNumbers");
    }

    #[test]
    fn command_count_limits() {
        let too_many = TaskParameter {
            serial_numbers: Some(vec!["M5B123456".to_string()]),
            commands: Some(vec!["show config".to_string(); MAX_COMMANDS + 1]),
        };
        assert_eq!(too_many.validate().unwrap_err().field(), "Commands");

        let missing = TaskParameter {
            serial_numbers: None,
            commands: Some(vec!["show config".to_string()]),
        };
        assert_eq!(
            missing.validate(),
            Err(ValidationError::Required { field: "SerialNumbers" })
        );
    }

    // ── Serialization ────────────────────────────────────────────────

    #[test]
    fn create_request_serializes_with_pascal_case_keys() {
        let request = CreateTaskRequest {
            timeout: Some(300),
            ..valid_request()
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"Type":"ExecuteCommand","Timeout":300,"Parameters":{"SerialNumbers":["M5B123456"],"Commands":["show status boot"]}}"#
        );
    }

    #[test]
    fn query_pairs_only_include_set_fields() {
        assert!(GetExecuteTaskQuery::default().to_pairs().is_empty());
        let query = GetExecuteTaskQuery {
            page_size: Some(20),
            page_token: Some("tok".to_string()),
        };
        assert_eq!(
            query.to_pairs(),
            vec![("PageSize", "20".to_string()), ("PageToken", "tok".to_string())]
        );
    }

    #[test]
    fn query_page_size_boundaries() {
        let at = |page_size| GetExecuteTaskQuery {
            page_size: Some(page_size),
            page_token: None,
        };
        assert!(at(5).validate().is_ok());
        assert!(at(100).validate().is_ok());
        assert_eq!(at(4).validate().unwrap_err().field(), "PageSize");
        assert_eq!(at(101).validate().unwrap_err().field(), "PageSize");
    }

    // ── Responses ────────────────────────────────────────────────────

    #[test]
    fn execute_task_response_deserializes() {
        let json = r#"{
            "Meta": {},
            "Data": {
                "Type": "ExecuteCommand",
                "Results": {
                    "NextPageToken": "page-2",
                    "Devices": [
                        {
                            "Status": "SUCCESS",
                            "SerialNumber": "M5B123456",
                            "CommandResults": [
                                {"Output": ["RTX830 Rev.15.02.30"], "Command": "show environment", "ExitCode": "SUCCESS"}
                            ]
                        },
                        {"Status": "TIMEOUT", "SerialNumber": "M5B654321"}
                    ]
                }
            }
        }"#;
        let response: ExecuteTaskResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.task_type, "ExecuteCommand");
        let results = &response.data.results;
        assert_eq!(results.next_page_token.as_deref(), Some("page-2"));
        assert_eq!(results.devices.len(), 2);
        assert_eq!(results.devices[0].status, ExecuteCommandStatus::Success);
        assert_eq!(results.devices[0].command_results[0].exit_code, ExitCode::Success);
        assert_eq!(results.devices[1].status, ExecuteCommandStatus::Timeout);
        assert!(results.devices[1].command_results.is_empty());
        assert!(response.warnings.is_empty());
    }

    #[test]
    fn create_task_response_deserializes() {
        let json = r#"{"Meta": {}, "Data": {"TaskId": "task-0001"}}"#;
        let response: CreateTaskResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.unwrap().task_id, "task-0001");
    }
}

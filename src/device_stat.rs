//! Device statistics queries for the YNO API.
//!
//! [`get_device_statistics`] reads a time series (CPU, memory, traffic,
//! fast-path flows) for one router. Some statistic types need an extra
//! parameter object, modelled by [`StatParameters`].
//!
//! Timestamps are Unix seconds. Results are paginated by `SearchAfter`:
//! pass the returned `NextSearchAfter` to continue.

use serde::{Deserialize, Serialize};

use crate::client::YnoClient;
use crate::common::{MetaData, Warning};
use crate::option::ClientOption;
use crate::validate::{Validate, ValidationError, require};

/// The statistics query shares the search endpoint.
const DEVICE_STATS_PATH: &str = "routers/_search";

/// Kind of time series to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatType {
    /// Per-CPU utilization. Needs [`StatParameters::Cpu`].
    CpuUtilization,
    /// Memory utilization.
    MemoryUtilization,
    /// Interface traffic. Needs [`StatParameters::Traffic`].
    AmountOfTraffic,
    /// Fast-path flow count. Needs [`StatParameters::FastPathFlows`].
    NumberOfFastPathFlows,
}

/// Aggregation applied to each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    /// Mean over the period.
    Average,
    /// Highest sample in the period.
    Maximum,
    /// Lowest sample in the period.
    Minimum,
}

/// Traffic direction on an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficDirection {
    /// Inbound traffic.
    Receive,
    /// Outbound traffic.
    Transmit,
}

/// IP version for flow statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpVersion {
    /// IPv4 flows.
    #[serde(rename = "IPv4")]
    V4,
    /// IPv6 flows.
    #[serde(rename = "IPv6")]
    V6,
}

/// How `StartTime`/`EndTime` are checked.
///
/// The API documents a `>= 0` constraint, which `RejectNegative` enforces
/// and [`Validate`] uses. `RejectNonNegative` is the inverted check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampRule {
    /// Fails when a timestamp is `< 0`.
    #[default]
    RejectNegative,
    /// Fails when a timestamp is `>= 0`.
    RejectNonNegative,
}

impl TimestampRule {
    fn check(self, value: i64, field: &'static str) -> Result<(), ValidationError> {
        let (rejected, constraint) = match self {
            TimestampRule::RejectNegative => (value < 0, "x >= 0"),
            TimestampRule::RejectNonNegative => (value >= 0, "x < 0"),
        };
        if rejected {
            return Err(ValidationError::NotMatch {
                field,
                constraint: constraint.to_string(),
            });
        }
        Ok(())
    }
}

/// Request body for a device statistics query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDeviceStatsRequest {
    /// Kind of series. Required.
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub stat_type: Option<DeviceStatType>,
    /// Target router. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Range start, Unix seconds. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Range end, Unix seconds. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Aggregation period in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Aggregation. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistic>,
    /// `NextSearchAfter` from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_after: Option<String>,
    /// Extra parameters for types that need them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<StatParameters>,
}

impl GetDeviceStatsRequest {
    /// Validates with an explicit timestamp rule.
    pub fn validate_with(&self, rule: TimestampRule) -> Result<(), ValidationError> {
        let stat_type = *require(&self.stat_type, "Type")?;
        require(&self.serial_number, "SerialNumber")?;
        rule.check(*require(&self.start_time, "StartTime")?, "StartTime")?;
        rule.check(*require(&self.end_time, "EndTime")?, "EndTime")?;
        require(&self.statistics, "Statistics")?;
        match &self.parameters {
            // `{}` always decodes as `Cpu`; check it against the type instead.
            Some(parameters) if parameters.is_empty() => {
                StatParameters::empty_for(stat_type).validate()
            }
            parameters => parameters.validate(),
        }
    }
}

impl Validate for GetDeviceStatsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(TimestampRule::default())
    }
}

/// Type-specific parameters. Serialized as the bare inner object.
///
/// The encoding carries no variant tag, so decoding picks the first variant
/// whose fields match. Every variant with all fields unset encodes as `{}`,
/// and `{}` decodes as `Cpu`. Validation treats an empty object as the
/// variant implied by the request `Type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatParameters {
    /// `{"CpuId": n}`
    Cpu(CpuUtilizationParameter),
    /// `{"Direction": .., "Interface": ..}`
    Traffic(AmountOfTrafficParameter),
    /// `{"IpVersion": ..}`
    FastPathFlows(NumberOfFastPathFlowsParameter),
}

impl StatParameters {
    /// Whether every field is unset, i.e. the value encodes as `{}`.
    pub fn is_empty(&self) -> bool {
        match self {
            StatParameters::Cpu(p) => p.cpu_id.is_none(),
            StatParameters::Traffic(p) => p.direction.is_none() && p.interface.is_none(),
            StatParameters::FastPathFlows(p) => p.ip_version.is_none(),
        }
    }

    /// The empty parameter object for `stat_type`, or `None` if that type
    /// takes no parameters.
    fn empty_for(stat_type: DeviceStatType) -> Option<Self> {
        match stat_type {
            DeviceStatType::CpuUtilization => Some(StatParameters::Cpu(Default::default())),
            DeviceStatType::AmountOfTraffic => Some(StatParameters::Traffic(Default::default())),
            DeviceStatType::NumberOfFastPathFlows => {
                Some(StatParameters::FastPathFlows(Default::default()))
            }
            DeviceStatType::MemoryUtilization => None,
        }
    }
}

impl Validate for StatParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            StatParameters::Cpu(p) => p.validate(),
            StatParameters::Traffic(p) => p.validate(),
            StatParameters::FastPathFlows(p) => p.validate(),
        }
    }
}

/// Parameters for [`DeviceStatType::CpuUtilization`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CpuUtilizationParameter {
    /// CPU index. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_id: Option<u32>,
}

impl Validate for CpuUtilizationParameter {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.cpu_id, "CpuId").map(|_| ())
    }
}

/// Parameters for [`DeviceStatType::AmountOfTraffic`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct AmountOfTrafficParameter {
    /// Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<TrafficDirection>,
    /// Interface name, e.g. `lan1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

impl Validate for AmountOfTrafficParameter {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.direction, "Direction")?;
        require(&self.interface, "Interface").map(|_| ())
    }
}

/// Parameters for [`DeviceStatType::NumberOfFastPathFlows`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct NumberOfFastPathFlowsParameter {
    /// Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<IpVersion>,
}

impl Validate for NumberOfFastPathFlowsParameter {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.ip_version, "IpVersion").map(|_| ())
    }
}

/// Response of a device statistics query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDeviceStatsResponse {
    /// Response metadata.
    #[serde(rename = "Meta", default)]
    pub meta: MetaData,
    /// Samples, absent when the API returns none.
    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<GetDeviceStatsResponseData>,
    /// Non-fatal warnings.
    #[serde(rename = "Warnings", default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

/// One page of samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDeviceStatsResponseData {
    /// Continuation cursor; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_search_after: Option<String>,
    /// Samples in time order.
    #[serde(default)]
    pub device_statistics: Vec<DeviceStatistic>,
}

/// A single sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatistic {
    /// Unix seconds.
    #[serde(rename = "Ts")]
    pub timestamp: i64,
    /// Sample value in the unit of the series.
    #[serde(rename = "Val")]
    pub value: f64,
}

/// Reads statistics for one router.
///
/// # Errors
///
/// - `YnoError::Validation` — missing type, serial number, timestamps or
///   statistic, a negative timestamp, or incomplete parameters.
/// - `YnoError::Api` — non-success HTTP status.
/// - `YnoError::Network` / `YnoError::Decode` — transport or body failure.
pub async fn get_device_statistics(
    client: &YnoClient,
    request: &GetDeviceStatsRequest,
    options: &[ClientOption],
) -> crate::error::Result<GetDeviceStatsResponse> {
    request.validate()?;
    client.post(DEVICE_STATS_PATH, request, options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_request() -> GetDeviceStatsRequest {
        GetDeviceStatsRequest {
            stat_type: Some(DeviceStatType::CpuUtilization),
            serial_number: Some("M5B123456".to_string()),
            start_time: Some(1_700_000_000),
            end_time: Some(1_700_003_600),
            period: Some(300),
            statistics: Some(Statistic::Average),
            search_after: None,
            parameters: Some(StatParameters::Cpu(CpuUtilizationParameter { cpu_id: Some(0) })),
        }
    }

    #[test]
    fn empty_parameters_are_checked_against_type() {
        let empty = StatParameters::Traffic(AmountOfTrafficParameter::default());
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");

        // `{}` decodes as Cpu whatever the type says.
        let decoded: StatParameters = serde_json::from_str("{}").unwrap();
        assert!(matches!(decoded, StatParameters::Cpu(_)));
        assert!(decoded.is_empty());

        let traffic = GetDeviceStatsRequest {
            stat_type: Some(DeviceStatType::AmountOfTraffic),
            parameters: Some(decoded.clone()),
            ..cpu_request()
        };
        assert_eq!(
            traffic.validate(),
            Err(ValidationError::Required { field: "Direction" })
        );

        let memory = GetDeviceStatsRequest {
            stat_type: Some(DeviceStatType::MemoryUtilization),
            parameters: Some(decoded),
            ..cpu_request()
        };
        assert!(memory.validate().is_ok());
    }

    #[test]
    fn complete_request_passes() {
        assert!(cpu_request().validate().is_ok());
    }

    #[test]
    fn required_fields_in_order() {
        let cases: [(fn(&mut GetDeviceStatsRequest), &'static str); 5] = [
            (|r| r.stat_type = None, "Type"),
            (|r| r.serial_number = None, "SerialNumber"),
            (|r| r.start_time = None, "StartTime"),
            (|r| r.end_time = None, "EndTime"),
            (|r| r.statistics = None, "Statistics"),
        ];
        for (clear, field) in cases {
            let mut request = cpu_request();
            clear(&mut request);
            assert_eq!(request.validate(), Err(ValidationError::Required { field }));
        }
    }

    #[test]
    fn negative_timestamps_rejected_by_default() {
        let request = GetDeviceStatsRequest {
            start_time: Some(-1),
            ..cpu_request()
        };
        assert_eq!(request.validate().unwrap_err().field(), "StartTime");

        let request = GetDeviceStatsRequest {
            end_time: Some(-1),
            ..cpu_request()
        };
        assert_eq!(request.validate().unwrap_err().field(), "EndTime");

        let zero = GetDeviceStatsRequest {
            start_time: Some(0),
            end_time: Some(0),
            ..cpu_request()
        };
        assert!(zero.validate().is_ok(), "zero is a valid timestamp");
    }

    #[test]
    fn non_negative_rule_inverts_the_check() {
        let rule = TimestampRule::RejectNonNegative;
        assert_eq!(
            cpu_request().validate_with(rule).unwrap_err(),
            ValidationError::NotMatch {
                field: "StartTime",
                constraint: "x < 0".to_string(),
            }
        );

        let negative = GetDeviceStatsRequest {
            start_time: Some(-10),
            end_time: Some(-1),
            ..cpu_request()
        };
        assert!(negative.validate_with(rule).is_ok());
    }

    #[test]
    fn parameters_are_optional_but_validated_when_present() {
        let without = GetDeviceStatsRequest {
            parameters: None,
            ..cpu_request()
        };
        assert!(without.validate().is_ok());

        let incomplete = GetDeviceStatsRequest {
            stat_type: Some(DeviceStatType::AmountOfTraffic),
            parameters: Some(StatParameters::Traffic(AmountOfTrafficParameter {
                direction: Some(TrafficDirection::Receive),
                interface: None,
            })),
            ..cpu_request()
        };
        assert_eq!(
            incomplete.validate(),
            Err(ValidationError::Required { field: "Interface" })
        );
    }

    #[test]
    fn fast_path_parameter_requires_ip_version() {
        let params = StatParameters::FastPathFlows(NumberOfFastPathFlowsParameter::default());
        assert_eq!(
            params.validate(),
            Err(ValidationError::Required { field: "IpVersion" })
        );
    }

    #[test]
    fn request_serializes_parameters_inline() {
        let json = serde_json::to_string(&cpu_request()).unwrap();
        assert_eq!(
            json,
            r#"{"Type":"CpuUtilization","SerialNumber":"M5B123456","StartTime":1700000000,"EndTime":1700003600,"Period":300,"Statistics":"Average","Parameters":{"CpuId":0}}"#
        );
    }

    #[test]
    fn parameters_decode_into_matching_variant() {
        let traffic: StatParameters =
            serde_json::from_str(r#"{"Direction":"Transmit","Interface":"lan1"}"#).unwrap();
        assert_eq!(
            traffic,
            StatParameters::Traffic(AmountOfTrafficParameter {
                direction: Some(TrafficDirection::Transmit),
                interface: Some("lan1".to_string()),
            })
        );

        let flows: StatParameters = serde_json::from_str(r#"{"IpVersion":"IPv6"}"#).unwrap();
        assert_eq!(
            flows,
            StatParameters::FastPathFlows(NumberOfFastPathFlowsParameter {
                ip_version: Some(IpVersion::V6),
            })
        );
    }

    #[test]
    fn response_deserializes_samples() {
        let json = r#"{
            "Meta": {},
            "Data": {
                "NextSearchAfter": "1700003600",
                "DeviceStatistics": [{"Ts": 1700000000, "Val": 12}, {"Ts": 1700000300, "Val": 15.5}]
            }
        }"#;
        let response: GetDeviceStatsResponse = serde_json::from_str(json).unwrap();
        let data = response.data.unwrap();
        assert_eq!(data.next_search_after.as_deref(), Some("1700003600"));
        assert_eq!(data.device_statistics.len(), 2);
        assert_eq!(data.device_statistics[0].timestamp, 1_700_000_000);
        assert_eq!(data.device_statistics[1].value, 15.5);
    }
}

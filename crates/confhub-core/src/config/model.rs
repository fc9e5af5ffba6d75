//! Config records as returned by the backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::value::ConfigValue;
use crate::error::ConfhubError;

/// Deployment environment a config belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Test,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Test, Environment::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfhubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            "prod" => Ok(Self::Prod),
            other => Err(ConfhubError::validation(format!(
                "unknown environment '{other}' (expected dev, test or prod)"
            ))),
        }
    }
}

/// Backend identifier; numeric or textual depending on the deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        value
            .parse::<i64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(value.to_string()))
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Creation timestamp of a record.
///
/// Accepts RFC 3339 as well as zone-less ISO-8601 date-times, which are read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

/// One stored version of a service's config, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub id: RecordId,
    pub service_name: String,
    pub environment: Environment,
    pub version: i64,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_data: Option<ConfigValue>,
}

/// A single config version including its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDetail {
    pub id: RecordId,
    pub service_name: String,
    pub environment: Environment,
    pub version: i64,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub created_by: String,
    #[serde(default = "ConfigValue::empty_map", deserialize_with = "data_or_empty_map")]
    pub config_data: ConfigValue,
}

impl ConfigDetail {
    /// File name offered when downloading this version.
    pub fn download_file_name(&self) -> String {
        format!(
            "{}-{}-v{}.json",
            self.service_name, self.environment, self.version
        )
    }
}

fn data_or_empty_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ConfigValue, D::Error> {
    let value = Option::<ConfigValue>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(ConfigValue::Null) => ConfigValue::empty_map(),
        Some(value) => value,
    })
}

/// Aggregated counts shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_services: usize,
    pub total_configs: usize,
    pub active_configs: usize,
    pub inactive_configs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!(" PROD ".parse::<Environment>().unwrap(), Environment::Prod);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_timestamp_formats() {
        let rfc = Timestamp::parse("2025-01-05T09:30:00Z").unwrap();
        let naive = Timestamp::parse("2025-01-05T09:30:00").unwrap();
        let fractional = Timestamp::parse("2025-01-05T09:30:00.123456").unwrap();

        assert_eq!(rfc, naive);
        assert!(fractional > naive);
        assert!(Timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_summary_deserialize() {
        let json = r#"{
            "id": 7,
            "serviceName": "auth-service",
            "environment": "dev",
            "version": 3,
            "isActive": true,
            "createdAt": "2025-01-05T09:30:00",
            "createdBy": "ops@example.com"
        }"#;
        let summary: ConfigSummary = serde_json::from_str(json).unwrap();

        assert_eq!(summary.id, RecordId::Number(7));
        assert_eq!(summary.environment, Environment::Dev);
        assert!(summary.is_active);
        assert!(summary.config_data.is_none());
    }

    #[test]
    fn test_detail_missing_data_is_empty_map() {
        let json = r#"{
            "id": "abc",
            "serviceName": "billing",
            "environment": "prod",
            "version": 12,
            "createdAt": "2025-01-05T09:30:00Z",
            "configData": null
        }"#;
        let detail: ConfigDetail = serde_json::from_str(json).unwrap();

        assert_eq!(detail.config_data, ConfigValue::empty_map());
        assert_eq!(detail.download_file_name(), "billing-prod-v12.json");
    }

    #[test]
    fn test_record_id_from_str() {
        assert_eq!(RecordId::from("42"), RecordId::Number(42));
        assert_eq!(RecordId::from("a-1"), RecordId::Text("a-1".into()));
    }
}

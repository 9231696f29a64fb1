// Dashboard domain model
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Single-site detail snapshot. The telemetry blocks belong to the API contract
/// and are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub site_info: SiteInfo,
    #[serde(default)]
    pub environment: Value,
    #[serde(default)]
    pub modules: Value,
    #[serde(default)]
    pub rectifier: Value,
    #[serde(default)]
    pub battery: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    #[serde(default)]
    pub site_code: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub project_id: String,
    /// Source-formatted timestamp of the latest data row ("%Y-%m-%d %H:%M:%S").
    #[serde(default)]
    pub last_data: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One historical telemetry row, passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryPoint(pub Value);

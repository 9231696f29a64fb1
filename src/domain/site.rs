// Site domain model and status classification
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One monitored rectifier installation as reported by the site collection endpoint.
///
/// `site_code` is the reconciliation key; `id` is only the source's row id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub site_code: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub ladder: String,
    #[serde(default)]
    pub sla: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    pub latest_vdc: Option<f64>,
    pub latest_load: Option<f64>,
    pub latest_temp: Option<f64>,
    #[serde(default)]
    pub latest_status: String,
    pub last_update: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Site {
    pub fn severity(&self) -> Severity {
        classify(self)
    }

    pub fn is_online(&self) -> bool {
        self.severity() != Severity::Offline
    }
}

/// Derived operational category, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Normal,
    Warning,
    Alarm,
    /// Reachable site reporting a status we do not recognise.
    Unknown,
    Offline,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "Normal",
            Severity::Warning => "Warning",
            Severity::Alarm => "Alarm",
            Severity::Unknown => "Unknown",
            Severity::Offline => "Offline",
        }
    }

    fn from_reported(status: &str) -> Self {
        match status {
            "Normal" => Severity::Normal,
            "Warning" => Severity::Warning,
            "Alarm" => Severity::Alarm,
            _ => Severity::Unknown,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map raw telemetry onto a severity. An inactive site is `Offline` whatever it last reported.
pub fn classify(site: &Site) -> Severity {
    if !site.is_active {
        return Severity::Offline;
    }
    Severity::from_reported(&site.latest_status)
}

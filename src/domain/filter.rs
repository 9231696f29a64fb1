// Site filtering and aggregate counts for the directory view
use super::site::{Severity, Site};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteFilter {
    #[default]
    All,
    /// Every site whose derived severity is not `Offline`.
    Online,
    Offline,
    /// Exact derived severity.
    Status(Severity),
}

impl SiteFilter {
    pub fn matches(&self, site: &Site) -> bool {
        match self {
            SiteFilter::All => true,
            SiteFilter::Online => site.is_online(),
            SiteFilter::Offline => !site.is_online(),
            SiteFilter::Status(severity) => site.severity() == *severity,
        }
    }
}

impl FromStr for SiteFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(SiteFilter::All),
            "online" => Ok(SiteFilter::Online),
            "offline" => Ok(SiteFilter::Offline),
            "normal" => Ok(SiteFilter::Status(Severity::Normal)),
            "warning" => Ok(SiteFilter::Status(Severity::Warning)),
            "alarm" => Ok(SiteFilter::Status(Severity::Alarm)),
            "unknown" => Ok(SiteFilter::Status(Severity::Unknown)),
            other => Err(format!("unknown site filter '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub online: usize,
    pub offline: usize,
}

impl FilterCounts {
    /// Tally the full collection in a single pass.
    pub fn tally(sites: &[Site]) -> Self {
        sites.iter().fold(Self::default(), |mut counts, site| {
            counts.all += 1;
            if site.is_online() {
                counts.online += 1;
            } else {
                counts.offline += 1;
            }
            counts
        })
    }
}

pub fn filter_sites(sites: &[Site], filter: SiteFilter) -> Vec<Site> {
    sites.iter().filter(|s| filter.matches(s)).cloned().collect()
}

/// Case-insensitive substring match on `region`; an empty needle keeps everything.
pub fn filter_by_region(sites: Vec<Site>, needle: &str) -> Vec<Site> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return sites;
    }
    sites
        .into_iter()
        .filter(|s| s.region.to_lowercase().contains(&needle))
        .collect()
}

// Domain layer - sites, dashboards and status derivation
pub mod dashboard;
pub mod filter;
pub mod site;

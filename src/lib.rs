// Live synchronization engine for rectifier site telemetry
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub mod sim_errors;
pub mod cache_configs;
pub mod addresses;
pub mod replacements;
pub mod caches;
pub mod cache_stats;
pub mod reports;
pub mod sweeps;

// Re-export
pub use cache_configs::{Address, CacheGeometry, Organization, ReplacementPolicy, Tag};
pub use cache_stats::CacheStatistics;
pub use caches::{CacheAccessResult, CacheModel, CacheOrganization};
pub use reports::SimulationReport;
pub use sim_errors::{SimError, SimResult};
pub use sweeps::{run_sweep, SweepConfig};


pub mod csim;
pub mod trace;
pub mod debug;

#[cfg(test)]
mod tests;

//
// Re-export des modules principaux
pub use csim::{CacheGeometry, CacheModel, Organization, ReplacementPolicy, SimError, SimResult};
pub use trace::TraceFile;

//src/trace/mod.rs

pub mod files;
pub mod workloads;

pub use files::{AccessType, TraceFile, TraceRecord};
pub use workloads::{generate_addresses, AccessPattern, WorkloadConfig};

// src/config/mod.rs

pub mod search_config;

// Re-export main types for convenience
pub use search_config::{CalculationConfig, JobConfig, PslqConfig, SearchConfig};

// src/config/search_config.rs

use serde::{Deserialize, Serialize};
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Logging level (error, warn, info, debug, trace)
    pub log_level: String,

    /// Basename of a per-process log file; stderr only when unset
    pub log_file: Option<String>,

    /// Number of worker threads for partitioned jobs
    pub threads: Option<usize>,

    /// Continued fraction evaluation
    pub calculation: CalculationConfig,

    /// Integer relation search
    pub pslq: PslqConfig,

    /// Batch job selection
    pub jobs: JobConfig,
}

/// Recurrence depth, sampling and classification thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// Target recurrence depth (default: 1200)
    pub depth: u64,

    /// Interval between factorial reduction samples (default: 200)
    pub calc_jump: u64,

    /// Interval between gcd reductions of the state (default: 100)
    pub reduce_jump: u64,

    /// Two consecutive samples closer than this mean factorial reduction (default: 0.1)
    pub fr_threshold: f64,

    /// Precision reported when consecutive convergents agree exactly (default: 2000)
    pub infinite_precision: u32,

    /// Decimal digits used for the value during classification (default: 2000)
    pub classification_digits: u32,

    /// PSLQ tolerance exponent of the rational check, 10^-n (default: 100)
    pub rational_tolerance_digits: u32,
}

/// Null-vector search tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PslqConfig {
    /// Fraction of the least precise input trusted during a search (default: 0.9)
    pub precision_safety_factor: f64,

    /// Searches below this many working digits are skipped (default: 100)
    pub min_working_digits: u32,

    /// Largest coefficient magnitude PSLQ may return (default: 1000)
    pub max_coeff: u64,

    /// PSLQ iteration limit (default: 100)
    pub max_steps: usize,

    /// Bits of the working precision given up when re-checking a relation (default: 32)
    pub verify_guard_bits: u32,
}

/// Which constants the batch jobs pick up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Constants taken per run (default: 1000)
    pub bulk: usize,

    /// Precision at which a continued fraction counts as high precision (default: 50)
    pub precision_filter: u32,

    /// Total degree of searched polynomial relations (default: 2)
    pub poly_degree: usize,

    /// Largest exponent of a single variable (default: 1)
    pub inner_degree: usize,

    /// Digits named constants are seeded with (default: 2000)
    pub named_precision: u32,

    /// Named constants per subset (default: 1)
    pub named_count: usize,

    /// Only subsets of exactly `named_count`, otherwise 1..=named_count (default: true)
    pub named_strict: bool,

    /// Continued fractions per subset (default: 1)
    pub pcf_count: usize,

    /// Only subsets of exactly `pcf_count`, otherwise 1..=pcf_count (default: true)
    pub pcf_strict: bool,

    /// Allow constants flagged artificial (default: false)
    pub use_artificial: bool,

    /// Required ratio deg(a) / deg(b) of picked continued fractions, 0 for any (default: 2)
    pub num_denom_factor: i64,

    /// Ratio must match exactly, otherwise it is an upper bound (default: true)
    pub num_denom_strict: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            log_level: "info".to_string(),
            log_file: None,
            threads: None, // Use Rayon's default
            calculation: CalculationConfig::default(),
            pslq: PslqConfig::default(),
            jobs: JobConfig::default(),
        }
    }
}

impl Default for CalculationConfig {
    fn default() -> Self {
        CalculationConfig {
            depth: 1200,
            calc_jump: 200,
            reduce_jump: 100,
            fr_threshold: 0.1,
            infinite_precision: 2000,
            classification_digits: 2000,
            rational_tolerance_digits: 100,
        }
    }
}

impl Default for PslqConfig {
    fn default() -> Self {
        PslqConfig {
            precision_safety_factor: 0.9,
            min_working_digits: 100,
            max_coeff: 1000,
            max_steps: 100,
            verify_guard_bits: 32,
        }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            bulk: 1000,
            precision_filter: 50,
            poly_degree: 2,
            inner_degree: 1,
            named_precision: 2000,
            named_count: 1,
            named_strict: true,
            pcf_count: 1,
            pcf_strict: true,
            use_artificial: false,
            num_denom_factor: 2,
            num_denom_strict: true,
        }
    }
}

impl SearchConfig {
    /// Load configuration with precedence: config file → env vars → defaults
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        // Try to load from config files (TOML preferred, YAML fallback)
        if Path::new("ramanujan.toml").exists() {
            builder = builder.add_source(File::with_name("ramanujan.toml"));
        } else if Path::new("ramanujan.yaml").exists() {
            builder = builder.add_source(File::with_name("ramanujan.yaml"));
        }

        builder = builder.add_source(Self::environment());

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load configuration with custom file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        // Load from specified file
        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        builder = builder.add_source(Self::environment());

        let config = builder.build()?;
        config.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let calculation = CalculationConfig::default();
        let pslq = PslqConfig::default();
        let jobs = JobConfig::default();

        Config::builder()
            .set_default("log_level", "info")?
            .set_default("calculation.depth", calculation.depth)?
            .set_default("calculation.calc_jump", calculation.calc_jump)?
            .set_default("calculation.reduce_jump", calculation.reduce_jump)?
            .set_default("calculation.fr_threshold", calculation.fr_threshold)?
            .set_default("calculation.infinite_precision", calculation.infinite_precision)?
            .set_default("calculation.classification_digits", calculation.classification_digits)?
            .set_default("calculation.rational_tolerance_digits", calculation.rational_tolerance_digits)?
            .set_default("pslq.precision_safety_factor", pslq.precision_safety_factor)?
            .set_default("pslq.min_working_digits", pslq.min_working_digits)?
            .set_default("pslq.max_coeff", pslq.max_coeff)?
            .set_default("pslq.max_steps", pslq.max_steps as u64)?
            .set_default("pslq.verify_guard_bits", pslq.verify_guard_bits)?
            .set_default("jobs.bulk", jobs.bulk as u64)?
            .set_default("jobs.precision_filter", jobs.precision_filter)?
            .set_default("jobs.poly_degree", jobs.poly_degree as u64)?
            .set_default("jobs.inner_degree", jobs.inner_degree as u64)?
            .set_default("jobs.named_precision", jobs.named_precision)?
            .set_default("jobs.named_count", jobs.named_count as u64)?
            .set_default("jobs.named_strict", jobs.named_strict)?
            .set_default("jobs.pcf_count", jobs.pcf_count as u64)?
            .set_default("jobs.pcf_strict", jobs.pcf_strict)?
            .set_default("jobs.use_artificial", jobs.use_artificial)?
            .set_default("jobs.num_denom_factor", jobs.num_denom_factor)?
            .set_default("jobs.num_denom_strict", jobs.num_denom_strict)
    }

    // Override with environment variables, e.g. RAMANUJAN_CALCULATION__DEPTH=3000
    fn environment() -> Environment {
        Environment::with_prefix("RAMANUJAN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Worker count for partitioned jobs.
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.calculation.depth, 1200);
        assert_eq!(config.calculation.calc_jump, 200);
        assert_eq!(config.calculation.reduce_jump, 100);
        assert_eq!(config.calculation.fr_threshold, 0.1);
        assert_eq!(config.calculation.infinite_precision, 2000);
        assert_eq!(config.pslq.precision_safety_factor, 0.9);
        assert_eq!(config.pslq.min_working_digits, 100);
        assert_eq!(config.pslq.max_coeff, 1000);
        assert_eq!(config.jobs.precision_filter, 50);
        assert_eq!((config.jobs.poly_degree, config.jobs.inner_degree), (2, 1));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let config = SearchConfig::load_from_file("does-not-exist.toml")
            .unwrap_or_else(|_| SearchConfig::default());
        assert_eq!(config.calculation.depth, 1200);
        assert_eq!(config.pslq.max_steps, 100);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_thread_count_is_positive() {
        let mut config = SearchConfig::default();
        config.threads = Some(0);
        assert_eq!(config.thread_count(), 1);
        config.threads = None;
        assert!(config.thread_count() >= 1);
    }
}

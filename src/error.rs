// src/error.rs

use thiserror::Error;

/// Errors raised by the numeric core and the jobs around it.
///
/// Expected numeric outcomes (a zero continuant denominator, a rational value, a PSLQ run
/// that finds nothing or a candidate that fails verification) are not errors and never
/// show up here.
#[derive(Error, Debug)]
pub enum PcfError {
    /// A polynomial was given no non-zero coefficient
    #[error("no coefficients")]
    EmptyCoefficients,

    /// A constant value that does not parse as a decimal number
    #[error("invalid decimal value: {0:?}")]
    InvalidDecimal(String),

    /// A stored convergence code outside the known range
    #[error("unknown convergence code {0}")]
    InvalidConvergenceCode(i32),

    /// PSLQ needs at least two values
    #[error("integer relation search needs at least 2 values, got {0}")]
    VectorTooShort(usize),

    /// PSLQ is meaningless below double precision
    #[error("integer relation search needs at least 53 bits of precision, got {bits}")]
    PrecisionTooLow { bits: u32 },

    /// The inputs of a relation search are not trusted to enough digits. Recoverable: the
    /// search is skipped.
    #[error("working precision of {working} digits is below the minimum of {minimum}")]
    InsufficientPrecision { working: u32, minimum: u32 },

    /// A malformed command line argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Logger(#[from] flexi_logger::FlexiLoggerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PcfError {
    /// Whether the batch may log this error and move on to the next input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PcfError::InsufficientPrecision { .. })
    }
}

pub type Result<T> = std::result::Result<T, PcfError>;

// src/numeric/precision.rs

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A working precision, counted in trusted decimal digits.
///
/// Every numeric routine receives its precision explicitly; nothing in the crate keeps a
/// process-wide precision setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    pub fn from_digits(digits: u32) -> Self {
        Precision { digits }
    }

    /// Largest decimal precision representable in `bits` binary digits.
    pub fn from_bits(bits: u32) -> Self {
        Precision {
            digits: (bits as f64 * std::f64::consts::LOG10_2).floor() as u32,
        }
    }

    /// `floor(min(precisions) * safety_factor)`, or zero digits for an empty slice.
    pub fn working(precisions: &[u32], safety_factor: f64) -> Self {
        let least = precisions.iter().copied().min().unwrap_or(0);
        Precision {
            // the epsilon keeps exact products such as 300 * 0.9 from flooring to 269
            digits: (least as f64 * safety_factor + 1e-9).floor() as u32,
        }
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Binary digits needed to hold `digits` decimal digits.
    pub fn bits(&self) -> u32 {
        (self.digits as f64 * std::f64::consts::LOG2_10).ceil() as u32
    }
}

impl Display for Precision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} digits", self.digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_round_trip() {
        let precision = Precision::from_digits(100);
        assert_eq!(precision.bits(), 333);
        assert_eq!(Precision::from_bits(precision.bits()).digits(), 100);
    }

    #[test]
    fn test_working_precision() {
        assert_eq!(Precision::working(&[300, 1200], 0.9).digits(), 270);
        assert_eq!(Precision::working(&[115], 0.9).digits(), 103);
        assert_eq!(Precision::working(&[], 0.9).digits(), 0);
    }
}

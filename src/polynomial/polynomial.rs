// src/polynomial/polynomial.rs

use num::{BigInt, One, Signed, Zero};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use crate::core::serialization::bigint_vec;
use crate::error::{PcfError, Result};

/// Horner evaluation of `coefficients` (highest degree first) at `point`.
pub fn evaluate(coefficients: &[BigInt], point: &BigInt) -> BigInt {
    let mut value = BigInt::zero();
    for coefficient in coefficients {
        value = point * value + coefficient;
    }
    value
}

/// Degree of the polynomial once leading zeros are trimmed.
pub fn degree(coefficients: &[BigInt]) -> Result<usize> {
    match coefficients.iter().position(|c| !c.is_zero()) {
        Some(first) => Ok(coefficients.len() - 1 - first),
        None => Err(PcfError::EmptyCoefficients),
    }
}

/// Integer polynomial in `n`, coefficients stored highest degree first with no leading zeros.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polynomial {
    #[serde(with = "bigint_vec")]
    coefficients: Vec<BigInt>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<BigInt>) -> Result<Self> {
        let first = coefficients
            .iter()
            .position(|c| !c.is_zero())
            .ok_or(PcfError::EmptyCoefficients)?;
        Ok(Polynomial {
            coefficients: coefficients[first..].to_vec(),
        })
    }

    pub fn from_i64(coefficients: &[i64]) -> Result<Self> {
        Self::new(coefficients.iter().map(|&c| BigInt::from(c)).collect())
    }

    pub fn coefficients(&self) -> &[BigInt] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn evaluate(&self, x: &BigInt) -> BigInt {
        evaluate(&self.coefficients, x)
    }

    pub fn evaluate_at(&self, x: u64) -> BigInt {
        self.evaluate(&BigInt::from(x))
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let degree = self.degree();
        let mut wrote = false;
        for (i, coefficient) in self.coefficients.iter().enumerate() {
            if coefficient.is_zero() {
                continue;
            }
            let exponent = degree - i;

            if wrote {
                f.write_str(if coefficient.is_negative() { " - " } else { " + " })?;
            } else if coefficient.is_negative() {
                f.write_str("-")?;
            }

            let magnitude = coefficient.abs();
            if !magnitude.is_one() || exponent == 0 {
                write!(f, "{}", magnitude)?;
            }
            if exponent > 0 {
                f.write_str("n")?;
                if exponent > 1 {
                    write!(f, "^{}", exponent)?;
                }
            }
            wrote = true;
        }
        Ok(())
    }
}

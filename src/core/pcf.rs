// src/core/pcf.rs

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use crate::error::Result;
use crate::polynomial::Polynomial;

/// Polynomial continued fraction b(0) + a(1) / (b(1) + a(2) / (b(2) + ...)).
///
/// `a` supplies the partial numerators and `b` the partial denominators. Both are stored
/// trimmed, so two fractions built from the same coefficients compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pcf {
    pub a: Polynomial,
    pub b: Polynomial,
}

impl Pcf {
    pub fn new(a: Polynomial, b: Polynomial) -> Self {
        Pcf { a, b }
    }

    /// Coefficients are ordered largest power first.
    pub fn from_coefficients(a: &[i64], b: &[i64]) -> Result<Self> {
        Ok(Pcf {
            a: Polynomial::from_i64(a)?,
            b: Polynomial::from_i64(b)?,
        })
    }

    pub fn degrees(&self) -> (usize, usize) {
        (self.a.degree(), self.b.degree())
    }

    /// Degree ratio filter: with `factor > 0` compares deg(b) * factor against deg(a), with
    /// `factor < 0` compares deg(a) * |factor| against deg(b). Strict means equal, otherwise
    /// the scaled side may be smaller. A zero factor accepts everything.
    pub fn matches_degree_ratio(&self, factor: i64, strict: bool) -> bool {
        let (a_degree, b_degree) = self.degrees();
        let (low, high) = if factor > 0 {
            (b_degree as i64 * factor, a_degree as i64)
        } else if factor < 0 {
            (a_degree as i64 * factor.abs(), b_degree as i64)
        } else {
            return true;
        };

        if strict {
            low == high
        } else {
            low <= high
        }
    }
}

impl Display for Pcf {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "a(n) = {}, b(n) = {}", self.a, self.b)
    }
}

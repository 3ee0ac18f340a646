// src/relation_search/pslq.rs
//
// Integer relation detection with the PSLQ algorithm of Ferguson and Bailey, run in binary
// fixed point. Every quantity below is an integer standing for `value / 2^prec`, and indices
// are 1-based to follow the published step numbering.

use log::{debug, trace};
use num::{BigInt, Integer, One, Signed, ToPrimitive, Zero};
use crate::config::PslqConfig;
use crate::error::{PcfError, Result};
use crate::numeric::precision::Precision;
use crate::numeric::real::Real;

const EXTRA_BITS: u32 = 60;
const MIN_BITS: u32 = 53;

/// Search parameters for one PSLQ run.
#[derive(Clone, Debug)]
pub struct Pslq {
    bits: u32,
    tolerance: Option<Real>,
    max_coeff: u64,
    max_steps: usize,
}

impl Pslq {
    /// Runs at `bits` of precision with a tolerance of 2^-(3 bits / 4).
    pub fn new(bits: u32) -> Self {
        Pslq {
            bits,
            tolerance: None,
            max_coeff: 1000,
            max_steps: 100,
        }
    }

    pub fn from_config(precision: Precision, config: &PslqConfig) -> Self {
        Pslq::new(precision.bits())
            .with_max_coeff(config.max_coeff)
            .with_max_steps(config.max_steps)
    }

    pub fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_max_coeff(mut self, max_coeff: u64) -> Self {
        self.max_coeff = max_coeff;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Looks for integers c with sum c_i x_i ~ 0 and every |c_i| below `max_coeff`.
    ///
    /// Returns `Ok(None)` when the step budget runs out, the norm bound passes `max_coeff`, or
    /// an input is zero or below the tolerance. The first non-zero coefficient of a relation is
    /// always positive.
    pub fn find_relation(&self, values: &[Real]) -> Result<Option<Vec<BigInt>>> {
        let n = values.len();
        if n < 2 {
            return Err(PcfError::VectorTooShort(n));
        }
        if self.bits < MIN_BITS {
            return Err(PcfError::PrecisionTooLow { bits: self.bits });
        }

        let target = self.bits * 3 / 4;
        let prec = self.bits + EXTRA_BITS;
        let tolerance = match &self.tolerance {
            Some(tolerance) => tolerance.rescale(prec).mantissa().abs(),
            None => BigInt::one() << (prec - target),
        };
        if tolerance.is_zero() {
            return Err(PcfError::PrecisionTooLow { bits: self.bits });
        }

        let mut x = vec![BigInt::zero(); n + 1];
        for (k, value) in values.iter().enumerate() {
            x[k + 1] = value.rescale(prec).mantissa().clone();
        }

        let min_x = x[1..].iter().map(|v| v.abs()).min().unwrap_or_else(BigInt::zero);
        if min_x.is_zero() {
            debug!("integer relation search skipped, an input value is zero");
            return Ok(None);
        }
        if min_x < &tolerance / 100u32 {
            debug!("integer relation search skipped, an input value is below the tolerance");
            return Ok(None);
        }

        let relation = Search::new(prec, &x, self.max_coeff).run(&tolerance, self.max_steps);
        Ok(relation.map(normalize_sign))
    }
}

fn shr(value: BigInt, prec: u32) -> BigInt {
    value >> prec
}

fn div_fixed(numerator: &BigInt, denominator: &BigInt, prec: u32) -> BigInt {
    (numerator << prec).div_floor(denominator)
}

fn round_fixed(x: &BigInt, prec: u32) -> BigInt {
    ((x + (BigInt::one() << (prec - 1))) >> prec) << prec
}

fn sqrt_fixed(x: &BigInt, prec: u32) -> BigInt {
    (x << prec).sqrt()
}

fn normalize_sign(relation: Vec<BigInt>) -> Vec<BigInt> {
    match relation.iter().find(|c| !c.is_zero()) {
        Some(first) if first.is_negative() => relation.into_iter().map(|c| -c).collect(),
        _ => relation,
    }
}

type Matrix = Vec<Vec<BigInt>>;

struct Search {
    n: usize,
    prec: u32,
    max_coeff: u64,
    y: Vec<BigInt>,
    a: Matrix,
    b: Matrix,
    h: Matrix,
}

impl Search {
    fn new(prec: u32, x: &[BigInt], max_coeff: u64) -> Self {
        let n = x.len() - 1;
        let one = BigInt::one() << prec;
        let mut a = vec![vec![BigInt::zero(); n + 1]; n + 1];
        for (i, row) in a.iter_mut().enumerate().skip(1) {
            row[i] = one.clone();
        }
        let b = a.clone();
        let mut h = vec![vec![BigInt::zero(); n + 1]; n + 1];

        // partial norms s_k = sqrt(sum_{j >= k} x_j^2), then scale x and s by s_1
        let mut s = vec![BigInt::zero(); n + 1];
        for k in 1..=n {
            let mut t = BigInt::zero();
            for x_j in &x[k..=n] {
                t += shr(x_j * x_j, prec);
            }
            s[k] = sqrt_fixed(&t, prec);
        }
        let t = s[1].clone();
        let mut y = x.to_vec();
        for k in 1..=n {
            y[k] = div_fixed(&x[k], &t, prec);
            s[k] = div_fixed(&s[k], &t, prec);
        }

        for i in 1..=n {
            if i < n {
                h[i][i] = if s[i].is_zero() {
                    BigInt::zero()
                } else {
                    div_fixed(&s[i + 1], &s[i], prec)
                };
            }
            for j in 1..i {
                let s_product = &s[j] * &s[j + 1];
                h[i][j] = if s_product.is_zero() {
                    BigInt::zero()
                } else {
                    div_fixed(&(-&y[i] * &y[j]), &s_product, prec)
                };
            }
        }

        let mut search = Search {
            n,
            prec,
            max_coeff,
            y,
            a,
            b,
            h,
        };
        for i in 2..=n {
            for j in (1..i).rev() {
                if search.h[j][j].is_zero() {
                    continue;
                }
                search.reduce_row(i, j);
            }
        }
        search
    }

    /// Subtracts the nearest integer multiple of row j from row i.
    fn reduce_row(&mut self, i: usize, j: usize) {
        let prec = self.prec;
        let t = round_fixed(&div_fixed(&self.h[i][j], &self.h[j][j], prec), prec);
        self.y[j] = &self.y[j] + shr(&t * &self.y[i], prec);
        for k in 1..=j {
            self.h[i][k] = &self.h[i][k] - shr(&t * &self.h[j][k], prec);
        }
        for k in 1..=self.n {
            self.a[i][k] = &self.a[i][k] - shr(&t * &self.a[j][k], prec);
            self.b[k][j] = &self.b[k][j] + shr(&t * &self.b[k][i], prec);
        }
    }

    fn run(mut self, tolerance: &BigInt, max_steps: usize) -> Option<Vec<BigInt>> {
        let n = self.n;
        let prec = self.prec;
        let gamma = sqrt_fixed(&((BigInt::from(4) << prec) / 3u32), prec);
        let max_coeff = BigInt::from(self.max_coeff);

        for step in 0..max_steps {
            // exchange the rows with the largest weighted diagonal entry
            let mut m = 1;
            let mut largest = BigInt::from(-1);
            for i in 1..n {
                let weighted = shr(num::pow(gamma.clone(), i) * self.h[i][i].abs(), prec * (i as u32 - 1));
                if weighted > largest {
                    m = i;
                    largest = weighted;
                }
            }

            self.y.swap(m, m + 1);
            self.h.swap(m, m + 1);
            self.a.swap(m, m + 1);
            for row in self.b.iter_mut() {
                row.swap(m, m + 1);
            }

            // restore the lower trapezoidal shape of H
            if m + 2 <= n {
                let squares = shr(&self.h[m][m] * &self.h[m][m] + &self.h[m][m + 1] * &self.h[m][m + 1], prec);
                let t0 = sqrt_fixed(&squares, prec);
                if t0.is_zero() {
                    trace!("pslq stopped at step {}, precision exhausted", step);
                    break;
                }
                let t1 = div_fixed(&self.h[m][m], &t0, prec);
                let t2 = div_fixed(&self.h[m][m + 1], &t0, prec);
                for i in m..=n {
                    let t3 = self.h[i][m].clone();
                    let t4 = self.h[i][m + 1].clone();
                    self.h[i][m] = shr(&t1 * &t3 + &t2 * &t4, prec);
                    self.h[i][m + 1] = shr(-&t2 * &t3 + &t1 * &t4, prec);
                }
            }

            for i in m + 1..=n {
                for j in (1..=(i - 1).min(m + 1)).rev() {
                    if self.h[j][j].is_zero() {
                        break;
                    }
                    self.reduce_row(i, j);
                }
            }

            for i in 1..=n {
                if self.y[i].abs() < *tolerance {
                    let relation: Vec<BigInt> = (1..=n)
                        .map(|j| round_fixed(&self.b[j][i], prec) >> prec)
                        .collect();
                    if relation.iter().all(|c| c.abs() < max_coeff) {
                        debug!("pslq found a relation at step {}/{}", step, max_steps);
                        return Some(relation);
                    }
                }
            }

            // lower bound on the norm of any relation
            let recnorm = self.h.iter().flatten().map(|h| h.abs()).max().unwrap_or_else(BigInt::zero);
            if !recnorm.is_zero() {
                let norm: BigInt = ((BigInt::one() << (2 * prec)) / &recnorm >> prec) / 100u32;
                if norm >= max_coeff {
                    trace!("pslq norm bound {} passed the coefficient limit", norm.to_u64().unwrap_or(u64::MAX));
                    break;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::named::NamedConstant;

    fn ints(values: &[i64]) -> Vec<BigInt> {
        values.iter().map(|&v| BigInt::from(v)).collect()
    }

    #[test]
    fn test_golden_ratio_quadratic() {
        let precision = Precision::from_digits(60);
        let bits = precision.bits();
        let phi = NamedConstant::Phi.value(precision);
        let values = vec![Real::one(bits), phi.clone(), &phi * &phi];
        let relation = Pslq::new(bits).find_relation(&values).unwrap();
        // 1 + phi - phi^2 = 0
        assert_eq!(relation, Some(ints(&[1, 1, -1])));
    }

    #[test]
    fn test_independent_values() {
        let precision = Precision::from_digits(50);
        let bits = precision.bits();
        let values = vec![
            Real::one(bits),
            NamedConstant::Pi.value(precision),
            NamedConstant::E.value(precision),
        ];
        let relation = Pslq::new(bits).with_max_coeff(100).find_relation(&values).unwrap();
        assert_eq!(relation, None);
    }

    #[test]
    fn test_zero_input_has_no_relation() {
        let bits = 200;
        let values = vec![Real::one(bits), Real::zero(bits)];
        assert_eq!(Pslq::new(bits).find_relation(&values).unwrap(), None);
    }

    #[test]
    fn test_contract_errors() {
        let bits = 200;
        assert!(matches!(
            Pslq::new(bits).find_relation(&[Real::one(bits)]),
            Err(PcfError::VectorTooShort(1))
        ));
        assert!(matches!(
            Pslq::new(32).find_relation(&[Real::one(32), Real::one(32)]),
            Err(PcfError::PrecisionTooLow { bits: 32 })
        ));
    }

    #[test]
    fn test_sign_normalization() {
        assert_eq!(normalize_sign(ints(&[0, -1, 2])), ints(&[0, 1, -2]));
        assert_eq!(normalize_sign(ints(&[3, -1])), ints(&[3, -1]));
    }
}

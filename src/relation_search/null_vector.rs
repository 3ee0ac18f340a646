// src/relation_search/null_vector.rs

use log::{debug, info};
use num::{BigInt, Signed, Zero};
use crate::config::PslqConfig;
use crate::error::{PcfError, Result};
use crate::numeric::precision::Precision;
use crate::numeric::real::Real;
use crate::relation_search::monomials::MonomialBasis;
use crate::relation_search::pslq::Pslq;

/// floor(min(precisions) * safety factor), refused below `min_working_digits`.
pub fn working_precision(precisions: &[u32], config: &PslqConfig) -> Result<Precision> {
    let working = Precision::working(precisions, config.precision_safety_factor);
    if working.digits() < config.min_working_digits {
        return Err(PcfError::InsufficientPrecision {
            working: working.digits(),
            minimum: config.min_working_digits,
        });
    }
    Ok(working)
}

fn times(value: &Real, coefficient: &BigInt) -> Real {
    Real::from_mantissa(value.mantissa() * coefficient, value.bits())
}

fn plus(value: &Real, coefficient: &BigInt) -> Real {
    value + &Real::from_integer(coefficient, value.bits())
}

/// sum r_i c_i + r_k over constants c_1..c_k.
fn affine(constants: &[Real], coefficients: &[BigInt], bits: u32) -> Real {
    let k = constants.len();
    let linear = constants
        .iter()
        .zip(&coefficients[..k])
        .fold(Real::zero(bits), |sum, (value, c)| &sum + &times(value, c));
    plus(&linear, &coefficients[k])
}

/// Checks (a M + b) = cf (c M + d) for `result` = [a, b, c, d]. A relation with a = c = 0 says
/// nothing about M and is rejected.
pub fn verify_mobius(constant: &Real, cf: &Real, result: &[BigInt], guard_bits: u32) -> bool {
    verify_linear(std::slice::from_ref(constant), cf, result, guard_bits)
}

/// Checks (sum a_i c_i + b) = cf (sum c'_i c_i + d) for `result` = [a.., b, c'.., d].
pub fn verify_linear(constants: &[Real], cf: &Real, result: &[BigInt], guard_bits: u32) -> bool {
    let k = constants.len();
    if result.len() != 2 * k + 2 {
        return false;
    }
    let constant_terms = result[..k].iter().chain(&result[k + 1..2 * k + 1]);
    if constant_terms.clone().count() > 0 && constant_terms.clone().all(|c| c.is_zero()) {
        info!("False positive, no constant takes part in {:?}", result);
        return false;
    }

    let bits = cf.bits();
    let left = affine(constants, &result[..k + 1], bits);
    let right = cf * &affine(constants, &result[k + 1..], bits);
    if left.almost_eq(&right, guard_bits) {
        return true;
    }
    info!("False positive {:?}", result);
    false
}

/// Checks sum c_i v_i ~ 0 relative to the size of its terms.
pub fn verify_null(values: &[Real], result: &[BigInt], guard_bits: u32) -> bool {
    if values.len() != result.len() || result.iter().all(|c| c.is_zero()) {
        return false;
    }
    let bits = values.iter().map(|v| v.bits()).max().unwrap_or(0);
    let mut positive = Real::zero(bits);
    let mut negative = Real::zero(bits);
    for (value, coefficient) in values.iter().zip(result) {
        let term = times(value, coefficient);
        if term.is_negative() {
            negative = &negative - &term;
        } else {
            positive = &positive + &term;
        }
    }
    if positive.almost_eq(&negative, guard_bits) {
        return true;
    }
    info!("False positive {:?}", result);
    false
}

/// Integer relation searches at one working precision, every hit re-checked before it is
/// returned.
#[derive(Clone, Debug)]
pub struct NullVectorSearch {
    pslq: Pslq,
    guard_bits: u32,
}

impl NullVectorSearch {
    pub fn new(pslq: Pslq, guard_bits: u32) -> Self {
        NullVectorSearch { pslq, guard_bits }
    }

    pub fn from_config(precision: Precision, config: &PslqConfig) -> Self {
        NullVectorSearch::new(Pslq::from_config(precision, config), config.verify_guard_bits)
    }

    pub fn bits(&self) -> u32 {
        self.pslq.bits()
    }

    fn at_working(&self, value: &Real) -> Real {
        value.rescale(self.bits())
    }

    /// Integers [a, b, c, d] with (a M + b) / (c M + d) = cf, from the relation on
    /// (M, 1, -cf M, -cf).
    pub fn mobius(&self, constant: &Real, cf: &Real) -> Result<Option<Vec<BigInt>>> {
        self.linear(std::slice::from_ref(constant), cf)
    }

    /// Integers with (sum a_i c_i + b) / (sum c'_i c_i + d) = cf, from the relation on
    /// (c_1.., 1, -cf c_1.., -cf).
    pub fn linear(&self, constants: &[Real], cf: &Real) -> Result<Option<Vec<BigInt>>> {
        let bits = self.bits();
        let constants: Vec<Real> = constants.iter().map(|c| self.at_working(c)).collect();
        let cf = self.at_working(cf);
        let negated = -&cf;

        let mut vector = constants.clone();
        vector.push(Real::one(bits));
        vector.extend(constants.iter().map(|c| &negated * c));
        vector.push(negated);

        let result = match self.pslq.find_relation(&vector)? {
            Some(result) => result,
            None => return Ok(None),
        };
        if verify_linear(&constants, &cf, &result, self.guard_bits) {
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    /// A verified relation between the given values.
    pub fn find_null_polynomial(&self, values: &[Real]) -> Result<Option<Vec<BigInt>>> {
        let values: Vec<Real> = values.iter().map(|v| self.at_working(v)).collect();
        let result = match self.pslq.find_relation(&values)? {
            Some(result) => result,
            None => return Ok(None),
        };
        if verify_null(&values, &result, self.guard_bits) {
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    /// A relation between the monomials of `basis` evaluated at `values`.
    ///
    /// Nothing is searched when 1 is among the values, the constant monomial already covers it.
    pub fn polynomial(&self, values: &[Real], basis: &MonomialBasis) -> Result<Option<Vec<BigInt>>> {
        if values.iter().any(|v| v.is_one()) {
            debug!("1 is among the values, skipping");
            return Ok(None);
        }
        let bits = self.bits();
        let values: Vec<Real> = values.iter().map(|v| self.at_working(v)).collect();
        let monomials = basis.evaluate(&values, bits);
        let result = self.find_null_polynomial(&monomials)?;
        if let Some(relation) = &result {
            let largest = relation.iter().map(|c| c.abs()).max().unwrap_or_else(BigInt::zero);
            info!("Found relation, largest coefficient {}", largest);
        }
        Ok(result)
    }
}

// src/core/cf_calc.rs

use log::trace;
use num::{BigInt, BigRational, One, Signed, Zero};
use std::fmt::{Display, Formatter, Result as FmtResult};
use crate::core::calc_data::CalcData;
use crate::core::pcf::Pcf;
use crate::integer_math::gcd::GCD;

/// Decimal digits of agreement between the two latest convergents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConvergentPrecision {
    Digits(i64),
    /// The convergents are equal, so the difference has no logarithm.
    Infinite,
}

impl ConvergentPrecision {
    /// Digits as a plain integer, reporting `Infinite` as the given sentinel.
    pub fn to_digits(self, infinite: u32) -> i64 {
        match self {
            ConvergentPrecision::Digits(digits) => digits,
            ConvergentPrecision::Infinite => infinite as i64,
        }
    }
}

impl Display for ConvergentPrecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ConvergentPrecision::Digits(digits) => write!(f, "{}", digits),
            ConvergentPrecision::Infinite => write!(f, "inf"),
        }
    }
}

/// Continuant recurrence of a polynomial continued fraction.
///
/// Step n evaluates a(n) and b(n) and moves the state from (A_{n-2}, B_{n-2}, A_{n-1}, B_{n-1})
/// to (A_{n-1}, B_{n-1}, A_n, B_n) with A_n = b(n) A_{n-1} + a(n) A_{n-2}, likewise for B.
/// `reduce` divides the state by the gcd of its four entries and folds the factor into
/// `reduction`, so `reduction * state` is always the unreduced state accumulated by this
/// instance. `log_reduction` is the natural log of every factor taken out since step 0,
/// including those before a checkpoint.
#[derive(Clone, Debug)]
pub struct CfCalc {
    pcf: Pcf,
    data: CalcData,
    iteration: u64,
    reduction: BigInt,
    log_reduction: f64,
}

impl CfCalc {
    pub fn new(pcf: Pcf) -> Self {
        let data = CalcData::initial(pcf.b.evaluate_at(0));
        CfCalc {
            pcf,
            data,
            iteration: 0,
            reduction: BigInt::one(),
            log_reduction: 0.0,
        }
    }

    /// Continues from a checkpoint taken after `iteration` steps, `log_reduction` being the
    /// value of [`CfCalc::log_reduction`] at that point.
    pub fn resume(pcf: Pcf, data: CalcData, iteration: u64, log_reduction: f64) -> Self {
        CfCalc {
            pcf,
            data,
            iteration,
            reduction: BigInt::one(),
            log_reduction,
        }
    }

    pub fn advance(&mut self) {
        let n = self.iteration + 1;
        let a_n = self.pcf.a.evaluate_at(n);
        let b_n = self.pcf.b.evaluate_at(n);

        let next_a = &b_n * &self.data.a1 + &a_n * &self.data.a0;
        let next_b = &b_n * &self.data.b1 + &a_n * &self.data.b0;

        let previous_a = std::mem::replace(&mut self.data.a1, next_a);
        let previous_b = std::mem::replace(&mut self.data.b1, next_b);
        self.data.a0 = previous_a;
        self.data.b0 = previous_b;
        self.iteration = n;
    }

    pub fn advance_by(&mut self, steps: u64) {
        for _ in 0..steps {
            self.advance();
        }
    }

    /// Divides the state by gcd(gcd(A_n, B_n), gcd(A_{n-1}, B_{n-1})) and returns the factor.
    /// An all-zero state is left alone and reports 1.
    pub fn reduce(&mut self) -> BigInt {
        let factor = GCD::find_gcd(&self.data.to_vec());
        if factor.is_zero() || factor.is_one() {
            return BigInt::one();
        }

        self.data.a0 /= &factor;
        self.data.b0 /= &factor;
        self.data.a1 /= &factor;
        self.data.b1 /= &factor;
        self.log_reduction += GCD::ln(&factor);
        self.reduction *= &factor;
        trace!("reduced state at depth {} by {} bits", self.iteration, factor.bits());
        factor
    }

    /// A_n / B_n, `None` while the denominator continuant is zero.
    pub fn value(&self) -> Option<BigRational> {
        if self.data.b1.is_zero() {
            return None;
        }
        Some(BigRational::new(self.data.a1.clone(), self.data.b1.clone()))
    }

    /// floor(-log10 |A_n/B_n - A_{n-1}/B_{n-1}|), `None` when either denominator is zero.
    pub fn precision(&self) -> Option<ConvergentPrecision> {
        let CalcData { a0, b0, a1, b1 } = &self.data;
        if b0.is_zero() || b1.is_zero() {
            return None;
        }

        let difference = (a1 * b0 - a0 * b1).abs();
        if difference.is_zero() {
            return Some(ConvergentPrecision::Infinite);
        }
        let denominator = (b0 * b1).abs();
        Some(ConvergentPrecision::Digits(GCD::floor_log10_ratio(&denominator, &difference)))
    }

    pub fn pcf(&self) -> &Pcf {
        &self.pcf
    }

    pub fn data(&self) -> &CalcData {
        &self.data
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn reduction(&self) -> &BigInt {
        &self.reduction
    }

    pub fn log_reduction(&self) -> f64 {
        self.log_reduction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones() -> Pcf {
        Pcf::from_coefficients(&[1], &[1]).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let pcf = Pcf::from_coefficients(&[1], &[2, 3]).unwrap();
        let calc = CfCalc::new(pcf);
        assert_eq!(calc.data(), &CalcData::initial(BigInt::from(3)));
        assert_eq!(calc.iteration(), 0);
        // b0 is zero before the first step
        assert_eq!(calc.precision(), None);
    }

    #[test]
    fn test_fibonacci_convergents() {
        let mut calc = CfCalc::new(ones());
        calc.advance_by(5);
        // 1 + 1/(1 + 1/(...)) gives ratios of Fibonacci numbers
        assert_eq!(calc.data().a1, BigInt::from(13));
        assert_eq!(calc.data().b1, BigInt::from(8));
        assert_eq!(calc.value(), Some(BigRational::new(BigInt::from(13), BigInt::from(8))));
        // |13/8 - 8/5| = 1/40
        assert_eq!(calc.precision(), Some(ConvergentPrecision::Digits(1)));
    }

    #[test]
    fn test_reduce_tracks_factor() {
        // a(n) = n^2, b(n) = 2n + 1 converges to 4/pi and builds up common factors
        let pcf = Pcf::from_coefficients(&[1, 0, 0], &[2, 1]).unwrap();
        let mut calc = CfCalc::new(pcf.clone());
        calc.advance_by(40);
        let unreduced = calc.data().clone();
        let value = calc.value();
        let factor = calc.reduce();

        assert_eq!(calc.value(), value);
        assert_eq!(calc.reduction(), &factor);
        assert_eq!(calc.log_reduction(), GCD::ln(&factor));
        assert_eq!(&calc.data().a1 * &factor, unreduced.a1);
        assert_eq!(&calc.data().b0 * &factor, unreduced.b0);
    }

    #[test]
    fn test_equal_convergents_are_infinite() {
        // a(1) = 0 makes the first convergent repeat b(0)
        let pcf = Pcf::from_coefficients(&[1, -1], &[3]).unwrap();
        let mut calc = CfCalc::new(pcf);
        calc.advance();
        assert_eq!(calc.precision(), Some(ConvergentPrecision::Infinite));
        assert_eq!(ConvergentPrecision::Infinite.to_digits(2000), 2000);
        assert_eq!(ConvergentPrecision::Digits(-3).to_digits(2000), -3);
    }
}

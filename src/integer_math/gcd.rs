// src/integer_math/gcd.rs

use num::{BigInt, Integer, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;

pub struct GCD;

impl GCD {
    pub fn find_gcd(numbers: &[BigInt]) -> BigInt {
        numbers.iter().fold(BigInt::from(0), |acc, x| Self::find_gcd_pair(&acc, x))
    }

    pub fn find_gcd_pair(left: &BigInt, right: &BigInt) -> BigInt {
        left.gcd(right)
    }

    /// Natural logarithm of |n|, accurate to double precision for any magnitude.
    /// Returns negative infinity for zero.
    pub fn ln(n: &BigInt) -> f64 {
        if n.is_zero() {
            return f64::NEG_INFINITY;
        }
        let magnitude = n.abs();
        let bits = magnitude.bits();
        if bits <= 1000 {
            if let Some(value) = magnitude.to_f64() {
                return value.ln();
            }
        }
        // keep the top 64 bits and account for the rest as a power of two
        let shift = bits - 64;
        let top = (&magnitude >> shift).to_f64().unwrap_or(f64::MAX);
        top.ln() + shift as f64 * std::f64::consts::LN_2
    }

    /// floor(log10(numerator / denominator)) for positive integers, computed exactly.
    pub fn floor_log10_ratio(numerator: &BigInt, denominator: &BigInt) -> i64 {
        debug_assert!(numerator.is_positive() && denominator.is_positive());

        // estimate from bit lengths, then correct by whole decades
        let estimate = (numerator.bits() as f64 - denominator.bits() as f64) * std::f64::consts::LOG10_2;
        let mut k = estimate.floor() as i64;
        let ten = BigInt::from(10);

        let fits = |k: i64| -> bool {
            // 10^k * denominator <= numerator
            if k >= 0 {
                let scaled = denominator * num::pow(ten.clone(), k as usize);
                scaled.cmp(numerator) != Ordering::Greater
            } else {
                let scaled = numerator * num::pow(ten.clone(), (-k) as usize);
                denominator.cmp(&scaled) != Ordering::Greater
            }
        };

        while !fits(k) {
            k -= 1;
        }
        while fits(k + 1) {
            k += 1;
        }
        k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_gcd() {
        let numbers: Vec<BigInt> = vec![12, -18, 30, 0].into_iter().map(BigInt::from).collect();
        assert_eq!(GCD::find_gcd(&numbers), BigInt::from(6));
        assert_eq!(GCD::find_gcd(&[BigInt::zero(), BigInt::zero()]), BigInt::zero());
    }

    #[test]
    fn test_ln_small_and_huge() {
        assert!((GCD::ln(&BigInt::from(1000)) - 1000f64.ln()).abs() < 1e-12);
        let huge = num::pow(BigInt::from(10), 5000);
        let expected = 5000.0 * 10f64.ln();
        assert!((GCD::ln(&huge) - expected).abs() / expected < 1e-12);
        assert_eq!(GCD::ln(&BigInt::zero()), f64::NEG_INFINITY);
    }

    #[test]
    fn test_floor_log10_ratio() {
        let b = |n: i64| BigInt::from(n);
        assert_eq!(GCD::floor_log10_ratio(&b(1000), &b(1)), 3);
        assert_eq!(GCD::floor_log10_ratio(&b(999), &b(1)), 2);
        assert_eq!(GCD::floor_log10_ratio(&b(1), &b(1)), 0);
        assert_eq!(GCD::floor_log10_ratio(&b(1), &b(3)), -1);
        assert_eq!(GCD::floor_log10_ratio(&b(1), &b(10)), -1);
        assert_eq!(GCD::floor_log10_ratio(&b(1), &b(11)), -2);
    }
}

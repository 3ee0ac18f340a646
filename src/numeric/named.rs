// src/numeric/named.rs
//
// Well known constants evaluated to any precision with exact integer series.

use num::{BigInt, Integer, One, Zero};
use serde::{Deserialize, Serialize};
use crate::numeric::precision::Precision;
use crate::numeric::real::Real;

const GUARD_BITS: u32 = 32;

/// Constants the store can be seeded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedConstant {
    Pi,
    E,
    Phi,
    Sqrt2,
    Ln2,
    Zeta3,
    Catalan,
}

impl NamedConstant {
    pub const ALL: [NamedConstant; 7] = [
        NamedConstant::Pi,
        NamedConstant::E,
        NamedConstant::Phi,
        NamedConstant::Sqrt2,
        NamedConstant::Ln2,
        NamedConstant::Zeta3,
        NamedConstant::Catalan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
            Self::Phi => "phi",
            Self::Sqrt2 => "sqrt2",
            Self::Ln2 => "ln2",
            Self::Zeta3 => "zeta3",
            Self::Catalan => "catalan",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Pi => "fundamental circle constant",
            Self::E => "euler number, base of the natural logarithm",
            Self::Phi => "golden ratio, positive root of x^2 - x - 1",
            Self::Sqrt2 => "pythagoras constant",
            Self::Ln2 => "natural logarithm of 2",
            Self::Zeta3 => "apery constant, zeta(3)",
            Self::Catalan => "catalan constant",
        }
    }

    /// Constants easily related to others in the set.
    pub fn is_artificial(&self) -> bool {
        matches!(self, Self::Sqrt2)
    }

    /// The constant with a few guard bits beyond `precision`, so rounding it to
    /// `precision.digits()` decimals gets the last digit right.
    pub fn guarded_value(&self, precision: Precision) -> Real {
        let bits = precision.bits() + GUARD_BITS;
        match self {
            Self::Pi => pi(bits),
            Self::E => e(bits),
            Self::Phi => phi(bits),
            Self::Sqrt2 => sqrt_integer(2, bits),
            Self::Ln2 => ln2(bits),
            Self::Zeta3 => zeta3(bits),
            Self::Catalan => catalan(bits),
        }
    }

    /// The constant truncated to `precision.bits()`.
    pub fn value(&self, precision: Precision) -> Real {
        self.guarded_value(precision).rescale(precision.bits())
    }
}

fn one(bits: u32) -> BigInt {
    BigInt::one() << bits
}

fn sqrt_integer(n: u32, bits: u32) -> Real {
    Real::from_mantissa((BigInt::from(n) << (2 * bits)).sqrt(), bits)
}

fn e(bits: u32) -> Real {
    let mut sum = BigInt::zero();
    let mut term = one(bits);
    let mut k = 1u64;
    while !term.is_zero() {
        sum += &term;
        term /= k;
        k += 1;
    }
    Real::from_mantissa(sum, bits)
}

/// atan(1/x) by its Taylor series.
fn atan_inverse(x: u64, bits: u32) -> BigInt {
    let x_squared = BigInt::from(x) * x;
    let mut power: BigInt = one(bits) / x;
    let mut sum = BigInt::zero();
    let mut n = 1u64;
    let mut positive = true;
    while !power.is_zero() {
        let term = &power / n;
        if positive {
            sum += term;
        } else {
            sum -= term;
        }
        power /= &x_squared;
        n += 2;
        positive = !positive;
    }
    sum
}

fn pi(bits: u32) -> Real {
    // Machin: pi = 16 atan(1/5) - 4 atan(1/239)
    let mantissa = atan_inverse(5, bits) * 16u32 - atan_inverse(239, bits) * 4u32;
    Real::from_mantissa(mantissa, bits)
}

fn phi(bits: u32) -> Real {
    let root5 = sqrt_integer(5, bits);
    Real::from_mantissa((root5.mantissa() + one(bits)) >> 1, bits)
}

fn ln2(bits: u32) -> Real {
    // 2 atanh(1/3) = 2 sum 1 / ((2k+1) 3^(2k+1))
    let mut power: BigInt = one(bits) / 3;
    let mut sum = BigInt::zero();
    let mut n = 1u64;
    while !power.is_zero() {
        sum += &power / n;
        power /= 9;
        n += 2;
    }
    Real::from_mantissa(sum * 2u32, bits)
}

fn zeta3(bits: u32) -> Real {
    // 5/2 sum_{k>=1} (-1)^(k+1) / (k^3 C(2k,k))
    let mut inverse_binomial: BigInt = one(bits) / 2;
    let mut sum = BigInt::zero();
    let mut k = 1u64;
    while !inverse_binomial.is_zero() {
        let term = &inverse_binomial / (k * k * k);
        if k.is_odd() {
            sum += term;
        } else {
            sum -= term;
        }
        inverse_binomial = inverse_binomial * (k + 1) / (2 * (2 * k + 1));
        k += 1;
    }
    Real::from_mantissa(sum * 5u32 / 2u32, bits)
}

fn catalan(bits: u32) -> Real {
    // pi/8 ln(2 + sqrt 3) + 3/8 sum_{k>=0} 1 / ((2k+1)^2 C(2k,k))
    // with ln(2 + sqrt 3) = 2 atanh(1/sqrt 3) = 2/sqrt 3 sum_{k>=0} 3^-k / (2k+1)
    let mut power = one(bits);
    let mut atanh_sum = BigInt::zero();
    let mut n = 1u64;
    while !power.is_zero() {
        atanh_sum += &power / n;
        power /= 3;
        n += 2;
    }
    let root3 = sqrt_integer(3, bits);
    let log_term = Real::from_mantissa(atanh_sum * 2u32, bits) * root3 / Real::from_i64(3, bits);

    let mut inverse_binomial = one(bits);
    let mut series = BigInt::zero();
    let mut k = 0u64;
    while !inverse_binomial.is_zero() {
        let odd = 2 * k + 1;
        series += &inverse_binomial / (odd * odd);
        inverse_binomial = inverse_binomial * (k + 1) / (2 * odd);
        k += 1;
    }

    let eighth = Real::from_ratio(&BigInt::one(), &BigInt::from(8), bits).unwrap_or_else(|| Real::zero(bits));
    let first = &(&pi(bits) * &eighth) * &log_term;
    let second = Real::from_mantissa(series * 3u32 / 8u32, bits);
    &first + &second
}

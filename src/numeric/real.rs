// src/numeric/real.rs

use num::{BigInt, BigRational, Integer, One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::{Add, Div, Mul, Neg, Sub};
use crate::error::{PcfError, Result};
use crate::numeric::precision::Precision;

/// Binary fixed-point real number: `mantissa / 2^bits`.
///
/// Operands of a binary operation are aligned to the larger of their two scales. Products and
/// quotients round toward negative infinity, which is what the PSLQ recurrences expect.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Real {
    mantissa: BigInt,
    bits: u32,
}

impl Real {
    pub fn from_mantissa(mantissa: BigInt, bits: u32) -> Self {
        Real { mantissa, bits }
    }

    pub fn zero(bits: u32) -> Self {
        Real { mantissa: BigInt::zero(), bits }
    }

    pub fn one(bits: u32) -> Self {
        Real { mantissa: BigInt::one() << bits, bits }
    }

    pub fn from_integer(value: &BigInt, bits: u32) -> Self {
        Real { mantissa: value << bits, bits }
    }

    pub fn from_i64(value: i64, bits: u32) -> Self {
        Self::from_integer(&BigInt::from(value), bits)
    }

    /// `numerator / denominator` rounded to nearest, `None` for a zero denominator.
    pub fn from_ratio(numerator: &BigInt, denominator: &BigInt, bits: u32) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let (numerator, denominator) = if denominator.is_negative() {
            (-numerator, -denominator)
        } else {
            (numerator.clone(), denominator.clone())
        };
        let twice = (numerator << (bits + 1)) + &denominator;
        let mantissa = twice.div_floor(&(denominator * 2u32));
        Some(Real { mantissa, bits })
    }

    pub fn from_rational(value: &BigRational, bits: u32) -> Self {
        // a BigRational always has a non-zero denominator
        Self::from_ratio(value.numer(), value.denom(), bits).unwrap_or_else(|| Self::zero(bits))
    }

    /// Parses `[-+]digits[.digits][e[-+]digits]`.
    pub fn parse(text: &str, bits: u32) -> Result<Self> {
        let invalid = || PcfError::InvalidDecimal(text.to_string());
        let trimmed = text.trim();

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (body, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
            Some(index) => {
                let exponent: i64 = unsigned[index + 1..].parse().map_err(|_| invalid())?;
                (&unsigned[..index], exponent)
            }
            None => (unsigned, 0),
        };

        let (integer_part, fraction_part) = match body.split_once('.') {
            Some((integer_part, fraction_part)) => (integer_part, fraction_part),
            None => (body, ""),
        };
        if integer_part.is_empty() && fraction_part.is_empty() {
            return Err(invalid());
        }
        if !integer_part.chars().chain(fraction_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", integer_part, fraction_part);
        let mut numerator = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        if negative {
            numerator = -numerator;
        }

        let scale = exponent - fraction_part.len() as i64;
        let ten = BigInt::from(10);
        let (numerator, denominator) = if scale >= 0 {
            (numerator * num::pow(ten, scale as usize), BigInt::one())
        } else {
            (numerator, num::pow(ten, (-scale) as usize))
        };

        Self::from_ratio(&numerator, &denominator, bits).ok_or_else(invalid)
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn precision(&self) -> Precision {
        Precision::from_bits(self.bits)
    }

    /// Same value at another scale, truncated toward negative infinity when narrowing.
    pub fn rescale(&self, bits: u32) -> Self {
        let mantissa = match bits.cmp(&self.bits) {
            Ordering::Equal => self.mantissa.clone(),
            Ordering::Greater => &self.mantissa << (bits - self.bits),
            Ordering::Less => &self.mantissa >> (self.bits - bits),
        };
        Real { mantissa, bits }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.mantissa == BigInt::one() << self.bits
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    pub fn abs(&self) -> Self {
        Real { mantissa: self.mantissa.abs(), bits: self.bits }
    }

    pub fn checked_div(&self, divisor: &Real) -> Option<Self> {
        let (left, right, bits) = align(self, divisor);
        if right.is_zero() {
            return None;
        }
        Some(Real {
            mantissa: (left << bits).div_floor(&right),
            bits,
        })
    }

    /// Square root of a non-negative value.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        Some(Real {
            mantissa: (&self.mantissa << self.bits).sqrt(),
            bits: self.bits,
        })
    }

    pub fn pow(&self, exponent: u32) -> Self {
        let mut result = Real::one(self.bits);
        for _ in 0..exponent {
            result = &result * self;
        }
        result
    }

    /// Nearest integer, halves rounded up.
    pub fn round(&self) -> BigInt {
        if self.bits == 0 {
            return self.mantissa.clone();
        }
        (&self.mantissa + (BigInt::one() << (self.bits - 1))) >> self.bits
    }

    /// Equality up to the last `guard_bits` bits, absolute near zero and relative elsewhere.
    pub fn almost_eq(&self, other: &Real, guard_bits: u32) -> bool {
        let (left, right, bits) = align(self, other);
        let difference = (&left - &right).abs();
        let tolerance_bits = bits.saturating_sub(guard_bits);

        if difference <= BigInt::one() << guard_bits.min(bits) {
            return true;
        }
        let largest = left.abs().max(right.abs());
        (difference << tolerance_bits) <= largest
    }

    /// Decimal expansion with exactly `digits` digits after the point, rounded to nearest.
    pub fn to_decimal_string(&self, digits: u32) -> String {
        let scale = num::pow(BigInt::from(10), digits as usize);
        let scaled = &self.mantissa.abs() * &scale;
        let rounded = if self.bits == 0 {
            scaled
        } else {
            (scaled + (BigInt::one() << (self.bits - 1))) >> self.bits
        };

        let (integer_part, fraction_part) = rounded.div_rem(&scale);
        let sign = if self.is_negative() && !rounded.is_zero() { "-" } else { "" };
        if digits == 0 {
            return format!("{}{}", sign, integer_part);
        }
        format!(
            "{}{}.{:0>width$}",
            sign,
            integer_part,
            fraction_part.to_string(),
            width = digits as usize
        )
    }
}

fn align(left: &Real, right: &Real) -> (BigInt, BigInt, u32) {
    let bits = left.bits.max(right.bits);
    (
        left.rescale(bits).mantissa,
        right.rescale(bits).mantissa,
        bits,
    )
}

impl Display for Real {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.to_decimal_string(self.precision().digits()))
    }
}

impl<'a, 'b> Add<&'b Real> for &'a Real {
    type Output = Real;

    fn add(self, other: &'b Real) -> Real {
        let (left, right, bits) = align(self, other);
        Real { mantissa: left + right, bits }
    }
}

impl<'a, 'b> Sub<&'b Real> for &'a Real {
    type Output = Real;

    fn sub(self, other: &'b Real) -> Real {
        let (left, right, bits) = align(self, other);
        Real { mantissa: left - right, bits }
    }
}

impl<'a, 'b> Mul<&'b Real> for &'a Real {
    type Output = Real;

    fn mul(self, other: &'b Real) -> Real {
        let (left, right, bits) = align(self, other);
        Real { mantissa: (left * right) >> bits, bits }
    }
}

impl<'a, 'b> Div<&'b Real> for &'a Real {
    type Output = Real;

    /// Panics on a zero divisor, like integer division; see `checked_div`.
    fn div(self, other: &'b Real) -> Real {
        match self.checked_div(other) {
            Some(quotient) => quotient,
            None => panic!("division of {} by a zero Real", self),
        }
    }
}

impl<'a> Neg for &'a Real {
    type Output = Real;

    fn neg(self) -> Real {
        Real { mantissa: -&self.mantissa, bits: self.bits }
    }
}

impl Neg for Real {
    type Output = Real;

    fn neg(self) -> Real {
        Real { mantissa: -self.mantissa, bits: self.bits }
    }
}

macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<Real> for Real {
            type Output = Real;

            fn $method(self, other: Real) -> Real {
                (&self).$method(&other)
            }
        }

        impl<'a> $imp<&'a Real> for Real {
            type Output = Real;

            fn $method(self, other: &'a Real) -> Real {
                (&self).$method(other)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);
forward_owned_binop!(Div, div);

// src/core/calc_data.rs

use num::{BigInt, One, Zero};
use serde::{Deserialize, Serialize};
use crate::core::serialization::bigint;

/// The two latest convergents (a0/b0, a1/b1) = (A_{n-1}/B_{n-1}, A_n/B_n) of a continued fraction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalcData {
    #[serde(with = "bigint")]
    pub a0: BigInt,
    #[serde(with = "bigint")]
    pub b0: BigInt,
    #[serde(with = "bigint")]
    pub a1: BigInt,
    #[serde(with = "bigint")]
    pub b1: BigInt,
}

impl CalcData {
    pub fn new(a0: BigInt, b0: BigInt, a1: BigInt, b1: BigInt) -> Self {
        CalcData { a0, b0, a1, b1 }
    }

    /// State at depth 0: (1, 0, b(0), 1).
    pub fn initial(b_at_zero: BigInt) -> Self {
        CalcData {
            a0: BigInt::one(),
            b0: BigInt::zero(),
            a1: b_at_zero,
            b1: BigInt::one(),
        }
    }

    pub fn to_vec(&self) -> Vec<BigInt> {
        vec![self.a0.clone(), self.b0.clone(), self.a1.clone(), self.b1.clone()]
    }

    /// Rebuilds a state stored as four integers, `None` for any other length.
    pub fn from_slice(values: &[BigInt]) -> Option<Self> {
        match values {
            [a0, b0, a1, b1] => Some(CalcData::new(a0.clone(), b0.clone(), a1.clone(), b1.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_round_trip() {
        let data = CalcData::initial(BigInt::from(3));
        assert_eq!(data.to_vec(), vec![BigInt::one(), BigInt::zero(), BigInt::from(3), BigInt::one()]);
        assert_eq!(CalcData::from_slice(&data.to_vec()), Some(data));
        assert_eq!(CalcData::from_slice(&[BigInt::one()]), None);
    }

    #[test]
    fn test_json_uses_decimal_strings() {
        let data = CalcData::new(BigInt::from(-5), BigInt::from(2), BigInt::from(7), BigInt::from(3));
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"a0":"-5","b0":"2","a1":"7","b1":"3"}"#);
        let back: CalcData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}

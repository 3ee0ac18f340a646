// src/core/serialization/json_converter.rs
//
// Big integers are written as decimal strings so stored states stay readable and exact.

use num::BigInt;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserializer, Serializer};
use std::fmt;

fn parse_bigint<E: de::Error>(text: &str) -> Result<BigInt, E> {
    BigInt::parse_bytes(text.as_bytes(), 10)
        .ok_or_else(|| E::custom(format!("invalid integer {:?}", text)))
}

pub mod bigint {
    use super::*;

    pub fn serialize<S>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigInt, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BigIntVisitor;

        impl<'de> Visitor<'de> for BigIntVisitor {
            type Value = BigInt;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer or a decimal integer string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<BigInt, E> {
                parse_bigint(value)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<BigInt, E> {
                Ok(BigInt::from(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<BigInt, E> {
                Ok(BigInt::from(value))
            }
        }

        deserializer.deserialize_any(BigIntVisitor)
    }
}

pub mod bigint_vec {
    use super::*;

    pub fn serialize<S>(values: &[BigInt], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<BigInt>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BigIntVecVisitor;

        impl<'de> Visitor<'de> for BigIntVecVisitor {
            type Value = Vec<BigInt>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of decimal integer strings")
            }

            fn visit_seq<V>(self, mut seq: V) -> Result<Vec<BigInt>, V::Error>
            where
                V: SeqAccess<'de>,
            {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(text) = seq.next_element::<String>()? {
                    values.push(parse_bigint(&text)?);
                }
                Ok(values)
            }
        }

        deserializer.deserialize_seq(BigIntVecVisitor)
    }
}

// src/integer_math/mod.rs

pub mod combinatorics;
pub mod gcd;

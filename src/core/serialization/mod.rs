// src/core/serialization/mod.rs

pub mod json_converter;
pub mod load;
pub mod save;

pub use json_converter::{bigint, bigint_vec};

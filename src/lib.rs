// src/lib.rs

pub mod error;
pub mod config;
pub mod core;
pub mod integer_math;
pub mod polynomial;
pub mod numeric;
pub mod relation_search;
pub mod jobs;

// src/polynomial/mod.rs

pub mod polynomial;

pub use polynomial::{degree, evaluate, Polynomial};

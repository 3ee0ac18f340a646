// src/numeric/mod.rs

pub mod named;
pub mod precision;
pub mod real;

pub use named::NamedConstant;
pub use precision::Precision;
pub use real::Real;

// src/jobs/mod.rs

pub mod partition;
pub mod precision;
pub mod poly_pslq;
pub mod const_cf;

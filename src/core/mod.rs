// src/core/mod.rs

pub mod pcf;
pub mod calc_data;
pub mod cf_calc;
pub mod convergence;
pub mod constant;
pub mod store;
pub mod serialization;

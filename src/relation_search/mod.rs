// src/relation_search/mod.rs

pub mod pslq;
pub mod null_vector;
pub mod monomials;
pub mod compression;
pub mod relation;

// src/core/serialization/load.rs

use std::fs;
use std::path::Path;
use serde::de::DeserializeOwned;
use crate::error::Result;

pub fn generic<T: DeserializeOwned, P: AsRef<Path>>(filename: P) -> Result<T> {
    let load_json = fs::read_to_string(filename)?;
    Ok(serde_json::from_str(&load_json)?)
}

// src/core/serialization/save.rs

use std::fs;
use std::path::Path;
use serde::Serialize;
use log::debug;
use crate::error::Result;

pub fn object<T: Serialize, P: AsRef<Path>>(obj: &T, filename: P) -> Result<()> {
    let save_json = serde_json::to_string_pretty(obj)?;
    fs::write(filename.as_ref(), save_json)?;
    debug!("Saved {}", filename.as_ref().display());
    Ok(())
}

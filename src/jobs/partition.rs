// src/jobs/partition.rs

use rayon::{ThreadPool, ThreadPoolBuilder};
use crate::error::Result;

/// Splits `items` into at most `parts` contiguous chunks of near equal size, none of them empty.
pub fn split<T: Clone>(items: &[T], parts: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    let parts = parts.clamp(1, items.len());
    let size = (items.len() + parts - 1) / parts;
    items.chunks(size).map(|chunk| chunk.to_vec()).collect()
}

/// Dedicated pool for one job run, so the worker count follows the configuration.
pub fn thread_pool(threads: usize) -> Result<ThreadPool> {
    Ok(ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?)
}

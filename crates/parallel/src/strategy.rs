//! Parallel processing strategies

use rayon::prelude::*;
use texel_core::{Error, Result};

/// Processing mode for algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Single-threaded processing
    Sequential,
    /// Parallel processing on rayon's global pool
    #[default]
    Parallel,
    /// Parallel on a dedicated pool with the given number of threads
    ParallelWith(usize),
}

impl ProcessingMode {
    /// Number of workers this mode fans out to
    pub fn worker_count(&self) -> usize {
        match self {
            ProcessingMode::Sequential => 1,
            ProcessingMode::Parallel => rayon::current_num_threads(),
            ProcessingMode::ParallelWith(threads) => (*threads).max(1),
        }
    }
}

/// Strategy for parallel execution
pub trait ParallelStrategy {
    /// Run `f` on every item, stopping at the first error
    fn try_for_each<I, F>(&self, items: Vec<I>, f: F) -> Result<()>
    where
        I: Send,
        F: Fn(I) -> Result<()> + Sync + Send;
}

fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|e| Error::Other(format!("Failed to build thread pool: {}", e)))
}

impl ParallelStrategy for ProcessingMode {
    fn try_for_each<I, F>(&self, items: Vec<I>, f: F) -> Result<()>
    where
        I: Send,
        F: Fn(I) -> Result<()> + Sync + Send,
    {
        match self {
            ProcessingMode::Sequential => items.into_iter().try_for_each(f),
            ProcessingMode::Parallel => items.into_par_iter().try_for_each(f),
            ProcessingMode::ParallelWith(threads) => {
                let pool = build_pool(*threads)?;
                pool.install(|| items.into_par_iter().try_for_each(f))
            }
        }
    }
}

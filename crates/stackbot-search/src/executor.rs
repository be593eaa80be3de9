//! Reusable worker pool with an order-preserving map.
//!
//! The search runs three data-parallel stages per decision (first ply, second ply, scoring).
//! All of them go through [`ParallelExecutor::map`], which returns results in input order no
//! matter how the work was scheduled, so parallel and sequential runs select the same move.

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};

use crate::error::SearchError;

/// Runs order-preserving maps, either on a dedicated rayon pool or on the calling thread.
#[derive(Debug)]
pub struct ParallelExecutor {
    pool: Option<ThreadPool>,
}

impl ParallelExecutor {
    /// Builds a pool of `num_threads` workers. `0` lets rayon pick the number of CPUs.
    pub fn new(num_threads: usize) -> Result<Self, SearchError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("stackbot-search-{i}"))
            .build()
            .map_err(SearchError::ThreadPool)?;
        Ok(Self { pool: Some(pool) })
    }

    /// An executor that runs every map on the calling thread.
    #[must_use]
    pub fn sequential() -> Self {
        Self { pool: None }
    }

    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.pool.as_ref().map_or(1, ThreadPool::current_num_threads)
    }

    /// Applies `f` to every item and collects the results in input order.
    pub fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Send + Sync,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.par_iter().map(f).collect()),
            None => items.iter().map(f).collect(),
        }
    }
}

//! Parallel execution strategy

use crate::{
    backend::BackendFactory,
    chunker::Chunk,
    error::{ConfigError, Result},
    executor::{run_chunk, ChunkOutput, ExecutionMode, Executor},
    options::BackendOptions,
};
use rayon::prelude::*;

/// Prefix of worker thread names
pub const THREAD_NAME_PREFIX: &str = "phonoscribe-worker";

/// Multi-threaded executor backed by a dedicated thread pool
#[derive(Debug)]
pub struct ParallelExecutor {
    thread_pool: rayon::ThreadPool,
}

impl ParallelExecutor {
    /// Create an executor with `threads` workers
    pub fn new(threads: usize) -> Result<Self> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("{THREAD_NAME_PREFIX}-{i}"))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot start {threads} workers: {e}")))?;

        Ok(Self { thread_pool })
    }

    /// Number of worker threads
    pub fn threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }
}

impl Executor for ParallelExecutor {
    fn execute(
        &self,
        chunks: Vec<Chunk>,
        factory: &dyn BackendFactory,
        options: &BackendOptions,
    ) -> Result<Vec<ChunkOutput>> {
        // Every chunk runs to completion so the reported failure does not
        // depend on scheduling
        let results: Vec<Result<ChunkOutput>> = self.thread_pool.install(|| {
            chunks
                .into_par_iter()
                .map(|chunk| run_chunk(chunk, factory, options))
                .collect()
        });

        results.into_iter().collect()
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Parallel
    }
}

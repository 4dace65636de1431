//! Sequential execution strategy

use crate::{
    backend::BackendFactory,
    chunker::Chunk,
    error::Result,
    executor::{run_chunk, ChunkOutput, ExecutionMode, Executor},
    options::BackendOptions,
};

/// Sequential single-threaded executor
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn execute(
        &self,
        chunks: Vec<Chunk>,
        factory: &dyn BackendFactory,
        options: &BackendOptions,
    ) -> Result<Vec<ChunkOutput>> {
        chunks
            .into_iter()
            .map(|chunk| run_chunk(chunk, factory, options))
            .collect()
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }
}

//! Execution strategies for chunked transcription

use crate::backend::BackendFactory;
use crate::chunker::Chunk;
use crate::error::{BackendError, PhonemizeError, Result};
use crate::options::BackendOptions;

pub mod parallel;
pub mod sequential;

// Re-export executors
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Chunks run one after the other on the calling thread
    Sequential,
    /// Chunks run on a dedicated worker pool
    Parallel,
}

/// Phonemes produced for one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOutput {
    /// Chunk position in the run
    pub index: usize,
    /// Index of the chunk's first unit in the document
    pub offset: usize,
    /// One phoneme string per unit
    pub outputs: Vec<String>,
}

/// Trait for execution strategies
pub trait Executor: Send + Sync {
    /// Transcribe every chunk, each with its own backend instance
    ///
    /// On failure the error of the lowest failing chunk index is returned
    /// and no output is kept.
    fn execute(
        &self,
        chunks: Vec<Chunk>,
        factory: &dyn BackendFactory,
        options: &BackendOptions,
    ) -> Result<Vec<ChunkOutput>>;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}

/// Select the execution mode for `chunks` chunks
pub fn auto_select(chunks: usize) -> ExecutionMode {
    if chunks <= 1 {
        ExecutionMode::Sequential
    } else {
        ExecutionMode::Parallel
    }
}

/// Transcribe one chunk with a fresh backend
pub(crate) fn run_chunk(
    chunk: Chunk,
    factory: &dyn BackendFactory,
    options: &BackendOptions,
) -> Result<ChunkOutput> {
    let index = chunk.index;
    let fail = move |e: BackendError| PhonemizeError::from_backend(e, Some(index));

    let mut backend = factory.create().map_err(fail)?;
    backend.prepare(options).map_err(fail)?;
    let outputs = backend.transcribe(&chunk.texts, options).map_err(fail)?;

    if outputs.len() != chunk.len() {
        return Err(fail(BackendError::Malformed {
            backend: backend.name(),
            reason: format!("{} outputs for {} units", outputs.len(), chunk.len()),
        }));
    }

    log::debug!(
        "chunk {index} done: {} units from offset {}",
        chunk.len(),
        chunk.offset
    );

    Ok(ChunkOutput {
        index,
        offset: chunk.offset,
        outputs,
    })
}

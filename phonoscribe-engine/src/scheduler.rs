//! Job scheduling: chunk, execute, merge

use crate::backend::BackendFactory;
use crate::chunker::ChunkManager;
use crate::error::Result;
use crate::executor::{auto_select, ExecutionMode, Executor, ParallelExecutor, SequentialExecutor};
use crate::options::BackendOptions;

/// Runs units through backend workers and merges results in document order
#[derive(Debug)]
pub struct Scheduler {
    chunker: ChunkManager,
    parallel: Option<ParallelExecutor>,
}

impl Scheduler {
    /// Create a scheduler for `jobs` workers
    pub fn new(jobs: usize) -> Result<Self> {
        let parallel = if jobs > 1 {
            Some(ParallelExecutor::new(jobs)?)
        } else {
            None
        };

        Ok(Self {
            chunker: ChunkManager::new(jobs),
            parallel,
        })
    }

    /// Number of workers
    pub fn jobs(&self) -> usize {
        self.chunker.jobs()
    }

    /// Transcribe `texts`, one output per text, in input order
    pub fn run(
        &self,
        texts: Vec<String>,
        factory: &dyn BackendFactory,
        options: &BackendOptions,
    ) -> Result<Vec<String>> {
        let chunks = self.chunker.chunk(texts);

        let executor: &dyn Executor = match (auto_select(chunks.len()), &self.parallel) {
            (ExecutionMode::Parallel, Some(parallel)) => parallel,
            _ => &SequentialExecutor,
        };
        log::debug!(
            "running {} chunks in {:?} mode",
            chunks.len(),
            executor.mode()
        );

        let mut outputs = executor.execute(chunks, factory, options)?;
        outputs.sort_by_key(|output| output.offset);

        Ok(outputs
            .into_iter()
            .flat_map(|output| output.outputs)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use crate::error::{BackendError, BackendResult, PhonemizeError};
    use crate::options::Feature;
    use std::collections::BTreeSet;

    /// Reverses every text, fails on "boom", can drop outputs
    struct Reverse {
        drop_last: bool,
    }

    impl Backend for Reverse {
        fn name(&self) -> &'static str {
            "reverse"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn supported_languages(&self) -> BTreeSet<String> {
            BTreeSet::from(["xx".to_string()])
        }

        fn supports(&self, _feature: Feature) -> bool {
            true
        }

        fn transcribe(
            &mut self,
            texts: &[String],
            _options: &BackendOptions,
        ) -> BackendResult<Vec<String>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                if text == "boom" {
                    return Err(BackendError::Failed {
                        program: "reverse".to_string(),
                        status: "exit status: 1".to_string(),
                        stderr: "boom".to_string(),
                    });
                }
                out.push(text.chars().rev().collect());
            }
            if self.drop_last {
                out.pop();
            }
            Ok(out)
        }
    }

    fn factory(drop_last: bool) -> impl BackendFactory {
        move || -> BackendResult<Box<dyn Backend>> { Ok(Box::new(Reverse { drop_last })) }
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("u{i}")).collect()
    }

    #[test]
    fn test_output_order_independent_of_jobs() {
        let options = BackendOptions::new("xx");
        let expected = Scheduler::new(1)
            .unwrap()
            .run(texts(23), &factory(false), &options)
            .unwrap();

        for jobs in [2, 3, 4, 8, 32] {
            let out = Scheduler::new(jobs)
                .unwrap()
                .run(texts(23), &factory(false), &options)
                .unwrap();
            assert_eq!(out, expected, "jobs = {jobs}");
        }
        assert_eq!(expected[10], "01u");
    }

    #[test]
    fn test_failure_names_first_failing_chunk() {
        let mut input = texts(9);
        input[4] = "boom".to_string();
        input[8] = "boom".to_string();

        let err = Scheduler::new(3)
            .unwrap()
            .run(input, &factory(false), &BackendOptions::new("xx"))
            .unwrap_err();
        assert!(matches!(err, PhonemizeError::Execution { chunk: Some(1), .. }));
    }

    #[test]
    fn test_missing_outputs_are_malformed() {
        let err = Scheduler::new(2)
            .unwrap()
            .run(texts(4), &factory(true), &BackendOptions::new("xx"))
            .unwrap_err();
        match err {
            PhonemizeError::Execution {
                chunk: Some(0),
                source: BackendError::Malformed { reason, .. },
            } => assert_eq!(reason, "1 outputs for 2 units"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input() {
        let out = Scheduler::new(4)
            .unwrap()
            .run(Vec::new(), &factory(false), &BackendOptions::new("xx"))
            .unwrap();
        assert!(out.is_empty());
    }
}

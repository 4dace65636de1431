//! Unit chunking utilities

/// A contiguous run of units handled by one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in the run
    pub index: usize,
    /// Index of the first unit in the document
    pub offset: usize,
    /// Unit texts
    pub texts: Vec<String>,
}

impl Chunk {
    /// Number of units in the chunk
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns true if the chunk holds no unit
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Splits units into balanced chunks, one per job
#[derive(Debug, Clone, Copy)]
pub struct ChunkManager {
    jobs: usize,
}

impl ChunkManager {
    /// Create a chunk manager for `jobs` workers
    pub fn new(jobs: usize) -> Self {
        Self { jobs: jobs.max(1) }
    }

    /// Number of workers chunks are planned for
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Chunk `texts` into at most `jobs` non-empty contiguous chunks
    pub fn chunk(&self, texts: Vec<String>) -> Vec<Chunk> {
        let sizes = partition(texts.len(), self.jobs);
        log::debug!("{} units split into chunks of {sizes:?}", texts.len());

        let mut texts = texts.into_iter();
        let mut offset = 0;
        sizes
            .into_iter()
            .enumerate()
            .map(|(index, size)| {
                let chunk = Chunk {
                    index,
                    offset,
                    texts: texts.by_ref().take(size).collect(),
                };
                offset += size;
                chunk
            })
            .collect()
    }
}

/// Sizes of at most `parts` balanced chunks covering `total` items
///
/// Sizes differ by at most one and the larger chunks come first.
pub fn partition(total: usize, parts: usize) -> Vec<usize> {
    let parts = parts.max(1).min(total);
    if parts == 0 {
        return Vec::new();
    }

    let base = total / parts;
    let extra = total % parts;
    (0..parts)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_partition() {
        assert_eq!(partition(10, 3), vec![4, 3, 3]);
        assert_eq!(partition(2, 4), vec![1, 1]);
        assert_eq!(partition(0, 4), Vec::<usize>::new());
        assert_eq!(partition(5, 0), vec![5]);
    }

    #[test]
    fn test_chunk_offsets() {
        let chunks = ChunkManager::new(3).chunk(texts(7));
        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks.iter().map(|c| (c.index, c.offset, c.len())).collect::<Vec<_>>(),
            vec![(0, 0, 3), (1, 3, 2), (2, 5, 2)]
        );
        assert_eq!(chunks[1].texts, vec!["3", "4"]);
    }

    #[test]
    fn test_single_job() {
        let chunks = ChunkManager::new(1).chunk(texts(4));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].texts, texts(4));
    }

    proptest! {
        #[test]
        fn chunks_cover_all_units_in_order(total in 0usize..200, jobs in 1usize..16) {
            let chunks = ChunkManager::new(jobs).chunk(texts(total));
            prop_assert!(chunks.len() <= jobs);
            prop_assert!(chunks.iter().all(|c| !c.is_empty()));

            let flattened: Vec<String> = chunks.into_iter().flat_map(|c| c.texts).collect();
            prop_assert_eq!(flattened, texts(total));
        }
    }
}

//! Splitting grouped pairs into bounded distance-matrix requests.

use crate::error::{Result, WalkwaysError};
use crate::orchestrator::MatrixRequest;
use crate::pairs::PairGroups;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Destination limit of the reference distance-matrix deployment.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 99;

/// One request's worth of work: a source and up to `max_batch_size`
/// destinations.
///
/// `coords[0]` is the source; `coords[i]` for `i >= 1` is `destinations[i - 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch<K> {
    pub source: K,
    pub destinations: Vec<K>,
    pub coords: Vec<[f64; 2]>,
}

impl<K> Batch<K> {
    /// Index of the source within `coords`.
    pub fn sources_idx(&self) -> Vec<usize> {
        vec![0]
    }

    /// Indices of the destinations within `coords`.
    pub fn destinations_idx(&self) -> Vec<usize> {
        (1..=self.destinations.len()).collect()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// The distance-matrix request for this batch.
    pub fn request(&self) -> MatrixRequest<'_> {
        MatrixRequest {
            locations: &self.coords,
            sources: self.sources_idx(),
            destinations: self.destinations_idx(),
        }
    }
}

/// Chunks each source's destinations into [`Batch`]es.
///
/// Chunks are consecutive and keep the destination order of the input
/// groups; with [`PairGroups`] that order is sorted, so the plan is fully
/// deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlanner {
    max_batch_size: usize,
}

impl BatchPlanner {
    pub fn new(max_batch_size: usize) -> Result<Self> {
        if max_batch_size == 0 {
            return Err(WalkwaysError::InvalidConfig(
                "Batch size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { max_batch_size })
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Plan batches for `groups`, resolving coordinates with `locate`.
    ///
    /// Fails with [`WalkwaysError::UnknownStop`] if any id has no coordinates.
    /// Sources with an empty destination list produce no batch.
    pub fn plan<K, F>(&self, groups: &PairGroups<K>, locate: F) -> Result<Vec<Batch<K>>>
    where
        K: Clone + Display,
        F: Fn(&K) -> Option<[f64; 2]>,
    {
        let resolve = |id: &K| {
            locate(id).ok_or_else(|| WalkwaysError::UnknownStop(id.to_string()))
        };

        let mut batches = Vec::new();
        for (source, destinations) in groups {
            if destinations.is_empty() {
                continue;
            }
            let origin = resolve(source)?;

            for chunk in destinations.chunks(self.max_batch_size) {
                let mut coords = Vec::with_capacity(chunk.len() + 1);
                coords.push(origin);
                for destination in chunk {
                    coords.push(resolve(destination)?);
                }

                batches.push(Batch {
                    source: source.clone(),
                    destinations: chunk.to_vec(),
                    coords,
                });
            }
        }

        log::debug!(
            "Planned {} batches for {} sources (max {} destinations each)",
            batches.len(),
            groups.len(),
            self.max_batch_size
        );
        Ok(batches)
    }
}

impl Default for BatchPlanner {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

//! Concurrent dispatch of batches to a distance-matrix service.
//!
//! Batches are independent. A dedicated rayon pool of a fixed number of
//! worker threads calls the service for each and appends the resolved edges
//! to an [`EdgeSink`]. A batch whose request fails contributes no edges and does
//! not affect the others; nothing is retried.

use crate::batch::Batch;
use crate::error::{ServiceError, WalkwaysError};
use parking_lot::Mutex;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use walkways_types::edge::Edge;

/// A distance-matrix query: all locations plus the indices acting as sources
/// and destinations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRequest<'a> {
    pub locations: &'a [[f64; 2]],
    pub sources: Vec<usize>,
    pub destinations: Vec<usize>,
}

/// Durations and distances indexed `[source][destination]`, in request order.
///
/// Unroutable cells are `None` (JSON `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    #[serde(default)]
    pub durations: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    pub distances: Vec<Vec<Option<f64>>>,
}

impl DistanceMatrix {
    pub fn duration(&self, source: usize, destination: usize) -> Option<f64> {
        self.durations.get(source)?.get(destination).copied().flatten()
    }

    pub fn distance(&self, source: usize, destination: usize) -> Option<f64> {
        self.distances.get(source)?.get(destination).copied().flatten()
    }
}

/// The external distance-computation collaborator.
pub trait DistanceService: Sync {
    fn matrix(&self, request: &MatrixRequest<'_>) -> Result<DistanceMatrix, ServiceError>;
}

impl<F> DistanceService for F
where
    F: Fn(&MatrixRequest<'_>) -> Result<DistanceMatrix, ServiceError> + Sync,
{
    fn matrix(&self, request: &MatrixRequest<'_>) -> Result<DistanceMatrix, ServiceError> {
        self(request)
    }
}

/// Append-only edge accumulator shared by the dispatch workers.
///
/// Each call to [`extend`](Self::extend) appends its edges exactly once under
/// the sink's own lock; callers need no synchronization of their own.
#[derive(Debug)]
pub struct EdgeSink<K> {
    edges: Mutex<Vec<Edge<K>>>,
}

impl<K> EdgeSink<K> {
    pub fn new() -> Self {
        Self {
            edges: Mutex::new(Vec::new()),
        }
    }

    pub fn extend(&self, edges: impl IntoIterator<Item = Edge<K>>) {
        self.edges.lock().extend(edges);
    }

    pub fn len(&self) -> usize {
        self.edges.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.lock().is_empty()
    }

    pub fn into_inner(self) -> Vec<Edge<K>> {
        self.edges.into_inner()
    }
}

impl<K> Default for EdgeSink<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of dispatching a set of batches.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport<K> {
    /// Fully resolved edges, in no particular order.
    pub edges: Vec<Edge<K>>,
    /// Batches whose request failed and contributed no edges.
    pub failed_batches: usize,
    /// Pairs the service answered without a duration or a distance.
    pub incomplete_edges: usize,
}

/// Sends batches to a [`DistanceService`] from a bounded worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOrchestrator {
    workers: usize,
}

impl RequestOrchestrator {
    /// # Panics
    ///
    /// Panics if `workers` is zero.
    pub fn new(workers: usize) -> Self {
        assert!(workers > 0, "Worker count must be greater than zero");
        Self { workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Dispatch every batch and collect the resolved edges.
    ///
    /// Batches run on a dedicated pool of `workers` threads, separate from
    /// rayon's global pool. Blocks until all batches have resolved or failed.
    /// A service call that never returns blocks its worker, and therefore this
    /// call, indefinitely.
    pub fn dispatch<K, S>(
        &self,
        batches: &[Batch<K>],
        service: &S,
    ) -> crate::Result<DispatchReport<K>>
    where
        K: Clone + Send + Sync,
        S: DistanceService + ?Sized,
    {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("walkways-dispatch-{}", i))
            .build()
            .map_err(|e| WalkwaysError::WorkerPool(e.to_string()))?;

        let sink = EdgeSink::new();
        let failed = AtomicUsize::new(0);
        let incomplete = AtomicUsize::new(0);
        let completed = AtomicUsize::new(0);
        let progress_step = (batches.len() / 10).max(1);

        pool.install(|| {
            batches.par_iter().for_each(|batch| {
                match service.matrix(&batch.request()) {
                    Ok(matrix) => {
                        let (edges, missing) = resolve_edges(batch, &matrix);
                        incomplete.fetch_add(missing, Ordering::Relaxed);
                        sink.extend(edges);
                    }
                    Err(e) => {
                        log::warn!(
                            "Batch with {} destinations failed, skipping: {}",
                            batch.len(),
                            e
                        );
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % progress_step == 0 || done == batches.len() {
                    log::info!("Completed {}/{} batches", done, batches.len());
                } else {
                    log::debug!("Completed batch {}/{}", done, batches.len());
                }
            });
        });

        let report = DispatchReport {
            edges: sink.into_inner(),
            failed_batches: failed.into_inner(),
            incomplete_edges: incomplete.into_inner(),
        };
        log::info!(
            "Resolved {} edges from {} batches ({} failed, {} incomplete edges dropped)",
            report.edges.len(),
            batches.len(),
            report.failed_batches,
            report.incomplete_edges
        );
        Ok(report)
    }
}

impl Default for RequestOrchestrator {
    fn default() -> Self {
        Self::new(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
    }
}

/// Edges for the first matrix row, one per destination, plus the number of
/// destinations lacking a duration or a distance.
fn resolve_edges<K: Clone>(batch: &Batch<K>, matrix: &DistanceMatrix) -> (Vec<Edge<K>>, usize) {
    let mut missing = 0;
    let edges = batch
        .destinations
        .iter()
        .enumerate()
        .filter_map(|(i, end)| {
            let edge = Edge::resolved(
                batch.source.clone(),
                end.clone(),
                matrix.duration(0, i),
                matrix.distance(0, i),
            );
            if edge.is_none() {
                missing += 1;
            }
            edge
        })
        .collect();
    (edges, missing)
}

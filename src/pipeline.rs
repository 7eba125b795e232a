//! End-to-end flow from stops to walking edges.
//!
//! stops → quadtree → window scan → canonical pairs → batches → service → edges

use crate::batch::{Batch, BatchPlanner};
use crate::builder::PipelineBuilder;
use crate::config::Config;
use crate::error::Result;
use crate::geo_window::GeoWindow;
use crate::orchestrator::{DispatchReport, DistanceService, RequestOrchestrator};
use crate::pairs::PairDeduplicator;
use crate::quadtree::SpatialIndex;
use crate::scanner::ProximityScanner;
use crate::stops::StopCatalog;
use serde::Serialize;

/// Batches ready for dispatch plus the statistics of the run that produced
/// them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub batches: Vec<Batch<String>>,
    /// Distinct unordered stop pairs within the window.
    pub pair_count: usize,
    /// Stops the index could not store (on the root boundary or a split line).
    pub dropped_points: usize,
}

impl Plan {
    /// Total number of destinations over all batches.
    pub fn destination_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }
}

/// A validated stop catalog and the quadtree built over it.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    catalog: StopCatalog,
    index: SpatialIndex<String>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub(crate) fn from_parts(
        config: Config,
        catalog: StopCatalog,
        index: SpatialIndex<String>,
    ) -> Self {
        Self {
            config,
            catalog,
            index,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &StopCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &SpatialIndex<String> {
        &self.index
    }

    /// Every distinct pair of stops that fall inside each other's window.
    ///
    /// All stops act as centers, including ones the index dropped.
    pub fn pairs(&self) -> Result<PairDeduplicator<String>> {
        let window = GeoWindow::new(self.config.radius_km)?;
        let scanner = ProximityScanner::new(&self.index, window);
        let centers = self.catalog.points();

        #[cfg(feature = "parallel")]
        let nearby = scanner.par_scan(&centers);
        #[cfg(not(feature = "parallel"))]
        let nearby = scanner.scan(&centers);

        let pairs: PairDeduplicator<String> = nearby
            .into_iter()
            .map(|pair| (pair.center.value().clone(), pair.neighbor.value().clone()))
            .collect();

        log::debug!(
            "Found {} distinct pairs within {} km ({} self-matches skipped)",
            pairs.len(),
            self.config.radius_km,
            pairs.self_pairs()
        );
        Ok(pairs)
    }

    /// Deterministic batch plan: sources and destinations in id order.
    pub fn plan(&self) -> Result<Plan> {
        let pairs = self.pairs()?;
        let pair_count = pairs.len();
        let groups = pairs.into_groups();

        let planner = BatchPlanner::new(self.config.max_batch_size)?;
        let batches = planner.plan(&groups, |id: &String| self.catalog.coord(id))?;

        Ok(Plan {
            batches,
            pair_count,
            dropped_points: self.index.dropped(),
        })
    }

    /// Plan and dispatch every batch to `service`.
    pub fn run<S>(&self, service: &S) -> Result<DispatchReport<String>>
    where
        S: DistanceService + ?Sized,
    {
        let plan = self.plan()?;
        self.dispatch(&plan, service)
    }

    /// Dispatch an existing plan with the configured worker count.
    pub fn dispatch<S>(&self, plan: &Plan, service: &S) -> Result<DispatchReport<String>>
    where
        S: DistanceService + ?Sized,
    {
        RequestOrchestrator::new(self.config.effective_workers()).dispatch(&plan.batches, service)
    }
}

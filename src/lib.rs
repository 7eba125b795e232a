//! Walking-distance edges between nearby stops.
//!
//! ## Features
//! - **Quadtree index**: point insertion with lazy splits, rectangle and circle range queries
//! - **Geodesic windows**: a radius in kilometers becomes a longitude/latitude rectangle
//! - **Pair planning**: symmetric matches collapse to canonical pairs, grouped and chunked
//!   into bounded distance-matrix requests in a reproducible order
//! - **Dispatch**: batches run concurrently against any [`DistanceService`]; failed
//!   batches yield no edges instead of failing the run
//!
//! ```rust
//! use walkways::{DistanceMatrix, MatrixRequest, Pipeline, ServiceError, Stop};
//!
//! let pipeline = Pipeline::builder()
//!     .radius_km(0.5)
//!     .stops(vec![
//!         Stop::new("hbf", 13.3695, 52.5251),
//!         Stop::new("hbf-north", 13.3699, 52.5262),
//!         Stop::new("zoo", 13.3327, 52.5065),
//!     ])
//!     .build()?;
//!
//! // Stand-in service: a constant walking pace of 1.4 m/s over 100 m.
//! let service = |request: &MatrixRequest<'_>| -> Result<DistanceMatrix, ServiceError> {
//!     let row = vec![Some(100.0); request.destinations.len()];
//!     let times = row.iter().map(|d| d.map(|m| m / 1.4)).collect();
//!     Ok(DistanceMatrix { durations: vec![times], distances: vec![row] })
//! };
//!
//! let report = pipeline.run(&service)?;
//! assert_eq!(report.edges.len(), 1);
//! assert_eq!(report.edges[0].start, "hbf");
//! # Ok::<(), walkways::WalkwaysError>(())
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
#[cfg(feature = "geojson")]
pub mod export;
pub mod geo_window;
pub mod orchestrator;
pub mod pairs;
pub mod pipeline;
pub mod quadtree;
pub mod scanner;
pub mod stops;

pub use batch::{Batch, BatchPlanner};
pub use builder::PipelineBuilder;
pub use config::Config;
pub use error::{Result, ServiceError, WalkwaysError};
pub use geo_window::GeoWindow;
pub use orchestrator::{
    DispatchReport, DistanceMatrix, DistanceService, EdgeSink, MatrixRequest, RequestOrchestrator,
};
pub use pairs::{PairDeduplicator, PairGroups, group_pairs};
pub use pipeline::{Pipeline, Plan};
pub use quadtree::SpatialIndex;
pub use scanner::{NearbyPair, ProximityScanner};
pub use stops::{Stop, StopCatalog};

pub use walkways_types::edge::Edge;
pub use walkways_types::point::IndexedPoint;
pub use walkways_types::region::{Circle, Region};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Pipeline, PipelineBuilder, Result, Stop, WalkwaysError};

    pub use crate::{Circle, IndexedPoint, Region, SpatialIndex};

    pub use crate::{GeoWindow, ProximityScanner};

    pub use crate::{Batch, BatchPlanner, PairDeduplicator};

    pub use crate::{DistanceMatrix, DistanceService, MatrixRequest, RequestOrchestrator};

    pub use crate::{Config, Edge};
}

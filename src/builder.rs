//! Pipeline builder
//!
//! Collects configuration overrides and the input stops, validates both and
//! builds the spatial index in one step.

use crate::config::Config;
use crate::error::{Result, WalkwaysError};
use crate::pipeline::Pipeline;
use crate::quadtree::SpatialIndex;
use crate::stops::{Stop, StopCatalog};

/// Builder for a [`Pipeline`].
///
/// # Examples
///
/// ```rust
/// use walkways::{PipelineBuilder, Stop};
///
/// let pipeline = PipelineBuilder::new()
///     .radius_km(1.0)
///     .max_batch_size(50)
///     .stops(vec![Stop::new("a", 8.6821, 50.1109), Stop::new("b", 8.6841, 50.1119)])
///     .build()?;
///
/// let plan = pipeline.plan()?;
/// assert_eq!(plan.pair_count, 1);
/// # Ok::<(), walkways::WalkwaysError>(())
/// ```
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: Config,
    stops: Vec<Stop>,
}

impl PipelineBuilder {
    /// Create a builder with the default configuration and no stops.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.config = self.config.with_radius_km(radius_km);
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_capacity(capacity);
        self
    }

    pub fn max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.config = self.config.with_max_batch_size(max_batch_size);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config = self.config.with_workers(workers);
        self
    }

    /// Append stops to the input.
    pub fn stops(mut self, stops: impl IntoIterator<Item = Stop>) -> Self {
        self.stops.extend(stops);
        self
    }

    /// Validate the input and build the index.
    pub fn build(self) -> Result<Pipeline> {
        self.config.validate().map_err(WalkwaysError::InvalidConfig)?;

        let catalog = StopCatalog::new(self.stops)?;
        let root = catalog.root_region(self.config.root_padding);
        let index = SpatialIndex::bulk_load(
            root,
            self.config.capacity,
            self.config.max_depth,
            catalog.points(),
        )?;

        log::info!(
            "Indexed {} of {} stops ({} dropped)",
            index.len(),
            catalog.len(),
            index.dropped()
        );

        Ok(Pipeline::from_parts(self.config, catalog, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_overrides() {
        let pipeline = PipelineBuilder::new()
            .radius_km(2.0)
            .capacity(8)
            .workers(2)
            .stops(vec![Stop::new("a", 0.0, 0.0)])
            .build()
            .unwrap();
        assert_eq!(pipeline.config().radius_km, 2.0);
        assert_eq!(pipeline.config().capacity, 8);
        assert_eq!(pipeline.config().workers, Some(2));
        assert_eq!(pipeline.index().len(), 1);
    }

    #[test]
    fn test_builder_without_stops_fails() {
        assert!(matches!(
            PipelineBuilder::new().build(),
            Err(WalkwaysError::EmptyInput)
        ));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = Config {
            root_padding: -1.0,
            ..Config::default()
        };
        let result = PipelineBuilder::new()
            .config(config)
            .stops(vec![Stop::new("a", 0.0, 0.0)])
            .build();
        assert!(matches!(result, Err(WalkwaysError::InvalidConfig(_))));
    }
}

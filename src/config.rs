//! Tunable parameters for index construction, neighbor search and batching.
use serde::de::Error;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Quadtree leaf capacity before a split
    #[serde(default = "Config::default_capacity")]
    pub capacity: usize,

    /// Depth at which leaves stop splitting and grow past `capacity`
    #[serde(default = "Config::default_max_depth")]
    pub max_depth: usize,

    /// Neighbor search radius in kilometers
    #[serde(default = "Config::default_radius_km")]
    pub radius_km: f64,

    /// Maximum number of destinations in one distance-matrix request
    #[serde(default = "Config::default_max_batch_size")]
    pub max_batch_size: usize,

    /// Padding, in degrees, added around the stop extent to form the index root
    #[serde(default = "Config::default_root_padding")]
    pub root_padding: f64,

    /// Dispatch worker count; `None` uses the available parallelism
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Config {
    pub const fn default_capacity() -> usize {
        crate::quadtree::DEFAULT_CAPACITY
    }

    pub const fn default_max_depth() -> usize {
        crate::quadtree::DEFAULT_MAX_DEPTH
    }

    pub const fn default_radius_km() -> f64 {
        0.5
    }

    pub const fn default_max_batch_size() -> usize {
        crate::batch::DEFAULT_MAX_BATCH_SIZE
    }

    pub const fn default_root_padding() -> f64 {
        1e-6
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Leaf capacity must be greater than zero");
        self.capacity = capacity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        assert!(
            radius_km.is_finite() && radius_km >= 0.0,
            "Radius must be a finite, non-negative number of kilometers"
        );
        self.radius_km = radius_km;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        assert!(max_batch_size > 0, "Batch size must be greater than zero");
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn with_root_padding(mut self, padding: f64) -> Self {
        self.root_padding = padding;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        assert!(workers > 0, "Worker count must be greater than zero");
        self.workers = Some(workers);
        self
    }

    /// Worker count to dispatch with.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("Leaf capacity must be greater than zero".to_string());
        }

        if !self.radius_km.is_finite() || self.radius_km < 0.0 {
            return Err(format!(
                "Radius must be a finite, non-negative number of kilometers, got: {}",
                self.radius_km
            ));
        }

        if self.max_batch_size == 0 {
            return Err("Batch size must be greater than zero".to_string());
        }

        if !self.root_padding.is_finite() || self.root_padding < 0.0 {
            return Err(format!(
                "Root padding must be finite and non-negative, got: {}",
                self.root_padding
            ));
        }

        if self.workers == Some(0) {
            return Err("Worker count must be greater than zero".to_string());
        }

        if self.radius_km > 100.0 {
            log::warn!(
                "Radius of {} km is large; the rectangular window over-includes \
                heavily at this scale",
                self.radius_km
            );
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
            max_depth: Self::default_max_depth(),
            radius_km: Self::default_radius_km(),
            max_batch_size: Self::default_max_batch_size(),
            root_padding: Self::default_root_padding(),
            workers: None,
        }
    }
}

//! Configuration for the rules engine.

use ficha_core::character::DEFAULT_BAG_CAPACITY;

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Bag slots given to newly created characters.
    pub bag_capacity: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            bag_capacity: DEFAULT_BAG_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the starting bag capacity.
    pub fn with_bag_capacity(mut self, slots: u32) -> Self {
        self.bag_capacity = slots;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.bag_capacity, 6);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default().with_seed(123).with_bag_capacity(10);
        assert_eq!(cfg.seed, Some(123));
        assert_eq!(cfg.bag_capacity, 10);
    }
}

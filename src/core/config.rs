//! Placement configuration with documented constants

/// Configuration for the placement controller
///
/// These values bound the work a single placement attempt may perform.
#[derive(Debug, Clone)]
pub struct PlacementConfig {
    /// Maximum candidate cells the random strategy samples per placement
    ///
    /// Random sampling gives expected O(1) cost when most cells are free.
    /// When the world is nearly full the strategy gives up after this many
    /// attempts and the object lands on the pending queue instead, so a
    /// larger budget trades latency for a higher hit rate on crowded maps.
    pub random_attempts: u32,

    /// Seed for the strategy RNG
    ///
    /// `Some(seed)` makes placement deterministic across runs (replays,
    /// tests); `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            random_attempts: 100,
            seed: None,
        }
    }
}

impl PlacementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        // Zero attempts would make every strategy placement fail immediately.
        if self.random_attempts == 0 {
            return Err("random_attempts must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlacementConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = PlacementConfig {
            random_attempts: 0,
            seed: None,
        };
        assert!(config.validate().is_err());
    }
}

//! YAML configuration shared by the hosts.
//!
//! Every section and field is optional; missing values take the domain
//! defaults from `lc_core::defaults`.

use std::path::Path;

use lc_core::{CircuitParams, Mode, defaults, ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub circuit: CircuitParams,
    pub mode: Mode,
    pub domain: DomainConfig,
    pub animation: AnimationConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DomainConfig {
    /// Normalized end time τ_end
    pub tau_end: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub speed: f64,
    pub window: f64,
    pub tick_interval_ms: u64,
    pub burst_ticks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            circuit: CircuitParams::default(),
            mode: Mode::default(),
            domain: DomainConfig::default(),
            animation: AnimationConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            tau_end: defaults::TAU_END,
            samples: defaults::SAMPLE_COUNT,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: defaults::SPEED,
            window: defaults::WINDOW,
            tick_interval_ms: defaults::TICK_INTERVAL_MS,
            burst_ticks: defaults::BURST_TICKS,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: lc_results::DEFAULT_CAPACITY,
        }
    }
}

impl SimConfig {
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        // An empty document means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SimConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.circuit.validate()?;

        let tau_end = ensure_finite(self.domain.tau_end, "tau_end")?;
        if !(0.0..=defaults::MAX_TAU_END).contains(&tau_end) {
            return Err(AppError::Config(format!(
                "domain.tau_end must lie in [0, {:.1}], got {tau_end}",
                defaults::MAX_TAU_END
            )));
        }
        if !(2..=defaults::MAX_SAMPLES).contains(&self.domain.samples) {
            return Err(AppError::Config(format!(
                "domain.samples must lie in [2, {}], got {}",
                defaults::MAX_SAMPLES,
                self.domain.samples
            )));
        }

        ensure_positive(self.animation.speed, "animation speed")?;
        ensure_positive(self.animation.window, "animation window")?;
        if !(1..=defaults::MAX_TICK_INTERVAL_MS).contains(&self.animation.tick_interval_ms) {
            return Err(AppError::Config(format!(
                "animation.tick_interval_ms must lie in [1, {}], got {}",
                defaults::MAX_TICK_INTERVAL_MS,
                self.animation.tick_interval_ms
            )));
        }
        if self.animation.burst_ticks == 0 {
            return Err(AppError::Config(
                "animation.burst_ticks must be positive".to_string(),
            ));
        }
        if self.cache.capacity == 0 {
            return Err(AppError::Config("cache.capacity must be positive".to_string()));
        }
        Ok(())
    }
}

/// Load and validate a configuration file.
pub fn load_yaml(path: &Path) -> AppResult<SimConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = SimConfig::from_yaml_str(&content)?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &SimConfig) -> AppResult<()> {
    config.validate()?;
    std::fs::write(path, config.to_yaml_string()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = SimConfig::default();
        config.validate().unwrap();
        assert_eq!(config.mode, Mode::Analytical);
        assert_eq!(config.domain.samples, 20_000);
        assert_eq!(config.animation.tick_interval_ms, 30);
        assert_eq!(config.cache.capacity, 16);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(SimConfig::from_yaml_str("").unwrap(), SimConfig::default());
        assert_eq!(SimConfig::from_yaml_str("{}").unwrap(), SimConfig::default());
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = SimConfig::default();
        config.animation.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn oversized_interval_rejected() {
        let mut config = SimConfig::default();
        config.animation.tick_interval_ms = u64::MAX;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
        config.animation.tick_interval_ms = defaults::MAX_TICK_INTERVAL_MS;
        config.validate().unwrap();
    }

    #[test]
    fn domain_beyond_sample_budget_rejected() {
        let mut config = SimConfig::default();
        config.domain.tau_end = 1e300;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let mut config = SimConfig::default();
        config.domain.samples = defaults::MAX_SAMPLES + 1;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn negative_speed_rejected() {
        let mut config = SimConfig::default();
        config.animation.speed = -0.1;
        assert!(matches!(
            config.validate(),
            Err(AppError::InvalidParameter(_))
        ));
    }
}

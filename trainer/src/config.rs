use serde::{Deserialize, Serialize};
use thiserror::Error;

use edgewise_engine::counting::CountingSystem;
use edgewise_engine::rules::RuleSet;

/// Training session configuration.
///
/// An enumerated record: unknown fields are rejected at deserialization,
/// value ranges at validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingConfig {
    pub rules: RuleSet,
    pub counting_system: CountingSystem,
    /// Starting bankroll in cents.
    pub starting_bankroll: i64,
    /// Cards dealt per counting/speed drill.
    pub drill_cards: u8,
    /// True-count sampling range for the deviation drill.
    pub deviation_tc_range: (f64, f64),
    /// Optional PRNG seed for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            rules: RuleSet::default(),
            counting_system: CountingSystem::HiLo,
            starting_bankroll: 1_000_00,
            drill_cards: 20,
            deviation_tc_range: (-3.0, 6.0),
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules
            .validate()
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        if self.drill_cards == 0 || self.drill_cards > 52 {
            return Err(ConfigError::InvalidValue(
                "drill_cards must be between 1 and 52".to_string(),
            ));
        }
        let (lo, hi) = self.deviation_tc_range;
        if !(lo < hi) {
            return Err(ConfigError::InvalidValue(format!(
                "deviation_tc_range must be increasing, got ({lo}, {hi})"
            )));
        }
        if self.starting_bankroll < self.rules.min_bet {
            return Err(ConfigError::InvalidValue(
                "starting_bankroll below the table minimum".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid training config: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        TrainingConfig::default().validate().unwrap();
    }

    #[test]
    fn degenerate_ranges_are_rejected() {
        let mut config = TrainingConfig {
            drill_cards: 0,
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());
        config.drill_cards = 20;
        config.deviation_tc_range = (2.0, 2.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut value = serde_json::to_value(TrainingConfig::default()).unwrap();
        value["difficulty"] = serde_json::json!("hard");
        assert!(serde_json::from_value::<TrainingConfig>(value).is_err());
    }
}

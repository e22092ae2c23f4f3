use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lelotto_db::models::Game;

use crate::analysis::sampler::{SumConstraint, SumRange};
use crate::analysis::scorer::ScoringRules;
use crate::analysis::weights::{WeightTable, HISTORICAL_WEIGHTS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Exemplaires par unité de poids dans l'urne virtuelle.
    pub weight_scale: f64,
    pub sum_range: SumRange,
    pub max_attempts: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            weight_scale: 10.0,
            sum_range: SumRange::default(),
            max_attempts: 100,
        }
    }
}

impl SamplingConfig {
    pub fn sum_constraint(&self) -> SumConstraint {
        SumConstraint {
            range: self.sum_range,
            max_attempts: self.max_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LottoConfig {
    pub game: Game,
    pub sampling: SamplingConfig,
    pub scoring: ScoringRules,
    /// Table de poids personnalisée ; table historique si absente.
    pub weights: Option<Vec<f64>>,
}

impl Default for LottoConfig {
    fn default() -> Self {
        Self {
            game: Game::LOTTO_645,
            sampling: SamplingConfig::default(),
            scoring: ScoringRules::default(),
            weights: None,
        }
    }
}

impl LottoConfig {
    pub fn weight_table(&self) -> Result<WeightTable> {
        let weights = self.weights.as_deref().unwrap_or(&HISTORICAL_WEIGHTS[..]);
        WeightTable::new(&self.game, weights)
    }
}

/// Charge la configuration JSON ; valeurs par défaut si aucun chemin n'est donné.
pub fn load_config(path: Option<&Path>) -> Result<LottoConfig> {
    let config = match path {
        Some(p) => {
            let json = std::fs::read_to_string(p)
                .with_context(|| format!("Impossible de lire la configuration {:?}", p))?;
            let config: LottoConfig = serde_json::from_str(&json)
                .with_context(|| format!("Configuration invalide {:?}", p))?;
            log::info!("Configuration chargée depuis {:?}", p);
            config
        }
        None => LottoConfig::default(),
    };
    config.game.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LottoConfig::default();
        assert_eq!(config.game, Game::LOTTO_645);
        assert!((config.sampling.weight_scale - 10.0).abs() < 1e-10);
        assert_eq!(config.sampling.sum_range, SumRange { min: 100, max: 180 });
        assert_eq!(config.sampling.max_attempts, 100);
        assert!(config.weights.is_none());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = LottoConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: LottoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "game": { "max": 20, "count": 5 }, "sampling": { "max_attempts": 10 } }"#;
        let config: LottoConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.game, Game { max: 20, count: 5 });
        assert_eq!(config.sampling.max_attempts, 10);
        assert!((config.sampling.weight_scale - 10.0).abs() < 1e-10);
        assert_eq!(config.scoring, ScoringRules::default());
    }

    #[test]
    fn test_custom_weights() {
        let config = LottoConfig {
            game: Game { max: 3, count: 2 },
            weights: Some(vec![1.0, 2.0, 3.0]),
            ..LottoConfig::default()
        };
        let table = config.weight_table().unwrap();
        assert!((table.weight(3).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_weights_too_short_for_big_game() {
        let config = LottoConfig {
            game: Game { max: 49, count: 6 },
            ..LottoConfig::default()
        };
        assert!(config.weight_table().is_err());
    }
}

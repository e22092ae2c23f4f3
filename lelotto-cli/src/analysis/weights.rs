use anyhow::{bail, Result};

use lelotto_db::models::Game;

/// Multiplicateurs "historiques" du 6/45, indexés par numéro - 1.
/// Valeurs choisies à la main : paramètre réglable, pas un modèle statistique.
pub const HISTORICAL_WEIGHTS: [f64; 45] = [
    1.2, 1.0, 1.1, 0.9, 1.0, 1.0, 1.1, 0.9, 1.0, 1.1, // 1-10
    1.0, 1.2, 1.3, 1.0, 0.9, 1.0, 1.2, 1.3, 0.9, 1.1, // 11-20
    1.0, 0.8, 0.9, 1.0, 1.0, 1.1, 1.2, 0.9, 0.9, 0.8, // 21-30
    1.0, 0.8, 1.1, 1.3, 0.9, 0.9, 1.0, 1.1, 1.0, 1.2, // 31-40
    1.0, 0.9, 1.3, 1.1, 1.2,                          // 41-45
];

/// Table de poids validée pour un jeu donné : une entrée par numéro de `1..=game.max`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    weights: Vec<f64>,
}

impl WeightTable {
    pub fn new(game: &Game, weights: &[f64]) -> Result<Self> {
        let needed = game.max as usize;
        if weights.len() < needed {
            bail!(
                "Table de poids trop courte : {} entrées pour {} numéros",
                weights.len(),
                needed
            );
        }
        for (i, &w) in weights.iter().take(needed).enumerate() {
            if !w.is_finite() || w <= 0.0 {
                bail!("Poids invalide pour le numéro {} : {}", i + 1, w);
            }
        }
        Ok(WeightTable {
            weights: weights[..needed].to_vec(),
        })
    }

    pub fn historical(game: &Game) -> Result<Self> {
        Self::new(game, &HISTORICAL_WEIGHTS)
    }

    /// `None` hors de `1..=game.max`.
    pub fn weight(&self, number: u8) -> Option<f64> {
        let index = number.checked_sub(1)? as usize;
        self.weights.get(index).copied()
    }

    /// Nombre d'exemplaires de chaque numéro dans l'urne virtuelle : `round(w * scale)`.
    pub fn pool_copies(&self, scale: f64) -> Vec<u32> {
        self.weights
            .iter()
            .map(|&w| (w * scale).round().max(0.0) as u32)
            .collect()
    }
}

use anyhow::{bail, Result};
use log::{debug, warn};
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use lelotto_db::models::{Game, NumberSet};

use super::weights::WeightTable;

/// Origine des numéros : tirage uniforme ou urne virtuelle pondérée.
#[derive(Debug, Clone)]
pub enum DrawSource<'a> {
    Uniform,
    Weighted { table: &'a WeightTable, scale: f64 },
}

impl DrawSource<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            DrawSource::Uniform => "uniforme",
            DrawSource::Weighted { .. } => "pondéré",
        }
    }

    /// Libellé enregistré dans l'historique, suffixé de `+somme` si contraint.
    pub fn label(&self, constrained: bool) -> String {
        if constrained {
            format!("{}+somme", self.name())
        } else {
            self.name().to_string()
        }
    }
}

/// Plage de somme acceptée, bornes incluses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumRange {
    pub min: u32,
    pub max: u32,
}

impl SumRange {
    pub fn contains(&self, sum: u32) -> bool {
        sum >= self.min && sum <= self.max
    }
}

impl Default for SumRange {
    fn default() -> Self {
        SumRange { min: 100, max: 180 }
    }
}

#[derive(Debug, Clone)]
pub struct ConstrainedDraw {
    pub numbers: NumberSet,
    pub attempts: usize,
    pub satisfied: bool,
}

/// Contrainte de somme avec budget de tentatives.
#[derive(Debug, Clone, Copy)]
pub struct SumConstraint {
    pub range: SumRange,
    pub max_attempts: usize,
}

/// Tire `game.count` numéros distincts dans `1..=game.max`, rejet des doublons.
pub fn sample_uniform(game: &Game, rng: &mut StdRng) -> Result<NumberSet> {
    game.validate()?;
    let mut picked: Vec<u8> = Vec::with_capacity(game.count);
    while picked.len() < game.count {
        let n = rng.random_range(1..=game.max);
        if !picked.contains(&n) {
            picked.push(n);
        }
    }
    NumberSet::new(game, &picked)
}

/// Urne virtuelle : chaque numéro `i` y figure `round(poids[i] * scale)` fois.
/// Tirages uniformes dans l'urne, rejet des doublons.
pub fn sample_weighted(
    game: &Game,
    table: &WeightTable,
    scale: f64,
    rng: &mut StdRng,
) -> Result<NumberSet> {
    game.validate()?;
    if !scale.is_finite() || scale <= 0.0 {
        bail!("Facteur d'échelle invalide : {}", scale);
    }
    let copies = table.pool_copies(scale);
    if copies.len() != game.max as usize {
        bail!(
            "Table de poids pour {} numéros, jeu en 1-{}",
            copies.len(),
            game.max
        );
    }
    let drawable = copies.iter().filter(|&&c| c > 0).count();
    if drawable < game.count {
        bail!(
            "Seulement {} numéros tirables avec l'échelle {}, {} requis",
            drawable,
            scale,
            game.count
        );
    }

    let dist = WeightedIndex::new(&copies)?;
    let mut picked: Vec<u8> = Vec::with_capacity(game.count);
    while picked.len() < game.count {
        let n = (dist.sample(rng) + 1) as u8;
        if !picked.contains(&n) {
            picked.push(n);
        }
    }
    NumberSet::new(game, &picked)
}

pub fn sample(game: &Game, source: &DrawSource, rng: &mut StdRng) -> Result<NumberSet> {
    match source {
        DrawSource::Uniform => sample_uniform(game, rng),
        DrawSource::Weighted { table, scale } => sample_weighted(game, table, *scale, rng),
    }
}

/// Recommence le tirage complet jusqu'à ce que la somme tombe dans `constraint.range`.
/// Après `max_attempts` échecs, retombe sur un tirage non contraint.
pub fn sample_constrained(
    game: &Game,
    source: &DrawSource,
    constraint: SumConstraint,
    rng: &mut StdRng,
) -> Result<ConstrainedDraw> {
    let range = constraint.range;
    if range.min > range.max {
        bail!("Plage de somme inversée : {}-{}", range.min, range.max);
    }

    for attempt in 1..=constraint.max_attempts {
        let numbers = sample(game, source, rng)?;
        if range.contains(numbers.sum()) {
            debug!("Somme {} acceptée après {} tentative(s)", numbers.sum(), attempt);
            return Ok(ConstrainedDraw {
                numbers,
                attempts: attempt,
                satisfied: true,
            });
        }
    }

    warn!(
        "Aucune combinaison de somme {}-{} en {} tentatives, tirage libre",
        range.min, range.max, constraint.max_attempts
    );
    let numbers = sample(game, source, rng)?;
    Ok(ConstrainedDraw {
        numbers,
        attempts: constraint.max_attempts,
        satisfied: false,
    })
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Génère `count` combinaisons, contraintes en somme si `constraint` est fourni.
pub fn generate_suggestions(
    game: &Game,
    source: &DrawSource,
    constraint: Option<SumConstraint>,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<ConstrainedDraw>> {
    let mut rng = seeded_rng(seed);
    let mut suggestions = Vec::with_capacity(count);

    for _ in 0..count {
        let draw = match constraint {
            Some(c) => sample_constrained(game, source, c, &mut rng)?,
            None => ConstrainedDraw {
                numbers: sample(game, source, &mut rng)?,
                attempts: 1,
                satisfied: true,
            },
        };
        suggestions.push(draw);
    }

    Ok(suggestions)
}

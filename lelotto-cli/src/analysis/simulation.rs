use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use lelotto_db::models::Game;

use super::sampler::{sample, seeded_rng, DrawSource};

#[derive(Debug, Clone)]
pub struct Marginal {
    pub number: u8,
    pub hits: u64,
    /// Fréquence observée / fréquence attendue sous tirage uniforme.
    pub ratio: f64,
}

/// Tire `trials` combinaisons et mesure la fréquence marginale de chaque numéro.
pub fn simulate(
    game: &Game,
    source: &DrawSource,
    trials: u64,
    seed: Option<u64>,
    show_progress: bool,
) -> Result<Vec<Marginal>> {
    game.validate()?;
    let mut rng = seeded_rng(seed);
    let mut hits = vec![0u64; game.max as usize];

    let pb = if show_progress {
        let pb = ProgressBar::new(trials);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("=> "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    for i in 0..trials {
        for &n in sample(game, source, &mut rng)?.as_slice() {
            hits[(n - 1) as usize] += 1;
        }
        if i % 1_000 == 999 {
            pb.inc(1_000);
        }
    }
    pb.finish_and_clear();
    log::info!("Simulation {} : {} tirages", source.name(), trials);

    let expected = trials as f64 * game.count as f64 / game.max as f64;
    let marginals = hits
        .into_iter()
        .enumerate()
        .map(|(i, h)| Marginal {
            number: (i + 1) as u8,
            hits: h,
            ratio: if expected > 0.0 { h as f64 / expected } else { 0.0 },
        })
        .collect();

    Ok(marginals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::weights::WeightTable;

    #[test]
    fn test_hits_total() {
        let game = Game::LOTTO_645;
        let marginals = simulate(&game, &DrawSource::Uniform, 1_000, Some(1), false).unwrap();
        assert_eq!(marginals.len(), 45);
        let total: u64 = marginals.iter().map(|m| m.hits).sum();
        assert_eq!(total, 6_000);
        let mean_ratio: f64 = marginals.iter().map(|m| m.ratio).sum::<f64>() / 45.0;
        assert!((mean_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_heaviest_above_lightest() {
        let game = Game::LOTTO_645;
        let table = WeightTable::historical(&game).unwrap();
        let source = DrawSource::Weighted { table: &table, scale: 10.0 };
        let marginals = simulate(&game, &source, 20_000, Some(2), false).unwrap();
        // 13 (poids 1.3) contre 22 (poids 0.8)
        assert!(marginals[12].ratio > marginals[21].ratio);
    }

    #[test]
    fn test_zero_trials() {
        let marginals = simulate(&Game::LOTTO_645, &DrawSource::Uniform, 0, Some(1), false).unwrap();
        assert!(marginals.iter().all(|m| m.hits == 0 && m.ratio == 0.0));
    }
}

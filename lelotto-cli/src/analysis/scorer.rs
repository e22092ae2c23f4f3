use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use lelotto_db::models::Game;

/// Intervalle inclusif.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub min: u32,
    pub max: u32,
}

impl Band {
    pub const fn new(min: u32, max: u32) -> Self {
        Band { min, max }
    }

    pub fn contains(&self, v: u32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Règle à deux paliers : +2 dans la zone idéale, +1 dans la zone acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredRule {
    pub ideal: Band,
    pub acceptable: Band,
}

impl TieredRule {
    pub const IDEAL_POINTS: u8 = 2;
    pub const ACCEPTABLE_POINTS: u8 = 1;

    pub fn points(&self, v: u32) -> u8 {
        if self.ideal.contains(v) {
            Self::IDEAL_POINTS
        } else if self.acceptable.contains(v) {
            Self::ACCEPTABLE_POINTS
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCutoffs {
    pub excellent: u8,
    pub average: u8,
    pub experimental: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub sum: TieredRule,
    pub odd: TieredRule,
    pub high: TieredRule,
    pub consecutive: TieredRule,
    /// Seuil "haut" explicite ; sinon `game.max / 2 + 1`.
    pub high_threshold: Option<u8>,
    pub cutoffs: GradeCutoffs,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            sum: TieredRule { ideal: Band::new(100, 170), acceptable: Band::new(80, 200) },
            odd: TieredRule { ideal: Band::new(2, 4), acceptable: Band::new(1, 5) },
            high: TieredRule { ideal: Band::new(2, 4), acceptable: Band::new(1, 5) },
            consecutive: TieredRule { ideal: Band::new(0, 1), acceptable: Band::new(2, 2) },
            high_threshold: None,
            cutoffs: GradeCutoffs { excellent: 7, average: 5, experimental: 3 },
        }
    }
}

impl ScoringRules {
    pub fn max_points(&self) -> u8 {
        4 * TieredRule::IDEAL_POINTS
    }

    pub fn grade(&self, points: u8) -> Grade {
        if points >= self.cutoffs.excellent {
            Grade::Excellent
        } else if points >= self.cutoffs.average {
            Grade::Average
        } else if points >= self.cutoffs.experimental {
            Grade::Experimental
        } else {
            Grade::Rare
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Average,
    Experimental,
    Rare,
}

impl Grade {
    pub fn description(&self) -> &'static str {
        match self {
            Grade::Excellent => "Combinaison statistiquement très équilibrée",
            Grade::Average => "Combinaison moyenne, sans excès",
            Grade::Experimental => "Combinaison audacieuse, hors des sentiers battus",
            Grade::Rare => "Motif rare au regard des probabilités",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::Excellent => write!(f, "EXCELLENTE"),
            Grade::Average => write!(f, "MOYENNE"),
            Grade::Experimental => write!(f, "EXPÉRIMENTALE"),
            Grade::Rare => write!(f, "RARE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub numbers: Vec<u8>,
    pub sum: u32,
    pub odd_count: usize,
    pub even_count: usize,
    pub high_count: usize,
    pub low_count: usize,
    pub consecutive_pairs: usize,
    pub points: u8,
    pub percent: u8,
    pub grade: Grade,
}

/// Paires adjacentes (après tri) de numéros consécutifs.
pub fn consecutive_pairs(sorted: &[u8]) -> usize {
    sorted.windows(2).filter(|w| w[1] - w[0] == 1).count()
}

/// Statistiques descriptives et note d'équilibre d'une combinaison.
pub fn analyze(numbers: &[u8], game: &Game, rules: &ScoringRules) -> Result<Analysis> {
    if numbers.is_empty() {
        bail!("Combinaison vide : rien à analyser");
    }

    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();

    let len = sorted.len();
    let sum: u32 = sorted.iter().map(|&n| n as u32).sum();
    let odd_count = sorted.iter().filter(|&&n| n % 2 == 1).count();
    let threshold = rules.high_threshold.unwrap_or_else(|| game.high_threshold());
    let high_count = sorted.iter().filter(|&&n| n >= threshold).count();
    let consecutive = consecutive_pairs(&sorted);

    let points = rules.sum.points(sum)
        + rules.odd.points(odd_count as u32)
        + rules.high.points(high_count as u32)
        + rules.consecutive.points(consecutive as u32);
    let percent = (points as u32 * 100 / rules.max_points() as u32) as u8;

    Ok(Analysis {
        numbers: sorted,
        sum,
        odd_count,
        even_count: len - odd_count,
        high_count,
        low_count: len - high_count,
        consecutive_pairs: consecutive,
        points,
        percent,
        grade: rules.grade(points),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(numbers: &[u8]) -> Analysis {
        analyze(numbers, &Game::LOTTO_645, &ScoringRules::default()).unwrap()
    }

    #[test]
    fn test_run_of_six() {
        let a = score(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(a.sum, 21);
        assert_eq!(a.odd_count, 3);
        assert_eq!(a.even_count, 3);
        assert_eq!(a.high_count, 0);
        assert_eq!(a.low_count, 6);
        assert_eq!(a.consecutive_pairs, 5);
        // seule la parité rapporte des points
        assert_eq!(a.points, 2);
        assert_eq!(a.percent, 25);
        assert_eq!(a.grade, Grade::Rare);
    }

    #[test]
    fn test_spread_combination() {
        let a = score(&[2, 14, 23, 31, 40, 45]);
        assert_eq!(a.sum, 155);
        assert_eq!(a.odd_count, 3);
        assert_eq!(a.high_count, 4);
        assert_eq!(a.low_count, 2);
        assert_eq!(a.consecutive_pairs, 0);
        assert_eq!(a.points, 8);
        assert_eq!(a.percent, 100);
        assert_eq!(a.grade, Grade::Excellent);
    }

    #[test]
    fn test_partial_credit() {
        // somme acceptable, parité idéale, 5 hauts et 2 paires consécutives acceptables
        let a = score(&[10, 24, 25, 40, 44, 45]);
        assert_eq!(a.sum, 188);
        assert_eq!(a.odd_count, 2);
        assert_eq!(a.high_count, 5);
        assert_eq!(a.consecutive_pairs, 2);
        assert_eq!(a.points, 1 + 2 + 1 + 1);
        assert_eq!(a.grade, Grade::Average);
    }

    #[test]
    fn test_unsorted_input_sorted_first() {
        let a = score(&[6, 1, 5, 2, 4, 3]);
        assert_eq!(a.numbers, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(a.consecutive_pairs, 5);
    }

    #[test]
    fn test_pure() {
        let a = score(&[3, 11, 19, 27, 36, 42]);
        let b = score(&[3, 11, 19, 27, 36, 42]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(analyze(&[], &Game::LOTTO_645, &ScoringRules::default()).is_err());
    }

    #[test]
    fn test_high_threshold_override() {
        let rules = ScoringRules {
            high_threshold: Some(40),
            ..ScoringRules::default()
        };
        let a = analyze(&[2, 14, 23, 31, 40, 45], &Game::LOTTO_645, &rules).unwrap();
        assert_eq!(a.high_count, 2);
    }

    #[test]
    fn test_grade_cutoffs() {
        let rules = ScoringRules::default();
        assert_eq!(rules.grade(8), Grade::Excellent);
        assert_eq!(rules.grade(7), Grade::Excellent);
        assert_eq!(rules.grade(6), Grade::Average);
        assert_eq!(rules.grade(5), Grade::Average);
        assert_eq!(rules.grade(4), Grade::Experimental);
        assert_eq!(rules.grade(3), Grade::Experimental);
        assert_eq!(rules.grade(2), Grade::Rare);
        assert_eq!(rules.grade(0), Grade::Rare);
    }

    #[test]
    fn test_consecutive_pairs() {
        assert_eq!(consecutive_pairs(&[1, 2, 4, 5, 7, 9]), 2);
        assert_eq!(consecutive_pairs(&[7]), 0);
    }
}

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Nombre maximal de numéros dans une combinaison, toutes variantes confondues.
pub const MAX_PICK: usize = 7;

/// Variante de jeu : `count` numéros distincts tirés dans `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub max: u8,
    pub count: usize,
}

impl Game {
    pub const LOTTO_645: Game = Game { max: 45, count: 6 };

    pub fn new(max: u8, count: usize) -> Result<Self> {
        let game = Game { max, count };
        game.validate()?;
        Ok(game)
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            bail!("Nombre de numéros invalide : 0");
        }
        if self.count > MAX_PICK {
            bail!("Nombre de numéros {} trop grand (max {})", self.count, MAX_PICK);
        }
        if self.count > self.max as usize {
            bail!(
                "Impossible de tirer {} numéros distincts dans 1-{}",
                self.count,
                self.max
            );
        }
        Ok(())
    }

    /// Premier numéro considéré comme "haut" (23 pour le 6/45).
    pub fn high_threshold(&self) -> u8 {
        self.max / 2 + 1
    }

    pub fn contains(&self, n: u8) -> bool {
        n >= 1 && n <= self.max
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::LOTTO_645
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.count, self.max)
    }
}

/// Combinaison validée : numéros distincts, dans les bornes du jeu, triés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberSet(Vec<u8>);

impl NumberSet {
    pub fn new(game: &Game, numbers: &[u8]) -> Result<Self> {
        if numbers.len() != game.count {
            bail!(
                "Attendu {} numéros, reçu {}",
                game.count,
                numbers.len()
            );
        }
        for &n in numbers {
            if !game.contains(n) {
                bail!("Numéro {} hors limites (1-{})", n, game.max);
            }
        }
        let mut sorted = numbers.to_vec();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            bail!("Numéro en double : {}", w[0]);
        }
        Ok(NumberSet(sorted))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }

    /// Format de stockage : "3,12,17,28,33,41".
    pub fn to_csv(&self) -> String {
        self.0
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::fmt::Display for NumberSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .0
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        write!(f, "{s}")
    }
}

/// Tirage officiel du Loto 6/45.
#[derive(Debug, Clone)]
pub struct Draw {
    pub draw_no: u32,
    pub date: String,
    pub numbers: [u8; 6],
    pub bonus: u8,
    pub first_prize: i64,
    pub first_winners: u32,
}

/// Combinaison générée et conservée pour la commande `history`.
#[derive(Debug, Clone)]
pub struct GeneratedSet {
    pub created_at: String,
    pub mode: String,
    pub numbers: String,
    pub points: u8,
    pub grade: String,
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
    pub tag: FrequencyTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyTag {
    Hot,
    Cold,
    Normal,
}

impl std::fmt::Display for FrequencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrequencyTag::Hot => write!(f, "HOT"),
            FrequencyTag::Cold => write!(f, "COLD"),
            FrequencyTag::Normal => write!(f, "-"),
        }
    }
}

pub fn validate_draw(numbers: &[u8; 6], bonus: u8) -> Result<()> {
    let game = Game::LOTTO_645;
    NumberSet::new(&game, numbers)?;
    if !game.contains(bonus) {
        bail!("Numéro bonus {} hors limites (1-45)", bonus);
    }
    if numbers.contains(&bonus) {
        bail!("Le numéro bonus {} figure déjà dans le tirage", bonus);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_validation() {
        assert!(Game::new(45, 6).is_ok());
        assert!(Game::new(45, 7).is_ok());
        assert!(Game::new(45, 0).is_err());
        assert!(Game::new(45, 8).is_err());
        assert!(Game::new(5, 6).is_err());
        assert!(Game::new(6, 6).is_ok());
    }

    #[test]
    fn test_high_threshold() {
        assert_eq!(Game::LOTTO_645.high_threshold(), 23);
        assert_eq!(Game { max: 20, count: 5 }.high_threshold(), 11);
    }

    #[test]
    fn test_number_set_sorted() {
        let set = NumberSet::new(&Game::LOTTO_645, &[40, 2, 31, 14, 45, 23]).unwrap();
        assert_eq!(set.as_slice(), &[2, 14, 23, 31, 40, 45]);
        assert_eq!(set.sum(), 155);
        assert_eq!(set.to_csv(), "2,14,23,31,40,45");
    }

    #[test]
    fn test_number_set_rejects_invalid() {
        let game = Game::LOTTO_645;
        assert!(NumberSet::new(&game, &[1, 2, 3, 4, 5]).is_err());
        assert!(NumberSet::new(&game, &[0, 2, 3, 4, 5, 6]).is_err());
        assert!(NumberSet::new(&game, &[1, 2, 3, 4, 5, 46]).is_err());
        assert!(NumberSet::new(&game, &[1, 1, 3, 4, 5, 6]).is_err());
    }

    #[test]
    fn test_number_set_display() {
        let set = NumberSet::new(&Game::LOTTO_645, &[3, 12, 17, 28, 33, 41]).unwrap();
        assert_eq!(set.to_string(), " 3 - 12 - 17 - 28 - 33 - 41");
    }

    #[test]
    fn test_validate_draw() {
        assert!(validate_draw(&[17, 26, 29, 30, 31, 43], 12).is_ok());
        assert!(validate_draw(&[17, 26, 29, 30, 31, 43], 43).is_err());
        assert!(validate_draw(&[17, 26, 29, 30, 31, 43], 46).is_err());
        assert!(validate_draw(&[17, 17, 29, 30, 31, 43], 12).is_err());
    }
}

pub mod sampler;
pub mod scorer;
pub mod simulation;
pub mod weights;

use lelotto_db::models::{Draw, FrequencyTag, NumberStats};

/// Fréquence et retard de chaque numéro. `draws[0]` = tirage le plus récent.
/// Le numéro bonus n'est pas compté.
pub fn compute_stats(draws: &[Draw], pool_size: u8) -> Vec<NumberStats> {
    let mut stats: Vec<NumberStats> = (1..=pool_size)
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: 0,
            tag: FrequencyTag::Normal,
        })
        .collect();
    let mut seen = vec![false; pool_size as usize];

    for (i, draw) in draws.iter().enumerate() {
        for &n in &draw.numbers {
            let idx = (n - 1) as usize;
            if idx < stats.len() {
                stats[idx].frequency += 1;
                if !seen[idx] {
                    seen[idx] = true;
                    stats[idx].gap = i as u32;
                }
            }
        }
    }

    for (stat, &was_seen) in stats.iter_mut().zip(&seen) {
        if !was_seen {
            stat.gap = draws.len() as u32;
        }
    }

    tag_frequencies(&mut stats, draws.len(), 6);
    stats
}

/// HOT/COLD selon l'écart relatif à la fréquence attendue sous tirage uniforme.
pub fn tag_frequencies(stats: &mut [NumberStats], draw_count: usize, pick_count: usize) {
    if stats.is_empty() || draw_count == 0 {
        return;
    }
    let expected = draw_count as f64 * pick_count as f64 / stats.len() as f64;
    let threshold = 0.3;

    for s in stats.iter_mut() {
        let deviation = (s.frequency as f64 - expected) / expected;
        s.tag = if deviation > threshold {
            FrequencyTag::Hot
        } else if deviation < -threshold {
            FrequencyTag::Cold
        } else {
            FrequencyTag::Normal
        };
    }
}

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::analysis::sampler::ConstrainedDraw;
use crate::analysis::scorer::{Analysis, Grade};
use crate::analysis::simulation::Marginal;
use crate::analysis::weights::WeightTable;
use crate::import::ImportResult;
use lelotto_db::models::{Draw, FrequencyTag, GeneratedSet, NumberStats};

/// Couleur officielle des boules du 6/45 par dizaine.
pub fn ball_color(n: u8) -> Color {
    match n {
        1..=10 => Color::Yellow,
        11..=20 => Color::Blue,
        21..=30 => Color::Red,
        31..=40 => Color::Grey,
        _ => Color::Green,
    }
}

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::Excellent => Color::Green,
        Grade::Average => Color::White,
        Grade::Experimental => Color::Yellow,
        Grade::Rare => Color::Red,
    }
}

fn ball_cells(numbers: &[u8]) -> Vec<Cell> {
    numbers
        .iter()
        .map(|&n| Cell::new(format!("{:2}", n)).fg(ball_color(n)))
        .collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn display_suggestions(suggestions: &[(ConstrainedDraw, Analysis)], mode: &str) {
    println!("\n🎰 Combinaisons générées ({mode})\n");

    let count = suggestions.first().map(|(d, _)| d.numbers.len()).unwrap_or(0);
    let mut header: Vec<String> = vec!["#".to_string()];
    header.extend((1..=count).map(|i| format!("N{}", i)));
    header.extend(["Somme", "Essais", "Points", "Note"].map(String::from));

    let mut table = new_table();
    table.set_header(header);

    for (i, (draw, analysis)) in suggestions.iter().enumerate() {
        let mut row = vec![Cell::new(i + 1)];
        row.extend(ball_cells(draw.numbers.as_slice()));
        let attempts = if draw.satisfied {
            draw.attempts.to_string()
        } else {
            format!("{} (libre)", draw.attempts)
        };
        row.push(Cell::new(analysis.sum));
        row.push(Cell::new(attempts));
        row.push(Cell::new(format!("{} ({}%)", analysis.points, analysis.percent)));
        row.push(Cell::new(analysis.grade.to_string()).fg(grade_color(analysis.grade)));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn display_analysis(analysis: &Analysis) {
    println!("\n📊 Analyse de la combinaison\n");

    let mut balls = new_table();
    balls.add_row(ball_cells(&analysis.numbers));
    println!("{balls}");

    let mut table = new_table();
    table.set_header(vec!["Indicateur", "Valeur"]);
    table.add_row(vec!["Somme".to_string(), analysis.sum.to_string()]);
    table.add_row(vec![
        "Impairs : pairs".to_string(),
        format!("{} : {}", analysis.odd_count, analysis.even_count),
    ]);
    table.add_row(vec![
        "Hauts : bas".to_string(),
        format!("{} : {}", analysis.high_count, analysis.low_count),
    ]);
    table.add_row(vec![
        "Paires consécutives".to_string(),
        analysis.consecutive_pairs.to_string(),
    ]);
    table.add_row(vec![
        "Score".to_string(),
        format!("{} points ({}%)", analysis.points, analysis.percent),
    ]);
    println!("{table}");

    println!("\nNote : {} ({})", analysis.grade, analysis.grade.description());
}

pub fn display_draws(draws: &[(Draw, Analysis)]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec![
        "Tirage",
        "Date",
        "N1",
        "N2",
        "N3",
        "N4",
        "N5",
        "N6",
        "Bonus",
        "Gagnants R1",
        "Gain R1",
        "Note",
    ]);

    for (draw, analysis) in draws {
        let prize = if draw.first_prize > 0 {
            format!("{} ₩", draw.first_prize)
        } else {
            "—".to_string()
        };

        let mut row = vec![Cell::new(draw.draw_no), Cell::new(&draw.date)];
        row.extend(ball_cells(&draw.numbers));
        row.push(Cell::new(format!("{:2}", draw.bonus)).fg(ball_color(draw.bonus)));
        row.push(Cell::new(draw.first_winners));
        row.push(Cell::new(prize));
        row.push(Cell::new(analysis.grade.to_string()).fg(grade_color(analysis.grade)));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_generated(sets: &[GeneratedSet]) {
    if sets.is_empty() {
        println!("Aucune combinaison générée pour l'instant.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["Date", "Mode", "Numéros", "Points", "Note"]);
    for set in sets {
        table.add_row(vec![
            set.created_at.clone(),
            set.mode.clone(),
            set.numbers.replace(',', " - "),
            set.points.to_string(),
            set.grade.clone(),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total enregistrements : {}", result.total_records);
    println!("  Insérés               : {}", result.inserted);
    println!("  Doublons ignorés      : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs               : {}", result.errors);
    }
}

pub fn display_stats(stats: &[NumberStats], window: u32) {
    println!("\n📊 Statistiques sur les {} derniers tirages\n", window);

    let mut table = new_table();
    table.set_header(vec!["Numéro", "Fréquence", "Retard", "Tag"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    for stat in &sorted {
        let color = match stat.tag {
            FrequencyTag::Hot => Color::Green,
            FrequencyTag::Cold => Color::Red,
            FrequencyTag::Normal => Color::White,
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.number)).fg(ball_color(stat.number)),
            Cell::new(stat.frequency),
            Cell::new(stat.gap),
            Cell::new(stat.tag.to_string()).fg(color),
        ]);
    }
    println!("{table}");
}

fn weight_label(weights: &WeightTable, number: u8) -> String {
    match weights.weight(number) {
        Some(w) => format!("{:.2}", w),
        None => "—".to_string(),
    }
}

pub fn display_simulation(marginals: &[Marginal], trials: u64, weights: Option<&WeightTable>) {
    let mode = if weights.is_some() { "pondéré" } else { "uniforme" };
    println!("\n🎲 Simulation : {trials} tirages ({mode})\n");

    let mut table = new_table();
    let mut header = vec!["Numéro", "Sorties", "Observé / attendu"];
    if weights.is_some() {
        header.push("Poids");
    }
    table.set_header(header);

    for m in marginals {
        let mut row = vec![
            Cell::new(format!("{:2}", m.number)).fg(ball_color(m.number)),
            Cell::new(m.hits),
            Cell::new(format!("{:.3}", m.ratio)),
        ];
        if let Some(w) = weights {
            row.push(Cell::new(weight_label(w, m.number)));
        }
        table.add_row(row);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use lelotto_db::models::Game;

    #[test]
    fn test_ball_color_bands() {
        assert_eq!(ball_color(1), Color::Yellow);
        assert_eq!(ball_color(10), Color::Yellow);
        assert_eq!(ball_color(11), Color::Blue);
        assert_eq!(ball_color(30), Color::Red);
        assert_eq!(ball_color(31), Color::Grey);
        assert_eq!(ball_color(41), Color::Green);
        assert_eq!(ball_color(45), Color::Green);
    }

    #[test]
    fn test_weight_label() {
        let table = WeightTable::historical(&Game::LOTTO_645).unwrap();
        assert_eq!(weight_label(&table, 13), "1.30");
        assert_eq!(weight_label(&table, 0), "—");
        assert_eq!(weight_label(&table, 46), "—");
    }
}

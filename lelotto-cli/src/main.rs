mod analysis;
mod config;
mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::analysis::compute_stats;
use crate::analysis::sampler::{generate_suggestions, DrawSource};
use crate::analysis::scorer::analyze;
use crate::analysis::simulation::simulate;
use crate::config::{load_config, LottoConfig};
use crate::display::{
    display_analysis, display_draws, display_generated, display_import_summary,
    display_simulation, display_stats, display_suggestions,
};
use lelotto_db::db::{
    count_draws, db_path, fetch_last_draws, fetch_last_generated, migrate, open_db,
    save_generated,
};
use lelotto_db::models::{Game, GeneratedSet, NumberSet};
use lelotto_db::rusqlite::Connection;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum SamplingMode {
    #[default]
    Uniform,
    Weighted,
}

#[derive(Parser)]
#[command(name = "lelotto", about = "Générateur et analyseur de combinaisons Loto 6/45")]
struct Cli {
    /// Fichier de configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Générer des combinaisons et les noter
    Generate {
        /// Nombre de combinaisons
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Mode de tirage
        #[arg(short, long, default_value = "uniform")]
        mode: SamplingMode,

        /// Recommencer jusqu'à obtenir une somme dans la plage configurée
        #[arg(long)]
        constrained: bool,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Plus grand numéro (remplace la configuration)
        #[arg(long)]
        max: Option<u8>,

        /// Nombre de numéros par combinaison (remplace la configuration)
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Analyser une combinaison saisie
    Analyze {
        /// Numéros séparés par des espaces
        #[arg(required = true, num_args = 1..)]
        numbers: Vec<u8>,
    },

    /// Importer des tirages officiels (JSON, JSON Lines ou CSV)
    Import {
        /// Chemin vers le fichier
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Lister les derniers tirages officiels
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Fréquences et retards sur les derniers tirages officiels
    Stats {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Afficher les dernières combinaisons générées
    History {
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Mesurer la fréquence de chaque numéro sur un grand nombre de tirages
    Simulate {
        #[arg(short, long, default_value = "100000")]
        trials: u64,

        #[arg(short, long, default_value = "uniform")]
        mode: SamplingMode,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Afficher la configuration effective
    Config,

    /// Afficher le chemin de la base de données
    DbPath,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let path = db_path();

    match cli.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::Analyze { numbers } => cmd_analyze(&config, &numbers),
        Command::Simulate { trials, mode, seed } => cmd_simulate(&config, trials, mode, seed),
        Command::Generate {
            count,
            mode,
            constrained,
            seed,
            max,
            pick,
        } => {
            let conn = open_store(&path)?;
            cmd_generate(&conn, &config, count, mode, constrained, seed, max, pick)
        }
        Command::Import { file } => cmd_import(&open_store(&path)?, &file),
        Command::List { last } => cmd_list(&open_store(&path)?, &config, last),
        Command::Stats { window } => cmd_stats(&open_store(&path)?, window),
        Command::History { last } => cmd_history(&open_store(&path)?, last),
    }
}

fn open_store(path: &Path) -> Result<Connection> {
    let conn = open_db(path)?;
    migrate(&conn)?;
    Ok(conn)
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    conn: &Connection,
    config: &LottoConfig,
    count: usize,
    mode: SamplingMode,
    constrained: bool,
    seed: Option<u64>,
    max: Option<u8>,
    pick: Option<usize>,
) -> Result<()> {
    let game = Game::new(
        max.unwrap_or(config.game.max),
        pick.unwrap_or(config.game.count),
    )?;
    let game_config = LottoConfig { game, ..config.clone() };

    let table;
    let source = match mode {
        SamplingMode::Uniform => DrawSource::Uniform,
        SamplingMode::Weighted => {
            table = game_config.weight_table()?;
            DrawSource::Weighted {
                table: &table,
                scale: config.sampling.weight_scale,
            }
        }
    };
    let constraint = constrained.then(|| config.sampling.sum_constraint());

    let draws = generate_suggestions(&game, &source, constraint, count, seed)?;
    let label = source.label(constrained);
    let created_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let mut scored = Vec::with_capacity(draws.len());
    for draw in draws {
        let analysis = analyze(draw.numbers.as_slice(), &game, &config.scoring)?;
        save_generated(
            conn,
            &GeneratedSet {
                created_at: created_at.clone(),
                mode: label.clone(),
                numbers: draw.numbers.to_csv(),
                points: analysis.points,
                grade: analysis.grade.to_string(),
            },
        )?;
        scored.push((draw, analysis));
    }

    display_suggestions(&scored, &format!("{label}, {game}"));
    Ok(())
}

fn cmd_analyze(config: &LottoConfig, numbers: &[u8]) -> Result<()> {
    let set = NumberSet::new(&config.game, numbers)?;
    let analysis = analyze(set.as_slice(), &config.game, &config.scoring)?;
    display_analysis(&analysis);
    Ok(())
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_file(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, config: &LottoConfig, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : lelotto import --file <tirages.json>");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    let mut rows = Vec::with_capacity(draws.len());
    for draw in draws {
        let analysis = analyze(&draw.numbers, &Game::LOTTO_645, &config.scoring)?;
        rows.push((draw, analysis));
    }
    display_draws(&rows);
    Ok(())
}

fn cmd_stats(conn: &Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : lelotto import --file <tirages.json>");
        return Ok(());
    }
    let effective_window = window.min(n);
    let draws = fetch_last_draws(conn, effective_window)?;
    let stats = compute_stats(&draws, Game::LOTTO_645.max);
    display_stats(&stats, effective_window);
    Ok(())
}

fn cmd_history(conn: &Connection, last: u32) -> Result<()> {
    let sets = fetch_last_generated(conn, last)?;
    display_generated(&sets);
    Ok(())
}

fn cmd_simulate(
    config: &LottoConfig,
    trials: u64,
    mode: SamplingMode,
    seed: Option<u64>,
) -> Result<()> {
    let table = match mode {
        SamplingMode::Uniform => None,
        SamplingMode::Weighted => Some(config.weight_table()?),
    };
    let source = match &table {
        None => DrawSource::Uniform,
        Some(t) => DrawSource::Weighted {
            table: t,
            scale: config.sampling.weight_scale,
        },
    };
    let marginals = simulate(&config.game, &source, trials, seed, true)?;
    display_simulation(&marginals, trials, table.as_ref());
    Ok(())
}

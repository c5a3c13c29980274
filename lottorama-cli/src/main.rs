mod display;
mod engine;
mod import;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use lottorama_db::db::{db_path, Ledger, LedgerError};
use lottorama_db::models::Pool;

use crate::display::{display_draw, display_import_summary, display_tiers};
use crate::engine::rank::partition;

#[derive(Parser)]
#[command(name = "lottorama", about = "Assistant de grilles Euro Millions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Session interactive : saisir une grille, la classer, prédire
    Play {
        /// Seed pour la reproductibilité des prédictions
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Importer l'historique des tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "assets/euromillions.csv")]
        file: PathBuf,
    },

    /// Afficher le dernier tirage
    Last,

    /// Afficher les paliers de popularité des deux groupes
    Tiers,

    /// Afficher le chemin de la base de données
    DbPath,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let ledger = Ledger::open(&path)?;
    ledger.migrate()?;

    match cli.command {
        Command::Play { seed } => session::run_session(&ledger, seed),
        Command::Import { file } => cmd_import(&ledger, &file),
        Command::Last => cmd_last(&ledger),
        Command::Tiers => cmd_tiers(&ledger),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn cmd_import(ledger: &Ledger, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(ledger, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_last(ledger: &Ledger) -> Result<()> {
    match ledger.fetch_last_draw() {
        Ok(draw) => {
            display_draw(&draw);
            Ok(())
        }
        Err(LedgerError::Empty) => {
            println!("Base vide. Lancez d'abord : lottorama import");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_tiers(ledger: &Ledger) -> Result<()> {
    if ledger.count_draws()? == 0 {
        println!("Base vide. Lancez d'abord : lottorama import");
        return Ok(());
    }
    let ball_rows = ledger.fetch_ranking_rows(Pool::Balls)?;
    let star_rows = ledger.fetch_ranking_rows(Pool::Stars)?;
    display_tiers(
        &partition(&ball_rows, Pool::Balls),
        &partition(&star_rows, Pool::Stars),
    );
    Ok(())
}

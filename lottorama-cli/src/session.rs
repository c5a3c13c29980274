use std::io::{self, Write};

use anyhow::{Context, Result};

use lottorama_db::db::{Ledger, LedgerError};
use lottorama_db::models::{Pool, Ticket, TierPartition};

use crate::display::{display_draw, display_prediction, display_ticket, display_tiers};
use crate::engine::predict::Predictor;
use crate::engine::rank::partition;
use crate::engine::validate::{validate_balls, validate_held, validate_stars, InputError};

/// États de la session. La boucle externe avance d'état en état,
/// sans ré-entrée récursive du jeu.
#[derive(Debug)]
enum SessionState {
    Collect,
    Record(Ticket),
    Rank(Ticket),
    Menu(Ticket),
    Predict(Ticket),
    Exit,
}

#[derive(Debug, PartialEq)]
enum MenuChoice {
    Quit,
    Modify,
    Restart,
}

fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim().to_lowercase().as_str() {
        "q" | "quitter" | "quit" => Some(MenuChoice::Quit),
        "m" | "modifier" | "modify" => Some(MenuChoice::Modify),
        "r" | "recommencer" | "restart" => Some(MenuChoice::Restart),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Et maintenant ? ──");
    println!("  Q. quitter      Quitter le jeu");
    println!("  M. modifier     Conserver 2 numéros et demander une prédiction");
    println!("  R. recommencer  Saisir une nouvelle grille");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn report_errors(errors: &[InputError]) {
    println!();
    for e in errors {
        println!("Erreur : {}", e);
    }
    println!();
    println!("* Réessayez !");
}

fn prompt_ticket() -> Result<Ticket> {
    let balls = loop {
        let input = prompt("Entrez vos cinq numéros (séparés par des virgules) : ")?;
        let tokens: Vec<&str> = input.split(',').collect();
        match validate_balls(&tokens) {
            Ok(balls) => break balls,
            Err(errors) => report_errors(&errors),
        }
    };
    println!("Numéros valides !");

    let stars = loop {
        let input = prompt("Entrez vos deux étoiles (séparées par une virgule) : ")?;
        let tokens: Vec<&str> = input.split(',').collect();
        match validate_stars(&tokens) {
            Ok(stars) => break stars,
            Err(errors) => report_errors(&errors),
        }
    };
    println!("Étoiles valides !");

    Ok(Ticket::new(balls, stars))
}

fn prompt_held(ticket: &Ticket) -> Result<[u8; 2]> {
    println!("Choisissez 2 numéros de votre grille à conserver.");
    loop {
        let input = prompt("Entrez vos deux numéros (séparés par une virgule) : ")?;
        let tokens: Vec<&str> = input.split(',').collect();
        match validate_held(&tokens, ticket) {
            Ok(held) => return Ok(held),
            Err(errors) => report_errors(&errors),
        }
    }
}

fn prompt_continue() -> Result<bool> {
    loop {
        let input = prompt("Voulez-vous continuer ? (o/n) : ")?;
        match input.to_lowercase().as_str() {
            "o" | "oui" => return Ok(true),
            "n" | "non" => return Ok(false),
            _ => println!("Répondez par o ou n."),
        }
    }
}

fn fetch_partitions(ledger: &Ledger) -> Result<(TierPartition, TierPartition), LedgerError> {
    let ball_rows = ledger.fetch_ranking_rows(Pool::Balls)?;
    let star_rows = ledger.fetch_ranking_rows(Pool::Stars)?;
    Ok((
        partition(&ball_rows, Pool::Balls),
        partition(&star_rows, Pool::Stars),
    ))
}

fn run_prediction(
    ledger: &Ledger,
    ticket: &Ticket,
    ball_tiers: &mut Option<TierPartition>,
    seed: Option<u64>,
) -> Result<()> {
    if ball_tiers.is_none() {
        let rows = match ledger.fetch_ranking_rows(Pool::Balls) {
            Ok(rows) => rows,
            Err(e) => {
                println!("Erreur au classement : {e}");
                return Ok(());
            }
        };
        *ball_tiers = Some(partition(&rows, Pool::Balls));
    }
    let Some(tiers) = ball_tiers else {
        return Ok(());
    };

    let held = prompt_held(ticket)?;
    let mut predictor = Predictor::new(seed);
    match predictor.predict(tiers, held) {
        Ok(predicted) => display_prediction(&predicted),
        Err(e) => println!("Prédiction impossible : {e}"),
    }
    Ok(())
}

pub fn run_session(ledger: &Ledger, seed: Option<u64>) -> Result<()> {
    println!();
    println!("Bienvenue sur Lottorama !");
    println!("Laissez-nous vous aider à décrocher le jackpot de l'Euro Millions.");
    println!();
    println!("Saisissez vos numéros Euro Millions favoris :");
    println!("cinq numéros, strictement uniques, entre 1 et 50,");
    println!("séparés par des virgules et sans espaces.");
    println!("Exemple : 7,45,34,23,49\n");

    let mut ball_tiers: Option<TierPartition> = None;
    let mut state = SessionState::Collect;

    loop {
        state = match state {
            SessionState::Collect => {
                match ledger.fetch_last_draw() {
                    Ok(draw) => display_draw(&draw),
                    Err(LedgerError::Empty) => {
                        println!("Aucun tirage dans l'historique pour le moment.")
                    }
                    Err(e) => println!("Erreur : {e}"),
                }
                let ticket = prompt_ticket()?;
                display_ticket(&ticket);
                SessionState::Record(ticket)
            }
            SessionState::Record(ticket) => {
                match ledger.append_ticket(&ticket) {
                    Ok(()) => println!("Votre grille a bien été enregistrée."),
                    Err(e) => println!("Erreur à l'enregistrement : {e}"),
                }
                SessionState::Rank(ticket)
            }
            SessionState::Rank(ticket) => {
                match fetch_partitions(ledger) {
                    Ok((balls, stars)) => {
                        display_tiers(&balls, &stars);
                        ball_tiers = Some(balls);
                    }
                    Err(e) => println!("Erreur au classement : {e}"),
                }
                SessionState::Menu(ticket)
            }
            SessionState::Menu(ticket) => {
                display_menu();
                let input = prompt("> ")?;
                match parse_menu_choice(&input) {
                    Some(MenuChoice::Quit) => SessionState::Exit,
                    Some(MenuChoice::Modify) => SessionState::Predict(ticket),
                    Some(MenuChoice::Restart) => SessionState::Collect,
                    None => {
                        println!("Choix inconnu : '{}'. Tapez Q, M ou R.", input);
                        SessionState::Menu(ticket)
                    }
                }
            }
            SessionState::Predict(ticket) => {
                run_prediction(ledger, &ticket, &mut ball_tiers, seed)?;
                if prompt_continue()? {
                    SessionState::Menu(ticket)
                } else {
                    SessionState::Exit
                }
            }
            SessionState::Exit => {
                println!("Au revoir !");
                break;
            }
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu_choice_by_letter() {
        assert_eq!(parse_menu_choice("q"), Some(MenuChoice::Quit));
        assert_eq!(parse_menu_choice("m"), Some(MenuChoice::Modify));
        assert_eq!(parse_menu_choice("r"), Some(MenuChoice::Restart));
    }

    #[test]
    fn test_parse_menu_choice_case_insensitive() {
        assert_eq!(parse_menu_choice("Q"), Some(MenuChoice::Quit));
        assert_eq!(parse_menu_choice("M"), Some(MenuChoice::Modify));
        assert_eq!(parse_menu_choice("R"), Some(MenuChoice::Restart));
        assert_eq!(parse_menu_choice("QUITTER"), Some(MenuChoice::Quit));
    }

    #[test]
    fn test_parse_menu_choice_by_word() {
        assert_eq!(parse_menu_choice("quitter"), Some(MenuChoice::Quit));
        assert_eq!(parse_menu_choice("modifier"), Some(MenuChoice::Modify));
        assert_eq!(parse_menu_choice("recommencer"), Some(MenuChoice::Restart));
        assert_eq!(parse_menu_choice("quit"), Some(MenuChoice::Quit));
        assert_eq!(parse_menu_choice("modify"), Some(MenuChoice::Modify));
        assert_eq!(parse_menu_choice("restart"), Some(MenuChoice::Restart));
    }

    #[test]
    fn test_parse_menu_choice_trims_input() {
        assert_eq!(parse_menu_choice("  q  "), Some(MenuChoice::Quit));
    }

    #[test]
    fn test_parse_menu_choice_unknown() {
        assert_eq!(parse_menu_choice(""), None);
        assert_eq!(parse_menu_choice("x"), None);
        assert_eq!(parse_menu_choice("aide"), None);
    }
}

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use lottorama_db::models::{Draw, PredictedTicket, Ticket, Tier, TierPartition};

use crate::import::ImportResult;

fn join_numbers(numbers: &[u8]) -> String {
    if numbers.is_empty() {
        return "—".to_string();
    }
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draw(draw: &Draw) {
    let mut sorted_balls = draw.balls;
    sorted_balls.sort();
    let mut sorted_stars = draw.stars;
    sorted_stars.sort();

    println!("\nDernier tirage :");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Jour", "Boules", "Étoiles"]);
    table.add_row(vec![
        &draw.date,
        &draw.day,
        &join_numbers(&sorted_balls),
        &join_numbers(&sorted_stars),
    ]);
    println!("{table}");
}

pub fn display_ticket(ticket: &Ticket) {
    println!("\nVotre grille :");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Boules", "Étoiles"]);
    table.add_row(vec![
        &join_numbers(&ticket.balls),
        &join_numbers(&ticket.stars),
    ]);
    println!("{table}");
}

pub fn display_tiers(balls: &TierPartition, stars: &TierPartition) {
    println!("\n📊 Popularité historique des numéros\n");

    println!("── Boules (1-50) ──");
    display_tier_table(balls);

    println!("\n── Étoiles (1-12) ──");
    display_tier_table(stars);
}

fn display_tier_table(tiers: &TierPartition) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Palier", "Nombre", "Numéros"]);

    let rows = [
        (Tier::Popular, &tiers.popular, Color::Green),
        (Tier::Moderate, &tiers.moderate, Color::Yellow),
        (Tier::Least, &tiers.least, Color::Red),
    ];
    for (tier, numbers, color) in rows {
        table.add_row(vec![
            Cell::new(tier.to_string()).fg(color),
            Cell::new(numbers.len().to_string()),
            Cell::new(join_numbers(numbers)),
        ]);
    }
    println!("{table}");
}

pub fn display_prediction(predicted: &PredictedTicket) {
    println!("\n🎲 Grille prédite\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let cells: Vec<Cell> = predicted
        .numbers
        .iter()
        .map(|n| {
            let cell = Cell::new(format!("{:2}", n));
            if predicted.held.contains(n) {
                cell.fg(Color::Green)
            } else {
                cell
            }
        })
        .collect();
    table.add_row(cells);
    println!("{table}");
    println!("(en vert : vos numéros conservés)");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_numbers_padding() {
        assert_eq!(join_numbers(&[7, 23]), " 7 - 23");
    }

    #[test]
    fn test_join_numbers_empty() {
        assert_eq!(join_numbers(&[]), "—");
    }
}

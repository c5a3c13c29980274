use anyhow::{bail, Result};

/// Grille jouée : 5 boules et 2 étoiles, chaque groupe trié croissant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub balls: [u8; 5],
    pub stars: [u8; 2],
}

impl Ticket {
    /// Construit une grille normalisée : les deux groupes sont triés.
    pub fn new(mut balls: [u8; 5], mut stars: [u8; 2]) -> Self {
        balls.sort();
        stars.sort();
        Self { balls, stars }
    }

    /// Rend les boules sous la forme "a,b,c,d,e", relisible par le parseur.
    pub fn balls_csv(&self) -> String {
        self.balls
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Rend les étoiles sous la forme "a,b", relisible par le parseur.
    pub fn stars_csv(&self) -> String {
        self.stars
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone)]
pub struct Draw {
    pub draw_id: String,
    pub day: String,
    pub date: String,
    pub balls: [u8; 5],
    pub stars: [u8; 2],
}

/// Ligne de classement : un numéro et son nombre de sorties gagnantes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingRow {
    pub number: u8,
    pub win_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Balls,
    Stars,
}

impl Pool {
    pub fn size(&self) -> usize {
        match self {
            Pool::Balls => 50,
            Pool::Stars => 12,
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Pool::Balls => 5,
            Pool::Stars => 2,
        }
    }

    /// Clé de stockage du classement pour ce groupe.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pool::Balls => "balls",
            Pool::Stars => "stars",
        }
    }

    /// Seuils de popularité, volontairement différents entre boules et étoiles.
    pub fn thresholds(&self) -> TierThresholds {
        match self {
            Pool::Balls => TierThresholds {
                popular_min: 5,
                moderate_min: 4,
            },
            Pool::Stars => TierThresholds {
                popular_min: 7,
                moderate_min: 6,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThresholds {
    pub popular_min: u32,
    pub moderate_min: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Popular,
    Moderate,
    Least,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Popular => write!(f, "POPULAIRE"),
            Tier::Moderate => write!(f, "MODÉRÉ"),
            Tier::Least => write!(f, "RARE"),
        }
    }
}

/// Partition d'un instantané de classement en trois paliers disjoints,
/// dans l'ordre des lignes d'origine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierPartition {
    pub popular: Vec<u8>,
    pub moderate: Vec<u8>,
    pub least: Vec<u8>,
}

/// Grille proposée par le prédicteur : 4 ou 5 numéros triés,
/// dont les 2 numéros conservés par le joueur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictedTicket {
    pub numbers: Vec<u8>,
    pub held: [u8; 2],
}

pub fn validate_draw(balls: &[u8; 5], stars: &[u8; 2]) -> Result<()> {
    for &b in balls {
        if b < 1 || b > 50 {
            bail!("Boule {} hors limites (1-50)", b);
        }
    }
    for &s in stars {
        if s < 1 || s > 12 {
            bail!("Étoile {} hors limites (1-12)", s);
        }
    }
    for i in 0..balls.len() {
        for j in (i + 1)..balls.len() {
            if balls[i] == balls[j] {
                bail!("Boule en double : {}", balls[i]);
            }
        }
    }
    if stars[0] == stars[1] {
        bail!("Étoile en double : {}", stars[0]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_new_sorts_both_groups() {
        let ticket = Ticket::new([45, 7, 49, 23, 34], [9, 3]);
        assert_eq!(ticket.balls, [7, 23, 34, 45, 49]);
        assert_eq!(ticket.stars, [3, 9]);
    }

    #[test]
    fn test_ticket_csv_round_trip_format() {
        let ticket = Ticket::new([45, 7, 49, 23, 34], [9, 3]);
        assert_eq!(ticket.balls_csv(), "7,23,34,45,49");
        assert_eq!(ticket.stars_csv(), "3,9");
    }

    #[test]
    fn test_pool_size() {
        assert_eq!(Pool::Balls.size(), 50);
        assert_eq!(Pool::Stars.size(), 12);
    }

    #[test]
    fn test_pool_pick_count() {
        assert_eq!(Pool::Balls.pick_count(), 5);
        assert_eq!(Pool::Stars.pick_count(), 2);
    }

    #[test]
    fn test_pool_thresholds_differ() {
        let balls = Pool::Balls.thresholds();
        assert_eq!(balls.popular_min, 5);
        assert_eq!(balls.moderate_min, 4);

        let stars = Pool::Stars.thresholds();
        assert_eq!(stars.popular_min, 7);
        assert_eq!(stars.moderate_min, 6);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::Popular.to_string(), "POPULAIRE");
        assert_eq!(Tier::Moderate.to_string(), "MODÉRÉ");
        assert_eq!(Tier::Least.to_string(), "RARE");
    }

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5], &[1, 2]).is_ok());
        assert!(validate_draw(&[50, 49, 48, 47, 46], &[11, 12]).is_ok());
    }

    #[test]
    fn test_validate_draw_ball_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5], &[1, 2]).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 51], &[1, 2]).is_err());
    }

    #[test]
    fn test_validate_draw_star_out_of_range() {
        assert!(validate_draw(&[1, 2, 3, 4, 5], &[0, 2]).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5], &[1, 13]).is_err());
    }

    #[test]
    fn test_validate_draw_duplicates() {
        assert!(validate_draw(&[1, 1, 3, 4, 5], &[1, 2]).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5], &[3, 3]).is_err());
    }
}

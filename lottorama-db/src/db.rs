use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

use crate::models::{Draw, Pool, RankingRow, Ticket};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_id       TEXT PRIMARY KEY,
    day           TEXT NOT NULL,
    date          TEXT NOT NULL,
    ball_1        INTEGER NOT NULL,
    ball_2        INTEGER NOT NULL,
    ball_3        INTEGER NOT NULL,
    ball_4        INTEGER NOT NULL,
    ball_5        INTEGER NOT NULL,
    star_1        INTEGER NOT NULL,
    star_2        INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tickets (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    submitted_at  TEXT NOT NULL,
    ball_1        INTEGER NOT NULL,
    ball_2        INTEGER NOT NULL,
    ball_3        INTEGER NOT NULL,
    ball_4        INTEGER NOT NULL,
    ball_5        INTEGER NOT NULL,
    star_1        INTEGER NOT NULL,
    star_2        INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS rankings (
    kind          TEXT NOT NULL,
    number        TEXT NOT NULL,
    win_count     TEXT NOT NULL,
    PRIMARY KEY (kind, number)
);
";

/// Échec du registre, signalé à l'appelant sans interrompre la session.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("accès au registre impossible : {0}")]
    Io(#[from] rusqlite::Error),

    #[error("système de fichiers : {0}")]
    Fs(#[from] std::io::Error),

    #[error("ligne de classement illisible : {0}")]
    Malformed(String),

    #[error("aucun tirage enregistré")]
    Empty,
}

pub fn db_path() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lottorama.db");
    path
}

/// Registre des tirages, grilles et classements, ouvert une fois au
/// démarrage puis passé par référence à chaque composant.
pub struct Ledger {
    conn: Connection,
}

impl Ledger {
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, LedgerError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn migrate(&self) -> Result<(), LedgerError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn insert_draw(&self, draw: &Draw) -> Result<bool, LedgerError> {
        Ok(insert_draw_on(&self.conn, draw)?)
    }

    /// Insertion transactionnelle d'un lot de tirages.
    /// Retourne (insérés, doublons ignorés).
    pub fn insert_draws(&self, draws: &[Draw]) -> Result<(u32, u32), LedgerError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        let mut skipped = 0;
        for draw in draws {
            if insert_draw_on(&tx, draw)? {
                inserted += 1;
            } else {
                skipped += 1;
            }
        }
        tx.commit()?;
        Ok((inserted, skipped))
    }

    pub fn fetch_last_draw(&self) -> Result<Draw, LedgerError> {
        let mut stmt = self.conn.prepare(
            "SELECT draw_id, day, date, ball_1, ball_2, ball_3, ball_4, ball_5, star_1, star_2
             FROM draws ORDER BY date DESC, draw_id DESC LIMIT 1",
        )?;
        let mut rows = stmt.query_map([], |row| {
            Ok(Draw {
                draw_id: row.get(0)?,
                day: row.get(1)?,
                date: row.get(2)?,
                balls: [
                    row.get::<_, u8>(3)?,
                    row.get::<_, u8>(4)?,
                    row.get::<_, u8>(5)?,
                    row.get::<_, u8>(6)?,
                    row.get::<_, u8>(7)?,
                ],
                stars: [row.get::<_, u8>(8)?, row.get::<_, u8>(9)?],
            })
        })?;
        match rows.next() {
            Some(draw) => Ok(draw?),
            None => Err(LedgerError::Empty),
        }
    }

    pub fn append_ticket(&self, ticket: &Ticket) -> Result<(), LedgerError> {
        let submitted_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.conn.execute(
            "INSERT INTO tickets (submitted_at, ball_1, ball_2, ball_3, ball_4, ball_5, star_1, star_2)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                submitted_at,
                ticket.balls[0],
                ticket.balls[1],
                ticket.balls[2],
                ticket.balls[3],
                ticket.balls[4],
                ticket.stars[0],
                ticket.stars[1],
            ],
        )?;
        Ok(())
    }

    /// Instantané de classement pour un groupe, numéros croissants.
    /// Les valeurs sont stockées en texte et coercées ici ; une ligne
    /// illisible fait échouer la lecture entière.
    pub fn fetch_ranking_rows(&self, pool: Pool) -> Result<Vec<RankingRow>, LedgerError> {
        let mut stmt = self.conn.prepare(
            "SELECT number, win_count FROM rankings
             WHERE kind = ?1 ORDER BY CAST(number AS INTEGER)",
        )?;
        let raw = stmt
            .query_map([pool.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(number, win_count)| {
                let number = number.trim().parse::<u8>().map_err(|_| {
                    LedgerError::Malformed(format!("numéro '{}'", number))
                })?;
                let win_count = win_count.trim().parse::<u32>().map_err(|_| {
                    LedgerError::Malformed(format!(
                        "fréquence '{}' pour le numéro {}",
                        win_count, number
                    ))
                })?;
                Ok(RankingRow { number, win_count })
            })
            .collect()
    }

    /// Recalcule l'instantané de classement des deux groupes à partir de
    /// l'historique complet des tirages.
    pub fn rebuild_rankings(&self) -> Result<(), LedgerError> {
        let draws = self.fetch_all_numbers()?;

        let mut ball_counts = vec![0u32; Pool::Balls.size()];
        let mut star_counts = vec![0u32; Pool::Stars.size()];
        for (balls, stars) in &draws {
            for &b in balls {
                if let Some(slot) = ball_counts.get_mut(b as usize - 1) {
                    *slot += 1;
                }
            }
            for &s in stars {
                if let Some(slot) = star_counts.get_mut(s as usize - 1) {
                    *slot += 1;
                }
            }
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM rankings", [])?;
        for (i, count) in ball_counts.iter().enumerate() {
            tx.execute(
                "INSERT INTO rankings (kind, number, win_count) VALUES (?1, ?2, ?3)",
                rusqlite::params![
                    Pool::Balls.as_str(),
                    (i + 1).to_string(),
                    count.to_string()
                ],
            )?;
        }
        for (i, count) in star_counts.iter().enumerate() {
            tx.execute(
                "INSERT INTO rankings (kind, number, win_count) VALUES (?1, ?2, ?3)",
                rusqlite::params![
                    Pool::Stars.as_str(),
                    (i + 1).to_string(),
                    count.to_string()
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn count_draws(&self) -> Result<u32, LedgerError> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn count_tickets(&self) -> Result<u32, LedgerError> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))?;
        Ok(count)
    }

    fn fetch_all_numbers(&self) -> Result<Vec<([u8; 5], [u8; 2])>, LedgerError> {
        let mut stmt = self.conn.prepare(
            "SELECT ball_1, ball_2, ball_3, ball_4, ball_5, star_1, star_2 FROM draws",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    [
                        row.get::<_, u8>(0)?,
                        row.get::<_, u8>(1)?,
                        row.get::<_, u8>(2)?,
                        row.get::<_, u8>(3)?,
                        row.get::<_, u8>(4)?,
                    ],
                    [row.get::<_, u8>(5)?, row.get::<_, u8>(6)?],
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn insert_draw_on(conn: &Connection, draw: &Draw) -> Result<bool, rusqlite::Error> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_id, day, date, ball_1, ball_2, ball_3, ball_4, ball_5, star_1, star_2)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            draw.draw_id,
            draw.day,
            draw.date,
            draw.balls[0],
            draw.balls[1],
            draw.balls[2],
            draw.balls[3],
            draw.balls[4],
            draw.stars[0],
            draw.stars[1],
        ],
    )?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ledger() -> Ledger {
        let ledger = Ledger::open_in_memory().unwrap();
        ledger.migrate().unwrap();
        ledger
    }

    fn test_draw(id: &str, date: &str) -> Draw {
        Draw {
            draw_id: id.to_string(),
            day: "MARDI".to_string(),
            date: date.to_string(),
            balls: [1, 2, 3, 4, 5],
            stars: [1, 2],
        }
    }

    #[test]
    fn test_insert_and_count() {
        let ledger = test_ledger();
        assert_eq!(ledger.count_draws().unwrap(), 0);

        ledger.insert_draw(&test_draw("001", "2024-01-01")).unwrap();
        assert_eq!(ledger.count_draws().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let ledger = test_ledger();

        let inserted = ledger.insert_draw(&test_draw("001", "2024-01-01")).unwrap();
        assert!(inserted);
        let inserted = ledger.insert_draw(&test_draw("001", "2024-01-01")).unwrap();
        assert!(!inserted);
        assert_eq!(ledger.count_draws().unwrap(), 1);
    }

    #[test]
    fn test_insert_draws_batch() {
        let ledger = test_ledger();
        let draws = vec![
            test_draw("001", "2024-01-01"),
            test_draw("002", "2024-01-05"),
            test_draw("001", "2024-01-01"),
        ];
        let (inserted, skipped) = ledger.insert_draws(&draws).unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_fetch_last_draw_empty() {
        let ledger = test_ledger();
        assert!(matches!(
            ledger.fetch_last_draw(),
            Err(LedgerError::Empty)
        ));
    }

    #[test]
    fn test_fetch_last_draw_most_recent() {
        let ledger = test_ledger();
        ledger.insert_draw(&test_draw("001", "2024-01-01")).unwrap();
        ledger.insert_draw(&test_draw("003", "2024-01-09")).unwrap();
        ledger.insert_draw(&test_draw("002", "2024-01-05")).unwrap();

        let last = ledger.fetch_last_draw().unwrap();
        assert_eq!(last.date, "2024-01-09");
        assert_eq!(last.draw_id, "003");
    }

    #[test]
    fn test_append_ticket() {
        let ledger = test_ledger();
        assert_eq!(ledger.count_tickets().unwrap(), 0);

        let ticket = Ticket::new([45, 7, 49, 23, 34], [9, 3]);
        ledger.append_ticket(&ticket).unwrap();
        assert_eq!(ledger.count_tickets().unwrap(), 1);
    }

    #[test]
    fn test_rebuild_and_fetch_rankings() {
        let ledger = test_ledger();
        let mut draw_a = test_draw("001", "2024-01-01");
        draw_a.balls = [1, 2, 3, 4, 5];
        draw_a.stars = [1, 2];
        let mut draw_b = test_draw("002", "2024-01-05");
        draw_b.balls = [1, 2, 3, 40, 50];
        draw_b.stars = [1, 12];
        ledger.insert_draws(&[draw_a, draw_b]).unwrap();
        ledger.rebuild_rankings().unwrap();

        let rows = ledger.fetch_ranking_rows(Pool::Balls).unwrap();
        assert_eq!(rows.len(), 50);
        assert_eq!(rows[0], RankingRow { number: 1, win_count: 2 });
        assert_eq!(rows[4], RankingRow { number: 5, win_count: 1 });
        assert_eq!(rows[5], RankingRow { number: 6, win_count: 0 });
        assert_eq!(rows[49], RankingRow { number: 50, win_count: 1 });

        let rows = ledger.fetch_ranking_rows(Pool::Stars).unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0], RankingRow { number: 1, win_count: 2 });
        assert_eq!(rows[11], RankingRow { number: 12, win_count: 1 });
    }

    #[test]
    fn test_rebuild_overwrites_previous_snapshot() {
        let ledger = test_ledger();
        ledger.insert_draw(&test_draw("001", "2024-01-01")).unwrap();
        ledger.rebuild_rankings().unwrap();
        ledger.rebuild_rankings().unwrap();

        let rows = ledger.fetch_ranking_rows(Pool::Balls).unwrap();
        assert_eq!(rows.len(), 50);
        assert_eq!(rows[0].win_count, 1);
    }

    #[test]
    fn test_malformed_ranking_row_rejected() {
        let ledger = test_ledger();
        ledger
            .conn
            .execute(
                "INSERT INTO rankings (kind, number, win_count) VALUES ('balls', '7', 'beaucoup')",
                [],
            )
            .unwrap();

        assert!(matches!(
            ledger.fetch_ranking_rows(Pool::Balls),
            Err(LedgerError::Malformed(_))
        ));
    }

    #[test]
    fn test_ranking_rows_ordered_by_number() {
        let ledger = test_ledger();
        ledger.insert_draw(&test_draw("001", "2024-01-01")).unwrap();
        ledger.rebuild_rankings().unwrap();

        let rows = ledger.fetch_ranking_rows(Pool::Stars).unwrap();
        let numbers: Vec<u8> = rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<u8>>());
    }
}

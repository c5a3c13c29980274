use lottorama_db::models::{Pool, RankingRow, Tier, TierPartition, TierThresholds};

pub fn classify(win_count: u32, thresholds: &TierThresholds) -> Tier {
    if win_count >= thresholds.popular_min {
        Tier::Popular
    } else if win_count >= thresholds.moderate_min {
        Tier::Moderate
    } else {
        Tier::Least
    }
}

/// Partition ordonnée d'un instantané de classement : chaque ligne tombe
/// dans exactement un palier, l'ordre d'entrée est préservé.
pub fn partition(rows: &[RankingRow], pool: Pool) -> TierPartition {
    let thresholds = pool.thresholds();
    let mut result = TierPartition::default();
    for row in rows {
        match classify(row.win_count, &thresholds) {
            Tier::Popular => result.popular.push(row.number),
            Tier::Moderate => result.moderate.push(row.number),
            Tier::Least => result.least.push(row.number),
        }
    }
    result
}

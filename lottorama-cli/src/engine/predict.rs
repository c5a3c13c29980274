use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use lottorama_db::models::{PredictedTicket, TierPartition};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("pas assez de numéros populaires disponibles ({available} restants, {needed} requis)")]
    InsufficientPool { available: usize, needed: usize },
}

/// Générateur de grille : combine les 2 numéros conservés avec des numéros
/// tirés dans les paliers populaire puis modéré. La source d'aléa
/// appartient à l'instance, jamais à l'état global, pour des tirages
/// reproductibles en test.
pub struct Predictor {
    rng: StdRng,
}

impl Predictor {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { rng }
    }

    /// Tire 2 numéros du palier populaire et, s'il en reste, 1 du palier
    /// modéré. Les filtres d'exclusion des étapes successives rendent les
    /// trois sources disjointes par construction : aucune déduplication
    /// n'est appliquée après coup.
    pub fn predict(
        &mut self,
        tiers: &TierPartition,
        held: [u8; 2],
    ) -> Result<PredictedTicket, PredictError> {
        let mut available_popular: Vec<u8> = tiers
            .popular
            .iter()
            .copied()
            .filter(|n| !held.contains(n))
            .collect();

        if available_popular.len() < 2 {
            return Err(PredictError::InsufficientPool {
                available: available_popular.len(),
                needed: 2,
            });
        }

        let mut picked = Vec::with_capacity(3);
        for _ in 0..2 {
            let idx = self.rng.random_range(0..available_popular.len());
            picked.push(available_popular.remove(idx));
        }

        let available_moderate: Vec<u8> = tiers
            .moderate
            .iter()
            .copied()
            .filter(|n| !held.contains(n) && !picked.contains(n))
            .collect();

        // Palier modéré épuisé : la grille retombe à 4 numéros
        if !available_moderate.is_empty() {
            let idx = self.rng.random_range(0..available_moderate.len());
            picked.push(available_moderate[idx]);
        }

        let mut numbers: Vec<u8> = held.iter().copied().chain(picked).collect();
        numbers.sort();

        Ok(PredictedTicket { numbers, held })
    }
}

//! Random track selection for the Turing test
//!
//! Samples a genre label first and a track within it second, so
//! perceived class balance stays independent of how many tracks each
//! genre contributes to the store.

use mtt_common::db::music;
use mtt_common::db::Track;
use mtt_common::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::SqlitePool;
use std::sync::{Mutex, PoisonError};

/// An explicit pseudo-random source. Seedable for deterministic tests
/// instead of reaching into global RNG state.
#[derive(Debug)]
pub struct Sampler {
    rng: Mutex<StdRng>,
}

impl Sampler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Choose one element uniformly, or None from an empty slice
    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let index = rng.gen_range(0..items.len());
        items.get(index)
    }
}

/// Pick a uniformly random genre, then a uniformly random track within
/// it. `analyzed_only` restricts stage two to tracks whose
/// complexity/originality/gradus features have been computed.
///
/// Returns None when the store has no genres or no qualifying tracks.
pub async fn pick_random_track(
    pool: &SqlitePool,
    sampler: &Sampler,
    analyzed_only: bool,
) -> Result<Option<Track>> {
    let labels = music::distinct_labels(pool).await?;
    let Some(label) = sampler.choose(&labels) else {
        return Ok(None);
    };

    let ids = music::track_ids_with_label(pool, label, analyzed_only).await?;
    let Some(id) = sampler.choose(&ids) else {
        return Ok(None);
    };

    music::get_track(pool, *id).await
}

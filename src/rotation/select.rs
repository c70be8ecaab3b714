//! Scoring, ranking and truncation.

use super::eligibility::is_eligible;
use crate::config::RotationConfig;
use crate::pool::{FeedRecord, MAX_QUALITY, Pool};
use chrono::{DateTime, Utc};
use rand::Rng;

/// A selected record, identified by its position in the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub index: usize,
    pub score: f64,
}

/// Outcome of one selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Highest score first; never longer than the quota.
    pub picks: Vec<Pick>,
    /// Records that passed the recency gate.
    pub eligible: usize,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Pool indices of the picks, in rank order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.picks.iter().map(|pick| pick.index)
    }

    /// Resolve the picks against the pool they were drawn from.
    pub fn records<'a>(&'a self, pool: &'a Pool) -> impl Iterator<Item = (&'a FeedRecord, Pick)> {
        self.picks
            .iter()
            .filter_map(|pick| pool.feeds().get(pick.index).map(|record| (record, *pick)))
    }
}

/// Pick up to `num_discovery_feeds` eligible records from `pool`.
///
/// Draws one uniform number per eligible record, in pool order, so a fixed
/// `rng` sequence yields a fixed selection.
pub fn select<R: Rng + ?Sized>(
    pool: &Pool,
    config: &RotationConfig,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Selection {
    let min_days = config.min_days_between_includes;

    let mut scored: Vec<Pick> = pool
        .feeds()
        .iter()
        .enumerate()
        .filter(|(_, record)| is_eligible(record, min_days, now))
        .map(|(index, record)| {
            let quality = record.quality_score() / MAX_QUALITY;
            let chance: f64 = rng.random();
            Pick {
                index,
                score: config.quality_weight * quality + config.randomness_weight * chance,
            }
        })
        .collect();

    let eligible = scored.len();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
    scored.truncate(config.num_discovery_feeds as usize);

    crate::debug!("select"; "{} eligible, {} picked", eligible, scored.len());

    Selection {
        picks: scored,
        eligible,
    }
}

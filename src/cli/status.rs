//! Read-only pool report.

use crate::{
    config::ProjectConfig,
    log,
    pool::{FeedRecord, Pool},
    rotation::{days_until_eligible, is_eligible},
    utils::plural_count,
};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Print every pool feed and when it is next eligible.
pub fn show_status(config: &ProjectConfig) -> Result<()> {
    let pool = Pool::load(&config.paths.pool)?;
    let min_days = config.rotation.min_days_between_includes;

    log!(
        "status";
        "{} in {}, {} between inclusions",
        plural_count(pool.len(), "feed"),
        config.root_relative(&config.paths.pool).display(),
        plural_count(min_days as usize, "day")
    );

    let now = Utc::now();
    for line in status_lines(&pool, min_days, now) {
        log!("status"; "{}", line);
    }

    let eligible = pool
        .feeds()
        .iter()
        .filter(|record| is_eligible(record, min_days, now))
        .count();
    log!("status"; "eligible feeds: {} of {}", eligible, pool.len());

    Ok(())
}

fn status_lines(pool: &Pool, min_days: u32, now: DateTime<Utc>) -> Vec<String> {
    pool.feeds()
        .iter()
        .map(|record| status_line(record, min_days, now))
        .collect()
}

fn status_line(record: &FeedRecord, min_days: u32, now: DateTime<Utc>) -> String {
    let last = record
        .last_included()
        .map_or_else(|| "never".to_owned(), ToString::to_string);

    let state = if is_eligible(record, min_days, now) {
        "eligible".to_owned()
    } else {
        let days = days_until_eligible(record, min_days, now);
        format!("eligible in {}", plural_count(days as usize, "day"))
    };

    format!(
        "{} (quality {}, category {}, last included {}): {}",
        record.title(),
        record.quality_score(),
        record.category().unwrap_or("N/A"),
        last,
        state
    )
}

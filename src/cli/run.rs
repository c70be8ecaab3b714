//! Rotation run orchestration.
//!
//! Pipeline phases:
//! - **Load** - Discovery pool and core feed tree (nothing written on failure)
//! - **Select** - Recency gate, scoring, quota
//! - **Compose** - Output document serialized in memory
//! - **Persist** - Pool saved, then output written (skipped on `--dry-run`)

use crate::{
    cli::RunArgs,
    config::ProjectConfig,
    debug,
    generator::compose,
    log,
    outline::Opml,
    pool::{FeedRecord, Pool},
    rotation::{Selection, select},
    utils::{plural_count, write_atomic},
};
use anyhow::{Context, Result};
use chrono::{DateTime, SubsecRound, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub core_feeds: usize,
    pub pool_size: usize,
    pub eligible: usize,
    pub selected: usize,
}

impl RunSummary {
    pub fn total_feeds(&self) -> usize {
        self.core_feeds + self.selected
    }
}

/// Run one rotation with the system clock and an OS- or `--seed`-seeded RNG.
pub fn run_rotation(config: &ProjectConfig, args: &RunArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => {
            debug!("run"; "seeding random source with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    run_with(config, args.dry_run, Utc::now(), &mut rng).map(|_| ())
}

/// Run one rotation at `now`, drawing scores from `rng`.
///
/// `now` is truncated to whole seconds first, the precision stamps are
/// saved with, so selection and the saved pool agree on one instant.
pub fn run_with<R: Rng + ?Sized>(
    config: &ProjectConfig,
    dry_run: bool,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<RunSummary> {
    let now = now.trunc_subsecs(0);
    let paths = &config.paths;

    // Load
    let mut pool = Pool::load(&paths.pool)?;
    let core = Opml::load(&paths.core)?;
    let core_feeds = core.count_feeds(&config.output.entry_type);

    log!("run"; "core feeds: {}", core_feeds);
    log!(
        "run";
        "discovery pool: {}, quota {}",
        plural_count(pool.len(), "feed"),
        config.rotation.num_discovery_feeds
    );
    warn_future_stamps(&pool, now);

    // Select
    let selection = select(&pool, &config.rotation, now, rng);
    log_selection(&selection, &pool);

    // Compose
    let xml = {
        let selected: Vec<&FeedRecord> = selection.records(&pool).map(|(record, _)| record).collect();
        compose(&core, &selected, now, &config.output)
            .to_xml()
            .context("Failed to serialize output document")?
    };
    pool.stamp(selection.indices(), now);

    let summary = RunSummary {
        core_feeds,
        pool_size: pool.len(),
        eligible: selection.eligible,
        selected: selection.len(),
    };

    if dry_run {
        log!("run"; "dry run, nothing written");
        return Ok(summary);
    }

    // Persist
    pool.save(&paths.pool)?;
    log!("run"; "updated {}", config.root_relative(&paths.pool).display());

    write_atomic(&paths.output, xml.as_bytes())?;
    log!(
        "done";
        "wrote {} ({}: {} core + {} discovery)",
        config.root_relative(&paths.output).display(),
        plural_count(summary.total_feeds(), "feed"),
        summary.core_feeds,
        summary.selected
    );

    Ok(summary)
}

fn warn_future_stamps(pool: &Pool, now: DateTime<Utc>) {
    for record in pool.stamped_after(now) {
        if let Some(stamp) = record.last_included() {
            log!(
                "warning";
                "`{}` has `last_included` {} in the future, not eligible",
                record.title(),
                stamp
            );
        }
    }
}

fn log_selection(selection: &Selection, pool: &Pool) {
    log!("select"; "eligible feeds: {} of {}", selection.eligible, pool.len());

    if selection.is_empty() {
        log!("select"; "no discovery feeds selected");
        return;
    }

    log!("select"; "selected {}:", plural_count(selection.len(), "discovery feed"));
    for (rank, (record, pick)) in selection.records(pool).enumerate() {
        log!(
            "select";
            "{}. {} (quality {}, category {})",
            rank + 1,
            record.title(),
            record.quality_score(),
            record.category().unwrap_or("N/A")
        );
        debug!("select"; "   score {:.4}", pick.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PathsConfig, RotationConfig};
    use chrono::{Duration, TimeZone};
    use std::{fs, path::Path};
    use tempfile::TempDir;

    const POOL: &str = r#"{
  "feeds": [
    {
      "title": "A",
      "xmlUrl": "https://a.example/feed",
      "htmlUrl": "https://a.example",
      "quality_score": 9,
      "category": "Science",
      "last_included": null
    },
    {
      "title": "B",
      "xmlUrl": "https://b.example/feed",
      "quality_score": 2,
      "last_included": "2025-05-19T12:00:00Z"
    }
  ]
}
"#;

    const CORE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<opml version="2.0">
  <head><title>Core</title></head>
  <body>
    <outline text="News" title="News">
      <outline type="rss" text="LWN" title="LWN" xmlUrl="https://lwn.net/headlines/rss" htmlUrl="https://lwn.net"/>
    </outline>
  </body>
</opml>
"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap()
    }

    /// Project in a temp dir with the sample pool and core tree.
    fn project(pool: &str, core: &str) -> (TempDir, ProjectConfig) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("discovery_pool.json"), pool).unwrap();
        fs::write(dir.path().join("core_feeds.opml"), core).unwrap();

        let mut config = ProjectConfig {
            rotation: RotationConfig {
                min_days_between_includes: 7,
                quality_weight: 1.0,
                randomness_weight: 0.0,
                num_discovery_feeds: 1,
            },
            paths: PathsConfig::default(),
            ..Default::default()
        };
        config.set_root(dir.path());
        config.paths.normalize(dir.path());
        (dir, config)
    }

    fn run(config: &ProjectConfig, dry_run: bool) -> Result<RunSummary> {
        run_with(config, dry_run, now(), &mut StdRng::seed_from_u64(42))
    }

    fn discovery_titles(output: &Path) -> Vec<String> {
        let opml = Opml::load(output).unwrap();
        opml.body
            .elements()
            .filter(|e| e.attr("text") == Some("Discovery Rotation"))
            .flat_map(|category| category.elements())
            .filter_map(|e| e.attr("title").map(str::to_owned))
            .collect()
    }

    #[test]
    fn test_run_selects_stamps_and_writes() {
        let (_dir, config) = project(POOL, CORE);

        let summary = run(&config, false).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                core_feeds: 1,
                pool_size: 2,
                eligible: 1,
                selected: 1
            }
        );
        assert_eq!(discovery_titles(&config.paths.output), ["A"]);

        let pool = Pool::load(&config.paths.pool).unwrap();
        assert_eq!(pool.feeds()[0].last_included().unwrap().at(), now());
        assert_eq!(
            pool.feeds()[1].last_included().unwrap().as_str(),
            "2025-05-19T12:00:00Z"
        );
    }

    #[test]
    fn test_subsecond_now_is_stamped_as_whole_second() {
        let (_dir, config) = project(POOL, CORE);
        let at = now() + Duration::milliseconds(750);

        run_with(&config, false, at, &mut StdRng::seed_from_u64(42)).unwrap();

        let pool = Pool::load(&config.paths.pool).unwrap();
        assert_eq!(pool.feeds()[0].last_included().unwrap().at(), now());

        let output = Opml::load(&config.paths.output).unwrap();
        let created = output.head.child("dateCreated").unwrap();
        assert_eq!(created.text(), "2025-05-20T12:00:00Z");

        // The stamp gates the next run from the same instant
        let summary = run_with(&config, true, at, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(summary.eligible, 0);
    }

    #[test]
    fn test_output_keeps_core_and_creates_parent_dirs() {
        let (dir, mut config) = project(POOL, CORE);
        config.paths.output = dir.path().join("site/nested/feeds.opml");

        run(&config, false).unwrap();

        let output = Opml::load(&config.paths.output).unwrap();
        let core = Opml::load(&config.paths.core).unwrap();
        assert_eq!(output.body.children[0], core.body.children[0]);
        assert_eq!(output.count_feeds("rss"), 2);
        assert!(output.head.child("dateCreated").is_some());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (_dir, config) = project(POOL, CORE);

        let summary = run(&config, true).unwrap();

        assert_eq!(summary.selected, 1);
        assert!(!config.paths.output.exists());
        assert_eq!(fs::read_to_string(&config.paths.pool).unwrap(), POOL);
    }

    #[test]
    fn test_second_run_respects_recency_gate() {
        let (_dir, config) = project(POOL, CORE);

        run(&config, false).unwrap();
        let summary = run(&config, false).unwrap();

        // A was stamped by the first run, B is still gated
        assert_eq!(summary.eligible, 0);
        assert_eq!(summary.selected, 0);
        assert!(discovery_titles(&config.paths.output).is_empty());
    }

    #[test]
    fn test_malformed_pool_aborts_without_writes() {
        let pool = r#"{"feeds": [{"title": "A", "xmlUrl": "https://a.example/feed", "last_included": null}]}"#;
        let (_dir, config) = project(pool, CORE);

        let err = run(&config, false).unwrap_err();

        assert!(err.to_string().contains("discovery_pool.json"));
        assert!(!config.paths.output.exists());
        assert_eq!(fs::read_to_string(&config.paths.pool).unwrap(), pool);
    }

    #[test]
    fn test_malformed_core_aborts_without_writes() {
        let (_dir, config) = project(POOL, "<opml><head/></opml>");

        let err = run(&config, false).unwrap_err();

        assert!(err.to_string().contains("core_feeds.opml"));
        assert!(!config.paths.output.exists());
        assert_eq!(fs::read_to_string(&config.paths.pool).unwrap(), POOL);
    }

    #[test]
    fn test_missing_core_aborts() {
        let (dir, config) = project(POOL, CORE);
        fs::remove_file(dir.path().join("core_feeds.opml")).unwrap();

        assert!(run(&config, false).is_err());
        assert_eq!(fs::read_to_string(&config.paths.pool).unwrap(), POOL);
    }

    #[test]
    fn test_zero_quota_writes_core_only() {
        let (_dir, mut config) = project(POOL, CORE);
        config.rotation.num_discovery_feeds = 0;

        let summary = run(&config, false).unwrap();

        assert_eq!(summary.selected, 0);
        assert!(discovery_titles(&config.paths.output).is_empty());
        assert_eq!(fs::read_to_string(&config.paths.pool).unwrap(), POOL);
    }
}

// HistoryRepo: bounded series, period queries, JSON persistence

mod common;

use common::{HOUR_MS, open_history, sample, up_verdict};
use homedash::history_repo::{HistoryError, HistoryRepo, Series};
use homedash::models::{HistoryPeriod, SiteBucket, SiteStatus, SystemBucket};
use tempfile::TempDir;

fn system_bucket(timestamp: u64) -> SystemBucket {
    SystemBucket::from_sample(&sample(timestamp))
}

fn site_bucket(timestamp: u64) -> SiteBucket {
    SiteBucket::from_verdict(timestamp, &up_verdict())
}

#[test]
fn test_series_never_exceeds_max_entries() {
    let mut series = Series::new(1000);
    for ts in 0..2500u64 {
        series.push(system_bucket(ts)).unwrap();
        assert!(series.len() <= 1000);
    }
    assert_eq!(series.len(), 1000);
    let entries = series.to_vec();
    assert_eq!(entries.first().map(|b| b.timestamp), Some(1500));
    assert_eq!(entries.last().map(|b| b.timestamp), Some(2499));
}

#[test]
fn test_series_push_reports_evictions() {
    let mut series = Series::new(2);
    assert_eq!(series.push(site_bucket(1)).unwrap(), 0);
    assert_eq!(series.push(site_bucket(2)).unwrap(), 0);
    assert_eq!(series.push(site_bucket(3)).unwrap(), 1);
    assert_eq!(series.last_timestamp(), Some(3));
}

#[test]
fn test_series_rejects_out_of_order() {
    let mut series = Series::new(10);
    series.push(system_bucket(100)).unwrap();
    series.push(system_bucket(100)).unwrap();
    let err = series.push(system_bucket(99)).unwrap_err();
    assert!(matches!(
        err,
        HistoryError::OutOfOrder {
            timestamp: 99,
            last: 100
        }
    ));
    assert_eq!(series.len(), 2);
}

#[test]
fn test_series_from_entries_sorts_and_trims() {
    let series = Series::from_entries(vec![site_bucket(5), site_bucket(1), site_bucket(3)], 2);
    let timestamps: Vec<u64> = series.to_vec().iter().map(|b| b.timestamp).collect();
    assert_eq!(timestamps, vec![3, 5]);
}

#[test]
fn test_query_24h_over_40h_of_hourly_entries() {
    let now = 100 * HOUR_MS;
    let mut series = Series::new(1000);
    for hours_ago in (0..40u64).rev() {
        series.push(system_bucket(now - hours_ago * HOUR_MS)).unwrap();
    }
    let day = series.since(HistoryPeriod::Day, now);
    assert_eq!(day.len(), 24);
    assert!(day.iter().all(|b| now - b.timestamp < 24 * HOUR_MS));
    assert!(day.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(series.since(HistoryPeriod::Week, now).len(), 40);
}

#[test]
fn test_query_keeps_entries_newer_than_now() {
    let mut series = Series::new(10);
    series.push(site_bucket(5 * HOUR_MS)).unwrap();
    // Clock went backwards: entry is newer than "now", still inside the window.
    assert_eq!(series.since(HistoryPeriod::Day, HOUR_MS).len(), 1);
}

#[tokio::test]
async fn test_open_missing_files_starts_empty() {
    let dir = TempDir::new().unwrap();
    let repo = open_history(&dir).await;
    let snapshot = repo.snapshot().await;
    assert!(snapshot.system.is_empty());
    assert!(snapshot.site.is_empty());
}

#[tokio::test]
async fn test_open_corrupt_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("system.json"), b"{not json").unwrap();
    std::fs::write(
        dir.path().join("site.json"),
        serde_json::to_vec(&vec![site_bucket(1)]).unwrap(),
    )
    .unwrap();
    let repo = open_history(&dir).await;
    let snapshot = repo.snapshot().await;
    assert!(snapshot.system.is_empty());
    assert_eq!(snapshot.site.len(), 1);
}

#[tokio::test]
async fn test_append_persists_and_reloads() {
    let dir = TempDir::new().unwrap();
    {
        let repo = open_history(&dir).await;
        repo.append_system(system_bucket(10)).await.unwrap();
        repo.append_system(system_bucket(20)).await.unwrap();
        repo.append_site(site_bucket(10)).await.unwrap();
    }
    assert!(!dir.path().join("system.json.tmp").exists());

    let repo = open_history(&dir).await;
    let snapshot = repo.snapshot().await;
    assert_eq!(snapshot.system, vec![system_bucket(10), system_bucket(20)]);
    assert_eq!(snapshot.site.len(), 1);
    assert_eq!(snapshot.site[0].status, SiteStatus::Up);
}

#[tokio::test]
async fn test_empty_series_is_not_written() {
    let dir = TempDir::new().unwrap();
    let repo = open_history(&dir).await;
    repo.append_system(system_bucket(10)).await.unwrap();
    assert!(dir.path().join("system.json").exists());
    assert!(!dir.path().join("site.json").exists());
}

#[tokio::test]
async fn test_reload_trims_to_max_entries() {
    let dir = TempDir::new().unwrap();
    let entries: Vec<SystemBucket> = (0..1200).map(system_bucket).collect();
    std::fs::write(
        dir.path().join("system.json"),
        serde_json::to_vec(&entries).unwrap(),
    )
    .unwrap();
    let repo = open_history(&dir).await;
    let snapshot = repo.snapshot().await;
    assert_eq!(snapshot.system.len(), 1000);
    assert_eq!(snapshot.system[0].timestamp, 200);
}

#[tokio::test]
async fn test_append_out_of_order_is_rejected() {
    let dir = TempDir::new().unwrap();
    let repo = open_history(&dir).await;
    repo.append_site(site_bucket(50)).await.unwrap();
    assert!(repo.append_site(site_bucket(40)).await.is_err());
    assert_eq!(repo.query_site(HistoryPeriod::Day, 60).await.len(), 1);
}

#[tokio::test]
async fn test_persist_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("data/history");
    let repo = HistoryRepo::open(nested.join("system.json"), nested.join("site.json"), 10).await;
    repo.append_site(site_bucket(1)).await.unwrap();
    assert!(nested.join("site.json").exists());
}

#[tokio::test]
async fn test_write_failure_keeps_memory_and_recovers() {
    let dir = TempDir::new().unwrap();
    // A regular file where the history directory should be: every write fails.
    let blocker = dir.path().join("history");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let repo = HistoryRepo::open(blocker.join("system.json"), blocker.join("site.json"), 10).await;

    repo.append_system(system_bucket(10)).await.unwrap();
    assert_eq!(repo.snapshot().await.system, vec![system_bucket(10)]);
    assert!(!blocker.join("system.json").exists());

    std::fs::remove_file(&blocker).unwrap();
    repo.append_system(system_bucket(20)).await.unwrap();

    let reloaded = HistoryRepo::open(blocker.join("system.json"), blocker.join("site.json"), 10).await;
    assert_eq!(
        reloaded.snapshot().await.system,
        vec![system_bucket(10), system_bucket(20)]
    );
}

use indicatif::ProgressBar;
use munche::discovery::{self, DiscoveryConfig};
use munche::reader::{AsyncFileReader, ReaderConfig};
use munche::{BatchConfig, ProseAnalyzer};
use std::sync::Arc;

#[path = "integration/fixtures/mod.rs"]
mod fixtures;
use fixtures::*;

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::TestFixture;

fn analyzer() -> Arc<ProseAnalyzer> {
    Arc::new(ProseAnalyzer::with_default_config().expect("Analyzer should build"))
}

/// Invalid UTF-8 is discovered, then recorded as a per-file failure
#[tokio::test]
async fn test_pipeline_invalid_utf8() {
    let fixture = TestFixture::new();
    fixture.create_raw("broken.txt", &[0xFF, 0xFE, 0xFD]);
    fixture.create_manuscript("good.txt", GOLDEN_TEXT);

    let files = discovery::find_manuscripts(&fixture.root_path, DiscoveryConfig::default(), false)
        .await
        .expect("Discovery should succeed");
    assert_eq!(files.len(), 2);

    let reports = munche::analyze_files_parallel(
        files,
        analyzer(),
        ReaderConfig::default(),
        BatchConfig::default(),
        &ProgressBar::hidden(),
    )
    .await
    .expect("Batch should continue past bad files");

    let broken = &reports[0];
    assert!(broken.stats.path.ends_with("broken.txt"));
    assert_eq!(broken.stats.status, "failed");
    assert!(broken.stats.error.as_deref().unwrap().contains("UTF-8"));
    assert!(broken.analysis.is_none());

    assert!(reports[1].is_success());
}

#[tokio::test]
async fn test_fail_fast_stops_batch() {
    let fixture = TestFixture::new();
    let broken = fixture.create_raw("broken.txt", &[0xC3, 0x28]);

    let result = munche::analyze_files_parallel(
        vec![broken],
        analyzer(),
        ReaderConfig::default(),
        BatchConfig {
            jobs: 1,
            fail_fast: true,
        },
        &ProgressBar::hidden(),
    )
    .await;

    let error = result.expect_err("fail_fast should abort the batch");
    assert!(format!("{error:#}").contains("UTF-8"));
}

/// Unreadable files are recorded, not fatal (Unix permissions)
#[cfg(unix)]
#[tokio::test]
async fn test_permission_denied_recorded() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    let path = fixture.create_manuscript("잠김.txt", PLAIN_TEXT);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores file permissions; nothing to check there
    if std::fs::read(&path).is_ok() {
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let reader = AsyncFileReader::new(ReaderConfig::default());
    let (text, stats) = reader.read_manuscript(&path).await.unwrap();
    assert!(text.is_empty());
    assert!(stats.read_error.is_some());

    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
}

#[tokio::test]
async fn test_missing_root_yields_nothing() {
    let fixture = TestFixture::new();
    let missing = fixture.root_path.join("없는_폴더");

    let files = discovery::find_manuscripts(&missing, DiscoveryConfig::default(), false)
        .await
        .expect("Glob over a missing root finds nothing");
    assert!(files.is_empty());
}

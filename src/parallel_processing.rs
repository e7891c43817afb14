// WHY: Batch analysis of many manuscripts; reads overlap on the async runtime while the
// CPU-bound analysis runs on the blocking pool, bounded by the configured job count

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::analyzer::{AnalysisResult, ProseAnalyzer};
use crate::reader::{AsyncFileReader, ReaderConfig};

/// Concurrency settings for batch analysis
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum number of manuscripts in flight
    pub jobs: usize,
    /// Abort the batch on the first read failure
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: num_cpus::get(),
            fail_fast: false,
        }
    }
}

/// Per-file processing statistics
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FileStats {
    pub path: String,
    /// Visible characters analyzed
    pub chars_processed: u64,
    pub sentences_detected: u64,
    /// Read plus analysis time in milliseconds
    pub processing_time_ms: u64,
    /// Analysis time in milliseconds (subset of processing_time_ms)
    pub analysis_time_ms: u64,
    pub chars_per_sec: f64,
    /// Processing status (success, failed)
    pub status: String,
    pub error: Option<String>,
}

/// One manuscript's outcome; `analysis` is absent when reading failed
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FileReport {
    pub stats: FileStats,
    pub analysis: Option<AnalysisResult>,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.stats.error.is_none()
    }
}

/// Analyze every manuscript with at most `batch.jobs` in flight
/// Reports come back in input order regardless of completion order
pub async fn analyze_files_parallel(
    paths: Vec<PathBuf>,
    analyzer: Arc<ProseAnalyzer>,
    reader_config: ReaderConfig,
    batch: BatchConfig,
    progress: &ProgressBar,
) -> Result<Vec<FileReport>> {
    let total = paths.len();
    let jobs = batch.jobs.max(1);
    info!("Analyzing {} manuscripts with {} jobs", total, jobs);

    let reader = Arc::new(AsyncFileReader::new(ReaderConfig {
        fail_fast: batch.fail_fast,
        ..reader_config
    }));

    let mut indexed: Vec<(usize, FileReport)> = Vec::with_capacity(total);
    let mut pending = stream::iter(paths.into_iter().enumerate())
        .map(|(index, path)| {
            let reader = Arc::clone(&reader);
            let analyzer = Arc::clone(&analyzer);
            async move {
                analyze_file(&reader, analyzer, path)
                    .await
                    .map(|report| (index, report))
            }
        })
        .buffer_unordered(jobs);

    while let Some(result) = pending.next().await {
        let (index, report) = result?;
        if let Some(error) = &report.stats.error {
            warn!("Skipping {}: {}", report.stats.path, error);
        }
        progress.set_message(report.stats.path.clone());
        progress.inc(1);
        indexed.push((index, report));
    }

    indexed.sort_by_key(|(index, _)| *index);
    let reports: Vec<FileReport> = indexed.into_iter().map(|(_, report)| report).collect();

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    info!(
        "Batch analysis completed: {} succeeded, {} failed",
        total - failed,
        failed
    );
    Ok(reports)
}

async fn analyze_file(
    reader: &AsyncFileReader,
    analyzer: Arc<ProseAnalyzer>,
    path: PathBuf,
) -> Result<FileReport> {
    let start = Instant::now();
    let (text, read_stats) = reader.read_manuscript(&path).await?;

    if let Some(error) = read_stats.read_error {
        return Ok(FileReport {
            stats: FileStats {
                path: read_stats.file_path,
                chars_processed: 0,
                sentences_detected: 0,
                processing_time_ms: start.elapsed().as_millis() as u64,
                analysis_time_ms: 0,
                chars_per_sec: 0.0,
                status: "failed".to_string(),
                error: Some(error),
            },
            analysis: None,
        });
    }

    let analysis_start = Instant::now();
    let analysis = tokio::task::spawn_blocking(move || analyzer.analyze(&text))
        .await
        .with_context(|| format!("Analysis task for {} panicked", path.display()))?;
    let analysis_time = analysis_start.elapsed();

    let chars = analysis.statistics.char_count as u64;
    let stats = FileStats {
        path: read_stats.file_path,
        chars_processed: chars,
        sentences_detected: analysis.statistics.sentence_count as u64,
        processing_time_ms: start.elapsed().as_millis() as u64,
        analysis_time_ms: analysis_time.as_millis() as u64,
        chars_per_sec: if analysis_time.as_secs_f64() > 0.0 {
            chars as f64 / analysis_time.as_secs_f64()
        } else {
            0.0
        },
        status: "success".to_string(),
        error: None,
    };

    Ok(FileReport {
        stats,
        analysis: Some(analysis),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn analyzer() -> Arc<ProseAnalyzer> {
        Arc::new(ProseAnalyzer::with_default_config().unwrap())
    }

    #[tokio::test]
    async fn test_reports_in_input_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..6 {
            let path = temp_dir.path().join(format!("{i}.txt"));
            let text = "그는 걸었다. ".repeat(i + 1);
            tokio::fs::write(&path, text).await.unwrap();
            paths.push(path);
        }

        let batch = BatchConfig { jobs: 3, fail_fast: false };
        let reports = analyze_files_parallel(
            paths.clone(),
            analyzer(),
            ReaderConfig::default(),
            batch,
            &ProgressBar::hidden(),
        )
        .await
        .unwrap();

        assert_eq!(reports.len(), 6);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.stats.path, paths[i].display().to_string());
            assert_eq!(report.stats.sentences_detected, (i + 1) as u64);
            assert_eq!(report.stats.status, "success");
        }
    }

    #[tokio::test]
    async fn test_missing_file_recorded_and_batch_continues() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.txt");
        tokio::fs::write(&good, "\"가자.\" 그가 말했다.").await.unwrap();
        let missing = temp_dir.path().join("missing.txt");

        let progress = ProgressBar::hidden();
        let reports = analyze_files_parallel(
            vec![missing, good],
            analyzer(),
            ReaderConfig::default(),
            BatchConfig::default(),
            &progress,
        )
        .await
        .unwrap();

        assert!(!reports[0].is_success());
        assert_eq!(reports[0].stats.status, "failed");
        assert!(reports[0].analysis.is_none());
        assert!(reports[1].is_success());
        assert_eq!(reports[1].analysis.as_ref().unwrap().statistics.dialogue_count, 1);
        assert_eq!(progress.position(), 2);
    }

    #[tokio::test]
    async fn test_fail_fast_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let batch = BatchConfig { jobs: 1, fail_fast: true };

        let result = analyze_files_parallel(
            vec![temp_dir.path().join("missing.txt")],
            analyzer(),
            ReaderConfig::default(),
            batch,
            &ProgressBar::hidden(),
        )
        .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_file_stats_serialize() {
        let stats = FileStats {
            path: "a.txt".to_string(),
            chars_processed: 10,
            sentences_detected: 2,
            processing_time_ms: 1,
            analysis_time_ms: 0,
            chars_per_sec: 0.0,
            status: "success".to_string(),
            error: None,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["sentences_detected"], 2);
        assert!(json["error"].is_null());
    }
}

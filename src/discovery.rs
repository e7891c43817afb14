use anyhow::{Context, Result};
use futures::stream::{self, Stream, StreamExt};
use glob::{glob, Pattern};
use ignore::{WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// File name pattern used when none is configured
pub const DEFAULT_PATTERN: &str = "*.txt";

/// Configuration for manuscript discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Glob matched against file names, e.g. `*.txt` or `chapter-*.md`
    pub pattern: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

/// Result of manuscript discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Discovers every file under `root_dir` whose name matches the configured pattern.
/// Returns an async stream of validated file paths in glob order.
pub fn discover_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();

    stream::unfold(DiscoveryState::new(root_path, config), |mut state| async move {
        state.next_file().await.map(|result| (result, state))
    })
}

/// Parallel directory traversal streaming matches as they are found
/// WHY: glob walks sequentially; ignore's parallel walker overlaps traversal with analysis
pub fn discover_files_parallel(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();
    let config = Arc::new(config);
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let matcher = match Pattern::new(&config.pattern) {
            Ok(matcher) => matcher,
            Err(e) => {
                let _ = tx.send(Err(anyhow::anyhow!(
                    "Invalid file pattern {:?}: {}",
                    config.pattern,
                    e
                )));
                return;
            }
        };

        info!("Starting directory traversal in: {}", root_path.display());
        let traversal_start = std::time::Instant::now();

        let walker = WalkBuilder::new(&root_path)
            .threads((num_cpus::get() / 2).max(1))
            .follow_links(false)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .build_parallel();

        let (result_tx, result_rx) = std::sync::mpsc::channel();

        // Walker blocks, so it gets its own thread
        std::thread::spawn(move || {
            walker.run(|| {
                let result_tx = result_tx.clone();
                let matcher = matcher.clone();
                Box::new(move |result| {
                    if let Ok(entry) = result {
                        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                        let matches = entry
                            .file_name()
                            .to_str()
                            .is_some_and(|name| matcher.matches(name));
                        if is_file && matches {
                            debug!("Found matching file: {}", entry.path().display());
                            let _ = result_tx.send(entry.path().to_path_buf());
                        }
                    }
                    WalkState::Continue
                })
            });
        });

        let mut file_count = 0;
        while let Ok(path) = result_rx.recv() {
            file_count += 1;
            match validate_file(path, &config).await {
                Ok(validation) => {
                    if tx.send(Ok(validation)).is_err() {
                        debug!("Receiver dropped, stopping discovery");
                        break;
                    }
                }
                Err(e) => {
                    if config.fail_fast {
                        let _ = tx.send(Err(e));
                        break;
                    }
                    warn!("File validation error (continuing): {}", e);
                }
            }
        }

        info!(
            "Discovery completed in {}ms, streamed {} files",
            traversal_start.elapsed().as_millis(),
            file_count
        );
    });

    stream::unfold(rx, |mut receiver| async move {
        receiver.recv().await.map(|result| (result, receiver))
    })
}

/// Check that a discovered path is an accessible regular file
async fn validate_file(path: PathBuf, config: &DiscoveryConfig) -> Result<FileValidation> {
    debug!("Validating file: {}", path.display());

    match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => Ok(FileValidation { path, error: None }),
        Ok(_) => {
            let error = format!("Path is not a file: {}", path.display());
            warn!("{}", error);
            Ok(FileValidation {
                path,
                error: Some(error),
            })
        }
        Err(e) => {
            let error = format!("Cannot access file {}: {}", path.display(), e);
            warn!("{}", error);
            if config.fail_fast {
                return Err(anyhow::anyhow!(error));
            }
            Ok(FileValidation {
                path,
                error: Some(error),
            })
        }
    }
}

/// Internal state for glob-based discovery iteration
struct DiscoveryState {
    root_dir: PathBuf,
    config: DiscoveryConfig,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(root_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            root_dir,
            config,
            glob_iter: None,
        }
    }

    async fn next_file(&mut self) -> Option<Result<FileValidation>> {
        if self.glob_iter.is_none() {
            let root = Pattern::escape(&self.root_dir.display().to_string());
            let pattern = format!("{}/**/{}", root, self.config.pattern);
            debug!("Starting file discovery with pattern: {}", pattern);

            match glob(&pattern).with_context(|| format!("Invalid file pattern {pattern:?}")) {
                Ok(paths) => {
                    self.glob_iter = Some(paths);
                    info!("File discovery initialized for root: {}", self.root_dir.display());
                }
                Err(e) => return Some(Err(e)),
            }
        }

        let glob_iter = self.glob_iter.as_mut()?;
        loop {
            match glob_iter.next() {
                Some(Ok(path)) => {
                    debug!("Found file: {}", path.display());
                    return Some(validate_file(path, &self.config).await);
                }
                Some(Err(e)) => {
                    let error_msg = format!("Glob iteration error: {e}");
                    warn!("{}", error_msg);
                    if self.config.fail_fast {
                        return Some(Err(anyhow::anyhow!(error_msg)));
                    }
                }
                None => {
                    info!("File discovery completed");
                    return None;
                }
            }
        }
    }
}

async fn collect_stream(
    stream: impl Stream<Item = Result<FileValidation>>,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(stream);

    while let Some(result) = stream.next().await {
        files.push(result?);
    }

    let valid_count = files.iter().filter(|f| f.error.is_none()).count();
    let invalid_count = files.len() - valid_count;
    if invalid_count > 0 {
        warn!("Found {} files with validation issues", invalid_count);
    }
    info!(
        "File discovery summary: {} valid, {} invalid",
        valid_count, invalid_count
    );

    Ok(files)
}

/// Collect all discovered files into a Vec for easier processing
pub async fn collect_discovered_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    collect_stream(discover_files(root_dir, config)).await
}

/// Collect all discovered files using parallel directory traversal
pub async fn collect_discovered_files_parallel(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    collect_stream(discover_files_parallel(root_dir, config)).await
}

/// Valid manuscript paths only, sorted for stable report order
pub async fn find_manuscripts<P: AsRef<Path>>(
    root_dir: P,
    config: DiscoveryConfig,
    parallel: bool,
) -> Result<Vec<PathBuf>> {
    let validations = if parallel {
        collect_discovered_files_parallel(root_dir, config).await?
    } else {
        collect_discovered_files(root_dir, config).await?
    };

    let mut paths: Vec<PathBuf> = validations
        .into_iter()
        .filter(|v| v.error.is_none())
        .map(|v| v.path)
        .collect();
    paths.sort();
    Ok(paths)
}

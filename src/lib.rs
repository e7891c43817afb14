pub mod analyzer;
pub mod discovery;
pub mod parallel_processing;
pub mod reader;
pub mod report;

// Re-export main types for convenient access
pub use analyzer::{
    analyze, char_count, AnalysisResult, AnalyzerConfig, DialogueRemoval, EntityCategory,
    ProseAnalyzer,
};

// Re-export batch processing types for the CLI and benchmarks
pub use parallel_processing::{analyze_files_parallel, BatchConfig, FileReport, FileStats};

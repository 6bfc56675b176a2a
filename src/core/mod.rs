pub mod aggregator;
pub mod analyzer;
pub mod engine;
pub mod graph;
pub mod metrics;
pub mod result;
pub mod scanner;

pub use aggregator::{aggregate, merge_summaries};
pub use analyzer::{CodebaseAnalyzer, ScanOptions};
pub use engine::{ExecutionEngine, RunOutcome, ScanCancellation};
pub use graph::{module_name, DependencyGraph, GraphBuilder, GraphEdge, GraphNode};
pub use metrics::{
    coverage_percentage, ClassDetail, FileMetric, FunctionDetail, FunctionKind, LanguageSummary,
    UNKNOWN_LANGUAGE,
};
pub use result::ScanResult;
pub use scanner::FileScanner;

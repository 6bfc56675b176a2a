use appdoc::core::ScanOptions;
use appdoc::logging::{init_tracing, LOG_ENV};

#[test]
fn tracing_initialization_is_idempotent() {
    std::env::set_var(LOG_ENV, "appdoc=debug");
    init_tracing();
    init_tracing();

    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.py"), "def f(:\n").unwrap();
    let result = appdoc::scan(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(result.total_files(), 1);
}

use appdoc::core::{CodebaseAnalyzer, ScanCancellation, ScanOptions};
use appdoc::{scan, ScanConfig, ScanError};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

fn write<P: AsRef<Path>>(path: P, content: &str) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn documented_python_file_has_full_coverage() {
    let dir = tempfile::TempDir::new().unwrap();
    write(
        dir.path().join("test.py"),
        r#"def greet(name):
    """Say hello."""
    return f"hello {name}"


class Greeter:
    """Greets people."""
"#,
    );

    let result = scan(dir.path(), &ScanOptions::default()).unwrap();

    assert_eq!(result.total_files(), 1);
    assert_eq!(result.total_lines(), 7);
    let python = result.language_summary("python").unwrap();
    assert_eq!(python.functions, 1);
    assert_eq!(python.classes, 1);
    assert_eq!(python.documented_functions, 1);
    assert_eq!(python.documented_classes, 1);
    assert_eq!(python.coverage(), 100.0);
    assert_eq!(result.overall_coverage(), 100.0);
    assert_eq!(result.total_functions(), 1);
    assert_eq!(result.total_documented_classes(), 1);

    let metric = result
        .file_metric(&result.scan_path().join("test.py"))
        .unwrap();
    assert_eq!(metric.language, "python");
    assert_eq!(metric.lines, 7);
    assert!(result.file_metric(&dir.path().join("missing.py")).is_none());
}

#[test]
fn empty_directory_gives_empty_result() {
    let dir = tempfile::TempDir::new().unwrap();

    let result = scan(dir.path(), &ScanOptions::default()).unwrap();

    assert_eq!(result.total_files(), 0);
    assert_eq!(result.total_lines(), 0);
    assert!(result.language_summaries().is_empty());
    assert!(result.file_metrics().is_empty());
    assert!(result.dependency_graph().nodes.is_empty());
    assert!(result.dependency_graph().edges.is_empty());
    assert_eq!(result.overall_coverage(), 0.0);
}

#[test]
fn python_import_becomes_graph_edge() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path().join("a.py"), "import b\n\nb.run()\n");
    write(dir.path().join("b.py"), "def run():\n    pass\n");

    let result = scan(dir.path(), &ScanOptions::default()).unwrap();
    let graph = result.dependency_graph();

    let root = result.scan_path();
    let a = root.join("a.py").to_string_lossy().into_owned();
    let b = root.join("b.py").to_string_lossy().into_owned();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 1);
    assert!(graph.has_edge(&a, &b));
}

#[test]
fn ignored_directory_prefix_is_excluded() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path().join("build/gen.py"), "def generated():\n    pass\n");
    write(dir.path().join("src/app.py"), "def app():\n    pass\n");

    let options = ScanOptions {
        ignore_patterns: Some(vec!["build/".to_string()]),
        ..ScanOptions::default()
    };
    let result = scan(dir.path(), &options).unwrap();

    assert_eq!(result.total_files(), 1);
    assert!(result.file_metrics()[0].path.ends_with("src/app.py"));
    assert_eq!(result.ignored_patterns(), ["build/".to_string()]);
}

#[test]
fn corrupt_syntax_keeps_language_and_line_count() {
    let dir = tempfile::TempDir::new().unwrap();
    write(
        dir.path().join("broken.py"),
        "def broken(:\n    return\nclass\n\nx = (\n",
    );

    let result = scan(dir.path(), &ScanOptions::default()).unwrap();

    assert_eq!(result.total_files(), 1);
    let metric = &result.file_metrics()[0];
    assert_eq!(metric.language, "python");
    assert_eq!(metric.lines, 5);
    assert_eq!(metric.functions, 0);
    assert_eq!(metric.classes, 0);
}

#[cfg(unix)]
#[test]
fn unreadable_file_still_produces_one_metric() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::TempDir::new().unwrap();
    let locked = dir.path().join("locked.py");
    write(&locked, "def f():\n    pass\n");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let result = scan(dir.path(), &ScanOptions::default()).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(result.total_files(), 1);
    let metric = &result.file_metrics()[0];
    assert_eq!(metric.language, "python");
    // Running as root can still read the file; either way exactly one metric exists.
    assert!(metric.functions <= 1);
}

#[test]
fn missing_root_fails_before_any_work() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = scan(&dir.path().join("missing"), &ScanOptions::default()).unwrap_err();
    assert!(matches!(err, ScanError::RootNotFound { .. }));
}

#[test]
fn invalid_ignore_pattern_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let options = ScanOptions {
        ignore_patterns: Some(vec!["[bad".to_string()]),
        ..ScanOptions::default()
    };
    let err = scan(dir.path(), &options).unwrap_err();
    assert!(matches!(err, ScanError::InvalidPattern { .. }));
}

#[test]
fn mixed_languages_are_summarized_separately() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path().join("a.py"), "def f():\n    pass\n");
    write(dir.path().join("b.rs"), "/// Doc.\nfn g() {}\n");
    write(dir.path().join("c.js"), "function h() {}\n");
    write(dir.path().join("d.ts"), "export const x = 1;\n");
    write(dir.path().join("e.cs"), "class E {}\n");
    write(dir.path().join("README.md"), "# readme\n");

    let result = scan(dir.path(), &ScanOptions::default()).unwrap();

    let languages: Vec<_> = result
        .language_summaries()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        languages,
        vec!["csharp", "javascript", "python", "rust", "typescript"]
    );
    assert_eq!(result.total_files(), 5);
    assert_eq!(result.language_summary("rust").unwrap().documented_functions, 1);
    assert_eq!(result.total_functions(), 3);
}

#[test]
fn language_filter_limits_discovery() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path().join("a.py"), "def f():\n    pass\n");
    write(dir.path().join("b.js"), "function g() {}\n");

    let options = ScanOptions {
        languages: Some(vec!["javascript".to_string()]),
        ..ScanOptions::default()
    };
    let result = scan(dir.path(), &options).unwrap();

    assert_eq!(result.total_files(), 1);
    assert_eq!(result.file_metrics()[0].language, "javascript");
}

#[test]
fn max_files_truncates_discovered_list() {
    let dir = tempfile::TempDir::new().unwrap();
    for i in 0..5 {
        write(dir.path().join(format!("m{i}.py")), "x = 1\n");
    }

    let options = ScanOptions {
        max_files: Some(2),
        concurrency: Some(2),
        ..ScanOptions::default()
    };
    let result = scan(dir.path(), &options).unwrap();

    assert_eq!(result.total_files(), 2);
    let names: Vec<_> = result
        .file_metrics()
        .iter()
        .map(|m| m.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["m0.py", "m1.py"]);
}

#[test]
fn default_ignores_apply_when_none_given() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path().join("node_modules/lib/index.js"), "function x() {}\n");
    write(dir.path().join(".venv/site.py"), "x = 1\n");
    write(dir.path().join("app.py"), "x = 1\n");

    let result = scan(dir.path(), &ScanOptions::default()).unwrap();

    assert_eq!(result.total_files(), 1);
    assert_eq!(
        result.ignored_patterns(),
        ScanConfig::default().ignore.as_slice()
    );
}

#[test]
fn ignored_files_never_reach_metrics() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path().join("keep/a.py"), "x = 1\n");
    write(dir.path().join("keep/test_a.py"), "x = 1\n");
    write(dir.path().join("skip/b.py"), "x = 1\n");
    write(dir.path().join("gen/c.py"), "x = 1\n");

    let patterns = vec!["*test_*".to_string(), "skip".to_string(), "gen/".to_string()];
    let options = ScanOptions {
        ignore_patterns: Some(patterns),
        ..ScanOptions::default()
    };
    let result = scan(dir.path(), &options).unwrap();

    let names: BTreeSet<_> = result
        .file_metrics()
        .iter()
        .map(|m| m.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, BTreeSet::from(["a.py".to_string()]));
}

#[test]
fn configured_output_dir_is_not_scanned() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path().join("reports/old.py"), "x = 1\n");
    write(dir.path().join("app.py"), "x = 1\n");

    let config = ScanConfig {
        output_dir: Some(dir.path().join("reports")),
        ..ScanConfig::default()
    };
    let result = CodebaseAnalyzer::new(config)
        .scan(dir.path(), &ScanOptions::default(), &ScanCancellation::new())
        .unwrap();

    assert_eq!(result.total_files(), 1);
}

#[test]
fn cancelled_scan_returns_no_partial_result() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path().join("a.py"), "x = 1\n");

    let cancellation = ScanCancellation::new();
    cancellation.cancel();
    let err = CodebaseAnalyzer::default()
        .scan(dir.path(), &ScanOptions::default(), &cancellation)
        .unwrap_err();

    assert!(matches!(err, ScanError::Cancelled { completed: 0 }));
}

#[test]
fn result_invariants_hold() {
    let dir = tempfile::TempDir::new().unwrap();
    write(
        dir.path().join("pkg/models.py"),
        "import os\n\nclass User:\n    \"\"\"A user.\"\"\"\n    def name(self):\n        return 'x'\n",
    );
    write(
        dir.path().join("pkg/views.py"),
        "from models import User\nimport pkg\n\ndef show():\n    return User()\n",
    );
    write(
        dir.path().join("web/app.js"),
        "const views = require('views');\n/** Entry. */\nfunction main() {}\n",
    );

    let result = scan(dir.path(), &ScanOptions::default()).unwrap();

    for metric in result.file_metrics() {
        assert!(metric.documented_functions <= metric.functions);
        assert!(metric.documented_classes <= metric.classes);
    }
    let paths: Vec<_> = result.file_metrics().iter().map(|m| &m.path).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);

    let graph = result.dependency_graph();
    let ids: BTreeSet<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &graph.edges {
        assert_ne!(edge.source, edge.target);
        assert!(ids.contains(edge.source.as_str()));
        assert!(ids.contains(edge.target.as_str()));
    }

    let root = result.scan_path();
    let views = root.join("pkg/views.py").to_string_lossy().into_owned();
    let models = root.join("pkg/models.py").to_string_lossy().into_owned();
    let app = root.join("web/app.js").to_string_lossy().into_owned();
    assert!(graph.has_edge(&views, &models));
    assert!(graph.has_edge(&app, &views));

    assert!(result.duration_seconds() >= 0.0);
    assert!(chrono::DateTime::parse_from_rfc3339(result.timestamp()).is_ok());
}

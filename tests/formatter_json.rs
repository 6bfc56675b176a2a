use appdoc::core::ScanOptions;
use appdoc::formatters::{JsonFormatter, RESULT_FILE_NAME};
use appdoc::{scan, ScanResult};
use serde_json::Value;
use std::fs;

fn sample_result() -> (tempfile::TempDir, ScanResult) {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(
        dir.path().join("a.py"),
        "import b\n\ndef f():\n    \"\"\"Doc.\"\"\"\n    return b\n",
    )
    .unwrap();
    fs::write(dir.path().join("b.py"), "class B:\n    pass\n").unwrap();
    let result = scan(dir.path(), &ScanOptions::default()).unwrap();
    (dir, result)
}

#[test]
fn json_uses_camel_case_schema() {
    let (_dir, result) = sample_result();
    let json: Value = serde_json::from_str(&JsonFormatter::new().format(&result).unwrap()).unwrap();

    for key in [
        "scanPath",
        "timestamp",
        "durationSeconds",
        "totalFiles",
        "totalLines",
        "languageSummaries",
        "fileMetrics",
        "dependencyGraph",
        "ignoredPatterns",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }

    assert_eq!(json["totalFiles"], 2);
    let python = &json["languageSummaries"]["python"];
    assert_eq!(python["functions"], 1);
    assert_eq!(python["documentedFunctions"], 1);
    assert_eq!(python["classes"], 1);
    assert_eq!(python["documentedClasses"], 0);
    assert_eq!(python["coveragePercentage"], 50.0);

    let first = &json["fileMetrics"][0];
    for key in [
        "path",
        "language",
        "lines",
        "documentedFunctions",
        "documentedClasses",
        "coveragePercentage",
        "dependencies",
        "complexity",
        "functionDetails",
        "classDetails",
    ] {
        assert!(first.get(key).is_some(), "missing fileMetrics.{key}");
    }
    assert_eq!(first["dependencies"], serde_json::json!(["b"]));
    assert_eq!(first["complexity"], Value::Null);
    assert_eq!(first["functionDetails"][0]["kind"], "function");

    let graph = &json["dependencyGraph"];
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(graph["edges"][0]["weight"], 1);
}

#[test]
fn compact_output_is_single_line_and_equivalent() {
    let (_dir, result) = sample_result();
    let pretty = JsonFormatter::new().format(&result).unwrap();
    let compact = JsonFormatter::compact().format(&result).unwrap();

    assert!(!compact.contains('\n'));
    assert!(compact.len() < pretty.len());
    let a: Value = serde_json::from_str(&pretty).unwrap();
    let b: Value = serde_json::from_str(&compact).unwrap();
    assert_eq!(a, b);
}

#[test]
fn written_file_reads_back_into_scan_result() {
    let (dir, result) = sample_result();
    let out = dir.path().join("appdoc-reports");

    let written = JsonFormatter::new().write_to_dir(&result, &out).unwrap();

    assert_eq!(written, out.join(RESULT_FILE_NAME));
    let restored: ScanResult = serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(restored.total_files(), result.total_files());
    assert_eq!(restored.file_metrics(), result.file_metrics());
    assert_eq!(restored.dependency_graph(), result.dependency_graph());
    assert_eq!(restored.overall_coverage(), result.overall_coverage());
}

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Language tag used when no analyzer claims a file.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Function,
    Method,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionDetail {
    pub name: String,
    pub line: usize,
    pub documented: bool,
    pub kind: FunctionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassDetail {
    pub name: String,
    pub line: usize,
    pub documented: bool,
}

/// Percentage of documented items; 0 when there is nothing to document.
pub fn coverage_percentage(
    functions: usize,
    documented_functions: usize,
    classes: usize,
    documented_classes: usize,
) -> f64 {
    let total = functions + classes;
    if total == 0 {
        return 0.0;
    }
    (documented_functions + documented_classes) as f64 * 100.0 / total as f64
}

/// Analysis result for a single file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetric {
    pub path: PathBuf,
    pub language: String,
    pub lines: usize,
    pub functions: usize,
    pub documented_functions: usize,
    pub classes: usize,
    pub documented_classes: usize,
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
    #[serde(default)]
    pub complexity: Option<u32>,
    #[serde(default)]
    pub function_details: Option<Vec<FunctionDetail>>,
    #[serde(default)]
    pub class_details: Option<Vec<ClassDetail>>,
}

impl FileMetric {
    pub fn new(path: PathBuf, language: String, lines: usize) -> Self {
        Self {
            path,
            language,
            lines,
            functions: 0,
            documented_functions: 0,
            classes: 0,
            documented_classes: 0,
            dependencies: BTreeSet::new(),
            complexity: None,
            function_details: None,
            class_details: None,
        }
    }

    /// Line count only, every structural counter at zero.
    pub fn degraded(path: &Path, language: &str, lines: usize) -> Self {
        Self::new(path.to_path_buf(), language.to_string(), lines)
    }

    /// Build a metric from extracted declarations; counts are derived from the details.
    pub fn from_details(
        path: &Path,
        language: &str,
        lines: usize,
        functions: Vec<FunctionDetail>,
        classes: Vec<ClassDetail>,
        dependencies: BTreeSet<String>,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            language: language.to_string(),
            lines,
            functions: functions.len(),
            documented_functions: functions.iter().filter(|f| f.documented).count(),
            classes: classes.len(),
            documented_classes: classes.iter().filter(|c| c.documented).count(),
            dependencies,
            complexity: None,
            function_details: Some(functions),
            class_details: Some(classes),
        }
    }

    pub fn coverage(&self) -> f64 {
        coverage_percentage(
            self.functions,
            self.documented_functions,
            self.classes,
            self.documented_classes,
        )
    }

    /// True when nothing structural was extracted.
    pub fn is_degraded(&self) -> bool {
        self.functions == 0 && self.classes == 0 && self.function_details.is_none()
    }
}

impl Serialize for FileMetric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FileMetric", 12)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("language", &self.language)?;
        s.serialize_field("lines", &self.lines)?;
        s.serialize_field("functions", &self.functions)?;
        s.serialize_field("documentedFunctions", &self.documented_functions)?;
        s.serialize_field("classes", &self.classes)?;
        s.serialize_field("documentedClasses", &self.documented_classes)?;
        s.serialize_field("coveragePercentage", &self.coverage())?;
        s.serialize_field("dependencies", &self.dependencies)?;
        s.serialize_field("complexity", &self.complexity)?;
        s.serialize_field("functionDetails", &self.function_details)?;
        s.serialize_field("classDetails", &self.class_details)?;
        s.end()
    }
}

/// Per-language totals over every file carrying the same language tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSummary {
    #[serde(default)]
    pub language: String,
    pub files: usize,
    pub lines: usize,
    pub functions: usize,
    pub documented_functions: usize,
    pub classes: usize,
    pub documented_classes: usize,
}

impl LanguageSummary {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..Default::default()
        }
    }

    pub fn add(&mut self, metric: &FileMetric) {
        self.files += 1;
        self.lines += metric.lines;
        self.functions += metric.functions;
        self.documented_functions += metric.documented_functions;
        self.classes += metric.classes;
        self.documented_classes += metric.documented_classes;
    }

    /// Combine with a summary computed over a disjoint set of files.
    pub fn merge(&mut self, other: &LanguageSummary) {
        self.files += other.files;
        self.lines += other.lines;
        self.functions += other.functions;
        self.documented_functions += other.documented_functions;
        self.classes += other.classes;
        self.documented_classes += other.documented_classes;
    }

    pub fn coverage(&self) -> f64 {
        coverage_percentage(
            self.functions,
            self.documented_functions,
            self.classes,
            self.documented_classes,
        )
    }
}

impl Serialize for LanguageSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("LanguageSummary", 8)?;
        s.serialize_field("language", &self.language)?;
        s.serialize_field("files", &self.files)?;
        s.serialize_field("lines", &self.lines)?;
        s.serialize_field("functions", &self.functions)?;
        s.serialize_field("documentedFunctions", &self.documented_functions)?;
        s.serialize_field("classes", &self.classes)?;
        s.serialize_field("documentedClasses", &self.documented_classes)?;
        s.serialize_field("coveragePercentage", &self.coverage())?;
        s.end()
    }
}

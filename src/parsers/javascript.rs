use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use super::common::{count_lines, line_at, read_source};
use super::LanguageParser;
use crate::core::{ClassDetail, FileMetric, FunctionDetail, FunctionKind};

const LANGUAGE: &str = "javascript";

macro_rules! js_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

js_pattern!(
    RE_FUNCTION_DECL,
    r"\bfunction(?:\s*\*\s*|\s+)([A-Za-z_$][\w$]*)\s*\("
);
js_pattern!(
    RE_FUNCTION_BINDING,
    r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|[A-Za-z_$][\w$]*\s*=>)"
);
js_pattern!(
    RE_METHOD,
    r"(?m)^[ \t]*(?:(?:static|async|get|set)\s+)*([A-Za-z_$][\w$]*)\s*\([^)]*\)\s*\{"
);
js_pattern!(RE_CLASS, r"\bclass\s+([A-Za-z_$][\w$]*)");
js_pattern!(RE_DOC_COMMENT, r"/\*\*(?:[^*]|\*+[^*/])*\*+/");
js_pattern!(RE_IMPORT_FROM, r#"\bfrom\s+['"]([^'"]+)['"]"#);
js_pattern!(RE_IMPORT_BARE, r#"\bimport\s*\(?\s*['"]([^'"]+)['"]"#);
js_pattern!(RE_REQUIRE, r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#);

/// Words that look like `name(...) {` but are not declarations.
const NOT_METHODS: &[&str] = &[
    "if", "for", "while", "catch", "switch", "function", "return", "typeof", "with", "do",
    "else", "new", "await", "yield", "delete", "void", "super",
];

/// Modifiers allowed between a doc comment and the declaration it documents.
const DECL_MODIFIERS: &[&str] = &["export", "default", "async", "static"];

/// Pattern-based analyzer for JavaScript.
///
/// No syntax tree: functions are the distinct names found by a few
/// declaration patterns, classes are every `class Name` occurrence.
pub struct JavaScriptParser;

impl JavaScriptParser {
    pub fn new() -> Self {
        Self
    }

    fn find_functions(&self, content: &str, doc_ends: &HashSet<usize>) -> Vec<FunctionDetail> {
        let mut found: Vec<(usize, &str, FunctionKind)> = Vec::new();
        for (pattern, kind) in [
            (&RE_FUNCTION_DECL, FunctionKind::Function),
            (&RE_FUNCTION_BINDING, FunctionKind::Function),
            (&RE_METHOD, FunctionKind::Method),
        ] {
            let Some(re) = pattern.as_ref() else {
                continue;
            };
            for caps in re.captures_iter(content) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                if kind == FunctionKind::Method && is_keyword(name.as_str()) {
                    continue;
                }
                found.push((whole.start(), name.as_str(), kind));
            }
        }
        found.sort_by_key(|(offset, _, _)| *offset);

        let mut functions: Vec<FunctionDetail> = Vec::new();
        for (offset, name, kind) in found {
            let documented = is_documented(content, offset, doc_ends);
            match functions.iter_mut().find(|f| f.name == name) {
                Some(existing) => existing.documented |= documented,
                None => functions.push(FunctionDetail {
                    name: name.to_string(),
                    line: line_at(content, offset),
                    documented,
                    kind,
                }),
            }
        }
        functions
    }

    fn find_classes(&self, content: &str, doc_ends: &HashSet<usize>) -> Vec<ClassDetail> {
        let Some(re) = RE_CLASS.as_ref() else {
            return Vec::new();
        };
        re.captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                Some(ClassDetail {
                    name: name.as_str().to_string(),
                    line: line_at(content, whole.start()),
                    documented: is_documented(content, whole.start(), doc_ends),
                })
            })
            .collect()
    }

    /// Bare package names from ES imports and `require` calls; relative paths are dropped.
    fn find_dependencies(&self, content: &str) -> BTreeSet<String> {
        let mut dependencies = BTreeSet::new();
        for pattern in [&RE_IMPORT_FROM, &RE_IMPORT_BARE, &RE_REQUIRE] {
            let Some(re) = pattern.as_ref() else {
                continue;
            };
            for caps in re.captures_iter(content) {
                let Some(specifier) = caps.get(1).map(|m| m.as_str()) else {
                    continue;
                };
                if specifier.starts_with('.') {
                    continue;
                }
                if let Some(base) = specifier.split('/').next().filter(|s| !s.is_empty()) {
                    dependencies.insert(base.to_string());
                }
            }
        }
        dependencies
    }
}

fn is_keyword(name: &str) -> bool {
    NOT_METHODS.iter().any(|word| *word == name)
}

/// A `/** ... */` block ends right before the declaration at `offset`.
fn is_documented(content: &str, offset: usize, doc_ends: &HashSet<usize>) -> bool {
    let mut prefix = content[..offset].trim_end();
    while let Some(stripped) = DECL_MODIFIERS.iter().find_map(|m| {
        prefix
            .strip_suffix(m)
            .filter(|rest| rest.is_empty() || rest.ends_with(char::is_whitespace))
    }) {
        prefix = stripped.trim_end();
    }
    doc_ends.contains(&prefix.len())
}

fn doc_comment_ends(content: &str) -> HashSet<usize> {
    RE_DOC_COMMENT
        .as_ref()
        .map(|re| re.find_iter(content).map(|m| m.end()).collect())
        .unwrap_or_default()
}

impl Default for JavaScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for JavaScriptParser {
    fn language_name(&self) -> &str {
        LANGUAGE
    }

    fn extensions(&self) -> &[&str] {
        &["js", "mjs", "cjs", "jsx"]
    }

    fn analyze(&self, file_path: &Path) -> FileMetric {
        let content = match read_source(file_path) {
            Ok(content) => content,
            Err(unreadable) => {
                tracing::warn!(path = %file_path.display(), "unable to read javascript source");
                return FileMetric::degraded(file_path, LANGUAGE, unreadable.lines);
            }
        };

        let doc_ends = doc_comment_ends(&content);
        let functions = self.find_functions(&content, &doc_ends);
        let classes = self.find_classes(&content, &doc_ends);
        let dependencies = self.find_dependencies(&content);

        FileMetric::from_details(
            file_path,
            LANGUAGE,
            count_lines(&content),
            functions,
            classes,
            dependencies,
        )
    }
}

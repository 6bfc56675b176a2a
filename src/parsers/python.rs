use std::collections::BTreeSet;
use std::path::Path;
use tree_sitter::Node as TSNode;

use super::common::{
    count_lines, extract_text, find_child_by_kind, leading_segment, read_source, start_line,
    TreeSitterParser,
};
use super::LanguageParser;
use crate::core::{ClassDetail, FileMetric, FunctionDetail, FunctionKind};

const LANGUAGE: &str = "python";

/// Structural analyzer backed by tree-sitter-python.
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }

    /// Walk the whole tree, collecting declarations at any depth and every import.
    fn collect(
        &self,
        root: &TSNode,
        source: &[u8],
        functions: &mut Vec<FunctionDetail>,
        classes: &mut Vec<ClassDetail>,
        dependencies: &mut BTreeSet<String>,
    ) {
        let mut stack = vec![*root];

        while let Some(node) = stack.pop() {
            match node.kind() {
                "function_definition" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        functions.push(FunctionDetail {
                            name: extract_text(&name, source).to_string(),
                            line: start_line(&node),
                            documented: self.has_docstring(&node, source),
                            kind: if is_method(&node) {
                                FunctionKind::Method
                            } else {
                                FunctionKind::Function
                            },
                        });
                    }
                }
                "class_definition" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        classes.push(ClassDetail {
                            name: extract_text(&name, source).to_string(),
                            line: start_line(&node),
                            documented: self.has_docstring(&node, source),
                        });
                    }
                }
                "import_statement" => self.process_import(&node, source, dependencies),
                "import_from_statement" | "future_import_statement" => {
                    self.process_import_from(&node, source, dependencies)
                }
                _ => {}
            }

            let mut cursor = node.walk();
            let children: Vec<TSNode> = node.named_children(&mut cursor).collect();
            // Reversed so declarations come out in source order
            stack.extend(children.into_iter().rev());
        }
    }

    /// `import a.b, c as d` contributes `a` and `c`.
    fn process_import(&self, node: &TSNode, source: &[u8], dependencies: &mut BTreeSet<String>) {
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            let dotted = match child.kind() {
                "aliased_import" => child.child_by_field_name("name"),
                _ => Some(child),
            };
            if let Some(dotted) = dotted {
                insert_module(dependencies, extract_text(&dotted, source));
            }
        }
    }

    /// `from a.b import c` contributes `a`; `from .x import y` contributes `x`.
    fn process_import_from(
        &self,
        node: &TSNode,
        source: &[u8],
        dependencies: &mut BTreeSet<String>,
    ) {
        if node.kind() == "future_import_statement" {
            dependencies.insert("__future__".to_string());
            return;
        }

        let Some(module) = node.child_by_field_name("module_name") else {
            return;
        };
        let dotted = match module.kind() {
            "relative_import" => find_child_by_kind(&module, "dotted_name"),
            _ => Some(module),
        };
        if let Some(dotted) = dotted {
            insert_module(dependencies, extract_text(&dotted, source));
        }
    }

    /// First statement of the body is a bare string literal.
    fn has_docstring(&self, definition: &TSNode, source: &[u8]) -> bool {
        let Some(body) = definition.child_by_field_name("body") else {
            return false;
        };
        let mut cursor = body.walk();
        let first = body
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");

        match first {
            Some(stmt) if stmt.kind() == "expression_statement" => stmt
                .named_child(0)
                .map(|expr| match expr.kind() {
                    "string" => is_text_literal(extract_text(&expr, source)),
                    "concatenated_string" => {
                        let mut cursor = expr.walk();
                        let parts: Vec<TSNode> = expr.named_children(&mut cursor).collect();
                        !parts.is_empty()
                            && parts
                                .iter()
                                .all(|part| is_text_literal(extract_text(part, source)))
                    }
                    _ => false,
                })
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// A plain `str` literal; f-strings and bytes never become `__doc__`.
fn is_text_literal(literal: &str) -> bool {
    let Some(quote) = literal.find(['\'', '"']) else {
        return false;
    };
    !literal[..quote]
        .chars()
        .any(|c| matches!(c, 'f' | 'F' | 'b' | 'B'))
}

/// A function whose nearest enclosing definition is a class.
fn is_method(function: &TSNode) -> bool {
    let mut parent = function.parent();
    while let Some(node) = parent {
        match node.kind() {
            "block" | "decorated_definition" => parent = node.parent(),
            "class_definition" => return true,
            _ => return false,
        }
    }
    false
}

fn insert_module(dependencies: &mut BTreeSet<String>, module: &str) {
    let segment = leading_segment(module);
    if !segment.is_empty() {
        dependencies.insert(segment.to_string());
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for PythonParser {
    fn language_name(&self) -> &str {
        LANGUAGE
    }

    fn extensions(&self) -> &[&str] {
        &["py", "pyw", "pyi"]
    }

    fn analyze(&self, file_path: &Path) -> FileMetric {
        let source = match read_source(file_path) {
            Ok(source) => source,
            Err(unreadable) => {
                tracing::warn!(path = %file_path.display(), "unable to read python source");
                return FileMetric::degraded(file_path, LANGUAGE, unreadable.lines);
            }
        };
        let lines = count_lines(&source);

        let mut parser = match TreeSitterParser::new(tree_sitter_python::language()) {
            Ok(parser) => parser,
            Err(err) => {
                tracing::error!(error = %err, "python grammar unavailable");
                return FileMetric::degraded(file_path, LANGUAGE, lines);
            }
        };
        let Some(tree) = parser.parse_clean(&source) else {
            tracing::warn!(path = %file_path.display(), "syntax errors, counting lines only");
            return FileMetric::degraded(file_path, LANGUAGE, lines);
        };

        let mut functions = Vec::new();
        let mut classes = Vec::new();
        let mut dependencies = BTreeSet::new();
        self.collect(
            &tree.root_node(),
            source.as_bytes(),
            &mut functions,
            &mut classes,
            &mut dependencies,
        );

        FileMetric::from_details(file_path, LANGUAGE, lines, functions, classes, dependencies)
    }
}

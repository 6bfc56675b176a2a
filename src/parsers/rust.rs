use std::collections::BTreeSet;
use std::path::Path;
use tree_sitter::Node as TSNode;

use super::common::{count_lines, extract_text, read_source, start_line, TreeSitterParser};
use super::LanguageParser;
use crate::core::{ClassDetail, FileMetric, FunctionDetail, FunctionKind};

const LANGUAGE: &str = "rust";

/// Path qualifiers that never name a module on their own.
const PATH_QUALIFIERS: &[&str] = &["crate", "self", "super"];

/// Structural analyzer backed by tree-sitter-rust.
///
/// Functions are `fn` items (methods inside `impl` and `trait` blocks); structs,
/// enums, unions and traits count as classes. An item is documented when an
/// outer doc comment sits directly above it, attributes in between allowed.
pub struct RustParser;

impl RustParser {
    pub fn new() -> Self {
        Self
    }

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
                "function_item" | "function_signature_item" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        functions.push(FunctionDetail {
                            name: extract_text(&name, source).to_string(),
                            line: start_line(&node),
                            documented: has_doc_comment(&node, source),
                            kind: if is_associated(&node) {
                                FunctionKind::Method
                            } else {
                                FunctionKind::Function
                            },
                        });
                    }
                }
                "struct_item" | "enum_item" | "union_item" | "trait_item" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        classes.push(ClassDetail {
                            name: extract_text(&name, source).to_string(),
                            line: start_line(&node),
                            documented: has_doc_comment(&node, source),
                        });
                    }
                }
                "use_declaration" => {
                    if let Some(argument) = node.child_by_field_name("argument") {
                        dependencies.extend(use_roots(extract_text(&argument, source)));
                    }
                }
                // `mod foo;` pulls in a sibling file
                "mod_item" if node.child_by_field_name("body").is_none() => {
                    if let Some(name) = node.child_by_field_name("name") {
                        dependencies.insert(extract_text(&name, source).to_string());
                    }
                }
                "extern_crate_declaration" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        dependencies.insert(extract_text(&name, source).to_string());
                    }
                }
                _ => {}
            }

            let mut cursor = node.walk();
            let children: Vec<TSNode> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
}

/// Declared directly inside an `impl` or `trait` body.
fn is_associated(function: &TSNode) -> bool {
    function
        .parent()
        .filter(|body| body.kind() == "declaration_list")
        .and_then(|body| body.parent())
        .map(|owner| matches!(owner.kind(), "impl_item" | "trait_item"))
        .unwrap_or(false)
}

fn has_doc_comment(item: &TSNode, source: &[u8]) -> bool {
    let mut previous = item.prev_sibling();
    while let Some(node) = previous {
        match node.kind() {
            "attribute_item" => previous = node.prev_sibling(),
            "line_comment" => {
                let text = extract_text(&node, source);
                return text.starts_with("///") && !text.starts_with("////");
            }
            "block_comment" => {
                let text = extract_text(&node, source);
                return text.starts_with("/**") && !text.starts_with("/***") && text != "/**/";
            }
            _ => return false,
        }
    }
    false
}

/// Root module names referenced by the argument of a `use` declaration.
///
/// `crate::a::b` gives `a`, `std::{fmt, io}` gives `std`, `self::{x, y::z}` gives `x` and `y`.
fn use_roots(argument: &str) -> Vec<String> {
    let mut path = argument.trim().trim_start_matches("::");
    loop {
        if let Some(list) = path.strip_prefix('{') {
            let list = list.strip_suffix('}').unwrap_or(list);
            return split_use_list(list)
                .into_iter()
                .flat_map(use_roots)
                .collect();
        }

        let (head, rest) = match path.split_once("::") {
            Some((head, rest)) => (head.trim(), rest.trim()),
            None => (path.trim(), ""),
        };
        if is_qualifier(head) && !rest.is_empty() {
            path = rest;
            continue;
        }

        let name = head.split_whitespace().next().unwrap_or("");
        return if name.is_empty() || name == "*" || is_qualifier(name) {
            Vec::new()
        } else {
            vec![name.to_string()]
        };
    }
}

fn is_qualifier(segment: &str) -> bool {
    PATH_QUALIFIERS.iter().any(|q| *q == segment)
}

/// Split a `{a, b::{c, d}}` body on top-level commas.
fn split_use_list(list: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&list[start..]);
    items.into_iter().filter(|item| !item.trim().is_empty()).collect()
}

impl Default for RustParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for RustParser {
    fn language_name(&self) -> &str {
        LANGUAGE
    }

    fn extensions(&self) -> &[&str] {
        &["rs"]
    }

    fn analyze(&self, file_path: &Path) -> FileMetric {
        let source = match read_source(file_path) {
            Ok(source) => source,
            Err(unreadable) => {
                tracing::warn!(path = %file_path.display(), "unable to read rust source");
                return FileMetric::degraded(file_path, LANGUAGE, unreadable.lines);
            }
        };
        let lines = count_lines(&source);

        let mut parser = match TreeSitterParser::new(tree_sitter_rust::language()) {
            Ok(parser) => parser,
            Err(err) => {
                tracing::error!(error = %err, "rust grammar unavailable");
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

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, LanguageError, Node as TSNode, Parser, Tree};

/// A file whose content could not be decoded; carries the best-effort line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unreadable {
    pub lines: usize,
}

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self, LanguageError> {
        let mut parser = Parser::new();
        parser.set_language(language)?;
        Ok(Self { parser })
    }

    /// Parse source text; `None` when the tree contains syntax errors.
    pub fn parse_clean(&mut self, source: &str) -> Option<Tree> {
        let tree = self.parser.parse(source, None)?;
        if tree.root_node().has_error() {
            return None;
        }
        Some(tree)
    }
}

/// Read a file as UTF-8 text.
///
/// Invalid UTF-8 falls back to a lossy line count; an I/O failure counts 0 lines.
pub fn read_source(file_path: &Path) -> Result<String, Unreadable> {
    let file = File::open(file_path).map_err(|_| Unreadable { lines: 0 })?;
    let file_size = file.metadata().map(|m| m.len() as usize).unwrap_or(0);

    let mut reader = BufReader::with_capacity(file_size.clamp(1, 8192), file);
    let mut bytes = Vec::with_capacity(file_size);
    reader
        .read_to_end(&mut bytes)
        .map_err(|_| Unreadable { lines: 0 })?;

    String::from_utf8(bytes).map_err(|err| Unreadable {
        lines: count_lines(&String::from_utf8_lossy(err.as_bytes())),
    })
}

/// Count lines without holding the whole file in memory; used for oversized files.
pub fn count_lines_streaming(file_path: &Path) -> usize {
    let Ok(file) = File::open(file_path) else {
        return 0;
    };
    let mut reader = BufReader::new(file);
    let mut lines = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => lines += 1,
        }
    }
    lines
}

pub fn count_lines(content: &str) -> usize {
    content.lines().count()
}

/// 1-based line number of `offset` within `content`.
pub fn line_at(content: &str, offset: usize) -> usize {
    content[..offset.min(content.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

pub fn start_line(node: &TSNode) -> usize {
    node.start_position().row + 1
}

pub fn find_child_by_kind<'a>(node: &TSNode<'a>, kind: &str) -> Option<TSNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Leading segment of a dotted or path-like module reference.
pub fn leading_segment(token: &str) -> &str {
    token
        .split(|c| c == '.' || c == '/' || c == ':')
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
}

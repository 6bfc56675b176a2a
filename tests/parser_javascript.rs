use appdoc::core::FunctionKind;
use appdoc::parsers::javascript::JavaScriptParser;
use appdoc::parsers::LanguageParser;
use std::fs;

#[test]
fn javascript_parser_finds_functions_classes_and_jsdoc() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("app.js");
    let code = r#"import React from 'react';
import { render } from 'react-dom/client';
import helper from './helper';
const lodash = require('lodash/fp');

/**
 * Adds numbers.
 */
function add(a, b) {
    return a + b;
}

const double = (x) => x * 2;

/** Squares. */
export const square = x => x * x;

/**
 * A widget.
 */
export default class Widget {
    render() {
        if (this.ready) {
            return add(1, 2);
        }
        for (const item of this.items) {
            console.log(item);
        }
    }
}

class Plain {}
"#;
    fs::write(&file, code).unwrap();

    let metric = JavaScriptParser::new().analyze(&file);

    assert_eq!(metric.language, "javascript");
    assert_eq!(metric.lines, 32);
    assert_eq!(metric.classes, 2);
    assert_eq!(metric.documented_classes, 1);

    let functions = metric.function_details.as_ref().unwrap();
    let names: Vec<_> = functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["add", "double", "square", "render"]);
    assert_eq!(metric.functions, 4);
    assert_eq!(metric.documented_functions, 2);

    let add = &functions[0];
    assert_eq!(add.line, 9);
    assert!(add.documented);
    assert_eq!(add.kind, FunctionKind::Function);
    assert!(!functions[1].documented);
    assert!(functions[2].documented);
    assert_eq!(functions[3].kind, FunctionKind::Method);

    let deps: Vec<_> = metric.dependencies.iter().map(String::as_str).collect();
    assert_eq!(deps, vec!["lodash", "react", "react-dom"]);
}

#[test]
fn javascript_parser_counts_repeated_names_once() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("dup.mjs");
    let code = r#"class A {
    run() {
        return 1;
    }
}

class B {
    run() {
        return 2;
    }
}
"#;
    fs::write(&file, code).unwrap();

    let metric = JavaScriptParser::new().analyze(&file);

    assert_eq!(metric.functions, 1);
    assert_eq!(metric.classes, 2);
    assert_eq!(metric.documented_functions, 0);
}

#[test]
fn javascript_parser_requires_adjacent_doc_block() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("gap.js");
    let code = r#"/** Orphaned doc. */
const unrelated = 1;

function later() {}

/* not jsdoc */
function plain() {}
"#;
    fs::write(&file, code).unwrap();

    let metric = JavaScriptParser::new().analyze(&file);

    assert_eq!(metric.functions, 2);
    assert_eq!(metric.documented_functions, 0);
}

#[test]
fn javascript_parser_handles_extensions() {
    let parser = JavaScriptParser::new();
    assert!(parser.can_handle(std::path::Path::new("a/b.js")));
    assert!(parser.can_handle(std::path::Path::new("view.JSX")));
    assert!(parser.can_handle(std::path::Path::new("lib.cjs")));
    assert!(!parser.can_handle(std::path::Path::new("types.ts")));
}

#![allow(dead_code)]
use std::path::Path;

use forscript::ast::Block;
use forscript::{lexer, parser};
use test_support::load_cases;

/// Fixture programs opted into benchmarking, as `(case name, source)`.
pub fn workloads() -> Vec<(String, String)> {
    load_cases(Path::new("tests/programs"))
        .expect("load fixture cases")
        .into_iter()
        .filter(|case| case.spec.bench.enabled)
        .map(|case| {
            let source = case.read_program().expect("read program");
            (case.name, source)
        })
        .collect()
}

pub fn load_program(source: &str) -> Block {
    let tokens = lexer::tokenize(source).unwrap_or_else(|err| panic!("tokenize: {err}"));
    parser::parse_tokens(tokens).unwrap_or_else(|err| panic!("parse: {err}"))
}

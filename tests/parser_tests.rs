// ABOUTME: Integration tests for the document parser module
// ABOUTME: Tests block splitting, syntax guarding, rewriting, and TOML parsing together

use serde_json::json;
use std::fs::File;
use std::io::BufReader;

use tomlj2::parser::{
    parse_fields, quote_expressions, split_blocks, Block, BlockReader, SyntaxGuard,
    ValidationError,
};

mod common;
use common::{TestDocumentBuilder, TestEnvironment};

const SERVICE_DOCUMENT: &str = r#"
[service]
name = "{{ username }}"
replicas = {{ user_age }}

ports = [80, 443]
tls = true


[owner]
contact = {{
    username
}}
"#;

#[test]
fn test_document_without_blank_lines_is_one_block() {
    let text = "a = 1\n[t]\nb = {{ x }}\nc = \"y\"";
    let blocks: Vec<Block> = split_blocks(text).collect();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].raw(), text);
}

#[test]
fn test_service_document_blocks() {
    let blocks: Vec<Block> = split_blocks(SERVICE_DOCUMENT).collect();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[1].raw(), "ports = [80, 443]\ntls = true\n");
    assert_eq!(blocks[2].flattened(), "[owner] contact = {{ username }}");
}

#[tokio::test]
async fn test_reader_blocks_match_in_memory_blocks() {
    let env = TestEnvironment::new();
    let builder = TestDocumentBuilder::new()
        .with_block("[a]\nx = 1")
        .with_block("y = {{ v }}");
    let path = env.create_document("doc", &builder).await;

    let from_file: Vec<Block> = BlockReader::new(BufReader::new(File::open(&path).unwrap()))
        .collect::<std::io::Result<_>>()
        .unwrap();
    let from_str: Vec<Block> = split_blocks(&builder.build()).collect();
    assert_eq!(from_file, from_str);
}

#[test]
fn test_guarded_blocks_parse_after_rewrite() {
    let guard = SyntaxGuard::new();
    let mut parsed = Vec::new();

    for block in split_blocks(SERVICE_DOCUMENT) {
        assert!(guard.check(block.raw()).is_empty());
        parsed.push(parse_fields(&quote_expressions(block.raw())).unwrap());
    }

    assert_eq!(
        parsed[0]["service"],
        json!({"name": "{{ username }}", "replicas": "{{ user_age }}"})
    );
    assert_eq!(parsed[1]["ports"], json!([80, 443]));
    assert_eq!(
        parsed[2]["owner"],
        json!({"contact": "{{\n    username\n}}"})
    );
}

#[test]
fn test_unrewritten_bare_expression_does_not_parse() {
    assert!(parse_fields("name = {{ username }}\n").is_err());
    assert!(parse_fields(&quote_expressions("name = {{ username }}\n")).is_ok());
}

#[test]
fn test_rewrite_runs_even_with_violations() {
    let raw = "a = {{ x }} {% if y %}\n";
    assert_eq!(
        SyntaxGuard::new().check(raw.trim()),
        vec![ValidationError::NonExpressionRegion {
            region: "{% if y %}".to_string()
        }]
    );
    assert_eq!(quote_expressions(raw), "a = '''{{ x }}''' {% if y %}\n");
}

#[test]
fn test_multiline_region_matched_once_flattened() {
    let blocks: Vec<Block> = split_blocks("x = 1 {%\n if y\n%}\n").collect();
    let errors = SyntaxGuard::new().check(&blocks[0].flattened());
    assert_eq!(
        errors,
        vec![ValidationError::NonExpressionRegion {
            region: "{% if y %}".to_string()
        }]
    );
}

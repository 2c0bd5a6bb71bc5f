//! TypeScript parser using tree-sitter
//!
//! Collects the module specifier of every import declaration, re-export
//! declaration and `import()` call in a file.

use tree_sitter::{Node, Parser as TsParser};

use super::Dialect;
use crate::error::ParseError;
use crate::resolve::{ImportKind, ImportRef};

const IMPORT_STATEMENT: &str = "import_statement";
const EXPORT_STATEMENT: &str = "export_statement";
const CALL_EXPRESSION: &str = "call_expression";

impl Dialect {
    fn language(self) -> tree_sitter::Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Parse source text and return its import references in source order.
///
/// Syntax errors do not fail the parse: tree-sitter recovers and whatever
/// declarations it still recognizes are reported.
pub fn parse_imports(source: &str, dialect: Dialect) -> Result<Vec<ImportRef>, ParseError> {
    let mut parser = TsParser::new();
    parser.set_language(&dialect.language())?;

    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    let bytes = source.as_bytes();

    let mut imports = Vec::new();
    let mut stack = vec![tree.root_node()];

    while let Some(node) = stack.pop() {
        match node.kind() {
            IMPORT_STATEMENT => {
                if let Some(specifier) = source_specifier(&node, bytes) {
                    imports.push(ImportRef {
                        specifier,
                        kind: ImportKind::Static,
                        type_only: has_type_keyword(&node),
                    });
                }
                continue;
            }
            EXPORT_STATEMENT => {
                if let Some(specifier) = source_specifier(&node, bytes) {
                    imports.push(ImportRef {
                        specifier,
                        kind: ImportKind::ReExport,
                        type_only: has_type_keyword(&node),
                    });
                    continue;
                }
                // Local exports may still contain `import()` calls.
            }
            CALL_EXPRESSION => {
                if let Some(specifier) = dynamic_import_specifier(&node, bytes) {
                    imports.push(ImportRef::new(specifier, ImportKind::Dynamic));
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    Ok(imports)
}

/// The `source` field of an import/export declaration, unquoted.
fn source_specifier(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("source")
        .and_then(|s| string_literal(&s, source))
}

/// `import("x")`: the callee is the `import` keyword node and the first
/// argument a plain string.
fn dynamic_import_specifier(node: &Node, source: &[u8]) -> Option<String> {
    let function = node.child_by_field_name("function")?;
    if function.kind() != "import" {
        return None;
    }
    let arguments = node.child_by_field_name("arguments")?;
    let first = arguments.named_child(0)?;
    string_literal(&first, source)
}

/// Contents of a string or substitution-free template literal, with
/// escapes decoded.
fn string_literal(node: &Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string" => literal_contents(node, source),
        "template_string" if !has_substitution(node) => literal_contents(node, source),
        _ => None,
    }
}

fn literal_contents(node: &Node, source: &[u8]) -> Option<String> {
    let mut value = String::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let text = child.utf8_text(source).ok()?;
        match child.kind() {
            "string_fragment" => value.push_str(text),
            "escape_sequence" => value.push_str(&unescape(text)),
            _ => {}
        }
    }
    Some(value)
}

/// Decode one escape sequence such as `\'` or `\n`. Numeric escapes are
/// kept as written.
fn unescape(sequence: &str) -> String {
    let mut chars = sequence.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('\\'), Some(c), None) => match c {
            'n' => "\n".to_string(),
            't' => "\t".to_string(),
            'r' => "\r".to_string(),
            '0' => "\0".to_string(),
            other => other.to_string(),
        },
        _ => sequence.to_string(),
    }
}

fn has_substitution(node: &Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "template_substitution");
    found
}

/// `import type ...` / `export type ... from`: a bare `type` keyword
/// directly under the declaration.
fn has_type_keyword(node: &Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == "type");
    found
}

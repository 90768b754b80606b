//! JavaScript/JSX parser for stylint, built on tree-sitter-javascript.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;

/// Result of parsing a JavaScript source file.
pub struct ParseResult {
    pub tree: tree_sitter::Tree,
    pub source: Arc<str>,
}

/// JavaScript parser wrapping tree-sitter.
pub struct JsParser {
    parser: tree_sitter::Parser,
}

/// Return the tree-sitter JavaScript language (JSX included).
pub fn js_language() -> tree_sitter::Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// Return a map from node kind string to one or more kind IDs.
pub fn js_kind_id_map() -> &'static HashMap<&'static str, Vec<u16>> {
    static KIND_ID_MAP: OnceLock<HashMap<&'static str, Vec<u16>>> = OnceLock::new();

    KIND_ID_MAP.get_or_init(|| {
        let language = js_language();
        let mut map: HashMap<&'static str, Vec<u16>> = HashMap::new();
        let kind_count = language.node_kind_count();

        for id in 0..kind_count {
            let id = id as u16;
            if let Some(kind) = language.node_kind_for_id(id) {
                map.entry(kind).or_default().push(id);
            }
        }

        map
    })
}

impl JsParser {
    /// Create a new JavaScript parser.
    pub fn new() -> Self {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&js_language())
            .expect("Failed to load JavaScript grammar");
        Self { parser }
    }

    /// Parse JavaScript source code into a syntax tree.
    pub fn parse(&mut self, source: &str) -> Option<ParseResult> {
        let tree = self.parser.parse(source, None)?;
        Some(ParseResult {
            tree,
            source: source.into(),
        })
    }

    /// Parse with an existing tree for incremental parsing.
    pub fn parse_with_old_tree(
        &mut self,
        source: &str,
        old_tree: &tree_sitter::Tree,
    ) -> Option<ParseResult> {
        let tree = self.parser.parse(source, Some(old_tree))?;
        Some(ParseResult {
            tree,
            source: source.into(),
        })
    }
}

impl Default for JsParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_function() {
        let mut parser = JsParser::new();
        let source = r#"
function greet(name) {
    console.log(`Hello, ${name}!`);
}
"#;
        let result = parser.parse(source).expect("Failed to parse");
        assert_eq!(result.tree.root_node().kind(), "program");
    }

    #[test]
    fn test_parse_jsx() {
        let mut parser = JsParser::new();
        let source = "const el = <div className=\"box\">{value}</div>;";
        let result = parser.parse(source).expect("Failed to parse");
        assert_eq!(result.tree.root_node().kind(), "program");
        assert!(!result.tree.root_node().has_error());
    }

    #[test]
    fn test_kind_map_has_common_kinds() {
        let map = js_kind_id_map();
        assert!(map.contains_key("statement_block"));
        assert!(map.contains_key("arrow_function"));
        assert!(map.contains_key("jsx_element"));
    }
}

//! Error-tolerant source parsing.

use tree_sitter::{Parser, Tree};

use crate::{GraphError, Result};

/// Wraps a tree-sitter parser configured for the Python grammar.
///
/// Parsing is best-effort: structurally invalid input still yields a tree
/// containing error nodes, so this stage never fails on malformed syntax.
/// The only hard failure is the grammar not loading.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| GraphError::Grammar(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse source text into a concrete syntax tree.
    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| GraphError::TreeSitter("parser produced no tree".to_string()))
    }
}

impl std::fmt::Debug for SourceParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceParser").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_source() {
        let mut parser = SourceParser::new().unwrap();
        let tree = parser.parse("def hello():\n    pass\n").unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn malformed_source_still_yields_a_tree() {
        let mut parser = SourceParser::new().unwrap();
        let tree = parser.parse("def broken(:\n    pass\n").unwrap();
        assert!(tree.root_node().has_error());
        assert!(tree.root_node().child_count() > 0);
    }

    #[test]
    fn empty_source_yields_empty_module() {
        let mut parser = SourceParser::new().unwrap();
        let tree = parser.parse("").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
        assert_eq!(tree.root_node().child_count(), 0);
    }
}

//! Structural extraction engine — tree-sitter parsing, fixed structure
//! queries, and call-graph assembly.
//!
//! The main entry point is [`SourceAnalyzer`], which runs the
//! parse → query → build pipeline over one source file and returns the
//! [`CodeStructure`] handoff artifact.

pub mod builder;
pub mod parser;
pub mod query;
pub mod structure;

use serde::{Deserialize, Serialize};

pub use builder::build_structure;
pub use parser::SourceParser;
pub use query::{StructureCapture, StructureQueryEngine};
pub use structure::{ClassEntry, CodeStructure, FunctionEntry};

/// Error type for the extraction engine.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    /// The bundled grammar could not be loaded into the parser.
    /// A startup-time condition, never a per-file one.
    #[error("Cannot load Python grammar: {0}")]
    Grammar(String),

    /// A fixed structure query does not compile against the grammar.
    #[error("Query compile error: {0}")]
    Query(String),

    /// Tree-sitter declined to produce a tree.
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

// ── Span type ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl From<tree_sitter::Range> for TextRange {
    fn from(r: tree_sitter::Range) -> Self {
        Self {
            start_byte: r.start_byte,
            end_byte: r.end_byte,
            start_row: r.start_point.row,
            start_col: r.start_point.column,
            end_row: r.end_point.row,
            end_col: r.end_point.column,
        }
    }
}

// ── Analyzer ───────────────────────────────────────────────────────

/// One-stop extraction: parse → query → build.
///
/// The syntax tree and capture sequence are transient, scoped to a single
/// [`analyze`](SourceAnalyzer::analyze) call; only the returned
/// [`CodeStructure`] survives.
pub struct SourceAnalyzer {
    parser: SourceParser,
    engine: StructureQueryEngine,
}

impl SourceAnalyzer {
    /// Initialize the parser and compile the fixed queries.
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: SourceParser::new()?,
            engine: StructureQueryEngine::new()?,
        })
    }

    /// Extract the structural summary of one source file.
    ///
    /// Malformed input is tolerated: the parse is best-effort and simply
    /// yields fewer facts.
    pub fn analyze(&mut self, source: &str) -> Result<CodeStructure> {
        let tree = self.parser.parse(source)?;
        let captures = self.engine.captures(&tree, source);
        Ok(build_structure(&captures))
    }
}

impl std::fmt::Debug for SourceAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceAnalyzer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzer_extracts_simple_structure() {
        let mut analyzer = SourceAnalyzer::new().unwrap();
        let structure = analyzer
            .analyze("def a():\n    b()\n\ndef b():\n    pass\n")
            .unwrap();

        assert_eq!(structure.functions.len(), 2);
        assert_eq!(structure.functions["a"].calls, vec!["b".to_string()]);
        assert!(structure.functions["b"].calls.is_empty());
    }

    #[test]
    fn analyzer_is_reusable_across_files() {
        let mut analyzer = SourceAnalyzer::new().unwrap();
        let first = analyzer.analyze("def a():\n    pass\n").unwrap();
        let second = analyzer.analyze("def b():\n    pass\n").unwrap();

        assert!(first.functions.contains_key("a"));
        assert!(!second.functions.contains_key("a"));
        assert!(second.functions.contains_key("b"));
    }
}

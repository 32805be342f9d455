//! Diagram generation and rendering.
//!
//! The generation half turns a [`CodeStructure`] into a Graphviz DOT
//! description; the rendering half hands any description to the external
//! `dot` executable. Collaborator-supplied descriptions pass through
//! verbatim.

pub mod graphviz;

use std::collections::BTreeSet;
use std::fmt::Write;

use vitruv_graphs::CodeStructure;

pub use graphviz::GraphvizRenderer;

/// A textual directed-graph description accepted verbatim by Graphviz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDescription(String);

impl GraphDescription {
    /// Wrap an externally supplied description (e.g. collaborator output).
    pub fn from_dot(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GraphDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate the "before" diagram description from an extracted structure.
///
/// One node per function labeled with its call signature, one edge per
/// caller/callee pair where the callee is defined in the same structure.
/// Repeat calls collapse to a single edge; calls to names defined elsewhere
/// stay recorded in the structure but are not drawn. Returns `None` when
/// there are no functions, so callers can skip the renderer entirely.
pub fn dot_from_structure(structure: &CodeStructure) -> Option<GraphDescription> {
    if structure.functions.is_empty() {
        return None;
    }

    let mut out = String::new();
    let _ = writeln!(out, "digraph legacy_architecture {{");
    let _ = writeln!(out, "  labelloc=t;");
    let _ = writeln!(out, "  label=\"Original Architecture\";");
    let _ = writeln!(out, "  fontsize=16;");
    let _ = writeln!(out, "  node [shape=box, style=rounded];");

    for name in structure.functions.keys() {
        let _ = writeln!(out, "  \"{0}\" [label=\"{0}()\"];", escape(name));
    }

    let mut edges: BTreeSet<(&str, &str)> = BTreeSet::new();
    for (caller, entry) in &structure.functions {
        for callee in &entry.calls {
            if structure.functions.contains_key(callee) {
                edges.insert((caller.as_str(), callee.as_str()));
            }
        }
    }
    for (caller, callee) in edges {
        let _ = writeln!(out, "  \"{}\" -> \"{}\";", escape(caller), escape(callee));
    }

    let _ = writeln!(out, "}}");
    Some(GraphDescription(out))
}

/// Escape a name for use inside a double-quoted DOT identifier.
fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use vitruv_graphs::FunctionEntry;

    fn structure_with(entries: &[(&str, &[&str])]) -> CodeStructure {
        let mut structure = CodeStructure::default();
        for (name, calls) in entries {
            structure.functions.insert(
                (*name).to_string(),
                FunctionEntry {
                    calls: calls.iter().map(|c| (*c).to_string()).collect(),
                },
            );
        }
        structure
    }

    #[test]
    fn empty_structure_has_nothing_to_draw() {
        assert!(dot_from_structure(&CodeStructure::default()).is_none());

        // Global calls alone do not make a diagram.
        let mut structure = CodeStructure::default();
        structure.global_calls.push("print".to_string());
        assert!(dot_from_structure(&structure).is_none());
    }

    #[test]
    fn local_call_draws_exactly_one_edge() {
        let structure = structure_with(&[("a", &["b"]), ("b", &[])]);
        let dot = dot_from_structure(&structure).unwrap();
        assert_eq!(dot.as_str().matches("\"a\" -> \"b\";").count(), 1);
    }

    #[test]
    fn repeat_calls_collapse_to_one_edge() {
        let structure = structure_with(&[("a", &["b", "b", "b"]), ("b", &[])]);
        let dot = dot_from_structure(&structure).unwrap();
        assert_eq!(dot.as_str().matches("\"a\" -> \"b\";").count(), 1);
    }

    #[test]
    fn external_callees_are_not_drawn() {
        let structure = structure_with(&[("a", &["print", "len"])]);
        let dot = dot_from_structure(&structure).unwrap();
        assert!(!dot.as_str().contains("->"));
        assert!(dot.as_str().contains("\"a\" [label=\"a()\"];"));
    }

    #[test]
    fn nodes_carry_call_signature_labels() {
        let structure = structure_with(&[("process", &[])]);
        let dot = dot_from_structure(&structure).unwrap();
        assert!(dot.as_str().contains("\"process\" [label=\"process()\"];"));
        assert!(dot.as_str().starts_with("digraph legacy_architecture {"));
    }

    #[test]
    fn generation_is_deterministic() {
        let structure = structure_with(&[("a", &["b", "c"]), ("b", &["c"]), ("c", &[])]);
        let first = dot_from_structure(&structure).unwrap();
        let second = dot_from_structure(&structure).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn quotes_in_names_are_escaped() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("we\"ird"), "we\\\"ird");
    }
}

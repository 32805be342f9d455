//! Declarative structure queries over the syntax tree.
//!
//! Two fixed queries recover definitions and call sites. Their captures are
//! merged into a single sequence sorted by document position; downstream
//! assembly relies on a function-name capture preceding the call captures
//! that lexically belong to its body.

use tree_sitter::{Query, QueryCursor, StreamingIterator, Tree};

use crate::{GraphError, Result, TextRange};

/// Matches every function definition, capturing the name identifier and the
/// whole definition node. The definition node bounds the function's lexical
/// scope for call attribution.
const DEFINITION_QUERY: &str = r"
(function_definition
  name: (identifier) @function.name) @function.def
";

/// Matches call expressions anywhere in the tree: attribute calls through the
/// method-name slot, bare calls through the direct-call slot. Both collapse
/// to the callee-name tag downstream. Matching is not restricted to function
/// bodies so module-level calls can accumulate into `global_calls`.
const CALL_QUERY: &str = r"
(call
  function: (attribute
    attribute: (identifier) @method.name)) @call.site

(call
  function: (identifier) @function.call) @call.site
";

/// A syntax node tagged with the pattern slot it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureCapture {
    /// A function definition's name; `def_span` covers the whole definition.
    FunctionName { name: String, def_span: TextRange },
    /// A call expression node. Positional only; the callee name carries the
    /// fact the builder consumes.
    CallSite { span: TextRange },
    /// The textual name a call resolves through, whether a method name or a
    /// bare identifier.
    CalleeName { name: String, span: TextRange },
}

impl StructureCapture {
    /// Sort key restoring document order across the two query runs.
    /// The second component is a fixed tie-break so identical input always
    /// yields an identical sequence.
    fn anchor(capture: &Self) -> (usize, u8) {
        match capture {
            Self::FunctionName { def_span, .. } => (def_span.start_byte, 0),
            Self::CallSite { span } => (span.start_byte, 1),
            Self::CalleeName { span, .. } => (span.start_byte, 2),
        }
    }
}

/// Executes the fixed structure queries, yielding captures in document order.
pub struct StructureQueryEngine {
    definitions: Query,
    calls: Query,
}

impl StructureQueryEngine {
    /// Compile the fixed queries. Like grammar loading, a compile failure is
    /// a startup-time condition.
    pub fn new() -> Result<Self> {
        let language = tree_sitter_python::LANGUAGE.into();
        let definitions = Query::new(&language, DEFINITION_QUERY)
            .map_err(|e| GraphError::Query(e.to_string()))?;
        let calls =
            Query::new(&language, CALL_QUERY).map_err(|e| GraphError::Query(e.to_string()))?;
        Ok(Self { definitions, calls })
    }

    /// Run both queries and merge their captures into document order.
    pub fn captures(&self, tree: &Tree, source: &str) -> Vec<StructureCapture> {
        let mut out = self.definition_captures(tree, source);
        out.extend(self.call_captures(tree, source));
        out.sort_by_key(StructureCapture::anchor);
        out
    }

    fn definition_captures(&self, tree: &Tree, source: &str) -> Vec<StructureCapture> {
        let names = self.definitions.capture_names();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(&self.definitions, tree.root_node(), source.as_bytes());

        let mut out = Vec::new();
        while let Some((m, idx)) = captures.next() {
            let cap = m.captures[*idx];
            if names[cap.index as usize] != "function.name" {
                continue;
            }
            // The sibling capture in the same match carries the scope extent.
            let Some(def) = m
                .captures
                .iter()
                .find(|c| names[c.index as usize] == "function.def")
            else {
                continue;
            };
            out.push(StructureCapture::FunctionName {
                name: source[cap.node.byte_range()].to_string(),
                def_span: def.node.range().into(),
            });
        }
        out
    }

    fn call_captures(&self, tree: &Tree, source: &str) -> Vec<StructureCapture> {
        let names = self.calls.capture_names();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(&self.calls, tree.root_node(), source.as_bytes());

        let mut out = Vec::new();
        while let Some((m, idx)) = captures.next() {
            let cap = m.captures[*idx];
            match names[cap.index as usize] {
                "call.site" => out.push(StructureCapture::CallSite {
                    span: cap.node.range().into(),
                }),
                "method.name" | "function.call" => out.push(StructureCapture::CalleeName {
                    name: source[cap.node.byte_range()].to_string(),
                    span: cap.node.range().into(),
                }),
                _ => {}
            }
        }
        out
    }
}

impl std::fmt::Debug for StructureQueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureQueryEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceParser;

    fn capture(source: &str) -> Vec<StructureCapture> {
        let mut parser = SourceParser::new().unwrap();
        let tree = parser.parse(source).unwrap();
        StructureQueryEngine::new().unwrap().captures(&tree, source)
    }

    fn start_byte(capture: &StructureCapture) -> usize {
        match capture {
            StructureCapture::FunctionName { def_span, .. } => def_span.start_byte,
            StructureCapture::CallSite { span } | StructureCapture::CalleeName { span, .. } => {
                span.start_byte
            }
        }
    }

    #[test]
    fn captures_are_in_document_order() {
        let caps = capture("def a():\n    b()\n\ndef c():\n    d()\n");
        let anchors: Vec<usize> = caps.iter().map(start_byte).collect();
        let mut sorted = anchors.clone();
        sorted.sort_unstable();
        assert_eq!(anchors, sorted);
    }

    #[test]
    fn function_name_precedes_its_body_calls() {
        let caps = capture("def a():\n    b()\n");
        let def_pos = caps
            .iter()
            .position(|c| matches!(c, StructureCapture::FunctionName { name, .. } if name == "a"))
            .expect("function capture");
        let call_pos = caps
            .iter()
            .position(|c| matches!(c, StructureCapture::CalleeName { name, .. } if name == "b"))
            .expect("callee capture");
        assert!(def_pos < call_pos);
    }

    #[test]
    fn attribute_and_bare_calls_collapse_to_callee_name() {
        let caps = capture("def a():\n    obj.save()\n    load()\n");
        let callees: Vec<&str> = caps
            .iter()
            .filter_map(|c| match c {
                StructureCapture::CalleeName { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(callees, vec!["save", "load"]);
    }

    #[test]
    fn every_call_site_pairs_with_a_callee_name() {
        let caps = capture("ping()\n\ndef a():\n    obj.method()\n");
        let sites = caps
            .iter()
            .filter(|c| matches!(c, StructureCapture::CallSite { .. }))
            .count();
        let callees = caps
            .iter()
            .filter(|c| matches!(c, StructureCapture::CalleeName { .. }))
            .count();
        assert_eq!(sites, callees);
        assert_eq!(sites, 2);
    }

    #[test]
    fn definition_span_covers_the_whole_body() {
        let source = "def a():\n    b()\n";
        let caps = capture(source);
        let Some(StructureCapture::FunctionName { def_span, .. }) = caps.first() else {
            panic!("expected a function capture first, got {caps:?}");
        };
        assert_eq!(def_span.start_byte, 0);
        assert!(def_span.end_byte >= source.trim_end().len());
    }
}

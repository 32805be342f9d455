//! Assembly of the ordered capture sequence into a [`CodeStructure`].

use tracing::warn;

use crate::query::StructureCapture;
use crate::structure::{CodeStructure, FunctionEntry};

/// A lexical function scope bounded by its definition node's byte range.
struct ScopeFrame {
    name: String,
    end_byte: usize,
}

/// Fold the ordered capture sequence into a `CodeStructure`.
///
/// Scope tracking is an explicit stack keyed by definition spans: a
/// function-name capture pushes a frame that stays active until the document
/// position moves past the definition's end. Calls lexically following a
/// nested definition therefore still attribute to the enclosing function.
/// Calls outside every function accumulate into `global_calls`.
pub fn build_structure(captures: &[StructureCapture]) -> CodeStructure {
    let mut structure = CodeStructure::default();
    let mut stack: Vec<ScopeFrame> = Vec::new();

    for capture in captures {
        match capture {
            StructureCapture::FunctionName { name, def_span } => {
                pop_expired(&mut stack, def_span.start_byte);
                if structure.functions.contains_key(name) {
                    // Python rebinding semantics: the later definition wins
                    // and the earlier entry's recorded calls are discarded.
                    warn!(
                        function = %name,
                        "duplicate definition; later definition replaces earlier"
                    );
                }
                structure
                    .functions
                    .insert(name.clone(), FunctionEntry::default());
                stack.push(ScopeFrame {
                    name: name.clone(),
                    end_byte: def_span.end_byte,
                });
            }
            StructureCapture::CalleeName { name, span } => {
                pop_expired(&mut stack, span.start_byte);
                match stack.last() {
                    Some(frame) => {
                        if let Some(entry) = structure.functions.get_mut(&frame.name) {
                            entry.calls.push(name.clone());
                        }
                    }
                    None => structure.global_calls.push(name.clone()),
                }
            }
            StructureCapture::CallSite { .. } => {}
        }
    }

    structure
}

fn pop_expired(stack: &mut Vec<ScopeFrame>, position: usize) {
    while stack.last().is_some_and(|frame| frame.end_byte <= position) {
        stack.pop();
    }
}

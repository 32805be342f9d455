//! The extracted structural summary — the pipeline's durable handoff
//! artifact, immutable once the builder returns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One function definition and the callee names recorded in its body, in
/// document order. Duplicates are kept: fan-out counts matter even though the
/// diagram layer collapses repeat calls to a single edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub calls: Vec<String>,
}

/// Placeholder for class-level facts. No query populates it yet; the type is
/// kept so the serialized boundary format always carries a `classes` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {}

/// The structural summary of one source file.
///
/// `BTreeMap` keys keep iteration and serialization byte-identical across
/// runs on identical input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeStructure {
    pub functions: BTreeMap<String, FunctionEntry>,
    pub classes: BTreeMap<String, ClassEntry>,
    pub global_calls: Vec<String>,
}

impl CodeStructure {
    /// True when extraction found nothing at all.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty() && self.global_calls.is_empty()
    }
}

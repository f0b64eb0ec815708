//! Collision-free names for synthesized bindings.

use std::collections::HashSet;

use swc_common::DUMMY_SP;
use swc_ecma_visit::{Visit, VisitWith};
use wxc_ast::{Ident, Module};

const RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "new",
    "null", "package", "private", "protected", "public", "return", "static", "super", "switch",
    "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Hands out identifiers that clash with nothing already in a module.
///
/// Seeded with every identifier the module mentions; each name handed out
/// is taken for the rest of the transform call.
#[derive(Debug, Default)]
pub struct UniqueNames {
    used: HashSet<String>,
}

impl UniqueNames {
    pub fn for_module(module: &Module) -> Self {
        let mut collector = IdentCollector::default();
        module.visit_with(&mut collector);
        Self { used: collector.names }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// `base` itself if free and not a reserved word, else the first free
    /// `base_1`, `base_2`, ….
    pub fn fresh(&mut self, base: &str) -> Ident {
        let name = if !self.is_used(base) && !RESERVED.contains(&base) {
            base.to_string()
        } else {
            (1..)
                .map(|n| format!("{base}_{n}"))
                .find(|candidate| !self.is_used(candidate))
                .unwrap_or_default()
        };
        self.used.insert(name.clone());
        Ident::new_no_ctxt(name.into(), DUMMY_SP)
    }
}

#[derive(Default)]
struct IdentCollector {
    names: HashSet<String>,
}

impl Visit for IdentCollector {
    fn visit_ident(&mut self, node: &Ident) {
        self.names.insert(node.sym.to_string());
    }
}

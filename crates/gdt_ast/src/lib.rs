//! Shared model for the TypeScript → GDScript transpiler.
//!
//! Defines the units the transpilation engine passes around:
//!
//! - [`Fragment`] — rendered GDScript text plus pending side effects
//! - [`SideEffect`] — a deferred mutation hoisted to a statement boundary
//! - [`Diagnostic`] — an unsupported-construct report carried on fragments
//! - [`TranspileConfig`] — reserved words, call overrides, bare constructors

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A mutation the GDScript grammar cannot express at its original expression
/// position. Recorded while translating the expression and materialized as a
/// standalone statement immediately after the enclosing statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// `x++` — the expression yields `x`, then `x = x + 1` is hoisted.
    PostIncrement { target: String },
    /// `x--` — the expression yields `x`, then `x = x - 1` is hoisted.
    PostDecrement { target: String },
}

impl SideEffect {
    /// The rewrite rule: the statement text this effect flushes to.
    pub fn render(&self) -> String {
        match self {
            SideEffect::PostIncrement { target } => format!("{target} = {target} + 1"),
            SideEffect::PostDecrement { target } => format!("{target} = {target} - 1"),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            SideEffect::PostIncrement { target } | SideEffect::PostDecrement { target } => target,
        }
    }
}

/// A per-node problem report. Carried on fragments rather than raised, so
/// sibling nodes keep transpiling and partial output stays available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    /// 1-based source line.
    pub line: usize,
    /// 1-based source column.
    pub col: usize,
    /// Grammar kind name of the offending node, e.g. `ArrowFunctionExpression`.
    pub kind: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: unsupported {}: {}",
            self.file, self.line, self.col, self.kind, self.message
        )
    }
}

/// The unit a handler returns: GDScript text plus everything that still has
/// to travel up to a statement boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub content: String,
    /// Pending deferred mutations, in left-to-right discovery order.
    pub effects: Vec<SideEffect>,
    /// Unsupported-construct reports, carried all the way to the file result.
    pub diagnostics: Vec<Diagnostic>,
}

impl Fragment {
    /// A fragment with plain text and nothing pending.
    pub fn text(content: impl Into<String>) -> Self {
        Fragment {
            content: content.into(),
            ..Fragment::default()
        }
    }

    /// A fragment whose only payload is a diagnostic; content stays empty.
    pub fn unsupported(diagnostic: Diagnostic) -> Self {
        Fragment {
            content: String::new(),
            effects: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }

    /// Attach one more deferred mutation.
    pub fn with_effect(mut self, effect: SideEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Replace the rendered text, keeping pending effects and diagnostics.
    pub fn map(mut self, f: impl FnOnce(String) -> String) -> Self {
        self.content = f(std::mem::take(&mut self.content));
        self
    }

    pub fn is_pure(&self) -> bool {
        self.effects.is_empty()
    }
}

/// How a well-known call is reshaped for the Godot API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOverride {
    /// Rename the method, keep receiver and arguments: `arr.push(x)` → `arr.append(x)`.
    RenameMethod(&'static str),
    /// Replace `Receiver.method(args)` with a global builtin: `Math.floor(x)` → `floor(x)`.
    GlobalFunction(&'static str),
}

/// Target-language configuration consulted by the handlers.
///
/// Keeps the dispatch table itself name-agnostic: everything that special-cases
/// a literal identifier lives in these lookup tables.
#[derive(Debug, Clone)]
pub struct TranspileConfig {
    call_overrides: HashMap<&'static str, CallOverride>,
    bare_constructors: HashSet<&'static str>,
    reserved_words: HashSet<&'static str>,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        let call_overrides = HashMap::from([
            ("console.log", CallOverride::GlobalFunction("print")),
            ("console.error", CallOverride::GlobalFunction("printerr")),
            ("Math.floor", CallOverride::GlobalFunction("floor")),
            ("Math.ceil", CallOverride::GlobalFunction("ceil")),
            ("Math.round", CallOverride::GlobalFunction("round")),
            ("Math.abs", CallOverride::GlobalFunction("abs")),
            ("Math.sqrt", CallOverride::GlobalFunction("sqrt")),
            ("Math.pow", CallOverride::GlobalFunction("pow")),
            ("Math.min", CallOverride::GlobalFunction("min")),
            ("Math.max", CallOverride::GlobalFunction("max")),
            ("Math.random", CallOverride::GlobalFunction("randf")),
            ("push", CallOverride::RenameMethod("append")),
            ("indexOf", CallOverride::RenameMethod("find")),
            ("includes", CallOverride::RenameMethod("has")),
        ]);

        // Engine value types constructed without `new`, e.g. `Vector2(1, 2)`.
        let bare_constructors = HashSet::from([
            "Vector2", "Vector2i", "Vector3", "Vector3i", "Rect2", "Color",
        ]);

        // GDScript keywords that are legal TypeScript identifiers.
        let reserved_words = HashSet::from([
            "pass", "func", "elif", "match", "signal", "tool", "onready", "preload",
            "assert", "breakpoint", "self", "setget", "remote", "master", "puppet",
            "sync",
        ]);

        TranspileConfig {
            call_overrides,
            bare_constructors,
            reserved_words,
        }
    }
}

impl TranspileConfig {
    /// Look up an override for a member call. `qualified` is `receiver.method`
    /// (checked first, for namespace calls like `Math.floor`); `method` alone
    /// covers receiver-independent renames like `push`.
    pub fn call_override(&self, qualified: &str, method: &str) -> Option<CallOverride> {
        self.call_overrides
            .get(qualified)
            .or_else(|| self.call_overrides.get(method))
            .copied()
    }

    /// Whether `name` is an engine value type called as a plain function.
    pub fn is_bare_constructor(&self, name: &str) -> bool {
        self.bare_constructors.contains(name)
    }

    /// Deterministic reserved-word renaming: collisions get a `_` suffix.
    pub fn rename_if_reserved(&self, name: &str) -> String {
        if self.reserved_words.contains(name) {
            format!("{name}_")
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_effect_rewrite_rules() {
        let inc = SideEffect::PostIncrement { target: "x".into() };
        let dec = SideEffect::PostDecrement { target: "n".into() };
        assert_eq!(inc.render(), "x = x + 1");
        assert_eq!(dec.render(), "n = n - 1");
    }

    #[test]
    fn reserved_words_get_suffixed() {
        let config = TranspileConfig::default();
        assert_eq!(config.rename_if_reserved("pass"), "pass_");
        assert_eq!(config.rename_if_reserved("velocity"), "velocity");
    }

    #[test]
    fn qualified_override_wins_over_bare_method() {
        let config = TranspileConfig::default();
        assert_eq!(
            config.call_override("Math.floor", "floor"),
            Some(CallOverride::GlobalFunction("floor"))
        );
        assert_eq!(
            config.call_override("arr.push", "push"),
            Some(CallOverride::RenameMethod("append"))
        );
        assert_eq!(config.call_override("foo.bar", "bar"), None);
    }
}

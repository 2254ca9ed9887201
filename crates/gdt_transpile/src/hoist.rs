//! The hoisting resolver: the only place side effects are materialized.
//!
//! Handlers and the combinator propagate pending effects; at every statement
//! boundary the enclosing renderer calls [`flush`], which emits the statement
//! text followed by one standalone statement per pending effect, in discovery
//! order. The effect list never survives above a statement boundary.

use gdt_ast::{Diagnostic, Fragment};

use crate::context::ParseContext;

/// Resolve a statement fragment at its boundary.
///
/// Returns the statement's output lines (statement text first, then each
/// hoisted side effect at the same indent) plus the diagnostics to carry on.
/// Consumes the fragment: a flushed effect can never be flushed twice.
pub fn flush(fragment: Fragment, ctx: ParseContext<'_>) -> (Vec<String>, Vec<Diagnostic>) {
    let mut lines: Vec<String> = if fragment.content.is_empty() {
        Vec::new()
    } else {
        fragment.content.lines().map(str::to_string).collect()
    };

    let indent = ctx.indent_str();
    for effect in fragment.effects {
        lines.push(format!("{indent}{}", effect.render()));
    }

    (lines, fragment.diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdt_ast::{SideEffect, TranspileConfig};
    use swc_common::SourceMap;

    #[test]
    fn flush_appends_effects_after_statement_text() {
        let source_map = SourceMap::default();
        let config = TranspileConfig::default();
        let ctx = ParseContext::new("test.ts", &source_map, None, &config);

        let fragment = Fragment::text("var y = x")
            .with_effect(SideEffect::PostIncrement { target: "x".into() });
        let (lines, diagnostics) = flush(fragment, ctx);

        assert_eq!(lines, vec!["var y = x".to_string(), "x = x + 1".to_string()]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn flush_indents_effects_to_the_statement_level() {
        let source_map = SourceMap::default();
        let config = TranspileConfig::default();
        let ctx = ParseContext::new("test.ts", &source_map, None, &config).indented();

        let fragment =
            Fragment::default().with_effect(SideEffect::PostDecrement { target: "n".into() });
        let (lines, _) = flush(fragment, ctx);

        assert_eq!(lines, vec!["    n = n - 1".to_string()]);
    }
}

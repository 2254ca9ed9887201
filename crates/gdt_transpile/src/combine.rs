//! The state-threading combinator every handler recurses through.
//!
//! A parent handler hands its children to [`combine`] together with a
//! composition closure. The combinator dispatches each child in order,
//! concatenates their side-effect lists (per-child internal order and overall
//! argument order both preserved), and applies the closure to the children's
//! rendered texts. Because every handler goes through here, side-effect
//! ordering is a structural property of tree shape, not of any individual
//! handler.

use gdt_ast::Fragment;

use crate::context::ParseContext;
use crate::node::{dispatch, SyntaxNode};

/// Dispatch `children` in order and compose their texts into the parent's.
pub fn combine<'a, F>(
    ctx: ParseContext<'_>,
    children: impl IntoIterator<Item = SyntaxNode<'a>>,
    compose: F,
) -> Fragment
where
    F: FnOnce(&[String]) -> String,
{
    let fragments: Vec<Fragment> = children
        .into_iter()
        .map(|child| dispatch(child, ctx))
        .collect();
    merge(fragments, compose)
}

/// Single-child convenience over [`combine`].
pub fn combine_one<F>(ctx: ParseContext<'_>, child: SyntaxNode<'_>, compose: F) -> Fragment
where
    F: FnOnce(&str) -> String,
{
    combine(ctx, [child], |texts| compose(&texts[0]))
}

/// Compose already-dispatched fragments. [`combine`] reduces to this; it is
/// also used directly where children need per-child handling (call overrides,
/// template pieces) before composition.
pub fn merge<F>(parts: Vec<Fragment>, compose: F) -> Fragment
where
    F: FnOnce(&[String]) -> String,
{
    let mut effects = Vec::new();
    let mut diagnostics = Vec::new();
    let mut texts = Vec::with_capacity(parts.len());
    for part in parts {
        effects.extend(part.effects);
        diagnostics.extend(part.diagnostics);
        texts.push(part.content);
    }
    Fragment {
        content: compose(&texts),
        effects,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdt_ast::SideEffect;

    #[test]
    fn merge_preserves_cross_child_effect_order() {
        let first = Fragment::text("a").with_effect(SideEffect::PostIncrement {
            target: "a".into(),
        });
        let second = Fragment::text("b").with_effect(SideEffect::PostDecrement {
            target: "b".into(),
        });

        let merged = merge(vec![first, second], |texts| texts.join(", "));

        assert_eq!(merged.content, "a, b");
        assert_eq!(
            merged.effects,
            vec![
                SideEffect::PostIncrement { target: "a".into() },
                SideEffect::PostDecrement { target: "b".into() },
            ]
        );
    }

    #[test]
    fn composition_may_reorder_text_but_not_effects() {
        let first = Fragment::text("cond").with_effect(SideEffect::PostIncrement {
            target: "x".into(),
        });
        let second = Fragment::text("then").with_effect(SideEffect::PostIncrement {
            target: "y".into(),
        });

        // Ternary-style composition puts the test in the middle of the text.
        let merged = merge(vec![first, second], |t| {
            format!("{} if {} else 0", t[1], t[0])
        });

        assert_eq!(merged.content, "then if cond else 0");
        assert_eq!(merged.effects[0].target(), "x");
        assert_eq!(merged.effects[1].target(), "y");
    }
}

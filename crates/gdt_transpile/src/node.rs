//! Dispatch over grammar kind.
//!
//! Wraps the SWC node categories the transpiler recurses into behind one
//! closed enum so the combinator can treat heterogeneous children uniformly.
//! Exhaustiveness is compiler-enforced: a grammar kind without a handler
//! reaches an explicit unsupported arm, never silent empty output.

use gdt_ast::Fragment;
use swc_common::Spanned;
use swc_ecma_ast as ast;

use crate::context::ParseContext;
use crate::{expr, stmt};

/// A syntax node the dispatcher can route.
#[derive(Clone, Copy)]
pub enum SyntaxNode<'a> {
    Expr(&'a ast::Expr),
    Stmt(&'a ast::Stmt),
    Pat(&'a ast::Pat),
}

/// Route a node to the handler registered for its grammar kind.
///
/// Pure function of its inputs: returns a fragment, carrying a diagnostic
/// when the kind has no handler.
pub fn dispatch(node: SyntaxNode<'_>, ctx: ParseContext<'_>) -> Fragment {
    match node {
        SyntaxNode::Expr(e) => expr::transpile_expr(e, ctx),
        SyntaxNode::Stmt(s) => stmt::transpile_stmt(s, ctx),
        SyntaxNode::Pat(p) => binding_name(p, ctx),
    }
}

/// Render a binding pattern as a plain name. GDScript has no destructuring,
/// so only identifier patterns are supported.
pub fn binding_name(pat: &ast::Pat, ctx: ParseContext<'_>) -> Fragment {
    match pat {
        ast::Pat::Ident(bi) => Fragment::text(ctx.config.rename_if_reserved(&bi.id.sym)),
        other => ctx.unsupported(
            other.span(),
            "BindingPattern",
            "destructuring bindings are not supported",
        ),
    }
}

//! Statement handlers.
//!
//! A statement fragment's `content` arrives fully indented; any effects still
//! pending on it belong to the statement's own header expressions (condition,
//! initializer) and are flushed by whoever owns the statement boundary.
//! Nested bodies are flushed here, at their own inner boundaries.

use gdt_ast::{Diagnostic, Fragment};
use swc_common::Spanned;
use swc_ecma_ast as ast;

use crate::combine::{combine, combine_one, merge};
use crate::context::ParseContext;
use crate::expr::{transpile_expr, update_effect};
use crate::node::{binding_name, SyntaxNode};
use crate::{class, hoist, literal};

pub fn transpile_stmt(stmt: &ast::Stmt, ctx: ParseContext<'_>) -> Fragment {
    match stmt {
        ast::Stmt::Decl(decl) => transpile_decl(decl, ctx),
        ast::Stmt::Expr(e) => expr_stmt(&e.expr, ctx),
        ast::Stmt::Return(r) => return_stmt(r, ctx),
        ast::Stmt::If(s) => if_stmt(s, ctx),
        ast::Stmt::While(s) => while_stmt(s, ctx),
        ast::Stmt::For(s) => for_stmt(s, ctx),
        ast::Stmt::ForOf(s) => for_of_stmt(s, ctx),
        ast::Stmt::ForIn(s) => for_in_stmt(s, ctx),
        ast::Stmt::Switch(s) => switch_stmt(s, ctx),
        ast::Stmt::Block(b) => {
            // A bare block only scopes names in TypeScript; GDScript keeps
            // the statements at the same level.
            let (lines, diagnostics) = render_block(&b.stmts, ctx);
            Fragment {
                content: lines.join("\n"),
                effects: Vec::new(),
                diagnostics,
            }
        }
        ast::Stmt::Break(b) => jump_stmt("break", b.label.as_ref(), b.span, ctx),
        ast::Stmt::Continue(c) => jump_stmt("continue", c.label.as_ref(), c.span, ctx),
        ast::Stmt::Debugger(_) => Fragment::text(format!("{}breakpoint", ctx.indent_str())),
        ast::Stmt::Empty(_) => Fragment::default(),
        ast::Stmt::Throw(t) => ctx.unsupported(
            t.span,
            "ThrowStatement",
            "GDScript has no exceptions; use push_error and early return",
        ),
        ast::Stmt::Try(t) => ctx.unsupported(t.span, "TryStatement", "GDScript has no exceptions"),
        ast::Stmt::DoWhile(d) => ctx.unsupported(
            d.span,
            "DoWhileStatement",
            "rewrite as a while loop with a leading iteration",
        ),
        ast::Stmt::Labeled(l) => {
            ctx.unsupported(l.span, "LabeledStatement", "labels are not supported")
        }
        ast::Stmt::With(w) => ctx.unsupported(w.span, "WithStatement", "no GDScript equivalent"),
    }
}

pub fn transpile_decl(decl: &ast::Decl, ctx: ParseContext<'_>) -> Fragment {
    match decl {
        ast::Decl::Var(v) => var_decl(v, ctx),
        ast::Decl::Fn(f) => class::render_function(
            &ctx.config.rename_if_reserved(&f.ident.sym),
            &f.function,
            false,
            ctx,
        ),
        ast::Decl::Class(c) => class::inner_class(&c.ident, &c.class, ctx),
        ast::Decl::TsEnum(e) => enum_decl(e, ctx),
        // Type-only declarations have no runtime footprint.
        ast::Decl::TsInterface(_) | ast::Decl::TsTypeAlias(_) | ast::Decl::TsModule(_) => {
            Fragment::default()
        }
        ast::Decl::Using(u) => {
            ctx.unsupported(u.span, "UsingDeclaration", "using declarations are not supported")
        }
    }
}

/// Flush every statement of a block at its own boundary.
pub fn render_block(stmts: &[ast::Stmt], ctx: ParseContext<'_>) -> (Vec<String>, Vec<Diagnostic>) {
    let mut lines = Vec::new();
    let mut diagnostics = Vec::new();
    for stmt in stmts {
        let (l, d) = hoist::flush(transpile_stmt(stmt, ctx), ctx);
        lines.extend(l);
        diagnostics.extend(d);
    }
    (lines, diagnostics)
}

/// Render a loop or branch body one level deeper, falling back to `pass`.
fn body_lines(stmt: &ast::Stmt, ctx: ParseContext<'_>) -> (Vec<String>, Vec<Diagnostic>) {
    let (lines, diagnostics) = match stmt {
        ast::Stmt::Block(b) => render_block(&b.stmts, ctx),
        other => {
            let frag = transpile_stmt(other, ctx);
            hoist::flush(frag, ctx)
        }
    };
    if lines.is_empty() {
        (vec![format!("{}pass", ctx.indent_str())], diagnostics)
    } else {
        (lines, diagnostics)
    }
}

fn expr_stmt(expr: &ast::Expr, ctx: ParseContext<'_>) -> Fragment {
    if let ast::Expr::Update(u) = expr {
        // The discarded value would render as a bare identifier; the hoisted
        // rewrite is the whole statement.
        let frag = update_effect(u, ctx);
        return Fragment {
            content: String::new(),
            ..frag
        };
    }
    transpile_expr(expr, ctx).map(|content| format!("{}{content}", ctx.indent_str()))
}

fn return_stmt(r: &ast::ReturnStmt, ctx: ParseContext<'_>) -> Fragment {
    match &r.arg {
        Some(arg) => combine_one(ctx, SyntaxNode::Expr(arg), |v| {
            format!("{}return {v}", ctx.indent_str())
        }),
        None => Fragment::text(format!("{}return", ctx.indent_str())),
    }
}

fn jump_stmt(
    keyword: &str,
    label: Option<&ast::Ident>,
    span: swc_common::Span,
    ctx: ParseContext<'_>,
) -> Fragment {
    if label.is_some() {
        return ctx.unsupported(span, "LabeledJump", "labeled break/continue is not supported");
    }
    Fragment::text(format!("{}{keyword}", ctx.indent_str()))
}

fn if_stmt(stmt: &ast::IfStmt, ctx: ParseContext<'_>) -> Fragment {
    let mut lines = Vec::new();
    let mut effects = Vec::new();
    let mut diagnostics = Vec::new();

    let mut current = stmt;
    let mut keyword = "if";
    loop {
        let test = transpile_expr(&current.test, ctx);
        effects.extend(test.effects);
        diagnostics.extend(test.diagnostics);
        lines.push(format!("{}{keyword} {}:", ctx.indent_str(), test.content));

        let (body, d) = body_lines(&current.cons, ctx.indented());
        lines.extend(body);
        diagnostics.extend(d);

        match current.alt.as_deref() {
            Some(ast::Stmt::If(next)) => {
                current = next;
                keyword = "elif";
            }
            Some(other) => {
                lines.push(format!("{}else:", ctx.indent_str()));
                let (body, d) = body_lines(other, ctx.indented());
                lines.extend(body);
                diagnostics.extend(d);
                break;
            }
            None => break,
        }
    }

    Fragment {
        content: lines.join("\n"),
        effects,
        diagnostics,
    }
}

fn while_stmt(stmt: &ast::WhileStmt, ctx: ParseContext<'_>) -> Fragment {
    let test = transpile_expr(&stmt.test, ctx);
    let mut lines = vec![format!("{}while {}:", ctx.indent_str(), test.content)];
    let mut diagnostics = test.diagnostics;

    let (body, d) = body_lines(&stmt.body, ctx.indented());
    lines.extend(body);
    diagnostics.extend(d);

    Fragment {
        content: lines.join("\n"),
        effects: test.effects,
        diagnostics,
    }
}

/// C-style `for` has no GDScript form; it lowers to init + `while`, with the
/// update expression flushed at the end of the loop body.
fn for_stmt(stmt: &ast::ForStmt, ctx: ParseContext<'_>) -> Fragment {
    let mut lines = Vec::new();
    let mut effects = Vec::new();
    let mut diagnostics = Vec::new();

    if let Some(init) = &stmt.init {
        let frag = match init {
            ast::VarDeclOrExpr::VarDecl(v) => var_decl(v, ctx),
            ast::VarDeclOrExpr::Expr(e) => expr_stmt(e, ctx),
        };
        let (l, d) = hoist::flush(frag, ctx);
        lines.extend(l);
        diagnostics.extend(d);
    }

    let test_text = match &stmt.test {
        Some(test) => {
            let frag = transpile_expr(test, ctx);
            effects.extend(frag.effects);
            diagnostics.extend(frag.diagnostics);
            frag.content
        }
        None => "true".to_string(),
    };
    lines.push(format!("{}while {test_text}:", ctx.indent_str()));

    let inner = ctx.indented();
    let (mut body, d) = match &*stmt.body {
        ast::Stmt::Block(b) => render_block(&b.stmts, inner),
        other => {
            let frag = transpile_stmt(other, inner);
            hoist::flush(frag, inner)
        }
    };
    diagnostics.extend(d);

    if let Some(update) = &stmt.update {
        // The update runs at the end of the body, so a continue would jump
        // past it and the lowered loop would diverge.
        if let Some(span) = first_continue(&stmt.body) {
            diagnostics.push(ctx.diagnostic(
                span,
                "ContinueInForLoop",
                "continue would skip the loop update; rewrite as a while loop",
            ));
        }
        let frag = expr_stmt(update, inner);
        let (l, d) = hoist::flush(frag, inner);
        body.extend(l);
        diagnostics.extend(d);
    }

    if body.is_empty() {
        body.push(format!("{}pass", inner.indent_str()));
    }
    lines.extend(body);

    Fragment {
        content: lines.join("\n"),
        effects,
        diagnostics,
    }
}

/// First `continue` that would bind to the enclosing loop. Nested loops own
/// their own continues; a switch does not.
fn first_continue(stmt: &ast::Stmt) -> Option<swc_common::Span> {
    match stmt {
        ast::Stmt::Continue(c) => Some(c.span),
        ast::Stmt::Block(b) => b.stmts.iter().find_map(first_continue),
        ast::Stmt::If(i) => {
            first_continue(&i.cons).or_else(|| i.alt.as_deref().and_then(first_continue))
        }
        ast::Stmt::Switch(s) => s
            .cases
            .iter()
            .flat_map(|case| case.cons.iter())
            .find_map(first_continue),
        ast::Stmt::Labeled(l) => first_continue(&l.body),
        _ => None,
    }
}

fn for_head_binding(head: &ast::ForHead, ctx: ParseContext<'_>) -> Fragment {
    match head {
        ast::ForHead::VarDecl(v) => match v.decls.first() {
            Some(decl) => binding_name(&decl.name, ctx),
            None => Fragment::default(),
        },
        ast::ForHead::Pat(p) => binding_name(p, ctx),
        ast::ForHead::UsingDecl(u) => ctx.unsupported(
            u.span,
            "UsingDeclaration",
            "using declarations are not supported",
        ),
    }
}

fn for_of_stmt(stmt: &ast::ForOfStmt, ctx: ParseContext<'_>) -> Fragment {
    let binding = for_head_binding(&stmt.left, ctx);
    let iter = transpile_expr(&stmt.right, ctx);
    let header = merge(vec![binding, iter], |t| {
        format!("{}for {} in {}:", ctx.indent_str(), t[0], t[1])
    });

    let mut lines = vec![header.content];
    let mut diagnostics = header.diagnostics;
    let (body, d) = body_lines(&stmt.body, ctx.indented());
    lines.extend(body);
    diagnostics.extend(d);

    Fragment {
        content: lines.join("\n"),
        effects: header.effects,
        diagnostics,
    }
}

/// `for..in` iterates keys in both grammars: dictionaries iterate their keys
/// in GDScript exactly like objects do in the source language.
fn for_in_stmt(stmt: &ast::ForInStmt, ctx: ParseContext<'_>) -> Fragment {
    let binding = for_head_binding(&stmt.left, ctx);
    let obj = transpile_expr(&stmt.right, ctx);
    let header = merge(vec![binding, obj], |t| {
        format!("{}for {} in {}:", ctx.indent_str(), t[0], t[1])
    });

    let mut lines = vec![header.content];
    let mut diagnostics = header.diagnostics;
    let (body, d) = body_lines(&stmt.body, ctx.indented());
    lines.extend(body);
    diagnostics.extend(d);

    Fragment {
        content: lines.join("\n"),
        effects: header.effects,
        diagnostics,
    }
}

/// `switch` → `match`, with the trailing `break` of each case dropped.
fn switch_stmt(stmt: &ast::SwitchStmt, ctx: ParseContext<'_>) -> Fragment {
    let disc = transpile_expr(&stmt.discriminant, ctx);
    let mut lines = vec![format!("{}match {}:", ctx.indent_str(), disc.content)];
    let mut effects = disc.effects;
    let mut diagnostics = disc.diagnostics;

    let case_ctx = ctx.indented();
    let body_ctx = case_ctx.indented();
    for (i, case) in stmt.cases.iter().enumerate() {
        // Match branches never fall through; a source case that would is a
        // silent control-flow change.
        let terminated = case.cons.last().is_some_and(ends_control_flow);
        if !case.cons.is_empty() && !terminated && i + 1 < stmt.cases.len() {
            diagnostics.push(ctx.diagnostic(
                case.span,
                "CaseFallthrough",
                "this case falls through to the next; end it with break or return",
            ));
        }
        match &case.test {
            Some(test) => {
                let frag = transpile_expr(test, case_ctx);
                effects.extend(frag.effects);
                diagnostics.extend(frag.diagnostics);
                lines.push(format!("{}{}:", case_ctx.indent_str(), frag.content));
            }
            None => lines.push(format!("{}_:", case_ctx.indent_str())),
        }

        let mut body = &case.cons[..];
        if let Some(ast::Stmt::Break(b)) = body.last() {
            if b.label.is_none() {
                body = &body[..body.len() - 1];
            }
        }
        let (body_rendered, d) = render_block(body, body_ctx);
        if body_rendered.is_empty() {
            lines.push(format!("{}pass", body_ctx.indent_str()));
        } else {
            lines.extend(body_rendered);
        }
        diagnostics.extend(d);
    }

    Fragment {
        content: lines.join("\n"),
        effects,
        diagnostics,
    }
}

/// Whether a statement unconditionally leaves the enclosing case.
fn ends_control_flow(stmt: &ast::Stmt) -> bool {
    match stmt {
        ast::Stmt::Break(b) => b.label.is_none(),
        ast::Stmt::Return(_) | ast::Stmt::Continue(_) | ast::Stmt::Throw(_) => true,
        ast::Stmt::Block(b) => b.stmts.last().is_some_and(ends_control_flow),
        ast::Stmt::If(i) => {
            ends_control_flow(&i.cons) && i.alt.as_deref().is_some_and(ends_control_flow)
        }
        _ => false,
    }
}

/// `let`/`var` → `var`; `const` keeps `const` when the initializer is a
/// literal the target can evaluate at load time.
pub fn var_decl(decl: &ast::VarDecl, ctx: ParseContext<'_>) -> Fragment {
    let mut parts = Vec::with_capacity(decl.decls.len());
    for declarator in &decl.decls {
        let keyword = if decl.kind == ast::VarDeclKind::Const
            && matches!(declarator.init.as_deref(), Some(ast::Expr::Lit(_)))
        {
            "const"
        } else {
            "var"
        };
        let frag = match &declarator.init {
            Some(init) => combine(
                ctx,
                [SyntaxNode::Pat(&declarator.name), SyntaxNode::Expr(init)],
                |t| {
                    format!("{}{keyword} {} = {}", ctx.indent_str(), t[0], t[1])
                        .trim_end()
                        .to_string()
                },
            ),
            None => combine_one(ctx, SyntaxNode::Pat(&declarator.name), |name| {
                format!("{}{keyword} {name}", ctx.indent_str())
            }),
        };
        parts.push(frag);
    }
    merge(parts, |texts| texts.join("\n"))
}

/// `enum` → GDScript `enum`; members must be implicit or integer-valued.
fn enum_decl(decl: &ast::TsEnumDecl, ctx: ParseContext<'_>) -> Fragment {
    let mut parts = Vec::with_capacity(decl.members.len());
    let mut diagnostics = Vec::new();
    for member in &decl.members {
        let name = match &member.id {
            ast::TsEnumMemberId::Ident(i) => i.sym.to_string(),
            ast::TsEnumMemberId::Str(s) => s.value.to_string_lossy().into_owned(),
        };
        match member.init.as_deref() {
            None => parts.push(name),
            Some(ast::Expr::Lit(ast::Lit::Num(n))) => {
                parts.push(format!("{name} = {}", literal::gd_number(n.value)));
            }
            Some(other) => diagnostics.push(ctx.diagnostic(
                other.span(),
                "EnumInitializer",
                "GDScript enum members must be integers",
            )),
        }
    }

    Fragment {
        content: format!(
            "{}enum {} {{ {} }}",
            ctx.indent_str(),
            decl.id.sym,
            parts.join(", ")
        ),
        effects: Vec::new(),
        diagnostics,
    }
}

//! Class declaration handlers: the script class header, fields, methods,
//! constructors, accessors, and auxiliary inner classes.

use gdt_ast::{Diagnostic, Fragment};
use swc_common::Spanned;
use swc_ecma_ast as ast;

use crate::combine::{combine, merge};
use crate::context::ParseContext;
use crate::expr::transpile_expr;
use crate::node::SyntaxNode;
use crate::stmt::render_block;
use crate::{comments, hoist};

/// `extends` / `class_name` header lines for the script class.
pub fn class_header(
    class: &ast::Class,
    name: Option<&ast::Ident>,
    ctx: ParseContext<'_>,
) -> (Vec<String>, Vec<Diagnostic>) {
    let mut lines = Vec::new();
    let mut diagnostics = Vec::new();

    if let Some(super_class) = &class.super_class {
        let frag = transpile_expr(super_class, ctx);
        diagnostics.extend(frag.diagnostics);
        lines.push(format!("extends {}", frag.content));
    }
    if let Some(ident) = name {
        // The script-facing name is engine API; never renamed.
        lines.push(format!("class_name {}", ident.sym));
    }

    (lines, diagnostics)
}

/// Render a class body as output blocks: one block of fields (declared
/// order), then one block per method (declared order).
pub fn class_body_blocks(
    class: &ast::Class,
    ctx: ParseContext<'_>,
) -> (Vec<String>, Vec<Diagnostic>) {
    let mut field_lines = Vec::new();
    let mut method_blocks = Vec::new();
    let mut diagnostics = Vec::new();

    for member in &class.body {
        match member {
            ast::ClassMember::ClassProp(prop) => {
                let (lines, d) = class_prop(prop, ctx);
                field_lines.extend(lines);
                diagnostics.extend(d);
            }
            ast::ClassMember::Constructor(ctor) => {
                let (block, d) = constructor(ctor, ctx);
                method_blocks.push(block);
                diagnostics.extend(d);
            }
            ast::ClassMember::Method(method) => {
                let (block, d) = class_method(method, ctx);
                method_blocks.push(block);
                diagnostics.extend(d);
            }
            ast::ClassMember::Empty(_) | ast::ClassMember::TsIndexSignature(_) => {}
            ast::ClassMember::PrivateProp(p) => diagnostics.push(ctx.diagnostic(
                p.span,
                "PrivateProperty",
                "private fields are not supported; use an underscore prefix",
            )),
            ast::ClassMember::PrivateMethod(m) => diagnostics.push(ctx.diagnostic(
                m.span,
                "PrivateMethod",
                "private methods are not supported; use an underscore prefix",
            )),
            ast::ClassMember::StaticBlock(s) => diagnostics.push(ctx.diagnostic(
                s.span,
                "StaticBlock",
                "static initializer blocks are not supported",
            )),
            ast::ClassMember::AutoAccessor(a) => diagnostics.push(ctx.diagnostic(
                a.span,
                "AutoAccessor",
                "auto-accessors are not supported",
            )),
        }
    }

    let mut blocks = Vec::new();
    if !field_lines.is_empty() {
        blocks.push(field_lines.join("\n"));
    }
    blocks.extend(method_blocks);
    (blocks, diagnostics)
}

/// Auxiliary class declaration → GDScript inner class.
pub fn inner_class(ident: &ast::Ident, class: &ast::Class, ctx: ParseContext<'_>) -> Fragment {
    let mut diagnostics = Vec::new();
    let mut header = format!("{}class {}", ctx.indent_str(), ident.sym);
    if let Some(super_class) = &class.super_class {
        let frag = transpile_expr(super_class, ctx);
        diagnostics.extend(frag.diagnostics);
        header.push_str(&format!(" extends {}", frag.content));
    }
    header.push(':');

    let inner = ctx.indented();
    let (blocks, d) = class_body_blocks(class, inner);
    diagnostics.extend(d);

    let body = if blocks.is_empty() {
        format!("{}pass", inner.indent_str())
    } else {
        blocks.join("\n\n")
    };

    Fragment {
        content: format!("{header}\n{body}"),
        effects: Vec::new(),
        diagnostics,
    }
}

fn class_prop(prop: &ast::ClassProp, ctx: ParseContext<'_>) -> (Vec<String>, Vec<Diagnostic>) {
    let mut lines = comments::leading_comment_lines(ctx, prop.span.lo);
    let mut diagnostics = Vec::new();

    let name = prop_name(&prop.key, ctx);
    diagnostics.extend(name.diagnostics.clone());

    // Static fields with literal initializers become class constants.
    let keyword = if prop.is_static && matches!(prop.value.as_deref(), Some(ast::Expr::Lit(_))) {
        "const"
    } else {
        "var"
    };

    let frag = match &prop.value {
        Some(value) => {
            let init = transpile_expr(value, ctx);
            merge(vec![Fragment::text(name.content), init], |t| {
                format!("{}{keyword} {} = {}", ctx.indent_str(), t[0], t[1])
                    .trim_end()
                    .to_string()
            })
        }
        None => Fragment::text(format!("{}var {}", ctx.indent_str(), name.content)),
    };

    let (l, d) = hoist::flush(frag, ctx);
    lines.extend(l);
    diagnostics.extend(d);
    (lines, diagnostics)
}

fn class_method(method: &ast::ClassMethod, ctx: ParseContext<'_>) -> (String, Vec<Diagnostic>) {
    let name = prop_name(&method.key, ctx);
    let mut diagnostics = name.diagnostics.clone();

    // Accessors become plain functions; lifecycle and ordinary method
    // names pass through verbatim.
    let func_name = match method.kind {
        ast::MethodKind::Method => name.content,
        ast::MethodKind::Getter => format!("get_{}", name.content),
        ast::MethodKind::Setter => format!("set_{}", name.content),
    };

    let mut lines = comments::leading_comment_lines(ctx, method.span.lo);
    let frag = render_function(&func_name, &method.function, method.is_static, ctx);
    let (l, d) = hoist::flush(frag, ctx);
    lines.extend(l);
    diagnostics.extend(d);
    (lines.join("\n"), diagnostics)
}

fn constructor(ctor: &ast::Constructor, ctx: ParseContext<'_>) -> (String, Vec<Diagnostic>) {
    let mut params = Vec::with_capacity(ctor.params.len());
    for param in &ctor.params {
        match param {
            ast::ParamOrTsParamProp::Param(p) => params.push(param_pat(&p.pat, ctx)),
            // `constructor(private x)` still yields a plain parameter here.
            ast::ParamOrTsParamProp::TsParamProp(tp) => match &tp.param {
                ast::TsParamPropParam::Ident(bi) => {
                    params.push(Fragment::text(ctx.config.rename_if_reserved(&bi.id.sym)));
                }
                ast::TsParamPropParam::Assign(a) => params.push(param_pat(
                    &ast::Pat::Assign(a.clone()),
                    ctx,
                )),
            },
        }
    }
    let params = merge(params, |t| t.join(", "));
    let mut diagnostics = params.diagnostics.clone();

    let mut lines = comments::leading_comment_lines(ctx, ctor.span.lo);
    lines.push(format!(
        "{}func _init({}):",
        ctx.indent_str(),
        params.content
    ));

    let inner = ctx.indented();
    let (body, d) = match &ctor.body {
        Some(block) => render_block(&block.stmts, inner),
        None => (Vec::new(), Vec::new()),
    };
    diagnostics.extend(d);
    if body.is_empty() {
        lines.push(format!("{}pass", inner.indent_str()));
    } else {
        lines.extend(body);
    }

    (lines.join("\n"), diagnostics)
}

/// Shared function renderer for methods and top-level function declarations.
pub fn render_function(
    name: &str,
    function: &ast::Function,
    is_static: bool,
    ctx: ParseContext<'_>,
) -> Fragment {
    let mut diagnostics = Vec::new();
    if function.is_async {
        diagnostics.push(ctx.diagnostic(
            function.span,
            "AsyncFunction",
            "async functions are not supported; use yield on signals",
        ));
    }
    if function.is_generator {
        diagnostics.push(ctx.diagnostic(
            function.span,
            "GeneratorFunction",
            "generator functions are not supported",
        ));
    }

    let params = render_params(&function.params, ctx);
    diagnostics.extend(params.diagnostics.clone());

    let prefix = if is_static { "static func" } else { "func" };
    let mut lines = vec![format!(
        "{}{prefix} {name}({}):",
        ctx.indent_str(),
        params.content
    )];

    let inner = ctx.indented();
    let (body, d) = match &function.body {
        Some(block) => render_block(&block.stmts, inner),
        None => (Vec::new(), Vec::new()),
    };
    diagnostics.extend(d);
    if body.is_empty() {
        lines.push(format!("{}pass", inner.indent_str()));
    } else {
        lines.extend(body);
    }

    Fragment {
        content: lines.join("\n"),
        effects: params.effects,
        diagnostics,
    }
}

fn render_params(params: &[ast::Param], ctx: ParseContext<'_>) -> Fragment {
    let parts: Vec<Fragment> = params.iter().map(|p| param_pat(&p.pat, ctx)).collect();
    merge(parts, |t| t.join(", "))
}

fn param_pat(pat: &ast::Pat, ctx: ParseContext<'_>) -> Fragment {
    match pat {
        ast::Pat::Ident(bi) => Fragment::text(ctx.config.rename_if_reserved(&bi.id.sym)),
        ast::Pat::Assign(assign) => combine(
            ctx,
            [
                SyntaxNode::Pat(&assign.left),
                SyntaxNode::Expr(&assign.right),
            ],
            |t| format!("{} = {}", t[0], t[1]),
        ),
        ast::Pat::Rest(rest) => ctx.unsupported(
            rest.span(),
            "RestParameter",
            "GDScript functions cannot declare varargs",
        ),
        other => ctx.unsupported(
            other.span(),
            "DestructuredParameter",
            "destructured parameters are not supported",
        ),
    }
}

fn prop_name(key: &ast::PropName, ctx: ParseContext<'_>) -> Fragment {
    match key {
        ast::PropName::Ident(i) => Fragment::text(ctx.config.rename_if_reserved(&i.sym)),
        ast::PropName::Str(s) => {
            Fragment::text(ctx.config.rename_if_reserved(&s.value.to_string_lossy()))
        }
        other => ctx.unsupported(
            other.span(),
            "ComputedPropertyName",
            "computed member names are not supported",
        ),
    }
}

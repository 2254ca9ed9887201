//! Literal handlers: strings, numbers, arrays, dictionaries, templates.

use std::borrow::Cow;

use gdt_ast::Fragment;
use swc_common::Spanned;
use swc_ecma_ast as ast;

use crate::combine::merge;
use crate::context::ParseContext;
use crate::expr::transpile_expr;

pub fn transpile_lit(lit: &ast::Lit, ctx: ParseContext<'_>) -> Fragment {
    match lit {
        ast::Lit::Str(s) => Fragment::text(gd_string(&s.value.to_string_lossy())),
        ast::Lit::Bool(b) => Fragment::text(if b.value { "true" } else { "false" }),
        ast::Lit::Null(_) => Fragment::text("null"),
        ast::Lit::Num(n) => Fragment::text(gd_number(n.value)),
        ast::Lit::BigInt(b) => ctx.unsupported(
            b.span,
            "BigIntLiteral",
            "GDScript integers are 64-bit; bigint literals are not supported",
        ),
        ast::Lit::Regex(r) => ctx.unsupported(
            r.span,
            "RegularExpressionLiteral",
            "GDScript has no regex literal; construct a RegEx object instead",
        ),
        ast::Lit::JSXText(t) => ctx.unsupported(t.span, "JSXText", "JSX is not supported"),
    }
}

/// Quote and escape a string for GDScript.
pub fn gd_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Render a numeric literal, preferring integer form for whole values.
pub fn gd_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Template literal → string concatenation with `str()` around each splice.
pub fn template(tpl: &ast::Tpl, ctx: ParseContext<'_>) -> Fragment {
    let mut pieces: Vec<Fragment> = Vec::new();
    for (i, quasi) in tpl.quasis.iter().enumerate() {
        // Cooked text is WTF-8; raw is the UTF-8 source slice.
        let text = match &quasi.cooked {
            Some(cooked) => cooked.to_string_lossy(),
            None => Cow::Borrowed(quasi.raw.as_ref()),
        };
        if !text.is_empty() {
            pieces.push(Fragment::text(gd_string(&text)));
        }
        if i < tpl.exprs.len() {
            pieces.push(transpile_expr(&tpl.exprs[i], ctx).map(|t| format!("str({t})")));
        }
    }
    if pieces.is_empty() {
        return Fragment::text("\"\"");
    }
    merge(pieces, |texts| texts.join(" + "))
}

pub fn array(arr: &ast::ArrayLit, ctx: ParseContext<'_>) -> Fragment {
    let mut parts = Vec::with_capacity(arr.elems.len());
    for elem in &arr.elems {
        match elem {
            Some(e) if e.spread.is_some() => {
                parts.push(ctx.unsupported(
                    e.expr.span(),
                    "SpreadElement",
                    "array spread is not supported",
                ));
            }
            Some(e) => parts.push(transpile_expr(&e.expr, ctx)),
            // Elision: `[1, , 3]` keeps its slot as null.
            None => parts.push(Fragment::text("null")),
        }
    }
    merge(parts, |texts| format!("[{}]", texts.join(", ")))
}

/// Object literal → GDScript dictionary with string keys.
pub fn object(obj: &ast::ObjectLit, ctx: ParseContext<'_>) -> Fragment {
    let mut parts = Vec::with_capacity(obj.props.len());
    for prop in &obj.props {
        parts.push(object_entry(prop, ctx));
    }
    if parts.is_empty() {
        return Fragment::text("{}");
    }
    merge(parts, |texts| format!("{{ {} }}", texts.join(", ")))
}

fn object_entry(prop: &ast::PropOrSpread, ctx: ParseContext<'_>) -> Fragment {
    let prop = match prop {
        ast::PropOrSpread::Spread(s) => {
            return ctx.unsupported(
                s.expr.span(),
                "SpreadProperty",
                "object spread is not supported",
            );
        }
        ast::PropOrSpread::Prop(p) => p,
    };

    match &**prop {
        ast::Prop::KeyValue(kv) => {
            let key = match &kv.key {
                ast::PropName::Ident(i) => gd_string(&i.sym),
                ast::PropName::Str(s) => gd_string(&s.value.to_string_lossy()),
                ast::PropName::Num(n) => gd_number(n.value),
                other => {
                    return ctx.unsupported(
                        other.span(),
                        "ComputedPropertyName",
                        "computed dictionary keys are not supported",
                    );
                }
            };
            transpile_expr(&kv.value, ctx).map(|v| format!("{key}: {v}"))
        }
        ast::Prop::Shorthand(ident) => {
            let key = gd_string(&ident.sym);
            let value = ctx.config.rename_if_reserved(&ident.sym);
            Fragment::text(format!("{key}: {value}"))
        }
        other => ctx.unsupported(
            other.span(),
            "ObjectProperty",
            "only key-value and shorthand properties are supported",
        ),
    }
}

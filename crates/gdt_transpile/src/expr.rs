//! Expression handlers: the per-construct source-kind → GDScript mappings.

use gdt_ast::{CallOverride, Fragment, SideEffect};
use swc_common::Spanned;
use swc_ecma_ast as ast;

use crate::combine::{combine, combine_one, merge};
use crate::context::ParseContext;
use crate::literal;
use crate::node::SyntaxNode;

pub fn transpile_expr(expr: &ast::Expr, ctx: ParseContext<'_>) -> Fragment {
    match expr {
        ast::Expr::Ident(i) => ident(i, ctx),
        ast::Expr::This(_) => Fragment::text("self"),
        ast::Expr::Lit(l) => literal::transpile_lit(l, ctx),
        ast::Expr::Tpl(t) => literal::template(t, ctx),
        ast::Expr::Array(a) => literal::array(a, ctx),
        ast::Expr::Object(o) => literal::object(o, ctx),
        ast::Expr::Paren(p) => {
            combine_one(ctx, SyntaxNode::Expr(&p.expr), |inner| format!("({inner})"))
        }
        ast::Expr::Unary(u) => unary(u, ctx),
        ast::Expr::Update(u) => update(u, ctx),
        ast::Expr::Bin(b) => binary(b, ctx),
        ast::Expr::Assign(a) => assign(a, ctx),
        ast::Expr::Cond(c) => conditional(c, ctx),
        ast::Expr::Call(c) => call(c, ctx),
        ast::Expr::New(n) => new_expr(n, ctx),
        ast::Expr::Member(m) => member(m, ctx),
        ast::Expr::SuperProp(s) => super_prop(s, ctx),

        // Type-level wrappers are erased; only the inner value survives.
        ast::Expr::TsAs(e) => transpile_expr(&e.expr, ctx),
        ast::Expr::TsNonNull(e) => transpile_expr(&e.expr, ctx),
        ast::Expr::TsConstAssertion(e) => transpile_expr(&e.expr, ctx),
        ast::Expr::TsTypeAssertion(e) => transpile_expr(&e.expr, ctx),
        ast::Expr::TsSatisfies(e) => transpile_expr(&e.expr, ctx),
        ast::Expr::TsInstantiation(e) => transpile_expr(&e.expr, ctx),

        ast::Expr::Arrow(a) => ctx.unsupported(
            a.span,
            "ArrowFunction",
            "GDScript has no closures; declare a method instead",
        ),
        ast::Expr::Fn(f) => ctx.unsupported(
            f.function.span,
            "FunctionExpression",
            "GDScript has no function values; declare a method instead",
        ),
        ast::Expr::Class(c) => ctx.unsupported(
            c.class.span,
            "ClassExpression",
            "class expressions are not supported",
        ),
        other => ctx.unsupported(
            other.span(),
            expr_kind_name(other),
            "no GDScript equivalent",
        ),
    }
}

fn expr_kind_name(expr: &ast::Expr) -> &'static str {
    match expr {
        ast::Expr::Await(_) => "AwaitExpression",
        ast::Expr::Yield(_) => "YieldExpression",
        ast::Expr::Seq(_) => "SequenceExpression",
        ast::Expr::TaggedTpl(_) => "TaggedTemplate",
        ast::Expr::OptChain(_) => "OptionalChaining",
        ast::Expr::MetaProp(_) => "MetaProperty",
        ast::Expr::PrivateName(_) => "PrivateName",
        ast::Expr::JSXElement(_) | ast::Expr::JSXFragment(_) => "JSXElement",
        _ => "Expression",
    }
}

fn ident(ident: &ast::Ident, ctx: ParseContext<'_>) -> Fragment {
    if ident.sym.as_ref() == "undefined" {
        return Fragment::text("null");
    }
    Fragment::text(ctx.config.rename_if_reserved(&ident.sym))
}

fn unary(u: &ast::UnaryExpr, ctx: ParseContext<'_>) -> Fragment {
    let arg = SyntaxNode::Expr(&u.arg);
    match u.op {
        ast::UnaryOp::Bang => combine_one(ctx, arg, |a| format!("not {a}")),
        ast::UnaryOp::Minus => combine_one(ctx, arg, |a| format!("-{a}")),
        ast::UnaryOp::Plus => combine_one(ctx, arg, |a| a.to_string()),
        ast::UnaryOp::Tilde => combine_one(ctx, arg, |a| format!("~{a}")),
        ast::UnaryOp::TypeOf => ctx.unsupported(
            u.span,
            "TypeOfExpression",
            "use the `is` operator against a concrete type",
        ),
        ast::UnaryOp::Void => ctx.unsupported(u.span, "VoidExpression", "no GDScript equivalent"),
        ast::UnaryOp::Delete => {
            ctx.unsupported(u.span, "DeleteExpression", "use Dictionary.erase instead")
        }
    }
}

/// Increment/decrement in expression position.
///
/// GDScript has no inline `++`/`--`. For postfix forms the expression's
/// value is the operand's pre-mutation text and the mutation itself is
/// registered as a deferred side effect; the effect rides every enclosing
/// combinator invocation until the hoisting resolver flushes it at the
/// statement boundary. Prefix forms would need the post-mutation value and
/// are rejected here.
fn update(u: &ast::UpdateExpr, ctx: ParseContext<'_>) -> Fragment {
    if u.prefix {
        // `++x` yields the post-mutation value; the deferred rewrite would
        // silently hand out the pre-mutation one.
        return ctx.unsupported(
            u.span,
            "PrefixUpdate",
            "prefix increment in value position is not supported; mutate in a separate statement",
        );
    }
    update_effect(u, ctx)
}

/// The deferred-mutation rewrite. Shared with statement position, where the
/// value is discarded and prefix and postfix coincide.
pub(crate) fn update_effect(u: &ast::UpdateExpr, ctx: ParseContext<'_>) -> Fragment {
    let operand = combine_one(ctx, SyntaxNode::Expr(&u.arg), |text| text.to_string());
    let target = operand.content.clone();
    let effect = match u.op {
        ast::UpdateOp::PlusPlus => SideEffect::PostIncrement { target },
        ast::UpdateOp::MinusMinus => SideEffect::PostDecrement { target },
    };
    operand.with_effect(effect)
}

fn binary(b: &ast::BinExpr, ctx: ParseContext<'_>) -> Fragment {
    use ast::BinaryOp::*;

    let children = [SyntaxNode::Expr(&b.left), SyntaxNode::Expr(&b.right)];
    let op = match b.op {
        // Loose and strict equality collapse: GDScript comparison is typed.
        EqEq | EqEqEq => "==",
        NotEq | NotEqEq => "!=",
        Lt => "<",
        LtEq => "<=",
        Gt => ">",
        GtEq => ">=",
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        LogicalAnd => "and",
        LogicalOr => "or",
        BitAnd => "&",
        BitOr => "|",
        BitXor => "^",
        LShift => "<<",
        RShift => ">>",
        In => "in",
        InstanceOf => "is",
        Exp => {
            return combine(ctx, children, |t| format!("pow({}, {})", t[0], t[1]));
        }
        NullishCoalescing => {
            return combine(ctx, children, |t| {
                format!("({} if {} != null else {})", t[0], t[0], t[1])
            });
        }
        ZeroFillRShift => {
            return ctx.unsupported(
                b.span,
                "UnsignedRightShift",
                "GDScript has no unsigned shift",
            );
        }
    };
    combine(ctx, children, |t| format!("{} {} {}", t[0], op, t[1]))
}

fn assign(a: &ast::AssignExpr, ctx: ParseContext<'_>) -> Fragment {
    use ast::AssignOp::*;

    let left = assign_target(&a.left, ctx);
    let right = transpile_expr(&a.right, ctx);

    let op = match a.op {
        Assign => "=",
        AddAssign => "+=",
        SubAssign => "-=",
        MulAssign => "*=",
        DivAssign => "/=",
        ModAssign => "%=",
        LShiftAssign => "<<=",
        RShiftAssign => ">>=",
        BitAndAssign => "&=",
        BitOrAssign => "|=",
        BitXorAssign => "^=",
        ExpAssign => {
            return merge(vec![left, right], |t| {
                format!("{} = pow({}, {})", t[0], t[0], t[1])
            });
        }
        ZeroFillRShiftAssign | AndAssign | OrAssign | NullishAssign => {
            return ctx.unsupported(
                a.span,
                "LogicalAssignment",
                "no GDScript equivalent for this compound assignment",
            );
        }
    };
    merge(vec![left, right], |t| format!("{} {} {}", t[0], op, t[1]))
}

fn assign_target(target: &ast::AssignTarget, ctx: ParseContext<'_>) -> Fragment {
    match target {
        ast::AssignTarget::Simple(simple) => match simple {
            ast::SimpleAssignTarget::Ident(bi) => {
                Fragment::text(ctx.config.rename_if_reserved(&bi.id.sym))
            }
            ast::SimpleAssignTarget::Member(m) => member(m, ctx),
            ast::SimpleAssignTarget::Paren(p) => transpile_expr(&p.expr, ctx),
            other => ctx.unsupported(
                other.span(),
                "AssignmentTarget",
                "only identifiers and member accesses can be assigned",
            ),
        },
        ast::AssignTarget::Pat(p) => ctx.unsupported(
            p.span(),
            "DestructuringAssignment",
            "destructuring assignment is not supported",
        ),
    }
}

/// `a ? b : c` → `b if a else c`. Children are dispatched in source order so
/// side effects keep left-to-right ordering even though the composed text
/// places the test in the middle.
fn conditional(c: &ast::CondExpr, ctx: ParseContext<'_>) -> Fragment {
    combine(
        ctx,
        [
            SyntaxNode::Expr(&c.test),
            SyntaxNode::Expr(&c.cons),
            SyntaxNode::Expr(&c.alt),
        ],
        |t| format!("{} if {} else {}", t[1], t[0], t[2]),
    )
}

fn call(c: &ast::CallExpr, ctx: ParseContext<'_>) -> Fragment {
    let callee = match &c.callee {
        ast::Callee::Expr(e) => e,
        ast::Callee::Super(_) => {
            // `super(...)` → parent constructor call.
            let args = call_args(&c.args, ctx);
            return match args {
                Ok(args) => merge(args, |t| format!("._init({})", t.join(", "))),
                Err(frag) => frag,
            };
        }
        ast::Callee::Import(i) => {
            return ctx.unsupported(i.span, "DynamicImport", "imports are compile-time only");
        }
    };

    let args = match call_args(&c.args, ctx) {
        Ok(args) => args,
        Err(frag) => return frag,
    };

    // Method calls consult the override table before generic rendering.
    if let ast::Expr::Member(m) = &**callee {
        if let ast::MemberProp::Ident(method) = &m.prop {
            let receiver = transpile_expr(&m.obj, ctx);
            let qualified = format!("{}.{}", receiver.content, method.sym);
            match ctx.config.call_override(&qualified, &method.sym) {
                Some(CallOverride::GlobalFunction(global)) => {
                    // Receiver text vanishes but its effects still ride along.
                    let mut parts = vec![receiver];
                    parts.extend(args);
                    return merge(parts, |t| format!("{global}({})", t[1..].join(", ")));
                }
                Some(CallOverride::RenameMethod(renamed)) => {
                    let mut parts = vec![receiver];
                    parts.extend(args);
                    return merge(parts, |t| {
                        format!("{}.{renamed}({})", t[0], t[1..].join(", "))
                    });
                }
                None => {
                    let name = ctx.config.rename_if_reserved(&method.sym);
                    let mut parts = vec![receiver];
                    parts.extend(args);
                    return merge(parts, |t| format!("{}.{name}({})", t[0], t[1..].join(", ")));
                }
            }
        }
    }

    let mut parts = vec![transpile_expr(callee, ctx)];
    parts.extend(args);
    merge(parts, |t| format!("{}({})", t[0], t[1..].join(", ")))
}

/// Dispatch call arguments in order. A spread argument has no GDScript
/// rendering at the call site, so it turns the whole call into a diagnostic.
fn call_args(
    args: &[ast::ExprOrSpread],
    ctx: ParseContext<'_>,
) -> Result<Vec<Fragment>, Fragment> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        if arg.spread.is_some() {
            return Err(ctx.unsupported(
                arg.expr.span(),
                "SpreadArgument",
                "spread arguments are not supported; pass an array through callv",
            ));
        }
        parts.push(transpile_expr(&arg.expr, ctx));
    }
    Ok(parts)
}

fn new_expr(n: &ast::NewExpr, ctx: ParseContext<'_>) -> Fragment {
    let empty = Vec::new();
    let args = match call_args(n.args.as_deref().unwrap_or(&empty), ctx) {
        Ok(args) => args,
        Err(frag) => return frag,
    };

    // Engine value types construct by plain call: `new Vector2(x, y)` → `Vector2(x, y)`.
    if let ast::Expr::Ident(ident) = &*n.callee {
        if ctx.config.is_bare_constructor(&ident.sym) {
            let name = ident.sym.to_string();
            return merge(args, |t| format!("{name}({})", t.join(", ")));
        }
    }

    let mut parts = vec![transpile_expr(&n.callee, ctx)];
    parts.extend(args);
    merge(parts, |t| format!("{}.new({})", t[0], t[1..].join(", ")))
}

fn member(m: &ast::MemberExpr, ctx: ParseContext<'_>) -> Fragment {
    let obj = SyntaxNode::Expr(&m.obj);
    match &m.prop {
        ast::MemberProp::Ident(prop) => {
            // `length` is the one property read disambiguated by well-known
            // name: arrays and strings both answer size() in GDScript.
            if prop.sym.as_ref() == "length" {
                return combine_one(ctx, obj, |o| format!("{o}.size()"));
            }
            let name = ctx.config.rename_if_reserved(&prop.sym);
            combine_one(ctx, obj, |o| format!("{o}.{name}"))
        }
        ast::MemberProp::Computed(computed) => combine(
            ctx,
            [obj, SyntaxNode::Expr(&computed.expr)],
            |t| format!("{}[{}]", t[0], t[1]),
        ),
        ast::MemberProp::PrivateName(p) => ctx.unsupported(
            p.span,
            "PrivateName",
            "private fields are not supported; use an underscore prefix",
        ),
    }
}

/// `super.method` → leading-dot parent access.
fn super_prop(s: &ast::SuperPropExpr, ctx: ParseContext<'_>) -> Fragment {
    match &s.prop {
        ast::SuperProp::Ident(prop) => Fragment::text(format!(".{}", prop.sym)),
        ast::SuperProp::Computed(computed) => ctx.unsupported(
            computed.span,
            "SuperComputedAccess",
            "computed access on super is not supported",
        ),
    }
}

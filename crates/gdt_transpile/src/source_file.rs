//! Compilation-unit orchestrator.
//!
//! Walks a module's top-level items, identifies the default-exported class as
//! the engine-facing script class, and assembles the final output: header,
//! auxiliary declarations, script-class body, then trailing statements with
//! their flushed side effects. All file I/O belongs to the caller.

use gdt_ast::Diagnostic;
use swc_common::Spanned;
use swc_ecma_ast as ast;

use crate::context::ParseContext;
use crate::{class, comments, hoist, stmt};

/// Composed output for one compilation unit.
///
/// Diagnostics are per-node, not fatal: the source text is still complete for
/// every supported sibling, so partial output stays useful for preview
/// tooling even when the build as a whole must be marked failed.
#[derive(Debug)]
pub struct TranspiledFile {
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl TranspiledFile {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A rendered top-level item. Declarations stand alone as blocks; plain
/// statements merge into contiguous runs.
enum Rendered {
    DeclBlock(String),
    StmtLines(Vec<String>),
}

impl Rendered {
    fn is_decl(&self) -> bool {
        matches!(self, Rendered::DeclBlock(_))
    }
}

pub fn transpile_module(module: &ast::Module, ctx: ParseContext<'_>) -> TranspiledFile {
    let mut script: Option<(Option<&ast::Ident>, &ast::Class, swc_common::BytePos)> = None;
    let mut items: Vec<Rendered> = Vec::new();
    let mut diagnostics = Vec::new();

    for item in &module.body {
        match item {
            ast::ModuleItem::ModuleDecl(module_decl) => match module_decl {
                ast::ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                    ast::DefaultDecl::Class(class_expr) if script.is_none() => {
                        script = Some((
                            class_expr.ident.as_ref(),
                            &class_expr.class,
                            export.span.lo,
                        ));
                    }
                    other => diagnostics.push(ctx.diagnostic(
                        other.span(),
                        "DefaultExport",
                        "only a single default-exported class is supported",
                    )),
                },
                ast::ModuleDecl::ExportDecl(export) => {
                    items.push(render_decl_item(
                        &export.decl,
                        export.span.lo,
                        ctx,
                        &mut diagnostics,
                    ));
                }
                ast::ModuleDecl::ExportDefaultExpr(export) => diagnostics.push(ctx.diagnostic(
                    export.span,
                    "DefaultExport",
                    "only a single default-exported class is supported",
                )),
                // Imports and re-exports carry type information for the
                // checker; they leave no trace in the emitted script.
                ast::ModuleDecl::Import(_)
                | ast::ModuleDecl::ExportNamed(_)
                | ast::ModuleDecl::ExportAll(_)
                | ast::ModuleDecl::TsImportEquals(_)
                | ast::ModuleDecl::TsExportAssignment(_)
                | ast::ModuleDecl::TsNamespaceExport(_) => {}
            },
            ast::ModuleItem::Stmt(ast::Stmt::Decl(decl)) => {
                items.push(render_decl_item(decl, decl.span().lo, ctx, &mut diagnostics));
            }
            ast::ModuleItem::Stmt(statement) => {
                let (lines, d) = hoist::flush(stmt::transpile_stmt(statement, ctx), ctx);
                diagnostics.extend(d);
                items.push(Rendered::StmtLines(lines));
            }
        }
    }

    let mut blocks: Vec<String> = Vec::new();
    match script {
        Some((name, script_class, pos)) => {
            let mut header = comments::leading_comment_lines(ctx, pos);
            let (lines, d) = class::class_header(script_class, name, ctx);
            header.extend(lines);
            diagnostics.extend(d);
            if !header.is_empty() {
                blocks.push(header.join("\n"));
            }

            // Auxiliary declarations precede the script-class body; plain
            // statements trail it.
            let (decls, trailing): (Vec<_>, Vec<_>) =
                items.into_iter().partition(Rendered::is_decl);
            blocks.extend(assemble(decls));
            let (body_blocks, d) = class::class_body_blocks(script_class, ctx);
            blocks.extend(body_blocks);
            diagnostics.extend(d);
            blocks.extend(assemble(trailing));
        }
        None => {
            // No script class: a utility file keeps source order.
            blocks.extend(assemble(items));
        }
    }

    let source = if blocks.is_empty() {
        String::new()
    } else {
        format!("{}\n", blocks.join("\n\n"))
    };

    TranspiledFile {
        source,
        diagnostics,
    }
}

fn render_decl_item(
    decl: &ast::Decl,
    pos: swc_common::BytePos,
    ctx: ParseContext<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Rendered {
    let mut lines = comments::leading_comment_lines(ctx, pos);
    let fragment = stmt::transpile_decl(decl, ctx);
    let (l, d) = hoist::flush(fragment, ctx);
    diagnostics.extend(d);
    lines.extend(l);
    Rendered::DeclBlock(lines.join("\n"))
}

/// Merge consecutive statement runs; declarations keep their own blocks.
fn assemble(items: Vec<Rendered>) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut run: Vec<String> = Vec::new();
    for item in items {
        match item {
            Rendered::StmtLines(lines) => run.extend(lines),
            Rendered::DeclBlock(block) => {
                if !run.is_empty() {
                    blocks.push(run.join("\n"));
                    run = Vec::new();
                }
                if !block.is_empty() {
                    blocks.push(block);
                }
            }
        }
    }
    if !run.is_empty() {
        blocks.push(run.join("\n"));
    }
    blocks
}

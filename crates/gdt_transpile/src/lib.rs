//! Transpilation core: turns a parsed TypeScript module into GDScript text.
//!
//! Layout follows the data flow:
//!
//! - [`node`] — dispatch over grammar kind
//! - [`combine`] — the state-threading combinator handlers recurse through
//! - [`expr`] / [`literal`] / [`stmt`] / [`class`] — per-construct handlers
//! - [`hoist`] — resolves deferred side effects at statement boundaries
//! - [`source_file`] — assembles one compilation unit's output
//!
//! The core performs no I/O and no parsing; it is a deterministic function
//! of an immutable syntax tree, so callers are free to transpile files in
//! parallel.

pub mod class;
pub mod combine;
pub mod comments;
pub mod context;
pub mod expr;
pub mod hoist;
pub mod literal;
pub mod node;
pub mod source_file;
pub mod stmt;

#[cfg(test)]
mod tests;

use gdt_ast::TranspileConfig;
use swc_common::comments::SingleThreadedComments;
use swc_common::SourceMap;

pub use context::ParseContext;
pub use source_file::{transpile_module, TranspiledFile};

/// Transpile one parsed module into GDScript.
pub fn transpile(
    module: &swc_ecma_ast::Module,
    comments: Option<&SingleThreadedComments>,
    source_map: &SourceMap,
    file_name: &str,
    config: &TranspileConfig,
) -> TranspiledFile {
    let ctx = ParseContext::new(file_name, source_map, comments, config);
    source_file::transpile_module(module, ctx)
}

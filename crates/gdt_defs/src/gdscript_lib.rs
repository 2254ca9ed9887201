//! Global function declarations from the `@GDScript.xml` reference.

use anyhow::{Context, Result};
use roxmltree::Document;

use crate::global_scope::{class_root, elements};
use crate::method::{parse_method, render_method, MethodStyle};

/// Builtin names the transpiler resolves itself rather than declaring.
const SKIPPED_GLOBALS: &[&str] = &["load", "preload"];

pub fn generate_global_functions(xml: &str) -> Result<String> {
    let doc =
        Document::parse(xml).context("builtin function reference is not well-formed XML")?;
    let class = class_root(&doc)?;

    let mut out = Vec::new();
    for method in elements(class, "methods", "method") {
        let parsed = parse_method(method)?;
        if SKIPPED_GLOBALS.contains(&parsed.name.as_str()) {
            continue;
        }
        let rendered = render_method(&parsed, MethodStyle::Global);
        if !rendered.is_empty() {
            out.push(rendered);
        }
    }
    Ok(out.join("\n"))
}

//! Shared parser for `<method>` and `<constructor>` elements of the class
//! reference, and the two rendering styles built from it.

use anyhow::{Context, Result};
use roxmltree::Node;

use crate::util::{format_doc, godot_type_to_ts, sanitize_name};

/// Engine methods that the runtime support layer replaces with typed
/// declarations of its own.
const SKIPPED_METHODS: &[&str] = &["connect", "yield", "typeof", "rpc", "rpc_id", "print"];

#[derive(Debug)]
pub struct ParsedMethod {
    pub name: String,
    pub argument_list: String,
    pub doc: String,
    pub return_type: String,
    /// Underscore-prefixed engine methods are lifecycle hooks meant to be
    /// overridden, not called.
    pub protected: bool,
}

/// How a parsed method is declared.
pub enum MethodStyle {
    ClassMember,
    Global,
}

pub fn parse_method(node: Node<'_, '_>) -> Result<ParsedMethod> {
    let name = node
        .attribute("name")
        .context("method element is missing its name attribute")?
        .to_string();
    let is_vararg = node.attribute("qualifiers") == Some("vararg");

    let doc = node
        .children()
        .find(|c| c.has_tag_name("description"))
        .and_then(|d| d.text())
        .map(format_doc)
        .unwrap_or_default();

    let return_type = return_type_for(&name, &node);

    let argument_list = if is_vararg {
        "...args: any[]".to_string()
    } else {
        arguments_for(&node)
    };

    let protected = name.starts_with('_');
    Ok(ParsedMethod {
        name,
        argument_list,
        doc,
        return_type,
        protected,
    })
}

fn return_type_for(name: &str, node: &Node<'_, '_>) -> String {
    // A handful of engine signatures are too loose to be useful; tighten
    // the ones projects hit constantly.
    match name {
        "get_children" => return "Node[]".to_string(),
        "get_overlapping_bodies" => return "PhysicsBody2D[]".to_string(),
        _ => {}
    }
    let declared = node
        .children()
        .find(|c| c.has_tag_name("return"))
        .and_then(|r| r.attribute("type"))
        .unwrap_or("Variant");
    godot_type_to_ts(declared)
}

fn arguments_for(node: &Node<'_, '_>) -> String {
    let params: Vec<Node<'_, '_>> = node
        .children()
        .filter(|c| c.has_tag_name("param") || c.has_tag_name("argument"))
        .collect();

    let mut parts = Vec::with_capacity(params.len());
    for (i, param) in params.iter().enumerate() {
        let arg_name = sanitize_name(param.attribute("name").unwrap_or("arg"));
        let declared = param.attribute("type").unwrap_or("Variant");

        let mut arg_type = godot_type_to_ts(declared);
        if declared == "StringName" {
            // Group and action names resolve against project-derived unions.
            match arg_name.as_str() {
                "group" => arg_type = "keyof Groups".to_string(),
                "action" => arg_type = "Action".to_string(),
                _ => {}
            }
        }

        // A parameter is optional only when it and everything after it
        // carry defaults.
        let optional = params[i..]
            .iter()
            .all(|p| p.attribute("default").is_some());
        let marker = if optional { "?" } else { "" };
        parts.push(format!("{arg_name}{marker}: {arg_type}"));
    }
    parts.join(", ")
}

/// Declaration text for one method, or an empty string when the support
/// layer supersedes it.
pub fn render_method(method: &ParsedMethod, style: MethodStyle) -> String {
    if SKIPPED_METHODS.contains(&method.name.as_str()) {
        return String::new();
    }

    let doc = &method.doc;
    match method.name.as_str() {
        "is_action_just_pressed" | "is_action_pressed" | "is_action_just_released" => {
            return format!("{doc}\n{}(action: Action): boolean;", method.name);
        }
        "get_node" => {
            return format!(
                "{doc}\nget_node(path: NodePathType): Node;\n\n\
                 {doc}\nget_node_unsafe<T extends Node>(path: NodePathType): T;"
            );
        }
        "change_scene" => {
            return format!("{doc}\nchange_scene(path: SceneName): int;");
        }
        "get_nodes_in_group" => {
            return format!(
                "{doc}\nget_nodes_in_group<T extends keyof Groups>(group: T): Groups[T][];"
            );
        }
        "has_group" => {
            return format!("{doc}\nhas_group<T extends keyof Groups>(name: T): boolean;");
        }
        "emit_signal" => {
            return format!(
                "{doc}\nemit_signal<U extends (...args: Args) => any, T extends Signal<U>, \
                 Args extends any[]>(signal: T, ...args: Args): void;"
            );
        }
        _ => {}
    }

    match style {
        MethodStyle::Global => format!(
            "{doc}\ndeclare const {}: ({}) => {};",
            method.name, method.argument_list, method.return_type
        ),
        MethodStyle::ClassMember => {
            let prefix = if method.protected { "protected " } else { "" };
            format!(
                "{doc}\n{prefix}{}({}): {};",
                method.name, method.argument_list, method.return_type
            )
        }
    }
}

//! Phase two of definition generation: one `.d.ts` per engine class.

use anyhow::{Context, Result};
use roxmltree::Document;

use crate::global_scope::{class_root, elements, SingletonSet};
use crate::method::{parse_method, render_method, MethodStyle};
use crate::util::{format_doc, godot_type_to_ts, sanitize_name};

/// Value types that construct by plain call, `Vector2(1, 2)`, with no `new`.
const BARE_CALL_CLASSES: &[&str] = &["Vector2", "Vector2i", "Vector3", "Vector3i", "Rect2", "Color"];

/// Vector types whose arithmetic goes through named overload methods.
const OPERATOR_OVERLOAD_CLASSES: &[&str] = &["Vector2", "Vector2i", "Vector3", "Vector3i"];

#[derive(Debug)]
pub struct ClassFile {
    /// Name the output file should carry, before any singleton suffix.
    pub class_name: String,
    /// Contents of the generated declaration file.
    pub declarations: String,
}

pub fn generate_class_file(xml: &str, singletons: &SingletonSet) -> Result<ClassFile> {
    let doc = Document::parse(xml).context("class reference is not well-formed XML")?;
    let class = class_root(&doc)?;

    let raw_name = class.attribute("name").unwrap_or_default().to_string();
    let inherits = class.attribute("inherits");

    let is_bare_call = BARE_CALL_CLASSES.contains(&raw_name.as_str());
    // Singleton instances shadow the class name in the global scope, so the
    // class itself declares under a suffixed name.
    let declared_name = if singletons.contains(&raw_name) {
        format!("{raw_name}Class")
    } else {
        raw_name.clone()
    };

    let class_doc = class
        .children()
        .find(|c| c.has_tag_name("description"))
        .and_then(|d| d.text())
        .map(format_doc)
        .unwrap_or_default();

    let mut constructors = Vec::new();
    for ctor in elements(class, "constructors", "constructor") {
        constructors.push(parse_method(ctor)?);
    }

    let mut sections: Vec<String> = Vec::new();
    if !class_doc.is_empty() {
        sections.push(class_doc);
    }

    let header = if is_bare_call {
        format!("declare class {declared_name}Constructor {{")
    } else {
        match inherits {
            Some(base) => format!("declare class {declared_name} extends {base} {{"),
            None => format!("declare class {declared_name} {{"),
        }
    };
    sections.push(header);

    if let Some(element_type) = pool_array_element(&raw_name) {
        sections.push(format!("[n: number]: {element_type};"));
    }

    let constructor_lines = constructor_declarations(&declared_name, &constructors, is_bare_call);
    if !is_bare_call {
        sections.push(constructor_lines.clone());
    }

    for member in elements(class, "members", "member") {
        let name = sanitize_name(
            member
                .attribute("name")
                .context("class member is missing its name attribute")?,
        );
        let Some(doc_text) = member.text().map(str::trim).filter(|t| !t.is_empty()) else {
            continue;
        };
        let ts_type = godot_type_to_ts(member.attribute("type").unwrap_or("Variant"));
        sections.push(format!("{}\n{name}: {ts_type};", format_doc(doc_text)));
    }

    for method in elements(class, "methods", "method") {
        let rendered = render_method(&parse_method(method)?, MethodStyle::ClassMember);
        if !rendered.is_empty() {
            sections.push(rendered);
        }
    }

    sections.push(format!(
        "connect<T extends SignalsOf<{declared_name}>>(signal: T, \
         method: SignalFunction<{declared_name}[T]>): number;"
    ));

    if OPERATOR_OVERLOAD_CLASSES.contains(&raw_name.as_str()) {
        for op in ["add", "sub", "mul", "div"] {
            sections.push(format!(
                "{op}(other: number | {declared_name}): {declared_name};"
            ));
        }
    }

    for constant in elements(class, "constants", "constant") {
        let name = constant
            .attribute("name")
            .context("class constant is missing its name attribute")?;
        let value = constant.attribute("value").unwrap_or("").trim();
        let ts_type = constant_type(value);
        let doc = constant.text().map(str::trim).map(format_doc).unwrap_or_default();
        if doc.is_empty() {
            sections.push(format!("static {name}: {ts_type};"));
        } else {
            sections.push(format!("{doc}\nstatic {name}: {ts_type};"));
        }
    }

    for signal in elements(class, "signals", "signal") {
        let name = signal
            .attribute("name")
            .context("class signal is missing its name attribute")?;
        let doc = signal
            .children()
            .find(|c| c.has_tag_name("description"))
            .and_then(|d| d.text())
            .map(format_doc)
            .unwrap_or_default();
        let args: Vec<String> = signal
            .children()
            .filter(|c| c.has_tag_name("param") || c.has_tag_name("argument"))
            .map(|arg| {
                format!(
                    "{}: {}",
                    sanitize_name(arg.attribute("name").unwrap_or("arg")),
                    godot_type_to_ts(arg.attribute("type").unwrap_or("Variant"))
                )
            })
            .collect();
        let signature = format!("${name}: Signal<({}) => void>;", args.join(", "));
        if doc.is_empty() {
            sections.push(signature);
        } else {
            sections.push(format!("{doc}\n{signature}"));
        }
    }

    sections.push("}".to_string());

    // Bare-call classes split the instance shape from a callable-and-newable
    // constructor value.
    if is_bare_call {
        sections.push(format!(
            "declare type {declared_name} = {declared_name}Constructor;\n\
             declare var {declared_name}: typeof {declared_name}Constructor & {{\n\
             {constructor_lines}\n}};"
        ));
    }

    Ok(ClassFile {
        class_name: raw_name,
        declarations: sections.join("\n\n"),
    })
}

fn constructor_declarations(
    declared_name: &str,
    constructors: &[crate::method::ParsedMethod],
    is_bare_call: bool,
) -> String {
    let mut lines = Vec::new();
    if constructors.is_empty() {
        lines.push(format!("new(): {declared_name};"));
    } else {
        for ctor in constructors {
            lines.push(format!("new({}): {declared_name};", ctor.argument_list));
        }
    }

    if is_bare_call {
        // Plain-call form mirrors every new() overload.
        if constructors.is_empty() {
            lines.push(format!("(): {declared_name};"));
        } else {
            for ctor in constructors {
                lines.push(format!("({}): {declared_name};", ctor.argument_list));
            }
        }
    } else {
        lines.push(format!("static \"new\"(): {declared_name};"));
    }
    lines.join("\n")
}

/// Element type of the engine's pooled array classes, if this is one.
fn pool_array_element(class_name: &str) -> Option<&'static str> {
    match class_name {
        "PoolByteArray" | "PoolIntArray" | "PoolRealArray" => Some("number"),
        "PoolColorArray" => Some("Color"),
        "PoolStringArray" => Some("string"),
        "PoolVector2Array" => Some("Vector2"),
        "PoolVector3Array" => Some("Vector3"),
        _ => None,
    }
}

/// Constant values print as `Type(args)` for value types; anything else is
/// left untyped.
fn constant_type(value: &str) -> String {
    let Some(open) = value.find('(') else {
        return "any".to_string();
    };
    let type_name = &value[..open];
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() && chars.all(|c| c.is_ascii_alphanumeric()) => {
            godot_type_to_ts(type_name)
        }
        _ => "any".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global_scope::parse_global_scope;

    const NODE_XML: &str = r#"
        <class name="Sprite" inherits="Node2D" version="3.5">
            <description>A sprite.</description>
            <members>
                <member name="texture" type="Texture">The texture.</member>
            </members>
            <methods>
                <method name="get_rect">
                    <return type="Rect2" />
                    <description>Returns the rect.</description>
                </method>
                <method name="_draw">
                    <return type="void" />
                    <description>Draw hook.</description>
                </method>
            </methods>
            <signals>
                <signal name="frame_changed">
                    <description>Emitted on frame change.</description>
                </signal>
            </signals>
        </class>
    "#;

    fn empty_singletons() -> SingletonSet {
        parse_global_scope(r#"<class name="@GlobalScope"></class>"#)
            .unwrap()
            .singletons
    }

    #[test]
    fn ordinary_class_declares_with_inheritance() {
        let file = generate_class_file(NODE_XML, &empty_singletons()).unwrap();
        assert_eq!(file.class_name, "Sprite");
        assert!(file
            .declarations
            .contains("declare class Sprite extends Node2D {"));
        assert!(file.declarations.contains("texture: Texture;"));
        assert!(file.declarations.contains("get_rect(): Rect2;"));
        assert!(file.declarations.contains("protected _draw(): void;"));
        assert!(file.declarations.contains("new(): Sprite;"));
        assert!(file.declarations.contains("static \"new\"(): Sprite;"));
        assert!(file
            .declarations
            .contains("$frame_changed: Signal<() => void>;"));
        assert!(file
            .declarations
            .contains("connect<T extends SignalsOf<Sprite>>"));
    }

    #[test]
    fn singleton_class_gains_the_class_suffix() {
        let scope = parse_global_scope(
            r#"<class name="@GlobalScope">
                <members>
                    <member name="Input" type="Input">Input singleton.</member>
                </members>
            </class>"#,
        )
        .unwrap();

        let file = generate_class_file(
            r#"<class name="Input" inherits="Object"></class>"#,
            &scope.singletons,
        )
        .unwrap();
        assert_eq!(file.class_name, "Input");
        assert!(file
            .declarations
            .contains("declare class InputClass extends Object {"));
    }

    #[test]
    fn bare_call_class_splits_constructor_value() {
        let file = generate_class_file(
            r#"<class name="Vector2" version="3.5">
                <constructors>
                    <constructor name="Vector2">
                        <return type="Vector2" />
                        <param index="0" name="x" type="float" />
                        <param index="1" name="y" type="float" />
                    </constructor>
                </constructors>
            </class>"#,
            &empty_singletons(),
        )
        .unwrap();

        assert!(file
            .declarations
            .contains("declare class Vector2Constructor {"));
        assert!(file
            .declarations
            .contains("declare type Vector2 = Vector2Constructor;"));
        assert!(file.declarations.contains("new(x: float, y: float): Vector2;"));
        assert!(file.declarations.contains("(x: float, y: float): Vector2;"));
        assert!(file.declarations.contains("add(other: number | Vector2): Vector2;"));
        assert!(!file.declarations.contains("static \"new\""));
    }

    #[test]
    fn pool_arrays_get_an_index_signature() {
        let file = generate_class_file(
            r#"<class name="PoolStringArray"></class>"#,
            &empty_singletons(),
        )
        .unwrap();
        assert!(file.declarations.contains("[n: number]: string;"));
    }

    #[test]
    fn malformed_reference_is_rejected() {
        assert!(generate_class_file("<class></class>", &empty_singletons()).is_err());
        assert!(generate_class_file("not xml", &empty_singletons()).is_err());
    }
}

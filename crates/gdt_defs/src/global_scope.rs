//! Phase one of definition generation: `@GlobalScope.xml`.
//!
//! Produces the global declaration file and, as a side product, the set of
//! singleton names every later class file needs to consult. The set is
//! frozen here; phase two only reads it.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use roxmltree::{Document, Node};

use crate::util::{format_doc, godot_type_to_ts, sanitize_name};

/// Engine singleton names discovered in the global scope.
#[derive(Debug, Default)]
pub struct SingletonSet(BTreeSet<String>);

impl SingletonSet {
    pub fn contains(&self, class_name: &str) -> bool {
        self.0.contains(class_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug)]
pub struct GlobalScope {
    /// Contents of the generated global declaration file.
    pub declarations: String,
    pub singletons: SingletonSet,
}

pub fn parse_global_scope(xml: &str) -> Result<GlobalScope> {
    let doc = Document::parse(xml).context("global scope reference is not well-formed XML")?;
    let class = class_root(&doc)?;

    let mut singletons = BTreeSet::new();
    let mut declarations = Vec::new();

    for member in elements(class, "members", "member") {
        let raw_name = member
            .attribute("name")
            .context("global scope member is missing its name attribute")?;
        let name = sanitize_name(raw_name);
        singletons.insert(name.clone());

        // Undocumented singletons get no declaration but still count for
        // phase two's renaming.
        let Some(doc_text) = member.text().map(str::trim).filter(|t| !t.is_empty()) else {
            continue;
        };
        let ts_type = godot_type_to_ts(member.attribute("type").unwrap_or("Object"));
        declarations.push(format!(
            "{}\ndeclare const {name}: {ts_type}Class;",
            format_doc(doc_text)
        ));
    }

    // Constants with an enum attribute group into declared enums; the rest
    // of the global constants live in the support layer.
    let mut enums: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for constant in elements(class, "constants", "constant") {
        let Some(enum_name) = constant.attribute("enum") else {
            continue;
        };
        let name = constant
            .attribute("name")
            .context("global scope constant is missing its name attribute")?;
        let value = constant.attribute("value").unwrap_or("").trim();
        let value = if value.parse::<i64>().is_ok() {
            value.to_string()
        } else {
            format!("\"{value}\"")
        };

        let doc_text = constant.text().map(str::trim).unwrap_or("");
        let mut entry = String::new();
        let doc = format_doc(doc_text);
        if !doc.is_empty() {
            entry.push_str(&doc);
            entry.push('\n');
        }
        entry.push_str(&format!("{name} = {value}"));
        enums.entry(enum_name).or_default().push(entry);
    }

    for (enum_name, items) in &enums {
        declarations.push(format!(
            "declare enum {} {{\n{}\n}}",
            sanitize_name(enum_name),
            items.join(",\n")
        ));
    }

    Ok(GlobalScope {
        declarations: declarations.join("\n"),
        singletons: SingletonSet(singletons),
    })
}

/// The `<class name="...">` document root, validated.
pub(crate) fn class_root<'a>(doc: &'a Document<'a>) -> Result<Node<'a, 'a>> {
    let root = doc.root_element();
    if !root.has_tag_name("class") {
        bail!("expected a <class> document root, found <{}>", root.tag_name().name());
    }
    if root.attribute("name").is_none() {
        bail!("<class> root is missing its name attribute");
    }
    Ok(root)
}

/// Children of `<parent><child/></parent>` container elements.
pub(crate) fn elements<'a>(
    class: Node<'a, 'a>,
    parent: &'static str,
    child: &'static str,
) -> Vec<Node<'a, 'a>> {
    class
        .children()
        .filter(move |c| c.has_tag_name(parent))
        .flat_map(|p| p.children().filter(move |c| c.has_tag_name(child)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLOBAL_SCOPE: &str = r#"
        <class name="@GlobalScope" version="3.5">
            <members>
                <member name="Input" type="Input">The input singleton.</member>
                <member name="Engine" type="Engine"></member>
            </members>
            <constants>
                <constant name="KEY_ESCAPE" value="16777217" enum="KeyList">Escape key.</constant>
                <constant name="KEY_TAB" value="16777218" enum="KeyList">Tab key.</constant>
                <constant name="OK" value="0">Success.</constant>
            </constants>
        </class>
    "#;

    #[test]
    fn collects_singletons_and_declarations() {
        let scope = parse_global_scope(GLOBAL_SCOPE).unwrap();
        assert!(scope.singletons.contains("Input"));
        assert!(scope.singletons.contains("Engine"));
        assert_eq!(scope.singletons.len(), 2);

        assert!(scope
            .declarations
            .contains("declare const Input: InputClass;"));
        // Undocumented singleton: tracked but not declared.
        assert!(!scope.declarations.contains("declare const Engine"));
    }

    #[test]
    fn groups_enum_constants() {
        let scope = parse_global_scope(GLOBAL_SCOPE).unwrap();
        assert!(scope.declarations.contains("declare enum KeyList {"));
        assert!(scope.declarations.contains("KEY_ESCAPE = 16777217"));
        assert!(scope.declarations.contains("KEY_TAB = 16777218"));
        // Plain constants stay out of the enum declarations.
        assert!(!scope.declarations.contains("OK = 0"));
    }

    #[test]
    fn rejects_a_wrong_document_root() {
        let err = parse_global_scope("<classes></classes>").unwrap_err();
        assert!(err.to_string().contains("<class>"));
    }
}

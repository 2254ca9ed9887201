//! Name and type translation between the engine's class reference and
//! TypeScript declaration syntax.

/// Words that are legal engine identifiers but reserved in TypeScript.
const RESERVED_TS: &[&str] = &[
    "class", "default", "enum", "function", "in", "new", "typeof", "var", "with",
];

/// Make an engine identifier legal in a TypeScript declaration.
pub fn sanitize_name(name: &str) -> String {
    if RESERVED_TS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Engine type name → TypeScript type expression.
///
/// `int` and `float` survive as named aliases so generated signatures keep
/// the engine's numeric intent; the aliases themselves live in the base
/// definitions.
pub fn godot_type_to_ts(godot_type: &str) -> String {
    match godot_type {
        "" | "void" => "void".to_string(),
        "int" => "int".to_string(),
        "float" | "real" => "float".to_string(),
        "bool" => "boolean".to_string(),
        "String" => "string".to_string(),
        "Array" => "any[]".to_string(),
        "Variant" => "any".to_string(),
        "NodePath" => "NodePathType".to_string(),
        // Qualified enum references ("enum.Mesh.ArrayType") are plain
        // integers at the declaration level.
        other if other.starts_with("enum.") => "int".to_string(),
        other => other.to_string(),
    }
}

/// Engine doc text → a JSDoc block, or an empty string for empty docs.
pub fn format_doc(text: &str) -> String {
    let lines: Vec<&str> = text
        .trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return String::new();
    }

    let mut out = String::from("/**\n");
    for line in lines {
        out.push_str(" * ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(" */");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_typescript_words_gain_a_suffix() {
        assert_eq!(sanitize_name("with"), "with_");
        assert_eq!(sanitize_name("position"), "position");
    }

    #[test]
    fn engine_types_translate() {
        assert_eq!(godot_type_to_ts("bool"), "boolean");
        assert_eq!(godot_type_to_ts("Variant"), "any");
        assert_eq!(godot_type_to_ts("enum.Mesh.ArrayType"), "int");
        assert_eq!(godot_type_to_ts("Vector2"), "Vector2");
    }

    #[test]
    fn doc_blocks_trim_and_frame() {
        assert_eq!(format_doc("  "), "");
        assert_eq!(
            format_doc("First line.\n\n  Second line.  "),
            "/**\n * First line.\n * Second line.\n */"
        );
    }
}

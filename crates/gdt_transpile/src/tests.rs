//! End-to-end tests over the parse → transpile pipeline.

use gdt_ast::TranspileConfig;

use crate::TranspiledFile;

fn run(source: &str) -> TranspiledFile {
    let parsed = gdt_parser::parse_typescript(source, "test.ts").expect("test source parses");
    let config = TranspileConfig::default();
    crate::transpile(
        &parsed.module,
        Some(&parsed.comments),
        &parsed.source_map,
        "test.ts",
        &config,
    )
}

/// Transpile and require a diagnostic-free result.
fn clean(source: &str) -> String {
    let result = run(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result.diagnostics
    );
    result.source
}

#[test]
fn declaration_then_increment() {
    assert_eq!(clean("let x = 1;\nx++;\n"), "var x = 1\n\nx = x + 1\n");
}

#[test]
fn value_captured_before_mutation() {
    assert_eq!(clean("let y = x++ + 1;\n"), "var y = x + 1\nx = x + 1\n");
}

#[test]
fn argument_effects_flush_left_to_right() {
    assert_eq!(
        clean("f(a++, b++);\n"),
        "f(a, b)\na = a + 1\nb = b + 1\n"
    );
}

#[test]
fn independent_updates_flush_in_source_order() {
    assert_eq!(
        clean("let z = a++ + b--;\n"),
        "var z = a + b\na = a + 1\nb = b - 1\n"
    );
}

#[test]
fn pure_expressions_hoist_nothing() {
    let source = clean("g(a + b);\nlet c = a + b;\n");
    // Same expression text in both positions, no extra statements.
    assert_eq!(source, "g(a + b)\n\nvar c = a + b\n");
}

#[test]
fn decrement_statement() {
    assert_eq!(clean("n--;\n"), "n = n - 1\n");
}

#[test]
fn prefix_update_statement_rewrites() {
    assert_eq!(clean("++x;\n"), "x = x + 1\n");
    assert_eq!(clean("--n;\n"), "n = n - 1\n");
}

#[test]
fn prefix_update_in_value_position_is_reported() {
    let result = run("let y = ++x;\n");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, "PrefixUpdate");
}

#[test]
fn member_target_increment() {
    assert_eq!(
        clean("this.score++;\n"),
        "self.score = self.score + 1\n"
    );
}

#[test]
fn script_class_shape() {
    let source = clean(
        "export default class Player extends Node2D {\n\
         \x20   speed = 5;\n\
         \x20   _ready() {\n\
         \x20       this.speed = 6;\n\
         \x20   }\n\
         }\n",
    );
    assert_eq!(
        source,
        "extends Node2D\nclass_name Player\n\nvar speed = 5\n\nfunc _ready():\n    self.speed = 6\n"
    );
}

#[test]
fn anonymous_script_class_keeps_base_type() {
    assert_eq!(
        clean("export default class extends Node2D {}\n"),
        "extends Node2D\n"
    );
}

#[test]
fn unsupported_construct_reports_position_and_siblings_continue() {
    let result = run("let a = 1;\nlet f = () => 2;\nlet b = 3;\n");
    assert_eq!(result.diagnostics.len(), 1);
    let d = &result.diagnostics[0];
    assert_eq!(d.kind, "ArrowFunction");
    assert_eq!(d.line, 2);
    assert_eq!(d.col, 9);
    assert_eq!(d.file, "test.ts");
    assert!(result.source.contains("var a = 1"));
    assert!(result.source.contains("var b = 3"));
}

#[test]
fn reserved_words_are_renamed() {
    let source = clean("let pass = 1;\nlet match = 2;\n");
    assert!(source.contains("var pass_ = 1"));
    assert!(source.contains("var match_ = 2"));
}

#[test]
fn operator_mappings() {
    assert_eq!(
        clean("let k = a === b && c !== d;\n"),
        "var k = a == b and c != d\n"
    );
    assert_eq!(clean("let p = x ** 2;\n"), "var p = pow(x, 2)\n");
    assert_eq!(
        clean("let q = y ?? z;\n"),
        "var q = (y if y != null else z)\n"
    );
    assert_eq!(clean("let r = v instanceof Node;\n"), "var r = v is Node\n");
    assert_eq!(clean("let s = !done;\n"), "var s = not done\n");
    assert_eq!(clean("let t = \"k\" in lookup;\n"), "var t = \"k\" in lookup\n");
}

#[test]
fn for_loop_lowers_to_while() {
    assert_eq!(
        clean("for (let i = 0; i < 3; i++) {\n    total += i;\n}\n"),
        "var i = 0\nwhile i < 3:\n    total += i\n    i = i + 1\n"
    );
}

#[test]
fn continue_under_a_lowered_for_is_reported() {
    let result = run(
        "for (let i = 0; i < 3; i++) {\n    if (i == 1) {\n        continue;\n    }\n    f(i);\n}\n",
    );
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, "ContinueInForLoop");
}

#[test]
fn inner_loop_continue_does_not_flag_the_outer_for() {
    let source =
        clean("for (let i = 0; i < 3; i++) {\n    while (busy) {\n        continue;\n    }\n}\n");
    assert!(source.contains("while busy:"));
}

#[test]
fn continue_in_a_plain_while_stays_supported() {
    assert_eq!(
        clean("while (j < n) {\n    if (skip) {\n        continue;\n    }\n    j += 1;\n}\n"),
        "while j < n:\n    if skip:\n        continue\n    j += 1\n"
    );
}

#[test]
fn while_body_update_statement() {
    assert_eq!(
        clean("while (j < n) {\n    j++;\n}\n"),
        "while j < n:\n    j = j + 1\n"
    );
}

#[test]
fn if_chain_uses_elif() {
    assert_eq!(
        clean(
            "if (a > 1) {\n    f();\n} else if (a > 0) {\n    g();\n} else {\n    h();\n}\n"
        ),
        "if a > 1:\n    f()\nelif a > 0:\n    g()\nelse:\n    h()\n"
    );
}

#[test]
fn empty_branch_renders_pass() {
    assert_eq!(clean("if (ready) {}\n"), "if ready:\n    pass\n");
}

#[test]
fn switch_lowers_to_match() {
    assert_eq!(
        clean(
            "switch (x) {\n    case 1:\n        f();\n        break;\n    default:\n        g();\n}\n"
        ),
        "match x:\n    1:\n        f()\n    _:\n        g()\n"
    );
}

#[test]
fn case_fallthrough_is_reported() {
    let result = run(
        "switch (x) {\n    case 1:\n        f();\n    case 2:\n        g();\n        break;\n}\n",
    );
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, "CaseFallthrough");
}

#[test]
fn case_ending_in_return_is_not_fallthrough() {
    let source = clean(
        "switch (x) {\n    case 1:\n        return f();\n    default:\n        return g();\n}\n",
    );
    assert!(source.contains("match x:"));
}

#[test]
fn for_of_and_for_in() {
    assert_eq!(
        clean("for (const item of items) {\n    f(item);\n}\n"),
        "for item in items:\n    f(item)\n"
    );
    assert_eq!(
        clean("for (const key in table) {\n    f(key);\n}\n"),
        "for key in table:\n    f(key)\n"
    );
}

#[test]
fn literals_and_templates() {
    assert_eq!(
        clean("let msg = `hi ${name}!`;\n"),
        "var msg = \"hi \" + str(name) + \"!\"\n"
    );
    assert_eq!(clean("let d = { a: 1 };\n"), "var d = { \"a\": 1 }\n");
    assert_eq!(clean("let e = [1, 2];\n"), "var e = [1, 2]\n");
    assert_eq!(clean("let u = undefined;\n"), "var u = null\n");
    assert_eq!(clean("let m = cond ? 1 : 2;\n"), "var m = 1 if cond else 2\n");
    assert_eq!(clean("let h = 0.5;\n"), "var h = 0.5\n");
}

#[test]
fn string_valued_names_render_everywhere() {
    assert_eq!(clean("let d = { \"a b\": 1 };\n"), "var d = { \"a b\": 1 }\n");
    assert_eq!(clean("enum Tag { \"Idle\" }\n"), "enum Tag { Idle }\n");
    let source = clean(
        "export default class A extends Node {\n    \"pass\"() {\n        return 1;\n    }\n}\n",
    );
    assert!(source.contains("func pass_():"));
}

#[test]
fn const_with_literal_initializer_stays_const() {
    assert_eq!(clean("const SPEED = 100;\n"), "const SPEED = 100\n");
    assert_eq!(clean("const items = f();\n"), "var items = f()\n");
}

#[test]
fn call_overrides() {
    assert_eq!(clean("arr.push(1);\n"), "arr.append(1)\n");
    assert_eq!(clean("console.log(\"hi\");\n"), "print(\"hi\")\n");
    assert_eq!(clean("let n = Math.floor(x);\n"), "var n = floor(x)\n");
    assert_eq!(clean("let l = arr.length;\n"), "var l = arr.size()\n");
    assert_eq!(clean("let v = new Vector2(1, 2);\n"), "var v = Vector2(1, 2)\n");
    assert_eq!(clean("let o = new Enemy();\n"), "var o = Enemy.new()\n");
}

#[test]
fn type_annotations_are_erased() {
    assert_eq!(
        clean("let hp: int = 3;\nlet node = target as Node;\n"),
        "var hp = 3\n\nvar node = target\n"
    );
}

#[test]
fn constructor_accessors_and_super() {
    let source = clean(
        "export default class Actor extends Node {\n\
         \x20   _hp = 10;\n\
         \x20   constructor() {\n\
         \x20       super();\n\
         \x20   }\n\
         \x20   get hp() {\n\
         \x20       return this._hp;\n\
         \x20   }\n\
         \x20   set hp(value: int) {\n\
         \x20       this._hp = value;\n\
         \x20   }\n\
         }\n",
    );
    assert!(source.contains("var _hp = 10"));
    assert!(source.contains("func _init():\n    ._init()"));
    assert!(source.contains("func get_hp():\n    return self._hp"));
    assert!(source.contains("func set_hp(value):\n    self._hp = value"));
}

#[test]
fn doc_comments_translate_to_hash_comments() {
    let source = clean(
        "/** The hero. */\nexport default class Hero extends Node2D {\n\
         \x20   /** Max health. */\n\
         \x20   max_health = 3;\n\
         }\n",
    );
    assert!(source.starts_with("# The hero.\nextends Node2D\nclass_name Hero"));
    assert!(source.contains("# Max health.\nvar max_health = 3"));
}

#[test]
fn enum_and_inner_class() {
    let source = clean(
        "enum State { Idle, Running = 3 }\n\
         class Helper {\n\
         \x20   describe() {\n\
         \x20       return \"ok\";\n\
         \x20   }\n\
         }\n",
    );
    assert_eq!(
        source,
        "enum State { Idle, Running = 3 }\n\nclass Helper:\n    func describe():\n        return \"ok\"\n"
    );
}

#[test]
fn interfaces_and_imports_leave_no_trace() {
    let source = clean(
        "import { Foo } from \"./foo\";\n\
         interface Shape { area: float; }\n\
         type Alias = Shape;\n\
         let a = 1;\n",
    );
    assert_eq!(source, "var a = 1\n");
}

#[test]
fn debugger_becomes_breakpoint() {
    assert_eq!(clean("debugger;\n"), "breakpoint\n");
}

//! End-to-end parser tests: source in, tree out, rendered source back.

use ctree::ast::{Ast, NodeKind};
use ctree::parser::Parser;

fn roundtrip(src: &str) -> String {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let unit = parser.parse(&mut ast, src).unwrap();
    ast.to_c(unit)
}

fn expr(src: &str) -> (Ast, ctree::ast::NodeId) {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let e = parser.parse_expression(&mut ast, src).unwrap();
    (ast, e)
}

#[test]
fn test_minimal_function() {
    assert_eq!(
        roundtrip("int main(void) { return 0; }"),
        "int main(void) {\n    return 0;\n}"
    );
}

#[test]
fn test_declaration_with_multiple_declarators() {
    assert_eq!(roundtrip("int x = 5, *p, a[10];"), "int x = 5, *p, a[10];");
}

#[test]
fn test_precedence_shapes_the_tree() {
    let (ast, e) = expr("1 + 2 * 3");
    assert_eq!(ast.kind(e), NodeKind::Add);
    let rhs = ast.child(e, "expr2").unwrap();
    assert_eq!(ast.kind(rhs), NodeKind::Multiply);
    assert_eq!(ast.to_c(e), "1 + 2 * 3");
}

#[test]
fn test_parenthesized_grouping_survives_reprint() {
    let (ast, e) = expr("(1 + 2) * 3");
    assert_eq!(ast.kind(e), NodeKind::Multiply);
    assert_eq!(ast.to_c(e), "(1 + 2) * 3");
}

#[test]
fn test_assignment_is_right_associative() {
    let (ast, e) = expr("a = b = c");
    assert_eq!(ast.kind(e), NodeKind::Assign);
    let rval = ast.child(e, "rval").unwrap();
    assert_eq!(ast.kind(rval), NodeKind::Assign);
}

#[test]
fn test_conditional_and_comma() {
    let (ast, e) = expr("a ? b : c, d");
    assert_eq!(ast.kind(e), NodeKind::Comma);
    let exprs = ast.child(e, "exprs").unwrap();
    assert_eq!(ast.list_len(exprs), 2);
    assert_eq!(ast.kind(ast.first_node(exprs).unwrap()), NodeKind::Conditional);
}

#[test]
fn test_postfix_chain() {
    let (ast, e) = expr("a.b->c[0]++");
    assert_eq!(ast.kind(e), NodeKind::PostInc);
    assert_eq!(ast.to_c(e), "a.b->c[0]++");
}

#[test]
fn test_call_arguments() {
    let (ast, e) = expr("f(x, y + 1)");
    assert_eq!(ast.kind(e), NodeKind::Call);
    let args = ast.child(e, "args").unwrap();
    assert_eq!(ast.list_len(args), 2);
}

#[test]
fn test_cast_versus_call_depends_on_typenames() {
    // `(T)(x)` is a call unless T is a known typename
    let plain = Parser::new();
    let mut ast = Ast::new();
    let e = plain.parse_expression(&mut ast, "(T)(x)").unwrap();
    assert_eq!(ast.kind(e), NodeKind::Call);

    let mut with_typedef = Parser::new();
    with_typedef.add_typename("T");
    let mut ast = Ast::new();
    let e = with_typedef.parse_expression(&mut ast, "(T)(x)").unwrap();
    assert_eq!(ast.kind(e), NodeKind::Cast);
}

#[test]
fn test_typedef_registers_for_rest_of_unit() {
    let out = roundtrip("typedef unsigned long size_t;\n\nsize_t n;");
    assert_eq!(out, "typedef unsigned long int size_t;\n\nsize_t n;");
}

#[test]
fn test_sizeof_type_and_expression() {
    let (ast, e) = expr("sizeof(int)");
    let arg = ast.child(e, "expr").unwrap();
    assert_eq!(ast.kind(arg), NodeKind::Int);

    let (ast, e) = expr("sizeof x");
    let arg = ast.child(e, "expr").unwrap();
    assert_eq!(ast.kind(arg), NodeKind::Variable);
}

#[test]
fn test_function_pointer_declaration() {
    assert_eq!(
        roundtrip("int (*handler)(int, char *);"),
        "int (*handler)(int, char *);"
    );
}

#[test]
fn test_array_of_pointers_versus_pointer_to_array() {
    assert_eq!(roundtrip("int *a[3];"), "int *a[3];");
    assert_eq!(roundtrip("int (*a)[3];"), "int (*a)[3];");
}

#[test]
fn test_struct_with_bitfields() {
    let out = roundtrip("struct flags { unsigned int ready : 1; unsigned int error : 2; };");
    assert_eq!(
        out,
        "struct flags {\n    unsigned int ready : 1;\n    unsigned int error : 2;\n};"
    );
}

#[test]
fn test_enum_body() {
    let out = roundtrip("enum color { RED, GREEN = 5, BLUE };");
    assert_eq!(out, "enum color {\n    RED,\n    GREEN = 5,\n    BLUE\n};");
}

#[test]
fn test_control_flow_statements() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let stmt = parser
        .parse_statement(&mut ast, "do { x--; } while (x > 0);")
        .unwrap();
    assert_eq!(ast.kind(stmt), NodeKind::While);
    assert!(ast.flag(stmt, "do"));
}

#[test]
fn test_for_with_declaration_init() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let stmt = parser
        .parse_statement(&mut ast, "for (int i = 0; i < n; i++) f(i);")
        .unwrap();
    let init = ast.child(stmt, "init").unwrap();
    assert_eq!(ast.kind(init), NodeKind::Declaration);
    assert_eq!(
        ast.to_c(stmt),
        "    for (int i = 0; i < n; i++)\n        f(i);"
    );
}

#[test]
fn test_labels_collect_onto_statement() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let stmt = parser
        .parse_statement(&mut ast, "retry: case 1: default: x = 0;")
        .unwrap();
    let labels = ast.child(stmt, "labels").unwrap();
    let kinds: Vec<_> = ast
        .list_nodes(labels)
        .into_iter()
        .map(|l| ast.kind(l))
        .collect();
    assert_eq!(
        kinds,
        [NodeKind::PlainLabel, NodeKind::Case, NodeKind::Default]
    );
}

#[test]
fn test_kr_function_definition() {
    let src = "int add(a, b)\nint a;\nint b;\n{\nreturn a + b;\n}";
    let parser = Parser::new();
    let mut ast = Ast::new();
    let unit = parser.parse(&mut ast, src).unwrap();
    let def = ast.first_node(ast.child(unit, "entities").unwrap()).unwrap();
    assert_eq!(ast.kind(def), NodeKind::FunctionDef);
    assert!(ast.flag(def, "no_prototype"));
    assert_eq!(
        ast.to_c(def),
        "int add(a, b)\n    int a;\n    int b;\n{\n    return a + b;\n}"
    );
}

#[test]
fn test_initializer_lists_and_designators() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let decl = parser
        .parse_declaration(&mut ast, "struct point p = { .x = 1, [2] = 3, 4 };")
        .unwrap();
    assert_eq!(
        ast.to_c(decl),
        "struct point p = {\n    .x = 1,\n    [2] = 3,\n    4\n};"
    );
}

#[test]
fn test_compound_literal_expression() {
    let (ast, e) = expr("(struct point) { 1, 2 }");
    assert_eq!(ast.kind(e), NodeKind::CompoundLiteral);
    assert!(ast.child(e, "type").is_some());
}

#[test]
fn test_wide_and_adjacent_string_literals() {
    let (ast, e) = expr("\"ab\" \"cd\"");
    assert_eq!(ast.field_str(e, "val"), Some("abcd"));

    let (ast, e) = expr("L\"wide\"");
    assert!(ast.flag(e, "wide"));
}

#[test]
fn test_integer_literal_formats_preserved() {
    let (ast, e) = expr("0x1f");
    assert_eq!(ast.field_str(e, "format"), Some("hex"));
    assert_eq!(ast.to_c(e), "31");
}

#[test]
fn test_matches_compares_structurally() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let e = parser.parse_expression(&mut ast, "1 + 2 * 3").unwrap();
    assert!(parser.matches(&ast, e, "1 + (2 * 3)"));
    assert!(!parser.matches(&ast, e, "(1 + 2) * 3"));
    assert!(!parser.matches(&ast, e, "not valid C"));
}

#[test]
fn test_matches_type_entity() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let ty = parser.parse_type(&mut ast, "const char *").unwrap();
    assert!(parser.matches(&ast, ty, "const char *"));
    assert!(!parser.matches(&ast, ty, "char *"));
}

#[test]
fn test_parse_errors_carry_positions() {
    let parser = Parser::new().with_filename("input.c");
    let mut ast = Ast::new();
    let err = parser.parse(&mut ast, "int x = ;").unwrap_err();
    let pos = err.pos.expect("error should have a position");
    assert_eq!(pos.to_string(), "input.c:1:9");
}

#[test]
fn test_trailing_garbage_rejected() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    assert!(parser.parse_expression(&mut ast, "a + b c").is_err());
}

#[test]
fn test_node_positions_from_source() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let unit = parser.parse(&mut ast, "int a;\nint b;\n").unwrap();
    let entities = ast.child(unit, "entities").unwrap();
    let second = ast.last_node(entities).unwrap();
    assert_eq!(ast.pos(second).unwrap().line, 2);
}

#[test]
fn test_varargs_prototype() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let decl = parser
        .parse_declaration(&mut ast, "int printf(const char *fmt, ...);")
        .unwrap();
    assert_eq!(ast.to_c(decl), "int printf(const char *fmt, ...);");
}

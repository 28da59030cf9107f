//! Parse, reshape, re-render: mutation through the attach protocol on
//! trees built by the parser.

use ctree::ast::{Ast, NodeId, NodeKind, Value, Visit};
use ctree::parser::Parser;

fn parse(src: &str) -> (Ast, NodeId) {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let unit = parser.parse(&mut ast, src).unwrap();
    (ast, unit)
}

fn first_entity(ast: &Ast, unit: NodeId) -> NodeId {
    let entities = ast.child(unit, "entities").unwrap();
    ast.first_node(entities).unwrap()
}

#[test]
fn test_replace_initializer() {
    let (mut ast, unit) = parse("int x = 1 + 2;");
    let decl = first_entity(&ast, unit);
    let declarators = ast.child(decl, "declarators").unwrap();
    let declarator = ast.first_node(declarators).unwrap();
    let init = ast.child(declarator, "init").unwrap();

    let seven = ast.node_with(NodeKind::IntLiteral, &[7.into()]);
    ast.replace_with(init, &[seven]);

    assert_eq!(ast.to_c(unit), "int x = 7;");
    // the old initializer is detached but still alive
    assert!(!ast.is_attached(init));
    assert_eq!(ast.to_c(init), "1 + 2");
}

#[test]
fn test_attached_node_is_copied_on_reattach() {
    let mut ast = Ast::new();
    let x = ast.node_with(NodeKind::Variable, &["x".into()]);
    let sum = ast.node_with(NodeKind::Add, &[x.into(), x.into()]);

    // x was attached as expr1, so expr2 received a copy
    let lhs = ast.child(sum, "expr1").unwrap();
    let rhs = ast.child(sum, "expr2").unwrap();
    assert_eq!(lhs, x);
    assert_ne!(rhs, x);
    assert!(ast.eq(lhs, rhs));

    ast.set_field(x, "name", Value::Str("y".to_owned()));
    assert_eq!(ast.to_c(sum), "y + x");
}

#[test]
fn test_detach_statement_from_block() {
    let (mut ast, unit) = parse("void f(void) { a(); b(); c(); }");
    let def = first_entity(&ast, unit);
    let block = ast.child(def, "def").unwrap();
    let stmts = ast.child(block, "stmts").unwrap();
    let second = ast.at(stmts, 1).unwrap();

    ast.detach(second);

    assert_eq!(ast.list_len(stmts), 2);
    assert_eq!(ast.to_c(unit), "void f(void) {\n    a();\n    c();\n}");
    assert_eq!(ast.to_c(second), "    b();");
}

#[test]
fn test_splice_statements() {
    let (mut ast, unit) = parse("void f(void) { old(); }");
    let def = first_entity(&ast, unit);
    let block = ast.child(def, "def").unwrap();
    let stmts = ast.child(block, "stmts").unwrap();

    let parser = Parser::new();
    let s1 = parser.parse_statement(&mut ast, "x = 1;").unwrap();
    let s2 = parser.parse_statement(&mut ast, "g(x);").unwrap();
    ast.splice(stmts, 0, 1, &[s1, s2]);

    assert_eq!(
        ast.to_c(unit),
        "void f(void) {\n    x = 1;\n    g(x);\n}"
    );
}

#[test]
fn test_render_survives_detached_branch() {
    let (mut ast, unit) = parse("void f(void) { if (p) g(); }");
    let def = first_entity(&ast, unit);
    let block = ast.child(def, "def").unwrap();
    let stmts = ast.child(block, "stmts").unwrap();
    let if_ = ast.first_node(stmts).unwrap();
    let then = ast.child(if_, "then").unwrap();

    ast.detach(then);

    assert_eq!(ast.to_c(unit), "void f(void) {\n    if (p)\n}");
    assert_eq!(ast.to_c(then), "    g();");
}

#[test]
fn test_swap_condition_branches() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let e = parser.parse_expression(&mut ast, "p ? yes : no").unwrap();
    let then = ast.child(e, "then").unwrap();
    let els = ast.child(e, "else").unwrap();

    ast.swap_with(then, els);

    assert_eq!(ast.to_c(e), "p ? no : yes");
}

#[test]
fn test_deep_copy_is_structurally_equal() {
    let (mut ast, unit) = parse("int fib(int n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); }");
    let def = first_entity(&ast, unit);

    let copy = ast.deep_copy(def);

    assert_ne!(copy, def);
    assert!(!ast.is_attached(copy));
    assert!(ast.eq(def, copy));
    assert_eq!(ast.structural_hash(def), ast.structural_hash(copy));
    assert_eq!(ast.to_c(copy), ast.to_c(def));

    // diverge the copy; equality and hashes split
    ast.set_field(copy, "name", Value::Str("fib2".to_owned()));
    assert!(!ast.eq(def, copy));
}

#[test]
fn test_rename_calls_via_preorder() {
    let (mut ast, unit) = parse("void f(void) { log(1); log(2); other(); }");

    let mut calls = Vec::new();
    ast.preorder(unit, |n| {
        if ast.kind(n) == NodeKind::Call {
            calls.push(ast.child(n, "expr").unwrap());
        }
        Visit::Continue
    });
    for callee in calls {
        if ast.field_str(callee, "name") == Some("log") {
            ast.set_field(callee, "name", Value::Str("trace".to_owned()));
        }
    }

    assert_eq!(
        ast.to_c(unit),
        "void f(void) {\n    trace(1);\n    trace(2);\n    other();\n}"
    );
}

#[test]
fn test_prune_keeps_nested_functions_out() {
    // collect top-level declaration names only, pruning below each
    // function definition
    let (ast, unit) = parse("int a;\n\nvoid f(void) { int inner; }\n\nint b;");
    let mut names = Vec::new();
    ast.preorder(unit, |n| match ast.kind(n) {
        NodeKind::FunctionDef => Visit::Prune,
        NodeKind::Declarator => {
            if let Some(name) = ast.field_str(n, "name") {
                names.push(name.to_owned());
            }
            Visit::Continue
        }
        _ => Visit::Continue,
    });
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn test_detach_declarator_list_wholesale() {
    let mut ast = Ast::new();
    let i = ast.node_full(NodeKind::Declarator, &[], &[("name", "i".into())]);
    let j = ast.node_full(NodeKind::Declarator, &[], &[("name", "j".into())]);
    let declarators = ast.array(&[i, j]);
    let int = ast.node(NodeKind::Int);
    let decl = ast.node_with(NodeKind::Declaration, &[int.into(), declarators.into()]);

    assert_eq!(ast.list_len(declarators), 2);
    assert_eq!(ast.parent(i), Some(declarators));
    assert_eq!(ast.root(i), decl);

    // the list node is itself a child and detaches as a unit
    ast.detach(declarators);
    assert_eq!(ast.child(decl, "declarators"), None);
    assert!(!ast.is_attached(declarators));
    assert_eq!(ast.list_nodes(declarators), [i, j]);
    assert_eq!(ast.parent(i), Some(declarators));
}

#[test]
fn test_chain_insert_before_back_references() {
    let mut ast = Ast::new();
    let orig0 = ast.node(NodeKind::Int);
    let orig1 = ast.node(NodeKind::Int);
    let chain = ast.chain(&[orig0, orig1]);
    let new0 = ast.node(NodeKind::Int);
    let new1 = ast.node(NodeKind::Int);

    ast.list_insert_before(chain, orig1, &[new0, new1]);

    assert_eq!(ast.list_nodes(chain), [orig0, new0, new1, orig1]);
    assert_eq!(ast.list_next(orig0), Some(new0));
    assert_eq!(ast.list_next(new0), Some(new1));
    assert_eq!(ast.list_next(new1), Some(orig1));
    assert_eq!(ast.list_next(orig1), None);
    assert_eq!(ast.list_prev(orig1), Some(new1));
    assert_eq!(ast.list_prev(new1), Some(new0));
    assert_eq!(ast.list_prev(new0), Some(orig0));
    assert_eq!(ast.list_prev(orig0), None);
}

#[test]
fn test_pop_first_member_initializer() {
    let parser = Parser::new();
    let mut ast = Ast::new();
    let e = parser
        .parse_expression(&mut ast, "(struct point) { 1, 2, 3 }")
        .unwrap();
    let inits = ast.child(e, "member_inits").unwrap();
    let rest = ast.last_n(inits, 2);

    let popped = ast.shift(inits).unwrap();

    assert_eq!(ast.parent(popped), None);
    assert_eq!(ast.list_nodes(inits), rest);
}

#[test]
fn test_insert_sibling_statements() {
    let (mut ast, unit) = parse("void f(void) { middle(); }");
    let def = first_entity(&ast, unit);
    let block = ast.child(def, "def").unwrap();
    let stmts = ast.child(block, "stmts").unwrap();
    let middle = ast.first_node(stmts).unwrap();

    let parser = Parser::new();
    let before = parser.parse_statement(&mut ast, "first();").unwrap();
    let after = parser.parse_statement(&mut ast, "last();").unwrap();
    ast.insert_prev(middle, &[before]);
    ast.insert_next(middle, &[after]);

    assert_eq!(
        ast.to_c(unit),
        "void f(void) {\n    first();\n    middle();\n    last();\n}"
    );
    assert_eq!(ast.prev_sibling(middle), Some(before));
    assert_eq!(ast.next_sibling(middle), Some(after));
}

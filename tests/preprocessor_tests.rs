//! Preprocessor integration tests. These shell out to the system `cc` and
//! skip silently on machines without one.

use std::process::Command;

use ctree::ast::Ast;
use ctree::parser::Parser;
use ctree::preprocessor::Preprocessor;

fn have_cc() -> bool {
    Command::new("cc")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[test]
fn test_macro_expansion() {
    if !have_cc() {
        return;
    }
    let text = Preprocessor::new()
        .define("N", Some("3"))
        .preprocess("int a[N];")
        .unwrap();
    assert!(text.contains("int a[3];"), "got: {}", text);
}

#[test]
fn test_undef_removes_definition() {
    if !have_cc() {
        return;
    }
    let text = Preprocessor::new()
        .define("FLAG", None)
        .undef("FLAG")
        .preprocess("#ifdef FLAG\nint yes;\n#else\nint no;\n#endif\n")
        .unwrap();
    assert!(text.contains("int no;"), "got: {}", text);
    assert!(!text.contains("int yes;"));
}

#[test]
fn test_include_path_search() {
    if !have_cc() {
        return;
    }
    let dir = std::env::temp_dir().join(format!("ctree-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("answer.h"), "#define ANSWER 42\n").unwrap();

    let text = Preprocessor::new()
        .include_path(&dir)
        .preprocess("#include \"answer.h\"\nint x = ANSWER;")
        .unwrap();
    assert!(text.contains("int x = 42;"), "got: {}", text);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_preprocessed_output_parses_with_positions() {
    if !have_cc() {
        return;
    }
    let text = Preprocessor::new()
        .define("ONE", Some("1"))
        .preprocess("int a = ONE;\nint b;\n")
        .unwrap();

    let parser = Parser::new();
    let mut ast = Ast::new();
    let unit = parser.parse(&mut ast, &text).unwrap();
    assert_eq!(ast.to_c(unit), "int a = 1;\n\nint b;");

    // line markers steer node positions back to the temp file's lines
    let entities = ast.child(unit, "entities").unwrap();
    let b = ast.last_node(entities).unwrap();
    assert_eq!(ast.pos(b).unwrap().line, 2);
}

#[test]
fn test_error_reports_compiler_stderr() {
    if !have_cc() {
        return;
    }
    let err = Preprocessor::new()
        .preprocess("#include \"no-such-header-anywhere.h\"\n")
        .unwrap_err();
    assert!(!err.output.is_empty());
}

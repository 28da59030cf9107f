//! C source code parser.
//!
//! Transforms C99 source text into nodes in an [`Ast`]:
//! - [`lexer`]: tokenization (source text → tokens)
//! - [`Parser`]: configuration and entry points (tokens → nodes)
//!
//! The parser is hand-written recursive descent with precedence climbing
//! for binary operators. It expects preprocessed input; run source through
//! [`Preprocessor`](crate::preprocessor::Preprocessor) first if it uses
//! macros or `#include`.
//!
//! Typedef names change the grammar, so they are parser *configuration*:
//! seed [`Parser::typenames`] with any names the source assumes are already
//! defined. Typedefs in the parsed text itself are picked up as they are
//! declared.
//!
//! ```no_run
//! use ctree::ast::Ast;
//! use ctree::parser::Parser;
//!
//! let mut ast = Ast::new();
//! let parser = Parser::new();
//! let unit = parser.parse(&mut ast, "int main(void) { return 0; }").unwrap();
//! println!("{}", ast.to_c(unit));
//! ```

pub mod lexer;

mod declarations;
mod expressions;
mod session;
mod statements;

use std::error::Error;
use std::fmt;

use rustc_hash::FxHashSet;

use crate::ast::{Ast, NodeId, NodeKind, Pos};
use lexer::{Lexer, LexError};
use session::Session;

pub use lexer::{Keyword, Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub pos: Option<Pos>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pos {
            Some(pos) => write!(f, "{}: {}", pos, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            pos: Some(err.pos),
        }
    }
}

/// Parser configuration. One `Parser` can be reused across many inputs;
/// each `parse_*` call runs an independent session.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    /// Names the grammar must treat as types rather than identifiers.
    pub typenames: FxHashSet<String>,
    filename: Option<String>,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    /// Sets the filename reported in node positions and errors.
    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_owned());
        self
    }

    pub fn add_typename(&mut self, name: &str) {
        self.typenames.insert(name.to_owned());
    }

    fn session<'a>(&self, ast: &'a mut Ast, src: &str) -> Result<Session<'a>, ParseError> {
        let tokens = Lexer::new(src, self.filename.as_deref()).tokenize()?;
        Ok(Session::new(tokens, ast, self.typenames.clone()))
    }

    /// Parses a whole translation unit.
    pub fn parse(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let unit = s.translation_unit()?;
        s.expect_eof()?;
        Ok(unit)
    }

    /// Parses a single declaration, e.g. `int i, *p;`.
    pub fn parse_declaration(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let decl = s.declaration()?;
        s.expect_eof()?;
        Ok(decl)
    }

    /// Parses a single function definition.
    pub fn parse_function_def(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let entity = s.external_declaration()?;
        s.expect_eof()?;
        if s.ast.kind(entity) != NodeKind::FunctionDef {
            return Err(ParseError {
                message: "expected a function definition".to_owned(),
                pos: None,
            });
        }
        Ok(entity)
    }

    /// Parses a single statement, e.g. `while (1) { f(); }`.
    pub fn parse_statement(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let stmt = s.statement()?;
        s.expect_eof()?;
        Ok(stmt)
    }

    /// Parses a statement label, e.g. `done:` or `case 10:`.
    pub fn parse_label(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let label = s.label()?;
        s.expect_eof()?;
        Ok(label)
    }

    /// Parses an expression, e.g. `a ? *b : c[0]`.
    pub fn parse_expression(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let expr = s.expression()?;
        s.expect_eof()?;
        Ok(expr)
    }

    /// Parses a type name, e.g. `const char *`.
    pub fn parse_type(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let ty = s.type_name()?;
        s.expect_eof()?;
        Ok(ty)
    }

    /// Parses a bare declarator, e.g. `*argv[]`. The returned `Declarator`
    /// keeps its base-type slot open, same as a declarator inside a parsed
    /// declaration.
    pub fn parse_declarator(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let d = s.bare_declarator()?;
        s.expect_eof()?;
        Ok(d)
    }

    /// Parses a function parameter, e.g. `const char *name`.
    pub fn parse_parameter(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let p = s.parameter()?;
        s.expect_eof()?;
        Ok(p)
    }

    /// Parses an enumerator, e.g. `RED = 3`.
    pub fn parse_enumerator(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let e = s.enumerator()?;
        s.expect_eof()?;
        Ok(e)
    }

    /// Parses a struct or union member declaration, e.g. `unsigned flags : 4;`.
    pub fn parse_member(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let m = s.member_declaration()?;
        s.expect_eof()?;
        Ok(m)
    }

    /// Parses one element of an initializer list, e.g. `.x = 3` or `[0] = f()`.
    pub fn parse_member_init(&self, ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
        let mut s = self.session(ast, src)?;
        let m = s.member_init()?;
        s.expect_eof()?;
        Ok(m)
    }

    /// Parses `src` as whatever syntactic entity `id` is and compares the
    /// result structurally. Returns `false` on parse failure, and always
    /// `false` for list nodes.
    pub fn matches(&self, ast: &Ast, id: NodeId, src: &str) -> bool {
        use NodeKind::*;
        let kind = ast.kind(id);
        let mut scratch = Ast::new();
        let parsed = if kind == TranslationUnit {
            self.parse(&mut scratch, src)
        } else if kind == FunctionDef {
            self.parse_function_def(&mut scratch, src)
        } else if kind == Declaration {
            self.parse_declaration(&mut scratch, src)
        } else if kind == Declarator {
            self.parse_declarator(&mut scratch, src)
        } else if kind == Parameter {
            self.parse_parameter(&mut scratch, src)
        } else if kind == Enumerator {
            self.parse_enumerator(&mut scratch, src)
        } else if kind == MemberInit {
            self.parse_member_init(&mut scratch, src)
        } else if kind == Member {
            self.session(&mut scratch, src).and_then(|mut s| {
                let m = s.member_name()?;
                s.expect_eof()?;
                Ok(m)
            })
        } else if kind.is_statement() {
            self.parse_statement(&mut scratch, src)
        } else if kind.is_label() {
            self.parse_label(&mut scratch, src)
        } else if kind.is_expression() {
            self.parse_expression(&mut scratch, src)
        } else if kind.is_type() {
            self.parse_type(&mut scratch, src)
        } else {
            return false;
        };
        match parsed {
            Ok(other) => ast.structural_eq(id, &scratch, other),
            Err(_) => false,
        }
    }
}

//! One parse in progress: the token cursor and everything the grammar
//! rules share.

use rustc_hash::FxHashSet;

use super::lexer::{Keyword, Token, TokenKind};
use super::ParseError;
use crate::ast::{Ast, NodeId, Pos};

pub(crate) struct Session<'a> {
    tokens: Vec<Token>,
    at: usize,
    pub(crate) ast: &'a mut Ast,
    /// Seeded from the parser configuration; typedefs encountered during
    /// the parse are added as they are declared.
    pub(crate) typenames: FxHashSet<String>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        tokens: Vec<Token>,
        ast: &'a mut Ast,
        typenames: FxHashSet<String>,
    ) -> Self {
        Session {
            tokens,
            at: 0,
            ast,
            typenames,
        }
    }

    pub(crate) fn peek(&self) -> &TokenKind {
        &self.tokens[self.at].kind
    }

    pub(crate) fn peek2(&self) -> &TokenKind {
        // the stream always ends with Eof, so clamp instead of overrunning
        let i = (self.at + 1).min(self.tokens.len() - 1);
        &self.tokens[i].kind
    }

    pub(crate) fn pos(&self) -> Pos {
        self.tokens[self.at].pos.clone()
    }

    pub(crate) fn bump(&mut self) -> TokenKind {
        let kind = std::mem::replace(&mut self.tokens[self.at].kind, TokenKind::Eof);
        if self.at + 1 < self.tokens.len() {
            self.at += 1;
        }
        kind
    }

    pub(crate) fn at_token(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at_token(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    pub(crate) fn at_kw(&self, kw: Keyword) -> bool {
        matches!(self.peek(), TokenKind::Kw(k) if *k == kw)
    }

    pub(crate) fn eat_kw(&mut self, kw: Keyword) -> bool {
        if self.at_kw(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_kw(&mut self, kw: Keyword) -> Result<(), ParseError> {
        if self.eat_kw(kw) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{:?}`", kw)))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            TokenKind::Ident(_) => match self.bump() {
                TokenKind::Ident(name) => Ok(name),
                _ => unreachable!(),
            },
            _ => Err(self.unexpected("identifier")),
        }
    }

    pub(crate) fn expect_eof(&mut self) -> Result<(), ParseError> {
        if self.at_token(&TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            pos: Some(self.pos()),
        }
    }

    pub(crate) fn unexpected(&self, wanted: &str) -> ParseError {
        self.error(format!("expected {}, found {}", wanted, self.peek()))
    }

    pub(crate) fn is_typename(&self, name: &str) -> bool {
        self.typenames.contains(name)
    }

    /// Whether `kind` can begin a type name in the current typedef scope.
    pub(crate) fn token_starts_type(&self, kind: &TokenKind) -> bool {
        use Keyword::*;
        match kind {
            TokenKind::Kw(kw) => matches!(
                kw,
                Void | Char
                    | Short
                    | Int
                    | Long
                    | Float
                    | Double
                    | Signed
                    | Unsigned
                    | Bool
                    | Complex
                    | Imaginary
                    | Struct
                    | Union
                    | Enum
                    | Const
                    | Restrict
                    | Volatile
            ),
            TokenKind::Ident(name) => self.is_typename(name),
            _ => false,
        }
    }

    pub(crate) fn starts_type(&self) -> bool {
        self.token_starts_type(self.peek())
    }

    /// Whether the next token can begin a declaration (a type, a storage
    /// class, or `inline`).
    pub(crate) fn starts_declaration(&self) -> bool {
        use Keyword::*;
        if self.starts_type() {
            return true;
        }
        matches!(
            self.peek(),
            TokenKind::Kw(Typedef)
                | TokenKind::Kw(Extern)
                | TokenKind::Kw(Static)
                | TokenKind::Kw(Auto)
                | TokenKind::Kw(Register)
                | TokenKind::Kw(Inline)
        )
    }

    /// Stamps `pos` onto a freshly built node.
    pub(crate) fn at_pos(&mut self, id: NodeId, pos: Pos) -> NodeId {
        self.ast.set_pos(id, Some(pos));
        id
    }
}

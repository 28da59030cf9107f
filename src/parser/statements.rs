//! Statement parsing: labels, control flow, blocks.

use super::lexer::{Keyword, TokenKind};
use super::session::Session;
use super::ParseError;
use crate::ast::{Arg, NodeId, NodeKind};

impl Session<'_> {
    /// A statement, labels included.
    pub(crate) fn statement(&mut self) -> Result<NodeId, ParseError> {
        let mut labels = Vec::new();
        while self.at_label() {
            labels.push(self.label()?);
        }
        let stmt = self.unlabeled_statement()?;
        if !labels.is_empty() {
            let list = self.ast.child(stmt, "labels").unwrap();
            for label in labels {
                self.ast.push(list, label);
            }
        }
        Ok(stmt)
    }

    fn at_label(&self) -> bool {
        match self.peek() {
            TokenKind::Kw(Keyword::Case) | TokenKind::Kw(Keyword::Default) => true,
            TokenKind::Ident(_) => *self.peek2() == TokenKind::Colon,
            _ => false,
        }
    }

    /// One statement label: `name:`, `case expr:`, or `default:`.
    pub(crate) fn label(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let node = if self.eat_kw(Keyword::Case) {
            let expr = self.conditional_expr()?;
            self.expect(&TokenKind::Colon)?;
            self.ast.node_with(NodeKind::Case, &[expr.into()])
        } else if self.eat_kw(Keyword::Default) {
            self.expect(&TokenKind::Colon)?;
            self.ast.node(NodeKind::Default)
        } else {
            let name = self.expect_ident()?;
            self.expect(&TokenKind::Colon)?;
            self.ast
                .node_with(NodeKind::PlainLabel, &[name.as_str().into()])
        };
        Ok(self.at_pos(node, pos))
    }

    fn unlabeled_statement(&mut self) -> Result<NodeId, ParseError> {
        use Keyword::*;
        let pos = self.pos();
        let node = match self.peek() {
            TokenKind::LBrace => return self.block(),
            TokenKind::Kw(If) => {
                self.bump();
                self.expect(&TokenKind::LParen)?;
                let cond = self.expression()?;
                self.expect(&TokenKind::RParen)?;
                let then = self.statement()?;
                let els: Arg = if self.eat_kw(Else) {
                    Arg::Node(self.statement()?)
                } else {
                    Arg::Nil
                };
                self.ast
                    .node_with(NodeKind::If, &[cond.into(), then.into(), els])
            }
            TokenKind::Kw(Switch) => {
                self.bump();
                self.expect(&TokenKind::LParen)?;
                let cond = self.expression()?;
                self.expect(&TokenKind::RParen)?;
                let stmt = self.statement()?;
                self.ast
                    .node_with(NodeKind::Switch, &[cond.into(), stmt.into()])
            }
            TokenKind::Kw(While) => {
                self.bump();
                self.expect(&TokenKind::LParen)?;
                let cond = self.expression()?;
                self.expect(&TokenKind::RParen)?;
                let stmt = self.statement()?;
                self.ast
                    .node_with(NodeKind::While, &[cond.into(), stmt.into()])
            }
            TokenKind::Kw(Do) => {
                self.bump();
                let stmt = self.statement()?;
                self.expect_kw(While)?;
                self.expect(&TokenKind::LParen)?;
                let cond = self.expression()?;
                self.expect(&TokenKind::RParen)?;
                self.expect(&TokenKind::Semi)?;
                self.ast.node_with(
                    NodeKind::While,
                    &[cond.into(), stmt.into(), true.into()],
                )
            }
            TokenKind::Kw(For) => {
                self.bump();
                self.expect(&TokenKind::LParen)?;
                let init: Arg = if self.eat(&TokenKind::Semi) {
                    Arg::Nil
                } else if self.starts_declaration() {
                    // C99 for-loop declaration; the declaration eats its
                    // own semicolon
                    Arg::Node(self.declaration()?)
                } else {
                    let expr = self.expression()?;
                    self.expect(&TokenKind::Semi)?;
                    Arg::Node(expr)
                };
                let cond: Arg = if self.at_token(&TokenKind::Semi) {
                    Arg::Nil
                } else {
                    Arg::Node(self.expression()?)
                };
                self.expect(&TokenKind::Semi)?;
                let iter: Arg = if self.at_token(&TokenKind::RParen) {
                    Arg::Nil
                } else {
                    Arg::Node(self.expression()?)
                };
                self.expect(&TokenKind::RParen)?;
                let stmt = self.statement()?;
                self.ast
                    .node_with(NodeKind::For, &[init, cond, iter, stmt.into()])
            }
            TokenKind::Kw(Goto) => {
                self.bump();
                let target = self.expect_ident()?;
                self.expect(&TokenKind::Semi)?;
                self.ast
                    .node_with(NodeKind::Goto, &[target.as_str().into()])
            }
            TokenKind::Kw(Continue) => {
                self.bump();
                self.expect(&TokenKind::Semi)?;
                self.ast.node(NodeKind::Continue)
            }
            TokenKind::Kw(Break) => {
                self.bump();
                self.expect(&TokenKind::Semi)?;
                self.ast.node(NodeKind::Break)
            }
            TokenKind::Kw(Return) => {
                self.bump();
                let expr: Arg = if self.at_token(&TokenKind::Semi) {
                    Arg::Nil
                } else {
                    Arg::Node(self.expression()?)
                };
                self.expect(&TokenKind::Semi)?;
                self.ast.node_with(NodeKind::Return, &[expr])
            }
            TokenKind::Semi => {
                self.bump();
                self.ast.node(NodeKind::ExpressionStatement)
            }
            _ => {
                let expr = self.expression()?;
                self.expect(&TokenKind::Semi)?;
                self.ast
                    .node_with(NodeKind::ExpressionStatement, &[expr.into()])
            }
        };
        Ok(self.at_pos(node, pos))
    }

    /// `{ ... }`; declarations and statements may interleave (C99).
    pub(crate) fn block(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        self.expect(&TokenKind::LBrace)?;
        let block = self.ast.node(NodeKind::Block);
        self.at_pos(block, pos);
        let stmts = self.ast.child(block, "stmts").unwrap();
        while !self.at_token(&TokenKind::RBrace) {
            // a label can shadow a typename, so check for labels before
            // deciding this is a declaration
            let item = if self.starts_declaration() && !self.at_label() {
                self.declaration()?
            } else {
                self.statement()?
            };
            self.ast.push(stmts, item);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(block)
    }
}

//! Expression parsing: precedence climbing for binary operators, recursive
//! descent for everything else.

use super::lexer::{Keyword, TokenKind};
use super::session::Session;
use super::ParseError;
use crate::ast::{Arg, NodeId, NodeKind};

fn assign_op(kind: &TokenKind) -> Option<NodeKind> {
    use TokenKind::*;
    Some(match kind {
        Assign => NodeKind::Assign,
        StarAssign => NodeKind::MultiplyAssign,
        SlashAssign => NodeKind::DivideAssign,
        PercentAssign => NodeKind::ModAssign,
        PlusAssign => NodeKind::AddAssign,
        MinusAssign => NodeKind::SubtractAssign,
        ShlAssign => NodeKind::ShiftLeftAssign,
        ShrAssign => NodeKind::ShiftRightAssign,
        AmpAssign => NodeKind::BitAndAssign,
        CaretAssign => NodeKind::BitXorAssign,
        PipeAssign => NodeKind::BitOrAssign,
        _ => return None,
    })
}

/// Binary operator with its precedence-climbing level (higher binds
/// tighter).
fn binary_op(kind: &TokenKind) -> Option<(NodeKind, u8)> {
    use TokenKind::*;
    Some(match kind {
        OrOr => (NodeKind::Or, 1),
        AndAnd => (NodeKind::And, 2),
        Pipe => (NodeKind::BitOr, 3),
        Caret => (NodeKind::BitXor, 4),
        Amp => (NodeKind::BitAnd, 5),
        EqEq => (NodeKind::Equal, 6),
        Ne => (NodeKind::NotEqual, 6),
        Lt => (NodeKind::Less, 7),
        Gt => (NodeKind::More, 7),
        Le => (NodeKind::LessOrEqual, 7),
        Ge => (NodeKind::MoreOrEqual, 7),
        Shl => (NodeKind::ShiftLeft, 8),
        Shr => (NodeKind::ShiftRight, 8),
        Plus => (NodeKind::Add, 9),
        Minus => (NodeKind::Subtract, 9),
        Star => (NodeKind::Multiply, 10),
        Slash => (NodeKind::Divide, 10),
        Percent => (NodeKind::Mod, 10),
        _ => return None,
    })
}

impl Session<'_> {
    /// Full expression, comma operator included.
    pub(crate) fn expression(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let first = self.assignment_expr()?;
        if !self.at_token(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.assignment_expr()?);
        }
        let list = self.ast.array(&exprs);
        let comma = self
            .ast
            .node_with(NodeKind::Comma, &[Arg::Node(list)]);
        Ok(self.at_pos(comma, pos))
    }

    pub(crate) fn assignment_expr(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let lhs = self.conditional_expr()?;
        let Some(kind) = assign_op(self.peek()) else {
            return Ok(lhs);
        };
        self.bump();
        // right associative
        let rhs = self.assignment_expr()?;
        let node = self.ast.node_with(kind, &[lhs.into(), rhs.into()]);
        Ok(self.at_pos(node, pos))
    }

    pub(crate) fn conditional_expr(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let cond = self.binary_expr(1)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.expression()?;
        self.expect(&TokenKind::Colon)?;
        let els = self.conditional_expr()?;
        let node = self.ast.node_with(
            NodeKind::Conditional,
            &[cond.into(), then.into(), els.into()],
        );
        Ok(self.at_pos(node, pos))
    }

    fn binary_expr(&mut self, min_level: u8) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let mut lhs = self.cast_expr()?;
        while let Some((kind, level)) = binary_op(self.peek()) {
            if level < min_level {
                break;
            }
            self.bump();
            let rhs = self.binary_expr(level + 1)?;
            lhs = self.ast.node_with(kind, &[lhs.into(), rhs.into()]);
            self.at_pos(lhs, pos.clone());
        }
        Ok(lhs)
    }

    fn cast_expr(&mut self) -> Result<NodeId, ParseError> {
        if !self.at_token(&TokenKind::LParen) || !self.token_starts_type(self.peek2()) {
            return self.unary_expr();
        }
        let pos = self.pos();
        self.bump();
        let ty = self.type_name()?;
        self.expect(&TokenKind::RParen)?;
        if self.at_token(&TokenKind::LBrace) {
            let lit = self.compound_literal(Some(ty), pos)?;
            return self.postfix_tail(lit);
        }
        let expr = self.cast_expr()?;
        let node = self
            .ast
            .node_with(NodeKind::Cast, &[ty.into(), expr.into()]);
        Ok(self.at_pos(node, pos))
    }

    fn unary_expr(&mut self) -> Result<NodeId, ParseError> {
        use TokenKind::*;
        let pos = self.pos();
        let kind = match self.peek() {
            Inc => NodeKind::PreInc,
            Dec => NodeKind::PreDec,
            Amp => NodeKind::Address,
            Star => NodeKind::Dereference,
            Plus => NodeKind::Positive,
            Minus => NodeKind::Negative,
            Tilde => NodeKind::BitNot,
            Bang => NodeKind::Not,
            Kw(Keyword::Sizeof) => {
                self.bump();
                let arg = if self.at_token(&LParen) && self.token_starts_type(self.peek2()) {
                    self.bump();
                    let ty = self.type_name()?;
                    self.expect(&RParen)?;
                    ty
                } else {
                    self.unary_expr()?
                };
                let node = self.ast.node_with(NodeKind::Sizeof, &[arg.into()]);
                return Ok(self.at_pos(node, pos));
            }
            _ => return self.postfix_expr(),
        };
        self.bump();
        // ++/-- take a unary operand, the rest take a cast expression
        let operand = match kind {
            NodeKind::PreInc | NodeKind::PreDec => self.unary_expr()?,
            _ => self.cast_expr()?,
        };
        let node = self.ast.node_with(kind, &[operand.into()]);
        Ok(self.at_pos(node, pos))
    }

    fn postfix_expr(&mut self) -> Result<NodeId, ParseError> {
        let expr = self.primary_expr()?;
        self.postfix_tail(expr)
    }

    fn postfix_tail(&mut self, mut expr: NodeId) -> Result<NodeId, ParseError> {
        use TokenKind::*;
        loop {
            let pos = self.pos();
            expr = match self.peek() {
                LBracket => {
                    self.bump();
                    let index = self.expression()?;
                    self.expect(&RBracket)?;
                    self.ast
                        .node_with(NodeKind::Index, &[expr.into(), index.into()])
                }
                LParen => {
                    self.bump();
                    let mut args = Vec::new();
                    if !self.at_token(&RParen) {
                        loop {
                            args.push(self.assignment_expr()?);
                            if !self.eat(&Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(&RParen)?;
                    let args = self.ast.array(&args);
                    self.ast
                        .node_with(NodeKind::Call, &[expr.into(), args.into()])
                }
                Dot | Arrow => {
                    let kind = if self.at_token(&Dot) {
                        NodeKind::Dot
                    } else {
                        NodeKind::Arrow
                    };
                    self.bump();
                    let member = self.member_name()?;
                    self.ast.node_with(kind, &[expr.into(), member.into()])
                }
                Inc => {
                    self.bump();
                    self.ast.node_with(NodeKind::PostInc, &[expr.into()])
                }
                Dec => {
                    self.bump();
                    self.ast.node_with(NodeKind::PostDec, &[expr.into()])
                }
                _ => return Ok(expr),
            };
            self.at_pos(expr, pos);
        }
    }

    pub(crate) fn member_name(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let name = self.expect_ident()?;
        let node = self
            .ast
            .node_with(NodeKind::Member, &[name.as_str().into()]);
        Ok(self.at_pos(node, pos))
    }

    fn primary_expr(&mut self) -> Result<NodeId, ParseError> {
        use TokenKind::*;
        let pos = self.pos();
        let node = match self.peek() {
            Ident(_) => {
                let name = self.expect_ident()?;
                self.ast
                    .node_with(NodeKind::Variable, &[name.as_str().into()])
            }
            IntLit { .. } => {
                let (val, format, suffix) = match self.bump() {
                    IntLit { val, format, suffix } => (val, format, suffix),
                    _ => unreachable!(),
                };
                let mut named: Vec<(&str, Arg)> =
                    vec![("format", Arg::Value(crate::ast::Value::Kw(format)))];
                if let Some(sfx) = &suffix {
                    named.push(("suffix", sfx.as_str().into()));
                }
                self.ast
                    .node_full(NodeKind::IntLiteral, &[val.into()], &named)
            }
            FloatLit { .. } => {
                let (val, suffix) = match self.bump() {
                    FloatLit { val, suffix } => (val, suffix),
                    _ => unreachable!(),
                };
                let mut named: Vec<(&str, Arg)> = Vec::new();
                if let Some(sfx) = &suffix {
                    named.push(("suffix", sfx.as_str().into()));
                }
                self.ast
                    .node_full(NodeKind::FloatLiteral, &[val.into()], &named)
            }
            CharLit { .. } => {
                let (val, wide) = match self.bump() {
                    CharLit { val, wide } => (val, wide),
                    _ => unreachable!(),
                };
                self.ast.node_full(
                    NodeKind::CharLiteral,
                    &[val.as_str().into()],
                    &[("wide", wide.into())],
                )
            }
            StrLit { .. } => {
                let (mut val, wide) = match self.bump() {
                    StrLit { val, wide } => (val, wide),
                    _ => unreachable!(),
                };
                // adjacent string literals concatenate (C99 6.4.5p4)
                while let StrLit { .. } = self.peek() {
                    match self.bump() {
                        StrLit { val: more, .. } => val.push_str(&more),
                        _ => unreachable!(),
                    }
                }
                self.ast.node_full(
                    NodeKind::StringLiteral,
                    &[val.as_str().into()],
                    &[("wide", wide.into())],
                )
            }
            LParen => {
                self.bump();
                let inner = self.expression()?;
                self.expect(&RParen)?;
                return Ok(inner);
            }
            LBrace => return self.compound_literal(None, pos),
            _ => return Err(self.unexpected("expression")),
        };
        Ok(self.at_pos(node, pos))
    }

    /// `{ ... }` initializer body, with an optional `(type)` prefix already
    /// parsed by the caller.
    pub(crate) fn compound_literal(
        &mut self,
        ty: Option<NodeId>,
        pos: crate::ast::Pos,
    ) -> Result<NodeId, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut inits = Vec::new();
        while !self.at_token(&TokenKind::RBrace) {
            inits.push(self.member_init()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let inits = self.ast.array(&inits);
        let ty_arg = match ty {
            Some(t) => Arg::Node(t),
            None => Arg::Nil,
        };
        let node = self.ast.node_full(
            NodeKind::CompoundLiteral,
            &[ty_arg],
            &[("member_inits", Arg::Node(inits))],
        );
        Ok(self.at_pos(node, pos))
    }

    /// One element of an initializer list: optional designators, `=`, then
    /// an initializer.
    pub(crate) fn member_init(&mut self) -> Result<NodeId, ParseError> {
        use TokenKind::*;
        let pos = self.pos();
        let mut designators = Vec::new();
        while matches!(self.peek(), Dot | LBracket) {
            if self.eat(&Dot) {
                designators.push(self.member_name()?);
            } else {
                self.bump();
                designators.push(self.conditional_expr()?);
                self.expect(&RBracket)?;
            }
        }
        let member = if designators.is_empty() {
            Arg::Nil
        } else {
            self.expect(&Assign)?;
            Arg::Node(self.ast.array(&designators))
        };
        let init = self.initializer()?;
        let node = self
            .ast
            .node_full(NodeKind::MemberInit, &[member, init.into()], &[]);
        Ok(self.at_pos(node, pos))
    }

    /// An initializer: either an expression or a braced list.
    pub(crate) fn initializer(&mut self) -> Result<NodeId, ParseError> {
        if self.at_token(&TokenKind::LBrace) {
            let pos = self.pos();
            self.compound_literal(None, pos)
        } else {
            self.assignment_expr()
        }
    }
}

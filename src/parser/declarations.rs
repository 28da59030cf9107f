//! Declaration parsing: specifiers, declarators, struct/union/enum bodies,
//! function definitions, and the translation unit itself.
//!
//! C declarators read inside out, so a declarator is parsed into a chain of
//! indirect-type nodes whose outermost `type` slot is left open. For a
//! declaration the chain stays open (the base type lives on the
//! `Declaration` node); for type names, parameters, and function
//! definitions the base type is plugged into the open slot to form one
//! complete type.

use super::lexer::{Keyword, TokenKind};
use super::session::Session;
use super::ParseError;
use crate::ast::{kw, Arg, NodeId, NodeKind, Value};

/// A declarator's indirect-type chain under construction. `head` is the
/// construct binding tightest to the declared name; `hole` is the node
/// whose `type` slot is still open.
#[derive(Default)]
pub(crate) struct DeclChain {
    pub(crate) head: Option<NodeId>,
    pub(crate) hole: Option<NodeId>,
}

pub(crate) struct ParsedDeclarator {
    pub(crate) name: Option<String>,
    pub(crate) chain: DeclChain,
    /// The direct declarator ended in a K&R identifier list.
    pub(crate) ident_params: bool,
}

/// Declaration specifiers, reduced to a single base type node plus the
/// non-type bits.
pub(crate) struct DeclSpecs {
    pub(crate) storage: Option<&'static str>,
    pub(crate) inline: bool,
    pub(crate) base: NodeId,
}

#[derive(Default)]
struct SpecWords {
    void: bool,
    char_: bool,
    int_: bool,
    float_: bool,
    double_: bool,
    bool_: bool,
    complex: bool,
    imaginary: bool,
    short_: bool,
    long_: u8,
    signed_: bool,
    unsigned_: bool,
}

impl SpecWords {
    fn any(&self) -> bool {
        self.void
            || self.char_
            || self.int_
            || self.float_
            || self.double_
            || self.bool_
            || self.complex
            || self.imaginary
            || self.short_
            || self.long_ > 0
            || self.signed_
            || self.unsigned_
    }
}

impl Session<'_> {
    pub(crate) fn translation_unit(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let unit = self.ast.node(NodeKind::TranslationUnit);
        self.at_pos(unit, pos);
        let entities = self.ast.child(unit, "entities").unwrap();
        while !self.at_token(&TokenKind::Eof) {
            let entity = self.external_declaration()?;
            self.ast.push(entities, entity);
        }
        Ok(unit)
    }

    /// A top-level entity: either a declaration or a function definition.
    pub(crate) fn external_declaration(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let specs = self.specifiers(true)?;
        if self.eat(&TokenKind::Semi) {
            return Ok(self.finish_declaration_node(specs, Vec::new(), pos));
        }
        let d = self.declarator(false)?;
        // a `{`, a K&R parameter declaration, or an identifier parameter
        // list all mean this is a function definition
        if self.at_token(&TokenKind::LBrace) || self.starts_declaration() || d.ident_params {
            return self.function_def(specs, d, pos);
        }
        self.declaration_tail(specs, d, pos)
    }

    /// `declaration: specifiers init-declarator-list ;`
    pub(crate) fn declaration(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let specs = self.specifiers(true)?;
        if self.eat(&TokenKind::Semi) {
            return Ok(self.finish_declaration_node(specs, Vec::new(), pos));
        }
        let d = self.declarator(false)?;
        self.declaration_tail(specs, d, pos)
    }

    /// The rest of a declaration once the first declarator is parsed.
    fn declaration_tail(
        &mut self,
        specs: DeclSpecs,
        first: ParsedDeclarator,
        pos: crate::ast::Pos,
    ) -> Result<NodeId, ParseError> {
        let typedef = specs.storage == Some(kw::TYPEDEF);
        let mut declarators = Vec::new();
        let mut d = first;
        loop {
            declarators.push(self.init_declarator(d, typedef, false)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            d = self.declarator(false)?;
        }
        self.expect(&TokenKind::Semi)?;
        Ok(self.finish_declaration_node(specs, declarators, pos))
    }

    fn finish_declaration_node(
        &mut self,
        specs: DeclSpecs,
        declarators: Vec<NodeId>,
        pos: crate::ast::Pos,
    ) -> NodeId {
        let list = self.ast.array(&declarators);
        let mut named: Vec<(&str, Arg)> = vec![("inline", specs.inline.into())];
        if let Some(storage) = specs.storage {
            named.push(("storage", Arg::Value(Value::Kw(storage))));
        }
        let decl = self.ast.node_full(
            NodeKind::Declaration,
            &[specs.base.into(), list.into()],
            &named,
        );
        self.at_pos(decl, pos)
    }

    /// Initializer and bitfield suffixes, then the `Declarator` node.
    fn init_declarator(
        &mut self,
        d: ParsedDeclarator,
        typedef: bool,
        allow_bits: bool,
    ) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let name = d
            .name
            .ok_or_else(|| self.error("expected a name in declarator"))?;
        if typedef {
            self.typenames.insert(name.clone());
        }
        let init = if self.eat(&TokenKind::Assign) {
            Arg::Node(self.initializer()?)
        } else {
            Arg::Nil
        };
        let bits = if allow_bits && self.eat(&TokenKind::Colon) {
            Arg::Node(self.conditional_expr()?)
        } else {
            Arg::Nil
        };
        let indirect = match d.chain.head {
            Some(h) => Arg::Node(h),
            None => Arg::Nil,
        };
        let node = self.ast.node_with(
            NodeKind::Declarator,
            &[indirect, name.as_str().into(), init, bits],
        );
        Ok(self.at_pos(node, pos))
    }

    /// An anonymous bitfield (`int : 3;`) has no declarator at all, so it
    /// is only reachable from [`member_declaration`].
    fn anonymous_bitfield(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        self.expect(&TokenKind::Colon)?;
        let bits = self.conditional_expr()?;
        let node = self.ast.node_full(
            NodeKind::Declarator,
            &[],
            &[("num_bits", Arg::Node(bits))],
        );
        Ok(self.at_pos(node, pos))
    }

    /// A struct or union member declaration, bitfields allowed.
    pub(crate) fn member_declaration(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let specs = self.specifiers(false)?;
        let mut declarators = Vec::new();
        if !self.at_token(&TokenKind::Semi) {
            loop {
                let node = if self.at_token(&TokenKind::Colon) {
                    self.anonymous_bitfield()?
                } else {
                    let d = self.declarator(false)?;
                    self.init_declarator(d, false, true)?
                };
                declarators.push(node);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::Semi)?;
        Ok(self.finish_declaration_node(specs, declarators, pos))
    }

    // ----------------------------------------------------------------
    // Specifiers
    // ----------------------------------------------------------------

    fn specifiers(&mut self, allow_storage: bool) -> Result<DeclSpecs, ParseError> {
        use Keyword::*;
        let pos = self.pos();
        let mut storage: Option<&'static str> = None;
        let mut inline = false;
        let mut const_ = false;
        let mut restrict = false;
        let mut volatile = false;
        let mut words = SpecWords::default();
        let mut tagged: Option<NodeId> = None;
        let mut custom: Option<String> = None;

        loop {
            let storage_kw: Option<&'static str> = match self.peek() {
                TokenKind::Kw(Typedef) => Some(kw::TYPEDEF),
                TokenKind::Kw(Extern) => Some(kw::EXTERN),
                TokenKind::Kw(Static) => Some(kw::STATIC),
                TokenKind::Kw(Auto) => Some(kw::AUTO),
                TokenKind::Kw(Register) => Some(kw::REGISTER),
                _ => None,
            };
            if let Some(s) = storage_kw {
                if !allow_storage {
                    return Err(self.error(format!("`{}` not allowed here", s)));
                }
                if storage.replace(s).is_some() {
                    return Err(self.error("multiple storage classes in declaration"));
                }
                self.bump();
                continue;
            }
            match self.peek() {
                TokenKind::Kw(Inline) => {
                    inline = true;
                    self.bump();
                }
                TokenKind::Kw(Const) => {
                    const_ = true;
                    self.bump();
                }
                TokenKind::Kw(Restrict) => {
                    restrict = true;
                    self.bump();
                }
                TokenKind::Kw(Volatile) => {
                    volatile = true;
                    self.bump();
                }
                TokenKind::Kw(Void) => {
                    words.void = true;
                    self.bump();
                }
                TokenKind::Kw(Char) => {
                    words.char_ = true;
                    self.bump();
                }
                TokenKind::Kw(Short) => {
                    words.short_ = true;
                    self.bump();
                }
                TokenKind::Kw(Int) => {
                    words.int_ = true;
                    self.bump();
                }
                TokenKind::Kw(Long) => {
                    words.long_ += 1;
                    self.bump();
                }
                TokenKind::Kw(Float) => {
                    words.float_ = true;
                    self.bump();
                }
                TokenKind::Kw(Double) => {
                    words.double_ = true;
                    self.bump();
                }
                TokenKind::Kw(Signed) => {
                    words.signed_ = true;
                    self.bump();
                }
                TokenKind::Kw(Unsigned) => {
                    words.unsigned_ = true;
                    self.bump();
                }
                TokenKind::Kw(Bool) => {
                    words.bool_ = true;
                    self.bump();
                }
                TokenKind::Kw(Complex) => {
                    words.complex = true;
                    self.bump();
                }
                TokenKind::Kw(Imaginary) => {
                    words.imaginary = true;
                    self.bump();
                }
                TokenKind::Kw(Struct) | TokenKind::Kw(Union) | TokenKind::Kw(Enum) => {
                    if words.any() || tagged.is_some() || custom.is_some() {
                        return Err(self.error("two or more data types in declaration"));
                    }
                    tagged = Some(self.tagged_type()?);
                }
                TokenKind::Ident(name)
                    if custom.is_none()
                        && tagged.is_none()
                        && !words.any()
                        && self.is_typename(name) =>
                {
                    custom = Some(self.expect_ident()?);
                }
                _ => break,
            }
        }

        let base = if let Some(node) = tagged {
            node
        } else if let Some(name) = custom {
            self.ast
                .node_full(NodeKind::CustomType, &[name.as_str().into()], &[])
        } else {
            self.base_type_from_words(&words, pos.clone())?
        };
        if const_ {
            self.ast.set_field(base, "const", Value::Bool(true));
        }
        if restrict {
            self.ast.set_field(base, "restrict", Value::Bool(true));
        }
        if volatile {
            self.ast.set_field(base, "volatile", Value::Bool(true));
        }
        self.at_pos(base, pos);
        Ok(DeclSpecs {
            storage,
            inline,
            base,
        })
    }

    fn base_type_from_words(
        &mut self,
        w: &SpecWords,
        pos: crate::ast::Pos,
    ) -> Result<NodeId, ParseError> {
        let node = if w.void {
            self.ast.node(NodeKind::Void)
        } else if w.bool_ {
            self.ast.node(NodeKind::Bool)
        } else if w.char_ {
            let signed: Arg = if w.unsigned_ {
                false.into()
            } else if w.signed_ {
                true.into()
            } else {
                Arg::Nil
            };
            self.ast
                .node_full(NodeKind::Char, &[], &[("signed", signed)])
        } else if w.float_ || w.double_ || w.complex || w.imaginary {
            let longness: i64 = if w.double_ {
                1 + i64::from(w.long_ > 0)
            } else {
                0
            };
            let kind = if w.complex {
                NodeKind::Complex
            } else if w.imaginary {
                NodeKind::Imaginary
            } else {
                NodeKind::Float
            };
            self.ast.node_with(kind, &[longness.into()])
        } else if w.any() {
            let longness: i64 = if w.short_ { -1 } else { i64::from(w.long_) };
            self.ast.node_full(
                NodeKind::Int,
                &[longness.into()],
                &[("unsigned", w.unsigned_.into())],
            )
        } else {
            let err = ParseError {
                message: "expected a type".to_owned(),
                pos: Some(pos),
            };
            return Err(err);
        };
        Ok(node)
    }

    /// `struct`, `union`, or `enum` specifier, tag and body both optional.
    fn tagged_type(&mut self) -> Result<NodeId, ParseError> {
        use Keyword::*;
        let pos = self.pos();
        let kind = if self.eat_kw(Struct) {
            NodeKind::Struct
        } else if self.eat_kw(Union) {
            NodeKind::Union
        } else {
            self.expect_kw(Enum)?;
            NodeKind::Enum
        };
        let name: Arg = match self.peek() {
            TokenKind::Ident(_) => self.expect_ident()?.as_str().into(),
            _ => Arg::Nil,
        };
        let members: Arg = if self.eat(&TokenKind::LBrace) {
            let mut members = Vec::new();
            if kind == NodeKind::Enum {
                while !self.at_token(&TokenKind::RBrace) {
                    members.push(self.enumerator()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            } else {
                while !self.at_token(&TokenKind::RBrace) {
                    members.push(self.member_declaration()?);
                }
            }
            self.expect(&TokenKind::RBrace)?;
            Arg::Node(self.ast.array(&members))
        } else {
            if matches!(name, Arg::Nil) {
                return Err(self.unexpected("a tag or member list"));
            }
            Arg::Nil
        };
        let node = self.ast.node_with(kind, &[name, members]);
        Ok(self.at_pos(node, pos))
    }

    pub(crate) fn enumerator(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let name = self.expect_ident()?;
        let val: Arg = if self.eat(&TokenKind::Assign) {
            Arg::Node(self.conditional_expr()?)
        } else {
            Arg::Nil
        };
        let node = self
            .ast
            .node_with(NodeKind::Enumerator, &[name.as_str().into(), val]);
        Ok(self.at_pos(node, pos))
    }

    // ----------------------------------------------------------------
    // Declarators
    // ----------------------------------------------------------------

    /// Plugs `node` into the chain's open `type` slot and makes it the new
    /// open end.
    fn plug(&mut self, chain: &mut DeclChain, node: NodeId) {
        match chain.hole {
            Some(h) => {
                self.ast.set_child(h, "type", Some(node));
                chain.hole = Some(node);
            }
            None => {
                chain.head = Some(node);
                chain.hole = Some(node);
            }
        }
    }

    /// Plugs the base type into the chain, yielding one complete type node.
    fn compose(&mut self, mut chain: DeclChain, base: NodeId) -> NodeId {
        self.plug(&mut chain, base);
        chain.head.unwrap()
    }

    pub(crate) fn declarator(
        &mut self,
        abstract_ok: bool,
    ) -> Result<ParsedDeclarator, ParseError> {
        use Keyword::*;
        // pointers apply after the direct declarator's own suffixes, so
        // collect them first and plug them in last, right to left
        let mut pointers = Vec::new();
        while self.at_token(&TokenKind::Star) {
            self.bump();
            let ptr = self.ast.node(NodeKind::Pointer);
            loop {
                if self.eat_kw(Const) {
                    self.ast.set_field(ptr, "const", Value::Bool(true));
                } else if self.eat_kw(Restrict) {
                    self.ast.set_field(ptr, "restrict", Value::Bool(true));
                } else if self.eat_kw(Volatile) {
                    self.ast.set_field(ptr, "volatile", Value::Bool(true));
                } else {
                    break;
                }
            }
            pointers.push(ptr);
        }

        let mut name = None;
        let mut chain = DeclChain::default();
        match self.peek() {
            TokenKind::Ident(_) => name = Some(self.expect_ident()?),
            // `(` opens a nested declarator unless it can only be a
            // parameter list (abstract declarator context)
            TokenKind::LParen
                if !self.token_starts_type(self.peek2())
                    && *self.peek2() != TokenKind::RParen =>
            {
                self.bump();
                let nested = self.declarator(abstract_ok)?;
                self.expect(&TokenKind::RParen)?;
                name = nested.name;
                chain = nested.chain;
            }
            _ if abstract_ok => {}
            _ => return Err(self.unexpected("declarator")),
        }

        let mut ident_params = false;
        loop {
            match self.peek() {
                TokenKind::LBracket => {
                    self.bump();
                    let length: Arg = if self.at_token(&TokenKind::RBracket) {
                        Arg::Nil
                    } else {
                        Arg::Node(self.assignment_expr()?)
                    };
                    self.expect(&TokenKind::RBracket)?;
                    let arr = self
                        .ast
                        .node_full(NodeKind::Array, &[], &[("length", length)]);
                    self.plug(&mut chain, arr);
                }
                TokenKind::LParen => {
                    self.bump();
                    let func = self.function_suffix(&mut ident_params)?;
                    self.plug(&mut chain, func);
                }
                _ => break,
            }
        }

        for ptr in pointers.into_iter().rev() {
            self.plug(&mut chain, ptr);
        }
        Ok(ParsedDeclarator {
            name,
            chain,
            ident_params,
        })
    }

    /// The parenthesized part of a function declarator, opening `(` already
    /// consumed.
    fn function_suffix(&mut self, ident_params: &mut bool) -> Result<NodeId, ParseError> {
        use TokenKind::*;
        // `()` leaves the parameters unspecified; `(void)` is an explicit
        // empty list
        if self.eat(&RParen) {
            return Ok(self.ast.node(NodeKind::Function));
        }
        if self.at_kw(Keyword::Void) && *self.peek2() == RParen {
            self.bump();
            self.bump();
            let params = self.ast.array(&[]);
            return Ok(self
                .ast
                .node_full(NodeKind::Function, &[], &[("params", Arg::Node(params))]));
        }

        let mut params = Vec::new();
        let mut var_args = false;
        let kr_list = matches!(self.peek(), Ident(name) if !self.is_typename(name));
        if kr_list {
            // K&R identifier list; types come from the declaration list
            // before the function body
            *ident_params = true;
            loop {
                let pos = self.pos();
                let name = self.expect_ident()?;
                let p = self.ast.node_full(
                    NodeKind::Parameter,
                    &[],
                    &[("name", name.as_str().into())],
                );
                params.push(self.at_pos(p, pos));
                if !self.eat(&Comma) {
                    break;
                }
            }
            self.expect(&RParen)?;
            let params = self.ast.array(&params);
            return Ok(self
                .ast
                .node_full(NodeKind::Function, &[], &[("params", Arg::Node(params))]));
        }

        loop {
            if self.eat(&Ellipsis) {
                var_args = true;
                break;
            }
            params.push(self.parameter()?);
            if !self.eat(&Comma) {
                break;
            }
        }
        self.expect(&RParen)?;
        let params = self.ast.array(&params);
        Ok(self.ast.node_full(
            NodeKind::Function,
            &[],
            &[("params", Arg::Node(params)), ("var_args", var_args.into())],
        ))
    }

    pub(crate) fn parameter(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let mut register = false;
        if self.eat_kw(Keyword::Register) {
            register = true;
        }
        let specs = self.specifiers(false)?;
        let d = self.declarator(true)?;
        let full = self.compose(d.chain, specs.base);
        let name: Arg = match d.name {
            Some(n) => n.as_str().into(),
            None => Arg::Nil,
        };
        let node = self.ast.node_full(
            NodeKind::Parameter,
            &[full.into(), name],
            &[("register", register.into())],
        );
        Ok(self.at_pos(node, pos))
    }

    /// A complete type name, as in casts and `sizeof`.
    pub(crate) fn type_name(&mut self) -> Result<NodeId, ParseError> {
        let specs = self.specifiers(false)?;
        let d = self.declarator(true)?;
        if d.name.is_some() {
            return Err(self.error("type name cannot declare an identifier"));
        }
        Ok(self.compose(d.chain, specs.base))
    }

    /// A declarator with no surrounding declaration; the base-type slot is
    /// left open.
    pub(crate) fn bare_declarator(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.pos();
        let d = self.declarator(false)?;
        self.init_declarator_from(d, pos)
    }

    fn init_declarator_from(
        &mut self,
        d: ParsedDeclarator,
        pos: crate::ast::Pos,
    ) -> Result<NodeId, ParseError> {
        let name = d
            .name
            .ok_or_else(|| self.error("expected a name in declarator"))?;
        let indirect = match d.chain.head {
            Some(h) => Arg::Node(h),
            None => Arg::Nil,
        };
        let node = self.ast.node_with(
            NodeKind::Declarator,
            &[indirect, name.as_str().into()],
        );
        Ok(self.at_pos(node, pos))
    }

    // ----------------------------------------------------------------
    // Function definitions
    // ----------------------------------------------------------------

    fn function_def(
        &mut self,
        specs: DeclSpecs,
        d: ParsedDeclarator,
        pos: crate::ast::Pos,
    ) -> Result<NodeId, ParseError> {
        let name = d
            .name
            .clone()
            .ok_or_else(|| self.error("expected a function name"))?;
        let no_prototype = d.ident_params;
        let fn_type = self.compose(d.chain, specs.base);
        if self.ast.kind(fn_type) != NodeKind::Function {
            return Err(self.error(format!("`{}` is declared as a non-function", name)));
        }

        if no_prototype {
            self.kr_parameter_types(fn_type)?;
        } else if self.starts_declaration() {
            return Err(self.error("parameter declarations need an identifier list"));
        }

        let def = self.block()?;
        let mut named: Vec<(&str, Arg)> = vec![
            ("inline", specs.inline.into()),
            ("no_prototype", no_prototype.into()),
        ];
        if let Some(storage) = specs.storage {
            named.push(("storage", Arg::Value(Value::Kw(storage))));
        }
        let node = self.ast.node_full(
            NodeKind::FunctionDef,
            &[fn_type.into(), name.as_str().into(), def.into()],
            &named,
        );
        Ok(self.at_pos(node, pos))
    }

    /// Applies a K&R declaration list to the identifier parameters of
    /// `fn_type`.
    fn kr_parameter_types(&mut self, fn_type: NodeId) -> Result<(), ParseError> {
        let params = self.ast.child(fn_type, "params").unwrap_or_else(|| {
            let list = self.ast.array(&[]);
            self.ast.set_child(fn_type, "params", Some(list));
            self.ast.child(fn_type, "params").unwrap()
        });
        while self.starts_declaration() {
            // the declaration's base type is a template: each parameter
            // gets its own copy, and the template is freed afterwards
            let specs = self.specifiers(true)?;
            let register = specs.storage == Some(kw::REGISTER);
            loop {
                let d = self.declarator(false)?;
                let name = d
                    .name
                    .clone()
                    .ok_or_else(|| self.error("expected a parameter name"))?;
                let base_copy = self.ast.deep_copy(specs.base);
                let full = self.compose(d.chain, base_copy);
                let param = self
                    .ast
                    .list_nodes(params)
                    .into_iter()
                    .find(|&p| self.ast.field_str(p, "name") == Some(name.as_str()))
                    .ok_or_else(|| {
                        self.error(format!("declaration for nonexistent parameter `{}`", name))
                    })?;
                self.ast.set_child(param, "type", Some(full));
                if register {
                    self.ast.set_field(param, "register", Value::Bool(true));
                }
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::Semi)?;
            self.ast.free(specs.base);
        }
        Ok(())
    }
}

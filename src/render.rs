//! Source and debug rendering.
//!
//! [`Ast::to_c`] prints a subtree back as C source, inserting parentheses
//! only where precedence demands them and following the usual layout rules
//! for statements (four-space indents, blocks hanging off their headers).
//! [`Ast::dump`] prints the structural tree for debugging: one node per
//! line, set flags inline in parentheses, default-valued attributes elided.

use crate::ast::schema::{self, DefaultValue};
use crate::ast::{Ast, NodeId, NodeKind, Value};

const INDENT: &str = "    ";

fn indent(s: &str, levels: usize) -> String {
    let pad = INDENT.repeat(levels);
    s.split('\n')
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn precedence(kind: NodeKind) -> u8 {
    use NodeKind::*;
    match kind {
        Comma => 0,
        k if k.is_assignment_expression() => 1,
        Conditional => 2,
        Or => 3,
        And => 4,
        BitOr => 5,
        BitXor => 6,
        BitAnd => 7,
        Equal | NotEqual => 8,
        Less | More | LessOrEqual | MoreOrEqual => 9,
        ShiftLeft | ShiftRight => 10,
        Add | Subtract => 11,
        Multiply | Divide | Mod => 12,
        k if k.is_prefix_expression() => 13,
        k if k.is_postfix_expression() => 14,
        // literals and variables
        _ => 15,
    }
}

fn float_str(x: f64) -> String {
    if x.is_finite() && x == x.trunc() {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

impl Ast {
    /// Renders a subtree as C source.
    pub fn to_c(&self, id: NodeId) -> String {
        use NodeKind::*;
        let kind = self.kind(id);
        match kind {
            TranslationUnit => {
                let entities = self.child(id, "entities").unwrap();
                self.list_nodes(entities)
                    .iter()
                    .map(|&e| self.to_c(e))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            }
            Declaration => self.declaration_str(id),
            Declarator => self.declarator_str(id),
            FunctionDef => self.function_def_str(id),
            Parameter => self.parameter_str(id),
            Enumerator => match self.child(id, "val") {
                Some(val) => format!(
                    "{} = {}",
                    self.field_str(id, "name").unwrap_or(""),
                    self.to_c(val)
                ),
                None => self.field_str(id, "name").unwrap_or("").to_owned(),
            },
            MemberInit => self.member_init_str(id),
            Member => self.field_str(id, "name").unwrap_or("").to_owned(),

            Block => self.block_str(id, false),
            If => {
                let cond = self.opt_c(id, "cond");
                let then = self.child(id, "then");
                let body = match self.child(id, "else") {
                    None => format!("if ({}){}", cond, self.hang_opt(then, false)),
                    Some(els) => format!(
                        "if ({}){}else{}",
                        cond,
                        self.hang_opt(then, true),
                        self.hang(els, false)
                    ),
                };
                self.label_stmt(id, &body)
            }
            Switch => {
                let cond = self.opt_c(id, "cond");
                let stmt = self.child(id, "stmt");
                self.label_stmt(
                    id,
                    &format!("switch ({}){}", cond, self.hang_opt(stmt, false)),
                )
            }
            While => {
                let cond = self.opt_c(id, "cond");
                let stmt = self.child(id, "stmt");
                let body = if self.flag(id, "do") {
                    format!("do{}while ({});", self.hang_opt(stmt, true), cond)
                } else {
                    format!("while ({}){}", cond, self.hang_opt(stmt, false))
                };
                self.label_stmt(id, &body)
            }
            For => self.for_str(id),
            Goto => self.label_stmt(
                id,
                &format!("goto {};", self.field_str(id, "target").unwrap_or("")),
            ),
            Continue => self.label_stmt(id, "continue;"),
            Break => self.label_stmt(id, "break;"),
            Return => {
                let body = match self.child(id, "expr") {
                    Some(expr) => format!("return {};", self.to_c(expr)),
                    None => "return;".to_owned(),
                };
                self.label_stmt(id, &body)
            }
            ExpressionStatement => {
                let body = match self.child(id, "expr") {
                    Some(expr) => format!("{};", self.to_c(expr)),
                    None => ";".to_owned(),
                };
                self.label_stmt(id, &body)
            }

            PlainLabel => format!("{}:", self.field_str(id, "name").unwrap_or("")),
            Default => "default:".to_owned(),
            Case => format!("case {}:", self.opt_c(id, "expr")),

            Comma => {
                let exprs = self.child(id, "exprs").unwrap();
                self.join(exprs, ", ")
            }
            Conditional => self.conditional_str(id),
            Variable => self.field_str(id, "name").unwrap_or("").to_owned(),
            Call => self.call_str(id),
            Index | Dot | Arrow | PostInc | PostDec => self.postfix_str(id),
            Sizeof => format!("sizeof({})", self.opt_c(id, "expr")),
            Cast | Address | Dereference | Positive | Negative | PreInc | PreDec | BitNot
            | Not => self.prefix_str(id),
            k if k.is_binary_expression() => self.binary_str(id),
            k if k.is_assignment_expression() => self.assignment_str(id),

            StringLiteral => format!("\"{}\"", self.field_str(id, "val").unwrap_or("")),
            CharLiteral => format!("'{}'", self.field_str(id, "val").unwrap_or("")),
            CompoundLiteral => self.compound_literal_str(id),
            IntLiteral => self.field(id, "val").as_int().to_string(),
            FloatLiteral => match self.field(id, "val") {
                Value::Float(x) => float_str(*x),
                other => other.to_string(),
            },

            k if k.is_type() => self.type_str(id, ""),

            NodeArray | NodeChain => self.join(id, ", "),
            _ => unreachable!("no renderer for {}", kind),
        }
    }

    /// Renders each element of a list and joins with `sep`.
    pub fn join(&self, list: NodeId, sep: &str) -> String {
        self.list_nodes(list)
            .iter()
            .map(|&e| self.to_c(e))
            .collect::<Vec<_>>()
            .join(sep)
    }

    // ----------------------------------------------------------------
    // Statements
    // ----------------------------------------------------------------

    fn label_stmt(&self, id: NodeId, body: &str) -> String {
        let labels = self.child(id, "labels").unwrap();
        let mut out = String::new();
        for label in self.list_nodes(labels) {
            out.push_str(&self.to_c(label));
            out.push('\n');
        }
        out.push_str(&indent(body, 1));
        out
    }

    /// An optional child rendered as source, or the empty string.
    fn opt_c(&self, id: NodeId, name: &str) -> String {
        match self.child(id, name) {
            Some(child) => self.to_c(child),
            None => String::new(),
        }
    }

    /// [`hang`](Self::hang) for an optional statement slot. An empty slot
    /// contributes nothing, so `if (x)` with no branch renders bare.
    fn hang_opt(&self, stmt: Option<NodeId>, cont: bool) -> String {
        match stmt {
            Some(stmt) => self.hang(stmt, cont),
            None if cont => "\n".to_owned(),
            None => String::new(),
        }
    }

    /// Renders `stmt` hanging off a statement header: a label-less block
    /// hangs on the same line, anything else goes on its own line.
    fn hang(&self, stmt: NodeId, cont: bool) -> String {
        let labels_empty = self.kind(stmt) == NodeKind::Block
            && self.list_is_empty(self.child(stmt, "labels").unwrap());
        if labels_empty {
            format!(" {}{}", self.block_str(stmt, true), if cont { " " } else { "" })
        } else {
            format!("\n{}{}", self.to_c(stmt), if cont { "\n" } else { "" })
        }
    }

    fn block_str(&self, id: NodeId, hanging: bool) -> String {
        let stmts = self.child(id, "stmts").unwrap();
        let mut inner = self
            .list_nodes(stmts)
            .iter()
            .map(|&s| {
                if self.kind(s).is_statement() {
                    self.to_c(s)
                } else {
                    indent(&self.to_c(s), 1)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        if !inner.is_empty() {
            inner.push('\n');
        }
        let body = format!("{{\n{}}}", inner);
        let labels = self.child(id, "labels").unwrap();
        if hanging {
            if self.list_is_empty(labels) {
                body
            } else {
                format!("\n{}", self.label_stmt(id, &body))
            }
        } else {
            self.label_stmt(id, &body)
        }
    }

    fn for_str(&self, id: NodeId) -> String {
        let init_str = match self.child(id, "init") {
            None => ";".to_owned(),
            Some(init) if self.kind(init) == NodeKind::Declaration => self.to_c(init),
            Some(init) => format!("{};", self.to_c(init)),
        };
        let cond_str = match self.child(id, "cond") {
            Some(cond) => format!(" {};", self.to_c(cond)),
            None => ";".to_owned(),
        };
        let iter_str = match self.child(id, "iter") {
            Some(iter) => format!(" {}", self.to_c(iter)),
            None => String::new(),
        };
        let stmt = self.child(id, "stmt");
        self.label_stmt(
            id,
            &format!(
                "for ({}{}{}){}",
                init_str,
                cond_str,
                iter_str,
                self.hang_opt(stmt, false)
            ),
        )
    }

    // ----------------------------------------------------------------
    // Declarations
    // ----------------------------------------------------------------

    fn declaration_str(&self, id: NodeId) -> String {
        let mut out = String::new();
        if self.flag(id, "inline") {
            out.push_str("inline ");
        }
        if let Some(storage) = self.field_str(id, "storage") {
            out.push_str(storage);
            out.push(' ');
        }
        let type_str = self.to_c(self.child(id, "type").unwrap());
        let declarators = self.child(id, "declarators").unwrap();
        if self.list_is_empty(declarators) {
            out.push_str(&type_str);
            out.push(';');
        } else {
            out.push_str(&type_str);
            out.push(' ');
            out.push_str(&self.join(declarators, ", "));
            out.push(';');
        }
        out
    }

    fn declarator_str(&self, id: NodeId) -> String {
        let name = self.field_str(id, "name").unwrap_or("");
        let mut out = match self.child(id, "indirect_type") {
            Some(it) => self.type_str(it, name),
            None => name.to_owned(),
        };
        if let Some(init) = self.child(id, "init") {
            out.push_str(&format!(" = {}", self.to_c(init)));
        }
        if let Some(bits) = self.child(id, "num_bits") {
            out.push_str(&format!(" : {}", self.to_c(bits)));
        }
        out
    }

    fn function_def_str(&self, id: NodeId) -> String {
        let mut out = String::new();
        if self.field_str(id, "storage") == Some("static") {
            out.push_str("static ");
        }
        if self.flag(id, "inline") {
            out.push_str("inline ");
        }
        let fn_type = self.child(id, "type").unwrap();
        let name = self.field_str(id, "name").unwrap_or("");
        let def = self.child(id, "def").unwrap();
        if self.flag(id, "no_prototype") {
            let sig = self.function_type_str(fn_type, name, true);
            let sig = match self.child(fn_type, "type") {
                Some(ret) => self.type_str(ret, &sig),
                None => sig,
            };
            out.push_str(&sig);
            out.push('\n');
            if let Some(params) = self.child(fn_type, "params") {
                for param in self.list_nodes(params) {
                    out.push_str(&indent(&format!("{};", self.to_c(param)), 1));
                    out.push('\n');
                }
            }
            out.push_str(&self.block_str(def, true));
        } else {
            out.push_str(&self.type_str(fn_type, name));
            out.push_str(&self.hang(def, false));
        }
        out
    }

    fn parameter_str(&self, id: NodeId) -> String {
        let mut out = String::new();
        if self.flag(id, "register") {
            out.push_str("register ");
        }
        let name = self.field_str(id, "name").unwrap_or("");
        match self.child(id, "type") {
            Some(ty) => out.push_str(&self.type_str(ty, name)),
            None => out.push_str(name),
        }
        out
    }

    // ----------------------------------------------------------------
    // Expressions
    // ----------------------------------------------------------------

    fn prec_of(&self, id: NodeId) -> u8 {
        precedence(self.kind(id))
    }

    fn prefix_str(&self, id: NodeId) -> String {
        let kind = self.kind(id);
        let expr = self.child(id, "expr").unwrap();
        let op = match kind {
            NodeKind::Cast => format!("({})", self.to_c(self.child(id, "type").unwrap())),
            _ => kind.operator().unwrap().to_owned(),
        };
        // `&`, unary `+` and unary `-` need a space before an identical
        // operator so the printer never forms `&&`, `++`, or `--`.
        let space_needed = matches!(
            kind,
            NodeKind::Address | NodeKind::Positive | NodeKind::Negative
        );
        if self.prec_of(expr) < self.prec_of(id) {
            format!("{}({})", op, self.to_c(expr))
        } else if space_needed && self.kind(expr) == kind {
            format!("{} {}", op, self.to_c(expr))
        } else {
            format!("{}{}", op, self.to_c(expr))
        }
    }

    fn postfix_str(&self, id: NodeId) -> String {
        let kind = self.kind(id);
        let expr = self.child(id, "expr").unwrap();
        let suffix = match kind {
            NodeKind::Arrow => format!("->{}", self.to_c(self.child(id, "member").unwrap())),
            NodeKind::Dot => format!(".{}", self.to_c(self.child(id, "member").unwrap())),
            NodeKind::Index => format!("[{}]", self.to_c(self.child(id, "index").unwrap())),
            NodeKind::PostInc => "++".to_owned(),
            NodeKind::PostDec => "--".to_owned(),
            _ => unreachable!(),
        };
        if self.prec_of(expr) < self.prec_of(id) {
            format!("({}){}", self.to_c(expr), suffix)
        } else {
            format!("{}{}", self.to_c(expr), suffix)
        }
    }

    fn binary_str(&self, id: NodeId) -> String {
        let lhs = self.child(id, "expr1").unwrap();
        let rhs = self.child(id, "expr2").unwrap();
        let prec = self.prec_of(id);
        let lhs_str = if self.prec_of(lhs) < prec {
            format!("({})", self.to_c(lhs))
        } else {
            self.to_c(lhs)
        };
        // left associative, so an equal-precedence rhs needs parens
        let rhs_str = if self.prec_of(rhs) <= prec {
            format!("({})", self.to_c(rhs))
        } else {
            self.to_c(rhs)
        };
        format!("{} {} {}", lhs_str, self.kind(id).operator().unwrap(), rhs_str)
    }

    fn assignment_str(&self, id: NodeId) -> String {
        let lval = self.child(id, "lval").unwrap();
        let rval = self.child(id, "rval").unwrap();
        let prec = self.prec_of(id);
        let lval_str = if self.prec_of(lval) < prec {
            format!("({})", self.to_c(lval))
        } else {
            self.to_c(lval)
        };
        let rval_str = if self.prec_of(rval) < prec {
            format!("({})", self.to_c(rval))
        } else {
            self.to_c(rval)
        };
        format!("{} {} {}", lval_str, self.kind(id).operator().unwrap(), rval_str)
    }

    fn conditional_str(&self, id: NodeId) -> String {
        let prec = self.prec_of(id);
        let part = |child: &str| {
            let node = self.child(id, child).unwrap();
            if self.prec_of(node) <= prec {
                format!("({})", self.to_c(node))
            } else {
                self.to_c(node)
            }
        };
        format!("{} ? {} : {}", part("cond"), part("then"), part("else"))
    }

    fn call_str(&self, id: NodeId) -> String {
        let expr = self.child(id, "expr").unwrap();
        let args = self.child(id, "args").unwrap();
        let arg_strs = self
            .list_nodes(args)
            .iter()
            .map(|&arg| {
                if self.kind(arg) == NodeKind::Comma {
                    format!("({})", self.to_c(arg))
                } else {
                    self.to_c(arg)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let expr_str = if self.prec_of(expr) < self.prec_of(id) {
            format!("({})", self.to_c(expr))
        } else {
            self.to_c(expr)
        };
        format!("{}({})", expr_str, arg_strs)
    }

    fn member_init_str(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(member) = self.child(id, "member") {
            let designators = self
                .list_nodes(member)
                .iter()
                .map(|&m| {
                    if self.kind(m).is_expression() {
                        format!("[{}]", self.to_c(m))
                    } else {
                        format!(".{}", self.to_c(m))
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&designators);
            out.push_str(" = ");
        }
        if let Some(init) = self.child(id, "init") {
            out.push_str(&self.to_c(init));
        }
        out
    }

    fn compound_literal_str(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(ty) = self.child(id, "type") {
            out.push_str(&format!("({}) ", self.to_c(ty)));
        }
        let inits = self.child(id, "member_inits").unwrap();
        out.push_str(&format!(
            "{{\n{}\n}}",
            indent(&self.join(inits, ",\n"), 1)
        ));
        out
    }

    // ----------------------------------------------------------------
    // Types
    //
    // C declarators read inside out; `type_str` threads the declarator
    // string through the type chain, wrapping it in parentheses where a
    // pointer binds tighter than a function or array suffix.
    // ----------------------------------------------------------------

    fn type_str(&self, id: NodeId, name: &str) -> String {
        use NodeKind::*;
        match self.kind(id) {
            Pointer => {
                let mut s = String::from("*");
                s.push_str(&self.qualifier_str(id));
                let inner = self.child(id, "type");
                let wrapped = match inner.map(|t| self.kind(t)) {
                    Some(Function) | Some(Array) => format!("({}{})", s, name),
                    _ => format!("{}{}", s, name),
                };
                match inner {
                    Some(t) => self.type_str(t, &wrapped),
                    None => wrapped,
                }
            }
            Array => {
                let length = match self.child(id, "length") {
                    Some(len) => self.to_c(len),
                    None => String::new(),
                };
                let s = format!("{}[{}]", name, length);
                match self.child(id, "type") {
                    Some(t) => self.type_str(t, &s),
                    None => s,
                }
            }
            Function => {
                let s = self.function_type_str(id, name, false);
                match self.child(id, "type") {
                    Some(t) => self.type_str(t, &s),
                    None => s,
                }
            }
            _ => self.direct_type_str(id, name),
        }
    }

    /// The `name(params)` part of a function type, without the return type.
    fn function_type_str(&self, id: NodeId, name: &str, names_only: bool) -> String {
        let mut params_str = match self.child(id, "params") {
            None => String::new(),
            Some(params) if self.list_is_empty(params) => "void".to_owned(),
            Some(params) => {
                if names_only {
                    self.list_nodes(params)
                        .iter()
                        .map(|&p| self.field_str(p, "name").unwrap_or("").to_owned())
                        .collect::<Vec<_>>()
                        .join(", ")
                } else {
                    self.join(params, ", ")
                }
            }
        };
        if self.flag(id, "var_args") {
            params_str.push_str(", ...");
        }
        format!("{}({})", name, params_str)
    }

    fn qualifier_str(&self, id: NodeId) -> String {
        let mut s = String::new();
        if self.flag(id, "const") {
            s.push_str("const ");
        }
        if self.flag(id, "restrict") {
            s.push_str("restrict ");
        }
        if self.flag(id, "volatile") {
            s.push_str("volatile ");
        }
        s
    }

    fn direct_type_str(&self, id: NodeId, name: &str) -> String {
        use NodeKind::*;
        const INT_LONGNESS: [&str; 4] = ["short ", "", "long ", "long long "];
        const FLOAT_LONGNESS: [&str; 3] = ["float", "double", "long double"];
        let base = match self.kind(id) {
            Struct | Union => {
                let keyword = if self.kind(id) == Struct { "struct" } else { "union" };
                let mut s = keyword.to_owned();
                if let Some(tag) = self.field_str(id, "name") {
                    s.push_str(&format!(" {}", tag));
                }
                if let Some(members) = self.child(id, "members") {
                    s.push_str(&format!(
                        " {{\n{}\n}}",
                        indent(&self.join(members, "\n"), 1)
                    ));
                }
                s
            }
            Enum => {
                let mut s = String::from("enum");
                if let Some(tag) = self.field_str(id, "name") {
                    s.push_str(&format!(" {}", tag));
                }
                if let Some(members) = self.child(id, "members") {
                    s.push_str(&format!(
                        " {{\n{}\n}}",
                        indent(&self.join(members, ",\n"), 1)
                    ));
                }
                s
            }
            CustomType => self.field_str(id, "name").unwrap_or("").to_owned(),
            Void => "void".to_owned(),
            Int => {
                let longness = self.field(id, "longness").as_int();
                format!(
                    "{}{}int",
                    if self.flag(id, "unsigned") { "unsigned " } else { "" },
                    INT_LONGNESS[(longness + 1) as usize]
                )
            }
            Float => FLOAT_LONGNESS[self.field(id, "longness").as_int() as usize].to_owned(),
            Char => {
                let prefix = match self.field(id, "signed") {
                    Value::Bool(false) => "unsigned ",
                    Value::Bool(true) => "signed ",
                    _ => "",
                };
                format!("{}char", prefix)
            }
            Bool => "_Bool".to_owned(),
            Complex => format!(
                "_Complex {}",
                FLOAT_LONGNESS[self.field(id, "longness").as_int() as usize]
            ),
            Imaginary => format!(
                "_Imaginary {}",
                FLOAT_LONGNESS[self.field(id, "longness").as_int() as usize]
            ),
            other => unreachable!("not a direct type: {}", other),
        };
        let mut out = self.qualifier_str(id);
        out.push_str(&base);
        if !name.is_empty() {
            out.push(' ');
            out.push_str(name);
        }
        out
    }

    // ----------------------------------------------------------------
    // Debug dump
    // ----------------------------------------------------------------

    /// Renders the structural tree, one node per line. Set flags appear in
    /// parentheses after the kind name; attributes still at their default
    /// are elided.
    pub fn dump(&self, id: NodeId) -> String {
        self.dump1(id, "", 0)
    }

    fn dump1(&self, id: NodeId, prefix: &str, depth: usize) -> String {
        let tab = INDENT.repeat(depth);
        if self.kind(id).is_list() {
            if self.list_is_empty(id) {
                return format!("{}{}[]\n", tab, prefix);
            }
            let mut out = format!("{}{}\n", tab, prefix.trim_end());
            for elem in self.list_nodes(id) {
                out.push_str(&self.dump1(elem, "- ", depth + 1));
            }
            return out;
        }

        let mut out = format!("{}{}{}", tab, prefix, self.kind(id));
        let schema = schema::of(self.kind(id));
        let flags: Vec<&str> = schema
            .attributes
            .iter()
            .enumerate()
            .filter(|(i, a)| a.default == DefaultValue::False && self.flag_at(id, *i))
            .map(|(_, a)| a.name)
            .collect();
        if !flags.is_empty() {
            out.push_str(&format!(" ({})", flags.join(" ")));
        }
        out.push('\n');

        for (i, attr) in schema.attributes.iter().enumerate() {
            if attr.default == DefaultValue::False || self.attr_is_default(id, i) {
                continue;
            }
            let label = format!("{}: ", attr.name);
            if attr.child {
                if let Some(child) = self.child_at(id, i) {
                    out.push_str(&self.dump1(child, &label, depth + 1));
                }
            } else {
                let value = self.field_at(id, i);
                out.push_str(&format!(
                    "{}{}{}\n",
                    INDENT.repeat(depth + 1),
                    label,
                    dump_value(value)
                ));
            }
        }
        out
    }

    fn attr_is_default(&self, id: NodeId, i: usize) -> bool {
        let attr = &schema::of(self.kind(id)).attributes[i];
        match attr.default {
            DefaultValue::None => {
                if attr.child {
                    self.child_at(id, i).is_none()
                } else {
                    self.field_at(id, i).is_none()
                }
            }
            DefaultValue::False => !self.flag_at(id, i),
            DefaultValue::Zero => *self.field_at(id, i) == Value::Int(0),
            DefaultValue::DecFormat => self.field_at(id, i).as_str() == Some("dec"),
            DefaultValue::EmptyArray | DefaultValue::EmptyChain => match self.child_at(id, i) {
                Some(list) => self.list_is_empty(list),
                None => true,
            },
            DefaultValue::EmptyBlock => match self.child_at(id, i) {
                Some(block) => {
                    self.kind(block) == NodeKind::Block
                        && self
                            .children(block)
                            .iter()
                            .all(|&list| self.list_is_empty(list))
                }
                None => true,
            },
        }
    }

    fn field_at(&self, id: NodeId, i: usize) -> &Value {
        let name = schema::of(self.kind(id)).attributes[i].name;
        self.field(id, name)
    }

    fn flag_at(&self, id: NodeId, i: usize) -> bool {
        self.field_at(id, i).as_bool()
    }

    fn child_at(&self, id: NodeId, i: usize) -> Option<NodeId> {
        let name = schema::of(self.kind(id)).attributes[i].name;
        self.child(id, name)
    }
}

fn dump_value(value: &Value) -> String {
    match value {
        Value::None => "nil".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(x) => float_str(*x),
        Value::Str(s) => format!("{:?}", s),
        Value::Kw(s) => (*s).to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Arg;

    fn var(ast: &mut Ast, name: &str) -> NodeId {
        ast.node_with(NodeKind::Variable, &[name.into()])
    }

    #[test]
    fn test_binary_parens_follow_precedence() {
        let mut ast = Ast::new();
        let a = var(&mut ast, "a");
        let b = var(&mut ast, "b");
        let add = ast.node_with(NodeKind::Add, &[a.into(), b.into()]);
        let c = var(&mut ast, "c");
        let mul = ast.node_with(NodeKind::Multiply, &[add.into(), c.into()]);
        assert_eq!(ast.to_c(mul), "(a + b) * c");

        let d = var(&mut ast, "d");
        let e = var(&mut ast, "e");
        let f = var(&mut ast, "f");
        let mul2 = ast.node_with(NodeKind::Multiply, &[e.into(), f.into()]);
        let add2 = ast.node_with(NodeKind::Add, &[d.into(), mul2.into()]);
        assert_eq!(ast.to_c(add2), "d + e * f");
    }

    #[test]
    fn test_left_associativity_parens_on_rhs() {
        let mut ast = Ast::new();
        let a = var(&mut ast, "a");
        let b = var(&mut ast, "b");
        let c = var(&mut ast, "c");
        let inner = ast.node_with(NodeKind::Subtract, &[b.into(), c.into()]);
        let outer = ast.node_with(NodeKind::Subtract, &[a.into(), inner.into()]);
        assert_eq!(ast.to_c(outer), "a - (b - c)");
    }

    #[test]
    fn test_nested_unary_minus_gets_space() {
        let mut ast = Ast::new();
        let a = var(&mut ast, "a");
        let inner = ast.node_with(NodeKind::Negative, &[a.into()]);
        let outer = ast.node_with(NodeKind::Negative, &[inner.into()]);
        assert_eq!(ast.to_c(outer), "- -a");
    }

    #[test]
    fn test_pointer_to_function_declaration() {
        let mut ast = Ast::new();
        let params = ast.array(&[]);
        let func = ast.node_full(NodeKind::Function, &[], &[("params", Arg::Node(params))]);
        let ptr = ast.node_with(NodeKind::Pointer, &[Arg::Node(func)]);
        let decl = ast.node_full(
            NodeKind::Declarator,
            &[Arg::Node(ptr), Arg::from("f")],
            &[],
        );
        let base = ast.node(NodeKind::Int);
        let declarators = ast.array(&[decl]);
        let declaration = ast.node_with(
            NodeKind::Declaration,
            &[Arg::Node(base), Arg::Node(declarators)],
        );
        assert_eq!(ast.to_c(declaration), "int (*f)(void);");
    }

    #[test]
    fn test_if_else_hanging_blocks() {
        let mut ast = Ast::new();
        let cond = var(&mut ast, "x");
        let then = ast.node(NodeKind::Block);
        let els = ast.node(NodeKind::Block);
        let if_ = ast.node_with(
            NodeKind::If,
            &[cond.into(), then.into(), els.into()],
        );
        assert_eq!(ast.to_c(if_), "    if (x) {\n    } else {\n    }");
    }

    #[test]
    fn test_empty_optional_slots_render_bare() {
        let mut ast = Ast::new();
        let cond = var(&mut ast, "x");
        let if_ = ast.node_with(NodeKind::If, &[cond.into()]);
        assert_eq!(ast.to_c(if_), "    if (x)");

        let w = ast.node(NodeKind::While);
        assert_eq!(ast.to_c(w), "    while ()");

        let case = ast.node(NodeKind::Case);
        assert_eq!(ast.to_c(case), "case :");

        let f = ast.node(NodeKind::For);
        assert_eq!(ast.to_c(f), "    for (;;)");
    }

    #[test]
    fn test_dump_flags_and_defaults() {
        let mut ast = Ast::new();
        let int = ast.node_full(NodeKind::Int, &[], &[("unsigned", Arg::from(true))]);
        assert_eq!(ast.dump(int), "Int (unsigned)\n");

        let lit = ast.node_with(NodeKind::IntLiteral, &[Arg::from(10)]);
        assert_eq!(ast.dump(lit), "IntLiteral\n    val: 10\n");
    }
}

//! Per-kind attribute schemas.
//!
//! Every [`NodeKind`] owns a static table of [`Attribute`] descriptors: the
//! attribute's name, whether it is a child slot or an opaque field, and its
//! default. Declaration order is canonical — construction, equality, hashing,
//! traversal, and [`dump`](crate::ast::Ast::dump) all walk the table in
//! order. `init_order` lists the attribute indices filled by positional
//! constructor arguments.

use super::kind::NodeKind;

/// How an unset attribute is populated at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Field stays `Value::None` / child slot stays empty.
    None,
    /// Flag field, defaults to `false`.
    False,
    /// Integer field, defaults to `0`.
    Zero,
    /// Literal format field, defaults to the `dec` keyword.
    DecFormat,
    /// Child slot gets a fresh empty `NodeArray`.
    EmptyArray,
    /// Child slot gets a fresh empty `NodeChain`.
    EmptyChain,
    /// Child slot gets a fresh empty `Block`.
    EmptyBlock,
}

#[derive(Debug, Clone, Copy)]
pub struct Attribute {
    pub name: &'static str,
    pub child: bool,
    pub default: DefaultValue,
}

/// The schema of one node kind.
#[derive(Debug)]
pub struct Schema {
    pub attributes: &'static [Attribute],
    /// Indices into `attributes`, in positional-argument order.
    pub init_order: &'static [usize],
}

impl Schema {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }
}

const fn field(name: &'static str) -> Attribute {
    Attribute {
        name,
        child: false,
        default: DefaultValue::None,
    }
}

const fn field_with(name: &'static str, default: DefaultValue) -> Attribute {
    Attribute {
        name,
        child: false,
        default,
    }
}

const fn flag(name: &'static str) -> Attribute {
    field_with(name, DefaultValue::False)
}

const fn child(name: &'static str) -> Attribute {
    Attribute {
        name,
        child: true,
        default: DefaultValue::None,
    }
}

const fn child_with(name: &'static str, default: DefaultValue) -> Attribute {
    Attribute {
        name,
        child: true,
        default,
    }
}

// Attributes shared across whole categories.
const LABELS: Attribute = child_with("labels", DefaultValue::EmptyArray);
const Q_CONST: Attribute = flag("const");
const Q_RESTRICT: Attribute = flag("restrict");
const Q_VOLATILE: Attribute = flag("volatile");

macro_rules! schema {
    ([$($attr:expr),* $(,)?], [$($idx:expr),* $(,)?]) => {
        Schema {
            attributes: &[$($attr),*],
            init_order: &[$($idx),*],
        }
    };
}

static EMPTY: Schema = schema!([], []);

static TRANSLATION_UNIT: Schema =
    schema!([child_with("entities", DefaultValue::EmptyChain)], [0]);
static DECLARATION: Schema = schema!(
    [
        field("storage"),
        child("type"),
        child_with("declarators", DefaultValue::EmptyArray),
        flag("inline"),
    ],
    [1, 2]
);
static DECLARATOR: Schema = schema!(
    [
        child("indirect_type"),
        field("name"),
        child("init"),
        child("num_bits"),
    ],
    [0, 1, 2, 3]
);
static FUNCTION_DEF: Schema = schema!(
    [
        field("storage"),
        flag("inline"),
        child("type"),
        field("name"),
        child_with("def", DefaultValue::EmptyBlock),
        flag("no_prototype"),
    ],
    [2, 3, 4]
);
static PARAMETER: Schema = schema!([flag("register"), child("type"), field("name")], [1, 2]);
static ENUMERATOR: Schema = schema!([field("name"), child("val")], [0, 1]);
static MEMBER_INIT: Schema = schema!([child("member"), child("init")], [0, 1]);
static MEMBER: Schema = schema!([field("name")], [0]);

static BLOCK: Schema = schema!(
    [LABELS, child_with("stmts", DefaultValue::EmptyChain)],
    [1]
);
static IF: Schema = schema!(
    [LABELS, child("cond"), child("then"), child("else")],
    [1, 2, 3]
);
static SWITCH: Schema = schema!([LABELS, child("cond"), child("stmt")], [1, 2]);
static WHILE: Schema = schema!(
    [LABELS, flag("do"), child("cond"), child("stmt")],
    [2, 3, 1]
);
static FOR: Schema = schema!(
    [LABELS, child("init"), child("cond"), child("iter"), child("stmt")],
    [1, 2, 3, 4]
);
static GOTO: Schema = schema!([LABELS, field("target")], [1]);
static LABELS_ONLY: Schema = schema!([LABELS], []);
static RETURN: Schema = schema!([LABELS, child("expr")], [1]);
static EXPRESSION_STATEMENT: Schema = schema!([LABELS, child("expr")], [1]);

static PLAIN_LABEL: Schema = schema!([field("name")], [0]);
static CASE: Schema = schema!([child("expr")], [0]);

static COMMA: Schema = schema!([child_with("exprs", DefaultValue::EmptyArray)], [0]);
static CONDITIONAL: Schema = schema!([child("cond"), child("then"), child("else")], [0, 1, 2]);
static VARIABLE: Schema = schema!([field("name")], [0]);

static EXPR_ONLY: Schema = schema!([child("expr")], [0]);
static CAST: Schema = schema!([child("type"), child("expr")], [0, 1]);
static INDEX: Schema = schema!([child("expr"), child("index")], [0, 1]);
static CALL: Schema = schema!(
    [child("expr"), child_with("args", DefaultValue::EmptyArray)],
    [0, 1]
);
static MEMBER_ACCESS: Schema = schema!([child("expr"), child("member")], [0, 1]);

static BINARY: Schema = schema!([child("expr1"), child("expr2")], [0, 1]);
static ASSIGNMENT: Schema = schema!([child("lval"), child("rval")], [0, 1]);

static TEXT_LITERAL: Schema = schema!([field("val"), flag("wide")], [0]);
static COMPOUND_LITERAL: Schema = schema!(
    [child("type"), child_with("member_inits", DefaultValue::EmptyArray)],
    [0, 1]
);
static NUMERIC_LITERAL: Schema = schema!(
    [
        field("val"),
        field_with("format", DefaultValue::DecFormat),
        field("suffix"),
    ],
    [0]
);

static POINTER: Schema = schema!([Q_CONST, Q_RESTRICT, Q_VOLATILE, child("type")], [3]);
static ARRAY_TYPE: Schema = schema!(
    [Q_CONST, Q_RESTRICT, Q_VOLATILE, child("type"), child("length")],
    [3, 4]
);
static FUNCTION_TYPE: Schema = schema!(
    [
        Q_CONST,
        Q_RESTRICT,
        Q_VOLATILE,
        child("type"),
        child("params"),
        flag("var_args"),
    ],
    [3, 4]
);
static TAGGED_TYPE: Schema = schema!(
    [Q_CONST, Q_RESTRICT, Q_VOLATILE, field("name"), child("members")],
    [3, 4]
);
static CUSTOM_TYPE: Schema = schema!([Q_CONST, Q_RESTRICT, Q_VOLATILE, field("name")], [3]);
static BARE_TYPE: Schema = schema!([Q_CONST, Q_RESTRICT, Q_VOLATILE], []);
static INT_TYPE: Schema = schema!(
    [
        Q_CONST,
        Q_RESTRICT,
        Q_VOLATILE,
        field_with("longness", DefaultValue::Zero),
        flag("unsigned"),
    ],
    [3]
);
static LONG_TYPE: Schema = schema!(
    [Q_CONST, Q_RESTRICT, Q_VOLATILE, field_with("longness", DefaultValue::Zero)],
    [3]
);
// char signedness is tri-state: signed char, unsigned char, and plain char
// are three distinct types (C99 6.2.5p15), so the default stays unset.
static CHAR_TYPE: Schema = schema!([Q_CONST, Q_RESTRICT, Q_VOLATILE, field("signed")], []);

pub fn of(kind: NodeKind) -> &'static Schema {
    use NodeKind::*;
    match kind {
        TranslationUnit => &TRANSLATION_UNIT,
        Declaration => &DECLARATION,
        Declarator => &DECLARATOR,
        FunctionDef => &FUNCTION_DEF,
        Parameter => &PARAMETER,
        Enumerator => &ENUMERATOR,
        MemberInit => &MEMBER_INIT,
        Member => &MEMBER,
        Block => &BLOCK,
        If => &IF,
        Switch => &SWITCH,
        While => &WHILE,
        For => &FOR,
        Goto => &GOTO,
        Continue | Break => &LABELS_ONLY,
        Return => &RETURN,
        ExpressionStatement => &EXPRESSION_STATEMENT,
        PlainLabel => &PLAIN_LABEL,
        Default => &EMPTY,
        Case => &CASE,
        Comma => &COMMA,
        Conditional => &CONDITIONAL,
        Variable => &VARIABLE,
        Index => &INDEX,
        Call => &CALL,
        Dot | Arrow => &MEMBER_ACCESS,
        PostInc | PostDec => &EXPR_ONLY,
        Cast => &CAST,
        Address | Dereference | Sizeof | Positive | Negative | PreInc | PreDec | BitNot | Not => {
            &EXPR_ONLY
        }
        Add | Subtract | Multiply | Divide | Mod | Equal | NotEqual | Less | More
        | LessOrEqual | MoreOrEqual | BitAnd | BitOr | BitXor | ShiftLeft | ShiftRight | And
        | Or => &BINARY,
        Assign | MultiplyAssign | DivideAssign | ModAssign | AddAssign | SubtractAssign
        | ShiftLeftAssign | ShiftRightAssign | BitAndAssign | BitXorAssign | BitOrAssign => {
            &ASSIGNMENT
        }
        StringLiteral | CharLiteral => &TEXT_LITERAL,
        CompoundLiteral => &COMPOUND_LITERAL,
        IntLiteral | FloatLiteral => &NUMERIC_LITERAL,
        Pointer => &POINTER,
        Array => &ARRAY_TYPE,
        Function => &FUNCTION_TYPE,
        Struct | Union | Enum => &TAGGED_TYPE,
        CustomType => &CUSTOM_TYPE,
        Void | Bool => &BARE_TYPE,
        Int => &INT_TYPE,
        Float | Complex | Imaginary => &LONG_TYPE,
        Char => &CHAR_TYPE,
        NodeArray | NodeChain => &EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_order_indices_are_valid() {
        use NodeKind::*;
        for kind in [
            TranslationUnit,
            Declaration,
            Declarator,
            FunctionDef,
            Parameter,
            Block,
            While,
            For,
            Call,
            IntLiteral,
            Function,
            Struct,
            Int,
            Char,
        ] {
            let schema = of(kind);
            for &i in schema.init_order {
                assert!(i < schema.attributes.len(), "{}: bad index {}", kind, i);
            }
        }
    }

    #[test]
    fn test_while_positional_order() {
        // While takes (cond, stmt, do) positionally even though the do flag
        // is declared before them.
        let schema = of(NodeKind::While);
        let names: Vec<_> = schema
            .init_order
            .iter()
            .map(|&i| schema.attributes[i].name)
            .collect();
        assert_eq!(names, ["cond", "stmt", "do"]);
    }

    #[test]
    fn test_qualifier_prefix_on_types() {
        for kind in [NodeKind::Pointer, NodeKind::Struct, NodeKind::Void, NodeKind::Int] {
            let attrs = of(kind).attributes;
            assert_eq!(attrs[0].name, "const");
            assert_eq!(attrs[1].name, "restrict");
            assert_eq!(attrs[2].name, "volatile");
        }
    }
}

//! The closed catalog of node kinds.
//!
//! Every node in an [`Ast`](crate::ast::Ast) carries exactly one `NodeKind`.
//! The kind selects the node's attribute schema (see
//! [`schema`](crate::ast::schema)) and its syntactic category, queried through
//! the `is_*` predicates below instead of downcasting.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Top-level constructs
    TranslationUnit,
    Declaration,
    Declarator,
    FunctionDef,
    Parameter,
    Enumerator,
    MemberInit,
    Member,

    // Statements
    Block,
    If,
    Switch,
    While,
    For,
    Goto,
    Continue,
    Break,
    Return,
    ExpressionStatement,

    // Labels
    PlainLabel,
    Default,
    Case,

    // Expressions
    Comma,
    Conditional,
    Variable,

    // Postfix expressions
    Index,
    Call,
    Dot,
    Arrow,
    PostInc,
    PostDec,

    // Prefix expressions
    Cast,
    Address,
    Dereference,
    Sizeof,
    Positive,
    Negative,
    PreInc,
    PreDec,
    BitNot,
    Not,

    // Binary expressions
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    Equal,
    NotEqual,
    Less,
    More,
    LessOrEqual,
    MoreOrEqual,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    And,
    Or,

    // Assignment expressions
    Assign,
    MultiplyAssign,
    DivideAssign,
    ModAssign,
    AddAssign,
    SubtractAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    BitAndAssign,
    BitXorAssign,
    BitOrAssign,

    // Literals
    StringLiteral,
    CharLiteral,
    CompoundLiteral,
    IntLiteral,
    FloatLiteral,

    // Indirect types
    Pointer,
    Array,
    Function,

    // Direct types
    Struct,
    Union,
    Enum,
    CustomType,
    Void,
    Int,
    Float,
    Char,
    Bool,
    Complex,
    Imaginary,

    // List containers
    NodeArray,
    NodeChain,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        use NodeKind::*;
        match self {
            TranslationUnit => "TranslationUnit",
            Declaration => "Declaration",
            Declarator => "Declarator",
            FunctionDef => "FunctionDef",
            Parameter => "Parameter",
            Enumerator => "Enumerator",
            MemberInit => "MemberInit",
            Member => "Member",
            Block => "Block",
            If => "If",
            Switch => "Switch",
            While => "While",
            For => "For",
            Goto => "Goto",
            Continue => "Continue",
            Break => "Break",
            Return => "Return",
            ExpressionStatement => "ExpressionStatement",
            PlainLabel => "PlainLabel",
            Default => "Default",
            Case => "Case",
            Comma => "Comma",
            Conditional => "Conditional",
            Variable => "Variable",
            Index => "Index",
            Call => "Call",
            Dot => "Dot",
            Arrow => "Arrow",
            PostInc => "PostInc",
            PostDec => "PostDec",
            Cast => "Cast",
            Address => "Address",
            Dereference => "Dereference",
            Sizeof => "Sizeof",
            Positive => "Positive",
            Negative => "Negative",
            PreInc => "PreInc",
            PreDec => "PreDec",
            BitNot => "BitNot",
            Not => "Not",
            Add => "Add",
            Subtract => "Subtract",
            Multiply => "Multiply",
            Divide => "Divide",
            Mod => "Mod",
            Equal => "Equal",
            NotEqual => "NotEqual",
            Less => "Less",
            More => "More",
            LessOrEqual => "LessOrEqual",
            MoreOrEqual => "MoreOrEqual",
            BitAnd => "BitAnd",
            BitOr => "BitOr",
            BitXor => "BitXor",
            ShiftLeft => "ShiftLeft",
            ShiftRight => "ShiftRight",
            And => "And",
            Or => "Or",
            Assign => "Assign",
            MultiplyAssign => "MultiplyAssign",
            DivideAssign => "DivideAssign",
            ModAssign => "ModAssign",
            AddAssign => "AddAssign",
            SubtractAssign => "SubtractAssign",
            ShiftLeftAssign => "ShiftLeftAssign",
            ShiftRightAssign => "ShiftRightAssign",
            BitAndAssign => "BitAndAssign",
            BitXorAssign => "BitXorAssign",
            BitOrAssign => "BitOrAssign",
            StringLiteral => "StringLiteral",
            CharLiteral => "CharLiteral",
            CompoundLiteral => "CompoundLiteral",
            IntLiteral => "IntLiteral",
            FloatLiteral => "FloatLiteral",
            Pointer => "Pointer",
            Array => "Array",
            Function => "Function",
            Struct => "Struct",
            Union => "Union",
            Enum => "Enum",
            CustomType => "CustomType",
            Void => "Void",
            Int => "Int",
            Float => "Float",
            Char => "Char",
            Bool => "Bool",
            Complex => "Complex",
            Imaginary => "Imaginary",
            NodeArray => "NodeArray",
            NodeChain => "NodeChain",
        }
    }

    /// True for the two list-container kinds.
    pub fn is_list(self) -> bool {
        matches!(self, NodeKind::NodeArray | NodeKind::NodeChain)
    }

    pub fn is_statement(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Block | If | Switch | While | For | Goto | Continue | Break | Return
                | ExpressionStatement
        )
    }

    pub fn is_label(self) -> bool {
        matches!(self, NodeKind::PlainLabel | NodeKind::Default | NodeKind::Case)
    }

    pub fn is_expression(self) -> bool {
        use NodeKind::*;
        matches!(self, Comma | Conditional | Variable)
            || self.is_postfix_expression()
            || self.is_prefix_expression()
            || self.is_binary_expression()
            || self.is_assignment_expression()
            || self.is_literal()
    }

    pub fn is_postfix_expression(self) -> bool {
        use NodeKind::*;
        matches!(self, Index | Call | Dot | Arrow | PostInc | PostDec)
    }

    pub fn is_prefix_expression(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Cast | Address | Dereference | Sizeof | Positive | Negative | PreInc | PreDec
                | BitNot | Not
        )
    }

    pub fn is_unary_expression(self) -> bool {
        self.is_postfix_expression() || self.is_prefix_expression()
    }

    pub fn is_binary_expression(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Add | Subtract | Multiply | Divide | Mod | Equal | NotEqual | Less | More
                | LessOrEqual | MoreOrEqual | BitAnd | BitOr | BitXor | ShiftLeft | ShiftRight
                | And | Or
        )
    }

    pub fn is_assignment_expression(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Assign | MultiplyAssign | DivideAssign | ModAssign | AddAssign | SubtractAssign
                | ShiftLeftAssign | ShiftRightAssign | BitAndAssign | BitXorAssign | BitOrAssign
        )
    }

    pub fn is_literal(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            StringLiteral | CharLiteral | CompoundLiteral | IntLiteral | FloatLiteral
        )
    }

    pub fn is_type(self) -> bool {
        self.is_indirect_type() || self.is_direct_type()
    }

    pub fn is_indirect_type(self) -> bool {
        matches!(self, NodeKind::Pointer | NodeKind::Array | NodeKind::Function)
    }

    pub fn is_direct_type(self) -> bool {
        use NodeKind::*;
        matches!(self, Struct | Union | Enum | CustomType) || self.is_primitive_type()
    }

    pub fn is_primitive_type(self) -> bool {
        use NodeKind::*;
        matches!(self, Void | Int | Float | Char | Bool | Complex | Imaginary)
    }

    /// The C operator token for unary, binary, and assignment expression
    /// kinds. `None` for everything else (and for `Index`/`Call`/`Cast`,
    /// which have no single operator token).
    pub fn operator(self) -> Option<&'static str> {
        use NodeKind::*;
        Some(match self {
            Dot => ".",
            Arrow => "->",
            PostInc | PreInc => "++",
            PostDec | PreDec => "--",
            Address => "&",
            Dereference => "*",
            Sizeof => "sizeof",
            Positive => "+",
            Negative => "-",
            BitNot => "~",
            Not => "!",
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Mod => "%",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            More => ">",
            LessOrEqual => "<=",
            MoreOrEqual => ">=",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            And => "&&",
            Or => "||",
            Assign => "=",
            MultiplyAssign => "*=",
            DivideAssign => "/=",
            ModAssign => "%=",
            AddAssign => "+=",
            SubtractAssign => "-=",
            ShiftLeftAssign => "<<=",
            ShiftRightAssign => ">>=",
            BitAndAssign => "&=",
            BitXorAssign => "^=",
            BitOrAssign => "|=",
            _ => return None,
        })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_disjoint() {
        use NodeKind::*;
        for kind in [Block, Return, ExpressionStatement] {
            assert!(kind.is_statement());
            assert!(!kind.is_expression());
            assert!(!kind.is_type());
        }
        for kind in [Comma, Add, Assign, PostInc, Cast, IntLiteral, Variable] {
            assert!(kind.is_expression());
            assert!(!kind.is_statement());
        }
        for kind in [Pointer, Struct, Int, CustomType] {
            assert!(kind.is_type());
            assert!(!kind.is_expression());
        }
        assert!(NodeArray.is_list() && NodeChain.is_list());
        assert!(!Block.is_list());
    }

    #[test]
    fn test_operator_table() {
        assert_eq!(NodeKind::ShiftLeftAssign.operator(), Some("<<="));
        assert_eq!(NodeKind::Arrow.operator(), Some("->"));
        assert_eq!(NodeKind::Block.operator(), None);
        assert_eq!(NodeKind::Index.operator(), None);
    }
}

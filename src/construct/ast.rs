use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::common::span::Span;

/// Fields every AST node carries: its span and the
/// significant metadata segments attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Common {
    pub span: Span,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<String>,
}

impl Common {
    pub fn new(span: Span) -> Common {
        Common {
            span,
            metadata: vec![],
        }
    }

    pub fn with_metadata(span: Span, metadata: Vec<String>) -> Common {
        Common { span, metadata }
    }
}

/// An identifier leaf. The `None` kind keeps the tree
/// well-formed where an identifier was required but
/// missing; a diagnostic has been emitted for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IdentifierKind {
    None,
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub kind: IdentifierKind,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: &str, span: Span) -> Identifier {
        Identifier {
            kind: IdentifierKind::Name(name.to_string()),
            span,
        }
    }

    pub fn none(span: Span) -> Identifier {
        Identifier {
            kind: IdentifierKind::None,
            span,
        }
    }
}

/// A label leaf (`'name`), same sentinel discipline as
/// [`Identifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LabelKind {
    None,
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub kind: LabelKind,
    pub span: Span,
}

impl Label {
    pub fn new(name: &str, span: Span) -> Label {
        Label {
            kind: LabelKind::Name(name.to_string()),
            span,
        }
    }

    pub fn none(span: Span) -> Label {
        Label {
            kind: LabelKind::None,
            span,
        }
    }
}

/// Every infix operator the tree can hold. Several kinds
/// (Compose, PipeBackward, Pow, the set operators, In,
/// Range, RangeInclusive, At) have no spelling in the
/// lexer; the lowerer still handles each of them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    proptest_derive::Arbitrary,
)]
pub enum BinaryOpKind {
    None,
    Apply,
    RevApply,
    Compose,
    PipeForward,
    PipeBackward,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    And,
    Or,
    Xor,
    CompEqual,
    CompNotEqual,
    CompLess,
    CompLessEqual,
    CompGreater,
    CompGreaterEqual,
    Union,
    Intersection,
    Difference,
    In,
    Cons,
    Sum,
    Range,
    RangeInclusive,
    Defun,
    CaseOption,
    As,
    At,
    Assign,
    AssignAdd,
    AssignSub,
    AssignMul,
    AssignDiv,
    AssignRem,
    Constrain,
    ModuleAccess,
}

impl BinaryOpKind {
    /// The operator's display name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        use BinaryOpKind::*;
        match self {
            None => "none",
            Apply => "application",
            RevApply => "reverse application",
            Compose => "composition",
            PipeForward => "pipe forward",
            PipeBackward => "pipe backward",
            Add => "addition",
            Sub => "subtraction",
            Mul => "multiplication",
            Div => "division",
            Rem => "remainder",
            Pow => "exponentiation",
            And => "logical and",
            Or => "logical or",
            Xor => "logical xor",
            CompEqual => "equality",
            CompNotEqual => "inequality",
            CompLess => "less than",
            CompLessEqual => "less than or equal",
            CompGreater => "greater than",
            CompGreaterEqual => "greater than or equal",
            Union => "union",
            Intersection => "intersection",
            Difference => "difference",
            In => "membership",
            Cons => "cons",
            Sum => "sum",
            Range => "range",
            RangeInclusive => "inclusive range",
            Defun => "function definition",
            CaseOption => "case option",
            As => "coercion",
            At => "binding match",
            Assign => "assignment",
            AssignAdd => "add assignment",
            AssignSub => "subtract assignment",
            AssignMul => "multiply assignment",
            AssignDiv => "divide assignment",
            AssignRem => "remainder assignment",
            Constrain => "type constraint",
            ModuleAccess => "module access",
        }
    }
}

/// The surface expression tree. Value, type and pattern
/// contexts all share this one union; `Val` and `Pat`
/// anchor nodes mark where the parser switched context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Sentinel for unparsable expressions; always paired
    /// with a diagnostic.
    None,
    Nil,
    NilType,
    NeverType,
    Bool(bool),
    Int(BigInt),
    Real(BigDecimal),
    String(String),
    Reference(Identifier),
    Bind(Identifier),
    BindIgnore,
    BindSplat,
    Struct(Box<Expr>),
    Group(Box<Expr>),
    Block(Vec<Stmnt>),
    Label { label: Label, body: Box<Expr> },
    Defer { label: Label, body: Box<Expr> },
    Ret { label: Label, body: Box<Expr> },
    Loop(Box<Expr>),
    CaseOf { scrutinee: Box<Expr>, cases: Box<Expr> },
    IfThen { cond: Box<Expr>, then: Box<Expr> },
    BinaryOp {
        op: BinaryOpKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Val(Box<Expr>),
    Pat(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub common: Common,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Expr {
        Expr {
            kind,
            common: Common::new(span),
        }
    }

    pub fn none(span: Span) -> Expr {
        Expr::new(ExprKind::None, span)
    }

    pub fn span(&self) -> Span {
        self.common.span
    }

    /// Builds a binary operation spanning both operands.
    pub fn binary(op: BinaryOpKind, left: Expr, right: Expr) -> Expr {
        let span = Span::combine(&left.span(), &right.span());
        Expr::new(
            ExprKind::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }
}

/// A `use`/`mod` path: one or more identifiers joined by
/// the module-resolution operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub segments: Vec<Identifier>,
    pub span: Span,
}

/// Top-level (and block-level) statements. A thin wrapper
/// around expressions plus the declaration forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmntKind {
    None,
    Expr(Box<Expr>),
    Assign { pat: Box<Expr>, val: Box<Expr> },
    Defer(Box<Expr>),
    Use { path: Path },
    Mod { name: Identifier, stmnts: Vec<Stmnt> },
    TypeDef { name: Identifier, ty: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmnt {
    pub kind: StmntKind,
    pub common: Common,
}

impl Stmnt {
    pub fn new(kind: StmntKind, span: Span) -> Stmnt {
        Stmnt {
            kind,
            common: Common::new(span),
        }
    }

    pub fn span(&self) -> Span {
        self.common.span
    }
}

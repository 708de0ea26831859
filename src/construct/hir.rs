use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::Serialize;

use crate::common::span::Span;

/// Stable identity of a labelled scope. `Ret` and `Defer`
/// sites refer to their target `Label` node through this
/// id rather than a pointer, so the back-reference extends
/// no lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct ScopeId(pub u32);

/// The lowered, label-resolved, applicative core. Infix
/// operators are gone: they are applications of named
/// references. Every node keeps the span of the AST node
/// it was lowered from, for diagnostics only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// Sentinel for expressions that failed to lower;
    /// always paired with a diagnostic.
    None,
    Void,
    VoidType,
    NeverType,
    Int(BigInt),
    Real(BigDecimal),
    Reference(String),
    Apply {
        func: Box<Expr>,
        arg: Box<Expr>,
    },
    Defun {
        pattern: Box<Pat>,
        body: Box<Expr>,
    },
    CaseOf {
        scrutinee: Box<Expr>,
        cases: Vec<CaseOption>,
    },
    Loop(Box<Expr>),
    Label {
        scope: ScopeId,
        body: Box<Expr>,
        /// Deferred tails in textual order of the `defer`
        /// expressions that targeted this scope.
        defers: Vec<Expr>,
    },
    Ret {
        scope: ScopeId,
        body: Box<Expr>,
    },
    Assign {
        pattern: Box<Pat>,
        value: Box<Expr>,
    },
    StructLiteral(Box<Expr>),
    ModuleAccess {
        module: Box<Expr>,
        field: String,
    },
    Group(Box<Expr>),
    Block(Vec<Stmnt>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Expr {
        Expr { kind, span }
    }

    pub fn none(span: Span) -> Expr {
        Expr::new(ExprKind::None, span)
    }

    pub fn void(span: Span) -> Expr {
        Expr::new(ExprKind::Void, span)
    }

    pub fn reference(name: &str, span: Span) -> Expr {
        Expr::new(ExprKind::Reference(name.to_string()), span)
    }

    pub fn int(value: BigInt, span: Span) -> Expr {
        Expr::new(ExprKind::Int(value), span)
    }

    pub fn apply(func: Expr, arg: Expr, span: Span) -> Expr {
        Expr::new(
            ExprKind::Apply {
                func: Box::new(func),
                arg: Box::new(arg),
            },
            span,
        )
    }

    /// Applies a function to two arguments, curried.
    pub fn apply_two(func: Expr, first: Expr, second: Expr, span: Span) -> Expr {
        Expr::apply(Expr::apply(func, first, span), second, span)
    }
}

/// One `pattern => result` arm of a lowered `CaseOf`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOption {
    pub pattern: Pat,
    pub result: Expr,
    pub span: Span,
}

/// Lowered patterns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PatKind {
    None,
    BindIgnore,
    BindSplat,
    Bind(String),
    Apply {
        func: Box<Pat>,
        arg: Box<Pat>,
    },
    Constrain {
        pattern: Box<Pat>,
        ty: Box<Expr>,
    },
    Struct(Box<Pat>),
    /// A value expression used as a literal pattern.
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pat {
    pub kind: PatKind,
    pub span: Span,
}

impl Pat {
    pub fn new(kind: PatKind, span: Span) -> Pat {
        Pat { kind, span }
    }

    pub fn none(span: Span) -> Pat {
        Pat::new(PatKind::None, span)
    }

    pub fn expr(expr: Expr) -> Pat {
        let span = expr.span;
        Pat::new(PatKind::Expr(Box::new(expr)), span)
    }

    pub fn apply(func: Pat, arg: Pat, span: Span) -> Pat {
        Pat::new(
            PatKind::Apply {
                func: Box::new(func),
                arg: Box::new(arg),
            },
            span,
        )
    }
}

/// Statement mirror of the AST's statement wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmntKind {
    None,
    Expr(Expr),
    Assign { pattern: Pat, value: Expr },
    Defer(Expr),
    Use { path: Vec<String> },
    Mod { name: String, stmnts: Vec<Stmnt> },
    TypeDef { name: String, ty: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmnt {
    pub kind: StmntKind,
    pub span: Span,
}

impl Stmnt {
    pub fn new(kind: StmntKind, span: Span) -> Stmnt {
        Stmnt { kind, span }
    }
}

use std::collections::VecDeque;

use num_bigint::BigInt;

use crate::{
    common::{
        diagnostic::{Diagnostic, DiagnosticLogger},
        span::Span,
    },
    construct::{
        ast::{self, BinaryOpKind, ExprKind, IdentifierKind, LabelKind},
        hir::{self, CaseOption, Pat, PatKind, ScopeId, StmntKind},
    },
};

/// One frame per live labelled scope: the label's name,
/// the identity of the `Label` node under construction,
/// and the FIFO of expressions deferred to it.
#[derive(Debug)]
struct LabelFrame {
    name: String,
    scope: ScopeId,
    defers: VecDeque<hir::Expr>,
}

/// The lowerer's dynamic label stack. Scope identities are
/// issued here so that `Ret`/`Defer` sites can refer to
/// their target label without holding a pointer into the
/// tree being built.
#[derive(Debug, Default)]
pub struct LabelStack {
    frames: Vec<LabelFrame>,
    issued: u32,
}

impl LabelStack {
    pub fn new() -> LabelStack {
        LabelStack::default()
    }

    fn fresh_scope(&mut self) -> ScopeId {
        let scope = ScopeId(self.issued);
        self.issued += 1;
        scope
    }

    /// Pushes a frame for `label`. Returns false for the
    /// `None` label sentinel; no error is raised because
    /// one was already given when the label failed to
    /// parse.
    fn push(&mut self, label: &ast::Label, scope: ScopeId) -> bool {
        match &label.kind {
            LabelKind::None => false,
            LabelKind::Name(name) => {
                log::trace!("label stack push `'{}` as {:?}", name, scope);
                self.frames.push(LabelFrame {
                    name: name.clone(),
                    scope,
                    defers: VecDeque::new(),
                });
                true
            },
        }
    }

    /// Pops the top frame, releasing its defers in the
    /// order they were enqueued.
    fn pop(&mut self) -> Vec<hir::Expr> {
        match self.frames.pop() {
            Some(frame) => frame.defers.into_iter().collect(),
            None => vec![],
        }
    }

    /// Finds the innermost frame matching `label`,
    /// reporting an unresolved-label error (with the label
    /// name as a hint) on a miss.
    fn resolve(
        &mut self,
        label: &ast::Label,
        dlogger: &mut DiagnosticLogger,
    ) -> Option<usize> {
        let name = match &label.kind {
            LabelKind::None => return None,
            LabelKind::Name(name) => name,
        };

        for (index, frame) in self.frames.iter().enumerate().rev() {
            if &frame.name == name {
                return Some(index);
            }
        }

        dlogger.append(
            Diagnostic::error(label.span, "could not find label name in scope")
                .with_child(Diagnostic::hint(label.span, name)),
        );
        None
    }

    fn defer_to(&mut self, index: usize, expr: hir::Expr) {
        self.frames[index].defers.push_back(expr);
    }

    fn scope_of(&self, index: usize) -> ScopeId {
        self.frames[index].scope
    }
}

/// The reference name an operator desugars to.
fn reference_name(op: BinaryOpKind) -> &'static str {
    use BinaryOpKind as B;
    match op {
        B::RevApply => ".",
        B::Compose => ">>",
        B::PipeForward => "|>",
        B::PipeBackward => "<|",
        B::Add | B::AssignAdd => "+",
        B::Sub | B::AssignSub => "-",
        B::Mul | B::AssignMul => "*",
        B::Div | B::AssignDiv => "/",
        B::Rem | B::AssignRem => "%",
        B::Pow => "^",
        B::And => "and",
        B::Or => "or",
        B::Xor => "xor",
        B::CompEqual => "==",
        B::CompNotEqual => "/=",
        B::CompLess => "<",
        B::CompLessEqual => "<=",
        B::CompGreater => ">",
        B::CompGreaterEqual => ">=",
        B::Union => "/\\",
        B::Intersection => "\\/",
        B::Difference => "--",
        B::In => "in",
        B::Cons => ",",
        B::Sum => "|",
        B::Range => "..",
        B::RangeInclusive => "..=",
        B::As => "as",
        B::At => "at",
        // the structural operators never reach this table
        B::None
        | B::Apply
        | B::Defun
        | B::CaseOption
        | B::Assign
        | B::Constrain
        | B::ModuleAccess => "",
    }
}

/// `Apply(Apply(Reference(name), left), right)`, the shape
/// every named infix operator lowers to.
fn reference_binop(
    name: &str,
    span: Span,
    left: hir::Expr,
    right: hir::Expr,
) -> hir::Expr {
    hir::Expr::apply_two(hir::Expr::reference(name, span), left, right, span)
}

/// Lowers one statement. The label stack persists across
/// statements only structurally; frames are always
/// balanced within a single call.
pub fn lower_stmnt(
    stmnt: &ast::Stmnt,
    labels: &mut LabelStack,
    dlogger: &mut DiagnosticLogger,
) -> hir::Stmnt {
    let span = stmnt.span();
    let kind = match &stmnt.kind {
        ast::StmntKind::None => StmntKind::None,
        ast::StmntKind::Expr(val) => {
            StmntKind::Expr(lower_expr(val, labels, dlogger))
        },
        ast::StmntKind::Assign { pat, val } => StmntKind::Assign {
            pattern: lower_pat(pat, labels, dlogger),
            value: lower_expr(val, labels, dlogger),
        },
        ast::StmntKind::Defer(val) => {
            StmntKind::Defer(lower_expr(val, labels, dlogger))
        },
        ast::StmntKind::Use { path } => StmntKind::Use {
            path: path
                .segments
                .iter()
                .filter_map(|segment| match &segment.kind {
                    IdentifierKind::Name(name) => Some(name.clone()),
                    IdentifierKind::None => None,
                })
                .collect(),
        },
        ast::StmntKind::Mod { name, stmnts } => StmntKind::Mod {
            name: match &name.kind {
                IdentifierKind::Name(name) => name.clone(),
                IdentifierKind::None => String::new(),
            },
            stmnts: stmnts
                .iter()
                .map(|stmnt| lower_stmnt(stmnt, labels, dlogger))
                .collect(),
        },
        ast::StmntKind::TypeDef { name, ty } => StmntKind::TypeDef {
            name: match &name.kind {
                IdentifierKind::Name(name) => name.clone(),
                IdentifierKind::None => String::new(),
            },
            ty: lower_expr(ty, labels, dlogger),
        },
    };
    hir::Stmnt::new(kind, span)
}

/// Lowers `body`, looking through one `Group` layer: a
/// labelled or deferred `( … )` evaluates its payload.
fn lower_scope_body(
    body: &ast::Expr,
    labels: &mut LabelStack,
    dlogger: &mut DiagnosticLogger,
) -> hir::Expr {
    match &body.kind {
        ExprKind::Group(inner) => lower_expr(inner, labels, dlogger),
        _ => lower_expr(body, labels, dlogger),
    }
}

pub fn lower_expr(
    expr: &ast::Expr,
    labels: &mut LabelStack,
    dlogger: &mut DiagnosticLogger,
) -> hir::Expr {
    let span = expr.span();
    match &expr.kind {
        ExprKind::None => hir::Expr::none(span),
        ExprKind::Nil => hir::Expr::void(span),
        ExprKind::NilType => hir::Expr::new(hir::ExprKind::VoidType, span),
        ExprKind::NeverType => hir::Expr::new(hir::ExprKind::NeverType, span),
        // booleans live in the prelude, not the core
        ExprKind::Bool(value) => {
            hir::Expr::reference(if *value { "true" } else { "false" }, span)
        },
        ExprKind::Int(value) => hir::Expr::int(value.clone(), span),
        ExprKind::Real(value) => {
            hir::Expr::new(hir::ExprKind::Real(value.clone()), span)
        },
        // a string is a cons list of its code points
        ExprKind::String(value) => {
            let mut tail = hir::Expr::void(span);
            for c in value.chars().rev() {
                tail = reference_binop(
                    ",",
                    span,
                    hir::Expr::int(BigInt::from(c as u32), span),
                    tail,
                );
            }
            tail
        },
        ExprKind::Reference(identifier) => match &identifier.kind {
            IdentifierKind::Name(name) => hir::Expr::reference(name, span),
            IdentifierKind::None => hir::Expr::none(span),
        },
        ExprKind::Bind(_) | ExprKind::BindIgnore | ExprKind::BindSplat => {
            dlogger.error(span, "bindings are only valid in a pattern");
            hir::Expr::none(span)
        },
        ExprKind::Struct(body) => hir::Expr::new(
            hir::ExprKind::StructLiteral(Box::new(lower_expr(
                body, labels, dlogger,
            ))),
            span,
        ),
        ExprKind::Group(body) => hir::Expr::new(
            hir::ExprKind::Group(Box::new(lower_expr(body, labels, dlogger))),
            span,
        ),
        ExprKind::Block(stmnts) => hir::Expr::new(
            hir::ExprKind::Block(
                stmnts
                    .iter()
                    .map(|stmnt| lower_stmnt(stmnt, labels, dlogger))
                    .collect(),
            ),
            span,
        ),
        ExprKind::Loop(body) => hir::Expr::new(
            hir::ExprKind::Loop(Box::new(lower_expr(body, labels, dlogger))),
            span,
        ),
        ExprKind::Label { label, body } => {
            let scope = labels.fresh_scope();
            let pushed = labels.push(label, scope);
            let body = lower_scope_body(body, labels, dlogger);
            let defers = if pushed { labels.pop() } else { vec![] };
            hir::Expr::new(
                hir::ExprKind::Label {
                    scope,
                    body: Box::new(body),
                    defers,
                },
                span,
            )
        },
        ExprKind::Ret { label, body } => match labels.resolve(label, dlogger) {
            Some(index) => {
                let scope = labels.scope_of(index);
                let body = lower_expr(body, labels, dlogger);
                hir::Expr::new(
                    hir::ExprKind::Ret {
                        scope,
                        body: Box::new(body),
                    },
                    span,
                )
            },
            None => hir::Expr::none(span),
        },
        ExprKind::Defer { label, body } => {
            match labels.resolve(label, dlogger) {
                Some(index) => {
                    let lowered = lower_scope_body(body, labels, dlogger);
                    labels.defer_to(index, lowered);
                    // the defer site itself evaluates to void
                    hir::Expr::void(span)
                },
                None => hir::Expr::none(span),
            }
        },
        ExprKind::CaseOf { scrutinee, cases } => {
            let scrutinee = lower_expr(scrutinee, labels, dlogger);
            let cases = lower_case_options(cases, labels, dlogger);
            hir::Expr::new(
                hir::ExprKind::CaseOf {
                    scrutinee: Box::new(scrutinee),
                    cases,
                },
                span,
            )
        },
        // no surface form produces IfThen, but the dump
        // and the tests still construct it
        ExprKind::IfThen { cond, then } => {
            let scrutinee = lower_expr(cond, labels, dlogger);
            let result = lower_expr(then, labels, dlogger);
            hir::Expr::new(
                hir::ExprKind::CaseOf {
                    scrutinee: Box::new(scrutinee),
                    cases: vec![CaseOption {
                        pattern: Pat::expr(hir::Expr::reference("true", span)),
                        result,
                        span,
                    }],
                },
                span,
            )
        },
        ExprKind::Val(inner) => lower_expr(inner, labels, dlogger),
        ExprKind::Pat(_) => {
            dlogger.error(span, "pattern anchor is only valid in a pattern");
            hir::Expr::none(span)
        },
        ExprKind::BinaryOp { op, left, right } => {
            lower_binop(span, *op, left, right, labels, dlogger)
        },
    }
}

fn lower_binop(
    span: Span,
    op: BinaryOpKind,
    left: &ast::Expr,
    right: &ast::Expr,
    labels: &mut LabelStack,
    dlogger: &mut DiagnosticLogger,
) -> hir::Expr {
    use BinaryOpKind as B;
    match op {
        B::None => hir::Expr::none(span),
        B::At => {
            dlogger.error(span, "at operator is only valid in a pattern");
            hir::Expr::none(span)
        },
        B::Constrain => {
            dlogger.error(span, "constrain operator is only valid in a pattern");
            hir::Expr::none(span)
        },
        B::CaseOption => {
            dlogger.error(
                span,
                "case option operator is only valid in a case context",
            );
            hir::Expr::none(span)
        },
        B::Defun => hir::Expr::new(
            hir::ExprKind::Defun {
                pattern: Box::new(lower_pat(left, labels, dlogger)),
                body: Box::new(lower_expr(right, labels, dlogger)),
            },
            span,
        ),
        B::Apply => hir::Expr::apply(
            lower_expr(left, labels, dlogger),
            lower_expr(right, labels, dlogger),
            span,
        ),
        B::Assign => hir::Expr::new(
            hir::ExprKind::Assign {
                pattern: Box::new(lower_pat(left, labels, dlogger)),
                value: Box::new(lower_expr(right, labels, dlogger)),
            },
            span,
        ),
        // `l op= r` becomes `l := l op r`
        B::AssignAdd | B::AssignSub | B::AssignMul | B::AssignDiv
        | B::AssignRem => {
            let pattern = lower_pat(left, labels, dlogger);
            let value = reference_binop(
                reference_name(op),
                span,
                lower_expr(left, labels, dlogger),
                lower_expr(right, labels, dlogger),
            );
            hir::Expr::new(
                hir::ExprKind::Assign {
                    pattern: Box::new(pattern),
                    value: Box::new(value),
                },
                span,
            )
        },
        B::ModuleAccess => match &right.kind {
            ExprKind::Reference(identifier) => match &identifier.kind {
                IdentifierKind::Name(name) => hir::Expr::new(
                    hir::ExprKind::ModuleAccess {
                        module: Box::new(lower_expr(left, labels, dlogger)),
                        field: name.clone(),
                    },
                    span,
                ),
                IdentifierKind::None => {
                    dlogger.error(identifier.span, "identifier must be valid");
                    hir::Expr::none(span)
                },
            },
            _ => {
                dlogger.error(right.span(), "expected an identifier");
                hir::Expr::none(span)
            },
        },
        // everything else is an application of a named
        // reference
        op => reference_binop(
            reference_name(op),
            span,
            lower_expr(left, labels, dlogger),
            lower_expr(right, labels, dlogger),
        ),
    }
}

/// Depth-first walk over the case tree with an explicit
/// work stack. Children are pushed right-then-left so the
/// emitted options preserve textual order.
fn lower_case_options(
    cases: &ast::Expr,
    labels: &mut LabelStack,
    dlogger: &mut DiagnosticLogger,
) -> Vec<CaseOption> {
    let mut options = vec![];
    let mut work: Vec<&ast::Expr> = vec![cases];

    while let Some(current) = work.pop() {
        match &current.kind {
            ExprKind::BinaryOp {
                op: BinaryOpKind::Defun,
                left,
                right,
            } => {
                options.push(CaseOption {
                    pattern: lower_pat(left, labels, dlogger),
                    result: lower_expr(right, labels, dlogger),
                    span: current.span(),
                });
            },
            ExprKind::BinaryOp {
                op: BinaryOpKind::CaseOption,
                left,
                right,
            } => {
                work.push(right);
                work.push(left);
            },
            // the parser already reported whatever left
            // this sentinel behind
            ExprKind::None => {},
            _ => {
                dlogger.error(current.span(), "expected a case option");
            },
        }
    }

    options
}

pub fn lower_pat(
    expr: &ast::Expr,
    labels: &mut LabelStack,
    dlogger: &mut DiagnosticLogger,
) -> Pat {
    let span = expr.span();
    match &expr.kind {
        ExprKind::None => Pat::none(span),
        ExprKind::Bind(identifier) => match &identifier.kind {
            IdentifierKind::Name(name) => {
                Pat::new(PatKind::Bind(name.clone()), span)
            },
            IdentifierKind::None => Pat::none(span),
        },
        ExprKind::BindIgnore => Pat::new(PatKind::BindIgnore, span),
        ExprKind::BindSplat => Pat::new(PatKind::BindSplat, span),
        ExprKind::Val(inner) => Pat::expr(lower_expr(inner, labels, dlogger)),
        ExprKind::Pat(inner) => lower_pat(inner, labels, dlogger),
        ExprKind::Group(inner) => lower_pat(inner, labels, dlogger),
        ExprKind::Struct(inner) => Pat::new(
            PatKind::Struct(Box::new(lower_pat(inner, labels, dlogger))),
            span,
        ),
        // literals and references match their value
        ExprKind::Nil
        | ExprKind::NilType
        | ExprKind::NeverType
        | ExprKind::Bool(_)
        | ExprKind::Int(_)
        | ExprKind::Real(_)
        | ExprKind::String(_)
        | ExprKind::Reference(_) => {
            Pat::expr(lower_expr(expr, labels, dlogger))
        },
        ExprKind::BinaryOp { op, left, right } => {
            use BinaryOpKind as B;
            match op {
                B::None => Pat::none(span),
                B::Constrain => Pat::new(
                    PatKind::Constrain {
                        pattern: Box::new(lower_pat(left, labels, dlogger)),
                        ty: Box::new(lower_expr(right, labels, dlogger)),
                    },
                    span,
                ),
                B::Apply => Pat::apply(
                    lower_pat(left, labels, dlogger),
                    lower_pat(right, labels, dlogger),
                    span,
                ),
                B::Defun => {
                    dlogger.error(
                        span,
                        "function definition is not valid in a pattern",
                    );
                    Pat::none(span)
                },
                B::CaseOption => {
                    dlogger.error(
                        span,
                        "case option operator is only valid in a case context",
                    );
                    Pat::none(span)
                },
                B::Assign
                | B::AssignAdd
                | B::AssignSub
                | B::AssignMul
                | B::AssignDiv
                | B::AssignRem => {
                    dlogger.error(span, "assignment is not valid in a pattern");
                    Pat::none(span)
                },
                // a module access pattern matches the value it
                // names
                B::ModuleAccess => {
                    Pat::expr(lower_expr(expr, labels, dlogger))
                },
                op => {
                    let func = Pat::expr(hir::Expr::reference(
                        reference_name(*op),
                        span,
                    ));
                    Pat::apply(
                        Pat::apply(
                            func,
                            lower_pat(left, labels, dlogger),
                            span,
                        ),
                        lower_pat(right, labels, dlogger),
                        span,
                    )
                },
            }
        },
        _ => {
            dlogger.error(span, "expression is not valid in a pattern");
            Pat::none(span)
        },
    }
}

use std::{collections::VecDeque, rc::Rc};

use crate::{
    common::{
        diagnostic::DiagnosticLogger,
        source::Source,
        span::{Span, Spanned},
    },
    compiler::lex::Lexer,
    construct::{
        ast::{
            BinaryOpKind, Expr, ExprKind, Identifier, Label, Path, Stmnt,
            StmntKind,
        },
        token::Token,
    },
};

/// Returns the operator parsed at a given level of the
/// value cascade, if any. Keeping the mapping in one
/// table-like function is what lets a single template
/// drive every level.
fn value_binop(level: u8, token: &Token) -> Option<BinaryOpKind> {
    use BinaryOpKind as B;
    let op = match (level, token) {
        (11, Token::Assign) => B::Assign,
        (11, Token::AssignAdd) => B::AssignAdd,
        (11, Token::AssignSub) => B::AssignSub,
        (11, Token::AssignMul) => B::AssignMul,
        (11, Token::AssignIDiv | Token::AssignFDiv) => B::AssignDiv,
        (11, Token::AssignIRem | Token::AssignFRem) => B::AssignRem,
        (10, Token::Product) => B::Cons,
        (9, Token::Or) => B::Or,
        (9, Token::Xor) => B::Xor,
        (8, Token::And) => B::And,
        (7, Token::CompEqual) => B::CompEqual,
        (7, Token::CompNotEqual) => B::CompNotEqual,
        (7, Token::CompLess) => B::CompLess,
        (7, Token::CompLessEqual) => B::CompLessEqual,
        (7, Token::CompGreater) => B::CompGreater,
        (7, Token::CompGreaterEqual) => B::CompGreaterEqual,
        (6, Token::Add) => B::Add,
        (6, Token::Sub) => B::Sub,
        (5, Token::Mul) => B::Mul,
        (5, Token::IDiv | Token::FDiv) => B::Div,
        (5, Token::IRem | Token::FRem) => B::Rem,
        (4, Token::Pipe) => B::PipeForward,
        _ => return None,
    };
    Some(op)
}

/// Type-expression cascade operators.
fn type_binop(level: u8, token: &Token) -> Option<BinaryOpKind> {
    match (level, token) {
        (3, Token::Product) => Some(BinaryOpKind::Cons),
        (4, Token::Sum) => Some(BinaryOpKind::Sum),
        _ => None,
    }
}

/// Pattern-expression cascade operators.
fn pattern_binop(level: u8, token: &Token) -> Option<BinaryOpKind> {
    match (level, token) {
        (3, Token::Product) => Some(BinaryOpKind::Cons),
        (4, Token::Sum) => Some(BinaryOpKind::Sum),
        (5, Token::And) => Some(BinaryOpKind::And),
        (6, Token::Or) => Some(BinaryOpKind::Or),
        _ => None,
    }
}

/// Whether a token can begin a primary value expression.
/// Used by the postfix level to decide that adjacency
/// means application. Braces are deliberately excluded so
/// `match x { … }` keeps its case braces.
fn starts_value_primary(token: &Token) -> bool {
    matches!(
        token,
        Token::Identifier(_)
            | Token::Int(_)
            | Token::Real(_)
            | Token::Str(_)
            | Token::Bool(_)
            | Token::Nil
            | Token::Never
            | Token::ParenLeft
            | Token::New
            | Token::Fn
    )
}

/// The recursive-descent parser. Owns the lexer and a
/// lookahead queue; exposes a statement iterator. Every
/// failure is reported through the diagnostic channel and
/// recovered locally with a sentinel node, so one broken
/// statement never corrupts the next.
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    /// Lookahead tokens paired with the diagnostics their
    /// speculative lexing produced. Those diagnostics only
    /// reach the live channel when the token is consumed.
    queue: VecDeque<(Spanned<Token>, Vec<crate::common::diagnostic::Diagnostic>)>,
}

impl Parser {
    pub fn new(source: Rc<Source>) -> Parser {
        Parser {
            lexer: Lexer::new(source),
            queue: VecDeque::new(),
        }
    }

    /// Reads one top-level statement, or `None` once only
    /// the end of the source remains.
    pub fn next_stmnt(&mut self, dlogger: &mut DiagnosticLogger) -> Option<Stmnt> {
        loop {
            let token = self.peek();
            match token.item {
                Token::Semicolon => {
                    self.next(dlogger);
                },
                // trailing metadata before EOF: consume it so
                // any deferred lexer diagnostics surface
                Token::Metadata { .. }
                    if self.peek_past_metadata().item == Token::Eof =>
                {
                    self.next(dlogger);
                },
                _ => break,
            }
        }

        if self.peek().item == Token::Eof {
            return None;
        }
        Some(self.parse_stmnt(dlogger))
    }

    // token plumbing

    fn next(&mut self, dlogger: &mut DiagnosticLogger) -> Spanned<Token> {
        match self.queue.pop_front() {
            Some((token, deferred)) => {
                dlogger.extend(deferred);
                token
            },
            None => self.lexer.next(dlogger),
        }
    }

    /// Fills the queue up to depth `n` and returns the
    /// `n`-th token without consuming it.
    fn peek_nth(&mut self, n: usize) -> Spanned<Token> {
        while self.queue.len() < n {
            let mut deferred = DiagnosticLogger::new();
            let token = self.lexer.next(&mut deferred);
            self.queue.push_back((token, deferred.take()));
        }
        self.queue[n - 1].0.clone()
    }

    fn peek(&mut self) -> Spanned<Token> {
        self.peek_nth(1)
    }

    /// The first non-metadata token in lookahead, so the
    /// operator cascade doesn't eat attached docs.
    fn peek_past_metadata(&mut self) -> Spanned<Token> {
        let mut n = 1;
        loop {
            let token = self.peek_nth(n);
            if !token.item.is_metadata() {
                return token;
            }
            n += 1;
        }
    }

    /// Absorbs leading metadata tokens, keeping the text
    /// of significant ones.
    fn eat_metadata(&mut self, dlogger: &mut DiagnosticLogger) -> Vec<String> {
        let mut metadata = vec![];
        while self.peek().item.is_metadata() {
            let token = self.next(dlogger);
            if let Token::Metadata {
                content,
                significant: true,
            } = token.item
            {
                metadata.push(content);
            }
        }
        metadata
    }

    /// Consumes the expected token or reports `message`
    /// without consuming anything.
    fn expect(
        &mut self,
        want: &Token,
        message: &str,
        dlogger: &mut DiagnosticLogger,
    ) -> Option<Spanned<Token>> {
        let token = self.peek();
        if &token.item == want {
            Some(self.next(dlogger))
        } else {
            dlogger.error(token.span, message);
            None
        }
    }

    fn parse_label_literal(
        &mut self,
        message: &str,
        dlogger: &mut DiagnosticLogger,
    ) -> Label {
        let token = self.peek();
        match token.item {
            Token::Label(name) => {
                self.next(dlogger);
                Label::new(&name, token.span)
            },
            _ => {
                dlogger.error(token.span, message);
                Label::none(token.span)
            },
        }
    }

    /// Parses an identifier into a `Reference` expression,
    /// or reports and leaves a sentinel.
    fn parse_reference(
        &mut self,
        message: &str,
        dlogger: &mut DiagnosticLogger,
    ) -> Expr {
        let token = self.peek();
        match token.item {
            Token::Identifier(name) => {
                self.next(dlogger);
                Expr::new(
                    ExprKind::Reference(Identifier::new(&name, token.span)),
                    token.span,
                )
            },
            _ => {
                dlogger.error(token.span, message);
                Expr::none(token.span)
            },
        }
    }

    // statements

    fn parse_stmnt(&mut self, dlogger: &mut DiagnosticLogger) -> Stmnt {
        let metadata = self.eat_metadata(dlogger);
        let token = self.peek();
        let mut stmnt = match token.item {
            Token::Use => self.certain_parse_use(dlogger),
            Token::Mod => self.certain_parse_mod(dlogger),
            Token::Let => self.certain_parse_let(dlogger),
            Token::Type => self.certain_parse_type_def(dlogger),
            Token::Defer => self.certain_parse_defer_stmnt(dlogger),
            _ => {
                let val = self.parse_value_expr(dlogger);
                let span = val.span();
                Stmnt::new(StmntKind::Expr(Box::new(val)), span)
            },
        };
        stmnt.common.metadata = metadata;
        stmnt
    }

    fn parse_path(&mut self, dlogger: &mut DiagnosticLogger) -> Path {
        let token = self.next(dlogger);
        let first = match token.item {
            Token::Identifier(name) => Identifier::new(&name, token.span),
            _ => {
                dlogger.error(token.span, "path expected identifier");
                return Path {
                    segments: vec![Identifier::none(token.span)],
                    span: token.span,
                };
            },
        };

        let mut span = token.span;
        let mut segments = vec![first];
        while self.peek().item == Token::ModResolution {
            self.next(dlogger);
            let token = self.next(dlogger);
            match token.item {
                Token::Identifier(name) => {
                    span = Span::combine(&span, &token.span);
                    segments.push(Identifier::new(&name, token.span));
                },
                _ => {
                    dlogger.error(token.span, "path expected identifier");
                    span = Span::combine(&span, &token.span);
                    segments.push(Identifier::none(token.span));
                    break;
                },
            }
        }

        Path { segments, span }
    }

    fn certain_parse_use(&mut self, dlogger: &mut DiagnosticLogger) -> Stmnt {
        let use_tok = self.next(dlogger);
        let path = self.parse_path(dlogger);
        let span = Span::combine(&use_tok.span, &path.span);
        Stmnt::new(StmntKind::Use { path }, span)
    }

    fn certain_parse_mod(&mut self, dlogger: &mut DiagnosticLogger) -> Stmnt {
        let mod_tok = self.next(dlogger);
        let mut span = mod_tok.span;

        let token = self.peek();
        let name = match token.item {
            Token::Identifier(name) => {
                self.next(dlogger);
                span = Span::combine(&span, &token.span);
                Identifier::new(&name, token.span)
            },
            _ => {
                dlogger.error(token.span, "mod expected identifier");
                Identifier::none(token.span)
            },
        };

        let mut stmnts = vec![];
        if self
            .expect(&Token::BraceLeft, "mod expected left brace", dlogger)
            .is_some()
        {
            loop {
                while self.peek().item == Token::Semicolon {
                    self.next(dlogger);
                }
                let ahead = self.peek_past_metadata();
                match ahead.item {
                    Token::BraceRight => {
                        self.eat_metadata(dlogger);
                        let close = self.next(dlogger);
                        span = Span::combine(&span, &close.span);
                        break;
                    },
                    Token::Eof => {
                        dlogger.error(ahead.span, "mod expected closing brace");
                        span = Span::combine(&span, &ahead.span);
                        break;
                    },
                    _ => stmnts.push(self.parse_stmnt(dlogger)),
                }
            }
        }

        Stmnt::new(StmntKind::Mod { name, stmnts }, span)
    }

    fn certain_parse_let(&mut self, dlogger: &mut DiagnosticLogger) -> Stmnt {
        let let_tok = self.next(dlogger);
        let pat = self.parse_pattern_expr(dlogger);

        let val = match self.expect(&Token::Define, "let expected `:=`", dlogger)
        {
            Some(_) => self.parse_value_expr(dlogger),
            None => Expr::none(self.peek().span),
        };

        let span = Span::combine(&let_tok.span, &val.span());
        Stmnt::new(
            StmntKind::Assign {
                pat: Box::new(pat),
                val: Box::new(val),
            },
            span,
        )
    }

    fn certain_parse_type_def(&mut self, dlogger: &mut DiagnosticLogger) -> Stmnt {
        let type_tok = self.next(dlogger);

        let token = self.peek();
        let name = match token.item {
            Token::Identifier(name) => {
                self.next(dlogger);
                Identifier::new(&name, token.span)
            },
            _ => {
                dlogger.error(token.span, "type declaration expected identifier");
                Identifier::none(token.span)
            },
        };

        let ty = match self.expect(
            &Token::Define,
            "type declaration expected `:=`",
            dlogger,
        ) {
            Some(_) => self.parse_type_expr(dlogger),
            None => Expr::none(self.peek().span),
        };

        let span = Span::combine(&type_tok.span, &ty.span());
        Stmnt::new(
            StmntKind::TypeDef {
                name,
                ty: Box::new(ty),
            },
            span,
        )
    }

    fn certain_parse_defer_stmnt(&mut self, dlogger: &mut DiagnosticLogger) -> Stmnt {
        let expr = self.certain_parse_defer_expr(dlogger);
        let span = expr.span();
        Stmnt::new(StmntKind::Defer(Box::new(expr)), span)
    }

    // value expressions

    pub fn parse_value_expr(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        self.parse_value_level(11, dlogger)
    }

    /// A "term": everything up to and including pipelines,
    /// but below the math and tuple levels. Bodies of
    /// `ret`, `defer`, `loop`, labels, `new` and `match`
    /// scrutinees parse at this level.
    fn parse_value_term(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        self.parse_value_level(4, dlogger)
    }

    /// One template drives levels 4 through 11. The right
    /// operand is parsed at the *same* level, so every
    /// infix operator associates right in source order.
    fn parse_value_level(
        &mut self,
        level: u8,
        dlogger: &mut DiagnosticLogger,
    ) -> Expr {
        if level <= 3 {
            return self.parse_value_prefix(dlogger);
        }

        let left = self.parse_value_level(level - 1, dlogger);
        let ahead = self.peek_past_metadata();
        let op = match value_binop(level, &ahead.item) {
            Some(op) => op,
            None => return left,
        };

        let metadata = self.eat_metadata(dlogger);
        self.next(dlogger); // the operator itself
        let right = self.parse_value_level(level, dlogger);

        let mut expr = Expr::binary(op, left, right);
        expr.common.metadata = metadata;
        expr
    }

    /// Prefix `-`, `+` and `not` become applications of
    /// the `negate`/`posit`/`not` references.
    fn parse_value_prefix(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let ahead = self.peek_past_metadata();
        let name = match ahead.item {
            Token::Sub => "negate",
            Token::Add => "posit",
            Token::Not => "not",
            _ => return self.parse_value_postfix(dlogger),
        };

        let metadata = self.eat_metadata(dlogger);
        let op = self.next(dlogger);
        let operand = self.parse_value_prefix(dlogger);

        let func = Expr::new(
            ExprKind::Reference(Identifier::new(name, op.span)),
            op.span,
        );
        let mut expr = Expr::binary(BinaryOpKind::Apply, func, operand);
        expr.common.metadata = metadata;
        expr
    }

    /// The postfix chain: field access, `as`, postfix
    /// `match`, `&`, `@`, and call-by-adjacency.
    fn parse_value_postfix(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let mut root = self.parse_value_primary(dlogger);

        loop {
            let ahead = self.peek_past_metadata();
            match ahead.item {
                Token::FieldAccess => {
                    let metadata = self.eat_metadata(dlogger);
                    self.next(dlogger);
                    let field = self
                        .parse_reference("expected an identifier after `.`", dlogger);
                    let mut expr = Expr::binary(BinaryOpKind::RevApply, root, field);
                    expr.common.metadata = metadata;
                    root = expr;
                },
                Token::As => {
                    let metadata = self.eat_metadata(dlogger);
                    self.next(dlogger);
                    let ty = self.parse_type_postfix(dlogger);
                    let mut expr = Expr::binary(BinaryOpKind::As, root, ty);
                    expr.common.metadata = metadata;
                    root = expr;
                },
                Token::Match => {
                    let metadata = self.eat_metadata(dlogger);
                    self.next(dlogger);
                    let cases = self.parse_case_options(dlogger);
                    let span = Span::combine(&root.span(), &cases.span());
                    let mut expr = Expr::new(
                        ExprKind::CaseOf {
                            scrutinee: Box::new(root),
                            cases: Box::new(cases),
                        },
                        span,
                    );
                    expr.common.metadata = metadata;
                    root = expr;
                },
                Token::Ref | Token::Deref => {
                    let name =
                        if ahead.item == Token::Ref { "&" } else { "@" };
                    let metadata = self.eat_metadata(dlogger);
                    let op = self.next(dlogger);
                    let func = Expr::new(
                        ExprKind::Reference(Identifier::new(name, op.span)),
                        op.span,
                    );
                    let mut expr = Expr::binary(BinaryOpKind::Apply, func, root);
                    expr.common.metadata = metadata;
                    root = expr;
                },
                Token::ModResolution => {
                    let metadata = self.eat_metadata(dlogger);
                    self.next(dlogger);
                    let field = self
                        .parse_reference("expected an identifier after `/`", dlogger);
                    let mut expr =
                        Expr::binary(BinaryOpKind::ModuleAccess, root, field);
                    expr.common.metadata = metadata;
                    root = expr;
                },
                // adjacency is application, unless the root is a
                // recovery sentinel
                ref token
                    if starts_value_primary(token)
                        && !matches!(root.kind, ExprKind::None) =>
                {
                    let arg = self.parse_value_primary(dlogger);
                    root = Expr::binary(BinaryOpKind::Apply, root, arg);
                },
                _ => break,
            }
        }

        root
    }

    fn parse_value_primary(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let metadata = self.eat_metadata(dlogger);
        let token = self.peek();
        let mut expr = match token.item {
            Token::Int(_)
            | Token::Real(_)
            | Token::Str(_)
            | Token::Bool(_)
            | Token::Nil
            | Token::Never => self.certain_parse_literal(dlogger),
            Token::Identifier(_) => {
                self.parse_reference("expected an identifier", dlogger)
            },
            Token::Underscore => {
                let token = self.next(dlogger);
                Expr::new(ExprKind::BindIgnore, token.span)
            },
            Token::Label(_) => self.certain_parse_label_expr(dlogger),
            Token::Ret => self.certain_parse_ret(dlogger),
            Token::Defer => self.certain_parse_defer_expr(dlogger),
            Token::Loop => self.certain_parse_loop(dlogger),
            Token::Match => self.certain_parse_match(dlogger),
            Token::New => self.certain_parse_new(dlogger),
            Token::Fn => self.certain_parse_fn(dlogger),
            Token::ParenLeft => self.certain_parse_group(dlogger),
            Token::BraceLeft => self.certain_parse_block(dlogger),
            Token::Eof => {
                dlogger.error(
                    token.span,
                    "unexpected end of source, expected an expression",
                );
                Expr::none(token.span)
            },
            item => {
                log::trace!("recovering from unexpected {} at {}", item, token.span);
                dlogger.error(
                    token.span,
                    &format!("expected an expression, found {}", item),
                );
                self.next(dlogger);
                Expr::none(token.span)
            },
        };
        if !metadata.is_empty() {
            expr.common.metadata = metadata;
        }
        expr
    }

    /// Literals shared between the value and pattern
    /// cascades. `never` in value position still denotes
    /// the never type.
    fn certain_parse_literal(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let token = self.next(dlogger);
        let kind = match token.item {
            Token::Int(value) => ExprKind::Int(value),
            Token::Real(value) => ExprKind::Real(value),
            Token::Str(value) => ExprKind::String(value),
            Token::Bool(value) => ExprKind::Bool(value),
            Token::Nil => ExprKind::Nil,
            Token::Never => ExprKind::NeverType,
            _ => ExprKind::None,
        };
        Expr::new(kind, token.span)
    }

    fn certain_parse_label_expr(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let token = self.next(dlogger);
        let label = match token.item {
            Token::Label(name) => Label::new(&name, token.span),
            _ => Label::none(token.span),
        };
        let body = self.parse_value_term(dlogger);
        let span = Span::combine(&token.span, &body.span());
        Expr::new(
            ExprKind::Label {
                label,
                body: Box::new(body),
            },
            span,
        )
    }

    fn certain_parse_ret(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let ret_tok = self.next(dlogger);
        let label = self.parse_label_literal("ret expected label", dlogger);
        let body = self.parse_value_term(dlogger);
        let span = Span::combine(&ret_tok.span, &body.span());
        Expr::new(
            ExprKind::Ret {
                label,
                body: Box::new(body),
            },
            span,
        )
    }

    fn certain_parse_defer_expr(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let defer_tok = self.next(dlogger);
        let label = self.parse_label_literal("defer expected label", dlogger);
        let body = self.parse_value_term(dlogger);
        let span = Span::combine(&defer_tok.span, &body.span());
        Expr::new(
            ExprKind::Defer {
                label,
                body: Box::new(body),
            },
            span,
        )
    }

    fn certain_parse_loop(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let loop_tok = self.next(dlogger);
        let body = self.parse_value_term(dlogger);
        let span = Span::combine(&loop_tok.span, &body.span());
        Expr::new(ExprKind::Loop(Box::new(body)), span)
    }

    fn certain_parse_match(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let match_tok = self.next(dlogger);
        let scrutinee = self.parse_value_term(dlogger);
        let cases = self.parse_case_options(dlogger);
        let span = Span::combine(&match_tok.span, &cases.span());
        Expr::new(
            ExprKind::CaseOf {
                scrutinee: Box::new(scrutinee),
                cases: Box::new(cases),
            },
            span,
        )
    }

    fn certain_parse_new(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let new_tok = self.next(dlogger);
        let body = self.parse_value_term(dlogger);
        let span = Span::combine(&new_tok.span, &body.span());
        Expr::new(ExprKind::Struct(Box::new(body)), span)
    }

    /// `fn (p₁ …) => body`, folded into a right-nested
    /// chain of function definitions with `Pat`-anchored
    /// parameters.
    fn certain_parse_fn(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let fn_tok = self.next(dlogger);

        let mut params = vec![];
        if let Some(open) =
            self.expect(&Token::ParenLeft, "fn expected left parenthesis", dlogger)
        {
            loop {
                let token = self.peek();
                match token.item {
                    Token::ParenRight => {
                        self.next(dlogger);
                        break;
                    },
                    Token::Eof => {
                        dlogger.error(
                            token.span,
                            "fn expected closing parenthesis",
                        );
                        break;
                    },
                    _ => params.push(self.parse_pattern_expr(dlogger)),
                }
            }
            if params.is_empty() {
                // a thunk: its parameter matches the unit value
                params.push(Expr::new(ExprKind::Nil, open.span));
            }
        }

        self.expect(&Token::Arrow, "fn expected `=>`", dlogger);
        let body = self.parse_value_expr(dlogger);

        let mut span = Span::combine(&fn_tok.span, &body.span());
        let mut expr = body;
        for param in params.into_iter().rev() {
            let param_span = param.span();
            let anchored =
                Expr::new(ExprKind::Pat(Box::new(param)), param_span);
            expr = Expr::binary(BinaryOpKind::Defun, anchored, expr);
        }
        span = Span::combine(&span, &expr.span());
        expr.common.span = span;
        expr
    }

    fn certain_parse_group(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let open = self.next(dlogger);

        if self.peek().item == Token::ParenRight {
            let close = self.next(dlogger);
            return Expr::new(
                ExprKind::Nil,
                Span::combine(&open.span, &close.span),
            );
        }

        let inner = self.parse_value_expr(dlogger);
        let close = self.expect(
            &Token::ParenRight,
            "group expected closing parenthesis",
            dlogger,
        );
        let end = close.map(|c| c.span).unwrap_or_else(|| inner.span());
        Expr::new(
            ExprKind::Group(Box::new(inner)),
            Span::combine(&open.span, &end),
        )
    }

    /// `{ stmnt* }`, statements separated by optional
    /// semicolons.
    fn certain_parse_block(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let open = self.next(dlogger);
        let mut span = open.span;
        let mut stmnts = vec![];

        loop {
            while self.peek().item == Token::Semicolon {
                self.next(dlogger);
            }
            let ahead = self.peek_past_metadata();
            match ahead.item {
                Token::BraceRight => {
                    self.eat_metadata(dlogger);
                    let close = self.next(dlogger);
                    span = Span::combine(&span, &close.span);
                    break;
                },
                Token::Eof => {
                    dlogger.error(ahead.span, "block expected closing brace");
                    span = Span::combine(&span, &ahead.span);
                    break;
                },
                _ => stmnts.push(self.parse_stmnt(dlogger)),
            }
        }

        Expr::new(ExprKind::Block(stmnts), span)
    }

    /// The case braces of a `match`: a `|`-led sequence of
    /// `pattern => value` options, folded into a
    /// left-leaning `CaseOption` tree.
    fn parse_case_options(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let token = self.peek();
        if token.item != Token::BraceLeft {
            dlogger.error(token.span, "match expected case options in braces");
            return Expr::none(token.span);
        }
        let open = self.next(dlogger);
        let mut end_span = open.span;
        let mut tree: Option<Expr> = None;

        loop {
            while self.peek().item == Token::Semicolon {
                self.next(dlogger);
            }
            let ahead = self.peek_past_metadata();
            match ahead.item {
                Token::BraceRight => {
                    self.eat_metadata(dlogger);
                    end_span = self.next(dlogger).span;
                    break;
                },
                Token::Eof => {
                    dlogger.error(ahead.span, "match expected closing brace");
                    end_span = ahead.span;
                    break;
                },
                _ => {},
            }

            let metadata = self.eat_metadata(dlogger);
            if self.peek().item == Token::Sum {
                self.next(dlogger);
            } else {
                dlogger.error(self.peek().span, "case option expected `|`");
            }

            let pattern = self.parse_pattern_expr(dlogger);
            if self.peek().item == Token::Arrow {
                self.next(dlogger);
            } else {
                dlogger.error(self.peek().span, "case option expected `=>`");
            }
            let result = self.parse_value_expr(dlogger);

            let mut option = Expr::binary(BinaryOpKind::Defun, pattern, result);
            option.common.metadata = metadata;
            tree = Some(match tree {
                None => option,
                Some(acc) => Expr::binary(BinaryOpKind::CaseOption, acc, option),
            });
        }

        match tree {
            Some(tree) => tree,
            None => {
                let span = Span::combine(&open.span, &end_span);
                dlogger.error(span, "match expected at least one case option");
                Expr::none(span)
            },
        }
    }

    // type expressions

    pub fn parse_type_expr(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        self.parse_type_level(4, dlogger)
    }

    fn parse_type_level(&mut self, level: u8, dlogger: &mut DiagnosticLogger) -> Expr {
        if level <= 2 {
            return self.parse_type_postfix(dlogger);
        }

        let left = self.parse_type_level(level - 1, dlogger);
        let ahead = self.peek_past_metadata();
        let op = match type_binop(level, &ahead.item) {
            Some(op) => op,
            None => return left,
        };

        let metadata = self.eat_metadata(dlogger);
        self.next(dlogger);
        let right = self.parse_type_level(level, dlogger);

        let mut expr = Expr::binary(op, left, right);
        expr.common.metadata = metadata;
        expr
    }

    fn parse_type_postfix(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let mut root = self.parse_type_primary(dlogger);

        loop {
            let ahead = self.peek_past_metadata();
            match ahead.item {
                Token::Ref | Token::Deref => {
                    let name =
                        if ahead.item == Token::Ref { "&" } else { "@" };
                    let metadata = self.eat_metadata(dlogger);
                    let op = self.next(dlogger);
                    let func = Expr::new(
                        ExprKind::Reference(Identifier::new(name, op.span)),
                        op.span,
                    );
                    let mut expr = Expr::binary(BinaryOpKind::Apply, func, root);
                    expr.common.metadata = metadata;
                    root = expr;
                },
                Token::ModResolution => {
                    let metadata = self.eat_metadata(dlogger);
                    self.next(dlogger);
                    let field = self
                        .parse_reference("expected an identifier after `/`", dlogger);
                    let mut expr =
                        Expr::binary(BinaryOpKind::ModuleAccess, root, field);
                    expr.common.metadata = metadata;
                    root = expr;
                },
                _ => break,
            }
        }

        root
    }

    fn parse_type_primary(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let metadata = self.eat_metadata(dlogger);
        let token = self.peek();
        let mut expr = match token.item {
            Token::Identifier(_) => {
                self.parse_reference("expected an identifier", dlogger)
            },
            Token::Nil => {
                let token = self.next(dlogger);
                Expr::new(ExprKind::NilType, token.span)
            },
            Token::Never => {
                let token = self.next(dlogger);
                Expr::new(ExprKind::NeverType, token.span)
            },
            Token::New => self.certain_parse_new(dlogger),
            Token::Fn => self.certain_parse_fn_type(dlogger),
            Token::ParenLeft => self.certain_parse_type_group(dlogger),
            Token::Eof => {
                dlogger.error(
                    token.span,
                    "unexpected end of source, expected a type expression",
                );
                Expr::none(token.span)
            },
            item => {
                dlogger.error(
                    token.span,
                    &format!("expected a type expression, found {}", item),
                );
                self.next(dlogger);
                Expr::none(token.span)
            },
        };
        if !metadata.is_empty() {
            expr.common.metadata = metadata;
        }
        expr
    }

    /// `fn (T₁ …) => R`: a function type is a chain of
    /// definitions from parameter types to the result.
    fn certain_parse_fn_type(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let fn_tok = self.next(dlogger);

        let mut params = vec![];
        if let Some(open) = self.expect(
            &Token::ParenLeft,
            "fn type expected left parenthesis",
            dlogger,
        ) {
            loop {
                let token = self.peek();
                match token.item {
                    Token::ParenRight => {
                        self.next(dlogger);
                        break;
                    },
                    Token::Eof => {
                        dlogger.error(
                            token.span,
                            "fn type expected closing parenthesis",
                        );
                        break;
                    },
                    _ => params.push(self.parse_type_expr(dlogger)),
                }
            }
            if params.is_empty() {
                params.push(Expr::new(ExprKind::NilType, open.span));
            }
        }

        self.expect(&Token::Arrow, "fn type expected `=>`", dlogger);
        let result = self.parse_type_expr(dlogger);

        let mut span = Span::combine(&fn_tok.span, &result.span());
        let mut expr = result;
        for param in params.into_iter().rev() {
            expr = Expr::binary(BinaryOpKind::Defun, param, expr);
        }
        span = Span::combine(&span, &expr.span());
        expr.common.span = span;
        expr
    }

    fn certain_parse_type_group(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let open = self.next(dlogger);

        if self.peek().item == Token::ParenRight {
            let close = self.next(dlogger);
            return Expr::new(
                ExprKind::NilType,
                Span::combine(&open.span, &close.span),
            );
        }

        let inner = self.parse_type_expr(dlogger);
        let close = self.expect(
            &Token::ParenRight,
            "type group expected closing parenthesis",
            dlogger,
        );
        let end = close.map(|c| c.span).unwrap_or_else(|| inner.span());
        Expr::new(
            ExprKind::Group(Box::new(inner)),
            Span::combine(&open.span, &end),
        )
    }

    // pattern expressions

    pub fn parse_pattern_expr(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        self.parse_pattern_level(6, dlogger)
    }

    fn parse_pattern_level(
        &mut self,
        level: u8,
        dlogger: &mut DiagnosticLogger,
    ) -> Expr {
        if level <= 2 {
            return self.parse_pattern_prefix(dlogger);
        }

        let left = self.parse_pattern_level(level - 1, dlogger);
        let ahead = self.peek_past_metadata();
        let op = match pattern_binop(level, &ahead.item) {
            Some(op) => op,
            None => return left,
        };

        let metadata = self.eat_metadata(dlogger);
        self.next(dlogger);
        let right = self.parse_pattern_level(level, dlogger);

        let mut expr = Expr::binary(op, left, right);
        expr.common.metadata = metadata;
        expr
    }

    fn parse_pattern_prefix(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let ahead = self.peek_past_metadata();
        if ahead.item != Token::Not {
            return self.parse_pattern_primary(dlogger);
        }

        let metadata = self.eat_metadata(dlogger);
        let op = self.next(dlogger);
        let operand = self.parse_pattern_prefix(dlogger);

        let func = Expr::new(
            ExprKind::Reference(Identifier::new("not", op.span)),
            op.span,
        );
        let mut expr = Expr::binary(BinaryOpKind::Apply, func, operand);
        expr.common.metadata = metadata;
        expr
    }

    fn parse_pattern_primary(&mut self, dlogger: &mut DiagnosticLogger) -> Expr {
        let metadata = self.eat_metadata(dlogger);
        let token = self.peek();
        let mut expr = match token.item {
            Token::Identifier(name) => {
                self.next(dlogger);
                let bind = Expr::new(
                    ExprKind::Bind(Identifier::new(&name, token.span)),
                    token.span,
                );
                // an optional type restriction
                if self.peek().item == Token::Constrain {
                    self.next(dlogger);
                    let ty = self.parse_type_postfix(dlogger);
                    Expr::binary(BinaryOpKind::Constrain, bind, ty)
                } else {
                    bind
                }
            },
            Token::Underscore => {
                let token = self.next(dlogger);
                Expr::new(ExprKind::BindIgnore, token.span)
            },
            Token::Range => {
                let token = self.next(dlogger);
                Expr::new(ExprKind::BindSplat, token.span)
            },
            Token::New => {
                let new_tok = self.next(dlogger);
                let body = self.parse_pattern_primary(dlogger);
                let span = Span::combine(&new_tok.span, &body.span());
                Expr::new(ExprKind::Struct(Box::new(body)), span)
            },
            Token::ParenLeft => {
                let open = self.next(dlogger);
                if self.peek().item == Token::ParenRight {
                    let close = self.next(dlogger);
                    let span = Span::combine(&open.span, &close.span);
                    let nil = Expr::new(ExprKind::Nil, span);
                    Expr::new(ExprKind::Val(Box::new(nil)), span)
                } else {
                    let inner = self.parse_pattern_expr(dlogger);
                    let close = self.expect(
                        &Token::ParenRight,
                        "pattern group expected closing parenthesis",
                        dlogger,
                    );
                    let end =
                        close.map(|c| c.span).unwrap_or_else(|| inner.span());
                    Expr::new(
                        ExprKind::Group(Box::new(inner)),
                        Span::combine(&open.span, &end),
                    )
                }
            },
            Token::CompEqual
            | Token::CompNotEqual
            | Token::CompLess
            | Token::CompLessEqual
            | Token::CompGreater
            | Token::CompGreaterEqual => {
                let op_tok = self.next(dlogger);
                let op = match op_tok.item {
                    Token::CompEqual => BinaryOpKind::CompEqual,
                    Token::CompNotEqual => BinaryOpKind::CompNotEqual,
                    Token::CompLess => BinaryOpKind::CompLess,
                    Token::CompLessEqual => BinaryOpKind::CompLessEqual,
                    Token::CompGreater => BinaryOpKind::CompGreater,
                    _ => BinaryOpKind::CompGreaterEqual,
                };
                let ignore = Expr::new(ExprKind::BindIgnore, op_tok.span);
                let term = self.parse_value_term(dlogger);
                let term_span = term.span();
                let val =
                    Expr::new(ExprKind::Val(Box::new(term)), term_span);
                Expr::binary(op, ignore, val)
            },
            Token::Int(_)
            | Token::Real(_)
            | Token::Str(_)
            | Token::Bool(_)
            | Token::Nil => {
                let lit = self.certain_parse_literal(dlogger);
                let span = lit.span();
                Expr::new(ExprKind::Val(Box::new(lit)), span)
            },
            Token::Eof => {
                dlogger.error(
                    token.span,
                    "unexpected end of source, expected a pattern",
                );
                Expr::none(token.span)
            },
            item => {
                dlogger.error(
                    token.span,
                    &format!("expected a pattern, found {}", item),
                );
                self.next(dlogger);
                Expr::none(token.span)
            },
        };
        if !metadata.is_empty() {
            expr.common.metadata = metadata;
        }
        expr
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigInt;

    use super::*;
    use crate::construct::ast::IdentifierKind;

    fn parse_all(source: &str) -> (Vec<Stmnt>, DiagnosticLogger) {
        let mut dlogger = DiagnosticLogger::new();
        let mut parser = Parser::new(Source::source(source));
        let mut stmnts = vec![];
        while let Some(stmnt) = parser.next_stmnt(&mut dlogger) {
            stmnts.push(stmnt);
        }
        (stmnts, dlogger)
    }

    fn int(value: i64) -> ExprKind {
        ExprKind::Int(BigInt::from(value))
    }

    fn name_of(identifier: &Identifier) -> &str {
        match &identifier.kind {
            IdentifierKind::Name(name) => name,
            IdentifierKind::None => panic!("expected a named identifier"),
        }
    }

    #[test]
    fn empty_input_has_no_statements_and_no_diagnostics() {
        let (stmnts, dlogger) = parse_all("");
        assert!(stmnts.is_empty());
        assert!(dlogger.is_empty());
    }

    #[test]
    fn let_statement_shape() {
        // S1
        let (stmnts, dlogger) = parse_all("let x := 1 + 2");
        assert!(dlogger.is_empty());
        assert_eq!(stmnts.len(), 1);

        let (pat, val) = match &stmnts[0].kind {
            StmntKind::Assign { pat, val } => (pat, val),
            other => panic!("expected an assign statement, got {:?}", other),
        };
        match &pat.kind {
            ExprKind::Bind(identifier) => assert_eq!(name_of(identifier), "x"),
            other => panic!("expected a bind pattern, got {:?}", other),
        }
        match &val.kind {
            ExprKind::BinaryOp { op, left, right } => {
                assert_eq!(*op, BinaryOpKind::Add);
                assert_eq!(left.kind, int(1));
                assert_eq!(right.kind, int(2));
            },
            other => panic!("expected a binary op, got {:?}", other),
        }
    }

    #[test]
    fn infix_operators_associate_right() {
        // fidelity with the precedence cascade: the right
        // operand parses at the same level
        let (stmnts, _) = parse_all("1 - 2 - 3");
        let val = match &stmnts[0].kind {
            StmntKind::Expr(val) => val,
            other => panic!("expected an expression statement, got {:?}", other),
        };
        match &val.kind {
            ExprKind::BinaryOp { op, left, right } => {
                assert_eq!(*op, BinaryOpKind::Sub);
                assert_eq!(left.kind, int(1));
                match &right.kind {
                    ExprKind::BinaryOp { op, left, right } => {
                        assert_eq!(*op, BinaryOpKind::Sub);
                        assert_eq!(left.kind, int(2));
                        assert_eq!(right.kind, int(3));
                    },
                    other => panic!("expected nested sub, got {:?}", other),
                }
            },
            other => panic!("expected a binary op, got {:?}", other),
        }
    }

    #[test]
    fn adjacency_is_application() {
        let (stmnts, dlogger) = parse_all("(print 1)");
        assert!(dlogger.is_empty());
        let val = match &stmnts[0].kind {
            StmntKind::Expr(val) => val,
            other => panic!("expected an expression statement, got {:?}", other),
        };
        let inner = match &val.kind {
            ExprKind::Group(inner) => inner,
            other => panic!("expected a group, got {:?}", other),
        };
        match &inner.kind {
            ExprKind::BinaryOp { op, left, right } => {
                assert_eq!(*op, BinaryOpKind::Apply);
                assert!(matches!(left.kind, ExprKind::Reference(_)));
                assert_eq!(right.kind, int(1));
            },
            other => panic!("expected an application, got {:?}", other),
        }
    }

    #[test]
    fn peeking_does_not_leak_diagnostics() {
        let mut dlogger = DiagnosticLogger::new();
        let mut parser = Parser::new(Source::source("0b2"));

        // peeking lexes the bad literal, but its diagnostic
        // stays deferred
        let token = parser.peek();
        assert!(matches!(token.item, Token::Int(_)));
        assert!(dlogger.is_empty());

        // consuming the token commits the diagnostic
        parser.next(&mut dlogger);
        assert_eq!(dlogger.len(), 1);
    }

    #[test]
    fn significant_metadata_attaches_to_the_next_node() {
        let (stmnts, _) = parse_all("$doc x");
        assert_eq!(stmnts[0].common.metadata, vec!["doc".to_string()]);

        let (stmnts, _) = parse_all("#{hidden}# x");
        assert!(stmnts[0].common.metadata.is_empty());
    }

    #[test]
    fn metadata_does_not_block_operators() {
        let (stmnts, dlogger) = parse_all("1 ${note}$ + 2");
        assert!(dlogger.is_empty());
        assert_eq!(stmnts.len(), 1);
        let val = match &stmnts[0].kind {
            StmntKind::Expr(val) => val,
            other => panic!("expected an expression statement, got {:?}", other),
        };
        match &val.kind {
            ExprKind::BinaryOp { op, .. } => {
                assert_eq!(*op, BinaryOpKind::Add);
            },
            other => panic!("expected a binary op, got {:?}", other),
        }
        assert_eq!(val.common.metadata, vec!["note".to_string()]);
    }

    #[test]
    fn semicolons_separate_statements() {
        let (stmnts, dlogger) = parse_all("1; 2");
        assert!(dlogger.is_empty());
        assert_eq!(stmnts.len(), 2);
    }

    #[test]
    fn blocks_hold_statements() {
        let (stmnts, dlogger) = parse_all("{ 1; 2 }");
        assert!(dlogger.is_empty());
        let val = match &stmnts[0].kind {
            StmntKind::Expr(val) => val,
            other => panic!("expected an expression statement, got {:?}", other),
        };
        match &val.kind {
            ExprKind::Block(inner) => assert_eq!(inner.len(), 2),
            other => panic!("expected a block, got {:?}", other),
        }
    }

    #[test]
    fn match_builds_a_case_tree() {
        let (stmnts, dlogger) = parse_all("match x { | 0 => a | _ => b }");
        assert!(dlogger.is_empty());
        let val = match &stmnts[0].kind {
            StmntKind::Expr(val) => val,
            other => panic!("expected an expression statement, got {:?}", other),
        };
        let cases = match &val.kind {
            ExprKind::CaseOf { cases, .. } => cases,
            other => panic!("expected a case-of, got {:?}", other),
        };
        match &cases.kind {
            ExprKind::BinaryOp { op, left, right } => {
                assert_eq!(*op, BinaryOpKind::CaseOption);
                assert!(matches!(
                    left.kind,
                    ExprKind::BinaryOp { op: BinaryOpKind::Defun, .. }
                ));
                assert!(matches!(
                    right.kind,
                    ExprKind::BinaryOp { op: BinaryOpKind::Defun, .. }
                ));
            },
            other => panic!("expected a case option tree, got {:?}", other),
        }
    }

    #[test]
    fn missing_define_leaves_a_sentinel() {
        let (stmnts, dlogger) = parse_all("let 1\nx");
        assert_eq!(stmnts.len(), 2);
        assert!(dlogger.has_errors());
        match &stmnts[0].kind {
            StmntKind::Assign { val, .. } => {
                assert_eq!(val.kind, ExprKind::None);
            },
            other => panic!("expected an assign statement, got {:?}", other),
        }
        // recovery: the next statement is intact
        assert!(matches!(stmnts[1].kind, StmntKind::Expr(_)));
    }

    #[test]
    fn use_paths() {
        let (stmnts, dlogger) = parse_all("use std/io");
        assert!(dlogger.is_empty());
        match &stmnts[0].kind {
            StmntKind::Use { path } => {
                let names: Vec<&str> =
                    path.segments.iter().map(name_of).collect();
                assert_eq!(names, vec!["std", "io"]);
            },
            other => panic!("expected a use statement, got {:?}", other),
        }
    }

    #[test]
    fn mod_statement_nests() {
        let (stmnts, dlogger) = parse_all("mod m { let a := 1 }");
        assert!(dlogger.is_empty());
        match &stmnts[0].kind {
            StmntKind::Mod { name, stmnts } => {
                assert_eq!(name_of(name), "m");
                assert_eq!(stmnts.len(), 1);
            },
            other => panic!("expected a mod statement, got {:?}", other),
        }
    }

    #[test]
    fn type_definition() {
        let (stmnts, dlogger) = parse_all("type T := nil");
        assert!(dlogger.is_empty());
        match &stmnts[0].kind {
            StmntKind::TypeDef { name, ty } => {
                assert_eq!(name_of(name), "T");
                assert_eq!(ty.kind, ExprKind::NilType);
            },
            other => panic!("expected a type definition, got {:?}", other),
        }
    }

    #[test]
    fn type_union_and_tuple() {
        let (stmnts, dlogger) = parse_all("type T := a, b | c");
        assert!(dlogger.is_empty());
        let ty = match &stmnts[0].kind {
            StmntKind::TypeDef { ty, .. } => ty,
            other => panic!("expected a type definition, got {:?}", other),
        };
        // `,` binds tighter than `|`
        match &ty.kind {
            ExprKind::BinaryOp { op, left, .. } => {
                assert_eq!(*op, BinaryOpKind::Sum);
                assert!(matches!(
                    left.kind,
                    ExprKind::BinaryOp { op: BinaryOpKind::Cons, .. }
                ));
            },
            other => panic!("expected a union, got {:?}", other),
        }
    }

    #[test]
    fn pattern_type_restriction() {
        let (stmnts, dlogger) = parse_all("let x: T := 1");
        assert!(dlogger.is_empty());
        match &stmnts[0].kind {
            StmntKind::Assign { pat, .. } => match &pat.kind {
                ExprKind::BinaryOp { op, left, right } => {
                    assert_eq!(*op, BinaryOpKind::Constrain);
                    assert!(matches!(left.kind, ExprKind::Bind(_)));
                    assert!(matches!(right.kind, ExprKind::Reference(_)));
                },
                other => panic!("expected a constrain pattern, got {:?}", other),
            },
            other => panic!("expected an assign statement, got {:?}", other),
        }
    }

    #[test]
    fn comparison_restriction_pattern() {
        let (stmnts, _) = parse_all("let == 3 := y");
        match &stmnts[0].kind {
            StmntKind::Assign { pat, .. } => match &pat.kind {
                ExprKind::BinaryOp { op, left, right } => {
                    assert_eq!(*op, BinaryOpKind::CompEqual);
                    assert!(matches!(left.kind, ExprKind::BindIgnore));
                    assert!(matches!(right.kind, ExprKind::Val(_)));
                },
                other => panic!("expected a restriction, got {:?}", other),
            },
            other => panic!("expected an assign statement, got {:?}", other),
        }
    }

    #[test]
    fn fn_value_parses_to_defun_chain() {
        let (stmnts, dlogger) = parse_all("fn (a) => a");
        assert!(dlogger.is_empty());
        let val = match &stmnts[0].kind {
            StmntKind::Expr(val) => val,
            other => panic!("expected an expression statement, got {:?}", other),
        };
        match &val.kind {
            ExprKind::BinaryOp { op, left, .. } => {
                assert_eq!(*op, BinaryOpKind::Defun);
                assert!(matches!(left.kind, ExprKind::Pat(_)));
            },
            other => panic!("expected a defun, got {:?}", other),
        }
    }

    #[test]
    fn unexpected_token_recovers_with_sentinel() {
        let (stmnts, dlogger) = parse_all("=\n1");
        assert_eq!(stmnts.len(), 2);
        assert!(dlogger.has_errors());
        match &stmnts[0].kind {
            StmntKind::Expr(val) => assert_eq!(val.kind, ExprKind::None),
            other => panic!("expected an expression statement, got {:?}", other),
        }
    }

    #[test]
    fn postfix_field_access_is_reverse_application() {
        let (stmnts, dlogger) = parse_all("x.y");
        assert!(dlogger.is_empty());
        let val = match &stmnts[0].kind {
            StmntKind::Expr(val) => val,
            other => panic!("expected an expression statement, got {:?}", other),
        };
        assert!(matches!(
            val.kind,
            ExprKind::BinaryOp { op: BinaryOpKind::RevApply, .. }
        ));
    }

    #[test]
    fn spans_nest() {
        fn check(expr: &Expr) {
            let span = expr.span();
            match &expr.kind {
                ExprKind::BinaryOp { left, right, .. } => {
                    assert!(span.contains(&left.span()));
                    assert!(span.contains(&right.span()));
                    check(left);
                    check(right);
                },
                ExprKind::Group(inner) | ExprKind::Struct(inner) => {
                    assert!(span.contains(&inner.span()));
                    check(inner);
                },
                _ => {},
            }
        }

        let (stmnts, _) = parse_all("let x := (1 + 2) * 3");
        if let StmntKind::Assign { val, .. } = &stmnts[0].kind {
            check(val);
        } else {
            panic!("expected an assign statement");
        }
    }
}

use std::rc::Rc;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint, Sign};

use crate::{
    common::{
        diagnostic::{Diagnostic, DiagnosticLogger},
        reader::Reader,
        source::Source,
        span::{Position, Span, Spanned},
    },
    construct::token::Token,
};

fn is_alpha(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

fn is_word_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_hex(byte: u8) -> bool {
    byte.is_ascii_hexdigit()
}

fn hex_value(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        _ => byte - b'A' + 10,
    }
}

/// The streaming lexer. One token per `next` call; every
/// anomaly produces a diagnostic plus a token (often
/// `Token::None`) and the stream advances by at least one
/// byte, so callers can always make progress.
#[derive(Debug)]
pub struct Lexer {
    reader: Reader,
}

impl Lexer {
    pub fn new(source: Rc<Source>) -> Lexer {
        Lexer {
            reader: Reader::new(source),
        }
    }

    /// Lexes the next token. Returns `Eof` (repeatedly) at
    /// the end of the source.
    pub fn next(&mut self, dlogger: &mut DiagnosticLogger) -> Spanned<Token> {
        self.strip();

        let start = self.reader.position();
        let c = match self.reader.peek(1) {
            Some(c) => c,
            None => return Spanned::new(Token::Eof, Span::point(start)),
        };

        if is_alpha(c) {
            return self.lex_word();
        }
        if is_digit(c) {
            return self.lex_number(dlogger);
        }

        match c {
            b'\'' => self.lex_label_or_char(),
            b'"' => self.lex_string(dlogger),
            b'#' => self.lex_metadata(false, dlogger),
            b'$' => self.lex_metadata(true, dlogger),
            b'_' => {
                if self.reader.peek(2).is_some_and(is_word_continue) {
                    self.lex_word()
                } else {
                    self.reader.skip();
                    self.spanned(Token::Underscore, start)
                }
            },
            b'+' | b'-' if self.reader.peek(2).is_some_and(is_digit) => {
                self.lex_number(dlogger)
            },
            _ => self.lex_punctuation(dlogger),
        }
    }

    fn spanned(&self, token: Token, start: Position) -> Spanned<Token> {
        Spanned::new(token, Span::new(start, self.reader.position()))
    }

    /// Consumes `len` bytes and wraps up `token`.
    fn take(&mut self, len: usize, token: Token, start: Position) -> Spanned<Token> {
        for _ in 0..len {
            self.reader.skip();
        }
        self.spanned(token, start)
    }

    fn strip(&mut self) {
        while let Some(c) = self.reader.peek(1) {
            if c.is_ascii_whitespace() {
                self.reader.skip();
            } else {
                break;
            }
        }
    }

    /// Accumulates `[A-Za-z0-9_]+` and classifies it:
    /// keyword, boolean, `nil`/`never`, or identifier.
    fn lex_word(&mut self) -> Spanned<Token> {
        let start = self.reader.position();
        let mut word = Vec::new();

        while let Some(c) = self.reader.peek(1) {
            if is_word_continue(c) {
                word.push(c);
                self.reader.skip();
            } else {
                break;
            }
        }

        let word = String::from_utf8_lossy(&word).into_owned();
        let token = match word.as_str() {
            "_" => Token::Underscore,
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            "nil" => Token::Nil,
            "never" => Token::Never,
            "loop" => Token::Loop,
            "match" => Token::Match,
            "new" => Token::New,
            "def" => Token::Def,
            "ret" => Token::Ret,
            "defer" => Token::Defer,
            "fn" => Token::Fn,
            "has" => Token::Has,
            "let" => Token::Let,
            "type" => Token::Type,
            "mod" => Token::Mod,
            "use" => Token::Use,
            "and" => Token::And,
            "or" => Token::Or,
            "xor" => Token::Xor,
            "not" => Token::Not,
            "as" => Token::As,
            _ => Token::Identifier(word),
        };

        self.spanned(token, start)
    }

    /// Integer-part accumulation: read hex-capable bytes,
    /// skip `_`, substitute `radix - 1` for digits that
    /// exceed the radix (with a diagnostic).
    fn lex_number_base(
        &mut self,
        radix: u8,
        dlogger: &mut DiagnosticLogger,
    ) -> BigUint {
        let mut value = BigUint::from(0u32);

        while let Some(c) = self.reader.peek(1) {
            if c == b'_' {
                self.reader.skip();
                continue;
            }
            if !is_hex(c) {
                break;
            }

            let mut digit = hex_value(c);
            if digit >= radix {
                dlogger.error(
                    self.reader.peek_span(),
                    "num literal char value exceeds radix",
                );
                digit = radix - 1;
            }

            value = value * u32::from(radix) + u32::from(digit);
            self.reader.skip();
        }

        value
    }

    /// Fractional-part accumulation in `BigDecimal`: keep
    /// a running place value, divide it by the radix per
    /// digit, and strip trailing zeros as we go. Exact for
    /// every supported radix since 2, 8, 10 and 16 all
    /// divide powers of ten.
    fn lex_number_fractional(
        &mut self,
        radix: u8,
        base: BigUint,
        dlogger: &mut DiagnosticLogger,
    ) -> BigDecimal {
        let mut value = BigDecimal::from(BigInt::from(base));
        let mut place = BigDecimal::from(1i64);
        let radix_value = BigDecimal::from(i64::from(radix));

        while let Some(c) = self.reader.peek(1) {
            if c == b'_' {
                self.reader.skip();
                continue;
            }
            if !is_hex(c) {
                break;
            }

            let mut digit = hex_value(c);
            if digit >= radix {
                dlogger.error(
                    self.reader.peek_span(),
                    "num literal char value exceeds radix",
                );
                digit = 0;
            }

            place = &place / &radix_value;
            value = (&value + &place * BigDecimal::from(i64::from(digit)))
                .normalized();
            self.reader.skip();
        }

        value
    }

    /// Call this right before the first digit (or sign) of
    /// a numeric literal. Handles the `0b`/`0o`/`0d`/`0x`
    /// radix codes and an optional fractional part.
    fn lex_number(&mut self, dlogger: &mut DiagnosticLogger) -> Spanned<Token> {
        let start = self.reader.position();

        // leading sign
        let mut negative = false;
        match self.reader.peek(1) {
            Some(b'+') => self.reader.skip(),
            Some(b'-') => {
                negative = true;
                self.reader.skip();
            },
            _ => {},
        }

        let mut radix = 10u8;
        if self.reader.peek(1) == Some(b'0') {
            if let Some(code) = self.reader.peek(2) {
                let prefixed = match code {
                    b'b' => {
                        radix = 2;
                        true
                    },
                    b'o' => {
                        radix = 8;
                        true
                    },
                    b'd' => {
                        radix = 10;
                        true
                    },
                    b'x' => {
                        radix = 16;
                        true
                    },
                    // an unknown radix code; consume it and fall
                    // back to decimal
                    c if is_alpha(c) => {
                        self.reader.skip();
                        self.reader.skip();
                        dlogger.error(
                            Span::new(start, self.reader.position()),
                            "num literal unrecognized radix code",
                        );
                        false
                    },
                    // a decimal literal with a leading zero
                    _ => false,
                };
                if prefixed {
                    self.reader.skip();
                    self.reader.skip();
                }
            }
        }

        let base = self.lex_number_base(radix, dlogger);

        let fractional = self.reader.peek(1) == Some(b'.');
        if fractional {
            self.reader.skip();
            let mut value = self.lex_number_fractional(radix, base, dlogger);
            if negative {
                value = -value;
            }
            self.spanned(Token::Real(value), start)
        } else {
            let sign = if negative { Sign::Minus } else { Sign::Plus };
            let value = BigInt::from_biguint(sign, base);
            self.spanned(Token::Int(value), start)
        }
    }

    /// `'name` is a label; `'c'` (one byte or a simple
    /// escape, then a closing quote) is a character
    /// literal, which carries its code point as an `Int`
    /// token since the core has no character type.
    fn lex_label_or_char(&mut self) -> Spanned<Token> {
        let start = self.reader.position();
        // skip the quote
        self.reader.skip();

        let c2 = self.reader.peek(1);
        let c3 = self.reader.peek(2);
        let c4 = self.reader.peek(3);

        if let (Some(b'\\'), Some(escape), Some(b'\'')) = (c2, c3, c4) {
            let decoded = match escape {
                b'n' => Some('\n'),
                b'r' => Some('\r'),
                b't' => Some('\t'),
                b'0' => Some('\0'),
                b'\\' => Some('\\'),
                b'\'' => Some('\''),
                _ => None,
            };
            if let Some(decoded) = decoded {
                self.reader.skip();
                self.reader.skip();
                self.reader.skip();
                return self
                    .spanned(Token::Int(BigInt::from(decoded as u32)), start);
            }
        } else if let (Some(byte), Some(b'\'')) = (c2, c3) {
            if byte != b'\'' && byte != b'\\' {
                self.reader.skip();
                self.reader.skip();
                return self.spanned(Token::Int(BigInt::from(byte as u32)), start);
            }
        }

        let mut name = Vec::new();
        while let Some(c) = self.reader.peek(1) {
            if is_word_continue(c) {
                name.push(c);
                self.reader.skip();
            } else {
                break;
            }
        }

        let name = String::from_utf8_lossy(&name).into_owned();
        self.spanned(Token::Label(name), start)
    }

    /// Byte-by-byte checked copy of a string literal.
    /// States: text, backslash, unicode. EOF in any state
    /// yields a `None` token spanning the opening quote
    /// through the end of the source.
    fn lex_string(&mut self, dlogger: &mut DiagnosticLogger) -> Spanned<Token> {
        let start = self.reader.position();
        // skip the opening quote
        self.reader.skip();

        let mut data: Vec<u8> = Vec::new();

        loop {
            let c = match self.reader.next() {
                Some(c) => c,
                None => {
                    let span = Span::new(start, self.reader.position());
                    dlogger.error(
                        span,
                        "unexpected EOF, expected closing double quote",
                    );
                    return Spanned::new(Token::None, span);
                },
            };

            match c {
                b'"' => break,
                b'\\' => {
                    let escape_start = self.reader.position();
                    let e = match self.reader.next() {
                        Some(e) => e,
                        None => {
                            let span = Span::new(start, self.reader.position());
                            dlogger.error(
                                span,
                                "unexpected EOF, expected closing double quote",
                            );
                            return Spanned::new(Token::None, span);
                        },
                    };
                    match e {
                        b'n' => data.push(b'\n'),
                        b'r' => data.push(b'\r'),
                        b't' => data.push(b'\t'),
                        b'b' => data.push(0x08),
                        b'f' => data.push(0x0c),
                        b'\\' => data.push(b'\\'),
                        b'"' => data.push(b'"'),
                        b'/' => data.push(b'/'),
                        b'u' => {
                            if let Some(token) = self.lex_string_unicode(
                                start,
                                escape_start,
                                &mut data,
                                dlogger,
                            ) {
                                return token;
                            }
                        },
                        _ => {
                            dlogger.error(
                                Span::new(escape_start, self.reader.position()),
                                "invalid control char after backslash",
                            );
                        },
                    }
                },
                c => data.push(c),
            }
        }

        let text = String::from_utf8_lossy(&data).into_owned();
        self.spanned(Token::Str(text), start)
    }

    /// The unicode state of the string machine: expects
    /// `{`, hex digits, `}`; appends the scalar encoded as
    /// UTF-8. Returns a token only on EOF, which ends the
    /// whole literal.
    fn lex_string_unicode(
        &mut self,
        literal_start: Position,
        escape_start: Position,
        data: &mut Vec<u8>,
        dlogger: &mut DiagnosticLogger,
    ) -> Option<Spanned<Token>> {
        if self.reader.peek(1) != Some(b'{') {
            dlogger.error(
                Span::new(escape_start, self.reader.position()),
                "invalid unicode point",
            );
            return None;
        }
        self.reader.skip();

        let mut value: u32 = 0;
        let mut valid = true;
        loop {
            match self.reader.next() {
                Some(b'}') => break,
                Some(c) if is_hex(c) => {
                    value = value
                        .saturating_mul(16)
                        .saturating_add(u32::from(hex_value(c)));
                },
                Some(_) => valid = false,
                None => {
                    let span = Span::new(literal_start, self.reader.position());
                    dlogger.error(
                        span,
                        "unexpected EOF, expected closing double quote",
                    );
                    return Some(Spanned::new(Token::None, span));
                },
            }
        }

        match char::from_u32(value) {
            Some(c) if valid => {
                let mut buffer = [0u8; 4];
                data.extend_from_slice(c.encode_utf8(&mut buffer).as_bytes());
            },
            _ => {
                dlogger.error(
                    Span::new(escape_start, self.reader.position()),
                    "invalid unicode point",
                );
            },
        }
        None
    }

    /// Lexes an attribute. Three forms: the nestable block
    /// form `${…}$`/`#{…}#`, the line form `$$ …`/`## …`,
    /// and the word form `$word`/`#word`. The `$` flavour
    /// is significant and survives into the AST.
    fn lex_metadata(
        &mut self,
        significant: bool,
        dlogger: &mut DiagnosticLogger,
    ) -> Spanned<Token> {
        let character = if significant { b'$' } else { b'#' };
        let start = self.reader.position();
        // skip the leading $ or #
        self.reader.skip();

        let mut data: Vec<u8> = Vec::new();

        match self.reader.peek(1) {
            Some(b'{') => {
                // the nestable block form; content excludes the
                // delimiters themselves
                self.reader.skip();
                let mut depth: usize = 1;
                loop {
                    match (self.reader.peek(1), self.reader.peek(2)) {
                        (Some(b'}'), Some(c)) if c == character => {
                            depth -= 1;
                            self.reader.skip();
                            self.reader.skip();
                            if depth == 0 {
                                break;
                            }
                            data.push(b'}');
                            data.push(character);
                        },
                        (Some(c), Some(b'{')) if c == character => {
                            depth += 1;
                            self.reader.skip();
                            self.reader.skip();
                            data.push(character);
                            data.push(b'{');
                        },
                        (Some(c), _) => {
                            data.push(c);
                            self.reader.skip();
                        },
                        (None, _) => {
                            dlogger.error(
                                Span::new(start, self.reader.position()),
                                "unexpected EOF, expected closing metadata delimiter",
                            );
                            break;
                        },
                    }
                }
            },
            Some(c) if c == character => {
                // the line form, up to but excluding the newline
                self.reader.skip();
                while let Some(c) = self.reader.peek(1) {
                    if c == b'\n' {
                        break;
                    }
                    data.push(c);
                    self.reader.skip();
                }
            },
            _ => {
                // the word form
                while let Some(c) = self.reader.peek(1) {
                    if is_word_continue(c) {
                        data.push(c);
                        self.reader.skip();
                    } else {
                        break;
                    }
                }
            },
        }

        let content = String::from_utf8_lossy(&data).into_owned();
        self.spanned(
            Token::Metadata {
                content,
                significant,
            },
            start,
        )
    }

    /// Longest-match punctuation, at most 4 bytes deep.
    fn lex_punctuation(&mut self, dlogger: &mut DiagnosticLogger) -> Spanned<Token> {
        let start = self.reader.position();
        let c1 = self.reader.peek(1);
        let c2 = self.reader.peek(2);
        let c3 = self.reader.peek(3);
        let c4 = self.reader.peek(4);

        let unknown = |lexer: &mut Lexer, dlogger: &mut DiagnosticLogger| {
            dlogger.append(Diagnostic::error(
                lexer.reader.peek_span(),
                "lexer unrecognized character",
            ));
            lexer.take(1, Token::None, start)
        };

        match c1 {
            Some(b'+') => match c2 {
                Some(b'=') => self.take(2, Token::AssignAdd, start),
                _ => self.take(1, Token::Add, start),
            },
            Some(b'-') => match c2 {
                Some(b'>') => self.take(2, Token::Pipe, start),
                Some(b'=') => self.take(2, Token::AssignSub, start),
                _ => self.take(1, Token::Sub, start),
            },
            Some(b'&') => self.take(1, Token::Ref, start),
            Some(b'@') => self.take(1, Token::Deref, start),
            Some(b'|') => self.take(1, Token::Sum, start),
            Some(b',') => self.take(1, Token::Product, start),
            Some(b';') => self.take(1, Token::Semicolon, start),
            Some(b'!') => match c2 {
                Some(b'=') => self.take(2, Token::CompNotEqual, start),
                _ => unknown(self, dlogger),
            },
            Some(b'=') => match c2 {
                Some(b'=') => self.take(2, Token::CompEqual, start),
                Some(b'>') => self.take(2, Token::Arrow, start),
                _ => self.take(1, Token::Assign, start),
            },
            Some(b'<') => match c2 {
                Some(b'=') => self.take(2, Token::CompLessEqual, start),
                _ => self.take(1, Token::CompLess, start),
            },
            Some(b'>') => match c2 {
                Some(b'=') => self.take(2, Token::CompGreaterEqual, start),
                _ => self.take(1, Token::CompGreater, start),
            },
            Some(b'*') => match c2 {
                Some(b'=') => self.take(2, Token::AssignMul, start),
                _ => self.take(1, Token::Mul, start),
            },
            Some(b'/') => match c2 {
                Some(b'/') => match c3 {
                    Some(b'=') => self.take(3, Token::AssignIDiv, start),
                    _ => self.take(2, Token::IDiv, start),
                },
                Some(b'.') => match c3 {
                    Some(b'=') => self.take(3, Token::AssignFDiv, start),
                    _ => self.take(2, Token::FDiv, start),
                },
                _ => self.take(1, Token::ModResolution, start),
            },
            Some(b'%') => match c2 {
                Some(b'/') => match c3 {
                    Some(b'=') => self.take(3, Token::AssignIRem, start),
                    _ => self.take(2, Token::IRem, start),
                },
                Some(b'.') => match c3 {
                    Some(b'=') => self.take(3, Token::AssignFRem, start),
                    _ => self.take(2, Token::FRem, start),
                },
                _ => unknown(self, dlogger),
            },
            Some(b':') => match c2 {
                Some(b'=') => self.take(2, Token::Define, start),
                _ => self.take(1, Token::Constrain, start),
            },
            Some(b'.') => match c2 {
                Some(b'.') => match c3 {
                    Some(b'.') => match c4 {
                        Some(b'=') => self.take(4, Token::IneqInclusive, start),
                        _ => self.take(3, Token::Ineq, start),
                    },
                    Some(b'=') => self.take(3, Token::RangeInclusive, start),
                    _ => self.take(2, Token::Range, start),
                },
                Some(b'=') => self.take(2, Token::Record, start),
                _ => self.take(1, Token::FieldAccess, start),
            },
            Some(b'[') => self.take(1, Token::BracketLeft, start),
            Some(b']') => self.take(1, Token::BracketRight, start),
            Some(b'(') => self.take(1, Token::ParenLeft, start),
            Some(b')') => self.take(1, Token::ParenRight, start),
            Some(b'{') => self.take(1, Token::BraceLeft, start),
            Some(b'}') => self.take(1, Token::BraceRight, start),
            Some(b'\\') => self.take(1, Token::Backslash, start),
            _ => unknown(self, dlogger),
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn lex_all(source: &str) -> (Vec<Spanned<Token>>, DiagnosticLogger) {
        let mut dlogger = DiagnosticLogger::new();
        let mut lexer = Lexer::new(Source::source(source));
        let mut tokens = vec![];
        loop {
            let token = lexer.next(&mut dlogger);
            if token.item == Token::Eof {
                break;
            }
            tokens.push(token);
        }
        (tokens, dlogger)
    }

    fn items(source: &str) -> Vec<Token> {
        lex_all(source).0.into_iter().map(|t| t.item).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        let (tokens, dlogger) = lex_all("");
        assert!(tokens.is_empty());
        assert!(dlogger.is_empty());
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            items("let x loop xyzzy"),
            vec![
                Token::Let,
                Token::Identifier("x".into()),
                Token::Loop,
                Token::Identifier("xyzzy".into()),
            ],
        );
        assert_eq!(items("true false"), vec![Token::Bool(true), Token::Bool(false)]);
        assert_eq!(items("nil never"), vec![Token::Nil, Token::Never]);
        assert_eq!(items("_"), vec![Token::Underscore]);
        assert_eq!(items("_x"), vec![Token::Identifier("_x".into())]);
    }

    #[test]
    fn punctuation_longest_match() {
        assert_eq!(
            items(".. ..= ... ...= .= ."),
            vec![
                Token::Range,
                Token::RangeInclusive,
                Token::Ineq,
                Token::IneqInclusive,
                Token::Record,
                Token::FieldAccess,
            ],
        );
        assert_eq!(
            items("// //= /. /.= /"),
            vec![
                Token::IDiv,
                Token::AssignIDiv,
                Token::FDiv,
                Token::AssignFDiv,
                Token::ModResolution,
            ],
        );
        assert_eq!(
            items("%/ %/= %. %.="),
            vec![
                Token::IRem,
                Token::AssignIRem,
                Token::FRem,
                Token::AssignFRem,
            ],
        );
        assert_eq!(
            items("= == => :="),
            vec![
                Token::Assign,
                Token::CompEqual,
                Token::Arrow,
                Token::Define,
            ],
        );
    }

    #[test]
    fn bare_percent_is_an_error() {
        let (tokens, dlogger) = lex_all("% x");
        assert_eq!(tokens[0].item, Token::None);
        assert!(dlogger.has_errors());
        // forward progress: the identifier still comes out
        assert_eq!(tokens[1].item, Token::Identifier("x".into()));
    }

    #[test]
    fn signed_number_vs_operator() {
        assert_eq!(
            items("1 - 2"),
            vec![
                Token::Int(BigInt::from(1)),
                Token::Sub,
                Token::Int(BigInt::from(2)),
            ],
        );
        // a minus glued to a digit is a signed literal
        assert_eq!(items("-2"), vec![Token::Int(BigInt::from(-2))]);
        assert_eq!(items("+2"), vec![Token::Int(BigInt::from(2))]);
    }

    #[test]
    fn radix_literals() {
        assert_eq!(items("0b1011"), vec![Token::Int(BigInt::from(11))]);
        assert_eq!(items("0o17"), vec![Token::Int(BigInt::from(15))]);
        assert_eq!(items("0d10"), vec![Token::Int(BigInt::from(10))]);
        assert_eq!(items("0xFF"), vec![Token::Int(BigInt::from(255))]);
        assert_eq!(items("1_000_000"), vec![Token::Int(BigInt::from(1000000))]);
    }

    #[test]
    fn hex_literal_stops_at_non_hex_letter() {
        // S4: the hex lexer stops at `G`, no diagnostics
        let (tokens, dlogger) = lex_all("0x1G");
        assert_eq!(
            tokens.iter().map(|t| t.item.clone()).collect::<Vec<_>>(),
            vec![Token::Int(BigInt::from(1)), Token::Identifier("G".into())],
        );
        assert!(dlogger.is_empty());
    }

    #[test]
    fn digit_exceeding_radix_is_substituted() {
        // S5: `2` in a binary literal substitutes radix - 1
        let (tokens, dlogger) = lex_all("0b12");
        assert_eq!(tokens[0].item, Token::Int(BigInt::from(3)));
        assert_eq!(dlogger.len(), 1);
        assert_eq!(
            dlogger.diagnostics()[0].message,
            "num literal char value exceeds radix",
        );
    }

    #[test]
    fn radix_boundary_digit_reports_exactly_once() {
        for source in ["0b2", "0o8", "0d1a", "0xg1"] {
            let (_, dlogger) = lex_all(source);
            let exceeds = dlogger
                .diagnostics()
                .iter()
                .filter(|d| d.message == "num literal char value exceeds radix")
                .count();
            // `0xg1` never even starts a digit; the others hit
            // the boundary exactly once
            assert!(exceeds <= 1, "{} reported {} times", source, exceeds);
        }
    }

    #[test]
    fn unrecognized_radix_code() {
        let (tokens, dlogger) = lex_all("0q1");
        assert_eq!(tokens[0].item, Token::Int(BigInt::from(1)));
        assert_eq!(
            dlogger.diagnostics()[0].message,
            "num literal unrecognized radix code",
        );
    }

    #[test]
    fn fractional_literals() {
        use std::str::FromStr;
        assert_eq!(
            items("2.5"),
            vec![Token::Real(BigDecimal::from_str("2.5").unwrap())],
        );
        assert_eq!(
            items("-0.25"),
            vec![Token::Real(BigDecimal::from_str("-0.25").unwrap())],
        );
        // non-decimal radix: 0b0.1 is one half
        assert_eq!(
            items("0b0.1"),
            vec![Token::Real(BigDecimal::from_str("0.5").unwrap())],
        );
        assert_eq!(
            items("0x0.8"),
            vec![Token::Real(BigDecimal::from_str("0.5").unwrap())],
        );
    }

    #[test]
    fn string_escapes() {
        // S6
        assert_eq!(items("\"hi\\nthere\""), vec![Token::Str("hi\nthere".into())]);
        assert_eq!(items("\"a\\\\b\""), vec![Token::Str("a\\b".into())]);
        assert_eq!(items("\"\\u{48}\\u{49}\""), vec![Token::Str("HI".into())]);
    }

    #[test]
    fn bad_escape_is_reported_but_recovers() {
        let (tokens, dlogger) = lex_all("\"a\\qb\"");
        assert_eq!(tokens[0].item, Token::Str("ab".into()));
        assert_eq!(
            dlogger.diagnostics()[0].message,
            "invalid control char after backslash",
        );
    }

    #[test]
    fn bad_unicode_point() {
        let (tokens, dlogger) = lex_all("\"\\u{110000}\"");
        assert_eq!(tokens[0].item, Token::Str("".into()));
        assert_eq!(dlogger.diagnostics()[0].message, "invalid unicode point");
    }

    #[test]
    fn unterminated_string_spans_to_eof() {
        let (tokens, dlogger) = lex_all("\"abc");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].item, Token::None);
        assert_eq!(tokens[0].span.start, Position::new(1, 1));
        assert_eq!(tokens[0].span.end, Position::new(1, 5));
        assert_eq!(
            dlogger.diagnostics()[0].message,
            "unexpected EOF, expected closing double quote",
        );
    }

    #[test]
    fn labels_and_chars() {
        assert_eq!(items("'outer"), vec![Token::Label("outer".into())]);
        assert_eq!(items("'z'"), vec![Token::Int(BigInt::from('z' as u32))]);
        assert_eq!(items("'\\n'"), vec![Token::Int(BigInt::from('\n' as u32))]);
        // a single-letter label is still a label without the
        // closing quote
        assert_eq!(items("'z"), vec![Token::Label("z".into())]);
    }

    #[test]
    fn metadata_forms() {
        assert_eq!(
            items("$word"),
            vec![Token::Metadata {
                content: "word".into(),
                significant: true,
            }],
        );
        assert_eq!(
            items("## a line comment\nx"),
            vec![
                Token::Metadata {
                    content: " a line comment".into(),
                    significant: false,
                },
                Token::Identifier("x".into()),
            ],
        );
        assert_eq!(
            items("${ outer ${ inner }$ tail }$"),
            vec![Token::Metadata {
                content: " outer ${ inner }$ tail ".into(),
                significant: true,
            }],
        );
    }

    #[test]
    fn unterminated_metadata_block() {
        let (tokens, dlogger) = lex_all("${ dangling");
        assert!(matches!(tokens[0].item, Token::Metadata { .. }));
        assert_eq!(
            dlogger.diagnostics()[0].message,
            "unexpected EOF, expected closing metadata delimiter",
        );
    }

    #[test]
    fn spans_are_monotonic() {
        let (tokens, _) = lex_all("let x := 0x1F + \"s\"");
        let mut previous = Position::start();
        for token in &tokens {
            assert!(token.span.start >= previous);
            assert!(token.span.start <= token.span.end);
            previous = token.span.end;
        }
    }

    proptest! {
        #[test]
        fn doesnt_crash(s in "\\PC*") {
            lex_all(&s);
        }

        #[test]
        fn always_makes_progress(s in "\\PC{1,64}") {
            // every non-Eof token consumes at least one byte, so
            // the token count can't exceed the byte count
            let (tokens, _) = lex_all(&s);
            prop_assert!(tokens.len() <= s.len());
        }

        #[test]
        fn integers(s in "[0-9]{1,18}") {
            let (tokens, dlogger) = lex_all(&s);
            prop_assert!(dlogger.is_empty());
            let expected: i64 = s.parse().unwrap();
            prop_assert_eq!(&tokens[0].item, &Token::Int(BigInt::from(expected)));
        }
    }
}

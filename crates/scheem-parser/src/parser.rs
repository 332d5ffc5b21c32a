//! Core parser: token cursor, error reporting, S-expression grammar.

use scheem_lexer::token::{Token, TokenKind};
use scheem_types::ast::{Expr, ExprKind, Program};
use scheem_types::{ErrorCode, SourceFile, Span, SyntaxError, SyntaxErrors};
use tracing::{debug, trace};

/// Maximum nesting of lists and quotes accepted before the parser gives up
/// on a form.
pub const MAX_NESTING_DEPTH: u32 = 256;

/// The Scheem parser.
///
/// Consumes a token stream produced by the lexer and builds expression
/// trees. Collects errors and resumes at the next top-level form.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    source_file: &'src SourceFile,
    errors: SyntaxErrors,
    /// Current nesting depth of lists and quotes.
    depth: u32,
}

/// Result of parsing.
pub struct ParseResult {
    /// `None` when any error was reported.
    pub program: Option<Program>,
    pub errors: SyntaxErrors,
}

impl<'src> Parser<'src> {
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: SyntaxErrors::empty(),
            depth: 0,
        }
    }

    /// Parse every top-level expression in the stream.
    pub fn parse(mut self) -> ParseResult {
        let start = self.current_span();
        let mut exprs = Vec::new();

        while !self.at_end() && !self.errors.is_saturated() {
            if self.check(&TokenKind::RParen) {
                let span = self.advance().span;
                self.error_with_suggestion(
                    ErrorCode::UNEXPECTED_CLOSE_PAREN,
                    "unexpected ')'",
                    span,
                    "remove the extra ')'",
                );
                continue;
            }
            if let Some(expr) = self.parse_expr() {
                exprs.push(expr);
            }
        }

        let span = exprs
            .iter()
            .fold(start, |acc, e| acc.merge(e.span));
        debug!(
            file = %self.source_file.name,
            forms = exprs.len(),
            errors = self.errors.total_errors,
            "parsed program"
        );

        let program = if self.errors.has_errors() {
            None
        } else {
            Some(Program { exprs, span })
        };
        ParseResult {
            program,
            errors: self.errors,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> &TokenKind {
        self.peek().map_or(&TokenKind::Eof, |t| &t.kind)
    }

    fn current_span(&self) -> Span {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(Span::point(1, 1), |t| t.span)
    }

    fn advance(&mut self) -> Token {
        let span = self.current_span();
        let token = self
            .peek()
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, span));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = SyntaxError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    fn error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = SyntaxError::new(&self.source_file.name, code, message, span, source_line)
            .with_suggestion(suggestion);
        self.errors.push_error(err);
    }

    // ── Grammar ───────────────────────────────────────────────────────────────

    /// expr := NUMBER | SYMBOL | "'" expr | "(" expr* ")"
    fn parse_expr(&mut self) -> Option<Expr> {
        let token = self.advance();
        trace!(kind = %token.kind, span = %token.span, "parse_expr");
        match token.kind {
            TokenKind::Number(n) => Some(Expr::new(ExprKind::Number(n), token.span)),
            TokenKind::Symbol(name) => Some(Expr::new(ExprKind::Symbol(name), token.span)),
            TokenKind::Quote => self.parse_quoted(token.span),
            TokenKind::LParen => self.parse_list(token.span),
            TokenKind::RParen => {
                self.error_with_suggestion(
                    ErrorCode::UNEXPECTED_CLOSE_PAREN,
                    "unexpected ')'",
                    token.span,
                    "remove the extra ')'",
                );
                None
            }
            TokenKind::Eof => None,
        }
    }

    fn parse_quoted(&mut self, quote_span: Span) -> Option<Expr> {
        if matches!(self.peek_kind(), TokenKind::RParen | TokenKind::Eof) {
            self.error_with_suggestion(
                ErrorCode::DANGLING_QUOTE,
                "expected an expression after quote",
                quote_span,
                "write '(...) or 'name",
            );
            return None;
        }
        if self.depth >= MAX_NESTING_DEPTH {
            self.nesting_too_deep(quote_span);
            self.skip_datum();
            return None;
        }

        self.depth += 1;
        let inner = self.parse_expr();
        self.depth -= 1;

        let inner = inner?;
        let span = quote_span.merge(inner.span);
        Some(Expr::quoted(inner, span))
    }

    fn parse_list(&mut self, open_span: Span) -> Option<Expr> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.nesting_too_deep(open_span);
            self.skip_rest_of_list();
            return None;
        }

        self.depth += 1;
        let mut items = Vec::new();
        let mut failed = false;
        let close_span = loop {
            match self.peek_kind() {
                TokenKind::RParen => break Some(self.advance().span),
                TokenKind::Eof => break None,
                _ => match self.parse_expr() {
                    Some(item) => items.push(item),
                    None => failed = true,
                },
            }
        };
        self.depth -= 1;

        let Some(close_span) = close_span else {
            self.error_with_suggestion(
                ErrorCode::UNCLOSED_PAREN,
                "unclosed '('",
                open_span,
                "add a matching ')'",
            );
            return None;
        };
        if failed {
            return None;
        }
        Some(Expr::new(ExprKind::List(items), open_span.merge(close_span)))
    }

    /// Each `(` and each `'` counts as one nesting level.
    fn nesting_too_deep(&mut self, span: Span) {
        self.error(
            ErrorCode::NESTING_TOO_DEEP,
            format!("expressions nested deeper than {MAX_NESTING_DEPTH} levels"),
            span,
        );
    }

    /// Skip the next datum along with any quotes in front of it.
    fn skip_datum(&mut self) {
        while self.check(&TokenKind::Quote) {
            self.advance();
        }
        match self.peek_kind() {
            TokenKind::LParen => {
                self.advance();
                self.skip_rest_of_list();
            }
            TokenKind::RParen | TokenKind::Eof => {}
            _ => {
                self.advance();
            }
        }
    }

    /// Skip tokens until the list opened just before the cursor is closed.
    fn skip_rest_of_list(&mut self) {
        let mut open = 1usize;
        while open > 0 && !self.at_end() {
            match self.advance().kind {
                TokenKind::LParen => open += 1,
                TokenKind::RParen => open -= 1,
                _ => {}
            }
        }
    }
}

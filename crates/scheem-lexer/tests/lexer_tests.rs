//! Lexer tests: atoms, numbers, quote sugar, comments, whitespace,
//! spans, and error recovery.

use pretty_assertions::assert_eq;
use scheem_lexer::{Lexer, TokenKind};
use scheem_types::{ErrorCode, SourceFile, Span, MAX_ERRORS};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.scm", source);
    Lexer::new(&sf)
        .lex()
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

fn sym(name: &str) -> TokenKind {
    TokenKind::Symbol(name.to_string())
}

fn num(n: f64) -> TokenKind {
    TokenKind::Number(n)
}

// ─────────────────────────────────────────────────────────────────────
// Atoms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn bare_symbols() {
    assert_eq!(kinds("atom"), vec![sym("atom")]);
    assert_eq!(kinds("+"), vec![sym("+")]);
    assert_eq!(kinds("make-account"), vec![sym("make-account")]);
}

#[test]
fn operator_symbols_are_not_numbers() {
    assert_eq!(kinds("- * / = < >"), vec![
        sym("-"),
        sym("*"),
        sym("/"),
        sym("="),
        sym("<"),
        sym(">"),
    ]);
}

#[test]
fn numeric_literals() {
    assert_eq!(kinds("42"), vec![num(42.0)]);
    assert_eq!(kinds("-90.01"), vec![num(-90.01)]);
    assert_eq!(kinds("-20"), vec![num(-20.0)]);
    assert_eq!(kinds("0"), vec![num(0.0)]);
}

#[test]
fn number_like_atoms_fall_back_to_symbols() {
    assert_eq!(kinds("1+ 2."), vec![sym("1+"), sym("2.")]);
}

#[test]
fn non_ascii_symbol() {
    assert_eq!(kinds("(λ x)"), vec![
        TokenKind::LParen,
        sym("λ"),
        sym("x"),
        TokenKind::RParen,
    ]);
}

// ─────────────────────────────────────────────────────────────────────
// Lists, quote, whitespace, comments
// ─────────────────────────────────────────────────────────────────────

#[test]
fn simple_list() {
    assert_eq!(kinds("(+ x 3)"), vec![
        TokenKind::LParen,
        sym("+"),
        sym("x"),
        num(3.0),
        TokenKind::RParen,
    ]);
}

#[test]
fn parens_delimit_atoms_without_spaces() {
    assert_eq!(kinds("(f(x))"), vec![
        TokenKind::LParen,
        sym("f"),
        TokenKind::LParen,
        sym("x"),
        TokenKind::RParen,
        TokenKind::RParen,
    ]);
}

#[test]
fn quote_token() {
    assert_eq!(kinds("'b '(c)"), vec![
        TokenKind::Quote,
        sym("b"),
        TokenKind::Quote,
        TokenKind::LParen,
        sym("c"),
        TokenKind::RParen,
    ]);
}

#[test]
fn any_whitespace_is_insignificant() {
    assert_eq!(kinds("\n(f (  x ) )\t"), kinds("(f (x))"));
}

#[test]
fn comments_are_stripped() {
    assert_eq!(kinds("(+;;test\n1 1)"), vec![
        TokenKind::LParen,
        sym("+"),
        num(1.0),
        num(1.0),
        TokenKind::RParen,
    ]);
    assert_eq!(kinds("0;;test"), vec![num(0.0)]);
    assert_eq!(kinds(";; only a comment"), vec![]);
}

#[test]
fn comment_ends_an_atom() {
    assert_eq!(kinds("abc;;def"), vec![sym("abc")]);
}

// ─────────────────────────────────────────────────────────────────────
// Spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn token_spans_are_one_based() {
    let sf = SourceFile::new("test.scm", "(def x\n  10)");
    let tokens = Lexer::new(&sf).lex().tokens;
    assert_eq!(tokens[0].span, Span::new(1, 1, 1, 1));
    assert_eq!(tokens[1].span, Span::new(1, 2, 1, 4));
    assert_eq!(tokens[3].span, Span::new(2, 3, 2, 4));
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
}

// ─────────────────────────────────────────────────────────────────────
// Error recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn single_semicolon_is_reported_and_skipped() {
    let sf = SourceFile::new("test.scm", "(a ; b)");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 1);
    let err = &result.errors.errors[0];
    assert_eq!(err.code, ErrorCode::UNEXPECTED_CHARACTER);
    assert_eq!(err.span.start_col, 4);
    assert_eq!(err.source_line, "(a ; b)");
    assert_eq!(err.suggestion.as_deref(), Some("Comments start with ';;'"));

    let kinds: Vec<_> = result.tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![
        TokenKind::LParen,
        sym("a"),
        sym("b"),
        TokenKind::RParen,
        TokenKind::Eof,
    ]);
}

#[test]
fn errors_stop_at_cap() {
    let source = "; ".repeat(30);
    let sf = SourceFile::new("test.scm", source);
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.errors.len(), MAX_ERRORS);
    assert_eq!(result.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
}

#[test]
fn empty_source_is_just_eof() {
    let sf = SourceFile::new("test.scm", "");
    let result = Lexer::new(&sf).lex();
    assert!(!result.errors.has_errors());
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].kind, TokenKind::Eof);
}

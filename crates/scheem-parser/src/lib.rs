//! Scheem parser: converts a token stream into expression trees.

mod parser;

pub use parser::{ParseResult, Parser, MAX_NESTING_DEPTH};

use scheem_lexer::Lexer;
use scheem_types::ast::Expr;
use scheem_types::{ErrorCode, SourceFile, SyntaxError, SyntaxErrors};

/// Lex and parse a whole source file.
///
/// Lexer errors are reported ahead of parser errors; the parser still runs
/// over the recovered token stream so both kinds surface in one pass.
pub fn parse_source(source_file: &SourceFile) -> ParseResult {
    let lex = Lexer::new(source_file).lex();
    let mut result = Parser::new(lex.tokens, source_file).parse();
    if lex.errors.has_errors() {
        let mut errors = lex.errors;
        errors.extend(result.errors);
        result.errors = errors;
        result.program = None;
    }
    result
}

/// Parse source text that holds exactly one expression.
pub fn parse_single(source: &str) -> Result<Expr, SyntaxErrors> {
    let sf = SourceFile::new("<input>", source);
    let result = parse_source(&sf);
    let Some(program) = result.program else {
        return Err(result.errors);
    };
    let count = program.exprs.len();
    let mut exprs = program.exprs.into_iter();
    match (exprs.next(), count) {
        (Some(expr), 1) => Ok(expr),
        _ => {
            let mut errors = SyntaxErrors::empty();
            errors.push_error(SyntaxError::new(
                sf.name.as_str(),
                ErrorCode::EXPECTED_SINGLE_EXPRESSION,
                format!("expected one expression, found {count}"),
                program.span,
                sf.line(program.span.start_line).unwrap_or(""),
            ));
            Err(errors)
        }
    }
}

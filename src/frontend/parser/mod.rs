use lalrpop_util::lalrpop_mod;
use tracing::debug;

use crate::frontend::error::{locate_parse_error, FrontendError};
use crate::meta::LocationMeta;

use self::ast::{Expression, Program};
use self::grammar::{ExprParser, ProgramParser};
pub use self::lexer::{Lexer, LexicalError, Tok};
pub use self::sourcemap::SourceMap;

lalrpop_mod!(#[allow(clippy::all)] grammar, "/frontend/parser/grammar.rs");

mod lexer;
mod sourcemap;

pub mod ast;


pub type ParserErrors = Vec<FrontendError<LocationMeta>>;

/// parse the whole translation unit, the first syntax error aborts parsing
pub fn parse_program(source: &SourceMap) -> Result<Program, ParserErrors> {
    let parser = ProgramParser::new();
    let lexer = Lexer::new(source.source_code());
    match parser.parse(source, lexer) {
        Ok(program) => {
            debug!("parsed {} top-level definitions from {}", program.len(), source.file_name());
            Ok(program)
        }
        Err(e) => {
            let error = locate_parse_error(e, source);
            debug!("parsing {} failed: {}", source.file_name(), error);
            Err(vec![error])
        }
    }
}

/// parse a single expression, used when only a fragment of the language is needed
pub fn parse_expression(source: &SourceMap) -> Result<Box<Expression>, ParserErrors> {
    let parser = ExprParser::new();
    let lexer = Lexer::new(source.source_code());
    parser.parse(source, lexer)
        .map_err(|e| vec![locate_parse_error(e, source)])
}

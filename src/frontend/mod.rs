use std::fs;

use tracing::{debug, info};

use crate::meta::LocationMeta;

use self::ast::Program;
use self::error::{FrontendError, FrontendErrorKind};
pub use self::parser::ast;
pub use self::parser::{parse_expression, parse_program, Lexer, LexicalError, SourceMap, Tok};
pub use self::semantic::{check_semantics, render_report, SemanticAnalyzer};

mod parser;

pub mod error;
pub mod semantic;


pub type Error = FrontendError<String>;

/// load file from path and parse it as a source code
pub fn parse_file(path: &str) -> Result<Program, Vec<Error>> {
    let source_code = read_source(path)?;
    parse_code(String::from(path), source_code)
}

/// parse source code of the file given by name, errors are located as `file:line`
pub fn parse_code(file_name: String, source_code: String) -> Result<Program, Vec<Error>> {
    let source = SourceMap::new(file_name, source_code);
    parse_program(&source)
        .map_err(|errors| locate_errors(errors, &source))
}

/// parse source code and run semantic analysis on the result
pub fn process_code(file_name: String, source_code: String) -> Result<Program, Vec<Error>> {
    let source = SourceMap::new(file_name, source_code);
    let result = parse_program(&source)
        .and_then(|program| check_semantics(&program).map(|_| program));
    match result {
        Ok(program) => {
            info!("{} passed all frontend checks", source.file_name());
            Ok(program)
        }
        Err(errors) => Err(locate_errors(errors, &source)),
    }
}

/// load file from path and process it as a source code
pub fn process_file(path: &str) -> Result<Program, Vec<Error>> {
    let source_code = read_source(path)?;
    process_code(String::from(path), source_code)
}

fn read_source(path: &str) -> Result<String, Vec<Error>> {
    debug!("reading {}", path);
    fs::read_to_string(path).map_err(|e| {
        let kind = FrontendErrorKind::SystemError {
            message: format!("Failed to read file {}: {}", path, e)
        };
        vec![FrontendError::new(kind, String::from(path))]
    })
}

/// translate location from LocationMeta (line in file) to a printable `file:line`
fn locate_errors(errors: Vec<FrontendError<LocationMeta>>, source: &SourceMap) -> Vec<Error> {
    errors.into_iter()
        .map(|e| e.map_meta(source))
        .collect()
}

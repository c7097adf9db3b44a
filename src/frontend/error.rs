use lalrpop_util::ParseError as LalrpopError;
use thiserror::Error;

use crate::frontend::parser::{LexicalError, SourceMap, Tok};
use crate::meta::{LocationMeta, Meta};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum FrontendErrorKind {
    #[error("ParseError: {message}")]
    ParseError {
        message: String,
    },
    #[error("{message}")]
    EnvError {
        message: String,
    },
    #[error("SystemError: {message}")]
    SystemError {
        message: String,
    },
}

/// standardized type to remember all frontend errors
pub type FrontendError<LocationT> = Meta<FrontendErrorKind, LocationT>;

/// translate error reported by the generated parser (byte offsets) to a located frontend error
pub fn locate_parse_error(
    err: LalrpopError<usize, Tok, LexicalError>, source: &SourceMap,
) -> FrontendError<LocationMeta> {
    let (offset, message) = match err {
        LalrpopError::InvalidToken { location } => {
            (location, String::from("invalid token"))
        }
        LalrpopError::UnrecognizedEOF { location, expected } => {
            (location, format!("unexpected end of file, expected one of: {}", expected.join(", ")))
        }
        LalrpopError::UnrecognizedToken { token: (location, token, _), expected } => {
            (location, format!("unexpected `{}`, expected one of: {}", token, expected.join(", ")))
        }
        LalrpopError::ExtraToken { token: (location, token, _) } => {
            (location, format!("extra token `{}`", token))
        }
        LalrpopError::User { error } => {
            (error.location(), error.to_string())
        }
    };
    FrontendError::new(FrontendErrorKind::ParseError { message }, source.locate(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_error_is_displayed_after_location() {
        let kind = FrontendErrorKind::EnvError { message: String::from("Undefined identifier 'x'") };
        let err = FrontendError::new(kind, LocationMeta::from(4));
        assert_eq!(err.to_string(), "Line 4: Undefined identifier 'x'");
    }

    #[test]
    fn user_error_keeps_lexer_location() {
        let source = SourceMap::new(String::from("test.c"), String::from("int x;\n$"));
        let err = LalrpopError::User { error: LexicalError::UnexpectedCharacter { ch: '$', location: 7 } };
        let located = locate_parse_error(err, &source);
        assert_eq!(located.get_meta().line, 2);
        assert_eq!(located.item, FrontendErrorKind::ParseError { message: String::from("unexpected character '$'") });
    }
}

use std::fmt::Display;

use itertools::Itertools;

use crate::frontend::ast::Program;
use crate::frontend::error::FrontendError;

pub use self::analyzer::{CheckResult, SemanticAnalyzer};
pub use self::symbols::{Symbol, SymbolKind, SymbolTable};

mod analyzer;
mod symbols;

/// run scoped name resolution on the whole program, without any builtins
pub fn check_semantics(program: &Program) -> CheckResult {
    SemanticAnalyzer::new().check_program(program)
}

/// one issue per line, in the order they were found
pub fn render_report<LocationT: Display>(errors: &[FrontendError<LocationT>]) -> String {
    errors.iter().join("\n")
}

#[cfg(test)]
mod tests {
    use crate::frontend::error::FrontendErrorKind;
    use crate::meta::LocationMeta;

    use super::*;

    #[test]
    fn report_lists_issues_in_order() {
        let errors = vec![
            FrontendError::new(
                FrontendErrorKind::EnvError { message: String::from("Undefined identifier 'a'") },
                LocationMeta::from(2),
            ),
            FrontendError::new(
                FrontendErrorKind::EnvError { message: String::from("Call to undefined function 'f'") },
                LocationMeta::from(7),
            ),
        ];
        assert_eq!(
            render_report(&errors),
            "Line 2: Undefined identifier 'a'\nLine 7: Call to undefined function 'f'",
        );
    }

    #[test]
    fn empty_program_passes() {
        assert_eq!(check_semantics(&Program::default()), Ok(()));
    }
}

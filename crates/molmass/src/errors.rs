use miette::Diagnostic;
use thiserror::Error;

use crate::{isotopes::IsotopeError, parsers::errors::FormulaError};

pub type Result<T, E = Box<MolmassError>> = std::result::Result<T, E>;

/// Top-level error wrapper for every expected failure mode of the crate
#[derive(Debug, Diagnostic, Clone, PartialEq, Error)]
pub enum MolmassError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Formula {
        #[from]
        error: FormulaError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Isotopes {
        #[from]
        error: IsotopeError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Abbreviation {
        #[from]
        error: AbbreviationError,
    },
}

/// Configuration errors raised when mutating the abbreviation table
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum AbbreviationError {
    #[diagnostic(help("abbreviation symbols are 1 to 6 ASCII letters, like \"Ph\" or \"Bpy\""))]
    #[error("the abbreviation symbol {0:?} must be 1 to 6 letters long")]
    SymbolTooLong(String),

    #[diagnostic(help("abbreviation symbols are 1 to 6 ASCII letters, like \"Ph\" or \"Bpy\""))]
    #[error("the abbreviation symbol {0:?} contains non-letter characters")]
    SymbolNotLetters(String),

    #[diagnostic(help("pick a symbol that doesn't collide with an element or another abbreviation"))]
    #[error("the symbol {0:?} is already taken by {1}")]
    DuplicateSymbol(String, String),

    #[error("the abbreviation table is full ({0} entries)")]
    TableFull(usize),
}

impl AbbreviationError {
    pub fn error_code(&self) -> u32 {
        match self {
            Self::SymbolTooLong(_) => 40,
            Self::SymbolNotLetters(_) => 41,
            Self::DuplicateSymbol(..) => 42,
            Self::TableFull(_) => 43,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::errors::{FormulaError, FormulaErrorKind};

    #[test]
    fn wrapped_errors_delegate_their_diagnostics() {
        let error: MolmassError =
            FormulaError::new(FormulaErrorKind::MisplacedNumber, "2H2O", 0).into();
        // The `Diagnostic` trait method and the inherent numeric code are
        // distinct lookups and must coexist on the wrapped error
        assert!(miette::Diagnostic::code(&error).is_none());
        assert!(miette::Diagnostic::labels(&error).is_some());
        let MolmassError::Formula { error } = &error else {
            panic!("expected a formula error");
        };
        assert_eq!(error.error_code(), 2);
    }
}

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A formula parse failure, pinned to the offending position in the source
/// text so that `miette` can render a span annotation
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
pub struct FormulaError {
    kind: FormulaErrorKind,
    #[source_code]
    src: String,
    #[label("{kind}")]
    span: SourceSpan,
    position: usize,
    character: Option<char>,
}

impl FormulaError {
    pub(crate) fn new(kind: FormulaErrorKind, src: &str, position: usize) -> Self {
        let position = position.min(src.len());
        let character = src[position..].chars().next();
        // Zero-length span at end-of-input
        let length = character.map_or(0, char::len_utf8);
        Self {
            kind,
            src: src.to_owned(),
            span: (position, length).into(),
            position,
            character,
        }
    }

    /// Re-home an error raised inside an abbreviation's definition onto the
    /// abbreviation symbol in the outer formula
    pub(crate) fn rehome(self, src: &str, position: usize) -> Self {
        Self::new(self.kind, src, position)
    }

    pub fn kind(&self) -> &FormulaErrorKind {
        &self.kind
    }

    /// Stable numeric code for this error's kind
    pub fn error_code(&self) -> u32 {
        self.kind.error_code()
    }

    /// Byte offset of the offending character in the parsed text
    pub fn position(&self) -> usize {
        self.position
    }

    /// The offending character, when the error isn't at end-of-input
    pub fn character(&self) -> Option<char> {
        self.character
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
pub enum FormulaErrorKind {
    #[error("unknown element or abbreviation {0:?}")]
    #[diagnostic(help("double-check for typos, or define {0:?} as an abbreviation first"))]
    UnknownElement(String),

    #[error("a number must follow an element, abbreviation, parenthesis, dash, or caret")]
    MisplacedNumber,

    #[error("missing closing parenthesis")]
    MissingClosingParenthesis,

    #[error("unmatched closing parenthesis")]
    UnmatchedParenthesis,

    #[error("a zero directly after an element or dash is not allowed")]
    #[diagnostic(help("to zero out a group, put it in parentheses: (CO2)0"))]
    ZeroAfterElementOrDash,

    #[error("a number can contain at most one decimal point")]
    MultipleDecimalPoints,

    #[error("a number cannot directly follow a closing bracket")]
    NumberAfterClosingBracket,

    #[error("brackets cannot be nested")]
    #[diagnostic(help("enable the treat-brackets-as-parentheses option if [ ] was meant as grouping"))]
    NestedBrackets,

    #[error("unmatched closing bracket")]
    UnmatchedBracket,

    #[error("missing closing bracket")]
    MissingClosingBracket,

    #[error("the character '~' is reserved")]
    ReservedFillerCharacter,

    #[error("'x' as a placeholder multiplier is only valid directly after '['")]
    XOutsideBrackets,

    #[error("a '^' must be followed by an isotopic mass")]
    CaretWithoutNumber,

    #[error("an isotopic mass must be followed by an element symbol")]
    CaretWithoutElement,

    #[error("isotopes cannot be specified for abbreviations")]
    #[diagnostic(help("spell the abbreviation out and put the ^ on the element inside it"))]
    IsotopeOnAbbreviation,

    #[error("the formula after '>' removes more atoms than are present")]
    InvalidSubtraction,

    #[error("'>' can only appear once, at the top level of a formula")]
    MisplacedSubtraction,

    #[error("the abbreviation {0:?} circularly references itself")]
    CircularAbbreviation(String),

    #[error("the abbreviation {0:?} has an invalid formula")]
    #[diagnostic(help("fix or remove the definition of {0:?} before using it"))]
    InvalidAbbreviationFormula(String),
}

impl FormulaErrorKind {
    /// Stable numeric codes, for callers keying behaviour off error identity
    /// rather than message text
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::UnknownElement(_) => 1,
            Self::MisplacedNumber => 2,
            Self::MissingClosingParenthesis => 3,
            Self::UnmatchedParenthesis => 4,
            Self::ZeroAfterElementOrDash => 5,
            Self::MultipleDecimalPoints => 11,
            Self::NumberAfterClosingBracket => 12,
            Self::NestedBrackets => 13,
            Self::UnmatchedBracket => 14,
            Self::MissingClosingBracket => 15,
            Self::ReservedFillerCharacter => 16,
            Self::XOutsideBrackets => 18,
            Self::CaretWithoutNumber => 20,
            Self::CaretWithoutElement => 21,
            Self::IsotopeOnAbbreviation => 22,
            Self::InvalidSubtraction => 24,
            Self::MisplacedSubtraction => 26,
            Self::CircularAbbreviation(_) => 28,
            Self::InvalidAbbreviationFormula(_) => 29,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_capture_position_and_character() {
        let error = FormulaError::new(FormulaErrorKind::MisplacedNumber, "2H2O", 0);
        assert_eq!(error.position(), 0);
        assert_eq!(error.character(), Some('2'));
        assert_eq!(error.error_code(), 2);
    }

    #[test]
    fn end_of_input_errors_have_no_character() {
        let error = FormulaError::new(FormulaErrorKind::MissingClosingParenthesis, "(H2O", 4);
        assert_eq!(error.character(), None);
    }

    #[test]
    fn rehoming_keeps_the_kind() {
        let inner = FormulaError::new(
            FormulaErrorKind::UnknownElement("Qq".to_owned()),
            "Qq7",
            0,
        );
        let outer = inner.rehome("H2O Bad", 4);
        assert_eq!(outer.error_code(), 1);
        assert_eq!(outer.position(), 4);
        assert_eq!(outer.character(), Some('B'));
    }
}

use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParserError {
    #[error("Parser error: malformed declaration for '{0}': {1}")]
    MalformedDeclaration(String, String),
    #[error("Parser error: '{0}' is not allowed inside command block '{1}'")]
    UnsupportedInBlock(String, String),
    #[error("Parser error: unknown directive '{0}' in command block")]
    InvalidDirective(String),
    #[error("Parser error: directive '{0}' is missing its {1}")]
    IncompleteDirective(String, String),
    #[error("Parser error: operation '{0}' is not supported on command blocks")]
    UnsupportedOperation(String),
    #[error("Parser error: cyclic inheritance detected at component '{0}'")]
    CyclicInheritance(String),
    #[error("Parser error: cannot map '{0}' to a single construct: {1}")]
    ParseDispatch(String, String),
    #[error("Parser error: unknown arithmetic operator '{0}'")]
    UnsupportedArithmeticOperator(String),
    #[error("Parser error: invalid comparison operator '{0}'")]
    InvalidComparisonOperator(String),
    #[error("Parser error: failed to parse number literal '{0}'")]
    FailedToParseNumberLiteral(String),
    #[error("Parser error: Missing '{0}' for {1}")]
    MissingToken(String, String),
    #[error("Parser error: unexpected rule in {0}: {1}")]
    UnexpectedRule(String, String),
    #[error("Parser error: component '{0}' cannot inherit from command block '{1}'")]
    CommandBlockInheritance(String, String),
    #[error("Parser error: init references UNKNOWN component '{0}'")]
    UnknownComponent(String),
    #[error("Parser error: duplicate instantiation id '{0}'")]
    DuplicateInstantiation(String),
    #[error("Parser error: failed to parse Brioche program: {0}")]
    FailedToParseProgram(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ParserError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

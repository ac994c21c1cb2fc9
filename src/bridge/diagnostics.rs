use thiserror::Error;

// The three error categories reported by the pipeline
#[derive (Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum (serialize_all = "UPPERCASE")]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Translation
}

// Everything that can go wrong while scanning
#[derive (Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LexicalIssue {
    #[strum (serialize = "unrecognized character")]
    UnrecognizedCharacter,
    #[strum (serialize = "unterminated string")]
    UnterminatedString,
    #[strum (serialize = "unterminated character")]
    UnterminatedCharacter,
    #[strum (serialize = "malformed character")]
    MalformedCharacter,
    #[strum (serialize = "unterminated block comment")]
    UnterminatedBlockComment,
    #[strum (serialize = "multiple decimal points")]
    MultipleDecimalPoints,
    #[strum (serialize = "malformed decimal")]
    MalformedDecimal
}

#[derive (Debug, Clone, PartialEq, Eq, Error)]
#[error ("Lexical error at ({line}, {column}); {issue} [ {text} ]")]
pub struct LexicalError {
    // The offending source text
    pub text: String,
    pub issue: LexicalIssue,
    pub line: usize,
    pub column: usize
}

impl LexicalError {
    pub fn new(text: String, issue: LexicalIssue, line: usize, column: usize) -> Self {
        return LexicalError { text, issue, line, column };
    }

    pub fn kind(&self) -> ErrorKind {
        return ErrorKind::Lexical;
    }

    pub fn message(&self) -> String {
        return self.issue.to_string();
    }

    pub fn position(&self) -> (usize, usize) {
        return (self.line, self.column);
    }
}

#[derive (Debug, Clone, PartialEq, Eq, Error)]
#[error ("Syntax error at ({line}, {column}); {message} [ {offending_token} ]")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    // Text of the token the parser was looking at, or EOF
    pub offending_token: String,
    // Set for the single error that aborted the whole parse
    pub fatal: bool
}

impl SyntaxError {
    pub fn new(message: String, line: usize, column: usize, offending_token: String) -> Self {
        return SyntaxError { message, line, column, offending_token, fatal: false };
    }

    pub fn kind(&self) -> ErrorKind {
        return ErrorKind::Syntax;
    }

    pub fn position(&self) -> (usize, usize) {
        return (self.line, self.column);
    }
}

#[derive (Debug, Clone, PartialEq, Eq, Error)]
#[error ("Translation error; {message}")]
pub struct TranslationError {
    pub message: String
}

impl TranslationError {
    pub fn new(message: String) -> Self {
        return TranslationError { message };
    }

    pub fn kind(&self) -> ErrorKind {
        return ErrorKind::Translation;
    }
}

// Why a whole translation failed, holding the errors of the stage that stopped it
#[derive (Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error ("translation stopped by {} lexical error(s)", .0.len())]
    Lexical(Vec<LexicalError>),
    #[error ("translation stopped by {} syntax error(s)", .0.len())]
    Syntax(Vec<SyntaxError>),
    #[error ("translation finished with {} error(s)", .0.len())]
    Translation(Vec<TranslationError>)
}

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        return match self {
            TranslateError::Lexical(_) => ErrorKind::Lexical,
            TranslateError::Syntax(_) => ErrorKind::Syntax,
            TranslateError::Translation(_) => ErrorKind::Translation
        };
    }
}

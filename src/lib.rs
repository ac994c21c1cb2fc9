pub mod bridge;
pub mod util;

pub use crate::bridge::code_generator::{generate, generate_with_options, GenerateOutput};
pub use crate::bridge::compiler::{compile, translate, CompileOutput};
pub use crate::bridge::diagnostics::{ErrorKind, LexicalError, SyntaxError, TranslateError, TranslationError};
pub use crate::bridge::lexer::{lex, LexOutput};
pub use crate::bridge::parser::{parse, parse_with_options, ParseOutput};
pub use crate::util::options::CompilerOptions;

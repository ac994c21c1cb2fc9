use crate::bridge::ast::Program;
use crate::bridge::code_generator::{self, GenerateOutput};
use crate::bridge::diagnostics::{ErrorKind, LexicalError, SyntaxError, TranslateError, TranslationError};
use crate::bridge::lexer::{self, LexOutput};
use crate::bridge::parser::{self, ParseOutput};
use crate::bridge::symbol_table::SymbolTable;
use crate::bridge::token::Token;
use crate::util::bridge_log::{self, LogSources, LogTypes};
use crate::util::options::CompilerOptions;

// The output of every stage that ran. Later stages are empty when an earlier one failed.
#[derive (Debug)]
pub struct CompileOutput {
    pub tokens: Vec<Token>,
    pub lex_errors: Vec<LexicalError>,
    pub ast: Option<Program>,
    pub symbol_table: Option<SymbolTable>,
    pub syntax_errors: Vec<SyntaxError>,
    pub code: Option<String>,
    pub translation_errors: Vec<TranslationError>
}

impl CompileOutput {
    fn new() -> Self {
        return CompileOutput {
            tokens: Vec::new(),
            lex_errors: Vec::new(),
            ast: None,
            symbol_table: None,
            syntax_errors: Vec::new(),
            code: None,
            translation_errors: Vec::new()
        };
    }

    pub fn is_ok(&self) -> bool {
        return self.halted_at().is_none() && self.translation_errors.is_empty() && self.code.is_some();
    }

    // The category of the errors that stopped the pipeline, if any
    pub fn halted_at(&self) -> Option<ErrorKind> {
        if !self.lex_errors.is_empty() {
            return Some(ErrorKind::Lexical);
        } else if !self.syntax_errors.is_empty() {
            return Some(ErrorKind::Syntax);
        } else if self.code.is_none() {
            return Some(ErrorKind::Translation);
        }
        return None;
    }

    pub fn error_count(&self) -> usize {
        return self.lex_errors.len() + self.syntax_errors.len() + self.translation_errors.len();
    }
}

// Function to run the whole pipeline on a piece of source code
pub fn compile(source_code: &str, options: &CompilerOptions) -> CompileOutput {
    bridge_log::log(LogTypes::Info, LogSources::Bridge, String::from("Compile called"));
    let mut compile_output: CompileOutput = CompileOutput::new();

    let lex_output: LexOutput = lexer::lex(source_code);
    compile_output.tokens = lex_output.tokens;
    compile_output.lex_errors = lex_output.errors;

    // Parsing only happens with a clean token stream
    if !compile_output.lex_errors.is_empty() {
        bridge_log::log(
            LogTypes::Info,
            LogSources::Bridge,
            String::from("Parsing skipped due to lexer failure")
        );
        return compile_output;
    }

    let parse_output: ParseOutput = parser::parse_with_options(&compile_output.tokens, options);
    compile_output.ast = parse_output.ast;
    compile_output.symbol_table = Some(parse_output.symbol_table);
    compile_output.syntax_errors = parse_output.errors;

    if !compile_output.syntax_errors.is_empty() || compile_output.ast.is_none() {
        bridge_log::log(
            LogTypes::Info,
            LogSources::Bridge,
            String::from("Code generation skipped due to parse failure")
        );
        return compile_output;
    }

    let generate_output: GenerateOutput = code_generator::generate_with_options(compile_output.ast.as_ref(), options);
    compile_output.code = Some(generate_output.code);
    compile_output.translation_errors = generate_output.diagnostics;

    bridge_log::log(
        LogTypes::Info,
        LogSources::Bridge,
        format!("Compile finished with {} translation error(s)", compile_output.translation_errors.len())
    );
    return compile_output;
}

// Translates a program with the default options, failing with the errors of the stage that stopped it
pub fn translate(source_code: &str) -> Result<String, TranslateError> {
    let compile_output: CompileOutput = compile(source_code, &CompilerOptions::default());

    if !compile_output.lex_errors.is_empty() {
        return Err(TranslateError::Lexical(compile_output.lex_errors));
    }
    if !compile_output.syntax_errors.is_empty() {
        return Err(TranslateError::Syntax(compile_output.syntax_errors));
    }
    if !compile_output.translation_errors.is_empty() {
        return Err(TranslateError::Translation(compile_output.translation_errors));
    }
    return compile_output.code.ok_or_else(|| {
        TranslateError::Translation(vec![TranslationError::new(String::from("no AST to translate"))])
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_program_goes_all_the_way() {
        let output: CompileOutput = compile(
            "public class Hello { public static void main(String[] args) { System.out.println(\"hi\"); } }",
            &CompilerOptions::default()
        );
        assert!(output.is_ok());
        assert_eq!(output.halted_at(), None);
        assert!(output.code.unwrap().contains("print(\"hi\")"));
    }

    #[test]
    fn lexical_errors_stop_before_parsing() {
        let output: CompileOutput = compile(
            "public class Hello { public static void main(String[] args) { int a = 1 # 2; } }",
            &CompilerOptions::default()
        );
        assert_eq!(output.halted_at(), Some(ErrorKind::Lexical));
        assert!(output.ast.is_none());
        assert!(output.symbol_table.is_none());
        assert!(output.code.is_none());
        assert_eq!(output.error_count(), 1);
    }

    #[test]
    fn syntax_errors_stop_before_generation() {
        let output: CompileOutput = compile(
            "public class Hello { public static void main(String[] args) { int a = ; } }",
            &CompilerOptions::default()
        );
        assert_eq!(output.halted_at(), Some(ErrorKind::Syntax));
        assert!(output.code.is_none());
        assert!(output.translation_errors.is_empty());
    }

    #[test]
    fn fatal_parse_keeps_the_symbol_table() {
        let output: CompileOutput = compile("public class {", &CompilerOptions::default());
        assert_eq!(output.halted_at(), Some(ErrorKind::Syntax));
        assert!(output.ast.is_none());
        assert!(output.symbol_table.is_some());
        assert!(output.syntax_errors[0].fatal);
    }

    #[test]
    fn translate_reports_the_stopping_stage() {
        let failed: TranslateError = translate("public class A { public static void main(String[] args) { y = 5; } }").unwrap_err();
        assert_eq!(failed.kind(), ErrorKind::Syntax);

        let code: String = translate("public class A { public static void main(String[] args) { } }").unwrap();
        assert!(code.contains("def main():"));
    }
}

use javabridge::bridge::ast_node::Statement;
use javabridge::util::test::{get_tests, Test, TestType};
use javabridge::{compile, lex, parse, translate, CompileOutput, CompilerOptions, ErrorKind, LexOutput, ParseOutput};

fn in_main(body: &str) -> String {
    return format!(
        "public class Demo {{\n    public static void main(String[] args) {{\n{}\n    }}\n}}\n",
        body
    );
}

// ============================================================================
// END TO END SCENARIOS
// ============================================================================

#[test]
fn test_declaration_and_print() {
    let output: CompileOutput = compile(&in_main("int x = 10; System.out.println(x);"), &CompilerOptions::default());
    assert!(output.lex_errors.is_empty());
    assert!(output.syntax_errors.is_empty());

    let statements: &Vec<Statement> = &output.ast.as_ref().unwrap().main.statements;
    assert_eq!(statements.len(), 2);
    assert!(matches!(statements[0], Statement::Declaration(_)));
    assert!(matches!(statements[1], Statement::Call(_)));

    let code: String = output.code.unwrap();
    let assign_at: usize = code.find("x = 10").unwrap();
    let print_at: usize = code.find("print(x)").unwrap();
    assert!(assign_at < print_at);
}

#[test]
fn test_unrecognized_character_halts_before_parsing() {
    let output: CompileOutput = compile(&in_main("char c = @;"), &CompilerOptions::default());
    assert_eq!(output.lex_errors.len(), 1);
    assert!(output.lex_errors[0].message().contains("unrecognized character"));
    assert_eq!(output.lex_errors[0].text, "@");
    assert_eq!(output.halted_at(), Some(ErrorKind::Lexical));
    assert!(output.ast.is_none());
    assert!(output.syntax_errors.is_empty());
}

#[test]
fn test_unterminated_string() {
    let lexed: LexOutput = lex(&in_main("String s = \"unterminated;"));
    assert_eq!(lexed.errors.len(), 1);
    assert!(lexed.errors[0].message().contains("unterminated string"));
    assert_eq!(lexed.errors[0].position(), (3, 12));
}

#[test]
fn test_undeclared_assignment() {
    let lexed: LexOutput = lex(&in_main("y = 5;"));
    assert!(lexed.is_ok());

    let parsed: ParseOutput = parse(&lexed.tokens);
    assert!(!parsed.is_ok());
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].kind(), ErrorKind::Syntax);
    assert!(parsed.errors[0].message.contains("'y'"));
}

#[test]
fn test_do_while_ends_with_guarded_break() {
    let code: String = translate(&in_main("int x = 0; do { x++; } while (x < 5);")).unwrap();
    let loop_at: usize = code.find("while True:").unwrap();
    let tail: Vec<&str> = code[loop_at..].lines().take(4).collect();
    assert_eq!(tail, vec!["while True:", "        x += 1", "        if not (x < 5):", "            break"]);
}

// ============================================================================
// LOOPS
// ============================================================================

#[test]
fn test_counting_loop_uses_range() {
    let code: String = translate(&in_main("for (int i = 0; i < 3; i++) { System.out.println(i); }")).unwrap();
    assert!(code.contains("for i in range(0, 3):\n        print(i)"));
    assert!(!code.contains("i += 1"));
}

#[test]
fn test_inequality_loop_is_not_a_range() {
    let code: String = translate(&in_main("for (int i = 0; i != 3; i++) { System.out.println(i); }")).unwrap();
    assert!(!code.contains("range("));
    assert!(code.contains("    i = 0\n    while (i != 3):\n        print(i)\n        i += 1\n"));
}

#[test]
fn test_nested_blocks_indent() {
    let source: String = in_main("int n = 2; while (n > 0) { if (n == 1) { System.out.println(\"one\"); } n--; }");
    let code: String = translate(&source).unwrap();
    assert!(code.contains("    while (n > 0):\n        if (n == 1):\n            print(\"one\")\n        n -= 1\n"));
}

// ============================================================================
// OUTPUT SHAPE
// ============================================================================

#[test]
fn test_output_has_no_java_punctuation() {
    for sample in get_tests().iter().filter(|sample| sample.test_type == TestType::Translate) {
        let code: String = translate(&sample.test_code).unwrap();
        assert!(!code.is_empty());
        assert!(!code.contains(';'), "{} kept a ';'", sample.test_name);
        assert!(!code.contains('{') && !code.contains('}'), "{} kept a brace", sample.test_name);
    }
}

#[test]
fn test_declaration_assigns_once_before_use() {
    let code: String = translate(&in_main("int a = 4; int b = a * 2; System.out.println(b);")).unwrap();
    assert_eq!(code.matches("a = 4").count(), 1);
    assert!(code.find("a = 4").unwrap() < code.find("b = (a * 2)").unwrap());
}

#[test]
fn test_without_entry_point() {
    let options: CompilerOptions = CompilerOptions::default().with_entry_point(false);
    let output: CompileOutput = compile(&in_main("boolean ok = true;"), &options);
    assert_eq!(output.code.unwrap(), "ok = True\n");
}

// ============================================================================
// SAMPLE SUITE
// ============================================================================

#[test]
fn test_sample_programs_stop_where_expected() {
    let tests: Vec<Test> = get_tests();

    for sample in tests.iter() {
        let output: CompileOutput = compile(&sample.test_code, &CompilerOptions::default());
        match sample.test_type {
            TestType::Lex => assert_eq!(output.halted_at(), Some(ErrorKind::Lexical), "[{}] - {}", sample.test_type, sample.test_name),
            TestType::Parse => assert_eq!(output.halted_at(), Some(ErrorKind::Syntax), "[{}] - {}", sample.test_type, sample.test_name),
            TestType::Translate => assert!(output.is_ok(), "[{}] - {}: {:?} {:?}", sample.test_type, sample.test_name, output.syntax_errors, output.translation_errors)
        }
    }
}

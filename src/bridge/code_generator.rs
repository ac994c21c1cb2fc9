use std::collections::{HashMap, HashSet};

use string_builder::Builder;

use crate::bridge::ast::Program;
use crate::bridge::ast_node::*;
use crate::bridge::diagnostics::TranslationError;
use crate::bridge::parser::PRINT_CALLEE;
use crate::bridge::symbol_table::Type;
use crate::util::bridge_log::{self, LogSources, LogTypes};
use crate::util::options::CompilerOptions;

// Names that cannot be used as-is in the generated code: the Python keywords
// that are legal Java identifiers plus the builtins the output depends on
const PYTHON_RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "finally", "for",
    "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or",
    "pass", "raise", "return", "try", "while", "with", "yield", "print", "range", "main"
];

// The generated code and whatever could not be translated
#[derive (Debug)]
pub struct GenerateOutput {
    pub code: String,
    pub diagnostics: Vec<TranslationError>
}

impl GenerateOutput {
    pub fn is_ok(&self) -> bool {
        return self.diagnostics.is_empty();
    }
}

// Function to turn a source identifier into one that is safe in Python
pub fn python_name(name: &str) -> String {
    if PYTHON_RESERVED.contains(&name) {
        return format!("{}_", name);
    }
    return name.to_owned();
}

// The bounds of a for loop that can become a range
struct CountingLoop {
    variable: String,
    start: String,
    end: String
}

pub struct CodeGenerator {
    // Current nesting depth of the generated code
    indent_level: usize,

    // Spaces per nesting level
    indent_width: usize,

    emit_entry_point: bool,

    // Number of non-comment lines emitted so far, used to detect empty blocks
    statement_lines: usize,

    // Declared types of the variables visible at the current point, innermost block last
    scopes: Vec<HashMap<String, Type>>,

    code: Builder,

    diagnostics: Vec<TranslationError>
}

impl CodeGenerator {
    pub fn new(options: &CompilerOptions) -> Self {
        return CodeGenerator {
            indent_level: 0,
            indent_width: options.indent_width.max(1),
            emit_entry_point: options.emit_entry_point,
            statement_lines: 0,
            scopes: vec![HashMap::new()],
            code: Builder::default(),
            diagnostics: Vec::new()
        };
    }

    // Generates the Python program for the AST
    pub fn generate_code(mut self, program: &Program) -> GenerateOutput {
        bridge_log::log(
            LogTypes::Info,
            LogSources::CodeGenerator,
            format!("Generating code for class {}", program.class_name)
        );

        if self.emit_entry_point {
            self.add_line("# Translated from Java to Python");
            self.add_line(&format!("# Original class: {}", program.class_name));
            self.add_blank_line();
            self.add_line("def main():");
            self.code_gen_block(&program.main.statements, None);
            self.add_blank_line();
            self.add_line("if __name__ == \"__main__\":");
            self.indent();
            self.add_line("main()");
            self.dedent();
        } else {
            let before: usize = self.statement_lines;
            for statement in program.main.statements.iter() {
                self.code_gen_statement(statement);
            }
            if self.statement_lines == before {
                self.add_line("pass");
            }
        }

        let code: String = match self.code.string() {
            Ok(code) => code,
            Err(error) => {
                self.diagnostics.push(TranslationError::new(format!("generated code is not valid text: {}", error)));
                String::new()
            }
        };

        if self.diagnostics.is_empty() {
            bridge_log::log(LogTypes::Info, LogSources::CodeGenerator, String::from("Code generation completed with 0 errors"));
        } else {
            bridge_log::log(
                LogTypes::Error,
                LogSources::CodeGenerator,
                format!("Code generation finished with {} error(s)", self.diagnostics.len())
            );
        }

        return GenerateOutput {
            code,
            diagnostics: self.diagnostics
        };
    }

    // Emits an indented block; the optional tail runs after the statements
    fn code_gen_block(&mut self, statements: &[Statement], tail: Option<&Statement>) {
        self.indent();
        self.scopes.push(HashMap::new());
        let before: usize = self.statement_lines;

        for statement in statements.iter() {
            self.code_gen_statement(statement);
        }
        if let Some(tail_statement) = tail {
            self.code_gen_statement(tail_statement);
        }

        // Python does not allow an empty block
        if self.statement_lines == before {
            self.add_line("pass");
        }
        self.scopes.pop();
        self.dedent();
    }

    fn code_gen_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Declaration(declaration) => self.code_gen_declaration(declaration),
            Statement::Assignment(assignment) => {
                let value: String = self.code_gen_expression(&assignment.expr);
                self.add_line(&format!("{} = {}", python_name(&assignment.name), value));
            },
            Statement::If(if_statement) => self.code_gen_if(if_statement, "if"),
            Statement::For(for_statement) => self.code_gen_for(for_statement),
            Statement::While(while_statement) => {
                bridge_log::log(LogTypes::Debug, LogSources::CodeGenerator, String::from("Generating while loop"));
                let condition: String = self.code_gen_expression(&while_statement.condition);
                self.add_line(&format!("while {}:", condition));
                self.code_gen_block(&while_statement.body, None);
            },
            Statement::DoWhile(do_while) => self.code_gen_do_while(do_while),
            Statement::Call(call) => self.code_gen_call(call),
            Statement::IncrDecr(unary) => self.code_gen_step(unary),
            Statement::Comment(comment) => self.code_gen_comment(comment)
        }
    }

    fn code_gen_declaration(&mut self, declaration: &Declaration) {
        self.declare(&declaration.name, declaration.declared_type);
        let value: String = match &declaration.initializer {
            Some(initializer) => self.code_gen_expression(initializer),
            // A variable without a value starts out as None
            None => String::from("None")
        };
        self.add_line(&format!("{} = {}", python_name(&declaration.name), value));
    }

    // Generates an if, turning an else branch that only holds an if into elif
    fn code_gen_if(&mut self, if_statement: &IfStatement, keyword: &str) {
        bridge_log::log(LogTypes::Debug, LogSources::CodeGenerator, format!("Generating {}", keyword));

        let condition: String = self.code_gen_expression(&if_statement.condition);
        self.add_line(&format!("{} {}:", keyword, condition));
        self.code_gen_block(&if_statement.then_branch, None);

        match if_statement.else_branch.as_slice() {
            [] => {},
            [Statement::If(else_if)] => self.code_gen_if(else_if, "elif"),
            else_branch => {
                self.add_line("else:");
                self.code_gen_block(else_branch, None);
            }
        }
    }

    fn code_gen_for(&mut self, for_statement: &ForStatement) {
        // The header variables live in a scope around the loop
        self.scopes.push(HashMap::new());
        self.code_gen_for_loop(for_statement);
        self.scopes.pop();
    }

    fn code_gen_for_loop(&mut self, for_statement: &ForStatement) {
        if let Some(counting_loop) = self.counting_loop(for_statement) {
            bridge_log::log(
                LogTypes::Debug,
                LogSources::CodeGenerator,
                format!("Generating range loop over {}", counting_loop.variable)
            );
            self.add_line(&format!(
                "for {} in range({}, {}):",
                python_name(&counting_loop.variable),
                counting_loop.start,
                counting_loop.end
            ));
            self.declare(&counting_loop.variable, Type::Int);
            self.code_gen_block(&for_statement.body, None);
            return;
        }

        // Anything else becomes init; while cond: body; increment
        bridge_log::log(LogTypes::Debug, LogSources::CodeGenerator, String::from("Generating for loop as a while loop"));
        for init_statement in for_statement.init.iter() {
            self.code_gen_statement(init_statement);
        }
        let condition: String = match &for_statement.condition {
            Some(condition) => self.code_gen_expression(condition),
            None => String::from("True")
        };
        self.add_line(&format!("while {}:", condition));
        self.code_gen_block(&for_statement.body, for_statement.increment.as_deref());
    }

    // Checks if the loop can be written as a range without changing what it does
    fn counting_loop(&mut self, for_statement: &ForStatement) -> Option<CountingLoop> {
        // Exactly one int declared with a starting value
        let (variable, start_expr): (&String, &Expression) = match for_statement.init.as_slice() {
            [Statement::Declaration(Declaration { declared_type: Type::Int, name, initializer: Some(start), .. })] => (name, start),
            _ => return None
        };

        // variable < end or variable <= end
        let (inclusive, end_expr): (bool, &Expression) = match &for_statement.condition {
            Some(Expression::Binary(condition)) => {
                let inclusive: bool = match condition.operator {
                    BinaryOperator::Lt => false,
                    BinaryOperator::Le => true,
                    _ => return None
                };
                match &*condition.left {
                    Expression::Identifier(left) if &left.name == variable => {},
                    _ => return None
                }
                (inclusive, &*condition.right)
            },
            _ => return None
        };

        // variable++ or ++variable
        match for_statement.increment.as_deref() {
            Some(Statement::IncrDecr(step)) if step.operator == UnaryOperator::Increment => {
                match &*step.operand {
                    Expression::Identifier(stepped) if &stepped.name == variable => {},
                    _ => return None
                }
            },
            _ => return None
        }

        if start_expr.has_side_effects() || end_expr.has_side_effects() {
            return None;
        }

        // range() only takes ints, and the bound is computed before the variable exists
        if !self.is_int_expression(start_expr) || !self.is_int_expression(end_expr) || end_expr.identifiers().contains(variable) {
            return None;
        }

        // The body must leave the loop variable and the bound alone
        let mutated: HashSet<String> = block_mutations(&for_statement.body);
        if mutated.contains(variable) || end_expr.identifiers().iter().any(|name| mutated.contains(name)) {
            return None;
        }

        let start: String = self.code_gen_expression(start_expr);
        let end: String = match (inclusive, end_expr) {
            (false, _) => self.code_gen_expression(end_expr),
            (true, Expression::Literal(Literal { value, literal_type: Type::Int, .. })) => {
                match value.parse::<i64>().ok().and_then(|bound| bound.checked_add(1)) {
                    Some(bound) => bound.to_string(),
                    None => format!("{} + 1", value)
                }
            },
            (true, _) => format!("{} + 1", self.code_gen_expression(end_expr))
        };

        return Some(CountingLoop {
            variable: variable.to_owned(),
            start,
            end
        });
    }

    // Whether the expression is known to produce an int
    fn is_int_expression(&self, expression: &Expression) -> bool {
        return match expression {
            Expression::Literal(literal) => literal.literal_type == Type::Int,
            Expression::Identifier(identifier) => self.type_of(&identifier.name) == Some(Type::Int),
            Expression::Binary(binary) => {
                matches!(
                    binary.operator,
                    BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod
                ) && self.is_int_expression(&binary.left) && self.is_int_expression(&binary.right)
            },
            Expression::Unary(unary) => unary.operator != UnaryOperator::Not && self.is_int_expression(&unary.operand)
        };
    }

    fn declare(&mut self, name: &str, declared_type: Type) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_owned(), declared_type);
        }
    }

    // Type of the innermost declaration of a name seen so far
    fn type_of(&self, name: &str) -> Option<Type> {
        return self.scopes.iter().rev().find_map(|scope| scope.get(name).copied());
    }

    // do { body } while (cond); has no Python form, so loop forever and break out
    fn code_gen_do_while(&mut self, do_while: &DoWhileStatement) {
        bridge_log::log(LogTypes::Debug, LogSources::CodeGenerator, String::from("Generating do-while loop"));

        self.add_line("while True:");
        self.indent();
        self.scopes.push(HashMap::new());
        for statement in do_while.body.iter() {
            self.code_gen_statement(statement);
        }
        self.scopes.pop();
        let condition: String = self.code_gen_negation(&do_while.condition);
        self.add_line(&format!("if {}:", condition));
        self.indent();
        self.add_line("break");
        self.dedent();
        self.dedent();
    }

    fn code_gen_call(&mut self, call: &Call) {
        if call.callee_name != PRINT_CALLEE {
            self.add_diagnostic(format!("no translation for a call to '{}'", call.callee_name));
            return;
        }

        if call.args.len() > 1 {
            bridge_log::log(
                LogTypes::Warning,
                LogSources::CodeGenerator,
                format!("Only the first of {} print arguments is kept at {:?}", call.args.len(), call.position)
            );
        }

        let argument: String = match call.args.first() {
            Some(first) => self.code_gen_expression(first),
            None => String::new()
        };
        self.add_line(&format!("print({})", argument));
    }

    // x++; ++x; x--; --x;
    fn code_gen_step(&mut self, unary: &UnaryExpr) {
        let operator: &str = match unary.operator {
            UnaryOperator::Increment => "+=",
            UnaryOperator::Decrement => "-=",
            other => {
                self.add_diagnostic(format!("no translation for '{}' used as a statement", other));
                return;
            }
        };
        let target: String = self.code_gen_expression(&unary.operand);
        self.add_line(&format!("{} {} 1", target, operator));
    }

    fn code_gen_comment(&mut self, comment: &Comment) {
        match comment.style {
            CommentStyle::Line => {
                let text: &str = comment.text.strip_prefix("//").unwrap_or(&comment.text);
                self.add_comment(&format!("#{}", text.trim_end()));
            },
            CommentStyle::Block => {
                let inner: &str = comment.text.strip_prefix("/*").unwrap_or(&comment.text);
                let inner: &str = inner.strip_suffix("*/").unwrap_or(inner);

                let mut lines: Vec<&str> = inner
                    .lines()
                    .map(|line| {
                        let trimmed: &str = line.trim();
                        return trimmed.strip_prefix('*').unwrap_or(trimmed).trim();
                    })
                    .collect();

                // Drop the blank lines left by the opening and closing markers
                while lines.first().map_or(false, |line| line.is_empty()) {
                    lines.remove(0);
                }
                while lines.last().map_or(false, |line| line.is_empty()) {
                    lines.pop();
                }
                if lines.is_empty() {
                    self.add_comment("#");
                }
                for line in lines {
                    if line.is_empty() {
                        self.add_comment("#");
                    } else {
                        self.add_comment(&format!("# {}", line));
                    }
                }
            }
        }
    }

    // Translates an expression into Python text
    fn code_gen_expression(&mut self, expression: &Expression) -> String {
        return match expression {
            Expression::Binary(binary) => {
                let left: String = self.code_gen_expression(&binary.left);
                let right: String = self.code_gen_expression(&binary.right);
                let operator: String = match binary.operator {
                    BinaryOperator::And => String::from("and"),
                    BinaryOperator::Or => String::from("or"),
                    BinaryOperator::Div => String::from("//"),
                    other => other.to_string()
                };
                format!("({} {} {})", left, operator, right)
            },
            Expression::Unary(unary) => match unary.operator {
                UnaryOperator::Not => self.code_gen_negation(&unary.operand),
                UnaryOperator::Negate => format!("-{}", self.code_gen_expression(&unary.operand)),
                UnaryOperator::Increment | UnaryOperator::Decrement => {
                    // Only the value is kept; the step itself is lost inside expressions
                    bridge_log::log(
                        LogTypes::Warning,
                        LogSources::CodeGenerator,
                        format!("'{}' inside an expression at {:?} is emitted as its operand", unary.operator, unary.position)
                    );
                    self.code_gen_expression(&unary.operand)
                }
            },
            Expression::Literal(literal) => match (literal.literal_type, literal.value.as_str()) {
                (Type::Boolean, "true") => String::from("True"),
                (Type::Boolean, "false") => String::from("False"),
                _ => literal.value.to_owned()
            },
            Expression::Identifier(identifier) => python_name(&identifier.name)
        };
    }

    // not (...), without doubling the parentheses a binary expression already has
    fn code_gen_negation(&mut self, operand: &Expression) -> String {
        let translated: String = self.code_gen_expression(operand);
        return match operand {
            Expression::Binary(_) => format!("not {}", translated),
            _ => format!("not ({})", translated)
        };
    }

    fn add_diagnostic(&mut self, message: String) {
        let diagnostic: TranslationError = TranslationError::new(message);
        bridge_log::log(LogTypes::Error, LogSources::CodeGenerator, diagnostic.to_string());
        self.diagnostics.push(diagnostic);
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn add_indented(&mut self, text: &str) {
        self.code.append(" ".repeat(self.indent_level * self.indent_width));
        self.code.append(text);
        self.code.append("\n");
    }

    // Adds a statement line at the current depth
    fn add_line(&mut self, text: &str) {
        self.add_indented(text);
        self.statement_lines += 1;
    }

    // Comments do not count as statements, so a block of only comments still gets a pass
    fn add_comment(&mut self, text: &str) {
        self.add_indented(text);
    }

    fn add_blank_line(&mut self) {
        self.code.append("\n");
    }
}

// Generates Python code with the default options
pub fn generate(ast: Option<&Program>) -> GenerateOutput {
    return generate_with_options(ast, &CompilerOptions::default());
}

pub fn generate_with_options(ast: Option<&Program>, options: &CompilerOptions) -> GenerateOutput {
    return match ast {
        Some(program) => CodeGenerator::new(options).generate_code(program),
        None => {
            let diagnostic: TranslationError = TranslationError::new(String::from("no AST to translate"));
            bridge_log::log(LogTypes::Error, LogSources::CodeGenerator, diagnostic.to_string());
            GenerateOutput {
                code: String::new(),
                diagnostics: vec![diagnostic]
            }
        }
    };
}

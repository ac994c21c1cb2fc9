use crate::bridge::ast::{MainMethod, Program};
use crate::bridge::ast_node::*;
use crate::bridge::diagnostics::SyntaxError;
use crate::bridge::symbol_table::{SymbolTable, SymbolTableEntryField, Type};
use crate::bridge::token::{Keywords, Token, TokenType};
use crate::util::bridge_log::{self, LogSources, LogTypes};
use crate::util::options::CompilerOptions;

// The name the print call is recorded under
pub const PRINT_CALLEE: &str = "System.out.println";

// Everything the parser produces for one token stream
#[derive (Debug)]
pub struct ParseOutput {
    // None only when the parse was aborted
    pub ast: Option<Program>,
    pub symbol_table: SymbolTable,
    pub errors: Vec<SyntaxError>
}

impl ParseOutput {
    pub fn is_ok(&self) -> bool {
        return self.ast.is_some() && self.errors.is_empty();
    }
}

// A failure that stops the whole parse
#[derive (Debug)]
struct FatalParse {
    message: String
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    cur_token_index: usize,
    errors: Vec<SyntaxError>,
    symbol_table: SymbolTable,
    preserve_comments: bool
}

impl<'a> Parser<'a> {
    // Constructor for the parser
    pub fn new(tokens: &'a [Token], options: &CompilerOptions) -> Self {
        return Parser {
            tokens,
            cur_token_index: 0,
            errors: Vec::new(),
            symbol_table: SymbolTable::new(),
            preserve_comments: options.preserve_comments
        };
    }

    // Calls for a program to be parsed
    pub fn parse_program(mut self) -> ParseOutput {
        bridge_log::log(LogTypes::Info, LogSources::Parser, String::from("Parsing Program"));

        let ast: Option<Program> = match self.program() {
            Ok(program) => Some(program),
            Err(fatal) => {
                let (line, column, offending) = self.error_location();
                let mut fatal_error: SyntaxError = SyntaxError::new(fatal.message, line, column, offending);
                fatal_error.fatal = true;
                bridge_log::log(LogTypes::Error, LogSources::Parser, fatal_error.to_string());
                self.errors.push(fatal_error);
                None
            }
        };

        // Surface the errors in source order
        self.errors.sort_by_key(|error| (error.line, error.column));

        if ast.is_some() {
            self.symbol_table.mass_warnings();
        }

        if self.errors.is_empty() {
            bridge_log::log(LogTypes::Info, LogSources::Parser, String::from("Parser completed with 0 errors"));
        } else {
            bridge_log::log(
                LogTypes::Error,
                LogSources::Parser,
                format!("Parser failed with {} error{}", self.errors.len(), if self.errors.len() == 1 { "" } else { "s" })
            );
        }

        return ParseOutput {
            ast,
            symbol_table: self.symbol_table,
            errors: self.errors
        };
    }

    // Program := 'public' 'class' IDENT '{' Main '}'
    fn program(&mut self) -> Result<Program, FatalParse> {
        let position: (usize, usize) = self.peek().map_or((1, 1), |token| token.position);

        self.match_keyword(Keywords::Public);
        self.match_keyword(Keywords::Class);

        // Nothing sensible can be built without the class name
        let class_name: String = match self.peek() {
            Some(token) if token.token_type == TokenType::Identifier => {
                let name: String = token.text.to_owned();
                self.advance();
                name
            },
            _ => return Err(FatalParse { message: String::from("Expected the class name") })
        };

        self.match_token(TokenType::LBrace, "{");
        let main: MainMethod = self.main_method();
        self.match_token(TokenType::RBrace, "}");

        if let Some(extra) = self.peek() {
            let message: String = format!("Unexpected '{}' after the end of the class", extra.text);
            self.report_error(message);
        }

        return Ok(Program {
            class_name,
            main,
            position
        });
    }

    // Main := 'public' 'static' 'void' 'main' '(' 'String' '[' ']' IDENT ')' '{' Stmt* '}'
    fn main_method(&mut self) -> MainMethod {
        bridge_log::log(LogTypes::Debug, LogSources::Parser, String::from("Parsing Main"));
        let position: (usize, usize) = self.current_position();

        self.match_keyword(Keywords::Public);
        self.match_keyword(Keywords::Static);
        self.match_keyword(Keywords::Void);
        self.match_keyword(Keywords::Main);
        self.match_token(TokenType::LParen, "(");
        self.match_keyword(Keywords::String);
        self.match_token(TokenType::LBracket, "[");
        self.match_token(TokenType::RBracket, "]");
        let param_name: String = self.match_token(TokenType::Identifier, "parameter name")
            .map_or(String::from("args"), |token| token.text.to_owned());
        self.match_token(TokenType::RParen, ")");

        self.match_token(TokenType::LBrace, "{");
        let statements: Vec<Statement> = self.statement_list();
        self.match_token(TokenType::RBrace, "}");

        return MainMethod {
            param_name,
            statements,
            position
        };
    }

    // Parses statements until the closing brace of the block
    fn statement_list(&mut self) -> Vec<Statement> {
        let mut statements: Vec<Statement> = Vec::new();

        loop {
            // Statement-level comments become nodes only when asked for
            if self.preserve_comments {
                if let Some(comment) = self.raw_comment() {
                    statements.push(Statement::Comment(comment));
                    continue;
                }
            }

            match self.peek() {
                None => break,
                Some(token) if token.token_type == TokenType::RBrace => break,
                Some(_) => {
                    let start_index: usize = self.cur_token_index;
                    let parsed: Vec<Statement> = self.statement();

                    // Declarations may hand back several nodes, which all belong to this block
                    statements.extend(parsed);

                    // Skip a token when nothing could be parsed so the loop always moves forward
                    if self.cur_token_index == start_index {
                        self.advance();
                    }
                }
            }
        }

        return statements;
    }

    // Block := '{' Stmt* '}' in a scope of its own
    fn block(&mut self) -> Vec<Statement> {
        self.match_token(TokenType::LBrace, "{");
        self.symbol_table.new_scope();
        let statements: Vec<Statement> = self.statement_list();
        self.symbol_table.end_cur_scope();
        self.match_token(TokenType::RBrace, "}");
        return statements;
    }

    // Stmt := Decl | Assign | If | For | While | DoWhile | Print | IncrDecr
    fn statement(&mut self) -> Vec<Statement> {
        let next_token: &'a Token = match self.peek() {
            Some(token) => token,
            None => return Vec::new()
        };
        let following: Option<TokenType> = self.peek_nth(1).map(|token| token.token_type);

        return match next_token.token_type {
            TokenType::Keyword(keyword) if keyword.is_type() => {
                self.declaration().into_iter().map(Statement::Declaration).collect()
            },
            TokenType::Keyword(Keywords::If) => self.if_statement().into_iter().collect(),
            TokenType::Keyword(Keywords::For) => self.for_statement().into_iter().collect(),
            TokenType::Keyword(Keywords::While) => self.while_statement().into_iter().collect(),
            TokenType::Keyword(Keywords::Do) => self.do_while_statement().into_iter().collect(),
            TokenType::Identifier if next_token.text == "System" => self.print_statement().into_iter().collect(),
            TokenType::Identifier if following == Some(TokenType::Assign) => {
                self.assignment(true).into_iter().collect()
            },
            TokenType::Identifier if matches!(following, Some(TokenType::Incr) | Some(TokenType::Decr)) => {
                self.incr_decr(true).into_iter().collect()
            },
            TokenType::Incr | TokenType::Decr if following == Some(TokenType::Identifier) => {
                self.incr_decr(true).into_iter().collect()
            },
            _ => {
                let message: String = format!("Unrecognized statement starting with '{}'", next_token.text);
                self.report_error(message);
                Vec::new()
            }
        };
    }

    // Decl := Type IDENT ('=' Expr)? (',' IDENT ('=' Expr)?)* ';'
    fn declaration(&mut self) -> Vec<Declaration> {
        bridge_log::log(LogTypes::Debug, LogSources::Parser, String::from("Parsing Declaration"));
        let mut declarations: Vec<Declaration> = Vec::new();

        let declared_type: Type = match self.advance().map(|token| token.token_type) {
            Some(TokenType::Keyword(keyword)) => match Type::from_keyword(keyword) {
                Some(declared_type) => declared_type,
                None => return declarations
            },
            _ => return declarations
        };

        loop {
            let id_token: &'a Token = match self.match_token(TokenType::Identifier, "variable name") {
                Some(token) => token,
                None => return declarations
            };

            // The initializer is parsed before the name exists, so int x = x; is an error
            let mut initializer: Option<Expression> = None;
            if self.peek_is(TokenType::Assign) {
                self.advance();
                initializer = self.expression();
            }

            if let Err(duplicate) = self.symbol_table.new_identifier(&id_token.text, declared_type, id_token.position) {
                self.report_error_at(duplicate.to_string(), id_token);
            }

            declarations.push(Declaration {
                declared_type,
                name: id_token.text.to_owned(),
                initializer,
                position: id_token.position
            });

            if self.peek_is(TokenType::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        self.match_token(TokenType::Semicolon, ";");
        return declarations;
    }

    // Assign := IDENT '=' Expr ';'
    fn assignment(&mut self, with_semicolon: bool) -> Option<Statement> {
        bridge_log::log(LogTypes::Debug, LogSources::Parser, String::from("Parsing Assignment"));

        let id_token: &'a Token = self.match_token(TokenType::Identifier, "variable name")?;
        self.check_declared(id_token);
        self.match_token(TokenType::Assign, "=");
        let expr: Option<Expression> = self.expression();
        if with_semicolon {
            self.match_token(TokenType::Semicolon, ";");
        }

        return expr.map(|expr| Statement::Assignment(Assignment {
            name: id_token.text.to_owned(),
            expr,
            position: id_token.position
        }));
    }

    // IncrDecr := IDENT ('++'|'--') ';' | ('++'|'--') IDENT ';'
    fn incr_decr(&mut self, with_semicolon: bool) -> Option<Statement> {
        bridge_log::log(LogTypes::Debug, LogSources::Parser, String::from("Parsing IncrDecr"));

        let first: &'a Token = self.advance()?;
        let (op_token, id_token, is_prefix) = if first.token_type == TokenType::Identifier {
            let op_token: &'a Token = self.advance()?;
            (op_token, first, false)
        } else {
            let id_token: &'a Token = self.match_token(TokenType::Identifier, "variable name")?;
            (first, id_token, true)
        };
        self.check_declared(id_token);

        if with_semicolon {
            self.match_token(TokenType::Semicolon, ";");
        }

        let operator: UnaryOperator = UnaryOperator::from_token_type(op_token.token_type)?;
        return Some(Statement::IncrDecr(UnaryExpr {
            operator,
            operand: Box::new(Expression::Identifier(Identifier {
                name: id_token.text.to_owned(),
                position: id_token.position
            })),
            is_prefix,
            position: first.position
        }));
    }

    // If := 'if' '(' Expr ')' Block ('else' (If | Block))?
    fn if_statement(&mut self) -> Option<Statement> {
        bridge_log::log(LogTypes::Debug, LogSources::Parser, String::from("Parsing If"));
        let position: (usize, usize) = self.current_position();

        self.match_keyword(Keywords::If);
        self.match_token(TokenType::LParen, "(");
        let condition: Option<Expression> = self.expression();
        self.match_token(TokenType::RParen, ")");
        let then_branch: Vec<Statement> = self.block();

        let mut else_branch: Vec<Statement> = Vec::new();
        if self.peek_is(TokenType::Keyword(Keywords::Else)) {
            self.advance();
            if self.peek_is(TokenType::Keyword(Keywords::If)) {
                else_branch.extend(self.if_statement());
            } else {
                else_branch = self.block();
            }
        }

        return condition.map(|condition| Statement::If(IfStatement {
            condition,
            then_branch,
            else_branch,
            position
        }));
    }

    // For := 'for' '(' (Decl | Assign | ';') Expr? ';' Update? ')' Block
    fn for_statement(&mut self) -> Option<Statement> {
        bridge_log::log(LogTypes::Debug, LogSources::Parser, String::from("Parsing For"));
        let position: (usize, usize) = self.current_position();

        self.match_keyword(Keywords::For);
        self.match_token(TokenType::LParen, "(");

        // The header gets its own scope so the loop variable dies with the loop
        self.symbol_table.new_scope();

        let mut init: Vec<Statement> = Vec::new();
        let next_type: Option<TokenType> = self.peek().map(|token| token.token_type);
        match next_type {
            Some(TokenType::Keyword(keyword)) if keyword.is_type() => {
                init.extend(self.declaration().into_iter().map(Statement::Declaration));
            },
            Some(TokenType::Identifier) => init.extend(self.assignment(true)),
            Some(TokenType::Semicolon) => {
                self.advance();
            },
            _ => self.report_error(String::from("Expected a for-loop initializer"))
        }

        let condition: Option<Expression> = if self.peek_is(TokenType::Semicolon) {
            None
        } else {
            self.expression()
        };
        self.match_token(TokenType::Semicolon, ";");

        let increment: Option<Box<Statement>> = if self.peek_is(TokenType::RParen) {
            None
        } else {
            self.for_update().map(Box::new)
        };
        self.match_token(TokenType::RParen, ")");

        let body: Vec<Statement> = self.block();

        self.symbol_table.end_cur_scope();

        return Some(Statement::For(ForStatement {
            init,
            condition,
            increment,
            body,
            position
        }));
    }

    // Update := IDENT ('++'|'--') | ('++'|'--') IDENT | IDENT '=' Expr
    fn for_update(&mut self) -> Option<Statement> {
        let following: Option<TokenType> = self.peek_nth(1).map(|token| token.token_type);

        return match (self.peek().map(|token| token.token_type), following) {
            (Some(TokenType::Identifier), Some(TokenType::Assign)) => self.assignment(false),
            (Some(TokenType::Identifier), Some(TokenType::Incr)) | (Some(TokenType::Identifier), Some(TokenType::Decr)) => self.incr_decr(false),
            (Some(TokenType::Incr), _) | (Some(TokenType::Decr), _) => self.incr_decr(false),
            _ => {
                self.report_error(String::from("Expected a for-loop update such as i++"));
                None
            }
        };
    }

    // While := 'while' '(' Expr ')' Block
    fn while_statement(&mut self) -> Option<Statement> {
        bridge_log::log(LogTypes::Debug, LogSources::Parser, String::from("Parsing While"));
        let position: (usize, usize) = self.current_position();

        self.match_keyword(Keywords::While);
        self.match_token(TokenType::LParen, "(");
        let condition: Option<Expression> = self.expression();
        self.match_token(TokenType::RParen, ")");
        let body: Vec<Statement> = self.block();

        return condition.map(|condition| Statement::While(WhileStatement {
            condition,
            body,
            position
        }));
    }

    // DoWhile := 'do' Block 'while' '(' Expr ')' ';'
    fn do_while_statement(&mut self) -> Option<Statement> {
        bridge_log::log(LogTypes::Debug, LogSources::Parser, String::from("Parsing DoWhile"));
        let position: (usize, usize) = self.current_position();

        self.match_keyword(Keywords::Do);
        let body: Vec<Statement> = self.block();
        self.match_keyword(Keywords::While);
        self.match_token(TokenType::LParen, "(");
        let condition: Option<Expression> = self.expression();
        self.match_token(TokenType::RParen, ")");
        self.match_token(TokenType::Semicolon, ";");

        return condition.map(|condition| Statement::DoWhile(DoWhileStatement {
            body,
            condition,
            position
        }));
    }

    // Print := 'System' '.' 'out' '.' 'println' '(' (Expr (',' Expr)*)? ')' ';'
    fn print_statement(&mut self) -> Option<Statement> {
        bridge_log::log(LogTypes::Debug, LogSources::Parser, String::from("Parsing Print"));
        let position: (usize, usize) = self.current_position();

        self.match_identifier("System");
        self.match_token(TokenType::Dot, ".");
        self.match_identifier("out");
        self.match_token(TokenType::Dot, ".");
        self.match_identifier("println");
        self.match_token(TokenType::LParen, "(");

        let mut args: Vec<Expression> = Vec::new();
        let mut args_ok: bool = true;
        if !self.peek_is(TokenType::RParen) {
            loop {
                match self.expression() {
                    Some(arg) => args.push(arg),
                    None => args_ok = false
                }
                if self.peek_is(TokenType::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.match_token(TokenType::RParen, ")");
        self.match_token(TokenType::Semicolon, ";");

        if !args_ok {
            return None;
        }
        return Some(Statement::Call(Call {
            callee_name: String::from(PRINT_CALLEE),
            args,
            position
        }));
    }

    // Expr := Or
    fn expression(&mut self) -> Option<Expression> {
        return self.or_expression();
    }

    // Or := And ('||' And)*
    fn or_expression(&mut self) -> Option<Expression> {
        return self.binary_tier(&[TokenType::Or], Self::and_expression);
    }

    // And := Eq ('&&' Eq)*
    fn and_expression(&mut self) -> Option<Expression> {
        return self.binary_tier(&[TokenType::And], Self::equality_expression);
    }

    // Eq := Rel (('=='|'!=') Rel)*
    fn equality_expression(&mut self) -> Option<Expression> {
        return self.binary_tier(&[TokenType::Eq, TokenType::Neq], Self::relational_expression);
    }

    // Rel := Add (('<'|'>'|'<='|'>=') Add)*
    fn relational_expression(&mut self) -> Option<Expression> {
        return self.binary_tier(&[TokenType::Lt, TokenType::Gt, TokenType::Le, TokenType::Ge], Self::additive_expression);
    }

    // Add := Mul (('+'|'-') Mul)*
    fn additive_expression(&mut self) -> Option<Expression> {
        return self.binary_tier(&[TokenType::Plus, TokenType::Minus], Self::multiplicative_expression);
    }

    // Mul := Unary (('*'|'/'|'%') Unary)*
    fn multiplicative_expression(&mut self) -> Option<Expression> {
        return self.binary_tier(&[TokenType::Star, TokenType::Slash, TokenType::Percent], Self::unary_expression);
    }

    // One left-associative precedence level; a missing operand ends the rule
    fn binary_tier(&mut self, operators: &[TokenType], operand: fn(&mut Self) -> Option<Expression>) -> Option<Expression> {
        let mut left: Expression = operand(self)?;

        while let Some(op_token) = self.peek() {
            let operator: BinaryOperator = match BinaryOperator::from_token_type(op_token.token_type) {
                Some(operator) if operators.contains(&op_token.token_type) => operator,
                _ => break
            };
            self.advance();

            let right: Expression = operand(self)?;
            let position: (usize, usize) = left.position();
            left = Expression::Binary(BinaryExpr {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                position
            });
        }

        return Some(left);
    }

    // Unary := ('!'|'-'|'++'|'--') Primary | Primary
    fn unary_expression(&mut self) -> Option<Expression> {
        let operator: Option<UnaryOperator> = self.peek().and_then(|token| UnaryOperator::from_token_type(token.token_type));

        if let Some(operator) = operator {
            let position: (usize, usize) = self.current_position();
            self.advance();
            let operand: Expression = self.primary_expression()?;
            return Some(Expression::Unary(UnaryExpr {
                operator,
                operand: Box::new(operand),
                is_prefix: true,
                position
            }));
        }

        return self.primary_expression();
    }

    // Primary := NUMBER | STRING | CHAR | BOOL | IDENT ('++'|'--')? | '(' Expr ')'
    fn primary_expression(&mut self) -> Option<Expression> {
        let token: &'a Token = match self.peek() {
            Some(token) => token,
            None => {
                self.report_error(String::from("Expected an expression but reached the end of the input"));
                return None;
            }
        };

        let literal_type: Option<Type> = match token.token_type {
            TokenType::Integer => Some(Type::Int),
            TokenType::Decimal => Some(Type::Double),
            TokenType::StringLiteral => Some(Type::String),
            TokenType::CharLiteral => Some(Type::Char),
            TokenType::Keyword(Keywords::True) | TokenType::Keyword(Keywords::False) => Some(Type::Boolean),
            _ => None
        };
        if let Some(literal_type) = literal_type {
            self.advance();
            return Some(Expression::Literal(Literal {
                value: token.text.to_owned(),
                literal_type,
                position: token.position
            }));
        }

        match token.token_type {
            TokenType::Identifier => {
                self.advance();
                self.check_declared(token);
                let identifier: Expression = Expression::Identifier(Identifier {
                    name: token.text.to_owned(),
                    position: token.position
                });

                // x++ inside an expression
                let postfix: Option<UnaryOperator> = match self.peek().map(|next| next.token_type) {
                    Some(TokenType::Incr) => Some(UnaryOperator::Increment),
                    Some(TokenType::Decr) => Some(UnaryOperator::Decrement),
                    _ => None
                };
                if let Some(operator) = postfix {
                    self.advance();
                    return Some(Expression::Unary(UnaryExpr {
                        operator,
                        operand: Box::new(identifier),
                        is_prefix: false,
                        position: token.position
                    }));
                }
                return Some(identifier);
            },
            TokenType::LParen => {
                self.advance();
                let inner: Option<Expression> = self.expression();
                self.match_token(TokenType::RParen, ")");
                return inner;
            },
            _ => {
                self.report_error(format!("Unexpected token '{}' in expression", token.text));
                return None;
            }
        }
    }

    // Reports a use of an identifier that is not visible, or marks it as used
    fn check_declared(&mut self, id_token: &Token) {
        if self.symbol_table.set_entry_field(&id_token.text, SymbolTableEntryField::Used).is_err() {
            self.report_error_at(format!("Variable '{}' has not been declared", id_token.text), id_token);
        }
    }

    // Index of the next token that is not a comment
    fn next_index(&self, from: usize) -> usize {
        let mut index: usize = from;
        while index < self.tokens.len() && self.tokens[index].is_comment() {
            index += 1;
        }
        return index;
    }

    fn peek(&self) -> Option<&'a Token> {
        return self.tokens.get(self.next_index(self.cur_token_index));
    }

    // Looks n tokens past the next one, skipping comments
    fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        let mut index: usize = self.next_index(self.cur_token_index);
        for _i in 0..n {
            index = self.next_index(index + 1);
        }
        return self.tokens.get(index);
    }

    fn peek_is(&self, token_type: TokenType) -> bool {
        return self.peek().map_or(false, |token| token.token_type == token_type);
    }

    // Consumes the next token that is not a comment
    fn advance(&mut self) -> Option<&'a Token> {
        let index: usize = self.next_index(self.cur_token_index);
        let token: Option<&'a Token> = self.tokens.get(index);
        if token.is_some() {
            self.cur_token_index = index + 1;
        }
        return token;
    }

    // A comment sitting exactly at the current position
    fn raw_comment(&mut self) -> Option<Comment> {
        let token: &'a Token = self.tokens.get(self.cur_token_index)?;
        let style: CommentStyle = match token.token_type {
            TokenType::LineComment => CommentStyle::Line,
            TokenType::BlockComment => CommentStyle::Block,
            _ => return None
        };
        self.cur_token_index += 1;

        return Some(Comment {
            text: token.text.to_owned(),
            style,
            position: token.position
        });
    }

    fn current_position(&self) -> (usize, usize) {
        let (line, column, _) = self.error_location();
        return (line, column);
    }

    // Function to ensure the token is correct
    fn match_token(&mut self, expected_token: TokenType, description: &str) -> Option<&'a Token> {
        match self.peek() {
            Some(token) if token.token_type == expected_token => {
                return self.advance();
            },
            Some(token) => {
                let message: String = format!("Expected '{}' but found '{}'", description, token.text);
                self.report_error(message);
            },
            None => {
                let message: String = format!("Expected '{}' but reached the end of the input", description);
                self.report_error(message);
            }
        }
        return None;
    }

    fn match_keyword(&mut self, keyword: Keywords) -> Option<&'a Token> {
        return self.match_token(TokenType::Keyword(keyword), &keyword.to_string());
    }

    // Identifiers with a fixed spelling, such as the parts of System.out.println
    fn match_identifier(&mut self, expected_text: &str) -> Option<&'a Token> {
        match self.peek() {
            Some(token) if token.token_type == TokenType::Identifier && token.text == expected_text => {
                return self.advance();
            },
            Some(token) => {
                let message: String = format!("Expected '{}' but found '{}'", expected_text, token.text);
                self.report_error(message);
            },
            None => {
                let message: String = format!("Expected '{}' but reached the end of the input", expected_text);
                self.report_error(message);
            }
        }
        return None;
    }

    // Where an error at the current position should point; the end of input
    // is reported at the last token
    fn error_location(&self) -> (usize, usize, String) {
        if let Some(token) = self.peek() {
            return (token.line(), token.column(), token.text.to_owned());
        }
        return match self.tokens.last() {
            Some(last) => (last.line(), last.column(), String::from("EOF")),
            None => (1, 1, String::from("EOF"))
        };
    }

    fn report_error(&mut self, message: String) {
        let (line, column, offending) = self.error_location();
        self.push_error(SyntaxError::new(message, line, column, offending));
    }

    fn report_error_at(&mut self, message: String, token: &Token) {
        self.push_error(SyntaxError::new(message, token.line(), token.column(), token.text.to_owned()));
    }

    fn push_error(&mut self, error: SyntaxError) {
        bridge_log::log(LogTypes::Error, LogSources::Parser, error.to_string());
        self.errors.push(error);
    }
}

// Parses a token stream with the default options
pub fn parse(tokens: &[Token]) -> ParseOutput {
    return parse_with_options(tokens, &CompilerOptions::default());
}

pub fn parse_with_options(tokens: &[Token], options: &CompilerOptions) -> ParseOutput {
    return Parser::new(tokens, options).parse_program();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::lexer::lex;

    fn wrap(body: &str) -> String {
        return format!("public class Demo {{\n    public static void main(String[] args) {{\n{}\n    }}\n}}\n", body);
    }

    fn parse_body(body: &str) -> ParseOutput {
        let tokens: Vec<Token> = lex(&wrap(body)).tokens;
        return parse(&tokens);
    }

    fn statements(output: &ParseOutput) -> &Vec<Statement> {
        return &output.ast.as_ref().expect("program should parse").main.statements;
    }

    #[test]
    fn minimal_program() {
        let output: ParseOutput = parse_body("");
        assert!(output.is_ok(), "{:?}", output.errors);
        let program: &Program = output.ast.as_ref().unwrap();
        assert_eq!(program.class_name, "Demo");
        assert_eq!(program.main.param_name, "args");
        assert!(program.main.statements.is_empty());
    }

    #[test]
    fn multi_declarations_are_spliced() {
        let output: ParseOutput = parse_body("int a, b = 2, c; a = b; c = a;");
        assert!(output.is_ok(), "{:?}", output.errors);
        let names: Vec<String> = statements(&output)
            .iter()
            .filter_map(|statement| match statement {
                Statement::Declaration(declaration) => Some(declaration.name.to_owned()),
                _ => None
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(statements(&output).len(), 5);
    }

    #[test]
    fn precedence_and_left_associativity() {
        let output: ParseOutput = parse_body("int r = 1 - 2 - 3 * 4;");
        assert!(output.is_ok(), "{:?}", output.errors);

        let initializer: &Expression = match &statements(&output)[0] {
            Statement::Declaration(declaration) => declaration.initializer.as_ref().unwrap(),
            other => panic!("unexpected {:?}", other)
        };
        // ((1 - 2) - (3 * 4))
        match initializer {
            Expression::Binary(outer) => {
                assert_eq!(outer.operator, BinaryOperator::Sub);
                assert!(matches!(&*outer.left, Expression::Binary(inner) if inner.operator == BinaryOperator::Sub));
                assert!(matches!(&*outer.right, Expression::Binary(inner) if inner.operator == BinaryOperator::Mul));
            },
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn undeclared_assignment_is_one_error() {
        let output: ParseOutput = parse_body("y = 5;");
        assert!(!output.is_ok());
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].message.contains("'y'"));
        assert!(output.errors[0].message.contains("not been declared"));
        assert_eq!(output.errors[0].offending_token, "y");
    }

    #[test]
    fn duplicate_declaration_is_reported_at_the_second_name() {
        let output: ParseOutput = parse_body("int x = 1;\ndouble x = 2.0;");
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].message.contains("already been declared"));
        assert_eq!(output.errors[0].line, 4);
    }

    #[test]
    fn for_variable_is_invisible_after_the_loop() {
        let output: ParseOutput = parse_body("for (int i = 0; i < 3; i++) { System.out.println(i); }\nSystem.out.println(i);");
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].message.contains("'i'"));
        assert_eq!(output.errors[0].line, 4);
    }

    #[test]
    fn sibling_blocks_may_reuse_names() {
        let output: ParseOutput = parse_body("boolean f = true; if (f) { int t = 1; } else { int t = 2; }");
        assert!(output.is_ok(), "{:?}", output.errors);
    }

    #[test]
    fn comments_are_skipped_by_default() {
        let output: ParseOutput = parse_body("// a note\nint x = /* inline */ 3;\n/* block */");
        assert!(output.is_ok(), "{:?}", output.errors);
        assert_eq!(statements(&output).len(), 1);
    }

    #[test]
    fn comments_become_nodes_when_preserved() {
        let tokens: Vec<Token> = lex(&wrap("// a note\nint x = /* inline */ 3;")).tokens;
        let output: ParseOutput = parse_with_options(&tokens, &CompilerOptions::default().with_comments(true));
        assert!(output.is_ok(), "{:?}", output.errors);
        assert!(matches!(&statements(&output)[0], Statement::Comment(comment) if comment.style == CommentStyle::Line));
        assert!(matches!(&statements(&output)[1], Statement::Declaration(_)));
        assert_eq!(statements(&output).len(), 2);
    }

    #[test]
    fn else_if_nests_one_if() {
        let output: ParseOutput = parse_body("int n = 3; if (n > 2) { n = 0; } else if (n > 1) { n = 1; } else { n = 2; }");
        assert!(output.is_ok(), "{:?}", output.errors);
        match &statements(&output)[1] {
            Statement::If(if_statement) => {
                assert_eq!(if_statement.else_branch.len(), 1);
                assert!(matches!(&if_statement.else_branch[0], Statement::If(inner) if inner.else_branch.len() == 1));
            },
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn for_header_parts() {
        let output: ParseOutput = parse_body("int k; for (k = 10; k > 0; --k) { } for (;;) { }");
        assert!(output.is_ok(), "{:?}", output.errors);
        match &statements(&output)[1] {
            Statement::For(for_statement) => {
                assert!(matches!(&for_statement.init[0], Statement::Assignment(_)));
                assert!(matches!(for_statement.increment.as_deref(), Some(Statement::IncrDecr(step)) if step.is_prefix));
            },
            other => panic!("unexpected {:?}", other)
        }
        match &statements(&output)[2] {
            Statement::For(for_statement) => {
                assert!(for_statement.init.is_empty());
                assert!(for_statement.condition.is_none());
                assert!(for_statement.increment.is_none());
            },
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn increments_inside_expressions_record_their_side() {
        let output: ParseOutput = parse_body("int x = 1; int y = x++; System.out.println(++x); int z = x-- -1;");
        assert!(output.is_ok(), "{:?}", output.errors);

        match &statements(&output)[1] {
            Statement::Declaration(Declaration { initializer: Some(Expression::Unary(unary)), .. }) => {
                assert_eq!(unary.operator, UnaryOperator::Increment);
                assert!(!unary.is_prefix);
            },
            other => panic!("unexpected {:?}", other)
        }
        match &statements(&output)[2] {
            Statement::Call(call) => {
                assert!(matches!(&call.args[0], Expression::Unary(unary) if unary.operator == UnaryOperator::Increment && unary.is_prefix));
            },
            other => panic!("unexpected {:?}", other)
        }
        match &statements(&output)[3] {
            Statement::Declaration(Declaration { initializer: Some(Expression::Binary(binary)), .. }) => {
                assert_eq!(binary.operator, BinaryOperator::Sub);
                assert!(matches!(&*binary.left, Expression::Unary(unary) if unary.operator == UnaryOperator::Decrement && !unary.is_prefix));
            },
            other => panic!("unexpected {:?}", other)
        }
    }

    #[test]
    fn print_keeps_every_argument() {
        let output: ParseOutput = parse_body("System.out.println(\"a\", 1); System.out.println();");
        assert!(output.is_ok(), "{:?}", output.errors);
        assert!(matches!(&statements(&output)[0], Statement::Call(call) if call.callee_name == PRINT_CALLEE && call.args.len() == 2));
        assert!(matches!(&statements(&output)[1], Statement::Call(call) if call.args.is_empty()));
    }

    #[test]
    fn missing_semicolon_is_reported_and_parsing_continues() {
        let output: ParseOutput = parse_body("int x = 1\nint y = 2;");
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].message.contains("';'"));
        assert_eq!(output.errors[0].offending_token, "int");
        assert_eq!(statements(&output).len(), 2);
    }

    #[test]
    fn missing_class_name_is_fatal() {
        let tokens: Vec<Token> = lex("public class { }").tokens;
        let output: ParseOutput = parse(&tokens);
        assert!(output.ast.is_none());
        assert_eq!(output.errors.len(), 1);
        assert!(output.errors[0].fatal);
    }

    #[test]
    fn end_of_input_errors_point_at_the_last_token() {
        let tokens: Vec<Token> = lex("public class Demo {").tokens;
        let output: ParseOutput = parse(&tokens);
        assert!(!output.errors.is_empty());
        assert!(output.errors.iter().all(|error| error.offending_token == "EOF"));
        assert!(output.errors.iter().all(|error| error.position() == (1, 19)));
    }

    #[test]
    fn errors_come_back_in_source_order() {
        let output: ParseOutput = parse_body("a = 1;\nint b = c;\nd++;");
        let lines: Vec<usize> = output.errors.iter().map(|error| error.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }
}

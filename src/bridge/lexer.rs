use std::str::FromStr;

use crate::bridge::diagnostics::{LexicalError, LexicalIssue};
use crate::bridge::token::{Keywords, Token, TokenType};
use crate::util::bridge_log::{self, LogSources, LogTypes};

// Everything the scanner produces for one source text
#[derive (Debug, Clone, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexicalError>
}

impl LexOutput {
    pub fn is_ok(&self) -> bool {
        return self.errors.is_empty();
    }
}

// The states of the automaton. Dispatch looks at the current character and
// picks one of the others, which each consume exactly one lexeme (or one
// offending character) before handing control back to Dispatch.
#[derive (Debug, Clone, Copy, PartialEq)]
enum LexerState {
    Dispatch,
    Whitespace,
    IdentifierOrKeyword,
    Number,
    StringLiteral,
    CharLiteral,
    LineComment,
    BlockComment,
    Operator,
    Unrecognized,
    Done
}

// Sub-states while reading a number
#[derive (Debug, Clone, Copy, PartialEq)]
enum NumberState {
    Sign,
    IntegerPart,
    FractionStart,
    FractionPart
}

// Operators made of two characters, matched before any single character one
const TWO_CHAR_OPERATORS: [(char, char, TokenType); 8] = [
    ('=', '=', TokenType::Eq),
    ('!', '=', TokenType::Neq),
    ('>', '=', TokenType::Ge),
    ('<', '=', TokenType::Le),
    ('+', '+', TokenType::Incr),
    ('-', '-', TokenType::Decr),
    ('&', '&', TokenType::And),
    ('|', '|', TokenType::Or)
];

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    errors: Vec<LexicalError>
}

impl Lexer {
    // Constructor for the lexer
    pub fn new(source_code: &str) -> Self {
        return Lexer {
            source: source_code.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new()
        };
    }

    // Runs the automaton over the whole source
    pub fn lex_program(mut self) -> LexOutput {
        let mut state: LexerState = LexerState::Dispatch;

        while state != LexerState::Done {
            state = match state {
                LexerState::Dispatch => self.dispatch(),
                LexerState::Whitespace => {
                    self.advance();
                    LexerState::Dispatch
                },
                LexerState::IdentifierOrKeyword => {
                    self.read_identifier();
                    LexerState::Dispatch
                },
                LexerState::Number => {
                    self.read_number();
                    LexerState::Dispatch
                },
                LexerState::StringLiteral => {
                    self.read_string();
                    LexerState::Dispatch
                },
                LexerState::CharLiteral => {
                    self.read_char();
                    LexerState::Dispatch
                },
                LexerState::LineComment => {
                    self.read_line_comment();
                    LexerState::Dispatch
                },
                LexerState::BlockComment => {
                    self.read_block_comment();
                    LexerState::Dispatch
                },
                LexerState::Operator => {
                    self.read_operator();
                    LexerState::Dispatch
                },
                LexerState::Unrecognized => {
                    // Report the character and step over it so the scan always makes progress
                    let (line, column) = (self.line, self.column);
                    let bad_char: String = self.current().map(String::from).unwrap_or_default();
                    self.advance();
                    self.add_error(bad_char, LexicalIssue::UnrecognizedCharacter, line, column);
                    LexerState::Dispatch
                },
                LexerState::Done => LexerState::Done
            };
        }

        return LexOutput {
            tokens: self.tokens,
            errors: self.errors
        };
    }

    // Decides which state handles the current character
    fn dispatch(&self) -> LexerState {
        let cur_char: char = match self.current() {
            Some(c) => c,
            None => return LexerState::Done
        };
        let next_char: Option<char> = self.peek(1);

        return match cur_char {
            ' ' | '\t' | '\r' | '\n' => LexerState::Whitespace,
            '/' if next_char == Some('/') => LexerState::LineComment,
            '/' if next_char == Some('*') => LexerState::BlockComment,
            c if is_identifier_start(c) => LexerState::IdentifierOrKeyword,
            c if c.is_ascii_digit() => LexerState::Number,
            '-' if next_char.map_or(false, |c| c.is_ascii_digit()) && !self.follows_operand() => LexerState::Number,
            '"' => LexerState::StringLiteral,
            '\'' => LexerState::CharLiteral,
            c if is_operator_start(c, next_char) => LexerState::Operator,
            _ => LexerState::Unrecognized
        };
    }

    // Identifiers: [A-Za-z_][A-Za-z0-9_]*, reclassified as keywords when reserved
    fn read_identifier(&mut self) {
        let (line, column, start) = (self.line, self.column, self.pos);

        while let Some(c) = self.current() {
            if is_identifier_part(c) {
                self.advance();
            } else {
                break;
            }
        }

        let lexeme: String = self.slice_from(start);
        let token_type: TokenType = match Keywords::from_str(&lexeme) {
            Ok(keyword) => TokenType::Keyword(keyword),
            Err(_) => TokenType::Identifier
        };
        self.add_token(token_type, lexeme, line, column);
    }

    // Numbers: optional sign, digits, then an optional single '.' with digits
    fn read_number(&mut self) {
        let (line, column, start) = (self.line, self.column, self.pos);
        let mut num_state: NumberState = NumberState::Sign;

        loop {
            let cur_char: Option<char> = self.current();
            match (num_state, cur_char) {
                (NumberState::Sign, Some('-')) => {
                    self.advance();
                    num_state = NumberState::IntegerPart;
                },
                (NumberState::Sign, _) => num_state = NumberState::IntegerPart,
                (NumberState::IntegerPart, Some(c)) if c.is_ascii_digit() => self.advance(),
                (NumberState::IntegerPart, Some('.')) => {
                    self.advance();
                    num_state = NumberState::FractionStart;
                },
                (NumberState::FractionStart, Some(c)) | (NumberState::FractionPart, Some(c)) if c.is_ascii_digit() => {
                    self.advance();
                    num_state = NumberState::FractionPart;
                },
                (NumberState::FractionStart, Some('.')) | (NumberState::FractionPart, Some('.')) => {
                    // A second point; swallow the rest of the run so it only counts once
                    while let Some(c) = self.current() {
                        if c.is_ascii_digit() || c == '.' {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    let lexeme: String = self.slice_from(start);
                    self.add_error(lexeme, LexicalIssue::MultipleDecimalPoints, line, column);
                    return;
                },
                _ => break
            }
        }

        let lexeme: String = self.slice_from(start);
        match num_state {
            // A point with no digit after it
            NumberState::FractionStart => self.add_error(lexeme, LexicalIssue::MalformedDecimal, line, column),
            NumberState::FractionPart => self.add_token(TokenType::Decimal, lexeme, line, column),
            _ => self.add_token(TokenType::Integer, lexeme, line, column)
        }
    }

    // Strings are "-delimited and may not span lines; \" does not close them
    fn read_string(&mut self) {
        let (line, column, start) = (self.line, self.column, self.pos);

        // Opening quote
        self.advance();

        loop {
            match self.current() {
                Some('"') => {
                    self.advance();
                    let lexeme: String = self.slice_from(start);
                    self.add_token(TokenType::StringLiteral, lexeme, line, column);
                    return;
                },
                Some('\\') if self.peek(1) == Some('"') => {
                    self.advance();
                    self.advance();
                },
                Some('\n') | None => {
                    let lexeme: String = self.slice_from(start);
                    self.add_error(lexeme, LexicalIssue::UnterminatedString, line, column);
                    return;
                },
                Some(_) => self.advance()
            }
        }
    }

    // Characters are '-delimited around exactly one character
    fn read_char(&mut self) {
        let (line, column, start) = (self.line, self.column, self.pos);

        // Opening quote
        self.advance();

        match self.current() {
            None => {
                let lexeme: String = self.slice_from(start);
                self.add_error(lexeme, LexicalIssue::UnterminatedCharacter, line, column);
                return;
            },
            Some('\n') => {
                let lexeme: String = self.slice_from(start);
                self.add_error(lexeme, LexicalIssue::MalformedCharacter, line, column);
                return;
            },
            Some(_) => self.advance()
        }

        if self.current() == Some('\'') {
            self.advance();
            let lexeme: String = self.slice_from(start);
            self.add_token(TokenType::CharLiteral, lexeme, line, column);
        } else {
            let lexeme: String = self.slice_from(start);
            self.add_error(lexeme, LexicalIssue::MalformedCharacter, line, column);
        }
    }

    // From // up to (not including) the end of the line
    fn read_line_comment(&mut self) {
        let (line, column, start) = (self.line, self.column, self.pos);

        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            self.advance();
        }

        let lexeme: String = self.slice_from(start);
        self.add_token(TokenType::LineComment, lexeme, line, column);
    }

    fn read_block_comment(&mut self) {
        let (line, column, start) = (self.line, self.column, self.pos);

        // Consume the /*
        self.advance();
        self.advance();

        while let Some(c) = self.current() {
            if c == '*' && self.peek(1) == Some('/') {
                self.advance();
                self.advance();
                let lexeme: String = self.slice_from(start);
                self.add_token(TokenType::BlockComment, lexeme, line, column);
                return;
            }
            self.advance();
        }

        let lexeme: String = self.slice_from(start);
        self.add_error(lexeme, LexicalIssue::UnterminatedBlockComment, line, column);
    }

    fn read_operator(&mut self) {
        let (line, column) = (self.line, self.column);
        let cur_char: char = match self.current() {
            Some(c) => c,
            None => return
        };
        let next_char: Option<char> = self.peek(1);

        // Greedy match on the two character operators first
        for (first, second, token_type) in TWO_CHAR_OPERATORS.iter() {
            if cur_char == *first && next_char == Some(*second) {
                self.advance();
                self.advance();
                self.add_token(*token_type, format!("{}{}", first, second), line, column);
                return;
            }
        }

        if let Some(token_type) = single_char_operator(cur_char) {
            self.advance();
            self.add_token(token_type, cur_char.to_string(), line, column);
        }
    }

    // Whether the last real token could end an operand, making '-' a binary operator
    fn follows_operand(&self) -> bool {
        let mut real_tokens = self.tokens.iter().rev().filter(|token| !token.is_comment());
        return match real_tokens.next() {
            // x++ ends an operand, ++x does not
            Some(token) if matches!(token.token_type, TokenType::Incr | TokenType::Decr) => {
                real_tokens.next().map_or(false, |before| before.token_type == TokenType::Identifier)
            },
            Some(token) => token.token_type.can_end_operand(),
            None => false
        };
    }

    fn current(&self) -> Option<char> {
        return self.source.get(self.pos).copied();
    }

    fn peek(&self, offset: usize) -> Option<char> {
        return self.source.get(self.pos + offset).copied();
    }

    // Moves forward one character and keeps the line and column up to date
    fn advance(&mut self) {
        if let Some(c) = self.current() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn slice_from(&self, start: usize) -> String {
        return self.source[start..self.pos].iter().collect();
    }

    fn add_token(&mut self, token_type: TokenType, text: String, line: usize, column: usize) {
        bridge_log::log(
            LogTypes::Debug,
            LogSources::Lexer,
            format!("{} [ {} ] found at {:?}", token_type, text, (line, column))
        );
        self.tokens.push(Token::new(token_type, text, line, column));
    }

    fn add_error(&mut self, text: String, issue: LexicalIssue, line: usize, column: usize) {
        let new_error: LexicalError = LexicalError::new(text, issue, line, column);
        bridge_log::log(LogTypes::Error, LogSources::Lexer, new_error.to_string());
        self.errors.push(new_error);
    }
}

fn is_identifier_start(c: char) -> bool {
    return c.is_ascii_alphabetic() || c == '_';
}

fn is_identifier_part(c: char) -> bool {
    return c.is_ascii_alphanumeric() || c == '_';
}

fn is_operator_start(c: char, next_char: Option<char>) -> bool {
    if single_char_operator(c).is_some() {
        return true;
    }
    // & and | only exist doubled
    return TWO_CHAR_OPERATORS.iter().any(|(first, second, _)| c == *first && next_char == Some(*second));
}

fn single_char_operator(c: char) -> Option<TokenType> {
    return match c {
        '{' => Some(TokenType::LBrace),
        '}' => Some(TokenType::RBrace),
        '(' => Some(TokenType::LParen),
        ')' => Some(TokenType::RParen),
        '[' => Some(TokenType::LBracket),
        ']' => Some(TokenType::RBracket),
        ';' => Some(TokenType::Semicolon),
        ',' => Some(TokenType::Comma),
        '.' => Some(TokenType::Dot),
        '=' => Some(TokenType::Assign),
        '+' => Some(TokenType::Plus),
        '-' => Some(TokenType::Minus),
        '*' => Some(TokenType::Star),
        '/' => Some(TokenType::Slash),
        '%' => Some(TokenType::Percent),
        '<' => Some(TokenType::Lt),
        '>' => Some(TokenType::Gt),
        '!' => Some(TokenType::Not),
        _ => None
    };
}

// Scans the source code into tokens and lexical errors
pub fn lex(source_code: &str) -> LexOutput {
    bridge_log::log(LogTypes::Info, LogSources::Lexer, String::from("Lexing program"));

    let output: LexOutput = Lexer::new(source_code).lex_program();

    if output.is_ok() {
        bridge_log::log(
            LogTypes::Info,
            LogSources::Lexer,
            format!("Lexer completed with {} tokens and 0 errors", output.tokens.len())
        );
    } else {
        bridge_log::log(
            LogTypes::Error,
            LogSources::Lexer,
            format!("Lexer failed with {} error{}", output.errors.len(), if output.errors.len() == 1 { "" } else { "s" })
        );
    }

    return output;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(source: &str) -> Vec<TokenType> {
        return lex(source).tokens.into_iter().map(|token| token.token_type).collect();
    }

    fn token_texts(source: &str) -> Vec<String> {
        return lex(source).tokens.into_iter().map(|token| token.text).collect();
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            token_types("public class Main String System out println args"),
            vec![
                TokenType::Keyword(Keywords::Public),
                TokenType::Keyword(Keywords::Class),
                TokenType::Keyword(Keywords::Main),
                TokenType::Keyword(Keywords::String),
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Identifier
            ]
        );
        assert_eq!(token_types("_count x1 iff"), vec![TokenType::Identifier; 3]);
    }

    #[test]
    fn positions_are_one_based_and_reset_on_newline() {
        let output: LexOutput = lex("int x;\n  x = 10;");
        let positions: Vec<(usize, usize)> = output.tokens.iter().map(|token| token.position).collect();
        assert_eq!(positions, vec![(1, 1), (1, 5), (1, 6), (2, 3), (2, 5), (2, 7), (2, 9)]);
    }

    #[test]
    fn integers_and_decimals() {
        assert_eq!(token_types("42 3.14"), vec![TokenType::Integer, TokenType::Decimal]);
        assert_eq!(token_texts("42 3.14"), vec!["42", "3.14"]);
    }

    #[test]
    fn multiple_decimal_points_is_one_error() {
        let output: LexOutput = lex("1.2.3;");
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].issue, LexicalIssue::MultipleDecimalPoints);
        assert_eq!(output.errors[0].text, "1.2.3");
        assert_eq!(output.tokens.len(), 1);
        assert_eq!(output.tokens[0].token_type, TokenType::Semicolon);
    }

    #[test]
    fn trailing_point_is_malformed() {
        let output: LexOutput = lex("x = 5.;");
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].issue, LexicalIssue::MalformedDecimal);
        assert_eq!(output.errors[0].text, "5.");
        assert_eq!(output.errors[0].column, 5);
    }

    #[test]
    fn sign_folds_only_where_an_operand_cannot_end() {
        assert_eq!(token_texts("x = -5;"), vec!["x", "=", "-5", ";"]);
        assert_eq!(token_texts("i < -2.5"), vec!["i", "<", "-2.5"]);
        assert_eq!(token_texts("a - 5"), vec!["a", "-", "5"]);
        assert_eq!(token_texts("a-5"), vec!["a", "-", "5"]);
        assert_eq!(token_texts("(a)-5"), vec!["(", "a", ")", "-", "5"]);
        assert_eq!(token_texts("-x"), vec!["-", "x"]);
        assert_eq!(token_texts("int y = x++ -1;"), vec!["int", "y", "=", "x", "++", "-", "1", ";"]);
        assert_eq!(token_texts("y = x-- -1;"), vec!["y", "=", "x", "--", "-", "1", ";"]);
        assert_eq!(token_texts("y = ++ -1"), vec!["y", "=", "++", "-1"]);
    }

    #[test]
    fn strings_keep_delimiters_and_escaped_quotes() {
        let output: LexOutput = lex(r#"String s = "say \"hi\"";"#);
        assert!(output.is_ok());
        assert_eq!(output.tokens[3].token_type, TokenType::StringLiteral);
        assert_eq!(output.tokens[3].text, r#""say \"hi\"""#);
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let output: LexOutput = lex("String s = \"unterminated;\nint y;");
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].issue, LexicalIssue::UnterminatedString);
        assert_eq!(output.errors[0].text, "\"unterminated;");
        // Scanning resumes on the next line
        assert_eq!(output.tokens.last().map(|token| token.position), Some((2, 6)));
    }

    #[test]
    fn unterminated_string_at_end_of_input() {
        let output: LexOutput = lex("\"abc");
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].issue, LexicalIssue::UnterminatedString);
    }

    #[test]
    fn char_literals() {
        assert_eq!(token_types("'A'"), vec![TokenType::CharLiteral]);

        let malformed: LexOutput = lex("'AB'");
        assert_eq!(malformed.errors[0].issue, LexicalIssue::MalformedCharacter);
        assert_eq!(malformed.errors[0].text, "'A");

        let unterminated: LexOutput = lex("'");
        assert_eq!(unterminated.errors[0].issue, LexicalIssue::UnterminatedCharacter);
    }

    #[test]
    fn comments_are_single_tokens() {
        let output: LexOutput = lex("// note\nx /* a\n b */ y");
        assert_eq!(
            output.tokens.iter().map(|token| token.token_type).collect::<Vec<TokenType>>(),
            vec![TokenType::LineComment, TokenType::Identifier, TokenType::BlockComment, TokenType::Identifier]
        );
        assert_eq!(output.tokens[0].text, "// note");
        assert_eq!(output.tokens[2].text, "/* a\n b */");
        assert_eq!(output.tokens[3].position, (3, 7));
    }

    #[test]
    fn unterminated_block_comment() {
        let output: LexOutput = lex("x /* never closed");
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].issue, LexicalIssue::UnterminatedBlockComment);
        assert_eq!(output.errors[0].position(), (1, 3));
    }

    #[test]
    fn two_char_operators_are_greedy() {
        assert_eq!(
            token_types("== != >= <= ++ -- && || = ! < >"),
            vec![
                TokenType::Eq, TokenType::Neq, TokenType::Ge, TokenType::Le,
                TokenType::Incr, TokenType::Decr, TokenType::And, TokenType::Or,
                TokenType::Assign, TokenType::Not, TokenType::Lt, TokenType::Gt
            ]
        );
        assert_eq!(token_types("x+++y"), vec![TokenType::Identifier, TokenType::Incr, TokenType::Plus, TokenType::Identifier]);
    }

    #[test]
    fn unrecognized_characters_are_skipped_one_at_a_time() {
        let output: LexOutput = lex("char c = @;");
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].issue, LexicalIssue::UnrecognizedCharacter);
        assert_eq!(output.errors[0].text, "@");
        assert_eq!(output.errors[0].position(), (1, 10));
        assert_eq!(output.tokens.len(), 4);

        let lone_ops: LexOutput = lex("a & b | c #");
        assert_eq!(lone_ops.errors.len(), 3);
        assert_eq!(lone_ops.tokens.len(), 3);
    }
}

// Defines a token
#[derive (Debug, Clone, PartialEq)]
pub struct Token {
    // The type of the token
    pub token_type: TokenType,
    // The exact slice of source code the token was built from
    pub text: String,
    // The position in the source code the token is located (line, column), both 1-based
    pub position: (usize, usize)
}

impl Token {
    // Create a new token with the given information
    pub fn new(token_type_in: TokenType, token_text: String, line_number: usize, col_number: usize) -> Self {
        return Token {
            token_type: token_type_in,
            text: token_text,
            position: (line_number, col_number)
        }
    }

    pub fn line(&self) -> usize {
        return self.position.0;
    }

    pub fn column(&self) -> usize {
        return self.position.1;
    }

    // Checks for a keyword with the given spelling
    pub fn is_keyword(&self, keyword: Keywords) -> bool {
        return self.token_type == TokenType::Keyword(keyword);
    }

    pub fn is_comment(&self) -> bool {
        return matches!(self.token_type, TokenType::LineComment | TokenType::BlockComment);
    }
}

// Defines the token types. The display names are the stable names
// handed to reporting tools, so they must not change.
#[derive (Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum (serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    Identifier,
    Keyword(Keywords),
    Integer,
    Decimal,
    #[strum (serialize = "STRING")]
    StringLiteral,
    #[strum (serialize = "CHAR")]
    CharLiteral,
    #[strum (serialize = "LBRACE")]
    LBrace, // {
    #[strum (serialize = "RBRACE")]
    RBrace, // }
    #[strum (serialize = "LPAREN")]
    LParen, // (
    #[strum (serialize = "RPAREN")]
    RParen, // )
    #[strum (serialize = "LBRACKET")]
    LBracket, // [
    #[strum (serialize = "RBRACKET")]
    RBracket, // ]
    Semicolon, // ;
    Comma, // ,
    Dot, // .
    Assign, // =
    Plus, // +
    Minus, // -
    Star, // *
    Slash, // /
    Percent, // %
    Eq, // ==
    Neq, // !=
    Lt, // <
    Gt, // >
    Le, // <=
    Ge, // >=
    And, // &&
    Or, // ||
    Not, // !
    Incr, // ++
    Decr, // --
    LineComment,
    BlockComment
}

impl TokenType {
    // Whether a token of this type can be the last token of an operand,
    // which decides if a following '-' is subtraction or a sign
    pub fn can_end_operand(&self) -> bool {
        return match self {
            TokenType::Identifier
            | TokenType::Integer
            | TokenType::Decimal
            | TokenType::StringLiteral
            | TokenType::CharLiteral
            | TokenType::RParen
            | TokenType::RBracket
            | TokenType::Keyword(Keywords::True)
            | TokenType::Keyword(Keywords::False) => true,
            _ => false
        };
    }
}

// Defines the reserved words. Anything else spelled like an identifier,
// including System, out, println and args, is a plain identifier.
#[derive (Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum (serialize_all = "lowercase")]
pub enum Keywords {
    Class,
    Void,
    Static,
    Int,
    Double,
    Boolean,
    Char,
    #[strum (serialize = "String")]
    String,
    If,
    Else,
    For,
    While,
    Do,
    True,
    False,
    Main,
    Public
}

impl Keywords {
    // The keywords that name a declarable type
    pub fn is_type(&self) -> bool {
        return matches!(self, Keywords::Int | Keywords::Double | Keywords::Boolean | Keywords::Char | Keywords::String);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn token_type_names_are_stable() {
        assert_eq!(TokenType::Identifier.to_string(), "IDENTIFIER");
        assert_eq!(TokenType::Keyword(Keywords::If).to_string(), "KEYWORD");
        assert_eq!(TokenType::StringLiteral.to_string(), "STRING");
        assert_eq!(TokenType::CharLiteral.to_string(), "CHAR");
        assert_eq!(TokenType::LBrace.to_string(), "LBRACE");
        assert_eq!(TokenType::RBracket.to_string(), "RBRACKET");
        assert_eq!(TokenType::Neq.to_string(), "NEQ");
        assert_eq!(TokenType::LineComment.to_string(), "LINE_COMMENT");
        assert_eq!(TokenType::BlockComment.to_string(), "BLOCK_COMMENT");
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(Keywords::from_str("String"), Ok(Keywords::String));
        assert!(Keywords::from_str("string").is_err());
        assert!(Keywords::from_str("System").is_err());
        assert!(Keywords::from_str("println").is_err());

        // Every keyword spells back to itself
        for keyword in Keywords::iter() {
            assert_eq!(Keywords::from_str(&keyword.to_string()), Ok(keyword));
        }
    }
}

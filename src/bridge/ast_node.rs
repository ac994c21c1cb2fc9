use std::collections::HashSet;

use crate::bridge::symbol_table::Type;
use crate::bridge::token::TokenType;

// Statements that can appear in the body of main or of any block
#[derive (Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Assignment(Assignment),
    If(IfStatement),
    For(ForStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    Call(Call),
    // x++; and friends used on their own
    IncrDecr(UnaryExpr),
    Comment(Comment)
}

#[derive (Debug, Clone, PartialEq)]
pub enum Expression {
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Literal(Literal),
    Identifier(Identifier)
}

#[derive (Debug, Clone, PartialEq)]
pub struct Declaration {
    pub declared_type: Type,
    pub name: String,
    // None means the variable starts without a value
    pub initializer: Option<Expression>,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub expr: Expression,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Vec<Statement>,
    // An else-if is an else branch holding exactly one If
    pub else_branch: Vec<Statement>,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Vec<Statement>,
    pub condition: Option<Expression>,
    pub increment: Option<Box<Statement>>,
    pub body: Vec<Statement>,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    pub body: Vec<Statement>,
    pub condition: Expression,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct Call {
    pub callee_name: String,
    pub args: Vec<Expression>,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub is_prefix: bool,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct Literal {
    // Source spelling, quotes included for strings and chars
    pub value: String,
    pub literal_type: Type,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub position: (usize, usize)
}

#[derive (Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Line,
    Block
}

#[derive (Debug, Clone, PartialEq)]
pub struct Comment {
    // Comment text with the // or /* */ markers
    pub text: String,
    pub style: CommentStyle,
    pub position: (usize, usize)
}

// Binary operators, displayed with their source spelling
#[derive (Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum BinaryOperator {
    #[strum (serialize = "||")]
    Or,
    #[strum (serialize = "&&")]
    And,
    #[strum (serialize = "==")]
    Eq,
    #[strum (serialize = "!=")]
    Neq,
    #[strum (serialize = "<")]
    Lt,
    #[strum (serialize = ">")]
    Gt,
    #[strum (serialize = "<=")]
    Le,
    #[strum (serialize = ">=")]
    Ge,
    #[strum (serialize = "+")]
    Add,
    #[strum (serialize = "-")]
    Sub,
    #[strum (serialize = "*")]
    Mul,
    #[strum (serialize = "/")]
    Div,
    #[strum (serialize = "%")]
    Mod
}

impl BinaryOperator {
    pub fn from_token_type(token_type: TokenType) -> Option<BinaryOperator> {
        return match token_type {
            TokenType::Or => Some(BinaryOperator::Or),
            TokenType::And => Some(BinaryOperator::And),
            TokenType::Eq => Some(BinaryOperator::Eq),
            TokenType::Neq => Some(BinaryOperator::Neq),
            TokenType::Lt => Some(BinaryOperator::Lt),
            TokenType::Gt => Some(BinaryOperator::Gt),
            TokenType::Le => Some(BinaryOperator::Le),
            TokenType::Ge => Some(BinaryOperator::Ge),
            TokenType::Plus => Some(BinaryOperator::Add),
            TokenType::Minus => Some(BinaryOperator::Sub),
            TokenType::Star => Some(BinaryOperator::Mul),
            TokenType::Slash => Some(BinaryOperator::Div),
            TokenType::Percent => Some(BinaryOperator::Mod),
            _ => None
        };
    }
}

#[derive (Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UnaryOperator {
    #[strum (serialize = "!")]
    Not,
    #[strum (serialize = "-")]
    Negate,
    #[strum (serialize = "++")]
    Increment,
    #[strum (serialize = "--")]
    Decrement
}

impl UnaryOperator {
    pub fn from_token_type(token_type: TokenType) -> Option<UnaryOperator> {
        return match token_type {
            TokenType::Not => Some(UnaryOperator::Not),
            TokenType::Minus => Some(UnaryOperator::Negate),
            TokenType::Incr => Some(UnaryOperator::Increment),
            TokenType::Decr => Some(UnaryOperator::Decrement),
            _ => None
        };
    }

    pub fn is_step(&self) -> bool {
        return matches!(self, UnaryOperator::Increment | UnaryOperator::Decrement);
    }
}

impl Expression {
    pub fn position(&self) -> (usize, usize) {
        return match self {
            Expression::Binary(binary) => binary.position,
            Expression::Unary(unary) => unary.position,
            Expression::Literal(literal) => literal.position,
            Expression::Identifier(identifier) => identifier.position
        };
    }

    // Names of every identifier read by the expression
    pub fn identifiers(&self) -> HashSet<String> {
        let mut names: HashSet<String> = HashSet::new();
        self.collect_identifiers(&mut names);
        return names;
    }

    fn collect_identifiers(&self, names: &mut HashSet<String>) {
        match self {
            Expression::Binary(binary) => {
                binary.left.collect_identifiers(names);
                binary.right.collect_identifiers(names);
            },
            Expression::Unary(unary) => unary.operand.collect_identifiers(names),
            Expression::Literal(_) => {},
            Expression::Identifier(identifier) => {
                names.insert(identifier.name.to_owned());
            }
        }
    }

    // Whether evaluating the expression changes a variable (++ or -- inside it)
    pub fn has_side_effects(&self) -> bool {
        return match self {
            Expression::Binary(binary) => binary.left.has_side_effects() || binary.right.has_side_effects(),
            Expression::Unary(unary) => unary.operator.is_step() || unary.operand.has_side_effects(),
            Expression::Literal(_) | Expression::Identifier(_) => false
        };
    }

    fn collect_mutations(&self, names: &mut HashSet<String>) {
        match self {
            Expression::Binary(binary) => {
                binary.left.collect_mutations(names);
                binary.right.collect_mutations(names);
            },
            Expression::Unary(unary) => {
                if unary.operator.is_step() {
                    unary.operand.collect_identifiers(names);
                }
                unary.operand.collect_mutations(names);
            },
            Expression::Literal(_) | Expression::Identifier(_) => {}
        }
    }
}

impl Statement {
    fn collect_mutations(&self, names: &mut HashSet<String>) {
        match self {
            Statement::Declaration(declaration) => {
                names.insert(declaration.name.to_owned());
                if let Some(initializer) = &declaration.initializer {
                    initializer.collect_mutations(names);
                }
            },
            Statement::Assignment(assignment) => {
                names.insert(assignment.name.to_owned());
                assignment.expr.collect_mutations(names);
            },
            Statement::If(if_statement) => {
                if_statement.condition.collect_mutations(names);
                collect_block_mutations(&if_statement.then_branch, names);
                collect_block_mutations(&if_statement.else_branch, names);
            },
            Statement::For(for_statement) => {
                collect_block_mutations(&for_statement.init, names);
                if let Some(condition) = &for_statement.condition {
                    condition.collect_mutations(names);
                }
                if let Some(increment) = &for_statement.increment {
                    increment.collect_mutations(names);
                }
                collect_block_mutations(&for_statement.body, names);
            },
            Statement::While(while_statement) => {
                while_statement.condition.collect_mutations(names);
                collect_block_mutations(&while_statement.body, names);
            },
            Statement::DoWhile(do_while) => {
                collect_block_mutations(&do_while.body, names);
                do_while.condition.collect_mutations(names);
            },
            Statement::Call(call) => {
                for arg in call.args.iter() {
                    arg.collect_mutations(names);
                }
            },
            Statement::IncrDecr(unary) => {
                if unary.operator.is_step() {
                    unary.operand.collect_identifiers(names);
                }
                unary.operand.collect_mutations(names);
            },
            Statement::Comment(_) => {}
        }
    }
}

// Names of every variable any statement of the block may write to
pub fn block_mutations(statements: &[Statement]) -> HashSet<String> {
    let mut names: HashSet<String> = HashSet::new();
    collect_block_mutations(statements, &mut names);
    return names;
}

fn collect_block_mutations(statements: &[Statement], names: &mut HashSet<String>) {
    for statement in statements.iter() {
        statement.collect_mutations(names);
    }
}

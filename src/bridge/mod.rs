pub mod ast;
pub mod ast_node;
pub mod code_generator;
pub mod compiler;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod symbol_table;
pub mod token;

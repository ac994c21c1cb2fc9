use string_builder::Builder;

use crate::bridge::ast_node::*;

// The root of the tree: public class <class_name> { <main> }
#[derive (Debug, Clone, PartialEq)]
pub struct Program {
    pub class_name: String,
    pub main: MainMethod,
    pub position: (usize, usize)
}

// public static void main(String[] <param_name>) { <statements> }
#[derive (Debug, Clone, PartialEq)]
pub struct MainMethod {
    pub param_name: String,
    pub statements: Vec<Statement>,
    pub position: (usize, usize)
}

impl Program {
    // Text form of the tree, one node per line, with dashes for the depth.
    // Branches print as <Name>, leaves as [value].
    pub fn render_tree(&self) -> String {
        let mut tree_builder: Builder = Builder::default();

        add_line(&mut tree_builder, 0, format!("<Program {}>", self.class_name));
        add_line(&mut tree_builder, 1, format!("<Main {}>", self.main.param_name));
        render_block(&mut tree_builder, &self.main.statements, 2);

        return tree_builder.string().unwrap_or_default();
    }
}

fn add_line(builder: &mut Builder, level: usize, text: String) {
    // Set the level
    for _i in 0..level {
        builder.append("-");
    }
    builder.append(text);
    builder.append("\n");
}

fn render_block(builder: &mut Builder, statements: &[Statement], level: usize) {
    for statement in statements.iter() {
        render_statement(builder, statement, level);
    }
}

fn render_statement(builder: &mut Builder, statement: &Statement, level: usize) {
    match statement {
        Statement::Declaration(declaration) => {
            add_line(builder, level, String::from("<Declaration>"));
            add_line(builder, level + 1, format!("[{}]", declaration.declared_type));
            add_line(builder, level + 1, format!("[{}]", declaration.name));
            if let Some(initializer) = &declaration.initializer {
                render_expression(builder, initializer, level + 1);
            }
        },
        Statement::Assignment(assignment) => {
            add_line(builder, level, String::from("<Assignment>"));
            add_line(builder, level + 1, format!("[{}]", assignment.name));
            render_expression(builder, &assignment.expr, level + 1);
        },
        Statement::If(if_statement) => {
            add_line(builder, level, String::from("<If>"));
            render_expression(builder, &if_statement.condition, level + 1);
            add_line(builder, level + 1, String::from("<Then>"));
            render_block(builder, &if_statement.then_branch, level + 2);
            if !if_statement.else_branch.is_empty() {
                add_line(builder, level + 1, String::from("<Else>"));
                render_block(builder, &if_statement.else_branch, level + 2);
            }
        },
        Statement::For(for_statement) => {
            add_line(builder, level, String::from("<For>"));
            add_line(builder, level + 1, String::from("<Init>"));
            render_block(builder, &for_statement.init, level + 2);
            if let Some(condition) = &for_statement.condition {
                render_expression(builder, condition, level + 1);
            }
            if let Some(increment) = &for_statement.increment {
                add_line(builder, level + 1, String::from("<Increment>"));
                render_statement(builder, increment, level + 2);
            }
            add_line(builder, level + 1, String::from("<Body>"));
            render_block(builder, &for_statement.body, level + 2);
        },
        Statement::While(while_statement) => {
            add_line(builder, level, String::from("<While>"));
            render_expression(builder, &while_statement.condition, level + 1);
            render_block(builder, &while_statement.body, level + 1);
        },
        Statement::DoWhile(do_while) => {
            add_line(builder, level, String::from("<DoWhile>"));
            render_block(builder, &do_while.body, level + 1);
            render_expression(builder, &do_while.condition, level + 1);
        },
        Statement::Call(call) => {
            add_line(builder, level, format!("<Call {}>", call.callee_name));
            for arg in call.args.iter() {
                render_expression(builder, arg, level + 1);
            }
        },
        Statement::IncrDecr(unary) => render_unary(builder, unary, level),
        Statement::Comment(comment) => add_line(builder, level, format!("[{}]", comment.text))
    }
}

fn render_expression(builder: &mut Builder, expression: &Expression, level: usize) {
    match expression {
        Expression::Binary(binary) => {
            add_line(builder, level, format!("<{}>", binary.operator));
            render_expression(builder, &binary.left, level + 1);
            render_expression(builder, &binary.right, level + 1);
        },
        Expression::Unary(unary) => render_unary(builder, unary, level),
        Expression::Literal(literal) => add_line(builder, level, format!("[{}]", literal.value)),
        Expression::Identifier(identifier) => add_line(builder, level, format!("[{}]", identifier.name))
    }
}

fn render_unary(builder: &mut Builder, unary: &UnaryExpr, level: usize) {
    let placement: &str = if unary.is_prefix { "prefix" } else { "postfix" };
    add_line(builder, level, format!("<{} {}>", placement, unary.operator));
    render_expression(builder, &unary.operand, level + 1);
}

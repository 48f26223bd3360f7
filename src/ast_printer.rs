use crate::ast::{Expr, Lambda};

/// Renders an AST back to canonical heartlisp source.  Parsing the output
/// yields the same tree.
pub struct Ast;

impl Ast {
    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::ClassDefinition { name, fields } => {
                format!("(class {} [{}])", name, fields.join(" "))
            }

            Expr::FunctionDefinition { name, function } => {
                format!("(<3 {} {})", name, self.print_lambda(function))
            }

            Expr::DoFlow(statements) => self.print_form("do", statements),

            Expr::IfFlow {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "(if {} {} {})",
                self.print(condition),
                self.print(then_branch),
                self.print(else_branch)
            ),

            Expr::OrFlow(arguments) => self.print_form("or", arguments),

            Expr::AndFlow(arguments) => self.print_form("and", arguments),

            Expr::NamedCall {
                function,
                arguments,
            } => self.print_form(function, arguments),

            Expr::Call {
                function,
                arguments,
            } => self.print_form(&self.print(function), arguments),

            Expr::IdentLiteral(name) => name.to_string(),

            Expr::BoolLiteral(b) => b.to_string(),

            Expr::NilLiteral => "nil".to_string(),

            Expr::IntLiteral(n) => n.to_string(),

            Expr::FloatLiteral(n) => {
                if n.fract() == 0.0 {
                    format!("{:.1}", n)
                } else {
                    n.to_string()
                }
            }

            Expr::StringLiteral(s) => escape(s),

            Expr::LambdaLiteral(function) => format!("(fn {})", self.print_lambda(function)),

            Expr::ArrayLiteral(values) => {
                let items: Vec<String> = values.iter().map(|v| self.print(v)).collect();
                format!("[{}]", items.join(" "))
            }

            Expr::VariableDefinition { ident, value, body } => {
                format!("(let {} {} {})", ident, self.print(value), self.print(body))
            }

            Expr::Unsupported { form } => form.to_string(),
        }
    }

    fn print_lambda(&self, function: &Lambda) -> String {
        format!(
            "[{}] {}",
            function.params.join(" "),
            self.print(&function.body)
        )
    }

    fn print_form(&self, head: &str, items: &[Expr]) -> String {
        let mut out: String = format!("({}", head);

        for item in items {
            out.push(' ');
            out.push_str(&self.print(item));
        }

        out.push(')');
        out
    }
}

fn escape(s: &str) -> String {
    let mut out: String = String::with_capacity(s.len() + 2);
    out.push('"');

    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }

    out.push('"');
    out
}

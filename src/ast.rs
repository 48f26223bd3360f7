use std::rc::Rc;

use serde::Serialize;

/// Parameter list and body shared by named functions and lambdas.
///
/// Held behind an `Rc` so that turning a definition into a runtime
/// `Function` value never copies the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lambda {
    pub params: Vec<String>,
    pub body: Expr,
}

impl Lambda {
    pub fn new(params: Vec<String>, body: Expr) -> Rc<Self> {
        Rc::new(Self { params, body })
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// **Abstract‑Syntax‑Tree node** for every form of the language.
///
/// The tree is immutable once built; the evaluator only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// `(class Name [field ...])`
    ClassDefinition { name: String, fields: Vec<String> },

    /// `(<3 name [param ...] body)`
    FunctionDefinition { name: String, function: Rc<Lambda> },

    /// `(do stmt ...)`
    DoFlow(Vec<Expr>),

    /// `(if condition then else)`
    IfFlow {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    /// `(or arg ...)`
    OrFlow(Vec<Expr>),

    /// `(and arg ...)`
    AndFlow(Vec<Expr>),

    /// Call whose head is a plain identifier: `(name arg ...)`
    NamedCall { function: String, arguments: Vec<Expr> },

    /// Call whose head is an arbitrary expression: `((expr) arg ...)`
    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },

    IdentLiteral(String),

    BoolLiteral(bool),

    NilLiteral,

    IntLiteral(i64),

    FloatLiteral(f64),

    StringLiteral(String),

    /// `(fn [param ...] body)`
    LambdaLiteral(Rc<Lambda>),

    /// `[elem ...]`
    ArrayLiteral(Vec<Expr>),

    /// `(let ident value body)`
    VariableDefinition {
        ident: String,
        value: Box<Expr>,
        body: Box<Expr>,
    },

    /// Syntax the parser accepts but the evaluator has no semantics for
    /// (currently `{ ... }` blocks).  Evaluating it is an internal fault.
    Unsupported { form: String },
}

impl Expr {
    /// Short name of the node kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::ClassDefinition { .. } => "ClassDefinition",
            Expr::FunctionDefinition { .. } => "FunctionDefinition",
            Expr::DoFlow(_) => "DoFlow",
            Expr::IfFlow { .. } => "IfFlow",
            Expr::OrFlow(_) => "OrFlow",
            Expr::AndFlow(_) => "AndFlow",
            Expr::NamedCall { .. } => "NamedCall",
            Expr::Call { .. } => "Call",
            Expr::IdentLiteral(_) => "IdentLiteral",
            Expr::BoolLiteral(_) => "BoolLiteral",
            Expr::NilLiteral => "NilLiteral",
            Expr::IntLiteral(_) => "IntLiteral",
            Expr::FloatLiteral(_) => "FloatLiteral",
            Expr::StringLiteral(_) => "StringLiteral",
            Expr::LambdaLiteral(_) => "LambdaLiteral",
            Expr::ArrayLiteral(_) => "ArrayLiteral",
            Expr::VariableDefinition { .. } => "VariableDefinition",
            Expr::Unsupported { .. } => "Unsupported",
        }
    }
}

//! Tree‑walking evaluator and call dispatcher.
//!
//! [`eval`] is the single recursive entry point: it matches exhaustively on
//! the AST node kind and recurses into sub‑expressions.  Every failure aborts
//! the enclosing expression and is returned unchanged; nothing is retried and
//! no partial value ever accompanies an error.
//!
//! # Scoping of function bodies
//!
//! Function values do not capture the environment they were defined in.  A
//! call creates its parameter scope as a child of the *call site's*
//! environment, so free variables in a body resolve against the caller's
//! scopes first and the global scope last.
//!
//! # Recursion
//!
//! Evaluation recurses on the host stack and there is no tail‑call
//! elimination.  Every [`eval`] step runs under
//! [`ensure_sufficient_stack`], which grows the stack before it runs out.
//! User‑function calls are still counted against the global scope's
//! `max_call_depth`, and crossing it fails with `DepthExceeded`.

use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, Lambda};
use crate::builtins;
use crate::class::ClassInfo;
use crate::environment::{Environment, GlobalScope};
use crate::error::{LangError, Result};
use crate::parser::Parser;
use crate::scanner::tokenize;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Callable, Value};

/// Evaluate one node in `env`.
pub fn eval(env: &Environment<'_>, expr: &Expr) -> Result<Value> {
    ensure_sufficient_stack(|| eval_node(env, expr))
}

fn eval_node(env: &Environment<'_>, expr: &Expr) -> Result<Value> {
    debug!("Evaluating {}", expr.kind());

    match expr {
        Expr::ClassDefinition { name, fields } => {
            define_class(env, name, fields)?;
            Ok(Value::Nil)
        }

        Expr::FunctionDefinition { name, function } => {
            debug!("Defining function '{}' with {} params", name, function.arity());
            env.define_global(name.as_str(), Value::Function(Rc::clone(function)));
            Ok(Value::Nil)
        }

        Expr::DoFlow(statements) => {
            let mut last: Value = Value::Nil;
            for statement in statements {
                last = eval(env, statement)?;
            }
            Ok(last)
        }

        Expr::IfFlow {
            condition,
            then_branch,
            else_branch,
        } => {
            if eval(env, condition)?.truthiness() {
                debug!("Condition is truthy; evaluating then branch");
                eval(env, then_branch)
            } else {
                debug!("Condition is falsy; evaluating else branch");
                eval(env, else_branch)
            }
        }

        Expr::OrFlow(arguments) => {
            let mut last: Value = Value::Nil;
            for argument in arguments {
                last = eval(env, argument)?;
                if last.truthiness() {
                    return Ok(last);
                }
            }
            Ok(last)
        }

        Expr::AndFlow(arguments) => {
            let mut last: Value = Value::Nil;
            for argument in arguments {
                last = eval(env, argument)?;
                if !last.truthiness() {
                    return Ok(last);
                }
            }
            Ok(last)
        }

        Expr::NamedCall {
            function,
            arguments,
        } => {
            let callee: Value = env.get(function)?;
            let args: Vec<Value> = eval_all(env, arguments)?;
            call(env, &callee, args)
        }

        Expr::Call {
            function,
            arguments,
        } => {
            let callee: Value = eval(env, function)?;
            let args: Vec<Value> = eval_all(env, arguments)?;
            call(env, &callee, args)
        }

        Expr::IdentLiteral(name) => env.get(name),

        Expr::BoolLiteral(b) => Ok(Value::bool(*b)),

        Expr::NilLiteral => Ok(Value::Nil),

        Expr::IntLiteral(n) => Ok(Value::int(*n)),

        Expr::FloatLiteral(n) => Ok(Value::float(*n)),

        Expr::StringLiteral(s) => Ok(Value::string(s.as_str())),

        Expr::LambdaLiteral(function) => Ok(Value::Function(Rc::clone(function))),

        Expr::ArrayLiteral(values) => Ok(Value::array(eval_all(env, values)?)),

        Expr::VariableDefinition { ident, value, body } => {
            // The initializer runs in the enclosing scope and cannot see `ident`.
            let bound: Value = eval(env, value)?;
            debug!("let '{}' = {}", ident, bound);
            env.let_in(ident, bound, |scope| eval(scope, body))
        }

        Expr::Unsupported { form } => Err(LangError::UnknownExpression { form: form.clone() }),
    }
}

/// Evaluate `exprs` left to right, stopping at the first failure.
fn eval_all(env: &Environment<'_>, exprs: &[Expr]) -> Result<Vec<Value>> {
    exprs.iter().map(|expr| eval(env, expr)).collect()
}

fn define_class(env: &Environment<'_>, name: &str, fields: &[String]) -> Result<()> {
    let class: Rc<ClassInfo> = ClassInfo::new(name, fields.to_vec())?;

    env.define_global(name, Value::NativeFunction(class.constructor()));

    Ok(())
}

/// Dispatch a call on any value.  Only functions and native functions are
/// callable.
pub fn call(env: &Environment<'_>, callee: &Value, args: Vec<Value>) -> Result<Value> {
    match callee.as_callable() {
        Some(Callable::Function(function)) => call_function(env, function, args),

        Some(Callable::Native(native)) => {
            debug!("Calling native function '{}'", native.name());
            native.call(&args)
        }

        None => {
            debug!("Attempted to call a {}", callee.type_name());
            Err(LangError::NotCallable {
                type_name: callee.type_name(),
            })
        }
    }
}

/// Invoke a user function: check arity, bind parameters in a fresh child
/// of `env`, evaluate the body there.
pub fn call_function(env: &Environment<'_>, function: &Lambda, args: Vec<Value>) -> Result<Value> {
    if args.len() != function.arity() {
        return Err(LangError::arity(
            format!("function ({})", function.params.join(" ")),
            function.arity(),
            args.len(),
        ));
    }

    let _guard = env.globals().enter_call()?;

    let mut scope: Environment<'_> = env.new_scope();
    for (param, arg) in function.params.iter().zip(args) {
        debug!("Binding parameter '{}' to {}", param, arg);
        scope.set(param.as_str(), arg);
    }

    eval(&scope, &function.body)
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver facade
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Deepest allowed nesting of user‑function calls.
    pub max_call_depth: usize,

    /// Install the native prelude (`print`, `+`, `get`, …) into the global scope.
    pub install_prelude: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 512,
            install_prelude: true,
        }
    }
}

/// Owns the global scope of one running program.
pub struct Interpreter {
    globals: GlobalScope,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        info!("Initializing Interpreter with {:?}", config);

        let globals: GlobalScope = GlobalScope::new(config.max_call_depth);

        if config.install_prelude {
            builtins::install(&globals);
        }

        Self { globals }
    }

    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }

    /// Register a host callable under `name` in the global scope.
    pub fn define_native<F>(&self, name: &str, func: F)
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        self.globals.define(name, Value::native(name, func));
    }

    /// Evaluate one node in the global environment.
    pub fn eval(&self, expr: &Expr) -> Result<Value> {
        eval(&Environment::global(&self.globals), expr)
    }

    /// Evaluate top‑level forms in order; yields the last value (`nil` for
    /// an empty program).
    pub fn run(&self, program: &[Expr]) -> Result<Value> {
        debug!("Running {} top-level forms", program.len());

        let env: Environment<'_> = Environment::global(&self.globals);

        let mut last: Value = Value::Nil;
        for form in program {
            last = eval(&env, form)?;
        }

        info!("Program finished with {}", last);

        Ok(last)
    }

    /// Tokenize, parse and run `source`.
    pub fn run_source(&self, source: &str) -> Result<Value> {
        let program: Vec<Expr> = Parser::new(tokenize(source)).parse()?;

        self.run(&program)
    }

    /// Call a function value the host already holds, from the global scope.
    pub fn call_function(&self, function: &Lambda, args: Vec<Value>) -> Result<Value> {
        call_function(&Environment::global(&self.globals), function, args)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

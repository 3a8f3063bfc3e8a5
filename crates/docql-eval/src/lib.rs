// DocQL evaluator -- executes parsed queries against a root environment of
// document values. The pipeline entry point lives here: `compile` produces
// a single-use `Executable`, which `eval` runs against bindings.

mod builtins;
mod cast;
mod coerce;
mod env;
mod interp;
mod like;

pub use cast::cast;
pub use env::{Bindings, Environment};

use docql_common::Error;
use docql_parser::ast::Expr;
use docql_value::Value;

/// A compiled query, ready to run against a root environment.
///
/// An evaluator session is single-use: `eval` consumes the executable, so
/// a query is compiled once per execution.
pub struct Executable {
    expr: Expr,
}

impl Executable {
    /// The compiled tree, e.g. for s-expression inspection.
    pub fn ast(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate against the given root bindings.
    pub fn eval(self, globals: Bindings) -> Result<Value, Error> {
        let mut env = Environment::new(globals);
        interp::eval_expr(&self.expr, &mut env).map_err(Error::from)
    }
}

/// Compile query text into an executable.
pub fn compile(source: &str) -> Result<Executable, Error> {
    Ok(Executable {
        expr: docql_parser::parse(source)?,
    })
}

/// Compile and evaluate in one step.
pub fn eval(source: &str, globals: Bindings) -> Result<Value, Error> {
    compile(source)?.eval(globals)
}

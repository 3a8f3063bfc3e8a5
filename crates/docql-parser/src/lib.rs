// DocQL parser -- turns the lexer's token stream into an abstract syntax
// tree. Expressions use precedence climbing; SELECT and the other statement
// forms use recursive descent. The AST serializes into the document model
// as s-expressions for inspection and tests.

pub mod ast;
pub mod types;

mod error;
mod parser;

pub use parser::Parser;

use ast::Expr;
use docql_common::Error;

/// Lex and parse a query in one step.
pub fn parse(source: &str) -> Result<Expr, Error> {
    let tokens = docql_lexer::tokenize(source)?;
    Parser::new(tokens).parse().map_err(Error::from)
}

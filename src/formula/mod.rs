//! Arithmetic-logical formula evaluation.
//!
//! Skill definitions express numbers ("damage", "chance", costs) as string
//! formulas over character state: `4 + 0.5*Lv + STR/10`. This module holds
//! the tokenizer, the recursive-descent parse-and-evaluate pass, variable
//! resolution, and the bounded expression cache.

mod context;
mod error;
mod eval;
mod parser;
mod token;

pub use context::{StatSource, VariableContext};
pub use error::FormulaError;
pub use eval::{
    evaluate, evaluate_level_based, evaluate_safe, validate, Evaluator, DEFAULT_CACHE_CAPACITY,
};
pub use parser::{truthy, EPSILON};
pub use token::{tokenize, Token, TokenKind};

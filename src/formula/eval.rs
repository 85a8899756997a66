//! Evaluation entry points and the bounded expression cache.
//!
//! Strict callers use [`evaluate`] / [`Evaluator::evaluate`] and get a
//! `Result`; per-cast hot paths use [`evaluate_safe`], which logs and falls
//! back to a default instead of failing mid-cast.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::warn;

use super::context::{ValidationStats, VariableContext};
use super::error::FormulaError;
use super::parser::eval_tokens;
use super::token::{tokenize, Token};

/// Default bound for the expression cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Evaluate a formula against a context, without caching.
///
/// Pure and stateless; safe for concurrent callers.
pub fn evaluate(expr: &str, ctx: &VariableContext) -> Result<f64, FormulaError> {
    eval_tokens(&tokenize(expr)?, ctx)
}

/// Evaluate a formula, logging and returning `default` on any error.
pub fn evaluate_safe(expr: &str, ctx: &VariableContext, default: f64) -> f64 {
    match evaluate(expr, ctx) {
        Ok(value) => value,
        Err(err) => {
            warn!(formula = expr, %err, default, "formula failed, using default");
            default
        }
    }
}

/// Evaluate from a table of per-level formulas.
///
/// Picks the formula defined exactly at `level`, else the one at the
/// greatest defined level below it, else `fallback`. When nothing resolves
/// at all, logs a warning and yields 0.0.
pub fn evaluate_level_based(
    level_formulas: &BTreeMap<i32, String>,
    fallback: Option<&str>,
    ctx: &VariableContext,
    level: i32,
) -> Result<f64, FormulaError> {
    let formula = level_formulas
        .range(..=level)
        .next_back()
        .map(|(_, f)| f.as_str())
        .or(fallback);

    match formula {
        Some(expr) => evaluate(expr, ctx),
        None => {
            warn!(level, "no formula defined at or below level and no fallback");
            Ok(0.0)
        }
    }
}

/// Check whether a formula evaluates against a standard dummy context.
///
/// The dummy context carries sentinel values for the conventional short
/// stats (STR, INT, SPI, VIT, DEX) plus `Lv`/`LV`, so references to them
/// validate while typos and malformed syntax do not. Never propagates the
/// underlying error.
#[must_use]
pub fn validate(expr: &str) -> bool {
    let stats = ValidationStats;
    let ctx = VariableContext::with_source(&stats);
    evaluate(expr, &ctx).is_ok()
}

/// A formula evaluator with a bounded tokenization cache.
///
/// Repeatedly evaluated settings formulas skip re-tokenization. The cache is
/// bounded by entry count; on overflow the whole cache is cleared rather
/// than evicting incrementally. Not internally synchronized - use one
/// evaluator per thread.
pub struct Evaluator {
    cache: FxHashMap<String, Vec<Token>>,
    capacity: usize,
}

impl Evaluator {
    /// Create an evaluator with the default cache bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create an evaluator with a specific cache bound.
    ///
    /// A capacity of 0 disables caching.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: FxHashMap::default(),
            capacity,
        }
    }

    /// Evaluate a formula, reusing cached tokens when available.
    pub fn evaluate(&mut self, expr: &str, ctx: &VariableContext) -> Result<f64, FormulaError> {
        if let Some(tokens) = self.cache.get(expr) {
            return eval_tokens(tokens, ctx);
        }

        let tokens = tokenize(expr)?;
        let value = eval_tokens(&tokens, ctx)?;

        if self.capacity > 0 {
            if self.cache.len() >= self.capacity {
                self.cache.clear();
            }
            self.cache.insert(expr.to_string(), tokens);
        }
        Ok(value)
    }

    /// Evaluate with fallback semantics, as [`evaluate_safe`].
    pub fn evaluate_safe(&mut self, expr: &str, ctx: &VariableContext, default: f64) -> f64 {
        match self.evaluate(expr, ctx) {
            Ok(value) => value,
            Err(err) => {
                warn!(formula = expr, %err, default, "formula failed, using default");
                default
            }
        }
    }

    /// Number of cached expressions.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

//! Recursive-descent parser with direct evaluation.
//!
//! Formulas are short and evaluated rarely enough per cast that we parse and
//! evaluate in a single pass; no AST is retained. Precedence, lowest first:
//!
//! ```text
//! or          ||
//! and         &&
//! comparison  < <= > >= == !=   (chained, left-assoc, each yields 0/1)
//! additive    + -
//! multiplicative  * / %
//! power       ^ **              (right-assoc)
//! unary       + - !
//! primary     number, identifier, ( expr )
//! ```
//!
//! Booleans are doubles: truthy means `|x| > EPSILON`.

use super::context::VariableContext;
use super::error::FormulaError;
use super::token::{Token, TokenKind};

/// Comparison and truthiness tolerance for doubles.
pub const EPSILON: f64 = 1e-9;

/// Interpret a double as boolean.
#[must_use]
pub fn truthy(value: f64) -> bool {
    value.abs() > EPSILON
}

fn as_double(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Evaluate a token stream against a context.
///
/// Errors on trailing tokens after a complete expression, so `1 2` and
/// `(1+2))` both fail.
pub fn eval_tokens(tokens: &[Token], ctx: &VariableContext) -> Result<f64, FormulaError> {
    let mut parser = Parser { tokens, idx: 0, ctx };
    let value = parser.or_expr()?;
    if let Some(token) = parser.peek() {
        return Err(FormulaError::syntax(token.pos, token.kind.display()));
    }
    Ok(value)
}

struct Parser<'a> {
    tokens: &'a [Token],
    idx: usize,
    ctx: &'a VariableContext<'a>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.idx)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind) == Some(kind) {
            self.idx += 1;
            true
        } else {
            false
        }
    }

    /// Position for "ran out of input" errors.
    fn end_pos(&self) -> usize {
        self.tokens.last().map_or(0, |t| t.pos + 1)
    }

    fn or_expr(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.and_expr()?;
        while self.eat(&TokenKind::OrOr) {
            let rhs = self.and_expr()?;
            value = as_double(truthy(value) || truthy(rhs));
        }
        Ok(value)
    }

    fn and_expr(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.comparison()?;
        while self.eat(&TokenKind::AndAnd) {
            let rhs = self.comparison()?;
            value = as_double(truthy(value) && truthy(rhs));
        }
        Ok(value)
    }

    fn comparison(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.additive()?;
        loop {
            let op = match self.peek().map(|t| t.kind.clone()) {
                Some(
                    kind @ (TokenKind::Lt
                    | TokenKind::Le
                    | TokenKind::Gt
                    | TokenKind::Ge
                    | TokenKind::EqEq
                    | TokenKind::NotEq),
                ) => kind,
                _ => break,
            };
            self.idx += 1;
            let rhs = self.additive()?;
            value = as_double(match op {
                TokenKind::Lt => value < rhs,
                TokenKind::Le => value <= rhs,
                TokenKind::Gt => value > rhs,
                TokenKind::Ge => value >= rhs,
                TokenKind::EqEq => (value - rhs).abs() <= EPSILON,
                TokenKind::NotEq => (value - rhs).abs() > EPSILON,
                _ => unreachable!(),
            });
        }
        Ok(value)
    }

    fn additive(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.multiplicative()?;
        loop {
            if self.eat(&TokenKind::Plus) {
                value += self.multiplicative()?;
            } else if self.eat(&TokenKind::Minus) {
                value -= self.multiplicative()?;
            } else {
                break;
            }
        }
        Ok(value)
    }

    fn multiplicative(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.power()?;
        loop {
            if self.eat(&TokenKind::Star) {
                value *= self.power()?;
            } else if self.eat(&TokenKind::Slash) {
                let rhs = self.power()?;
                if rhs == 0.0 {
                    return Err(FormulaError::Arithmetic { op: "division" });
                }
                value /= rhs;
            } else if self.eat(&TokenKind::Percent) {
                let rhs = self.power()?;
                if rhs == 0.0 {
                    return Err(FormulaError::Arithmetic { op: "modulo" });
                }
                value %= rhs;
            } else {
                break;
            }
        }
        Ok(value)
    }

    fn power(&mut self) -> Result<f64, FormulaError> {
        let base = self.unary()?;
        if self.eat(&TokenKind::Caret) {
            // Right-associative: 2^3^2 == 2^(3^2).
            let exponent = self.power()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    fn unary(&mut self) -> Result<f64, FormulaError> {
        if self.eat(&TokenKind::Plus) {
            self.unary()
        } else if self.eat(&TokenKind::Minus) {
            Ok(-self.unary()?)
        } else if self.eat(&TokenKind::Bang) {
            Ok(as_double(!truthy(self.unary()?)))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Result<f64, FormulaError> {
        let Some(token) = self.peek() else {
            return Err(FormulaError::syntax(self.end_pos(), "<end>"));
        };
        let pos = token.pos;
        let kind = token.kind.clone();
        self.idx += 1;
        match kind {
            TokenKind::Num(value) => Ok(value),
            TokenKind::Ident(name) => self
                .ctx
                .resolve(&name)
                .ok_or(FormulaError::UnknownVariable { name }),
            TokenKind::LParen => {
                let value = self.or_expr()?;
                if self.eat(&TokenKind::RParen) {
                    Ok(value)
                } else {
                    match self.peek() {
                        Some(t) => Err(FormulaError::syntax(t.pos, t.kind.display())),
                        None => Err(FormulaError::syntax(self.end_pos(), "<end>")),
                    }
                }
            }
            kind => Err(FormulaError::syntax(pos, kind.display())),
        }
    }
}

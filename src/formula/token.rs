//! Formula tokenizer.
//!
//! Splits an expression string into tokens for the recursive-descent parser.
//! `//` starts a line comment that discards the rest of the input. There are
//! no block comments; a stray `*/` tokenizes as `*` followed by `/` and the
//! parser rejects it as an operator run.

use super::error::FormulaError;

/// One lexical token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset in the source expression, for error reporting.
    pub pos: usize,
}

/// Token kinds the grammar understands.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Numeric literal.
    Num(f64),
    /// Identifier: variable or stat name.
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// Power operator: `^` or `**`.
    Caret,
    Bang,
    LParen,
    RParen,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
}

impl TokenKind {
    /// Author-facing rendering used in error messages.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            TokenKind::Num(n) => format!("{n}"),
            TokenKind::Ident(s) => s.clone(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Percent => "%".to_string(),
            TokenKind::Caret => "^".to_string(),
            TokenKind::Bang => "!".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::Le => "<=".to_string(),
            TokenKind::Gt => ">".to_string(),
            TokenKind::Ge => ">=".to_string(),
            TokenKind::EqEq => "==".to_string(),
            TokenKind::NotEq => "!=".to_string(),
            TokenKind::AndAnd => "&&".to_string(),
            TokenKind::OrOr => "||".to_string(),
        }
    }
}

/// Tokenize a formula.
///
/// Returns `FormulaError::Syntax` on any character the grammar does not
/// know, including a lone `&` or `|`.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, FormulaError> {
    let bytes = expr.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        let pos = i;

        match c {
            ' ' | '\t' | '\r' | '\n' => {
                i += 1;
            }
            '0'..='9' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if i < bytes.len() && bytes[i] == b'.' {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let text = &expr[start..i];
                let value: f64 = text
                    .parse()
                    .map_err(|_| FormulaError::syntax(start, text))?;
                tokens.push(Token {
                    kind: TokenKind::Num(value),
                    pos,
                });
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start = i;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(expr[start..i].to_string()),
                    pos,
                });
            }
            '+' => {
                tokens.push(Token { kind: TokenKind::Plus, pos });
                i += 1;
            }
            '-' => {
                tokens.push(Token { kind: TokenKind::Minus, pos });
                i += 1;
            }
            '*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    tokens.push(Token { kind: TokenKind::Caret, pos });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Star, pos });
                    i += 1;
                }
            }
            '/' => {
                if bytes.get(i + 1) == Some(&b'/') {
                    // Line comment: skip to the end of the line.
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                } else {
                    tokens.push(Token { kind: TokenKind::Slash, pos });
                    i += 1;
                }
            }
            '%' => {
                tokens.push(Token { kind: TokenKind::Percent, pos });
                i += 1;
            }
            '^' => {
                tokens.push(Token { kind: TokenKind::Caret, pos });
                i += 1;
            }
            '(' => {
                tokens.push(Token { kind: TokenKind::LParen, pos });
                i += 1;
            }
            ')' => {
                tokens.push(Token { kind: TokenKind::RParen, pos });
                i += 1;
            }
            '<' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token { kind: TokenKind::Le, pos });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Lt, pos });
                    i += 1;
                }
            }
            '>' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token { kind: TokenKind::Ge, pos });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Gt, pos });
                    i += 1;
                }
            }
            '=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token { kind: TokenKind::EqEq, pos });
                    i += 2;
                } else {
                    return Err(FormulaError::syntax(pos, "="));
                }
            }
            '!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token { kind: TokenKind::NotEq, pos });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Bang, pos });
                    i += 1;
                }
            }
            '&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push(Token { kind: TokenKind::AndAnd, pos });
                    i += 2;
                } else {
                    return Err(FormulaError::syntax(pos, "&"));
                }
            }
            '|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push(Token { kind: TokenKind::OrOr, pos });
                    i += 2;
                } else {
                    return Err(FormulaError::syntax(pos, "|"));
                }
            }
            other => {
                return Err(FormulaError::syntax(pos, other.to_string()));
            }
        }
    }

    Ok(tokens)
}

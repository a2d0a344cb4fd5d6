//! Arithmetic formula evaluation.
//!
//! Formulas are restricted to numeric literals, reference tokens, unary `+`/`-`,
//! binary `+ - * /` and parentheses. The grammar:
//!
//! ```text
//!   expression --> term ( ("+" | "-") term )*
//!   term       --> unary ( ("*" | "/") unary )*
//!   unary      --> ("+" | "-") unary | primary
//!   primary    --> NUMBER | REFERENCE | "(" expression ")"
//! ```
//!
//! Evaluation happens while parsing, so long operator chains never build deep trees.

use std::collections::{BTreeMap, HashMap};

use super::cell_ref::CellRef;
use super::error::EvalError;
use super::reference::{RefToken, ReferenceMode, reference_re};

/// Nesting limit for parentheses and unary operators.
const MAX_NESTING: usize = 256;

/// Read access to the value text other cells expose to formulas.
pub trait CellValues {
    /// Value text of `cell`, or None when the cell is empty.
    fn value_text(&self, cell: &CellRef) -> Option<String>;
}

impl CellValues for HashMap<CellRef, String> {
    fn value_text(&self, cell: &CellRef) -> Option<String> {
        self.get(cell).cloned()
    }
}

impl CellValues for BTreeMap<CellRef, String> {
    fn value_text(&self, cell: &CellRef) -> Option<String> {
        self.get(cell).cloned()
    }
}

/// Where a formula was written and where it is being evaluated.
#[derive(Clone, Debug)]
pub struct Placement {
    pub origin: CellRef,
    pub dest: CellRef,
}

impl Placement {
    /// Evaluation in the cell the formula was written in.
    pub fn in_place(cell: &CellRef) -> Placement {
        Placement {
            origin: cell.clone(),
            dest: cell.clone(),
        }
    }

    pub fn relocated(origin: &CellRef, dest: &CellRef) -> Placement {
        Placement {
            origin: origin.clone(),
            dest: dest.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ref(RefToken),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> Result<Vec<Token>, EvalError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
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
                let literal = &src[start..i];
                let n = literal
                    .parse::<f64>()
                    .map_err(|_| EvalError::InvalidNumber(literal.to_string()))?;
                tokens.push(Token::Number(n));
            }
            b'$' | b'A'..=b'Z' => {
                let Some(m) = reference_re().find_at(src, i).filter(|m| m.start() == i) else {
                    return Err(unexpected_char(src, i));
                };
                let token = RefToken::parse(m.as_str()).ok_or_else(|| unexpected_char(src, i))?;
                tokens.push(Token::Ref(token));
                i = m.end();
            }
            _ => return Err(unexpected_char(src, i)),
        }
    }

    Ok(tokens)
}

fn unexpected_char(src: &str, pos: usize) -> EvalError {
    let ch = src[pos..].chars().next().unwrap_or('?');
    EvalError::UnexpectedChar { ch, pos }
}

struct Evaluator<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    values: &'a dyn CellValues,
    mode: ReferenceMode,
    has_marker: bool,
    placement: &'a Placement,
    source: &'a str,
}

impl Evaluator<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(EvalError::TooDeep);
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    acc += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    acc -= self.term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    acc *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    acc /= divisor;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.enter()?;
                let v = -self.unary()?;
                self.depth -= 1;
                Ok(v)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.enter()?;
                let v = self.unary()?;
                self.depth -= 1;
                Ok(v)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Ref(token)) => self.reference(&token),
            Some(Token::LParen) => {
                self.enter()?;
                let v = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => {
                        self.depth -= 1;
                        Ok(v)
                    }
                    Some(other) => Err(EvalError::UnexpectedToken(describe(&other))),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some(other) => Err(EvalError::UnexpectedToken(describe(&other))),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn reference(&self, token: &RefToken) -> Result<f64, EvalError> {
        let Placement { origin, dest } = self.placement;
        let Some(cell) = token.resolve(self.mode, self.has_marker, origin, dest) else {
            return Ok(0.0);
        };
        // The destination holds this formula, not its last result.
        if self.mode == ReferenceMode::Legacy && cell == *dest {
            return Err(EvalError::NonNumeric {
                cell: cell.to_string(),
                text: self.source.to_string(),
            });
        }
        let Some(text) = self.values.value_text(&cell) else {
            return Ok(0.0);
        };
        parse_value_text(&text).ok_or_else(|| EvalError::NonNumeric {
            cell: cell.to_string(),
            text,
        })
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => n.to_string(),
        Token::Ref(r) => format!("reference at {}..{}", r.span.start, r.span.end),
        Token::Plus => "+".to_string(),
        Token::Minus => "-".to_string(),
        Token::Star => "*".to_string(),
        Token::Slash => "/".to_string(),
        Token::LParen => "(".to_string(),
        Token::RParen => ")".to_string(),
    }
}

/// Numeric reading of a cell's value text: empty is zero, otherwise a finite number.
pub fn parse_value_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    parse_number(trimmed)
}

/// Strict numeric parse used by aggregates and references: finite numbers only.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    // Rejects "inf", "NaN" and friends that `f64::from_str` would accept.
    let has_word = trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E');
    if trimmed.is_empty() || has_word {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Evaluate a formula (leading `=` optional) at `placement`.
pub fn evaluate(
    formula: &str,
    placement: &Placement,
    mode: ReferenceMode,
    values: &dyn CellValues,
) -> Result<f64, EvalError> {
    let expression = formula.strip_prefix('=').unwrap_or(formula);
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut evaluator = Evaluator {
        tokens,
        pos: 0,
        depth: 0,
        values,
        mode,
        has_marker: expression.contains('$'),
        placement,
        source: formula,
    };
    let result = evaluator.expression()?;
    if let Some(extra) = evaluator.peek() {
        return Err(EvalError::UnexpectedToken(describe(extra)));
    }
    if !result.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(result)
}

/// Evaluate a formula in the cell it was written in.
pub fn evaluate_in_place(
    formula: &str,
    cell: &CellRef,
    mode: ReferenceMode,
    values: &dyn CellValues,
) -> Result<f64, EvalError> {
    evaluate(formula, &Placement::in_place(cell), mode, values)
}

//! Expression evaluation and natural width inference

use super::Pass;
use crate::error::ErrorKind;
use crate::opcodes::{self, Opcode};
use crate::parser::{ByteSelect, Expr, ExpressionParser, Sign, Term};
use crate::symbol::SymbolTable;

/// How many bytes an expression occupies, as far as its spelling tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// `<expr`: only the low byte.
    ForcedLow,
    /// `>expr`: only the high byte.
    ForcedHigh,
    /// Evidently wide: a label, `*`, a hex literal with more than two digits,
    /// or a decimal outside the byte range.
    Word,
    /// Left to the sign-extension rule once the value is known.
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprValue {
    pub value: u16,
    pub width: Width,
}

impl ExprValue {
    pub fn lsb(&self) -> u8 {
        self.value as u8
    }

    pub fn msb(&self) -> u8 {
        (self.value >> 8) as u8
    }
}

/// Result of evaluating a whole element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluated {
    /// The element is an instruction mnemonic.
    Opcode(Opcode),
    Value(ExprValue),
}

pub struct ExpressionEvaluator<'a> {
    symbols: &'a SymbolTable,
    current_address: u16,
    pass: Pass,
}

impl<'a> ExpressionEvaluator<'a> {
    /// `current_address` is what `*` evaluates to. During the first pass label
    /// references are not looked up at all.
    pub fn new(symbols: &'a SymbolTable, current_address: u16, pass: Pass) -> Self {
        Self {
            symbols,
            current_address,
            pass,
        }
    }

    pub fn evaluate_element(&self, text: &str) -> Result<Evaluated, ErrorKind> {
        if let Some(op) = opcodes::lookup(text) {
            return Ok(Evaluated::Opcode(op));
        }
        let expr = ExpressionParser::parse(text)?;
        self.evaluate(&expr).map(Evaluated::Value)
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<ExprValue, ErrorKind> {
        let mut sum: i64 = 0;
        let mut wide = false;
        for (sign, term) in &expr.terms {
            let (value, is_word) = self.term(*sign, term)?;
            wide |= is_word;
            sum = match sign {
                Sign::Plus => sum.wrapping_add(value),
                Sign::Minus => sum.wrapping_sub(value),
            };
        }
        let width = match expr.select {
            Some(ByteSelect::Low) => Width::ForcedLow,
            Some(ByteSelect::High) => Width::ForcedHigh,
            None if wide => Width::Word,
            None => Width::Unspecified,
        };
        Ok(ExprValue {
            value: sum as u16,
            width,
        })
    }

    /// Value of one term and whether it is evidently word-sized.
    fn term(&self, sign: Sign, term: &Term) -> Result<(i64, bool), ErrorKind> {
        Ok(match term {
            Term::Char(c) => (*c as i64, false),
            Term::Hex { value, digits } => (*value as i64, *digits > 2),
            Term::Decimal(n) => {
                let wide = match sign {
                    Sign::Plus => *n > 255,
                    Sign::Minus => *n > 128,
                };
                ((*n & 0xFFFF) as i64, wide)
            }
            Term::CurrentAddress => (self.current_address as i64, true),
            Term::Opcode(code) => (*code as i64, false),
            Term::Label(name) => match self.pass {
                Pass::First => (0, true),
                Pass::Second => {
                    let addr = self
                        .symbols
                        .get(name)
                        .ok_or_else(|| ErrorKind::UnknownReference(name.clone()))?;
                    (addr as i64, true)
                }
            },
        })
    }
}

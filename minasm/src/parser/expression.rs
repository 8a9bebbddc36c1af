//! Expression parsing for operands and data elements
//!
//! Grammar: `['<' | '>'] term (('+' | '-') term)*`, where a term may carry
//! its own leading sign.

use super::number::NumberParser;
use crate::error::ErrorKind;
use crate::opcodes;

/// Explicit byte selection written in front of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSelect {
    /// `<expr`
    Low,
    /// `>expr`
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// `'c'` or `"c"`
    Char(u8),
    /// `0x` literal; `digits` decides its natural width.
    Hex { value: u16, digits: usize },
    Decimal(u64),
    /// `*`
    CurrentAddress,
    /// A mnemonic used as a numeric constant.
    Opcode(u8),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub select: Option<ByteSelect>,
    pub terms: Vec<(Sign, Term)>,
}

const LABEL_END: &[u8] = b" +-\n\r\t,;";

pub struct ExpressionParser;

impl ExpressionParser {
    /// Parse one element as an expression. The whole element must be consumed.
    pub fn parse(text: &str) -> Result<Expr, ErrorKind> {
        let b = text.as_bytes();
        let mut x = 0;

        let select = match b.first() {
            Some(b'<') => Some(ByteSelect::Low),
            Some(b'>') => Some(ByteSelect::High),
            _ => None,
        };
        if select.is_some() {
            x += 1;
        }

        let mut terms = Vec::new();
        loop {
            let sign = match b.get(x) {
                Some(b'+') => {
                    x += 1;
                    Sign::Plus
                }
                Some(b'-') => {
                    x += 1;
                    Sign::Minus
                }
                _ => Sign::Plus,
            };
            let (term, len) = Self::parse_term(text, x)?;
            terms.push((sign, term));
            x += len;
            if !matches!(b.get(x), Some(b'+' | b'-')) {
                break;
            }
        }

        if x != b.len() {
            return Err(ErrorKind::InvalidExpression);
        }
        Ok(Expr { select, terms })
    }

    /// Parse the term starting at `x`, returning it with its length in bytes.
    fn parse_term(text: &str, x: usize) -> Result<(Term, usize), ErrorKind> {
        let b = text.as_bytes();
        match b.get(x) {
            Some(&quote @ (b'\'' | b'"')) => match (b.get(x + 1), b.get(x + 2)) {
                (Some(&c), Some(&close)) if close == quote => Ok((Term::Char(c), 3)),
                _ => Err(ErrorKind::InvalidExpression),
            },
            Some(b'0') if b.get(x + 1) == Some(&b'x') => {
                let digits = NumberParser::hex_digits(&b[x + 2..]);
                if digits == 0 {
                    return Err(ErrorKind::InvalidHex);
                }
                let value = NumberParser::parse_hex(&b[x + 2..x + 2 + digits]);
                Ok((Term::Hex { value, digits }, 2 + digits))
            }
            Some(b'*') => Ok((Term::CurrentAddress, 1)),
            Some(c) if c.is_ascii_digit() => {
                let digits = NumberParser::dec_digits(&b[x..]);
                Ok((Term::Decimal(NumberParser::parse_decimal(&b[x..x + digits])), digits))
            }
            _ => {
                let len = b[x.min(b.len())..]
                    .iter()
                    .position(|c| LABEL_END.contains(c))
                    .unwrap_or(b.len().saturating_sub(x));
                if len == 0 {
                    return Err(ErrorKind::EmptyExpression);
                }
                let name = &text[x..x + len];
                let term = match opcodes::lookup(name) {
                    Some(op) => Term::Opcode(op.code),
                    None => Term::Label(name.to_string()),
                };
                Ok((term, len))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> Term {
        let mut expr = ExpressionParser::parse(text).unwrap();
        assert_eq!(expr.terms.len(), 1);
        expr.terms.remove(0).1
    }

    #[test]
    fn test_literals() {
        assert_eq!(single("0x1f"), Term::Hex { value: 0x1F, digits: 2 });
        assert_eq!(single("0x0012"), Term::Hex { value: 0x12, digits: 4 });
        assert_eq!(single("200"), Term::Decimal(200));
        assert_eq!(single("'A'"), Term::Char(b'A'));
        assert_eq!(single("\"'\""), Term::Char(b'\''));
        assert_eq!(single("*"), Term::CurrentAddress);
    }

    #[test]
    fn test_labels_and_mnemonics() {
        assert_eq!(single("loop"), Term::Label("loop".to_string()));
        assert_eq!(single("ldi"), Term::Opcode(0x74));
        assert_eq!(single("_tmp.1"), Term::Label("_tmp.1".to_string()));
    }

    #[test]
    fn test_byte_select() {
        let expr = ExpressionParser::parse("<table+1").unwrap();
        assert_eq!(expr.select, Some(ByteSelect::Low));
        assert_eq!(
            expr.terms,
            vec![
                (Sign::Plus, Term::Label("table".to_string())),
                (Sign::Plus, Term::Decimal(1)),
            ]
        );
        assert_eq!(ExpressionParser::parse(">*").unwrap().select, Some(ByteSelect::High));
    }

    #[test]
    fn test_signed_terms() {
        let expr = ExpressionParser::parse("-5+*-0x10").unwrap();
        assert_eq!(
            expr.terms,
            vec![
                (Sign::Minus, Term::Decimal(5)),
                (Sign::Plus, Term::CurrentAddress),
                (Sign::Minus, Term::Hex { value: 0x10, digits: 2 }),
            ]
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(ExpressionParser::parse("0x"), Err(ErrorKind::InvalidHex));
        assert_eq!(ExpressionParser::parse("0xZZ"), Err(ErrorKind::InvalidHex));
        assert_eq!(ExpressionParser::parse("<"), Err(ErrorKind::EmptyExpression));
        assert_eq!(ExpressionParser::parse("5+"), Err(ErrorKind::EmptyExpression));
        assert_eq!(ExpressionParser::parse("5++3"), Err(ErrorKind::EmptyExpression));
        assert_eq!(ExpressionParser::parse("12ab"), Err(ErrorKind::InvalidExpression));
        assert_eq!(ExpressionParser::parse("'ab'"), Err(ErrorKind::InvalidExpression));
        assert_eq!(ExpressionParser::parse("0x12*"), Err(ErrorKind::InvalidExpression));
    }
}

//! Parser module for assembly source

pub mod expression;
pub mod lexer;
pub mod number;

pub use expression::{ByteSelect, Expr, ExpressionParser, Sign, Term};
pub use lexer::{Element, Scan, is_string_literal, line_at, next_element};

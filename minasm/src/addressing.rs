//! Operand placement: how many bytes a value takes and whether it fits the
//! operand an instruction is waiting for.

use std::collections::VecDeque;

use crate::error::ErrorKind;
use crate::eval::{ExprValue, Pass, Width};
use crate::opcodes::Operand;

/// Bytes produced by one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    One(u8),
    /// Little-endian word.
    Two(u8, u8),
}

impl Emission {
    pub fn bytes(&self) -> impl Iterator<Item = u8> {
        let (first, second) = match *self {
            Emission::One(b) => (b, None),
            Emission::Two(lo, hi) => (lo, Some(hi)),
        };
        std::iter::once(first).chain(second)
    }
}

/// What happens to the pending operand after a value was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// The operand is complete.
    Drain,
    /// Only one byte of a word operand was supplied; the other byte must
    /// follow as its own element.
    NarrowToByte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub emission: Emission,
    pub next: Next,
}

/// True if `value` can stand in for a single byte: its high byte is zero, or
/// it is the sign extension of a negative byte (`0xFF80..=0xFFFF`).
pub fn sign_extends_to_byte(value: u16) -> bool {
    let [lsb, msb] = value.to_le_bytes();
    msb == 0x00 || (msb == 0xFF && lsb & 0x80 != 0)
}

/// Resolves an expression of unspecified width to one byte, failing with
/// `err` if it doesn't fit. Values are not checked before they are known.
fn unspecified_byte(value: ExprValue, pass: Pass, err: ErrorKind) -> Result<u8, ErrorKind> {
    if pass == Pass::First || sign_extends_to_byte(value.value) {
        Ok(value.lsb())
    } else {
        Err(err)
    }
}

/// The error for an operand that doesn't fit `expect` at all, e.g. a mnemonic.
pub fn mismatch(expect: Operand) -> ErrorKind {
    match expect {
        Operand::Byte => ErrorKind::ExpectingByte,
        Operand::ZeroPage => ErrorKind::ExpectingZeroPage,
        Operand::Word => ErrorKind::ExpectingWord,
        Operand::FastJump => ErrorKind::InvalidFastJump,
    }
}

/// Places a value written where no operand is pending (data).
pub fn place_free(value: ExprValue, pass: Pass) -> Result<Emission, ErrorKind> {
    Ok(match value.width {
        Width::ForcedLow => Emission::One(value.lsb()),
        Width::ForcedHigh => Emission::One(value.msb()),
        Width::Word => Emission::Two(value.lsb(), value.msb()),
        Width::Unspecified => Emission::One(unspecified_byte(
            value,
            pass,
            ErrorKind::SizeUnclear { value: value.value },
        )?),
    })
}

/// Places a value as the operand `expect`. `pc` is the address the operand
/// itself is assembled at.
pub fn place_operand(
    expect: Operand,
    value: ExprValue,
    pc: u16,
    pass: Pass,
) -> Result<Placement, ErrorKind> {
    let checked = pass == Pass::Second;
    let one = |b| Placement { emission: Emission::One(b), next: Next::Drain };
    match expect {
        Operand::Byte => match value.width {
            Width::ForcedLow => Ok(one(value.lsb())),
            Width::ForcedHigh => Ok(one(value.msb())),
            Width::Word => Err(ErrorKind::ExpectingByte),
            Width::Unspecified => {
                unspecified_byte(value, pass, ErrorKind::ExpectingByte).map(one)
            }
        },
        Operand::ZeroPage => match value.width {
            Width::ForcedHigh => Err(ErrorKind::ExpectingZeroPage),
            Width::ForcedLow => Ok(one(value.lsb())),
            Width::Word | Width::Unspecified => {
                if checked && value.msb() != 0x00 {
                    Err(ErrorKind::ExpectingZeroPage)
                } else {
                    Ok(one(value.lsb()))
                }
            }
        },
        Operand::Word => place_word(value, pass),
        Operand::FastJump => match value.width {
            Width::ForcedHigh => Err(ErrorKind::InvalidFastJump),
            Width::ForcedLow => Ok(one(value.lsb())),
            Width::Word | Width::Unspecified => {
                if checked && value.msb() != pc.to_be_bytes()[0] {
                    Err(ErrorKind::InvalidFastJump)
                } else {
                    Ok(one(value.lsb()))
                }
            }
        },
    }
}

/// A word operand takes both bytes of a wide value. A single byte (forced, or
/// a small unspecified value) is accepted too, but then the word is only
/// half written and the next element has to supply the other byte.
///
/// Nothing checks that the two halves come from the same value: `<a >b` is
/// as valid as `<a >a`.
pub fn place_word(value: ExprValue, pass: Pass) -> Result<Placement, ErrorKind> {
    let half = |b| Placement { emission: Emission::One(b), next: Next::NarrowToByte };
    match value.width {
        Width::ForcedLow => Ok(half(value.lsb())),
        Width::ForcedHigh => Ok(half(value.msb())),
        Width::Word => Ok(Placement {
            emission: Emission::Two(value.lsb(), value.msb()),
            next: Next::Drain,
        }),
        Width::Unspecified => unspecified_byte(value, pass, ErrorKind::UnclearWord).map(half),
    }
}

/// Operands still expected by the last instruction, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgQueue {
    pending: VecDeque<Operand>,
}

impl ArgQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, args: &[Operand]) {
        self.pending = args.iter().copied().collect();
    }

    pub fn front(&self) -> Option<Operand> {
        self.pending.front().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn advance(&mut self, next: Next) {
        match next {
            Next::Drain => {
                self.pending.pop_front();
            }
            Next::NarrowToByte => {
                if let Some(front) = self.pending.front_mut() {
                    *front = Operand::Byte;
                }
            }
        }
    }
}

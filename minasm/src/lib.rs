//! Two-pass assembler for the "Minimal" 8-bit CPU producing Intel HEX
//! - Whitespace/comma separated elements, `;` comments up to the end of line
//! - Labels (`name:`) may be referenced before they are defined
//! - Expressions of hex (`0x`), decimal, character and mnemonic terms joined
//!   by `+`/`-`, with `<` / `>` selecting the low / high byte
//!
//! ## Features
//! - **Directives**:
//!   - `#org 0xHHHH` — continue assembly at a new address.
//!   - `#page` — skip to the next 256-byte boundary.
//!   - `#mute` / `#emit` — stop / resume emitting bytes while still counting
//!     addresses (useful for reserving RAM variables).
//! - **Dotted mnemonics**: `AB.C` is read as `CAB` (e.g. `DI.L` is `LDI`).
//! - **Fast jumps**: single-byte jump targets are checked to stay on the
//!   current 256-byte page.
//! - **Symbol export**: labels can be listed as `#org` lines for use by
//!   another program.
//!
//! ## Optional Features
//! - `listing`: enables assembling with a human-readable listing of every
//!   element and the bytes it produced.
//!
//! ## Basic Usage
//! ```rust
//! use minasm::Assembler;
//!
//! fn main() -> Result<(), minasm::AsmError> {
//!     let mut assembler = Assembler::new();
//!     let hex = assembler.assemble_hex("LDI 0x05")?;
//!     assert_eq!(hex, ":02000000740585\n:00000001FF\n");
//!     Ok(())
//! }
//! ```

mod addressing;
mod assembler;
mod error;
mod eval;
pub mod hex;
#[cfg(feature = "listing")]
mod listing;
pub mod opcodes;
mod parser;
mod symbol;

// Public exports
pub use assembler::{Assembler, Assembly};
pub use error::{AsmError, ErrorKind};
pub use hex::HexWriter;
#[cfg(feature = "listing")]
pub use listing::{ListingLine, write_listing};
pub use opcodes::{Opcode, Operand};
pub use symbol::SymbolTable;

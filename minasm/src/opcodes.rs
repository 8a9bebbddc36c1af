//! Opcode table of the Minimal CPU instruction set

use std::collections::HashMap;
use std::sync::LazyLock;

/// The kind of value an instruction expects for one of its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Immediate single byte.
    Byte,
    /// Address in page zero, written as a single byte.
    ZeroPage,
    /// 16-bit address, little-endian.
    Word,
    /// Low byte of a target in the same 256-byte page as the operand itself.
    FastJump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub code: u8,
    pub mnemonic: &'static str,
    /// Operands in source order, at most two.
    pub args: &'static [Operand],
}

/// Code of the `???` placeholder entry; it never matches a lookup.
pub const SENTINEL: u8 = 0xFF;

const NONE: &[Operand] = &[];
const B: &[Operand] = &[Operand::Byte];
const Z: &[Operand] = &[Operand::ZeroPage];
const W: &[Operand] = &[Operand::Word];
const F: &[Operand] = &[Operand::FastJump];
const BZ: &[Operand] = &[Operand::Byte, Operand::ZeroPage];
const BW: &[Operand] = &[Operand::Byte, Operand::Word];
const ZB: &[Operand] = &[Operand::ZeroPage, Operand::Byte];
const ZZ: &[Operand] = &[Operand::ZeroPage, Operand::ZeroPage];
const ZW: &[Operand] = &[Operand::ZeroPage, Operand::Word];
const WB: &[Operand] = &[Operand::Word, Operand::Byte];
const WZ: &[Operand] = &[Operand::Word, Operand::ZeroPage];
const WW: &[Operand] = &[Operand::Word, Operand::Word];

const fn op(
    mnemonic: &'static str,
    args: &'static [Operand],
) -> (&'static str, &'static [Operand]) {
    (mnemonic, args)
}

// Index = opcode
#[rustfmt::skip]
static TABLE: [(&str, &[Operand]); 256] = [
    op("NOP", NONE), op("OUT", NONE), op("INT", NONE), op("INK", NONE),
    op("WIN", NONE), op("SEC", NONE), op("CLC", NONE), op("LL0", NONE),
    op("LL1", NONE), op("LL2", NONE), op("LL3", NONE), op("LL4", NONE),
    op("LL5", NONE), op("LL6", NONE), op("LL7", NONE), op("RL0", NONE),
    op("RL1", NONE), op("RL2", NONE), op("RL3", NONE), op("RL4", NONE),
    op("RL5", NONE), op("RL6", NONE), op("RL7", NONE), op("RR1", NONE),
    op("LR0", NONE), op("LR1", NONE), op("LR2", NONE), op("LR3", NONE),
    op("LR4", NONE), op("LR5", NONE), op("LR6", NONE), op("LR7", NONE),
    op("LLZ", Z), op("LLB", W), op("LLV", Z), op("LLW", W),
    op("LLQ", Z), op("LLL", W), op("LRZ", Z), op("LRB", W),
    op("RLZ", Z), op("RLB", W), op("RLV", Z), op("RLW", W),
    op("RLQ", Z), op("RLL", W), op("RRZ", Z), op("RRB", W),
    op("NOT", NONE), op("NOZ", Z), op("NOB", W), op("NOV", Z),
    op("NOW", W), op("NOQ", Z), op("NOL", W), op("NEG", NONE),
    op("NEZ", Z), op("NEB", W), op("NEV", Z), op("NEW", W),
    op("NEQ", Z), op("NEL", W), op("ANI", B), op("ANZ", Z),
    op("ANB", W), op("ANT", Z), op("ANR", W), op("ZAN", Z),
    op("BAN", W), op("ORI", B), op("ORZ", Z), op("ORB", W),
    op("ORT", Z), op("ORR", W), op("ZOR", Z), op("BOR", W),
    op("XRI", B), op("XRZ", Z), op("XRB", W), op("XRT", Z),
    op("XRR", W), op("ZXR", Z), op("BXR", W), op("FNE", F),
    op("FEQ", F), op("FCC", F), op("FCS", F), op("FPL", F),
    op("FMI", F), op("FGT", F), op("FLE", F), op("FPA", F),
    op("BNE", W), op("BEQ", W), op("BCC", W), op("BCS", W),
    op("BPL", W), op("BMI", W), op("BGT", W), op("BLE", W),
    op("JPA", W), op("JPR", W), op("JAR", W), op("JPS", W),
    op("JAS", W), op("RTS", NONE), op("PHS", NONE), op("PLS", NONE),
    op("LDS", B), op("STS", B), op("RDB", WB), op("RDR", W),
    op("RAP", W), op("RZP", ZW), op("WDB", WB), op("WDR", W),
    op("LDI", B), op("LDZ", Z), op("LDB", W), op("LDT", Z),
    op("LDR", W), op("LAP", B), op("LAB", W), op("LZP", ZB),
    op("LZB", ZW), op("STZ", Z), op("STB", W), op("STT", Z),
    op("STR", W), op("SZP", ZB), op("MIZ", BZ), op("MIB", BW),
    op("MIT", BZ), op("MIR", BW), op("MIV", WZ), op("MIW", WW),
    op("MZZ", ZZ), op("MZB", ZW), op("MBZ", WZ), op("MBB", WW),
    op("MVV", ZZ), op("MWV", WZ), op("CLZ", Z), op("CLB", W),
    op("CLV", Z), op("CLW", W), op("CLQ", Z), op("CLL", W),
    op("INC", NONE), op("INZ", Z), op("INB", W), op("INV", Z),
    op("INW", W), op("INQ", Z), op("INL", W), op("DEC", NONE),
    op("DEZ", Z), op("DEB", W), op("DEV", Z), op("DEW", W),
    op("DEQ", Z), op("DEL", W), op("ADI", B), op("ADZ", Z),
    op("ADB", W), op("ADT", Z), op("ADR", W), op("ZAD", Z),
    op("BAD", W), op("TAD", Z), op("RAD", W), op("ADV", Z),
    op("ADW", W), op("ADQ", Z), op("ADL", W), op("AIZ", BZ),
    op("AIB", BW), op("AIT", BZ), op("AIR", BW), op("AIV", BZ),
    op("AIW", BW), op("AIQ", BZ), op("AIL", BW), op("AZZ", ZZ),
    op("AZB", ZW), op("AZV", ZZ), op("AZW", ZW), op("AZQ", ZZ),
    op("AZL", ZW), op("ABZ", WZ), op("ABB", WW), op("ABV", WZ),
    op("ABW", WW), op("ABQ", WZ), op("AVV", ZZ), op("SUI", B),
    op("SUZ", Z), op("SUB", W), op("SUT", Z), op("SUR", W),
    op("ZSU", Z), op("BSU", W), op("TSU", Z), op("RSU", W),
    op("SUV", Z), op("SUW", W), op("SUQ", Z), op("LSU", W),
    op("SIZ", BZ), op("SIB", BW), op("SIT", BZ), op("SIR", BW),
    op("SIV", BZ), op("SIW", BW), op("SIQ", BZ), op("SIL", BW),
    op("SZZ", ZZ), op("SZB", ZW), op("SZV", ZZ), op("SZW", ZW),
    op("SZQ", ZZ), op("SZL", ZW), op("SBZ", WZ), op("SBB", WW),
    op("SBV", WZ), op("SBW", WW), op("SBQ", WZ), op("SVV", ZZ),
    op("CPI", B), op("CPZ", Z), op("CPB", W), op("CPT", Z),
    op("CPR", W), op("CIZ", BZ), op("CIB", BW), op("CIT", BZ),
    op("CIR", BW), op("CZZ", ZZ), op("CZB", ZW), op("CBZ", WZ),
    op("CBB", WW), op("ACI", B), op("ACZ", Z), op("ACB", W),
    op("ZAC", Z), op("BAC", W), op("ACV", Z), op("ACW", W),
    op("SCI", B), op("SCZ", Z), op("SCB", W), op("ZSC", Z),
    op("BSC", W), op("SCV", Z), op("SCW", W), op("???", NONE),
];

static INDEX: LazyLock<HashMap<&'static str, u8>> = LazyLock::new(|| {
    TABLE
        .iter()
        .take(SENTINEL as usize)
        .enumerate()
        .map(|(code, (mnemonic, _))| (*mnemonic, code as u8))
        .collect()
});

/// Returns the table entry for `code`.
pub fn by_code(code: u8) -> Opcode {
    let (mnemonic, args) = TABLE[code as usize];
    Opcode { code, mnemonic, args }
}

/// Looks up a mnemonic, case-insensitively.
///
/// Accepts the plain three-letter form (`LDI`) and the dotted form `AB.C`,
/// which names the mnemonic `CAB` (`DI.L` is `LDI`). Anything else is not a
/// mnemonic.
pub fn lookup(text: &str) -> Option<Opcode> {
    let b = text.as_bytes();
    let key = match b.len() {
        3 => [b[0], b[1], b[2]],
        4 if b[2] == b'.' => [b[3], b[0], b[1]],
        _ => return None,
    }
    .map(|c| c.to_ascii_uppercase());
    let key = std::str::from_utf8(&key).ok()?;
    INDEX.get(key).map(|&code| by_code(code))
}

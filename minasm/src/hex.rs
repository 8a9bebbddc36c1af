//! Intel HEX output

use std::fmt::Write;

/// Data bytes per record.
pub const RECORD_LEN: usize = 16;

pub const EOF_RECORD: &str = ":00000001FF";

/// Buffers emitted bytes and renders them as Intel HEX data records.
///
/// A record is written whenever the buffer fills up or the address is moved.
pub struct HexWriter {
    out: String,
    buffer: Vec<u8>,
    base: u16,
    active: bool,
}

impl HexWriter {
    pub fn new(address: u16) -> Self {
        Self {
            out: String::new(),
            buffer: Vec::with_capacity(RECORD_LEN),
            base: address,
            active: false,
        }
    }

    pub fn emit(&mut self, byte: u8) {
        self.active = true;
        self.buffer.push(byte);
        if self.buffer.len() == RECORD_LEN {
            self.flush();
        }
    }

    /// Continues emission at `address`, closing the pending record first.
    pub fn set_address(&mut self, address: u16) {
        self.flush();
        self.base = address;
    }

    /// Address the next emitted byte lands on.
    pub fn address(&self) -> u16 {
        self.base.wrapping_add(self.buffer.len() as u16)
    }

    /// Writes out what is left plus the end-of-file record. Produces nothing
    /// if no byte was ever emitted.
    pub fn finish(mut self) -> String {
        if self.active {
            self.flush();
            self.out.push_str(EOF_RECORD);
            self.out.push('\n');
        }
        self.out
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let [hi, lo] = self.base.to_be_bytes();
        let len = self.buffer.len() as u8;
        let mut checksum = len.wrapping_add(hi).wrapping_add(lo);
        let _ = write!(self.out, ":{:02X}{:04X}00", len, self.base);
        for &b in &self.buffer {
            checksum = checksum.wrapping_add(b);
            let _ = write!(self.out, "{:02X}", b);
        }
        let _ = writeln!(self.out, "{:02X}", checksum.wrapping_neg());
        self.base = self.base.wrapping_add(self.buffer.len() as u16);
        self.buffer.clear();
    }
}

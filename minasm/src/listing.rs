//! Human-readable assembly listing (feature: "listing")

use std::io::{self, Write};

/// One processed element of the second pass with the bytes it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    pub line: usize,
    pub address: u16,
    pub bytes: Vec<u8>,
    pub text: String,
}

pub fn write_listing<W: Write>(lines: &[ListingLine], mut w: W) -> io::Result<()> {
    writeln!(w, "Line   Address  Bytes        Source")?;
    writeln!(w, "{}", "-".repeat(50))?;
    for entry in lines {
        let hex_bytes = entry
            .bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            w,
            "{:<6} {:04X}     {:<12} {}",
            entry.line, entry.address, hex_bytes, entry.text
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_listing() {
        let lines = vec![
            ListingLine { line: 1, address: 0x8000, bytes: vec![], text: "start:".to_string() },
            ListingLine { line: 2, address: 0x8000, bytes: vec![0x74], text: "LDI".to_string() },
            ListingLine { line: 2, address: 0x8001, bytes: vec![0x05], text: "5".to_string() },
        ];
        let mut out = Vec::new();
        write_listing(&lines, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[3], "2      8000     74           LDI");
        assert!(rows[4].ends_with("05           5"));
    }
}

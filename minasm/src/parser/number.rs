//! Hexadecimal and decimal literal scanning

pub struct NumberParser;

impl NumberParser {
    /// Number of leading hex digits in `s`.
    pub fn hex_digits(s: &[u8]) -> usize {
        s.iter().take_while(|b| b.is_ascii_hexdigit()).count()
    }

    /// Number of leading decimal digits in `s`.
    pub fn dec_digits(s: &[u8]) -> usize {
        s.iter().take_while(|b| b.is_ascii_digit()).count()
    }

    /// Value of a run of hex digits, truncated to 16 bits.
    pub fn parse_hex(digits: &[u8]) -> u16 {
        digits.iter().fold(0u16, |acc, &d| {
            let nibble = (d as char).to_digit(16).unwrap_or(0) as u16;
            (acc << 4) | nibble
        })
    }

    /// Value of a run of decimal digits; saturates instead of overflowing.
    pub fn parse_decimal(digits: &[u8]) -> u64 {
        digits.iter().fold(0u64, |acc, &d| {
            acc.saturating_mul(10).saturating_add((d - b'0') as u64)
        })
    }

    /// Parses the operand of `#org`: `0x` followed by one to four hex digits
    /// and nothing else.
    pub fn parse_address(text: &str) -> Option<u16> {
        let digits = text.strip_prefix("0x")?.as_bytes();
        if digits.is_empty() || digits.len() > 4 || Self::hex_digits(digits) != digits.len() {
            return None;
        }
        Some(Self::parse_hex(digits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(NumberParser::parse_hex(b"FF"), 0xFF);
        assert_eq!(NumberParser::parse_hex(b"ff"), 0xFF);
        assert_eq!(NumberParser::parse_hex(b"1234"), 0x1234);
        assert_eq!(NumberParser::parse_hex(b"12345"), 0x2345);
        assert_eq!(NumberParser::hex_digits(b"12aG"), 3);
    }

    #[test]
    fn test_decimal() {
        assert_eq!(NumberParser::parse_decimal(b"255"), 255);
        assert_eq!(NumberParser::parse_decimal(b"0"), 0);
        assert_eq!(NumberParser::parse_decimal(b"65536"), 65536);
        assert_eq!(NumberParser::dec_digits(b"12+3"), 2);
    }

    #[test]
    fn test_org_address() {
        assert_eq!(NumberParser::parse_address("0x2000"), Some(0x2000));
        assert_eq!(NumberParser::parse_address("0xf"), Some(0x000F));
        assert_eq!(NumberParser::parse_address("0x"), None);
        assert_eq!(NumberParser::parse_address("0x12345"), None);
        assert_eq!(NumberParser::parse_address("0x12g4"), None);
        assert_eq!(NumberParser::parse_address("0x+12"), None);
        assert_eq!(NumberParser::parse_address("2000"), None);
        assert_eq!(NumberParser::parse_address("0X2000"), None);
    }
}

//! Element scanner for assembly source
//!
//! Source text is a stream of elements separated by whitespace or commas.
//! The scanner keeps no state besides the cursor it is handed, so both passes
//! see exactly the same element boundaries.

/// A span of source text forming one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub start: usize,
    pub len: usize,
}

impl Element {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    Eof,
    /// Malformed quoted literal in the element starting at `start`.
    Invalid { start: usize },
    Element(Element),
}

fn is_separator(b: u8) -> bool {
    b <= b' ' || b == b','
}

/// Scans for the next element at or after `cursor`.
pub fn next_element(src: &str, cursor: usize) -> Scan {
    let bytes = src.as_bytes();
    let mut pos = cursor;
    loop {
        match bytes.get(pos) {
            None => return Scan::Eof,
            Some(&b) if is_separator(b) => pos += 1,
            Some(b';') => match bytes[pos..].iter().position(|&b| b == b'\n') {
                Some(nl) => pos += nl + 1,
                None => return Scan::Eof,
            },
            Some(_) => return scan_element(bytes, pos),
        }
    }
}

fn scan_element(bytes: &[u8], start: usize) -> Scan {
    let mut n = start;
    loop {
        match bytes.get(n) {
            Some(&quote @ (b'\'' | b'"')) => {
                n += 1;
                loop {
                    match bytes.get(n) {
                        Some(&b) if b == quote => break,
                        Some(&b) if b >= b' ' => n += 1,
                        // control character or end of input inside quotes
                        _ => return Scan::Invalid { start },
                    }
                }
                n += 1;
            }
            Some(&b) if !is_separator(b) && b != b';' => n += 1,
            _ => return Scan::Element(Element { start, len: n - start }),
        }
    }
}

/// Returns the 1-based line number of the byte at `pos`, counting every
/// newline up to and including it.
pub fn line_at(src: &str, pos: usize) -> usize {
    let upto = (pos + 1).min(src.len());
    1 + src.as_bytes()[..upto].iter().filter(|&&b| b == b'\n').count()
}

/// Returns true for a standalone string such as `"Hello"`: an element opened
/// and closed by the same quote with at least two characters between them.
/// A single quoted character is an expression instead.
pub fn is_string_literal(text: &str) -> bool {
    let b = text.as_bytes();
    b.len() > 3 && matches!(b[0], b'\'' | b'"') && b[b.len() - 1] == b[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(src: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut cursor = 0;
        while let Scan::Element(e) = next_element(src, cursor) {
            out.push(e.text(src));
            cursor = e.end();
        }
        out
    }

    #[test]
    fn test_separators() {
        assert_eq!(elements("LDI 0x05"), vec!["LDI", "0x05"]);
        assert_eq!(elements("  MIZ 1,0x80\n\tRTS"), vec!["MIZ", "1", "0x80", "RTS"]);
        assert_eq!(elements(",,,"), Vec::<&str>::new());
    }

    #[test]
    fn test_comments() {
        assert_eq!(elements("NOP ; comment\nRTS"), vec!["NOP", "RTS"]);
        assert_eq!(elements("NOP;no space\nRTS"), vec!["NOP", "RTS"]);
        assert_eq!(elements("; only a comment"), Vec::<&str>::new());
        assert_eq!(next_element("; trailing", 0), Scan::Eof);
    }

    #[test]
    fn test_quotes_keep_separators() {
        assert_eq!(elements("'Hello, World;' NOP"), vec!["'Hello, World;'", "NOP"]);
        assert_eq!(elements("\"a b\"+1"), vec!["\"a b\"+1"]);
        assert_eq!(elements("'\"'"), vec!["'\"'"]);
    }

    #[test]
    fn test_invalid_quotes() {
        assert_eq!(next_element("  'abc", 0), Scan::Invalid { start: 2 });
        assert_eq!(next_element("'ab\ncd'", 0), Scan::Invalid { start: 0 });
        assert_eq!(next_element("\"tab\there\"", 0), Scan::Invalid { start: 0 });
    }

    #[test]
    fn test_rescan_from_any_offset() {
        let src = "start: LDI 0x05 ; x\nJPA start";
        let first = elements(src);
        let second = elements(src);
        assert_eq!(first, second);
        match next_element(src, 7) {
            Scan::Element(e) => assert_eq!(e.text(src), "LDI"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_line_numbers() {
        let src = "NOP\nNOP\n\nRTS";
        assert_eq!(line_at(src, 0), 1);
        assert_eq!(line_at(src, 4), 2);
        assert_eq!(line_at(src, 9), 4);
        assert_eq!(line_at(src, src.len()), 4);
        assert_eq!(line_at("NOP\n", 4), 2);
    }

    #[test]
    fn test_string_literal_detection() {
        assert!(is_string_literal("'ab'"));
        assert!(is_string_literal("\"Hello\""));
        assert!(!is_string_literal("'a'"));
        assert!(!is_string_literal("''"));
        assert!(!is_string_literal("'a'+1"));
        assert!(!is_string_literal("'ab\""));
    }
}

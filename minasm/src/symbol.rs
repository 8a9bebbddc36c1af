//! Symbol table for labels

use std::collections::HashMap;

use crate::error::ErrorKind;

/// Label addresses in definition order. A name can be defined only once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    labels: HashMap<String, u16>,
    order: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
        self.order.clear();
    }

    pub fn define(&mut self, name: &str, addr: u16) -> Result<(), ErrorKind> {
        if self.labels.contains_key(name) {
            return Err(ErrorKind::DuplicateLabel(name.to_string()));
        }
        self.labels.insert(name.to_string(), addr);
        self.order.push(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.labels.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Labels with their addresses, in the order they were defined.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.labels[name.as_str()]))
    }

    /// Labels whose names start with `tag`; an empty tag selects all.
    pub fn with_prefix<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = (&'a str, u16)> {
        self.iter().filter(move |(name, _)| name.starts_with(tag))
    }

    /// Renders the selected labels as `#org` lines that re-create them, one
    /// per line: `#org 0x1234 name:`.
    pub fn listing(&self, tag: &str) -> String {
        self.with_prefix(tag)
            .map(|(name, addr)| format!("#org 0x{:04x} {}:\n", addr, name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let mut symbols = SymbolTable::new();
        symbols.define("start", 0x8000).unwrap();
        assert_eq!(symbols.get("start"), Some(0x8000));
        assert_eq!(symbols.get("Start"), None);
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn test_duplicate_definition() {
        let mut symbols = SymbolTable::new();
        symbols.define("loop", 0x10).unwrap();
        assert_eq!(
            symbols.define("loop", 0x20),
            Err(ErrorKind::DuplicateLabel("loop".to_string()))
        );
        assert_eq!(symbols.get("loop"), Some(0x10));
    }

    #[test]
    fn test_definition_order() {
        let mut symbols = SymbolTable::new();
        symbols.define("zeta", 3).unwrap();
        symbols.define("alpha", 1).unwrap();
        symbols.define("mid", 2).unwrap();
        let names: Vec<&str> = symbols.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_listing_with_tag() {
        let mut symbols = SymbolTable::new();
        symbols.define("_Print", 0xB01A).unwrap();
        symbols.define("loop", 0x0005).unwrap();
        symbols.define("_ReadLine", 0x00FF).unwrap();
        assert_eq!(
            symbols.listing("_"),
            "#org 0xb01a _Print:\n#org 0x00ff _ReadLine:\n"
        );
        assert_eq!(symbols.listing("").lines().count(), 3);
        assert_eq!(symbols.listing("none"), "");
    }
}

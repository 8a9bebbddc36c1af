//! Two-pass assembly driver

use tracing::{debug, trace};

use crate::addressing::{self, ArgQueue, Emission};
use crate::error::{AsmError, ErrorKind};
use crate::eval::{Evaluated, ExpressionEvaluator, Pass};
use crate::hex::HexWriter;
#[cfg(feature = "listing")]
use crate::listing::ListingLine;
use crate::opcodes::Operand;
use crate::parser::number::NumberParser;
use crate::parser::{Element, Scan, is_string_literal, line_at, next_element};
use crate::symbol::SymbolTable;

/// Product of a successful assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Intel HEX text, empty if the program emitted no bytes.
    pub hex: String,
    pub labels: SymbolTable,
    /// Program counter after the last element.
    pub extent: u16,
}

pub struct Assembler {
    symbols: SymbolTable,
    start_address: u16,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            start_address: 0x0000,
        }
    }

    // ===== Public API =====

    pub fn assemble(&mut self, src: &str) -> Result<Assembly, AsmError> {
        let output = self.two_pass(src)?;
        Ok(Assembly {
            hex: output.hex,
            labels: self.symbols.clone(),
            extent: output.extent,
        })
    }

    pub fn assemble_hex(&mut self, src: &str) -> Result<String, AsmError> {
        Ok(self.two_pass(src)?.hex)
    }

    /// Like [`Assembler::assemble`], also returning what every element of the
    /// source turned into.
    #[cfg(feature = "listing")]
    pub fn assemble_with_listing(
        &mut self,
        src: &str,
    ) -> Result<(Assembly, Vec<ListingLine>), AsmError> {
        let output = self.two_pass(src)?;
        let assembly = Assembly {
            hex: output.hex,
            labels: self.symbols.clone(),
            extent: output.extent,
        };
        Ok((assembly, output.listing))
    }

    /// Runs only the first pass and lists the labels starting with `tag` as
    /// `#org` statements, so another program can be assembled against them.
    pub fn symbol_listing(&mut self, src: &str, tag: &str) -> Result<String, AsmError> {
        self.first_pass(src)?;
        Ok(self.symbols.listing(tag))
    }

    /// Address assembly starts at when the source has no `#org`.
    pub fn set_origin(&mut self, addr: u16) {
        self.start_address = addr;
    }

    pub fn origin(&self) -> u16 {
        self.start_address
    }

    /// Labels found by the last run.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn lookup(&self, name: &str) -> Option<u16> {
        self.symbols.get(name)
    }

    pub fn reset(&mut self) {
        self.symbols.clear();
        self.start_address = 0x0000;
    }

    // ===== Passes =====

    fn first_pass(&mut self, src: &str) -> Result<u16, AsmError> {
        self.symbols.clear();
        debug!("starting pass 1");
        let mut session = Session::new(src, Pass::First, &mut self.symbols, self.start_address);
        session.run()?;
        let extent = session.pc;
        debug!(labels = self.symbols.len(), extent, "pass 1 done");
        Ok(extent)
    }

    fn two_pass(&mut self, src: &str) -> Result<Output, AsmError> {
        let extent = self.first_pass(src)?;
        debug!("starting pass 2");
        let mut session = Session::new(src, Pass::Second, &mut self.symbols, self.start_address);
        session.run()?;
        Ok(session.finish(extent))
    }
}

struct Output {
    hex: String,
    extent: u16,
    #[cfg(feature = "listing")]
    listing: Vec<ListingLine>,
}

/// State of one scan over the source.
struct Session<'a> {
    src: &'a str,
    pass: Pass,
    /// Written only in the first pass.
    symbols: &'a mut SymbolTable,
    pc: u16,
    emitting: bool,
    args: ArgQueue,
    hex: HexWriter,
    #[cfg(feature = "listing")]
    listing: Vec<ListingLine>,
    #[cfg(feature = "listing")]
    produced: Vec<u8>,
}

impl<'a> Session<'a> {
    fn new(src: &'a str, pass: Pass, symbols: &'a mut SymbolTable, origin: u16) -> Self {
        Self {
            src,
            pass,
            symbols,
            pc: origin,
            emitting: true,
            args: ArgQueue::new(),
            hex: HexWriter::new(origin),
            #[cfg(feature = "listing")]
            listing: Vec::new(),
            #[cfg(feature = "listing")]
            produced: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), AsmError> {
        let mut cursor = 0;
        loop {
            let element = match next_element(self.src, cursor) {
                Scan::Eof => break,
                Scan::Invalid { start } => return Err(self.fail(start, ErrorKind::InvalidElement)),
                Scan::Element(element) => element,
            };
            #[cfg(feature = "listing")]
            let address = self.pc;
            cursor = self.process(element)?;
            #[cfg(feature = "listing")]
            self.record(element.start, cursor, address);
        }
        if !self.args.is_empty() {
            return Err(self.fail(self.src.len(), ErrorKind::MissingArgument));
        }
        Ok(())
    }

    fn finish(self, extent: u16) -> Output {
        Output {
            hex: self.hex.finish(),
            extent,
            #[cfg(feature = "listing")]
            listing: self.listing,
        }
    }

    /// Handles one element and returns where scanning continues.
    fn process(&mut self, element: Element) -> Result<usize, AsmError> {
        let text = element.text(self.src);
        trace!(element = text, pc = self.pc, pass = ?self.pass);
        let result = if let Some(name) = text.strip_suffix(':') {
            self.define(name)
        } else if let Some(directive) = text.strip_prefix('#') {
            return self.directive(directive, element);
        } else {
            match self.args.front() {
                Some(expect) => self.operand(expect, text),
                None => self.free(text),
            }
        };
        result
            .map(|()| element.end())
            .map_err(|kind| self.fail(element.start, kind))
    }

    fn define(&mut self, name: &str) -> Result<(), ErrorKind> {
        if self.pass == Pass::First {
            debug!(name, addr = self.pc, "label");
            self.symbols.define(name, self.pc)?;
        }
        Ok(())
    }

    fn directive(&mut self, name: &str, element: Element) -> Result<usize, AsmError> {
        match name {
            "org" => {
                let (addr, end) = self.org_address(element.end())?;
                debug!(addr, "#org");
                self.pc = addr;
                if self.writes() {
                    self.hex.set_address(addr);
                }
                return Ok(end);
            }
            "page" => {
                let pad = self.pc.wrapping_neg() & 0x00FF;
                self.pc = self.pc.wrapping_add(pad);
                debug!(pad, pc = self.pc, "#page");
                if self.writes() {
                    let addr = self.hex.address().wrapping_add(pad);
                    self.hex.set_address(addr);
                }
            }
            "mute" | "emit" => {
                self.emitting = name == "emit";
                debug!(emitting = self.emitting, pc = self.pc, "#{name}");
            }
            _ => {
                let kind = ErrorKind::UnknownDirective(format!("#{name}"));
                return Err(self.fail(element.start, kind));
            }
        }
        Ok(element.end())
    }

    /// Reads the address element following `#org`.
    fn org_address(&self, cursor: usize) -> Result<(u16, usize), AsmError> {
        match next_element(self.src, cursor) {
            Scan::Element(e) => NumberParser::parse_address(e.text(self.src))
                .map(|addr| (addr, e.end()))
                .ok_or_else(|| self.fail(e.start, ErrorKind::ExpectingOrgAddress)),
            Scan::Invalid { start } => Err(self.fail(start, ErrorKind::ExpectingOrgAddress)),
            Scan::Eof => Err(self.fail(self.src.len(), ErrorKind::ExpectingOrgAddress)),
        }
    }

    /// An element with no operand pending: a string, an instruction or data.
    fn free(&mut self, text: &str) -> Result<(), ErrorKind> {
        if is_string_literal(text) {
            for b in text[1..text.len() - 1].bytes() {
                self.put(b);
            }
            return Ok(());
        }
        let evaluated = self.evaluator().evaluate_element(text)?;
        match evaluated {
            Evaluated::Opcode(op) => {
                self.args.load(op.args);
                self.put(op.code);
            }
            Evaluated::Value(value) => {
                let emission = addressing::place_free(value, self.pass)?;
                self.put_all(emission);
            }
        }
        Ok(())
    }

    fn operand(&mut self, expect: Operand, text: &str) -> Result<(), ErrorKind> {
        let value = match self.evaluator().evaluate_element(text)? {
            Evaluated::Opcode(_) => return Err(addressing::mismatch(expect)),
            Evaluated::Value(value) => value,
        };
        let placement = addressing::place_operand(expect, value, self.pc, self.pass)?;
        self.args.advance(placement.next);
        self.put_all(placement.emission);
        Ok(())
    }

    fn evaluator(&self) -> ExpressionEvaluator<'_> {
        ExpressionEvaluator::new(self.symbols, self.hex.address(), self.pass)
    }

    fn writes(&self) -> bool {
        self.pass == Pass::Second && self.emitting
    }

    fn put(&mut self, byte: u8) {
        self.pc = self.pc.wrapping_add(1);
        if self.writes() {
            self.hex.emit(byte);
        }
        #[cfg(feature = "listing")]
        self.produced.push(byte);
    }

    fn put_all(&mut self, emission: Emission) {
        for b in emission.bytes() {
            self.put(b);
        }
    }

    #[cfg(feature = "listing")]
    fn record(&mut self, start: usize, end: usize, address: u16) {
        let bytes = std::mem::take(&mut self.produced);
        if self.pass == Pass::Second {
            self.listing.push(ListingLine {
                line: line_at(self.src, start),
                address,
                bytes,
                text: self.src[start..end].to_string(),
            });
        }
    }

    fn fail(&self, pos: usize, kind: ErrorKind) -> AsmError {
        AsmError::new(line_at(self.src, pos), kind)
    }
}

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use minasm::{AsmError, Assembler, write_listing};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(version, about = "Assembler for the Minimal 8-bit CPU", long_about = None)]
struct Args {
    /// Assembly source file
    source: PathBuf,

    /// Print labels starting with TAG as `#org` lines instead of assembling.
    /// Give it after the source file, since a following argument is taken as TAG
    #[arg(
        short = 's',
        long = "symbols",
        value_name = "TAG",
        num_args = 0..=1,
        default_missing_value = "",
    )]
    symbols: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write an assembly listing to this file
    #[arg(short, long)]
    listing: Option<PathBuf>,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    match main_real(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn main_real(args: Args) -> Result<ExitCode, Box<dyn Error>> {
    let src = match read_source(&args.source) {
        Ok(src) => src,
        Err(msg) => {
            println!("{msg}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut asm = Assembler::new();
    let product = match &args.symbols {
        Some(tag) => asm.symbol_listing(&src, tag),
        None => match &args.listing {
            Some(path) => assemble_listed(&mut asm, &src, path)?,
            None => asm.assemble_hex(&src),
        },
    };
    let text = match product {
        Ok(text) => text,
        Err(e) => {
            println!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!(labels = asm.symbols().len(), "assembled");

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).map_err(|e| format!("cannot open file: {e}"))?,
        )),
        None => Box::new(io::stdout()),
    };
    output.write_all(text.as_bytes())?;
    output.flush()?;
    Ok(ExitCode::SUCCESS)
}

/// Loads the source text, or the message to print if that fails.
fn read_source(path: &Path) -> Result<String, String> {
    let bytes =
        fs::read(path).map_err(|_| format!("ERROR: Can't open \"{}\".", path.display()))?;
    String::from_utf8(bytes).map_err(|e| {
        format!(
            "ERROR: \"{}\" is not valid UTF-8 (byte {}).",
            path.display(),
            e.utf8_error().valid_up_to()
        )
    })
}

/// Assembles to hex and writes the listing file on success. The outer error
/// is for I/O, the inner one for the source.
fn assemble_listed(
    asm: &mut Assembler,
    src: &str,
    path: &Path,
) -> Result<Result<String, AsmError>, Box<dyn Error>> {
    let (assembly, lines) = match asm.assemble_with_listing(src) {
        Ok(result) => result,
        Err(e) => return Ok(Err(e)),
    };
    let file = File::create(path).map_err(|e| format!("cannot open file: {e}"))?;
    let mut w = BufWriter::new(file);
    write_listing(&lines, &mut w)?;
    w.flush()?;
    tracing::debug!(lines = lines.len(), path = %path.display(), "listing written");
    Ok(Ok(assembly.hex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_symbols_with_tag() {
        let args = Args::try_parse_from(["asm", "prog.asm", "-s_"]).unwrap();
        assert_eq!(args.source, PathBuf::from("prog.asm"));
        assert_eq!(args.symbols.as_deref(), Some("_"));
        assert_eq!(args.log_level, Level::WARN);
    }

    #[test]
    fn test_args_symbols_without_tag() {
        let args = Args::try_parse_from(["asm", "prog.asm", "-s"]).unwrap();
        assert_eq!(args.symbols.as_deref(), Some(""));
    }

    #[test]
    fn test_args_symbols_takes_next_argument() {
        assert!(Args::try_parse_from(["asm", "-s", "prog.asm"]).is_err());
        let args = Args::try_parse_from(["asm", "-s", "_", "prog.asm"]).unwrap();
        assert_eq!(args.symbols.as_deref(), Some("_"));
        assert_eq!(args.source, PathBuf::from("prog.asm"));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["asm", "prog.asm"]).unwrap();
        assert!(args.symbols.is_none());
        assert!(args.output.is_none());
        assert!(args.listing.is_none());
    }

    #[test]
    fn test_args_output_and_level() {
        let args = Args::try_parse_from([
            "asm", "prog.asm", "-o", "prog.hex", "-l", "prog.lst", "--log-level", "DEBUG",
        ])
        .unwrap();
        assert_eq!(args.output, Some(PathBuf::from("prog.hex")));
        assert_eq!(args.listing, Some(PathBuf::from("prog.lst")));
        assert_eq!(args.log_level, Level::DEBUG);
    }

    #[test]
    fn test_args_missing_source() {
        assert!(Args::try_parse_from(["asm"]).is_err());
    }

    #[test]
    fn test_read_source_errors() {
        let dir = std::env::temp_dir();
        let missing = dir.join(format!("minasm-missing-{}.asm", std::process::id()));
        let msg = read_source(&missing).unwrap_err();
        assert_eq!(msg, format!("ERROR: Can't open \"{}\".", missing.display()));

        let path = dir.join(format!("minasm-latin1-{}.asm", std::process::id()));
        fs::write(&path, b"LDI 0x05 ; caf\xE9\n").unwrap();
        let msg = read_source(&path).unwrap_err();
        assert_eq!(msg, format!("ERROR: \"{}\" is not valid UTF-8 (byte 14).", path.display()));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_source_text() {
        let path = std::env::temp_dir().join(format!("minasm-src-{}.asm", std::process::id()));
        fs::write(&path, "LDI 0x05\n").unwrap();
        assert_eq!(read_source(&path).unwrap(), "LDI 0x05\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_listing_file_written() {
        let path = std::env::temp_dir().join(format!("minasm-cli-{}.lst", std::process::id()));
        let mut asm = Assembler::new();
        let hex = assemble_listed(&mut asm, "LDI 0x05", &path).unwrap().unwrap();
        assert_eq!(hex, ":02000000740585\n:00000001FF\n");
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("0000     74"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_listing_skipped_on_error() {
        let path = std::env::temp_dir().join(format!("minasm-cli-err-{}.lst", std::process::id()));
        let mut asm = Assembler::new();
        let err = assemble_listed(&mut asm, "NOP\nLDI", &path).unwrap().unwrap_err();
        assert_eq!(err.to_string(), "ERROR in line 2: Missing argument.");
        assert!(!path.exists());
    }
}

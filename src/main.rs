use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use logfile_printer::{for_path, parse_encoding, LogFilePrinter, PrintMode, PrinterConfig};

/// Prints the records of binary log files.
#[derive(Debug, Parser)]
#[command(name = "logfile-printer", version, about)]
struct Args {
    /// Path pattern of the files to print; may contain glob wildcards and an
    /// `s3://` or `file://` scheme
    path: String,

    /// Print only record offsets
    #[arg(short = 'o', long, conflicts_with = "messages_only")]
    offsets_only: bool,

    /// Print only record payloads
    #[arg(short = 'm', long)]
    messages_only: bool,

    /// Descend into matched directories
    #[arg(short, long)]
    recursive: bool,

    /// Text encoding of payloads (WHATWG label)
    #[arg(long, default_value = "utf-8", value_parser = parse_encoding_arg)]
    encoding: &'static encoding_rs::Encoding,
}

fn parse_encoding_arg(label: &str) -> Result<&'static encoding_rs::Encoding, String> {
    parse_encoding(label).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = PrinterConfig::default()
        .with_mode(PrintMode::from_flags(args.offsets_only, args.messages_only))
        .with_recursive(args.recursive)
        .with_encoding(args.encoding);

    let (fs, pattern) = match for_path(&args.path) {
        Ok(selected) => selected,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let printer = LogFilePrinter::new(fs.as_ref(), config);
    let mut out = io::stdout().lock();
    let mut diag = io::stderr().lock();
    match printer.print(&pattern, &mut out, &mut diag) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            drop(diag);
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! Print the OpenAPI document as JSON, or write it to a file.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use utoipa::OpenApi;
use warden::doc::ApiDoc;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Dump the warden OpenAPI document",
    version
)]
struct CliArgs {
    /// Write to this path instead of standard output.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
}

fn write_document(args: &CliArgs) -> io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|error| io::Error::other(format!("serialise OpenAPI document: {error}")))?;
    match &args.output {
        Some(path) => fs::write(path, format!("{json}\n")),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match write_document(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(io::stderr(), "openapi dump failed: {error}");
            ExitCode::FAILURE
        }
    }
}

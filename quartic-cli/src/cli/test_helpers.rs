//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests parse argument vectors, run commands, and inspect the
//! rendered output. These helpers keep the test cases concise and consistent.

use clap::Parser;
use tempfile::TempDir;

use super::{Cli, CliError, CommandOutput, OutputFormat, render_output, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn parse(args: &[&str]) -> Cli {
    let argv = std::iter::once("quartic").chain(args.iter().copied());
    match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => panic!("arguments {args:?} must parse: {err}"),
    }
}

pub(super) fn run(args: &[&str]) -> CommandOutput {
    match run_cli(parse(args)) {
        Ok(output) => output,
        Err(err) => panic!("command {args:?} must succeed: {err}"),
    }
}

pub(super) fn run_expecting_error(args: &[&str]) -> CliError {
    match run_cli(parse(args)) {
        Ok(output) => panic!("command {args:?} must fail, got {output:?}"),
        Err(err) => err,
    }
}

pub(super) fn render(output: &CommandOutput, format: OutputFormat) -> String {
    let mut buffer = Vec::new();
    if let Err(err) = render_output(output, format, &mut buffer) {
        panic!("rendering into memory must succeed: {err}");
    }
    match String::from_utf8(buffer) {
        Ok(text) => text,
        Err(err) => panic!("rendered output must be UTF-8: {err}"),
    }
}

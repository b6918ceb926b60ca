use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

use service::compare;

/// Exit status for unreadable or malformed input.
const EXIT_INPUT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "compare_jsav",
    version,
    about = "Report snapshot keys whose values differ between two JSON snapshot files"
)]
struct Opt {
    /// Input to compare against the other file
    #[arg(short = 'i', value_name = "PATH")]
    baseline: PathBuf,
    /// File to compare
    #[arg(short = 'c', value_name = "PATH")]
    candidate: PathBuf,
    /// Print a one-line summary naming both files when they differ
    #[arg(long)]
    summary: bool,
}

/// Compare the two files, print mismatch lines to `out`, return the exit status.
fn run(opt: &Opt, out: &mut impl Write) -> io::Result<u8> {
    let report = match compare::compare_files(&opt.baseline, &opt.candidate) {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "comparison aborted");
            eprintln!("error: {e}");
            return Ok(EXIT_INPUT_ERROR);
        }
    };
    debug!(compared = report.compared, mismatches = report.mismatches.len(), "comparison finished");

    for m in &report.mismatches {
        writeln!(out, "{m}")?;
    }
    if opt.summary && !report.is_match() {
        writeln!(out, "{} and {} differ", opt.baseline.display(), opt.candidate.display())?;
    }
    Ok(report.exit_code())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_stderr();
    let opt = Opt::parse();

    match run(&opt, &mut io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: cannot write report: {e}");
            ExitCode::from(EXIT_INPUT_ERROR)
        }
    }
}

// docmatch CLI - link payment events to supporting documents

mod exit_codes;
mod recon;
mod util;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use recon::ReconCommands;

/// Environment variable holding the log filter (e.g. `debug`, `docmatch_recon=trace`).
const LOG_ENV: &str = "DOCMATCH_LOG";

#[derive(Parser)]
#[command(name = "docmatch")]
#[command(about = "Match bank transactions to invoices and receipts")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Log match decisions to stderr (overridden by DOCMATCH_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<ReconCommands>,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\nengine:  docmatch-recon ", env!("CARGO_PKG_VERSION"),
        "\ncontract_version(run): 1",
    )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // stdout is reserved for --json output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: docmatch <command> [options]");
            eprintln!("       docmatch --help for more information");
            Err(CliError { code: EXIT_USAGE, message: String::new(), hint: None })
        }
        Some(cmd) => recon::cmd_recon(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explain_requires_a_target() {
        let parsed = Cli::try_parse_from(["docmatch", "explain", "e.json", "d.json"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn explain_rejects_both_targets() {
        let parsed = Cli::try_parse_from([
            "docmatch", "explain", "e.json", "d.json", "--event", "1", "--document", "2",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["docmatch", "validate", "c.toml", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn hint_is_attached() {
        let err = CliError { code: 2, message: "bad".into(), hint: None }.with_hint("try again");
        assert_eq!(err.hint.as_deref(), Some("try again"));
    }
}

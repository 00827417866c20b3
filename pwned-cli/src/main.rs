mod error;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use pwned_check::{BreachChecker, ClientConfig, DEFAULT_BASE_URL, LookupResult};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use crate::error::Error;

/// Exit status when the password was found in the breach corpus.
const EXIT_BREACHED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "pwned")]
#[command(about = "Check whether a password appears in the Pwned Passwords breach corpus")]
#[command(long_about = "Check whether a password appears in the Pwned Passwords breach corpus.\n\n\
    Only the first five characters of the password's SHA1 digest are sent to the service.\n\
    Exits with 0 if the password was not found, 2 if it was, and 1 on error.")]
struct Args {
    /// Base URL of the range API
    #[arg(long, env = "PWNED_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Ask the service to pad responses with decoy records
    #[arg(long)]
    padding: bool,

    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    stdin: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let password = if args.stdin { read_stdin_line()? } else { prompt()? };
    debug!(api_url = %args.api_url, padding = args.padding, "checking password");

    let config = ClientConfig::new(args.api_url)
        .with_timeout(args.timeout_secs)
        .with_padding(args.padding);
    let checker = BreachChecker::new(config)?;

    let result = checker.is_breached(&password).await?;
    report(&result, args.json)?;

    Ok(if result.breached { ExitCode::from(EXIT_BREACHED) } else { ExitCode::SUCCESS })
}

fn prompt() -> Result<Zeroizing<String>, Error> {
    Ok(Zeroizing::new(rpassword::prompt_password("Password: ")?))
}

fn read_stdin_line() -> Result<Zeroizing<String>, Error> {
    let mut line = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut *line)?;
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
    Ok(line)
}

fn report(result: &LookupResult, json: bool) -> Result<(), Error> {
    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer(&mut stdout, result)?;
        writeln!(stdout)?;
    } else if result.breached {
        writeln!(
            stdout,
            "Breached: this password has been seen {} times before.",
            result.frequency
        )?;
    } else {
        writeln!(stdout, "Not found in any known breach.")?;
    }
    Ok(())
}

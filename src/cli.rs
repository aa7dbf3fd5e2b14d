// src/cli.rs
use std::env;

use color_eyre::eyre::{Result, WrapErr, bail};
use tracing::info;

use crate::config::ScrapeOptions;
use crate::config::consts::{ENV_CSV, ENV_MAX_PAGES, ENV_PAUSE_MS, ENV_RETRIES, ENV_URL};
use crate::core::net::HttpClient;
use crate::progress::ConsoleProgress;
use crate::runner::{self, RunSummary};

pub enum Command {
    Run,
    Help,
}

/// The binary takes no arguments beyond `-h`/`--help`; everything else is environment.
pub fn parse_args<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cmd = Command::Run;
    for a in args {
        match a.as_ref() {
            "-h" | "--help" => cmd = Command::Help,
            other => bail!("Unknown arg: {other} (try --help)"),
        }
    }
    Ok(cmd)
}

pub fn help() -> String {
    format!(
        "eo_scrape - append newly published Executive Orders to a CSV file\n\
         \n\
         USAGE:\n    eo_scrape [-h|--help]\n\
         \n\
         ENVIRONMENT:\n\
         \x20   {ENV_URL:<22} listing URL\n\
         \x20   {ENV_CSV:<22} output CSV path\n\
         \x20   {ENV_RETRIES:<22} attempts per fetch\n\
         \x20   {ENV_PAUSE_MS:<22} pause between article requests (ms)\n\
         \x20   {ENV_MAX_PAGES:<22} listing page cap\n\
         \x20   {:<22} diagnostics filter (tracing syntax)\n",
        "RUST_LOG"
    )
}

/// Parse the process arguments, then do one run against the live site.
/// Individual article failures still return Ok; the summary carries them.
pub fn run() -> Result<Option<RunSummary>> {
    match parse_args(env::args().skip(1))? {
        Command::Help => {
            eprintln!("{}", help());
            return Ok(None);
        }
        Command::Run => {}
    }

    let opts = ScrapeOptions::from_env().wrap_err("invalid configuration")?;
    info!(url = %opts.listing_url, out = %opts.out_path.display(), "starting run");

    let client = HttpClient::new().wrap_err("could not set up HTTP client")?;
    let mut console = ConsoleProgress::stdout();
    let summary = runner::run(&opts, &client, Some(&mut console))?;
    Ok(Some(summary))
}

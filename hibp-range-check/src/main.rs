mod error;
mod report;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use hibp_range::{BreachClient, ClientConfig, MemoryCache, MemoryCacheConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::Error;
use crate::report::{Report, assess, hash_label, password_label};

#[derive(Parser, Debug)]
#[command(name = "hibp-range-check")]
#[command(about = "Check passwords against Have I Been Pwned without sending them anywhere")]
struct Args {
    /// Passwords (or hashes with --hashes) to check. Read one per line from stdin if omitted
    inputs: Vec<String>,

    /// Treat inputs as hex SHA-1 hashes instead of plaintext passwords
    #[arg(long)]
    hashes: bool,

    /// Range API origin (default: $HIBP_RANGE_BASE_URL or the public API)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (default: $HIBP_RANGE_TIMEOUT_SECS or 10)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// User-Agent sent with each request (default: $HIBP_RANGE_USER_AGENT)
    #[arg(long)]
    user_agent: Option<String>,

    /// Maximum cached prefixes; 0 for unbounded
    #[arg(long, default_value_t = hibp_range::cache::DEFAULT_MAX_ENTRIES)]
    cache_size: usize,

    /// Cache TTL in seconds
    #[arg(long, default_value_t = hibp_range::cache::DEFAULT_TTL.as_secs())]
    cache_ttl_secs: u64,

    /// Disable the response cache
    #[arg(long)]
    no_cache: bool,

    /// Emit one JSON object per input
    #[arg(long)]
    json: bool,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }

    /// The client plus a handle on its cache, kept for the run summary.
    fn build_client(&self) -> Result<(BreachClient, Option<Arc<MemoryCache>>), Error> {
        let mut builder = BreachClient::builder().config(self.client_config());
        let cache = (!self.no_cache).then(|| {
            Arc::new(MemoryCache::new(MemoryCacheConfig {
                max_entries: self.cache_size,
                default_ttl: Duration::from_secs(self.cache_ttl_secs),
            }))
        });
        if let Some(cache) = &cache {
            builder = builder.cache(cache.clone());
        }
        Ok((builder.build()?, cache))
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::from(1),
        Ok(false) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

/// Checks every input and prints a report line for each. Returns whether any was breached.
fn run(args: &Args) -> Result<bool, Error> {
    let (client, cache) = args.build_client()?;
    let inputs = if args.inputs.is_empty() { read_stdin_lines()? } else { args.inputs.clone() };
    debug!(count = inputs.len(), hashes = args.hashes, "checking inputs");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut any_breached = false;

    for (index, input) in inputs.iter().enumerate() {
        let (label, result) = if args.hashes {
            (hash_label(index, input), client.check_hash(input))
        } else {
            (password_label(index), client.check(input))
        };

        let outcome = assess(&label, result);
        let report = Report::new(label, outcome);
        any_breached |= report.outcome.is_breached();

        if args.json {
            serde_json::to_writer(&mut out, &report)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{report}")?;
        }
    }

    if let Some(cache) = cache {
        let stats = cache.stats();
        info!(
            inputs = inputs.len(),
            fetched = stats.misses,
            cache_hits = stats.hits,
            "done"
        );
    }
    Ok(any_breached)
}

fn read_stdin_lines() -> Result<Vec<String>, Error> {
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.is_empty() {
            lines.push(line.to_owned());
        }
    }
    Ok(lines)
}

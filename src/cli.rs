use clap::Parser;

use crate::config::Overrides;
use crate::logging::LogFormat;

/// Reconcile scanning-service findings into the findings aggregator
#[derive(Parser, Debug)]
#[command(name = "findings-reconciler")]
#[command(version)]
#[command(
    about = "Sync CISA KEV enrichment from the vulnerability scanner into the findings aggregator",
    long_about = None
)]
pub struct Args {
    /// Path to the event payload JSON; "-" reads from stdin
    #[arg(short, long, default_value = "-", value_name = "PATH")]
    pub event: String,

    /// Path to a YAML config file (defaults to ./reconciler.config.yml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,

    /// Base URL of the scanning service (overrides the config file)
    #[arg(long, value_name = "URL")]
    pub scanner_url: Option<String>,

    /// Base URL of the findings aggregator (overrides the config file)
    #[arg(long, value_name = "URL")]
    pub aggregator_url: Option<String>,

    /// Fetch and compare, but never write to the aggregator
    #[arg(long)]
    pub dry_run: bool,

    /// Log level when RUST_LOG is not set: error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            scanner_url: self.scanner_url.clone(),
            aggregator_url: self.aggregator_url.clone(),
            dry_run: self.dry_run,
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

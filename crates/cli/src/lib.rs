mod check;
mod dump;
mod ls;
mod stat;

use clap::{Parser, Subcommand};
use locus_core::logging::{LogOptions, init_logging};
use locus_core::{LocationConfig, LocationService};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "locus",
    version,
    about = "Resolve identifiers to random-access handles",
    long_about = "Locus maps logical identifiers (paths, URLs, names) to readable handles, \
                  optionally through remapping rules, and caches directory listings."
)]
pub struct Cli {
    /// Map an identifier to another physical name (ID=PATH), repeatable
    #[arg(long = "map", value_name = "ID=PATH", global = true, value_parser = parse_mapping)]
    pub mappings: Vec<(String, String)>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Listing cache lifetime in seconds (enables listing caching)
    #[arg(long, value_name = "SECS", global = true)]
    pub cache_ttl: Option<f64>,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that identifiers can be opened
    Check {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
    },
    /// Show the physical name and length behind identifiers
    Stat {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
    },
    /// Read typed values from an identifier
    Dump(dump::DumpArgs),
    /// List a directory through the listing cache
    Ls {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
        /// Include dot-files
        #[arg(short, long)]
        all: bool,
        /// Print the listing as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn parse_mapping(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, path)) if !id.is_empty() && !path.is_empty() => {
            Ok((id.to_string(), path.to_string()))
        }
        _ => Err(format!("expected ID=PATH, got '{raw}'")),
    }
}

fn load_config(cli: &Cli) -> locus_core::Result<LocationConfig> {
    let mut config = match &cli.config {
        Some(path) => LocationConfig::from_json_file(path)?,
        None => LocationConfig::from_env()?,
    };
    if let Some(ttl) = cli.cache_ttl {
        config.cache_listings = true;
        config.cache_ttl_secs = ttl;
        config.validate()?;
    }
    Ok(config)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _guard = init_logging(
        "cli",
        &LogOptions {
            to_stderr: cli.verbose,
            ..LogOptions::default()
        },
    );

    let config = load_config(&cli)?;
    let service = LocationService::builder().config(config).build();
    for (id, path) in &cli.mappings {
        service.map_id(id, Some(path.as_str()));
    }

    match cli.command {
        Commands::Check { ids } => check::run(&service, &ids),
        Commands::Stat { ids } => stat::run(&service, &ids),
        Commands::Dump(args) => dump::run(&service, &args),
        Commands::Ls { dir, all, json } => ls::run(&service, &dir, all, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mapping() {
        assert_eq!(
            parse_mapping("scan.tif=/data/scan.tif").unwrap(),
            ("scan.tif".to_string(), "/data/scan.tif".to_string())
        );
        assert!(parse_mapping("no-separator").is_err());
        assert!(parse_mapping("=path").is_err());
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "locus", "stat", "a", "b", "--map", "a=/x", "--cache-ttl", "2",
        ])
        .unwrap();
        assert_eq!(cli.mappings, vec![("a".to_string(), "/x".to_string())]);
        assert_eq!(cli.cache_ttl, Some(2.0));
        assert!(matches!(cli.command, Commands::Stat { ref ids } if ids.len() == 2));
    }
}

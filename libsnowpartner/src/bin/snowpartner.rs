//! Snow partner license CLI
//!
//! Usage:
//!   snowpartner parse <key> [--json]
//!   snowpartner validate <key> [--json]
//!   snowpartner info <key>
//!   snowpartner verify <key> [--keyed]
//!   snowpartner generate reseller --org <org> --seats <n> --expires <YYYYMMDD> [--keyed]
//!   snowpartner generate solution --org <org> --expires <YYYYMMDD> [--keyed]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use snow_partner::license::{
    self, format_info_with, generate_reseller_key_with, generate_solution_key_with,
    verify_checksum, ChecksumScheme,
};
use snow_partner::PartnerConfig;

/// Snow-Flow partner license tool
#[derive(Parser)]
#[command(name = "snowpartner")]
#[command(version)]
#[command(about = "Inspect, validate and generate Snow-Flow partner license keys")]
#[command(long_about = None)]
struct Cli {
    /// Partner program config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a license key
    Parse {
        /// License key
        key: String,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a license key against the partner program rules
    Validate {
        /// License key
        key: String,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Show pricing or commission and expiry for a license key
    Info {
        /// License key
        key: String,
    },

    /// Recompute and compare the checksum of a license key
    Verify {
        /// License key
        key: String,

        /// Use the configured checksum secret
        #[arg(long)]
        keyed: bool,
    },

    /// Generate a license key
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,

        /// Use the configured checksum secret
        #[arg(long, global = true)]
        keyed: bool,
    },
}

#[derive(Subcommand)]
enum GenerateKind {
    /// Reseller key with purchased seats
    Reseller {
        /// Organization
        #[arg(long)]
        org: String,

        /// Purchased seats (25 minimum)
        #[arg(long)]
        seats: u32,

        /// Last valid day (YYYYMMDD or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        expires: NaiveDate,
    },

    /// Solution partner key
    Solution {
        /// Organization
        #[arg(long)]
        org: String,

        /// Last valid day (YYYYMMDD or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        expires: NaiveDate,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date {:?}: expected YYYYMMDD or YYYY-MM-DD", s))
}

fn scheme(config: &PartnerConfig, keyed: bool) -> Result<ChecksumScheme> {
    if keyed {
        Ok(config.keyed_scheme()?)
    } else {
        Ok(ChecksumScheme::Rolling)
    }
}

// ============================================================================
// Commands Implementation
// ============================================================================

fn cmd_parse(key: &str, json: bool) -> Result<()> {
    let parsed = license::parse(key)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    println!("Tier: {}", parsed.tier.as_str());
    println!("Partner type: {}", parsed.partner_type);
    println!("Organization: {}", parsed.organization);
    if let Some(seats) = parsed.purchased_seats {
        println!("Purchased seats: {}", seats);
    }
    if let Some(code) = &parsed.referral_code {
        println!("Referral code: {}", code);
    }
    println!("Expires at: {}", parsed.expires_at.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("Checksum: {}", parsed.checksum);

    Ok(())
}

fn cmd_validate(key: &str, json: bool) -> Result<()> {
    let parsed = license::parse(key)?;
    let result = license::validate(&parsed);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.is_valid {
        println!("License is valid");
    } else {
        println!("License is not valid:");
        for error in &result.errors {
            println!("  - {}", error);
        }
    }

    if !result.is_valid {
        bail!("{} validation error(s)", result.errors.len());
    }
    Ok(())
}

fn cmd_info(key: &str, config: &PartnerConfig) -> Result<()> {
    let parsed = license::parse(key)?;
    println!("{}", format_info_with(&parsed, config, Local::now()));
    Ok(())
}

fn cmd_verify(key: &str, config: &PartnerConfig, keyed: bool) -> Result<()> {
    let parsed = license::parse(key)?;
    verify_checksum(&parsed, &scheme(config, keyed)?)?;
    println!("Checksum OK");
    Ok(())
}

fn cmd_generate(kind: GenerateKind, config: &PartnerConfig, keyed: bool) -> Result<()> {
    let scheme = scheme(config, keyed)?;

    let key = match kind {
        GenerateKind::Reseller { org, seats, expires } => {
            generate_reseller_key_with(&scheme, &org, seats, expires)
                .with_context(|| format!("cannot generate reseller key for {:?}", org))?
        }
        GenerateKind::Solution { org, expires } => {
            generate_solution_key_with(&scheme, &org, expires)
                .with_context(|| format!("cannot generate solution key for {:?}", org))?
        }
    };

    println!("{}", key);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = PartnerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Parse { key, json } => cmd_parse(&key, json),
        Commands::Validate { key, json } => cmd_validate(&key, json),
        Commands::Info { key } => cmd_info(&key, &config),
        Commands::Verify { key, keyed } => cmd_verify(&key, &config, keyed),
        Commands::Generate { kind, keyed } => cmd_generate(kind, &config, keyed),
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

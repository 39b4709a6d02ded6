// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regauth_cli_config::{
	load_config, CliConfig, HostDiscoveryEnvironment, LogFormat, LogLevel, LoggingConfig,
};
use regauth_cli_credentials::{CachedLookupEnvironment, DockerCredentialHelperProcess};
use regauth_core::{
	docker_cli_style_auth_file_search_locations, ConfigDiscoveryEnvironment,
	CredentialsLookupEnvironment, RepositoryAddress,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod report;

use report::{FetchReport, ResolveReport};

/// regauth - decide which credentials apply to an OCI repository
#[derive(Parser, Debug)]
#[command(name = "regauth", version, about, long_about = None)]
struct Args {
	/// Path to an extra configuration file, loaded last
	#[arg(short, long, env = "REGAUTH_CONFIG_FILE")]
	config: Option<PathBuf>,

	/// Log level (overrides config)
	#[arg(short, long)]
	log_level: Option<String>,

	/// Output logs as JSON (overrides config)
	#[arg(long)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show which credentials source applies to a repository address
	Resolve {
		/// Repository address such as example.com/foo/bar
		address: String,
		/// Also run the selected credential helper (prints the username only)
		#[arg(long)]
		fetch: bool,
		/// Print the report as JSON
		#[arg(long)]
		json: bool,
	},
	/// List the credentials configuration layers in priority order
	Locations,
	/// List the files searched for ambient Docker-style credentials
	SearchPaths,
}

fn parse_log_level(s: &str) -> Result<LogLevel> {
	match s.to_ascii_lowercase().as_str() {
		"error" => Ok(LogLevel::Error),
		"warn" => Ok(LogLevel::Warn),
		"info" => Ok(LogLevel::Info),
		"debug" => Ok(LogLevel::Debug),
		"trace" => Ok(LogLevel::Trace),
		other => anyhow::bail!("unknown log level {other:?}"),
	}
}

fn apply_overrides(logging: &mut LoggingConfig, args: &Args) -> Result<()> {
	if let Some(level) = &args.log_level {
		logging.level = parse_log_level(level)?;
	}
	if args.json_logs {
		logging.format = LogFormat::Json;
	}
	Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
	let level = logging.level.as_str();
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(format!(
			"regauth={level},regauth_core={level},regauth_cli_config={level},regauth_cli_credentials={level}"
		))
	});

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
	}
}

fn main() -> Result<()> {
	let args = Args::parse();

	let mut config = load_config(args.config.clone()).context("failed to load configuration")?;
	apply_overrides(&mut config.logging, &args)?;
	init_tracing(&config.logging);

	debug!(sources = ?config.sources, "configuration files");

	match &args.command {
		Command::Resolve {
			address,
			fetch,
			json,
		} => run_resolve(&config, address, *fetch, *json),
		Command::Locations => run_locations(&config),
		Command::SearchPaths => {
			for path in docker_cli_style_auth_file_search_locations(&HostDiscoveryEnvironment::new()) {
				println!("{}", path.display());
			}
			Ok(())
		}
	}
}

fn run_resolve(config: &CliConfig, address: &str, fetch: bool, json: bool) -> Result<()> {
	let address = RepositoryAddress::parse(address).context("invalid repository address")?;
	let lookup = fetch.then(|| CachedLookupEnvironment::new(DockerCredentialHelperProcess::new()));
	let report = resolve_report(
		config,
		&HostDiscoveryEnvironment::new(),
		lookup.as_ref().map(|l| l as &dyn CredentialsLookupEnvironment),
		&address,
	)?;

	if json {
		println!("{}", serde_json::to_string_pretty(&report)?);
	} else {
		print!("{}", report.render_text());
	}
	ensure_fetched(&report)
}

/// Resolve `address`, running the winning source's helper when `lookup` is given.
fn resolve_report(
	config: &CliConfig,
	env: &dyn ConfigDiscoveryEnvironment,
	lookup: Option<&dyn CredentialsLookupEnvironment>,
	address: &RepositoryAddress,
) -> Result<ResolveReport> {
	let policy = config
		.oci_credentials_policy(env)
		.context("failed to build OCI credentials policy")?;

	info!(address = %address, layers = policy.len(), "resolving credentials source");

	let report = match policy.credentials_source_for_repository(address.domain(), address.path()) {
		Ok(resolved) => {
			let report = ResolveReport::resolved(&address.to_string(), &resolved);
			match lookup {
				Some(lookup) => report.with_fetched(resolved.source.credentials(lookup)),
				None => report,
			}
		}
		Err(err) if err.is_not_found() => ResolveReport::not_found(&address.to_string(), &err),
		Err(err) => return Err(err).context("failed to resolve credentials source"),
	};
	Ok(report)
}

/// A source was selected but its credentials could not be produced.
fn ensure_fetched(report: &ResolveReport) -> Result<()> {
	if let Some(FetchReport::Failed { error }) = &report.fetched {
		anyhow::bail!("failed to fetch credentials for {}: {error}", report.address);
	}
	Ok(())
}

fn run_locations(config: &CliConfig) -> Result<()> {
	let policy = config
		.oci_credentials_policy(&HostDiscoveryEnvironment::new())
		.context("failed to build OCI credentials policy")?;
	if policy.is_empty() {
		println!("no credentials configuration found");
		return Ok(());
	}
	for (index, location) in policy.locations_for_ui().iter().enumerate() {
		println!("{:>3}. {location}", index + 1);
	}
	Ok(())
}

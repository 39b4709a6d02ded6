// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validated runtime configuration.

use std::path::PathBuf;

use regauth_core::{RepositoryAddress, SecretString};

use crate::layer::LoggingLayer;
use crate::sources::SourcedLayer;
use crate::validation;
use crate::ConfigError;

/// Fully loaded and validated regauth configuration.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
	pub oci_default_credentials: OciDefaultCredentials,
	/// Explicit credentials, in the order they were declared.
	pub oci_credentials: Vec<OciRepositoryCredentials>,
	pub logging: LoggingConfig,
	/// Config files that contributed, lowest precedence first.
	pub sources: Vec<PathBuf>,
}

/// Settings from the `oci_default_credentials` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciDefaultCredentials {
	/// Whether to look for Docker/Podman style credentials files at all.
	pub discover_ambient_credentials: bool,
	/// `None` searches the default locations; `Some` reads exactly these
	/// files, so an empty list reads none.
	pub docker_style_config_files: Option<Vec<PathBuf>>,
	/// Credential helper used for any registry nothing else matches.
	pub default_docker_credential_helper: Option<String>,
}

impl Default for OciDefaultCredentials {
	fn default() -> Self {
		Self {
			discover_ambient_credentials: true,
			docker_style_config_files: None,
			default_docker_credential_helper: None,
		}
	}
}

/// One `oci_credentials` block after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciRepositoryCredentials {
	pub repository_prefix: RepositoryAddress,
	pub credentials: RepositoryCredentials,
}

/// The single credentials group an `oci_credentials` block selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCredentials {
	Basic {
		username: String,
		password: SecretString,
	},
	OAuth {
		access_token: SecretString,
		refresh_token: SecretString,
	},
	DockerCredentialHelper(String),
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
	Error,
	#[default]
	Warn,
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	pub fn as_str(self) -> &'static str {
		match self {
			LogLevel::Error => "error",
			LogLevel::Warn => "warn",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
			LogLevel::Trace => "trace",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
	#[default]
	Compact,
	Json,
}

impl CliConfig {
	/// Build the runtime configuration from parsed files, lowest
	/// precedence first.
	///
	/// Every credentials block is validated; all problems found are reported
	/// together in one [`ConfigError::Validation`].
	pub fn from_layers(layers: Vec<SourcedLayer>) -> Result<Self, ConfigError> {
		let mut problems = Vec::new();
		let oci_default_credentials = validation::oci_default_credentials(&layers, &mut problems);
		let oci_credentials = validation::oci_repository_credentials(&layers, &mut problems);
		if !problems.is_empty() {
			return Err(ConfigError::validation(problems.join("\n")));
		}

		let mut logging = LoggingLayer::default();
		for sourced in &layers {
			if let Some(layer) = &sourced.layer.logging {
				logging.merge(layer.clone());
			}
		}

		Ok(Self {
			oci_default_credentials,
			oci_credentials,
			logging: build_logging_config(logging)?,
			sources: layers.into_iter().map(|sourced| sourced.path).collect(),
		})
	}
}

fn build_logging_config(layer: LoggingLayer) -> Result<LoggingConfig, ConfigError> {
	Ok(LoggingConfig {
		level: parse_log_level(layer.level.as_deref())?,
		format: parse_log_format(layer.format.as_deref())?,
	})
}

fn parse_log_level(s: Option<&str>) -> Result<LogLevel, ConfigError> {
	match s {
		None => Ok(LogLevel::default()),
		Some("error") => Ok(LogLevel::Error),
		Some("warn") => Ok(LogLevel::Warn),
		Some("info") => Ok(LogLevel::Info),
		Some("debug") => Ok(LogLevel::Debug),
		Some("trace") => Ok(LogLevel::Trace),
		Some(other) => Err(ConfigError::invalid_value(
			"logging.level",
			format!("unknown level {other:?}"),
		)),
	}
}

fn parse_log_format(s: Option<&str>) -> Result<LogFormat, ConfigError> {
	match s {
		None | Some("compact") => Ok(LogFormat::Compact),
		Some("json") => Ok(LogFormat::Json),
		Some(other) => Err(ConfigError::invalid_value(
			"logging.format",
			format!("unknown format {other:?}"),
		)),
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration error types.

use std::path::PathBuf;

use regauth_core::CredentialsError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// I/O error reading config file
	#[error("I/O error reading {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// TOML parsing error
	#[error("TOML parse error in {}: {source}", .path.display())]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// One or more invalid configuration blocks, one problem per line
	#[error("Validation error: {0}")]
	Validation(String),

	/// Invalid value
	#[error("Invalid value for {field}: {message}")]
	InvalidValue { field: String, message: String },

	/// Explicitly listed Docker-style config files could not be used
	#[error("discovering ambient OCI registry credentials: failed to read Docker-style config files: {0}")]
	AmbientDiscovery(#[source] CredentialsError),

	/// Home directory not found
	#[error("Could not determine home directory")]
	HomeDirNotFound,
}

impl ConfigError {
	/// Create a validation error
	pub fn validation(msg: impl Into<String>) -> Self {
		Self::Validation(msg.into())
	}

	/// Create an invalid value error
	pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field: field.into(),
			message: message.into(),
		}
	}
}

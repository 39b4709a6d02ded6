// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for regauth.
//!
//! This crate provides:
//! - XDG Base Directory compliant path resolution
//! - Layered configuration from TOML files
//! - Validation of `oci_default_credentials` and `oci_credentials` blocks
//! - Assembly of the OCI credentials policy from a validated configuration

pub mod env;
pub mod error;
pub mod layer;
pub mod paths;
pub mod policy;
pub mod registry;
pub mod runtime;
pub mod sources;
pub mod validation;

use std::path::PathBuf;

pub use env::HostDiscoveryEnvironment;
pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::PathsConfig;
pub use policy::ExplicitRepositoryCredentialsConfig;
pub use registry::ConfigRegistry;
pub use runtime::{
	CliConfig, LogFormat, LogLevel, LoggingConfig, OciDefaultCredentials, OciRepositoryCredentials,
	RepositoryCredentials,
};
pub use sources::{ConfigSource, FileSource, Precedence};

/// Load configuration from the system file, the user file and then either
/// `explicit` or the file named by `REGAUTH_CONFIG_FILE`.
pub fn load_config(explicit: Option<PathBuf>) -> Result<CliConfig, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;

	let mut registry = ConfigRegistry::new();
	registry.register(Box::new(FileSource::system(&paths)));
	registry.register(Box::new(FileSource::user(&paths)));
	if let Some(path) = explicit.or_else(paths::env_config_path) {
		registry.register(Box::new(FileSource::explicit(path)));
	}

	registry.load()
}

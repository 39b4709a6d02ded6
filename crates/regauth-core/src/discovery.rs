// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Discovery of ambient Docker-CLI-style credentials files.
//!
//! Podman, Buildah, Skopeo and the Docker CLI all keep registry credentials
//! in a small number of well-known places. The search order here follows
//! the containers-auth.json conventions, with the Docker CLI's own files
//! last.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::docker_config::DockerCliStyleCredentialsConfig;
use crate::error::{CredentialsError, ErrorList};

/// Host operating system, as far as file locations are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
	Linux,
	Windows,
	MacOs,
	Other,
}

impl OperatingSystem {
	/// Interpret an OS name such as `linux`, `windows`, `darwin` or `macos`.
	pub fn from_name(name: &str) -> Self {
		match name {
			"linux" => Self::Linux,
			"windows" => Self::Windows,
			"darwin" | "macos" => Self::MacOs,
			_ => Self::Other,
		}
	}

	/// The OS this binary was built for.
	pub fn current() -> Self {
		Self::from_name(std::env::consts::OS)
	}
}

/// Access to the parts of the host that ambient discovery depends on.
///
/// Abstracted so search rules can be tested for any OS and environment.
pub trait ConfigDiscoveryEnvironment: Send + Sync {
	/// Value of an environment variable; `None` when unset or empty.
	fn environment_variable_val(&self, name: &str) -> Option<String>;

	fn user_home_dir_path(&self) -> PathBuf;

	fn operating_system(&self) -> OperatingSystem;

	/// Read a whole file. A missing file must produce
	/// [`io::ErrorKind::NotFound`].
	fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Candidate credentials files in the order they are consulted.
///
/// The list can contain the same path twice; callers reading the files
/// skip adjacent duplicates.
pub fn docker_cli_style_auth_file_search_locations(
	env: &dyn ConfigDiscoveryEnvironment,
) -> Vec<PathBuf> {
	let home = env.user_home_dir_path();
	let os = env.operating_system();
	let mut locations = Vec::with_capacity(5);

	match os {
		OperatingSystem::Linux => {
			if let Some(runtime_dir) = env.environment_variable_val("XDG_RUNTIME_DIR") {
				locations.push(Path::new(&runtime_dir).join("containers").join("auth.json"));
			}
		}
		OperatingSystem::Windows | OperatingSystem::MacOs => {
			locations.push(home.join(".config").join("containers").join("auth.json"));
		}
		OperatingSystem::Other => {}
	}

	let config_home = env
		.environment_variable_val("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.unwrap_or_else(|| home.join(".config"));
	locations.push(config_home.join("containers").join("auth.json"));

	locations.push(home.join(".docker").join("config.json"));
	locations.push(home.join(".dockercfg"));

	trace!(os = ?os, count = locations.len(), "computed docker-style credentials search locations");
	locations
}

/// Read whichever of the default search locations exist.
///
/// Missing files are skipped silently. Every other read or parse problem is
/// collected and returned as one error after all locations have been tried;
/// callers typically log it and proceed without ambient credentials.
pub fn find_docker_cli_style_credentials_configs(
	env: &dyn ConfigDiscoveryEnvironment,
) -> Result<Vec<DockerCliStyleCredentialsConfig>, CredentialsError> {
	let locations = docker_cli_style_auth_file_search_locations(env);
	let mut configs = Vec::new();
	let mut errors = ErrorList::new();
	let mut previous: Option<&PathBuf> = None;

	for path in &locations {
		if previous == Some(path) {
			continue;
		}
		previous = Some(path);

		match read_config(env, path) {
			Ok(config) => configs.push(config),
			Err(CredentialsError::ReadFile { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
				trace!(path = %path.display(), "no credentials file at this location");
			}
			Err(err) => errors.push(err),
		}
	}

	debug!(found = configs.len(), problems = errors.len(), "finished ambient credentials discovery");
	errors.into_result()?;
	Ok(configs)
}

/// Read exactly the given files, in order.
///
/// Every file must exist and parse. Failures for all files are reported
/// together.
pub fn fixed_docker_cli_style_credentials_configs(
	env: &dyn ConfigDiscoveryEnvironment,
	paths: &[PathBuf],
) -> Result<Vec<DockerCliStyleCredentialsConfig>, CredentialsError> {
	let mut configs = Vec::with_capacity(paths.len());
	let mut errors = ErrorList::new();

	for path in paths {
		match read_config(env, path) {
			Ok(config) => configs.push(config),
			Err(err) => errors.push(err),
		}
	}

	errors.into_result()?;
	Ok(configs)
}

fn read_config(
	env: &dyn ConfigDiscoveryEnvironment,
	path: &Path,
) -> Result<DockerCliStyleCredentialsConfig, CredentialsError> {
	let content = env.read_file(path).map_err(|source| CredentialsError::ReadFile {
		path: path.to_path_buf(),
		source,
	})?;
	debug!(path = %path.display(), "read docker-style credentials file");
	DockerCliStyleCredentialsConfig::parse(path, &content)
}

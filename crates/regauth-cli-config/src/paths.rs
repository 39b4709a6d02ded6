// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! XDG Base Directory compliant path resolution.

use std::path::PathBuf;

use crate::ConfigError;

/// Environment variable naming an extra config file to load last.
pub const CONFIG_FILE_ENV: &str = "REGAUTH_CONFIG_FILE";

/// Resolved config file locations for regauth.
#[derive(Debug, Clone)]
pub struct PathsConfig {
	/// User config file: ~/.config/regauth/config.toml
	pub user_config_file: PathBuf,
	/// System config file: /etc/regauth/config.toml
	pub system_config_file: PathBuf,
}

/// Resolve config paths according to the Base Directory Specification.
///
/// Uses XDG_CONFIG_HOME if set, otherwise ~/.config.
pub fn resolve_xdg_paths() -> Result<PathsConfig, ConfigError> {
	let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;

	let config_home = std::env::var_os("XDG_CONFIG_HOME")
		.filter(|v| !v.is_empty())
		.map(PathBuf::from)
		.unwrap_or_else(|| home.join(".config"));

	tracing::debug!(config_home = %config_home.display(), "resolved XDG paths");

	Ok(PathsConfig {
		user_config_file: config_home.join("regauth/config.toml"),
		system_config_file: PathBuf::from("/etc/regauth/config.toml"),
	})
}

/// Extra config file named by `REGAUTH_CONFIG_FILE`, if set.
pub fn env_config_path() -> Option<PathBuf> {
	std::env::var_os(CONFIG_FILE_ENV)
		.filter(|v| !v.is_empty())
		.map(PathBuf::from)
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Test that XDG paths can be resolved without panicking.
	#[test]
	fn test_resolve_xdg_paths_succeeds() {
		let paths = resolve_xdg_paths().unwrap();
		assert!(paths.user_config_file.ends_with("regauth/config.toml"));
	}

	/// Test that system config path is always /etc/regauth/config.toml.
	#[test]
	fn test_system_config_is_etc() {
		let paths = resolve_xdg_paths().unwrap();
		assert_eq!(
			paths.system_config_file,
			PathBuf::from("/etc/regauth/config.toml")
		);
	}
}

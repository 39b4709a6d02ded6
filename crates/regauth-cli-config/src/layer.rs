// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw configuration as written in one TOML file.

use std::path::PathBuf;

use regauth_core::SecretString;
use serde::Deserialize;

/// Contents of one config file - every field optional, nothing validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
	#[serde(default)]
	pub oci_default_credentials: Option<OciDefaultCredentialsLayer>,
	#[serde(default)]
	pub oci_credentials: Vec<OciCredentialsLayer>,
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
}

/// `[oci_default_credentials]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OciDefaultCredentialsLayer {
	#[serde(default)]
	pub discover_ambient_credentials: Option<bool>,
	#[serde(default)]
	pub docker_style_config_files: Option<Vec<PathBuf>>,
	#[serde(default)]
	pub docker_credentials_helper: Option<String>,
}

/// `[[oci_credentials]]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OciCredentialsLayer {
	/// Registry domain, optionally followed by a repository path prefix.
	#[serde(default)]
	pub repository: Option<String>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub password: Option<SecretString>,
	#[serde(default)]
	pub access_token: Option<SecretString>,
	#[serde(default)]
	pub refresh_token: Option<SecretString>,
	#[serde(default)]
	pub docker_credentials_helper: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
}

impl LoggingLayer {
	pub fn merge(&mut self, other: LoggingLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_every_block_kind() {
		let layer: ConfigLayer = toml::from_str(
			r#"
			[oci_default_credentials]
			discover_ambient_credentials = false
			docker_credentials_helper = "osxkeychain"

			[[oci_credentials]]
			repository = "example.com"
			username = "alice"
			password = "s3cret"

			[[oci_credentials]]
			repository = "example.net/foo"
			access_token = "at"
			refresh_token = "rt"

			[logging]
			level = "debug"
			"#,
		)
		.unwrap();

		let defaults = layer.oci_default_credentials.unwrap();
		assert_eq!(defaults.discover_ambient_credentials, Some(false));
		assert_eq!(defaults.docker_credentials_helper.as_deref(), Some("osxkeychain"));
		assert!(defaults.docker_style_config_files.is_none());

		assert_eq!(layer.oci_credentials.len(), 2);
		assert_eq!(layer.oci_credentials[0].username.as_deref(), Some("alice"));
		assert_eq!(
			layer.oci_credentials[1].access_token.as_ref().map(|t| t.expose().as_str()),
			Some("at")
		);
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("debug"));
	}

	#[test]
	fn empty_file_is_empty_layer() {
		let layer: ConfigLayer = toml::from_str("").unwrap();
		assert!(layer.oci_default_credentials.is_none());
		assert!(layer.oci_credentials.is_empty());
	}

	#[test]
	fn unknown_fields_are_rejected() {
		let result: Result<ConfigLayer, _> = toml::from_str(
			r#"
			[[oci_credentials]]
			repository = "example.com"
			passwrod = "typo"
			"#,
		);
		assert!(result.is_err());
	}

	#[test]
	fn secrets_are_not_debug_printed() {
		let layer: ConfigLayer = toml::from_str(
			r#"
			[[oci_credentials]]
			repository = "example.com"
			username = "alice"
			password = "hunter2"
			"#,
		)
		.unwrap();
		assert!(!format!("{layer:?}").contains("hunter2"));
	}

	#[test]
	fn logging_merge_prefers_later_values() {
		let mut base = LoggingLayer {
			level: Some("info".to_string()),
			format: Some("json".to_string()),
		};
		base.merge(LoggingLayer {
			level: Some("trace".to_string()),
			format: None,
		});
		assert_eq!(base.level.as_deref(), Some("trace"));
		assert_eq!(base.format.as_deref(), Some("json"));
	}
}

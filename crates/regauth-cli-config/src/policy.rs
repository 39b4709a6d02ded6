// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Assembly of the OCI credentials policy from the CLI configuration.

use regauth_core::{
	containers_auth_property_name_match, find_docker_cli_style_credentials_configs,
	fixed_docker_cli_style_credentials_configs, helper_server_url, ConfigDiscoveryEnvironment,
	Credentials, CredentialsConfig, CredentialsConfigs, CredentialsSource, CredentialsSources,
	CredentialsSpecificity, GlobalDockerCredentialHelperConfig,
};
use tracing::{debug, info, warn};

use crate::runtime::{CliConfig, OciRepositoryCredentials, RepositoryCredentials};
use crate::ConfigError;

/// Location reported for the global helper from `oci_default_credentials`.
pub const DEFAULT_CREDENTIALS_LOCATION: &str = "oci_default_credentials block";

/// An `oci_credentials` block acting as a credentials layer.
#[derive(Debug, Clone)]
pub struct ExplicitRepositoryCredentialsConfig {
	property: String,
	credentials: RepositoryCredentials,
}

impl ExplicitRepositoryCredentialsConfig {
	pub fn new(block: &OciRepositoryCredentials) -> Self {
		Self {
			property: block.repository_prefix.to_string(),
			credentials: block.credentials.clone(),
		}
	}
}

impl CredentialsConfig for ExplicitRepositoryCredentialsConfig {
	fn credentials_sources_for_repository<'a>(
		&'a self,
		registry_domain: &'a str,
		repository_path: &'a str,
	) -> CredentialsSources<'a> {
		let specificity =
			containers_auth_property_name_match(&self.property, registry_domain, repository_path);
		if specificity == CredentialsSpecificity::NONE {
			return Box::new(std::iter::empty());
		}

		let source = match &self.credentials {
			RepositoryCredentials::Basic { username, password } => CredentialsSource::new_static(
				Credentials::basic_auth(username.clone(), password.clone()),
				specificity,
			),
			RepositoryCredentials::OAuth {
				access_token,
				refresh_token,
			} => CredentialsSource::new_static(
				Credentials::oauth(access_token.clone(), refresh_token.clone()),
				specificity,
			),
			RepositoryCredentials::DockerCredentialHelper(helper) => {
				CredentialsSource::new_docker_credential_helper(
					helper.clone(),
					helper_server_url(registry_domain),
					specificity,
				)
			}
		};
		Box::new(std::iter::once(Ok(source)))
	}

	fn location_for_ui(&self) -> String {
		format!("explicit oci_credentials {:?} block", self.property)
	}
}

impl CliConfig {
	/// Build the ordered set of credentials layers this configuration
	/// describes.
	///
	/// Explicit `oci_credentials` blocks come first, then the default
	/// credential helper, then any ambient Docker-style files. Problems
	/// discovering ambient files in the default locations are logged and
	/// otherwise ignored; problems with explicitly listed files are errors.
	pub fn oci_credentials_policy(
		&self,
		env: &dyn ConfigDiscoveryEnvironment,
	) -> Result<CredentialsConfigs, ConfigError> {
		let mut configs: Vec<Box<dyn CredentialsConfig>> = Vec::new();

		for block in &self.oci_credentials {
			configs.push(Box::new(ExplicitRepositoryCredentialsConfig::new(block)));
		}

		let defaults = &self.oci_default_credentials;
		if let Some(helper) = &defaults.default_docker_credential_helper {
			configs.push(Box::new(GlobalDockerCredentialHelperConfig::new(
				helper.clone(),
				DEFAULT_CREDENTIALS_LOCATION,
			)));
		}

		if defaults.discover_ambient_credentials {
			let ambient = match &defaults.docker_style_config_files {
				Some(files) => fixed_docker_cli_style_credentials_configs(env, files)
					.map_err(ConfigError::AmbientDiscovery)?,
				None => match find_docker_cli_style_credentials_configs(env) {
					Ok(found) => found,
					Err(err) => {
						warn!(error = %err, "problems during OCI registry ambient credentials discovery");
						Vec::new()
					}
				},
			};
			for config in ambient {
				info!(path = %config.path().display(), "using ambient OCI registry credentials");
				configs.push(Box::new(config));
			}
		} else {
			debug!("ambient OCI registry credentials discovery disabled");
		}

		Ok(CredentialsConfigs::new(configs))
	}
}

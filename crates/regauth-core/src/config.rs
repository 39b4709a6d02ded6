// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credentials configuration layers.

use std::fmt;

use crate::error::CredentialsError;
use crate::source::CredentialsSource;
use crate::specificity::CredentialsSpecificity;

/// Candidate sources produced by one layer for one request.
pub type CredentialsSources<'a> =
	Box<dyn Iterator<Item = Result<CredentialsSource, CredentialsError>> + 'a>;

/// One layer of credentials configuration, such as a single Docker-style
/// `config.json` file or one explicit block in the CLI configuration.
///
/// A layer reports every source that *might* apply to a request; choosing
/// between them is the job of [`crate::CredentialsConfigs`]. Errors yielded
/// by the iterator concern a single entry and do not stop iteration.
pub trait CredentialsConfig: fmt::Debug + Send + Sync {
	/// Candidate sources for `repository_path` (no leading slash, possibly
	/// empty) on `registry_domain`.
	fn credentials_sources_for_repository<'a>(
		&'a self,
		registry_domain: &'a str,
		repository_path: &'a str,
	) -> CredentialsSources<'a>;

	/// Short description of where this layer came from, for messages.
	fn location_for_ui(&self) -> String;
}

/// Server URL used when asking a credential helper about `registry_domain`.
pub fn helper_server_url(registry_domain: &str) -> String {
	format!("https://{registry_domain}")
}

/// A credential helper that applies to every registry domain.
#[derive(Debug, Clone)]
pub struct GlobalDockerCredentialHelperConfig {
	helper_name: String,
	location: String,
}

impl GlobalDockerCredentialHelperConfig {
	pub fn new(helper_name: impl Into<String>, location: impl Into<String>) -> Self {
		Self {
			helper_name: helper_name.into(),
			location: location.into(),
		}
	}

	pub fn helper_name(&self) -> &str {
		&self.helper_name
	}
}

impl CredentialsConfig for GlobalDockerCredentialHelperConfig {
	fn credentials_sources_for_repository<'a>(
		&'a self,
		registry_domain: &'a str,
		_repository_path: &'a str,
	) -> CredentialsSources<'a> {
		Box::new(std::iter::once(Ok(CredentialsSource::new_docker_credential_helper(
			self.helper_name.clone(),
			helper_server_url(registry_domain),
			CredentialsSpecificity::GLOBAL,
		))))
	}

	fn location_for_ui(&self) -> String {
		self.location.clone()
	}
}

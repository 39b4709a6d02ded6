// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The contract for asking a Docker-style credential helper for credentials.

use serde::Deserialize;

use crate::error::CredentialsError;
use crate::secret::SecretString;

/// Answer from a credential helper's `get` command.
///
/// Deserializes from the helper protocol's JSON object
/// `{"ServerURL": ..., "Username": ..., "Secret": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DockerCredentialHelperGetResult {
	#[serde(rename = "ServerURL", default)]
	pub server_url: String,
	#[serde(rename = "Username", default)]
	pub username: String,
	#[serde(rename = "Secret")]
	pub secret: SecretString,
}

/// Runs credential helpers on behalf of a [`crate::CredentialsSource`].
///
/// Implementations return an error satisfying
/// [`CredentialsError::is_not_found`] when the helper has no credentials for
/// `server_url`. Any other error is treated as a real failure.
pub trait CredentialsLookupEnvironment: Send + Sync {
	fn query_docker_credential_helper(
		&self,
		helper_name: &str,
		server_url: &str,
	) -> Result<DockerCredentialHelperGetResult, CredentialsError>;
}

impl<T: CredentialsLookupEnvironment + ?Sized> CredentialsLookupEnvironment for &T {
	fn query_docker_credential_helper(
		&self,
		helper_name: &str,
		server_url: &str,
	) -> Result<DockerCredentialHelperGetResult, CredentialsError> {
		(**self).query_docker_credential_helper(helper_name, server_url)
	}
}

impl<T: CredentialsLookupEnvironment + ?Sized> CredentialsLookupEnvironment for std::sync::Arc<T> {
	fn query_docker_credential_helper(
		&self,
		helper_name: &str,
		server_url: &str,
	) -> Result<DockerCredentialHelperGetResult, CredentialsError> {
		(**self).query_docker_credential_helper(helper_name, server_url)
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where a set of credentials comes from.

use std::fmt;

use tracing::debug;

use crate::credentials::Credentials;
use crate::error::CredentialsError;
use crate::lookup::CredentialsLookupEnvironment;
use crate::specificity::CredentialsSpecificity;

/// A candidate way of obtaining credentials, with a fixed specificity.
///
/// Sources are cheap to produce: a credential helper source does not run the
/// helper until [`CredentialsSource::credentials`] is called, which the
/// caller only does for the winning source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsSource {
	specificity: CredentialsSpecificity,
	kind: CredentialsSourceKind,
}

/// The two kinds of [`CredentialsSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsSourceKind {
	/// Credentials written directly into a configuration file.
	Static(Credentials),
	/// A `docker-credential-<helper_name>` program, queried for `server_url`.
	DockerCredentialHelper { helper_name: String, server_url: String },
}

impl CredentialsSource {
	pub fn new_static(credentials: Credentials, specificity: CredentialsSpecificity) -> Self {
		Self {
			specificity,
			kind: CredentialsSourceKind::Static(credentials),
		}
	}

	pub fn new_docker_credential_helper(
		helper_name: impl Into<String>,
		server_url: impl Into<String>,
		specificity: CredentialsSpecificity,
	) -> Self {
		Self {
			specificity,
			kind: CredentialsSourceKind::DockerCredentialHelper {
				helper_name: helper_name.into(),
				server_url: server_url.into(),
			},
		}
	}

	pub fn specificity(&self) -> CredentialsSpecificity {
		self.specificity
	}

	pub fn kind(&self) -> &CredentialsSourceKind {
		&self.kind
	}

	/// Produce the credentials, running a credential helper if needed.
	///
	/// A helper's not-found answer is returned unchanged so callers can test
	/// it with [`CredentialsError::is_not_found`]; other helper failures are
	/// wrapped in [`CredentialsError::HelperFailed`].
	pub fn credentials(
		&self,
		env: &dyn CredentialsLookupEnvironment,
	) -> Result<Credentials, CredentialsError> {
		match &self.kind {
			CredentialsSourceKind::Static(credentials) => Ok(credentials.clone()),
			CredentialsSourceKind::DockerCredentialHelper {
				helper_name,
				server_url,
			} => {
				debug!(helper = %helper_name, server_url = %server_url, "querying docker credential helper");
				match env.query_docker_credential_helper(helper_name, server_url) {
					Ok(result) => Ok(Credentials::basic_auth(result.username, result.secret)),
					Err(err) if err.is_not_found() => Err(err),
					Err(err) => Err(CredentialsError::HelperFailed {
						helper: helper_name.clone(),
						server_url: server_url.clone(),
						source: Box::new(err),
					}),
				}
			}
		}
	}
}

impl fmt::Display for CredentialsSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			CredentialsSourceKind::Static(credentials) => write!(f, "static {credentials}"),
			CredentialsSourceKind::DockerCredentialHelper {
				helper_name,
				server_url,
			} => write!(f, "docker-credential-{helper_name} for {server_url}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lookup::DockerCredentialHelperGetResult;
	use crate::secret::SecretString;

	struct FakeLookup;

	impl CredentialsLookupEnvironment for FakeLookup {
		fn query_docker_credential_helper(
			&self,
			helper_name: &str,
			server_url: &str,
		) -> Result<DockerCredentialHelperGetResult, CredentialsError> {
			match helper_name {
				"good" => Ok(DockerCredentialHelperGetResult {
					server_url: server_url.to_string(),
					username: format!("{helper_name}-user"),
					secret: SecretString::from("pw"),
				}),
				"empty" => Err(CredentialsError::not_found("no credentials in store")),
				_ => Err(CredentialsError::Helper("helper crashed".to_string())),
			}
		}
	}

	#[test]
	fn static_source_returns_its_credentials() {
		let creds = Credentials::basic_auth("alice", "pw");
		let source = CredentialsSource::new_static(creds.clone(), CredentialsSpecificity::DOMAIN);

		assert_eq!(source.specificity(), CredentialsSpecificity::DOMAIN);
		assert_eq!(source.credentials(&FakeLookup).unwrap(), creds);
	}

	#[test]
	fn helper_source_queries_the_environment() {
		let source = CredentialsSource::new_docker_credential_helper(
			"good",
			"https://example.com",
			CredentialsSpecificity::GLOBAL,
		);
		let creds = source.credentials(&FakeLookup).unwrap();
		assert_eq!(creds.username(), Some("good-user"));
		assert_eq!(creds.password().unwrap().expose(), "pw");
	}

	#[test]
	fn helper_not_found_passes_through() {
		let source = CredentialsSource::new_docker_credential_helper(
			"empty",
			"https://example.com",
			CredentialsSpecificity::GLOBAL,
		);
		let err = source.credentials(&FakeLookup).unwrap_err();
		assert!(err.is_not_found());
		assert!(matches!(err, CredentialsError::NotFound(_)));
	}

	#[test]
	fn helper_failure_is_wrapped() {
		let source = CredentialsSource::new_docker_credential_helper(
			"broken",
			"https://example.com",
			CredentialsSpecificity::DOMAIN,
		);
		let err = source.credentials(&FakeLookup).unwrap_err();
		assert!(!err.is_not_found());
		assert_eq!(
			err.to_string(),
			"\"broken\" credential helper failed for https://example.com: helper crashed"
		);
	}

	#[test]
	fn display_omits_secrets() {
		let source = CredentialsSource::new_static(
			Credentials::basic_auth("alice", "hunter2"),
			CredentialsSpecificity::DOMAIN,
		);
		assert!(!source.to_string().contains("hunter2"));
		assert!(!format!("{source:?}").contains("hunter2"));
	}
}

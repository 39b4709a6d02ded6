// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential helper error types.

use regauth_core::CredentialsError;

/// Errors that can occur while running a `docker-credential-*` program.
#[derive(Debug, thiserror::Error)]
pub enum HelperError {
	#[error("{program} is not installed or not executable")]
	NotInstalled { program: String },

	#[error("failed to run {program}: {source}")]
	Spawn {
		program: String,
		#[source]
		source: std::io::Error,
	},

	#[error("{program} has no credentials for {server_url}")]
	NotFound { program: String, server_url: String },

	#[error("{status}: {stderr}")]
	Failed {
		program: String,
		status: String,
		stderr: String,
	},

	#[error("parsing credential helper response: {0}")]
	InvalidResponse(#[from] serde_json::Error),

	#[error("{program} returned an identity token, but only username/password credentials are supported")]
	IdentityToken { program: String },
}

impl From<HelperError> for CredentialsError {
	fn from(err: HelperError) -> Self {
		match err {
			HelperError::NotFound { .. } => CredentialsError::not_found(err.to_string()),
			other => CredentialsError::Helper(other.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn not_found_maps_to_not_found() {
		let err: CredentialsError = HelperError::NotFound {
			program: "docker-credential-pass".to_string(),
			server_url: "https://example.com".to_string(),
		}
		.into();
		assert!(err.is_not_found());
	}

	#[test]
	fn failures_map_to_helper_errors() {
		let err: CredentialsError = HelperError::Failed {
			program: "docker-credential-pass".to_string(),
			status: "exit status: 3".to_string(),
			stderr: "gpg: decryption failed".to_string(),
		}
		.into();
		assert!(!err.is_not_found());
		assert_eq!(err.to_string(), "exit status: 3: gpg: decryption failed");
	}

	#[test]
	fn wrapped_failure_names_the_helper_once() {
		let err = CredentialsError::HelperFailed {
			helper: "pass".to_string(),
			server_url: "https://example.com".to_string(),
			source: Box::new(
				HelperError::Failed {
					program: "docker-credential-pass".to_string(),
					status: "exit status: 3".to_string(),
					stderr: "keychain locked".to_string(),
				}
				.into(),
			),
		};
		let message = err.to_string();
		assert_eq!(
			message,
			"\"pass\" credential helper failed for https://example.com: exit status: 3: keychain locked"
		);
		assert!(!message.contains("docker-credential-pass"));
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Running `docker-credential-<name> get` as a subprocess.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use regauth_core::{CredentialsError, CredentialsLookupEnvironment, DockerCredentialHelperGetResult};
use tracing::{debug, error};

use crate::error::HelperError;

/// Message credential helpers print when they hold nothing for a server.
const CREDENTIALS_NOT_FOUND: &str = "credentials not found";

/// Username helpers report when the secret is an identity token.
const IDENTITY_TOKEN_USERNAME: &str = "<token>";

/// Queries credential helpers by running them as child processes.
///
/// Helpers are located on `PATH` unless a directory is given with
/// [`DockerCredentialHelperProcess::with_search_dir`].
#[derive(Debug, Clone, Default)]
pub struct DockerCredentialHelperProcess {
	search_dir: Option<PathBuf>,
}

impl DockerCredentialHelperProcess {
	pub fn new() -> Self {
		Self::default()
	}

	/// Only run helpers found directly inside `dir`.
	pub fn with_search_dir(dir: impl Into<PathBuf>) -> Self {
		Self {
			search_dir: Some(dir.into()),
		}
	}

	/// Executable name for a helper, e.g. `docker-credential-pass`.
	pub fn program_name(helper_name: &str) -> String {
		format!("docker-credential-{helper_name}")
	}

	fn program_path(&self, helper_name: &str) -> PathBuf {
		let program = Self::program_name(helper_name);
		match &self.search_dir {
			Some(dir) => dir.join(program),
			None => PathBuf::from(program),
		}
	}

	/// Run `<helper> get` for `server_url` and parse its answer.
	pub fn get(
		&self,
		helper_name: &str,
		server_url: &str,
	) -> Result<DockerCredentialHelperGetResult, HelperError> {
		let program = Self::program_name(helper_name);
		let path = self.program_path(helper_name);
		debug!(program = %program, server_url = %server_url, "running credential helper");

		let mut child = Command::new(&path)
			.arg("get")
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(|e| match e.kind() {
				io::ErrorKind::NotFound => HelperError::NotInstalled {
					program: program.clone(),
				},
				_ => HelperError::Spawn {
					program: program.clone(),
					source: e,
				},
			})?;

		if let Some(mut stdin) = child.stdin.take() {
			// Helpers may exit without reading stdin; the exit status is checked below.
			if let Err(e) = stdin.write_all(server_url.as_bytes()) {
				if e.kind() != io::ErrorKind::BrokenPipe {
					return Err(HelperError::Spawn { program, source: e });
				}
			}
		}

		let output = child.wait_with_output().map_err(|e| HelperError::Spawn {
			program: program.clone(),
			source: e,
		})?;

		if !output.status.success() {
			let stdout = String::from_utf8_lossy(&output.stdout);
			let stderr = String::from_utf8_lossy(&output.stderr);
			if output.status.code() == Some(1)
				|| stdout.contains(CREDENTIALS_NOT_FOUND)
				|| stderr.contains(CREDENTIALS_NOT_FOUND)
			{
				debug!(program = %program, server_url = %server_url, "credential helper has no credentials");
				return Err(HelperError::NotFound {
					program,
					server_url: server_url.to_string(),
				});
			}

			let message = if stderr.trim().is_empty() {
				stdout.trim().to_string()
			} else {
				stderr.trim().to_string()
			};
			return Err(HelperError::Failed {
				program,
				status: output.status.to_string(),
				stderr: message,
			});
		}

		let mut result: DockerCredentialHelperGetResult = serde_json::from_slice(&output.stdout)?;
		if result.username == IDENTITY_TOKEN_USERNAME {
			return Err(HelperError::IdentityToken { program });
		}
		if result.server_url.is_empty() {
			result.server_url = server_url.to_string();
		}
		Ok(result)
	}
}

impl CredentialsLookupEnvironment for DockerCredentialHelperProcess {
	fn query_docker_credential_helper(
		&self,
		helper_name: &str,
		server_url: &str,
	) -> Result<DockerCredentialHelperGetResult, CredentialsError> {
		self.get(helper_name, server_url).map_err(|err| {
			if !matches!(err, HelperError::NotFound { .. }) {
				error!(helper = %helper_name, server_url = %server_url, error = %err, "credential helper failed");
			}
			CredentialsError::from(err)
		})
	}
}

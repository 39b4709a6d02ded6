// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! What `regauth resolve` prints. Never contains secrets.

use std::fmt::Write as _;

use regauth_core::{
	Credentials, CredentialsError, CredentialsSourceKind, ResolvedCredentialsSource,
};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResolveReport {
	pub address: String,
	pub found: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub specificity: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source: Option<SourceReport>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fetched: Option<FetchReport>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub problems: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceReport {
	BasicAuth { username: String },
	Oauth,
	DockerCredentialHelper { helper: String, server_url: String },
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchReport {
	BasicAuth { username: String },
	Oauth,
	NotFound,
	Failed { error: String },
}

impl ResolveReport {
	pub fn resolved(address: &str, resolved: &ResolvedCredentialsSource) -> Self {
		let source = match resolved.source.kind() {
			CredentialsSourceKind::Static(credentials) => describe_credentials(credentials),
			CredentialsSourceKind::DockerCredentialHelper {
				helper_name,
				server_url,
			} => SourceReport::DockerCredentialHelper {
				helper: helper_name.clone(),
				server_url: server_url.clone(),
			},
		};
		Self {
			address: address.to_string(),
			found: true,
			location: Some(resolved.location.clone()),
			specificity: Some(resolved.source.specificity().to_string()),
			source: Some(source),
			fetched: None,
			problems: resolved
				.problems
				.iter()
				.flatten()
				.map(ToString::to_string)
				.collect(),
		}
	}

	/// A failed resolution; `err` is expected to satisfy
	/// [`CredentialsError::is_not_found`].
	pub fn not_found(address: &str, err: &CredentialsError) -> Self {
		let problems = match err {
			CredentialsError::Multiple(list) => list
				.iter()
				.filter(|e| !matches!(e, CredentialsError::NotFound(_)))
				.map(ToString::to_string)
				.collect(),
			_ => Vec::new(),
		};
		Self {
			address: address.to_string(),
			found: false,
			location: None,
			specificity: None,
			source: None,
			fetched: None,
			problems,
		}
	}

	pub fn with_fetched(mut self, fetched: Result<Credentials, CredentialsError>) -> Self {
		self.fetched = Some(match fetched {
			Ok(credentials) => match describe_credentials(&credentials) {
				SourceReport::BasicAuth { username } => FetchReport::BasicAuth { username },
				_ => FetchReport::Oauth,
			},
			Err(err) if err.is_not_found() => FetchReport::NotFound,
			Err(err) => FetchReport::Failed {
				error: err.to_string(),
			},
		});
		self
	}

	pub fn render_text(&self) -> String {
		let mut out = String::new();
		if !self.found {
			let _ = writeln!(out, "no credentials configured for {}", self.address);
		} else {
			let _ = writeln!(out, "address:     {}", self.address);
			if let Some(location) = &self.location {
				let _ = writeln!(out, "location:    {location}");
			}
			if let Some(specificity) = &self.specificity {
				let _ = writeln!(out, "specificity: {specificity}");
			}
			if let Some(source) = &self.source {
				let _ = writeln!(out, "source:      {}", source.describe());
			}
		}
		if let Some(fetched) = &self.fetched {
			let _ = writeln!(out, "fetched:     {}", fetched.describe());
		}
		for problem in &self.problems {
			let _ = writeln!(out, "warning: {problem}");
		}
		out
	}
}

impl SourceReport {
	fn describe(&self) -> String {
		match self {
			SourceReport::BasicAuth { username } => format!("static username/password for {username:?}"),
			SourceReport::Oauth => "static OAuth access/refresh tokens".to_string(),
			SourceReport::DockerCredentialHelper { helper, server_url } => {
				format!("docker-credential-{helper} for {server_url}")
			}
		}
	}
}

impl FetchReport {
	fn describe(&self) -> String {
		match self {
			FetchReport::BasicAuth { username } => format!("username {username:?}"),
			FetchReport::Oauth => "OAuth tokens".to_string(),
			FetchReport::NotFound => "credential helper has no credentials".to_string(),
			FetchReport::Failed { error } => format!("failed: {error}"),
		}
	}
}

fn describe_credentials(credentials: &Credentials) -> SourceReport {
	match credentials.username() {
		Some(username) => SourceReport::BasicAuth {
			username: username.to_string(),
		},
		None => SourceReport::Oauth,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use regauth_core::{CredentialsSource, CredentialsSpecificity, ErrorList};

	fn resolved(source: CredentialsSource) -> ResolvedCredentialsSource {
		ResolvedCredentialsSource {
			source,
			location: "/home/u/.docker/config.json".to_string(),
			problems: None,
		}
	}

	#[test]
	fn static_source_report_hides_password() {
		let source = CredentialsSource::new_static(
			Credentials::basic_auth("alice", "hunter2"),
			CredentialsSpecificity::DOMAIN,
		);
		let report = ResolveReport::resolved("example.com/foo", &resolved(source));

		let text = report.render_text();
		assert!(text.contains("static username/password for \"alice\""), "{text}");
		assert!(!text.contains("hunter2"));

		let json = serde_json::to_string(&report).unwrap();
		assert!(!json.contains("hunter2"));
		assert!(json.contains(r#""kind":"basic_auth""#), "{json}");
	}

	#[test]
	fn helper_source_report() {
		let source = CredentialsSource::new_docker_credential_helper(
			"pass",
			"https://example.com",
			CredentialsSpecificity::GLOBAL,
		);
		let report = ResolveReport::resolved("example.com/foo", &resolved(source));
		assert_eq!(
			report.source,
			Some(SourceReport::DockerCredentialHelper {
				helper: "pass".to_string(),
				server_url: "https://example.com".to_string(),
			})
		);
		assert!(report
			.render_text()
			.contains("docker-credential-pass for https://example.com"));
	}

	#[test]
	fn not_found_report_keeps_other_problems() {
		let err = CredentialsError::Multiple(ErrorList::from(vec![
			CredentialsError::Helper("boom".to_string()),
			CredentialsError::not_found("no credentials configured for example.com/foo"),
		]));
		let report = ResolveReport::not_found("example.com/foo", &err);
		assert!(!report.found);
		assert_eq!(report.problems, vec!["boom".to_string()]);

		let text = report.render_text();
		assert!(text.starts_with("no credentials configured for example.com/foo"));
		assert!(text.contains("warning: boom"));
	}

	#[test]
	fn fetch_outcomes() {
		let report = ResolveReport::not_found("example.com/foo", &CredentialsError::not_found("x"))
			.with_fetched(Err(CredentialsError::not_found("helper has nothing")));
		assert_eq!(report.fetched, Some(FetchReport::NotFound));

		let report = ResolveReport::not_found("example.com/foo", &CredentialsError::not_found("x"))
			.with_fetched(Ok(Credentials::oauth("a", "r")));
		assert_eq!(report.fetched, Some(FetchReport::Oauth));
	}
}

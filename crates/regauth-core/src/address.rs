// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parsing of OCI repository addresses and address prefixes.
//!
//! A repository address is `domain[:port]/path/segments`. A *prefix* uses the
//! same grammar but may stop after the domain, and it is what configuration
//! files use to select which repositories a credential applies to.

use std::fmt;
use std::str::FromStr;

use crate::error::CredentialsError;

/// A registry domain plus an optional `/`-separated repository path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryAddress {
	domain: String,
	path: String,
}

impl RepositoryAddress {
	/// Parse a full repository address such as `example.com/foo/bar`.
	///
	/// A repository path is required, and tag (`:tag`) or digest
	/// (`@sha256:...`) suffixes are rejected.
	pub fn parse(address: &str) -> Result<Self, CredentialsError> {
		let (domain, path) = parse_repository_address_prefix(address)?;
		if path.is_empty() {
			return Err(CredentialsError::invalid_address(
				address,
				"must include a repository path after the registry domain",
			));
		}
		Ok(Self {
			domain: domain.to_string(),
			path: path.to_string(),
		})
	}

	/// Parse an address prefix, which may be a bare registry domain.
	pub fn parse_prefix(prefix: &str) -> Result<Self, CredentialsError> {
		let (domain, path) = parse_repository_address_prefix(prefix)?;
		Ok(Self {
			domain: domain.to_string(),
			path: path.to_string(),
		})
	}

	pub fn domain(&self) -> &str {
		&self.domain
	}

	/// Repository path without a leading slash; empty for a bare domain.
	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn has_path(&self) -> bool {
		!self.path.is_empty()
	}

	/// Number of `/`-separated path segments.
	pub fn path_segment_count(&self) -> usize {
		if self.path.is_empty() {
			0
		} else {
			self.path.split('/').count()
		}
	}
}

impl fmt::Display for RepositoryAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.path.is_empty() {
			f.write_str(&self.domain)
		} else {
			write!(f, "{}/{}", self.domain, self.path)
		}
	}
}

impl FromStr for RepositoryAddress {
	type Err = CredentialsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Split `domain[/path]` into its domain and path, validating both.
///
/// The returned path has no leading slash and is empty when the input names
/// only a domain.
pub fn parse_repository_address_prefix(prefix: &str) -> Result<(&str, &str), CredentialsError> {
	if prefix.is_empty() {
		return Err(CredentialsError::invalid_address(prefix, "must not be empty"));
	}
	if prefix.contains('@') {
		return Err(CredentialsError::invalid_address(prefix, "must not include a digest"));
	}

	let (domain, path) = match prefix.split_once('/') {
		Some((domain, path)) => (domain, path),
		None => (prefix, ""),
	};

	validate_domain(domain).map_err(|reason| CredentialsError::invalid_address(prefix, reason))?;

	if prefix.contains('/') {
		if path.contains(':') {
			return Err(CredentialsError::invalid_address(prefix, "must not include a tag"));
		}
		for segment in path.split('/') {
			validate_path_segment(segment)
				.map_err(|reason| CredentialsError::invalid_address(prefix, reason))?;
		}
	}

	Ok((domain, path))
}

fn validate_domain(domain: &str) -> Result<(), String> {
	if domain.is_empty() {
		return Err("registry domain must not be empty".to_string());
	}

	let (host, port) = match domain.rsplit_once(':') {
		Some((host, port)) => (host, Some(port)),
		None => (domain, None),
	};

	if let Some(port) = port {
		if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
			return Err(format!("invalid port number {port:?} in registry domain"));
		}
	}

	if host.is_empty() {
		return Err("registry domain must not be empty".to_string());
	}
	for label in host.split('.') {
		let valid = !label.is_empty()
			&& label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
			&& !label.starts_with('-')
			&& !label.ends_with('-');
		if !valid {
			return Err(format!("invalid registry domain {domain:?}"));
		}
	}
	Ok(())
}

// Path components are lowercase alphanumeric runs joined by `.`, `_`, `__`
// or any number of `-`.
fn validate_path_segment(segment: &str) -> Result<(), String> {
	if segment.is_empty() {
		return Err("repository path must not contain empty segments".to_string());
	}

	let bytes = segment.as_bytes();
	let is_alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
	let invalid = || format!("invalid repository path segment {segment:?}");

	if !is_alnum(bytes[0]) || !is_alnum(bytes[bytes.len() - 1]) {
		return Err(invalid());
	}

	let mut i = 0;
	while i < bytes.len() {
		let b = bytes[i];
		if is_alnum(b) {
			i += 1;
			continue;
		}
		let start = i;
		while i < bytes.len() && !is_alnum(bytes[i]) {
			i += 1;
		}
		let separator = &segment[start..i];
		let dashes = separator.bytes().all(|b| b == b'-');
		if !(matches!(separator, "." | "_" | "__") || dashes) {
			return Err(invalid());
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_domain_only_prefix() {
		assert_eq!(
			parse_repository_address_prefix("example.com").unwrap(),
			("example.com", "")
		);
		assert_eq!(
			parse_repository_address_prefix("localhost:5000").unwrap(),
			("localhost:5000", "")
		);
	}

	#[test]
	fn parses_prefix_with_path() {
		assert_eq!(
			parse_repository_address_prefix("example.com/foo/bar-baz").unwrap(),
			("example.com", "foo/bar-baz")
		);
		assert_eq!(
			parse_repository_address_prefix("registry.example.net:443/a__b/c.d/e---f").unwrap(),
			("registry.example.net:443", "a__b/c.d/e---f")
		);
	}

	#[test]
	fn rejects_tags_and_digests() {
		let tag = parse_repository_address_prefix("example.com/foo:latest").unwrap_err();
		assert!(tag.to_string().contains("must not include a tag"), "{tag}");

		let digest = parse_repository_address_prefix("example.com/foo@sha256:abcd").unwrap_err();
		assert!(digest.to_string().contains("must not include a digest"), "{digest}");
	}

	#[test]
	fn rejects_malformed_input() {
		for input in [
			"",
			"/foo",
			"example.com/",
			"example.com//foo",
			"example.com/Foo",
			"example.com/-foo",
			"example.com/foo-",
			"example.com/foo..bar",
			"exa mple.com",
			"example.com:/foo",
			"example.com:abc",
			"https://example.com",
		] {
			assert!(
				parse_repository_address_prefix(input).is_err(),
				"{input:?} should be rejected"
			);
		}
	}

	#[test]
	fn repository_address_requires_path() {
		assert!(RepositoryAddress::parse("example.com").is_err());

		let addr: RepositoryAddress = "example.com/foo/bar".parse().unwrap();
		assert_eq!(addr.domain(), "example.com");
		assert_eq!(addr.path(), "foo/bar");
		assert_eq!(addr.path_segment_count(), 2);
		assert_eq!(addr.to_string(), "example.com/foo/bar");
	}

	#[test]
	fn prefix_may_be_bare_domain() {
		let prefix = RepositoryAddress::parse_prefix("example.com").unwrap();
		assert!(!prefix.has_path());
		assert_eq!(prefix.path_segment_count(), 0);
		assert_eq!(prefix.to_string(), "example.com");
	}
}

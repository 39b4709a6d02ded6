// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Matching of `auths`-style property names against a requested repository.

use crate::address::parse_repository_address_prefix;
use crate::specificity::CredentialsSpecificity;

/// How well the property name `name` (`domain` or `domain/path...`) matches a
/// request for `want_path` on registry `want_domain`.
///
/// A domain-only name matches the whole registry at
/// [`CredentialsSpecificity::DOMAIN`]. A name with a path matches when its
/// segments are a segment-wise prefix of `want_path`, ranked by how many
/// segments it has. Names that cannot be parsed never match.
///
/// ```
/// use regauth_core::{containers_auth_property_name_match, CredentialsSpecificity};
///
/// assert_eq!(
/// 	containers_auth_property_name_match("example.com/foo", "example.com", "foo/bar"),
/// 	CredentialsSpecificity::repository(1),
/// );
/// assert_eq!(
/// 	containers_auth_property_name_match("example.com/foo", "example.com", "foobar"),
/// 	CredentialsSpecificity::NONE,
/// );
/// ```
pub fn containers_auth_property_name_match(
	name: &str,
	want_domain: &str,
	want_path: &str,
) -> CredentialsSpecificity {
	if name.is_empty() {
		return CredentialsSpecificity::NONE;
	}

	let (got_domain, got_path) = if name.contains('/') {
		match parse_repository_address_prefix(name) {
			Ok(parts) => parts,
			Err(_) => return CredentialsSpecificity::NONE,
		}
	} else {
		(name, "")
	};

	if got_domain != want_domain {
		return CredentialsSpecificity::NONE;
	}
	if got_path.is_empty() {
		return CredentialsSpecificity::DOMAIN;
	}

	let got: Vec<&str> = got_path.split('/').collect();
	let want: Vec<&str> = want_path.split('/').collect();
	if got.len() > want.len() {
		return CredentialsSpecificity::NONE;
	}
	if got.iter().zip(&want).any(|(g, w)| g != w) {
		return CredentialsSpecificity::NONE;
	}

	CredentialsSpecificity::repository(u32::try_from(got.len()).unwrap_or(u32::MAX))
}

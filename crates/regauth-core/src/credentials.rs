// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolved registry credentials.

use std::fmt;

use crate::secret::{SecretString, REDACTED};

/// Credentials ready to present to an OCI registry.
///
/// Holds exactly one of a username/password pair or an OAuth-style
/// access/refresh token pair; the constructor decides which.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
	kind: CredentialsKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CredentialsKind {
	Basic {
		username: String,
		password: SecretString,
	},
	OAuth {
		access_token: SecretString,
		refresh_token: SecretString,
	},
}

impl Credentials {
	pub fn basic_auth(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
		Self {
			kind: CredentialsKind::Basic {
				username: username.into(),
				password: password.into(),
			},
		}
	}

	pub fn oauth(access_token: impl Into<SecretString>, refresh_token: impl Into<SecretString>) -> Self {
		Self {
			kind: CredentialsKind::OAuth {
				access_token: access_token.into(),
				refresh_token: refresh_token.into(),
			},
		}
	}

	pub fn is_basic_auth(&self) -> bool {
		matches!(self.kind, CredentialsKind::Basic { .. })
	}

	pub fn is_oauth(&self) -> bool {
		matches!(self.kind, CredentialsKind::OAuth { .. })
	}

	pub fn username(&self) -> Option<&str> {
		match &self.kind {
			CredentialsKind::Basic { username, .. } => Some(username),
			CredentialsKind::OAuth { .. } => None,
		}
	}

	pub fn password(&self) -> Option<&SecretString> {
		match &self.kind {
			CredentialsKind::Basic { password, .. } => Some(password),
			CredentialsKind::OAuth { .. } => None,
		}
	}

	pub fn access_token(&self) -> Option<&SecretString> {
		match &self.kind {
			CredentialsKind::OAuth { access_token, .. } => Some(access_token),
			CredentialsKind::Basic { .. } => None,
		}
	}

	pub fn refresh_token(&self) -> Option<&SecretString> {
		match &self.kind {
			CredentialsKind::OAuth { refresh_token, .. } => Some(refresh_token),
			CredentialsKind::Basic { .. } => None,
		}
	}

	/// Convert into the flat credential shape registry clients consume.
	///
	/// The unused pair is left empty. This is the one place secrets leave
	/// their [`SecretString`] wrappers.
	pub fn to_registry_credential(&self) -> RegistryCredential {
		match &self.kind {
			CredentialsKind::Basic { username, password } => RegistryCredential {
				username: username.clone(),
				password: password.expose().clone(),
				..Default::default()
			},
			CredentialsKind::OAuth {
				access_token,
				refresh_token,
			} => RegistryCredential {
				access_token: access_token.expose().clone(),
				refresh_token: refresh_token.expose().clone(),
				..Default::default()
			},
		}
	}
}

impl fmt::Display for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			CredentialsKind::Basic { username, .. } => write!(f, "username/password for {username:?}"),
			CredentialsKind::OAuth { .. } => f.write_str("OAuth access/refresh tokens"),
		}
	}
}

/// Registry-client credential: username/password or access/refresh tokens.
///
/// Debug output is redacted, but the fields are plain strings meant to be
/// handed straight to a registry client.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistryCredential {
	pub username: String,
	pub password: String,
	pub access_token: String,
	pub refresh_token: String,
}

impl RegistryCredential {
	pub fn is_empty(&self) -> bool {
		self.username.is_empty()
			&& self.password.is_empty()
			&& self.access_token.is_empty()
			&& self.refresh_token.is_empty()
	}
}

impl fmt::Debug for RegistryCredential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let redact = |s: &String| if s.is_empty() { "" } else { REDACTED };
		f.debug_struct("RegistryCredential")
			.field("username", &self.username)
			.field("password", &redact(&self.password))
			.field("access_token", &redact(&self.access_token))
			.field("refresh_token", &redact(&self.refresh_token))
			.finish()
	}
}

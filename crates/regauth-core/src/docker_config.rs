// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Docker CLI / Podman style `config.json` and `auth.json` files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::{trace, warn};

use crate::config::{helper_server_url, CredentialsConfig, CredentialsSources};
use crate::credentials::Credentials;
use crate::error::CredentialsError;
use crate::matching::containers_auth_property_name_match;
use crate::source::CredentialsSource;
use crate::specificity::CredentialsSpecificity;

#[derive(Debug, Default, Deserialize)]
struct DockerCliStyleConfigFile {
	#[serde(default)]
	auths: Option<BTreeMap<String, Option<DockerCliStyleAuth>>>,
	#[serde(default, rename = "credHelpers")]
	cred_helpers: Option<BTreeMap<String, String>>,
	#[serde(default, rename = "credsStore")]
	creds_store: Option<String>,
}

// Only `auth` is used; `identitytoken` and friends are ignored.
#[derive(Debug, Default, Deserialize)]
struct DockerCliStyleAuth {
	#[serde(default)]
	auth: Option<String>,
}

/// Credentials configuration read from one Docker-CLI-style JSON file.
///
/// Recognizes `auths` (base64 `username:password` per registry or
/// repository prefix), `credHelpers` (per-domain credential helpers) and
/// `credsStore` (a helper for every domain).
#[derive(Debug)]
pub struct DockerCliStyleCredentialsConfig {
	path: PathBuf,
	auths: BTreeMap<String, String>,
	cred_helpers: BTreeMap<String, String>,
	creds_store: Option<String>,
}

impl DockerCliStyleCredentialsConfig {
	/// Parse the contents of the file at `path`.
	///
	/// Only malformed JSON fails here. Problems with individual `auths`
	/// entries are reported when a request reaches them.
	pub fn parse(path: impl Into<PathBuf>, content: &[u8]) -> Result<Self, CredentialsError> {
		let path = path.into();
		let file: DockerCliStyleConfigFile = match serde_json::from_slice(content) {
			Ok(file) => file,
			Err(source) => return Err(CredentialsError::ParseFile { path, source }),
		};

		// Null entries and empty `auth` strings carry no credentials.
		let auths = file
			.auths
			.unwrap_or_default()
			.into_iter()
			.filter_map(|(name, entry)| {
				let auth = entry?.auth.filter(|auth| !auth.is_empty())?;
				Some((name, auth))
			})
			.collect();
		let cred_helpers = file
			.cred_helpers
			.unwrap_or_default()
			.into_iter()
			.filter(|(_, helper)| !helper.is_empty())
			.collect();
		let creds_store = file.creds_store.filter(|helper| !helper.is_empty());

		trace!(path = %path.display(), "parsed docker-style credentials config");
		Ok(Self {
			path,
			auths,
			cred_helpers,
			creds_store,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// The `credsStore` helper, if any.
	pub fn global_credential_helper(&self) -> Option<&str> {
		self.creds_store.as_deref()
	}

	fn decode_auth(&self, property: &str, encoded: &str) -> Result<Credentials, CredentialsError> {
		let location = self.path.display().to_string();
		let decoded = STANDARD.decode(encoded).map_err(|source| {
			warn!(property = %property, location = %location, "ignoring auth entry that is not valid base64");
			CredentialsError::InvalidAuthEncoding {
				property: property.to_string(),
				location: location.clone(),
				source,
			}
		})?;

		let pair = String::from_utf8(decoded).ok();
		match pair.as_deref().and_then(|pair| pair.split_once(':')) {
			Some((username, password)) => Ok(Credentials::basic_auth(username, password)),
			None => {
				warn!(property = %property, location = %location, "ignoring auth entry without a username:password pair");
				Err(CredentialsError::MalformedAuth {
					property: property.to_string(),
					location,
				})
			}
		}
	}
}

impl CredentialsConfig for DockerCliStyleCredentialsConfig {
	fn credentials_sources_for_repository<'a>(
		&'a self,
		registry_domain: &'a str,
		repository_path: &'a str,
	) -> CredentialsSources<'a> {
		let auths = self.auths.iter().filter_map(move |(property, encoded)| {
			let specificity =
				containers_auth_property_name_match(property, registry_domain, repository_path);
			if specificity == CredentialsSpecificity::NONE {
				return None;
			}
			Some(
				self.decode_auth(property, encoded)
					.map(|credentials| CredentialsSource::new_static(credentials, specificity)),
			)
		});

		let domain_helper = self.cred_helpers.get(registry_domain).map(|helper| {
			Ok(CredentialsSource::new_docker_credential_helper(
				helper.clone(),
				helper_server_url(registry_domain),
				CredentialsSpecificity::DOMAIN,
			))
		});

		let global_helper = self.creds_store.as_ref().map(|helper| {
			Ok(CredentialsSource::new_docker_credential_helper(
				helper.clone(),
				helper_server_url(registry_domain),
				CredentialsSpecificity::GLOBAL,
			))
		});

		Box::new(auths.chain(domain_helper).chain(global_helper))
	}

	fn location_for_ui(&self) -> String {
		self.path.display().to_string()
	}
}

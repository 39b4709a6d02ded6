// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Selection of one credentials source across all configuration layers.

use tracing::{debug, warn};

use crate::address::RepositoryAddress;
use crate::config::CredentialsConfig;
use crate::error::{CredentialsError, ErrorList};
use crate::source::CredentialsSource;
use crate::specificity::CredentialsSpecificity;

/// The winning source for a request.
#[derive(Debug)]
pub struct ResolvedCredentialsSource {
	pub source: CredentialsSource,
	/// `location_for_ui` of the layer the source came from.
	pub location: String,
	/// Problems in other entries that did not prevent a decision.
	pub problems: Option<ErrorList>,
}

/// An ordered set of configuration layers, earliest has priority on ties.
///
/// The most specific source across all layers wins; among equally specific
/// sources the one from the earlier layer wins.
#[derive(Debug, Default)]
pub struct CredentialsConfigs {
	configs: Vec<Box<dyn CredentialsConfig>>,
}

impl CredentialsConfigs {
	pub fn new(configs: Vec<Box<dyn CredentialsConfig>>) -> Self {
		Self { configs }
	}

	pub fn len(&self) -> usize {
		self.configs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.configs.is_empty()
	}

	pub fn configs(&self) -> impl Iterator<Item = &dyn CredentialsConfig> {
		self.configs.iter().map(|config| config.as_ref())
	}

	/// Locations of every layer, in priority order.
	pub fn locations_for_ui(&self) -> Vec<String> {
		self.configs.iter().map(|config| config.location_for_ui()).collect()
	}

	/// Choose the credentials source for `repository_path` on
	/// `registry_domain`.
	///
	/// Fails with an error satisfying [`CredentialsError::is_not_found`] when
	/// nothing applies. When other problems were seen along the way they are
	/// joined with that not-found error.
	pub fn credentials_source_for_repository(
		&self,
		registry_domain: &str,
		repository_path: &str,
	) -> Result<ResolvedCredentialsSource, CredentialsError> {
		let mut best: Option<(CredentialsSource, &dyn CredentialsConfig)> = None;
		let mut best_specificity = CredentialsSpecificity::NONE;
		let mut problems = ErrorList::new();

		for config in &self.configs {
			for result in config.credentials_sources_for_repository(registry_domain, repository_path) {
				match result {
					Ok(source) => {
						if source.specificity() > best_specificity {
							best_specificity = source.specificity();
							best = Some((source, config.as_ref()));
						}
					}
					Err(err) if err.is_not_found() => {}
					Err(err) => problems.push(err.in_layer(config.location_for_ui())),
				}
			}
		}

		if !problems.is_empty() {
			warn!(
				domain = %registry_domain,
				path = %repository_path,
				problems = %problems,
				"problems in credentials configuration"
			);
		}

		match best {
			Some((source, config)) => {
				let location = config.location_for_ui();
				debug!(
					domain = %registry_domain,
					path = %repository_path,
					specificity = ?source.specificity(),
					location = %location,
					"selected credentials source"
				);
				Ok(ResolvedCredentialsSource {
					source,
					location,
					problems: (!problems.is_empty()).then_some(problems),
				})
			}
			None => {
				let not_found = CredentialsError::not_found(format!(
					"no credentials configured for {}",
					display_repository(registry_domain, repository_path)
				));
				if problems.is_empty() {
					Err(not_found)
				} else {
					problems.push(not_found);
					Err(CredentialsError::Multiple(problems))
				}
			}
		}
	}

	/// Like [`Self::credentials_source_for_repository`], starting from a
	/// full repository address such as `example.com/foo/bar`.
	pub fn credentials_source_for_address(
		&self,
		address: &str,
	) -> Result<ResolvedCredentialsSource, CredentialsError> {
		let address = RepositoryAddress::parse(address)?;
		self.credentials_source_for_repository(address.domain(), address.path())
	}
}

impl From<Vec<Box<dyn CredentialsConfig>>> for CredentialsConfigs {
	fn from(configs: Vec<Box<dyn CredentialsConfig>>) -> Self {
		Self::new(configs)
	}
}

fn display_repository(domain: &str, path: &str) -> String {
	if path.is_empty() {
		domain.to_string()
	} else {
		format!("{domain}/{path}")
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation of the OCI credentials blocks.
//!
//! Problems are collected rather than returned one at a time, so a user
//! fixing a config file sees everything wrong with it at once.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regauth_core::RepositoryAddress;
use tracing::trace;

use crate::layer::{OciCredentialsLayer, OciDefaultCredentialsLayer};
use crate::runtime::{OciDefaultCredentials, OciRepositoryCredentials, RepositoryCredentials};
use crate::sources::SourcedLayer;

/// Check a credential helper name, as used in `docker-credential-<name>`.
pub fn validate_helper_name(name: &str) -> Result<(), String> {
	if name.is_empty() || name.contains('/') || name.contains('\\') {
		return Err(format!("specifies the invalid Docker credential helper name {name:?}"));
	}
	Ok(())
}

/// The single `oci_default_credentials` block across all files, or the
/// built-in defaults when there is none.
pub(crate) fn oci_default_credentials(
	layers: &[SourcedLayer],
	problems: &mut Vec<String>,
) -> OciDefaultCredentials {
	let mut found: Option<OciDefaultCredentials> = None;

	for sourced in layers {
		let Some(block) = &sourced.layer.oci_default_credentials else {
			continue;
		};
		let path = sourced.path.display();
		if found.is_some() {
			problems.push(format!(
				"{path}: No more than one oci_default_credentials block may be specified"
			));
			continue;
		}
		found = Some(default_credentials_block(block, &sourced.path, sourced.base_dir(), problems));
	}

	found.unwrap_or_default()
}

fn default_credentials_block(
	block: &OciDefaultCredentialsLayer,
	path: &Path,
	base_dir: &Path,
	problems: &mut Vec<String>,
) -> OciDefaultCredentials {
	let mut result = OciDefaultCredentials::default();
	let location = format!("{}: oci_default_credentials block", path.display());

	if let Some(discover) = block.discover_ambient_credentials {
		result.discover_ambient_credentials = discover;
	}

	if let Some(files) = &block.docker_style_config_files {
		if !result.discover_ambient_credentials {
			problems.push(format!(
				"{location} disables discovery of ambient credentials, but also sets docker_style_config_files"
			));
		}
		result.docker_style_config_files = Some(
			files
				.iter()
				.map(|file| resolve_relative_path(base_dir, file))
				.collect(),
		);
	}

	if let Some(helper) = &block.docker_credentials_helper {
		match validate_helper_name(helper) {
			Ok(()) => result.default_docker_credential_helper = Some(helper.clone()),
			Err(message) => problems.push(format!("{location} {message}")),
		}
	}

	result
}

/// Every `oci_credentials` block in declaration order.
pub(crate) fn oci_repository_credentials(
	layers: &[SourcedLayer],
	problems: &mut Vec<String>,
) -> Vec<OciRepositoryCredentials> {
	let mut result = Vec::new();
	let mut seen = HashSet::new();

	for sourced in layers {
		for (index, block) in sourced.layer.oci_credentials.iter().enumerate() {
			let Some(credentials) = repository_credentials_block(block, &sourced.path, index, problems) else {
				continue;
			};
			let key = credentials.repository_prefix.to_string();
			if !seen.insert(key.clone()) {
				problems.push(format!(
					"{}: Duplicate oci_credentials block for {key:?}",
					sourced.path.display()
				));
				continue;
			}
			trace!(repository = %key, path = %sourced.path.display(), "accepted oci_credentials block");
			result.push(credentials);
		}
	}

	result
}

fn repository_credentials_block(
	block: &OciCredentialsLayer,
	path: &Path,
	index: usize,
	problems: &mut Vec<String>,
) -> Option<OciRepositoryCredentials> {
	let Some(repository) = block.repository.as_deref() else {
		problems.push(format!(
			"{}: oci_credentials block #{} must set repository",
			path.display(),
			index + 1
		));
		return None;
	};
	let location = format!("{}: oci_credentials block for {repository:?}", path.display());

	let repository_prefix = match RepositoryAddress::parse_prefix(repository) {
		Ok(prefix) => prefix,
		Err(err) => {
			problems.push(format!("{location} has an invalid repository prefix: {err}"));
			return None;
		}
	};

	let has_basic = block.username.is_some() || block.password.is_some();
	let has_oauth = block.access_token.is_some() || block.refresh_token.is_some();
	let has_helper = block.docker_credentials_helper.is_some();
	let groups = [has_basic, has_oauth, has_helper].iter().filter(|set| **set).count();

	if groups == 0 {
		problems.push(format!(
			"{location} must set either username+password, access_token+refresh_token, or docker_credentials_helper"
		));
		return None;
	}
	if groups > 1 {
		problems.push(format!(
			"{location} must set only one group out of username+password, access_token+refresh_token, or docker_credentials_helper"
		));
		return None;
	}

	let credentials = if has_basic {
		match (&block.username, &block.password) {
			(Some(username), Some(password)) => RepositoryCredentials::Basic {
				username: username.clone(),
				password: password.clone(),
			},
			_ => {
				problems.push(format!(
					"{location} must set both username and password together when using static credentials"
				));
				return None;
			}
		}
	} else if has_oauth {
		match (&block.access_token, &block.refresh_token) {
			(Some(access_token), Some(refresh_token)) => RepositoryCredentials::OAuth {
				access_token: access_token.clone(),
				refresh_token: refresh_token.clone(),
			},
			_ => {
				problems.push(format!(
					"{location} must set both access_token and refresh_token together when using OAuth-style credentials"
				));
				return None;
			}
		}
	} else {
		let helper = block.docker_credentials_helper.clone().unwrap_or_default();
		if let Err(message) = validate_helper_name(&helper) {
			problems.push(format!("{location} {message}"));
			return None;
		}
		if repository_prefix.has_path() {
			problems.push(format!(
				"{location} cannot set docker_credentials_helper with a repository path; credential helpers apply to a whole registry domain"
			));
			return None;
		}
		RepositoryCredentials::DockerCredentialHelper(helper)
	};

	Some(OciRepositoryCredentials {
		repository_prefix,
		credentials,
	})
}

fn resolve_relative_path(base_dir: &Path, file: &Path) -> PathBuf {
	if file.is_absolute() {
		return file.to_path_buf();
	}
	let joined = base_dir.join(file);
	std::path::absolute(&joined).unwrap_or(joined)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layer::ConfigLayer;

	fn sourced(path: &str, toml_src: &str) -> SourcedLayer {
		SourcedLayer {
			path: PathBuf::from(path),
			layer: toml::from_str::<ConfigLayer>(toml_src).unwrap(),
		}
	}

	fn problems_for(layers: &[SourcedLayer]) -> Vec<String> {
		let mut problems = Vec::new();
		oci_default_credentials(layers, &mut problems);
		oci_repository_credentials(layers, &mut problems);
		problems
	}

	fn single_problem(toml_src: &str) -> String {
		let problems = problems_for(&[sourced("/etc/regauth/config.toml", toml_src)]);
		assert_eq!(problems.len(), 1, "{problems:?}");
		problems.into_iter().next().unwrap()
	}

	#[test]
	fn helper_names() {
		assert!(validate_helper_name("osxkeychain").is_ok());
		assert!(validate_helper_name("ecr-login").is_ok());
		assert_eq!(
			validate_helper_name("not/valid").unwrap_err(),
			"specifies the invalid Docker credential helper name \"not/valid\""
		);
		assert!(validate_helper_name("").is_err());
	}

	#[test]
	fn block_without_credentials_is_rejected() {
		let problem = single_problem("[[oci_credentials]]\nrepository = \"example.com\"\n");
		assert!(problem.contains(
			"must set either username+password, access_token+refresh_token, or docker_credentials_helper"
		));
		assert!(problem.starts_with("/etc/regauth/config.toml: oci_credentials block for \"example.com\""));
	}

	#[test]
	fn mixed_groups_are_rejected() {
		let problem = single_problem(
			"[[oci_credentials]]\nrepository = \"example.com\"\nusername = \"u\"\npassword = \"p\"\ndocker_credentials_helper = \"pass\"\n",
		);
		assert!(problem.contains("must set only one group out of"), "{problem}");
	}

	#[test]
	fn username_with_access_token_is_rejected() {
		let problem = single_problem(
			"[[oci_credentials]]\nrepository = \"example.com\"\nusername = \"u\"\naccess_token = \"a\"\n",
		);
		assert!(problem.contains("must set only one group out of"), "{problem}");
	}

	#[test]
	fn incomplete_pairs_are_rejected() {
		let problem = single_problem("[[oci_credentials]]\nrepository = \"example.com\"\nusername = \"u\"\n");
		assert!(problem.contains("must set both username and password together"), "{problem}");

		let problem = single_problem("[[oci_credentials]]\nrepository = \"example.com\"\nrefresh_token = \"r\"\n");
		assert!(
			problem.contains("must set both access_token and refresh_token together"),
			"{problem}"
		);
	}

	#[test]
	fn helper_with_repository_path_is_rejected() {
		let problem = single_problem(
			"[[oci_credentials]]\nrepository = \"example.com/foo\"\ndocker_credentials_helper = \"pass\"\n",
		);
		assert!(
			problem.contains("cannot set docker_credentials_helper with a repository path"),
			"{problem}"
		);
	}

	#[test]
	fn invalid_helper_name_is_rejected() {
		let problem = single_problem(
			"[[oci_credentials]]\nrepository = \"example.com\"\ndocker_credentials_helper = \"not/valid\"\n",
		);
		assert!(
			problem.contains("specifies the invalid Docker credential helper name \"not/valid\""),
			"{problem}"
		);

		let problem = single_problem("[oci_default_credentials]\ndocker_credentials_helper = \"not/valid\"\n");
		assert!(problem.contains("oci_default_credentials block specifies the invalid"), "{problem}");
	}

	#[test]
	fn invalid_prefix_and_missing_repository_are_rejected() {
		let problem = single_problem(
			"[[oci_credentials]]\nrepository = \"example.com/foo:latest\"\nusername = \"u\"\npassword = \"p\"\n",
		);
		assert!(problem.contains("has an invalid repository prefix"), "{problem}");

		let problem = single_problem("[[oci_credentials]]\nusername = \"u\"\npassword = \"p\"\n");
		assert!(problem.contains("oci_credentials block #1 must set repository"), "{problem}");
	}

	#[test]
	fn duplicate_prefixes_are_rejected_across_files() {
		let block = "[[oci_credentials]]\nrepository = \"example.com\"\ndocker_credentials_helper = \"pass\"\n";
		let problems = problems_for(&[sourced("/a.toml", block), sourced("/b.toml", block)]);
		assert_eq!(problems, vec!["/b.toml: Duplicate oci_credentials block for \"example.com\""]);
	}

	#[test]
	fn only_one_default_block_is_allowed() {
		let block = "[oci_default_credentials]\ndiscover_ambient_credentials = true\n";
		let problems = problems_for(&[sourced("/a.toml", block), sourced("/b.toml", block)]);
		assert_eq!(
			problems,
			vec!["/b.toml: No more than one oci_default_credentials block may be specified"]
		);
	}

	#[test]
	fn disabled_discovery_with_files_is_rejected() {
		let problem = single_problem(
			"[oci_default_credentials]\ndiscover_ambient_credentials = false\ndocker_style_config_files = [\"/auth.json\"]\n",
		);
		assert!(
			problem.contains("disables discovery of ambient credentials, but also sets docker_style_config_files"),
			"{problem}"
		);
	}

	#[test]
	fn every_problem_is_reported() {
		let problems = problems_for(&[sourced(
			"/c.toml",
			r#"
			[[oci_credentials]]
			repository = "example.com"

			[[oci_credentials]]
			repository = "example.net"
			username = "u"

			[[oci_credentials]]
			repository = "example.org"
			access_token = "a"
			refresh_token = "r"
			"#,
		)]);
		assert_eq!(problems.len(), 2, "{problems:?}");
	}

	#[test]
	fn relative_config_files_resolve_against_the_config_directory() {
		let layers = [sourced(
			"/etc/regauth/config.toml",
			"[oci_default_credentials]\ndocker_style_config_files = [\"auth.json\", \"/abs/config.json\"]\n",
		)];
		let mut problems = Vec::new();
		let defaults = oci_default_credentials(&layers, &mut problems);
		assert!(problems.is_empty());
		assert_eq!(
			defaults.docker_style_config_files,
			Some(vec![
				PathBuf::from("/etc/regauth/auth.json"),
				PathBuf::from("/abs/config.json"),
			])
		);
		assert!(defaults.discover_ambient_credentials);
	}

	#[test]
	fn empty_file_list_is_kept() {
		let layers = [sourced("/c.toml", "[oci_default_credentials]\ndocker_style_config_files = []\n")];
		let mut problems = Vec::new();
		let defaults = oci_default_credentials(&layers, &mut problems);
		assert_eq!(defaults.docker_style_config_files, Some(vec![]));
	}
}

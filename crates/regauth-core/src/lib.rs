// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OCI registry credentials policy.
//!
//! This crate decides which credentials apply to a repository on an OCI
//! registry, given several overlapping sources of configuration:
//! - explicit blocks in the CLI configuration
//! - Docker-CLI / Podman style `auth.json` and `config.json` files
//! - `docker-credential-*` helper programs
//!
//! Each source of configuration is a [`CredentialsConfig`] layer. A
//! [`CredentialsConfigs`] set asks every layer for candidate
//! [`CredentialsSource`]s and keeps the one with the highest
//! [`CredentialsSpecificity`]. Running credential helpers is deferred to
//! [`CredentialsSource::credentials`] through a
//! [`CredentialsLookupEnvironment`], so only the winning helper is run.
//!
//! The crate performs no network access.

pub mod address;
pub mod config;
pub mod configs;
pub mod credentials;
pub mod discovery;
pub mod docker_config;
pub mod error;
pub mod lookup;
pub mod matching;
pub mod secret;
pub mod source;
pub mod specificity;

pub use address::{parse_repository_address_prefix, RepositoryAddress};
pub use config::{
	helper_server_url, CredentialsConfig, CredentialsSources, GlobalDockerCredentialHelperConfig,
};
pub use configs::{CredentialsConfigs, ResolvedCredentialsSource};
pub use credentials::{Credentials, RegistryCredential};
pub use discovery::{
	docker_cli_style_auth_file_search_locations, find_docker_cli_style_credentials_configs,
	fixed_docker_cli_style_credentials_configs, ConfigDiscoveryEnvironment, OperatingSystem,
};
pub use docker_config::DockerCliStyleCredentialsConfig;
pub use error::{CredentialsError, ErrorList};
pub use lookup::{CredentialsLookupEnvironment, DockerCredentialHelperGetResult};
pub use matching::containers_auth_property_name_match;
pub use secret::{Secret, SecretString, REDACTED};
pub use source::{CredentialsSource, CredentialsSourceKind};
pub use specificity::CredentialsSpecificity;

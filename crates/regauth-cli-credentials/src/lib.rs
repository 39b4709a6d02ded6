// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Docker credential helper support for regauth.
//!
//! # Features
//!
//! - **DockerCredentialHelperProcess**: runs `docker-credential-<name> get`
//!   and speaks the helper JSON protocol
//! - **CachedLookupEnvironment**: reuses helper answers for a short time
//!
//! Both implement [`regauth_core::CredentialsLookupEnvironment`], so they
//! plug straight into [`regauth_core::CredentialsSource::credentials`].
//!
//! ```rust,no_run
//! use regauth_cli_credentials::{CachedLookupEnvironment, DockerCredentialHelperProcess};
//! use regauth_core::{CredentialsSource, CredentialsSpecificity};
//!
//! let lookup = CachedLookupEnvironment::new(DockerCredentialHelperProcess::new());
//! let source = CredentialsSource::new_docker_credential_helper(
//! 	"pass",
//! 	"https://example.com",
//! 	CredentialsSpecificity::DOMAIN,
//! );
//! let credentials = source.credentials(&lookup);
//! ```

mod cache;
mod error;
mod helper;

pub use cache::{CachedLookupEnvironment, DEFAULT_CACHE_TTL};
pub use error::HelperError;
pub use helper::DockerCredentialHelperProcess;

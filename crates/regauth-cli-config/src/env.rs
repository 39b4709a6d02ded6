// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The real host, as seen by ambient credentials discovery.

use std::io;
use std::path::{Path, PathBuf};

use regauth_core::{ConfigDiscoveryEnvironment, OperatingSystem};
use tracing::trace;

/// [`ConfigDiscoveryEnvironment`] backed by the process environment and the
/// local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostDiscoveryEnvironment;

impl HostDiscoveryEnvironment {
	pub fn new() -> Self {
		Self
	}
}

impl ConfigDiscoveryEnvironment for HostDiscoveryEnvironment {
	fn environment_variable_val(&self, name: &str) -> Option<String> {
		std::env::var(name).ok().filter(|v| !v.is_empty())
	}

	fn user_home_dir_path(&self) -> PathBuf {
		let (var, fallback) = match self.operating_system() {
			OperatingSystem::Windows => ("USERPROFILE", "nul:"),
			_ => ("HOME", "/"),
		};
		self
			.environment_variable_val(var)
			.map(PathBuf::from)
			.or_else(dirs::home_dir)
			.unwrap_or_else(|| PathBuf::from(fallback))
	}

	fn operating_system(&self) -> OperatingSystem {
		OperatingSystem::current()
	}

	fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
		trace!(path = %path.display(), "reading file");
		std::fs::read(path)
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: config files at their well-known locations.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::layer::ConfigLayer;
use crate::paths::PathsConfig;
use crate::ConfigError;

/// Source precedence levels (higher = loaded later).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	SystemFile = 20,
	UserFile = 30,
	ExplicitFile = 40,
}

/// A parsed layer together with the file it came from.
#[derive(Debug, Clone)]
pub struct SourcedLayer {
	pub path: PathBuf,
	pub layer: ConfigLayer,
}

impl SourcedLayer {
	/// Directory that relative paths in this layer are resolved against.
	pub fn base_dir(&self) -> &Path {
		self.path.parent().unwrap_or_else(|| Path::new("."))
	}
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	/// Name for logging
	fn name(&self) -> &'static str;

	/// Precedence level
	fn precedence(&self) -> Precedence;

	/// Load this source's layer, or `None` if the source does not exist.
	fn load(&self) -> Result<Option<SourcedLayer>, ConfigError>;
}

/// File-based configuration source (TOML).
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
	name: &'static str,
	required: bool,
}

impl FileSource {
	/// System config: /etc/regauth/config.toml
	pub fn system(paths: &PathsConfig) -> Self {
		Self {
			path: paths.system_config_file.clone(),
			precedence: Precedence::SystemFile,
			name: "system-config",
			required: false,
		}
	}

	/// User config: ~/.config/regauth/config.toml
	pub fn user(paths: &PathsConfig) -> Self {
		Self {
			path: paths.user_config_file.clone(),
			precedence: Precedence::UserFile,
			name: "user-config",
			required: false,
		}
	}

	/// A file the user asked for by name; it must exist.
	pub fn explicit(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			precedence: Precedence::ExplicitFile,
			name: "explicit-config",
			required: true,
		}
	}

	/// Custom file path with specified precedence
	pub fn custom(path: PathBuf, precedence: Precedence, name: &'static str) -> Self {
		Self {
			path,
			precedence,
			name,
			required: false,
		}
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		self.name
	}

	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<Option<SourcedLayer>, ConfigError> {
		if !self.required && !self.path.exists() {
			debug!(path = %self.path.display(), source = self.name, "config file not found, skipping");
			return Ok(None);
		}

		debug!(path = %self.path.display(), source = self.name, "loading config file");

		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::Io {
			path: self.path.clone(),
			source: e,
		})?;
		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(source = self.name, "parsed config layer");
		Ok(Some(SourcedLayer {
			path: self.path.clone(),
			layer,
		}))
	}
}

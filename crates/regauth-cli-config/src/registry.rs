// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration registry - manages sources and loads them in order.

use tracing::{debug, info};

use crate::runtime::CliConfig;
use crate::sources::ConfigSource;
use crate::ConfigError;

/// Registry that manages configuration sources.
pub struct ConfigRegistry {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigRegistry {
	/// Create a new empty registry.
	pub fn new() -> Self {
		Self {
			sources: Vec::new(),
		}
	}

	/// Register a configuration source.
	pub fn register(&mut self, source: Box<dyn ConfigSource>) {
		debug!(source = source.name(), precedence = ?source.precedence(), "registering config source");
		self.sources.push(source);
	}

	/// Load every source, lowest precedence first, and validate the result.
	///
	/// Sources that do not exist are skipped. A source that exists but
	/// cannot be read or parsed fails the whole load.
	pub fn load(&self) -> Result<CliConfig, ConfigError> {
		let mut sorted_sources: Vec<_> = self.sources.iter().collect();
		sorted_sources.sort_by_key(|s| s.precedence());

		info!(
			source_count = sorted_sources.len(),
			"loading configuration from sources"
		);

		let mut layers = Vec::with_capacity(sorted_sources.len());
		for source in sorted_sources {
			if let Some(layer) = source.load()? {
				debug!(source = source.name(), path = %layer.path.display(), "loaded config layer");
				layers.push(layer);
			}
		}

		let config = CliConfig::from_layers(layers)?;

		info!(
			files = config.sources.len(),
			oci_credentials = config.oci_credentials.len(),
			discover_ambient = config.oci_default_credentials.discover_ambient_credentials,
			log_level = ?config.logging.level,
			"configuration loaded successfully"
		);

		Ok(config)
	}

	/// Get the number of registered sources.
	pub fn source_count(&self) -> usize {
		self.sources.len()
	}
}

impl Default for ConfigRegistry {
	fn default() -> Self {
		Self::new()
	}
}

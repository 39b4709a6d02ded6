// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credentials resolution error types.

use std::fmt;
use std::path::PathBuf;

/// Errors produced while discovering, matching or resolving credentials.
///
/// "Nothing configured" is not a failure: it is reported as
/// [`CredentialsError::NotFound`] and callers distinguish it with
/// [`CredentialsError::is_not_found`].
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
	/// No credentials apply. Callers treat this as anonymous access.
	#[error("no credentials found: {0}")]
	NotFound(String),

	/// An `auths` entry whose decoded value has no `username:password` pair.
	#[error("auth object for {property:?} in {location} does not have base64-encoded username:password pair")]
	MalformedAuth { property: String, location: String },

	/// An `auths` entry that is not valid base64.
	#[error("auth object for {property:?} in {location} is not valid base64: {source}")]
	InvalidAuthEncoding {
		property: String,
		location: String,
		#[source]
		source: base64::DecodeError,
	},

	#[error("reading {}: {source}", .path.display())]
	ReadFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("parsing {}: invalid JSON syntax: {source}", .path.display())]
	ParseFile {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	/// A problem attributed to one configuration layer.
	#[error("{location}: {source}")]
	Layer {
		location: String,
		#[source]
		source: Box<CredentialsError>,
	},

	/// A credential helper call failed for a reason other than "not found".
	#[error("{helper:?} credential helper failed for {server_url}: {source}")]
	HelperFailed {
		helper: String,
		server_url: String,
		#[source]
		source: Box<CredentialsError>,
	},

	/// Failure reported by a credential helper adapter.
	#[error("{0}")]
	Helper(String),

	#[error("invalid repository address {address:?}: {reason}")]
	InvalidAddress { address: String, reason: String },

	#[error("{0}")]
	Multiple(ErrorList),
}

impl CredentialsError {
	pub fn not_found(msg: impl Into<String>) -> Self {
		Self::NotFound(msg.into())
	}

	pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidAddress {
			address: address.into(),
			reason: reason.into(),
		}
	}

	/// Attribute this error to the configuration layer at `location`.
	pub fn in_layer(self, location: impl Into<String>) -> Self {
		Self::Layer {
			location: location.into(),
			source: Box::new(self),
		}
	}

	/// Whether this error means "no credentials apply".
	///
	/// Looks through [`CredentialsError::Layer`] wrappers and into
	/// [`CredentialsError::Multiple`] lists, so a joined error that contains a
	/// not-found error is itself not-found.
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::NotFound(_) => true,
			Self::Layer { source, .. } => source.is_not_found(),
			Self::Multiple(list) => list.any(CredentialsError::is_not_found),
			_ => false,
		}
	}
}

/// An ordered collection of errors reported together.
///
/// Formats as one error per line, so no detail is lost when several
/// configuration files fail at once.
#[derive(Debug, Default)]
pub struct ErrorList(Vec<CredentialsError>);

impl ErrorList {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn push(&mut self, err: CredentialsError) {
		self.0.push(err);
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, CredentialsError> {
		self.0.iter()
	}

	/// Whether at least one error in the list satisfies `pred`.
	pub fn any(&self, pred: impl Fn(&CredentialsError) -> bool) -> bool {
		self.0.iter().any(pred)
	}

	/// `None` when empty, the single error itself, or a [`CredentialsError::Multiple`].
	pub fn into_error(mut self) -> Option<CredentialsError> {
		match self.0.len() {
			0 => None,
			1 => self.0.pop(),
			_ => Some(CredentialsError::Multiple(self)),
		}
	}

	/// `Ok(())` when empty, otherwise the joined error.
	pub fn into_result(self) -> Result<(), CredentialsError> {
		match self.into_error() {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}
}

impl fmt::Display for ErrorList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, err) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str("\n")?;
			}
			write!(f, "{err}")?;
		}
		Ok(())
	}
}

impl From<Vec<CredentialsError>> for ErrorList {
	fn from(errors: Vec<CredentialsError>) -> Self {
		Self(errors)
	}
}

impl IntoIterator for ErrorList {
	type Item = CredentialsError;
	type IntoIter = std::vec::IntoIter<CredentialsError>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a ErrorList {
	type Item = &'a CredentialsError;
	type IntoIter = std::slice::Iter<'a, CredentialsError>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

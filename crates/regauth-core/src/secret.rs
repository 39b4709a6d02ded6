// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for passwords and tokens.
//!
//! Registry passwords and OAuth tokens flow through several layers (config
//! files, helper output, the resolved [`crate::Credentials`]). Every one of
//! them holds the value in a [`Secret`] so that `{:?}`, `{}` and structured
//! tracing fields print [`REDACTED`] instead of the value.
//!
//! ```
//! use regauth_core::SecretString;
//!
//! let password = SecretString::new("hunter2".to_string());
//! assert_eq!(format!("{password:?}"), "Secret(\"[REDACTED]\")");
//! assert_eq!(password.expose(), "hunter2");
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer};
use zeroize::Zeroize;

/// Placeholder printed in place of any secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that is zeroed on drop and never printed.
///
/// There is no `Deref`; reading the value requires an explicit
/// [`Secret::expose`] so secret access stands out in review.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T: Zeroize> {
	inner: T,
}

/// Secret string, the only shape registry credentials take.
pub type SecretString = Secret<String>;

impl<T: Zeroize> Secret<T> {
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the secret value.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T: Zeroize + PartialEq> PartialEq for Secret<T> {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T: Zeroize + Eq> Eq for Secret<T> {}

impl<T: Zeroize> fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T: Zeroize> fmt::Display for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

// Deserialize only: secrets are read from config files and helper output but
// never written back out.
impl<'de, T> Deserialize<'de> for Secret<T>
where
	T: Deserialize<'de> + Zeroize,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		T::deserialize(deserializer).map(Secret::new)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn debug_and_display_are_redacted() {
		let secret = SecretString::from("p4ssw0rd");
		let debug = format!("{secret:?}");
		let display = format!("{secret}");

		assert!(!debug.contains("p4ssw0rd"));
		assert!(!display.contains("p4ssw0rd"));
		assert_eq!(display, REDACTED);
	}

	#[test]
	fn deserializes_transparently() {
		#[derive(Deserialize)]
		struct Wrapper {
			token: SecretString,
		}

		let parsed: Wrapper = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
		assert_eq!(parsed.token.expose(), "abc");
	}

	#[test]
	fn equality_compares_inner_values() {
		assert_eq!(SecretString::from("a"), SecretString::from("a"));
		assert_ne!(SecretString::from("a"), SecretString::from("b"));
	}
}

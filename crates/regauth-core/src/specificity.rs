// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! How closely a credentials source matches a requested repository.

use std::fmt;

/// Ranking of a credentials source against a `(domain, path)` request.
///
/// Larger values are more specific. Compare values with the ordinary
/// comparison operators; the integer encoding is an implementation detail.
///
/// ```
/// use regauth_core::CredentialsSpecificity;
///
/// assert!(CredentialsSpecificity::repository(1) > CredentialsSpecificity::DOMAIN);
/// assert!(CredentialsSpecificity::DOMAIN > CredentialsSpecificity::GLOBAL);
/// assert!(CredentialsSpecificity::GLOBAL > CredentialsSpecificity::NONE);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CredentialsSpecificity(u32);

const DOMAIN_RAW: u32 = 2;

impl CredentialsSpecificity {
	/// The source does not apply to the request at all.
	pub const NONE: Self = Self(0);

	/// The source applies to every registry domain.
	pub const GLOBAL: Self = Self(1);

	/// The source matched the registry domain but no repository path.
	pub const DOMAIN: Self = Self(DOMAIN_RAW);

	/// The source matched the domain and the first `segments` path segments.
	///
	/// Saturates instead of overflowing. `repository(0)` is the same as
	/// [`Self::DOMAIN`].
	pub const fn repository(segments: u32) -> Self {
		Self(DOMAIN_RAW.saturating_add(segments))
	}

	pub fn matched_registry_domain(self) -> bool {
		self >= Self::DOMAIN
	}

	pub fn matched_repository_path(self) -> bool {
		self > Self::DOMAIN
	}

	/// Number of matched repository path segments, zero when no path matched.
	pub fn matched_repository_path_segments(self) -> u32 {
		self.0.saturating_sub(DOMAIN_RAW)
	}
}

impl fmt::Debug for CredentialsSpecificity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::NONE => f.write_str("None"),
			Self::GLOBAL => f.write_str("Global"),
			Self::DOMAIN => f.write_str("Domain"),
			other => write!(f, "Repository({})", other.matched_repository_path_segments()),
		}
	}
}

impl fmt::Display for CredentialsSpecificity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::NONE => f.write_str("no match"),
			Self::GLOBAL => f.write_str("global"),
			Self::DOMAIN => f.write_str("registry domain"),
			other => match other.matched_repository_path_segments() {
				1 => f.write_str("repository path (1 segment)"),
				n => write!(f, "repository path ({n} segments)"),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tiers_are_ordered() {
		assert!(CredentialsSpecificity::NONE < CredentialsSpecificity::GLOBAL);
		assert!(CredentialsSpecificity::GLOBAL < CredentialsSpecificity::DOMAIN);
		assert!(CredentialsSpecificity::DOMAIN < CredentialsSpecificity::repository(1));
		assert!(CredentialsSpecificity::repository(1) < CredentialsSpecificity::repository(2));
	}

	#[test]
	fn predicates() {
		let none = CredentialsSpecificity::NONE;
		assert!(!none.matched_registry_domain());
		assert!(!none.matched_repository_path());
		assert_eq!(none.matched_repository_path_segments(), 0);

		let global = CredentialsSpecificity::GLOBAL;
		assert!(!global.matched_registry_domain());
		assert_eq!(global.matched_repository_path_segments(), 0);

		let domain = CredentialsSpecificity::DOMAIN;
		assert!(domain.matched_registry_domain());
		assert!(!domain.matched_repository_path());
		assert_eq!(domain.matched_repository_path_segments(), 0);

		let repo = CredentialsSpecificity::repository(3);
		assert!(repo.matched_registry_domain());
		assert!(repo.matched_repository_path());
		assert_eq!(repo.matched_repository_path_segments(), 3);
	}

	#[test]
	fn repository_saturates() {
		let max = CredentialsSpecificity::repository(u32::MAX);
		assert_eq!(max, CredentialsSpecificity::repository(u32::MAX - 1));
		assert!(max > CredentialsSpecificity::repository(1000));
	}

	#[test]
	fn debug_names_tiers() {
		assert_eq!(format!("{:?}", CredentialsSpecificity::NONE), "None");
		assert_eq!(format!("{:?}", CredentialsSpecificity::GLOBAL), "Global");
		assert_eq!(format!("{:?}", CredentialsSpecificity::DOMAIN), "Domain");
		assert_eq!(
			format!("{:?}", CredentialsSpecificity::repository(2)),
			"Repository(2)"
		);
	}

	mod proptests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn more_segments_is_more_specific(n in 1u32..10_000, m in 1u32..10_000) {
				let a = CredentialsSpecificity::repository(n);
				let b = CredentialsSpecificity::repository(m);
				prop_assert_eq!(a.cmp(&b), n.cmp(&m));
				prop_assert!(a > CredentialsSpecificity::DOMAIN);
				prop_assert_eq!(a.matched_repository_path_segments(), n);
			}

			#[test]
			fn ordering_is_transitive(a in 0u32..50, b in 0u32..50, c in 0u32..50) {
				let (a, b, c) = (
					CredentialsSpecificity::repository(a),
					CredentialsSpecificity::repository(b),
					CredentialsSpecificity::repository(c),
				);
				if a > b && b > c {
					prop_assert!(a > c);
				}
			}
		}
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Short-lived memoization of credential helper answers.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use regauth_core::{CredentialsError, CredentialsLookupEnvironment, DockerCredentialHelperGetResult};
use tracing::trace;

/// How long helper answers are reused by default.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

type Clock = Box<dyn Fn() -> Instant + Send + Sync>;

#[derive(Clone)]
struct CacheEntry {
	// `None` records a not-found answer.
	result: Option<DockerCredentialHelperGetResult>,
	expires_at: Instant,
}

/// Wraps a lookup environment and reuses its answers for a while.
///
/// Credential helpers can be slow or interactive, and one command may need
/// credentials for the same registry many times. Successful and not-found
/// answers are cached per `(helper, server_url)`; failures are not, so a
/// transient problem is retried on the next request.
pub struct CachedLookupEnvironment<E> {
	inner: E,
	ttl: Duration,
	clock: Clock,
	entries: Mutex<HashMap<(String, String), CacheEntry>>,
}

impl<E: CredentialsLookupEnvironment> CachedLookupEnvironment<E> {
	pub fn new(inner: E) -> Self {
		Self::with_ttl(inner, DEFAULT_CACHE_TTL)
	}

	/// A TTL of zero disables caching.
	pub fn with_ttl(inner: E, ttl: Duration) -> Self {
		Self {
			inner,
			ttl,
			clock: Box::new(Instant::now),
			entries: Mutex::new(HashMap::new()),
		}
	}

	/// Replace the time source, for tests.
	pub fn with_clock(mut self, clock: impl Fn() -> Instant + Send + Sync + 'static) -> Self {
		self.clock = Box::new(clock);
		self
	}

	pub fn inner(&self) -> &E {
		&self.inner
	}

	/// Forget every cached answer.
	pub fn clear(&self) {
		if let Ok(mut entries) = self.entries.lock() {
			entries.clear();
		}
	}

	fn cached(&self, key: &(String, String), now: Instant) -> Option<CacheEntry> {
		let entries = self.entries.lock().ok()?;
		entries.get(key).filter(|entry| entry.expires_at > now).cloned()
	}

	fn store(&self, key: (String, String), result: Option<DockerCredentialHelperGetResult>, now: Instant) {
		if let Ok(mut entries) = self.entries.lock() {
			entries.retain(|_, entry| entry.expires_at > now);
			entries.insert(
				key,
				CacheEntry {
					result,
					expires_at: now + self.ttl,
				},
			);
		}
	}
}

impl<E: CredentialsLookupEnvironment> CredentialsLookupEnvironment for CachedLookupEnvironment<E> {
	fn query_docker_credential_helper(
		&self,
		helper_name: &str,
		server_url: &str,
	) -> Result<DockerCredentialHelperGetResult, CredentialsError> {
		if self.ttl.is_zero() {
			return self.inner.query_docker_credential_helper(helper_name, server_url);
		}

		let key = (helper_name.to_string(), server_url.to_string());
		let now = (self.clock)();

		if let Some(entry) = self.cached(&key, now) {
			trace!(helper = %helper_name, server_url = %server_url, "using cached credential helper answer");
			return entry.result.ok_or_else(|| {
				CredentialsError::not_found(format!(
					"{helper_name:?} credential helper has no credentials for {server_url}"
				))
			});
		}

		match self.inner.query_docker_credential_helper(helper_name, server_url) {
			Ok(result) => {
				self.store(key, Some(result.clone()), now);
				Ok(result)
			}
			Err(err) if err.is_not_found() => {
				self.store(key, None, now);
				Err(err)
			}
			Err(err) => Err(err),
		}
	}
}

impl<E> std::fmt::Debug for CachedLookupEnvironment<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CachedLookupEnvironment")
			.field("ttl", &self.ttl)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use regauth_core::SecretString;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	/// Counts calls; `fail` and `missing` select the kind of answer.
	#[derive(Default)]
	struct CountingLookup {
		calls: AtomicUsize,
	}

	impl CredentialsLookupEnvironment for CountingLookup {
		fn query_docker_credential_helper(
			&self,
			helper_name: &str,
			server_url: &str,
		) -> Result<DockerCredentialHelperGetResult, CredentialsError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			match helper_name {
				"missing" => Err(CredentialsError::not_found("nothing stored")),
				"fail" => Err(CredentialsError::Helper("keychain locked".to_string())),
				_ => Ok(DockerCredentialHelperGetResult {
					server_url: server_url.to_string(),
					username: "alice".to_string(),
					secret: SecretString::from("pw"),
				}),
			}
		}
	}

	fn calls(cache: &CachedLookupEnvironment<CountingLookup>) -> usize {
		cache.inner().calls.load(Ordering::SeqCst)
	}

	#[test]
	fn repeated_queries_hit_the_cache() {
		let cache = CachedLookupEnvironment::new(CountingLookup::default());

		for _ in 0..3 {
			let result = cache
				.query_docker_credential_helper("pass", "https://example.com")
				.unwrap();
			assert_eq!(result.username, "alice");
		}
		assert_eq!(calls(&cache), 1);

		cache
			.query_docker_credential_helper("pass", "https://example.net")
			.unwrap();
		assert_eq!(calls(&cache), 2);
	}

	#[test]
	fn not_found_answers_are_cached() {
		let cache = CachedLookupEnvironment::new(CountingLookup::default());

		for _ in 0..2 {
			let err = cache
				.query_docker_credential_helper("missing", "https://example.com")
				.unwrap_err();
			assert!(err.is_not_found());
		}
		assert_eq!(calls(&cache), 1);
	}

	#[test]
	fn failures_are_not_cached() {
		let cache = CachedLookupEnvironment::new(CountingLookup::default());

		for _ in 0..2 {
			let err = cache
				.query_docker_credential_helper("fail", "https://example.com")
				.unwrap_err();
			assert!(!err.is_not_found());
		}
		assert_eq!(calls(&cache), 2);
	}

	#[test]
	fn entries_expire() {
		let start = Instant::now();
		let offset = Arc::new(AtomicUsize::new(0));
		let clock_offset = Arc::clone(&offset);
		let cache = CachedLookupEnvironment::with_ttl(CountingLookup::default(), Duration::from_secs(60))
			.with_clock(move || start + Duration::from_secs(clock_offset.load(Ordering::SeqCst) as u64));

		cache
			.query_docker_credential_helper("pass", "https://example.com")
			.unwrap();
		offset.store(59, Ordering::SeqCst);
		cache
			.query_docker_credential_helper("pass", "https://example.com")
			.unwrap();
		assert_eq!(calls(&cache), 1);

		offset.store(61, Ordering::SeqCst);
		cache
			.query_docker_credential_helper("pass", "https://example.com")
			.unwrap();
		assert_eq!(calls(&cache), 2);
	}

	#[test]
	fn zero_ttl_disables_caching() {
		let cache = CachedLookupEnvironment::with_ttl(CountingLookup::default(), Duration::ZERO);
		for _ in 0..2 {
			cache
				.query_docker_credential_helper("pass", "https://example.com")
				.unwrap();
		}
		assert_eq!(calls(&cache), 2);
	}

	#[test]
	fn clear_forgets_answers() {
		let cache = CachedLookupEnvironment::new(CountingLookup::default());
		cache
			.query_docker_credential_helper("pass", "https://example.com")
			.unwrap();
		cache.clear();
		cache
			.query_docker_credential_helper("pass", "https://example.com")
			.unwrap();
		assert_eq!(calls(&cache), 2);
	}
}

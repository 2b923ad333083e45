//! Startup secret resolution (C1).
//!
//! Secrets are resolved once, in order, from a chain of [`SecretSource`]s
//! and cached for the lifetime of the process. A secret missing from every
//! source in the chain is a fatal configuration error: this crate never
//! lets a component start with a silently-absent credential.

use async_trait::async_trait;
use selscore_core::error::{Result, SelError};
use std::collections::HashMap;
use std::sync::RwLock;

/// Well-known secret names this engine requires at startup.
pub mod names {
    pub const LLM_API_KEY: &str = "SELSCORE_LLM_API_KEY";
    pub const WEBHOOK_SIGNING_KEY: &str = "SELSCORE_WEBHOOK_SIGNING_KEY";
}

/// One place a secret value can come from.
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Human-readable name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Resolve `key`, if this source has it. Returning `Ok(None)` means
    /// "not found here, try the next source"; `Err` means the source
    /// itself is unavailable (e.g. a managed backend is unreachable).
    async fn resolve(&self, key: &str) -> Result<Option<String>>;
}

/// Reads secrets from process environment variables.
pub struct EnvSecretSource;

#[async_trait]
impl SecretSource for EnvSecretSource {
    fn name(&self) -> &'static str {
        "env"
    }

    async fn resolve(&self, key: &str) -> Result<Option<String>> {
        match std::env::var(key) {
            Ok(value) if !value.is_empty() => Ok(Some(value)),
            Ok(_) => Ok(None),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(SelError::UpstreamUnavailable {
                source_name: "env".to_string(),
                message: format!("{key} is not valid unicode"),
            }),
        }
    }
}

/// Reads secrets from an externally-managed backend (vault, secrets
/// manager). The transport is injected so this crate stays backend-agnostic;
/// a backend lookup failure is propagated, not swallowed, because a
/// transient managed-store outage must not be mistaken for "secret absent".
pub struct ManagedSecretSource {
    backend_name: &'static str,
    lookup: Box<dyn Fn(&str) -> Result<Option<String>> + Send + Sync>,
}

impl ManagedSecretSource {
    pub fn new(
        backend_name: &'static str,
        lookup: impl Fn(&str) -> Result<Option<String>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            backend_name,
            lookup: Box::new(lookup),
        }
    }
}

#[async_trait]
impl SecretSource for ManagedSecretSource {
    fn name(&self) -> &'static str {
        self.backend_name
    }

    async fn resolve(&self, key: &str) -> Result<Option<String>> {
        (self.lookup)(key)
    }
}

/// Resolves secrets against an ordered chain of sources, caching hits.
pub struct SecretResolver {
    sources: Vec<Box<dyn SecretSource>>,
    cache: RwLock<HashMap<String, String>>,
}

impl SecretResolver {
    pub fn new(sources: Vec<Box<dyn SecretSource>>) -> Self {
        Self {
            sources,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The default chain for production use: environment variables only.
    /// Callers wire in a [`ManagedSecretSource`] ahead of this when a
    /// managed backend is configured.
    pub fn with_env_only() -> Self {
        Self::new(vec![Box::new(EnvSecretSource)])
    }

    /// Resolve `key`, trying each source in order, first hit wins.
    /// Returns `Ok(None)` if no source has it; returns `Err` only if a
    /// source actively failed (rather than simply not having the key).
    pub async fn resolve(&self, key: &str) -> Result<Option<String>> {
        if let Some(cached) = self.cache.read().unwrap().get(key) {
            return Ok(Some(cached.clone()));
        }
        for source in &self.sources {
            if let Some(value) = source.resolve(key).await? {
                self.cache
                    .write()
                    .unwrap()
                    .insert(key.to_string(), value.clone());
                tracing::debug!(secret = key, source = source.name(), "resolved secret");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Resolve `key`, treating absence from every source as a fatal
    /// startup error. Used for secrets the process cannot run without.
    pub async fn require(&self, key: &str) -> Result<String> {
        self.resolve(key).await?.ok_or_else(|| {
            SelError::FatalConfig(format!(
                "required secret {key} was not found in any configured source"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(&'static str, Option<&'static str>);

    #[async_trait]
    impl SecretSource for StaticSource {
        fn name(&self) -> &'static str {
            self.0
        }
        async fn resolve(&self, _key: &str) -> Result<Option<String>> {
            Ok(self.1.map(|v| v.to_string()))
        }
    }

    #[tokio::test]
    async fn first_source_with_a_hit_wins() {
        let resolver = SecretResolver::new(vec![
            Box::new(StaticSource("primary", None)),
            Box::new(StaticSource("fallback", Some("secret-value"))),
        ]);
        assert_eq!(
            resolver.resolve("ANY_KEY").await.unwrap(),
            Some("secret-value".to_string())
        );
    }

    #[tokio::test]
    async fn require_fails_fatally_when_absent_everywhere() {
        let resolver = SecretResolver::new(vec![Box::new(StaticSource("only", None))]);
        let err = resolver.require("MISSING_KEY").await.unwrap_err();
        assert!(matches!(err, SelError::FatalConfig(_)));
    }

    #[tokio::test]
    async fn resolved_value_is_cached() {
        let resolver = SecretResolver::new(vec![Box::new(StaticSource("only", Some("v1")))]);
        assert_eq!(resolver.resolve("K").await.unwrap(), Some("v1".to_string()));
        // cache returns the same value even if a later lookup would differ.
        assert_eq!(resolver.resolve("K").await.unwrap(), Some("v1".to_string()));
    }

    #[tokio::test]
    async fn env_source_finds_set_variable() {
        std::env::set_var("SELSCORE_TEST_SECRET_XYZ", "abc");
        let source = EnvSecretSource;
        assert_eq!(
            source.resolve("SELSCORE_TEST_SECRET_XYZ").await.unwrap(),
            Some("abc".to_string())
        );
        std::env::remove_var("SELSCORE_TEST_SECRET_XYZ");
    }
}

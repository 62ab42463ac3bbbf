//! Barcode Resolver Service
//!
//! Turns a raw scanned code into a product name:
//! 1. Normalize the code to digits and check its length
//! 2. Search the web for `"<code> thuốc"`
//! 3. Keep the first `max_results` records
//! 4. Run the ranking engine over them

use std::sync::Arc;

use medicate_common::barcode;
use thiserror::Error;
use tracing::{info, warn};

use crate::engine::{self, Resolution};
use crate::services::search_client::{SearchError, SearchProvider};

/// Resolver errors
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No code supplied
    #[error("Missing code")]
    MissingCode,

    /// Code is not 8-14 digits after normalization
    #[error("Invalid barcode format")]
    InvalidFormat(String),

    /// The search returned nothing
    #[error("No search result for this code")]
    NoSearchResults(String),

    /// Results came back but none yielded a usable name
    #[error("Cannot infer product name")]
    Unresolved(String),

    /// Search provider failure
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Successful resolution of one barcode
#[derive(Debug, Clone)]
pub struct BarcodeResolution {
    /// Digit-only code that was searched
    pub code: String,
    /// Search provider identifier
    pub provider: &'static str,
    pub resolution: Resolution,
}

/// Barcode Resolver
pub struct BarcodeResolver {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl BarcodeResolver {
    pub fn new(provider: Arc<dyn SearchProvider>, max_results: usize) -> Self {
        Self {
            provider,
            max_results,
        }
    }

    /// Search query sent for a normalized code ("thuốc" = medicine)
    pub fn search_query(code: &str) -> String {
        format!("{} thuốc", code)
    }

    /// Resolve a raw scanned code
    pub async fn resolve(&self, raw_code: &str) -> Result<BarcodeResolution, ResolveError> {
        let raw_code = raw_code.trim();
        if raw_code.is_empty() {
            return Err(ResolveError::MissingCode);
        }

        let code = barcode::normalize(raw_code);
        if !barcode::is_plausible(&code) {
            return Err(ResolveError::InvalidFormat(raw_code.to_string()));
        }

        let query = Self::search_query(&code);
        let mut candidates = self.provider.search(&query).await.map_err(|e| {
            warn!(code = %code, error = %e, "Search failed");
            e
        })?;
        candidates.truncate(self.max_results);

        if candidates.is_empty() {
            info!(code = %code, "No search results");
            return Err(ResolveError::NoSearchResults(code));
        }

        let Some(resolution) = engine::resolve(&candidates) else {
            info!(code = %code, results = candidates.len(), "No usable candidate name");
            return Err(ResolveError::Unresolved(code));
        };

        info!(
            code = %code,
            name = %resolution.name,
            confidence = resolution.confidence,
            "Barcode resolved"
        );

        Ok(BarcodeResolution {
            code,
            provider: self.provider.provider_id(),
            resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RawCandidate;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider returning fixed results and recording queries
    struct StubProvider {
        results: Vec<RawCandidate>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for StubProvider {
        fn provider_id(&self) -> &'static str {
            "stub"
        }

        async fn search(&self, query: &str) -> Result<Vec<RawCandidate>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.results.clone())
        }
    }

    fn stub(results: Vec<RawCandidate>) -> Arc<StubProvider> {
        Arc::new(StubProvider {
            results,
            queries: Mutex::new(Vec::new()),
        })
    }

    fn result(title: &str, link: &str) -> RawCandidate {
        RawCandidate {
            title: title.to_string(),
            link: link.to_string(),
            snippet: String::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_and_invalid_codes() {
        let resolver = BarcodeResolver::new(stub(vec![]), 10);
        assert!(matches!(
            resolver.resolve("  ").await,
            Err(ResolveError::MissingCode)
        ));
        assert!(matches!(
            resolver.resolve("12-34").await,
            Err(ResolveError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_query_uses_normalized_code() {
        let provider = stub(vec![result("Panadol Extra viên nén", "https://a.vn")]);
        let resolver = BarcodeResolver::new(provider.clone(), 10);

        let resolved = resolver.resolve(" 8936-046-123456 ").await.unwrap();
        assert_eq!(resolved.code, "8936046123456");
        assert_eq!(resolved.provider, "stub");
        assert_eq!(resolved.resolution.name, "Panadol Extra viên nén");
        assert_eq!(
            *provider.queries.lock().unwrap(),
            vec!["8936046123456 thuốc".to_string()]
        );
    }

    #[tokio::test]
    async fn test_no_results() {
        let resolver = BarcodeResolver::new(stub(vec![]), 10);
        assert!(matches!(
            resolver.resolve("8936046123456").await,
            Err(ResolveError::NoSearchResults(_))
        ));
    }

    #[tokio::test]
    async fn test_unusable_results() {
        let resolver = BarcodeResolver::new(stub(vec![result("", "https://a.vn")]), 10);
        assert!(matches!(
            resolver.resolve("8936046123456").await,
            Err(ResolveError::Unresolved(_))
        ));
    }

    #[tokio::test]
    async fn test_results_truncated_to_max() {
        let results = vec![
            result("Alpha viên nén", ""),
            result("Beta viên nén", ""),
            result("Gamma viên nén", ""),
        ];
        let resolver = BarcodeResolver::new(stub(results), 1);
        let resolved = resolver.resolve("8936046123456").await.unwrap();
        assert_eq!(resolved.resolution.candidates.len(), 1);
        assert_eq!(resolved.resolution.name, "Alpha viên nén");
    }
}

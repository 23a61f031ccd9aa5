//! Authentication providers enforcing the `security` requirements of the OpenAPI document.
//!
//! Two providers ship by default:
//! - [`BearerJwtProvider`] verifies a bearer token locally against a configured key.
//! - [`OAuth2Provider`] delegates to an RFC 7662 introspection endpoint.
//!
//! Both implement [`SecurityProvider`], the seam the request pipeline calls into once per
//! security requirement on the matched route. A route with more than one requirement in its
//! `security` array is satisfied if any one of them fully validates (OR of ANDs, per OpenAPI
//! semantics); a route with an empty requirement list and no scheme configured is unauthenticated.

use crate::router::HeaderVec;
use crate::router::ParamVec;
use crate::spec::SecurityScheme;
use serde_json::Value;

/// Cache statistics for JWT claims cache
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Number of cache hits (successful lookups)
    pub hits: u64,
    /// Number of cache misses (lookups that required decode)
    pub misses: u64,
    /// Number of entries evicted due to LRU capacity
    pub evictions: u64,
    /// Current number of entries in cache
    pub size: usize,
    /// Maximum capacity of cache
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate cache hit rate as a percentage
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Request context for security validation.
///
/// Contains extracted credentials from various sources (headers, query, cookies)
/// that security providers can use to validate the request.
///
/// # JSF Compliance
///
/// Uses SmallVec (HeaderVec/ParamVec) references to avoid copying request data.
pub struct SecurityRequest<'a> {
    /// HTTP headers from the request (SmallVec for stack allocation)
    pub headers: &'a HeaderVec,
    /// Query parameters from the request URL (SmallVec for stack allocation)
    pub query: &'a ParamVec,
    /// Cookies from the request (SmallVec for stack allocation)
    pub cookies: &'a HeaderVec,
}

impl<'a> SecurityRequest<'a> {
    /// Get a header by name (case-insensitive)
    #[inline]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name
    #[inline]
    pub fn get_query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a cookie by name
    #[inline]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Trait for implementing security validation providers.
///
/// Implement this trait to create custom authentication/authorization logic
/// for your OpenAPI security schemes.
pub trait SecurityProvider: Send + Sync {
    /// Validate a request against a security scheme.
    ///
    /// # Arguments
    ///
    /// * `scheme` - The OpenAPI security scheme definition
    /// * `scopes` - Required scopes for this operation (for OAuth2/OpenID)
    /// * `req` - The security request context with credentials
    ///
    /// # Returns
    ///
    /// `true` if the request is authenticated and authorized, `false` otherwise
    fn validate(&self, scheme: &SecurityScheme, scopes: &[String], req: &SecurityRequest) -> bool;

    /// Extract claims from a validated request (optional).
    ///
    /// This method is called after `validate()` returns `true` to extract any
    /// claims or user information from the validated credentials. For JWT-based
    /// providers, this returns the decoded JWT claims. For other providers, this
    /// may return `None` or provider-specific information.
    ///
    /// # Arguments
    ///
    /// * `scheme` - The OpenAPI security scheme definition
    /// * `req` - The security request context with credentials
    ///
    /// # Returns
    ///
    /// * `Some(Value)` - The extracted claims/information as JSON
    /// * `None` - No claims available or provider doesn't support claims extraction
    ///
    /// # Default Implementation
    ///
    /// Returns `None` by default. Providers that support claims extraction should
    /// override this method.
    fn extract_claims(&self, scheme: &SecurityScheme, req: &SecurityRequest) -> Option<Value> {
        let _ = (scheme, req);
        None
    }
}

pub use bearer_jwt::BearerJwtProvider;
pub use oauth2::OAuth2Provider;

mod bearer_jwt;
mod oauth2;

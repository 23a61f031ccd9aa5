//! Error kinds surfaced by the enforcement pipeline.
//!
//! Every fallible pipeline step returns `Result<_, FirewallError>` and propagates with `?`.
//! The mode machine ([`crate::mode`]) is the only place that turns a `FirewallError` into a
//! wire response; nothing here should leak a raw error message to the client.

use thiserror::Error;

/// Errors produced while enforcing the contract on a single request.
#[derive(Debug, Error)]
pub enum FirewallError {
    /// Request failed parameter coercion or body schema validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream response failed schema validation.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Request path/method does not resolve to any documented operation.
    #[error("shadow endpoint: {method} {path}")]
    ShadowEndpoint { method: String, path: String },

    /// Missing/invalid bearer, introspection inactive, JWT verification failed, or
    /// insufficient scope.
    #[error("authentication failed: {0}")]
    AuthFail(String),

    /// Token present on the denylist.
    #[error("token denied")]
    Denied,

    /// Upstream client could not be acquired, or upstream I/O failed.
    #[error("upstream failure: {0}")]
    UpstreamFail(String),

    /// Introspection endpoint unreachable, returned non-2xx, or returned unparseable JSON.
    #[error("introspection failure: {0}")]
    IntrospectionFail(String),

    /// Configuration, spec, or denylist could not be loaded at startup.
    #[error("startup failure: {0}")]
    Startup(#[from] anyhow::Error),

    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FirewallError {
    /// The error kind name, used only for structured logging (never sent to the client).
    pub fn kind(&self) -> &'static str {
        match self {
            FirewallError::InvalidRequest(_) => "INVALID_REQUEST",
            FirewallError::InvalidResponse(_) => "INVALID_RESPONSE",
            FirewallError::ShadowEndpoint { .. } => "SHADOW_ENDPOINT",
            FirewallError::AuthFail(_) => "AUTH_FAIL",
            FirewallError::Denied => "DENIED",
            FirewallError::UpstreamFail(_) => "UPSTREAM_FAIL",
            FirewallError::IntrospectionFail(_) => "INTROSPECTION_FAIL",
            FirewallError::Startup(_) => "STARTUP",
            FirewallError::Io(_) => "IO",
        }
    }
}

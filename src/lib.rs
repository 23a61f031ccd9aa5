//! # API Firewall
//!
//! An in-line reverse proxy that enforces OpenAPI 3 contract conformance between clients and
//! an upstream service, on top of the `may` coroutine runtime and `may_minihttp`.
//!
//! ## Pipeline
//!
//! Every request passes through a fixed sequence of checks before it is forwarded upstream,
//! and the upstream's response is checked again before it reaches the client:
//!
//! 1. **Routing** ([`router`]) — resolve the request's method/path against the OpenAPI
//!    document. No match means the request targets an undocumented ("shadow") endpoint.
//! 2. **Denylist** ([`denylist`]) — reject immediately if the bearer token appears in the
//!    revoked-token set, regardless of mode.
//! 3. **Authentication** ([`security`]) — evaluate the route's `security` requirements via
//!    [`security::OAuth2Provider`] (RFC 7662 introspection) or [`security::BearerJwtProvider`]
//!    (local JWT verification).
//! 4. **Request validation** ([`validator`], [`validator_cache`]) — validate parameters and
//!    body against the operation's schema.
//! 5. **Forward** ([`pool`]) — forward the request to the upstream via a pooled HTTP client.
//! 6. **Response validation** — validate the upstream's response body against the operation's
//!    declared response schema.
//!
//! Each of steps 1, 4, and 6 is gated by a [`config::Mode`] (`BLOCK`/`LOG_ONLY`/`DISABLE`);
//! [`mode::resolve`] is the pure function that turns a check's verdict into an action.

pub mod config;
pub mod denylist;
pub mod error;
pub mod ids;
pub mod mode;
pub mod pool;
pub mod router;
pub mod security;
pub mod server;
pub mod spec;
pub mod validator;
pub mod validator_cache;

pub use error::FirewallError;
pub use security::{BearerJwtProvider, OAuth2Provider, SecurityProvider, SecurityRequest};
pub use spec::{
    load_spec, load_spec_from_spec, load_spec_full, ParameterLocation, ParameterMeta,
    ParameterStyle, RouteMeta, SecurityRequirement, SecurityScheme,
};

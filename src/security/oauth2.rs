use crate::config::IntrospectionConfig;
use crate::security::{SecurityProvider, SecurityRequest};
use crate::spec::SecurityScheme;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

struct CachedIntrospection {
    active: bool,
    claims: Value,
    expires_at: Instant,
}

/// OAuth2 provider backed by RFC 7662 token introspection.
///
/// Each distinct bearer token is introspected at most once per cache window: the result is
/// cached until `min(exp, now + refresh_interval)`, and concurrent requests racing on the
/// same cold token coalesce onto a single outbound HTTP call via a per-token lock.
pub struct OAuth2Provider {
    client: reqwest::blocking::Client,
    config: IntrospectionConfig,
    cache: DashMap<String, CachedIntrospection>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl OAuth2Provider {
    pub fn from_config(config: IntrospectionConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            config,
            cache: DashMap::new(),
            locks: DashMap::new(),
        })
    }

    fn extract_token<'a>(&self, req: &'a SecurityRequest) -> Option<&'a str> {
        req.get_header("authorization")
            .and_then(|h| h.strip_prefix("Bearer "))
    }

    fn token_lock(&self, token: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(token.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn cached(&self, token: &str) -> Option<Value> {
        let entry = self.cache.get(token)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        if entry.active {
            Some(entry.claims.clone())
        } else {
            None
        }
    }

    fn introspect(&self, token: &str) -> Option<Value> {
        if let Some(claims) = self.cached(token) {
            return Some(claims);
        }
        let lock = self.token_lock(token);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(claims) = self.cached(token) {
            return Some(claims);
        }

        let mut form = self.config.endpoint_params.clone();
        form.insert(self.config.token_param_name.clone(), token.to_string());

        let mut req = self
            .client
            .request(
                self.config
                    .endpoint_method
                    .parse()
                    .unwrap_or(reqwest::Method::POST),
                &self.config.endpoint,
            )
            .form(&form);
        if let Some(bearer) = &self.config.client_auth_bearer_token {
            req = req.bearer_auth(bearer);
        }

        let resp = match req.send() {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "introspection request failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "introspection endpoint returned non-2xx");
            return None;
        }
        let body: Value = match resp.json() {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "introspection response was not valid JSON");
                return None;
            }
        };
        let active = body.get("active").and_then(|v| v.as_bool()).unwrap_or(false);
        let exp_secs = body.get("exp").and_then(|v| v.as_i64());
        let refresh = Duration::from_secs(self.config.refresh_interval_secs.max(1));
        let ttl = match exp_secs {
            Some(exp) => {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs() as i64)
                    .unwrap_or(0);
                let remaining = (exp - now).max(0) as u64;
                Duration::from_secs(remaining).min(refresh)
            }
            None => refresh,
        };
        self.cache.insert(
            token.to_string(),
            CachedIntrospection {
                active,
                claims: body.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        if active {
            Some(body)
        } else {
            debug!("introspection returned active=false");
            None
        }
    }

    fn check_scopes(claims: &Value, scopes: &[String]) -> bool {
        if scopes.is_empty() {
            return true;
        }
        let token_scopes = claims.get("scope").and_then(|v| v.as_str()).unwrap_or("");
        scopes
            .iter()
            .all(|s| token_scopes.split_whitespace().any(|ts| ts == s))
    }
}

impl SecurityProvider for OAuth2Provider {
    fn validate(&self, scheme: &SecurityScheme, scopes: &[String], req: &SecurityRequest) -> bool {
        match scheme {
            SecurityScheme::OAuth2 { .. } => {}
            _ => return false,
        }
        let token = match self.extract_token(req) {
            Some(t) => t,
            None => return false,
        };
        match self.introspect(token) {
            Some(claims) => Self::check_scopes(&claims, scopes),
            None => false,
        }
    }

    fn extract_claims(&self, _scheme: &SecurityScheme, req: &SecurityRequest) -> Option<Value> {
        let token = self.extract_token(req)?;
        self.introspect(token)
    }
}

//! The enforcement pipeline: the single entry point every inbound connection is dispatched to.
//!
//! Request lifecycle: parse -> denylist -> authenticate -> validate request -> forward
//! upstream -> validate response -> write response. Steps gated by a
//! [`Mode`](crate::config::Mode) call into [`mode::resolve`] to turn a verdict into an action.

use crate::config::{Config, Mode, ValidationType};
use crate::denylist::Denylist;
use crate::ids::RequestId;
use crate::mode::{resolve, resolve_shadow, Action, Verdict};
use crate::pool::{LeasedClient, SharedClientPool};
use crate::router::{HeaderVec, Router};
use crate::security::{BearerJwtProvider, OAuth2Provider, SecurityProvider, SecurityRequest};
use crate::server::request::parse_request;
use crate::server::response::{write_handler_response, write_raw_response};
use crate::spec::{RouteMeta, SecurityRequirement, SecurityScheme};
use crate::validator_cache::ValidatorCache;
use may_minihttp::{HttpService, Request, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Body for the built-in `/health` endpoint.
pub fn health_endpoint() -> Value {
    json!({"status": "ok"})
}

fn build_security_providers(config: &Config) -> anyhow::Result<Vec<Box<dyn SecurityProvider>>> {
    let mut providers: Vec<Box<dyn SecurityProvider>> = Vec::new();
    match config.server.oauth.validation_type {
        ValidationType::Jwt => {
            providers.push(Box::new(BearerJwtProvider::from_config(
                &config.server.oauth.jwt,
            )?));
        }
        ValidationType::Introspection => {
            providers.push(Box::new(OAuth2Provider::from_config(
                config.server.oauth.introspection.clone(),
            )?));
        }
        ValidationType::None => {}
    }
    Ok(providers)
}

/// The firewall's request handler: router, denylist, security providers, and upstream pool,
/// wired together per the active [`Config`].
#[derive(Clone)]
pub struct AppService {
    router: Arc<RwLock<Router>>,
    config: Arc<Config>,
    denylist: Arc<Denylist>,
    pool: SharedClientPool,
    validator_cache: ValidatorCache,
    security_schemes: Arc<HashMap<String, SecurityScheme>>,
    security_providers: Arc<Vec<Box<dyn SecurityProvider>>>,
}

impl AppService {
    pub fn new(
        router: Router,
        config: Config,
        denylist: Denylist,
        pool: SharedClientPool,
        validator_cache: ValidatorCache,
        security_schemes: HashMap<String, SecurityScheme>,
    ) -> anyhow::Result<Self> {
        let security_providers = build_security_providers(&config)?;
        Ok(Self {
            router: Arc::new(RwLock::new(router)),
            config: Arc::new(config),
            denylist: Arc::new(denylist),
            pool,
            validator_cache,
            security_schemes: Arc::new(security_schemes),
            security_providers: Arc::new(security_providers),
        })
    }

    pub fn validator_cache(&self) -> &ValidatorCache {
        &self.validator_cache
    }

    fn block(&self, res: &mut Response, status: u16, req_id: RequestId, reason: &str) {
        let headers = self.response_headers(req_id, None);
        let body = json!({"error": reason, "request_id": req_id.to_string()});
        write_handler_response(res, status, body, &headers);
    }

    fn response_headers(&self, req_id: RequestId, validation_failed: Option<bool>) -> HeaderVec {
        let mut headers = HeaderVec::new();
        headers.push(("X-Request-Id".to_string(), req_id.to_string()));
        if self.config.add_validation_status_header {
            if let Some(failed) = validation_failed {
                let value = if failed { "failed" } else { "passed" };
                headers.push(("X-Validation-Status".to_string(), value.to_string()));
            }
        }
        headers
    }

    /// Evaluate the route's `security` array: an OR of ANDs, per OpenAPI semantics. An empty
    /// requirement list means the route is unauthenticated.
    fn evaluate_security(
        &self,
        requirements: &[SecurityRequirement],
        sec_req: &SecurityRequest,
    ) -> Result<(), &'static str> {
        if requirements.is_empty() {
            return Ok(());
        }
        let mut saw_insufficient_scope = false;
        'requirement: for requirement in requirements {
            if requirement.0.is_empty() {
                return Ok(());
            }
            for (scheme_name, scopes) in &requirement.0 {
                let Some(scheme) = self.security_schemes.get(scheme_name) else {
                    continue 'requirement;
                };
                let mut satisfied = false;
                for provider in self.security_providers.iter() {
                    if provider.validate(scheme, scopes, sec_req) {
                        satisfied = true;
                        break;
                    }
                    if !scopes.is_empty() && provider.validate(scheme, &[], sec_req) {
                        saw_insufficient_scope = true;
                    }
                }
                if !satisfied {
                    continue 'requirement;
                }
            }
            return Ok(());
        }
        if saw_insufficient_scope {
            Err("insufficient scope")
        } else {
            Err("missing or invalid credentials")
        }
    }

    /// Validate the parsed request body against the route's declared request schema.
    fn validate_request(&self, route: &RouteMeta, body: Option<&Value>) -> Result<(), String> {
        if route.request_body_required && body.is_none() {
            return Err("request body is required".to_string());
        }
        let (Some(schema), Some(body_val)) = (&route.request_schema, body) else {
            return Ok(());
        };
        let Some(compiled) = self
            .validator_cache
            .get_or_compile(&route.operation_id, "request", None, schema)
        else {
            return Ok(());
        };
        let errors: Vec<String> = compiled
            .iter_errors(body_val)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }

    fn response_schema_for(route: &RouteMeta, status: u16) -> Option<&Value> {
        route
            .responses
            .get(&status)
            .and_then(|media| {
                media
                    .get("application/json")
                    .or_else(|| media.values().next())
            })
            .and_then(|spec| spec.schema.as_ref())
            .or(route.response_schema.as_ref())
    }

    fn validate_response(&self, route: &RouteMeta, status: u16, body: &Value) -> Result<(), String> {
        let Some(schema) = Self::response_schema_for(route, status) else {
            return Ok(());
        };
        let Some(compiled) =
            self.validator_cache
                .get_or_compile(&route.operation_id, "response", Some(status), schema)
        else {
            return Ok(());
        };
        let errors: Vec<String> = compiled.iter_errors(body).map(|e| e.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }

    fn forward_upstream(
        &self,
        method: http::Method,
        path: &str,
        query_params: &crate::router::ParamVec,
        headers: &HeaderVec,
        raw_body: &[u8],
    ) -> anyhow::Result<(u16, Vec<u8>)> {
        let leased = LeasedClient::acquire(&self.pool)?;
        let mut url = format!("{}{}", self.config.server.url.trim_end_matches('/'), path);
        if !query_params.is_empty() {
            let qs = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query_params.iter().map(|(k, v)| (k.as_ref(), v.as_str())))
                .finish();
            url.push('?');
            url.push_str(&qs);
        }
        let mut builder = leased.client().request(method, &url);
        for (k, v) in headers {
            if matches!(
                k.to_ascii_lowercase().as_str(),
                "host" | "connection" | "content-length"
            ) {
                continue;
            }
            builder = builder.header(k.as_str(), v.as_str());
        }
        if !raw_body.is_empty() {
            builder = builder.body(raw_body.to_vec());
        }
        let upstream = builder.send()?;
        let status = upstream.status().as_u16();
        let body = upstream.bytes()?.to_vec();
        Ok((status, body))
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let start = Instant::now();
        let inbound_req_id = req
            .headers()
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case("x-request-id"))
            .map(|h| String::from_utf8_lossy(h.value).to_string());
        let req_id = RequestId::from_header_or_new(inbound_req_id.as_deref());

        let parsed = match parse_request(req) {
            Ok(p) => p,
            Err(invalid_method) => {
                warn!(method = %invalid_method, "rejected request with invalid HTTP method");
                self.block(res, 400, req_id, "invalid HTTP method");
                return Ok(());
            }
        };

        if parsed.path == "/health" {
            let headers = self.response_headers(req_id, None);
            write_handler_response(res, 200, health_endpoint(), &headers);
            return Ok(());
        }

        let route_match = self
            .router
            .read()
            .expect("router lock poisoned")
            .route(parsed.method.clone(), &parsed.path);

        let Some(mut route_match) = route_match else {
            let action = resolve_shadow(
                Verdict::Fail,
                self.config.request_validation,
                self.config.shadow_api.log_in_disable_mode,
            );
            match action {
                Action::Block => {
                    self.block(
                        res,
                        self.config.custom_block_status_code,
                        req_id,
                        "undocumented endpoint",
                    );
                    return Ok(());
                }
                Action::AllowAndLog => {
                    warn!(method = %parsed.method, path = %parsed.path, "shadow endpoint forwarded upstream");
                }
                Action::Allow => {}
            }
            match self.forward_upstream(
                parsed.method.clone(),
                &parsed.path,
                &parsed.query_params,
                &parsed.headers,
                &parsed.raw_body,
            ) {
                Ok((status, body)) => {
                    if action == Action::AllowAndLog
                        && !self.config.shadow_api.exclude_list.contains(&status)
                    {
                        info!(status, "shadow endpoint upstream response");
                    }
                    let headers = self.response_headers(req_id, None);
                    write_raw_response(res, status, &body, &headers);
                }
                Err(e) => {
                    warn!(error = %e, "upstream forward failed for shadow endpoint");
                    self.block(res, 502, req_id, "upstream unavailable");
                }
            }
            return Ok(());
        };
        route_match.query_params = parsed.query_params.clone();

        let cookie_token = parsed.get_cookie(self.denylist.cookie_name());
        let header_token = parsed.get_header(self.denylist.header_name());
        if self.denylist.is_denied(cookie_token, header_token) {
            warn!(operation_id = %route_match.operation_id, "denylisted token rejected");
            self.block(res, self.config.custom_block_status_code, req_id, "token denied");
            return Ok(());
        }

        let sec_req = SecurityRequest {
            headers: &parsed.headers,
            query: &parsed.query_params,
            cookies: &parsed.cookies,
        };
        if let Err(reason) = self.evaluate_security(&route_match.route.security, &sec_req) {
            let status = if reason == "insufficient scope" { 403 } else { 401 };
            warn!(operation_id = %route_match.operation_id, reason, "authentication failed");
            self.block(res, status, req_id, reason);
            return Ok(());
        }

        let mut validation_failed = false;
        if let Err(reason) = self.validate_request(&route_match.route, parsed.body.as_ref()) {
            match resolve(Verdict::Fail, self.config.request_validation) {
                Action::Block => {
                    warn!(operation_id = %route_match.operation_id, reason, "request validation failed, blocking");
                    self.block(
                        res,
                        self.config.custom_block_status_code,
                        req_id,
                        "request failed contract validation",
                    );
                    return Ok(());
                }
                Action::AllowAndLog => {
                    warn!(operation_id = %route_match.operation_id, reason, "request validation failed, logging only");
                    validation_failed = true;
                }
                Action::Allow => {}
            }
        }

        let (status, body_bytes) = match self.forward_upstream(
            parsed.method.clone(),
            &parsed.path,
            &route_match.query_params,
            &parsed.headers,
            &parsed.raw_body,
        ) {
            Ok(r) => r,
            Err(e) => {
                warn!(operation_id = %route_match.operation_id, error = %e, "upstream forward failed");
                self.block(res, 502, req_id, "upstream unavailable");
                return Ok(());
            }
        };

        let body_val: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
        if !body_val.is_null() {
            if let Err(reason) = self.validate_response(&route_match.route, status, &body_val) {
                match resolve(Verdict::Fail, self.config.response_validation) {
                    Action::Block => {
                        warn!(operation_id = %route_match.operation_id, reason, "response validation failed, blocking");
                        self.block(res, 500, req_id, "upstream response violates contract");
                        return Ok(());
                    }
                    Action::AllowAndLog => {
                        warn!(operation_id = %route_match.operation_id, reason, "response validation failed, logging only");
                        validation_failed = true;
                    }
                    Action::Allow => {}
                }
            }
        }

        let status_known = self.config.request_validation != Mode::Disable
            || self.config.response_validation != Mode::Disable;
        let headers = self.response_headers(req_id, status_known.then_some(validation_failed));
        debug!(
            operation_id = %route_match.operation_id,
            status,
            duration_ms = start.elapsed().as_millis() as u64,
            "request forwarded"
        );
        write_raw_response(res, status, &body_bytes, &headers);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_schema_for_prefers_status_entry_over_flattened_schema() {
        use crate::spec::ResponseSpec;
        use std::collections::HashMap as Map;

        let mut media = Map::new();
        media.insert(
            "application/json".to_string(),
            ResponseSpec {
                schema: Some(json!({"type": "object"})),
            },
        );
        let mut responses = Map::new();
        responses.insert(200u16, media);

        let route = RouteMeta {
            method: http::Method::GET,
            path_pattern: "/widgets".to_string(),
            operation_id: "list_widgets".to_string(),
            parameters: Vec::new(),
            request_schema: None,
            request_body_required: false,
            response_schema: Some(json!({"type": "array"})),
            responses,
            security: Vec::new(),
            base_path: String::new(),
        };

        let schema = AppService::response_schema_for(&route, 200);
        assert_eq!(schema, Some(&json!({"type": "object"})));

        let fallback = AppService::response_schema_for(&route, 404);
        assert_eq!(fallback, Some(&json!({"type": "array"})));
    }
}

use crate::config::JwtConfig;
use crate::security::{SecurityProvider, SecurityRequest};
use crate::spec::SecurityScheme;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::{debug, warn};

/// Bearer token provider that verifies a JWT's signature locally.
///
/// Supports HMAC (`HS256`/`HS384`/`HS512`) with a raw shared secret, and
/// RSA/EC/PSS (`RS*`/`ES*`/`PS*`) with a PEM-encoded public key or certificate.
/// On success the decoded claims are made available via [`SecurityProvider::extract_claims`]
/// and any required OAuth2 scopes are checked against the token's `scope` claim.
pub struct BearerJwtProvider {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    cookie_name: Option<String>,
}

impl BearerJwtProvider {
    /// Build a provider from the `Server.Oauth.JWT` configuration block.
    pub fn from_config(cfg: &JwtConfig) -> anyhow::Result<Self> {
        let algorithm = parse_algorithm(&cfg.signature_algorithm)?;
        let decoding_key = match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                let secret = cfg
                    .secret_key
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("HMAC algorithm requires secret_key"))?;
                DecodingKey::from_secret(secret.as_bytes())
            }
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                DecodingKey::from_rsa_pem(&read_pem(cfg)?)?
            }
            Algorithm::ES256 | Algorithm::ES384 => {
                DecodingKey::from_ec_pem(&read_pem(cfg)?)?
            }
            Algorithm::PS256 | Algorithm::PS384 | Algorithm::PS512 => {
                DecodingKey::from_rsa_pem(&read_pem(cfg)?)?
            }
            other => anyhow::bail!("unsupported JWT algorithm: {other:?}"),
        };
        Ok(Self {
            algorithm,
            decoding_key,
            cookie_name: None,
        })
    }

    /// Configure the cookie name used to read the token when no `Authorization` header is present.
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    fn extract_token<'a>(&self, req: &'a SecurityRequest) -> Option<&'a str> {
        if let Some(name) = &self.cookie_name {
            if let Some(t) = req.get_cookie(name) {
                return Some(t);
            }
        }
        req.get_header("authorization")
            .and_then(|h| h.strip_prefix("Bearer "))
    }

    fn decode(&self, token: &str) -> Option<Value> {
        let validation = Validation::new(self.algorithm);
        match jsonwebtoken::decode::<Value>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(error = %e, "JWT verification failed");
                None
            }
        }
    }

    fn check_scopes(claims: &Value, scopes: &[String]) -> bool {
        if scopes.is_empty() {
            return true;
        }
        let token_scopes = claims.get("scope").and_then(|v| v.as_str()).unwrap_or("");
        let has_all = scopes
            .iter()
            .all(|s| token_scopes.split_whitespace().any(|ts| ts == s));
        if !has_all {
            warn!(required = ?scopes, token_scopes, "JWT missing required scopes");
        }
        has_all
    }
}

fn parse_algorithm(name: &str) -> anyhow::Result<Algorithm> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        "RS256" => Ok(Algorithm::RS256),
        "RS384" => Ok(Algorithm::RS384),
        "RS512" => Ok(Algorithm::RS512),
        "ES256" => Ok(Algorithm::ES256),
        "ES384" => Ok(Algorithm::ES384),
        "PS256" => Ok(Algorithm::PS256),
        "PS384" => Ok(Algorithm::PS384),
        "PS512" => Ok(Algorithm::PS512),
        other => anyhow::bail!("unknown JWT signature_algorithm: {other}"),
    }
}

fn read_pem(cfg: &JwtConfig) -> anyhow::Result<Vec<u8>> {
    let path = cfg
        .pub_cert_file
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("algorithm requires pub_cert_file"))?;
    Ok(std::fs::read(path)?)
}

impl SecurityProvider for BearerJwtProvider {
    fn validate(&self, scheme: &SecurityScheme, scopes: &[String], req: &SecurityRequest) -> bool {
        match scheme {
            SecurityScheme::Http { scheme, .. } if scheme.eq_ignore_ascii_case("bearer") => {}
            SecurityScheme::OAuth2 { .. } => {}
            _ => {
                debug!("bearer JWT validation failed: unsupported security scheme");
                return false;
            }
        }
        let token = match self.extract_token(req) {
            Some(t) => t,
            None => {
                debug!("bearer JWT validation failed: no token present");
                return false;
            }
        };
        let claims = match self.decode(token) {
            Some(c) => c,
            None => return false,
        };
        Self::check_scopes(&claims, scopes)
    }

    fn extract_claims(&self, _scheme: &SecurityScheme, req: &SecurityRequest) -> Option<Value> {
        let token = self.extract_token(req)?;
        self.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::HeaderVec;
    use smallvec::smallvec;

    fn provider(secret: &str) -> BearerJwtProvider {
        BearerJwtProvider::from_config(&JwtConfig {
            signature_algorithm: "HS256".to_string(),
            secret_key: Some(secret.to_string()),
            pub_cert_file: None,
        })
        .expect("valid HMAC config")
    }

    fn sign(secret: &str, claims: &Value) -> String {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode")
    }

    #[test]
    fn accepts_valid_signature_and_scopes() {
        let provider = provider("topsecret");
        let token = sign("topsecret", &serde_json::json!({"sub": "u1", "scope": "read write"}));
        let headers: HeaderVec = smallvec![("authorization".to_string(), format!("Bearer {token}"))];
        let empty = HeaderVec::new();
        let query = crate::router::ParamVec::new();
        let req = SecurityRequest {
            headers: &headers,
            query: &query,
            cookies: &empty,
        };
        let scheme = SecurityScheme::Http {
            scheme: "bearer".to_string(),
            bearer_format: None,
            description: None,
        };
        assert!(provider.validate(&scheme, &["read".to_string()], &req));
    }

    #[test]
    fn rejects_wrong_signature() {
        let provider = provider("topsecret");
        let token = sign("wrongsecret", &serde_json::json!({"sub": "u1"}));
        let headers: HeaderVec = smallvec![("authorization".to_string(), format!("Bearer {token}"))];
        let empty = HeaderVec::new();
        let query = crate::router::ParamVec::new();
        let req = SecurityRequest {
            headers: &headers,
            query: &query,
            cookies: &empty,
        };
        let scheme = SecurityScheme::Http {
            scheme: "bearer".to_string(),
            bearer_format: None,
            description: None,
        };
        assert!(!provider.validate(&scheme, &[], &req));
    }

    #[test]
    fn rejects_missing_scope() {
        let provider = provider("topsecret");
        let token = sign("topsecret", &serde_json::json!({"sub": "u1", "scope": "read"}));
        let headers: HeaderVec = smallvec![("authorization".to_string(), format!("Bearer {token}"))];
        let empty = HeaderVec::new();
        let query = crate::router::ParamVec::new();
        let req = SecurityRequest {
            headers: &headers,
            query: &query,
            cookies: &empty,
        };
        let scheme = SecurityScheme::Http {
            scheme: "bearer".to_string(),
            bearer_format: None,
            description: None,
        };
        assert!(!provider.validate(&scheme, &["write".to_string()], &req));
    }
}

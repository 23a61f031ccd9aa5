//! Revoked-token denylist.
//!
//! Loaded once at startup from a newline-delimited file; membership is a plain
//! `HashSet` lookup, checked against both the cookie and header token sources.
//! A match on either is a hard block regardless of the configured mode.

use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Set of denied tokens, checked by both cookie and header name.
pub struct Denylist {
    tokens: HashSet<String>,
    cookie_name: String,
    header_name: String,
}

impl Denylist {
    /// Load from a newline-delimited file. Blank lines and lines starting with `#` are skipped.
    /// Lines are trimmed before insertion.
    pub fn load(path: &Path, cookie_name: String, header_name: String) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading denylist {}: {e}", path.display()))?;
        let mut tokens = HashSet::new();
        let mut malformed = 0u64;
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.chars().any(char::is_whitespace) {
                malformed += 1;
                continue;
            }
            tokens.insert(trimmed.to_string());
        }
        if malformed > 0 {
            warn!(malformed, "skipped malformed denylist lines");
        }
        Ok(Self {
            tokens,
            cookie_name,
            header_name,
        })
    }

    /// Empty denylist — used when no denylist file is configured.
    pub fn empty(cookie_name: String, header_name: String) -> Self {
        Self {
            tokens: HashSet::new(),
            cookie_name,
            header_name,
        }
    }

    /// Returns true if either the cookie or header token value is present on the denylist.
    pub fn is_denied(&self, cookie_token: Option<&str>, header_token: Option<&str>) -> bool {
        if let Some(t) = cookie_token {
            if self.tokens.contains(t) {
                return true;
            }
        }
        if let Some(t) = header_token {
            if self.tokens.contains(t) {
                return true;
            }
        }
        false
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

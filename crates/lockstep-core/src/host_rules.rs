//! Credential lookup for registry hosts

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Host type under which package registries look up their credentials.
pub const REGISTRY_HOST_TYPE: &str = "nuget";

/// Matches the host part of an absolute URL.
static URL_HOST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://(?:[^@/?#]*@)?(\[[^\]]+\]|[^:/?#]+)").unwrap()
});

/// Username and password for a registry.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Resolves credentials for a host.
pub trait CredentialLookup: Send + Sync {
    /// Credentials for `url`, or `None` unless both username and password
    /// are known.
    fn find_credentials(&self, host_type: &str, url: &str) -> Option<Credentials>;
}

/// One credential rule from the settings file.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostRule {
    /// Restrict the rule to one host type
    pub host_type: Option<String>,

    /// Host name, parent domain, or URL prefix the rule applies to
    pub match_host: Option<String>,

    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for HostRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRule")
            .field("host_type", &self.host_type)
            .field("match_host", &self.match_host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl HostRule {
    fn matches(&self, host_type: &str, url: &str) -> bool {
        if self.host_type.as_deref().is_some_and(|t| t != host_type) {
            return false;
        }
        let Some(pattern) = self.match_host.as_deref() else {
            return true;
        };

        if pattern.contains("://") {
            return url.starts_with(pattern);
        }
        let Some(host) = url_host(url) else {
            return false;
        };
        let pattern = pattern.trim_start_matches('.').to_ascii_lowercase();
        host == pattern || host.ends_with(&format!(".{pattern}"))
    }
}

/// Lower-cased host of an absolute URL.
fn url_host(url: &str) -> Option<String> {
    URL_HOST_PATTERN
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// [`CredentialLookup`] over an ordered list of [`HostRule`]s.
///
/// Every matching rule is applied in order, later rules overriding the
/// fields they set.
#[derive(Debug, Clone, Default)]
pub struct HostRules {
    rules: Vec<HostRule>,
}

impl HostRules {
    pub fn new(rules: Vec<HostRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl CredentialLookup for HostRules {
    fn find_credentials(&self, host_type: &str, url: &str) -> Option<Credentials> {
        let mut username = None;
        let mut password = None;

        for rule in self.rules.iter().filter(|r| r.matches(host_type, url)) {
            if rule.username.is_some() {
                username = rule.username.clone();
            }
            if rule.password.is_some() {
                password = rule.password.clone();
            }
        }

        Some(Credentials {
            username: username?,
            password: password?,
        })
    }
}

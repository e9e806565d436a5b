//! Authentication contexts and destination match rules
//!
//! An authentication context is an ordered rule list mapping outbound
//! destinations to named SSL contexts. The first matching rule wins; a
//! rule with no predicates matches every destination.

use serde::{Deserialize, Serialize};

/// Target of an outbound connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Target host name
    pub host: String,

    /// Target port
    pub port: u16,
}

impl Destination {
    /// Create a destination
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// One destination match rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    /// Host predicate; hostnames compare ASCII case-insensitive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_host: Option<String>,

    /// Port predicate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_port: Option<u16>,

    /// SSL context selected when the rule matches
    pub ssl_context: String,
}

impl MatchRule {
    /// Catch-all rule selecting the named SSL context
    pub fn for_ssl_context(ssl_context: impl Into<String>) -> Self {
        Self {
            match_host: None,
            match_port: None,
            ssl_context: ssl_context.into(),
        }
    }

    /// Restrict the rule to a host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.match_host = Some(host.into());
        self
    }

    /// Restrict the rule to a port
    pub fn with_port(mut self, port: u16) -> Self {
        self.match_port = Some(port);
        self
    }

    /// True when every configured predicate matches the destination
    pub fn matches(&self, destination: &Destination) -> bool {
        if let Some(host) = &self.match_host {
            if !host.eq_ignore_ascii_case(&destination.host) {
                return false;
            }
        }
        if let Some(port) = self.match_port {
            if port != destination.port {
                return false;
            }
        }
        true
    }
}

/// Ordered destination rules resolving to SSL context names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationContext {
    rules: Vec<MatchRule>,
}

impl AuthenticationContext {
    /// Create a context with no rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule, builder style
    pub fn with_rule(mut self, rule: MatchRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The configured rules in evaluation order
    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    /// Name of the SSL context selected for the destination
    ///
    /// Rules are evaluated in order; the first match wins. `None` when no
    /// rule matches.
    pub fn select(&self, destination: &Destination) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(destination))
            .map(|rule| rule.ssl_context.as_str())
    }
}

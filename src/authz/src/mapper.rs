//! Regex-based role mapping
//!
//! A [`RegexRoleMapper`] rewrites a role set through one compiled
//! pattern/replacement rule. Mappers are validated and compiled once at
//! configuration time and immutable thereafter; a configuration update
//! replaces the mapper wholesale.

use crate::error::Result;
use crate::roles::{Role, RoleSet};
use palisade_config::{ConstraintViolation, ValidationError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for a regex role mapper resource
///
/// `pattern` must compile as a regular expression and `replacement` must be
/// at least one character long; both constraints are checked when the
/// mapper is built, and every violation is reported in one aggregate
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexRoleMapperConfig {
    /// Pattern matched against each input role, unanchored unless the
    /// pattern anchors itself
    pub pattern: String,

    /// Replacement template; `$1`, `$2`, ... expand to capture groups, and
    /// groups absent from a match expand to the empty string
    pub replacement: String,

    /// Pass non-matching roles through unchanged instead of dropping them
    #[serde(default)]
    pub keep_non_mapped: bool,

    /// Substitute every non-overlapping match instead of only the first
    #[serde(default)]
    pub replace_all: bool,
}

impl RegexRoleMapperConfig {
    /// Create a configuration with the default flags (drop non-mapped,
    /// replace first match only)
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            keep_non_mapped: false,
            replace_all: false,
        }
    }

    /// Keep roles the pattern does not match
    pub fn with_keep_non_mapped(mut self, keep: bool) -> Self {
        self.keep_non_mapped = keep;
        self
    }

    /// Replace every occurrence of the pattern within a role
    pub fn with_replace_all(mut self, all: bool) -> Self {
        self.replace_all = all;
        self
    }

    /// Validate the configuration
    ///
    /// Checks every constraint and reports all violations in one aggregate
    /// failure: the pattern must compile as a regular expression and the
    /// replacement must be at least one character long.
    pub fn validate(&self) -> palisade_config::Result<()> {
        let mut violations = ValidationError::new();

        if let Err(cause) = Regex::new(&self.pattern) {
            violations.push(ConstraintViolation::invalid_pattern(
                "pattern",
                &self.pattern,
                cause,
            ));
        }

        if self.replacement.is_empty() {
            violations.push(ConstraintViolation::min_length(
                "replacement",
                &self.replacement,
                1,
            ));
        }

        violations.into_result()
    }
}

/// Compiled, immutable role-rewriting rule
///
/// # Thread Safety
///
/// Stateless after construction; safe to share across authentication
/// threads.
#[derive(Debug, Clone)]
pub struct RegexRoleMapper {
    pattern: Regex,
    replacement: String,
    keep_non_mapped: bool,
    replace_all: bool,
}

impl RegexRoleMapper {
    /// Compile a mapper from its configuration
    ///
    /// # Errors
    ///
    /// Returns an aggregate validation failure listing every violated
    /// constraint: a non-compiling pattern (including dangling quantifiers
    /// such as a leading `*`) and/or an empty replacement.
    pub fn new(config: &RegexRoleMapperConfig) -> Result<Self> {
        config.validate()?;

        // validate() verified the pattern compiles.
        let pattern = Regex::new(&config.pattern).map_err(|cause| {
            palisade_config::ConfigError::from(
                ValidationError::new().with(ConstraintViolation::invalid_pattern(
                    "pattern",
                    &config.pattern,
                    cause,
                )),
            )
        })?;

        Ok(Self {
            pattern,
            replacement: config.replacement.clone(),
            keep_non_mapped: config.keep_non_mapped,
            replace_all: config.replace_all,
        })
    }

    /// Rewrite a role set through this rule
    ///
    /// Each input role produces at most one output role: matched roles are
    /// substituted (first match or all matches per configuration, with the
    /// unmatched remainder left attached), non-matching roles pass through
    /// only when `keep_non_mapped` is set, and duplicates collapse.
    pub fn map(&self, input: &RoleSet) -> RoleSet {
        let mut output = RoleSet::new();

        for role in input.iter() {
            let name = role.as_str();
            if self.pattern.is_match(name) {
                let mapped = if self.replace_all {
                    self.pattern.replace_all(name, self.replacement.as_str())
                } else {
                    self.pattern.replace(name, self.replacement.as_str())
                };
                output.insert(Role::new(mapped.into_owned()));
            } else if self.keep_non_mapped {
                output.insert(role.clone());
            }
        }

        debug!(
            input = input.len(),
            output = output.len(),
            "role set mapped"
        );
        output
    }
}

/// How a domain composes multiple role-mapper stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleMappingStrategy {
    /// Each mapper consumes the previous stage's output
    #[default]
    Chained,

    /// Each mapper consumes the raw set; outputs are unioned
    Unioned,
}

/// Ordered role-mapper stages with an explicit composition strategy
#[derive(Debug, Clone, Default)]
pub struct RoleMappingStages {
    mappers: Vec<RegexRoleMapper>,
    strategy: RoleMappingStrategy,
}

impl RoleMappingStages {
    /// Create an empty stage list with the default (chained) strategy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the composition strategy
    pub fn with_strategy(mut self, strategy: RoleMappingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Append a mapper stage
    pub fn with_mapper(mut self, mapper: RegexRoleMapper) -> Self {
        self.mappers.push(mapper);
        self
    }

    /// The configured strategy
    pub fn strategy(&self) -> RoleMappingStrategy {
        self.strategy
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    /// True when no stages are configured
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Apply the stages to a raw role set
    ///
    /// With no stages configured the raw set passes through unchanged.
    pub fn apply(&self, raw: &RoleSet) -> RoleSet {
        if self.mappers.is_empty() {
            return raw.clone();
        }

        match self.strategy {
            RoleMappingStrategy::Chained => {
                let mut current = raw.clone();
                for mapper in &self.mappers {
                    current = mapper.map(&current);
                }
                current
            }
            RoleMappingStrategy::Unioned => {
                let mut merged = RoleSet::new();
                for mapper in &self.mappers {
                    merged = merged.union(&mapper.map(raw));
                }
                merged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palisade_config::{codes, ConfigError};
    use crate::error::AuthzError;

    fn mapper(config: RegexRoleMapperConfig) -> RegexRoleMapper {
        RegexRoleMapper::new(&config).unwrap()
    }

    fn validation_failure(config: RegexRoleMapperConfig) -> palisade_config::ValidationError {
        match RegexRoleMapper::new(&config) {
            Err(AuthzError::Config(ConfigError::Validation(err))) => err,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_single_substitution_keeps_remainder_attached() {
        let m = mapper(RegexRoleMapperConfig::new("guest", "user"));
        let input: RoleSet = ["app-guest-first-time-guest"].into_iter().collect();

        let output = m.map(&input);
        assert_eq!(output.to_sorted_vec(), vec!["app-user-first-time-guest"]);
    }

    #[test]
    fn test_replace_all_substitutes_every_occurrence() {
        let m = mapper(RegexRoleMapperConfig::new("guest", "user").with_replace_all(true));
        let input: RoleSet = ["app-guest-first-time-guest"].into_iter().collect();

        let output = m.map(&input);
        assert_eq!(output.to_sorted_vec(), vec!["app-user-first-time-user"]);
    }

    #[test]
    fn test_non_matching_role_dropped_by_default() {
        let m = mapper(RegexRoleMapperConfig::new("guest", "user"));
        let input: RoleSet = ["joe"].into_iter().collect();

        assert!(m.map(&input).is_empty());
    }

    #[test]
    fn test_keep_non_mapped_passes_role_through_unchanged() {
        let m = mapper(RegexRoleMapperConfig::new("guest", "user").with_keep_non_mapped(true));
        let input: RoleSet = ["joe"].into_iter().collect();

        let output = m.map(&input);
        assert_eq!(output.to_sorted_vec(), vec!["joe"]);
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let m = mapper(RegexRoleMapperConfig::new("user", "admin"));
        let input: RoleSet = ["some-user-role"].into_iter().collect();

        let output = m.map(&input);
        assert_eq!(output.to_sorted_vec(), vec!["some-admin-role"]);
    }

    #[test]
    fn test_anchored_pattern_honors_anchors() {
        let m = mapper(RegexRoleMapperConfig::new("^user$", "admin"));
        let input: RoleSet = ["some-user-role", "user"].into_iter().collect();

        let output = m.map(&input);
        assert_eq!(output.to_sorted_vec(), vec!["admin"]);
    }

    #[test]
    fn test_back_reference_substitution() {
        let m = mapper(RegexRoleMapperConfig::new("(application-user)-[0-9]+", "$1"));
        let input: RoleSet = ["application-user-2"].into_iter().collect();

        let output = m.map(&input);
        assert_eq!(output.to_sorted_vec(), vec!["application-user"]);
    }

    #[test]
    fn test_unmatched_group_expands_to_empty() {
        let m = mapper(RegexRoleMapperConfig::new("(a)|(b)", "x$2"));
        let input: RoleSet = ["a"].into_iter().collect();

        // Group 2 did not participate in the match of "a".
        let output = m.map(&input);
        assert_eq!(output.to_sorted_vec(), vec!["x"]);
    }

    #[test]
    fn test_mapped_duplicates_collapse() {
        let m = mapper(RegexRoleMapperConfig::new("[0-9]+-user", "user"));
        let input: RoleSet = ["1-user", "2-user"].into_iter().collect();

        let output = m.map(&input);
        assert_eq!(output.to_sorted_vec(), vec!["user"]);
    }

    #[test]
    fn test_empty_replacement_rejected() {
        let err = validation_failure(RegexRoleMapperConfig::new("guest", ""));
        assert!(err.contains_code(codes::MIN_LENGTH));
    }

    #[test]
    fn test_empty_replacement_rejected_regardless_of_flags() {
        let err = validation_failure(
            RegexRoleMapperConfig::new("guest", "")
                .with_keep_non_mapped(true)
                .with_replace_all(true),
        );
        assert!(err.contains_code(codes::MIN_LENGTH));
    }

    #[test]
    fn test_dangling_quantifier_pattern_rejected() {
        let err = validation_failure(RegexRoleMapperConfig::new("*-admin", "$1"));
        assert!(err.contains_code(codes::INVALID_PATTERN));
    }

    #[test]
    fn test_all_violations_reported_together() {
        let err = validation_failure(RegexRoleMapperConfig::new("*-admin", ""));
        assert!(err.contains_code(codes::INVALID_PATTERN));
        assert!(err.contains_code(codes::MIN_LENGTH));
        assert_eq!(err.codes().len(), 2);
    }

    #[test]
    fn test_chained_stages_feed_each_other() {
        let first = mapper(RegexRoleMapperConfig::new("guest", "member"));
        let second = mapper(RegexRoleMapperConfig::new("member", "user"));
        let stages = RoleMappingStages::new().with_mapper(first).with_mapper(second);

        let raw: RoleSet = ["guest"].into_iter().collect();
        assert_eq!(stages.apply(&raw).to_sorted_vec(), vec!["user"]);
    }

    #[test]
    fn test_unioned_stages_consume_raw_set() {
        let first = mapper(RegexRoleMapperConfig::new("guest", "member"));
        let second = mapper(RegexRoleMapperConfig::new("member", "user"));
        let stages = RoleMappingStages::new()
            .with_strategy(RoleMappingStrategy::Unioned)
            .with_mapper(first)
            .with_mapper(second);

        // Under union the first stage's output never feeds the second;
        // both consume the raw set.
        let raw: RoleSet = ["guest", "member"].into_iter().collect();
        assert_eq!(stages.apply(&raw).to_sorted_vec(), vec!["member", "user"]);
    }

    #[test]
    fn test_no_stages_is_identity() {
        let stages = RoleMappingStages::new();
        let raw: RoleSet = ["admin", "user"].into_iter().collect();

        assert_eq!(stages.apply(&raw), raw);
    }
}

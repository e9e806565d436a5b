//! Role and role-set types

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

/// An effective role granted to an authenticated identity
///
/// Roles are immutable, case-sensitive string identifiers. Equality and
/// hashing follow the underlying string exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Create a role from any string-like value
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The role name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Unordered set of unique roles
///
/// Supports union, membership testing, and conversion to a sorted sequence
/// for deterministic output. Serializes as a sorted list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet {
    roles: HashSet<Role>,
}

impl RoleSet {
    /// Create an empty role set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a role, collapsing duplicates
    pub fn insert(&mut self, role: impl Into<Role>) -> bool {
        self.roles.insert(role.into())
    }

    /// True when the named role is present
    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Union with another role set
    pub fn union(&self, other: &RoleSet) -> RoleSet {
        let mut merged = self.roles.clone();
        merged.extend(other.roles.iter().cloned());
        Self { roles: merged }
    }

    /// Number of roles in the set
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// True when no roles are present
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Iterate over the roles in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    /// The roles as a sorted vector of names, for deterministic assertions
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut names: Vec<String> = self.roles.iter().map(|r| r.0.clone()).collect();
        names.sort();
        names
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        let mut roles: Vec<Role> = set.roles.into_iter().collect();
        roles.sort();
        roles
    }
}

impl<R: Into<Role>> FromIterator<R> for RoleSet {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<R: Into<Role>> Extend<R> for RoleSet {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        self.roles.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for RoleSet {
    type Item = Role;
    type IntoIter = std::collections::hash_set::IntoIter<Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.roles.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let set: RoleSet = ["admin", "admin", "user"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("admin"));
        assert!(set.contains("user"));
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let set: RoleSet = ["Admin"].into_iter().collect();
        assert!(set.contains("Admin"));
        assert!(!set.contains("admin"));
    }

    #[test]
    fn test_union() {
        let a: RoleSet = ["admin"].into_iter().collect();
        let b: RoleSet = ["user", "admin"].into_iter().collect();

        let merged = a.union(&b);
        assert_eq!(merged.to_sorted_vec(), vec!["admin", "user"]);
    }

    #[test]
    fn test_sorted_conversion_is_deterministic() {
        let set: RoleSet = ["zeta", "alpha", "mid"].into_iter().collect();
        assert_eq!(set.to_sorted_vec(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_serializes_as_sorted_list() {
        let set: RoleSet = ["b", "a"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let back: RoleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}

//! Permission vocabulary shared by the authorization gate and role administration.
//!
//! Roles store their capabilities as a JSON object of `slug -> bool`. The set of
//! slugs is closed: [`Permission`] enumerates every capability the API checks,
//! so a typo in a route declaration fails to compile instead of silently
//! denying (or granting) access.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ObjectRead,
    ObjectWrite,
    ReservationRead,
    ReservationWrite,
    UserRead,
    UserWrite,
    RoleRead,
    RoleWrite,
    FaqWrite,
    TagRead,
    TagWrite,
    FeedbackRead,
    FeedbackWrite,
}

impl Permission {
    pub const ALL: [Permission; 13] = [
        Permission::ObjectRead,
        Permission::ObjectWrite,
        Permission::ReservationRead,
        Permission::ReservationWrite,
        Permission::UserRead,
        Permission::UserWrite,
        Permission::RoleRead,
        Permission::RoleWrite,
        Permission::FaqWrite,
        Permission::TagRead,
        Permission::TagWrite,
        Permission::FeedbackRead,
        Permission::FeedbackWrite,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Permission::ObjectRead => "object_read",
            Permission::ObjectWrite => "object_write",
            Permission::ReservationRead => "reservation_read",
            Permission::ReservationWrite => "reservation_write",
            Permission::UserRead => "user_read",
            Permission::UserWrite => "user_write",
            Permission::RoleRead => "role_read",
            Permission::RoleWrite => "role_write",
            Permission::FaqWrite => "faq_write",
            Permission::TagRead => "tag_read",
            Permission::TagWrite => "tag_write",
            Permission::FeedbackRead => "feedback_read",
            Permission::FeedbackWrite => "feedback_write",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Permission::ObjectRead => "View sanatorium objects",
            Permission::ObjectWrite => "Create, edit and delete sanatorium objects",
            Permission::ReservationRead => "View all reservations",
            Permission::ReservationWrite => "Change reservation status",
            Permission::UserRead => "View user accounts",
            Permission::UserWrite => "Edit and delete user accounts",
            Permission::RoleRead => "View roles and the permission list",
            Permission::RoleWrite => "Create, edit and delete roles",
            Permission::FaqWrite => "Edit frequently asked questions",
            Permission::TagRead => "View object tags",
            Permission::TagWrite => "Create and delete object tags",
            Permission::FeedbackRead => "View guest feedback",
            Permission::FeedbackWrite => "Moderate guest feedback",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// The capabilities granted by one role.
///
/// Serialized as the full vocabulary mapped to booleans so clients can render a
/// checkbox per permission without knowing the list in advance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lenient read of stored role flags. Unknown slugs are returned separately
    /// so the caller can log them; only `true` (or `1`) grants a permission.
    pub fn from_flags(flags: &Map<String, Value>) -> (Self, Vec<String>) {
        let mut set = Self::new();
        let mut unknown = Vec::new();
        for (slug, flag) in flags {
            let granted = match flag {
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_i64() == Some(1),
                _ => false,
            };
            match slug.parse::<Permission>() {
                Ok(permission) if granted => {
                    set.insert(permission);
                }
                Ok(_) => {}
                Err(_) => unknown.push(slug.clone()),
            }
        }
        (set, unknown)
    }

    /// Strict read of flags submitted by an administrator: every slug must be part
    /// of the vocabulary.
    pub fn parse_flags(flags: &BTreeMap<String, bool>) -> Result<Self, Vec<String>> {
        let mut set = Self::new();
        let mut unknown = Vec::new();
        for (slug, granted) in flags {
            match slug.parse::<Permission>() {
                Ok(permission) => {
                    if *granted {
                        set.insert(permission);
                    }
                }
                Err(_) => unknown.push(slug.clone()),
            }
        }
        if unknown.is_empty() {
            Ok(set)
        } else {
            Err(unknown)
        }
    }

    pub fn to_flags(&self) -> Map<String, Value> {
        Permission::ALL
            .into_iter()
            .map(|p| (p.slug().to_string(), Value::Bool(self.contains(p))))
            .collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_flags().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Stored roles may be NULL or carry slugs retired from the vocabulary
        let value = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        let (set, unknown) = Self::from_flags(&value);
        if !unknown.is_empty() {
            tracing::warn!("Ignoring unknown permission slugs on role: {:?}", unknown);
        }
        Ok(set)
    }
}

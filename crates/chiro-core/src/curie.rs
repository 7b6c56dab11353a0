//! Compact identifiers and the identifier normalizer
//!
//! Upstream providers disagree on whether local identifiers carry their
//! namespace (`CHEBI:15377` vs `15377`). Every identifier is pushed through
//! [`normalize`] before it is used as a key anywhere in the crate; [`Curie`]
//! does this on construction so a normalized pair is the only thing that can
//! be compared or hashed.

use crate::registry;
use chiro_common::{ChiroError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strip every leading, case-insensitive `"{namespace}:"` from `identifier`.
///
/// A prefix also counts when it is a registered synonym of `namespace`, so
/// `EC:1.1.1.1` normalizes to `1.1.1.1` under `eccode`. Stripping repeats
/// until no prefix is left, which keeps the function idempotent even for
/// doubly prefixed inputs such as `CHEBI:CHEBI:1`.
pub fn normalize(identifier: &str, namespace: &str) -> String {
    let mut rest = identifier.trim();
    if namespace.is_empty() {
        return rest.to_string();
    }
    let canonical = registry::canonical_prefix(namespace);
    while let Some((head, tail)) = rest.split_once(':') {
        let same_namespace = head.eq_ignore_ascii_case(namespace)
            || (canonical.is_some() && registry::canonical_prefix(head) == canonical);
        if !same_namespace {
            break;
        }
        rest = tail;
    }
    rest.to_string()
}

/// A (namespace, local identifier) pair.
///
/// The namespace is the registered canonical prefix when one exists and the
/// lower-cased input otherwise. The local identifier never carries its own
/// namespace, under any spelling, as a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Curie {
    namespace: String,
    local_id: String,
}

impl Curie {
    pub fn new(namespace: impl AsRef<str>, identifier: impl AsRef<str>) -> Self {
        let namespace = namespace.as_ref().trim();
        let namespace = registry::canonical_prefix(namespace)
            .map(str::to_string)
            .unwrap_or_else(|| namespace.to_lowercase());
        let local_id = normalize(identifier.as_ref(), &namespace);
        Self {
            namespace,
            local_id,
        }
    }

    /// Parse a prefixed identifier like `CHEBI:15377` or `go:0008150`.
    pub fn parse(curie: &str) -> Result<Self> {
        let (namespace, identifier) = curie
            .trim()
            .split_once(':')
            .ok_or_else(|| ChiroError::Parse(format!("not a prefixed identifier: '{}'", curie)))?;
        if namespace.is_empty() || identifier.is_empty() {
            return Err(ChiroError::Parse(format!(
                "empty namespace or identifier in '{}'",
                curie
            )));
        }
        Ok(Self::new(namespace, identifier))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl fmt::Display for Curie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.local_id)
    }
}

/// An identifier with its display name, if the provider knows one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term {
    pub curie: Curie,
    pub name: Option<String>,
}

impl Term {
    pub fn new(curie: Curie, name: Option<String>) -> Self {
        Self { curie, name }
    }
}

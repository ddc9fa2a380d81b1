//! Migration metadata.
//!
//! Known migrations are identified by a namespace-qualified version, e.g.
//! `FooNs::Version20240101120000`.

use std::fmt;

/// Namespace-qualified identifier of a migration class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    namespace: String,
    name: String,
}

impl Version {
    /// Creates a version from its namespace and class name parts.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parses a qualified identifier such as `FooNs::Version1234`.
    ///
    /// The last `::` segment is the class name; everything before it is the
    /// namespace. An unqualified identifier has an empty namespace.
    #[must_use]
    pub fn from_qualified(qualified: &str) -> Self {
        match qualified.rsplit_once("::") {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new("", qualified),
        }
    }

    /// Returns the namespace part.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the class name part.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace, self.name)
        }
    }
}

/// An immutable record of a known migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableMigration {
    version: Version,
}

impl AvailableMigration {
    /// Creates a record for the given version.
    #[must_use]
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    /// Returns the migration's version.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }
}

/// Ordered collection of known migrations.
#[derive(Debug, Clone, Default)]
pub struct AvailableMigrationsSet {
    items: Vec<AvailableMigration>,
}

impl AvailableMigrationsSet {
    /// Creates a set from the given migrations.
    #[must_use]
    pub fn new(items: Vec<AvailableMigration>) -> Self {
        Self { items }
    }

    /// Returns the number of known migrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the migrations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AvailableMigration> {
        self.items.iter()
    }

    /// Returns whether any known migration lives in the given namespace.
    #[must_use]
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.items
            .iter()
            .any(|m| m.version().namespace() == namespace)
    }
}

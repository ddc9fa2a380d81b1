//! Tool configuration.
//!
//! The configuration maps migration namespaces to the directories where
//! generated classes are placed. Entry order is preserved: the first
//! configured namespace is the default offered by interactive selection.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

/// A single namespace to directory mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationsDirectory {
    /// Namespace the directory holds migrations for.
    pub namespace: String,
    /// Filesystem location of the generated classes.
    pub path: PathBuf,
}

/// Ordered set of migrations directories.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    directories: Vec<MigrationsDirectory>,
}

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration from a JSON file.
    ///
    /// The file holds an array of `{"namespace": ..., "path": ...}` objects;
    /// array order becomes insertion order.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let directories: Vec<MigrationsDirectory> = serde_json::from_reader(BufReader::new(file))?;
        let mut configuration = Self::new();
        for directory in directories {
            configuration.add_migrations_directory(directory.namespace, directory.path);
        }
        Ok(configuration)
    }

    /// Adds a `NAMESPACE=PATH` argument as parsed from the command line.
    pub fn add_directory_spec(&mut self, spec: &str) -> Result<()> {
        let (namespace, path) = spec
            .split_once('=')
            .filter(|(namespace, path)| !namespace.is_empty() && !path.is_empty())
            .ok_or_else(|| MigrateError::InvalidDirectorySpec(spec.to_string()))?;
        self.add_migrations_directory(namespace, path);
        Ok(())
    }

    /// Adds a migrations directory for a namespace.
    ///
    /// A namespace configured twice keeps its original position; only the
    /// directory is updated.
    pub fn add_migrations_directory(
        &mut self,
        namespace: impl Into<String>,
        path: impl Into<PathBuf>,
    ) {
        let namespace = namespace.into();
        let path = path.into();
        if let Some(existing) = self
            .directories
            .iter_mut()
            .find(|d| d.namespace == namespace)
        {
            existing.path = path;
        } else {
            self.directories.push(MigrationsDirectory { namespace, path });
        }
    }

    /// Returns the configured namespaces in insertion order.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        self.directories
            .iter()
            .map(|d| d.namespace.as_str())
            .collect()
    }

    /// Returns the directory configured for a namespace.
    pub fn directory_for(&self, namespace: &str) -> Result<&Path> {
        self.directories
            .iter()
            .find(|d| d.namespace == namespace)
            .map(|d| d.path.as_path())
            .ok_or_else(|| MigrateError::UnknownNamespace(namespace.to_string()))
    }

    /// Returns the first configured namespace.
    ///
    /// This is the default for interactive selection, so the configuration
    /// must never be empty when a command runs.
    pub fn first_namespace(&self) -> Result<&str> {
        self.directories
            .first()
            .map(|d| d.namespace.as_str())
            .ok_or(MigrateError::EmptyConfiguration)
    }

    /// Returns the number of configured directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    /// Returns whether no directory is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}
